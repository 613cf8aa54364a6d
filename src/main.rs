//! Star Blaster entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use star_blaster::Settings;
    use star_blaster::platform::InputState;
    use star_blaster::renderer::{Color, DrawCommand, build_frame};
    use star_blaster::sim::{Command, GameEvent, GamePhase, GameState, Hud, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        settings: Settings,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        last_time: f64,
        /// HUD pushed to the DOM last frame
        last_hud: Option<Hud>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_fps_shown: u32,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                state: GameState::new(seed),
                input: InputState::default(),
                settings: Settings::load(),
                canvas,
                ctx,
                last_time: 0.0,
                last_hud: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_fps_shown: 0,
            }
        }

        /// Playfield size in CSS pixels
        fn playfield(&self) -> Vec2 {
            Vec2::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            )
        }

        /// Keep the backing store matched to the displayed size
        fn resize_canvas(&self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if self.canvas.width() != width || self.canvas.height() != height {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
            }
            let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        }

        /// Advance the simulation by the real elapsed time
        fn update(&mut self, time: f64) {
            let elapsed_ms = if self.last_time > 0.0 {
                (time - self.last_time) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let input = self
                .input
                .tick_input(self.state.player.pos, self.playfield());
            tick(&mut self.state, &input, elapsed_ms);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::LevelUp { level, .. } => log::info!("Reached level {}", level),
                    GameEvent::GameOver { final_score } => {
                        log::info!("Game over with {} points", final_score)
                    }
                    other => log::debug!("{:?}", other),
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Replay the frame's draw list on the canvas
        fn render(&self, time: f64) {
            self.resize_canvas();
            for command in build_frame(&self.state, &self.settings, time) {
                draw(&self.ctx, &command);
            }
        }

        fn apply(&mut self, command: Command) {
            if self.state.apply(command) {
                self.input.keyboard.clear();
                self.input.touch.end();
            }
        }

        /// Change a preference and persist it
        fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
            change(&mut self.settings);
            self.settings.save();
            if let Some(document) = document() {
                set_visible(&document, "hud-fps", self.settings.show_fps);
            }
        }

        fn toggle_pause(&mut self) {
            match self.state.phase {
                GamePhase::Playing => self.apply(Command::Pause),
                GamePhase::Paused => self.apply(Command::Resume),
                _ => {}
            }
        }

        /// Push HUD values to the DOM, only when something changed
        fn update_hud(&mut self, document: &Document) {
            if self.settings.show_fps && self.fps != self.last_fps_shown {
                set_text(document, "hud-fps", &self.fps.to_string());
                self.last_fps_shown = self.fps;
            }

            let hud = self.state.hud();
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }

            set_text(document, "hud-score", &hud.score.to_string());
            set_text(document, "hud-lives", &hud.lives.to_string());
            set_text(document, "hud-level", &hud.level.to_string());

            let phase_changed = self.last_hud.as_ref().map(|h| h.phase) != Some(hud.phase);
            if phase_changed {
                set_visible(document, "start-screen", hud.phase == GamePhase::Start);
                set_visible(document, "pause-menu", hud.phase == GamePhase::Paused);
                set_visible(document, "game-over", hud.phase == GamePhase::GameOver);
                set_visible(document, "hud", hud.phase != GamePhase::Start);
            }
            if let Some(final_score) = hud.final_score {
                set_text(document, "final-score", &final_score.to_string());
            }

            self.last_hud = Some(hud);
        }
    }

    fn css_color(color: Color) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (color[0] * 255.0).round() as u8,
            (color[1] * 255.0).round() as u8,
            (color[2] * 255.0).round() as u8,
            color[3]
        )
    }

    fn draw(ctx: &CanvasRenderingContext2d, command: &DrawCommand) {
        let style = css_color(command.color());
        match command {
            DrawCommand::Circle {
                center,
                radius,
                ..
            } => {
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
                ctx.set_fill_style_str(&style);
                ctx.fill();
            }
            DrawCommand::Ring {
                center,
                radius,
                width,
                ..
            } => {
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
                ctx.set_line_width(*width as f64);
                ctx.set_stroke_style_str(&style);
                ctx.stroke();
            }
            DrawCommand::Polygon { points, .. } => {
                let Some((first, rest)) = points.split_first() else {
                    return;
                };
                ctx.begin_path();
                ctx.move_to(first.x as f64, first.y as f64);
                for p in rest {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                ctx.close_path();
                ctx.set_fill_style_str(&style);
                ctx.fill();
            }
            DrawCommand::Text {
                pos,
                text,
                size,
                ..
            } => {
                ctx.set_font(&format!("bold {}px sans-serif", size.round()));
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                ctx.set_fill_style_str(&style);
                let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Star Blaster starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas.clone(), ctx)));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Star Blaster running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => {
                        if !event.repeat() {
                            g.toggle_pause();
                        }
                    }
                    "m" | "M" => g.update_settings(|s| s.reduced_motion = !s.reduced_motion),
                    "h" | "H" => g.update_settings(|s| s.high_contrast = !s.high_contrast),
                    "f" | "F" => g.update_settings(|s| s.show_fps = !s.show_fps),
                    "q" | "Q" => g.update_settings(|s| {
                        s.apply_preset(s.quality.next());
                        log::info!("Quality preset: {}", s.quality.as_str());
                    }),
                    key => {
                        if g.input.keyboard.set_key(key, true) {
                            event.prevent_default();
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.keyboard.set_key(&event.key(), false) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// First touch position in canvas coordinates
    fn touch_pos(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(Vec2::new(
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start: control mode is decided here for the whole gesture
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(pos) = touch_pos(&canvas_clone, &event) else {
                    return;
                };
                let mut g = game.borrow_mut();
                if !g.state.is_playing() {
                    return;
                }
                let player_pos = g.state.player.pos;
                let mode = g.input.touch.begin(pos, player_pos);
                log::debug!("Touch gesture started in {:?} mode", mode);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&canvas_clone, &event) {
                    game.borrow_mut().input.touch.move_to(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() == 0 {
                    game.borrow_mut().input.touch.end();
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        let buttons = [
            ("start-btn", Command::Start),
            ("resume-btn", Command::Resume),
            ("restart-btn", Command::Restart),
            ("pause-restart-btn", Command::RestartFromPause),
            ("menu-btn", Command::GoToMainMenu),
        ];
        for (id, command) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing button #{}", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().apply(command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.is_playing() {
                        g.apply(Command::Pause);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur: held keys would otherwise stick
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.keyboard.clear();
                g.input.touch.end();
                if g.state.is_playing() {
                    g.apply(Command::Pause);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            if let Some(document) = document() {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use star_blaster::consts::FRAME_MS;
    use star_blaster::platform::input::intent_toward;
    use star_blaster::sim::{Command, GameEvent, GamePhase, GameState, TickInput, tick};

    /// Simulated run length
    const RUN_MS: f32 = 5.0 * 60.0 * 1000.0;

    /// Hold fire and line up under the lowest enemy, sidestepping anything
    /// about to ram the ship
    fn autopilot(state: &GameState) -> TickInput {
        let player = &state.player;
        let target_x = state
            .enemies
            .iter()
            .filter(|e| e.pos.y < player.pos.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map_or(player.pos.x, |e| e.pos.x);

        let threat = state.enemies.iter().find(|e| {
            let gap = player.pos.y - e.pos.y;
            gap > 0.0 && gap < 120.0 && (e.pos.x - player.pos.x).abs() < e.size + player.size
        });
        let target = match threat {
            Some(e) if e.pos.x >= player.pos.x => Vec2::new(player.pos.x - 100.0, player.pos.y),
            Some(_) => Vec2::new(player.pos.x + 100.0, player.pos.y),
            None => Vec2::new(target_x, player.pos.y),
        };

        TickInput {
            movement: intent_toward(player.pos, target),
            fire: true,
            playfield: state.bounds,
        }
    }

    pub fn run(seed: u64) {
        let mut state = GameState::new(seed);
        state.apply(Command::Start);

        let mut elapsed = 0.0;
        while elapsed < RUN_MS && state.phase == GamePhase::Playing {
            let input = autopilot(&state);
            tick(&mut state, &input, FRAME_MS);
            elapsed += FRAME_MS;

            for event in state.drain_events() {
                match event {
                    GameEvent::LevelUp {
                        level,
                        bonus_life,
                        double_power,
                        intense,
                    } => log::info!(
                        "Level {} at {:.1}s (bonus life: {}, double power: {}, intense: {})",
                        level,
                        elapsed / 1000.0,
                        bonus_life,
                        double_power,
                        intense
                    ),
                    GameEvent::GameOver { final_score } => {
                        log::info!("Game over at {:.1}s, {} points", elapsed / 1000.0, final_score)
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        match serde_json::to_string_pretty(&state.hud()) {
            Ok(json) => println!("{}", json),
            Err(err) => log::error!("Failed to serialize HUD: {}", err),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Star Blaster (native) starting...");
    log::info!("Native mode runs a headless autopilot game - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
