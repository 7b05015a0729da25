//! Neon Drop entry point
//!
//! On the web this wires DOM events and a requestAnimationFrame loop to the
//! [`Game`] driver. Natively it plays a few headless autopilot runs against
//! in-memory storage and leaderboard.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, KeyboardEvent,
        PointerEvent, Window,
    };

    use neon_drop::Game;
    use neon_drop::leaderboard::{
        HttpLeaderboard, LeaderboardBackend, LeaderboardView, MemoryLeaderboard,
    };
    use neon_drop::persistence::{KeyValueStore, LocalStore};
    use neon_drop::settings::Settings;
    use neon_drop::sim::{RunPhase, Viewport};

    /// Game plus what the DOM currently shows
    struct App {
        game: Game,
        document: Document,
        shown_phase: Option<RunPhase>,
        shown_view: Option<LeaderboardView>,
    }

    impl App {
        fn el(&self, id: &str) -> Option<Element> {
            self.document.get_element_by_id(id)
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.el(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.el(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let state = self.game.state();
            let speed = state.scroll_speed / state.tuning.base_scroll;
            self.set_text("hud-score", &state.score.to_string());
            self.set_text("hud-best", &state.best.to_string());
            self.set_text("hud-speed", &format!("{speed:.1}x"));
            self.set_text(
                "hud-health",
                &format!("{}/{}", state.health, state.tuning.max_health),
            );

            let phase = state.phase;
            if self.shown_phase != Some(phase) {
                self.shown_phase = Some(phase);
                self.update_overlay(phase);
            }

            let view = self.game.leaderboard().view().clone();
            if self.shown_view.as_ref() != Some(&view) {
                self.update_leaderboard(&view);
                self.shown_view = Some(view);
            }
        }

        fn update_overlay(&self, phase: RunPhase) {
            let (title, text) = match phase {
                RunPhase::Idle => ("NEON DROP", "Press Space or tap to start".to_string()),
                RunPhase::Running => ("", String::new()),
                RunPhase::Paused => ("PAUSED", "Press Escape to resume".to_string()),
                RunPhase::Dead { cause, final_score } => (
                    "GAME OVER",
                    format!("Score {final_score} ({}). Press Space to retry", cause.as_str()),
                ),
            };
            self.set_hidden("overlay", phase == RunPhase::Running);
            self.set_text("overlay-title", title);
            self.set_text("overlay-text", &text);
            self.set_hidden("submit-form", !matches!(phase, RunPhase::Dead { .. }));
        }

        fn update_leaderboard(&self, view: &LeaderboardView) {
            if let Some(list) = self.el("leaderboard-list") {
                list.set_inner_html("");
                for entry in &view.entries {
                    if let Ok(li) = self.document.create_element("li") {
                        li.set_text_content(Some(&format!("{}  {}", entry.name, entry.score)));
                        let _ = list.append_child(&li);
                    }
                }
            }

            let status = match (&view.error, view.loading, view.entries.is_empty()) {
                (Some(error), _, _) => error.clone(),
                (None, true, _) => "Loading...".to_string(),
                (None, false, true) => "No scores yet".to_string(),
                (None, false, false) => match &view.submitted_as {
                    Some(name) => format!("Submitted as {name}"),
                    None => String::new(),
                },
            };
            self.set_text("leaderboard-status", &status);

            if let Some(btn) = self
                .el("submit-btn")
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            {
                btn.set_disabled(view.submitting);
            }
        }
    }

    fn surface_size(surface: &HtmlElement) -> Viewport {
        Viewport::new(surface.client_width() as f32, surface.client_height() as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Neon Drop starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(surface) = document
            .get_element_by_id("field")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::error!("Missing #field element");
            return;
        };

        let settings = Settings::load();
        // Write back so the blob exists for hand-editing in devtools
        settings.save();
        let store: Rc<dyn KeyValueStore> = Rc::new(LocalStore::open());
        let backend: Rc<dyn LeaderboardBackend> = if settings.leaderboard.is_configured() {
            Rc::new(HttpLeaderboard::new(settings.leaderboard.clone()))
        } else {
            log::warn!("No leaderboard configured; scores stay local");
            Rc::new(MemoryLeaderboard::new())
        };

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(&settings, surface_size(&surface), seed, store, backend);

        if let (Some(name), Some(input)) = (
            game.profile().name(),
            document
                .get_element_by_id("name-input")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok()),
        ) {
            input.set_value(&name);
        }
        wasm_bindgen_futures::spawn_local(game.refresh_leaderboard());

        let app = Rc::new(RefCell::new(App {
            game,
            document: document.clone(),
            shown_phase: None,
            shown_view: None,
        }));

        setup_input_handlers(&window, &surface, app.clone());
        setup_submit_button(&document, app.clone());
        setup_auto_pause(&window, &document, app.clone());
        setup_resize(&window, surface, app.clone());

        request_animation_frame(app);

        log::info!("Neon Drop running!");
    }

    fn setup_input_handlers(window: &Window, surface: &HtmlElement, app: Rc<RefCell<App>>) {
        // Keyboard (ignored while typing a name)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let typing = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                if typing {
                    return;
                }
                if app.borrow_mut().game.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer: left/right half of the field; a tap also starts a run
        {
            let app = app.clone();
            let surface_clone = surface.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let x = local_x(&surface_clone, &event);
                let mut a = app.borrow_mut();
                a.game.pointer_down(event.pointer_id(), x);
                a.game.request_start();
            });
            let _ = surface
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let surface_clone = surface.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let x = local_x(&surface_clone, &event);
                app.borrow_mut().game.pointer_move(event.pointer_id(), x);
            });
            let _ = surface
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                app.borrow_mut().game.pointer_up(event.pointer_id());
            });
            let _ = surface.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn local_x(surface: &HtmlElement, event: &PointerEvent) -> f32 {
        let rect = surface.get_bounding_client_rect();
        event.client_x() as f32 - rect.left() as f32
    }

    fn setup_submit_button(document: &Document, app: Rc<RefCell<App>>) {
        let Some(btn) = document.get_element_by_id("submit-btn") else {
            return;
        };
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let name = document
                .get_element_by_id("name-input")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            let result = app.borrow().game.submit_score(&name);
            match result {
                Ok(task) => wasm_bindgen_futures::spawn_local(task),
                Err(e) => log::warn!("Submit rejected: {e}"),
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(window: &Window, document: &Document, app: Rc<RefCell<App>>) {
        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().game.auto_pause();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.auto_pause();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &Window, surface: HtmlElement, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let viewport = surface_size(&surface);
            app.borrow_mut().game.resize(viewport.width, viewport.height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            for event in a.game.frame(time) {
                log::debug!("{event:?}");
            }
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;
    use std::rc::Rc;

    use neon_drop::Game;
    use neon_drop::consts::SIM_DT;
    use neon_drop::leaderboard::MemoryLeaderboard;
    use neon_drop::persistence::MemoryStore;
    use neon_drop::platform::time::now_ms;
    use neon_drop::settings::Settings;
    use neon_drop::sim::Viewport;

    env_logger::init();
    log::info!("Neon Drop (native) starting...");
    log::info!("Native mode plays headless autopilot runs - run with `trunk serve` for the web version");

    let path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load_from_path(path.as_deref());

    let board = Rc::new(MemoryLeaderboard::new());
    let seed = now_ms() as u64;
    let mut game = Game::new(
        &settings,
        Viewport::new(480.0, 800.0),
        seed,
        Rc::new(MemoryStore::new()),
        board.clone(),
    );

    const RUNS: usize = 3;
    const MAX_RUN_SECONDS: f64 = 120.0;

    let mut now = 0.0f64;
    for run in 1..=RUNS {
        game.request_start();
        let run_end = now + MAX_RUN_SECONDS;
        while now < run_end {
            autopilot(&mut game);
            now += SIM_DT as f64;
            game.step(SIM_DT, now);
            if game.state().is_dead() {
                break;
            }
        }

        let state = game.state();
        log::info!(
            "Run {run}: score {} after {:.1}s, {} landings",
            state.score,
            state.elapsed,
            state.landings
        );
        if !state.is_dead() {
            log::info!("Run {run} still alive after {MAX_RUN_SECONDS}s, moving on");
            continue;
        }
        match game.submit_score(&format!("autopilot {run}")) {
            Ok(task) => futures::executor::block_on(task),
            Err(e) => log::warn!("Submit failed: {e}"),
        }
        now += game.state().tuning.restart_cooldown;
    }

    println!("\nLeaderboard:");
    for (i, entry) in game.leaderboard().view().entries.iter().enumerate() {
        println!("{:>2}. {:<16} {}", i + 1, entry.name, entry.score);
    }
    println!("Best: {}", game.profile().best_score());
}

/// Steer toward the nearest platform strictly below the ball
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(game: &mut neon_drop::Game) {
    let state = game.state();
    let feet = state.player.feet();
    let x = state.player.pos.x;
    let target = state
        .field
        .platforms
        .iter()
        .filter(|p| p.y > feet + 1.0)
        .min_by(|a, b| a.y.total_cmp(&b.y))
        .map(|p| p.center_x());

    game.key_up("a");
    game.key_up("d");
    match target {
        Some(tx) if tx < x - 8.0 => {
            game.key_down("a");
        }
        Some(tx) if tx > x + 8.0 => {
            game.key_down("d");
        }
        _ => {}
    }
}
