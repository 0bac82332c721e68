//! Lane Hopper entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement,
        KeyboardEvent, TouchEvent,
    };

    use lane_hopper::Settings;
    use lane_hopper::audio::AudioManager;
    use lane_hopper::consts::*;
    use lane_hopper::highscores::LocalStorageStore;
    use lane_hopper::render::{Frame, Renderer};
    use lane_hopper::runner::Runner;
    use lane_hopper::sim::{GamePhase, LaneKind, VisualTag};

    const COLOR_ACTOR: &str = "#2ecc71";
    const COLOR_ROAD: &str = "#1a1a1f";
    const COLOR_GRASS: &str = "#102a10";
    const COLOR_SAFE: &str = "#222233";
    const COLOR_WATER: &str = "#0984e3";
    const COLOR_LOG: &str = "#634433";
    const COLOR_CARS: [&str; 5] = ["#ff4757", "#eccc68", "#70a1ff", "#ffa502", "#5352ed"];

    /// 2D canvas renderer
    struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
        show_hop: bool,
    }

    impl CanvasRenderer {
        fn new(canvas: &HtmlCanvasElement, settings: &Settings) -> Result<Self, JsValue> {
            let ctx = canvas
                .get_context("2d")?
                .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
                .dyn_into::<CanvasRenderingContext2d>()?;
            Ok(Self {
                ctx,
                show_hop: settings.show_hop_frame(),
            })
        }

        fn rect(&self, color: &str, x: f32, y: f32, w: f32, h: f32) {
            self.ctx.set_fill_style_str(color);
            self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
        }

        fn overlay(&self, frame: &Frame<'_>) {
            self.ctx.set_fill_style_str("rgba(0,0,0,0.6)");
            self.ctx.fill_rect(0.0, 0.0, WIDTH as f64, HEIGHT as f64);
            self.ctx.set_fill_style_str("#ffffff");
            self.ctx.set_text_align("center");
            let (title, line) = match frame.phase {
                GamePhase::GameOver => ("GAME OVER", format!("Score {}. Space or tap to retry", frame.score)),
                _ => ("LANE HOPPER", "Space or tap to start".to_string()),
            };
            self.ctx.set_font("bold 42px monospace");
            let _ = self.ctx.fill_text(title, WIDTH as f64 / 2.0, HEIGHT as f64 / 2.0 - 20.0);
            self.ctx.set_font("18px monospace");
            let _ = self.ctx.fill_text(&line, WIDTH as f64 / 2.0, HEIGHT as f64 / 2.0 + 20.0);
        }

        fn hud(&self, frame: &Frame<'_>) {
            self.ctx.set_fill_style_str("#ffffff");
            self.ctx.set_font("16px monospace");
            self.ctx.set_text_align("left");
            let text = format!(
                "Stage {}   Score {}   Best {}",
                frame.stage, frame.score, frame.high_score
            );
            let _ = self.ctx.fill_text(&text, 10.0, 30.0);
        }
    }

    impl Renderer for CanvasRenderer {
        fn draw(&mut self, frame: &Frame<'_>) {
            self.rect(COLOR_GRASS, 0.0, 0.0, WIDTH, HEIGHT);
            self.rect(COLOR_SAFE, 0.0, 0.0, WIDTH, GRID);
            self.rect(COLOR_SAFE, 0.0, HEIGHT - GRID, WIDTH, GRID);

            for lane in frame.lanes {
                let strip = match lane.kind {
                    LaneKind::Water => COLOR_WATER,
                    LaneKind::Road => COLOR_ROAD,
                };
                self.rect(strip, 0.0, lane.y - LANE_BAND_OFFSET, WIDTH, GRID);
                for obj in &lane.objects {
                    let color = match obj.tag {
                        VisualTag::Log => COLOR_LOG,
                        VisualTag::Car(i) => COLOR_CARS[i as usize % COLOR_CARS.len()],
                    };
                    self.rect(color, obj.x, lane.y, obj.width, OBJECT_HEIGHT);
                }
            }

            // Hop frame: squash the token slightly while airborne
            let inset = if frame.hopping && self.show_hop { 3.0 } else { 0.0 };
            self.rect(
                COLOR_ACTOR,
                frame.actor.x + inset,
                frame.actor.y + inset,
                ACTOR_SIZE - 2.0 * inset,
                ACTOR_SIZE - 2.0 * inset,
            );

            self.hud(frame);
            if frame.phase != GamePhase::Playing {
                self.overlay(frame);
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        runner: Runner<LocalStorageStore, AudioManager>,
        renderer: CanvasRenderer,
        settings: Settings,
        last_time: f64,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;
            self.runner.update(dt);
            self.renderer.draw(&self.runner.frame());
        }

        fn set_focused(&mut self, focused: bool) {
            self.runner.feedback_mut().set_focused(focused);
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_muted();
            self.runner.feedback_mut().apply_settings(&self.settings);
            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        }
    }

    /// DOM listeners registered for the session; removed on drop
    #[derive(Default)]
    struct Listeners {
        entries: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
    }

    impl Listeners {
        fn add(
            &mut self,
            target: &EventTarget,
            kind: &'static str,
            handler: impl FnMut(Event) + 'static,
        ) -> Result<(), JsValue> {
            let closure = Closure::<dyn FnMut(Event)>::new(handler);
            // Non-passive so touch handlers may call preventDefault
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )?;
            self.entries.push((target.clone(), kind, closure));
            Ok(())
        }
    }

    impl Drop for Listeners {
        fn drop(&mut self) {
            for (target, kind, closure) in self.entries.drain(..) {
                let _ = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            }
            log::info!("Input listeners removed");
        }
    }

    /// requestAnimationFrame loop; cancelled on drop
    struct FrameLoop {
        callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
        pending: Rc<Cell<Option<i32>>>,
    }

    impl FrameLoop {
        fn start(game: Rc<RefCell<Game>>) -> Result<Self, JsValue> {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
            let pending = Rc::new(Cell::new(None));

            let next = callback.clone();
            let pending_inner = pending.clone();
            let win = window.clone();
            *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                pending_inner.set(None);
                game.borrow_mut().frame(time);
                if let Some(cb) = next.borrow().as_ref() {
                    match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        Ok(id) => pending_inner.set(Some(id)),
                        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                    }
                }
            }));

            if let Some(cb) = callback.borrow().as_ref() {
                pending.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
            }
            Ok(Self { callback, pending })
        }

        fn stop(&mut self) {
            if let Some(id) = self.pending.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            // Breaks the closure's self-reference
            self.callback.borrow_mut().take();
        }
    }

    impl Drop for FrameLoop {
        fn drop(&mut self) {
            self.stop();
            log::info!("Frame loop stopped");
        }
    }

    /// Everything acquired for a running session
    pub struct Session {
        _game: Rc<RefCell<Game>>,
        // Field order: stop frames before listeners go away
        _frames: FrameLoop,
        _listeners: Listeners,
    }

    thread_local! {
        static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: &Rc<RefCell<Game>>,
    ) -> Result<Listeners, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let mut listeners = Listeners::default();

        // Keyboard
        {
            let game = game.clone();
            listeners.add(&window, "keydown", move |event: Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if event.repeat() {
                    return;
                }
                let key = event.key();
                let mut game = game.borrow_mut();
                if key.eq_ignore_ascii_case("m") {
                    game.toggle_mute();
                } else if game.runner.key(&key) {
                    event.prevent_default();
                }
            })?;
        }

        // Touch start
        {
            let game = game.clone();
            listeners.add(canvas, "touchstart", move |event: Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    game.borrow_mut().runner.touch_start(pos);
                }
            })?;
        }

        // Touch move: keep the page from scrolling mid-swipe
        listeners.add(canvas, "touchmove", move |event: Event| {
            event.prevent_default();
        })?;

        // Touch end
        {
            let game = game.clone();
            listeners.add(canvas, "touchend", move |event: Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    game.borrow_mut().runner.touch_end(pos);
                }
            })?;
        }

        // Touch cancel
        {
            let game = game.clone();
            listeners.add(canvas, "touchcancel", move |_event: Event| {
                game.borrow_mut().runner.touch_cancel();
            })?;
        }

        // Mouse click on the overlay starts a session
        {
            let game = game.clone();
            listeners.add(canvas, "click", move |_event: Event| {
                let mut g = game.borrow_mut();
                if g.runner.state.phase != GamePhase::Playing {
                    g.runner.key(" ");
                }
            })?;
        }

        // Focus handling for mute_on_blur
        {
            let game = game.clone();
            listeners.add(&window, "blur", move |_event: Event| {
                game.borrow_mut().set_focused(false);
            })?;
        }
        {
            let game = game.clone();
            listeners.add(&window, "focus", move |_event: Event| {
                game.borrow_mut().set_focused(true);
            })?;
        }

        Ok(listeners)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Lane Hopper starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("missing #canvas"))?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(WIDTH as u32);
        canvas.set_height(HEIGHT as u32);

        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        let seed = js_sys::Date::now() as u64;
        let runner = Runner::new(seed, LocalStorageStore, audio);
        let renderer = CanvasRenderer::new(&canvas, &settings)?;
        let game = Rc::new(RefCell::new(Game {
            runner,
            renderer,
            settings,
            last_time: 0.0,
        }));

        let listeners = setup_input_handlers(&canvas, &game)?;
        let frames = FrameLoop::start(game.clone())?;
        SESSION.with(|s| {
            *s.borrow_mut() = Some(Session {
                _game: game,
                _frames: frames,
                _listeners: listeners,
            })
        });

        // Leaving the page tears the session down; registered once, outside the guard
        let teardown = Closure::once_into_js(move || stop());
        window.add_event_listener_with_callback("pagehide", teardown.unchecked_ref())?;

        log::info!("Lane Hopper running (seed {})", seed);
        Ok(())
    }

    /// Drop the running session, if any
    pub fn stop() {
        let session = SESSION.with(|s| s.borrow_mut().take());
        if session.is_some() {
            drop(session);
            log::info!("Session torn down");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Stop the game loop and remove all input listeners
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn shutdown() {
    wasm_game::stop();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Hopper (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    autopilot::run(seed, 3);
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use lane_hopper::audio::LogFeedback;
    use lane_hopper::render::{AsciiRenderer, Renderer};
    use lane_hopper::sim::{Command, Direction, GameEvent, GamePhase, GameState, TickInput, tick};
    use lane_hopper::{MemoryStore, Runner};

    /// Ticks between autopilot decisions
    const DECIDE_EVERY: u64 = 12;
    /// How far ahead a candidate move is simulated
    const LOOKAHEAD_TICKS: u32 = 24;
    /// Hard cap per session
    const MAX_TICKS: u64 = 60 * 60 * 5;

    /// Whether the actor survives `LOOKAHEAD_TICKS` after `command`
    fn survives(state: &GameState, command: Option<Command>) -> bool {
        let mut probe = state.clone();
        let mut input = TickInput::default();
        if let Some(command) = command {
            input.push(command);
        }
        tick(&mut probe, &input);
        let idle = TickInput::default();
        for _ in 0..LOOKAHEAD_TICKS {
            tick(&mut probe, &idle);
        }
        probe.phase == GamePhase::Playing
    }

    fn choose(state: &GameState) -> Option<Command> {
        let candidates = [
            Some(Command::Step(Direction::Up)),
            None,
            Some(Command::Step(Direction::Left)),
            Some(Command::Step(Direction::Right)),
            Some(Command::Step(Direction::Down)),
        ];
        candidates
            .into_iter()
            .find(|&c| survives(state, c))
            .unwrap_or(Some(Command::Step(Direction::Up)))
    }

    pub fn run(seed: u64, sessions: u32) {
        let mut runner = Runner::new(seed, MemoryStore::new(), LogFeedback::default());
        let mut renderer = AsciiRenderer::default();

        for session in 1..=sessions {
            runner.queue(Command::Start);
            runner.advance(1);

            while runner.state.phase == GamePhase::Playing && runner.state.time_ticks < MAX_TICKS {
                if runner.state.time_ticks % DECIDE_EVERY == 0 {
                    if let Some(command) = choose(&runner.state) {
                        runner.queue(command);
                    }
                }
                runner.advance(1);

                for event in runner.last_events() {
                    match event {
                        GameEvent::StageCleared { stage, score } => {
                            println!("Session {session}: reached stage {stage} (score {score})");
                        }
                        GameEvent::GameOver { cause, score } => {
                            renderer.draw(&runner.frame());
                            println!("{}", renderer.output);
                            println!("Session {session}: {cause:?} with score {score}");
                        }
                        _ => {}
                    }
                }
            }
        }

        println!(
            "Best score {} after {} sessions ({} cues played)",
            runner.state.high_score,
            sessions,
            runner.feedback().count
        );
    }
}
