//! Sky Strike entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlAudioElement, HtmlCanvasElement, HtmlElement,
        HtmlImageElement, KeyboardEvent,
    };

    use sky_strike::consts::*;
    use sky_strike::platform::{AssetId, AudioOut, Color, DrawSurface, TrackId, UiSink};
    use sky_strike::sim::{GamePhase, UpgradeKind};
    use sky_strike::{Game, Settings, Tuning};

    /// Canvas 2D draw surface with preloaded sprites
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
        images: HashMap<AssetId, HtmlImageElement>,
    }

    impl CanvasSurface {
        fn new(ctx: CanvasRenderingContext2d) -> Self {
            let mut images = HashMap::new();
            for asset in AssetId::ALL {
                match HtmlImageElement::new() {
                    Ok(img) => {
                        img.set_src(asset.file_name());
                        images.insert(asset, img);
                    }
                    Err(_) => log::warn!("Could not create image for {:?}", asset),
                }
            }
            Self { ctx, images }
        }
    }

    impl DrawSurface for CanvasSurface {
        fn clear(&mut self) {
            self.ctx
                .clear_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);
        }

        fn draw_image(&mut self, asset: AssetId, x: f32, y: f32, w: f32, h: f32) {
            let Some(img) = self.images.get(&asset) else {
                return;
            };
            let (x, y, w, h) = (x as f64, y as f64, w as f64, h as f64);
            if asset.faces_down() {
                self.ctx.save();
                let _ = self.ctx.translate(x + w / 2.0, y + h / 2.0);
                let _ = self.ctx.rotate(std::f64::consts::PI);
                let _ = self
                    .ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, -h / 2.0, w, h);
                self.ctx.restore();
            } else {
                let _ = self
                    .ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h);
            }
        }

        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
        }
    }

    /// `<audio>` element playback
    struct WebAudio {
        tracks: HashMap<TrackId, HtmlAudioElement>,
    }

    impl WebAudio {
        fn new() -> Self {
            let mut tracks = HashMap::new();
            for track in [TrackId::Music, TrackId::Shot] {
                match HtmlAudioElement::new_with_src(track.file_name()) {
                    Ok(el) => {
                        tracks.insert(track, el);
                    }
                    Err(_) => log::warn!("Audio unavailable for {:?}", track),
                }
            }
            Self { tracks }
        }
    }

    impl AudioOut for WebAudio {
        fn play_looping(&mut self, track: TrackId, volume: f32) {
            if let Some(el) = self.tracks.get(&track) {
                el.set_loop(true);
                el.set_volume(volume as f64);
                let _ = el.play();
            }
        }

        fn play_oneshot(&mut self, track: TrackId, volume: f32) {
            if let Some(el) = self.tracks.get(&track) {
                el.set_current_time(0.0);
                el.set_volume(volume as f64);
                let _ = el.play();
            }
        }
    }

    /// HUD and overlays in the page DOM
    struct DomUi {
        document: Document,
    }

    impl DomUi {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }
    }

    impl UiSink for DomUi {
        fn score_changed(&mut self, score: u64) {
            self.set_text("score", &score.to_string());
        }

        fn upgrade_available(&mut self, available: bool) {
            let Ok(buttons) = self.document.query_selector_all(".upgradeButton") else {
                return;
            };
            for i in 0..buttons.length() {
                let Some(node) = buttons.item(i) else { continue };
                if let Ok(el) = node.dyn_into::<HtmlElement>() {
                    let display = if available { "block" } else { "none" };
                    let _ = el.style().set_property("display", display);
                }
            }
        }

        fn game_over(&mut self, score: u64, destroyed: u32, elapsed_secs: f64) {
            self.set_text("final-score", &score.to_string());
            self.set_text("final-destroyed", &destroyed.to_string());
            self.set_text("final-time", &format!("{:.2}", elapsed_secs));
            self.set_visible("game-over", true);
        }
    }

    /// Game plus the host-side input and frame bookkeeping
    struct WebHost {
        game: Game<CanvasSurface, WebAudio, DomUi>,
        keys: HashSet<String>,
        frame_requested: bool,
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn load_tuning() -> Tuning {
        let json = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item("sky_strike_tuning").ok())
            .flatten();
        match json {
            Some(json) => Tuning::from_json_or_default(&json),
            None => Tuning::default(),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sky Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Game::new(
            seed,
            load_tuning(),
            settings,
            CanvasSurface::new(ctx),
            WebAudio::new(),
            DomUi {
                document: document.clone(),
            },
        );
        let host = Rc::new(RefCell::new(WebHost {
            game,
            keys: HashSet::new(),
            frame_requested: false,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(host.clone());
        setup_buttons(&document, host.clone());
        setup_auto_pause(host);

        log::info!("Sky Strike ready");
    }

    fn setup_keyboard(host: Rc<RefCell<WebHost>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key().to_lowercase();
                let resume = {
                    let mut h = host.borrow_mut();
                    if h.game.claims_key(&key) {
                        event.prevent_default();
                    }
                    h.keys.insert(key.clone());
                    h.game.key_down(&key, event.repeat(), now_ms())
                };
                if resume {
                    schedule(host.clone());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                host.borrow_mut().keys.remove(&event.key().to_lowercase());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut action: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| action());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, host: Rc<RefCell<WebHost>>) {
        {
            let host = host.clone();
            let doc = document.clone();
            on_click(document, "startButton", move || {
                if let Some(el) = doc.get_element_by_id("startButton") {
                    let _ = el.set_attribute("class", "hidden");
                }
                if host.borrow_mut().game.start(now_ms()) {
                    schedule(host.clone());
                }
            });
        }

        {
            let host = host.clone();
            let doc = document.clone();
            on_click(document, "restartButton", move || {
                if let Some(el) = doc.get_element_by_id("game-over") {
                    let _ = el.set_attribute("class", "hidden");
                }
                if host.borrow_mut().game.restart(now_ms()) {
                    schedule(host.clone());
                }
            });
        }

        let upgrades = [
            ("upgradeSpeedButton", UpgradeKind::Speed),
            ("upgradeBulletSpeedButton", UpgradeKind::BulletSpeed),
            ("upgradeBulletCountButton", UpgradeKind::BulletCount),
        ];
        for (id, kind) in upgrades {
            let host = host.clone();
            on_click(document, id, move || {
                host.borrow_mut().game.apply_upgrade(kind);
            });
        }
    }

    fn setup_auto_pause(host: Rc<RefCell<WebHost>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut h = host.borrow_mut();
            h.keys.clear();
            if h.game.settings.pause_on_blur && h.game.phase() == GamePhase::Running {
                h.game.toggle_pause();
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Request one animation frame unless one is already pending
    fn schedule(host: Rc<RefCell<WebHost>>) {
        {
            let mut h = host.borrow_mut();
            if h.frame_requested {
                return;
            }
            h.frame_requested = true;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<WebHost>>, time: f64) {
        let again = {
            let h = &mut *host.borrow_mut();
            h.frame_requested = false;
            h.game.frame(time, &h.keys)
        };
        if again {
            schedule(host);
        }
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

/// Headless run: an autopilot plays one session and the tally is printed
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use serde::Serialize;

    use sky_strike::consts::{FIELD_WIDTH, FRAME_MS};
    use sky_strike::platform::{Null, UiSink};
    use sky_strike::sim::{Body, GamePhase, GameState, UpgradeKind};
    use sky_strike::{Game, Settings, Tuning};

    /// Command-line options
    #[derive(Debug)]
    pub struct Options {
        pub tuning: Option<PathBuf>,
        pub settings: Option<PathBuf>,
        pub frames: u64,
        pub seed: u64,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                tuning: None,
                settings: None,
                frames: 60 * 60 * 5,
                seed: 0x5eed,
            }
        }
    }

    impl Options {
        pub fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
            let mut opts = Self::default();
            let mut args = args.skip(1);
            while let Some(arg) = args.next() {
                let mut value = || args.next().ok_or(format!("{arg} needs a value"));
                match arg.as_str() {
                    "--tuning" => opts.tuning = Some(PathBuf::from(value()?)),
                    "--settings" => opts.settings = Some(PathBuf::from(value()?)),
                    "--frames" => {
                        opts.frames = value()?.parse().map_err(|e| format!("--frames: {e}"))?
                    }
                    "--seed" => opts.seed = value()?.parse().map_err(|e| format!("--seed: {e}"))?,
                    other => return Err(format!("unknown argument {other}")),
                }
            }
            Ok(opts)
        }
    }

    /// Logs UI notifications instead of drawing them
    #[derive(Default)]
    struct LogUi {
        upgrade_ready: bool,
    }

    impl UiSink for LogUi {
        fn score_changed(&mut self, score: u64) {
            log::debug!("Score: {}", score);
        }

        fn upgrade_available(&mut self, available: bool) {
            self.upgrade_ready = available;
            log::info!("Upgrade available: {}", available);
        }

        fn game_over(&mut self, score: u64, destroyed: u32, elapsed_secs: f64) {
            log::info!(
                "Game over - score {}, destroyed {}, {:.2}s",
                score,
                destroyed,
                elapsed_secs
            );
        }
    }

    #[derive(Debug, Serialize)]
    struct Summary {
        seed: u64,
        frames: u64,
        phase: GamePhase,
        score: u64,
        destroyed: u32,
        upgrade_points: u32,
        player_speed: f32,
        bullet_speed: f32,
        bullet_count: u32,
        enemy_speed: f32,
        spawn_interval_ms: f64,
    }

    /// Steer under the lowest enemy and keep firing
    fn autopilot_steer(state: &GameState) -> &'static [&'static str] {
        let player_x = state.player.center().x;
        let target = state
            .enemies
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.center().x)
            .unwrap_or(FIELD_WIDTH / 2.0);
        let dx = target - player_x;
        if dx < -state.player.speed {
            &["a"]
        } else if dx > state.player.speed {
            &["d"]
        } else {
            &[]
        }
    }

    pub fn run(opts: Options) {
        let tuning = match &opts.tuning {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(json) => Tuning::from_json_or_default(&json),
                Err(err) => {
                    log::warn!("Could not read {}: {err}", path.display());
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        };
        let settings = opts
            .settings
            .as_deref()
            .map(Settings::load_from)
            .unwrap_or_default();

        let mut game = Game::new(opts.seed, tuning, settings, Null, Null, LogUi::default());
        let upgrades = [
            UpgradeKind::BulletCount,
            UpgradeKind::Speed,
            UpgradeKind::BulletSpeed,
        ];
        let mut next_upgrade = 0;

        let mut now = 0.0;
        game.start(now);
        let mut frames = 0;
        while frames < opts.frames {
            if game.ui().upgrade_ready && game.apply_upgrade(upgrades[next_upgrade]) {
                next_upgrade = (next_upgrade + 1) % upgrades.len();
            }
            game.fire(now);
            let keys = autopilot_steer(&game.state);
            frames += 1;
            if !game.frame(now, keys) {
                break;
            }
            now += FRAME_MS;
        }

        let state = &game.state;
        let summary = Summary {
            seed: opts.seed,
            frames,
            phase: state.phase,
            score: state.score,
            destroyed: state.destroyed,
            upgrade_points: state.upgrade_points,
            player_speed: state.player.speed,
            bullet_speed: state.player.bullet_speed,
            bullet_count: state.player.bullet_count,
            enemy_speed: state.enemy_speed,
            spawn_interval_ms: state.spawn_interval_ms,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Could not encode summary: {err}"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Strike (native, headless) starting...");

    match headless::Options::parse(std::env::args()) {
        Ok(opts) => headless::run(opts),
        Err(err) => {
            eprintln!("{err}");
            eprintln!(
                "usage: sky-strike [--tuning FILE] [--settings FILE] [--frames N] [--seed N]"
            );
            std::process::exit(2);
        }
    }
}
