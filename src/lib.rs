mod engine;
pub mod game;

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, Request, RequestInit, RequestMode, Response, WebGlRenderingContext};

use crate::engine::renderer::Renderer;
use crate::game::config::GameConfig;
use crate::game::scene::Scene;
use crate::game::sim::SteeringIntent;
use crate::game::snapshot::{Phase, Snapshot};
use crate::game::Game;

pub use crate::game::config::ConfigError;

const CONFIG_URL: &str = "/assets/config.json";

/// Session plus the scene that draws it. Shared between the DOM callbacks
/// and the handle returned to JS; nothing here is global.
struct App {
    game: Game,
    scene: Scene,
}

type SharedApp = Rc<RefCell<App>>;

/// What the page gets back from `init_game`: commands for on-screen buttons
/// and touch controls, plus read access to the current snapshot.
#[wasm_bindgen]
pub struct GameHandle {
    app: SharedApp,
}

#[wasm_bindgen]
impl GameHandle {
    pub fn start(&self) {
        self.app.borrow_mut().game.start();
    }

    pub fn restart(&self) {
        self.app.borrow_mut().game.restart();
    }

    /// Negative steers left, positive right, zero releases.
    pub fn steer(&self, axis: i32) {
        self.app.borrow_mut().game.steer(SteeringIntent::from_axis(axis));
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.app.borrow().game.snapshot();
        serde_wasm_bindgen::to_value(&snapshot).map_err(JsValue::from)
    }
}

#[wasm_bindgen]
pub async fn init_game() -> Result<GameHandle, JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document.get_element_by_id("gameCanvas")
        .ok_or("No canvas")?
        .dyn_into::<HtmlCanvasElement>()?;

    let gl = canvas
        .get_context("webgl")?
        .ok_or("No WebGL")?
        .dyn_into::<WebGlRenderingContext>()?;

    let renderer = Renderer::new(gl)?;
    let config = load_config(&window).await;

    let app = Rc::new(RefCell::new(App {
        game: Game::new(config.clone()),
        scene: Scene::new(renderer, config),
    }));

    bind_keys(&window, &app, "keydown", true)?;
    bind_keys(&window, &app, "keyup", false)?;
    bind_button(&document, &app, "startBtn", |game| game.start())?;
    bind_button(&document, &app, "restartBtn", |game| game.restart())?;

    start_loop(app.clone(), document)?;
    info!("highway rush ready");

    Ok(GameHandle { app })
}

async fn load_config(window: &web_sys::Window) -> GameConfig {
    match fetch_config(window).await {
        Ok(Some(config)) => match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("{} rejected ({}), using defaults", CONFIG_URL, e);
                GameConfig::default()
            }
        },
        Ok(None) => GameConfig::default(),
        Err(e) => {
            warn!("could not load {}: {:?}", CONFIG_URL, e);
            GameConfig::default()
        }
    }
}

async fn fetch_config(window: &web_sys::Window) -> Result<Option<GameConfig>, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(CONFIG_URL, &opts)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request)).await?.dyn_into()?;
    if !resp.ok() {
        return Ok(None);
    }
    let json = JsFuture::from(resp.json()?).await?;
    let config = serde_wasm_bindgen::from_value(json)?;
    Ok(Some(config))
}

fn bind_keys(window: &web_sys::Window, app: &SharedApp, event_type: &str, pressed: bool) -> Result<(), JsValue> {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if app.borrow_mut().game.handle_key(&event.code(), pressed) {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);

    window.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn bind_button(document: &Document, app: &SharedApp, id: &str, action: fn(&mut Game)) -> Result<(), JsValue> {
    let Some(button) = document.get_element_by_id(id) else {
        return Ok(());
    };
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move || {
        action(&mut app.borrow_mut().game);
    }) as Box<dyn FnMut()>);

    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// One animation frame: run the due ticks to completion, then draw and update
/// the HUD from a single snapshot taken afterwards.
fn start_loop(app: SharedApp, document: Document) -> Result<(), JsValue> {
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
        let snapshot = {
            let mut app = app.borrow_mut();
            app.game.frame(now_ms);
            let snapshot = app.game.snapshot();
            app.scene.render(&snapshot);
            snapshot
        };
        update_ui(&document, &snapshot);

        if let Some(callback) = f.borrow().as_ref() {
            if let Err(e) = request_animation_frame(callback) {
                warn!("animation loop stopped: {:?}", e);
            }
        }
    }) as Box<dyn FnMut(f64)>));

    let scheduled = match g.borrow().as_ref() {
        Some(callback) => request_animation_frame(callback),
        None => Err(JsValue::from_str("animation callback missing")),
    };
    scheduled.map(|_| ())
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or("No window")?
        .request_animation_frame(f.as_ref().unchecked_ref())
}

fn set_visible(document: &Document, id: &str, visible: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let style = if visible { "display: block;" } else { "display: none;" };
        el.set_attribute("style", style).ok();
    }
}

fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn update_ui(document: &Document, snapshot: &Snapshot) {
    set_text(document, "score", &format!("Score: {}", snapshot.score));
    set_text(document, "distance", &format!("Distance: {}m", snapshot.distance));
    set_text(document, "speed", &format!("Speed: {} km/h", snapshot.speed));
    set_text(document, "level", &format!("Level {}", snapshot.level));

    set_visible(document, "startScreen", snapshot.phase == Phase::Idle);
    set_visible(document, "instructions", snapshot.phase == Phase::Playing);
    set_visible(document, "gameOver", snapshot.phase == Phase::Ended);
    if snapshot.phase == Phase::Ended {
        set_text(document, "finalScore", &snapshot.score.to_string());
        set_text(document, "finalDistance", &snapshot.distance.to_string());
    }
}
