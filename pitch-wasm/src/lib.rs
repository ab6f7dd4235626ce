//! Browser shell of the sideline board: owns the canvas and the DOM, feeds
//! pointer events to the core router and persists to `localStorage`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pitch_core::assets::IconSet;
use pitch_core::render::{FieldCache, compose_frame, render_field};
use pitch_core::timer::Countdown;
use pitch_core::{Effect, Persistence, Router, Scene};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, Window};

mod canvas;
mod export;
mod icons;
pub mod offline;
mod panels;
mod pointer;
mod state;
mod storage;
mod upload;
mod utils;

use canvas::CanvasPainter;
use state::{STATE, State};
use storage::LocalStore;
use utils::{asset_url, config_from_window, flag_enabled, get_query_param, sync_canvas_size};

/// Optional font for the PNG export; missing is fine.
pub(crate) const EXPORT_FONT: &str = "fonts/board-sans.ttf";

/// Paints one frame. The field buffer is re-rendered only when the canvas
/// size or pixel ratio changed.
pub(crate) fn draw(state: &mut State) {
    let (w, h) = (state.scene.width, state.scene.height);
    if state.field_cache.needs_render(w, h, state.dpr) {
        let mut field = CanvasPainter::new(&state.field_ctx);
        render_field(&mut field, w, h, &state.cfg);
    }
    let mut painter = CanvasPainter::new(&state.ctx)
        .with_icons(&state.icons, &state.images)
        .with_field(&state.field_canvas);
    compose_frame(&mut painter, &state.scene, &state.cfg);
}

/// Carries out what the router asked for, redrawing at most once.
pub(crate) fn apply_effects(state: &mut State, effects: &[Effect]) {
    let mut redraw = false;
    for fx in effects {
        match fx {
            Effect::SavePlayers => state.store.save_players(&state.scene.players),
            Effect::SaveBall => state.store.save_ball(state.scene.ball),
            Effect::RenderBench => panels::render_bench(state),
            Effect::Redraw => redraw = true,
        }
    }
    if redraw {
        draw(state);
    }
}

fn resize(state: &mut State) {
    let (w, h) = sync_canvas_size(state);
    state.scene.resize(w, h);
    // the backing store was cleared by the resize
    state.field_cache.invalidate();
    draw(state);
}

/// Rebuilds everything shown from what is in storage, e.g. after a backup
/// import.
pub(crate) fn reload_from_store(state: &mut State) {
    let (w, h) = (state.scene.width, state.scene.height);
    state.scene = state.store.restore_scene(w, h);
    state.formations = state.store.load_formations().unwrap_or_default();
    state.theme = state.store.load_theme().unwrap_or_default();
    panels::apply_theme(state);
    panels::show_notes(state);
    panels::render_bench(state);
    panels::populate_formation_select(state, None);
    draw(state);
}

fn init_canvas(document: &Document) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id("soccer-field")
        .ok_or_else(|| JsValue::from_str("canvas #soccer-field not found"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = context_2d(&cv)?;
    Ok((cv, ctx))
}

fn context_2d(cv: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    Ok(cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?)
}

/// Container size changes (mobile address bar, collapsed panels) do not
/// fire `resize` on the window.
fn observe_resize(window: &Window, target: &Element, callback: &js_sys::Function) -> Result<(), JsValue> {
    let ctor = js_sys::Reflect::get(window, &JsValue::from_str("ResizeObserver"))?;
    if ctor.is_undefined() {
        return Ok(());
    }
    let ctor: js_sys::Function = ctor.dyn_into()?;
    let observer = js_sys::Reflect::construct(&ctor, &js_sys::Array::of1(callback))?;
    let observe: js_sys::Function =
        js_sys::Reflect::get(&observer, &JsValue::from_str("observe"))?.dyn_into()?;
    observe.call1(&observer, target)?;
    Ok(())
}

fn attach_resize(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let window = state.borrow().window.clone();
    let st = state.clone();
    let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        resize(&mut st.borrow_mut());
    }));
    let onresize_fn: js_sys::Function = onresize.as_ref().unchecked_ref::<js_sys::Function>().clone();
    window.add_event_listener_with_callback("resize", &onresize_fn)?;
    window.add_event_listener_with_callback("load", &onresize_fn)?;
    onresize.forget();

    let parent = state.borrow().canvas.parent_element();
    if let Some(parent) = parent {
        if let Err(e) = observe_resize(&window, &parent, &onresize_fn) {
            log::debug!("ResizeObserver unavailable: {e:?}");
        }
    }

    // mobile browsers report the new size only after the rotation settles
    let win = window.clone();
    let onorientation = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(&onresize_fn, 300);
    }));
    window.add_event_listener_with_callback(
        "orientationchange",
        onorientation.as_ref().unchecked_ref(),
    )?;
    onorientation.forget();
    Ok(())
}

/// Fetches the export font in the background.
fn load_export_font(window: &Window) {
    let win = window.clone();
    wasm_bindgen_futures::spawn_local(async move {
        match utils::fetch_bytes_with_fallbacks(&win, &[asset_url(EXPORT_FONT)]).await {
            Some(bytes) => {
                if let Some(st) = state::shared() {
                    st.borrow_mut().export_fonts = Some(playbook_core::fonts_from_data(bytes));
                    log::info!("export font loaded");
                }
            }
            None => log::info!("no export font at {EXPORT_FONT}; PNG labels disabled"),
        }
    });
}

/// Installs the offline cache worker. Service workers need a secure
/// context; elsewhere the board simply stays online-only.
fn register_worker(window: &Window) {
    let navigator = window.navigator();
    if !js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
        log::info!("service workers unavailable; offline cache disabled");
        return;
    }
    let promise = navigator.service_worker().register(&asset_url("sw.js"));
    wasm_bindgen_futures::spawn_local(async move {
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(_) => log::info!("offline cache worker registered"),
            Err(e) => log::warn!("service worker registration failed: {e:?}"),
        }
    });
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    upload::attach_backup_input(state.clone())?;
    export::attach_export(&state)?;
    panels::attach_panels(&state)?;
    pointer::attach_pointer(&state)?;
    attach_resize(&state)?;
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    // Inside the service worker only the `sw*` exports are used.
    let Some(window) = web_sys::window() else {
        log::debug!("no window; skipping board start-up");
        return Ok(());
    };
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;
    let field_canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    let field_ctx = context_2d(&field_canvas)?;

    let cfg = config_from_window(&window).unwrap_or_default();
    let store = Persistence::new(LocalStore::new(&window));
    let mut router = Router::new();
    if let Ok(search) = window.location().search() {
        router.draw_mode = flag_enabled(get_query_param(&search, "draw").as_deref());
    }

    let mut state = State {
        window,
        document,
        canvas,
        ctx,
        field_canvas,
        field_ctx,
        field_cache: FieldCache::default(),
        dpr: 1.0,
        cfg,
        scene: Scene::new(1.0, 1.0),
        router,
        formations: Default::default(),
        store,
        icons: IconSet::default(),
        images: HashMap::new(),
        countdown: Countdown::new(),
        timer_handle: None,
        theme: Default::default(),
        export_fonts: None,
    };
    let (w, h) = sync_canvas_size(&mut state);
    state.scene.resize(w, h);
    reload_from_store(&mut state);
    panels::show_tool(&state.document, state.router.tool);
    panels::show_draw_mode(&state.document, state.router.draw_mode);
    log::info!(
        "board ready: {} players, {} formations, {}x{} px",
        state.scene.players.len(),
        state.formations.len(),
        w,
        h
    );

    let state = Rc::new(RefCell::new(state));
    STATE.with(|st| st.replace(Some(state.clone())));
    icons::load_icons(&state);
    load_export_font(&state.borrow().window);
    register_worker(&state.borrow().window);
    attach_ui(state.clone())?;
    draw(&mut state.borrow_mut());
    Ok(())
}
