use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pitch_core::assets::{Icon, IconSet};
use pitch_core::panels::Theme;
use pitch_core::render::FieldCache;
use pitch_core::timer::Countdown;
use pitch_core::{Config, Formations, Persistence, Router, Scene};
use playbook_core::Fonts;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, Window};

use crate::storage::LocalStore;

/// Board runtime shared by every DOM callback.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    /// Offscreen copy of the static markings, same backing size as `canvas`.
    pub field_canvas: HtmlCanvasElement,
    pub field_ctx: CanvasRenderingContext2d,
    pub field_cache: FieldCache,
    pub dpr: f64,
    pub cfg: Config,
    pub scene: Scene,
    pub router: Router,
    pub formations: Formations,
    pub store: Persistence<LocalStore>,
    pub icons: IconSet,
    pub images: HashMap<Icon, HtmlImageElement>,
    pub countdown: Countdown,
    /// `setInterval` handle while the countdown runs.
    pub timer_handle: Option<i32>,
    pub theme: Theme,
    /// Faces used by the PNG export, when a font asset could be fetched.
    pub export_fonts: Option<Fonts>,
}

thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}

/// The installed state, if `start` got that far.
pub fn shared() -> Option<Rc<RefCell<State>>> {
    STATE.with(|st| st.borrow().clone())
}
