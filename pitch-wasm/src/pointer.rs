use std::cell::RefCell;
use std::rc::Rc;

use pitch_core::{PointerEvent, PointerPhase};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::MouseEvent;

use crate::panels::rename_player;
use crate::state::State;
use crate::utils::{element_rect, event_points};
use crate::apply_effects;

fn route(s: &mut State, phase: PointerPhase, e: &MouseEvent) {
    if phase != PointerPhase::Press && s.router.is_idle() {
        return;
    }
    let (pos, client) = event_points(e, &s.canvas);
    // the bench may have scrolled or collapsed since the last gesture
    s.router.bench_region = element_rect(&s.document, "bench");
    let State {
        router,
        scene,
        cfg,
        ..
    } = &mut *s;
    let fx = router.handle(scene, PointerEvent::new(phase, pos, client), cfg);
    if !router.is_idle() || !fx.is_empty() {
        e.prevent_default();
    }
    apply_effects(s, &fx);
}

/// Canvas press, document-wide move/up/cancel so drags from the bench and
/// drags leaving the canvas keep tracking.
pub fn attach_pointer(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let (canvas, document) = {
        let s = state.borrow();
        (s.canvas.clone(), s.document.clone())
    };

    let st = state.clone();
    let down = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
        e.prevent_default();
        route(&mut st.borrow_mut(), PointerPhase::Press, &e);
    }));
    canvas.add_event_listener_with_callback("pointerdown", down.as_ref().unchecked_ref())?;
    down.forget();

    for (name, phase) in [
        ("pointermove", PointerPhase::Move),
        ("pointerup", PointerPhase::Release),
        ("pointercancel", PointerPhase::Cancel),
    ] {
        let st = state.clone();
        let cb = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            route(&mut st.borrow_mut(), phase, &e);
        }));
        document.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    let st = state.clone();
    let dblclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
        let mut s = st.borrow_mut();
        let (pos, _) = event_points(&e, &s.canvas);
        if let Some(id) = s.scene.player_at(pos, &s.cfg) {
            rename_player(&mut s, id);
        }
    }));
    canvas.add_event_listener_with_callback("dblclick", dblclick.as_ref().unchecked_ref())?;
    dblclick.forget();
    Ok(())
}
