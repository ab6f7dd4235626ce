use std::cell::RefCell;
use std::rc::Rc;

use pitch_core::assets::Icon;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlImageElement;

use crate::state::State;
use crate::utils::asset_url;
use crate::draw;

/// Starts loading every board icon. A failed source moves on to the next
/// candidate; each outcome triggers a redraw.
pub fn load_icons(state: &Rc<RefCell<State>>) {
    for icon in Icon::ALL {
        let Ok(img) = HtmlImageElement::new() else {
            log::warn!("cannot create image element for {icon:?}");
            continue;
        };
        let Some(first) = state.borrow().icons.slot(icon).current_source() else {
            continue;
        };

        let st = state.clone();
        let onload = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.icons.slot_mut(icon).mark_ready();
            draw(&mut s);
        }));

        let st = state.clone();
        let img_for_error = img.clone();
        let onerror = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            match s.icons.slot_mut(icon).mark_failed() {
                Some(next) => {
                    log::info!("{icon:?} icon failed, trying {next}");
                    img_for_error.set_src(&asset_url(next));
                }
                None => {
                    log::warn!("no usable image for {icon:?}; drawing a shape instead");
                    draw(&mut s);
                }
            }
        }));

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
        img.set_src(&asset_url(first));
        state.borrow_mut().images.insert(icon, img);
    }
}
