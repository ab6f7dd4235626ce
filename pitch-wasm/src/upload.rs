use std::cell::RefCell;
use std::rc::Rc;

use pitch_core::persistence::Backup;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, FileReader, HtmlInputElement};

use crate::reload_from_store;
use crate::state::State;
use crate::utils::by_id;

// Wires up the file input that restores a downloaded backup.
pub fn attach_backup_input(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let Some(input) = by_id::<HtmlInputElement>(&doc, "import-backup") else {
        return Ok(());
    };
    let st = state.clone();
    let input_for_closure = input.clone();
    let onchange = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        let Some(file) = input_for_closure.files().and_then(|f| f.item(0)) else {
            log::info!("no backup file selected");
            return;
        };
        let reader = match FileReader::new() {
            Ok(r) => r,
            Err(e) => {
                log::error!("cannot create FileReader: {e:?}");
                return;
            }
        };
        let st2 = st.clone();
        let reader_for_closure = reader.clone();
        let input_to_reset = input_for_closure.clone();
        let onload = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_ev: Event| {
            let text = reader_for_closure
                .result()
                .ok()
                .and_then(|r| r.as_string())
                .unwrap_or_default();
            // allow re-importing the same file
            input_to_reset.set_value("");
            match Backup::from_json(&text) {
                Ok(backup) => {
                    let mut s = st2.borrow_mut();
                    s.store.import_backup(&backup);
                    reload_from_store(&mut s);
                    log::info!("backup imported");
                }
                Err(e) => {
                    log::warn!("rejected backup: {e}");
                    let _ = st2
                        .borrow()
                        .window
                        .alert_with_message("Could not read that backup file.");
                }
            }
        }));
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        if let Err(e) = reader.read_as_text(&file) {
            log::error!("failed to read file: {e:?}");
        }
        onload.forget();
    }));
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    Ok(())
}
