use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlElement, Url};

use crate::state::State;
use crate::utils::by_id;

pub const BACKUP_FILE: &str = "soccer-board-backup.json";
pub const PNG_FILE: &str = "formation.png";

fn download(document: &Document, filename: &str, blob: &Blob) -> Result<(), JsValue> {
    let url = Url::create_object_url_with_blob(blob)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", filename)?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}

pub fn save_text_as_file(document: &Document, filename: &str, text: &str) -> Result<(), JsValue> {
    let array = Array::new();
    array.push(&JsValue::from_str(text));
    let opts = BlobPropertyBag::new();
    opts.set_type("application/json");
    let blob = Blob::new_with_str_sequence_and_options(&array, &opts)?;
    download(document, filename, &blob)
}

pub fn save_bytes_as_file(document: &Document, filename: &str, bytes: &[u8], mime: &str) -> Result<(), JsValue> {
    let array = Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));
    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &opts)?;
    download(document, filename, &blob)
}

/// Every stored key as one JSON download.
pub fn export_backup(state: &State) -> Result<(), JsValue> {
    let json = state
        .store
        .export_backup()
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    save_text_as_file(&state.document, BACKUP_FILE, &json)
}

/// Rasterizes the current board through the SVG renderer. Without a
/// fetched font the name labels are left out.
pub fn export_png(state: &State) -> Result<(), JsValue> {
    let svg = playbook_core::build_diagram_svg(&state.scene, &state.cfg);
    let fonts = state
        .export_fonts
        .clone()
        .unwrap_or_else(playbook_core::no_fonts);
    let bytes = playbook_core::svg_to_png(&svg, fonts)
        .map_err(|e| JsValue::from_str(&format!("export: {e}")))?;
    log::info!("exported {} byte PNG", bytes.len());
    save_bytes_as_file(&state.document, PNG_FILE, &bytes, "image/png")
}

pub fn attach_export(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let actions: [(&str, fn(&State) -> Result<(), JsValue>); 2] =
        [("export-backup", export_backup), ("export-png", export_png)];
    for (id, action) in actions {
        let Some(btn) = by_id::<HtmlElement>(&doc, id) else {
            continue;
        };
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Err(e) = action(&st.borrow()) {
                log::error!("{id} failed: {e:?}");
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}
