//! DOM side of the side panels: bench chips, formation picker, countdown,
//! theme switch, notes and the drawing toolbar.

use std::cell::RefCell;
use std::rc::Rc;

use pitch_core::formation::SaveOutcome;
use pitch_core::input::Tool;
use pitch_core::panels::{Panel, Theme, bench_chips, draw_mode_label, formation_options};
use pitch_core::timer::{Countdown, EXPIRY_MESSAGE, Tick, parse_minutes};
use pitch_core::Team;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use crate::draw;
use crate::state::State;
use crate::storage::{WindowConfirm, prompt};
use crate::utils::by_id;

const TOOLS: [Tool; 3] = [Tool::Freehand, Tool::Arrow, Tool::Cone];

fn on_click(doc: &Document, id: &str, f: impl FnMut() + 'static) -> Result<(), JsValue> {
    if let Some(el) = by_id::<HtmlElement>(doc, id) {
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(f));
        el.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}

fn input_value(doc: &Document, id: &str) -> String {
    by_id::<HtmlInputElement>(doc, id)
        .map(|i| i.value())
        .unwrap_or_default()
}

// ---------------------------------------------------------------- bench

pub fn render_bench(state: &State) {
    let doc = &state.document;
    let Some(list) = doc.get_element_by_id("bench-players") else {
        return;
    };
    list.set_inner_html("");
    for chip in bench_chips(&state.scene) {
        if let Err(e) = append_chip(doc, &list, &chip.class_name(), chip.id, &chip.name) {
            log::warn!("cannot render bench chip {}: {e:?}", chip.id);
        }
    }
}

fn append_chip(doc: &Document, list: &Element, class: &str, id: u64, name: &str) -> Result<(), JsValue> {
    let el = doc.create_element("div")?;
    el.set_class_name(class);
    el.set_attribute("data-player-id", &id.to_string())?;
    let label = doc.create_element("span")?;
    label.set_class_name("player-name");
    label.set_text_content(Some(name));
    let remove = doc.create_element("button")?;
    remove.set_class_name("remove-btn");
    remove.set_attribute("aria-label", &format!("Remove {name}"))?;
    remove.set_text_content(Some("\u{00d7}"));
    el.append_child(&label)?;
    el.append_child(&remove)?;
    list.append_child(&el)?;
    Ok(())
}

/// Chip under an event target and whether the hit was on `selector`.
fn chip_target(e: &Event, selector: &str) -> Option<(u64, bool)> {
    let target = e.target()?.dyn_into::<Element>().ok()?;
    let chip = target.closest(".player-chip").ok()??;
    let id = chip.get_attribute("data-player-id")?.parse().ok()?;
    let on_part = target.closest(selector).ok().flatten().is_some();
    Some((id, on_part))
}

/// Prompts for a new name; blank or cancelled input changes nothing.
pub fn rename_player(s: &mut State, id: u64) {
    let Some(current) = s.scene.player(id).map(|p| p.name.clone()) else {
        return;
    };
    let Some(name) = prompt(&s.window, "Enter new name", &current) else {
        return;
    };
    if s.scene.rename_player(id, &name) {
        let State { store, scene, .. } = &mut *s;
        store.save_players(&scene.players);
        render_bench(s);
        draw(s);
    }
}

/// One set of listeners on the bench list handles every chip, so chips can
/// be re-rendered freely.
fn attach_bench(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let Some(list) = doc.get_element_by_id("bench-players") else {
        return Ok(());
    };

    let st = state.clone();
    let pointerdown = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let Some((id, on_remove)) = chip_target(&e, ".remove-btn") else {
            return;
        };
        if on_remove {
            return;
        }
        e.prevent_default();
        let mut s = st.borrow_mut();
        let State { router, scene, .. } = &mut *s;
        router.begin_bench_drag(scene, id);
    }));
    list.add_event_listener_with_callback("pointerdown", pointerdown.as_ref().unchecked_ref())?;
    pointerdown.forget();

    let st = state.clone();
    let click = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let Some((id, true)) = chip_target(&e, ".remove-btn") else {
            return;
        };
        e.stop_propagation();
        let mut s = st.borrow_mut();
        if s.scene.remove_player(id) {
            let State { store, scene, .. } = &mut *s;
            store.save_players(&scene.players);
            render_bench(&s);
            draw(&mut s);
        }
    }));
    list.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
    click.forget();

    let st = state.clone();
    let dblclick = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let Some((id, true)) = chip_target(&e, ".player-name") else {
            return;
        };
        e.stop_propagation();
        e.prevent_default();
        rename_player(&mut st.borrow_mut(), id);
    }));
    list.add_event_listener_with_callback("dblclick", dblclick.as_ref().unchecked_ref())?;
    dblclick.forget();
    Ok(())
}

fn attach_add_player(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let st = state.clone();
    on_click(&doc, "add-player", move || {
        let mut s = st.borrow_mut();
        let name = input_value(&s.document, "player-name");
        let opponent = by_id::<HtmlInputElement>(&s.document, "is-opponent")
            .map(|c| c.checked())
            .unwrap_or(false);
        let team = if opponent { Team::Opponent } else { Team::Home };
        let id = js_sys::Date::now() as u64;
        if s.scene.add_player(id, &name, team).is_none() {
            return;
        }
        if let Some(input) = by_id::<HtmlInputElement>(&s.document, "player-name") {
            input.set_value("");
        }
        let State { store, scene, .. } = &mut *s;
        store.save_players(&scene.players);
        render_bench(&s);
        draw(&mut s);
    })
}

// ---------------------------------------------------------- formations

/// Rebuilds the picker, keeping `selected` when it still exists.
pub fn populate_formation_select(state: &State, selected: Option<&str>) {
    let Some(select) = by_id::<HtmlSelectElement>(&state.document, "formation-select") else {
        return;
    };
    select.set_inner_html("");
    for opt in formation_options(&state.formations, selected) {
        let Ok(el) = state.document.create_element("option") else {
            continue;
        };
        let _ = el.set_attribute("value", &opt.value);
        el.set_text_content(Some(&opt.value));
        let _ = select.append_child(&el);
        if opt.selected {
            select.set_value(&opt.value);
        }
    }
}

fn persist_formations(s: &mut State) {
    let State {
        store, formations, ..
    } = s;
    store.save_formations(formations);
}

fn selected_formation(doc: &Document) -> Option<String> {
    by_id::<HtmlSelectElement>(doc, "formation-select")
        .map(|s| s.value())
        .filter(|v| !v.is_empty())
}

fn attach_formations(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    let st = state.clone();
    on_click(&doc, "save-formation", move || {
        let mut s = st.borrow_mut();
        let name = input_value(&s.document, "formation-name");
        let State {
            window,
            formations,
            scene,
            ..
        } = &mut *s;
        if formations.save(&name, scene, &mut WindowConfirm(window)) == SaveOutcome::Skipped {
            return;
        }
        persist_formations(&mut s);
        populate_formation_select(&s, Some(name.trim()));
    })?;

    if let Some(select) = by_id::<HtmlSelectElement>(&doc, "formation-select") {
        let st = state.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            let Some(name) = selected_formation(&s.document) else {
                return;
            };
            let State {
                formations, scene, ..
            } = &mut *s;
            // positions are not persisted until the next drop
            if formations.apply(&name, scene) {
                render_bench(&s);
                draw(&mut s);
            }
        }));
        select.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }

    let st = state.clone();
    on_click(&doc, "rename-formation", move || {
        let mut s = st.borrow_mut();
        let Some(current) = selected_formation(&s.document) else {
            return;
        };
        if !s.formations.contains(&current) {
            return;
        }
        let Some(to) = prompt(&s.window, "Rename formation", &current) else {
            return;
        };
        let State {
            window, formations, ..
        } = &mut *s;
        if formations.rename(&current, &to, &mut WindowConfirm(window)) {
            persist_formations(&mut s);
            populate_formation_select(&s, Some(to.trim()));
        }
    })?;

    let st = state.clone();
    on_click(&doc, "delete-formation", move || {
        let mut s = st.borrow_mut();
        let Some(current) = selected_formation(&s.document) else {
            return;
        };
        let State {
            window, formations, ..
        } = &mut *s;
        if formations.delete(&current, &mut WindowConfirm(window)) {
            persist_formations(&mut s);
            populate_formation_select(&s, None);
        }
    })
}

// --------------------------------------------------------------- timer

fn show_countdown(doc: &Document, c: &Countdown) {
    if let Some(el) = doc.get_element_by_id("timer-display") {
        el.set_text_content(Some(&c.display()));
    }
}

fn clear_timer(s: &mut State) {
    if let Some(handle) = s.timer_handle.take() {
        s.window.clear_interval_with_handle(handle);
    }
}

fn attach_timer(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    let st = state.clone();
    let tick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let expired = {
            let mut s = st.borrow_mut();
            let t = s.countdown.tick();
            show_countdown(&s.document, &s.countdown);
            match t {
                Tick::Running => false,
                Tick::Expired => {
                    clear_timer(&mut s);
                    true
                }
                Tick::Idle => {
                    clear_timer(&mut s);
                    false
                }
            }
        };
        if expired {
            let window = st.borrow().window.clone();
            let _ = window.alert_with_message(EXPIRY_MESSAGE);
        }
    }));
    let tick_fn: js_sys::Function = tick.as_ref().unchecked_ref::<js_sys::Function>().clone();
    tick.forget();

    let st = state.clone();
    on_click(&doc, "start-timer", move || {
        let mut s = st.borrow_mut();
        let Some(minutes) = parse_minutes(&input_value(&s.document, "timer-duration")) else {
            log::info!("ignoring timer start without a positive duration");
            return;
        };
        if !s.countdown.start(minutes) {
            return;
        }
        show_countdown(&s.document, &s.countdown);
        match s
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(&tick_fn, 1000)
        {
            Ok(handle) => s.timer_handle = Some(handle),
            Err(e) => {
                log::warn!("cannot schedule countdown: {e:?}");
                s.countdown.stop();
            }
        }
    })?;

    let st = state.clone();
    on_click(&doc, "stop-timer", move || {
        let mut s = st.borrow_mut();
        s.countdown.stop();
        clear_timer(&mut s);
    })?;

    let st = state.clone();
    on_click(&doc, "reset-timer", move || {
        let mut s = st.borrow_mut();
        clear_timer(&mut s);
        let minutes = parse_minutes(&input_value(&s.document, "timer-duration")).unwrap_or(0);
        s.countdown.reset(minutes);
        show_countdown(&s.document, &s.countdown);
    })
}

// ------------------------------------------------------ theme and notes

pub fn apply_theme(state: &State) {
    if let Some(body) = state.document.body() {
        let classes = body.class_list();
        for theme in [Theme::Light, Theme::Dark] {
            if let Some(class) = theme.body_class() {
                let _ = classes.toggle_with_force(class, theme == state.theme);
            }
        }
    }
    if let Some(cb) = by_id::<HtmlInputElement>(&state.document, "checkbox") {
        cb.set_checked(state.theme.is_dark());
    }
}

pub fn show_notes(state: &State) {
    if let Some(area) = by_id::<HtmlTextAreaElement>(&state.document, "notes") {
        area.set_value(&state.store.load_notes().unwrap_or_default());
    }
}

fn attach_theme_and_notes(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    if let Some(cb) = by_id::<HtmlInputElement>(&doc, "checkbox") {
        let st = state.clone();
        let cb2 = cb.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.theme = Theme::from_checked(cb2.checked());
            let theme = s.theme;
            s.store.save_theme(theme);
            apply_theme(&s);
        }));
        cb.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }
    if let Some(area) = by_id::<HtmlTextAreaElement>(&doc, "notes") {
        let st = state.clone();
        let area2 = area.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            st.borrow_mut().store.save_notes(&area2.value());
        }));
        area.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }
    Ok(())
}

// ------------------------------------------------------- toolbar

fn attach_panel_toggles(doc: &Document) -> Result<(), JsValue> {
    for panel in [Panel::Controls, Panel::Bench] {
        let Some(toggle) = by_id::<HtmlElement>(doc, panel.toggle_id()) else {
            continue;
        };
        toggle.set_text_content(Some(panel.label()));
        toggle.set_attribute(
            "aria-label",
            &format!("Toggle {}", panel.label().to_lowercase()),
        )?;
        let doc2 = doc.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Some(container) = doc2.get_element_by_id(panel.element_id()) {
                let _ = container.class_list().toggle("hidden");
            }
        }));
        toggle.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}

/// Marks the active tool button.
pub fn show_tool(doc: &Document, tool: Tool) {
    for t in TOOLS {
        let Some(btn) = doc.get_element_by_id(&format!("tool-{}", t.as_str())) else {
            continue;
        };
        let active = t == tool;
        let _ = btn.class_list().toggle_with_force("active", active);
        let _ = btn.set_attribute("aria-pressed", if active { "true" } else { "false" });
    }
}

pub fn show_draw_mode(doc: &Document, on: bool) {
    if let Some(btn) = doc.get_element_by_id("toggle-draw-mode") {
        btn.set_text_content(Some(&draw_mode_label(on)));
    }
}

fn attach_drawing_tools(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    let st = state.clone();
    on_click(&doc, "toggle-draw-mode", move || {
        let mut s = st.borrow_mut();
        let on = s.router.toggle_draw_mode();
        show_draw_mode(&s.document, on);
    })?;

    let st = state.clone();
    on_click(&doc, "clear-drawing", move || {
        let mut s = st.borrow_mut();
        s.scene.clear_drawing();
        draw(&mut s);
    })?;

    for tool in TOOLS {
        let st = state.clone();
        on_click(&doc, &format!("tool-{}", tool.as_str()), move || {
            let mut s = st.borrow_mut();
            s.router.set_tool(tool);
            show_tool(&s.document, tool);
        })?;
    }
    Ok(())
}

pub fn attach_panels(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    attach_bench(state)?;
    attach_add_player(state)?;
    attach_formations(state)?;
    attach_timer(state)?;
    attach_theme_and_notes(state)?;
    attach_panel_toggles(&state.borrow().document)?;
    attach_drawing_tools(state)
}
