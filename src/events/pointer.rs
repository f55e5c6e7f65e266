use crate::constants::{NOTE_ATTR, NOTE_SELECTOR};
use crate::dom::Listener;
use crate::keys;
use crate::SharedInstrument;
use etudio_core::InputEvent;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Note carried by the key region under the event target, if any.
pub fn note_at_target(ev: &web::Event) -> Option<String> {
    let target = ev.target()?.dyn_into::<web::Element>().ok()?;
    let key = target.closest(NOTE_SELECTOR).ok()??;
    key.get_attribute(NOTE_ATTR)
}

fn dispatch(instrument: &SharedInstrument, document: &web::Document, event: InputEvent<'_>) {
    let press = instrument.borrow_mut().handle_input(event);
    if let Some(press) = press {
        keys::show_press(document, instrument, &press);
    }
}

/// Wire mousedown and touchstart on the key container. Touch listeners are
/// non-passive so they can cancel the browser's scroll/zoom handling.
pub fn wire_pointer(
    container: &web::Element,
    document: &web::Document,
    instrument: &SharedInstrument,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::with_capacity(2);

    let inst = instrument.clone();
    let doc = document.clone();
    listeners.push(Listener::attach(container, "mousedown", move |ev: web::Event| {
        if let Some(mouse) = ev.dyn_ref::<web::MouseEvent>() {
            if mouse.button() != 0 {
                return;
            }
        }
        if let Some(note) = note_at_target(&ev) {
            dispatch(&inst, &doc, InputEvent::PointerDown { note: &note });
        }
    })?);

    let inst = instrument.clone();
    let doc = document.clone();
    listeners.push(Listener::attach_active(container, "touchstart", move |ev: web::Event| {
        if let Some(note) = note_at_target(&ev) {
            ev.prevent_default();
            dispatch(&inst, &doc, InputEvent::TouchStart { note: &note });
        }
    })?);

    Ok(listeners)
}
