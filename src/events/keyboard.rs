use crate::dom::Listener;
use crate::keys;
use crate::SharedInstrument;
use etudio_core::{InputEvent, MASTER_VOLUME_STEP};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Volume step for the arrow keys, if `key` is one of them.
#[inline]
pub fn volume_step_for_key(key: &str) -> Option<f32> {
    match key {
        "ArrowUp" => Some(MASTER_VOLUME_STEP),
        "ArrowDown" => Some(-MASTER_VOLUME_STEP),
        _ => None,
    }
}

pub fn handle_keydown(
    ev: &web::KeyboardEvent,
    instrument: &SharedInstrument,
    document: &web::Document,
) {
    let key = ev.key();
    if let Some(step) = volume_step_for_key(&key) {
        let volume = instrument.borrow_mut().engine.nudge_master_volume(step);
        log::info!("[keys] master volume {:.2}", volume);
        ev.prevent_default();
        return;
    }
    let press = instrument.borrow_mut().handle_input(InputEvent::KeyDown {
        key: &key,
        repeat: ev.repeat(),
        modified: ev.ctrl_key() || ev.meta_key() || ev.alt_key(),
    });
    if let Some(press) = press {
        // space scrolls and ' / open quick-find in some browsers
        ev.prevent_default();
        keys::show_press(document, instrument, &press);
    }
}

/// Wire keydown / keyup / blur on the window.
pub fn wire_keyboard(
    window: &web::Window,
    document: &web::Document,
    instrument: &SharedInstrument,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::with_capacity(3);

    let inst = instrument.clone();
    let doc = document.clone();
    listeners.push(Listener::attach(window, "keydown", move |ev: web::Event| {
        if let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() {
            handle_keydown(ev, &inst, &doc);
        }
    })?);

    let inst = instrument.clone();
    listeners.push(Listener::attach(window, "keyup", move |ev: web::Event| {
        if let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() {
            let key = ev.key();
            inst.borrow_mut().handle_input(InputEvent::KeyUp { key: &key });
        }
    })?);

    let inst = instrument.clone();
    listeners.push(Listener::attach(window, "blur", move |_ev: web::Event| {
        inst.borrow_mut().handle_input(InputEvent::Blur);
    })?);

    Ok(listeners)
}
