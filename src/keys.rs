use crate::constants::*;
use crate::dom::js_err;
use crate::SharedInstrument;
use etudio_core::{key_layout, keyboard_width, NoteId, NoteRegistry, Press};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Render one button per registry note into `container`. Each button carries
/// its note in `data-note`; the input handlers read it back from there.
pub fn render(
    document: &web::Document,
    container: &web::Element,
    registry: &NoteRegistry,
) -> anyhow::Result<()> {
    let regions = key_layout(registry);
    container.set_inner_html("");
    _ = container.set_attribute(
        "style",
        &format!("position:relative;width:{}px", keyboard_width(&regions)),
    );
    for region in &regions {
        let button = document.create_element("button").map_err(js_err)?;
        let shade = if region.black {
            BLACK_KEY_CLASS
        } else {
            WHITE_KEY_CLASS
        };
        button
            .set_attribute("class", &format!("{KEY_CLASS} {shade}"))
            .map_err(js_err)?;
        button
            .set_attribute(NOTE_ATTR, &region.note.to_string())
            .map_err(js_err)?;
        button
            .set_attribute(
                "style",
                &format!(
                    "position:absolute;top:0;left:{}px;width:{}px;height:{}px;z-index:{}",
                    region.left,
                    region.width,
                    region.height,
                    if region.black { 2 } else { 1 }
                ),
            )
            .map_err(js_err)?;
        let label = document.create_element("span").map_err(js_err)?;
        _ = label.set_attribute("class", "note-label");
        label.set_text_content(Some(&region.caption()));
        button.append_child(&label).map_err(js_err)?;
        container.append_child(&button).map_err(js_err)?;
    }
    log::info!("[keys] rendered {} keys", regions.len());
    Ok(())
}

pub fn clear(container: &web::Element) {
    container.set_inner_html("");
}

fn set_pressed(document: &web::Document, note: &NoteId, pressed: bool) {
    let selector = format!("[{NOTE_ATTR}=\"{note}\"]");
    if let Ok(Some(el)) = document.query_selector(&selector) {
        let cl = el.class_list();
        _ = if pressed {
            cl.add_1(PRESSED_CLASS)
        } else {
            cl.remove_1(PRESSED_CLASS)
        };
    }
}

/// Highlight the pressed key and schedule its removal.
///
/// The timer only un-highlights if its mark is still the latest one for the
/// note, so rapid re-presses extend the highlight instead of cutting it short.
/// It also clears any other key whose window has run out without its timer.
pub fn show_press(document: &web::Document, instrument: &SharedInstrument, press: &Press) {
    set_pressed(document, &press.note, true);

    let Some(window) = web::window() else {
        return;
    };
    let weak = Rc::downgrade(instrument);
    let doc = document.clone();
    let note = press.note;
    let generation = press.generation;
    let expire = Closure::once_into_js(move || {
        let Some(instrument) = weak.upgrade() else {
            return;
        };
        let released = instrument.borrow_mut().release_highlight(note, generation);
        for note in &released {
            set_pressed(&doc, note, false);
        }
    });
    let delay_ms = press.visible_for.as_millis().min(i32::MAX as u128) as i32;
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        expire.unchecked_ref(),
        delay_ms,
    ) {
        log::warn!("[keys] highlight timer for {note} failed: {:?}", e);
    }
}
