#![cfg(target_arch = "wasm32")]
use audio::WebSampler;
use etudio_core::{Instrument, InstrumentConfig, SamplePlayer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod keys;

use constants::*;

pub(crate) type SharedInstrument = Rc<RefCell<Instrument<WebSampler>>>;

/// Everything created by [`mount`]; dropping it detaches every listener.
struct Mount {
    instrument: SharedInstrument,
    container: web::Element,
    listeners: Vec<dom::Listener>,
    frame: Option<frame::FrameLoop>,
}

thread_local! {
    static MOUNTED: RefCell<Option<Mount>> = const { RefCell::new(None) };
}

fn read_config(container: &web::Element) -> anyhow::Result<InstrumentConfig> {
    let config = InstrumentConfig::from_attributes(|key| {
        container.get_attribute(&format!("{CONFIG_ATTR_PREFIX}{key}"))
    })?;
    Ok(config)
}

fn load_samples(instrument: &SharedInstrument, base_url: &str) -> anyhow::Result<()> {
    let audio_ctx = web::AudioContext::new().map_err(dom::js_err)?;
    let manifest = instrument
        .borrow()
        .engine
        .registry()
        .sample_manifest(base_url);
    let weak = Rc::downgrade(instrument);
    spawn_local(async move {
        match audio::load_sampler(audio_ctx, manifest).await {
            Ok(mut sampler) => {
                if let Some(instrument) = weak.upgrade() {
                    instrument.borrow_mut().engine.install(sampler);
                } else {
                    // unmounted while loading
                    sampler.dispose();
                }
            }
            Err(e) => log::error!("[audio] sampler unavailable: {:?}", e),
        }
    });
    Ok(())
}

fn mount() -> anyhow::Result<Mount> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let container = document
        .get_element_by_id(PIANO_FRAME_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", PIANO_FRAME_ID))?;

    let config = read_config(&container)?;
    let particle_count = config.particle_count;
    let sample_base_url = config.sample_base_url.clone();
    let instrument: SharedInstrument = Rc::new(RefCell::new(Instrument::new(config)?));
    {
        let inst = instrument.borrow();
        let registry = inst.engine.registry();
        log::info!(
            "[mount] {} notes ({}..{}), transpose {:?}",
            registry.len(),
            registry.lowest().map(|n| n.to_string()).unwrap_or_default(),
            registry.highest().map(|n| n.to_string()).unwrap_or_default(),
            inst.engine.policy()
        );
        keys::render(&document, &container, registry)?;
    }

    load_samples(&instrument, &sample_base_url)?;

    let mut listeners = events::wire_keyboard(&window, &document, &instrument)?;
    listeners.extend(events::wire_pointer(&container, &document, &instrument)?);

    // the instrument still plays without the rain
    let frame = match frame::FrameLoop::start(&document, &window, particle_count) {
        Ok(f) => Some(f),
        Err(e) => {
            log::warn!("[mount] note rain disabled: {:?}", e);
            None
        }
    };

    Ok(Mount {
        instrument,
        container,
        listeners,
        frame,
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("etudio starting");

    if MOUNTED.with(|m| m.borrow().is_some()) {
        log::warn!("[mount] already mounted");
        return Ok(());
    }
    match mount() {
        Ok(mounted) => MOUNTED.with(|m| *m.borrow_mut() = Some(mounted)),
        Err(e) => log::error!("mount error: {:?}", e),
    }
    Ok(())
}

/// Tear the instrument down: stop the note rain, detach input, release audio.
#[wasm_bindgen]
pub fn unmount() {
    let Some(mounted) = MOUNTED.with(|m| m.borrow_mut().take()) else {
        return;
    };
    let Mount {
        instrument,
        container,
        listeners,
        frame,
    } = mounted;
    if let Some(frame) = frame {
        frame.stop();
    }
    drop(listeners);
    instrument.borrow_mut().engine.dispose();
    instrument.borrow_mut().feedback.clear();
    keys::clear(&container);
    log::info!("[mount] unmounted");
}
