use crate::constants::VOICE_STOP_PAD_SEC;
use crate::dom::js_err;
use etudio_core::{
    InstrumentError, OutputState, SampleManifest, SamplePlayer, VoiceId, VoiceRequest,
};
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx).map_err(|e| {
        log::error!("[audio] {} GainNode error: {:?}", label, e);
        js_err(e)
    })?;
    g.gain().set_value(value);
    Ok(g)
}

/// Envelope times for one voice, relative to its start.
#[derive(Clone, Copy)]
struct VoiceShape {
    attack: f64,
    release_at: f64,
    end_at: f64,
    peak: f32,
}

impl VoiceShape {
    fn from_request(request: &VoiceRequest<'_>) -> Self {
        Self {
            attack: request.envelope.attack,
            release_at: request.release_at(),
            end_at: request.end_at(),
            peak: request.envelope.gain,
        }
    }
}

/// Attack ramp, hold at peak, then linear release to silence.
fn shape_gain(gain: &web::AudioParam, shape: VoiceShape, t0: f64) -> Result<(), JsValue> {
    if shape.attack > 0.0 {
        gain.set_value_at_time(0.0, t0)?;
        gain.linear_ramp_to_value_at_time(shape.peak, t0 + shape.attack)?;
    } else {
        gain.set_value_at_time(shape.peak, t0)?;
    }
    gain.set_value_at_time(shape.peak, t0 + shape.release_at)?;
    gain.linear_ramp_to_value_at_time(0.0, t0 + shape.end_at)?;
    Ok(())
}

/// Build buffer source → envelope gain → master and schedule it from now.
fn schedule_voice(
    audio_ctx: &web::AudioContext,
    buffer: &web::AudioBuffer,
    master: &web::GainNode,
    shape: VoiceShape,
) -> Result<(), InstrumentError> {
    let playback = |e: JsValue| InstrumentError::Playback(format!("{:?}", e));

    let src = web::AudioBufferSourceNode::new(audio_ctx).map_err(playback)?;
    src.set_buffer(Some(buffer));
    let env = web::GainNode::new(audio_ctx).map_err(playback)?;

    let t0 = audio_ctx.current_time();
    shape_gain(&env.gain(), shape, t0).map_err(playback)?;

    src.connect_with_audio_node(&env).map_err(playback)?;
    env.connect_with_audio_node(master).map_err(playback)?;
    src.start_with_when(t0).map_err(playback)?;
    let stop_at = t0 + shape.end_at + VOICE_STOP_PAD_SEC;
    src.stop_with_when(stop_at).map_err(playback)?;
    Ok(())
}

/// WebAudio implementation of the engine's sample player.
///
/// Every voice gets its own buffer source and envelope gain feeding one
/// master gain, so voices never cut each other off.
pub struct WebSampler {
    audio_ctx: web::AudioContext,
    master_gain: web::GainNode,
    buffers: FnvHashMap<String, web::AudioBuffer>,
    /// In-flight `resume()`; voices triggered while locked wait on it.
    resuming: Rc<RefCell<Option<js_sys::Promise>>>,
    next_voice: VoiceId,
}

impl WebSampler {
    pub fn new(
        audio_ctx: web::AudioContext,
        buffers: FnvHashMap<String, web::AudioBuffer>,
    ) -> anyhow::Result<Self> {
        let master_gain = create_gain(&audio_ctx, 1.0, "Master")?;
        master_gain
            .connect_with_audio_node(&audio_ctx.destination())
            .map_err(js_err)?;
        Ok(Self {
            audio_ctx,
            master_gain,
            buffers,
            resuming: Rc::new(RefCell::new(None)),
            next_voice: 0,
        })
    }
}

impl SamplePlayer for WebSampler {
    fn output_state(&self) -> OutputState {
        match self.audio_ctx.state() {
            web::AudioContextState::Running => OutputState::Running,
            web::AudioContextState::Closed => OutputState::Closed,
            _ => OutputState::Suspended,
        }
    }

    fn unlock(&mut self) -> Result<(), InstrumentError> {
        if self.resuming.borrow().is_some() {
            return Ok(());
        }
        // resume() has to be called inside the gesture handler
        let resumed = self
            .audio_ctx
            .resume()
            .map_err(|e| InstrumentError::Unlock(format!("{:?}", e)))?;
        *self.resuming.borrow_mut() = Some(resumed.clone());
        let resuming = self.resuming.clone();
        spawn_local(async move {
            if let Err(e) = JsFuture::from(resumed).await {
                log::warn!("[audio] resume rejected: {:?}", e);
            }
            // settled either way; a rejected resume is retried on the next gesture
            resuming.borrow_mut().take();
        });
        Ok(())
    }

    fn start_voice(&mut self, request: &VoiceRequest<'_>) -> Result<VoiceId, InstrumentError> {
        let buffer = self
            .buffers
            .get(request.sample_ref)
            .ok_or_else(|| {
                InstrumentError::Playback(format!("{} not loaded", request.sample_ref))
            })?
            .clone();
        let shape = VoiceShape::from_request(request);

        if self.output_state() == OutputState::Running {
            schedule_voice(&self.audio_ctx, &buffer, &self.master_gain, shape)?;
            self.next_voice += 1;
            return Ok(self.next_voice);
        }

        // Output still locked: start the voice once the pending resume settles,
        // so it is timed from the moment sound can actually play.
        let resumed = self
            .resuming
            .borrow()
            .clone()
            .ok_or_else(|| InstrumentError::Unlock("no resume pending".into()))?;
        self.next_voice += 1;
        let voice = self.next_voice;
        let audio_ctx = self.audio_ctx.clone();
        let master = self.master_gain.clone();
        let note = request.note;
        spawn_local(async move {
            match JsFuture::from(resumed).await {
                Ok(_) => {
                    if let Err(e) = schedule_voice(&audio_ctx, &buffer, &master, shape) {
                        log::warn!("[audio] {note}: {e}");
                    }
                }
                Err(e) => log::warn!("[audio] {note} dropped, output still locked: {:?}", e),
            }
        });
        Ok(voice)
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.master_gain.gain().set_value(gain);
    }

    fn dispose(&mut self) {
        _ = self.master_gain.disconnect();
        self.buffers.clear();
        match self.audio_ctx.close() {
            Ok(closing) => spawn_local(async move {
                if let Err(e) = JsFuture::from(closing).await {
                    log::warn!("[audio] close failed: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[audio] close failed: {:?}", e),
        }
    }
}

async fn fetch_buffer(
    audio_ctx: &web::AudioContext,
    request: js_sys::Promise,
) -> anyhow::Result<web::AudioBuffer> {
    let resp: web::Response = JsFuture::from(request)
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("HTTP {}", resp.status());
    }
    let bytes: js_sys::ArrayBuffer = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    let decoded = JsFuture::from(audio_ctx.decode_audio_data(&bytes).map_err(js_err)?)
        .await
        .map_err(js_err)?;
    decoded.dyn_into::<web::AudioBuffer>().map_err(js_err)
}

/// Fetch and decode every sample in `manifest` into a ready player.
///
/// All requests are issued up front and then awaited in turn. A sample that
/// fails is logged and left out, and the missing notes are summarized once;
/// those keys report a playback failure when pressed.
pub async fn load_sampler(
    audio_ctx: web::AudioContext,
    manifest: SampleManifest,
) -> anyhow::Result<WebSampler> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let requests: Vec<_> = manifest
        .sources
        .iter()
        .map(|s| (s, window.fetch_with_str(&s.url)))
        .collect();

    let mut buffers = FnvHashMap::default();
    let mut missing = Vec::new();
    for (source, request) in requests {
        match fetch_buffer(&audio_ctx, request).await {
            Ok(buf) => {
                buffers.insert(source.sample_ref.clone(), buf);
            }
            Err(e) => {
                log::warn!("[audio] {} ({}): {:?}", source.note, source.url, e);
                missing.push(source.note.to_string());
            }
        }
    }
    if !missing.is_empty() {
        log::warn!(
            "[audio] {} samples missing; these keys will not sound: {}",
            missing.len(),
            missing.join(", ")
        );
    }
    log::info!(
        "[audio] loaded {}/{} samples from {}",
        buffers.len(),
        manifest.len(),
        manifest.base_url
    );
    WebSampler::new(audio_ctx, buffers)
}
