use crate::constants::*;
use crate::dom::{self, js_err, Listener};
use etudio_core::{FrameClock, InstrumentError, ParticleField, Surface, TickStatus};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

fn surface_err(e: JsValue) -> InstrumentError {
    InstrumentError::Surface(format!("{:?}", e))
}

#[allow(deprecated)]
fn set_glyph_fill(ctx: &web::CanvasRenderingContext2d) {
    ctx.set_fill_style(&JsValue::from_str(GLYPH_FILL));
}

/// 2D canvas the note rain draws on.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(js_err)?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), InstrumentError> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), InstrumentError> {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
        Ok(())
    }

    fn draw_glyph(
        &mut self,
        glyph: char,
        at: Vec2,
        size: f32,
        rotation: f32,
    ) -> Result<(), InstrumentError> {
        let mut buf = [0u8; 4];
        let text: &str = glyph.encode_utf8(&mut buf);
        let ctx = &self.ctx;
        ctx.save();
        let drawn = (|| {
            ctx.translate(at.x as f64, at.y as f64)?;
            ctx.rotate(rotation as f64)?;
            ctx.set_font(&format!("{}px {}", size, GLYPH_FONT_FAMILY));
            set_glyph_fill(ctx);
            let half = (size / 2.0) as f64;
            ctx.fill_text(text, -half, half)
        })();
        ctx.restore();
        drawn.map_err(surface_err)
    }
}

struct FrameState {
    clock: FrameClock,
    field: ParticleField,
    surface: CanvasSurface,
    document: web::Document,
}

impl FrameState {
    fn tick(&mut self) -> TickStatus {
        let document = &self.document;
        self.clock.tick(&mut self.field, &mut self.surface, || {
            dom::element_rect(document, PIANO_FRAME_ID)
        })
    }
}

/// requestAnimationFrame loop driving the note rain.
///
/// The resize listener only records the new viewport size; the canvas is
/// resized inside the next tick. [`FrameLoop::stop`] cancels the pending
/// frame and detaches the listener.
pub struct FrameLoop {
    state: Rc<RefCell<FrameState>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    resize: Option<Listener>,
}

impl FrameLoop {
    pub fn start(
        document: &web::Document,
        window: &web::Window,
        particle_count: usize,
    ) -> anyhow::Result<Self> {
        let canvas = document
            .get_element_by_id(NOTE_RAIN_CANVAS_ID)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", NOTE_RAIN_CANVAS_ID))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!("#{} is not a canvas: {:?}", NOTE_RAIN_CANVAS_ID, e))?;
        let mut surface = CanvasSurface::new(canvas)?;
        let (w, h) = dom::viewport_size(window);
        surface.resize(w, h)?;
        let field = ParticleField::new(particle_count, w as f32, h as f32, StdRng::from_entropy());
        log::info!("[frame] note rain {}x{} with {} particles", w, h, field.len());

        let state = Rc::new(RefCell::new(FrameState {
            clock: FrameClock::new(),
            field,
            surface,
            document: document.clone(),
        }));

        let resize_state = state.clone();
        let resize_window = window.clone();
        let resize = Listener::attach(window, "resize", move |_ev: web::Event| {
            let (w, h) = dom::viewport_size(&resize_window);
            resize_state.borrow_mut().clock.request_resize(w, h);
        })?;

        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let tick_clone = tick.clone();
        let tick_state = state.clone();
        let tick_raf = raf_id.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            tick_raf.set(None);
            if tick_state.borrow_mut().tick() == TickStatus::Stop {
                return;
            }
            let Some(w) = web::window() else {
                return;
            };
            if let Some(cb) = tick_clone.borrow().as_ref() {
                match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => tick_raf.set(Some(id)),
                    Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = tick.borrow().as_ref() {
            let id = window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .map_err(js_err)?;
            raf_id.set(Some(id));
        }

        Ok(Self {
            state,
            raf_id,
            tick,
            resize: Some(resize),
        })
    }

    /// Stop the loop. No tick runs or touches the canvas afterwards.
    pub fn stop(mut self) {
        self.state.borrow_mut().clock.teardown();
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        self.resize = None;
        // breaks the closure's reference to itself
        _ = self.tick.borrow_mut().take();
        let ticks = self.state.borrow().clock.ticks();
        log::info!("[frame] stopped after {} ticks", ticks);
    }
}
