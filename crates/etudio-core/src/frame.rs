use crate::particles::{ParticleField, Rect, Surface, TickStats};

/// Whether the driver should schedule another frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    Stop,
}

/// Per-frame driver for the particle field.
///
/// Platform code calls [`FrameClock::tick`] from its refresh callback.
/// Viewport resizes are recorded with [`FrameClock::request_resize`] and
/// applied at the start of the next tick, so the surface is only ever
/// mutated from inside a tick. After [`FrameClock::teardown`] ticks are inert.
#[derive(Debug, Default)]
pub struct FrameClock {
    pending_resize: Option<(u32, u32)>,
    torn_down: bool,
    ticks: u64,
    failed_ticks: u64,
    last_stats: TickStats,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the new viewport size; the latest request wins.
    pub fn request_resize(&mut self, width: u32, height: u32) {
        self.pending_resize = Some((width.max(1), height.max(1)));
    }

    pub fn pending_resize(&self) -> Option<(u32, u32)> {
        self.pending_resize
    }

    /// Run one frame.
    ///
    /// `bounds` is queried every tick for the instrument's current on-screen
    /// rectangle; `None` (not mounted) means nothing is excluded. A failing
    /// frame is logged and skipped; the loop keeps going.
    pub fn tick<S, B>(
        &mut self,
        field: &mut ParticleField,
        surface: &mut S,
        bounds: B,
    ) -> TickStatus
    where
        S: Surface,
        B: FnOnce() -> Option<Rect>,
    {
        if self.torn_down {
            return TickStatus::Stop;
        }
        if let Some((w, h)) = self.pending_resize.take() {
            match surface.resize(w, h) {
                Ok(()) => log::debug!("[frame] surface resized to {w}x{h}"),
                Err(e) => log::warn!("[frame] resize to {w}x{h} failed: {e}"),
            }
        }
        let exclusion = bounds();
        match field.advance_and_render(surface, exclusion) {
            Ok(stats) => self.last_stats = stats,
            Err(e) => {
                self.failed_ticks += 1;
                log::warn!("[frame] tick {} aborted: {e}", self.ticks);
            }
        }
        self.ticks += 1;
        TickStatus::Continue
    }

    /// Stop the clock. Every later tick returns [`TickStatus::Stop`] without
    /// touching the surface.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.pending_resize = None;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn failed_ticks(&self) -> u64 {
        self.failed_ticks
    }

    pub fn last_stats(&self) -> TickStats {
        self.last_stats
    }
}
