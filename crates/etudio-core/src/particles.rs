//! Drifting note glyphs drawn around (never over) the instrument.
//!
//! Particles start below the bottom edge and rise; once one has fully left
//! through the top it is re-randomized in place below the bottom edge again.
//! The population never grows or shrinks.

use crate::constants::*;
use crate::error::Result;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::TAU;

/// Axis-aligned rectangle in surface coordinates (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Inclusive of all four edges.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// A 2D drawing target owned by the frame loop.
pub trait Surface {
    /// Current size in surface units.
    fn size(&self) -> (f32, f32);

    /// Resize the backing store. Resizing also clears it.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    /// Draw `glyph` centred on `at`, rotated by `rotation` radians.
    fn draw_glyph(&mut self, glyph: char, at: Vec2, size: f32, rotation: f32) -> Result<()>;
}

/// One drifting glyph. Mutated in place every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
    pub glyph: char,
    pub sway_amplitude: f32,
    pub sway_frequency: f32,
    pub phase: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Particle {
    fn random(rng: &mut StdRng, width: f32, y: f32) -> Self {
        Self {
            x: rng.gen::<f32>() * width,
            y,
            size: PARTICLE_SIZE_MIN + rng.gen::<f32>() * PARTICLE_SIZE_SPAN,
            speed: PARTICLE_SPEED_MIN + rng.gen::<f32>() * PARTICLE_SPEED_SPAN,
            glyph: *PARTICLE_GLYPHS.choose(rng).unwrap_or(&PARTICLE_GLYPHS[0]),
            sway_amplitude: SWAY_AMPLITUDE_MIN + rng.gen::<f32>() * SWAY_AMPLITUDE_SPAN,
            sway_frequency: SWAY_FREQUENCY_MIN + rng.gen::<f32>() * SWAY_FREQUENCY_SPAN,
            phase: rng.gen::<f32>() * TAU,
            rotation: rng.gen::<f32>() * TAU,
            rotation_speed: (rng.gen::<f32>() - 0.5) * 2.0 * ROTATION_SPEED_MAX,
        }
    }

    /// Where the glyph is drawn: base position plus the current sway.
    #[inline]
    pub fn drawn_position(&self) -> Vec2 {
        Vec2::new(self.x + self.sway_amplitude * self.phase.sin(), self.y)
    }

    /// Fully above the top edge.
    #[inline]
    pub fn has_exited(&self) -> bool {
        self.y + self.size < 0.0
    }
}

/// Per-tick counters, mostly for tests and debug logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub drawn: usize,
    pub skipped: usize,
    pub recycled: usize,
}

/// Fixed arena of particles advanced once per frame.
pub struct ParticleField {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    /// Seed `count` particles spread just below a `width`×`height` surface.
    pub fn new(count: usize, width: f32, height: f32, mut rng: StdRng) -> Self {
        let particles = (0..count)
            .map(|_| {
                let y = height + rng.gen::<f32>() * PARTICLE_SEED_DEPTH;
                Particle::random(&mut rng, width, y)
            })
            .collect();
        Self { particles, rng }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// In-place access; the population size cannot change through it.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Re-randomize particle `index` below the bottom edge.
    pub fn recycle(&mut self, index: usize, width: f32, height: f32) {
        let y = height + PARTICLE_RECYCLE_MARGIN + self.rng.gen::<f32>() * PARTICLE_RECYCLE_DEPTH;
        if let Some(slot) = self.particles.get_mut(index) {
            *slot = Particle::random(&mut self.rng, width, y);
        }
    }

    /// Move every particle one step, calling `draw` for those outside
    /// `exclusion`. A draw error aborts the rest of the tick.
    pub fn advance<F>(
        &mut self,
        width: f32,
        height: f32,
        exclusion: Option<Rect>,
        mut draw: F,
    ) -> Result<TickStats>
    where
        F: FnMut(&Particle, Vec2) -> Result<()>,
    {
        let mut stats = TickStats::default();
        for i in 0..self.particles.len() {
            let p = &mut self.particles[i];
            p.phase += p.sway_frequency;
            p.rotation += p.rotation_speed;
            let at = p.drawn_position();

            if exclusion.is_some_and(|r| r.contains(at)) {
                stats.skipped += 1;
            } else {
                draw(p, at)?;
                stats.drawn += 1;
            }

            p.y -= p.speed;
            if p.has_exited() {
                self.recycle(i, width, height);
                stats.recycled += 1;
            }
        }
        Ok(stats)
    }

    /// Clear `surface`, then advance and draw every particle onto it.
    pub fn advance_and_render<S: Surface>(
        &mut self,
        surface: &mut S,
        exclusion: Option<Rect>,
    ) -> Result<TickStats> {
        let (width, height) = surface.size();
        surface.clear()?;
        self.advance(width, height, exclusion, |p, at| {
            surface.draw_glyph(p.glyph, at, p.size, p.rotation)
        })
    }
}
