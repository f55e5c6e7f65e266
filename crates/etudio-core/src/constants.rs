use crate::note::{NoteId, PitchClass};

// Default tunables shared by the web front-end and tests.

// Playable range (chromatic, inclusive)
pub const DEFAULT_LOW_NOTE: NoteId = NoteId::new(PitchClass::C, 3);
pub const DEFAULT_HIGH_NOTE: NoteId = NoteId::new(PitchClass::B, 6);

// Sample library
pub const DEFAULT_SAMPLE_BASE_URL: &str = "/samples/piano/";

// Triggering
pub const DEFAULT_DURATION_TOKEN: &str = "8n";
pub const DEFAULT_TEMPO_BPM: f64 = 120.0; // "8n" = 0.25 s
pub const MIN_TEMPO_BPM: f64 = 20.0;
pub const MAX_TEMPO_BPM: f64 = 400.0;

// Envelope (seconds / linear gain)
pub const DEFAULT_ATTACK_SEC: f64 = 0.0;
pub const DEFAULT_RELEASE_SEC: f64 = 1.0; // tail trails past the nominal duration
pub const DEFAULT_VOICE_GAIN: f32 = 1.0;
pub const MAX_VOICE_GAIN: f32 = 4.0;

// Master volume
pub const DEFAULT_MASTER_VOLUME: f32 = 0.8;
pub const MASTER_VOLUME_STEP: f32 = 0.05;

// Key highlight window
pub const DEFAULT_PRESS_VISIBLE_MS: u64 = 200;
pub const SUSTAINED_PRESS_VISIBLE_MS: u64 = 800;

// Note rain
pub const DEFAULT_PARTICLE_COUNT: usize = 30;
pub const MAX_PARTICLE_COUNT: usize = 500;
pub const PARTICLE_GLYPHS: [char; 4] = ['♪', '♫', '♩', '♬'];
pub const PARTICLE_SEED_DEPTH: f32 = 200.0; // initial spread below the bottom edge
pub const PARTICLE_RECYCLE_MARGIN: f32 = 20.0;
pub const PARTICLE_RECYCLE_DEPTH: f32 = 50.0;
pub const PARTICLE_SIZE_MIN: f32 = 20.0;
pub const PARTICLE_SIZE_SPAN: f32 = 20.0;
pub const PARTICLE_SPEED_MIN: f32 = 0.5;
pub const PARTICLE_SPEED_SPAN: f32 = 2.0;
pub const SWAY_AMPLITUDE_MIN: f32 = 20.0;
pub const SWAY_AMPLITUDE_SPAN: f32 = 30.0;
pub const SWAY_FREQUENCY_MIN: f32 = 0.01;
pub const SWAY_FREQUENCY_SPAN: f32 = 0.02;
pub const ROTATION_SPEED_MAX: f32 = 0.01; // symmetric around zero

// Key geometry (CSS px)
pub const WHITE_KEY_WIDTH: f32 = 60.0;
pub const WHITE_KEY_HEIGHT: f32 = 200.0;
pub const BLACK_KEY_WIDTH: f32 = 40.0;
pub const BLACK_KEY_HEIGHT: f32 = 120.0;
pub const BLACK_KEY_INSET: f32 = 15.0; // black key starts this far left of the white boundary
