// Page contract and browser-side tuning for the web front-end.

// Element ids
// instrument container; also the rain exclusion source
pub const PIANO_FRAME_ID: &str = "piano-frame";
pub const NOTE_RAIN_CANVAS_ID: &str = "note-rain";

// Key buttons
pub const KEY_CLASS: &str = "piano-key";
pub const WHITE_KEY_CLASS: &str = "white-key";
pub const BLACK_KEY_CLASS: &str = "black-key";
pub const PRESSED_CLASS: &str = "pressed";
pub const NOTE_ATTR: &str = "data-note";
pub const NOTE_SELECTOR: &str = "[data-note]";

// Config attributes on the frame are `data-<key>`
pub const CONFIG_ATTR_PREFIX: &str = "data-";

// Audio scheduling (seconds)
pub const VOICE_STOP_PAD_SEC: f64 = 0.05; // source keeps running briefly past the silent point

// Note rain drawing
pub const GLYPH_FONT_FAMILY: &str = "Arial";
pub const GLYPH_FILL: &str = "rgba(0,0,0,0.6)";
