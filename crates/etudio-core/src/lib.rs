//! Platform-independent core of the etudio keyboard: note registry, voice
//! engine, press feedback, input routing and the note-rain particle field.
//!
//! Nothing here touches the browser; the web front-end supplies a
//! [`SamplePlayer`] and a [`Surface`] and drives the loop.

pub mod config;
pub mod constants;
pub mod duration;
pub mod error;
pub mod feedback;
pub mod frame;
pub mod input;
pub mod instrument;
pub mod keymap;
pub mod layout;
pub mod note;
pub mod particles;
pub mod registry;
pub mod voice;

pub use config::*;
pub use constants::*;
pub use duration::*;
pub use error::*;
pub use feedback::*;
pub use frame::*;
pub use input::*;
pub use instrument::*;
pub use keymap::*;
pub use layout::*;
pub use note::*;
pub use particles::*;
pub use registry::*;
pub use voice::*;
