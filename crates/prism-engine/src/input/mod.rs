//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into `InputEvent`s.

mod event;
mod key;
mod state;

pub mod platform;

pub use event::{InputEvent, KeyState};
pub use key::KeyCode;
pub use state::{Input, KEY_COUNT};
