//! The keyboard dispatcher (§4.3): chord/sequence parsing, the shortcut
//! registry, conflict detection and resolution, context-gated matching,
//! the chord-timeout dispatch state machine, and built-in keymaps.

pub mod chord;
pub mod conflict;
pub mod context;
pub mod dispatch;
pub mod keymaps;
pub mod registry;
pub mod shortcut;
pub mod validate;

pub use chord::{parse, validate, KeyChord, KeyModifier, KeySequence};
pub use context::Context;
pub use dispatch::{Dispatcher, Signal, DEFAULT_CHORD_TIMEOUT};
pub use registry::{Conflict, ConflictKind, RegisterOutcome, ShortcutRegistry};
pub use shortcut::{Shortcut, Source};
