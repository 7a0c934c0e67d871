//! Text-level recognition
//!
//! Classification of raw fields and lines, the rhythm grammar, `**kern`
//! note predicates, and CSV conversion. Nothing here needs file context.

pub mod tokens;
pub mod rhythm;
pub mod kern;
pub mod csv;

pub use tokens::{LineKind, Manipulator, TokenRecognizer};
pub use rhythm::{quarter_duration, recip_to_duration, whole_note_fraction};
