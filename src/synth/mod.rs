//! Synthesizers: turn one-shot descriptions into scheduled voices.

pub mod drums;
pub mod pluck;
pub mod tone;

pub use drums::DrumHit;
pub use pluck::ScaleTable;
pub use tone::{play_tone, ToneSpec};
