//! DSP: pure Rust synthesis primitives and the software audio device.
//!
//! Everything here is pull-rendered: the host asks the device for a block of
//! frames and the device advances its clock by exactly that much. The same
//! code backs the browser (via the wasm bindings) and the offline renderer.

pub mod device;
pub mod envelope;
pub mod filter;
pub mod mixer;
pub mod noise;
pub mod oscillator;
pub mod param;
pub mod voice;
