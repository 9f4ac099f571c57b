//! Waterfall data model and signal-injection core for the narrowband
//! recovery survey.
//!
//! The modules cover the synthetic half of the survey: reading a filterbank
//! observation, slicing it into frequency windows, injecting drifting
//! narrowband tones, and driving the external drift-search detector.

pub mod detect;
pub mod error;
pub mod prelude;
pub mod synth;
pub mod waterfall;
pub mod window;

pub use error::{DetectError, HitParseError, ObservationError};
use serde::{Deserialize, Serialize};

/// Parameters of one injected narrowband tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalDescriptor {
    /// Start frequency of the drift track, MHz.
    pub f_start_mhz: f64,
    /// Drift rate, Hz/s.
    pub drift_hz_per_s: f64,
    /// Amplitude relative to the frame background noise.
    pub snr: f64,
    /// Spectral full width at half maximum, Hz.
    pub width_hz: f64,
}
