use driftcore::waterfall::Frame;
use rand::Rng;
use serde::Serialize;

/// Parameters of the secondary ("distractor") signal injected alongside the
/// primary. The zero-valued default stands in when no noise signal was
/// injected.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoiseDescriptor {
    pub f_mhz: f64,
    pub drift_hz_per_s: f64,
    pub snr: f64,
}

/// Draws a randomized frequency (MHz) and drift rate (Hz/s) for a noise
/// signal. Drift is uniform in `[-drift_max, +drift_max]`. With `near`, the
/// frequency stays within one drift excursion of the frame center; otherwise
/// it lands on a uniformly random channel.
pub fn sample_noise_params<R: Rng>(
    frame: &Frame,
    near: bool,
    drift_max: f64,
    rng: &mut R,
) -> (f64, f64) {
    let drift = rng.gen_range(-1.0..1.0) * drift_max;
    let f_mhz = if near {
        let excursion_hz = drift * frame.duration();
        frame.center_frequency() + rng.gen_range(-1.0..1.0) * excursion_hz * 1e-6
    } else {
        let chan = rng.gen_range(0..frame.fchans());
        frame.frequency(chan)
    };
    (f_mhz, drift)
}
