use crate::waterfall::Frame;
use crate::SignalDescriptor;
use log::trace;

/// 2 * sqrt(2 ln 2); converts a Gaussian FWHM to sigma.
const FWHM_TO_SIGMA: f64 = 2.354_820_045_030_949;

/// Frequency range, MHz, guaranteed to contain the signal's full drift
/// excursion over the frame duration, expanded by the signal width on the
/// drift-direction edges.
pub fn bounding_range_mhz(frame: &Frame, signal: &SignalDescriptor) -> (f64, f64) {
    // signum(+0.0) == 1.0, matching a zero-drift track's widening direction
    let edge = signal.drift_hz_per_s.signum() * signal.width_hz;
    let excursion_hz = signal.drift_hz_per_s * frame.duration();
    let near = signal.f_start_mhz - edge * 1e-6;
    let far = signal.f_start_mhz + (excursion_hz + edge) * 1e-6;
    (near.min(far), near.max(far))
}

/// Adds a constant-drift narrowband tone with a Gaussian spectral profile,
/// flat time profile, and flat bandpass into the frame, in place.
///
/// Synthesis is restricted to the channels inside the bounding range; the
/// amplitude comes from the frame's background statistics so the tone lands
/// at the requested signal-to-noise ratio. Addition commutes, so injection
/// order does not matter.
pub fn inject(frame: &mut Frame, signal: &SignalDescriptor) {
    trace!(
        "injecting f0 {:.6} MHz, drift {:.3} Hz/s, snr {:.1}, width {:.1} Hz",
        signal.f_start_mhz,
        signal.drift_hz_per_s,
        signal.snr,
        signal.width_hz
    );

    let (f_lo, f_hi) = bounding_range_mhz(frame, signal);
    let Some((chan_lo, chan_hi)) = frame.channel_span(f_lo, f_hi) else {
        return;
    };

    let level = frame.intensity_for_snr(signal.snr);
    let sigma_hz = signal.width_hz / FWHM_TO_SIGMA;
    let dt = frame.dt();
    let tchans = frame.tchans();
    let frequencies: Vec<f64> = (chan_lo..=chan_hi)
        .map(|chan| frame.frequency(chan) * 1e6)
        .collect();

    let data = frame.data_mut();
    for t in 0..tchans {
        let center_hz = signal.f_start_mhz * 1e6 + signal.drift_hz_per_s * dt * t as f64;
        for (offset, &f_hz) in frequencies.iter().enumerate() {
            let z = (f_hz - center_hz) / sigma_hz;
            data[[t, chan_lo + offset]] += (level * (-0.5 * z * z).exp()) as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn background_frame() -> Frame {
        // deterministic non-flat background so the noise std is nonzero
        let data = Array2::from_shape_fn((16, 256), |(t, c)| 10.0 + ((t * 7 + c * 3) % 11) as f32);
        // df = 1 Hz keeps channel arithmetic easy to reason about
        Frame::new(1000.0, 1e-6, 1.0, 0.0, data)
    }

    fn tone(f_start_mhz: f64, drift: f64, snr: f64, width: f64) -> SignalDescriptor {
        SignalDescriptor {
            f_start_mhz,
            drift_hz_per_s: drift,
            snr,
            width_hz: width,
        }
    }

    #[test]
    fn bounding_range_covers_the_drift_track() {
        let frame = background_frame();
        let signal = tone(999.9999, 2.0, 40.0, 4.0);
        let (lo, hi) = bounding_range_mhz(&frame, &signal);

        // track runs from f0 to f0 + drift * duration
        let f_end = signal.f_start_mhz + 2.0 * frame.duration() * 1e-6;
        assert!(lo <= signal.f_start_mhz && signal.f_start_mhz <= hi);
        assert!(lo <= f_end && f_end <= hi);
        assert!((hi - f_end - 4.0e-6).abs() < 1e-12);
        assert!((signal.f_start_mhz - lo - 4.0e-6).abs() < 1e-12);
    }

    #[test]
    fn negative_drift_flips_the_widened_edge() {
        let frame = background_frame();
        let signal = tone(999.9999, -2.0, 40.0, 4.0);
        let (lo, hi) = bounding_range_mhz(&frame, &signal);
        assert!((hi - (signal.f_start_mhz + 4.0e-6)).abs() < 1e-12);
        assert!(lo < signal.f_start_mhz - frame.duration() * 2.0 * 1e-6);
    }

    #[test]
    fn injection_adds_power_at_the_tone_channel() {
        let mut frame = background_frame();
        let f0 = frame.frequency(128);
        let before = frame.data()[[0, 128]];
        let far_before = frame.data()[[0, 10]];

        inject(&mut frame, &tone(f0, 0.0, 40.0, 4.0));

        let gained = frame.data()[[0, 128]] - before;
        assert!((gained as f64 - frame.intensity_for_snr(40.0)).abs() < 1e-3);
        // channels far outside the bounding range stay untouched
        assert_eq!(frame.data()[[0, 10]], far_before);
    }

    #[test]
    fn drifting_tone_follows_its_track() {
        let mut frame = background_frame();
        let f0 = frame.frequency(128);
        let background = frame.clone();

        // -4 Hz/s with dt = 1 s moves the peak down 4 channels per sample;
        // frequencies descend with channel index, so the peak moves to
        // higher channel numbers
        inject(&mut frame, &tone(f0, -4.0, 60.0, 2.0));

        let gain_last =
            frame.data()[[15, 128 + 60]] - background.data()[[15, 128 + 60]];
        let gain_wrong_side =
            frame.data()[[15, 128 - 60]] - background.data()[[15, 128 - 60]];
        assert!(gain_last > 10.0 * gain_wrong_side.max(1e-6));
    }

    #[test]
    fn injection_order_does_not_matter() {
        let a = tone(999.99990, 1.5, 30.0, 4.0);
        let b = tone(999.99970, -0.5, 20.0, 4.0);

        let mut ab = background_frame();
        inject(&mut ab, &a);
        inject(&mut ab, &b);

        let mut ba = background_frame();
        inject(&mut ba, &b);
        inject(&mut ba, &a);

        assert_eq!(ab.data(), ba.data());
    }

    #[test]
    fn out_of_frame_signal_is_a_no_op() {
        let mut frame = background_frame();
        let before = frame.clone();
        inject(&mut frame, &tone(1100.0, 0.0, 40.0, 4.0));
        assert_eq!(frame.data(), before.data());
    }
}
