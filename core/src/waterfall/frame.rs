use ndarray::Array2;

/// A mutable time x frequency working copy of one observation window.
///
/// Channel 0 holds the highest frequency; the frequency axis descends along
/// the channel axis, matching the filterbank container. Background noise
/// statistics are fixed at construction so that repeated injections stay
/// purely additive and order-independent.
#[derive(Debug, Clone)]
pub struct Frame {
    fch1: f64,
    df: f64,
    dt: f64,
    tstart: f64,
    data: Array2<f32>,
    noise_mean: f64,
    noise_std: f64,
}

impl Frame {
    /// Wraps a time x frequency array. `fch1`/`df` are in MHz, `dt` in
    /// seconds, `tstart` in MJD.
    pub fn new(fch1: f64, df: f64, dt: f64, tstart: f64, data: Array2<f32>) -> Self {
        let (noise_mean, noise_std) = background_stats(&data);
        Self {
            fch1,
            df,
            dt,
            tstart,
            data,
            noise_mean,
            noise_std,
        }
    }

    pub fn fchans(&self) -> usize {
        self.data.ncols()
    }

    pub fn tchans(&self) -> usize {
        self.data.nrows()
    }

    pub fn fch1(&self) -> f64 {
        self.fch1
    }

    pub fn df(&self) -> f64 {
        self.df
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn tstart(&self) -> f64 {
        self.tstart
    }

    /// Total time span of the frame, seconds.
    pub fn duration(&self) -> f64 {
        self.dt * self.tchans() as f64
    }

    /// Frequency of a channel, MHz.
    pub fn frequency(&self, chan: usize) -> f64 {
        self.fch1 - chan as f64 * self.df
    }

    /// Frequency of the center channel, MHz.
    pub fn center_frequency(&self) -> f64 {
        self.frequency(self.fchans() / 2)
    }

    /// Inclusive channel range whose frequencies fall inside `[f_lo, f_hi]`
    /// MHz, clamped to the frame. `None` when the range misses the frame.
    pub fn channel_span(&self, f_lo: f64, f_hi: f64) -> Option<(usize, usize)> {
        let lo_chan = ((self.fch1 - f_hi) / self.df - 1e-9).ceil();
        let hi_chan = ((self.fch1 - f_lo) / self.df + 1e-9).floor();
        let last = self.fchans() as f64 - 1.0;
        if hi_chan < 0.0 || lo_chan > last {
            return None;
        }
        let lo = lo_chan.max(0.0) as usize;
        let hi = hi_chan.min(last) as usize;
        if lo > hi {
            return None;
        }
        Some((lo, hi))
    }

    /// Mean and standard deviation of the background, as captured at
    /// construction.
    pub fn noise_stats(&self) -> (f64, f64) {
        (self.noise_mean, self.noise_std)
    }

    /// Tone amplitude that yields the requested signal-to-noise ratio after
    /// integration over the frame's time samples.
    pub fn intensity_for_snr(&self, snr: f64) -> f64 {
        snr * self.noise_std / (self.tchans() as f64).sqrt()
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array2<f32> {
        &mut self.data
    }
}

fn background_stats(data: &Array2<f32>) -> (f64, f64) {
    let count = data.len();
    if count == 0 {
        return (0.0, 0.0);
    }
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for &value in data.iter() {
        let value = value as f64;
        sum += value;
        sum_sq += value * value;
    }
    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64 - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn flat_frame() -> Frame {
        let data = Array2::from_shape_fn((16, 64), |(t, c)| ((t + c) % 5) as f32);
        Frame::new(1500.0, 0.001, 1.0, 0.0, data)
    }

    #[test]
    fn frequencies_descend_from_fch1() {
        let frame = flat_frame();
        assert_eq!(frame.frequency(0), 1500.0);
        assert!(frame.frequency(1) < frame.frequency(0));
        assert_eq!(frame.center_frequency(), frame.frequency(32));
    }

    #[test]
    fn channel_span_clamps_to_frame() {
        let frame = flat_frame();
        let (lo, hi) = frame.channel_span(0.0, 3000.0).unwrap();
        assert_eq!((lo, hi), (0, 63));
        assert!(frame.channel_span(1600.0, 1700.0).is_none());
    }

    #[test]
    fn channel_span_picks_interior_channels() {
        let frame = flat_frame();
        // [1499.990, 1499.995] MHz with df = 1 kHz -> channels 5..=10
        let (lo, hi) = frame.channel_span(1499.990, 1499.995).unwrap();
        assert_eq!((lo, hi), (5, 10));
    }

    #[test]
    fn intensity_scales_with_snr_and_integration() {
        let frame = flat_frame();
        let (_, std) = frame.noise_stats();
        assert!(std > 0.0);
        let one = frame.intensity_for_snr(1.0);
        let forty = frame.intensity_for_snr(40.0);
        assert!((forty / one - 40.0).abs() < 1e-9);
        assert!((one - std / 4.0).abs() < 1e-9);
    }
}
