use crate::error::ObservationError;
use crate::waterfall::{FilterbankHeader, Frame, Observation};
use log::debug;

/// Frequency bounds of one window, MHz. The upper edge is exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBounds {
    pub f_start: f64,
    pub f_stop: f64,
}

/// Resolved plan for sweeping fixed-width frequency windows down an
/// observation band.
///
/// The cursor starts at the top of the requested range and steps down by
/// `f_shift` channels per window until the lower edge would cross `f_begin`.
/// A shift larger than the window width leaves gaps between consecutive
/// windows.
#[derive(Debug, Clone)]
pub struct WindowPlan {
    f_begin: f64,
    f_end: f64,
    fchans: usize,
    f_shift: usize,
    df: f64,
}

impl WindowPlan {
    /// Resolves window parameters against an observation header. `f_end`
    /// defaults to (and is clamped at) the top of the band, `f_begin` to the
    /// bottom, and `f_shift` to `fchans` (non-overlapping windows).
    pub fn new(
        header: &FilterbankHeader,
        fchans: usize,
        f_begin: Option<f64>,
        f_end: Option<f64>,
        f_shift: Option<usize>,
    ) -> Self {
        let df = header.df();
        let top = header.top_mhz();
        let bottom = header.bottom_mhz();

        let f_end = match f_end {
            Some(f) if f <= top => f,
            _ => top,
        };
        let f_begin = match f_begin {
            Some(f) if f >= bottom => f,
            _ => bottom,
        };
        // a zero width or shift would never advance the cursor
        let fchans = fchans.max(1);
        let f_shift = f_shift.unwrap_or(fchans).max(1);

        debug!(
            "window plan: [{:.6}, {:.6}] MHz, width {} chans, shift {} chans",
            f_begin, f_end, fchans, f_shift
        );
        Self {
            f_begin,
            f_end,
            fchans,
            f_shift,
            df,
        }
    }

    /// Resolved lower bound of the sweep, MHz.
    pub fn f_begin(&self) -> f64 {
        self.f_begin
    }

    /// Resolved upper bound of the sweep, MHz.
    pub fn f_end(&self) -> f64 {
        self.f_end
    }

    /// Window width, MHz.
    pub fn width_mhz(&self) -> f64 {
        self.fchans as f64 * self.df
    }

    /// Cursor step between windows, MHz.
    pub fn step_mhz(&self) -> f64 {
        self.f_shift as f64 * self.df
    }

    /// Lazy sequence of window bounds, highest frequency first.
    pub fn bounds(&self) -> BoundsIter {
        BoundsIter {
            f_end: self.f_end,
            width: self.width_mhz(),
            step: self.step_mhz(),
            floor: self.f_begin,
            // a few ulps of the cursor magnitude; the floor comparison must
            // stay strict well below one channel
            tol: 8.0 * f64::EPSILON * self.f_end.abs().max(1.0),
            index: 0,
        }
    }

    /// Exact number of windows the plan will yield, without touching data.
    pub fn count(&self) -> usize {
        self.bounds().count()
    }
}

/// Iterator over window bounds; replays the same stepping arithmetic used
/// when materializing frames.
#[derive(Debug, Clone)]
pub struct BoundsIter {
    f_end: f64,
    width: f64,
    step: f64,
    floor: f64,
    tol: f64,
    index: usize,
}

impl Iterator for BoundsIter {
    type Item = WindowBounds;

    fn next(&mut self) -> Option<WindowBounds> {
        // recomputing from the index keeps rounding error per window at a
        // couple of ulps instead of accumulating across the sweep
        let f_stop = self.f_end - self.index as f64 * self.step;
        let f_start = f_stop - self.width;
        if f_start < self.floor - self.tol {
            return None;
        }
        self.index += 1;
        Some(WindowBounds { f_start, f_stop })
    }
}

/// Lazy sequence of frames cut from an observation by a window plan.
pub struct Windows<'a> {
    observation: &'a Observation,
    bounds: BoundsIter,
}

impl Iterator for Windows<'_> {
    type Item = Result<Frame, ObservationError>;

    fn next(&mut self) -> Option<Self::Item> {
        let bounds = self.bounds.next()?;
        Some(self.observation.read_window(bounds.f_start, bounds.f_stop))
    }
}

impl Observation {
    /// Lazily produces the frames described by `plan`, highest frequency
    /// first.
    pub fn windows<'a>(&'a self, plan: &WindowPlan) -> Windows<'a> {
        Windows {
            observation: self,
            bounds: plan.bounds(),
        }
    }
}
