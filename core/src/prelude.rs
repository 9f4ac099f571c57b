pub use crate::detect::{DriftDetector, Hit, HitTable, ObservationInfo, SearchRequest, TurboSeti};
pub use crate::error::{DetectError, HitParseError, ObservationError};
pub use crate::waterfall::{FilterbankHeader, Frame, Observation};
pub use crate::window::WindowPlan;
pub use crate::SignalDescriptor;
