pub mod frame;
pub mod header;
pub mod observation;
pub mod writer;

pub use frame::Frame;
pub use header::FilterbankHeader;
pub use observation::Observation;
