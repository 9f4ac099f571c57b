use std::path::PathBuf;
use std::process::ExitStatus;

/// Failures while opening or reading a waterfall observation.
#[derive(thiserror::Error, Debug)]
pub enum ObservationError {
    #[error("opening {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed filterbank header: {0}")]
    Header(String),
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("window [{f_start:.6}, {f_stop:.6}) MHz lies outside the observation band")]
    WindowOutOfBand { f_start: f64, f_stop: f64 },
}

/// Failures while invoking the external drift-search detector.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("spawning detector `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("detector exited with {status}")]
    Failed { status: ExitStatus },
    #[error("writing detector metadata: {0}")]
    Metadata(#[from] std::io::Error),
    #[error("encoding detector metadata: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures while parsing the detector's tabular hit output.
#[derive(thiserror::Error, Debug)]
pub enum HitParseError {
    #[error("hit table line {line}: bad numeric field `{field}`")]
    BadField { line: usize, field: String },
}
