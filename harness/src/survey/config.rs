use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_max_drift() -> f64 {
    5.0
}

fn default_min_snr() -> f64 {
    15.0
}

fn default_num_injected() -> usize {
    1
}

fn default_detector() -> String {
    "turboSETI".into()
}

/// Full description of one injection-and-recovery sweep.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Filterbank observation providing the background data.
    pub observation: PathBuf,
    /// Window width in channels.
    pub fchans: usize,
    #[serde(default)]
    pub f_begin: Option<f64>,
    #[serde(default)]
    pub f_end: Option<f64>,
    /// Cursor step in channels; defaults to `fchans`.
    #[serde(default)]
    pub f_shift: Option<usize>,
    #[serde(default = "default_max_drift")]
    pub max_drift: f64,
    #[serde(default = "default_min_snr")]
    pub min_snr: f64,
    /// Total signals per frame, primary included.
    #[serde(default = "default_num_injected")]
    pub num_injected: usize,
    #[serde(default)]
    pub seed: u64,
    /// Detector executable; must accept turboSETI-style flags.
    #[serde(default = "default_detector")]
    pub detector: String,
    /// Optional per-frame overrides for the primary signal.
    #[serde(default)]
    pub drifts: Option<Vec<f64>>,
    #[serde(default)]
    pub snrs: Option<Vec<f64>>,
    #[serde(default)]
    pub widths: Option<Vec<f64>>,
    /// Per-frame noise-to-primary snr ratios; defaults to 0.5.
    #[serde(default)]
    pub snr_ratios: Option<Vec<f64>>,
    /// Where to write the recovery records as JSON.
    #[serde(default)]
    pub records_out: Option<PathBuf>,
}

impl SurveyConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading survey config {}", path_ref.display()))?;
        let config: SurveyConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing survey config {}", path_ref.display()))?;
        Ok(config)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_args(
        observation: PathBuf,
        fchans: usize,
        f_begin: Option<f64>,
        f_end: Option<f64>,
        f_shift: Option<usize>,
        max_drift: f64,
        min_snr: f64,
        num_injected: usize,
        seed: u64,
        detector: String,
        records_out: Option<PathBuf>,
    ) -> Self {
        Self {
            observation,
            fchans,
            f_begin,
            f_end,
            f_shift,
            max_drift,
            min_snr,
            num_injected,
            seed,
            detector,
            drifts: None,
            snrs: None,
            widths: None,
            snr_ratios: None,
            records_out,
        }
    }
}
