pub mod hits;

pub use hits::{Hit, HitTable};

use crate::error::DetectError;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Ancillary observation metadata forwarded with each search, mirroring the
/// detector's expected bookkeeping fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationInfo {
    pub pulsar: i32,
    pub pulsar_found: i32,
    pub pulsar_dm: f64,
    pub pulsar_snr: f64,
    pub pulsar_stats: Vec<f64>,
    pub rfi_level: f64,
    pub mean_sefd: f64,
    pub psrflux_sens: f64,
    pub sefds_val: Vec<f64>,
    pub sefds_freq: Vec<f64>,
    pub sefds_freq_up: Vec<f64>,
}

impl Default for ObservationInfo {
    fn default() -> Self {
        Self {
            pulsar: 0,
            pulsar_found: 0,
            pulsar_dm: 0.0,
            pulsar_snr: 0.0,
            pulsar_stats: vec![0.0; 6],
            rfi_level: 0.0,
            mean_sefd: 0.0,
            psrflux_sens: 0.0,
            sefds_val: vec![0.0],
            sefds_freq: vec![0.0],
            sefds_freq_up: vec![0.0],
        }
    }
}

/// One drift-search invocation over a persisted frame.
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    /// Filterbank file holding the frame to search.
    pub filterbank: &'a Path,
    /// Largest drift magnitude to search, Hz/s.
    pub max_drift: f64,
    /// Detection threshold.
    pub min_snr: f64,
    /// Directory receiving the `.dat`/`.log` outputs.
    pub out_dir: &'a Path,
    pub info: &'a ObservationInfo,
}

/// A drift-search detector run over persisted frames.
///
/// Implementations block until the search completes and leave a tabular hit
/// file named after the filterbank in the request's output directory.
pub trait DriftDetector {
    fn search(&self, request: &SearchRequest<'_>) -> Result<(), DetectError>;
}

/// Shells out to the external `turboSETI` command-line tool.
pub struct TurboSeti {
    command: String,
}

impl TurboSeti {
    pub fn new() -> Self {
        Self::with_command("turboSETI")
    }

    /// Uses an alternate executable that accepts turboSETI-style flags.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for TurboSeti {
    fn default() -> Self {
        Self::new()
    }
}

impl DriftDetector for TurboSeti {
    fn search(&self, request: &SearchRequest<'_>) -> Result<(), DetectError> {
        // the CLI does not consume the metadata; keep it next to the hits
        // for later bookkeeping
        let info_path = request.out_dir.join("obs_info.json");
        let encoded = serde_json::to_vec_pretty(request.info)?;
        fs::write(&info_path, encoded)?;

        info!(
            "running {} on {} (max_drift {}, snr {})",
            self.command,
            request.filterbank.display(),
            request.max_drift,
            request.min_snr
        );
        let status = Command::new(&self.command)
            .arg(request.filterbank)
            .arg("--max_drift")
            .arg(request.max_drift.to_string())
            .arg("--snr")
            .arg(request.min_snr.to_string())
            .arg("--out_dir")
            .arg(request.out_dir)
            .status()
            .map_err(|source| DetectError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DetectError::Failed { status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_executable_reports_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let detector = TurboSeti::with_command("definitely-not-a-real-detector");
        let info = ObservationInfo::default();
        let request = SearchRequest {
            filterbank: Path::new("frame.fil"),
            max_drift: 5.0,
            min_snr: 15.0,
            out_dir: dir.path(),
            info: &info,
        };
        let err = detector.search(&request).unwrap_err();
        assert!(matches!(err, DetectError::Spawn { .. }));
    }

    #[test]
    fn default_metadata_matches_detector_expectations() {
        let info = ObservationInfo::default();
        assert_eq!(info.pulsar_stats.len(), 6);
        assert_eq!(info.sefds_val, vec![0.0]);
    }
}
