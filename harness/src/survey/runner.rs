use crate::sampler::{sample_noise_params, NoiseDescriptor};
use crate::survey::config::SurveyConfig;
use anyhow::Context;
use driftcore::detect::{DriftDetector, Hit, HitTable, ObservationInfo, SearchRequest};
use driftcore::synth;
use driftcore::waterfall::Observation;
use driftcore::window::WindowPlan;
use driftcore::SignalDescriptor;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use std::{fs, io};
use tempfile::TempDir;

const FRAME_STEM: &str = "synthframe";

const DEFAULT_DRIFT: f64 = 0.0;
const DEFAULT_SNR: f64 = 40.0;
const DEFAULT_WIDTH: f64 = 40.0;

/// Ground truth and detector response for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryRecord {
    pub index: usize,
    pub num_recovered: usize,
    pub num_injected: usize,
    pub injected: SignalDescriptor,
    pub hits: HitTable,
    pub noise: NoiseDescriptor,
}

impl RecoveryRecord {
    /// Fraction of injected signals the detector reported.
    pub fn ratio(&self) -> f64 {
        self.num_recovered as f64 / self.num_injected as f64
    }

    /// First detector row; the placeholder row when nothing was detected.
    pub fn first_hit(&self) -> &Hit {
        self.hits.first()
    }
}

/// Drives the per-frame inject / persist / detect / compare loop.
#[derive(Clone)]
pub struct SurveyRunner {
    config: SurveyConfig,
}

impl SurveyRunner {
    pub fn new(config: SurveyConfig) -> Self {
        Self { config }
    }

    /// Sweeps every window of the plan, injecting one primary signal plus
    /// `num_injected - 1` noise signals per frame, and returns one recovery
    /// record per frame. A detector that fails or produces no output
    /// degrades that frame to zero recoveries instead of aborting the sweep.
    pub fn run<D: DriftDetector>(
        &self,
        observation: &Observation,
        plan: &WindowPlan,
        detector: &D,
    ) -> anyhow::Result<Vec<RecoveryRecord>> {
        let out_dir = TempDir::new().context("creating detector scratch directory")?;
        let fil_path = out_dir.path().join(format!("{FRAME_STEM}.fil"));
        let dat_path = fil_path.with_extension("dat");
        let log_path = fil_path.with_extension("log");

        let num_injected = self.config.num_injected.max(1);
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let info = ObservationInfo::default();
        let mut records = Vec::new();

        for (index, frame) in observation.windows(plan).enumerate() {
            let mut frame =
                frame.with_context(|| format!("reading window {index} of the observation"))?;

            let drift = per_frame(&self.config.drifts, index, DEFAULT_DRIFT);
            let snr = per_frame(&self.config.snrs, index, DEFAULT_SNR);
            let width = per_frame(&self.config.widths, index, DEFAULT_WIDTH);
            let snr_noise = per_frame(&self.config.snr_ratios, index, 0.5) * snr;

            let primary = SignalDescriptor {
                f_start_mhz: frame.center_frequency(),
                drift_hz_per_s: drift,
                snr,
                width_hz: width,
            };
            synth::inject(&mut frame, &primary);

            let mut noise = NoiseDescriptor::default();
            for _ in 1..num_injected {
                let (f_mhz, noise_drift) =
                    sample_noise_params(&frame, false, self.config.max_drift, &mut rng);
                noise = NoiseDescriptor {
                    f_mhz,
                    drift_hz_per_s: noise_drift,
                    snr: snr_noise,
                };
                synth::inject(
                    &mut frame,
                    &SignalDescriptor {
                        f_start_mhz: f_mhz,
                        drift_hz_per_s: noise_drift,
                        snr: snr_noise,
                        width_hz: width,
                    },
                );
            }

            frame
                .save_fil(&fil_path)
                .with_context(|| format!("persisting frame {index}"))?;
            remove_stale(&dat_path);
            remove_stale(&log_path);

            let request = SearchRequest {
                filterbank: &fil_path,
                max_drift: self.config.max_drift,
                min_snr: self.config.min_snr,
                out_dir: out_dir.path(),
                info: &info,
            };
            if let Err(err) = detector.search(&request) {
                warn!("frame {index}: detector failed: {err}");
            }

            let hits = read_hits(&dat_path, index);
            info!(
                "frame {index}: recovered {}/{} at {:.6} MHz",
                hits.recovered(),
                num_injected,
                primary.f_start_mhz
            );

            records.push(RecoveryRecord {
                index,
                num_recovered: hits.recovered(),
                num_injected,
                injected: primary,
                hits,
                noise,
            });
        }

        Ok(records)
    }
}

fn per_frame(overrides: &Option<Vec<f64>>, index: usize, default: f64) -> f64 {
    overrides
        .as_ref()
        .and_then(|values| values.get(index))
        .copied()
        .unwrap_or(default)
}

/// Best-effort cleanup of a prior run's detector output. Absence is the
/// expected case on the first frame.
fn remove_stale(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no stale {} to remove", path.display());
        }
        Err(err) => warn!("removing stale {}: {err}", path.display()),
    }
}

/// Reads and parses the detector's hit table, degrading to the placeholder
/// table when the file is absent or corrupt.
fn read_hits(dat_path: &Path, index: usize) -> HitTable {
    let text = match fs::read_to_string(dat_path) {
        Ok(text) => text,
        Err(err) => {
            report_missing_output(dat_path, index, &err);
            return HitTable::placeholder();
        }
    };
    match HitTable::parse(&text) {
        Ok(table) => table,
        Err(err) => {
            warn!("frame {index}: corrupt hit table: {err}");
            HitTable::placeholder()
        }
    }
}

fn report_missing_output(dat_path: &Path, index: usize, err: &io::Error) {
    if err.kind() == ErrorKind::NotFound {
        debug!("frame {index}: detector produced no output file");
    } else {
        warn!("frame {index}: reading {}: {err}", dat_path.display());
    }
}
