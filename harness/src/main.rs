use anyhow::Context;
use clap::Parser;
use driftcore::prelude::{Observation, TurboSeti, WindowPlan};
use log::info;
use std::fs;
use std::path::PathBuf;
use survey::config::SurveyConfig;
use survey::runner::SurveyRunner;

mod report;
mod sampler;
mod survey;

#[derive(Parser)]
#[command(author, version, about = "Narrowband injection-and-recovery survey driver")]
struct Args {
    /// Filterbank observation providing the background data
    #[arg(long)]
    observation: Option<PathBuf>,
    /// Load a survey config from YAML instead of individual flags
    #[arg(long)]
    survey: Option<PathBuf>,
    /// Window width in channels
    #[arg(long, default_value_t = 1024)]
    fchans: usize,
    /// Lower frequency bound of the sweep, MHz
    #[arg(long)]
    f_begin: Option<f64>,
    /// Upper frequency bound of the sweep, MHz
    #[arg(long)]
    f_end: Option<f64>,
    /// Cursor step in channels (defaults to fchans)
    #[arg(long)]
    f_shift: Option<usize>,
    #[arg(long, default_value_t = 5.0)]
    max_drift: f64,
    #[arg(long, default_value_t = 15.0)]
    min_snr: f64,
    /// Total signals injected per frame, primary included
    #[arg(long, default_value_t = 1)]
    num_injected: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Detector executable (must accept turboSETI-style flags)
    #[arg(long, default_value = "turboSETI")]
    detector: String,
    /// Write the recovery records as JSON to this path
    #[arg(long)]
    records_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.survey {
        SurveyConfig::load(path)?
    } else {
        let observation = args
            .observation
            .context("either --survey or --observation is required")?;
        SurveyConfig::from_args(
            observation,
            args.fchans,
            args.f_begin,
            args.f_end,
            args.f_shift,
            args.max_drift,
            args.min_snr,
            args.num_injected,
            args.seed,
            args.detector,
            args.records_out,
        )
    };

    let observation = Observation::open(&config.observation)
        .with_context(|| format!("opening observation {}", config.observation.display()))?;
    let plan = WindowPlan::new(
        observation.header(),
        config.fchans,
        config.f_begin,
        config.f_end,
        config.f_shift,
    );
    info!(
        "sweeping {} windows over [{:.6}, {:.6}] MHz",
        plan.count(),
        plan.f_begin(),
        plan.f_end()
    );

    let detector = TurboSeti::with_command(&config.detector);
    let runner = SurveyRunner::new(config.clone());
    let records = runner
        .run(&observation, &plan, &detector)
        .context("running the injection-and-recovery sweep")?;

    report::print_table(&records);

    if let Some(path) = &config.records_out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let encoded = serde_json::to_vec_pretty(&records).context("encoding recovery records")?;
        fs::write(path, encoded)
            .with_context(|| format!("writing recovery records to {}", path.display()))?;
        info!("wrote {} recovery records to {}", records.len(), path.display());
    }

    Ok(())
}
