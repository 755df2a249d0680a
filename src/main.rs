use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use ssi_pipeline::{Pipeline, analysis, reader, writer};

/// Clean an SSI surveillance CSV and report on the imputation
#[derive(Debug, Parser)]
#[command(name = "ssi-pipeline", version, about)]
struct Cli {
    /// Input surveillance CSV (header row required, UTF-8)
    input: PathBuf,

    /// Write the enriched table to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the aggregate summary to this JSON file
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// Run Welch's t-test comparing SIR between low- and high-volume cohorts
    #[arg(long)]
    t_test: bool,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut records = reader::read_csv(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    info!("Loaded {} rows from {}", records.len(), cli.input.display());

    let pipeline = Pipeline::default();
    let report = pipeline.run(&mut records);
    print!("{report}");

    let summary = analysis::summarize(&records);
    print!("{summary}");

    if cli.t_test {
        match analysis::sir_volume_cohorts(&records)
            .and_then(|(low, high)| analysis::welch_t_test(&low, &high))
        {
            Some(test) => println!(
                "Welch's t-test (low vs high volume): t={:.4}, df={:.2}, p={:.4} \
                 (n={}/{}, means {:.3}/{:.3})",
                test.t, test.df, test.p_value, test.n_a, test.n_b, test.mean_a, test.mean_b
            ),
            None => warn!("Welch's t-test not computable on this table"),
        }
    }

    if let Some(path) = &cli.summary {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        info!("Wrote summary to {}", path.display());
    }

    if let Some(path) = &cli.output {
        writer::write_csv(path, &records)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote enriched table to {}", path.display());
    }

    Ok(())
}
