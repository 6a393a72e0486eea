use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use log::{LevelFilter, info, error};
use env_logger::Builder;

use fastq_stats::cli::parse;
use fastq_stats::config::defs::RunConfig;
use fastq_stats::pipelines::qc_stats;
use fastq_stats::utils::system::check_worker_budget;


#[tokio::main]
async fn main() -> Result<()> {
    let run_start = Instant::now();

    let args = parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let run_config = match RunConfig::from_args(&args) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Pipeline failed: {}", e);
            std::process::exit(1);
        }
    };
    check_worker_budget(run_config.workers);

    match qc_stats::run(run_config).await {
        Ok(stats) => {
            println!("\nAnalysis Summary:");
            println!("{}", stats);
        }
        Err(e) => {
            error!("Pipeline failed: {} at {} milliseconds.", e, run_start.elapsed().as_millis());
            std::process::exit(1);
        }
    }

    info!("Run complete: {} milliseconds.", run_start.elapsed().as_millis());
    Ok(())
}
