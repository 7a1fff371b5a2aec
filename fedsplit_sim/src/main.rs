//! fedsplit Split Simulator CLI
//!
//! Split a dataset across simulated federated clients, deterministically.

use clap::Parser;
use fedsplit_core::DEFAULT_SEED;
use fedsplit_env::{DivideConfig, InMemoryDataset, PartitionError, Result};
use fedsplit_sim::{SplitExport, SplitReport, SplitRunner, SyntheticDataset};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// fedsplit deterministic data split CLI
#[derive(Parser, Debug)]
#[command(name = "fedsplit-sim")]
#[command(about = "Split a dataset across simulated federated clients", long_about = None)]
struct Args {
    /// Partition seed
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    
    /// Number of clients for uniform partitioning
    #[arg(short, long, default_value = "10")]
    clients: usize,
    
    /// Number of synthetic samples (ignored with --manifest)
    #[arg(short = 'n', long, default_value = "1000")]
    samples: usize,
    
    /// Number of labels
    #[arg(short, long, default_value = "10")]
    labels: usize,
    
    /// Dataset manifest CSV (sample_name,label) instead of synthetic data
    #[arg(long)]
    manifest: Option<PathBuf>,
    
    /// Client trace CSV (client_id,sample_name,...); switches to trace partitioning
    #[arg(long, conflicts_with = "write_trace")]
    trace: Option<PathBuf>,
    
    /// Generate a synthetic trace over --clients clients, then partition by it
    #[arg(long)]
    write_trace: Option<PathBuf>,
    
    /// JSON configuration file (task, test_ratio, num_loaders)
    #[arg(long)]
    config: Option<PathBuf>,
    
    /// Override the configured test ratio
    #[arg(long)]
    test_ratio: Option<f64>,
    
    /// Training batch size
    #[arg(short, long, default_value = "32")]
    batch_size: usize,
    
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
    
    /// JSON output for scripting
    #[arg(long)]
    json: bool,
    
    /// Export the report to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn load_config(args: &Args) -> Result<DivideConfig> {
    let mut config = match &args.config {
        Some(path) => DivideConfig::from_json_file(path)?,
        None => DivideConfig::default(),
    };
    if let Some(ratio) = args.test_ratio {
        config = config.with_test_ratio(ratio);
        config.validate()?;
    }
    Ok(config)
}

fn print_summary(report: &SplitReport) {
    info!("");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        "{} split (seed={}): {} samples -> {} clients",
        report.strategy,
        report.seed,
        report.data_len,
        report.clients.len()
    );
    for client in &report.clients {
        info!(
            "  client {:>4}: train={:>6} test={:>6} batches={:>4} labels={:?}",
            client.client_id,
            client.train_samples,
            client.test_samples,
            client.train_batches,
            client.label_counts
        );
    }
    info!(
        "Assigned {} / {} samples ({} unassigned)",
        report.total_assigned, report.data_len, report.unassigned
    );
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    
    // Data seed is derived separately so the population never changes the data
    let data_seed = args.seed.wrapping_mul(0x9e3779b97f4a7c15);
    let synthetic = SyntheticDataset::new(data_seed)
        .with_samples(args.samples)
        .with_labels(args.labels);
    
    let (dataset, source) = match &args.manifest {
        Some(path) => (
            InMemoryDataset::from_manifest(path)?,
            path.display().to_string(),
        ),
        None => (synthetic.build(), "synthetic".to_string()),
    };
    
    let mut runner = SplitRunner::new(args.seed, args.clients)
        .with_config(config.clone())
        .with_num_of_labels(args.labels)
        .with_batch_size(args.batch_size);
    
    if let Some(path) = &args.write_trace {
        if args.manifest.is_some() {
            return Err(PartitionError::config(
                "--write-trace generates identities for synthetic data only",
            ));
        }
        synthetic.write_trace(path, args.clients)?;
        info!("Wrote synthetic trace to {}", path.display());
        runner = runner.with_trace(path);
    } else if let Some(path) = &args.trace {
        runner = runner.with_trace(path);
    }
    
    let report = runner.run(Arc::new(dataset))?;
    
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    
    if let Some(export_path) = &args.export {
        let export = SplitExport::new(config, &source, report);
        export
            .write_to_file(export_path)
            .map_err(|e| PartitionError::io(export_path, e))?;
        info!("Exported report to {}", export_path);
    }
    
    Ok(())
}

fn main() {
    let args = Args::parse();
    
    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
    
    if let Err(e) = run(&args) {
        error!("✗ {}", e);
        std::process::exit(1);
    }
}
