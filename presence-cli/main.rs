//! presence CLI: decide which candidate images contain the reference object.

use clap::{Args, Parser, Subcommand, ValueEnum};
use presence_cli::presence_metrics::{ClassificationReport, MedianPolicy, ThresholdStrategy};
use presence_cli::{
    parse_candidate_arg, render_report, PipelineConfig, PointsInput, PresencePipeline,
};
use presence_core::CandidateId;
use std::path::{Path, PathBuf};
use std::time::Instant;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "presence")]
#[command(about = "Classify candidate images by corner distance to a reference image")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect corners in images and classify the candidates.
    Classify(ClassifyArgs),

    /// Classify pre-extracted corner sets from a JSON file.
    Points(PointsArgs),

    /// Write the default pipeline configuration.
    Config {
        /// Output path (.toml or .json). Prints TOML to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct TuningArgs {
    /// Pipeline configuration file (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the historical median indexing.
    #[arg(long)]
    legacy_median: bool,

    /// Threshold strategy override.
    #[arg(long, value_enum)]
    threshold: Option<ThresholdArg>,

    /// Run candidates sequentially.
    #[arg(long)]
    sequential: bool,

    /// Path to write the classification report (JSON).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ClassifyArgs {
    /// Reference image.
    #[arg(long)]
    reference: PathBuf,

    /// Candidate image as LABEL=PATH, or PATH labelled by its file stem. Repeatable.
    #[arg(long = "candidate", required = true, value_parser = parse_candidate_arg)]
    candidates: Vec<(CandidateId, PathBuf)>,

    /// Directory to write images with their corners drawn.
    #[arg(long)]
    annotate_dir: Option<PathBuf>,

    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Debug, Clone, Args)]
struct PointsArgs {
    /// JSON file with `reference` and `candidates` corner sets.
    #[arg(long)]
    input: PathBuf,

    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThresholdArg {
    NestedPairwise,
    Mean,
}

impl From<ThresholdArg> for ThresholdStrategy {
    fn from(arg: ThresholdArg) -> Self {
        match arg {
            ThresholdArg::NestedPairwise => ThresholdStrategy::NestedPairwise,
            ThresholdArg::Mean => ThresholdStrategy::Mean,
        }
    }
}

fn build_config(args: &TuningArgs) -> CliResult<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if args.legacy_median {
        config.classifier.median_policy = MedianPolicy::Legacy;
    }
    if let Some(threshold) = args.threshold {
        config.classifier.threshold_strategy = threshold.into();
    }
    if args.sequential {
        config.classifier.parallel = false;
    }
    config.validate()?;
    log::debug!("{}", config.summary());
    Ok(config)
}

fn finish(report: &ClassificationReport, out: Option<&Path>) -> CliResult<()> {
    print!("{}", render_report(report));
    if let Some(path) = out {
        std::fs::write(path, serde_json::to_string_pretty(report)?)?;
        log::info!("wrote report to {}", path.display());
    }
    Ok(())
}

fn run_classify(args: &ClassifyArgs) -> CliResult<()> {
    let pipeline = PresencePipeline::new(build_config(&args.tuning)?)?;

    let t0 = Instant::now();
    let run = pipeline.run(&args.reference, &args.candidates)?;
    log::info!("classified {} candidates in {:.2?}", args.candidates.len(), t0.elapsed());

    if let Some(dir) = &args.annotate_dir {
        let reference_label = args
            .reference
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("reference");
        let written = run.save_annotated(dir, reference_label)?;
        log::info!("wrote {} annotated images to {}", written.len(), dir.display());
    }

    finish(&run.report, args.tuning.out.as_deref())
}

fn run_points(args: &PointsArgs) -> CliResult<()> {
    let pipeline = PresencePipeline::new(build_config(&args.tuning)?)?;
    let input = PointsInput::load(&args.input)?;
    let report = pipeline.classify_input(&input)?;
    finish(&report, args.tuning.out.as_deref())
}

fn run_config(out: Option<&Path>) -> CliResult<()> {
    let config = PipelineConfig::default();
    match out {
        Some(path) => {
            config.save(path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify(args) => run_classify(&args),
        Commands::Points(args) => run_points(&args),
        Commands::Config { out } => run_config(out.as_deref()),
    }
}
