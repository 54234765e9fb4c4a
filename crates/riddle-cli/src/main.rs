mod play;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use riddle_content::{QuizDocument, load_trace};
use riddle_core::{ShakeConfig, ShakeDetector};

/// Exit status after Ctrl-C, 128 + SIGINT.
const INTERRUPTED_STATUS: i32 = 130;

#[derive(Parser)]
#[command(name = "riddle", about = "Riddle quiz with a shake-gesture bonus")]
struct Cli {
    /// Quiz document to use instead of RIDDLE_QUIZ or the built-in quiz
    #[arg(long, global = true)]
    quiz: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the quiz on stdin/stdout
    Play {
        /// Replay a recorded accelerometer trace (JSON Lines) while playing
        #[arg(long)]
        trace: Option<PathBuf>,
    },

    /// Run a recorded trace through the shake detector
    Detect {
        /// Trace file (JSON Lines)
        trace: PathBuf,

        /// Override the shake threshold (g)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Validate the quiz document and print a summary
    Check,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn open_quiz(cli: &Cli) -> Result<QuizDocument> {
    QuizDocument::resolve(cli.quiz.as_deref()).context("failed to load quiz")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Play { trace } => cmd_play(&cli, trace.as_deref()).await,
        Commands::Detect { trace, threshold } => cmd_detect(&cli, trace, *threshold),
        Commands::Check => cmd_check(&cli),
    }
}

async fn cmd_play(cli: &Cli, trace: Option<&Path>) -> Result<()> {
    let doc = open_quiz(cli)?;
    let samples = trace
        .map(|path| {
            load_trace(path).with_context(|| format!("failed to load trace {}", path.display()))
        })
        .transpose()?;
    match play::run(doc, samples).await? {
        play::Exit::Done => Ok(()),
        // The pending stdin read cannot be cancelled, and runtime shutdown
        // would wait on it until the next line of input.
        play::Exit::Interrupted => std::process::exit(INTERRUPTED_STATUS),
    }
}

fn cmd_detect(cli: &Cli, trace: &Path, threshold: Option<f64>) -> Result<()> {
    let doc = open_quiz(cli)?;
    let config = ShakeConfig {
        threshold_g: threshold.unwrap_or(doc.shake.threshold_g),
        ..doc.shake
    };
    anyhow::ensure!(
        config.threshold_g.is_finite() && config.threshold_g > 0.0,
        "threshold must be a positive number"
    );

    let samples = load_trace(trace)
        .with_context(|| format!("failed to load trace {}", trace.display()))?;
    let mut detector = ShakeDetector::silent(config);

    let mut shakes = 0usize;
    for sample in &samples {
        if detector.on_sample(sample) {
            shakes += 1;
            println!(
                "shake at {}ms (count {})",
                sample.timestamp_ms,
                detector.state().shake_count
            );
        }
    }

    println!("samples:  {}", samples.len());
    println!("shakes:   {shakes}");
    println!(
        "config:   threshold={}g debounce={}ms reset={}ms gravity={}",
        config.threshold_g, config.debounce_ms, config.reset_window_ms, config.gravity
    );
    Ok(())
}

fn cmd_check(cli: &Cli) -> Result<()> {
    let doc = open_quiz(cli)?;
    let bonus = doc
        .content
        .items()
        .iter()
        .filter(|i| i.bonus_image.is_some())
        .count();

    println!("title:      {}", doc.title);
    println!("questions:  {}", doc.content.len());
    println!("bonus:      {bonus}");
    println!(
        "shake:      threshold={}g debounce={}ms reset={}ms",
        doc.shake.threshold_g, doc.shake.debounce_ms, doc.shake.reset_window_ms
    );
    println!("advance:    {:?}", doc.options.advance);
    println!("retry hint: {:?}", doc.options.retry_hint);
    Ok(())
}
