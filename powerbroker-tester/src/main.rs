mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{
    CampaignRecord, GameplayStrategy, SimulationConfig, StrategySummary, iteration_seed,
    resolve_seed_inputs, run_campaign, summarize,
};
use powerbroker_game::{CampaignEngine, Difficulty, EmbeddedContent};

#[derive(Debug, Parser)]
#[command(name = "powerbroker-tester", version = "0.1.0")]
#[command(about = "Automated balance and QA runs for Power Broker campaign logic")]
struct Args {
    /// Seeds to run (comma-separated integers or start..end ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of campaigns per seed and strategy
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Difficulty preset for every run
    #[arg(long, default_value_t = Difficulty::TossUp)]
    difficulty: Difficulty,

    /// Strategies to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    if !json_on_stdout(&args) {
        announce_banner();
    }

    let start_time = Instant::now();
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let strategies = expand_strategies(&args.strategies)?;
    let engine = CampaignEngine::from_source(&EmbeddedContent)
        .context("failed to load embedded campaign content")?;

    let records = run_simulations(&args, &engine, &strategies, &seeds);
    let summaries = summarize(&records);
    write_reports(&args, &summaries, start_time)?;

    if summaries.iter().any(|s| !s.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in GameplayStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:15} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🗳️  Power Broker Campaign Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

/// The JSON report owns stdout, so chatter has to stay off it.
fn json_on_stdout(args: &Args) -> bool {
    args.report == "json" && args.output.is_none()
}

fn progress(args: &Args, line: &str) {
    if json_on_stdout(args) {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn expand_strategies(arg: &str) -> Result<Vec<GameplayStrategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(arg) {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
            continue;
        }
        let strategy: GameplayStrategy = token
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid --strategies entry {token:?}"))?;
        strategies.push(strategy);
    }
    strategies.sort_unstable();
    strategies.dedup();
    if strategies.is_empty() {
        strategies.push(GameplayStrategy::Balanced);
    }
    Ok(strategies)
}

fn run_simulations(
    args: &Args,
    engine: &CampaignEngine,
    strategies: &[GameplayStrategy],
    seeds: &[u64],
) -> Vec<CampaignRecord> {
    let mut records = Vec::with_capacity(strategies.len() * seeds.len() * args.iterations);
    for &strategy in strategies {
        if args.verbose {
            progress(
                args,
                &format!(
                    "🧪 Running strategy: {} ({} seeds × {} iterations)",
                    strategy.label().bright_white(),
                    seeds.len(),
                    args.iterations
                ),
            );
        }
        for &seed in seeds {
            for iteration in 0..args.iterations {
                let config =
                    SimulationConfig::new(args.difficulty, strategy, iteration_seed(seed, iteration));
                let record = run_campaign(engine, config);
                if args.verbose {
                    let outcome = if record.won { "won".green() } else { "lost".red() };
                    progress(
                        args,
                        &format!(
                            "   seed {:>20}: {outcome} by {:+.2} (grade {})",
                            record.seed, record.margin, record.grade
                        ),
                    );
                }
                records.push(record);
            }
        }
    }
    records
}

fn write_reports(args: &Args, summaries: &[StrategySummary], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            logic::reports::generate_json_report(&mut output_target, summaries)?;
        }
        "markdown" => {
            if summaries.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Power Broker Simulation Results\n\n_No campaigns executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, summaries)?;
            }
        }
        _ => {
            if summaries.is_empty() {
                writeln!(&mut output_target, "No campaigns executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    summaries,
                    start_time.elapsed(),
                )?;
            }
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
