mod common;
mod loader;
mod logic;
mod quiz_bank;
mod storage;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use farmxplore_game::Language;
use farmxplore_game::streak::local_today;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::scenario::{Scenario, get_scenario, list_scenarios};
use common::{parse_day, split_csv};
use logic::{LogicTester, RunSettings, ScenarioResult, TesterAssets};

#[derive(Debug, Parser)]
#[command(name = "farmxplore-tester", version = "0.1.0")]
#[command(about = "Scripted play-throughs against the FarmXplore progression core")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds for the scripted players (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Directory that receives one saved profile per scenario and seed
    #[arg(long, default_value = "target/farmxplore-profiles")]
    profile_dir: PathBuf,

    /// Calendar day the runs start on (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    today: Option<String>,

    /// Directory with dataset, rewards and quiz bank files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Level catalog JSON replacing the built-in levels
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Quiz language
    #[arg(long, default_value = "en")]
    #[arg(value_parser = ["en", "fr"])]
    language: String,

    /// Report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = resolve_seeds(&split_csv(&args.seeds))?;
    let settings = run_settings(&args)?;
    let assets = TesterAssets::load(args.catalog.as_deref(), args.data_dir.as_deref())?;

    let all_results = run_logic_scenarios(&args, &scenarios, &seeds, &assets, &settings).await;

    write_reports(&args, &all_results, start_time)?;

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🌾 FarmXplore Scenario Tester".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for scenario in Scenario::ALL {
            if !scenarios.iter().any(|s| s == scenario.key()) {
                scenarios.push(scenario.key().to_string());
            }
        }
    }
    scenarios
}

fn resolve_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in tokens {
        let seed: u64 = token
            .parse()
            .with_context(|| format!("invalid seed '{token}'"))?;
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    Ok(seeds)
}

fn run_settings(args: &Args) -> Result<RunSettings> {
    let today = match &args.today {
        Some(day) => parse_day(day)?,
        None => local_today(),
    };
    Ok(RunSettings {
        profile_root: args.profile_dir.clone(),
        today,
        language: Language::from_code(&args.language),
    })
}

async fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    assets: &TesterAssets,
    settings: &RunSettings,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        let Some(scenario) = get_scenario(scenario_name) else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
            continue;
        };
        results.push(tester.run_scenario(assets, scenario, seeds, settings).await);
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(&mut output_target, "# FarmXplore Scenario Results\n")?;
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
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
