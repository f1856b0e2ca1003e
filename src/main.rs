// berri-mine - notices the commands you keep retyping
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use anyhow::{bail, Context};
use berri_mine_lib::{
    core::load_history_file,
    intelligence::Analyzer,
    to_json, CommandPattern, Config,
};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Grab whatever the user typed
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "analyze" => handle_analyze(&args[2..]).await,
        "search" => handle_search(&args[2..]).await,
        "version" | "-v" | "--version" => {
            println!("berri-mine v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subcommand {
    Analyze,
    Search,
}

impl Subcommand {
    fn name(self) -> &'static str {
        match self {
            Subcommand::Analyze => "analyze",
            Subcommand::Search => "search",
        }
    }
}

// Numeric overrides, each owned by exactly one subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Setting {
    MinFrequency,
    Top,
    Similarity,
    MinSeq,
    MaxSeq,
    MaxResults,
}

impl Setting {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "--min-frequency" => Some(Setting::MinFrequency),
            "--top" => Some(Setting::Top),
            "--similarity" => Some(Setting::Similarity),
            "--min-seq" => Some(Setting::MinSeq),
            "--max-seq" => Some(Setting::MaxSeq),
            "--max-results" => Some(Setting::MaxResults),
            _ => None,
        }
    }

    fn applies_to(self, subcommand: Subcommand) -> bool {
        match self {
            Setting::MinFrequency
            | Setting::Top
            | Setting::Similarity
            | Setting::MinSeq
            | Setting::MaxSeq => subcommand == Subcommand::Analyze,
            Setting::MaxResults => subcommand == Subcommand::Search,
        }
    }

    fn apply(self, config: &mut Config, value: usize) {
        match self {
            Setting::MinFrequency => config.mining.min_frequency = value,
            Setting::Top => config.mining.top = value,
            Setting::Similarity => config.mining.similarity_threshold = value,
            Setting::MinSeq => config.mining.min_sequence_length = value,
            Setting::MaxSeq => config.mining.max_sequence_length = value,
            Setting::MaxResults => config.search.max_results = value,
        }
    }
}

// Flags shared by both subcommands, plus whatever words are left over
#[derive(Debug, Default)]
struct Flags {
    json: bool,
    config_path: Option<PathBuf>,
    settings: Vec<(Setting, usize)>,
    positional: Vec<String>,
}

fn parse_flags(args: &[String], subcommand: Subcommand) -> anyhow::Result<Flags> {
    let mut flags = Flags::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "--json" {
            flags.json = true;
        } else if arg == "--config" {
            i += 1;
            let path = args.get(i).context("--config needs a path")?;
            flags.config_path = Some(PathBuf::from(path));
        } else if let Some(setting) = Setting::from_flag(arg) {
            if !setting.applies_to(subcommand) {
                bail!("{} doesn't apply to '{}'", arg, subcommand.name());
            }
            i += 1;
            let raw = args
                .get(i)
                .with_context(|| format!("{} needs a number", arg))?;
            let value = raw
                .parse::<usize>()
                .with_context(|| format!("{} expects a whole number, got '{}'", arg, raw))?;
            flags.settings.push((setting, value));
        } else {
            flags.positional.push(arg.to_string());
        }
        i += 1;
    }

    Ok(flags)
}

// Config file first, then command-line overrides on top
fn build_config(flags: &Flags) -> anyhow::Result<Config> {
    let mut config = Config::load(flags.config_path.as_deref())
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    for &(setting, value) in &flags.settings {
        setting.apply(&mut config, value);
    }

    Ok(config)
}

async fn handle_analyze(args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args, Subcommand::Analyze)?;
    let Some(history_path) = flags.positional.first() else {
        bail!("No history file provided. Usage: berri-mine analyze <history-file>");
    };

    let config = build_config(&flags)?;
    let analyzer = Analyzer::new(&config).map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let entries = load_history_file(Path::new(history_path), config.history_window)
        .await
        .with_context(|| format!("Failed to load history from {}", history_path))?;

    let report = analyzer.analyze(&entries);

    if flags.json {
        println!("{}", to_json(&report).map_err(|e| anyhow::anyhow!(e.user_message()))?);
        return Ok(());
    }

    println!("\nScanned {} commands", report.entries_scanned);
    println!("{}", "=".repeat(60));

    if report.patterns.is_empty() {
        println!(
            "No patterns used at least {} times. Try --min-frequency with a lower number.",
            config.mining.min_frequency
        );
    } else {
        println!(
            "Found {} pattern(s), {} of them sequences:",
            report.patterns_found, report.sequences_found
        );
        for (i, pattern) in report.patterns.iter().enumerate() {
            println!("\n{:3}. {} (used {} times)", i + 1, pattern.pattern, pattern.frequency);
            if let Some(steps) = step_line(pattern) {
                println!("     Steps: {}", steps);
            }
            if let Some(last) = pattern.last_used {
                println!("     Last used: {}", last.format("%Y-%m-%d %H:%M"));
            }
            if !pattern.variations.is_empty() {
                println!("     Also seen as: {}", pattern.variations.join(", "));
            }
        }
    }

    println!("\n{}", "=".repeat(60));

    Ok(())
}

// "a -> b -> c" for sequences, nothing for a single command
fn step_line(pattern: &CommandPattern) -> Option<String> {
    pattern
        .is_sequence()
        .then(|| pattern.steps().join(" -> "))
}

async fn handle_search(args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args, Subcommand::Search)?;
    if flags.positional.len() < 2 {
        bail!("Usage: berri-mine search <history-file> <query...>");
    }

    let history_path = &flags.positional[0];
    let query = flags.positional[1..].join(" ");

    let config = build_config(&flags)?;
    let analyzer = Analyzer::new(&config).map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let entries = load_history_file(Path::new(history_path), config.history_window)
        .await
        .with_context(|| format!("Failed to load history from {}", history_path))?;

    let results = analyzer.search(&entries, &query);

    if flags.json {
        println!("{}", to_json(&results).map_err(|e| anyhow::anyhow!(e.user_message()))?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No commands found matching '{}'", query);
    } else {
        println!("\nFound {} command(s) matching '{}':", results.len(), query);
        println!("{}", "=".repeat(60));
        for (i, result) in results.iter().enumerate() {
            println!(
                "{:3}. {} (score {:.3}, used {} times, line {})",
                i + 1,
                result.command,
                result.score,
                result.frequency,
                result.line_number
            );
        }
        println!("{}", "=".repeat(60));
    }

    Ok(())
}

fn print_usage() {
    println!(
        r#"berri-mine v{} - Finds the commands you keep retyping

USAGE:
    berri-mine <COMMAND> [OPTIONS]

COMMANDS:
    analyze <history-file>           Show repeated commands and sequences
    search <history-file> <query>    Find past commands matching a query
    version                          Show version
    help                             Show this help

ANALYZE OPTIONS:
    --min-frequency <N>    Minimum uses before something counts (default: 5)
    --top <N>              How many patterns to show (default: 20)
    --similarity <N>       Max edit distance for merging variants (default: 3)
    --min-seq <N>          Shortest sequence to look for (default: 2)
    --max-seq <N>          Longest sequence to look for (default: 5)

SEARCH OPTIONS:
    --max-results <N>      How many search hits to show (default: 10)

COMMON OPTIONS:
    --config <PATH>        Config file (default: ~/.config/berri-mine/config.toml)
    --json                 Print JSON instead of a listing

EXAMPLES:
    berri-mine analyze ~/.zsh_history --min-frequency 3
    berri-mine search ~/.bash_history docker compose
    RUST_LOG=debug berri-mine analyze ~/.bash_history --json
"#,
        env!("CARGO_PKG_VERSION")
    );
}
