//! fp-synth - Main Entry Point
//!
//! Command line front end for the fingerprint synthesizer. It handles CLI
//! argument parsing, configuration loading, corpus loading and writing the
//! generated records.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fingerprint_synth::{
    config::{CliArgs, SynthSettings},
    synth::{GenerationMode, GenerationOptions, GenerationResult, SynthSession},
    NAME, VERSION,
};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
}

/// Print the startup banner with version
fn print_banner() {
    println!(
        "{cyan}{bold}{name}{reset} {dim}v{version} - browser fingerprint synthesis{reset}",
        cyan = colors::CYAN,
        bold = colors::BOLD,
        reset = colors::RESET,
        dim = colors::DIM,
        name = NAME,
        version = VERSION
    );
    println!();
}

/// Print configuration summary
fn print_config_summary(settings: &SynthSettings) {
    println!(
        "{bold}{blue}Configuration:{reset}",
        bold = colors::BOLD,
        blue = colors::BLUE,
        reset = colors::RESET
    );
    println!(
        "  {dim}Corpus:{reset}         {}",
        settings.corpus_dir.display(),
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Tables:{reset}         {}",
        settings.tables_dir.display(),
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Mode:{reset}           {}",
        settings.mode,
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Seed:{reset}           {}",
        match settings.seed {
            Some(ref seed) => format!("{green}{}{reset}", seed, green = colors::GREEN, reset = colors::RESET),
            None => format!("{yellow}random{reset}", yellow = colors::YELLOW, reset = colors::RESET),
        },
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Count:{reset}          {}",
        settings.count,
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Output:{reset}         {}",
        if settings.write_output {
            settings.output_dir.display().to_string()
        } else {
            "stdout".to_string()
        },
        dim = colors::DIM,
        reset = colors::RESET
    );

    if settings.include_synthetic {
        println!(
            "  {dim}Corpus filter:{reset}  {yellow}including synthetic records{reset}",
            dim = colors::DIM,
            yellow = colors::YELLOW,
            reset = colors::RESET
        );
    }

    println!();
}

/// Build the CLI command parser
fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .about("Synthesizes plausible browser fingerprints from a corpus of real ones")
        .long_about(
            "fp-synth generates browser fingerprint records featuring:\n\
             - Pure synthesis from weighted, independently sampled parts\n\
             - Seeded mutation of real corpus records\n\
             - OS/browser compatibility guarantees\n\
             - Reproducible output from a seed",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file (TOML or JSON)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("corpus")
                .long("corpus")
                .value_name("DIR")
                .help("Directory of real fingerprint documents (default: data/corpus)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("tables")
                .long("tables")
                .value_name("DIR")
                .help("Directory of weight tables (default: data/tables)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Directory generated records are written to (default: data/synthetic)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Generation mode")
                .value_parser(["pure", "seeded"]),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("TEXT")
                .help("Seed for reproducible output"),
        )
        .arg(
            Arg::new("count")
                .short('n')
                .long("count")
                .value_name("N")
                .help("Number of records to generate")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("include-synthetic")
                .long("include-synthetic")
                .help("Keep synthetic-tagged documents in the corpus")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Print records as JSON instead of writing files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress output except errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

/// Parse CLI arguments into CliArgs struct
fn parse_cli_args(matches: &clap::ArgMatches) -> CliArgs {
    let mut args = CliArgs::default();

    args.config_file = matches.get_one::<PathBuf>("config").cloned();
    args.corpus_dir = matches.get_one::<PathBuf>("corpus").cloned();
    args.tables_dir = matches.get_one::<PathBuf>("tables").cloned();
    args.output_dir = matches.get_one::<PathBuf>("output").cloned();
    args.seed = matches.get_one::<String>("seed").cloned();
    args.count = matches.get_one::<usize>("count").copied();

    // The value parser only admits known modes
    args.mode = matches
        .get_one::<String>("mode")
        .and_then(|mode| mode.parse::<GenerationMode>().ok());

    if matches.get_flag("include-synthetic") {
        args.include_synthetic = Some(true);
    }

    if matches.get_flag("stdout") {
        args.write_output = Some(false);
    }

    args
}

/// Initialize the tracing/logging subsystem
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    // Logs go to stderr so `--stdout` output stays valid JSON
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Write one record to the output directory
async fn write_result(settings: &SynthSettings, result: &GenerationResult) -> Result<PathBuf> {
    let path = settings.output_dir.join(&result.filename);
    let json = serde_json::to_string_pretty(&result.record)
        .context("Failed to serialize fingerprint record")?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Print one line per generated record
fn report_result(path: &str, result: &GenerationResult) {
    let warnings = result.metadata.warnings.len();
    println!(
        "{green}✓{reset} {} {dim}({} on {}, {}){reset}",
        path,
        result.metadata.browser,
        result.metadata.os_category,
        if warnings == 0 {
            "no warnings".to_string()
        } else {
            format!("{yellow}{} warnings{reset}", warnings, yellow = colors::YELLOW, reset = colors::RESET)
        },
        green = colors::GREEN,
        dim = colors::DIM,
        reset = colors::RESET
    );
}

/// Main application entry point
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let matches = build_cli().get_matches();

    // Get verbosity settings before loading config
    let verbosity = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");

    // Initialize logging
    init_tracing(verbosity, quiet);

    // Convert matches to CliArgs
    let cli_args = parse_cli_args(&matches);

    // Load configuration with full precedence chain
    let settings = cli_args
        .load_settings()
        .context("Failed to load configuration")?;

    // Banner and summary would corrupt JSON on stdout
    let chatty = !quiet && settings.write_output;
    if chatty {
        print_banner();
        print_config_summary(&settings);
    }

    info!("Loading corpus from {}...", settings.corpus_dir.display());
    let session = SynthSession::load(&settings)
        .await
        .context("Failed to load fingerprint corpus")?;

    let mut options = GenerationOptions::new(settings.mode);
    options.seed = settings.seed.clone();

    let results = session.generate_batch(&options, settings.count);

    if settings.write_output {
        tokio::fs::create_dir_all(&settings.output_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create output directory {}",
                    settings.output_dir.display()
                )
            })?;

        for result in &results {
            let path = write_result(&settings, result).await?;
            if chatty {
                report_result(&path.display().to_string(), result);
            }
        }
    } else {
        let records: Vec<_> = results.iter().map(|r| &r.record).collect();
        let json = if records.len() == 1 {
            serde_json::to_string_pretty(records[0])
        } else {
            serde_json::to_string_pretty(&records)
        }
        .context("Failed to serialize fingerprint records")?;
        println!("{}", json);
    }

    let duplicates = results.iter().filter(|r| r.metadata.duplicates_corpus).count();
    if duplicates > 0 {
        warn!("{} generated records duplicate corpus records", duplicates);
    }
    info!("Generated {} fingerprint records", results.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cmd = build_cli();

        let matches = cmd
            .clone()
            .try_get_matches_from(["fp-synth", "--mode", "seeded", "--stdout"])
            .unwrap();

        assert_eq!(matches.get_one::<String>("mode").map(String::as_str), Some("seeded"));
        assert!(matches.get_flag("stdout"));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let cmd = build_cli();
        let result = cmd.try_get_matches_from(["fp-synth", "--mode", "chaotic"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_conflicts() {
        let cmd = build_cli();

        // quiet and verbose should conflict
        let result = cmd.try_get_matches_from(["fp-synth", "-q", "-v"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cli_args() {
        let cmd = build_cli();
        let matches = cmd
            .try_get_matches_from([
                "fp-synth",
                "--corpus",
                "/srv/corpus",
                "-o",
                "/tmp/out",
                "-m",
                "seeded",
                "--seed",
                "demo",
                "-n",
                "5",
                "--include-synthetic",
            ])
            .unwrap();

        let args = parse_cli_args(&matches);

        assert_eq!(args.corpus_dir, Some(PathBuf::from("/srv/corpus")));
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(args.mode, Some(GenerationMode::Seeded));
        assert_eq!(args.seed.as_deref(), Some("demo"));
        assert_eq!(args.count, Some(5));
        assert_eq!(args.include_synthetic, Some(true));
        assert_eq!(args.write_output, None);
    }
}
