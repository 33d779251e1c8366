//! Replay a scripted editing session and print the resulting state as JSON.

use anyhow::Context;
use clap::Parser;
use composer::{run_script, ComposerConfig, Script};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "composer-replay", about = "Replay composer editing scripts", version)]
struct Cli {
    /// Script file (reads stdin when omitted or `-`)
    script: Option<PathBuf>,

    /// Undo stack capacity, overriding COMPOSER_HISTORY_LIMIT
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    history_limit: Option<u32>,

    /// Pretty-print the JSON report
    #[arg(short, long)]
    pretty: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("composer=info,composer_core=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn read_script(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read script from stdin")?;
            Ok(input)
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ComposerConfig::from_env()?;
    if let Some(limit) = cli.history_limit {
        config = config.with_history_limit(limit as usize);
    }
    tracing::debug!(?config, "loaded configuration");

    let input = read_script(cli.script.as_ref())?;
    let script = Script::from_json(&input)?;
    let report = run_script(&script, config)?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let cli = Cli::parse_from(["composer-replay", "session.json", "--history-limit", "5"]);
        assert_eq!(cli.script, Some(PathBuf::from("session.json")));
        assert_eq!(cli.history_limit, Some(5));
        assert!(!cli.pretty);
    }

    #[test]
    fn rejects_zero_history_limit() {
        assert!(Cli::try_parse_from(["composer-replay", "--history-limit", "0"]).is_err());
    }
}
