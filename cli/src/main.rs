use anyhow::Context;
use ccs_engine::{
    CombatAction, CombatLookup, CombatStrategy, LoadReport, MonsterRegistry, PreferenceStore,
    SessionConfig, StandardMacroSyntax, LAST_ADVENTURE,
};
use clap::{Parser, Subcommand};
use encoding_rs::Encoding;
use std::{fs, path::Path, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Subcommand)]
enum Cmd {
    /// Parse a combat script and report what was read
    Check {
        /// Path to the combat script
        file: PathBuf,
    },
    /// Rewrite a combat script in canonical form
    Fmt {
        /// Path to the combat script
        file: PathBuf,
        /// Overwrite the file instead of printing to stdout
        #[arg(long, default_value_t = false)]
        write: bool,
    },
    /// Show which section applies to an encounter
    Resolve {
        /// Path to the combat script
        file: PathBuf,
        /// Encounter text, usually the monster name
        encounter: String,
        /// Session config (YAML or JSON) with known monsters and preferences
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the last adventure location
        #[arg(long)]
        location: Option<String>,
        /// Only print the action for this round
        #[arg(long)]
        round: Option<u32>,
    },
    /// Serialize the parsed script to JSON (stdout)
    Dump {
        /// Path to the combat script
        file: PathBuf,
        /// Single-line JSON instead of pretty-printed
        #[arg(long, default_value_t = false)]
        compact: bool,
    },
}

#[derive(Parser)]
#[command(name = "ccs")]
#[command(about = "Custom combat script tool")]
struct Cli {
    /// Log parser decisions to stderr
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ccs_engine=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ccs_engine=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read script: {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        String::from_utf8(bytes).with_context(|| format!("script is not UTF-8: {}", path.display()))
    }
}

fn load_script(path: &Path) -> anyhow::Result<(CombatLookup, LoadReport)> {
    let text = read_text_auto(path)?;
    let mut lookup = CombatLookup::new();
    let report = lookup
        .load(text.as_bytes(), &StandardMacroSyntax)
        .with_context(|| format!("failed to parse script: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        sections = report.sections,
        actions = report.actions,
        "script loaded"
    );
    Ok((lookup, report))
}

fn render(lookup: &CombatLookup) -> anyhow::Result<String> {
    Ok(ccs_engine::render_script(lookup)?)
}

fn session(
    config: Option<&Path>,
    location: Option<String>,
) -> anyhow::Result<(MonsterRegistry, PreferenceStore)> {
    let cfg = match config {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    let (monsters, mut prefs) = cfg.into_collaborators();
    if let Some(location) = location {
        prefs.set_string(LAST_ADVENTURE, location);
    }
    Ok((monsters, prefs))
}

fn describe(action: &CombatAction) -> String {
    match action {
        CombatAction::Simple(text) => text.clone(),
        CombatAction::Macro(body) => format!("macro:\n{}", indent_lines(body)),
    }
}

fn indent_lines(body: &str) -> String {
    body.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_strategy(strategy: &CombatStrategy, round: Option<u32>) {
    match round {
        Some(round) => match strategy.action_for_round(round) {
            Some(action) => println!("round {}: {}", round, describe(action)),
            None => println!("round {}: (no action)", round),
        },
        None => {
            for entry in strategy.actions() {
                println!("round {}: {}", entry.round, describe(&entry.action));
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Cmd::Check { file } => {
            let (lookup, report) = load_script(&file)?;
            println!(
                "sections={} keys={} actions={} warnings={}",
                report.sections,
                lookup.len(),
                report.actions,
                report.warnings.len()
            );
            for warning in &report.warnings {
                println!("warning: {}", warning);
            }
        }
        Cmd::Fmt { file, write } => {
            let (lookup, _) = load_script(&file)?;
            let text = render(&lookup)?;
            if write {
                fs::write(&file, text)
                    .with_context(|| format!("failed to write script: {}", file.display()))?;
            } else {
                print!("{}", text);
            }
        }
        Cmd::Resolve {
            file,
            encounter,
            config,
            location,
            round,
        } => {
            let (lookup, _) = load_script(&file)?;
            let (monsters, prefs) = session(config.as_deref(), location)?;
            let (key, strategy) = lookup.resolve(&encounter, &monsters, &prefs);
            println!("key={}", key);
            match strategy {
                Some(strategy) => print_strategy(strategy, round),
                None => println!("no matching strategy found"),
            }
        }
        Cmd::Dump { file, compact } => {
            let (lookup, _) = load_script(&file)?;
            if compact {
                println!("{}", serde_json::to_string(&lookup)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&lookup)?);
            }
        }
    }
    Ok(())
}
