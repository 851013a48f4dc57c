//! Command line: serve by default, plus config and backend checks

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::api::ApiClient;
use crate::config::{Config, VERSION};
use crate::form::EmptyFieldPolicy;

/// Serves the events dashboard, edit and search pages
#[derive(Parser, Debug)]
#[command(name = "events-web", version = VERSION, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or reset ~/.config/events-web/config.toml
    Config(ConfigArgs),
    /// Ask the events API for its listing using the effective config
    Check,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("action").required(true).args(["show", "path", "reset"])))]
pub struct ConfigArgs {
    /// Print the effective configuration (env > file > defaults)
    #[arg(long)]
    pub show: bool,

    /// Print the config file location
    #[arg(long)]
    pub path: bool,

    /// Rewrite the config file with defaults
    #[arg(long)]
    pub reset: bool,

    /// Don't ask before overwriting (with --reset)
    #[arg(long, requires = "reset")]
    pub yes: bool,
}

/// What `main` does once the command line is handled
#[derive(Debug, PartialEq, Eq)]
pub enum Next {
    Serve,
    Exit,
}

pub async fn run(command: Option<Command>) -> Result<Next> {
    match command {
        None => Ok(Next::Serve),
        Some(Command::Config(args)) => {
            config_command(&args)?;
            Ok(Next::Exit)
        }
        Some(Command::Check) => {
            check_backend().await?;
            Ok(Next::Exit)
        }
    }
}

fn config_path() -> Result<std::path::PathBuf> {
    Config::config_path().context("Could not determine config path (no home directory)")
}

fn config_command(args: &ConfigArgs) -> Result<()> {
    let path = config_path()?;

    if args.path {
        println!("{}", path.display());
    } else if args.show {
        let config = Config::from_env()?;
        let source = path.exists().then_some(path.as_path());
        print!("{}", describe(&config, source));
    } else if args.reset {
        let confirm = |p: &Path| args.yes || ask_overwrite(p);
        if reset(&path, confirm)? {
            println!("Config reset to defaults: {}", path.display());
        } else {
            println!("Aborted.");
        }
    }
    Ok(())
}

/// Effective configuration as TOML, headed by where it came from and
/// followed by what the form policy means for editors
pub fn describe(config: &Config, source: Option<&Path>) -> String {
    let source = match source {
        Some(path) => format!("# Source: {} (env overrides applied)", path.display()),
        None => "# Source: defaults (no config file)".to_string(),
    };
    let policy = match config.forms.empty_fields {
        EmptyFieldPolicy::Warn => "updates with empty fields are sent, with a warning",
        EmptyFieldPolicy::Block => "updates with empty fields are refused",
    };
    format!(
        "{}\n\n{}\n# Edit form: {}\n",
        source,
        config.to_toml(),
        policy
    )
}

/// Write the default config to `path`. Returns false if `confirm` declined
/// to overwrite an existing file.
pub fn reset(path: &Path, confirm: impl FnOnce(&Path) -> bool) -> Result<bool> {
    if path.exists() && !confirm(path) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    std::fs::write(path, Config::default().to_toml())
        .with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(true)
}

fn ask_overwrite(path: &Path) -> bool {
    eprint!("Config file exists at {}. Overwrite? [y/N] ", path.display());
    let _ = std::io::stderr().flush();

    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}

async fn check_backend() -> Result<()> {
    let config = Config::from_env()?;
    let api = ApiClient::new(
        &config.api_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let events = api
        .list_events()
        .await
        .with_context(|| format!("Events API at {} did not answer", api.base_url()))?;
    println!(
        "Events API at {} is up ({} event(s) listed)",
        api.base_url(),
        events.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_serves() {
        let cli = Cli::try_parse_from(["events-web"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_config_needs_exactly_one_action() {
        assert!(Cli::try_parse_from(["events-web", "config"]).is_err());
        assert!(Cli::try_parse_from(["events-web", "config", "--show", "--reset"]).is_err());

        let cli = Cli::try_parse_from(["events-web", "config", "--show"]).unwrap();
        match cli.command {
            Some(Command::Config(args)) => assert!(args.show && !args.reset && !args.path),
            other => panic!("expected config, got {:?}", other),
        }
    }

    #[test]
    fn test_yes_only_with_reset() {
        assert!(Cli::try_parse_from(["events-web", "config", "--show", "--yes"]).is_err());
        assert!(Cli::try_parse_from(["events-web", "config", "--reset", "--yes"]).is_ok());
    }

    #[test]
    fn test_check_subcommand() {
        let cli = Cli::try_parse_from(["events-web", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Check)));
    }

    #[test]
    fn test_describe_reports_source_and_policy() {
        let mut config = Config::default();
        let text = describe(&config, None);
        assert!(text.starts_with("# Source: defaults"));
        assert!(text.contains("api_url = \"http://localhost:1337\""));
        assert!(text.contains("sent, with a warning"));

        config.forms.empty_fields = EmptyFieldPolicy::Block;
        let text = describe(&config, Some(Path::new("/etc/events-web.toml")));
        assert!(text.contains("/etc/events-web.toml"));
        assert!(text.contains("are refused"));
    }

    #[test]
    fn test_reset_respects_confirmation() {
        let dir = std::env::temp_dir().join(format!("events-web-reset-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::remove_dir_all(&dir);

        // Fresh path: written without asking
        assert!(reset(&path, |_| panic!("nothing to overwrite")).unwrap());
        std::fs::write(&path, "api_url = \"http://mine\"").unwrap();

        assert!(!reset(&path, |_| false).unwrap());
        assert!(std::fs::read_to_string(&path).unwrap().contains("http://mine"));

        assert!(reset(&path, |_| true).unwrap());
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("http://localhost:1337"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
