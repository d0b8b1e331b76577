//! mcs CLI - Manage Claude settings safely across user edits and upgrades.

use clap::Parser;
use mcs::cli::{Cli, Commands, ConfigCommands, ProjectCommands, SettingsCommands};
use mcs::commands::{self, Output, SettingsContext};
use mcs::config::{
    ConfigOverrides, ConflictPolicy, OutputFormat, ResolvedConfig, project_config_path,
    resolve_config, system_config_path,
};
use mcs::project::find_project_root;
use mcs::version::{self, VersionInfo};
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding tracing filter directives.
const LOG_ENV: &str = "MCS_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let human_flag = cli.human_readable;

    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Determine project root: --project flag > MCS_PROJECT env > auto-detect
    let explicit_project = match cli.project_path {
        Some(path) => Some(existing_path(path, human_flag)),
        None => None,
    };
    let project_root = explicit_project
        .clone()
        .or_else(|| find_project_root(&cwd));

    let mut overrides = ConfigOverrides::new();
    if let Some(dir) = cli.claude_dir {
        overrides = overrides.with_claude_dir(dir);
    }
    if human_flag {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    if let Commands::Settings {
        command:
            SettingsCommands::Apply {
                overwrite_unmanaged: true,
                ..
            },
    } = cli.command
    {
        overrides = overrides.with_conflict_policy(ConflictPolicy::Overwrite);
    }

    let config = match resolve_config(project_root.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => fail(&e.to_string(), human_flag),
    };
    let human = config.output_format() == OutputFormat::Human;

    let roots = Roots {
        explicit: explicit_project.as_deref(),
        detected: project_root.as_deref(),
        cwd: &cwd,
    };
    if let Err(e) = run_command(cli.command, &roots, &config, human) {
        fail(&e.to_string(), human);
    }
}

/// Install the stderr tracing subscriber.
///
/// Filter directives come from `MCS_LOG`, then `RUST_LOG`, defaulting to `warn`
/// so stdout stays machine-readable.
fn init_tracing() {
    let filter = env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}

/// Verify an explicitly requested project path exists, exiting otherwise.
///
/// The path is used literally, without walking up to a project root.
fn existing_path(path: PathBuf, human: bool) -> PathBuf {
    if !path.exists() {
        fail(
            &format!("Specified project path does not exist: {}", path.display()),
            human,
        );
    }
    path
}

/// Print an error in the selected format and exit with status 1.
fn fail(message: &str, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", message);
    } else {
        eprintln!("{}", serde_json::json!({ "error": message }));
    }
    process::exit(1);
}

struct Roots<'a> {
    explicit: Option<&'a Path>,
    detected: Option<&'a Path>,
    cwd: &'a Path,
}

impl Roots<'_> {
    fn require(&self) -> Result<&Path, mcs::Error> {
        self.detected.ok_or_else(|| {
            mcs::Error::NotFound(format!(
                "no project root (.git or CLAUDE.local.md) above {}; use -C <path>",
                self.cwd.display()
            ))
        })
    }
}

fn run_command(
    command: Commands,
    roots: &Roots<'_>,
    config: &ResolvedConfig,
    human: bool,
) -> Result<(), mcs::Error> {
    match command {
        Commands::Settings { command } => {
            let ctx = SettingsContext::from_config(config, version::CURRENT);
            match command {
                SettingsCommands::Apply {
                    template, dry_run, ..
                } => {
                    let result = commands::settings_apply(&ctx, &template, dry_run)?;
                    output(&result, human);
                }
                SettingsCommands::Status => {
                    let result = commands::settings_status(&ctx)?;
                    output(&result, human);
                }
                SettingsCommands::Stale { template } => {
                    let result = commands::settings_stale(&ctx, &template)?;
                    output(&result, human);
                }
                SettingsCommands::Release { keys } => {
                    let result = commands::settings_release(&ctx, &keys)?;
                    output(&result, human);
                }
            }
        }

        Commands::Project { command } => match command {
            ProjectCommands::Root => {
                let result = commands::project_root(roots.explicit, roots.cwd)?;
                output(&result, human);
            }
            ProjectCommands::Packs => {
                let result = commands::project_packs(roots.require()?)?;
                output(&result, human);
            }
            ProjectCommands::AddPack { pack } => {
                let result = commands::project_add_pack(roots.require()?, &pack, version::CURRENT)?;
                output(&result, human);
            }
        },

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let result = commands::config_show(
                    config,
                    system_config_path(),
                    roots.detected.map(project_config_path),
                )?;
                output(&result, human);
            }
            ConfigCommands::Init { force } => {
                let path = system_config_path().ok_or_else(|| {
                    mcs::Error::NotFound("no config directory for this platform".to_string())
                })?;
                let result = commands::config_init(&path, config, force)?;
                output(&result, human);
            }
        },

        Commands::Version => output(&VersionInfo::current(), human),
    }

    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
