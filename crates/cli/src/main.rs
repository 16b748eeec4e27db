mod cmd;
mod completions;
mod logging;
mod prompt;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::engine::ArgValueCompleter;
use clap_complete::CompleteEnv;
use provisio_core::config::{ConfigLoader, ResolvedConfig};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "provisio", version, about = "Interactive scaffolding for cloud query provisioning")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    /// Echo every command and append a transcript to the debug log
    #[arg(long, global = true)]
    debug: bool,

    /// Never erase command output from the terminal
    #[arg(long, global = true)]
    diagnostic: bool,

    /// Never prompt; use defaults or fail on missing answers
    #[arg(long, global = true)]
    batch: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// Discover macros in a query directory and resolve their values
    Resolve(ResolveArgs),

    /// Run one command through the command runner
    Exec(ExecArgs),

    /// Resolve every namespace and generate (optionally run) provisioning scripts
    Provision(ProvisionArgs),
}

#[derive(Debug, Args)]
pub struct AnswerArgs {
    /// Previously saved answers to start from
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Write all collected answers to this file when done
    #[arg(long)]
    pub save_answers: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Directory containing query files
    pub dir: PathBuf,

    /// Cache namespace (defaults to the directory name)
    #[arg(long)]
    pub namespace: Option<String>,

    #[command(flatten)]
    pub answers: AnswerArgs,
}

#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Shell command line to run
    pub command: String,

    /// Do not print stderr of a failed command
    #[arg(long)]
    pub silent: bool,

    /// Keep echoed output on screen
    #[arg(long)]
    pub keep_output: bool,

    /// Capture output without echoing it live
    #[arg(long)]
    pub no_realtime: bool,

    /// Show a spinner with this message while the command runs
    #[arg(long)]
    pub spinner: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Only provision this namespace
    #[arg(long, add = ArgValueCompleter::new(completions::complete_namespaces))]
    pub only: Option<String>,

    /// Choose the namespace interactively
    #[arg(long, conflicts_with = "only")]
    pub pick: bool,

    /// Write scripts here instead of the configured scripts_dir
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Run the generated scripts after confirmation
    #[arg(long)]
    pub run: bool,

    #[command(flatten)]
    pub answers: AnswerArgs,
}

#[tokio::main]
async fn main() {
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile, cli.debug, cli.diagnostic),
        Commands::Resolve(args) => {
            let cfg = load_config(config, profile, cli.debug, cli.diagnostic);
            cmd::resolve::run(&cfg, &args, cli.batch).await;
        }
        Commands::Exec(args) => {
            let cfg = load_config(config, profile, cli.debug, cli.diagnostic);
            cmd::exec::run(&cfg, &args).await;
        }
        Commands::Provision(args) => {
            let cfg = load_config(config, profile, cli.debug, cli.diagnostic);
            cmd::provision::run(&cfg, &args, cli.batch).await;
        }
    }
}

/// Load the config and start logging, exiting on failure.
fn load_config(
    config: Option<&Path>,
    profile: Option<&str>,
    debug: bool,
    diagnostic: bool,
) -> ResolvedConfig {
    match ConfigLoader::load(config, profile) {
        Ok(cfg) => {
            let cfg = cfg.with_runner_overrides(debug, diagnostic);
            logging::init(&cfg);
            cfg
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
