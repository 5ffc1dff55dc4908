mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use liftoff_core::{RunToken, Topology};
use liftoff_deploy::{PipelineError, Status};

#[derive(Parser)]
#[command(name = "liftoff", about = "Deploy a containerized web service to Azure")]
#[command(version)]
struct Cli {
    /// Project directory holding the application and liftoff.toml
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Explicit liftoff.toml path (defaults to <project-dir>/liftoff.toml)
    #[arg(long, global = true, env = "LIFTOFF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision, publish, and deploy (the default command)
    Deploy(DeployArgs),
    /// Check local tooling and Azure readiness
    Doctor,
    /// Stream logs of a deployed service
    Logs {
        /// Run token printed by the deploy that created the service
        #[arg(long, env = "LIFTOFF_RUN_TOKEN")]
        run_token: RunToken,
        /// Deployment topology (container | app-service)
        #[arg(long, env = "LIFTOFF_TOPOLOGY")]
        topology: Option<Topology>,
        /// Keep streaming new log lines
        #[arg(long, short = 'f')]
        follow: bool,
    },
    /// Delete the resource group and everything in it
    Destroy {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
        /// Wait for the deletion to finish
        #[arg(long)]
        wait: bool,
    },
}

#[derive(clap::Args, Default)]
struct DeployArgs {
    /// Deployment topology (container | app-service)
    #[arg(long, env = "LIFTOFF_TOPOLOGY")]
    topology: Option<Topology>,
    /// Secret file, overriding [secrets].file
    #[arg(long, env = "LIFTOFF_SECRETS_FILE")]
    secrets_file: Option<PathBuf>,
    /// Reuse the names of an earlier run instead of minting a new token
    #[arg(long, env = "LIFTOFF_RUN_TOKEN")]
    run_token: Option<RunToken>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // stdout carries progress lines; diagnostics go to stderr.
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::new("info"),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", Status::Failed.line(&format!("{e:#}")));
            if let Some(retry) = e
                .downcast_ref::<PipelineError>()
                .and_then(PipelineError::retry_command)
            {
                println!("     re-run onto the same resources: {retry}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let project = commands::Project::new(cli.project_dir, cli.config);

    let command = match cli.command {
        Some(command) => command,
        None => Commands::Deploy(DeployArgs::default()),
    };

    match command {
        Commands::Deploy(args) => {
            commands::deploy(
                &project,
                commands::Overrides {
                    topology: args.topology,
                    secrets_file: args.secrets_file,
                    run_token: args.run_token,
                },
            )
            .await?
        }
        Commands::Doctor => commands::doctor(&project).await?,
        Commands::Logs {
            run_token,
            topology,
            follow,
        } => commands::logs(&project, run_token, topology, follow).await?,
        Commands::Destroy { yes, wait } => commands::destroy(&project, yes, wait).await?,
    }

    Ok(())
}
