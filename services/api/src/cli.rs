use crate::demo::{run_demo, run_levels, run_progress, DemoArgs, ProgressArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use deal_rewards::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Deal Rewards",
    about = "Run and explore the deals community points, levels and achievements service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the level table with point ranges and benefits
    Levels,
    /// Show the level and progress for a point total
    Progress(ProgressArgs),
    /// Run an end-to-end demo against in-memory profiles
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Levels => run_levels(),
        Command::Progress(args) => run_progress(args),
        Command::Demo(args) => run_demo(args),
    }
}
