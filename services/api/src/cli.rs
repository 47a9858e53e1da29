use crate::demo::{run_demo, run_leave_check, run_training_stats, LeaveCheckArgs, TrainingStatsArgs};
use crate::server;
use agniveer_portal::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Agniveer Portal",
    about = "Leave accounting and training assessment services for the Agniveer portal",
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
    /// Check a leave application against an exported leave history
    Leave {
        #[command(subcommand)]
        command: LeaveCommand,
    },
    /// Summarise an exported training calendar
    Training {
        #[command(subcommand)]
        command: TrainingCommand,
    },
    /// Walk through leave, result entry, and grievance flows with sample data
    Demo,
}

#[derive(Subcommand, Debug)]
enum LeaveCommand {
    /// Print the balance and the accept/reject decision for a date range
    Check(LeaveCheckArgs),
}

#[derive(Subcommand, Debug)]
enum TrainingCommand {
    /// Print dashboard counters for a training schedule export
    Stats(TrainingStatsArgs),
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
        Command::Leave {
            command: LeaveCommand::Check(args),
        } => run_leave_check(args),
        Command::Training {
            command: TrainingCommand::Stats(args),
        } => run_training_stats(args),
        Command::Demo => run_demo(),
    }
}
