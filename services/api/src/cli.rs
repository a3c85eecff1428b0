use crate::commands::{run_assessment, run_offence_check, AssessArgs, OffenceCheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use reoffending_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Reoffending Risk Service",
    about = "Score reoffending-risk instruments over HTTP or from the command line",
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
    /// Score one assessment request read from a JSON file
    Assess(AssessArgs),
    /// Work with offence reference data
    Offences {
        #[command(subcommand)]
        command: OffencesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum OffencesCommand {
    /// Validate an offence weighting CSV without installing it
    Check(OffenceCheckArgs),
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
        Command::Assess(args) => run_assessment(args),
        Command::Offences {
            command: OffencesCommand::Check(args),
        } => run_offence_check(args),
    }
}
