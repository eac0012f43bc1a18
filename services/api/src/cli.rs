use crate::demo::{
    run_completion_score, run_demo, run_roster_report, run_status_actions, DemoArgs, RosterArgs,
    ScoreArgs, StatusActionsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sme_lending::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SME Lending Back Office",
    about = "Run the SME lending workflow service or inspect workflows from the command line",
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
    /// Inspect the loan application status workflow
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommand,
    },
    /// Score entrepreneur onboarding completeness
    Onboarding {
        #[command(subcommand)]
        command: OnboardingCommand,
    },
    /// Walk an entrepreneur through onboarding and a loan application end to end
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum WorkflowCommand {
    /// List the actions available for a status value
    Actions(StatusActionsArgs),
}

#[derive(Subcommand, Debug)]
enum OnboardingCommand {
    /// Compute the completion percentage for one entrepreneur
    Score(ScoreArgs),
    /// Score every entrepreneur in a roster CSV export
    Roster(RosterArgs),
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
        Command::Workflow {
            command: WorkflowCommand::Actions(args),
        } => run_status_actions(args),
        Command::Onboarding {
            command: OnboardingCommand::Score(args),
        } => run_completion_score(args),
        Command::Onboarding {
            command: OnboardingCommand::Roster(args),
        } => run_roster_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
