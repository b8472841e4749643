//! Development and operator CLI for the names engine — talks to
//! Postgres directly rather than through the service's HTTP surface.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod context;
mod notifier;

use context::Context;

#[derive(Parser)]
#[command(name = "names")]
#[command(about = "Names engine CLI for testing and operations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identity commands.
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Daily-plan commands.
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Quiz session commands.
    Quiz {
        #[command(subcommand)]
        command: QuizCommands,
    },
    /// Reminder-dispatch commands.
    Reminder {
        #[command(subcommand)]
        command: ReminderCommands,
    },
    /// Settings commands.
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Confirmation-gated wipe of a user's progress, plan, and sessions.
    Reset { user_id: String },
}

#[derive(Subcommand)]
enum UserCommands {
    Ensure { user_id: String, chat_id: String },
}

#[derive(Subcommand)]
enum PlanCommands {
    Show { user_id: String },
    Ensure { user_id: String },
}

#[derive(Subcommand)]
enum QuizCommands {
    Start {
        user_id: String,
        #[arg(default_value_t = 5)]
        total: u32,
    },
    Current {
        session_id: String,
        question_num: u32,
    },
    Submit {
        session_id: String,
        user_id: String,
        option_index: String,
    },
}

#[derive(Subcommand)]
enum ReminderCommands {
    Tick,
    Snooze { user_id: String },
    Disable { user_id: String },
}

#[derive(Subcommand)]
enum SettingsCommands {
    Show { user_id: String },
    UpdateNamesPerDay { user_id: String, value: u8 },
    UpdateQuizMode { user_id: String, value: String },
    UpdateLearningMode { user_id: String, value: String },
    UpdateTimezone { user_id: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let cli = Cli::parse();
    let ctx = Context::connect().await?;

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Ensure { user_id, chat_id } => {
                commands::user::ensure(&ctx, &user_id, &chat_id).await?;
            }
        },
        Commands::Plan { command } => match command {
            PlanCommands::Show { user_id } => commands::plan::show(&ctx, &user_id).await?,
            PlanCommands::Ensure { user_id } => commands::plan::ensure(&ctx, &user_id).await?,
        },
        Commands::Quiz { command } => match command {
            QuizCommands::Start { user_id, total } => {
                commands::quiz::start(&ctx, &user_id, total).await?
            }
            QuizCommands::Current {
                session_id,
                question_num,
            } => commands::quiz::current(&ctx, &session_id, question_num).await?,
            QuizCommands::Submit {
                session_id,
                user_id,
                option_index,
            } => commands::quiz::submit(&ctx, &session_id, &user_id, &option_index).await?,
        },
        Commands::Reminder { command } => match command {
            ReminderCommands::Tick => commands::reminder::tick(&ctx).await?,
            ReminderCommands::Snooze { user_id } => commands::reminder::snooze(&ctx, &user_id).await?,
            ReminderCommands::Disable { user_id } => commands::reminder::disable(&ctx, &user_id).await?,
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show { user_id } => commands::settings::show(&ctx, &user_id).await?,
            SettingsCommands::UpdateNamesPerDay { user_id, value } => {
                commands::settings::update_names_per_day(&ctx, &user_id, value).await?
            }
            SettingsCommands::UpdateQuizMode { user_id, value } => {
                commands::settings::update_quiz_mode(&ctx, &user_id, &value).await?
            }
            SettingsCommands::UpdateLearningMode { user_id, value } => {
                commands::settings::update_learning_mode(&ctx, &user_id, &value).await?
            }
            SettingsCommands::UpdateTimezone { user_id, value } => {
                commands::settings::update_timezone(&ctx, &user_id, &value).await?
            }
        },
        Commands::Reset { user_id } => commands::reset::run(&ctx, &user_id).await?,
    }

    Ok(())
}
