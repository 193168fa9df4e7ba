use anyhow::Context;
use clap::{Parser, Subcommand};
use roster_db::storage::{Storage, sqlite::SqliteStorage};

use crate::commands::CreateUserParams;

mod commands;

#[derive(Parser)]
#[command(about = "Administrative tasks for a roster database")]
pub struct Args {
    #[clap(subcommand)]
    command: Command,

    #[clap(
        short = 'D',
        long,
        env = "ROSTER_DATABASE_URL",
        default_value = "roster.db"
    )]
    db_url: String,
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Apply any pending schema migrations.
    Migrate,

    #[command(name = "create-user")]
    CreateUser(CreateUserParams),

    /// Insert the demo users, skipping any whose email is already taken.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let stg = SqliteStorage::connect(&args.db_url, 1)
        .await
        .with_context(|| format!("Failed to open database {}", args.db_url))?;

    let applied = stg.migrate().await.context("Failed to migrate database")?;

    match args.command {
        Command::Migrate => println!("Applied {applied} migration(s)"),
        Command::CreateUser(params) => commands::create_user(&stg, params).await?,
        Command::Seed => {
            let created = commands::seed(&stg).await?;
            println!("Seeded {created} user(s)");
        }
    }

    Ok(())
}
