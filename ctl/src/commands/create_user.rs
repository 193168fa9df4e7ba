use anyhow::Context;
use clap::Parser;
use roster_common::params::CreateUserParams as UserInput;
use roster_db::storage::UserStore;

#[derive(Clone, Parser)]
pub struct CreateUserParams {
    #[clap(short, long)]
    pub name: String,

    #[clap(short, long)]
    pub email: String,
}

pub async fn create_user(
    stg: &impl UserStore,
    CreateUserParams { name, email }: CreateUserParams,
) -> anyhow::Result<()> {
    let new_user = UserInput::new(name, email)
        .validate()
        .context("Invalid user")?;

    let user = UserStore::create(stg, new_user).await?;

    println!("Created user with ID {}", user.id);

    Ok(())
}
