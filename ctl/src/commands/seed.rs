use roster_common::params::CreateUserParams;
use roster_db::storage::{StoreError, UserStore};

/// Users inserted by `rosterctl seed`.
pub const DEMO_USERS: &[(&str, &str)] = &[
    ("Alice Johnson", "alice@example.com"),
    ("Bob Smith", "bob@example.com"),
    ("Charlie Davis", "charlie@example.com"),
];

/// Insert [`DEMO_USERS`] and return how many were new.
pub async fn seed(stg: &impl UserStore) -> anyhow::Result<usize> {
    let mut created = 0;

    for &(name, email) in DEMO_USERS {
        let new_user = CreateUserParams::new(name, email).validate()?;

        match UserStore::create(stg, new_user).await {
            Ok(user) => {
                println!("Created {} <{}> with ID {}", user.name, user.email, user.id);
                created += 1;
            }
            Err(StoreError::UniqueViolation { .. }) => {
                println!("Skipped {email}, already present");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(created)
}
