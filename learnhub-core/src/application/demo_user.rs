use learnhub_model::{NewUser, User};
use tracing::info;

use super::unit_of_work::AppUnitOfWork;
use crate::error::{CoreError, Result};

/// Get-or-create the single user every request acts as. Runs once at startup.
pub async fn ensure_demo_user(
    uow: &AppUnitOfWork,
    name: &str,
    email: &str,
) -> Result<User> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() {
        return Err(CoreError::InvalidInput(
            "Demo user requires a name and an email".into(),
        ));
    }

    let user = uow
        .users
        .ensure_user(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "demo user ready");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::unit_of_work::test_support::Mocks;
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn ensures_user_by_email() {
        let mut mocks = Mocks::default();
        mocks
            .users
            .expect_ensure_user()
            .withf(|u| u.name == "Demo User" && u.email == "demo@learnhub.com")
            .times(1)
            .returning(|u| {
                Ok(User {
                    id: Uuid::new_v4(),
                    name: u.name.clone(),
                    email: u.email.clone(),
                    created_at: Utc::now(),
                })
            });
        let uow = mocks.build();

        let user = ensure_demo_user(&uow, " Demo User ", "demo@learnhub.com")
            .await
            .unwrap();
        assert_eq!(user.email, "demo@learnhub.com");
    }

    #[tokio::test]
    async fn blank_identity_is_rejected() {
        let mut mocks = Mocks::default();
        mocks.users.expect_ensure_user().never();
        let uow = mocks.build();

        assert!(ensure_demo_user(&uow, "", "demo@learnhub.com").await.is_err());
    }
}
