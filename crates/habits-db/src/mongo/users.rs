//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::bson::doc;
use tracing::instrument;

use habits_core::entities::{NewUser, User};
use habits_core::error::DomainError;
use habits_core::traits::{RepoResult, UserRepository};

use super::client::MongoStore;
use super::documents::{decode_user, new_user_document, EMAIL_ADDRESS};
use super::error::{map_unique_violation, run, within, OP_TIMEOUT};

#[async_trait]
impl UserRepository for MongoStore {
    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        run(
            "find user",
            self.users.find_one(doc! { EMAIL_ADDRESS: email }),
        )
        .await?
        .as_ref()
        .map(decode_user)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let count = run(
            "count users",
            self.users
                .count_documents(doc! { EMAIL_ADDRESS: email })
                .limit(1),
        )
        .await?;

        Ok(count > 0)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        let document = new_user_document(user);

        let result = within("create user", OP_TIMEOUT, async {
            self.users
                .insert_one(document)
                .await
                .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))
        })
        .await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            DomainError::DatabaseError("insert returned a non-ObjectId key".to_string())
        })?;

        Ok(User {
            id: id.to_hex(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
            last_login: None,
            is_logged_in: false,
        })
    }
}
