//! MongoDB implementation of SessionRepository
//!
//! A login touches two collections. MongoDB offers no transaction on a
//! standalone deployment, so a failed user update is compensated by removing
//! the session that was just written.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use tracing::{instrument, warn};

use habits_core::entities::UserSession;
use habits_core::error::DomainError;
use habits_core::traits::{RepoResult, SessionRepository};

use super::client::MongoStore;
use super::documents::{
    decode_session, session_document, to_bson_datetime, ID, IS_LOGGED_IN, LAST_LOGIN,
};
use super::error::{run, user_object_id};

impl MongoStore {
    async fn mark_logged_in(&self, owner: ObjectId, session: &UserSession) -> RepoResult<()> {
        let update = doc! {
            "$set": {
                LAST_LOGIN: to_bson_datetime(session.created_at),
                IS_LOGGED_IN: true,
            }
        };

        let result = run(
            "mark user logged in",
            self.users.update_one(doc! { ID: owner }, update),
        )
        .await?;

        if result.matched_count == 0 {
            return Err(DomainError::UserNotFound(session.user_id.clone()));
        }

        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MongoStore {
    #[instrument(skip(self))]
    async fn find_session(&self, user_id: &str) -> RepoResult<Option<UserSession>> {
        let owner = user_object_id(user_id)?;

        run("find session", self.sessions.find_one(doc! { ID: owner }))
            .await?
            .as_ref()
            .map(decode_session)
            .transpose()
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    async fn login(&self, session: &UserSession) -> RepoResult<()> {
        let owner = user_object_id(&session.user_id)?;

        // Upsert so a stale session for the same user is replaced
        run(
            "insert session",
            self.sessions
                .replace_one(doc! { ID: owner }, session_document(owner, session))
                .upsert(true),
        )
        .await?;

        if let Err(e) = self.mark_logged_in(owner, session).await {
            if let Err(cleanup) = run(
                "remove orphaned session",
                self.sessions.delete_one(doc! { ID: owner }),
            )
            .await
            {
                warn!(error = %cleanup, "Failed to remove session after login failure");
            }
            return Err(e);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn logout(&self, user_id: &str) -> RepoResult<()> {
        let owner = user_object_id(user_id)?;

        let deleted = run("delete session", self.sessions.delete_one(doc! { ID: owner })).await?;
        if deleted.deleted_count == 0 {
            return Err(DomainError::SessionNotFound(user_id.to_string()));
        }

        let result = run(
            "mark user logged out",
            self.users
                .update_one(doc! { ID: owner }, doc! { "$set": { IS_LOGGED_IN: false } }),
        )
        .await?;

        if result.matched_count == 0 {
            return Err(DomainError::UserNotFound(user_id.to_string()));
        }

        Ok(())
    }
}
