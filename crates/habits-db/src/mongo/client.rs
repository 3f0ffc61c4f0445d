//! MongoDB connection and collection handles

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use tracing::{info, instrument};

use habits_common::DatabaseConfig;
use habits_core::error::DomainError;
use habits_core::traits::{RepoResult, Store};

use super::documents::{CREATED_AT, EMAIL_ADDRESS, USER_ID};
use super::error::{run, within, OP_TIMEOUT};

/// Sessions expire with the refresh token they carry
const SESSION_TTL: Duration = Duration::from_secs(86_400);

/// Store backed by a MongoDB deployment
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    pub(super) users: Collection<Document>,
    pub(super) sessions: Collection<Document>,
    pub(super) habits: Collection<Document>,
}

impl MongoStore {
    /// Connect, verify the deployment answers a ping and ensure indexes exist
    ///
    /// # Errors
    /// Returns `ConnectionError` if the URL is empty or the server is unreachable
    #[instrument(skip(config), fields(db = %config.name))]
    pub async fn connect(config: &DatabaseConfig) -> RepoResult<Self> {
        if config.url.trim().is_empty() {
            return Err(DomainError::ConnectionError(
                "connection string is empty".to_string(),
            ));
        }

        let client = within("connect", OP_TIMEOUT, async {
            Client::with_uri_str(&config.url)
                .await
                .map_err(|e| DomainError::ConnectionError(e.to_string()))
        })
        .await?;

        let database = client.database(&config.name);
        let store = Self {
            users: database.collection(&config.users_collection),
            sessions: database.collection(&config.sessions_collection),
            habits: database.collection(&config.habits_collection),
            client,
        };

        store.ping().await.map_err(|e| match e {
            DomainError::DatabaseError(msg) => DomainError::ConnectionError(msg),
            other => other,
        })?;
        info!("Connected to MongoDB");

        store.ensure_indexes().await?;

        Ok(store)
    }

    async fn ping(&self) -> RepoResult<()> {
        run(
            "ping",
            self.client.database("admin").run_command(doc! { "ping": 1 }),
        )
        .await
        .map(|_| ())
    }

    /// Session TTL, unique email addresses and the habit owner lookup
    async fn ensure_indexes(&self) -> RepoResult<()> {
        let session_ttl = IndexModel::builder()
            .keys(doc! { CREATED_AT: 1 })
            .options(IndexOptions::builder().expire_after(SESSION_TTL).build())
            .build();
        run("create session TTL index", self.sessions.create_index(session_ttl)).await?;

        let unique_email = IndexModel::builder()
            .keys(doc! { EMAIL_ADDRESS: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        run("create email index", self.users.create_index(unique_email)).await?;

        let habit_owner = IndexModel::builder().keys(doc! { USER_ID: 1 }).build();
        run("create habit owner index", self.habits.create_index(habit_owner)).await?;

        info!(ttl_secs = SESSION_TTL.as_secs(), "Indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl Store for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn health_check(&self) -> RepoResult<()> {
        self.ping().await
    }

    async fn disconnect(&self) -> RepoResult<()> {
        self.client.clone().shutdown().await;
        info!("Disconnected from MongoDB");
        Ok(())
    }
}

