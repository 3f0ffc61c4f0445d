//! MongoDB implementation of HabitRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use tracing::instrument;

use habits_core::entities::{Habit, NewHabit};
use habits_core::error::DomainError;
use habits_core::traits::{HabitRepository, RepoResult};

use super::client::MongoStore;
use super::documents::{decode_habit, habit_update, new_habit_document, now, ID, USER_ID};
use super::error::{
    habit_object_id, map_mongo_error, run, user_object_id, within, BULK_TIMEOUT,
};

fn habit_not_found(id: &str) -> DomainError {
    DomainError::HabitNotFound(id.to_string())
}

impl MongoStore {
    /// Filter matching one habit of one owner, `None` if the habit id is malformed
    fn owned_habit_filter(user_id: &str, habit_id: &str) -> RepoResult<Option<Document>> {
        let owner = user_object_id(user_id)?;
        Ok(habit_object_id(habit_id).map(|id| doc! { ID: id, USER_ID: owner }))
    }
}

#[async_trait]
impl HabitRepository for MongoStore {
    #[instrument(skip(self, habit))]
    async fn create_habit(&self, user_id: &str, habit: &NewHabit) -> RepoResult<Habit> {
        let owner = user_object_id(user_id)?;
        let created_at = now();

        let result = run(
            "create habit",
            self.habits
                .insert_one(new_habit_document(owner, habit, created_at)),
        )
        .await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            DomainError::DatabaseError("insert returned a non-ObjectId key".to_string())
        })?;

        Ok(Habit {
            id: id.to_hex(),
            user_id: user_id.to_string(),
            created_at,
            name: habit.name.clone(),
            days: habit.days,
            days_target: habit.days_target,
            completion_dates: Vec::new(),
        })
    }

    #[instrument(skip(self))]
    async fn find_habit(&self, user_id: &str, habit_id: &str) -> RepoResult<Option<Habit>> {
        let Some(filter) = Self::owned_habit_filter(user_id, habit_id)? else {
            return Ok(None);
        };

        run("find habit", self.habits.find_one(filter))
            .await?
            .as_ref()
            .map(decode_habit)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_habits(&self, user_id: &str) -> RepoResult<Vec<Habit>> {
        let owner = user_object_id(user_id)?;

        let documents: Vec<Document> = run("find habits", async {
            let cursor = self.habits.find(doc! { USER_ID: owner }).await?;
            cursor.try_collect::<Vec<Document>>().await
        })
        .await?;

        documents.iter().map(decode_habit).collect()
    }

    #[instrument(skip(self, habit), fields(habit_id = %habit.id))]
    async fn update_habit(&self, user_id: &str, habit: &Habit) -> RepoResult<()> {
        let Some(filter) = Self::owned_habit_filter(user_id, &habit.id)? else {
            return Err(habit_not_found(&habit.id));
        };

        let result = run(
            "update habit",
            self.habits.update_one(filter, habit_update(habit)),
        )
        .await?;

        if result.matched_count == 0 {
            return Err(habit_not_found(&habit.id));
        }

        Ok(())
    }

    #[instrument(skip(self, habits), fields(count = habits.len()))]
    async fn update_habits(&self, user_id: &str, habits: &[Habit]) -> RepoResult<()> {
        // Resolve every filter up front so a malformed id writes nothing
        let updates = habits
            .iter()
            .map(|habit| {
                Self::owned_habit_filter(user_id, &habit.id)?
                    .map(|filter| (filter, habit_update(habit), habit.id.as_str()))
                    .ok_or_else(|| habit_not_found(&habit.id))
            })
            .collect::<RepoResult<Vec<_>>>()?;

        within("update habits", BULK_TIMEOUT, async {
            for (filter, update, id) in updates {
                let result = self
                    .habits
                    .update_one(filter, update)
                    .await
                    .map_err(map_mongo_error)?;

                if result.matched_count == 0 {
                    return Err(habit_not_found(id));
                }
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_habit(&self, user_id: &str, habit_id: &str) -> RepoResult<()> {
        let Some(filter) = Self::owned_habit_filter(user_id, habit_id)? else {
            return Err(habit_not_found(habit_id));
        };

        let result = run("delete habit", self.habits.delete_one(filter)).await?;

        if result.deleted_count == 0 {
            return Err(habit_not_found(habit_id));
        }

        Ok(())
    }
}
