//! Habit service
//!
//! Every operation resolves the caller from their email address and runs
//! while holding the context's habit gate.

use habits_core::entities::{Habit, HabitChanges, NewHabit, User};
use habits_core::error::DomainError;
use habits_core::validation::validate_habit;
use tracing::{info, instrument};

use crate::dto::{
    BulkHabitUpdate, CreateHabitRequest, CreatedHabitResponse, HabitResponse, UpdateHabitRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Habit service
pub struct HabitService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HabitService<'a> {
    /// Create a new HabitService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a habit for the caller
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        email: &str,
        request: CreateHabitRequest,
    ) -> ServiceResult<CreatedHabitResponse> {
        let _gate = self.ctx.habit_gate().lock().await;
        let owner = self.owner(email).await?;

        let habit = NewHabit::from(request);
        validate_habit(&habit)?;

        let created = self.ctx.habit_repo().create_habit(&owner.id, &habit).await?;

        info!(habit_id = %created.id, "Habit created");
        Ok(CreatedHabitResponse::from(&created))
    }

    /// Fetch one of the caller's habits
    #[instrument(skip(self))]
    pub async fn get(&self, email: &str, habit_id: &str) -> ServiceResult<HabitResponse> {
        let _gate = self.ctx.habit_gate().lock().await;
        let owner = self.owner(email).await?;

        self.find(&owner, habit_id).await.map(HabitResponse::from)
    }

    /// List the caller's habits
    #[instrument(skip(self))]
    pub async fn list(&self, email: &str) -> ServiceResult<Vec<HabitResponse>> {
        let _gate = self.ctx.habit_gate().lock().await;
        let owner = self.owner(email).await?;

        let habits = self.ctx.habit_repo().find_habits(&owner.id).await?;
        Ok(habits.into_iter().map(HabitResponse::from).collect())
    }

    /// Apply a partial update to one habit
    ///
    /// Absent fields keep their stored values; the merged habit must pass
    /// validation before it is written.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        email: &str,
        habit_id: &str,
        request: UpdateHabitRequest,
    ) -> ServiceResult<HabitResponse> {
        let _gate = self.ctx.habit_gate().lock().await;
        let owner = self.owner(email).await?;

        let merged = self
            .find(&owner, habit_id)
            .await?
            .merged(HabitChanges::from(request));
        validate_habit(&merged)?;

        self.ctx.habit_repo().update_habit(&owner.id, &merged).await?;

        info!(habit_id = %merged.id, "Habit updated");
        Ok(HabitResponse::from(merged))
    }

    /// Apply partial updates to several habits
    ///
    /// Every entry is merged and validated before anything is written.
    /// Entries naming the same habit are applied in order onto one record.
    #[instrument(skip(self, updates), fields(count = updates.len()))]
    pub async fn update_many(
        &self,
        email: &str,
        updates: Vec<BulkHabitUpdate>,
    ) -> ServiceResult<Vec<HabitResponse>> {
        let _gate = self.ctx.habit_gate().lock().await;
        let owner = self.owner(email).await?;

        let mut merged: Vec<Habit> = Vec::with_capacity(updates.len());
        for update in updates {
            if update.habit_id.trim().is_empty() {
                return Err(ServiceError::validation("habitId is required"));
            }

            let changes = HabitChanges::from(update.changes);
            match merged.iter_mut().find(|h| h.id == update.habit_id) {
                Some(pending) => *pending = pending.merged(changes),
                None => {
                    let habit = self.find(&owner, &update.habit_id).await?;
                    merged.push(habit.merged(changes));
                }
            }
        }

        for habit in &merged {
            validate_habit(habit)?;
        }

        if merged.is_empty() {
            return Ok(Vec::new());
        }

        self.ctx.habit_repo().update_habits(&owner.id, &merged).await?;

        info!(count = merged.len(), "Habits updated");
        Ok(merged.into_iter().map(HabitResponse::from).collect())
    }

    /// Delete one of the caller's habits
    #[instrument(skip(self))]
    pub async fn delete(&self, email: &str, habit_id: &str) -> ServiceResult<()> {
        let _gate = self.ctx.habit_gate().lock().await;
        let owner = self.owner(email).await?;

        self.ctx.habit_repo().delete_habit(&owner.id, habit_id).await?;

        info!(habit_id, "Habit deleted");
        Ok(())
    }

    async fn owner(&self, email: &str) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.to_string()).into())
    }

    async fn find(&self, owner: &User, habit_id: &str) -> ServiceResult<Habit> {
        self.ctx
            .habit_repo()
            .find_habit(&owner.id, habit_id)
            .await?
            .ok_or_else(|| DomainError::HabitNotFound(habit_id.to_string()).into())
    }
}
