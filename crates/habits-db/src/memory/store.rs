//! In-memory implementation of the store traits

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{info, instrument};

use habits_common::hash_password;
use habits_core::entities::{Habit, NewHabit, NewUser, User, UserSession};
use habits_core::error::DomainError;
use habits_core::traits::{HabitRepository, RepoResult, SessionRepository, Store, UserRepository};

use super::seed;

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    /// Keyed by user id; a user has at most one session
    sessions: HashMap<String, UserSession>,
    habits: Vec<Habit>,
    next_user_id: u64,
    next_habit_id: u64,
}

impl State {
    fn allocate_user_id(&mut self) -> String {
        self.next_user_id += 1;
        self.next_user_id.to_string()
    }

    fn allocate_habit_id(&mut self) -> String {
        self.next_habit_id += 1;
        self.next_habit_id.to_string()
    }

    fn habit_mut(&mut self, user_id: &str, habit_id: &str) -> Option<&mut Habit> {
        self.habits
            .iter_mut()
            .find(|h| h.id == habit_id && h.user_id == user_id)
    }

    fn user_mut(&mut self, user_id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == user_id)
    }
}

/// Store that keeps everything in process memory
///
/// Ids are sequential decimal strings. All mutations happen under a single
/// lock, so multi-record operations such as login are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the demo users and habits
    ///
    /// Every demo user's password is `DEMO_PASSWORD`.
    pub fn seeded() -> RepoResult<Self> {
        let password_hash = hash_password(seed::DEMO_PASSWORD)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        let users = seed::users(&password_hash)?;
        let habits = seed::habits()?;

        let state = State {
            next_user_id: users.len() as u64,
            next_habit_id: habits.len() as u64,
            users,
            habits,
            sessions: HashMap::new(),
        };

        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

#[async_trait]
impl HabitRepository for MemoryStore {
    #[instrument(skip(self, habit))]
    async fn create_habit(&self, user_id: &str, habit: &NewHabit) -> RepoResult<Habit> {
        let mut state = self.state.write();

        let created = Habit {
            id: state.allocate_habit_id(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
            name: habit.name.clone(),
            days: habit.days,
            days_target: habit.days_target,
            completion_dates: Vec::new(),
        };
        state.habits.push(created.clone());

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn find_habit(&self, user_id: &str, habit_id: &str) -> RepoResult<Option<Habit>> {
        let state = self.state.read();

        Ok(state
            .habits
            .iter()
            .find(|h| h.id == habit_id && h.user_id == user_id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn find_habits(&self, user_id: &str) -> RepoResult<Vec<Habit>> {
        let state = self.state.read();

        Ok(state
            .habits
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, habit), fields(habit_id = %habit.id))]
    async fn update_habit(&self, user_id: &str, habit: &Habit) -> RepoResult<()> {
        let mut state = self.state.write();

        let stored = state
            .habit_mut(user_id, &habit.id)
            .ok_or_else(|| DomainError::HabitNotFound(habit.id.clone()))?;
        overwrite(stored, habit);

        Ok(())
    }

    #[instrument(skip(self, habits), fields(count = habits.len()))]
    async fn update_habits(&self, user_id: &str, habits: &[Habit]) -> RepoResult<()> {
        let mut state = self.state.write();

        // Check every id first so a bad one leaves the store untouched
        if let Some(missing) = habits
            .iter()
            .find(|h| !state.habits.iter().any(|s| s.id == h.id && s.user_id == user_id))
        {
            return Err(DomainError::HabitNotFound(missing.id.clone()));
        }

        for habit in habits {
            if let Some(stored) = state.habit_mut(user_id, &habit.id) {
                overwrite(stored, habit);
            }
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_habit(&self, user_id: &str, habit_id: &str) -> RepoResult<()> {
        let mut state = self.state.write();

        let before = state.habits.len();
        state
            .habits
            .retain(|h| !(h.id == habit_id && h.user_id == user_id));

        if state.habits.len() == before {
            return Err(DomainError::HabitNotFound(habit_id.to_string()));
        }

        Ok(())
    }
}

fn overwrite(stored: &mut Habit, habit: &Habit) {
    stored.name.clone_from(&habit.name);
    stored.days = habit.days;
    stored.days_target = habit.days_target;
    stored.completion_dates.clone_from(&habit.completion_dates);
}

#[async_trait]
impl UserRepository for MemoryStore {
    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let state = self.state.read();
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let state = self.state.read();
        Ok(state.users.iter().any(|u| u.email == email))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        let mut state = self.state.write();

        if state.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }

        let created = User {
            id: state.allocate_user_id(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
            last_login: None,
            is_logged_in: false,
        };
        state.users.push(created.clone());

        Ok(created)
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    #[instrument(skip(self))]
    async fn find_session(&self, user_id: &str) -> RepoResult<Option<UserSession>> {
        let state = self.state.read();
        Ok(state.sessions.get(user_id).cloned())
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    async fn login(&self, session: &UserSession) -> RepoResult<()> {
        let mut state = self.state.write();

        let user = state
            .user_mut(&session.user_id)
            .ok_or_else(|| DomainError::UserNotFound(session.user_id.clone()))?;
        user.mark_logged_in(session.created_at);

        state
            .sessions
            .insert(session.user_id.clone(), session.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn logout(&self, user_id: &str) -> RepoResult<()> {
        let mut state = self.state.write();

        if !state.sessions.contains_key(user_id) {
            return Err(DomainError::SessionNotFound(user_id.to_string()));
        }

        let user = state
            .user_mut(user_id)
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))?;
        user.mark_logged_out();

        state.sessions.remove(user_id);

        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> RepoResult<()> {
        Ok(())
    }

    async fn disconnect(&self) -> RepoResult<()> {
        info!("In-memory store released");
        Ok(())
    }
}
