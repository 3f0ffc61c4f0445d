//! Entity to DTO mappers

use habits_core::entities::{Habit, User};

use super::responses::{CreatedHabitResponse, HabitResponse, UserResponse};

impl From<&Habit> for HabitResponse {
    fn from(habit: &Habit) -> Self {
        Self {
            habit_id: habit.id.clone(),
            user_id: habit.user_id.clone(),
            created_at: habit.created_at,
            name: habit.name.clone(),
            days: habit.days,
            days_target: habit.days_target,
            completion_dates: habit.completion_dates.clone(),
        }
    }
}

impl From<Habit> for HabitResponse {
    fn from(habit: Habit) -> Self {
        Self {
            habit_id: habit.id,
            user_id: habit.user_id,
            created_at: habit.created_at,
            name: habit.name,
            days: habit.days,
            days_target: habit.days_target,
            completion_dates: habit.completion_dates,
        }
    }
}

impl From<&Habit> for CreatedHabitResponse {
    fn from(habit: &Habit) -> Self {
        Self {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            days: habit.days,
            days_target: habit.days_target,
            completion_dates: habit.completion_dates.clone(),
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email_address: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_response_drops_password_hash() {
        let user = User {
            id: "1".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "johndoe1@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
            last_login: None,
            is_logged_in: false,
        };

        let response = UserResponse::from(&user);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("argon2"));
        assert_eq!(response.email_address, user.email);
    }

    #[test]
    fn test_created_habit_response() {
        let habit = Habit {
            id: "7".to_string(),
            user_id: "1".to_string(),
            created_at: Utc::now(),
            name: "Read Daily".to_string(),
            days: 0,
            days_target: 30,
            completion_dates: vec![],
        };

        let created = CreatedHabitResponse::from(&habit);
        assert_eq!(created.habit_id, "7");
        assert_eq!(created.days_target, 30);

        let full = HabitResponse::from(habit);
        assert_eq!(full.user_id, "1");
    }
}
