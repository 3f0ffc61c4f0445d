//! Demo data for the development store

use chrono::{DateTime, TimeZone, Utc};

use habits_core::entities::{Habit, User};
use habits_core::error::DomainError;
use habits_core::traits::RepoResult;

/// Plaintext password shared by every demo user
pub const DEMO_PASSWORD: &str = "1secret?Password";

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> RepoResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .ok_or_else(|| DomainError::InternalError("invalid seed timestamp".to_string()))
}

pub(crate) fn users(password_hash: &str) -> RepoResult<Vec<User>> {
    let created_at = at(2024, 10, 10, 9, 0)?;

    let user = |id: &str, first: &str, last: &str, email: &str| User {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at,
        last_login: Some(created_at),
        is_logged_in: false,
    };

    Ok(vec![
        user("1", "John", "Doe", "johndoe1@example.com"),
        user("2", "Jane", "Smith", "janesmith@example.com"),
        user("3", "Alice", "Johnson", "alicejohnson@example.com"),
        user("4", "John", "LoggedIn", "john.loggedin@example.com"),
    ])
}

pub(crate) fn habits() -> RepoResult<Vec<Habit>> {
    let created_at = at(2024, 9, 21, 10, 30)?;

    let habit = |id: &str, user_id: &str, name: &str, days: i32, target: i32, dates: [&str; 3]| {
        Habit {
            id: id.to_string(),
            user_id: user_id.to_string(),
            created_at,
            name: name.to_string(),
            days,
            days_target: target,
            completion_dates: dates.iter().map(ToString::to_string).collect(),
        }
    };

    Ok(vec![
        habit(
            "1",
            "1",
            "Actually Finish This Project",
            30,
            66,
            ["2024-12-20", "2024-12-02", "2024-12-03"],
        ),
        habit("2", "1", "Code everyday", 30, 66, ["2024-12-20", "2024-12-02", "2024-12-11"]),
        habit(
            "3",
            "2",
            "Wake up at 5am everyday",
            5,
            365,
            ["2024-12-20", "2024-12-11", "2024-12-11"],
        ),
        habit("4", "3", "Cold shower everyday", 25, 30, ["2024-12-20", "2024-12-12", "2024-12-11"]),
        habit("5", "4", "Read one book a week", 30, 30, ["2024-12-20", "2024-12-02", "2024-12-11"]),
        habit(
            "6",
            "1",
            "Limit phone screen time to 1 hour a day",
            5,
            60,
            ["2024-12-20", "2024-12-02", "2024-12-11"],
        ),
    ])
}
