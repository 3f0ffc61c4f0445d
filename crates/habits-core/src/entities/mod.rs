//! Domain entities - core business objects

mod habit;
mod session;
mod user;

pub use habit::{Habit, HabitChanges, NewHabit};
pub use session::UserSession;
pub use user::{NewUser, User};
