//! Field-by-field mapping between BSON documents and entities
//!
//! Decoding is strict: a missing required field or a field of the wrong type
//! yields `DomainError::DecodeError` naming the entity and field.

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime as BsonDateTime, Document};

use habits_core::entities::{Habit, NewHabit, NewUser, User, UserSession};
use habits_core::error::DomainError;
use habits_core::traits::RepoResult;

// ============================================================================
// Field names
// ============================================================================

pub(crate) const ID: &str = "_id";
pub(crate) const CREATED_AT: &str = "CreatedAt";

pub(crate) const USER_ID: &str = "UserID";
pub(crate) const NAME: &str = "Name";
pub(crate) const DAYS: &str = "Days";
pub(crate) const DAYS_TARGET: &str = "DaysTarget";
pub(crate) const COMPLETION_DATES: &str = "CompletionDates";

pub(crate) const PASSWORD: &str = "Password";
pub(crate) const FIRST_NAME: &str = "FirstName";
pub(crate) const LAST_NAME: &str = "LastName";
pub(crate) const EMAIL_ADDRESS: &str = "EmailAddress";
pub(crate) const LAST_LOGIN: &str = "LastLogin";
pub(crate) const IS_LOGGED_IN: &str = "IsLoggedIn";

pub(crate) const SESSION_ID: &str = "SessionID";
pub(crate) const REFRESH_TOKEN: &str = "RefreshToken";
pub(crate) const DEVICE: &str = "Device";
pub(crate) const IP_ADDRESS: &str = "IpAddress";

// ============================================================================
// Time
// ============================================================================

pub(crate) fn to_bson_datetime(at: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(at.timestamp_millis())
}

/// Current time truncated to the millisecond precision BSON stores
pub(crate) fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

// ============================================================================
// Encoding
// ============================================================================

pub(crate) fn new_habit_document(
    owner: ObjectId,
    habit: &NewHabit,
    created_at: DateTime<Utc>,
) -> Document {
    doc! {
        USER_ID: owner,
        CREATED_AT: to_bson_datetime(created_at),
        NAME: habit.name.as_str(),
        DAYS: habit.days,
        DAYS_TARGET: habit.days_target,
        COMPLETION_DATES: Bson::Array(Vec::new()),
    }
}

/// `$set` update carrying the mutable habit fields
pub(crate) fn habit_update(habit: &Habit) -> Document {
    doc! {
        "$set": {
            NAME: habit.name.as_str(),
            DAYS: habit.days,
            DAYS_TARGET: habit.days_target,
            COMPLETION_DATES: habit.completion_dates.clone(),
        }
    }
}

pub(crate) fn new_user_document(user: &NewUser) -> Document {
    doc! {
        PASSWORD: user.password_hash.as_str(),
        FIRST_NAME: user.first_name.as_str(),
        LAST_NAME: user.last_name.as_str(),
        EMAIL_ADDRESS: user.email.as_str(),
        CREATED_AT: to_bson_datetime(user.created_at),
        LAST_LOGIN: Bson::Null,
        IS_LOGGED_IN: false,
    }
}

/// Session documents are keyed by the owning user's id
pub(crate) fn session_document(owner: ObjectId, session: &UserSession) -> Document {
    doc! {
        ID: owner,
        SESSION_ID: session.id.as_str(),
        REFRESH_TOKEN: session.refresh_token.as_str(),
        DEVICE: session.device.as_str(),
        IP_ADDRESS: session.ip_address.as_str(),
        CREATED_AT: to_bson_datetime(session.created_at),
    }
}

// ============================================================================
// Decoding
// ============================================================================

struct Reader<'a> {
    entity: &'static str,
    doc: &'a Document,
}

impl<'a> Reader<'a> {
    fn new(entity: &'static str, doc: &'a Document) -> Self {
        Self { entity, doc }
    }

    fn error(&self, field: &'static str, reason: impl Into<String>) -> DomainError {
        DomainError::DecodeError {
            entity: self.entity,
            field,
            reason: reason.into(),
        }
    }

    fn unexpected(&self, field: &'static str, value: &Bson) -> DomainError {
        self.error(field, format!("has unexpected type {:?}", value.element_type()))
    }

    fn get(&self, field: &'static str) -> RepoResult<&'a Bson> {
        self.doc
            .get(field)
            .ok_or_else(|| self.error(field, "is missing"))
    }

    fn object_id(&self, field: &'static str) -> RepoResult<ObjectId> {
        match self.get(field)? {
            Bson::ObjectId(oid) => Ok(*oid),
            other => Err(self.unexpected(field, other)),
        }
    }

    fn string(&self, field: &'static str) -> RepoResult<String> {
        match self.get(field)? {
            Bson::String(s) => Ok(s.clone()),
            other => Err(self.unexpected(field, other)),
        }
    }

    fn int(&self, field: &'static str) -> RepoResult<i32> {
        match self.get(field)? {
            Bson::Int32(v) => Ok(*v),
            Bson::Int64(v) => i32::try_from(*v)
                .map_err(|_| self.error(field, format!("value {v} is out of range"))),
            other => Err(self.unexpected(field, other)),
        }
    }

    fn datetime(&self, field: &'static str) -> RepoResult<DateTime<Utc>> {
        match self.get(field)? {
            Bson::DateTime(dt) => self.convert_datetime(field, *dt),
            other => Err(self.unexpected(field, other)),
        }
    }

    fn optional_datetime(&self, field: &'static str) -> RepoResult<Option<DateTime<Utc>>> {
        match self.doc.get(field) {
            None | Some(Bson::Null) => Ok(None),
            Some(Bson::DateTime(dt)) => self.convert_datetime(field, *dt).map(Some),
            Some(other) => Err(self.unexpected(field, other)),
        }
    }

    fn convert_datetime(&self, field: &'static str, dt: BsonDateTime) -> RepoResult<DateTime<Utc>> {
        DateTime::from_timestamp_millis(dt.timestamp_millis())
            .ok_or_else(|| self.error(field, "is out of range"))
    }

    /// Absent flags read as false
    fn flag(&self, field: &'static str) -> RepoResult<bool> {
        match self.doc.get(field) {
            None | Some(Bson::Null) => Ok(false),
            Some(Bson::Boolean(b)) => Ok(*b),
            Some(other) => Err(self.unexpected(field, other)),
        }
    }

    /// Absent lists read as empty
    fn string_list(&self, field: &'static str) -> RepoResult<Vec<String>> {
        match self.doc.get(field) {
            None | Some(Bson::Null) => Ok(Vec::new()),
            Some(Bson::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Bson::String(s) => Ok(s.clone()),
                    other => Err(self.unexpected(field, other)),
                })
                .collect(),
            Some(other) => Err(self.unexpected(field, other)),
        }
    }
}

pub(crate) fn decode_habit(doc: &Document) -> RepoResult<Habit> {
    let r = Reader::new("habit", doc);

    Ok(Habit {
        id: r.object_id(ID)?.to_hex(),
        user_id: r.object_id(USER_ID)?.to_hex(),
        created_at: r.datetime(CREATED_AT)?,
        name: r.string(NAME)?,
        days: r.int(DAYS)?,
        days_target: r.int(DAYS_TARGET)?,
        completion_dates: r.string_list(COMPLETION_DATES)?,
    })
}

pub(crate) fn decode_user(doc: &Document) -> RepoResult<User> {
    let r = Reader::new("user", doc);

    Ok(User {
        id: r.object_id(ID)?.to_hex(),
        first_name: r.string(FIRST_NAME)?,
        last_name: r.string(LAST_NAME)?,
        email: r.string(EMAIL_ADDRESS)?,
        password_hash: r.string(PASSWORD)?,
        created_at: r.datetime(CREATED_AT)?,
        last_login: r.optional_datetime(LAST_LOGIN)?,
        is_logged_in: r.flag(IS_LOGGED_IN)?,
    })
}

pub(crate) fn decode_session(doc: &Document) -> RepoResult<UserSession> {
    let r = Reader::new("session", doc);

    Ok(UserSession {
        id: r.string(SESSION_ID)?,
        user_id: r.object_id(ID)?.to_hex(),
        refresh_token: r.string(REFRESH_TOKEN)?,
        device: r.string(DEVICE)?,
        ip_address: r.string(IP_ADDRESS)?,
        created_at: r.datetime(CREATED_AT)?,
    })
}
