//! Row types as they live in the remote store. Every table carries an integer
//! `id` (and usually a `created_at`) assigned by the store; `Record<T>` wraps
//! the column set a client actually submits.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{flag, timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: i64,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: T,
    /// Columns `T` does not model, passed back out untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Record<T> {
    pub fn new(id: i64, created_at: Option<DateTime<Utc>>, fields: T) -> Self {
        Self {
            id,
            created_at,
            fields,
            extra: Map::new(),
        }
    }
}

// -- Members --

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// National id (CPF). Unique across members.
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub role_media: i32,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub role_council: i32,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub role_board: i32,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub role_deacon: i32,
    #[serde(default)]
    pub board_position: Option<String>,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub is_admin: i32,
    /// Stored and compared in plaintext.
    #[serde(default)]
    pub password: Option<String>,
}

impl Member {
    /// Registrations without a password fall back to the national id.
    pub fn with_default_password(mut self) -> Self {
        if self.password.as_deref().is_none_or(str::is_empty) {
            self.password = self.cpf.clone();
        }
        self
    }
}

// -- Settings --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    /// Unique, and required by the table; a keyless upsert is refused there.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl Setting {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }
}

// -- Devotional content --

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordOfDay {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl WordOfDay {
    /// Shown when nobody has posted a reflection yet.
    pub fn fallback(today: NaiveDate) -> Self {
        Self {
            author: Some("Sistema".to_string()),
            message: Some("Nenhuma reflexão hoje.".to_string()),
            date: Some(today.format("%d/%m/%Y").to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveWorship {
    #[serde(default)]
    pub url: Option<String>,
}

impl LiveWorship {
    pub fn fallback() -> Self {
        Self {
            url: Some(String::new()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrayerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub request: Option<String>,
}

// -- Listings --

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One service's duty roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleEntry {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub opening: Option<String>,
    #[serde(default)]
    pub contributions: Option<String>,
    #[serde(default)]
    pub avisos: Option<String>,
    #[serde(default)]
    pub final_prayer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

// -- Visitors --

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visitor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Forwarded exactly as submitted.
    #[serde(default)]
    pub whatsapp: Option<Value>,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub is_christian: i32,
    #[serde(default)]
    pub previous_church: Option<String>,
}

// -- Daily reports --

/// Approval state. Values other than the two the app writes are kept as
/// stored, `null` included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ReportStatus {
    #[default]
    Pending,
    Authorized,
    Other(Option<String>),
}

impl From<Option<String>> for ReportStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("pending") => return Self::Pending,
            Some("authorized") => return Self::Authorized,
            _ => {}
        }
        Self::Other(raw)
    }
}

impl From<ReportStatus> for Option<String> {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::Pending => Some("pending".to_string()),
            ReportStatus::Authorized => Some("authorized".to_string()),
            ReportStatus::Other(raw) => raw,
        }
    }
}

/// Reports are only read back through a `date = eq.<day>` filter, so `date`
/// is always present on a decoded row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub offerings: Option<Value>,
    #[serde(default)]
    pub tithes: Option<Value>,
    #[serde(default)]
    pub expenses: Option<Value>,
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default)]
    pub approver_id: Option<Value>,
    #[serde(default)]
    pub created_by_id: Option<Value>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
}

/// Lowercase pt-BR long weekday name, e.g. `terça-feira`.
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "domingo",
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
    }
}

impl DailyReport {
    pub fn label_for(date: NaiveDate) -> String {
        weekday_label(date.weekday()).to_string()
    }
}
