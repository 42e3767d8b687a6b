pub mod memory;
pub mod remote;
pub mod rest;
pub mod seed;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use chapel_types::models::{
    Course, DailyReport, Event, LiveWorship, Member, PrayerRequest, Record, ScaleEntry, Schedule,
    Setting, Visitor, WordOfDay,
};

pub use memory::MemoryStore;
pub use remote::RestStore;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with an error document. `message` is what gets
    /// shown to API callers.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("insert into {0} returned no row")]
    EmptyInsert(&'static str),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Everything the HTTP layer needs from persistence. One method per route
/// operation; "latest" reads return `None` on an empty table and leave the
/// default policy to the caller.
#[async_trait]
pub trait Store: Send + Sync {
    // -- Members --

    async fn list_members(&self) -> Result<Vec<Record<Member>>>;
    async fn insert_member(&self, member: Member) -> Result<()>;
    /// Exact match on both columns.
    async fn find_member_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Record<Member>>>;
    async fn find_member_by_cpf(&self, cpf: &str) -> Result<Option<Record<Member>>>;

    // -- Settings --

    async fn list_settings(&self) -> Result<Vec<Setting>>;
    /// Insert, or overwrite the value of the row with the same key.
    async fn upsert_setting(&self, setting: Setting) -> Result<()>;
    /// Insert unless a row with the same key exists. Never overwrites.
    async fn insert_setting_if_absent(&self, setting: Setting) -> Result<()>;

    // -- Devotional content --

    async fn latest_word_of_day(&self) -> Result<Option<Record<WordOfDay>>>;
    async fn insert_word_of_day(&self, word: WordOfDay) -> Result<()>;
    async fn latest_live_worship(&self) -> Result<Option<Record<LiveWorship>>>;
    async fn insert_live_worship(&self, live: LiveWorship) -> Result<()>;
    /// Newest first.
    async fn list_prayer_requests(&self) -> Result<Vec<Record<PrayerRequest>>>;
    async fn insert_prayer_request(&self, prayer: PrayerRequest) -> Result<()>;

    // -- Listings --

    async fn list_schedules(&self) -> Result<Vec<Record<Schedule>>>;
    async fn insert_schedule(&self, schedule: Schedule) -> Result<()>;
    /// Latest date first.
    async fn list_scale(&self) -> Result<Vec<Record<ScaleEntry>>>;
    async fn insert_scale_entry(&self, entry: ScaleEntry) -> Result<()>;
    async fn list_events(&self) -> Result<Vec<Record<Event>>>;
    async fn insert_event(&self, event: Event) -> Result<()>;
    async fn list_courses(&self) -> Result<Vec<Record<Course>>>;
    async fn insert_course(&self, course: Course) -> Result<()>;

    // -- Visitors --

    /// Hard-deletes visitors whose `created_at` is strictly before `cutoff`.
    async fn delete_visitors_created_before(&self, cutoff: DateTime<Utc>) -> Result<()>;
    /// Newest first.
    async fn list_visitors(&self) -> Result<Vec<Record<Visitor>>>;
    async fn insert_visitor(&self, visitor: Visitor) -> Result<()>;

    // -- Daily reports --

    /// Deletes reports whose `date` is strictly before `day`.
    async fn delete_reports_dated_before(&self, day: NaiveDate) -> Result<()>;
    async fn list_reports_on(&self, day: NaiveDate) -> Result<Vec<Record<DailyReport>>>;
    async fn insert_report(&self, report: DailyReport) -> Result<Record<DailyReport>>;
    /// Sets `status = authorized` without looking at the current status.
    async fn authorize_report(&self, id: i64) -> Result<()>;
}
