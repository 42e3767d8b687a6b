use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::json;

use chapel_types::models::{
    Course, DailyReport, Event, LiveWorship, Member, PrayerRequest, Record, ReportStatus,
    ScaleEntry, Schedule, Setting, Visitor, WordOfDay,
};

use crate::rest::{Query, Resolution, RestClient};
use crate::{Result, Store};

const MEMBERS: &str = "members";
const SETTINGS: &str = "settings";
const WORD_OF_DAY: &str = "word_of_day";
const LIVE_WORSHIP: &str = "live_worship";
const PRAYER_REQUESTS: &str = "prayer_requests";
const SCHEDULES: &str = "schedules";
const SCALE: &str = "scale";
const EVENTS: &str = "events";
const COURSES: &str = "courses";
const VISITORS: &str = "visitors";
const DAILY_REPORTS: &str = "daily_reports";

/// `Store` backed by the hosted PostgREST endpoint.
#[derive(Clone)]
pub struct RestStore {
    client: RestClient,
}

impl RestStore {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    async fn all<T: serde::de::DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        self.client.select(table, &Query::new()).await
    }

    async fn newest<T: serde::de::DeserializeOwned>(&self, table: &str) -> Result<Option<T>> {
        self.client
            .select_single(table, &Query::new().order_desc("id").limit(1))
            .await
    }
}

#[async_trait]
impl Store for RestStore {
    async fn list_members(&self) -> Result<Vec<Record<Member>>> {
        self.all(MEMBERS).await
    }

    async fn insert_member(&self, member: Member) -> Result<()> {
        self.client.insert(MEMBERS, &member).await
    }

    async fn find_member_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Record<Member>>> {
        let query = Query::new().eq("email", email).eq("password", password);
        self.client.select_single(MEMBERS, &query).await
    }

    async fn find_member_by_cpf(&self, cpf: &str) -> Result<Option<Record<Member>>> {
        self.client
            .select_single(MEMBERS, &Query::new().eq("cpf", cpf))
            .await
    }

    async fn list_settings(&self) -> Result<Vec<Setting>> {
        self.all(SETTINGS).await
    }

    async fn upsert_setting(&self, setting: Setting) -> Result<()> {
        self.client
            .upsert(SETTINGS, &setting, "key", Resolution::MergeDuplicates)
            .await
    }

    async fn insert_setting_if_absent(&self, setting: Setting) -> Result<()> {
        self.client
            .upsert(SETTINGS, &setting, "key", Resolution::IgnoreDuplicates)
            .await
    }

    async fn latest_word_of_day(&self) -> Result<Option<Record<WordOfDay>>> {
        self.newest(WORD_OF_DAY).await
    }

    async fn insert_word_of_day(&self, word: WordOfDay) -> Result<()> {
        self.client.insert(WORD_OF_DAY, &word).await
    }

    async fn latest_live_worship(&self) -> Result<Option<Record<LiveWorship>>> {
        self.newest(LIVE_WORSHIP).await
    }

    async fn insert_live_worship(&self, live: LiveWorship) -> Result<()> {
        self.client.insert(LIVE_WORSHIP, &live).await
    }

    async fn list_prayer_requests(&self) -> Result<Vec<Record<PrayerRequest>>> {
        self.client
            .select(PRAYER_REQUESTS, &Query::new().order_desc("created_at"))
            .await
    }

    async fn insert_prayer_request(&self, prayer: PrayerRequest) -> Result<()> {
        self.client.insert(PRAYER_REQUESTS, &prayer).await
    }

    async fn list_schedules(&self) -> Result<Vec<Record<Schedule>>> {
        self.all(SCHEDULES).await
    }

    async fn insert_schedule(&self, schedule: Schedule) -> Result<()> {
        self.client.insert(SCHEDULES, &schedule).await
    }

    async fn list_scale(&self) -> Result<Vec<Record<ScaleEntry>>> {
        self.client
            .select(SCALE, &Query::new().order_desc("date"))
            .await
    }

    async fn insert_scale_entry(&self, entry: ScaleEntry) -> Result<()> {
        self.client.insert(SCALE, &entry).await
    }

    async fn list_events(&self) -> Result<Vec<Record<Event>>> {
        self.all(EVENTS).await
    }

    async fn insert_event(&self, event: Event) -> Result<()> {
        self.client.insert(EVENTS, &event).await
    }

    async fn list_courses(&self) -> Result<Vec<Record<Course>>> {
        self.all(COURSES).await
    }

    async fn insert_course(&self, course: Course) -> Result<()> {
        self.client.insert(COURSES, &course).await
    }

    async fn delete_visitors_created_before(&self, cutoff: DateTime<Utc>) -> Result<()> {
        let cutoff = cutoff.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.client
            .delete(VISITORS, &Query::new().lt("created_at", cutoff))
            .await
    }

    async fn list_visitors(&self) -> Result<Vec<Record<Visitor>>> {
        self.client
            .select(VISITORS, &Query::new().order_desc("created_at"))
            .await
    }

    async fn insert_visitor(&self, visitor: Visitor) -> Result<()> {
        self.client.insert(VISITORS, &visitor).await
    }

    async fn delete_reports_dated_before(&self, day: NaiveDate) -> Result<()> {
        self.client
            .delete(DAILY_REPORTS, &Query::new().lt("date", day))
            .await
    }

    async fn list_reports_on(&self, day: NaiveDate) -> Result<Vec<Record<DailyReport>>> {
        self.client
            .select(DAILY_REPORTS, &Query::new().eq("date", day))
            .await
    }

    async fn insert_report(&self, report: DailyReport) -> Result<Record<DailyReport>> {
        self.client.insert_returning(DAILY_REPORTS, &report).await
    }

    async fn authorize_report(&self, id: i64) -> Result<()> {
        self.client
            .update(
                DAILY_REPORTS,
                &Query::new().eq("id", id),
                &json!({ "status": ReportStatus::Authorized }),
            )
            .await
    }
}
