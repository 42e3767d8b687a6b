use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use chapel_types::models::{
    Course, DailyReport, Event, LiveWorship, Member, PrayerRequest, Record, ReportStatus,
    ScaleEntry, Schedule, Setting, Visitor, WordOfDay,
};

use crate::{Result, Store, StoreError};

/// In-process `Store` with the same filter and ordering rules as the remote
/// tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failure: Option<String>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    members: Vec<Record<Member>>,
    settings: Vec<Setting>,
    words: Vec<Record<WordOfDay>>,
    lives: Vec<Record<LiveWorship>>,
    prayers: Vec<Record<PrayerRequest>>,
    schedules: Vec<Record<Schedule>>,
    scale: Vec<Record<ScaleEntry>>,
    events: Vec<Record<Event>>,
    courses: Vec<Record<Course>>,
    visitors: Vec<Record<Visitor>>,
    reports: Vec<Record<DailyReport>>,
}

impl Tables {
    fn stamp<T>(&mut self, fields: T, created_at: DateTime<Utc>) -> Record<T> {
        self.next_id += 1;
        Record::new(self.next_id, Some(created_at), fields)
    }
}

fn newest_first<T>(rows: &[Record<T>]) -> Vec<Record<T>>
where
    T: Clone,
{
    let mut rows = rows.to_vec();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    rows
}

fn require_key(setting: &Setting) -> Result<()> {
    if setting.key.is_none() {
        return Err(StoreError::Api {
            status: 400,
            code: Some("23502".to_string()),
            message: "null value in column \"key\" of relation \"settings\" violates not-null constraint"
                .to_string(),
        });
    }
    Ok(())
}

fn latest<T: Clone>(rows: &[Record<T>]) -> Option<Record<T>> {
    rows.iter().max_by_key(|r| r.id).cloned()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with `message`, for exercising
    /// error paths.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Api {
                status: 503,
                code: None,
                message: message.clone(),
            });
        }
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }

    // -- Seeding helpers --

    pub fn seed_member(&self, member: Member) -> Result<i64> {
        let mut t = self.lock()?;
        let row = t.stamp(member, Utc::now());
        let id = row.id;
        t.members.push(row);
        Ok(id)
    }

    /// Inserts a visitor with an explicit creation time.
    pub fn seed_visitor(&self, visitor: Visitor, created_at: DateTime<Utc>) -> Result<i64> {
        let mut t = self.lock()?;
        let row = t.stamp(visitor, created_at);
        let id = row.id;
        t.visitors.push(row);
        Ok(id)
    }

    /// Inserts a report as-is, bypassing server-side date stamping.
    pub fn seed_report(&self, report: DailyReport) -> Result<i64> {
        let mut t = self.lock()?;
        let row = t.stamp(report, Utc::now());
        let id = row.id;
        t.reports.push(row);
        Ok(id)
    }

    pub fn report(&self, id: i64) -> Result<Option<Record<DailyReport>>> {
        Ok(self.lock()?.reports.iter().find(|r| r.id == id).cloned())
    }

    pub fn all_reports(&self) -> Result<Vec<Record<DailyReport>>> {
        Ok(self.lock()?.reports.clone())
    }

    pub fn all_visitors(&self) -> Result<Vec<Record<Visitor>>> {
        Ok(self.lock()?.visitors.clone())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_members(&self) -> Result<Vec<Record<Member>>> {
        Ok(self.lock()?.members.clone())
    }

    async fn insert_member(&self, member: Member) -> Result<()> {
        let mut t = self.lock()?;
        if member.cpf.is_some() && t.members.iter().any(|m| m.fields.cpf == member.cpf) {
            return Err(StoreError::Api {
                status: 409,
                code: Some("23505".to_string()),
                message: "duplicate key value violates unique constraint \"members_cpf_key\""
                    .to_string(),
            });
        }
        let row = t.stamp(member, Utc::now());
        t.members.push(row);
        Ok(())
    }

    async fn find_member_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Record<Member>>> {
        let t = self.lock()?;
        let mut hits = t.members.iter().filter(|m| {
            m.fields.email.as_deref() == Some(email) && m.fields.password.as_deref() == Some(password)
        });
        // Several matches count as no match, like a single-row request.
        match (hits.next(), hits.next()) {
            (Some(m), None) => Ok(Some(m.clone())),
            _ => Ok(None),
        }
    }

    async fn find_member_by_cpf(&self, cpf: &str) -> Result<Option<Record<Member>>> {
        let t = self.lock()?;
        Ok(t.members
            .iter()
            .find(|m| m.fields.cpf.as_deref() == Some(cpf))
            .cloned())
    }

    async fn list_settings(&self) -> Result<Vec<Setting>> {
        Ok(self.lock()?.settings.clone())
    }

    async fn upsert_setting(&self, setting: Setting) -> Result<()> {
        let mut t = self.lock()?;
        require_key(&setting)?;
        match t.settings.iter_mut().find(|s| s.key == setting.key) {
            Some(existing) => existing.value = setting.value,
            None => t.settings.push(setting),
        }
        Ok(())
    }

    async fn insert_setting_if_absent(&self, setting: Setting) -> Result<()> {
        let mut t = self.lock()?;
        require_key(&setting)?;
        if !t.settings.iter().any(|s| s.key == setting.key) {
            t.settings.push(setting);
        }
        Ok(())
    }

    async fn latest_word_of_day(&self) -> Result<Option<Record<WordOfDay>>> {
        Ok(latest(&self.lock()?.words))
    }

    async fn insert_word_of_day(&self, word: WordOfDay) -> Result<()> {
        let mut t = self.lock()?;
        let row = t.stamp(word, Utc::now());
        t.words.push(row);
        Ok(())
    }

    async fn latest_live_worship(&self) -> Result<Option<Record<LiveWorship>>> {
        Ok(latest(&self.lock()?.lives))
    }

    async fn insert_live_worship(&self, live: LiveWorship) -> Result<()> {
        let mut t = self.lock()?;
        let row = t.stamp(live, Utc::now());
        t.lives.push(row);
        Ok(())
    }

    async fn list_prayer_requests(&self) -> Result<Vec<Record<PrayerRequest>>> {
        Ok(newest_first(&self.lock()?.prayers))
    }

    async fn insert_prayer_request(&self, prayer: PrayerRequest) -> Result<()> {
        let mut t = self.lock()?;
        let row = t.stamp(prayer, Utc::now());
        t.prayers.push(row);
        Ok(())
    }

    async fn list_schedules(&self) -> Result<Vec<Record<Schedule>>> {
        Ok(self.lock()?.schedules.clone())
    }

    async fn insert_schedule(&self, schedule: Schedule) -> Result<()> {
        let mut t = self.lock()?;
        let row = t.stamp(schedule, Utc::now());
        t.schedules.push(row);
        Ok(())
    }

    async fn list_scale(&self) -> Result<Vec<Record<ScaleEntry>>> {
        let mut rows = self.lock()?.scale.clone();
        rows.sort_by(|a, b| b.fields.date.cmp(&a.fields.date));
        Ok(rows)
    }

    async fn insert_scale_entry(&self, entry: ScaleEntry) -> Result<()> {
        let mut t = self.lock()?;
        let row = t.stamp(entry, Utc::now());
        t.scale.push(row);
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Record<Event>>> {
        Ok(self.lock()?.events.clone())
    }

    async fn insert_event(&self, event: Event) -> Result<()> {
        let mut t = self.lock()?;
        let row = t.stamp(event, Utc::now());
        t.events.push(row);
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<Record<Course>>> {
        Ok(self.lock()?.courses.clone())
    }

    async fn insert_course(&self, course: Course) -> Result<()> {
        let mut t = self.lock()?;
        let row = t.stamp(course, Utc::now());
        t.courses.push(row);
        Ok(())
    }

    async fn delete_visitors_created_before(&self, cutoff: DateTime<Utc>) -> Result<()> {
        self.lock()?
            .visitors
            .retain(|v| v.created_at.is_none_or(|at| at >= cutoff));
        Ok(())
    }

    async fn list_visitors(&self) -> Result<Vec<Record<Visitor>>> {
        Ok(newest_first(&self.lock()?.visitors))
    }

    async fn insert_visitor(&self, visitor: Visitor) -> Result<()> {
        let mut t = self.lock()?;
        let row = t.stamp(visitor, Utc::now());
        t.visitors.push(row);
        Ok(())
    }

    async fn delete_reports_dated_before(&self, day: NaiveDate) -> Result<()> {
        self.lock()?.reports.retain(|r| r.fields.date >= day);
        Ok(())
    }

    async fn list_reports_on(&self, day: NaiveDate) -> Result<Vec<Record<DailyReport>>> {
        let t = self.lock()?;
        Ok(t.reports
            .iter()
            .filter(|r| r.fields.date == day)
            .cloned()
            .collect())
    }

    async fn insert_report(&self, report: DailyReport) -> Result<Record<DailyReport>> {
        let mut t = self.lock()?;
        let row = t.stamp(report, Utc::now());
        t.reports.push(row.clone());
        Ok(row)
    }

    async fn authorize_report(&self, id: i64) -> Result<()> {
        let mut t = self.lock()?;
        // Matching zero rows is not an error, same as a filtered PATCH.
        if let Some(report) = t.reports.iter_mut().find(|r| r.id == id) {
            report.fields.status = ReportStatus::Authorized;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn report_on(date: NaiveDate) -> DailyReport {
        DailyReport {
            date,
            day_of_week: Some(DailyReport::label_for(date)),
            offerings: None,
            tithes: None,
            expenses: None,
            total: None,
            approver_id: None,
            created_by_id: None,
            created_by_name: None,
            status: ReportStatus::Pending,
        }
    }

    #[tokio::test]
    async fn duplicate_cpf_is_rejected() {
        let store = MemoryStore::new();
        let member = Member {
            name: Some("Ana".into()),
            cpf: Some("111".into()),
            ..Default::default()
        };
        store.insert_member(member.clone()).await.unwrap();
        let err = store.insert_member(member).await.unwrap_err();
        assert_eq!(err.code(), Some("23505"));
        assert_eq!(store.list_members().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn visitor_cutoff_is_strict() {
        let store = MemoryStore::new();
        let cutoff = Utc::now() - Duration::hours(48);
        store.seed_visitor(Visitor::default(), cutoff).unwrap();
        store
            .seed_visitor(Visitor::default(), cutoff - Duration::seconds(1))
            .unwrap();

        store.delete_visitors_created_before(cutoff).await.unwrap();
        let left = store.all_visitors().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].created_at, Some(cutoff));
    }

    #[tokio::test]
    async fn report_sweep_keeps_today_and_later() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        store.seed_report(report_on(today.pred_opt().unwrap())).unwrap();
        store.seed_report(report_on(today)).unwrap();
        store.seed_report(report_on(today.succ_opt().unwrap())).unwrap();

        store.delete_reports_dated_before(today).await.unwrap();
        assert_eq!(store.all_reports().unwrap().len(), 2);
        assert_eq!(store.list_reports_on(today).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn latest_is_highest_id() {
        let store = MemoryStore::new();
        assert!(store.latest_live_worship().await.unwrap().is_none());
        for url in ["a", "b", "c"] {
            store
                .insert_live_worship(LiveWorship { url: Some(url.into()) })
                .await
                .unwrap();
        }
        let live = store.latest_live_worship().await.unwrap().unwrap();
        assert_eq!(live.fields.url.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn scale_lists_latest_date_first() {
        let store = MemoryStore::new();
        for date in ["2026-10-04", "2026-10-18", "2026-10-11"] {
            store
                .insert_scale_entry(ScaleEntry {
                    date: Some(date.into()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        let dates: Vec<_> = store
            .list_scale()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|r| r.fields.date)
            .collect();
        assert_eq!(dates, ["2026-10-18", "2026-10-11", "2026-10-04"]);
    }

    #[tokio::test]
    async fn upsert_replaces_by_key() {
        let store = MemoryStore::new();
        store.upsert_setting(Setting::new("mission", "A")).await.unwrap();
        store.upsert_setting(Setting::new("mission", "B")).await.unwrap();
        store
            .insert_setting_if_absent(Setting::new("mission", "C"))
            .await
            .unwrap();
        let settings = store.list_settings().await.unwrap();
        assert_eq!(settings, vec![Setting::new("mission", "B")]);
    }

    #[tokio::test]
    async fn keyless_setting_is_refused() {
        let store = MemoryStore::new();
        let keyless = Setting {
            key: None,
            value: "x".into(),
        };
        let err = store.upsert_setting(keyless).await.unwrap_err();
        assert_eq!(err.code(), Some("23502"));
        assert!(store.list_settings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_store_fails_everything() {
        let store = MemoryStore::failing("connection refused");
        let err = store.list_events().await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }
}
