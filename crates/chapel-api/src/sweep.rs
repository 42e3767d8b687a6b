//! Delete-before-read retention passes.
//!
//! Each sweep runs inline in front of its paired read and is best-effort:
//! a failed delete is logged and the read goes ahead.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, warn};

use chapel_store::Store;

/// Visitors are kept for two days after they register.
pub const VISITOR_RETENTION: Duration = Duration::hours(48);

/// Anything created strictly before this instant is swept.
pub fn visitor_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - VISITOR_RETENTION
}

pub async fn sweep_visitors(store: &dyn Store, now: DateTime<Utc>) {
    let cutoff = visitor_cutoff(now);
    match store.delete_visitors_created_before(cutoff).await {
        Ok(()) => debug!("Swept visitors created before {}", cutoff),
        Err(e) => warn!("Visitor sweep failed: {}", e),
    }
}

/// Removes every report dated before `today`.
pub async fn sweep_reports(store: &dyn Store, today: NaiveDate) {
    match store.delete_reports_dated_before(today).await {
        Ok(()) => debug!("Swept daily reports dated before {}", today),
        Err(e) => warn!("Daily report sweep failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use chapel_store::MemoryStore;
    use chapel_types::models::Visitor;

    #[test]
    fn cutoff_is_two_days_back() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        assert_eq!(
            visitor_cutoff(now),
            Utc.with_ymd_and_hms(2026, 10, 13, 12, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn sweep_drops_only_expired_visitors() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .seed_visitor(Visitor::default(), now - Duration::hours(49))
            .unwrap();
        let kept = store
            .seed_visitor(Visitor::default(), now - Duration::hours(47))
            .unwrap();

        sweep_visitors(&store, now).await;

        let left = store.all_visitors().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, kept);
    }

    #[tokio::test]
    async fn failed_sweep_does_not_panic() {
        let store = MemoryStore::failing("offline");
        sweep_visitors(&store, Utc::now()).await;
        sweep_reports(&store, Utc::now().date_naive()).await;
    }
}
