use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Record, Setting};

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// -- Daily reports --

/// Body of `POST /api/daily-reports`. Any client-supplied `date`,
/// `day_of_week` or `status` is dropped: the server stamps those.
#[derive(Debug, Default, Deserialize)]
pub struct CreateDailyReportRequest {
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
}

// -- Responses --

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The newest row of a table, or a stand-in when the table is empty.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Latest<T> {
    Found(Record<T>),
    Default(T),
}

impl<T> Latest<T> {
    pub fn or_else(found: Option<Record<T>>, fallback: impl FnOnce() -> T) -> Self {
        match found {
            Some(row) => Self::Found(row),
            None => Self::Default(fallback()),
        }
    }
}

/// Folds setting rows into a single `{key: value}` object. A repeated key
/// keeps the last value seen; keyless rows are skipped.
pub fn settings_object(rows: Vec<Setting>) -> Map<String, Value> {
    rows.into_iter()
        .filter_map(|s| Some((s.key?, s.value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LiveWorship;
    use serde_json::json;

    #[test]
    fn settings_fold_into_object() {
        let rows = vec![Setting::new("mission", "A"), Setting::new("vision", "B")];
        let obj = Value::Object(settings_object(rows));
        assert_eq!(obj, json!({ "mission": "A", "vision": "B" }));
    }

    #[test]
    fn keyless_setting_rows_are_skipped() {
        let keyless: Setting = serde_json::from_value(json!({ "value": "órfão" })).unwrap();
        let rows = vec![keyless, Setting::new("culture", "C")];
        assert_eq!(Value::Object(settings_object(rows)), json!({ "culture": "C" }));
    }

    #[test]
    fn settings_last_key_wins() {
        let rows = vec![Setting::new("mission", "old"), Setting::new("mission", "new")];
        assert_eq!(settings_object(rows)["mission"], "new");
    }

    #[test]
    fn latest_falls_back_only_when_empty() {
        let empty = Latest::or_else(None, LiveWorship::fallback);
        assert_eq!(serde_json::to_value(empty).unwrap(), json!({ "url": "" }));

        let row = Record::new(
            3,
            None,
            LiveWorship {
                url: Some("https://example.org/live".into()),
            },
        );
        let found = Latest::or_else(Some(row), LiveWorship::fallback);
        assert_eq!(
            serde_json::to_value(found).unwrap(),
            json!({ "id": 3, "url": "https://example.org/live" })
        );
    }

    #[test]
    fn report_request_ignores_client_date() {
        let req: CreateDailyReportRequest = serde_json::from_value(json!({
            "date": "1999-01-01",
            "status": "authorized",
            "offerings": 10.5,
            "created_by_name": "Tesouraria"
        }))
        .unwrap();
        assert_eq!(req.offerings, Some(json!(10.5)));
        assert_eq!(req.created_by_name.as_deref(), Some("Tesouraria"));
    }
}
