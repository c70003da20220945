use std::future::Future;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    observer::{API_KEY_HEADER, AUTH_TOKEN_HEADER, Credentials, WeekDescriptor},
    requests::RequestClient,
};

/// One row of a week's timetable as the API returns it.
///
/// Every field is optional on the wire; missing or null fields decode to an
/// empty string and are judged later by the event mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawScheduleRecord {
    /// `dd/mm/yyyy`
    #[serde(rename = "NgayHoc", default, deserialize_with = "lenient_string")]
    pub date: String,
    /// `start-end` period indices.
    #[serde(rename = "TietHoc", default, deserialize_with = "lenient_string")]
    pub periods: String,
    #[serde(rename = "TenPhong", default, deserialize_with = "lenient_string")]
    pub room: String,
    /// Free text with the start clock time in parentheses.
    #[serde(rename = "BuoiHoc", default, deserialize_with = "lenient_string")]
    pub session: String,
    #[serde(rename = "MaLopHocPhan", default, deserialize_with = "lenient_string")]
    pub section: String,
    #[serde(rename = "SoTiet", default, deserialize_with = "lenient_string")]
    pub period_count: String,
    #[serde(rename = "TenGiangVien", default, deserialize_with = "lenient_string")]
    pub instructor: String,
    #[serde(rename = "TenHocPhan", default, deserialize_with = "lenient_string")]
    pub course_title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleResponse {
    #[serde(rename = "ResultDataSchedule", default)]
    pub result_data_schedule: Option<Vec<RawScheduleRecord>>,
}

impl ScheduleResponse {
    pub fn into_records(self) -> Vec<RawScheduleRecord> {
        self.result_data_schedule.unwrap_or_default()
    }
}

// Strings stay as-is, numbers and booleans are rendered, null becomes empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Source of per-week timetable data.
pub trait ScheduleApi {
    fn fetch_week(
        &self,
        week: &WeekDescriptor,
        credentials: &Credentials,
    ) -> impl Future<Output = anyhow::Result<ScheduleResponse>> + Send;
}

/// The institution's timetable API, reached over HTTP.
pub struct TimetableApi<'a> {
    request_client: &'a RequestClient,
    api_base: String,
    client_id: String,
}

impl<'a> TimetableApi<'a> {
    pub fn new(request_client: &'a RequestClient, api_base: &str, client_id: &str) -> Self {
        Self {
            request_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
        }
    }

    pub fn week_url(&self, week: &WeekDescriptor) -> String {
        format!(
            "{}/DrawingSchedules?namhoc={}&hocky={}&tuan={}",
            self.api_base, week.year_of_study, week.term_id, week.week_number
        )
    }

    fn headers(&self, credentials: &Credentials) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(&credentials.api_key)?,
        );
        headers.insert(
            HeaderName::from_static(AUTH_TOKEN_HEADER),
            HeaderValue::from_str(&credentials.auth_token)?,
        );
        headers.insert(
            HeaderName::from_static("clientid"),
            HeaderValue::from_str(&self.client_id)?,
        );
        Ok(headers)
    }
}

impl ScheduleApi for TimetableApi<'_> {
    async fn fetch_week(
        &self,
        week: &WeekDescriptor,
        credentials: &Credentials,
    ) -> anyhow::Result<ScheduleResponse> {
        let headers = self.headers(credentials)?;
        let url = self.week_url(week);
        self.request_client.get_json(&url, headers).await
    }
}
