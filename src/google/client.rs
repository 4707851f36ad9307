use crate::error::{AttendanceError, AttendanceResult};
use crate::google::models::GoogleEvent;
use reqwest::{Client, Url};

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Minimal Google Calendar v3 client: inserts events into one calendar
pub struct CalendarClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl CalendarClient {
    pub fn new(access_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_API_URL.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Helper for testing to override base URL
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn events_url(&self, calendar_id: &str) -> AttendanceResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AttendanceError::Calendar(format!("Invalid API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AttendanceError::Calendar("API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);
        Ok(url)
    }

    /// `events.insert`; returns the created event as Google echoes it back
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &GoogleEvent,
    ) -> AttendanceResult<GoogleEvent> {
        let url = self.events_url(calendar_id)?;

        let res = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| AttendanceError::Calendar(format!("Request failed: {}", e)))?;

        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AttendanceError::Auth(format!(
                "Google rejected the access token ({})",
                text
            )));
        }
        if !status.is_success() {
            return Err(AttendanceError::Calendar(format!(
                "Event insert failed: {} ({})",
                status, text
            )));
        }

        Ok(serde_json::from_str(&text)?)
    }
}
