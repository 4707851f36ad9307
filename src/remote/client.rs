use crate::remote::models::{
    AckResponse, CheckInResponse, RecordsResponse, RemoteRecord, ScriptRequest,
};
use anyhow::{Context, Result};
use reqwest::blocking::Client;

pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the records the script knows about
    pub fn get_records(&self) -> Result<Vec<RemoteRecord>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", "getRecords")])
            .send()
            .context("Failed to fetch remote records")?;

        if !response.status().is_success() {
            anyhow::bail!("Remote getRecords error: status {}", response.status());
        }

        let body = response
            .json::<RecordsResponse>()
            .context("Failed to parse getRecords response")?;

        if body.success == Some(false) {
            anyhow::bail!(
                "Remote getRecords failed: {}",
                body.message.unwrap_or_else(|| "no message".to_string())
            );
        }

        Ok(body.records)
    }

    /// Record a check-in; the script opens a calendar event for it
    pub fn check_in(&self, title: &str) -> Result<Option<RemoteRecord>> {
        let body: CheckInResponse = self.post(&ScriptRequest::CheckIn {
            title: title.to_string(),
        })?;

        if !body.success {
            anyhow::bail!(
                "Remote checkIn failed: {}",
                body.message.unwrap_or_else(|| "no message".to_string())
            );
        }

        Ok(body.record)
    }

    /// Record a check-out against the event opened at check-in
    pub fn check_out(&self, title: &str, checkout_time: &str, event_id: &str) -> Result<bool> {
        let body: AckResponse = self.post(&ScriptRequest::CheckOut {
            title: title.to_string(),
            checkout_time: checkout_time.to_string(),
            event_id: event_id.to_string(),
        })?;

        if !body.success
            && let Some(message) = &body.message
        {
            tracing::debug!(message = %message, "remote checkOut rejected");
        }

        Ok(body.success)
    }

    fn post<T: serde::de::DeserializeOwned>(&self, request: &ScriptRequest) -> Result<T> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .context("Failed to reach remote endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("Remote API error: status {}", response.status());
        }

        response
            .json::<T>()
            .context("Failed to parse remote response")
    }
}
