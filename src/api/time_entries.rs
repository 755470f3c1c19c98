// SPDX-License-Identifier: MIT

//! Time entry endpoints.

use chrono::Utc;
use reqwest::Method;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::{AppError, Result};
use crate::models::{
    EntryFilter, ManualEntry, StartTimer, TimeEntry, TimeEntryPage, TimeEntryPatch,
};

impl ApiClient {
    /// `GET /time-entries/running` - the caller's running entry, if any.
    ///
    /// The response body is JSON `null` when no timer is running.
    pub async fn running_entry(&self) -> Result<Option<TimeEntry>> {
        self.request(Method::GET, "/time-entries/running", None, &[])
            .await
    }

    /// `POST /time-entries/start` - start a timer.
    pub async fn start_timer(&self, request: &StartTimer) -> Result<TimeEntry> {
        let body = serde_json::to_value(request)
            .map_err(|e| anyhow::anyhow!("serialize start request: {}", e))?;
        self.request(Method::POST, "/time-entries/start", Some(body), &[])
            .await
    }

    /// `POST /time-entries/{id}/stop` - stop a running timer.
    pub async fn stop_timer(&self, entry_id: Uuid) -> Result<TimeEntry> {
        let path = format!("/time-entries/{}/stop", entry_id);
        self.request(Method::POST, &path, None, &[]).await
    }

    /// `GET /time-entries` - filtered, paginated entry list.
    pub async fn list_entries(&self, filter: &EntryFilter) -> Result<TimeEntryPage> {
        self.request(Method::GET, "/time-entries", None, &filter.to_query())
            .await
    }

    /// `GET /time-entries/{id}`.
    pub async fn get_entry(&self, entry_id: Uuid) -> Result<TimeEntry> {
        let path = format!("/time-entries/{}", entry_id);
        self.request(Method::GET, &path, None, &[]).await
    }

    /// `POST /time-entries` - record an already-completed interval.
    ///
    /// Interval bounds are validated locally before any network call.
    pub async fn create_manual_entry(&self, entry: &ManualEntry) -> Result<TimeEntry> {
        if entry.end_time <= entry.start_time {
            return Err(AppError::Validation(
                "end_time must be after start_time".to_string(),
            ));
        }
        let now = Utc::now();
        if entry.start_time > now || entry.end_time > now {
            return Err(AppError::Validation(
                "time entries cannot be in the future".to_string(),
            ));
        }

        let body = serde_json::to_value(entry)
            .map_err(|e| anyhow::anyhow!("serialize manual entry: {}", e))?;
        self.request(Method::POST, "/time-entries", Some(body), &[])
            .await
    }

    /// `PUT /time-entries/{id}`.
    pub async fn update_entry(&self, entry_id: Uuid, patch: &TimeEntryPatch) -> Result<TimeEntry> {
        let path = format!("/time-entries/{}", entry_id);
        let body = serde_json::to_value(patch)
            .map_err(|e| anyhow::anyhow!("serialize entry patch: {}", e))?;
        self.request(Method::PUT, &path, Some(body), &[]).await
    }

    /// `DELETE /time-entries/{id}` - permanent removal.
    pub async fn delete_entry(&self, entry_id: Uuid) -> Result<()> {
        let path = format!("/time-entries/{}", entry_id);
        self.request_empty(Method::DELETE, &path, None).await
    }
}
