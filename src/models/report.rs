// SPDX-License-Identifier: MIT

//! Report aggregation models (boss only).

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

/// Per-project time aggregate for `GET /reports/projects`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectAggregate {
    pub project_id: Uuid,
    pub project_name: String,
    pub total_duration_seconds: i64,
    pub entry_count: i64,
}

/// Response wrapper for the project report.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectAggregateList {
    pub items: Vec<ProjectAggregate>,
}

/// Query filters for report endpoints.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
}

impl ReportFilter {
    /// Build the query string pairs for this filter.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(date) = self.start_date {
            query.push(("start_date", date.to_string()));
        }
        if let Some(date) = self.end_date {
            query.push(("end_date", date.to_string()));
        }
        if let Some(id) = self.user_id {
            query.push(("user_id", id.to_string()));
        }
        query
    }
}
