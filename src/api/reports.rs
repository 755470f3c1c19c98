// SPDX-License-Identifier: MIT

//! Report endpoints (boss only).

use reqwest::Method;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{ProjectAggregateList, ReportFilter};

impl ApiClient {
    /// `GET /reports/projects` - time aggregated per project.
    pub async fn project_report(&self, filter: &ReportFilter) -> Result<ProjectAggregateList> {
        self.request(Method::GET, "/reports/projects", None, &filter.to_query())
            .await
    }
}
