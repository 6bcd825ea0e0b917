//! Check report export service

use tracing::instrument;
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// CSV export of a completed check
pub struct ReportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReportService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Render the per-rule results of a check as CSV
    #[instrument(skip(self))]
    pub async fn csv_report(&self, owner_id: Uuid, check_id: Uuid) -> ServiceResult<String> {
        let check = self
            .ctx
            .check_repo()
            .find_by_id(check_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Check", check_id.to_string()))?;
        if check.owner_id != owner_id {
            return Err(ServiceError::not_found("Check", check_id.to_string()));
        }

        let results = self.ctx.result_repo().find_by_check(check_id).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "rule_name",
                "status",
                "found_value",
                "expected_value",
                "explanation",
            ])
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        for result in &results {
            writer
                .write_record([
                    result.rule_name.as_str(),
                    result.status.as_str(),
                    result.found_value.as_deref().unwrap_or(""),
                    result.expected_value.as_deref().unwrap_or(""),
                    result.explanation.as_deref().unwrap_or(""),
                ])
                .map_err(|e| ServiceError::internal(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ServiceError::internal(e.to_string()))?;
        let csv = String::from_utf8(bytes).map_err(|e| ServiceError::internal(e.to_string()))?;

        // Keep a copy in the object store under the check's prefix, next to
        // the panel images
        let object_key = Self::object_key(owner_id, check_id);
        self.ctx.object_store().put(&object_key, csv.as_bytes()).await?;

        Ok(csv)
    }

    /// Object store key for a check's report
    pub fn object_key(owner_id: Uuid, check_id: Uuid) -> String {
        format!("{owner_id}/{check_id}/report.csv")
    }

    /// Suggested download filename for a check report
    pub fn filename(check_id: Uuid) -> String {
        format!("compliance-check-{check_id}.csv")
    }
}
