//! Regulatory source entity <-> model mapper

use comply_core::RegulatorySource;

use crate::models::SourceModel;

impl From<SourceModel> for RegulatorySource {
    fn from(model: SourceModel) -> Self {
        RegulatorySource {
            id: model.id,
            state_id: model.state_id,
            source_name: model.source_name,
            source_url: model.source_url,
            content_hash: model.content_hash,
            last_checked: model.last_checked,
            last_content_change: model.last_content_change,
            check_frequency_days: model.check_frequency_days,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
