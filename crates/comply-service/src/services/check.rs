//! Label compliance check service
//!
//! Owns the check lifecycle: session creation, panel image upload, vision
//! extraction, and per-rule scoring. Scoring is all-or-nothing; a provider
//! failure or unparseable scoring reply marks the whole check failed.

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use comply_core::entities::{CheckResult, ComplianceCheck, ComplianceRule, PanelUpload};
use comply_core::value_objects::{CheckStatus, ResultStatus};

use crate::dto::{
    CheckDetailResponse, CheckResponse, CheckResultResponse, CreateCheckRequest, PanelResponse,
    UploadPanelRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

const SCORING_SYSTEM_PROMPT: &str = "You are a cannabis label compliance auditor. You receive \
structured text extracted from photographed label panels and a list of compliance rules. Score \
every rule. Respond with a JSON array only, no prose. Each element must be an object with: \
rule_id (copied from the rule list), status (one of \"pass\", \"warning\", \"fail\"), \
found_value (what the label actually shows, or null), expected_value (what the rule requires, \
or null), and explanation (one or two sentences).";

/// Label compliance check service
pub struct CheckService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CheckService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start a new check session
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateCheckRequest,
    ) -> ServiceResult<CheckResponse> {
        let state = self
            .ctx
            .state_repo()
            .find_by_id(request.state_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("State", request.state_id.to_string()))?;
        if !state.is_active {
            return Err(ServiceError::validation(format!(
                "State {} is not accepting checks",
                state.code
            )));
        }

        let check = ComplianceCheck::new(
            Uuid::new_v4(),
            owner_id,
            request.state_id,
            request.product_type.trim().to_lowercase(),
        );
        self.ctx.check_repo().create(&check).await?;

        info!(check_id = %check.id, "Compliance check created");

        Ok(CheckResponse::from(&check))
    }

    /// Attach a panel image to a pending check
    #[instrument(skip(self, request), fields(panel_type = %request.panel_type))]
    pub async fn upload_panel(
        &self,
        owner_id: Uuid,
        check_id: Uuid,
        request: UploadPanelRequest,
    ) -> ServiceResult<PanelResponse> {
        let check = self.load_owned(owner_id, check_id).await?;
        if check.status != CheckStatus::Pending {
            return Err(ServiceError::conflict(
                "Panels can only be added before analysis starts",
            ));
        }

        if !ALLOWED_CONTENT_TYPES.contains(&request.content_type.as_str()) {
            return Err(ServiceError::validation(format!(
                "Unsupported image type: {}",
                request.content_type
            )));
        }
        if request.bytes.is_empty() {
            return Err(ServiceError::validation("Uploaded image is empty"));
        }

        let panel_id = Uuid::new_v4();
        let object_key = format!("{owner_id}/{check_id}/{panel_id}");
        self.ctx
            .object_store()
            .put(&object_key, &request.bytes)
            .await?;

        let panel = PanelUpload::new(
            panel_id,
            check_id,
            request.panel_type,
            object_key,
            request.content_type,
        );
        self.ctx.panel_repo().create(&panel).await?;

        info!(check_id = %check_id, panel_id = %panel_id, "Panel uploaded");

        Ok(PanelResponse::from(&panel))
    }

    /// Run extraction and scoring for a pending check
    ///
    /// Any fatal pipeline error marks the check failed before propagating, so
    /// the stored session always reflects what happened.
    #[instrument(skip(self, rule_ids))]
    pub async fn analyze(
        &self,
        owner_id: Uuid,
        check_id: Uuid,
        rule_ids: Option<Vec<Uuid>>,
    ) -> ServiceResult<CheckDetailResponse> {
        let mut check = self.load_owned(owner_id, check_id).await?;
        if check.status != CheckStatus::Pending {
            return Err(ServiceError::conflict(format!(
                "Check is already {}",
                check.status
            )));
        }

        let panels = self.ctx.panel_repo().find_by_check(check_id).await?;
        if panels.is_empty() {
            return Err(ServiceError::validation(
                "At least one panel must be uploaded before analysis",
            ));
        }

        check.status = CheckStatus::Processing;
        self.ctx.check_repo().update(&check).await?;

        match self.run_pipeline(&mut check, panels, rule_ids).await {
            Ok(detail) => Ok(detail),
            Err(e) => {
                check.fail(e.to_string());
                if let Err(persist_err) = self.ctx.check_repo().update(&check).await {
                    warn!(check_id = %check_id, error = %persist_err, "Failed to persist check failure");
                }
                Err(e)
            }
        }
    }

    /// Fetch a check with its panels and results
    #[instrument(skip(self))]
    pub async fn get(&self, owner_id: Uuid, check_id: Uuid) -> ServiceResult<CheckDetailResponse> {
        let check = self.load_owned(owner_id, check_id).await?;
        self.detail(check).await
    }

    /// List the caller's checks, newest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<CheckResponse>> {
        let checks = self
            .ctx
            .check_repo()
            .find_by_owner(owner_id, limit.clamp(1, 100), offset.max(0))
            .await?;
        Ok(checks.iter().map(CheckResponse::from).collect())
    }

    async fn run_pipeline(
        &self,
        check: &mut ComplianceCheck,
        mut panels: Vec<PanelUpload>,
        rule_ids: Option<Vec<Uuid>>,
    ) -> ServiceResult<CheckDetailResponse> {
        let retry = self.ctx.retry_policy();
        let threshold = self.ctx.analysis().confidence_threshold;

        // Phase 1: vision extraction per panel
        for panel in &mut panels {
            let bytes = self.ctx.object_store().get(&panel.object_key).await?;
            let prompt = build_vision_prompt(panel, &check.product_type);
            let reply = retry
                .run(|| {
                    self.ctx
                        .vision_client()
                        .analyze_image(&prompt, &bytes, &panel.content_type)
                })
                .await?;
            let extraction = comply_ai::extract_json_object(&reply)?;

            panel.flag_reasons = extraction_flags(&extraction, threshold);
            panel.flagged_for_review = !panel.flag_reasons.is_empty();
            panel.extraction = Some(extraction);
            self.ctx.panel_repo().update_extraction(panel).await?;
        }

        // Phase 2: score every applicable rule against the extractions
        let mut rules: Vec<ComplianceRule> = self
            .ctx
            .rule_repo()
            .find_active_by_state(check.state_id)
            .await?
            .into_iter()
            .filter(|r| r.applies_to(&check.product_type))
            .collect();

        // Caller-selected rules join the set even when the product type
        // filter would exclude them
        for rule_id in rule_ids.unwrap_or_default() {
            if rules.iter().any(|r| r.id == rule_id) {
                continue;
            }
            let rule = self
                .ctx
                .rule_repo()
                .find_by_id(rule_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Rule", rule_id.to_string()))?;
            push_selected_rule(&mut rules, rule, check.state_id)?;
        }

        let results = if rules.is_empty() {
            Vec::new()
        } else {
            let prompt = build_scoring_prompt(&check.product_type, &rules, &panels);
            let reply = retry
                .run(|| self.ctx.reasoning_client().complete(SCORING_SYSTEM_PROMPT, &prompt))
                .await?;
            let items = comply_ai::extract_json_array(&reply)?;
            parse_scores(check.id, &rules, &items)
        };

        self.ctx.result_repo().create_batch(&results).await?;

        let statuses: Vec<ResultStatus> = results.iter().map(|r| r.status).collect();
        check.complete(&statuses);
        self.ctx.check_repo().update(check).await?;

        info!(
            check_id = %check.id,
            pass = check.pass_count,
            warning = check.warning_count,
            fail = check.fail_count,
            "Check analysis complete"
        );

        Ok(CheckDetailResponse {
            check: CheckResponse::from(&*check),
            panels: panels.iter().map(PanelResponse::from).collect(),
            results: results.iter().map(CheckResultResponse::from).collect(),
        })
    }

    async fn detail(&self, check: ComplianceCheck) -> ServiceResult<CheckDetailResponse> {
        let panels = self.ctx.panel_repo().find_by_check(check.id).await?;
        let results = self.ctx.result_repo().find_by_check(check.id).await?;

        Ok(CheckDetailResponse {
            check: CheckResponse::from(&check),
            panels: panels.iter().map(PanelResponse::from).collect(),
            results: results.iter().map(CheckResultResponse::from).collect(),
        })
    }

    async fn load_owned(&self, owner_id: Uuid, check_id: Uuid) -> ServiceResult<ComplianceCheck> {
        let check = self
            .ctx
            .check_repo()
            .find_by_id(check_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Check", check_id.to_string()))?;

        // Checks are private to their owner
        if check.owner_id != owner_id {
            return Err(ServiceError::not_found("Check", check_id.to_string()));
        }

        Ok(check)
    }
}

/// Add a caller-selected rule to the scoring set
///
/// Selection crosses the product type filter, never state lines.
fn push_selected_rule(
    rules: &mut Vec<ComplianceRule>,
    rule: ComplianceRule,
    state_id: Uuid,
) -> ServiceResult<()> {
    if rule.state_id != state_id {
        return Err(ServiceError::validation(
            "Selected rule belongs to a different state",
        ));
    }
    if !rules.iter().any(|r| r.id == rule.id) {
        rules.push(rule);
    }
    Ok(())
}

/// Instruction for the vision model, specific to the panel face
fn build_vision_prompt(panel: &PanelUpload, product_type: &str) -> String {
    format!(
        "This is the {} panel of a cannabis {} product label. Extract everything legible into a \
         JSON object with these fields: text_content (full transcription), thc_symbol_present \
         (boolean), warning_statements (array of strings), net_weight, thc_content, cbd_content, \
         license_number, batch_number (all strings or null), and confidence (0.0-1.0, your \
         overall confidence in the transcription). If parts are illegible, also include an \
         issues array of short strings describing them. Respond with the JSON object only.",
        panel.panel_type, product_type
    )
}

/// Review flags derived from one panel extraction
fn extraction_flags(extraction: &JsonValue, threshold: f64) -> Vec<String> {
    let mut flags = Vec::new();

    match extraction.get("confidence").and_then(JsonValue::as_f64) {
        Some(confidence) if confidence < threshold => {
            flags.push(format!("low extraction confidence: {confidence:.2}"));
        }
        Some(_) => {}
        None => flags.push("extraction reported no confidence".to_string()),
    }

    if let Some(issues) = extraction.get("issues").and_then(JsonValue::as_array) {
        for issue in issues.iter().filter_map(JsonValue::as_str) {
            flags.push(issue.to_string());
        }
    }

    flags
}

/// Build the user prompt for rule scoring
fn build_scoring_prompt(
    product_type: &str,
    rules: &[ComplianceRule],
    panels: &[PanelUpload],
) -> String {
    let rule_list: Vec<JsonValue> = rules
        .iter()
        .map(|r| {
            serde_json::json!({
                "rule_id": r.id,
                "name": r.name,
                "description": r.description,
                "severity": r.severity,
                "additional_instructions": r.validation_prompt,
            })
        })
        .collect();

    let panel_list: Vec<JsonValue> = panels
        .iter()
        .map(|p| {
            serde_json::json!({
                "panel": p.panel_type,
                "extraction": p.extraction,
            })
        })
        .collect();

    format!(
        "Product type: {}\n\nRules to score:\n{}\n\nPanel extractions:\n{}",
        product_type,
        serde_json::to_string_pretty(&rule_list).unwrap_or_else(|_| "[]".to_string()),
        serde_json::to_string_pretty(&panel_list).unwrap_or_else(|_| "[]".to_string()),
    )
}

/// Map scoring output onto the rule set
///
/// Every rule produces exactly one result. Items referencing unknown rules
/// are dropped; rules the model skipped come back as warnings so they are
/// visible without sinking the whole check.
fn parse_scores(check_id: Uuid, rules: &[ComplianceRule], items: &JsonValue) -> Vec<CheckResult> {
    let empty = Vec::new();
    let array = items.as_array().unwrap_or(&empty);

    rules
        .iter()
        .map(|rule| {
            let item = array.iter().find(|i| {
                i.get("rule_id")
                    .and_then(JsonValue::as_str)
                    .and_then(|s| s.parse::<Uuid>().ok())
                    == Some(rule.id)
            });

            match item {
                Some(item) => score_from_item(check_id, rule, item),
                None => unevaluated_result(check_id, rule),
            }
        })
        .collect()
}

fn score_from_item(check_id: Uuid, rule: &ComplianceRule, item: &JsonValue) -> CheckResult {
    let status = item
        .get("status")
        .and_then(JsonValue::as_str)
        .and_then(|s| s.parse::<ResultStatus>().ok());

    let Some(status) = status else {
        return unevaluated_result(check_id, rule);
    };

    let text = |key: &str| {
        item.get(key)
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    CheckResult {
        id: Uuid::new_v4(),
        check_id,
        rule_id: rule.id,
        rule_name: rule.name.clone(),
        status,
        found_value: text("found_value"),
        expected_value: text("expected_value"),
        explanation: text("explanation"),
        created_at: Utc::now(),
    }
}

fn unevaluated_result(check_id: Uuid, rule: &ComplianceRule) -> CheckResult {
    CheckResult {
        id: Uuid::new_v4(),
        check_id,
        rule_id: rule.id,
        rule_name: rule.name.clone(),
        status: ResultStatus::Warning,
        found_value: None,
        expected_value: None,
        explanation: Some("The model did not score this rule".to_string()),
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_core::value_objects::{RuleCategory, Severity, SourceType};
    use serde_json::json;

    fn rule(severity: Severity) -> ComplianceRule {
        ComplianceRule::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Net Weight".to_string(),
            "Net weight on front panel".to_string(),
            RuleCategory::Labeling,
            severity,
            SourceType::Regulatory,
        )
    }

    #[test]
    fn test_extraction_flags_low_confidence() {
        let flags = extraction_flags(&json!({"confidence": 0.6}), 0.85);
        assert_eq!(flags.len(), 1);
        assert!(flags[0].contains("0.60"));
    }

    #[test]
    fn test_extraction_flags_confident_is_clean() {
        let flags = extraction_flags(&json!({"confidence": 0.95}), 0.85);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_extraction_flags_missing_confidence() {
        let flags = extraction_flags(&json!({"text_content": "..."}), 0.85);
        assert_eq!(flags, vec!["extraction reported no confidence".to_string()]);
    }

    #[test]
    fn test_extraction_flags_collects_issues() {
        let flags = extraction_flags(
            &json!({"confidence": 0.9, "issues": ["glare on lower left", "blurry batch number"]}),
            0.85,
        );
        assert_eq!(flags.len(), 2);
    }

    #[test]
    fn test_parse_scores_matches_by_rule_id() {
        let check_id = Uuid::new_v4();
        let r = rule(Severity::Error);
        let items = json!([{
            "rule_id": r.id,
            "status": "fail",
            "found_value": "no weight shown",
            "expected_value": "net weight statement",
            "explanation": "The front panel shows no net weight.",
        }]);

        let results = parse_scores(check_id, &[r], &items);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, ResultStatus::Fail);
        assert_eq!(results[0].found_value.as_deref(), Some("no weight shown"));
    }

    #[test]
    fn test_parse_scores_unscored_rule_becomes_warning() {
        let results = parse_scores(Uuid::new_v4(), &[rule(Severity::Error)], &json!([]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, ResultStatus::Warning);
        assert!(results[0]
            .explanation
            .as_deref()
            .unwrap()
            .contains("did not score"));
    }

    #[test]
    fn test_parse_scores_ignores_unknown_rule_ids() {
        let r = rule(Severity::Error);
        let items = json!([
            {"rule_id": Uuid::new_v4(), "status": "fail"},
            {"rule_id": r.id, "status": "pass"},
        ]);

        let results = parse_scores(Uuid::new_v4(), &[r], &items);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, ResultStatus::Pass);
    }

    #[test]
    fn test_model_status_stored_regardless_of_severity() {
        let check_id = Uuid::new_v4();
        let r = rule(Severity::Warning);
        let items = json!([{"rule_id": r.id, "status": "fail"}]);

        let results = parse_scores(check_id, &[r], &items);
        assert_eq!(results[0].status, ResultStatus::Fail);

        let r = rule(Severity::Info);
        let items = json!([{"rule_id": r.id, "status": "fail"}]);
        let results = parse_scores(check_id, &[r], &items);
        assert_eq!(results[0].status, ResultStatus::Fail);
    }

    #[test]
    fn test_selected_rule_joins_scoring_set() {
        let state_id = Uuid::new_v4();
        let mut base = rule(Severity::Error);
        base.state_id = state_id;
        let mut extra = rule(Severity::Warning);
        extra.state_id = state_id;
        let extra_id = extra.id;

        let mut rules = vec![base];
        push_selected_rule(&mut rules, extra.clone(), state_id).unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().any(|r| r.id == extra_id));

        // selecting an already-present rule is a no-op
        push_selected_rule(&mut rules, extra, state_id).unwrap();
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_selected_rule_from_other_state_rejected() {
        let mut rules = Vec::new();
        let foreign = rule(Severity::Error);

        let err = push_selected_rule(&mut rules, foreign, Uuid::new_v4()).unwrap_err();
        assert!(err.to_string().contains("different state"));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_scoring_prompt_carries_validation_prompt() {
        let mut r = rule(Severity::Error);
        r.validation_prompt = Some("Check the weight is in both grams and ounces".to_string());
        let prompt = build_scoring_prompt("edible", &[r], &[]);
        assert!(prompt.contains("grams and ounces"));
    }
}
