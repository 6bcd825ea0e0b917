//! Regulatory source check pipeline
//!
//! Fetches each monitored government page, detects content changes via
//! SHA-256 digests, and runs changed content through the diff analyzer to
//! produce rule change suggestions. One failing source never aborts the run;
//! every outcome lands in the returned summary.

use serde::Serialize;
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use comply_core::entities::{ComplianceRule, RegulatorySource, RuleChangeSuggestion, State};
use comply_core::value_objects::{resolve_citation, ChangeType, RuleCategory, Severity};

use crate::dto::RunChecksRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::require_admin;

const EXCERPT_MAX_CHARS: usize = 500;
const SEARCH_MAX_RESULTS: u32 = 3;

const DIFF_SYSTEM_PROMPT: &str = "You are a cannabis regulatory compliance analyst. You compare \
the current text of a government regulation page against a list of known labeling compliance \
rules and identify changes. Respond with a JSON array only, no prose. Each element must be an \
object with: change_type (one of \"new\", \"update\", \"deprecate\"), name, description, \
category, severity (one of \"error\", \"warning\", \"info\"), citation, source_url, \
existing_rule_id (required for update/deprecate, copied from the rule list), reasoning, and \
excerpt (a short verbatim quote from the page). Return an empty array if the page implies no \
rule changes.";

/// How one source fared during a check run
///
/// `ScrapeError` covers fetch failures; `ParseError` covers everything that
/// goes wrong after content is in hand, including unusable analyzer replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    NoChanges,
    Changed,
    ScrapeError,
    ParseError,
}

impl OutcomeStatus {
    fn is_error(self) -> bool {
        matches!(self, Self::ScrapeError | Self::ParseError)
    }
}

/// Per-source result of a check run
#[derive(Debug, Serialize)]
pub struct SourceCheckOutcome {
    pub source_id: Uuid,
    pub source_name: String,
    pub status: OutcomeStatus,
    pub suggestions_created: usize,
    /// Analyzer items dropped for being malformed or duplicates
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceCheckOutcome {
    fn new(source: &RegulatorySource, status: OutcomeStatus) -> Self {
        Self {
            source_id: source.id,
            source_name: source.source_name.clone(),
            status,
            suggestions_created: 0,
            skipped: 0,
            error: None,
        }
    }

    fn failed(source: &RegulatorySource, status: OutcomeStatus, error: impl Into<String>) -> Self {
        let mut outcome = Self::new(source, status);
        outcome.error = Some(error.into());
        outcome
    }
}

/// Summary of a full check run
#[derive(Debug, Serialize)]
pub struct SourceCheckSummary {
    pub checked: usize,
    pub no_changes: usize,
    pub changed: usize,
    pub failed: usize,
    pub suggestions_created: usize,
    pub outcomes: Vec<SourceCheckOutcome>,
}

impl SourceCheckSummary {
    fn from_outcomes(outcomes: Vec<SourceCheckOutcome>) -> Self {
        let count = |s: OutcomeStatus| outcomes.iter().filter(|o| o.status == s).count();
        Self {
            checked: outcomes.len(),
            no_changes: count(OutcomeStatus::NoChanges),
            changed: count(OutcomeStatus::Changed),
            failed: outcomes.iter().filter(|o| o.status.is_error()).count(),
            suggestions_created: outcomes.iter().map(|o| o.suggestions_created).sum(),
            outcomes,
        }
    }
}

/// Regulatory source check pipeline
pub struct SourceCheckService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SourceCheckService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check every active source that is due, per its check frequency
    ///
    /// This is the scheduler entry point.
    #[instrument(skip(self))]
    pub async fn run_due_checks(&self) -> ServiceResult<SourceCheckSummary> {
        let now = chrono::Utc::now();
        let sources = self.ctx.source_repo().list_active().await?;
        let due: Vec<_> = sources.into_iter().filter(|s| s.is_due(now)).collect();

        info!(due = due.len(), "Running scheduled source checks");

        let mut outcomes = Vec::with_capacity(due.len());
        for source in &due {
            outcomes.push(self.check_one(source, false, false).await);
        }

        let summary = SourceCheckSummary::from_outcomes(outcomes);
        info!(
            checked = summary.checked,
            changed = summary.changed,
            failed = summary.failed,
            suggestions = summary.suggestions_created,
            "Source check run complete"
        );
        Ok(summary)
    }

    /// Check sources on demand instead of waiting for the scheduler
    /// (admin only)
    ///
    /// The request scopes the run to one source or one state; with neither
    /// set, every active source is checked regardless of schedule. `force`
    /// re-runs the diff analyzer even when the content hash is unchanged.
    #[instrument(skip(self, request))]
    pub async fn run_checks(
        &self,
        actor_id: Uuid,
        request: RunChecksRequest,
    ) -> ServiceResult<SourceCheckSummary> {
        require_admin(self.ctx, actor_id).await?;

        let sources = if let Some(source_id) = request.source_id {
            let source = self
                .ctx
                .source_repo()
                .find_by_id(source_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Source", source_id.to_string()))?;
            vec![source]
        } else if let Some(state_id) = request.state_id {
            self.ctx
                .source_repo()
                .find_by_state(state_id)
                .await?
                .into_iter()
                .filter(|s| s.is_active)
                .collect()
        } else {
            self.ctx.source_repo().list_active().await?
        };

        let mut outcomes = Vec::with_capacity(sources.len());
        for source in &sources {
            outcomes.push(
                self.check_one(source, request.force, request.web_search)
                    .await,
            );
        }

        Ok(SourceCheckSummary::from_outcomes(outcomes))
    }

    /// Check a single source immediately, ignoring its schedule (admin only)
    #[instrument(skip(self))]
    pub async fn check_source(
        &self,
        actor_id: Uuid,
        source_id: Uuid,
    ) -> ServiceResult<SourceCheckOutcome> {
        require_admin(self.ctx, actor_id).await?;

        let source = self
            .ctx
            .source_repo()
            .find_by_id(source_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Source", source_id.to_string()))?;

        Ok(self.check_one(&source, false, false).await)
    }

    /// Run the full pipeline for one source, capturing all failures in the
    /// outcome so the caller's loop keeps going
    ///
    /// Fetch failures are not retried; the retry budget belongs to the diff
    /// analyzer call.
    async fn check_one(
        &self,
        source: &RegulatorySource,
        force: bool,
        web_search: bool,
    ) -> SourceCheckOutcome {
        let page = match self.ctx.scrape_client().fetch(&source.source_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(source_id = %source.id, error = %e, "Scrape failed");
                return SourceCheckOutcome::failed(
                    source,
                    OutcomeStatus::ScrapeError,
                    format!("scrape failed: {e}"),
                );
            }
        };

        let hash = sha256_hex(&page.content);
        let changed = source.content_changed(&hash);
        let checked_at = chrono::Utc::now();

        if !changed && !force {
            debug!(source_id = %source.id, "Content unchanged");
            self.record_check(source, checked_at, None).await;
            return SourceCheckOutcome::new(source, OutcomeStatus::NoChanges);
        }

        info!(source_id = %source.id, changed, force, "Running diff analysis");

        let status = if changed {
            OutcomeStatus::Changed
        } else {
            OutcomeStatus::NoChanges
        };

        match self.analyze_change(source, &page.content, web_search).await {
            Ok(mut outcome) => {
                outcome.status = status;
                self.record_check(source, checked_at, changed.then_some(hash.as_str()))
                    .await;
                outcome
            }
            Err(e) => {
                // The hash stays unrecorded so the change is re-analyzed on
                // the next due run; last_checked still moves to keep the
                // per-source cadence
                self.record_check(source, checked_at, None).await;
                SourceCheckOutcome::failed(source, OutcomeStatus::ParseError, e.to_string())
            }
        }
    }

    /// Bookkeeping write; failures are logged, never alter the outcome
    async fn record_check(
        &self,
        source: &RegulatorySource,
        checked_at: chrono::DateTime<chrono::Utc>,
        new_hash: Option<&str>,
    ) {
        if let Err(e) = self
            .ctx
            .source_repo()
            .record_check(source.id, checked_at, new_hash)
            .await
        {
            warn!(source_id = %source.id, error = %e, "Failed to record source check");
        }
    }

    /// Diff-analyze changed content and persist the resulting suggestions
    async fn analyze_change(
        &self,
        source: &RegulatorySource,
        content: &str,
        web_search: bool,
    ) -> ServiceResult<SourceCheckOutcome> {
        let state = self
            .ctx
            .state_repo()
            .find_by_id(source.state_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("State", source.state_id.to_string()))?;
        let rules = self
            .ctx
            .rule_repo()
            .find_active_by_state(source.state_id)
            .await?;

        let budget = self.ctx.analysis().content_char_budget;
        let prompt = build_diff_prompt(&state, source, truncate_chars(content, budget), &rules);

        let retry = self.ctx.retry_policy();
        let reply = retry
            .run(|| self.ctx.reasoning_client().complete(DIFF_SYSTEM_PROMPT, &prompt))
            .await?;
        let items = comply_ai::extract_json_array(&reply)?;

        let (suggestions, mut skipped) = parse_suggestions(source.state_id, source.id, &items);

        let mut outcome = SourceCheckOutcome::new(source, OutcomeStatus::Changed);
        for mut suggestion in suggestions {
            // One pending suggestion per (state, name); re-detections are noise
            if self
                .ctx
                .suggestion_repo()
                .has_pending(suggestion.state_id, &suggestion.suggested_name)
                .await?
            {
                skipped += 1;
                continue;
            }

            if web_search {
                if !self.verify_source_url(&state, source, &mut suggestion).await {
                    debug!(
                        name = %suggestion.suggested_name,
                        url = ?suggestion.suggested_source_url,
                        "Discarding suggestion with unverified source URL"
                    );
                    skipped += 1;
                    continue;
                }
            } else {
                self.fill_source_url(&state, &mut suggestion).await;
            }

            self.ctx.suggestion_repo().create(&suggestion).await?;
            outcome.suggestions_created += 1;
        }
        outcome.skipped = skipped;

        Ok(outcome)
    }

    /// Backfill a missing source URL from the citation resolver. Misses leave
    /// the URL empty; they never fail the suggestion.
    async fn fill_source_url(&self, state: &State, suggestion: &mut RuleChangeSuggestion) {
        if suggestion.suggested_source_url.is_some() {
            return;
        }
        let Some(citation) = suggestion.suggested_citation.clone() else {
            return;
        };

        if let Some(link) = resolve_citation(&state.jurisdiction(), &citation) {
            suggestion.suggested_source_url = Some(link.url);
        }
    }

    /// Hold the suggestion's source URL against an allow-list of verified
    /// URLs: the citation resolver's link, the web search hits for the
    /// citation, and the monitored page itself. The reasoning model can
    /// invent plausible citations, so a URL matching none of these (by exact
    /// URL or by host) discards the suggestion. A missing URL is backfilled
    /// from the allow-list.
    async fn verify_source_url(
        &self,
        state: &State,
        source: &RegulatorySource,
        suggestion: &mut RuleChangeSuggestion,
    ) -> bool {
        let mut verified: Vec<String> = Vec::new();

        if let Some(citation) = suggestion.suggested_citation.clone() {
            if let Some(link) = resolve_citation(&state.jurisdiction(), &citation) {
                verified.push(link.url);
            }

            let query = format!("{} cannabis labeling regulations {citation}", state.name);
            match self
                .ctx
                .search_client()
                .search(&query, SEARCH_MAX_RESULTS)
                .await
            {
                Ok(hits) => verified.extend(hits.into_iter().map(|h| h.url)),
                Err(e) => debug!(error = %e, "Verification search failed"),
            }
        }

        verified.push(source.source_url.clone());

        match &suggestion.suggested_source_url {
            Some(url) => url_is_verified(url, &verified),
            None => {
                suggestion.suggested_source_url = verified.first().cloned();
                true
            }
        }
    }
}

/// Whether `url` matches a verified URL exactly or shares a host with one
fn url_is_verified(url: &str, verified: &[String]) -> bool {
    if verified.iter().any(|v| v == url) {
        return true;
    }
    match url_host(url) {
        Some(host) => verified
            .iter()
            .filter_map(|v| url_host(v))
            .any(|verified_host| verified_host == host),
        None => false,
    }
}

/// Extract the host from an http(s) URL without a full URL parser
fn url_host(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?.split(':').next()?;
    (!host.is_empty()).then_some(host)
}

/// SHA-256 hex digest of page content
pub(crate) fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Truncate to at most `budget` characters without splitting a char
fn truncate_chars(content: &str, budget: usize) -> &str {
    match content.char_indices().nth(budget) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Build the user prompt for the diff analyzer
fn build_diff_prompt(
    state: &State,
    source: &RegulatorySource,
    content: &str,
    rules: &[ComplianceRule],
) -> String {
    let rule_list: Vec<JsonValue> = rules
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "name": r.name,
                "description": r.description,
                "category": r.category,
                "severity": r.severity,
                "citation": r.citation,
            })
        })
        .collect();

    format!(
        "State: {} ({})\nSource: {} ({})\n\nKnown active rules:\n{}\n\nCurrent page content:\n{}",
        state.name,
        state.code,
        source.source_name,
        source.source_url,
        serde_json::to_string_pretty(&rule_list).unwrap_or_else(|_| "[]".to_string()),
        content
    )
}

/// Parse analyzer output items into suggestions
///
/// Malformed items are dropped, not fatal: a missing name, an unknown change
/// type, or an update/deprecate without a resolvable rule reference all just
/// bump the skip counter.
fn parse_suggestions(
    state_id: Uuid,
    source_id: Uuid,
    items: &JsonValue,
) -> (Vec<RuleChangeSuggestion>, usize) {
    let mut suggestions = Vec::new();
    let mut skipped = 0;

    let Some(array) = items.as_array() else {
        return (suggestions, skipped);
    };

    for item in array {
        match parse_suggestion(state_id, source_id, item) {
            Some(suggestion) => suggestions.push(suggestion),
            None => skipped += 1,
        }
    }

    (suggestions, skipped)
}

fn parse_suggestion(state_id: Uuid, source_id: Uuid, item: &JsonValue) -> Option<RuleChangeSuggestion> {
    let change_type: ChangeType = item.get("change_type")?.as_str()?.parse().ok()?;
    let name = item.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let existing_rule_id = item
        .get("existing_rule_id")
        .and_then(JsonValue::as_str)
        .and_then(|s| s.parse::<Uuid>().ok());
    if change_type.requires_existing_rule() && existing_rule_id.is_none() {
        return None;
    }

    let text = |key: &str| {
        item.get(key)
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    let mut suggestion =
        RuleChangeSuggestion::new(Uuid::new_v4(), state_id, change_type, name.to_string());
    suggestion.source_id = Some(source_id);
    suggestion.existing_rule_id = existing_rule_id;
    suggestion.suggested_description = text("description");
    suggestion.suggested_category = item
        .get("category")
        .and_then(JsonValue::as_str)
        .map(RuleCategory::parse_lenient);
    suggestion.suggested_severity = item
        .get("severity")
        .and_then(JsonValue::as_str)
        .and_then(|s| s.parse::<Severity>().ok());
    suggestion.suggested_citation = text("citation");
    suggestion.suggested_source_url = text("source_url");
    suggestion.ai_reasoning = text("reasoning");
    suggestion.source_excerpt =
        text("excerpt").map(|e| truncate_chars(&e, EXCERPT_MAX_CHARS).to_string());

    Some(suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sha256_hex() {
        // Known digest of the empty string
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(sha256_hex("abc").len(), 64);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // multibyte chars must not be split
        assert_eq!(truncate_chars("§§§§", 2), "§§");
    }

    #[test]
    fn test_parse_suggestions_full_item() {
        let state_id = Uuid::new_v4();
        let source_id = Uuid::new_v4();
        let items = json!([{
            "change_type": "new",
            "name": "THC Symbol Size",
            "description": "Symbol must be at least 0.5 inch",
            "category": "symbols",
            "severity": "error",
            "citation": "ARM 37.107.402",
            "reasoning": "New requirement effective October",
            "excerpt": "the universal symbol shall be no smaller than",
        }]);

        let (suggestions, skipped) = parse_suggestions(state_id, source_id, &items);
        assert_eq!(skipped, 0);
        assert_eq!(suggestions.len(), 1);

        let s = &suggestions[0];
        assert_eq!(s.change_type, ChangeType::New);
        assert_eq!(s.suggested_name, "THC Symbol Size");
        assert_eq!(s.suggested_category, Some(RuleCategory::Symbols));
        assert_eq!(s.suggested_severity, Some(Severity::Error));
        assert_eq!(s.source_id, Some(source_id));
        assert!(s.is_pending());
    }

    #[test]
    fn test_parse_suggestions_skips_update_without_rule_ref() {
        let items = json!([
            {"change_type": "update", "name": "Net Weight"},
            {"change_type": "deprecate", "name": "Old Warning", "existing_rule_id": Uuid::new_v4()},
        ]);

        let (suggestions, skipped) = parse_suggestions(Uuid::new_v4(), Uuid::new_v4(), &items);
        assert_eq!(skipped, 1);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].change_type, ChangeType::Deprecate);
        assert!(suggestions[0].existing_rule_id.is_some());
    }

    #[test]
    fn test_parse_suggestions_skips_malformed_items() {
        let items = json!([
            {"change_type": "merge", "name": "Unknown kind"},
            {"name": "No change type"},
            {"change_type": "new", "name": "   "},
            {"change_type": "add", "name": "Alias still works"},
        ]);

        let (suggestions, skipped) = parse_suggestions(Uuid::new_v4(), Uuid::new_v4(), &items);
        assert_eq!(skipped, 3);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].change_type, ChangeType::New);
    }

    #[test]
    fn test_parse_suggestions_unknown_category_degrades() {
        let items = json!([{
            "change_type": "new",
            "name": "Some Rule",
            "category": "miscellaneous",
        }]);

        let (suggestions, _) = parse_suggestions(Uuid::new_v4(), Uuid::new_v4(), &items);
        assert_eq!(suggestions[0].suggested_category, Some(RuleCategory::Other));
    }

    #[test]
    fn test_parse_suggestions_excerpt_truncated() {
        let long = "x".repeat(2_000);
        let items = json!([{
            "change_type": "new",
            "name": "Rule",
            "excerpt": long,
        }]);

        let (suggestions, _) = parse_suggestions(Uuid::new_v4(), Uuid::new_v4(), &items);
        let excerpt = suggestions[0].source_excerpt.as_ref().unwrap();
        assert_eq!(excerpt.chars().count(), EXCERPT_MAX_CHARS);
    }

    #[test]
    fn test_build_diff_prompt_includes_rules_and_content() {
        let state = State::new(Uuid::new_v4(), "MT", "Montana");
        let source = RegulatorySource::new(
            Uuid::new_v4(),
            state.id,
            "DPHHS Rules".to_string(),
            "https://example.gov/rules".to_string(),
            7,
        );
        let rule = ComplianceRule::new(
            Uuid::new_v4(),
            state.id,
            "Net Weight".to_string(),
            "Net weight on front panel".to_string(),
            RuleCategory::Labeling,
            Severity::Error,
            comply_core::value_objects::SourceType::Regulatory,
        );

        let prompt = build_diff_prompt(&state, &source, "page text here", &[rule]);
        assert!(prompt.contains("Montana"));
        assert!(prompt.contains("Net Weight"));
        assert!(prompt.contains("page text here"));
    }

    #[test]
    fn test_summary_counts() {
        let source = RegulatorySource::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "A".to_string(),
            "https://example.gov/a".to_string(),
            7,
        );
        let mut changed = SourceCheckOutcome::new(&source, OutcomeStatus::Changed);
        changed.suggestions_created = 2;
        let outcomes = vec![
            SourceCheckOutcome::new(&source, OutcomeStatus::NoChanges),
            changed,
            SourceCheckOutcome::failed(
                &source,
                OutcomeStatus::ScrapeError,
                "scrape failed: timeout",
            ),
            SourceCheckOutcome::failed(&source, OutcomeStatus::ParseError, "no JSON array"),
        ];

        let summary = SourceCheckSummary::from_outcomes(outcomes);
        assert_eq!(summary.checked, 4);
        assert_eq!(summary.no_changes, 1);
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.suggestions_created, 2);
    }

    #[test]
    fn test_outcome_status_wire_names() {
        let to_str = |s: OutcomeStatus| serde_json::to_string(&s).unwrap();
        assert_eq!(to_str(OutcomeStatus::NoChanges), "\"no_changes\"");
        assert_eq!(to_str(OutcomeStatus::Changed), "\"changed\"");
        assert_eq!(to_str(OutcomeStatus::ScrapeError), "\"scrape_error\"");
        assert_eq!(to_str(OutcomeStatus::ParseError), "\"parse_error\"");
    }

    #[test]
    fn test_url_host() {
        assert_eq!(
            url_host("https://rules.mt.gov/gateway/RuleNo.asp?RN=37"),
            Some("rules.mt.gov")
        );
        assert_eq!(url_host("http://example.gov:8080/page"), Some("example.gov"));
        assert_eq!(url_host("ftp://example.gov/page"), None);
        assert_eq!(url_host("not a url"), None);
    }

    #[test]
    fn test_url_verified_by_exact_match() {
        let verified = vec!["https://rules.mt.gov/gateway/RuleNo.asp?RN=37".to_string()];
        assert!(url_is_verified(
            "https://rules.mt.gov/gateway/RuleNo.asp?RN=37",
            &verified
        ));
    }

    #[test]
    fn test_url_verified_by_shared_host() {
        let verified = vec!["https://rules.mt.gov/gateway/RuleNo.asp?RN=37".to_string()];
        assert!(url_is_verified("https://rules.mt.gov/other/page", &verified));
    }

    #[test]
    fn test_invented_url_is_rejected() {
        let verified = vec![
            "https://rules.mt.gov/gateway/RuleNo.asp?RN=37".to_string(),
            "https://mtrevenue.gov/cannabis/".to_string(),
        ];
        assert!(!url_is_verified(
            "https://mt-cannabis-rules.example.com/labeling",
            &verified
        ));
        assert!(!url_is_verified("no scheme at all", &verified));
    }
}
