//! Citation resolver - maps jurisdiction + citation string to a regulation URL
//!
//! Pure function over an immutable pattern table built once at first use and
//! never mutated afterwards. Direct links point at the cited rule itself;
//! listing links point at the regulator's rules index when no per-rule URL
//! scheme exists for that jurisdiction.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::Jurisdiction;

/// How precise the resolved link is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Link resolves to the cited rule directly
    Direct,
    /// Link resolves to a rules listing/search page containing the citation
    Listing,
}

/// A resolved regulation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationLink {
    pub url: String,
    pub kind: LinkKind,
}

impl CitationLink {
    fn direct(url: String) -> Self {
        Self {
            url,
            kind: LinkKind::Direct,
        }
    }

    fn listing(url: &str) -> Self {
        Self {
            url: url.to_string(),
            kind: LinkKind::Listing,
        }
    }
}

struct CitationTable {
    // ARM 37.107.402
    mt_arm: Regex,
    // 1 CCR 212-3
    co_ccr: Regex,
    // WAC 314-55-105
    wa_wac: Regex,
    // 4 CCR title or § 15000-series section
    ca_ccr: Regex,
    // OAC 442:10-1-1
    ok_oac: Regex,
    // Mich Admin Code R 420.504
    mi_rule: Regex,
}

impl CitationTable {
    fn new() -> Self {
        // The patterns are anchored loosely on purpose: citations arrive from
        // model output and admin input with inconsistent surrounding text.
        Self {
            mt_arm: Regex::new(r"(?i)\bARM\s+(\d+\.\d+\.\d+)\b").expect("valid ARM pattern"),
            co_ccr: Regex::new(r"(?i)\b1\s+CCR\s+212-\d+\b").expect("valid CCR pattern"),
            wa_wac: Regex::new(r"(?i)\bWAC\s+(\d{3}-\d{2}-\d{3})\b").expect("valid WAC pattern"),
            ca_ccr: Regex::new(r"(?i)\b4\s+CCR\b|§\s*1[5-7]\d{3}\b").expect("valid CA pattern"),
            ok_oac: Regex::new(r"(?i)\bOAC\s+442:").expect("valid OAC pattern"),
            mi_rule: Regex::new(r"(?i)\bR\s*420\.\d+\b").expect("valid MI pattern"),
        }
    }
}

static TABLE: LazyLock<CitationTable> = LazyLock::new(CitationTable::new);

const MT_FALLBACK: &str = "https://rules.mt.gov/";
const CO_MED_RULES: &str = "https://sbg.colorado.gov/med/rules";
const WA_LCB_RULES: &str = "https://lcb.wa.gov/laws/laws-and-rules";
const CA_DCC_RULES: &str = "https://cannabis.ca.gov/cannabis-laws/dcc-regulations/";
const OK_OMMA_RULES: &str = "https://oklahoma.gov/omma/rules-regulations.html";
const MI_CRA_RULES: &str = "https://www.michigan.gov/cra/rules";

/// Resolve a citation string to a best-effort regulation URL
///
/// Returns `None` for jurisdictions without a pattern table, or when the
/// citation matches nothing and the jurisdiction has no listing fallback.
pub fn resolve_citation(jurisdiction: &Jurisdiction, citation: &str) -> Option<CitationLink> {
    let table = &*TABLE;
    let citation = citation.trim();
    if citation.is_empty() {
        return None;
    }

    match jurisdiction {
        Jurisdiction::Montana => {
            if let Some(caps) = table.mt_arm.captures(citation) {
                // MOS gateway wants the rule number with dots percent-encoded
                let rule_no = caps[1].replace('.', "%2E");
                return Some(CitationLink::direct(format!(
                    "https://rules.mt.gov/gateway/RuleNo.asp?RN={rule_no}"
                )));
            }
            Some(CitationLink::listing(MT_FALLBACK))
        }
        Jurisdiction::Colorado => {
            if table.co_ccr.is_match(citation) {
                // MED rules have no stable per-rule URLs, so the listing page
                // is the best verified target
                return Some(CitationLink::listing(CO_MED_RULES));
            }
            Some(CitationLink::listing(CO_MED_RULES))
        }
        Jurisdiction::Washington => {
            if let Some(caps) = table.wa_wac.captures(citation) {
                return Some(CitationLink::direct(format!(
                    "https://app.leg.wa.gov/wac/default.aspx?cite={}",
                    &caps[1]
                )));
            }
            Some(CitationLink::listing(WA_LCB_RULES))
        }
        Jurisdiction::California => {
            if table.ca_ccr.is_match(citation) {
                return Some(CitationLink::listing(CA_DCC_RULES));
            }
            Some(CitationLink::listing(CA_DCC_RULES))
        }
        Jurisdiction::Oklahoma => {
            if table.ok_oac.is_match(citation) {
                return Some(CitationLink::listing(OK_OMMA_RULES));
            }
            Some(CitationLink::listing(OK_OMMA_RULES))
        }
        Jurisdiction::Michigan => {
            if table.mi_rule.is_match(citation) {
                return Some(CitationLink::listing(MI_CRA_RULES));
            }
            Some(CitationLink::listing(MI_CRA_RULES))
        }
        Jurisdiction::Other(_) => None,
    }
}
