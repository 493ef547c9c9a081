use chrono::NaiveDate;
use serde::Serialize;

use crate::gap::{PairRelation, Relation};
use crate::matcher::MatchStrategy;
use crate::terms::{ResolvedTerms, Term};

// ---------------------------------------------------------------------------
// Per-policy view
// ---------------------------------------------------------------------------

/// The operator chosen to represent the insured driver on a policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedOperator {
    pub index: usize,
    pub strategy: MatchStrategy,
    pub name: Option<String>,
    pub dln: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyView {
    /// Position in the report's reverse-chronological list (0 = most recent).
    pub position: usize,
    /// Chronological display number (1 = oldest).
    pub display_number: usize,
    pub policy_number: String,
    pub insurer: String,
    pub status: String,
    pub operator_count: usize,
    pub vehicle_count: usize,
    pub matched_operator: Option<MatchedOperator>,
    pub matched_operator_display: String,
    pub terms: ResolvedTerms,
    pub start_term: String,
    pub end_term: String,
    /// Own end related to own start, month granularity.
    pub term_relation: Relation,
    pub term_label: String,
    /// Chronologically previous policy's end related to this policy's start.
    /// `None` for the oldest policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PairRelation>,
    /// Month-granularity label of `previous`.
    pub gap_label: String,
    /// Day-granularity label of `previous`.
    pub gap_text: String,
}

// ---------------------------------------------------------------------------
// Continuity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryClass {
    Expired,
    Warning,
    Ok,
}

impl std::fmt::Display for ExpiryClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "expired"),
            Self::Warning => write!(f, "warning"),
            Self::Ok => write!(f, "ok"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuityMetrics {
    /// Resolved start of the chronologically earliest policy.
    pub years_continuous_insurance_date: Term,
    /// Resolved start of the most recent policy.
    pub current_insurance_date: Term,
    /// Resolved end of the most recent policy.
    pub current_policy_expiry: Term,
    pub days_to_expiry: Option<i64>,
    pub expiry_class: Option<ExpiryClass>,
    /// Completed years since `years_continuous_insurance_date`.
    pub continuous_years: Option<i64>,
    pub gap_count: usize,
    pub overlap_count: usize,
    pub total_gap_days: i64,
    pub longest_gap_days: Option<i64>,
}

impl ContinuityMetrics {
    pub fn empty() -> Self {
        Self {
            years_continuous_insurance_date: Term::Missing,
            current_insurance_date: Term::Missing,
            current_policy_expiry: Term::Missing,
            days_to_expiry: None,
            expiry_class: None,
            continuous_years: None,
            gap_count: 0,
            overlap_count: 0,
            total_gap_days: 0,
            longest_gap_days: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ClaimView {
    /// 1-based, in report order.
    pub number: usize,
    /// Date of loss, else date reported.
    pub date: String,
    pub date_of_loss: String,
    pub date_reported: String,
    pub insurer: String,
    pub coverage: String,
    pub status: String,
    pub at_fault: Option<bool>,
    pub total_loss_cents: Option<i64>,
    pub total_expense_cents: Option<i64>,
    pub subtotal_cents: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimsSummary {
    pub claim_count: usize,
    pub at_fault_count: usize,
    pub total_loss_cents: i64,
    pub total_expense_cents: i64,
    pub subtotal_cents: i64,
}

// ---------------------------------------------------------------------------
// Driver + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DriverView {
    pub driver_name: String,
    pub license: String,
    pub date_of_birth: String,
    pub address: String,
    pub claims_6y: String,
    pub at_fault_claims_6y: String,
    pub years_licensed: String,
    pub years_continuous_insurance: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub report_id: Option<String>,
    pub engine_version: String,
    pub today: NaiveDate,
    /// Text shown for absent or unusable values.
    pub placeholder: String,
}

/// Derived view of one report. Built once per pass, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub driver: DriverView,
    pub policies: Vec<PolicyView>,
    pub continuity: ContinuityMetrics,
    pub expiry_label: String,
    pub claims: Vec<ClaimView>,
    pub claims_summary: ClaimsSummary,
}
