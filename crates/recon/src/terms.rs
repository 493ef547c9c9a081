//! Effective term boundaries for a policy.
//!
//! Operator-level terms describe the period the driver under review was
//! actually covered, so they win over the policy's nominal window. Values stay
//! as raw text until arithmetic needs them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates;
use crate::matcher::MatchResult;
use crate::report::{present, Policy};

/// Where a resolved boundary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TermSource {
    PolicyStartOfEarliestTerm,
    MatchedOperator,
    AnyOperator,
    EffectiveDate,
    ExpiryDate,
    CancellationDate,
}

impl std::fmt::Display for TermSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PolicyStartOfEarliestTerm => write!(f, "policy_start_of_earliest_term"),
            Self::MatchedOperator => write!(f, "matched_operator"),
            Self::AnyOperator => write!(f, "any_operator"),
            Self::EffectiveDate => write!(f, "effective_date"),
            Self::ExpiryDate => write!(f, "expiry_date"),
            Self::CancellationDate => write!(f, "cancellation_date"),
        }
    }
}

/// A term boundary: raw text with its source, or missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Term {
    Present { raw: String, source: TermSource },
    Missing,
}

impl Term {
    fn from_field(text: Option<&str>, source: TermSource) -> Option<Self> {
        text.map(|raw| Self::Present { raw: raw.to_string(), source })
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Present { raw, .. } => Some(raw),
            Self::Missing => None,
        }
    }

    pub fn source(&self) -> Option<TermSource> {
        match self {
            Self::Present { source, .. } => Some(*source),
            Self::Missing => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        dates::parse_opt(self.raw())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Raw text, or `placeholder` when missing.
    pub fn display(&self, placeholder: &str) -> String {
        self.raw().unwrap_or(placeholder).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTerms {
    pub start: Term,
    pub end: Term,
}

/// Resolve the start of the earliest term and end of the latest term.
///
/// Start: policy `start_of_earliest_term`, matched operator (any strategy),
/// first operator with a start, header effective date.
/// End: license-matched operator, first operator with an end, header expiry
/// date, header cancellation date.
pub fn resolve_terms(policy: &Policy, matched: &MatchResult<'_>) -> ResolvedTerms {
    ResolvedTerms {
        start: resolve_start(policy, matched),
        end: resolve_end(policy, matched),
    }
}

pub fn resolve_start(policy: &Policy, matched: &MatchResult<'_>) -> Term {
    Term::from_field(present(&policy.start_of_earliest_term), TermSource::PolicyStartOfEarliestTerm)
        .or_else(|| {
            Term::from_field(
                matched.operator().and_then(|op| present(&op.start_term)),
                TermSource::MatchedOperator,
            )
        })
        .or_else(|| {
            Term::from_field(
                policy.operators.iter().find_map(|op| present(&op.start_term)),
                TermSource::AnyOperator,
            )
        })
        .or_else(|| Term::from_field(present(&policy.header.effective_date), TermSource::EffectiveDate))
        .unwrap_or(Term::Missing)
}

pub fn resolve_end(policy: &Policy, matched: &MatchResult<'_>) -> Term {
    Term::from_field(
        matched.license_matched().and_then(|op| present(&op.end_term)),
        TermSource::MatchedOperator,
    )
    .or_else(|| {
        Term::from_field(
            policy.operators.iter().find_map(|op| present(&op.end_term)),
            TermSource::AnyOperator,
        )
    })
    .or_else(|| Term::from_field(present(&policy.header.expiry_date), TermSource::ExpiryDate))
    .or_else(|| {
        Term::from_field(present(&policy.header.cancellation_date), TermSource::CancellationDate)
    })
    .unwrap_or(Term::Missing)
}
