use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{days_between, months_between};
use crate::terms::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Days,
    Months,
}

impl Granularity {
    fn unit(&self, n: u64) -> &'static str {
        match (self, n) {
            (Self::Days, 1) => "day",
            (Self::Days, _) => "days",
            (Self::Months, 1) => "month",
            (Self::Months, _) => "months",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Positive distance: time without coverage.
    Gap,
    /// Zero distance: back-to-back coverage.
    NoGap,
    /// Negative distance: boundaries cross.
    Overlap,
    /// At least one boundary is not a date.
    Indeterminate,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gap => write!(f, "gap"),
            Self::NoGap => write!(f, "no_gap"),
            Self::Overlap => write!(f, "overlap"),
            Self::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Temporal relationship between an end boundary and a start boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub granularity: Granularity,
    pub kind: RelationKind,
    /// Signed distance from end to start; `None` when indeterminate.
    pub signed: Option<i64>,
}

impl Relation {
    pub fn indeterminate(granularity: Granularity) -> Self {
        Self { granularity, kind: RelationKind::Indeterminate, signed: None }
    }

    /// Absolute size of the gap or overlap.
    pub fn magnitude(&self) -> Option<u64> {
        self.signed.map(i64::unsigned_abs)
    }

    /// `Gap — 1 month`, `Overlap — 12 days`, `No gap`, or `placeholder`.
    pub fn label(&self, placeholder: &str) -> String {
        match (self.kind, self.magnitude()) {
            (RelationKind::NoGap, _) => "No gap".to_string(),
            (RelationKind::Gap, Some(n)) => format!("Gap — {n} {}", self.granularity.unit(n)),
            (RelationKind::Overlap, Some(n)) => {
                format!("Overlap — {n} {}", self.granularity.unit(n))
            }
            _ => placeholder.to_string(),
        }
    }
}

/// Relate `end` (earlier boundary) to `start` (later boundary).
///
/// Distance is `start - end`: positive is a gap, zero is no gap, negative is
/// an overlap. Either side missing yields an indeterminate relation.
pub fn relate(end: Option<NaiveDate>, start: Option<NaiveDate>, granularity: Granularity) -> Relation {
    let (Some(end), Some(start)) = (end, start) else {
        return Relation::indeterminate(granularity);
    };
    let signed = match granularity {
        Granularity::Days => days_between(end, start),
        Granularity::Months => months_between(end, start),
    };
    let kind = match signed {
        n if n > 0 => RelationKind::Gap,
        0 => RelationKind::NoGap,
        _ => RelationKind::Overlap,
    };
    Relation { granularity, kind, signed: Some(signed) }
}

/// `relate` over resolved term boundaries, parsing their text.
pub fn relate_terms(end: &Term, start: &Term, granularity: Granularity) -> Relation {
    relate(end.date(), start.date(), granularity)
}

/// Relationship between chronologically adjacent policies, at both granularities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairRelation {
    pub months: Relation,
    pub days: Relation,
}

pub fn relate_pair(earlier_end: &Term, later_start: &Term) -> PairRelation {
    PairRelation {
        months: relate_terms(earlier_end, later_start, Granularity::Months),
        days: relate_terms(earlier_end, later_start, Granularity::Days),
    }
}
