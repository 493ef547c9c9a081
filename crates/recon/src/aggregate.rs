use chrono::NaiveDate;

use crate::config::ExpiryConfig;
use crate::dates::{days_between, whole_years_between};
use crate::gap::{relate_terms, Granularity, RelationKind};
use crate::model::{ContinuityMetrics, ExpiryClass};
use crate::report::{present, Policy};
use crate::terms::{ResolvedTerms, Term, TermSource};

/// One policy in report order together with its resolved terms.
#[derive(Debug, Clone, Copy)]
pub struct TimelineEntry<'a> {
    pub policy: &'a Policy,
    pub terms: &'a ResolvedTerms,
}

/// Roll the reverse-chronological timeline up into headline metrics.
///
/// Index 0 is the current policy, the last entry is the oldest.
pub fn aggregate(
    timeline: &[TimelineEntry<'_>],
    today: NaiveDate,
    expiry: &ExpiryConfig,
) -> ContinuityMetrics {
    let (Some(current), Some(oldest)) = (timeline.first(), timeline.last()) else {
        return ContinuityMetrics::empty();
    };

    let current_insurance_date = or_header(
        &current.terms.start,
        &current.policy.header.effective_date,
        TermSource::EffectiveDate,
    );
    let current_policy_expiry = or_header(
        &current.terms.end,
        &current.policy.header.expiry_date,
        TermSource::ExpiryDate,
    );
    let years_continuous_insurance_date = oldest.terms.start.clone();

    let days_to_expiry = current_policy_expiry.date().map(|end| days_between(today, end));
    let expiry_class = days_to_expiry.map(|days| classify_expiry(days, expiry));
    let continuous_years = years_continuous_insurance_date
        .date()
        .map(|start| whole_years_between(start, today));

    let mut metrics = ContinuityMetrics {
        years_continuous_insurance_date,
        current_insurance_date,
        current_policy_expiry,
        days_to_expiry,
        expiry_class,
        continuous_years,
        ..ContinuityMetrics::empty()
    };

    // Adjacent pairs: windows()[0] is (later, earlier) in report order.
    for pair in timeline.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        let rel = relate_terms(&earlier.terms.end, &later.terms.start, Granularity::Days);
        match (rel.kind, rel.signed) {
            (RelationKind::Gap, Some(days)) => {
                metrics.gap_count += 1;
                metrics.total_gap_days += days;
                metrics.longest_gap_days = Some(metrics.longest_gap_days.map_or(days, |m| m.max(days)));
            }
            (RelationKind::Overlap, _) => metrics.overlap_count += 1,
            _ => {}
        }
    }

    tracing::debug!(
        policies = timeline.len(),
        days_to_expiry = ?metrics.days_to_expiry,
        gaps = metrics.gap_count,
        overlaps = metrics.overlap_count,
        "continuity aggregated"
    );

    metrics
}

/// `< 0` expired, `0..=warning_days` warning, otherwise ok.
pub fn classify_expiry(days_to_expiry: i64, expiry: &ExpiryConfig) -> ExpiryClass {
    if days_to_expiry < 0 {
        ExpiryClass::Expired
    } else if days_to_expiry <= i64::from(expiry.warning_days) {
        ExpiryClass::Warning
    } else {
        ExpiryClass::Ok
    }
}

fn or_header(resolved: &Term, header: &Option<String>, source: TermSource) -> Term {
    match (resolved, present(header)) {
        (Term::Missing, Some(raw)) => Term::Present { raw: raw.to_string(), source },
        _ => resolved.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::PolicyHeader;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn term(raw: &str) -> Term {
        Term::Present { raw: raw.into(), source: TermSource::MatchedOperator }
    }

    fn terms(start: &str, end: &str) -> ResolvedTerms {
        ResolvedTerms { start: term(start), end: term(end) }
    }

    fn run(terms: &[ResolvedTerms], today: &str) -> ContinuityMetrics {
        let policy = Policy::default();
        let timeline: Vec<TimelineEntry<'_>> =
            terms.iter().map(|t| TimelineEntry { policy: &policy, terms: t }).collect();
        aggregate(&timeline, date(today), &ExpiryConfig::default())
    }

    #[test]
    fn empty_timeline_is_all_missing() {
        let m = aggregate(&[], date("2024-01-01"), &ExpiryConfig::default());
        assert_eq!(m, ContinuityMetrics::empty());
        assert!(m.current_policy_expiry.is_missing());
        assert_eq!(m.days_to_expiry, None);
        assert_eq!(m.expiry_class, None);
    }

    #[test]
    fn headline_dates_follow_order() {
        let t = vec![terms("02/01/2023", "02/01/2024"), terms("01/01/2022", "01/01/2023")];
        let m = run(&t, "2024-01-15");
        assert_eq!(m.current_insurance_date.raw(), Some("02/01/2023"));
        assert_eq!(m.current_policy_expiry.raw(), Some("02/01/2024"));
        assert_eq!(m.years_continuous_insurance_date.raw(), Some("01/01/2022"));
        assert_eq!(m.days_to_expiry, Some(17));
        assert_eq!(m.expiry_class, Some(ExpiryClass::Warning));
        assert_eq!(m.continuous_years, Some(2));
    }

    #[test]
    fn expiry_today_is_warning() {
        let m = run(&[terms("2023-06-01", "2024-06-01")], "2024-06-01");
        assert_eq!(m.days_to_expiry, Some(0));
        assert_eq!(m.expiry_class, Some(ExpiryClass::Warning));
    }

    #[test]
    fn expiry_classes() {
        let config = ExpiryConfig { warning_days: 30 };
        assert_eq!(classify_expiry(-1, &config), ExpiryClass::Expired);
        assert_eq!(classify_expiry(0, &config), ExpiryClass::Warning);
        assert_eq!(classify_expiry(30, &config), ExpiryClass::Warning);
        assert_eq!(classify_expiry(31, &config), ExpiryClass::Ok);
    }

    #[test]
    fn unparseable_expiry_is_unclassified() {
        let m = run(&[terms("2023-06-01", "N/A")], "2024-06-01");
        assert_eq!(m.current_policy_expiry.raw(), Some("N/A"));
        assert_eq!(m.days_to_expiry, None);
        assert_eq!(m.expiry_class, None);
    }

    #[test]
    fn header_fallback_for_missing_terms() {
        let policy = Policy {
            header: PolicyHeader {
                effective_date: Some("2023-03-01".into()),
                expiry_date: Some("2024-03-01".into()),
                ..PolicyHeader::default()
            },
            ..Policy::default()
        };
        let resolved = ResolvedTerms { start: Term::Missing, end: Term::Missing };
        let timeline = [TimelineEntry { policy: &policy, terms: &resolved }];
        let m = aggregate(&timeline, date("2024-02-01"), &ExpiryConfig::default());
        assert_eq!(m.current_insurance_date.source(), Some(TermSource::EffectiveDate));
        assert_eq!(m.current_policy_expiry.source(), Some(TermSource::ExpiryDate));
        assert_eq!(m.days_to_expiry, Some(29));
    }

    #[test]
    fn gap_and_overlap_counts() {
        let t = vec![
            terms("2023-05-01", "2024-05-01"),
            terms("2022-02-01", "2023-06-01"), // overlaps the next one by a month
            terms("2021-01-01", "2022-01-01"), // 31-day gap before the policy above
            terms("2020-01-01", "2020-12-25"), // 7-day gap
        ];
        let m = run(&t, "2024-01-01");
        assert_eq!(m.gap_count, 2);
        assert_eq!(m.overlap_count, 1);
        assert_eq!(m.total_gap_days, 38);
        assert_eq!(m.longest_gap_days, Some(31));
        assert_eq!(m.continuous_years, Some(4));
    }

    #[test]
    fn indeterminate_pairs_are_not_counted() {
        let t = vec![terms("garbage", "2024-05-01"), terms("2022-01-01", "2023-01-01")];
        let m = run(&t, "2024-01-01");
        assert_eq!(m.gap_count, 0);
        assert_eq!(m.overlap_count, 0);
        assert_eq!(m.longest_gap_days, None);
    }
}
