use chrono::NaiveDate;

use crate::aggregate::{aggregate, TimelineEntry};
use crate::claims::{claim_views, summarize};
use crate::config::ReconConfig;
use crate::gap::{relate_pair, relate_terms, Granularity};
use crate::matcher::{match_operator, MatchResult};
use crate::model::{DriverView, ExpiryClass, MatchedOperator, PolicyView, ReconMeta, ReconResult};
use crate::report::{present, DriverHeader, Report};
use crate::terms::{resolve_terms, ResolvedTerms};

/// Reconcile one report into its derived view. Pure and infallible: missing
/// or malformed fields degrade to placeholders.
pub fn run(report: &Report, config: &ReconConfig, today: NaiveDate) -> ReconResult {
    let placeholder = config.display.placeholder.as_str();
    let license = present(&report.header.dln);

    let matches: Vec<MatchResult<'_>> = report
        .policies
        .iter()
        .map(|policy| {
            match_operator(
                &policy.operators,
                license,
                present(&policy.header.policyholder_name),
                &config.matching,
            )
        })
        .collect();

    let resolved: Vec<ResolvedTerms> = report
        .policies
        .iter()
        .zip(&matches)
        .map(|(policy, matched)| resolve_terms(policy, matched))
        .collect();

    let count = report.policies.len();
    let mut policies = Vec::with_capacity(count);
    for (position, (policy, matched)) in report.policies.iter().zip(&matches).enumerate() {
        let terms = &resolved[position];

        // Chronologically previous policy sits one slot later in report order.
        let previous = resolved
            .get(position + 1)
            .map(|earlier| relate_pair(&earlier.end, &terms.start));
        let term_relation = relate_terms(&terms.end, &terms.start, Granularity::Months);

        let matched_operator = match matched {
            MatchResult::Found { operator, index, strategy } => Some(MatchedOperator {
                index: *index,
                strategy: *strategy,
                name: present(&operator.operator_name).map(str::to_string),
                dln: present(&operator.dln).map(str::to_string),
                relationship: present(&operator.relationship).map(str::to_string),
            }),
            MatchResult::NotFound => None,
        };

        tracing::debug!(
            position,
            strategy = ?matched.strategy(),
            start_source = ?terms.start.source(),
            end_source = ?terms.end.source(),
            "policy resolved"
        );

        let header = &policy.header;
        policies.push(PolicyView {
            position,
            display_number: count - position,
            policy_number: present(&header.policy_number).unwrap_or(placeholder).to_string(),
            insurer: present(&header.insurer).unwrap_or(placeholder).to_string(),
            status: present(&header.status).unwrap_or(placeholder).to_string(),
            operator_count: policy.operators.len(),
            vehicle_count: policy.vehicles.len(),
            matched_operator_display: matched_operator
                .as_ref()
                .and_then(|m| m.name.clone())
                .unwrap_or_else(|| placeholder.to_string()),
            matched_operator,
            start_term: terms.start.display(placeholder),
            end_term: terms.end.display(placeholder),
            term_label: term_relation.label(placeholder),
            term_relation,
            gap_label: previous
                .map(|p| p.months.label(placeholder))
                .unwrap_or_else(|| placeholder.to_string()),
            gap_text: previous
                .map(|p| p.days.label(placeholder))
                .unwrap_or_else(|| placeholder.to_string()),
            previous,
            terms: terms.clone(),
        });
    }

    let timeline: Vec<TimelineEntry<'_>> = report
        .policies
        .iter()
        .zip(&resolved)
        .map(|(policy, terms)| TimelineEntry { policy, terms })
        .collect();
    let continuity = aggregate(&timeline, today, &config.expiry);
    let expiry_label = match (continuity.expiry_class, continuity.days_to_expiry) {
        (Some(class), Some(days)) => expiry_label(class, days),
        _ => placeholder.to_string(),
    };

    let claims = claim_views(&report.claims, placeholder);
    let claims_summary = summarize(&claims);

    ReconResult {
        meta: ReconMeta {
            report_id: present(&report.id).map(str::to_string),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            today,
            placeholder: placeholder.to_string(),
        },
        driver: driver_view(&report.header, placeholder),
        policies,
        continuity,
        expiry_label,
        claims,
        claims_summary,
    }
}

fn expiry_label(class: ExpiryClass, days: i64) -> String {
    let unit = |n: i64| if n == 1 { "day" } else { "days" };
    match class {
        ExpiryClass::Expired => format!("Expired {} {} ago", -days, unit(-days)),
        ExpiryClass::Warning if days == 0 => "Expires today".to_string(),
        ExpiryClass::Warning | ExpiryClass::Ok => format!("Expires in {days} {}", unit(days)),
    }
}

fn driver_view(header: &DriverHeader, placeholder: &str) -> DriverView {
    let text = |field: &Option<String>| present(field).unwrap_or(placeholder).to_string();
    let number = |n: Option<u32>| n.map_or_else(|| placeholder.to_string(), |n| n.to_string());

    let license = match (present(&header.dln), present(&header.province)) {
        (Some(dln), Some(province)) => format!("{dln} ({province})"),
        (Some(dln), None) => dln.to_string(),
        (None, _) => placeholder.to_string(),
    };

    DriverView {
        driver_name: text(&header.driver_name),
        license,
        date_of_birth: text(&header.date_of_birth),
        address: text(&header.address),
        claims_6y: number(header.num_claims_6y),
        at_fault_claims_6y: number(header.num_atfault_6y),
        years_licensed: number(header.years_licensed),
        years_continuous_insurance: number(header.years_cont_insurance),
    }
}
