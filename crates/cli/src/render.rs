//! Plain-text rendering of reconciliation results for the terminal.

use std::io::{self, Write};

use dash_recon::claims::format_cents;
use dash_recon::diff::DiffEntry;
use dash_recon::{PolicyView, ReconResult};
use dash_store_client::ReportSummary;

use crate::session::ReportSession;

pub fn write_session(w: &mut impl Write, session: &ReportSession) -> io::Result<()> {
    let file = session
        .report
        .file_name
        .as_deref()
        .unwrap_or(session.result.meta.placeholder.as_str());
    match session.report_id() {
        Some(id) => writeln!(w, "report {id} ({file}) from {}", session.origin)?,
        None => writeln!(w, "report ({file}) from {}", session.origin)?,
    }
    write_result(w, &session.result)
}

pub fn write_result(w: &mut impl Write, result: &ReconResult) -> io::Result<()> {
    let placeholder = result.meta.placeholder.as_str();
    let d = &result.driver;
    writeln!(w, "driver:   {}  {}  born {}", d.driver_name, d.license, d.date_of_birth)?;
    writeln!(
        w,
        "history:  {} claims / {} at fault (6y), licensed {} years, insured {} years",
        d.claims_6y, d.at_fault_claims_6y, d.years_licensed, d.years_continuous_insurance
    )?;

    let c = &result.continuity;
    let since = c.years_continuous_insurance_date.display(placeholder);
    match c.continuous_years {
        Some(years) => writeln!(w, "insured since {since} ({years} years)")?,
        None => writeln!(w, "insured since {since}")?,
    }
    writeln!(
        w,
        "current:  {} to {}  {}{}",
        c.current_insurance_date.display(placeholder),
        c.current_policy_expiry.display(placeholder),
        result.expiry_label,
        c.expiry_class.map(|class| format!(" [{class}]")).unwrap_or_default(),
    )?;
    writeln!(
        w,
        "timeline: {} policies, {} gaps ({} days, longest {}), {} overlaps",
        result.policies.len(),
        c.gap_count,
        c.total_gap_days,
        c.longest_gap_days.map_or_else(|| placeholder.to_string(), |d| format!("{d} days")),
        c.overlap_count,
    )?;

    for policy in &result.policies {
        write_policy(w, policy)?;
    }

    let s = &result.claims_summary;
    if s.claim_count > 0 {
        writeln!(w)?;
        for claim in &result.claims {
            writeln!(
                w,
                "claim {:>2}  {}  {}  {}  {}  {}",
                claim.number,
                claim.date,
                claim.insurer,
                claim.coverage,
                match claim.at_fault {
                    Some(true) => "at fault",
                    Some(false) => "not at fault",
                    None => "fault unknown",
                },
                claim.subtotal_cents.map_or_else(|| placeholder.to_string(), format_cents),
            )?;
        }
        writeln!(
            w,
            "claims:   {} ({} at fault), loss {}, expense {}, subtotal {}",
            s.claim_count,
            s.at_fault_count,
            format_cents(s.total_loss_cents),
            format_cents(s.total_expense_cents),
            format_cents(s.subtotal_cents),
        )?;
    }

    Ok(())
}

fn write_policy(w: &mut impl Write, p: &PolicyView) -> io::Result<()> {
    writeln!(w)?;
    let strategy = p
        .matched_operator
        .as_ref()
        .map(|m| format!(" ({})", m.strategy))
        .unwrap_or_default();
    writeln!(
        w,
        "#{:<3} {}  {}  {}  operator: {}{}",
        p.display_number, p.policy_number, p.insurer, p.status, p.matched_operator_display, strategy
    )?;
    writeln!(w, "     term {} to {}  {}", p.start_term, p.end_term, p.term_label)?;
    if p.previous.is_some() {
        writeln!(w, "     vs previous: {} ({})", p.gap_label, p.gap_text)?;
    }
    Ok(())
}

pub fn write_report_list(
    w: &mut impl Write,
    reports: &[ReportSummary],
    placeholder: &str,
) -> io::Result<()> {
    if reports.is_empty() {
        return writeln!(w, "no stored reports");
    }
    for r in reports {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{} policies",
            r.id,
            r.driver_name.as_deref().unwrap_or(placeholder),
            r.report_date.as_deref().unwrap_or(placeholder),
            r.file_name.as_deref().unwrap_or(placeholder),
            r.policy_count,
        )?;
    }
    Ok(())
}

pub fn write_diff(w: &mut impl Write, entries: &[DiffEntry]) -> io::Result<()> {
    for e in entries {
        writeln!(w, "{}: {} -> {}", e.path, e.a, e.b)?;
    }
    Ok(())
}
