use crate::model::{ClaimView, ClaimsSummary};
use crate::report::{present, Claim};

/// Parse a money string into cents. `$`, `,` and whitespace are ignored;
/// at most two decimal places. Anything else is `None`.
pub fn parse_amount_cents(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
        || frac.len() > 2
    {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };
    let cents = whole.checked_mul(100)?.checked_add(frac)?;
    Some(if negative { -cents } else { cents })
}

fn cents(field: &Option<String>) -> Option<i64> {
    present(field).and_then(parse_amount_cents)
}

/// Per-claim view, numbered in report order.
pub fn claim_views(claims: &[Claim], placeholder: &str) -> Vec<ClaimView> {
    let text = |field: &Option<String>| present(field).unwrap_or(placeholder).to_string();

    claims
        .iter()
        .enumerate()
        .map(|(i, claim)| {
            let total_loss_cents = cents(&claim.total_loss);
            let total_expense_cents = cents(&claim.total_expense);
            // An overflowing sum is as unusable as an unparseable amount.
            let subtotal_cents = cents(&claim.subtotal).or(match (total_loss_cents, total_expense_cents) {
                (None, None) => None,
                (loss, expense) => loss.unwrap_or(0).checked_add(expense.unwrap_or(0)),
            });
            ClaimView {
                number: i + 1,
                date: present(&claim.date_of_loss)
                    .or(present(&claim.date_reported))
                    .unwrap_or(placeholder)
                    .to_string(),
                date_of_loss: text(&claim.date_of_loss),
                date_reported: text(&claim.date_reported),
                insurer: text(&claim.insurer),
                coverage: text(&claim.coverage),
                status: text(&claim.claim_status),
                at_fault: claim.at_fault,
                total_loss_cents,
                total_expense_cents,
                subtotal_cents,
            }
        })
        .collect()
}

/// Totals saturate at the `i64` bounds.
pub fn summarize(views: &[ClaimView]) -> ClaimsSummary {
    views.iter().fold(
        ClaimsSummary { claim_count: views.len(), ..ClaimsSummary::default() },
        |mut acc, v| {
            if v.at_fault == Some(true) {
                acc.at_fault_count += 1;
            }
            acc.total_loss_cents = acc.total_loss_cents.saturating_add(v.total_loss_cents.unwrap_or(0));
            acc.total_expense_cents =
                acc.total_expense_cents.saturating_add(v.total_expense_cents.unwrap_or(0));
            acc.subtotal_cents = acc.subtotal_cents.saturating_add(v.subtotal_cents.unwrap_or(0));
            acc
        },
    )
}

/// Format cents as `$1,234.56`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = (abs / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02}", abs % 100)
}
