//! Plain-text quote summary.

use std::fmt::Write;

use crate::config::Branding;
use crate::model::QuoteArtifact;

const WIDTH: usize = 56;

/// Render a quote as fixed-width text for e-mail bodies and terminals.
pub fn render_quote_summary(artifact: &QuoteArtifact, branding: &Branding) -> String {
    let mut out = String::new();
    let rule = "-".repeat(WIDTH);

    writeln!(out, "{}", branding.company_name).unwrap();
    if !branding.tagline.is_empty() {
        writeln!(out, "{}", branding.tagline).unwrap();
    }
    writeln!(out).unwrap();
    writeln!(out, "Quote #: {}", artifact.reference).unwrap();
    writeln!(out, "Date:    {}", artifact.created_at.format("%B %-d, %Y")).unwrap();
    if let Some(customer) = &artifact.customer {
        writeln!(out, "For:     {}", customer.name).unwrap();
    }

    writeln!(out).unwrap();
    writeln!(out, "CONFIGURATION").unwrap();
    writeln!(out, "{}", rule).unwrap();
    for (label, value) in artifact.configuration.detail_rows() {
        writeln!(out, "{:<14}{}", label, value).unwrap();
    }

    writeln!(out).unwrap();
    writeln!(out, "PRICE BREAKDOWN").unwrap();
    writeln!(out, "{}", rule).unwrap();
    for (label, amount) in artifact.pricing.summary_rows() {
        write_amount_line(&mut out, &label, &amount.display());
    }
    writeln!(out, "{}", rule).unwrap();
    write_amount_line(&mut out, "TOTAL", &artifact.pricing.total_price.display());

    writeln!(out).unwrap();
    writeln!(out, "{}", branding.contact_line()).unwrap();
    out
}

/// Label on the left, amount right-aligned to the rule width.
fn write_amount_line(out: &mut String, label: &str, amount: &str) {
    let pad = WIDTH.saturating_sub(label.chars().count());
    writeln!(out, "{}{:>pad$}", label, amount, pad = pad).unwrap();
}
