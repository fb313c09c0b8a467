//! Human-readable repricing report.

use chrono::{DateTime, Utc};
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::application::RepriceRequest;
use crate::domain::{ReportGroup, RepriceDecision};

#[derive(Tabled)]
struct DecisionRow {
    #[tabled(rename = "Order")]
    order: i64,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Remaining")]
    remaining: u64,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Competitor")]
    competitor: String,
    #[tabled(rename = "Suggested")]
    suggested: String,
    #[tabled(rename = "Reasons")]
    reasons: String,
    #[tabled(rename = "Expires In")]
    expires: String,
    #[tabled(rename = "Margin")]
    margin: String,
}

impl From<&RepriceDecision> for DecisionRow {
    fn from(d: &RepriceDecision) -> Self {
        let reasons: Vec<&str> = d.reasons.iter().map(|r| r.as_str()).collect();
        let margin = match &d.profitability {
            Some(p) if p.would_be_loss_after => format!("{}% (loss)", p.margin_percent),
            Some(p) => format!("{}%", p.margin_percent),
            None => "-".into(),
        };

        Self {
            order: d.order_id.get(),
            item: d.item_name.clone(),
            remaining: d.volume_remain,
            current: d.current_price.to_string(),
            competitor: d.competitor_price.to_string(),
            suggested: d.suggested_price.to_string(),
            reasons: reasons.join(", "),
            expires: d
                .expiry
                .map_or_else(|| "-".into(), |e| format!("{}h", e.hours_remaining)),
            margin,
        }
    }
}

/// Print the report as one table per (character, station) group.
pub fn print(report: &[ReportGroup], request: &RepriceRequest, now: DateTime<Utc>) {
    if output::is_quiet() {
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Mode", request.policy.grouping_mode);
    output::field("As of", now.to_rfc3339());

    if report.is_empty() {
        output::success("No orders need repricing");
        return;
    }

    let mut total = 0;
    let mut losses = 0;
    for group in report {
        output::section(&format!("{} @ {}", group.character_name, group.station_name));
        let rows: Vec<DecisionRow> = group.decisions.iter().map(DecisionRow::from).collect();
        output::lines(&Table::new(rows).to_string());

        total += group.decisions.len();
        losses += group
            .decisions
            .iter()
            .filter(|d| d.profitability.is_some_and(|p| p.would_be_loss_after))
            .count();
    }

    output::section("Summary");
    output::field("Decisions", total);
    if losses > 0 {
        output::warning(&format!("{losses} suggested price(s) would sell at a loss"));
    }
}
