//! Handler for the `tick` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::TickArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::tick::{next_cheaper_tick, next_dearer_tick, tick_size};
use crate::domain::Price;
use crate::error::{ConfigError, Result};

/// Walk the grid `steps` ticks below and above `price`.
#[must_use]
pub fn ladder(price: Price, steps: u32) -> (Vec<Price>, Vec<Price>) {
    let mut cheaper = Vec::new();
    let mut current = price;
    for _ in 0..steps {
        current = next_cheaper_tick(current);
        if current <= Price::ZERO {
            break;
        }
        cheaper.push(current);
    }

    let mut dearer = Vec::new();
    let mut current = price;
    for _ in 0..steps {
        current = next_dearer_tick(current);
        dearer.push(current);
    }

    (cheaper, dearer)
}

/// Execute the tick command.
#[allow(clippy::result_large_err)]
pub fn execute(args: &TickArgs) -> Result<()> {
    if args.price <= Price::ZERO {
        return Err(ConfigError::InvalidValue {
            field: "price",
            reason: "must be greater than 0".to_string(),
        }
        .into());
    }

    let (cheaper, dearer) = ladder(args.price, args.steps);

    if output::is_json() {
        output::json_output(json!({
            "price": args.price.to_string(),
            "tickSize": tick_size(args.price).to_string(),
            "cheaper": cheaper.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "dearer": dearer.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Price Grid");
    output::field("Price", args.price);
    output::field("Tick size", tick_size(args.price));
    for (i, price) in cheaper.iter().enumerate() {
        output::field(&format!("-{}", i + 1), price);
    }
    for (i, price) in dearer.iter().enumerate() {
        output::field(&format!("+{}", i + 1), price);
    }
    Ok(())
}
