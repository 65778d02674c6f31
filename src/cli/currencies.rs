use super::ui;
use crate::core::{CurrencyCatalog, CurrencyCode, ExchangeRateSource};
use anyhow::Result;
use comfy_table::{Cell, Color};
use std::collections::BTreeSet;

/// Renders the catalog, flagging the currencies already in the config.
pub fn display_catalog_table(
    catalog: &CurrencyCatalog,
    configured: &BTreeSet<CurrencyCode>,
) -> String {
    if catalog.is_empty() {
        return ui::style_text(
            "No currencies available from the Bank of Israel API",
            ui::StyleType::Error,
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Configured"),
    ]);

    for (code, label) in catalog {
        let configured_cell = if configured.contains(code) {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![Cell::new(code), Cell::new(label), configured_cell]);
    }

    format!(
        "{}\n\n{}\n\n{}",
        ui::style_text("Available currencies", ui::StyleType::Title),
        table,
        ui::style_text(
            &format!("{} currencies", catalog.len()),
            ui::StyleType::Subtle
        )
    )
}

pub async fn run(source: &dyn ExchangeRateSource, configured: &BTreeSet<CurrencyCode>) -> Result<()> {
    let pb = ui::new_spinner("Fetching available currencies...");
    let catalog = source.fetch_catalog().await;
    pb.finish_and_clear();

    println!("{}", display_catalog_table(&catalog, configured));
    Ok(())
}
