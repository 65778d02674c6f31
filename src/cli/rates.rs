use super::ui;
use crate::core::{CurrencyCode, ExchangeRateSource, RateMapping};
use anyhow::Result;
use chrono::{DateTime, Local};
use comfy_table::Cell;
use std::collections::BTreeSet;

/// Renders requested currencies against fetched rates. Currencies that could
/// not be fetched are listed as N/A.
pub fn display_rates_table(
    codes: &BTreeSet<CurrencyCode>,
    rates: &RateMapping,
    fetched_at: DateTime<Local>,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Rate (ILS)")]);

    for code in codes {
        let rate = match rates.get(code) {
            Some(rate) => ui::rate_cell(&rate.to_string()),
            None => ui::na_cell(),
        };
        table.add_row(vec![Cell::new(code), rate]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Bank of Israel exchange rates", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    let missing = codes.len() - codes.iter().filter(|c| rates.contains_key(*c)).count();
    if missing > 0 {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("{missing} of {} currencies could not be fetched", codes.len()),
                ui::StyleType::Error
            )
        ));
    }

    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(
            &format!("Fetched at {}", fetched_at.format("%Y-%m-%d %H:%M:%S")),
            ui::StyleType::Subtle
        )
    ));
    output
}

pub async fn run(source: &dyn ExchangeRateSource, codes: &BTreeSet<CurrencyCode>) -> Result<()> {
    if codes.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No currencies configured. Pass codes on the command line or add them to the config file.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    let pb = ui::new_spinner("Fetching exchange rates...");
    let rates = source.fetch_rates(codes).await;
    pb.finish_and_clear();

    println!("{}", display_rates_table(codes, &rates, Local::now()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::normalize_codes;
    use crate::core::CurrencyCatalog;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ExchangeRateSource for MockSource {
        async fn fetch_rates(&self, codes: &BTreeSet<CurrencyCode>) -> RateMapping {
            self.calls.fetch_add(1, Ordering::SeqCst);
            codes
                .iter()
                .filter(|c| c.as_str() == "USD")
                .map(|c| (c.clone(), Decimal::new(368, 2)))
                .collect()
        }

        async fn fetch_catalog(&self) -> CurrencyCatalog {
            CurrencyCatalog::new()
        }
    }

    #[test]
    fn test_display_rates_table() {
        let codes = normalize_codes(["USD", "EUR"]);
        let mut rates = RateMapping::new();
        rates.insert("USD".to_string(), Decimal::new(368, 2));

        let output = display_rates_table(&codes, &rates, Local::now());
        assert!(output.contains("Bank of Israel exchange rates"));
        assert!(output.contains("USD"));
        assert!(output.contains("3.68"));
        assert!(output.contains("EUR"));
        assert!(output.contains("N/A"));
        assert!(output.contains("1 of 2 currencies could not be fetched"));
    }

    #[test]
    fn test_display_rates_table_all_fetched() {
        let codes = normalize_codes(["USD"]);
        let mut rates = RateMapping::new();
        rates.insert("USD".to_string(), Decimal::new(368, 2));

        let output = display_rates_table(&codes, &rates, Local::now());
        assert!(!output.contains("N/A"));
        assert!(!output.contains("could not be fetched"));
        assert!(output.contains("Fetched at"));
    }

    #[tokio::test]
    async fn test_run_skips_fetch_without_codes() {
        let source = MockSource {
            calls: AtomicUsize::new(0),
        };
        run(&source, &BTreeSet::new()).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        run(&source, &normalize_codes(["USD", "EUR"])).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
