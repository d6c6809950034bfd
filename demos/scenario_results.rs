//! End-to-end walk through a small scenario batch.
//!
//! Resolves volatilities for a handful of FX option trades, records the
//! per-trade outcomes in a results matrix, then re-expresses a
//! jump-to-default breakdown in the reporting currency.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scenario_results::prelude::*;
use std::collections::BTreeSet;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  scenario-results: Scenario Walkthrough  ║");
    println!("╚══════════════════════════════════════════╝\n");

    // --- Step 1: Market data lookup ---
    println!("━━━ Step 1: Volatility Requirements ━━━\n");

    let eur_usd: CurrencyPair = "EUR/USD".parse().unwrap();
    let gbp_usd: CurrencyPair = "GBP/USD".parse().unwrap();
    let usd_jpy: CurrencyPair = "USD/JPY".parse().unwrap();

    let lookup = DefaultFxOptionLookup::from_map([
        (eur_usd.clone(), VolatilitiesId::new("EUR-USD-VOLS")),
        (gbp_usd.clone(), VolatilitiesId::new("GBP-USD-VOLS")),
        (usd_jpy.clone(), VolatilitiesId::new("USD-JPY-VOLS")),
    ]);

    let trades = vec![eur_usd.clone(), gbp_usd.clone(), usd_jpy.clone(), eur_usd.clone()];
    let needed: BTreeSet<CurrencyPair> = trades.iter().cloned().collect();
    let requirements = lookup.requirements(&needed).unwrap();
    for id in requirements.value_requirements() {
        println!("  needs {}", id);
    }

    let unknown: BTreeSet<CurrencyPair> = ["AUD/NZD".parse().unwrap()].into_iter().collect();
    match lookup.requirements(&unknown) {
        Ok(_) => println!("  AUD/NZD unexpectedly resolved"),
        Err(e) => println!("  {}", e),
    }
    println!();

    // --- Step 2: Results matrix ---
    println!("━━━ Step 2: Results Matrix ━━━\n");

    // GBP/USD is configured but its surface was not loaded
    let market_data = ImmutableMarketData::new(NaiveDate::from_ymd_opt(2024, 3, 28).unwrap())
        .with_surface(
            FxVolatilitySurface::new(
                VolatilitiesId::new("EUR-USD-VOLS"),
                eur_usd.clone(),
                vec![0.25, 1.0, 2.0],
                vec![0.071, 0.078, 0.082],
            )
            .unwrap(),
        )
        .with_surface(
            FxVolatilitySurface::flat(VolatilitiesId::new("USD-JPY-VOLS"), usd_jpy.clone(), 0.095)
                .unwrap(),
        );

    let usd = CurrencyCode::new("USD");
    let vol_column = ColumnDefinition::named("Vol 1Y", Measure::par_rate());
    let pv_column = ColumnDefinition::of(Measure::present_value())
        .with_reporting_currency(CurrencyCode::new("EUR"));

    let mut items = Vec::new();
    for (i, pair) in trades.iter().enumerate() {
        let vol = lookup.volatilities(pair, &market_data).map(|surface| {
            let v = Decimal::from_f64_retain(surface.volatility(1.0)).unwrap_or_default();
            CalcValue::Number(v.round_dp(4))
        });
        let pv = vol.as_ref().map(|_| {
            CalcValue::Amount(CurrencyAmount::new(usd.clone(), Decimal::from(10_000 * (i as i64 + 1))))
        });
        items.push(vol);
        items.push(pv);
    }

    let results =
        Results::with_columns(trades.len(), vec![vol_column.clone(), pv_column.clone()], items)
            .unwrap();
    print!("{}", results);
    println!();

    for row in 0..results.row_count() {
        match results.get_by_column::<Decimal>(row, &vol_column).unwrap() {
            Outcome::Success(vol) => println!("  {} vol 1Y = {}", trades[row], vol),
            Outcome::Failure(reason) => println!("  {} failed: {}", trades[row], reason),
        }
    }
    println!();

    let rates = FxRateTable::new()
        .with_rate(usd.clone(), CurrencyCode::new("EUR"), dec!(0.92))
        .unwrap();
    println!("In reporting currency:");
    print!("{}", results.in_reporting_currency(&rates));
    println!();

    // --- Step 3: Jump-to-default re-expression ---
    println!("━━━ Step 3: Jump-to-Default in EUR ━━━\n");

    let jtd = JumpToDefault::of(
        usd,
        [
            (EntityId::new("ACME-CORP"), dec!(1_250_000)),
            (EntityId::new("GLOBEX"), dec!(-430_000)),
            (EntityId::new("INITECH"), dec!(75_500)),
        ],
    );
    let in_eur = jtd.converted_to(&CurrencyCode::new("EUR"), &rates).unwrap();

    for (entity, amount) in in_eur.amounts() {
        let original = jtd.amount(entity).unwrap_or_default();
        println!("  {:<12} {:>14} USD → {:>14} EUR", entity, original, amount);
    }
    if let (Some(usd_total), Some(eur_total)) = (jtd.total(), in_eur.total()) {
        println!("  {:<12} {:>14} USD → {:>14} EUR", "total", usd_total, eur_total);
    }
}
