use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scenario_results::calc::column::ColumnDefinition;
use scenario_results::calc::measure::Measure;
use scenario_results::calc::results::{Results, ResultsError};
use scenario_results::calc::value::CalcValue;
use scenario_results::core::currency::{CurrencyCode, CurrencyPair, FxError, FxRateProvider, FxRateTable};
use scenario_results::core::entity::EntityId;
use scenario_results::core::outcome::{FailureKind, FailureReason, Outcome};
use scenario_results::io::input::BatchFile;
use scenario_results::market::lookup::{DefaultFxOptionLookup, FxOptionLookup};
use scenario_results::market::market_data::ImmutableMarketData;
use scenario_results::market::surface::{FxVolatilitySurface, VolatilitiesId};
use scenario_results::money::amount::CurrencyAmount;
use scenario_results::money::convertible::FxConvertible;
use scenario_results::money::jump_to_default::JumpToDefault;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

fn pair(s: &str) -> CurrencyPair {
    s.parse().unwrap()
}

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD")
}

fn eur() -> CurrencyCode {
    CurrencyCode::new("EUR")
}

#[test]
fn test_two_by_two_scenario() {
    let results = Results::of(
        2,
        2,
        vec![
            Outcome::success(CalcValue::Number(dec!(1.0))),
            Outcome::failure(FailureReason::missing_data("no data")),
            Outcome::success(CalcValue::Number(dec!(3.0))),
            Outcome::success(CalcValue::Number(dec!(4.0))),
        ],
    )
    .unwrap();

    assert_eq!(results.get(0, 0).unwrap().value(), Some(&CalcValue::Number(dec!(1.0))));
    assert_eq!(
        results.get(0, 1).unwrap().failure_reason().unwrap().kind(),
        FailureKind::MissingData
    );
    assert_eq!(results.get(1, 0).unwrap().value(), Some(&CalcValue::Number(dec!(3.0))));
    assert_eq!(results.get(1, 1).unwrap().value(), Some(&CalcValue::Number(dec!(4.0))));
}

#[test]
fn test_breakdown_scenario() {
    let jtd = JumpToDefault::of(
        usd(),
        [
            (EntityId::new("EntityA"), dec!(100.0)),
            (EntityId::new("EntityB"), dec!(-50.0)),
        ],
    );
    let rates = FxRateTable::new().with_rate(usd(), eur(), dec!(0.9)).unwrap();

    let converted = jtd.converted_to(&eur(), &rates).unwrap();
    let expected = JumpToDefault::of(
        eur(),
        [
            (EntityId::new("EntityA"), dec!(90.0)),
            (EntityId::new("EntityB"), dec!(-45.0)),
        ],
    );
    assert_eq!(converted, expected);
}

/// Pre-flight requirements, then per-calculation resolution, then results.
#[test]
fn test_lookup_to_results_workflow() {
    let lookup = DefaultFxOptionLookup::from_map([
        (pair("EUR/USD"), VolatilitiesId::new("EUR-USD-VOLS")),
        (pair("GBP/USD"), VolatilitiesId::new("GBP-USD-VOLS")),
    ]);
    let trades = [pair("EUR/USD"), pair("GBP/USD"), pair("EUR/USD")];

    let needed: BTreeSet<CurrencyPair> = trades.iter().cloned().collect();
    let requirements = lookup.requirements(&needed).unwrap();
    assert_eq!(requirements.value_requirements().len(), 2);

    // only EUR/USD has data loaded today
    let market_data = ImmutableMarketData::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        .with_surface(
            FxVolatilitySurface::new(
                VolatilitiesId::new("EUR-USD-VOLS"),
                pair("EUR/USD"),
                vec![0.5, 1.0],
                vec![0.08, 0.10],
            )
            .unwrap(),
        );
    assert_eq!(requirements.unsatisfied(&market_data).len(), 1);

    let column = ColumnDefinition::named("Vol 1Y", Measure::par_rate());
    let items: Vec<Outcome<CalcValue>> = trades
        .iter()
        .map(|p| {
            lookup
                .volatilities(p, &market_data)
                .map(|surface| {
                    let vol = Decimal::from_f64_retain(surface.volatility(1.0))
                        .unwrap_or_default()
                        .round_dp(4);
                    CalcValue::Number(vol)
                })
        })
        .collect();
    let results = Results::with_columns(trades.len(), vec![column.clone()], items).unwrap();

    assert_eq!(results.failure_count(), 1);
    assert_eq!(
        results.get_by_column::<Decimal>(0, &column).unwrap(),
        Outcome::Success(dec!(0.1))
    );
    let gbp = results.get_by_column::<Decimal>(1, &column).unwrap();
    assert_eq!(gbp.failure_reason().unwrap().kind(), FailureKind::MissingData);
}

#[test]
fn test_unknown_pair_fails_structurally_before_calculation() {
    let lookup = DefaultFxOptionLookup::of(pair("EUR/USD"), VolatilitiesId::new("EUR-USD-VOLS"));
    let needed: BTreeSet<CurrencyPair> = [pair("EUR/USD"), pair("USD/CHF")].into_iter().collect();
    let err = lookup.requirements(&needed).unwrap_err();
    assert_eq!(err.kind(), FailureKind::MissingData);
    assert!(err.to_string().contains("USD/CHF"));
}

#[test]
fn test_typed_access_on_mixed_columns() {
    let pv = ColumnDefinition::of(Measure::present_value());
    let jtd = ColumnDefinition::of(Measure::jump_to_default());
    let results = Results::with_columns(
        1,
        vec![pv.clone(), jtd.clone()],
        vec![
            Outcome::success(CalcValue::Amount(CurrencyAmount::new(usd(), dec!(1000)))),
            Outcome::success(CalcValue::JumpToDefault(JumpToDefault::of(
                usd(),
                [(EntityId::new("ACME"), dec!(-250))],
            ))),
        ],
    )
    .unwrap();

    let amount = results.get_by_column::<CurrencyAmount>(0, &pv).unwrap();
    assert_eq!(amount.into_value().unwrap().amount(), dec!(1000));

    let breakdown = results
        .get_by_measure::<JumpToDefault>(0, &Measure::jump_to_default())
        .unwrap();
    assert_eq!(breakdown.into_value().unwrap().total(), Some(dec!(-250)));

    let err = results.get_by_column::<CurrencyAmount>(0, &jtd).unwrap_err();
    assert!(matches!(err, ResultsError::TypeMismatch { .. }));
    let reason: FailureReason = err.into();
    assert_eq!(reason.kind(), FailureKind::InvalidInput);
}

#[test]
fn test_concurrent_readers() {
    let results = Arc::new(
        Results::of(
            3,
            3,
            (0..9)
                .map(|i| Outcome::success(CalcValue::Number(Decimal::from(i))))
                .collect(),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let results = Arc::clone(&results);
            thread::spawn(move || {
                let mut sum = Decimal::ZERO;
                for r in 0..3 {
                    for c in 0..3 {
                        if let Some(CalcValue::Number(v)) = results.get(r, c).unwrap().value() {
                            sum += *v;
                        }
                    }
                }
                sum
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), dec!(36));
    }
}

#[test]
fn test_results_conversion_reports_missing_rates_per_cell() {
    let results = Results::with_columns(
        2,
        vec![ColumnDefinition::of(Measure::present_value())],
        vec![
            Outcome::success(CalcValue::Amount(CurrencyAmount::new(usd(), dec!(10)))),
            Outcome::success(CalcValue::Amount(CurrencyAmount::new(
                CurrencyCode::new("BRL"),
                dec!(10),
            ))),
        ],
    )
    .unwrap();
    let rates = FxRateTable::new().with_rate(usd(), eur(), dec!(0.9)).unwrap();

    let converted = results.converted_to(&eur(), &rates);
    assert!(converted.get(0, 0).unwrap().is_success());
    assert_eq!(
        converted.get(1, 0).unwrap().failure_reason().unwrap().kind(),
        FailureKind::CurrencyConversion
    );
}

#[test]
fn test_results_conversion_overflow_fails_only_that_cell() {
    let jpy = CurrencyCode::new("JPY");
    let results = Results::with_columns(
        2,
        vec![ColumnDefinition::of(Measure::present_value())],
        vec![
            Outcome::success(CalcValue::Amount(CurrencyAmount::new(usd(), Decimal::MAX))),
            Outcome::success(CalcValue::Amount(CurrencyAmount::new(usd(), dec!(2)))),
        ],
    )
    .unwrap();
    let rates = FxRateTable::new().with_rate(usd(), jpy.clone(), dec!(150)).unwrap();

    let converted = results.converted_to(&jpy, &rates);
    assert_eq!(
        converted.get(0, 0).unwrap().failure_reason().unwrap().kind(),
        FailureKind::CurrencyConversion
    );
    assert_eq!(
        converted.get(1, 0).unwrap().value(),
        Some(&CalcValue::Amount(CurrencyAmount::new(jpy, dec!(300))))
    );
}

#[test]
fn test_results_display_with_oversized_breakdown() {
    let results = Results::of(
        1,
        1,
        vec![Outcome::success(CalcValue::JumpToDefault(JumpToDefault::of(
            usd(),
            [
                (EntityId::new("EntityA"), Decimal::MAX),
                (EntityId::new("EntityB"), Decimal::MAX),
            ],
        )))],
    )
    .unwrap();
    assert!(results.to_string().contains("JTD[USD x2] overflow"));
}

/// Converts every pair at the same rate, identity included.
struct FixedRate(Decimal);

impl FxRateProvider for FixedRate {
    fn fx_rate(&self, _from: &CurrencyCode, _to: &CurrencyCode) -> Result<Decimal, FxError> {
        Ok(self.0)
    }
}

#[test]
fn test_identity_conversion_uses_provider() {
    let amount = CurrencyAmount::new(usd(), dec!(10));
    let converted = amount.converted_to(&usd(), &FixedRate(dec!(2))).unwrap();
    assert_eq!(converted.amount(), dec!(20));
}

#[test]
fn test_batch_file_round_trip_through_json() {
    let json = r#"{
        "row_count": 1,
        "columns": [
            { "measure": "PresentValue", "reporting_currency": "EUR" },
            { "measure": "JumpToDefault" }
        ],
        "items": [
            { "amount": { "currency": "USD", "amount": "200" } },
            { "jump_to_default": { "currency": "USD", "amounts": { "ACME": "-10" } } }
        ]
    }"#;
    let file: BatchFile = serde_json::from_str(json).unwrap();
    let results = file.decode().unwrap();

    let rates = FxRateTable::new().with_rate(usd(), eur(), dec!(0.5)).unwrap();
    let reported = results.in_reporting_currency(&rates);
    assert_eq!(
        reported.get(0, 0).unwrap().value(),
        Some(&CalcValue::Amount(CurrencyAmount::new(eur(), dec!(100))))
    );
    // no reporting currency on the second column
    assert_eq!(reported.get(0, 1).unwrap(), results.get(0, 1).unwrap());

    let written = serde_json::to_string(&BatchFile::encode(&reported).unwrap()).unwrap();
    let reread: BatchFile = serde_json::from_str(&written).unwrap();
    assert_eq!(reread.decode().unwrap(), reported);
}
