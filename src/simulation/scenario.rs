//! Random results matrices for benchmarks and smoke testing.

use crate::calc::column::ColumnDefinition;
use crate::calc::measure::Measure;
use crate::calc::results::{Results, ResultsError};
use crate::calc::value::{CalcValue, ValueType};
use crate::core::currency::CurrencyCode;
use crate::core::entity::EntityId;
use crate::core::outcome::{FailureReason, Outcome};
use crate::money::amount::CurrencyAmount;
use crate::money::jump_to_default::JumpToDefault;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random results matrix.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Number of targets.
    pub row_count: usize,
    /// Columns to fill, in order.
    pub columns: Vec<ColumnDefinition>,
    /// Currency of generated monetary values.
    pub currency: CurrencyCode,
    /// Legal entities in each jump-to-default breakdown.
    pub entity_count: usize,
    /// Probability in [0, 1] that a cell is a missing-data failure.
    pub failure_rate: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            row_count: 10,
            columns: vec![
                ColumnDefinition::of(Measure::present_value()),
                ColumnDefinition::of(Measure::jump_to_default()),
                ColumnDefinition::of(Measure::par_rate()),
            ],
            currency: CurrencyCode::new("USD"),
            entity_count: 3,
            failure_rate: 0.1,
        }
    }
}

impl ScenarioConfig {
    /// `count` columns cycling through the standard measures. Repeats get
    /// distinct names so every column definition stays unique.
    pub fn standard_columns(count: usize) -> Vec<ColumnDefinition> {
        let measures = [
            Measure::present_value(),
            Measure::jump_to_default(),
            Measure::par_rate(),
        ];
        (0..count)
            .map(|i| {
                let measure = measures[i % measures.len()].clone();
                if i < measures.len() {
                    ColumnDefinition::of(measure)
                } else {
                    ColumnDefinition::named(format!("{} #{}", measure.name(), i), measure)
                }
            })
            .collect()
    }
}

/// Generate a results matrix with values of the right type for each
/// column's measure.
pub fn generate_random_results(config: &ScenarioConfig) -> Result<Results, ResultsError> {
    let mut rng = rand::thread_rng();
    let failure_rate = if config.failure_rate.is_nan() {
        0.0
    } else {
        config.failure_rate.clamp(0.0, 1.0)
    };
    let entities: Vec<EntityId> = (0..config.entity_count)
        .map(|i| EntityId::new(format!("ENTITY-{:03}", i)))
        .collect();

    let cell_count = config
        .row_count
        .checked_mul(config.columns.len())
        .ok_or(ResultsError::DimensionOverflow {
            row_count: config.row_count,
            column_count: config.columns.len(),
        })?;
    let mut items = Vec::with_capacity(cell_count);
    for row in 0..config.row_count {
        for column in &config.columns {
            if rng.gen_bool(failure_rate) {
                items.push(Outcome::failure(FailureReason::missing_data(format!(
                    "no market data for target {} in column {}",
                    row,
                    column.name()
                ))));
                continue;
            }
            let value = match column.measure().value_type() {
                ValueType::Number => CalcValue::Number(random_amount(&mut rng, 0.0, 0.1, 6)),
                ValueType::CurrencyAmount => CalcValue::Amount(CurrencyAmount::new(
                    config.currency.clone(),
                    random_amount(&mut rng, -1_000_000.0, 1_000_000.0, 2),
                )),
                ValueType::JumpToDefault => CalcValue::JumpToDefault(JumpToDefault::of(
                    config.currency.clone(),
                    entities
                        .iter()
                        .map(|e| (e.clone(), random_amount(&mut rng, -500_000.0, 500_000.0, 2))),
                )),
                ValueType::Text => CalcValue::Text(format!("TARGET-{:04}", row)),
            };
            items.push(Outcome::success(value));
        }
    }

    Results::with_columns(config.row_count, config.columns.clone(), items)
}

fn random_amount<R: Rng>(rng: &mut R, min: f64, max: f64, dp: u32) -> Decimal {
    let value = rng.gen_range(min..max);
    Decimal::from_f64_retain(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(dp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_results_dimensions() {
        let config = ScenarioConfig {
            row_count: 7,
            ..Default::default()
        };
        let results = generate_random_results(&config).unwrap();
        assert_eq!(results.row_count(), 7);
        assert_eq!(results.column_count(), 3);
        assert_eq!(results.items().len(), 21);
    }

    #[test]
    fn test_values_match_measure_types() {
        let config = ScenarioConfig {
            row_count: 20,
            failure_rate: 0.0,
            ..Default::default()
        };
        let results = generate_random_results(&config).unwrap();
        for row in 0..results.row_count() {
            for (c, column) in results.columns().iter().enumerate() {
                let value = results.get(row, c).unwrap().value().unwrap();
                assert_eq!(value.value_type(), column.measure().value_type());
            }
        }
    }

    #[test]
    fn test_all_failures() {
        let config = ScenarioConfig {
            row_count: 5,
            failure_rate: 1.0,
            ..Default::default()
        };
        let results = generate_random_results(&config).unwrap();
        assert_eq!(results.failure_count(), 15);
    }

    #[test]
    fn test_oversized_batch_rejected() {
        let config = ScenarioConfig {
            row_count: usize::MAX,
            ..Default::default()
        };
        let err = generate_random_results(&config).unwrap_err();
        assert!(matches!(err, ResultsError::DimensionOverflow { .. }));
    }

    #[test]
    fn test_standard_columns_are_unique() {
        let columns = ScenarioConfig::standard_columns(7);
        let config = ScenarioConfig {
            row_count: 2,
            columns,
            ..Default::default()
        };
        let results = generate_random_results(&config).unwrap();
        assert_eq!(results.column_count(), 7);
        assert_eq!(results.duplicate_measures().len(), 3);
    }
}
