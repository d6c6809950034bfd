//! JSON file formats read and written by the command line tool.
//!
//! Each file is parsed into plain DTO structs first, and the DTOs are then
//! decoded field by field into domain types so every validation rule of
//! the domain constructors applies.

use crate::calc::column::ColumnDefinition;
use crate::calc::measure::Measure;
use crate::calc::results::{Results, ResultsError};
use crate::calc::value::{CalcValue, ValueType};
use crate::core::currency::{CurrencyCode, CurrencyPair, FxError, FxRateTable};
use crate::core::entity::EntityId;
use crate::core::outcome::{FailureKind, FailureReason, Outcome};
use crate::market::lookup::DefaultFxOptionLookup;
use crate::market::surface::VolatilitiesId;
use crate::money::amount::CurrencyAmount;
use crate::money::jump_to_default::JumpToDefault;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("error reading '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("measure '{0}' is not a standard measure and no value_type was given")]
    UnknownMeasure(String),
    #[error("results with {0} columns but no column definitions cannot be written as a batch")]
    MissingColumns(usize),
    #[error(transparent)]
    Results(#[from] ResultsError),
    #[error(transparent)]
    Fx(#[from] FxError),
}

/// Read and parse a JSON file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, InputError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn parse_amount(s: &str) -> Result<Decimal, InputError> {
    s.trim()
        .parse()
        .map_err(|_| InputError::InvalidAmount(s.to_string()))
}

/// A batch of results: `row_count`, the columns and the row-major cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFile {
    pub row_count: usize,
    pub columns: Vec<ColumnInput>,
    pub items: Vec<CellInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInput {
    /// Defaults to the measure name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub measure: String,
    /// Required for measures other than the standard ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellInput {
    Number(String),
    Amount(AmountInput),
    JumpToDefault(BreakdownInput),
    Text(String),
    Failure(FailureInput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountInput {
    pub currency: String,
    pub amount: String,
}

/// Amounts per legal entity in one currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownInput {
    pub currency: String,
    pub amounts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInput {
    pub kind: FailureKind,
    pub message: String,
}

impl ColumnInput {
    pub fn decode(self) -> Result<ColumnDefinition, InputError> {
        let measure = match (Measure::standard(&self.measure), self.value_type) {
            (Some(standard), None) => standard,
            (_, Some(value_type)) => Measure::new(self.measure.as_str(), value_type),
            (None, None) => return Err(InputError::UnknownMeasure(self.measure)),
        };
        let mut column = match self.name {
            Some(name) => ColumnDefinition::named(name, measure),
            None => ColumnDefinition::of(measure),
        };
        if let Some(ccy) = self.reporting_currency {
            column = column.with_reporting_currency(CurrencyCode::new(ccy));
        }
        Ok(column)
    }

    fn encode(column: &ColumnDefinition) -> Self {
        let measure = column.measure();
        let standard = Measure::standard(measure.name()).as_ref() == Some(measure);
        Self {
            name: (column.name() != measure.name()).then(|| column.name().to_string()),
            measure: measure.name().to_string(),
            value_type: (!standard).then(|| measure.value_type()),
            reporting_currency: column.reporting_currency().map(|c| c.to_string()),
        }
    }
}

impl AmountInput {
    pub fn decode(self) -> Result<CurrencyAmount, InputError> {
        Ok(CurrencyAmount::new(
            CurrencyCode::new(self.currency),
            parse_amount(&self.amount)?,
        ))
    }
}

impl BreakdownInput {
    pub fn decode(self) -> Result<JumpToDefault, InputError> {
        let mut amounts = Vec::with_capacity(self.amounts.len());
        for (entity, amount) in self.amounts {
            amounts.push((EntityId::new(entity), parse_amount(&amount)?));
        }
        Ok(JumpToDefault::of(CurrencyCode::new(self.currency), amounts))
    }

    pub fn encode(jtd: &JumpToDefault) -> Self {
        Self {
            currency: jtd.currency().to_string(),
            amounts: jtd
                .amounts()
                .iter()
                .map(|(e, a)| (e.to_string(), a.to_string()))
                .collect(),
        }
    }
}

impl CellInput {
    pub fn decode(self) -> Result<Outcome<CalcValue>, InputError> {
        let value = match self {
            CellInput::Number(v) => CalcValue::Number(parse_amount(&v)?),
            CellInput::Amount(a) => CalcValue::Amount(a.decode()?),
            CellInput::JumpToDefault(b) => CalcValue::JumpToDefault(b.decode()?),
            CellInput::Text(t) => CalcValue::Text(t),
            CellInput::Failure(f) => {
                return Ok(Outcome::failure(FailureReason::new(f.kind, f.message)))
            }
        };
        Ok(Outcome::success(value))
    }

    pub fn encode(outcome: &Outcome<CalcValue>) -> Self {
        match outcome {
            Outcome::Success(CalcValue::Number(v)) => CellInput::Number(v.to_string()),
            Outcome::Success(CalcValue::Amount(a)) => CellInput::Amount(AmountInput {
                currency: a.currency().to_string(),
                amount: a.amount().to_string(),
            }),
            Outcome::Success(CalcValue::JumpToDefault(j)) => {
                CellInput::JumpToDefault(BreakdownInput::encode(j))
            }
            Outcome::Success(CalcValue::Text(t)) => CellInput::Text(t.clone()),
            Outcome::Failure(reason) => CellInput::Failure(FailureInput {
                kind: reason.kind(),
                message: reason.message().to_string(),
            }),
        }
    }
}

impl BatchFile {
    pub fn decode(self) -> Result<Results, InputError> {
        let columns = self
            .columns
            .into_iter()
            .map(ColumnInput::decode)
            .collect::<Result<Vec<_>, _>>()?;
        let items = self
            .items
            .into_iter()
            .map(CellInput::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Results::with_columns(self.row_count, columns, items)?)
    }

    /// Fails for results built without column definitions, which a batch
    /// file has no way to describe.
    pub fn encode(results: &Results) -> Result<Self, InputError> {
        if results.columns().len() != results.column_count() {
            return Err(InputError::MissingColumns(results.column_count()));
        }
        Ok(Self {
            row_count: results.row_count(),
            columns: results.columns().iter().map(ColumnInput::encode).collect(),
            items: results.items().iter().map(CellInput::encode).collect(),
        })
    }
}

/// Currency pair → volatilities identifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupFile {
    pub volatilities: BTreeMap<String, String>,
}

impl LookupFile {
    pub fn decode(self) -> Result<DefaultFxOptionLookup, InputError> {
        let mut ids = Vec::with_capacity(self.volatilities.len());
        for (pair, id) in self.volatilities {
            let pair: CurrencyPair = pair.parse()?;
            ids.push((pair, VolatilitiesId::new(id)));
        }
        Ok(DefaultFxOptionLookup::from_map(ids))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateInput {
    pub from: String,
    pub to: String,
    pub rate: String,
}

/// FX rates, each stored together with its inverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesFile {
    pub rates: Vec<RateInput>,
}

impl RatesFile {
    pub fn decode(self) -> Result<FxRateTable, InputError> {
        let mut table = FxRateTable::new();
        for r in self.rates {
            table.set_rate(
                CurrencyCode::new(r.from),
                CurrencyCode::new(r.to),
                parse_amount(&r.rate)?,
            )?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::FxRateProvider;
    use crate::market::lookup::FxOptionLookup;
    use rust_decimal_macros::dec;

    const BATCH: &str = r#"{
        "row_count": 2,
        "columns": [
            { "measure": "PresentValue" },
            { "name": "Spread", "measure": "CreditSpread", "value_type": "number" }
        ],
        "items": [
            { "amount": { "currency": "USD", "amount": "100.50" } },
            { "number": "0.0125" },
            { "failure": { "kind": "MissingData", "message": "no curve" } },
            { "number": "0.02" }
        ]
    }"#;

    #[test]
    fn test_decode_batch() {
        let file: BatchFile = serde_json::from_str(BATCH).unwrap();
        let results = file.decode().unwrap();
        assert_eq!(results.row_count(), 2);
        assert_eq!(results.column_count(), 2);
        assert_eq!(results.columns()[1].name(), "Spread");

        let pv = results
            .get_by_measure::<CurrencyAmount>(0, &Measure::present_value())
            .unwrap();
        assert_eq!(pv.value().unwrap().amount(), dec!(100.50));
        assert_eq!(
            results.get(1, 0).unwrap().failure_reason().unwrap().kind(),
            FailureKind::MissingData
        );
    }

    #[test]
    fn test_batch_encode_decode_preserves_results() {
        let file: BatchFile = serde_json::from_str(BATCH).unwrap();
        let results = file.decode().unwrap();
        let again = BatchFile::encode(&results).unwrap().decode().unwrap();
        assert_eq!(again, results);
    }

    #[test]
    fn test_encode_needs_column_definitions() {
        let positional = Results::of(
            1,
            2,
            vec![
                Outcome::success(CalcValue::Number(dec!(1))),
                Outcome::success(CalcValue::Number(dec!(2))),
            ],
        )
        .unwrap();
        assert!(matches!(
            BatchFile::encode(&positional),
            Err(InputError::MissingColumns(2))
        ));

        let empty = Results::of(0, 0, Vec::new()).unwrap();
        assert!(BatchFile::encode(&empty).is_ok());
    }

    #[test]
    fn test_batch_wrong_item_count() {
        let json = r#"{ "row_count": 3, "columns": [{ "measure": "ParRate" }], "items": [] }"#;
        let file: BatchFile = serde_json::from_str(json).unwrap();
        assert!(matches!(
            file.decode(),
            Err(InputError::Results(ResultsError::ItemCountMismatch { .. }))
        ));
    }

    #[test]
    fn test_unknown_measure_needs_type() {
        let column = ColumnInput {
            name: None,
            measure: "Vega".to_string(),
            value_type: None,
            reporting_currency: None,
        };
        assert!(matches!(column.decode(), Err(InputError::UnknownMeasure(_))));
    }

    #[test]
    fn test_invalid_amount() {
        let cell = CellInput::Number("ten".to_string());
        assert!(matches!(cell.decode(), Err(InputError::InvalidAmount(_))));
    }

    #[test]
    fn test_decode_lookup() {
        let json = r#"{ "volatilities": { "EUR/USD": "EUR-USD-VOLS", "GBP/USD": "GBP-USD-VOLS" } }"#;
        let file: LookupFile = serde_json::from_str(json).unwrap();
        let lookup = file.decode().unwrap();
        assert_eq!(lookup.volatility_currency_pairs().len(), 2);
    }

    #[test]
    fn test_decode_lookup_bad_pair() {
        let json = r#"{ "volatilities": { "EURUSD": "EUR-USD-VOLS" } }"#;
        let file: LookupFile = serde_json::from_str(json).unwrap();
        assert!(matches!(file.decode(), Err(InputError::Fx(FxError::InvalidPair(_)))));
    }

    #[test]
    fn test_decode_rates() {
        let json = r#"{ "rates": [ { "from": "USD", "to": "EUR", "rate": "0.9" } ] }"#;
        let file: RatesFile = serde_json::from_str(json).unwrap();
        let table = file.decode().unwrap();
        let rate = table
            .fx_rate(&CurrencyCode::new("USD"), &CurrencyCode::new("EUR"))
            .unwrap();
        assert_eq!(rate, dec!(0.9));
    }

    #[test]
    fn test_decode_breakdown() {
        let json = r#"{ "currency": "USD", "amounts": { "EntityA": "100.0", "EntityB": "-50.0" } }"#;
        let file: BreakdownInput = serde_json::from_str(json).unwrap();
        let jtd = file.decode().unwrap();
        assert_eq!(jtd.amount(&EntityId::new("EntityB")), Some(dec!(-50)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_json::<RatesFile>("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
    }
}
