//! The results of running a batch of calculations.
//!
//! A [`Results`] matrix holds one [`Outcome`] per target (row) and column,
//! flattened row-major. It is built once by the producer of the batch and
//! never changes afterwards, so any number of threads may read it.

use crate::calc::column::ColumnDefinition;
use crate::calc::measure::Measure;
use crate::calc::value::{CalcValue, MeasureValue, ValueType};
use crate::core::currency::{CurrencyCode, FxRateProvider};
use crate::core::outcome::{FailureKind, FailureReason, Outcome};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors from building or reading a results matrix.
///
/// All of these are caller errors and classify as
/// [`FailureKind::InvalidInput`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultsError {
    #[error(
        "the number of items ({actual}) must equal the number of rows ({row_count}) \
         multiplied by the number of columns ({column_count}), expected {expected}"
    )]
    ItemCountMismatch {
        row_count: usize,
        column_count: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{row_count} rows by {column_count} columns is too large to address")]
    DimensionOverflow { row_count: usize, column_count: usize },
    #[error("row index must be in the range [0, {row_count}), but it was {row}")]
    RowOutOfRange { row: usize, row_count: usize },
    #[error("column index must be in the range [0, {column_count}), but it was {column}")]
    ColumnOutOfRange { column: usize, column_count: usize },
    #[error("no column matches definition {0}")]
    UnknownColumn(ColumnDefinition),
    #[error("no column matches measure {0}")]
    UnknownMeasure(Measure),
    #[error("column definition {0} appears more than once")]
    DuplicateColumn(ColumnDefinition),
    #[error("value type {actual} is not an instance of expected type {expected}")]
    TypeMismatch {
        actual: ValueType,
        expected: ValueType,
    },
}

impl ResultsError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::InvalidInput
    }
}

impl From<ResultsError> for FailureReason {
    fn from(err: ResultsError) -> Self {
        FailureReason::new(err.kind(), err.to_string())
    }
}

/// Calculation results for a grid of targets × columns.
///
/// For two targets `t1`, `t2` and two columns `c1`, `c2` the items are
/// stored as `[t1c1, t1c2, t2c1, t2c2]`.
///
/// # Examples
///
/// ```
/// use scenario_results::calc::results::Results;
/// use scenario_results::calc::value::CalcValue;
/// use scenario_results::core::outcome::{FailureReason, Outcome};
/// use rust_decimal_macros::dec;
///
/// let results = Results::of(2, 2, vec![
///     Outcome::success(CalcValue::Number(dec!(1.0))),
///     Outcome::failure(FailureReason::missing_data("no vols for EUR/USD")),
///     Outcome::success(CalcValue::Number(dec!(3.0))),
///     Outcome::success(CalcValue::Number(dec!(4.0))),
/// ]).unwrap();
///
/// assert!(results.get(0, 1).unwrap().is_failure());
/// assert_eq!(results.get(1, 0).unwrap().value(), Some(&CalcValue::Number(dec!(3.0))));
/// assert!(results.get(2, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    row_count: usize,
    column_count: usize,
    /// Empty when built with [`Results::of`].
    columns: Vec<ColumnDefinition>,
    columns_by_definition: HashMap<ColumnDefinition, usize>,
    /// First column seen for each measure.
    columns_by_measure: HashMap<Measure, usize>,
    /// Measures requested by more than one column.
    duplicate_measures: Vec<Measure>,
    items: Vec<Outcome<CalcValue>>,
}

impl Results {
    /// Results with positional access only.
    ///
    /// Typed access by column definition or measure fails for every
    /// request because no columns are known.
    pub fn of(
        row_count: usize,
        column_count: usize,
        items: Vec<Outcome<CalcValue>>,
    ) -> Result<Self, ResultsError> {
        check_item_count(row_count, column_count, items.len())?;
        log::debug!("built {}x{} results without column definitions", row_count, column_count);
        Ok(Self {
            row_count,
            column_count,
            columns: Vec::new(),
            columns_by_definition: HashMap::new(),
            columns_by_measure: HashMap::new(),
            duplicate_measures: Vec::new(),
            items,
        })
    }

    /// Results for the given columns, in order.
    ///
    /// Every column definition must be distinct. When two columns request
    /// the same measure, lookups by measure resolve to the first of them.
    pub fn with_columns(
        row_count: usize,
        columns: Vec<ColumnDefinition>,
        items: Vec<Outcome<CalcValue>>,
    ) -> Result<Self, ResultsError> {
        let column_count = columns.len();
        check_item_count(row_count, column_count, items.len())?;

        let mut columns_by_definition = HashMap::with_capacity(column_count);
        let mut columns_by_measure = HashMap::new();
        let mut duplicate_measures = Vec::new();

        for (index, column) in columns.iter().enumerate() {
            if columns_by_definition.insert(column.clone(), index).is_some() {
                return Err(ResultsError::DuplicateColumn(column.clone()));
            }
            let measure = column.measure();
            if let Some(first) = columns_by_measure.get(measure) {
                log::warn!(
                    "measure {} is requested by columns {} and {}; lookups by measure use column {}",
                    measure,
                    first,
                    index,
                    first
                );
                if !duplicate_measures.contains(measure) {
                    duplicate_measures.push(measure.clone());
                }
            } else {
                columns_by_measure.insert(measure.clone(), index);
            }
        }

        log::debug!("built {}x{} results", row_count, column_count);
        Ok(Self {
            row_count,
            column_count,
            columns,
            columns_by_definition,
            columns_by_measure,
            duplicate_measures,
            items,
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// All outcomes, row-major.
    pub fn items(&self) -> &[Outcome<CalcValue>] {
        &self.items
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Measures shared by more than one column, for which lookups by
    /// measure are ambiguous.
    pub fn duplicate_measures(&self) -> &[Measure] {
        &self.duplicate_measures
    }

    pub fn column_index(&self, column: &ColumnDefinition) -> Option<usize> {
        self.columns_by_definition.get(column).copied()
    }

    pub fn measure_index(&self, measure: &Measure) -> Option<usize> {
        self.columns_by_measure.get(measure).copied()
    }

    /// The outcome at a row and column.
    pub fn get(&self, row: usize, column: usize) -> Result<&Outcome<CalcValue>, ResultsError> {
        self.check_row(row)?;
        if column >= self.column_count {
            return Err(ResultsError::ColumnOutOfRange {
                column,
                column_count: self.column_count,
            });
        }
        Ok(&self.items[row * self.column_count + column])
    }

    /// All outcomes for one target.
    pub fn row(&self, row: usize) -> Result<&[Outcome<CalcValue>], ResultsError> {
        self.check_row(row)?;
        let start = row * self.column_count;
        Ok(&self.items[start..start + self.column_count])
    }

    /// The outcome for a row in the column matching `column`, narrowed to `T`.
    ///
    /// A failed cell is returned as a failure with its reason unchanged,
    /// whatever `T` is. For a successful cell the value type is checked
    /// first against the column's measure type and then against `T`; either
    /// mismatch is an error naming the value's actual type.
    pub fn get_by_column<T: MeasureValue>(
        &self,
        row: usize,
        column: &ColumnDefinition,
    ) -> Result<Outcome<T>, ResultsError> {
        self.check_row(row)?;
        let index = self
            .column_index(column)
            .ok_or_else(|| ResultsError::UnknownColumn(column.clone()))?;
        self.typed_cell(row, index, column.measure())
    }

    /// The outcome for a row in the first column requesting `measure`,
    /// narrowed to `T`.
    ///
    /// Same contract as [`Results::get_by_column`]. If several columns
    /// request the measure, see [`Results::duplicate_measures`].
    pub fn get_by_measure<T: MeasureValue>(
        &self,
        row: usize,
        measure: &Measure,
    ) -> Result<Outcome<T>, ResultsError> {
        self.check_row(row)?;
        let index = self
            .measure_index(measure)
            .ok_or_else(|| ResultsError::UnknownMeasure(measure.clone()))?;
        self.typed_cell(row, index, measure)
    }

    /// Number of failed cells.
    pub fn failure_count(&self) -> usize {
        self.items.iter().filter(|o| o.is_failure()).count()
    }

    /// A copy of these results with every monetary value re-expressed in
    /// `currency`. Cells the provider cannot convert become
    /// `CurrencyConversion` failures.
    pub fn converted_to<P: FxRateProvider + ?Sized>(
        &self,
        currency: &CurrencyCode,
        provider: &P,
    ) -> Results {
        self.map_items(|_, item| item.converted_to(currency, provider))
    }

    /// A copy of these results with each column that names a reporting
    /// currency re-expressed in it. Other columns are left as they are.
    pub fn in_reporting_currency<P: FxRateProvider + ?Sized>(&self, provider: &P) -> Results {
        self.map_items(|column, item| {
            match self.columns.get(column).and_then(|c| c.reporting_currency()) {
                Some(currency) => item.converted_to(currency, provider),
                None => item.clone(),
            }
        })
    }

    fn map_items<F>(&self, f: F) -> Results
    where
        F: Fn(usize, &Outcome<CalcValue>) -> Outcome<CalcValue>,
    {
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| f(position % self.column_count.max(1), item))
            .collect();
        Results {
            items,
            ..self.clone_without_items()
        }
    }

    fn clone_without_items(&self) -> Results {
        Results {
            row_count: self.row_count,
            column_count: self.column_count,
            columns: self.columns.clone(),
            columns_by_definition: self.columns_by_definition.clone(),
            columns_by_measure: self.columns_by_measure.clone(),
            duplicate_measures: self.duplicate_measures.clone(),
            items: Vec::new(),
        }
    }

    fn check_row(&self, row: usize) -> Result<(), ResultsError> {
        if row >= self.row_count {
            return Err(ResultsError::RowOutOfRange {
                row,
                row_count: self.row_count,
            });
        }
        Ok(())
    }

    fn typed_cell<T: MeasureValue>(
        &self,
        row: usize,
        column: usize,
        measure: &Measure,
    ) -> Result<Outcome<T>, ResultsError> {
        let value = match self.get(row, column)? {
            Outcome::Success(value) => value,
            Outcome::Failure(reason) => return Ok(Outcome::Failure(reason.clone())),
        };
        let actual = value.value_type();
        let measure_type = measure.value_type();
        if actual != measure_type {
            return Err(ResultsError::TypeMismatch {
                actual,
                expected: measure_type,
            });
        }
        let expected = T::VALUE_TYPE;
        if actual != expected {
            return Err(ResultsError::TypeMismatch { actual, expected });
        }
        T::from_value(value.clone())
            .map(Outcome::Success)
            .ok_or(ResultsError::TypeMismatch { actual, expected })
    }
}

fn check_item_count(
    row_count: usize,
    column_count: usize,
    actual: usize,
) -> Result<(), ResultsError> {
    let expected = row_count
        .checked_mul(column_count)
        .ok_or(ResultsError::DimensionOverflow {
            row_count,
            column_count,
        })?;
    if expected != actual {
        return Err(ResultsError::ItemCountMismatch {
            row_count,
            column_count,
            expected,
            actual,
        });
    }
    Ok(())
}

impl fmt::Display for Results {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "━━━ Results ━━━")?;
        writeln!(
            f,
            "Rows: {}  Columns: {}  Failures: {}",
            self.row_count,
            self.column_count,
            self.failure_count()
        )?;
        let headers: Vec<String> = (0..self.column_count)
            .map(|c| match self.columns.get(c) {
                Some(column) => column.name().to_string(),
                None => format!("#{}", c),
            })
            .collect();
        writeln!(f, "{:>6} | {}", "row", headers.join(" | "))?;
        for row in 0..self.row_count {
            let start = row * self.column_count;
            let cells: Vec<String> = self.items[start..start + self.column_count]
                .iter()
                .map(|o| o.to_string())
                .collect();
            writeln!(f, "{:>6} | {}", row, cells.join(" | "))?;
        }
        Ok(())
    }
}
