//! Common types used throughout the cartera framework.
//!
//! This module defines the read-only inputs of an optimization run: the asset
//! universe, the horizon-keyed predictions table and the covariance matrix.

use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{CarteraError, Result, ValidationError};

/// An asset identifier, typically a ticker like "AAPL".
pub type Ticker = String;

/// A forecast horizon, in months.
///
/// Predictions tables name their columns `return_{months}m`; a `Horizon` is the
/// typed key for one of those columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Horizon(u32);

impl Horizon {
    /// Creates a horizon of the given number of months.
    pub const fn months(months: u32) -> Self {
        Self(months)
    }

    /// Returns the horizon length in months.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Name of the predictions column holding this horizon's returns.
    pub fn column_name(self) -> String {
        format!("return_{}m", self.0)
    }

    /// Parses a `return_{months}m` column name.
    pub fn from_column_name(name: &str) -> Option<Self> {
        name.strip_prefix("return_")?
            .strip_suffix('m')?
            .parse()
            .ok()
            .map(Self)
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

/// Ordered, unique set of tickers with a stable ticker to row mapping.
///
/// Position `i` in the universe is row `i` of the predictions table and
/// row/column `i` of the covariance matrix.
#[derive(Debug, Clone, Default)]
pub struct AssetUniverse {
    tickers: Vec<Ticker>,
    index: HashMap<Ticker, usize>,
}

impl AssetUniverse {
    /// Builds a universe, rejecting duplicate tickers.
    pub fn new<I, S>(tickers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Ticker>,
    {
        let tickers: Vec<Ticker> = tickers.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(tickers.len());
        for (i, ticker) in tickers.iter().enumerate() {
            if index.insert(ticker.clone(), i).is_some() {
                return Err(ValidationError::DuplicateTicker(ticker.clone()).into());
            }
        }
        Ok(Self { tickers, index })
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Whether the universe is empty.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Tickers in universe order.
    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    /// Row index of a ticker.
    ///
    /// # Errors
    ///
    /// Returns [`CarteraError::TickerNotFound`] for unknown tickers.
    pub fn index_of(&self, ticker: &str) -> Result<usize> {
        self.index
            .get(ticker)
            .copied()
            .ok_or_else(|| CarteraError::TickerNotFound(ticker.to_string()))
    }

    /// Row indices of several tickers, in the given order.
    pub fn indices_of<S: AsRef<str>>(&self, tickers: &[S]) -> Result<Vec<usize>> {
        tickers.iter().map(|t| self.index_of(t.as_ref())).collect()
    }
}

/// Expected returns per asset, one column per supported horizon.
///
/// Columns are validated and keyed by [`Horizon`] when the table is built, so
/// asking for an unsupported horizon fails before any optimization starts.
#[derive(Debug, Clone)]
pub struct Predictions {
    universe: AssetUniverse,
    returns: BTreeMap<Horizon, Array1<f64>>,
}

impl Predictions {
    /// Creates a predictions table from a universe and per-horizon columns.
    ///
    /// # Errors
    ///
    /// Returns an error if no horizon is given or a column length differs from
    /// the universe size.
    pub fn new(universe: AssetUniverse, returns: BTreeMap<Horizon, Array1<f64>>) -> Result<Self> {
        if returns.is_empty() {
            return Err(CarteraError::InvalidData(
                "predictions table has no return_{h}m columns".to_string(),
            ));
        }
        for (horizon, column) in &returns {
            if column.len() != universe.len() {
                return Err(CarteraError::InvalidData(format!(
                    "column {} has {} rows, expected {}",
                    horizon.column_name(),
                    column.len(),
                    universe.len()
                )));
            }
        }
        Ok(Self { universe, returns })
    }

    /// Builds a predictions table from a DataFrame.
    ///
    /// # Expected Schema
    ///
    /// - `ticker`: asset identifier, read as text whatever its dtype. When
    ///   absent, the first string column is used instead (an exported index).
    /// - `return_{h}m`: expected return over `h` months, one column per
    ///   horizon. Other columns are ignored.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let ticker_column = match df.column("ticker") {
            Ok(column) => column,
            Err(_) => df
                .get_columns()
                .iter()
                .find(|c| c.dtype() == &DataType::String)
                .ok_or_else(|| CarteraError::MissingColumn("ticker".to_string()))?,
        };

        let ticker_series = ticker_column
            .as_materialized_series()
            .cast(&DataType::String)?;
        let tickers = ticker_series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, t)| {
                t.map(str::to_string).ok_or_else(|| {
                    CarteraError::InvalidData(format!("missing ticker in row {row}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let universe = AssetUniverse::new(tickers)?;

        let mut returns = BTreeMap::new();
        for column in df.get_columns() {
            let Some(horizon) = Horizon::from_column_name(column.name().as_str()) else {
                continue;
            };
            let series = column.as_materialized_series().cast(&DataType::Float64)?;
            let values = series
                .f64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    v.ok_or_else(|| {
                        CarteraError::InvalidData(format!(
                            "{} is missing or non-numeric in row {row}",
                            horizon.column_name()
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            returns.insert(horizon, Array1::from_vec(values));
        }

        Self::new(universe, returns)
    }

    /// The asset universe, in table order.
    pub const fn universe(&self) -> &AssetUniverse {
        &self.universe
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.universe.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.universe.is_empty()
    }

    /// Supported horizons, ascending.
    pub fn horizons(&self) -> Vec<Horizon> {
        self.returns.keys().copied().collect()
    }

    /// Expected returns for one horizon, in universe order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedHorizon`] if the table has no
    /// column for `horizon`.
    pub fn returns(&self, horizon: Horizon) -> Result<&Array1<f64>> {
        self.returns.get(&horizon).ok_or_else(|| {
            let available = self
                .returns
                .keys()
                .map(|h| h.get().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            ValidationError::UnsupportedHorizon {
                horizon: horizon.get(),
                available,
            }
            .into()
        })
    }
}

/// Dense asset covariance matrix, ordered like the asset universe.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix(Array2<f64>);

impl CovarianceMatrix {
    /// Wraps a dense matrix. Shape is checked against the universe later, when
    /// a run is validated.
    pub const fn new(matrix: Array2<f64>) -> Self {
        Self(matrix)
    }

    /// `(rows, cols)` of the matrix.
    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }

    /// Rows and columns at `indices`, in the given order.
    pub fn submatrix(&self, indices: &[usize]) -> Array2<f64> {
        self.0.select(Axis(0), indices).select(Axis(1), indices)
    }

    /// The underlying matrix.
    pub const fn as_array(&self) -> &Array2<f64> {
        &self.0
    }
}

impl From<Array2<f64>> for CovarianceMatrix {
    fn from(matrix: Array2<f64>) -> Self {
        Self::new(matrix)
    }
}
