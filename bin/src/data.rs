//! Input loading for the cartera CLI.

use anyhow::{Context, Result, anyhow};
use cartera::{CovarianceMatrix, Predictions};
use ndarray::Array2;
use ndarray_npy::ReadNpyExt;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Load a predictions table from CSV.
pub(crate) fn load_predictions(path: &Path) -> Result<Predictions> {
    let df = read_csv(path, true)?;
    Predictions::from_frame(&df)
        .with_context(|| format!("invalid predictions table {}", path.display()))
}

/// Load a covariance matrix from `.npy` or CSV.
///
/// CSV files may be plain numeric grids or carry a header row and a label
/// column; non-numeric columns are dropped in the latter case.
pub(crate) fn load_covariance(path: &Path) -> Result<CovarianceMatrix> {
    let matrix = match path.extension().and_then(|e| e.to_str()) {
        Some("npy") => {
            let file = File::open(path)
                .with_context(|| format!("failed to open covariance file {}", path.display()))?;
            Array2::<f64>::read_npy(file)
                .with_context(|| format!("failed to decode npy data from {}", path.display()))?
        }
        _ => {
            let mut df = read_csv(path, false)?;
            if has_text(&df) {
                df = read_csv(path, true)?;
            }
            frame_to_matrix(&df)
                .with_context(|| format!("invalid covariance matrix {}", path.display()))?
        }
    };
    Ok(CovarianceMatrix::new(matrix))
}

fn read_csv(path: &Path, has_header: bool) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(has_header)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .with_context(|| format!("failed to read {}", path.display()))
}

fn has_text(df: &DataFrame) -> bool {
    df.get_columns().iter().any(|c| c.dtype() == &DataType::String)
}

fn frame_to_matrix(df: &DataFrame) -> Result<Array2<f64>> {
    let columns: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype() != &DataType::String)
        .collect();

    let mut matrix = Array2::zeros((df.height(), columns.len()));
    for (j, column) in columns.into_iter().enumerate() {
        let series = column.as_materialized_series().cast(&DataType::Float64)?;
        for (i, value) in series.f64()?.into_iter().enumerate() {
            matrix[[i, j]] =
                value.ok_or_else(|| anyhow!("cell ({i}, {j}) is missing or non-numeric"))?;
        }
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cartera::Horizon;
    use ndarray::array;
    use ndarray_npy::WriteNpyExt;
    use std::fs;

    #[test]
    fn test_load_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        fs::write(
            &path,
            "ticker,return_3m,return_12m,sector\nAAA,0.01,0.05,tech\nBBB,0.02,0.04,energy\n",
        )
        .unwrap();

        let predictions = load_predictions(&path).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(
            predictions.horizons(),
            vec![Horizon::months(3), Horizon::months(12)]
        );
        assert_relative_eq!(predictions.returns(Horizon::months(12)).unwrap()[1], 0.04);
    }

    #[test]
    fn test_load_predictions_rejects_text_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        fs::write(&path, "ticker,return_6m\nAAA,0.01\nBBB,n/a\n").unwrap();
        assert!(load_predictions(&path).is_err());
    }

    #[test]
    fn test_load_covariance_npy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cov.npy");
        let cov = array![[0.04, 0.01], [0.01, 0.09]];
        cov.write_npy(File::create(&path).unwrap()).unwrap();

        let loaded = load_covariance(&path).unwrap();
        assert_eq!(loaded.as_array(), &cov);
    }

    #[test]
    fn test_load_covariance_plain_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cov.csv");
        fs::write(&path, "0.04,0.01\n0.01,0.09\n").unwrap();

        let loaded = load_covariance(&path).unwrap();
        assert_eq!(loaded.dim(), (2, 2));
        assert_relative_eq!(loaded.as_array()[[1, 1]], 0.09);
        assert_relative_eq!(loaded.as_array()[[0, 1]], 0.01);
    }

    #[test]
    fn test_load_covariance_labelled_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cov.csv");
        fs::write(&path, "ticker,AAA,BBB\nAAA,0.04,0.01\nBBB,0.01,0.09\n").unwrap();

        let loaded = load_covariance(&path).unwrap();
        assert_eq!(loaded.dim(), (2, 2));
        assert_relative_eq!(loaded.as_array()[[0, 0]], 0.04);
        assert_relative_eq!(loaded.as_array()[[1, 0]], 0.01);
    }

    #[test]
    fn test_missing_file() {
        let err = load_covariance(Path::new("/nonexistent/cov.npy")).unwrap_err();
        assert!(err.to_string().contains("failed to open"));
    }
}
