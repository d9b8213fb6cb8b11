//! Horizons command implementation.

use crate::data;
use anyhow::Result;
use std::path::Path;

/// Print the horizons and universe size of a predictions table.
pub(crate) fn list_horizons(path: &Path) -> Result<()> {
    let predictions = data::load_predictions(path)?;

    println!("Assets:   {}", predictions.len());
    println!("Horizons:");
    for horizon in predictions.horizons() {
        println!("  {:>4}  ({})", horizon.to_string(), horizon.column_name());
    }

    Ok(())
}
