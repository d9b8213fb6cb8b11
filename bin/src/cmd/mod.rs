//! CLI subcommand modules.

pub(crate) mod horizons;
pub(crate) mod optimize;
