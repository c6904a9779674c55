//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`evaluate`] - Match a contractor profile against a job request
//! - [`rank`] - Rank competing offers
//! - [`counter`] - Counter-offer advice and generation
//! - [`config`] - Effective engine configuration

pub mod config;
pub mod counter;
pub mod evaluate;
pub mod rank;

pub use config::{ConfigCommand, resolve_config};
pub use counter::CounterCommand;
pub use evaluate::EvaluateCommand;
pub use rank::RankCommand;

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Reads a JSON record from a file, or from stdin when the path is `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
