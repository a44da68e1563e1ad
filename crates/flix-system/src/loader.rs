//! # Catalog Loader
//!
//! Reads the catalog file and hands its lines to [`Catalog::load`].
//!
//! ```text
//! catalog.txt ──read──► lines ──Catalog::load──► Catalog (sorted)
//!                                    │
//!                                    └── MalformedCatalogEntry { line_number, line }
//! ```

use std::path::Path;

use flix_core::Catalog;
use tracing::{info, warn};

use crate::error::DeskResult;

/// Loads a catalog from `path`.
///
/// ## Errors
/// - `DeskError::Io` when the file cannot be read
/// - `DeskError::Core(MalformedCatalogEntry)` on the first bad line
pub fn load_catalog(path: impl AsRef<Path>) -> DeskResult<Catalog> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    match parse_catalog(&contents) {
        Ok(catalog) => {
            info!(?path, titles = catalog.len(), "Catalog loaded");
            Ok(catalog)
        }
        Err(e) => {
            warn!(?path, error = %e, "Catalog file rejected");
            Err(e)
        }
    }
}

/// Parses catalog text already in memory.
pub fn parse_catalog(contents: &str) -> DeskResult<Catalog> {
    Ok(Catalog::load(contents.lines())?)
}
