//! Config documents for export and import.
//!
//! An exported document is UTF-8 JSON with 2-space indentation. Import takes
//! any JSON object whose values are booleans, numbers or strings.

use std::path::Path;

use crate::error::{TransferError, TransferResult};
use crate::models::Config;

/// File name offered for exported documents.
pub const EXPORT_FILE_NAME: &str = "clientgen_config.json";

/// Render `config` as an export document.
pub fn export_document(config: &Config) -> TransferResult<String> {
    serde_json::to_string_pretty(config).map_err(TransferError::Encode)
}

/// Parse an import document.
pub fn parse_document(text: &str) -> TransferResult<Config> {
    serde_json::from_str(text).map_err(TransferError::Parse)
}

/// Read and parse the import document at `path`.
pub async fn read_document(path: &Path) -> TransferResult<Config> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(TransferError::Read)?;
    parse_document(&text)
}
