//! UniFFI export layer for host editors.
//!
//! The host owns the document. Every call takes an [`NldDocument`] snapshot
//! and returns the edits, overlay changes and popup updates as [`NldEvent`]s
//! to replay in order.

mod session;
mod types;
mod view;

#[cfg(test)]
mod tests;

pub use session::NldSession;
pub use types::{
    NldChange, NldContext, NldDocument, NldError, NldEvent, NldKey, NldKeyResponse, NldPosition,
    NldUpdate,
};

use std::path::Path;

use nld_core::dates::{BuiltinDates, DateSource};

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn settings_load_config(path: String) -> Result<(), NldError> {
    let content = std::fs::read_to_string(&path).map_err(|e| NldError::Io {
        msg: format!("{path}: {e}"),
    })?;
    crate::settings::init_custom(content)
        .map_err(|e| NldError::InvalidData { msg: e.to_string() })?;
    Ok(())
}

#[uniffi::export]
fn settings_default_config() -> String {
    crate::settings::DEFAULT_SETTINGS_TOML.to_string()
}

/// ISO date `text` resolves to in `locale`, for previews outside a session.
#[uniffi::export]
fn parse_date_preview(text: String, locale: String) -> Result<Option<String>, NldError> {
    let dates = BuiltinDates::new(&locale).map_err(|e| NldError::InvalidData {
        msg: e.to_string(),
    })?;
    Ok(dates.parse_date(&text).map(|d| d.to_string()))
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}
