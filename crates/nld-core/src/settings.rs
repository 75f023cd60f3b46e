//! Settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! Sessions take an `Arc<Settings>` explicitly; the singleton exists for the
//! export layer and the CLI.

use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use time::macros::date;

use crate::dates::holidays;
use crate::format::format_date;
use crate::keymap::{KeyBinding, Keymap};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
    #[error("IO error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub trigger: TriggerSettings,
    pub output: OutputSettings,
    pub dates: DateSettings,
    #[serde(default)]
    keys: KeyOverrides,
    #[serde(skip)]
    keymap: Keymap,
}

impl Settings {
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("embedded default settings are valid")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerSettings {
    pub phrase: String,
    #[serde(default)]
    pub trigger_happy: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub plain_text_by_default: bool,
    pub format: String,
    pub alt_format: String,
    pub daily_note_format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateSettings {
    pub locale: String,
}

/// Raw `[keys]` table; missing entries keep the default bindings.
#[derive(Debug, Clone, Default, Deserialize)]
struct KeyOverrides {
    accept: Option<Vec<String>>,
    select: Option<Vec<String>>,
    daily_note: Option<Vec<String>>,
    next: Option<Vec<String>>,
    previous: Option<Vec<String>>,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    s.keymap = build_keymap(&s.keys)?;
    Ok(s)
}

/// Read and parse a settings file.
pub fn load_file(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SettingsError::Io(format!("{}: {e}", path.display())))?;
    parse_settings_toml(&content)
}

fn build_keymap(keys: &KeyOverrides) -> Result<Keymap, SettingsError> {
    fn parse_list(
        field: &str,
        bindings: &Option<Vec<String>>,
        default: Vec<KeyBinding>,
    ) -> Result<Vec<KeyBinding>, SettingsError> {
        let Some(bindings) = bindings else {
            return Ok(default);
        };
        bindings
            .iter()
            .map(|binding| {
                KeyBinding::parse(binding).map_err(|e| SettingsError::InvalidValue {
                    field: format!("keys.{field}"),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    let defaults = Keymap::default();
    Ok(Keymap {
        accept: parse_list("accept", &keys.accept, defaults.accept)?,
        select: parse_list("select", &keys.select, defaults.select)?,
        daily_note: parse_list("daily_note", &keys.daily_note, defaults.daily_note)?,
        next: parse_list("next", &keys.next, defaults.next)?,
        previous: parse_list("previous", &keys.previous, defaults.previous)?,
    })
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if s.trigger.phrase.contains('\n') {
        return Err(SettingsError::InvalidValue {
            field: "trigger.phrase".to_string(),
            reason: "must fit on one line".to_string(),
        });
    }

    macro_rules! check_format {
        ($field:ident) => {
            if let Err(e) = format_date(date!(2000 - 01 - 01), &s.output.$field) {
                return Err(SettingsError::InvalidValue {
                    field: concat!("output.", stringify!($field)).to_string(),
                    reason: e.to_string(),
                });
            }
        };
    }

    check_format!(format);
    check_format!(alt_format);
    check_format!(daily_note_format);

    if !holidays::is_supported_locale(&s.dates.locale) {
        return Err(SettingsError::InvalidValue {
            field: "dates.locale".to_string(),
            reason: format!("unsupported locale {:?}", s.dates.locale),
        });
    }

    Ok(())
}
