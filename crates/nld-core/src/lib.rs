//! Pure building blocks of the date trigger engine: positions, trigger
//! recognition, settings, key bindings, the date collaborator, suggestion
//! lists and output formatting. Nothing here holds session state.

pub mod dates;
pub mod format;
pub mod keymap;
pub mod position;
pub mod settings;
pub mod suggest;
pub mod trigger;

pub use position::Position;
pub use trigger::{parse_trigger, AntiRetriggerMemo, TriggerContext, TriggerRule, SEPARATOR};
