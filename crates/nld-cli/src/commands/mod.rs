pub mod parse_ops;
pub mod settings_ops;
pub mod simulate_ops;
