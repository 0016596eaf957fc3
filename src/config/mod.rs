//! Configuration loaded from `.crewkey.toml`.

pub mod settings;

pub use settings::Settings;
