//! Configuration module for arbor.
//!
//! Loads table descriptors and the default compilation target from TOML.

mod settings;

pub use settings::{
    expand_env_vars, ColumnSettings, Settings, SettingsError, TableSettings, TargetSettings,
};
