use thiserror::Error;

mod app_config;
mod config;
pub mod normalize;
pub mod pricing;
pub mod slug;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};

/// Inventory sentinel for drop-shipped products.
///
/// Stock is held by the supplier, not tracked per unit on our side, so every
/// imported product and variant is created with this fixed quantity.
pub const DROPSHIP_INVENTORY: i32 = 999;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
