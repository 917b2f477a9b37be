pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod proxy;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{proxy::ProxyConfig, toml_config::ArchitectConfig};
pub use core::composition::{compose, LayerStack, Vessel};
pub use core::selection::{Controller, Selection};
pub use domain::catalog::Catalog;
pub use utils::error::{ArchitectError, Result};
