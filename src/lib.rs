pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, Transport, XhmEncoder};
pub use config::BatchConfig;
pub use crate::core::{engine::ProvisionEngine, pipeline::BatchPipeline};
pub use domain::model::{
    CategoryId, ProductData, ProductDataMode, ProvisionedAccessory, SetupCode, SetupId,
    SetupPayload,
};
pub use utils::error::{ProvisionError, Result};
