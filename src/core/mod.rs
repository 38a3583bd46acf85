pub mod code;
pub mod engine;
pub mod identifier;
pub mod payload;
pub mod pipeline;
pub mod product_data;

pub use crate::domain::model::{AccessorySeed, ProvisionedAccessory, SetupInfo};
pub use crate::domain::ports::{ConfigProvider, PayloadEncoder, Pipeline, Storage};
pub use crate::utils::error::Result;
