use crate::domain::model::{
    AccessorySeed, CategoryId, ProductDataMode, ProvisionedAccessory, SetupId, SetupInfo,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Writes one record, truncating an empty file and appending to a non-empty one.
    fn write_record(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
    fn resolve(&self, path: &str) -> PathBuf;
}

/// Turns the accessory attributes into a setup payload string.
pub trait PayloadEncoder: Send + Sync {
    fn encode(
        &self,
        category: CategoryId,
        setup_code: u32,
        setup_id: &SetupId,
        product_data: Option<u32>,
    ) -> Result<String>;
}

impl<F> PayloadEncoder for F
where
    F: Fn(CategoryId, u32, &SetupId, Option<u32>) -> Result<String> + Send + Sync,
{
    fn encode(
        &self,
        category: CategoryId,
        setup_code: u32,
        setup_id: &SetupId,
        product_data: Option<u32>,
    ) -> Result<String> {
        self(category, setup_code, setup_id, product_data)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn category(&self) -> CategoryId;
    fn count(&self) -> usize;
    fn file_prefix(&self) -> &str;
    fn product_data(&self) -> &ProductDataMode;
    fn unique(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn generate(&mut self) -> Result<Vec<AccessorySeed>>;
    async fn compose(&self, seed: AccessorySeed) -> Result<SetupInfo>;
    async fn load(&self, info: SetupInfo) -> Result<ProvisionedAccessory>;
    /// Where `load` would write, without touching storage.
    fn output_path(&self, info: &SetupInfo) -> PathBuf;
}
