#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::adapters::encoder::Transport;
use crate::core::identifier::SETUP_ID_SPACE;
use crate::domain::model::{CategoryId, ProductDataMode};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ProvisionError, Result};
use crate::utils::validation::{self, Validate};

pub const DEFAULT_OUTPUT_DIR: &str = "./";

/// Fully resolved settings for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub category: CategoryId,
    pub count: usize,
    pub file_prefix: String,
    pub output_dir: String,
    pub product_data: ProductDataMode,
    pub unique: bool,
    pub seed: Option<u64>,
    pub transport: Transport,
    pub dry_run: bool,
}

impl BatchConfig {
    pub fn new(category: CategoryId, count: usize, file_prefix: impl Into<String>) -> Self {
        Self {
            category,
            count,
            file_prefix: file_prefix.into(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            product_data: ProductDataMode::None,
            unique: false,
            seed: None,
            transport: Transport::default(),
            dry_run: false,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_product_data(mut self, product_data: ProductDataMode) -> Self {
        self.product_data = product_data;
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

impl ConfigProvider for BatchConfig {
    fn category(&self) -> CategoryId {
        self.category
    }

    fn count(&self) -> usize {
        self.count
    }

    fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    fn product_data(&self) -> &ProductDataMode {
        &self.product_data
    }

    fn unique(&self) -> bool {
        self.unique
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("count", self.count, 1)?;
        validation::validate_non_empty_string("outfile", &self.file_prefix)?;
        validation::validate_output_dir("outdir", &self.output_dir)?;

        if let ProductDataMode::Fixed(value) = &self.product_data {
            if !value.is_empty() {
                validation::validate_product_data(value)?;
            }
        }

        if self.unique && self.count > SETUP_ID_SPACE {
            return Err(ProvisionError::InvalidConfigValueError {
                field: "count".to_string(),
                value: self.count.to_string(),
                reason: format!("At most {} unique setup ids exist", SETUP_ID_SPACE),
            });
        }

        Ok(())
    }
}
