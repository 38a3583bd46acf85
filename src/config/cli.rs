use crate::adapters::encoder::Transport;
use crate::config::toml_config::TomlConfig;
use crate::config::{BatchConfig, DEFAULT_OUTPUT_DIR};
use crate::domain::model::{CategoryId, ProductDataMode};
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, Validate};
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "setup-info-gen")]
#[command(about = "Generate accessory setup info (setup code and setup payload)")]
pub struct CliConfig {
    /// The accessory category identifier (1-255)
    #[arg(long, allow_hyphen_values = true)]
    pub cid: Option<i64>,

    /// The output filename prefix for the setup info files
    #[arg(long)]
    pub outfile: Option<String>,

    /// The number of accessories to create setup info for
    #[arg(long)]
    pub count: Option<usize>,

    /// Product data applied to every accessory of the batch
    #[arg(long, visible_alias = "product_data")]
    pub product_data: Option<String>,

    /// Generate fresh random product data for every accessory
    #[arg(long, conflicts_with = "product_data")]
    pub random_product_data: bool,

    /// The output directory, it must already exist (default: current directory)
    #[arg(long)]
    pub outdir: Option<String>,

    /// Path to a TOML batch file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seed for reproducible batches
    #[arg(long)]
    pub seed: Option<u64>,

    /// Redraw setup ids and setup codes that repeat within the batch
    #[arg(long)]
    pub unique: bool,

    /// Pairing transport flag written into the setup payload
    #[arg(long, value_enum)]
    pub transport: Option<Transport>,

    /// Generate and print setup info without writing files
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Merges the command line over an optional batch file and validates the result.
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Result<BatchConfig> {
        let cid = self.cid.or_else(|| file.and_then(|f| f.batch.cid));
        let category = CategoryId::new(*validate_required_field("cid", &cid)?)?;

        let count = self.count.or_else(|| file.and_then(|f| f.batch.count));
        let count = *validate_required_field("count", &count)?;

        let outfile = self
            .outfile
            .clone()
            .or_else(|| file.and_then(|f| f.batch.outfile.clone()));
        let outfile = validate_required_field("outfile", &outfile)?.clone();

        let output_dir = self
            .outdir
            .clone()
            .or_else(|| file.and_then(|f| f.output_dir().map(str::to_string)))
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        let product_data = if self.random_product_data {
            ProductDataMode::Random
        } else if let Some(value) = &self.product_data {
            ProductDataMode::Fixed(value.clone())
        } else if let Some(file) = file {
            file.product_data_mode()?
        } else {
            ProductDataMode::None
        };

        let config = BatchConfig {
            category,
            count,
            file_prefix: outfile,
            output_dir,
            product_data,
            unique: self.unique || file.and_then(|f| f.batch.unique).unwrap_or(false),
            seed: self.seed.or_else(|| file.and_then(|f| f.batch.seed)),
            transport: self
                .transport
                .or_else(|| file.and_then(|f| f.transport()))
                .unwrap_or_default(),
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}
