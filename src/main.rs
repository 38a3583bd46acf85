use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use setup_info_gen::config::toml_config::TomlConfig;
use setup_info_gen::utils::logger;
use setup_info_gen::{
    BatchPipeline, CliConfig, LocalStorage, ProvisionEngine, ProvisionedAccessory, XhmEncoder,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting setup-info-gen");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading batch file from: {}", path);
            Some(
                TomlConfig::from_file(path)
                    .with_context(|| format!("Failed to load config file '{}'", path))?,
            )
        }
        None => None,
    };

    // 驗證配置，失敗時不產生任何檔案
    let config = match cli.resolve(file_config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    tracing::info!(
        "✅ cid={}, count={}, prefix={}, outdir={}",
        config.category,
        config.count,
        config.file_prefix,
        config.output_dir
    );

    let rng = match config.seed {
        Some(seed) => {
            tracing::info!("🔧 Using fixed seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };
    let dry_run = config.dry_run;

    let storage = LocalStorage::new(config.output_dir.clone());
    let encoder = XhmEncoder::new(config.transport);
    let pipeline = BatchPipeline::new(storage, encoder, config).with_rng(rng);
    let mut engine = ProvisionEngine::new(pipeline).with_dry_run(dry_run);

    let report = |accessory: &ProvisionedAccessory| {
        if accessory.written {
            println!("File: {} created...", accessory.path.display());
        } else {
            println!(
                "{}  Setup Code: {}  Setup Payload: {}",
                accessory.path.display(),
                accessory.setup_code,
                accessory.payload
            );
        }
    };

    match engine.run_with(report).await {
        Ok(accessories) => {
            tracing::info!("✅ Setup info generated for {} accessories", accessories.len());
        }
        Err(e) => {
            tracing::error!(
                "❌ Setup info generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
