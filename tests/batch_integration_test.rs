use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use setup_info_gen::core::code::is_blacklisted;
use setup_info_gen::{
    BatchConfig, BatchPipeline, CategoryId, CliConfig, LocalStorage, ProductDataMode,
    ProvisionEngine, ProvisionError, SetupId, Transport, XhmEncoder,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Calls = Arc<Mutex<Vec<(u8, u32, String, Option<u32>)>>>;

fn stub_encoder(
    calls: Calls,
) -> impl Fn(CategoryId, u32, &SetupId, Option<u32>) -> setup_info_gen::Result<String> + Send + Sync
{
    move |cid: CategoryId,
          code: u32,
          id: &SetupId,
          pd: Option<u32>|
          -> setup_info_gen::Result<String> {
        calls.lock().unwrap().push((cid.get(), code, id.to_string(), pd));
        Ok(format!("STUB:{}:{}:{}", cid, code, id))
    }
}

fn files_in(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_two_accessories_without_product_data() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outdir = temp_dir.path().to_str().unwrap().to_string();
    let calls = Calls::default();

    let config = BatchConfig::new(CategoryId::new(2)?, 2, "acc").with_output_dir(outdir.clone());
    let pipeline = BatchPipeline::new(LocalStorage::new(outdir), stub_encoder(calls.clone()), config)
        .with_rng(StdRng::seed_from_u64(2024));
    let mut engine = ProvisionEngine::new(pipeline);

    let accessories = engine.run().await?;
    assert_eq!(accessories.len(), 2);

    let code_line = Regex::new(r"^Setup Code: (\d{3}-\d{2}-\d{3})$")?;
    let payload_line = Regex::new(r"^Setup Payload: .+$")?;

    for accessory in &accessories {
        let name = accessory.path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, format!("acc-{}.txt", accessory.setup_code));

        let content = std::fs::read_to_string(&accessory.path)?;
        assert!(content.ends_with('\n'));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let caps = code_line.captures(lines[0]).expect("setup code line");
        assert_eq!(&caps[1], accessory.setup_code.as_str());
        assert!(!is_blacklisted(&accessory.setup_code.digits()));
        assert!(payload_line.is_match(lines[1]));
    }

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(cid, _, _, pd)| *cid == 2 && pd.is_none()));
    Ok(())
}

#[tokio::test]
async fn test_fixed_product_data_reaches_encoder_for_every_accessory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outdir = temp_dir.path().to_str().unwrap().to_string();
    let calls = Calls::default();

    let config = BatchConfig::new(CategoryId::new(7)?, 2, "acc")
        .with_output_dir(outdir.clone())
        .with_product_data(ProductDataMode::Fixed("abcdef1234567890".to_string()));
    let pipeline = BatchPipeline::new(LocalStorage::new(outdir), stub_encoder(calls.clone()), config)
        .with_rng(StdRng::seed_from_u64(1));

    ProvisionEngine::new(pipeline).run().await?;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    for (_, code, _, pd) in calls.iter() {
        assert_eq!(*pd, Some(u32::from_str_radix("34567890", 16)?));
        assert!(*code < 100_000_000);
    }
    Ok(())
}

#[tokio::test]
async fn test_invalid_category_aborts_before_any_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outdir = temp_dir.path().to_str().unwrap();

    for cid in ["0", "256"] {
        let cli = CliConfig::try_parse_from([
            "setup-info-gen",
            "--cid",
            cid,
            "--outfile",
            "acc",
            "--count",
            "2",
            "--outdir",
            outdir,
        ])?;
        let err = cli.resolve(None).unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidConfigValueError { ref field, .. } if field == "cid"));
        assert_eq!(err.exit_code(), 1);
    }

    assert!(files_in(&temp_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_output_directory_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("missing");

    let cli = CliConfig::try_parse_from([
        "setup-info-gen",
        "--cid",
        "2",
        "--outfile",
        "acc",
        "--count",
        "1",
        "--outdir",
        missing.to_str().unwrap(),
    ])?;
    assert!(cli.resolve(None).is_err());
    assert!(!missing.exists());
    Ok(())
}

#[tokio::test]
async fn test_rerun_with_same_seed_appends_records() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outdir = temp_dir.path().to_str().unwrap().to_string();

    for _ in 0..2 {
        let config = BatchConfig::new(CategoryId::new(5)?, 1, "bulb").with_output_dir(outdir.clone());
        let pipeline = BatchPipeline::new(
            LocalStorage::new(outdir.clone()),
            XhmEncoder::new(Transport::Ip),
            config,
        )
        .with_rng(StdRng::seed_from_u64(77));
        ProvisionEngine::new(pipeline).run().await?;
    }

    let names = files_in(&temp_dir);
    assert_eq!(names.len(), 1);

    let content = std::fs::read_to_string(temp_dir.path().join(&names[0]))?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Setup Code: "));
    assert!(lines[1].starts_with("Setup Payload: X-HM://"));
    assert_eq!(lines[0], lines[2]);
    assert_eq!(lines[1], lines[3]);
    Ok(())
}

#[tokio::test]
async fn test_dry_run_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outdir = temp_dir.path().to_str().unwrap().to_string();

    let config = BatchConfig::new(CategoryId::new(2)?, 3, "acc").with_output_dir(outdir.clone());
    let pipeline = BatchPipeline::new(LocalStorage::new(outdir), XhmEncoder::default(), config);
    let accessories = ProvisionEngine::new(pipeline).with_dry_run(true).run().await?;

    assert_eq!(accessories.len(), 3);
    assert!(accessories.iter().all(|a| !a.written));
    assert!(accessories
        .iter()
        .all(|a| a.path.starts_with(temp_dir.path()) && a.payload.as_str().starts_with("X-HM://")));
    assert!(files_in(&temp_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unique_batch_has_distinct_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outdir = temp_dir.path().to_str().unwrap().to_string();

    let config = BatchConfig::new(CategoryId::new(9)?, 50, "lock")
        .with_output_dir(outdir.clone())
        .with_unique(true)
        .with_product_data(ProductDataMode::Random);
    let pipeline = BatchPipeline::new(LocalStorage::new(outdir), XhmEncoder::default(), config)
        .with_rng(StdRng::seed_from_u64(3));
    let accessories = ProvisionEngine::new(pipeline).run().await?;

    assert_eq!(accessories.len(), 50);
    assert_eq!(files_in(&temp_dir).len(), 50);
    Ok(())
}

#[tokio::test]
async fn test_encoder_failure_stops_the_batch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outdir = temp_dir.path().to_str().unwrap().to_string();

    let failing = |_: CategoryId, _: u32, _: &SetupId, _: Option<u32>| -> setup_info_gen::Result<String> {
        Err(ProvisionError::EncoderError {
            message: "encoder offline".to_string(),
        })
    };
    let config = BatchConfig::new(CategoryId::new(2)?, 3, "acc").with_output_dir(outdir.clone());
    let pipeline = BatchPipeline::new(LocalStorage::new(outdir), failing, config);

    let err = ProvisionEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, ProvisionError::EncoderError { ref message } if message == "encoder offline"));
    assert!(files_in(&temp_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_prefix_with_subdirectory_writes_below_outdir() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let outdir = temp_dir.path().to_str().unwrap().to_string();
    std::fs::create_dir(temp_dir.path().join("sub"))?;

    let cli = CliConfig::try_parse_from([
        "setup-info-gen",
        "--cid",
        "2",
        "--outfile",
        "sub/acc",
        "--count",
        "2",
        "--outdir",
        outdir.as_str(),
    ])?;
    let config = cli.resolve(None)?;
    let pipeline = BatchPipeline::new(LocalStorage::new(outdir), XhmEncoder::default(), config)
        .with_rng(StdRng::seed_from_u64(8));
    let accessories = ProvisionEngine::new(pipeline).run().await?;

    for accessory in &accessories {
        assert_eq!(
            accessory.path,
            temp_dir.path().join("sub").join(format!("acc-{}.txt", accessory.setup_code))
        );
        assert!(accessory.path.exists());
    }
    Ok(())
}
