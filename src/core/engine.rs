use crate::core::Pipeline;
use crate::domain::model::ProvisionedAccessory;
use crate::utils::error::Result;

pub struct ProvisionEngine<P: Pipeline> {
    pipeline: P,
    dry_run: bool,
}

impl<P: Pipeline> ProvisionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs the whole batch; the first error stops it and earlier files stay on disk.
    pub async fn run(&mut self) -> Result<Vec<ProvisionedAccessory>> {
        self.run_with(|_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_accessory` as soon as each accessory is done.
    pub async fn run_with<F>(&mut self, mut on_accessory: F) -> Result<Vec<ProvisionedAccessory>>
    where
        F: FnMut(&ProvisionedAccessory) + Send,
    {
        tracing::info!("🚀 Generating setup info");

        let seeds = self.pipeline.generate().await?;
        tracing::info!("🎲 Generated credentials for {} accessories", seeds.len());

        let mut provisioned = Vec::with_capacity(seeds.len());
        for (index, seed) in seeds.into_iter().enumerate() {
            let info = self.pipeline.compose(seed).await?;
            tracing::debug!(
                "Accessory #{}: setup_id={}, setup_code={}, payload={}",
                index + 1,
                info.setup_id,
                info.setup_code,
                info.payload
            );

            let accessory = if self.dry_run {
                let path = self.pipeline.output_path(&info);
                tracing::info!("🔍 [dry run] would write {}", path.display());
                ProvisionedAccessory {
                    setup_id: info.setup_id,
                    setup_code: info.setup_code,
                    payload: info.payload,
                    path,
                    written: false,
                }
            } else {
                let accessory = self.pipeline.load(info).await?;
                tracing::info!("📁 File: {} created...", accessory.path.display());
                accessory
            };

            on_accessory(&accessory);
            provisioned.push(accessory);
        }

        Ok(provisioned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AccessorySeed, SetupCode, SetupId, SetupInfo, SetupPayload};
    use crate::utils::error::ProvisionError;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Loads succeed until `fail_at`, then fail.
    struct CountingPipeline {
        count: usize,
        fail_at: Option<usize>,
        loads: AtomicUsize,
    }

    impl CountingPipeline {
        fn new(count: usize, fail_at: Option<usize>) -> Self {
            Self {
                count,
                fail_at,
                loads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for CountingPipeline {
        async fn generate(&mut self) -> Result<Vec<AccessorySeed>> {
            Ok((0..self.count)
                .map(|i| AccessorySeed {
                    setup_id: Some(SetupId::new_unchecked(format!("AAA{}", i))),
                    setup_code: Some(SetupCode::from_digits(&format!("1112233{}", i)).unwrap()),
                    product_data: None,
                })
                .collect())
        }

        async fn compose(&self, seed: AccessorySeed) -> Result<SetupInfo> {
            Ok(SetupInfo {
                setup_id: seed.setup_id.unwrap(),
                setup_code: seed.setup_code.unwrap(),
                product_data: None,
                payload: SetupPayload::new("X-HM://stub"),
            })
        }

        async fn load(&self, info: SetupInfo) -> Result<ProvisionedAccessory> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            if Some(n) == self.fail_at {
                return Err(ProvisionError::ProcessingError {
                    message: "disk full".to_string(),
                });
            }
            Ok(ProvisionedAccessory {
                path: self.output_path(&info),
                setup_id: info.setup_id,
                setup_code: info.setup_code,
                payload: info.payload,
                written: true,
            })
        }

        fn output_path(&self, info: &SetupInfo) -> PathBuf {
            PathBuf::from(format!("acc-{}.txt", info.setup_code))
        }
    }

    #[tokio::test]
    async fn test_reports_each_accessory_in_order() {
        let mut engine = ProvisionEngine::new(CountingPipeline::new(3, None));
        let mut reported = Vec::new();

        let accessories = engine
            .run_with(|a| reported.push(a.path.clone()))
            .await
            .unwrap();

        assert_eq!(accessories.len(), 3);
        let paths: Vec<PathBuf> = accessories.iter().map(|a| a.path.clone()).collect();
        assert_eq!(reported, paths);
    }

    #[tokio::test]
    async fn test_written_files_reported_before_failure() {
        let mut engine = ProvisionEngine::new(CountingPipeline::new(3, Some(1)));
        let mut reported = Vec::new();

        let err = engine
            .run_with(|a| reported.push(a.path.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::ProcessingError { .. }));
        assert_eq!(reported, vec![PathBuf::from("acc-111-22-330.txt")]);
    }

    #[tokio::test]
    async fn test_dry_run_reports_unwritten() {
        let mut engine = ProvisionEngine::new(CountingPipeline::new(2, Some(0))).with_dry_run(true);
        let mut written = Vec::new();

        let accessories = engine.run_with(|a| written.push(a.written)).await.unwrap();

        assert_eq!(accessories.len(), 2);
        assert_eq!(written, vec![false, false]);
    }
}
