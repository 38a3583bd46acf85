use crate::core::code::{generate_setup_codes, generate_unique_setup_codes};
use crate::core::identifier::{generate_setup_ids, generate_unique_setup_ids};
use crate::core::payload::compose_setup_payload;
use crate::core::product_data::product_data_for_batch;
use crate::domain::model::{AccessorySeed, ProvisionedAccessory, SetupCode, SetupInfo, SetupPayload};
use crate::domain::ports::{ConfigProvider, PayloadEncoder, Pipeline, Storage};
use crate::utils::error::{ProvisionError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Pairs up three columns by position, padding the shorter ones with `None`.
pub fn zip_longest<A, B, C>(
    first: Vec<A>,
    second: Vec<B>,
    third: Vec<C>,
) -> Vec<(Option<A>, Option<B>, Option<C>)> {
    let len = first.len().max(second.len()).max(third.len());
    let mut first = first.into_iter();
    let mut second = second.into_iter();
    let mut third = third.into_iter();

    (0..len)
        .map(|_| (first.next(), second.next(), third.next()))
        .collect()
}

/// `<prefix>-<setupcode>.txt`
pub fn output_file_name(prefix: &str, setup_code: &SetupCode) -> String {
    format!("{}-{}.txt", prefix, setup_code)
}

pub fn render_record(setup_code: &SetupCode, payload: &SetupPayload) -> String {
    format!("Setup Code: {}\nSetup Payload: {}\n", setup_code, payload)
}

pub struct BatchPipeline<S: Storage, E: PayloadEncoder, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) encoder: E,
    pub(crate) config: C,
    rng: StdRng,
}

impl<S: Storage, E: PayloadEncoder, C: ConfigProvider> BatchPipeline<S, E, C> {
    pub fn new(storage: S, encoder: E, config: C) -> Self {
        Self {
            storage,
            encoder,
            config,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Replaces the OS-seeded generator, e.g. with a seeded one for reproducible batches.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, E: PayloadEncoder, C: ConfigProvider> Pipeline for BatchPipeline<S, E, C> {
    async fn generate(&mut self) -> Result<Vec<AccessorySeed>> {
        let count = self.config.count();

        let (setup_ids, setup_codes) = if self.config.unique() {
            (
                generate_unique_setup_ids(&mut self.rng, count)?,
                generate_unique_setup_codes(&mut self.rng, count)?,
            )
        } else {
            (
                generate_setup_ids(&mut self.rng, count),
                generate_setup_codes(&mut self.rng, count)?,
            )
        };
        let product_data = product_data_for_batch(&mut self.rng, self.config.product_data(), count);

        tracing::debug!(
            "Generated {} setup ids, {} setup codes, {} product data values",
            setup_ids.len(),
            setup_codes.len(),
            product_data.len()
        );

        Ok(zip_longest(setup_ids, setup_codes, product_data)
            .into_iter()
            .map(|(setup_id, setup_code, product_data)| AccessorySeed {
                setup_id,
                setup_code,
                product_data,
            })
            .collect())
    }

    async fn compose(&self, seed: AccessorySeed) -> Result<SetupInfo> {
        let (setup_id, setup_code) = match (seed.setup_id, seed.setup_code) {
            (Some(id), Some(code)) => (id, code),
            _ => {
                return Err(ProvisionError::ProcessingError {
                    message: "accessory is missing a setup id or setup code".to_string(),
                })
            }
        };

        let (payload, setup_code) = compose_setup_payload(
            &self.encoder,
            self.config.category(),
            &setup_code,
            &setup_id,
            seed.product_data.as_ref(),
        )?;

        Ok(SetupInfo {
            setup_id,
            setup_code,
            product_data: seed.product_data,
            payload,
        })
    }

    async fn load(&self, info: SetupInfo) -> Result<ProvisionedAccessory> {
        let file_name = output_file_name(self.config.file_prefix(), &info.setup_code);
        let record = render_record(&info.setup_code, &info.payload);

        let path = self.storage.write_record(&file_name, record.as_bytes()).await?;

        Ok(ProvisionedAccessory {
            setup_id: info.setup_id,
            setup_code: info.setup_code,
            payload: info.payload,
            path,
            written: true,
        })
    }

    fn output_path(&self, info: &SetupInfo) -> PathBuf {
        self.storage
            .resolve(&output_file_name(self.config.file_prefix(), &info.setup_code))
    }
}
