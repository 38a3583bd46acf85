use crate::core::identifier::is_valid_setup_id;
use crate::domain::model::{CategoryId, SetupId};
use crate::domain::ports::PayloadEncoder;
use crate::utils::error::{ProvisionError, Result};
use serde::{Deserialize, Serialize};

const PAYLOAD_PREFIX: &str = "X-HM://";
const PAYLOAD_VERSION: u64 = 0;
const ENCODED_LENGTH: usize = 9;
const SETUP_CODE_BITS: u32 = 27;
const FLAGS_SHIFT: u32 = 27;
const CATEGORY_SHIFT: u32 = 31;
const VERSION_SHIFT: u32 = 43;
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pairing transport advertised in the payload flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Nfc,
    #[default]
    Ip,
    Ble,
}

impl Transport {
    fn flag(self) -> u64 {
        match self {
            Transport::Nfc => 1,
            Transport::Ip => 2,
            Transport::Ble => 4,
        }
    }
}

/// Builds `X-HM://` setup URIs.
///
/// Layout of the packed value, low bit first: 27 bits setup code, 4 bits
/// transport flags, 8 bits category, 4 reserved bits, 3 bits version. The value
/// is written as 9 base-36 digits followed by the setup id. Product data is not
/// part of the URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct XhmEncoder {
    transport: Transport,
}

impl XhmEncoder {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn pack(&self, category: CategoryId, setup_code: u32) -> Result<u64> {
        if u64::from(setup_code) >= 1 << SETUP_CODE_BITS {
            return Err(ProvisionError::EncoderError {
                message: format!("setup code {} does not fit in {} bits", setup_code, SETUP_CODE_BITS),
            });
        }

        Ok((PAYLOAD_VERSION << VERSION_SHIFT)
            | (u64::from(category.get()) << CATEGORY_SHIFT)
            | (self.transport.flag() << FLAGS_SHIFT)
            | u64::from(setup_code))
    }
}

fn to_base36(mut value: u64, width: usize) -> String {
    let mut digits = Vec::with_capacity(width);
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    while digits.len() < width {
        digits.push(b'0');
    }
    digits.iter().rev().map(|&b| b as char).collect()
}

impl PayloadEncoder for XhmEncoder {
    fn encode(
        &self,
        category: CategoryId,
        setup_code: u32,
        setup_id: &SetupId,
        product_data: Option<u32>,
    ) -> Result<String> {
        if !is_valid_setup_id(setup_id.as_str()) {
            return Err(ProvisionError::EncoderError {
                message: format!("setup id `{}` must be 4 characters of A-Z0-9", setup_id),
            });
        }

        if let Some(product_data) = product_data {
            tracing::debug!("Product data {:08x} is advertised outside the setup URI", product_data);
        }

        let packed = self.pack(category, setup_code)?;
        Ok(format!(
            "{}{}{}",
            PAYLOAD_PREFIX,
            to_base36(packed, ENCODED_LENGTH),
            setup_id
        ))
    }
}
