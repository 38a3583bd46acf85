use crate::domain::model::{CategoryId, ProductData, SetupCode, SetupId, SetupPayload};
use crate::domain::ports::PayloadEncoder;
use crate::utils::error::Result;

/// Normalizes the code and product data and asks the encoder for a payload.
///
/// The hyphenated code is handed back alongside the payload so callers can
/// name the output file after it. Encoder errors are returned as-is.
pub fn compose_setup_payload<E: PayloadEncoder + ?Sized>(
    encoder: &E,
    category: CategoryId,
    setup_code: &SetupCode,
    setup_id: &SetupId,
    product_data: Option<&ProductData>,
) -> Result<(SetupPayload, SetupCode)> {
    let numeric_code = setup_code.numeric()?;
    let product_value = match product_data {
        Some(data) if !data.as_str().is_empty() => Some(data.encoder_value()?),
        _ => None,
    };

    tracing::debug!(
        "Encoding setup payload: cid={}, setup_id={}, product_data={:?}",
        category,
        setup_id,
        product_value
    );

    let payload = encoder.encode(category, numeric_code, setup_id, product_value)?;
    Ok((SetupPayload::new(payload), setup_code.clone()))
}
