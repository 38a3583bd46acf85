use crate::domain::model::{ProductData, ProductDataMode};
use rand::Rng;

pub const PRODUCT_DATA_LENGTH: usize = 16;
const HEX_CHARSET: &[u8] = b"0123456789abcdef";

/// Draws `count` random 16-char lowercase hex product data values.
pub fn generate_product_data<R: Rng>(rng: &mut R, count: usize) -> Vec<ProductData> {
    (0..count)
        .map(|_| {
            let value: String = (0..PRODUCT_DATA_LENGTH)
                .map(|_| HEX_CHARSET[rng.random_range(0..HEX_CHARSET.len())] as char)
                .collect();
            ProductData::new(value)
        })
        .collect()
}

/// Product data column for a batch of `count` accessories.
///
/// A fixed value is copied for every accessory; with no product data the
/// column is empty and the pipeline pads it out.
pub fn product_data_for_batch<R: Rng>(
    rng: &mut R,
    mode: &ProductDataMode,
    count: usize,
) -> Vec<ProductData> {
    match mode {
        ProductDataMode::None => Vec::new(),
        // 空字串視同未提供
        ProductDataMode::Fixed(value) if value.is_empty() => Vec::new(),
        ProductDataMode::Fixed(value) => vec![ProductData::new(value.clone()); count],
        ProductDataMode::Random => generate_product_data(rng, count),
    }
}
