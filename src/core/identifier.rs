use crate::domain::model::SetupId;
use crate::utils::error::{ProvisionError, Result};
use rand::seq::index;
use rand::Rng;

pub const SETUP_ID_LENGTH: usize = 4;
pub const SETUP_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of distinct setup ids (36^4).
pub const SETUP_ID_SPACE: usize = 1_679_616;

pub fn is_valid_setup_id(value: &str) -> bool {
    value.len() == SETUP_ID_LENGTH && value.bytes().all(|b| SETUP_ID_CHARSET.contains(&b))
}

fn draw_setup_id<R: Rng>(rng: &mut R) -> SetupId {
    let value = (0..SETUP_ID_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..SETUP_ID_CHARSET.len());
            SETUP_ID_CHARSET[idx] as char
        })
        .collect();
    SetupId::new_unchecked(value)
}

/// Draws `count` independent setup ids.
pub fn generate_setup_ids<R: Rng>(rng: &mut R, count: usize) -> Vec<SetupId> {
    (0..count).map(|_| draw_setup_id(rng)).collect()
}

/// Draws `count` setup ids with no repeats inside the batch.
pub fn generate_unique_setup_ids<R: Rng>(rng: &mut R, count: usize) -> Result<Vec<SetupId>> {
    if count > SETUP_ID_SPACE {
        return Err(ProvisionError::InvalidConfigValueError {
            field: "count".to_string(),
            value: count.to_string(),
            reason: format!("Only {} distinct setup ids exist", SETUP_ID_SPACE),
        });
    }

    // 不放回抽樣，整個空間都抽得完
    Ok(index::sample(rng, SETUP_ID_SPACE, count)
        .into_iter()
        .map(setup_id_at)
        .collect())
}

/// Decodes an index in `0..SETUP_ID_SPACE` as 4 base-36 digits over the charset.
fn setup_id_at(mut position: usize) -> SetupId {
    let base = SETUP_ID_CHARSET.len();
    let mut chars = [b'A'; SETUP_ID_LENGTH];
    for slot in chars.iter_mut().rev() {
        *slot = SETUP_ID_CHARSET[position % base];
        position /= base;
    }
    SetupId::new_unchecked(chars.iter().map(|&b| b as char).collect())
}
