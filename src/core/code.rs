use crate::domain::model::SetupCode;
use crate::utils::error::{ProvisionError, Result};
use rand::Rng;
use std::collections::HashSet;

pub const SETUP_CODE_DIGITS: usize = 8;

/// Upper bound for redraws of a single value. The blacklist is 12 out of 10^8
/// codes so hitting this means the generator is broken.
pub const MAX_DRAW_ATTEMPTS: usize = 1000;

/// Trivial codes that accessories must refuse.
pub const INVALID_SETUP_CODES: [&str; 12] = [
    "00000000", "11111111", "22222222", "33333333", "44444444", "55555555", "66666666",
    "77777777", "88888888", "99999999", "12345678", "87654321",
];

pub fn is_blacklisted(digits: &str) -> bool {
    INVALID_SETUP_CODES.contains(&digits)
}

/// `11122333` -> `111-22-333`
pub fn format_setup_code(digits: &str) -> Result<String> {
    if digits.len() != SETUP_CODE_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProvisionError::CodeFormatError {
            code: digits.to_string(),
        });
    }
    Ok(format!("{}-{}-{}", &digits[..3], &digits[3..5], &digits[5..]))
}

/// `111-22-333` -> `11122333`
pub fn strip_separators(code: &str) -> String {
    code.replace('-', "")
}

fn draw_digits<R: Rng>(rng: &mut R) -> String {
    (0..SETUP_CODE_DIGITS)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

fn draw_setup_code<R: Rng>(
    rng: &mut R,
    issued: Option<&HashSet<String>>,
) -> Result<SetupCode> {
    for attempt in 1..=MAX_DRAW_ATTEMPTS {
        let digits = draw_digits(rng);

        if is_blacklisted(&digits) {
            tracing::debug!("Redrawing blacklisted setup code (attempt {})", attempt);
            continue;
        }
        if issued.is_some_and(|seen| seen.contains(&digits)) {
            tracing::debug!("Redrawing duplicate setup code (attempt {})", attempt);
            continue;
        }

        return SetupCode::from_digits(&digits);
    }

    Err(ProvisionError::RetryLimitExceeded {
        what: "setup code".to_string(),
        attempts: MAX_DRAW_ATTEMPTS,
    })
}

/// Draws `count` independent setup codes. Duplicates across the batch are possible.
pub fn generate_setup_codes<R: Rng>(rng: &mut R, count: usize) -> Result<Vec<SetupCode>> {
    (0..count).map(|_| draw_setup_code(rng, None)).collect()
}

/// Like [`generate_setup_codes`] but redraws codes already issued in this batch.
pub fn generate_unique_setup_codes<R: Rng>(
    rng: &mut R,
    count: usize,
) -> Result<Vec<SetupCode>> {
    let mut issued = HashSet::with_capacity(count);
    let mut codes = Vec::with_capacity(count);

    for _ in 0..count {
        let code = draw_setup_code(rng, Some(&issued))?;
        issued.insert(code.digits());
        codes.push(code);
    }

    Ok(codes)
}
