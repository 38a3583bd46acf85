use crate::utils::error::{ProvisionError, Result};
use std::fmt;
use std::path::PathBuf;

pub const MIN_CATEGORY_ID: i64 = 1;
pub const MAX_CATEGORY_ID: i64 = 255;

/// Accessory category identifier, one byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryId(u8);

impl CategoryId {
    pub fn new(value: i64) -> Result<Self> {
        crate::utils::validation::validate_range("cid", value, MIN_CATEGORY_ID, MAX_CATEGORY_ID)?;
        u8::try_from(value)
            .map(Self)
            .map_err(|e| ProvisionError::InvalidConfigValueError {
                field: "cid".to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Four characters from `A-Z0-9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetupId(String);

impl SetupId {
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SetupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Setup code in its hyphenated `NNN-NN-NNN` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetupCode(String);

impl SetupCode {
    /// Builds a code from 8 plain digits.
    pub fn from_digits(digits: &str) -> Result<Self> {
        crate::core::code::format_setup_code(digits).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The code without separators, leading zeros kept.
    pub fn digits(&self) -> String {
        crate::core::code::strip_separators(&self.0)
    }

    /// Numeric value handed to the payload encoder.
    pub fn numeric(&self) -> Result<u32> {
        let digits = self.digits();
        digits
            .parse::<u32>()
            .map_err(|_| ProvisionError::CodeFormatError { code: self.0.clone() })
    }
}

impl fmt::Display for SetupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Manufacturer product data. Generated values are 16 lowercase hex chars,
/// caller supplied values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductData(String);

impl ProductData {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last 8 characters of the value.
    pub fn tail(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(7)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &self.0[start..]
    }

    /// Last 8 characters parsed as hex, the value the encoder consumes.
    ///
    /// Surrounding whitespace, a `0x` prefix and single `_` separators between
    /// digits are accepted.
    pub fn encoder_value(&self) -> Result<u32> {
        let tail = self.tail();
        let invalid = |reason: String| ProvisionError::InvalidProductData {
            value: self.0.clone(),
            reason,
        };

        let trimmed = tail.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .map(|rest| rest.strip_prefix('_').unwrap_or(rest))
            .unwrap_or(trimmed);

        if body.starts_with('_') || body.ends_with('_') || body.contains("__") {
            return Err(invalid(format!("`{}` has a misplaced `_`", tail)));
        }

        let digits: String = body.chars().filter(|&c| c != '_').collect();
        u32::from_str_radix(&digits, 16)
            .map_err(|e| invalid(format!("`{}` is not hexadecimal: {}", tail, e)))
    }
}

impl fmt::Display for ProductData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupPayload(String);

impl SetupPayload {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SetupPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One positional row of the batch; any column may have run out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorySeed {
    pub setup_id: Option<SetupId>,
    pub setup_code: Option<SetupCode>,
    pub product_data: Option<ProductData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupInfo {
    pub setup_id: SetupId,
    pub setup_code: SetupCode,
    pub product_data: Option<ProductData>,
    pub payload: SetupPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccessory {
    pub setup_id: SetupId,
    pub setup_code: SetupCode,
    pub payload: SetupPayload,
    pub path: PathBuf,
    pub written: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductDataMode {
    #[default]
    None,
    Fixed(String),
    Random,
}
