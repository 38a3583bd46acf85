use crate::adapters::encoder::Transport;
use crate::domain::model::ProductDataMode;
use crate::utils::error::{ProvisionError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub batch: BatchSection,
    pub output: Option<OutputSection>,
    pub product_data: Option<ProductDataSection>,
    pub encoder: Option<EncoderSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSection {
    pub cid: Option<i64>,
    pub count: Option<usize>,
    pub outfile: Option<String>,
    pub unique: Option<bool>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductDataKind {
    None,
    Fixed,
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDataSection {
    pub mode: Option<ProductDataKind>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSection {
    pub transport: Option<Transport>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProvisionError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProvisionError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PRODUCT_DATA})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProvisionError::ConfigParseError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn output_dir(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.dir.as_deref())
    }

    pub fn transport(&self) -> Option<Transport> {
        self.encoder.as_ref().and_then(|e| e.transport)
    }

    /// 沒有指定 mode 時，有 value 就視為 fixed
    pub fn product_data_mode(&self) -> Result<ProductDataMode> {
        let Some(section) = &self.product_data else {
            return Ok(ProductDataMode::None);
        };

        let kind = section.mode.unwrap_or(if section.value.is_some() {
            ProductDataKind::Fixed
        } else {
            ProductDataKind::None
        });

        match kind {
            ProductDataKind::None => Ok(ProductDataMode::None),
            ProductDataKind::Random => Ok(ProductDataMode::Random),
            ProductDataKind::Fixed => section
                .value
                .clone()
                .map(ProductDataMode::Fixed)
                .ok_or_else(|| ProvisionError::MissingConfigError {
                    field: "product_data.value".to_string(),
                }),
        }
    }
}
