// Configuration module

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_ADDRESS, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_PORT,
    DEFAULT_SCALE_DIVISOR, DEFAULT_TARGET_WIDTH,
};
use crate::resize::policy::{ResizeKernel, SizePolicy};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub resize: ResizeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_address")]
    pub address: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted upload size in bytes (default: 10 MB)
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

/// Which target-size rule the resizer applies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Fixed output width, height follows the aspect ratio
    #[default]
    FixedWidth,
    /// Divide both dimensions by a fixed divisor
    Fraction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeConfig {
    #[serde(default)]
    pub mode: PolicyMode,
    /// Target width for `fixed_width` mode (default: 1000)
    #[serde(default = "default_target_width")]
    pub width: u32,
    /// Divisor for `fraction` mode (default: 2, i.e. half scale)
    #[serde(default = "default_divisor")]
    pub divisor: u32,
    #[serde(default)]
    pub kernel: ResizeKernel,
    /// JPEG encoding quality, 1-100 (default: 100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            mode: PolicyMode::default(),
            width: DEFAULT_TARGET_WIDTH,
            divisor: DEFAULT_SCALE_DIVISOR,
            kernel: ResizeKernel::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ResizeConfig {
    /// Build the sizing policy this configuration describes
    pub fn policy(&self) -> SizePolicy {
        match self.mode {
            PolicyMode::FixedWidth => SizePolicy::FixedWidth { width: self.width },
            PolicyMode::Fraction => SizePolicy::Fraction {
                divisor: self.divisor,
            },
        }
    }
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_upload_size() -> usize {
    DEFAULT_MAX_UPLOAD_SIZE
}

fn default_target_width() -> u32 {
    DEFAULT_TARGET_WIDTH
}

fn default_divisor() -> u32 {
    DEFAULT_SCALE_DIVISOR
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: Config =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml(&yaml)
    }

    /// Load from a file, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(
                config_file = %path.as_ref().display(),
                "config file not found, using defaults"
            );
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.resize.width == 0 {
            return Err("resize.width must be at least 1".to_string());
        }
        if self.resize.divisor == 0 {
            return Err("resize.divisor must be at least 1".to_string());
        }
        if self.resize.jpeg_quality == 0 || self.resize.jpeg_quality > 100 {
            return Err(format!(
                "resize.jpeg_quality must be 1-100, got {}",
                self.resize.jpeg_quality
            ));
        }
        if self.server.max_upload_size == 0 {
            return Err("server.max_upload_size must be at least 1".to_string());
        }
        Ok(())
    }

    /// The socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}
