//! Configuration for the generation endpoint and the UI timings

use std::path::{Path, PathBuf};
use std::time::Duration;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_GENERATE_PATH: &str = "/generate-image";

/// How long message banners stay up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig
{   /// Error banner lifetime in milliseconds
    pub error_ms: u64
  , /// Success banner lifetime in milliseconds
    pub success_ms: u64
}

impl Default for BannerConfig
{   fn default() -> Self
    {   BannerConfig
        {   error_ms: 5000
          , success_ms: 3000
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig
{   /// Origin of the generation server, also used to resolve image paths
    pub base_url: String
  , /// Path of the generation route
    pub generate_path: String
  , /// Upper bound on the generation request in seconds
    pub request_timeout_secs: Option<u64>
  , /// Upper bound on fetching the generated image in seconds
    pub image_timeout_secs: Option<u64>
  , /// Where downloads are written
    pub download_dir: PathBuf
  , pub banners: BannerConfig
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   base_url: DEFAULT_BASE_URL.to_string()
          , generate_path: DEFAULT_GENERATE_PATH.to_string()
          , request_timeout_secs: Some(60)
          , image_timeout_secs: Some(30)
          , download_dir: PathBuf::from(".")
          , banners: BannerConfig::default()
        }
    }
}

impl ClientConfig
{   /// Load a JSON config file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        let config: ClientConfig = serde_json::from_str(&raw)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   let parsed = reqwest::Url::parse(&self.base_url)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(
              format!("base_url {:?}: {}", self.base_url, e)
            )
          })?;
        if !matches!(parsed.scheme(), "http" | "https")
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("base_url must be http(s): {}", self.base_url)
            ));
        }
        if !self.generate_path.starts_with('/')
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!(
                "generate_path must start with '/': {}",
                self.generate_path
              )
            ));
        }
        if self.request_timeout_secs == Some(0)
          || self.image_timeout_secs == Some(0)
        {   return Err(crate::error::Error::InvalidConfiguration(
              "timeouts must be positive".to_string()
            ));
        }
        Ok(())
    }

    /// Full URL of the generation route
    pub fn generate_url(&self) -> String
    {   format!(
          "{}{}",
          self.base_url.trim_end_matches('/'),
          self.generate_path
        )
    }

    pub fn request_timeout(&self) -> Option<Duration>
    {   self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn image_timeout(&self) -> Option<Duration>
    {   self.image_timeout_secs.map(Duration::from_secs)
    }
}
