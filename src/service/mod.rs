//! Seams between the controller and the outside world

pub mod http;

use async_trait::async_trait;
use log::trace;

// Re-export for convenience
pub use http::HttpImageService;

/// Something that turns a prompt into a generated image path
#[async_trait]
pub trait ImageService: Send + Sync
{   async fn generate(
      &self
    , prompt: &crate::Prompt
    ) -> Result<crate::GenerationResult, crate::error::Error>;
}

/// Something that fetches and decodes an image before it is shown
#[async_trait]
pub trait ImageLoader: Send + Sync
{   async fn load(
      &self
    , url: &str
    ) -> Result<LoadedImage, crate::error::Error>;
}

/// A fetched image that decoded successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage
{   /// Resolved URL the bytes came from
    pub url: String
  , pub bytes: Vec<u8>
  , pub width: u32
  , pub height: u32
}

impl LoadedImage
{   /// Decode `bytes` fully; anything the decoder rejects is an
    /// `ImageLoad` error
    pub fn decode(
      url: impl Into<String>
    , bytes: Vec<u8>
    ) -> Result<Self, crate::error::Error>
    {   let url = url.into();
        if bytes.is_empty()
        {   return Err(crate::error::Error::ImageLoad(
              format!("empty body from {}", url)
            ));
        }
        let decoded = image::load_from_memory(&bytes)
          .map_err(|e| {
            crate::error::Error::ImageLoad(
              format!("{}: {}", url, e)
            )
          })?;
        trace!(
          "Decoded {}x{} image from {}",
          decoded.width(), decoded.height(), url
        );
        Ok(LoadedImage
        {   url
          , width: decoded.width()
          , height: decoded.height()
          , bytes
        })
    }
}
