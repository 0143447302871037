//! Wire types of the generation endpoint

use serde::{Deserialize, Serialize};

/// Body of `POST /generate-image`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateImageRequest
{   pub prompt: String
}

/// Body returned by the generation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateImageResponse
{   #[serde(default)]
    pub success: bool
  , /// Server-relative path of the generated image
    #[serde(default)]
    pub image_url: Option<String>
  , #[serde(default)]
    pub error: Option<String>
  , /// Informational, never displayed
    #[serde(default)]
    pub message: Option<String>
  , /// Server-side filesystem path, never displayed
    #[serde(default)]
    pub image_path: Option<String>
}

impl GenerateImageResponse
{   /// Collapse the body into a tagged outcome.
    /// A success without an `image_url` is a malformed response.
    pub fn into_result(self)
      -> Result<crate::GenerationResult, crate::error::Error>
    {   if self.success
        {   match self.image_url
            {   Some(image_url) => {
                  Ok(crate::GenerationResult::Success { image_url })
                }
              , None => Err(crate::error::Error::Network(
                  "success response without image_url".to_string()
                ))
            }
        } else
        {   let message = self.error
              .filter(|e| !e.is_empty())
              .unwrap_or_else(|| {
                crate::error::GENERATION_FALLBACK_MESSAGE.to_string()
              });
            Ok(crate::GenerationResult::Failure { message })
        }
    }
}

/// Resolve a server-relative image path against the server origin.
/// Appends the path to the origin, normalising the joining slash.
pub fn resolve_image_url(base_url: &str, image_url: &str) -> String
{   let base = base_url.trim_end_matches('/');
    if image_url.starts_with('/')
    {   format!("{}{}", base, image_url)
    } else
    {   format!("{}/{}", base, image_url)
    }
}
