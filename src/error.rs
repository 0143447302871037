use std::fmt;

/// Banner text for every failure that means "the server did not answer
/// the way we expected"
pub const NETWORK_MESSAGE: &str
  = "Network error. Please check if the server is running.";

/// Banner text for an empty prompt
pub const VALIDATION_MESSAGE: &str = "Please enter a valid prompt";

/// Banner text when the server reports failure without a message
pub const GENERATION_FALLBACK_MESSAGE: &str = "Failed to generate image";

/// Banner text when the generated image cannot be fetched or decoded
pub const IMAGE_LOAD_MESSAGE: &str = "Failed to load the generated image";

/// Custom error type for promptpix operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Prompt was empty after trimming
    Validation
  , /// Endpoint answered with a non-2xx status
    Http(u16)
  , /// Endpoint answered 2xx but reported `success: false`
    Application(String)
  , /// Request could not be sent or the body could not be read
    Network(String)
  , /// Request or image fetch did not complete in time
    Timeout
  , /// Generated image could not be fetched or decoded
    ImageLoad(String)
  , /// Image could not be written to disk
    Download(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Generic error
    Other(String)
}

impl Error
{   /// Text shown to the user in the message banner
    pub fn user_message(&self) -> String
    {   match self
        {   Error::Validation => VALIDATION_MESSAGE.to_string()
          , Error::Http(_)
          | Error::Network(_)
          | Error::Timeout => NETWORK_MESSAGE.to_string()
          , Error::Application(msg) => msg.clone()
          , Error::ImageLoad(_) => IMAGE_LOAD_MESSAGE.to_string()
          , Error::Download(msg) => {
              format!("Failed to save image: {}", msg)
            }
          , other => other.to_string()
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Validation => {
              write!(f, "Prompt is empty")
            }
          , Error::Http(status) => {
              write!(f, "HTTP error! status: {}", status)
            }
          , Error::Application(msg) => {
              write!(f, "Generation failed: {}", msg)
            }
          , Error::Network(msg) => {
              write!(f, "Network error: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::ImageLoad(msg) => {
              write!(f, "Image load error: {}", msg)
            }
          , Error::Download(msg) => {
              write!(f, "Download error: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
