pub mod error;
pub mod config;
pub mod request;
pub mod service;
pub mod surface;
pub mod banner;
pub mod download;
pub mod controller;
pub mod terminal;

pub use config::ClientConfig;
pub use controller::Controller;
pub use error::Error;
pub use service::{ImageLoader, ImageService, LoadedImage};
pub use service::http::HttpImageService;

/*

promptpix: type a prompt, get an image back from a generation server.

One generation cycle:

  submit ──> validate ──> Busy ──> POST /generate-image
                                     │
                                     ├─ non-2xx ............ Http
                                     ├─ success: false ...... Application
                                     ├─ transport failure ... Network / Timeout
                                     └─ success: true
                                          └─ fetch + decode image
                                               ├─ ok ........ display + banner
                                               └─ failed .... ImageLoad
                          Idle <─────────────────┘ (always)

*/

// ===== Structures =====

/// A trimmed, non-empty prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt
{   /// Trim raw input; empty input is a validation error
    pub fn parse(raw: &str) -> Result<Self, crate::error::Error>
    {   let trimmed = raw.trim();
        if trimmed.is_empty()
        {   return Err(crate::error::Error::Validation);
        }
        Ok(Prompt(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str
    {   &self.0
    }

    pub fn into_string(self) -> String
    {   self.0
    }
}

impl std::fmt::Display for Prompt
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
      -> std::fmt::Result
    {   f.write_str(&self.0)
    }
}

/// What the generation endpoint said about one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult
{   /// Server-relative path of the new image
    Success { image_url: String }
  , /// Server-reported failure, or the fallback text
    Failure { message: String }
}

/// The two states of the prompt controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState
{   /// Input and button enabled
    #[default]
    Idle
  , /// Input and button disabled, loading indicator shown
    Busy
}

/// Inputs to the UI state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent
{   /// User submitted; `valid` is whether the prompt passed validation
    Submit { valid: bool }
  , /// The cycle finished, whatever the outcome
    Resolved
}

impl UiState
{   /// The single transition function of the controls
    pub fn next(self, event: UiEvent) -> UiState
    {   match (self, event)
        {   (UiState::Idle, UiEvent::Submit { valid: true }) => {
              UiState::Busy
            }
          , (UiState::Idle, UiEvent::Submit { valid: false }) => {
              UiState::Idle
            }
          , (UiState::Busy, UiEvent::Submit { .. }) => UiState::Busy
          , (_, UiEvent::Resolved) => UiState::Idle
        }
    }

    pub fn is_busy(self) -> bool
    {   self == UiState::Busy
    }
}

/// Typed actions attached to what the display shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action
{   /// Save the current image locally
    Download
  , /// Clear the input for a new prompt, keep the image
    GenerateAnother
  , /// Offered after an image failed to load
    TryAgain
}

/// How one call to `Controller::generate_image` ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome
{   /// Image fetched and swapped into the display
    Displayed { image_url: String }
  , /// Cycle ended with an error, already shown to the user
    Failed(crate::error::Error)
}
