use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use log::{debug, error, info, warn};

use crate::banner::Banners;
use crate::error::Error;
use crate::surface::{
  DisplayContainer, DisplayView, InputBox, MessageBoard, ResultView,
  SubmitButton,
};
use crate::{
  Action, GenerationResult, ImageLoader, ImageService, LoadedImage,
  Outcome, Prompt, UiEvent, UiState,
};

pub const SEND_LABEL: &str = "Send";
pub const WAIT_LABEL: &str = "Wait...";
pub const LOADING_TEXT: &str = "Generating your image...";
pub const SUCCESS_TEXT: &str = "Image generated successfully!";
pub const IMAGE_ERROR_TEXT: &str
  = "Image could not be loaded. Please try again.";

/// The surface handles a controller draws on
#[derive(Clone)]
pub struct Handles
{   pub input: Arc<dyn InputBox>
  , pub button: Arc<dyn SubmitButton>
  , pub display: Arc<dyn DisplayContainer>
  , pub board: Arc<dyn MessageBoard>
}

/// Prompt-to-image controller.
///
/// Drives one generation cycle at a time; `generate_image` borrows the
/// controller mutably for the whole cycle.
pub struct Controller
{   input: Arc<dyn InputBox>
  , button: Arc<dyn SubmitButton>
  , display: Arc<dyn DisplayContainer>
  , banners: Banners
  , service: Arc<dyn ImageService>
  , loader: Arc<dyn ImageLoader>
  , config: crate::ClientConfig
  , state: UiState
  , /// Image on display and the prompt that produced it
    current: Option<(LoadedImage, String)>
}

impl Controller
{   pub fn new(
      handles: Handles
    , service: Arc<dyn ImageService>
    , loader: Arc<dyn ImageLoader>
    , config: crate::ClientConfig
    ) -> Self
    {   debug!("Creating Controller for {}", config.base_url);
        let banners = Banners::new(
          handles.board,
          config.banners.clone()
        );
        Controller
        {   input: handles.input
          , button: handles.button
          , display: handles.display
          , banners
          , service
          , loader
          , config
          , state: UiState::Idle
          , current: None
        }
    }

    pub fn state(&self) -> UiState
    {   self.state
    }

    /// Image on display, with its prompt
    pub fn current_image(&self) -> Option<(&LoadedImage, &str)>
    {   self.current
          .as_ref()
          .map(|(image, prompt)| (image, prompt.as_str()))
    }

    pub fn banners(&self) -> &Banners
    {   &self.banners
    }

    /// Run one generation cycle from the current input value
    pub async fn generate_image(&mut self) -> Outcome
    {   // `&mut self` rules out a live cycle, so Busy here means the
        // last one was dropped before it resolved
        if self.state.is_busy()
        {   warn!("Previous cycle was dropped, restoring Idle");
            self.transition(UiEvent::Resolved);
        }

        let prompt = match Prompt::parse(&self.input.value())
        {   Ok(prompt) => prompt
          , Err(e) => {
              debug!("Rejected empty prompt");
              self.transition(UiEvent::Submit { valid: false });
              self.banners.error(e.user_message());
              return Outcome::Failed(e);
            }
        };

        self.transition(UiEvent::Submit { valid: true });
        let restore = RestoreControls::arm(&self.input, &self.button);
        self.banners.clear();
        info!("Generating image for prompt: {}", prompt);

        let outcome = match self.run_cycle(&prompt).await
        {   Ok(image) => {
              let image_url = image.url.clone();
              self.display_result(image, prompt.as_str());
              self.banners.success(SUCCESS_TEXT);
              Outcome::Displayed { image_url }
            }
          , Err(e) => {
              error!("Error generating image: {}", e);
              self.show_failure(&e);
              Outcome::Failed(e)
            }
        };

        restore.disarm();
        self.transition(UiEvent::Resolved);
        outcome
    }

    /// Request, then preload. Both steps are bounded by the configured
    /// timeouts.
    async fn run_cycle(&self, prompt: &Prompt)
      -> Result<LoadedImage, Error>
    {   let result = bounded(
          self.config.request_timeout(),
          self.service.generate(prompt),
          Error::Timeout
        ).await?;

        let image_url = match result
        {   GenerationResult::Success { image_url } => image_url
          , GenerationResult::Failure { message } => {
              return Err(Error::Application(message));
            }
        };

        let url = crate::request::resolve_image_url(
          &self.config.base_url,
          &image_url
        );
        debug!("Displaying image: {}", url);

        bounded(
          self.config.image_timeout(),
          self.loader.load(&url),
          Error::ImageLoad(format!("{} timed out", url))
        )
        .await
        .map_err(|e| match e
        {   Error::ImageLoad(_) => e
          , other => Error::ImageLoad(other.to_string())
        })
    }

    /// Replace the display with `image`, its prompt, and the download
    /// and generate-another actions
    pub fn display_result(&mut self, image: LoadedImage, prompt: &str)
    {   debug!("Image loaded successfully");
        self.display.show(DisplayView::Result(ResultView
        {   image: image.clone()
          , prompt: prompt.to_string()
          , actions: vec![Action::Download, Action::GenerateAnother]
        }));
        self.current = Some((image, prompt.to_string()));
    }

    /// Save `image` locally under a name derived from `prompt`.
    /// Failures are shown as a banner and returned.
    pub async fn download_current_image(
      &self
    , image: &LoadedImage
    , prompt: &str
    ) -> Result<PathBuf, Error>
    {   let dir = self.config.download_dir.as_path();
        match crate::download::save_image(dir, image, prompt).await
        {   Ok(path) => Ok(path)
          , Err(e) => {
              self.banners.error(e.user_message());
              Err(e)
            }
        }
    }

    /// Clear and focus the input; the image on display stays
    pub fn reset_for_next_prompt(&self)
    {   debug!("Resetting input for next prompt");
        self.input.set_value("");
        self.input.focus();
    }

    /// Dispatch an action raised by the display
    pub async fn on_action(&mut self, action: Action)
      -> Result<Option<PathBuf>, Error>
    {   debug!("Action: {:?}", action);
        match action
        {   Action::Download => {
              let Some((image, prompt)) = self.current.as_ref()
              else
              {   warn!("Download requested with no image on display");
                  return Err(Error::Other(
                    "No image to download".to_string()
                  ));
              };
              let path = self
                .download_current_image(image, prompt)
                .await?;
              Ok(Some(path))
            }
          , Action::GenerateAnother | Action::TryAgain => {
              self.reset_for_next_prompt();
              Ok(None)
            }
        }
    }

    fn show_failure(&self, e: &Error)
    {   self.banners.error(e.user_message());
        let view = match e
        {   Error::ImageLoad(_) => DisplayView::ImageError
            {   text: IMAGE_ERROR_TEXT.to_string()
              , actions: vec![Action::TryAgain]
            }
          , other => DisplayView::Failure
            {   text: other.user_message()
            }
        };
        self.display.show(view);
    }

    fn transition(&mut self, event: UiEvent)
    {   let next = self.state.next(event);
        if next == self.state
        {   return;
        }
        debug!("UI {:?} -> {:?}", self.state, next);
        self.state = next;
        match next
        {   UiState::Busy => {
              self.button.set_enabled(false);
              self.button.set_label(WAIT_LABEL);
              self.input.set_enabled(false);
              self.current = None;
              self.display.show(DisplayView::Loading
              {   text: LOADING_TEXT.to_string()
              });
            }
          , UiState::Idle => {
              self.button.set_enabled(true);
              self.button.set_label(SEND_LABEL);
              self.input.set_enabled(true);
            }
        }
    }
}

/// Re-enables the controls if a cycle is dropped while Busy.
/// The controller state itself is put back on the next submit.
struct RestoreControls
{   input: Arc<dyn InputBox>
  , button: Arc<dyn SubmitButton>
  , armed: bool
}

impl RestoreControls
{   fn arm(input: &Arc<dyn InputBox>, button: &Arc<dyn SubmitButton>)
      -> Self
    {   RestoreControls
        {   input: input.clone()
          , button: button.clone()
          , armed: true
        }
    }

    fn disarm(mut self)
    {   self.armed = false;
    }
}

impl Drop for RestoreControls
{   fn drop(&mut self)
    {   if !self.armed
        {   return;
        }
        warn!("Cycle dropped before it resolved, re-enabling controls");
        self.button.set_enabled(true);
        self.button.set_label(SEND_LABEL);
        self.input.set_enabled(true);
    }
}

/// Await `fut`, giving up with `on_expiry` once `limit` passes
async fn bounded<T, F>(
  limit: Option<Duration>
, fut: F
, on_expiry: Error
) -> Result<T, Error>
where
  F: Future<Output = Result<T, Error>>
{   match limit
    {   Some(limit) => {
          tokio::time::timeout(limit, fut)
            .await
            .unwrap_or_else(|_| {
              warn!("Gave up after {:?}", limit);
              Err(on_expiry)
            })
        }
      , None => fut.await
    }
}
