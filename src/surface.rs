//! Handles the controller draws on.
//!
//! Every method takes `&self`; implementations keep their own interior
//! state so one surface can be shared between the controller and the
//! banner timers.

/// The prompt text field
pub trait InputBox: Send + Sync
{   fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn set_enabled(&self, enabled: bool);
    fn focus(&self);
}

/// The control that submits the prompt
pub trait SubmitButton: Send + Sync
{   fn set_enabled(&self, enabled: bool);
    fn set_label(&self, label: &str);
}

/// The region where the image, loading or failure state is rendered
pub trait DisplayContainer: Send + Sync
{   /// Replace the whole contents
    fn show(&self, view: DisplayView);
}

/// Transient message banners
pub trait MessageBoard: Send + Sync
{   fn post(&self, banner: &crate::banner::Banner);
    fn remove(&self, id: crate::banner::BannerId);
}

/// What the display container holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayView
{   /// Loading indicator with its caption
    Loading { text: String }
  , /// A generated image with its prompt and actions
    Result(ResultView)
  , /// The image was generated but could not be loaded
    ImageError
    {   text: String
      , actions: Vec<crate::Action>
    }
  , /// The cycle failed before an image existed
    Failure { text: String }
}

/// A displayed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView
{   pub image: crate::LoadedImage
  , /// Prompt the image was generated from
    pub prompt: String
  , pub actions: Vec<crate::Action>
}

impl ResultView
{   /// Source the image was loaded from
    pub fn src(&self) -> &str
    {   &self.image.url
    }

    pub fn alt(&self) -> String
    {   format!("Generated image for: {}", self.prompt)
    }
}
