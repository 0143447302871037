#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;

use promptpix::banner::{Banner, BannerId};
use promptpix::controller::{Controller, Handles};
use promptpix::surface::{
  DisplayContainer, DisplayView, InputBox, MessageBoard, SubmitButton,
};
use promptpix::{
  ClientConfig, Error, GenerationResult, ImageLoader, ImageService,
  LoadedImage, Prompt,
};

/// Small valid PNG
pub fn png_bytes() -> Vec<u8>
{   let img = image::RgbaImage::from_pixel(
      2, 2, image::Rgba([200, 30, 30, 255])
    );
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
      .write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Png
      )
      .expect("encode png");
    bytes
}

/// Controls as seen at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls
{   pub input_enabled: bool
  , pub button_enabled: bool
  , pub label: String
  , pub banners: usize
}

#[derive(Debug)]
struct Recorded
{   value: String
  , input_enabled: bool
  , button_enabled: bool
  , label: String
  , focus_count: usize
  , display: Option<DisplayView>
  , views: Vec<DisplayView>
  , banners: Vec<Banner>
  , posted: Vec<Banner>
}

/// Surface double that remembers everything drawn on it
#[derive(Debug)]
pub struct RecordingSurface
{   inner: Mutex<Recorded>
}

impl RecordingSurface
{   pub fn new(value: &str) -> Arc<Self>
    {   Arc::new(RecordingSurface
        {   inner: Mutex::new(Recorded
            {   value: value.to_string()
              , input_enabled: true
              , button_enabled: true
              , label: "Send".to_string()
              , focus_count: 0
              , display: None
              , views: vec![]
              , banners: vec![]
              , posted: vec![]
            })
        })
    }

    pub fn controls(&self) -> Controls
    {   let r = self.inner.lock().unwrap();
        Controls
        {   input_enabled: r.input_enabled
          , button_enabled: r.button_enabled
          , label: r.label.clone()
          , banners: r.banners.len()
        }
    }

    pub fn display(&self) -> Option<DisplayView>
    {   self.inner.lock().unwrap().display.clone()
    }

    pub fn views(&self) -> Vec<DisplayView>
    {   self.inner.lock().unwrap().views.clone()
    }

    /// Banners currently on the board
    pub fn banners(&self) -> Vec<Banner>
    {   self.inner.lock().unwrap().banners.clone()
    }

    /// Every banner ever posted
    pub fn posted(&self) -> Vec<Banner>
    {   self.inner.lock().unwrap().posted.clone()
    }

    pub fn banner_texts(&self) -> Vec<String>
    {   self.banners().into_iter().map(|b| b.text).collect()
    }

    pub fn focus_count(&self) -> usize
    {   self.inner.lock().unwrap().focus_count
    }

    pub fn handles(self: &Arc<Self>) -> Handles
    {   Handles
        {   input: self.clone()
          , button: self.clone()
          , display: self.clone()
          , board: self.clone()
        }
    }
}

impl InputBox for RecordingSurface
{   fn value(&self) -> String
    {   self.inner.lock().unwrap().value.clone()
    }

    fn set_value(&self, value: &str)
    {   self.inner.lock().unwrap().value = value.to_string();
    }

    fn set_enabled(&self, enabled: bool)
    {   self.inner.lock().unwrap().input_enabled = enabled;
    }

    fn focus(&self)
    {   self.inner.lock().unwrap().focus_count += 1;
    }
}

impl SubmitButton for RecordingSurface
{   fn set_enabled(&self, enabled: bool)
    {   self.inner.lock().unwrap().button_enabled = enabled;
    }

    fn set_label(&self, label: &str)
    {   self.inner.lock().unwrap().label = label.to_string();
    }
}

impl DisplayContainer for RecordingSurface
{   fn show(&self, view: DisplayView)
    {   let mut r = self.inner.lock().unwrap();
        r.views.push(view.clone());
        r.display = Some(view);
    }
}

impl MessageBoard for RecordingSurface
{   fn post(&self, banner: &Banner)
    {   let mut r = self.inner.lock().unwrap();
        r.banners.push(banner.clone());
        r.posted.push(banner.clone());
    }

    fn remove(&self, id: BannerId)
    {   self.inner.lock().unwrap().banners.retain(|b| b.id != id);
    }
}

/// Generation double with a canned reply
pub struct FakeService
{   reply: Result<GenerationResult, Error>
  , delay: Option<Duration>
  , surface: Arc<RecordingSurface>
  , calls: Mutex<Vec<String>>
  , seen: Mutex<Vec<Controls>>
}

impl FakeService
{   pub fn new(
      surface: &Arc<RecordingSurface>
    , reply: Result<GenerationResult, Error>
    ) -> Arc<Self>
    {   Arc::new(FakeService
        {   reply
          , delay: None
          , surface: surface.clone()
          , calls: Mutex::new(vec![])
          , seen: Mutex::new(vec![])
        })
    }

    pub fn delayed(
      surface: &Arc<RecordingSurface>
    , reply: Result<GenerationResult, Error>
    , delay: Duration
    ) -> Arc<Self>
    {   Arc::new(FakeService
        {   reply
          , delay: Some(delay)
          , surface: surface.clone()
          , calls: Mutex::new(vec![])
          , seen: Mutex::new(vec![])
        })
    }

    pub fn calls(&self) -> Vec<String>
    {   self.calls.lock().unwrap().clone()
    }

    /// Controls as they were when each request went out
    pub fn seen(&self) -> Vec<Controls>
    {   self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageService for FakeService
{   async fn generate(&self, prompt: &Prompt)
      -> Result<GenerationResult, Error>
    {   self.calls.lock().unwrap().push(prompt.as_str().to_string());
        self.seen.lock().unwrap().push(self.surface.controls());
        if let Some(delay) = self.delay
        {   tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

pub enum LoadMode
{   Ok
  , Fail
  , Hang
}

/// Loader double
pub struct FakeLoader
{   mode: LoadMode
  , urls: Mutex<Vec<String>>
}

impl FakeLoader
{   pub fn new(mode: LoadMode) -> Arc<Self>
    {   Arc::new(FakeLoader
        {   mode
          , urls: Mutex::new(vec![])
        })
    }

    pub fn urls(&self) -> Vec<String>
    {   self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageLoader for FakeLoader
{   async fn load(&self, url: &str) -> Result<LoadedImage, Error>
    {   self.urls.lock().unwrap().push(url.to_string());
        match self.mode
        {   LoadMode::Ok => LoadedImage::decode(url, png_bytes())
          , LoadMode::Fail => Err(Error::ImageLoad("decode".to_string()))
          , LoadMode::Hang => std::future::pending().await
        }
    }
}

pub fn controller(
  surface: &Arc<RecordingSurface>
, service: &Arc<FakeService>
, loader: &Arc<FakeLoader>
, config: ClientConfig
) -> Controller
{   let service: Arc<dyn ImageService> = service.clone();
    let loader: Arc<dyn ImageLoader> = loader.clone();
    Controller::new(surface.handles(), service, loader, config)
}

pub fn success(path: &str) -> Result<GenerationResult, Error>
{   Ok(GenerationResult::Success { image_url: path.to_string() })
}
