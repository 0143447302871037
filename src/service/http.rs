use async_trait::async_trait;
use tokio::sync::mpsc;
use log::{debug, trace, error, info};

// ===== Service Actor =====

pub type GenerateReply
  = Result<crate::GenerationResult, crate::error::Error>;
pub type FetchReply
  = Result<crate::LoadedImage, crate::error::Error>;

/// Commands for the HTTP service actor
pub enum HttpCommand
{   GenerateImage
    {   prompt: String
      , reply: mpsc::UnboundedSender<GenerateReply>
    }
  , FetchImage
    {   url: String
      , reply: mpsc::UnboundedSender<FetchReply>
    }
  , Shutdown
}

/// HTTP service state, owned by the actor task
pub struct HttpServiceState
{   generate_url: String
  , request_timeout: Option<std::time::Duration>
  , image_timeout: Option<std::time::Duration>
  , http_client: reqwest::Client
}

impl HttpServiceState
{   pub fn new(config: &crate::ClientConfig) -> Self
    {   debug!("Creating HttpServiceState");
        HttpServiceState
        {   generate_url: config.generate_url()
          , request_timeout: config.request_timeout()
          , image_timeout: config.image_timeout()
          , http_client: reqwest::Client::new()
        }
    }

    async fn handle_generate(
      &self
    , prompt: String
    ) -> GenerateReply
    {   debug!("Handling generate for {} chars", prompt.len());

        let request = crate::request::GenerateImageRequest
        {   prompt
        };

        trace!("Generate request: {:?}", request);

        let mut builder = self.http_client
          .post(&self.generate_url)
          .header("Content-Type", "application/json")
          .json(&request);
        if let Some(timeout) = self.request_timeout
        {   builder = builder.timeout(timeout);
        }

        let response = builder
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            if e.is_timeout()
            {   crate::error::Error::Timeout
            } else
            {   crate::error::Error::Network(e.to_string())
            }
          })?;

        let status = response.status();
        trace!("Generate response status: {}", status);

        if !status.is_success()
        {   error!("Generation endpoint returned {}", status);
            return Err(crate::error::Error::Http(status.as_u16()));
        }

        let body: crate::request::GenerateImageResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::Network(e.to_string())
          })?;

        trace!("Generate response: {:?}", body);
        body.into_result()
    }

    async fn handle_fetch(
      &self
    , url: String
    ) -> FetchReply
    {   debug!("Fetching image: {}", url);

        let mut builder = self.http_client.get(&url);
        if let Some(timeout) = self.image_timeout
        {   builder = builder.timeout(timeout);
        }

        let response = builder
          .send()
          .await
          .map_err(|e| {
            error!("Failed to fetch image: {}", e);
            crate::error::Error::ImageLoad(e.to_string())
          })?;

        let status = response.status();
        trace!("Image response status: {}", status);

        if !status.is_success()
        {   error!("Image fetch returned {}", status);
            return Err(crate::error::Error::ImageLoad(
              format!("{} returned {}", url, status)
            ));
        }

        let bytes = response.bytes().await.map_err(|e| {
          error!("Failed to read image body: {}", e);
          crate::error::Error::ImageLoad(e.to_string())
        })?;

        debug!("Fetched {} bytes", bytes.len());
        crate::LoadedImage::decode(url, bytes.to_vec())
    }
}

/// Public handle to the HTTP service actor
pub struct HttpImageService
{   tx: mpsc::UnboundedSender<HttpCommand>
  , _task: tokio::task::JoinHandle<()>
}

impl HttpImageService
{   /// Create and spawn the service actor.
    /// Must be called inside a tokio runtime.
    pub fn new(config: &crate::ClientConfig) -> Self
    {   debug!("Creating HttpImageService for {}", config.base_url);
        let (cmd_tx, cmd_rx)
          = mpsc::unbounded_channel();
        let state = HttpServiceState::new(config);

        let _task = tokio::spawn(async move {
          run_service_loop(cmd_rx, state).await;
        });

        HttpImageService
        {   tx: cmd_tx
          , _task
        }
    }

    fn queue(&self, cmd: HttpCommand)
      -> Result<(), crate::error::Error>
    {   self.tx.send(cmd).map_err(|_| {
          error!("HTTP service disconnected");
          crate::error::Error::Other(
            "HTTP service disconnected".to_string()
          )
        })
    }

    /// Shutdown the actor
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down HttpImageService");
        self.tx.send(HttpCommand::Shutdown)
          .map_err(|_| {
            crate::error::Error::Other(
              "Service already shutdown".to_string()
            )
          })?;
        self._task.await.map_err(|e| {
          crate::error::Error::Other(e.to_string())
        })
    }
}

#[async_trait]
impl crate::ImageService for HttpImageService
{   async fn generate(
      &self
    , prompt: &crate::Prompt
    ) -> GenerateReply
    {   debug!("generate queued");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        self.queue(HttpCommand::GenerateImage {
          prompt: prompt.as_str().to_string(),
          reply: reply_tx,
        })?;

        reply_rx.recv().await.unwrap_or_else(|| {
          error!("Generate reply dropped");
          Err(crate::error::Error::Other(
            "HTTP service dropped the request".to_string()
          ))
        })
    }
}

#[async_trait]
impl crate::ImageLoader for HttpImageService
{   async fn load(
      &self
    , url: &str
    ) -> FetchReply
    {   debug!("fetch queued: {}", url);
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        self.queue(HttpCommand::FetchImage {
          url: url.to_string(),
          reply: reply_tx,
        })?;

        reply_rx.recv().await.unwrap_or_else(|| {
          error!("Fetch reply dropped");
          Err(crate::error::Error::Other(
            "HTTP service dropped the request".to_string()
          ))
        })
    }
}

/// Main service event loop
async fn run_service_loop(
  mut cmd_rx: mpsc::UnboundedReceiver<HttpCommand>
, state: HttpServiceState
)
{   debug!("Starting HTTP service loop");

    loop
    { match cmd_rx.recv().await
      {   Some(HttpCommand::GenerateImage { prompt, reply }) => {
            debug!("Processing GenerateImage");
            let result = state.handle_generate(prompt).await;
            let _ = reply.send(result);
          }
        , Some(HttpCommand::FetchImage { url, reply }) => {
            debug!("Processing FetchImage");
            let result = state.handle_fetch(url).await;
            let _ = reply.send(result);
          }
        , Some(HttpCommand::Shutdown) => {
            info!("HTTP service shutting down");
            break;
          }
        , None => {
            debug!("Command channel closed");
            break;
          }
      }
    }
}
