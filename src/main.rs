use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use log::{debug, info, warn};

use promptpix::controller::{Controller, Handles};
use promptpix::surface::InputBox;
use promptpix::terminal::{
  drop_lines_while, spawn_line_reader, TerminalCommand, TerminalSurface, HELP,
};
use promptpix::{ClientConfig, HttpImageService, ImageLoader, ImageService};

/// Generate images from text prompts against a local generation server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args
{   /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>
  , /// Origin of the generation server
    #[arg(long)]
    base_url: Option<String>
  , /// Directory downloads are written to
    #[arg(short, long)]
    download_dir: Option<PathBuf>
  , /// Generation request timeout in seconds, 0 disables it
    #[arg(long)]
    request_timeout: Option<u64>
  , /// Image fetch timeout in seconds, 0 disables it
    #[arg(long)]
    image_timeout: Option<u64>
}

impl Args
{   fn into_config(self)
      -> Result<ClientConfig, promptpix::Error>
    {   let mut config = match &self.config
        {   Some(path) => ClientConfig::from_file(path)?
          , None => ClientConfig::default()
        };
        if let Some(base_url) = self.base_url
        {   config.base_url = base_url;
        }
        if let Some(dir) = self.download_dir
        {   config.download_dir = dir;
        }
        if let Some(secs) = self.request_timeout
        {   config.request_timeout_secs = (secs > 0).then_some(secs);
        }
        if let Some(secs) = self.image_timeout
        {   config.image_timeout_secs = (secs > 0).then_some(secs);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>>
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = Args::parse().into_config()?;
    info!("Using generation server at {}", config.generate_url());

    let surface = Arc::new(TerminalSurface::new());
    let service = Arc::new(HttpImageService::new(&config));
    let handles = Handles
    {   input: surface.clone()
      , button: surface.clone()
      , display: surface.clone()
      , board: surface.clone()
    };
    let generator: Arc<dyn ImageService> = service.clone();
    let loader: Arc<dyn ImageLoader> = service.clone();
    let mut controller = Controller::new(handles, generator, loader, config);

    println!("{}", HELP);
    surface.print_prompt();

    let mut lines = spawn_line_reader(tokio::io::stdin());
    while let Some(line) = lines.recv().await
    {   match TerminalCommand::parse(&line)
        {   TerminalCommand::Submit(prompt) => {
              surface.set_value(&prompt);
              let (outcome, dropped) = drop_lines_while(
                controller.generate_image(),
                &mut lines
              ).await;
              debug!("Cycle finished: {:?}, {} lines dropped", outcome, dropped);
            }
          , TerminalCommand::Act(action) => {
              match controller.on_action(action).await
              {   Ok(Some(path)) => {
                    println!("Saved to {}", path.display());
                  }
                , Ok(None) => continue
                , Err(e) => warn!("{}", e)
              }
            }
          , TerminalCommand::Help => println!("{}", HELP)
          , TerminalCommand::Quit => break
        }
        surface.print_prompt();
    }

    drop(controller);
    if let Ok(service) = Arc::try_unwrap(service)
    {   service.shutdown().await?;
    }
    Ok(())
}
