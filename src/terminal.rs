//! Terminal rendition of the surface handles.
//!
//! A line typed at the prompt is the input value and Enter submits it.
//! Actions on the displayed image are short `:` commands.

use std::future::Future;
use std::io::Write;
use std::sync::Mutex;
use log::{debug, error, trace};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

use crate::banner::{Banner, BannerId, BannerKind};
use crate::surface::{DisplayView, DisplayContainer, InputBox, MessageBoard, SubmitButton};
use crate::Action;

/// One parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand
{   /// Anything that is not a command is a prompt
    Submit(String)
  , Act(Action)
  , Help
  , Quit
}

impl TerminalCommand
{   pub fn parse(line: &str) -> TerminalCommand
    {   match line.trim()
        {   ":d" | ":download" => TerminalCommand::Act(Action::Download)
          , ":n" | ":new" => TerminalCommand::Act(Action::GenerateAnother)
          , ":r" | ":retry" => TerminalCommand::Act(Action::TryAgain)
          , ":h" | ":help" => TerminalCommand::Help
          , ":q" | ":quit" => TerminalCommand::Quit
          , _ => TerminalCommand::Submit(line.to_string())
        }
    }
}

pub const HELP: &str = "\
Type a prompt and press Enter to generate an image.
  :d  download the image on display
  :n  generate another
  :r  try again after a failed load
  :q  quit";

/// Forward lines from `reader` on their own task, so input keeps
/// arriving while a cycle runs. The channel closes at end of input.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<String>
where
  R: AsyncRead + Unpin + Send + 'static
{   let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
      let mut lines = BufReader::new(reader).lines();
      loop
      {   match lines.next_line().await
          {   Ok(Some(line)) => {
                if tx.send(line).is_err()
                {   break;
                }
              }
            , Ok(None) => break
            , Err(e) => {
                error!("Failed to read input: {}", e);
                break;
              }
          }
      }
      trace!("Line reader finished");
    });
    rx
}

/// Drive `cycle` to completion, discarding every line that arrives
/// meanwhile. Returns the cycle output and how many lines were dropped.
pub async fn drop_lines_while<F>(
  cycle: F
, lines: &mut mpsc::UnboundedReceiver<String>
) -> (F::Output, usize)
where
  F: Future
{   tokio::pin!(cycle);
    let mut dropped = 0;
    let mut open = true;
    loop
    {   tokio::select!
        {   biased;
            output = &mut cycle => return (output, dropped)
          , line = lines.recv(), if open => match line
            {   Some(_) => {
                  debug!("Input disabled, dropping line");
                  dropped += 1;
                }
              , None => open = false
            }
        }
    }
}

#[derive(Debug)]
struct TerminalState
{   value: String
  , input_enabled: bool
  , button_enabled: bool
  , label: String
}

/// Every surface handle, printed to stdout
#[derive(Debug)]
pub struct TerminalSurface
{   state: Mutex<TerminalState>
}

impl Default for TerminalSurface
{   fn default() -> Self
    {   TerminalSurface
        {   state: Mutex::new(TerminalState
            {   value: String::new()
              , input_enabled: true
              , button_enabled: true
              , label: crate::controller::SEND_LABEL.to_string()
            })
        }
    }
}

impl TerminalSurface
{   pub fn new() -> Self
    {   Self::default()
    }

    /// Print the input marker with the submit label, unless the
    /// controls are disabled
    pub fn print_prompt(&self)
    {   let label = {
          let state = self.lock();
          if !(state.input_enabled && state.button_enabled)
          {   return;
          }
          state.label.clone()
        };
        print!("[{}] > ", label);
        let _ = std::io::stdout().flush();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TerminalState>
    {   self.state
          .lock()
          .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InputBox for TerminalSurface
{   fn value(&self) -> String
    {   self.lock().value.clone()
    }

    fn set_value(&self, value: &str)
    {   self.lock().value = value.to_string();
    }

    fn set_enabled(&self, enabled: bool)
    {   trace!("input enabled: {}", enabled);
        self.lock().input_enabled = enabled;
    }

    fn focus(&self)
    {   self.print_prompt();
    }
}

impl SubmitButton for TerminalSurface
{   fn set_enabled(&self, enabled: bool)
    {   trace!("button enabled: {}", enabled);
        self.lock().button_enabled = enabled;
    }

    fn set_label(&self, label: &str)
    {   self.lock().label = label.to_string();
    }
}

impl DisplayContainer for TerminalSurface
{   fn show(&self, view: DisplayView)
    {   match view
        {   DisplayView::Loading { text } => {
              println!("... {}", text);
            }
          , DisplayView::Result(result) => {
              println!(
                "Image: {} ({}x{}, {} bytes)",
                result.src(),
                result.image.width,
                result.image.height,
                result.image.bytes.len()
              );
              println!("Prompt: {}", result.prompt);
              println!("{}", action_hints(&result.actions));
            }
          , DisplayView::ImageError { text, actions } => {
              println!("{}", text);
              println!("{}", action_hints(&actions));
            }
          , DisplayView::Failure { text } => {
              println!("x {}", text);
            }
        }
    }
}

impl MessageBoard for TerminalSurface
{   fn post(&self, banner: &Banner)
    {   match banner.kind
        {   BannerKind::Error => eprintln!("[error] {}", banner.text)
          , BannerKind::Success => println!("[success] {}", banner.text)
        }
    }

    fn remove(&self, id: BannerId)
    {   // printed lines cannot be taken back
        trace!("banner {:?} dismissed", id);
    }
}

fn action_hints(actions: &[Action]) -> String
{   actions
      .iter()
      .map(|action| match action
      {   Action::Download => "[:d] Download Image"
        , Action::GenerateAnother => "[:n] Generate Another"
        , Action::TryAgain => "[:r] Try Again"
      })
      .collect::<Vec<_>>()
      .join("  ")
}
