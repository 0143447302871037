//! One message banner at a time, removed after a fixed lifetime

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use log::{debug, trace};

use crate::surface::MessageBoard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BannerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind
{   Error
  , Success
}

impl fmt::Display for BannerKind
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   match self
        {   BannerKind::Error => write!(f, "error")
          , BannerKind::Success => write!(f, "success")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner
{   pub id: BannerId
  , pub kind: BannerKind
  , pub text: String
}

/// Owns the single banner slot of a message board.
/// Timers are tokio tasks, so posting needs a running runtime.
pub struct Banners
{   board: Arc<dyn MessageBoard>
  , current: Arc<Mutex<Option<BannerId>>>
  , next_id: AtomicU64
  , config: crate::config::BannerConfig
}

impl Banners
{   pub fn new(
      board: Arc<dyn MessageBoard>
    , config: crate::config::BannerConfig
    ) -> Self
    {   Banners
        {   board
          , current: Arc::new(Mutex::new(None))
          , next_id: AtomicU64::new(1)
          , config
        }
    }

    pub fn error(&self, text: impl Into<String>) -> BannerId
    {   let lifetime = Duration::from_millis(self.config.error_ms);
        self.post(BannerKind::Error, text.into(), lifetime)
    }

    pub fn success(&self, text: impl Into<String>) -> BannerId
    {   let lifetime = Duration::from_millis(self.config.success_ms);
        self.post(BannerKind::Success, text.into(), lifetime)
    }

    /// Banner currently on the board, if any
    pub fn current(&self) -> Option<BannerId>
    {   *lock(&self.current)
    }

    /// Remove whatever banner is up
    pub fn clear(&self)
    {   let mut current = lock(&self.current);
        if let Some(id) = current.take()
        {   trace!("Clearing banner {:?}", id);
            self.board.remove(id);
        }
    }

    fn post(
      &self
    , kind: BannerKind
    , text: String
    , lifetime: Duration
    ) -> BannerId
    {   let id = BannerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let banner = Banner { id, kind, text };

        {   let mut current = lock(&self.current);
            if let Some(old) = current.replace(id)
            {   self.board.remove(old);
            }
            debug!("Posting {} banner {:?}: {}", kind, id, banner.text);
            self.board.post(&banner);
        }

        let current = self.current.clone();
        let board = self.board.clone();
        tokio::spawn(async move {
          tokio::time::sleep(lifetime).await;
          let mut slot = lock(&current);
          // a newer banner owns the slot
          if *slot == Some(id)
          {   trace!("Banner {:?} expired", id);
              *slot = None;
              board.remove(id);
          }
        });

        id
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T>
{   m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
