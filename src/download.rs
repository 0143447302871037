//! Client-side save of the image already on display

use std::path::{Path, PathBuf};
use log::{debug, error, info};

const STEM_CHARS: usize = 30;

/// `generated_image_<stem>.png`, where the stem is the first 30
/// characters of the prompt with every non-ASCII-alphanumeric replaced
/// by `_`.
///
/// Characters are Unicode scalar values (`char`), not UTF-16 code
/// units: an emoji outside the BMP takes one stem position, not two.
pub fn download_filename(prompt: &str) -> String
{   let stem: String = prompt
      .chars()
      .take(STEM_CHARS)
      .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
      .collect();
    format!("generated_image_{}.png", stem)
}

/// Write `image` into `dir` under its download filename.
/// Returns the written path.
pub async fn save_image(
  dir: &Path
, image: &crate::LoadedImage
, prompt: &str
) -> Result<PathBuf, crate::error::Error>
{   let path = dir.join(download_filename(prompt));
    debug!("Downloading {} to {}", image.url, path.display());

    tokio::fs::create_dir_all(dir).await.map_err(|e| {
      error!("Cannot create {}: {}", dir.display(), e);
      crate::error::Error::Download(e.to_string())
    })?;
    tokio::fs::write(&path, &image.bytes).await.map_err(|e| {
      error!("Cannot write {}: {}", path.display(), e);
      crate::error::Error::Download(e.to_string())
    })?;

    info!("Saved {} bytes to {}", image.bytes.len(), path.display());
    Ok(path)
}
