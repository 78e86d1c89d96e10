use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// A named ONNX model and where to fetch it from.
#[derive(Clone, Copy, Debug)]
pub struct ModelSource {
    pub name: &'static str,
    pub url: &'static str,
}

/// Locates a model file, downloading it into the user cache when missing.
///
/// Resolution order:
/// 1. User cache directory (platform-specific)
/// 2. Each of `search_dirs`, in order
/// 3. Download from the model URL to the cache
pub fn resolve(
    model: ModelSource,
    search_dirs: &[PathBuf],
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    resolve_in(&model_cache_dir()?, model, search_dirs, progress)
}

/// Same as [`resolve`] with an explicit cache directory.
pub fn resolve_in(
    cache_dir: &Path,
    model: ModelSource,
    search_dirs: &[PathBuf],
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(found) = find_local(cache_dir, model.name, search_dirs) {
        return Ok(found);
    }

    log::info!("Model {} not found locally, downloading", model.name);
    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    let cached_path = cache_dir.join(model.name);
    download(model.url, &cached_path, progress)?;
    Ok(cached_path)
}

fn find_local(cache_dir: &Path, name: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    std::iter::once(cache_dir)
        .chain(search_dirs.iter().map(PathBuf::as_path))
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/FaceLock/models/`
/// - Linux: `$XDG_CACHE_HOME/FaceLock/models/` or `~/.cache/FaceLock/models/`
/// - Windows: `%LOCALAPPDATA%/FaceLock/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("FaceLock").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("FaceLock").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");

    let result = stream_to(url, dest, &temp_path, progress);

    // Clean up .part file on any error
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn stream_to(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), ModelResolveError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ModelResolveError::Write { path, source }
    };

    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| ModelResolveError::Download {
            url: url.to_string(),
            source,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;
    let mut file = fs::File::create(temp_path).map_err(write_err(temp_path))?;

    // Models run to 100MB+; stream in chunks rather than buffering.
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = response.read(&mut buf).map_err(write_err(temp_path))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err(temp_path))?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(write_err(temp_path))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(write_err(dest))?;
    Ok(())
}
