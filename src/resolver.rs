use std::path::PathBuf;

use serde_json::Value;
use url::Url;

use crate::error::CompilationError;

/// Turns an absolute URL into a JSON document. The only infrastructure seam
/// in this crate that performs I/O; everything else is pure computation
/// over already-loaded `Value`s.
pub trait UrlFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Value, CompilationError>;
}

/// `http`/`https` via blocking `reqwest` (feature `resolve-http`), `file`
/// via `std::fs` (feature `resolve-file`). Any other scheme, or a `file`
/// fetch that can't find the target, falls back to a classpath-style lookup
/// under `./schemas/<last-path-segment>` relative to the process's current
/// directory — the same trick Java schema validators use for bundling
/// schemas alongside the binary instead of relying on the network.
#[derive(Debug, Default)]
pub struct DefaultUrlFetcher;

impl UrlFetcher for DefaultUrlFetcher {
    fn fetch(&self, url: &Url) -> Result<Value, CompilationError> {
        match url.scheme() {
            #[cfg(feature = "resolve-http")]
            "http" | "https" => fetch_http(url),
            #[cfg(not(feature = "resolve-http"))]
            "http" | "https" => Err(CompilationError::UnresolvableReference(format!(
                "remote fetch disabled (enable the 'resolve-http' feature): {}",
                url
            ))),
            "file" => fetch_file(url).or_else(|err| {
                log::warn!("file fetch of '{}' failed ({}), trying classpath fallback", url, err);
                fetch_classpath(url)
            }),
            other => {
                log::warn!("unknown scheme '{}' for '{}', trying classpath fallback", other, url);
                fetch_classpath(url)
            }
        }
    }
}

#[cfg(feature = "resolve-http")]
fn fetch_http(url: &Url) -> Result<Value, CompilationError> {
    log::debug!("fetching remote schema from {}", url);
    let response = reqwest::blocking::get(url.clone())
        .map_err(|err| CompilationError::UnresolvableReference(err.to_string()))?;
    response
        .json()
        .map_err(|err| CompilationError::UnresolvableReference(err.to_string()))
}

fn fetch_file(url: &Url) -> Result<Value, CompilationError> {
    if !cfg!(feature = "resolve-file") {
        return Err(CompilationError::UnresolvableReference(
            "file fetch disabled (enable the 'resolve-file' feature)".to_string(),
        ));
    }
    let path = url
        .to_file_path()
        .map_err(|_| CompilationError::UnresolvableReference(format!("invalid file URL: {}", url)))?;
    let contents = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn fetch_classpath(url: &Url) -> Result<Value, CompilationError> {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .ok_or_else(|| CompilationError::UnresolvableReference(url.to_string()))?;
    let path: PathBuf = ["schemas", name].iter().collect();
    let contents = std::fs::read_to_string(&path).map_err(|_| {
        CompilationError::UnresolvableReference(format!(
            "could not resolve '{}' (not fetchable, and no './schemas/{}' fallback found)",
            url, name
        ))
    })?;
    Ok(serde_json::from_str(&contents)?)
}
