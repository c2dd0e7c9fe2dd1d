//! Errors surfaced by CLI commands.

use std::io;
use std::path::PathBuf;

use rect_tiler::{GeometryError, RenderError, TilingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Tiling(#[from] TilingError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("could not read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("invalid JSON input")]
    Json(#[from] serde_json::Error),
    #[error("invalid recipe")]
    Yaml(#[from] serde_yaml::Error),
    #[error("PNG export failed: {0}")]
    Png(String),
    #[error("{0}")]
    Usage(String),
}
