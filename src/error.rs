//! Error types surfaced at construction time.
//!
//! Nothing in the per-tick path fails; these only come out of config
//! loading, controller building and collision geometry setup.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("no ground probe anchor was configured")]
    MissingGroundProbe,
}

#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("collision mesh is empty")]
    EmptyMesh,
    #[error("triangle {triangle} references vertex {index} but only {vertex_count} exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("collision mesh rejected: {0}")]
    InvalidMesh(String),
}
