use thiserror::Error;

use crate::command::CommandError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Registry returned status {status} for '{url}'")]
    Status { status: u16, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("{program} exited with status {code:?}: {stderr}")]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} printed no version for {project}")]
    EmptyOutput { program: String, project: String },
}
