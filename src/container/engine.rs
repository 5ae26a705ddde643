use std::fmt;

use clap::ValueEnum;

/// Container engines the tool can drive, in preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContainerEngine {
    Podman,
    Docker,
}

impl ContainerEngine {
    pub const PREFERENCE: [ContainerEngine; 2] =
        [ContainerEngine::Podman, ContainerEngine::Docker];

    /// Executable name on the host
    pub fn program(&self) -> &'static str {
        match self {
            ContainerEngine::Podman => "podman",
            ContainerEngine::Docker => "docker",
        }
    }
}

impl fmt::Display for ContainerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Returns the first engine in preference order for which `is_available` holds
pub fn select_engine<F>(is_available: F) -> Option<ContainerEngine>
where
    F: Fn(&str) -> bool,
{
    ContainerEngine::PREFERENCE
        .into_iter()
        .find(|engine| is_available(engine.program()))
}

/// The forced engine if it is available, otherwise the first available one
///
/// A forced engine that is not installed yields `None`; there is no fallback
/// to another engine in that case.
pub fn resolve_engine<F>(
    forced: Option<ContainerEngine>,
    is_available: F,
) -> Option<ContainerEngine>
where
    F: Fn(&str) -> bool,
{
    match forced {
        Some(engine) => is_available(engine.program()).then_some(engine),
        None => select_engine(is_available),
    }
}
