//! One short-lived container bound to a name and an image

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::{CommandError, CommandRunner};
use crate::config::CONTAINER_LIFETIME_SECS;
use crate::container::engine::ContainerEngine;
use crate::container::package_manager::{PackageManager, parse_version};

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("No supported container engine found (install podman or docker)")]
    NoEngine,

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("{engine} {action} returned status {code:?}: {stderr}")]
    Failed {
        engine: ContainerEngine,
        action: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Handle on a detached container used to query package versions
pub struct ContainerHandle {
    engine: ContainerEngine,
    package_manager: PackageManager,
    name: String,
    image: String,
    lifetime_secs: u64,
    runner: Arc<dyn CommandRunner>,
}

impl ContainerHandle {
    pub fn new(
        engine: ContainerEngine,
        package_manager: PackageManager,
        name: &str,
        image: &str,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            engine,
            package_manager,
            name: name.to_string(),
            image: image.to_string(),
            lifetime_secs: CONTAINER_LIFETIME_SECS,
            runner,
        }
    }

    /// Launches the container and refreshes its package index
    ///
    /// The container runs `sleep` with a fixed ceiling so it goes away on its
    /// own if [`ContainerHandle::stop`] is never reached. A container left
    /// behind under the same name is removed first. Only a failed `run` is an
    /// error; a failed refresh is logged and the index is queried as it is.
    pub async fn start(&self) -> Result<(), ContainerError> {
        info!("Launching {} based container", self.image);
        self.remove_stale().await;

        let args = self.args(&[
            "run",
            "--rm",
            "--name",
            &self.name,
            "-d",
            &self.image,
            "sleep",
            &self.lifetime_secs.to_string(),
        ]);
        self.run_checked("run", &args).await?;

        let refresh = self.exec_args(self.package_manager.refresh_command());
        if let Err(e) = self.run_checked("refresh", &refresh).await {
            warn!("Package index refresh failed in {}: {}", self.image, e);
        }
        Ok(())
    }

    /// Installed (or installable) version of `package`, `None` when unknown
    pub async fn query_package_version(&self, package: &str) -> Option<String> {
        let args = self.exec_args(self.package_manager.info_command(package));

        let output = match self.runner.run(self.engine.program(), &args).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Unable to query {} in {}: {}", package, self.image, e);
                return None;
            }
        };

        let combined = output.combined();
        match parse_version(&combined) {
            Ok(version) => {
                debug!("{} in {}: {}", package, self.image, version);
                Some(version)
            }
            Err(e) => {
                warn!(
                    "Unable to parse package manager output for {} ({}): {:?}",
                    package, e, combined
                );
                None
            }
        }
    }

    /// Force-removes the container; failures are only logged
    pub async fn stop(&self) {
        let args = self.args(&["rm", "-f", &self.name]);
        match self.runner.run(self.engine.program(), &args).await {
            Ok(output) if output.is_success() => debug!("Removed container {}", self.name),
            Ok(output) => warn!(
                "Could not remove {} (may not exist): {}",
                self.name,
                output.stderr.trim()
            ),
            Err(e) => warn!("Could not remove {}: {}", self.name, e),
        }
    }

    async fn remove_stale(&self) {
        let args = self.args(&["rm", "-f", &self.name]);
        match self.runner.run(self.engine.program(), &args).await {
            Ok(output) if output.is_success() => {}
            Ok(output) => debug!("No stale container {}: {}", self.name, output.stderr.trim()),
            Err(e) => debug!("Could not clear stale container {}: {}", self.name, e),
        }
    }

    fn args(&self, args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    fn exec_args(&self, command: Vec<String>) -> Vec<String> {
        let mut args = vec!["exec".to_string(), self.name.clone()];
        args.extend(command);
        args
    }

    async fn run_checked(&self, action: &str, args: &[String]) -> Result<(), ContainerError> {
        let output = self.runner.run(self.engine.program(), args).await?;
        if output.is_success() {
            return Ok(());
        }

        Err(ContainerError::Failed {
            engine: self.engine,
            action: action.to_string(),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}
