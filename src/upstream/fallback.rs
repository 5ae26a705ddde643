//! Local fallback for projects the registry cannot answer

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::command::CommandRunner;
use crate::upstream::error::FallbackError;

/// Trait for looking up an upstream version without the registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait FallbackLookup: Send + Sync {
    /// Returns the latest version of `project_name`
    async fn latest_version(&self, project_name: &str) -> Result<String, FallbackError>;
}

/// Runs `<program> <project-name>` and reads the version from stdout
pub struct CommandFallback {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl CommandFallback {
    pub fn new(program: &str, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.to_string(),
            runner,
        }
    }
}

#[async_trait::async_trait]
impl FallbackLookup for CommandFallback {
    async fn latest_version(&self, project_name: &str) -> Result<String, FallbackError> {
        let output = self
            .runner
            .run(&self.program, &[project_name.to_string()])
            .await?;

        if !output.is_success() {
            return Err(FallbackError::ExitStatus {
                program: self.program.clone(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let version = output.stdout.trim();
        if version.is_empty() {
            return Err(FallbackError::EmptyOutput {
                program: self.program.clone(),
                project: project_name.to_string(),
            });
        }

        debug!("{} reported {} for {}", self.program, version, project_name);
        Ok(version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandError, CommandOutput, MockCommandRunner};

    fn fallback_with(runner: MockCommandRunner) -> CommandFallback {
        CommandFallback::new("lastversion", Arc::new(runner))
    }

    #[tokio::test]
    async fn latest_version_returns_trimmed_stdout() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args| program == "lastversion" && args == ["helm".to_string()])
            .times(1)
            .returning(|_, _| Ok(CommandOutput::success("3.14.2\n")));

        let version = fallback_with(runner).latest_version("helm").await.unwrap();

        assert_eq!(version, "3.14.2");
    }

    #[tokio::test]
    async fn latest_version_fails_on_empty_output() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(CommandOutput::success("  \n")));

        let result = fallback_with(runner).latest_version("helm").await;

        assert!(matches!(result, Err(FallbackError::EmptyOutput { .. })));
    }

    #[tokio::test]
    async fn latest_version_fails_on_non_zero_exit() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(CommandOutput::failure(1, "No release found\n")));

        let result = fallback_with(runner).latest_version("nope").await;

        match result {
            Err(FallbackError::ExitStatus { code, stderr, .. }) => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "No release found");
            }
            other => panic!("expected exit status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn latest_version_propagates_spawn_failure() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|program, _| {
            Err(CommandError::Spawn {
                program: program.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        });

        let result = fallback_with(runner).latest_version("helm").await;

        assert!(matches!(result, Err(FallbackError::Command(_))));
    }
}
