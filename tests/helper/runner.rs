//! Fake subprocess runner standing in for the container engine and fallback tool
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use release_check::command::{CommandError, CommandOutput, CommandRunner};

/// Records every invocation and answers with canned output
///
/// - `<engine> exec <name> ... info <pkg>` prints `Version: <v>` for known packages
/// - `<fallback> <project>` prints the configured fallback version
/// - everything else succeeds silently unless the image is marked broken
#[derive(Default)]
pub struct FakeRunner {
    packages: HashMap<String, String>,
    fallback_versions: HashMap<String, String>,
    broken_images: Vec<String>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, package: &str, version: &str) -> Self {
        self.packages
            .insert(package.to_string(), version.to_string());
        self
    }

    pub fn with_fallback(mut self, project: &str, version: &str) -> Self {
        self.fallback_versions
            .insert(project.to_string(), version.to_string());
        self
    }

    pub fn with_broken_image(mut self, image: &str) -> Self {
        self.broken_images.push(image.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations of `program`
    pub fn count(&self, program: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == program)
            .count()
    }

    fn answer(&self, program: &str, args: &[String]) -> CommandOutput {
        if program != "podman" && program != "docker" {
            return match self.fallback_versions.get(args.join(" ").as_str()) {
                Some(version) => CommandOutput::success(&format!("{version}\n")),
                None => CommandOutput::failure(1, "No release found\n"),
            };
        }

        match args.first().map(String::as_str) {
            Some("run") if args.iter().any(|a| self.broken_images.contains(a)) => {
                CommandOutput::failure(125, "manifest unknown\n")
            }
            Some("exec") if args.iter().any(|a| a == "info") => {
                let package = args.last().cloned().unwrap_or_default();
                match self.packages.get(&package) {
                    Some(version) => CommandOutput::success(&format!(
                        "Information for package {package}:\nName           : {package}\nVersion        : {version}\n"
                    )),
                    None => CommandOutput::failure(104, &format!("package '{package}' not found.\n")),
                }
            }
            _ => CommandOutput::success(""),
        }
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        Ok(self.answer(program, args))
    }
}
