//! Drives one report run: resolve upstream versions, then walk the images

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, error, info, info_span, warn};

use crate::command::CommandRunner;
use crate::config::{
    DEFAULT_CONTAINER_NAME, DEFAULT_FALLBACK_TOOL, PROJECT_PAUSE_MS, ReportConfig,
};
use crate::container::{ContainerEngine, ContainerHandle, PackageManager};
use crate::project::{ProjectReport, TrackedProject, image_label};
use crate::upstream::fallback::{CommandFallback, FallbackLookup};
use crate::upstream::registry::Registry;
use crate::upstream::resolver::ProjectResolver;

/// Knobs of a report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub images: Vec<String>,
    pub container_name: String,
    pub package_manager: PackageManager,
    pub fallback_tool: String,
    /// Pause between two project resolutions
    pub project_pause: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            container_name: DEFAULT_CONTAINER_NAME.to_string(),
            package_manager: PackageManager::default(),
            fallback_tool: DEFAULT_FALLBACK_TOOL.to_string(),
            project_pause: Duration::from_millis(PROJECT_PAUSE_MS),
        }
    }
}

/// Builds the tracked projects in config order
pub fn tracked_projects(config: &ReportConfig) -> Vec<TrackedProject> {
    config
        .entries()
        .map(|(name, entry)| TrackedProject::new(name, &entry))
        .collect()
}

/// Column labels produced by more than one image, in first-seen order
fn colliding_labels(images: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut colliding = Vec::new();
    for label in images.iter().map(|image| image_label(image)) {
        if !seen.insert(label) && !colliding.contains(&label) {
            colliding.push(label);
        }
    }
    colliding
}

pub struct Orchestrator {
    engine: ContainerEngine,
    settings: RunSettings,
    resolver: ProjectResolver,
    runner: Arc<dyn CommandRunner>,
}

impl Orchestrator {
    /// Wires the resolver with a command-backed fallback tool
    pub fn new(
        engine: ContainerEngine,
        settings: RunSettings,
        registry: Arc<dyn Registry>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        let fallback: Arc<dyn FallbackLookup> =
            Arc::new(CommandFallback::new(&settings.fallback_tool, runner.clone()));
        Self::with_fallback(engine, settings, registry, fallback, runner)
    }

    pub fn with_fallback(
        engine: ContainerEngine,
        settings: RunSettings,
        registry: Arc<dyn Registry>,
        fallback: Arc<dyn FallbackLookup>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            engine,
            settings,
            resolver: ProjectResolver::new(registry, fallback),
            runner,
        }
    }

    /// Resolves every project, then queries every image for every project
    pub async fn run(&mut self, projects: Vec<TrackedProject>) -> Vec<ProjectReport> {
        let mut reports = self.resolve_upstream(projects).await;

        for label in colliding_labels(&self.settings.images) {
            warn!(
                "Several images share the column {}; later images overwrite earlier ones",
                label
            );
        }

        for image in self.settings.images.clone() {
            let span = info_span!("image", image = image_label(&image));
            self.collect_installed(&image, &mut reports)
                .instrument(span)
                .await;
        }

        reports
    }

    /// Upstream versions, one project at a time with a pause in between
    pub async fn resolve_upstream(&mut self, projects: Vec<TrackedProject>) -> Vec<ProjectReport> {
        let mut reports = Vec::with_capacity(projects.len());

        for (index, project) in projects.into_iter().enumerate() {
            if index > 0 && !self.settings.project_pause.is_zero() {
                tokio::time::sleep(self.settings.project_pause).await;
            }
            info!("Processing project: {}", project.name);
            let upstream = self.resolver.resolve(&project).await;
            reports.push(ProjectReport::new(project, upstream));
        }

        reports
    }

    /// Fresh container for `image`; every project gets an entry, null on failure
    async fn collect_installed(&self, image: &str, reports: &mut [ProjectReport]) {
        let label = image_label(image);
        let container = ContainerHandle::new(
            self.engine,
            self.settings.package_manager,
            &self.settings.container_name,
            image,
            self.runner.clone(),
        );

        match container.start().await {
            Ok(()) => {
                for report in reports.iter_mut() {
                    let version = container
                        .query_package_version(&report.project.package_name)
                        .await;
                    report.record_installed(label, version);
                }
            }
            Err(e) => {
                error!("Failed to start container from {}: {}", image, e);
                for report in reports.iter_mut() {
                    report.record_installed(label, None);
                }
            }
        }

        container.stop().await;
    }
}
