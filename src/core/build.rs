//! Build phase
//!
//! Orchestrates the toolchain installation for an opted-in function build:
//! resolve the function target, provision the cached SDK layer, install the
//! distribution and its native-image component, bind `JAVA_HOME`, compile
//! through the Maven native profile when a project descriptor is present,
//! and register the launch command.
//!
//! The sequence is strictly ordered and fail-fast. Every step completes
//! (blocking on external processes) before the next begins; the first failure
//! aborts the remainder with no retries.

use std::path::PathBuf;

use tracing::info;

use crate::config::defaults::{
    FUNCTION_TARGET_ENV, GU_RELATIVE_PATH, JAVA_HOME_ENV, LAYER_NAME, MAVEN_DESCRIPTOR,
    MAVEN_NATIVE_PROFILE, NATIVE_IMAGE_COMPONENT,
};
use crate::config::distribution::DistributionManifest;
use crate::core::env::BuildEnv;
use crate::core::launch::LaunchCommand;
use crate::error::{BuildError, DownloadError};
use crate::infra::archive::extract_tar_gz;
use crate::infra::download::{Fetcher, ProgressCallback};
use crate::infra::exec::{resolve_tool, ExecSpec, ProcessExecutor};
use crate::infra::layer::{Layer, LayerFlags, LayerManager};

/// Step attribution for external-command failures
const STEP_INSTALL_NATIVE_IMAGE: &str = "install-native-image";
/// Step attribution for the Maven invocation
const STEP_COMPILE: &str = "compile";

/// File name the SDK archive is staged under inside the layer
const SDK_ARCHIVE_NAME: &str = "sdk.tar.gz";

/// Progress of a build through its step sequence.
///
/// Failure from any state transitions to [`BuildState::Failed`];
/// [`BuildState::LaunchRegistered`] and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Init,
    TargetResolved,
    LayerReady,
    SdkInstalled,
    CompilerInstalled,
    EnvBound,
    CompiledOrSkipped,
    LaunchRegistered,
    Failed,
}

/// Output of a successful build.
#[derive(Debug)]
pub struct BuildResult {
    /// The declared launch command
    pub launch: LaunchCommand,
    /// The provisioned toolchain layer
    pub layer: Layer,
    /// Environment variables exported for downstream steps and the runtime
    pub exported: Vec<(String, String)>,
    /// Whether native compilation ran (a project descriptor was present)
    pub compiled: bool,
}

/// Build orchestrator.
///
/// All collaborators are injected: the layer manager owns cache policy, the
/// executor runs attributed commands, the fetcher performs the HTTPS
/// download. The builder itself never touches process environment.
pub struct Builder<'a> {
    env: &'a BuildEnv,
    layers: &'a dyn LayerManager,
    executor: &'a dyn ProcessExecutor,
    fetcher: &'a dyn Fetcher,
    manifest: DistributionManifest,
    project_dir: PathBuf,
    progress: Option<ProgressCallback>,
    state: BuildState,
}

impl<'a> Builder<'a> {
    /// Create a builder over an environment snapshot and its collaborators
    pub fn new(
        env: &'a BuildEnv,
        layers: &'a dyn LayerManager,
        executor: &'a dyn ProcessExecutor,
        fetcher: &'a dyn Fetcher,
    ) -> Self {
        Self {
            env,
            layers,
            executor,
            fetcher,
            manifest: DistributionManifest::default(),
            project_dir: PathBuf::from("."),
            progress: None,
            state: BuildState::Init,
        }
    }

    /// Override the pinned SDK distribution
    #[must_use]
    pub fn with_manifest(mut self, manifest: DistributionManifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Set the project directory holding the function sources
    #[must_use]
    pub fn with_project_dir(mut self, dir: PathBuf) -> Self {
        self.project_dir = dir;
        self
    }

    /// Report download progress through the given callback
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Current position in the step sequence
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Run the build sequence to completion.
    ///
    /// Exactly one launch command is registered per successful build.
    pub async fn execute(&mut self) -> Result<BuildResult, BuildError> {
        match self.run().await {
            Ok(result) => Ok(result),
            Err(e) => {
                self.state = BuildState::Failed;
                Err(e)
            }
        }
    }

    async fn run(&mut self) -> Result<BuildResult, BuildError> {
        // Must fail before any expensive or externally visible action so a
        // misconfigured deploy costs nothing to diagnose.
        let target = self.resolve_target()?;
        self.state = BuildState::TargetResolved;

        let layer = self
            .layers
            .create_or_resolve(LAYER_NAME, LayerFlags::cached_build())?;
        self.state = BuildState::LayerReady;

        self.install_sdk(&layer).await?;
        self.state = BuildState::SdkInstalled;

        self.install_native_image(&layer).await?;
        // The layer becomes cache-restorable only now that the full install
        // sequence has completed; a failure above leaves it uncommitted and
        // the next build reinstalls from scratch.
        self.layers.commit(&layer)?;
        self.state = BuildState::CompilerInstalled;

        let exported = vec![(
            JAVA_HOME_ENV.to_string(),
            layer.path.display().to_string(),
        )];
        info!(
            "{JAVA_HOME_ENV}={} bound for downstream tool invocations",
            layer.path.display()
        );
        self.state = BuildState::EnvBound;

        let compiled = self.compile_if_requested(&exported).await?;
        self.state = BuildState::CompiledOrSkipped;

        let launch = LaunchCommand::invoker(&target);
        info!(command = ?launch.command, "registered launch command");
        self.state = BuildState::LaunchRegistered;

        Ok(BuildResult {
            launch,
            layer,
            exported,
            compiled,
        })
    }

    /// Step 1: read the function target from the environment snapshot
    fn resolve_target(&self) -> Result<String, BuildError> {
        self.env
            .get(FUNCTION_TARGET_ENV)
            .map(String::from)
            .ok_or(BuildError::MissingConfiguration {
                variable: FUNCTION_TARGET_ENV.to_string(),
            })
    }

    /// Step 3: fetch and extract the SDK distribution into the layer.
    ///
    /// Skipped when the layer manager restored the layer from a prior build;
    /// the builder trusts that report and never inspects the layer contents
    /// itself.
    async fn install_sdk(&mut self, layer: &Layer) -> Result<(), BuildError> {
        if layer.from_cache {
            info!(layer = %layer.name, "layer restored from cache, skipping SDK install");
            return Ok(());
        }

        info!(version = %self.manifest.version, "installing GraalVM SDK");

        let archive_path = layer.path.join(SDK_ARCHIVE_NAME);
        let result = self
            .fetcher
            .fetch(&self.manifest.url, &archive_path, self.progress.take())
            .await?;

        if let Some(ref expected) = self.manifest.sha256 {
            if !result.checksum.eq_ignore_ascii_case(expected) {
                return Err(BuildError::Download(DownloadError::ChecksumMismatch {
                    url: self.manifest.url.clone(),
                    expected: expected.clone(),
                    actual: result.checksum,
                }));
            }
        }

        // The distribution ships under a single versioned directory; strip it
        // so the SDK lands at the layer root.
        extract_tar_gz(&archive_path, &layer.path, 1)?;
        let _ = std::fs::remove_file(&archive_path);

        Ok(())
    }

    /// Step 4: install the ahead-of-time compiler component.
    ///
    /// Depends on the files placed by [`Self::install_sdk`]; a cache-restored
    /// layer already carries the component.
    async fn install_native_image(&self, layer: &Layer) -> Result<(), BuildError> {
        if layer.from_cache {
            return Ok(());
        }

        let gu = layer.path.join(GU_RELATIVE_PATH);
        // This invocation is the buildpack's own, not the user project's
        let spec = ExecSpec::buildpack(
            gu.display().to_string(),
            &["install", NATIVE_IMAGE_COMPONENT],
        );
        self.executor
            .run(&spec)
            .await
            .map_err(|source| BuildError::Command {
                step: STEP_INSTALL_NATIVE_IMAGE,
                source,
            })?;
        Ok(())
    }

    /// Step 6: compile through the Maven native profile when a project
    /// descriptor exists. Absence is not an error; the function framework's
    /// interpreted invocation path serves instead.
    async fn compile_if_requested(
        &self,
        exported: &[(String, String)],
    ) -> Result<bool, BuildError> {
        if !self.project_dir.join(MAVEN_DESCRIPTOR).exists() {
            info!("no {MAVEN_DESCRIPTOR} found, skipping native compilation");
            return Ok(false);
        }

        let mvn = resolve_tool("mvn");
        let mut spec = ExecSpec::user(mvn, &["package", "-P", MAVEN_NATIVE_PROFILE])
            .with_cwd(self.project_dir.clone());
        for (key, value) in exported {
            spec = spec.with_env(key, value);
        }

        self.executor
            .run(&spec)
            .await
            .map_err(|source| BuildError::Command {
                step: STEP_COMPILE,
                source,
            })?;
        Ok(true)
    }
}
