//! CLI subcommands
//!
//! `detect` and `build` map onto the two phases the external orchestrator
//! invokes in strict sequence.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use crate::cli::output::{self, status};
use crate::config::defaults::{DETECT_OPT_OUT_EXIT, LAUNCH_FILE};
use crate::config::distribution::DistributionManifest;
use crate::core::build::Builder;
use crate::core::detect::detect;
use crate::core::env::BuildEnv;
use crate::core::launch::LaunchFile;
use crate::infra::download::{HttpFetcher, ProgressCallback};
use crate::infra::exec::SystemExecutor;
use crate::infra::layer::DirLayerManager;

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decide whether this buildpack applies to the current deployment
    ///
    /// Exits 0 when opting in, 100 when opting out.
    Detect,

    /// Install the GraalVM toolchain and declare the launch command
    Build {
        /// Directory holding the function sources
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Root directory for cached toolchain layers
        #[arg(long)]
        layers: Option<PathBuf>,

        /// Distribution manifest overriding the built-in SDK pin
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the subcommand
    pub async fn run(self, quiet: bool) -> Result<()> {
        match self {
            Commands::Detect => run_detect(quiet),
            Commands::Build {
                project_dir,
                layers,
                manifest,
            } => run_build(project_dir, layers, manifest, quiet).await,
        }
    }
}

fn run_detect(quiet: bool) -> Result<()> {
    let env = BuildEnv::from_process();
    let result = detect(&env);

    if !quiet {
        println!("{} {}", status::INFO, result.reason());
    }
    if !result.is_opt_in() {
        std::process::exit(DETECT_OPT_OUT_EXIT);
    }
    Ok(())
}

async fn run_build(
    project_dir: PathBuf,
    layers: Option<PathBuf>,
    manifest: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let env = BuildEnv::from_process();
    let manifest = DistributionManifest::load_or_default(manifest.as_deref())
        .context("loading distribution manifest")?;
    info!(version = %manifest.version, "building with pinned SDK distribution");

    let layer_manager = DirLayerManager::new(layers.unwrap_or_else(default_layers_root));
    let executor = SystemExecutor::new();
    let fetcher = HttpFetcher::new();

    let mut builder = Builder::new(&env, &layer_manager, &executor, &fetcher)
        .with_manifest(manifest)
        .with_project_dir(project_dir.clone());
    if !quiet {
        builder = builder.with_progress(download_progress());
    }

    let result = builder.execute().await?;

    let launch_path = project_dir.join(LAUNCH_FILE);
    LaunchFile::web(&result.launch)
        .write(&launch_path)
        .context("writing launch declaration")?;

    if !quiet {
        println!(
            "{} toolchain layer at {}",
            status::SUCCESS,
            result.layer.path.display()
        );
        if result.compiled {
            println!("{} native compilation complete", status::SUCCESS);
        } else {
            println!("{} no project descriptor, compilation skipped", status::INFO);
        }
        println!(
            "{} launch command: {}",
            status::SUCCESS,
            result.launch.command.join(" ")
        );
    }

    Ok(())
}

/// Default layers root under the user cache directory
fn default_layers_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("graalpack")
        .join("layers")
}

/// Progress callback rendering an indicatif download bar
fn download_progress() -> ProgressCallback {
    let bar = output::create_download_bar(0);
    Box::new(move |downloaded, total| {
        if bar.length() != Some(total) {
            bar.set_length(total);
        }
        bar.set_position(downloaded);
        if total > 0 && downloaded >= total {
            bar.finish_and_clear();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layers_root_is_under_graalpack() {
        let root = default_layers_root();
        assert!(root.ends_with("graalpack/layers"));
    }
}
