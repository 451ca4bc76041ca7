use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Fully merged runtime configuration for the documentation pipeline.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishConfig {
    pub package: PackageMetadata,
    pub paths: DocPaths,
    pub generator: GeneratorConfig,
    pub wiki: WikiConfig,
}

impl PublishConfig {
    pub fn trace_loaded(&self) {
        info!(
            package = %self.package.name,
            version = %self.package.version,
            docs_root = %self.paths.root.display(),
            "Loaded PublishConfig"
        );
        debug!(?self, "PublishConfig loaded (full debug)");
    }
}

/// Project metadata read from the manifest: identifies the release being documented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub display_name: String,
    pub version: String,
}

impl PackageMetadata {
    /// Documentation title the generator stamps on its output,
    /// e.g. `"My Package - 1.2.0"`.
    pub fn versioned_display_name(&self) -> String {
        format!("{} - {}", self.display_name, self.version)
    }
}

/// Well-known filesystem locations all pipeline stages agree upon.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocPaths {
    /// Documentation root folder, e.g. `docs/`.
    pub root: PathBuf,
    /// Source entry point handed to the documentation generator.
    pub entry_point: PathBuf,
}

impl DocPaths {
    /// Raw generator output lands here, then is deleted after transformation.
    pub fn generation_dir(&self) -> PathBuf {
        self.root.join(".tmp")
    }

    /// Transformed files for one release.
    pub fn versioned_dir(&self, version: &str) -> PathBuf {
        self.root.join(version)
    }

    /// Local clone of the companion wiki repository.
    pub fn wiki_dir(&self) -> PathBuf {
        self.root.join(".github-wiki")
    }
}

/// How to invoke the external documentation generator and how long to wait
/// for its output folder to appear.
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub program: String,
    pub args: Vec<String>,
    pub poll_interval: Duration,
    pub detection_tries: u32,
}

impl GeneratorConfig {
    pub fn trace_loaded(&self) {
        info!(
            program = %self.program,
            detection_tries = self.detection_tries,
            "Loaded GeneratorConfig"
        );
    }
}

/// Publication target: the project repository whose companion wiki receives
/// the documentation.
#[derive(Serialize, Deserialize)]
pub struct WikiConfig {
    /// Must be a Github repository URL ending in `.git` (not the wiki itself).
    pub repo_url: String,
    /// Optional token embedded in the clone URL for authenticated pushes.
    pub token: Option<String>,
}

impl WikiConfig {
    pub fn trace_loaded(&self) {
        info!(
            repo_url = %self.repo_url,
            token_present = self.token.is_some(),
            "Loaded WikiConfig"
        );
    }
}

// Hand-written so full-debug config dumps never expose the token.
impl std::fmt::Debug for WikiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikiConfig")
            .field("repo_url", &self.repo_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}
