//! External documentation generator as a capability interface.
//!
//! The generator is a black box: it is launched against the package entry
//! point and signals completion only by the output directory appearing on
//! disk, so the pipeline waits with a bounded poll.

use async_trait::async_trait;
use std::path::Path;
use std::process::Command;
use tracing::{error, info};

use crate::config::GeneratorConfig;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Error type for the generator capability (boxed, like the git side).
pub type GenerateError = Box<dyn std::error::Error + Send + Sync>;

/// Launches documentation generation. Implemented by the real command runner
/// and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocGenerator: Send + Sync {
    /// Start generating documentation for `entry_point` into `out_dir`,
    /// titled `title`. Completion is signalled asynchronously by `out_dir`
    /// appearing on disk; see [`wait_for_output`].
    async fn generate(
        &self,
        entry_point: &Path,
        out_dir: &Path,
        title: &str,
    ) -> Result<(), GenerateError>;
}

/// Real generator: spawns the configured external program, detached.
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
}

impl CommandRunner {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

#[async_trait]
impl DocGenerator for CommandRunner {
    async fn generate(
        &self,
        entry_point: &Path,
        out_dir: &Path,
        title: &str,
    ) -> Result<(), GenerateError> {
        // `<program> --out <out_dir> --name <title> [extra args] <entry_point>`
        let mut command = Command::new(&self.program);
        command
            .arg("--out")
            .arg(out_dir)
            .arg("--name")
            .arg(title)
            .args(&self.args)
            .arg(entry_point);

        match command.spawn() {
            Ok(child) => {
                info!(
                    program = %self.program,
                    pid = child.id(),
                    entry_point = %entry_point.display(),
                    out_dir = %out_dir.display(),
                    "Launched documentation generator"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    error = ?e,
                    program = %self.program,
                    "Failed to launch documentation generator"
                );
                Err(Box::new(e))
            }
        }
    }
}

/// Wait for the generator's output directory to appear: one try per poll
/// interval, up to the configured bound. Exceeding the bound is fatal.
pub async fn wait_for_output(out_dir: &Path, config: &GeneratorConfig) -> Result<(), String> {
    for attempt in 1..=config.detection_tries {
        tokio::time::sleep(config.poll_interval).await;

        if out_dir.exists() {
            info!(
                attempt,
                path = %out_dir.display(),
                "Documentation folder detected"
            );
            return Ok(());
        }

        info!(
            "Try {}/{} to detect documentation folder...",
            attempt, config.detection_tries
        );
    }

    error!(
        tries = config.detection_tries,
        path = %out_dir.display(),
        "Documentation folder never appeared"
    );
    Err(format!(
        "Unable to detect documentation folder after {} tries.",
        config.detection_tries
    ))
}
