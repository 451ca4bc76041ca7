use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

use crate::config::{DocPaths, GeneratorConfig, PackageMetadata, PublishConfig, WikiConfig};

#[derive(Deserialize)]
struct StaticConfig {
    package: PackageSection,
    documentation: DocumentationSection,
    #[serde(default)]
    generator: GeneratorSection,
    wiki: WikiSection,
}

#[derive(Deserialize)]
struct PackageSection {
    name: String,
    display_name: String,
    version: String,
}

#[derive(Deserialize)]
struct DocumentationSection {
    root: PathBuf,
    entry_point: PathBuf,
}

#[derive(Deserialize)]
struct GeneratorSection {
    #[serde(default = "default_program")]
    program: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default = "default_poll_interval_secs")]
    poll_interval_secs: u64,
    #[serde(default = "default_detection_tries")]
    detection_tries: u32,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        GeneratorSection {
            program: default_program(),
            args: Vec::new(),
            poll_interval_secs: default_poll_interval_secs(),
            detection_tries: default_detection_tries(),
        }
    }
}

fn default_program() -> String {
    "typedoc".to_string()
}

fn default_poll_interval_secs() -> u64 {
    1
}

fn default_detection_tries() -> u32 {
    10
}

#[derive(Deserialize)]
struct WikiSection {
    repo_url: String,
}

/// Loads a static YAML config file (no secrets) and injects the optional
/// `GITHUB_TOKEN` env var for authenticated wiki pushes.
/// Returns a fully merged PublishConfig or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PublishConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    // The token is optional: without it, cloning works for public wikis but
    // pushing will be rejected by the remote.
    let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    if token.is_some() {
        info!("GITHUB_TOKEN found in env");
    } else {
        info!("No GITHUB_TOKEN in env, wiki remote will be unauthenticated");
    }

    let config = PublishConfig {
        package: PackageMetadata {
            name: static_conf.package.name,
            display_name: static_conf.package.display_name,
            version: static_conf.package.version,
        },
        paths: DocPaths {
            root: static_conf.documentation.root,
            entry_point: static_conf.documentation.entry_point,
        },
        generator: GeneratorConfig {
            program: static_conf.generator.program,
            args: static_conf.generator.args,
            poll_interval: Duration::from_secs(static_conf.generator.poll_interval_secs),
            detection_tries: static_conf.generator.detection_tries,
        },
        wiki: WikiConfig {
            repo_url: static_conf.wiki.repo_url,
            token,
        },
    };

    config.trace_loaded();
    config.generator.trace_loaded();
    config.wiki.trace_loaded();

    Ok(config)
}
