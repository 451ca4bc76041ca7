//! Coordinating module for the clean-generate-transform-clone-copy-publish
//! pipeline.
//!
//! Stages run strictly in sequence and fail fast: a failure at any stage
//! aborts the whole run, and re-running restarts from the clean stage. There
//! is no rollback of already completed stages (a failed push leaves the local
//! commit and the cloned checkout behind).

use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::config::PublishConfig;
use crate::document::{collect_markdown_files, DocumentationFile};
use crate::generate::{wait_for_output, DocGenerator};
use crate::vcs::{CommitAuthor, GitOps};

/// Author used when the local git configuration has no name set.
const FALLBACK_AUTHOR_NAME: &str = "[TASK] wiki-publish - Documentation publication";

/// Outcome of a successful publication run.
#[derive(Debug, Serialize)]
pub struct PublishReport {
    pub version: String,
    pub files: Vec<PublishedFileReport>,
}

#[derive(Debug, Serialize)]
pub struct PublishedFileReport {
    pub file_name: String,
}

/// Entrypoint: run the full publication pipeline.
pub async fn publish<G, V>(
    config: &PublishConfig,
    generator: &G,
    git: &V,
) -> Result<PublishReport, String>
where
    G: DocGenerator,
    V: GitOps,
{
    info!("[PUBLISH] Starting full publication pipeline");

    // Pre-flight: a malformed repository URL must fail before any work is done.
    let remote_url = wiki_remote_url(config)?;

    clean(config)?;
    generate_documentation(config, generator).await?;
    transform_documentation(config)?;
    clone_wiki(config, git, &remote_url).await?;
    let copied = copy_documentation(config)?;
    publish_documentation(config, git).await?;

    let report = PublishReport {
        version: config.package.version.clone(),
        files: copied
            .into_iter()
            .map(|file_name| PublishedFileReport { file_name })
            .collect(),
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => debug!(json = %json, "[PUBLISH][DEBUG] Final report as JSON"),
        Err(e) => error!(error = ?e, "[PUBLISH][DEBUG] Failed to serialize report as JSON"),
    }

    Ok(report)
}

/// Generate and transform without touching any remote: clean, run the
/// generator, rewrite and relocate the output. Returns the written files.
pub async fn document<G>(config: &PublishConfig, generator: &G) -> Result<Vec<PathBuf>, String>
where
    G: DocGenerator,
{
    info!("[DOCUMENT] Starting documentation transformation pipeline");
    clean(config)?;
    generate_documentation(config, generator).await?;
    transform_documentation(config)
}

/// Remove prior pipeline output directories. Absence is not an error.
pub fn clean(config: &PublishConfig) -> Result<(), String> {
    let folders = [
        config.paths.generation_dir(),
        config.paths.versioned_dir(&config.package.version),
        config.paths.wiki_dir(),
    ];

    for folder in folders {
        if folder.exists() {
            fs::remove_dir_all(&folder).map_err(|e| {
                error!(error = ?e, path = %folder.display(), "[CLEAN][ERROR] Failed to remove folder");
                format!("Failed to remove {}: {}", folder.display(), e)
            })?;
            info!(path = %folder.display(), "[CLEAN] Removed folder");
        }
    }

    Ok(())
}

/// Launch the external generator and wait (bounded) for its output folder.
pub async fn generate_documentation<G>(config: &PublishConfig, generator: &G) -> Result<(), String>
where
    G: DocGenerator,
{
    let out_dir = config.paths.generation_dir();
    let title = config.package.versioned_display_name();

    info!(
        entry_point = %config.paths.entry_point.display(),
        out_dir = %out_dir.display(),
        "[GENERATE] Invoking documentation generator"
    );
    generator
        .generate(&config.paths.entry_point, &out_dir, &title)
        .await
        .map_err(|e| {
            error!(error = ?e, "[GENERATE][ERROR] Generator failed to start");
            format!("Documentation generation failed to start: {}", e)
        })?;

    wait_for_output(&out_dir, &config.generator).await?;
    info!(
        version = %config.package.version,
        "Documentation folder for version {} detected.",
        config.package.version
    );
    Ok(())
}

/// Rewrite and relocate every generated markdown file (the generator's own
/// `README.md` excluded) into the versioned folder, then delete the raw
/// generation folder. Returns the written destination paths.
pub fn transform_documentation(config: &PublishConfig) -> Result<Vec<PathBuf>, String> {
    let generation_dir = config.paths.generation_dir();
    let version = &config.package.version;
    let versioned_dir = config.paths.versioned_dir(version);

    fs::create_dir_all(&config.paths.root)
        .map_err(|e| format!("Failed to create documentation root: {}", e))?;
    // Must not exist post-clean; an existing versioned folder is an error.
    fs::create_dir(&versioned_dir).map_err(|e| {
        error!(error = ?e, path = %versioned_dir.display(), "[TRANSFORM][ERROR] Failed to create versioned folder");
        format!(
            "Failed to create versioned folder {}: {}",
            versioned_dir.display(),
            e
        )
    })?;

    let mut markdown_files = Vec::new();
    collect_markdown_files(&generation_dir, &mut markdown_files)
        .map_err(|e| format!("Failed to enumerate generated documentation: {:?}", e))?;

    let mut written = Vec::new();
    for path in markdown_files {
        if path.file_name().and_then(|n| n.to_str()) == Some("README.md") {
            debug!(path = %path.display(), "[TRANSFORM] Skipping generator README");
            continue;
        }

        let mut documentation_file = DocumentationFile::load(&path, &generation_dir)
            .map_err(|e| format!("Failed to load {}: {:?}", path.display(), e))?;
        documentation_file.rewrite_links(&config.package);
        let destination = documentation_file
            .save(&versioned_dir, version)
            .map_err(|e| format!("Failed to save {}: {:?}", path.display(), e))?;
        written.push(destination);
    }

    fs::remove_dir_all(&generation_dir)
        .map_err(|e| format!("Failed to remove generation folder: {}", e))?;

    info!(
        files = written.len(),
        version = %version,
        "[TRANSFORM] Documentation transformed into versioned folder"
    );
    Ok(written)
}

/// Validate the configured repository URL and derive the authenticated wiki
/// remote from it. The URL must point at the Github repository, not its wiki.
pub fn wiki_remote_url(config: &PublishConfig) -> Result<String, String> {
    let repo_url = config.wiki.repo_url.as_str();
    // Only the `.git` suffix changes; the input scheme is preserved.
    let (scheme, rest) = if let Some(rest) = repo_url.strip_prefix("https://") {
        ("https", rest)
    } else if let Some(rest) = repo_url.strip_prefix("http://") {
        ("http", rest)
    } else {
        return Err(format!(
            "Repository URL is not a valid http(s) URL: {}",
            repo_url
        ));
    };

    let (host, path) = rest
        .split_once('/')
        .ok_or_else(|| format!("Repository URL has no path: {}", repo_url))?;

    let repo_path = path
        .strip_suffix(".git")
        .ok_or_else(|| "Repository URL must finish by '.git'.".to_string())?;
    if host != "github.com" {
        return Err("Wiki documentation is only available for Github.".to_string());
    }

    let wiki_path = format!("{}.wiki.git", repo_path);

    // The owner (first path segment) doubles as the username when a token is
    // present. The token never reaches the logs.
    match &config.wiki.token {
        Some(token) => {
            let owner = wiki_path.split('/').next().unwrap_or_default();
            Ok(format!(
                "{}://{}:{}@github.com/{}",
                scheme, owner, token, wiki_path
            ))
        }
        None => Ok(format!("{}://github.com/{}", scheme, wiki_path)),
    }
}

/// Create the wiki checkout directory and clone the wiki remote into it.
pub async fn clone_wiki<V>(
    config: &PublishConfig,
    git: &V,
    remote_url: &str,
) -> Result<(), String>
where
    V: GitOps,
{
    let wiki_dir = config.paths.wiki_dir();
    fs::create_dir_all(&wiki_dir)
        .map_err(|e| format!("Failed to create wiki checkout folder: {}", e))?;

    info!(repo_url = %config.wiki.repo_url, path = %wiki_dir.display(), "[CLONE] Cloning wiki");
    git.clone_into(remote_url, &wiki_dir).await.map_err(|e| {
        error!(error = ?e, "[CLONE][ERROR] Clone failed");
        format!("Something went wrong while cloning the repo: {}", e)
    })
}

/// Copy every transformed file into the wiki checkout root, flat by basename.
///
/// Guard invariant: if any file in the checkout already starts with the
/// current version string, the version has been published before and the
/// copy aborts without touching anything.
pub fn copy_documentation(config: &PublishConfig) -> Result<Vec<String>, String> {
    let version = &config.package.version;
    let wiki_dir = config.paths.wiki_dir();
    let versioned_dir = config.paths.versioned_dir(version);

    let existing = fs::read_dir(&wiki_dir)
        .map_err(|e| format!("Failed to read wiki checkout: {}", e))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(|n| n.to_string()))
        .filter(|name| name.starts_with(version.as_str()))
        .count();

    if existing != 0 {
        error!(
            version = %version,
            existing,
            "[COPY][ERROR] Version already published to the wiki"
        );
        return Err(format!(
            "Documentation for version {v} is already on the repo's wiki. To bypass it, please remove first all '{v}-x.md' files, then run 'wiki-publish publish'.",
            v = version
        ));
    }

    let mut copied = Vec::new();
    for entry_res in fs::read_dir(&versioned_dir)
        .map_err(|e| format!("Failed to read versioned folder: {}", e))?
    {
        let entry = entry_res.map_err(|e| format!("Failed to read versioned folder: {}", e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        fs::copy(&path, wiki_dir.join(&file_name))
            .map_err(|e| format!("Failed to copy {} into the wiki checkout: {}", file_name, e))?;
        debug!(file = %file_name, "[COPY] Copied documentation file into wiki checkout");
        copied.push(file_name);
    }

    info!(files = copied.len(), version = %version, "[COPY] Documentation copied into wiki checkout");
    Ok(copied)
}

/// Resolve the commit author, stage the new version's files, commit, push.
pub async fn publish_documentation<V>(config: &PublishConfig, git: &V) -> Result<(), String>
where
    V: GitOps,
{
    let version = &config.package.version;
    let wiki_dir = config.paths.wiki_dir();

    let author = git
        .configured_author()
        .await
        .map_err(|e| format!("Failed to read the git author configuration: {}", e))?
        .filter(|a| !a.name.is_empty())
        .unwrap_or_else(|| CommitAuthor {
            name: FALLBACK_AUTHOR_NAME.to_string(),
            email: String::new(),
        });
    info!(author = %author.name, "[PUBLISH] Commit author resolved");

    let pathspecs = vec![format!("{}*.md", version)];
    git.stage(&wiki_dir, &pathspecs).await.map_err(|e| {
        error!(error = ?e, "[PUBLISH][ERROR] Staging failed");
        format!("Something went wrong while adding files to the commit: {}", e)
    })?;

    let message = format!(
        "[GULP] Automatically generated documentation for version {}.",
        version
    );
    git.commit(&wiki_dir, &message, &author).await.map_err(|e| {
        error!(error = ?e, "[PUBLISH][ERROR] Commit failed");
        format!("Something went wrong while committing new documentation: {}", e)
    })?;

    git.push(&wiki_dir).await.map_err(|e| {
        error!(error = ?e, "[PUBLISH][ERROR] Push failed");
        format!("Something went wrong while pushing the documentation: {}", e)
    })?;

    info!(version = %version, "[PUBLISH] Documentation published");
    Ok(())
}
