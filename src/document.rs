//! Per-file transformation of generated documentation into wiki pages.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::PackageMetadata;
use crate::link::{self, MarkdownLink};

#[derive(Debug)]
pub enum TransformError {
    Io(std::io::Error),
    /// The source file does not exist (or vanished between load and save).
    Missing(PathBuf),
    Other(String),
}

impl From<std::io::Error> for TransformError {
    fn from(e: std::io::Error) -> Self {
        TransformError::Io(e)
    }
}

/// A markdown file produced by the documentation generator.
///
/// Links are extracted once at load time and not refreshed afterwards:
/// rewriting operates on the original set of matches.
#[derive(Debug)]
pub struct DocumentationFile {
    source_path: PathBuf,
    /// Path relative to the generation root, '/'-separated.
    relative_path: String,
    content: String,
    links: Vec<MarkdownLink>,
}

impl DocumentationFile {
    /// Load a generated file and extract all of its non-web markdown links.
    pub fn load(path: &Path, generation_root: &Path) -> Result<Self, TransformError> {
        if !path.exists() {
            error!(path = %path.display(), "Documentation file does not exist");
            return Err(TransformError::Missing(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;

        let relative = path.strip_prefix(generation_root).map_err(|_| {
            TransformError::Other(format!(
                "{} is outside the generation root {}",
                path.display(),
                generation_root.display()
            ))
        })?;
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let pattern = link::link_pattern();
        let links: Vec<MarkdownLink> = pattern
            .find_iter(&content)
            .filter_map(|m| MarkdownLink::parse(m.as_str()))
            .filter(|l| !l.is_web())
            .collect();

        debug!(
            path = %path.display(),
            links = links.len(),
            "Loaded documentation file"
        );

        Ok(DocumentationFile {
            source_path: path.to_path_buf(),
            relative_path,
            content,
            links,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn links(&self) -> &[MarkdownLink] {
        &self.links
    }

    /// Replace every extracted link's original text with its rewritten form.
    /// Replacement is by exact original substring, so a link appearing
    /// several times is rewritten at every occurrence.
    pub fn rewrite_links(&mut self, package: &PackageMetadata) {
        for markdown_link in &self.links {
            self.content = self
                .content
                .replace(&markdown_link.original(), &markdown_link.rewritten(package));
        }
    }

    /// Where this file lands in the versioned folder: `modules.md` becomes
    /// the `<version>.md` overview page, anything else gets its category
    /// folder dropped and the remaining segments dash-joined.
    pub fn destination_path(&self, versioned_dir: &Path, version: &str) -> PathBuf {
        match self.relative_path.as_str() {
            "modules.md" => versioned_dir.join(format!("{}.md", version)),
            _ => {
                let flat_name =
                    link::flatten_doc_path(&format!("{}/{}", version, self.relative_path));
                versioned_dir.join(flat_name)
            }
        }
    }

    /// Write the current content to the computed destination. The versioned
    /// directory is created once by the pipeline, not per file.
    pub fn save(&self, versioned_dir: &Path, version: &str) -> Result<PathBuf, TransformError> {
        let destination = self.destination_path(versioned_dir, version);
        fs::write(&destination, &self.content)?;
        info!(
            source = %self.source_path.display(),
            destination = %destination.display(),
            "Saved transformed documentation file"
        );
        Ok(destination)
    }
}

/// Recursively collect all `*.md` files under `dir`.
pub fn collect_markdown_files(
    dir: &Path,
    results: &mut Vec<PathBuf>,
) -> Result<(), TransformError> {
    for entry_res in fs::read_dir(dir)? {
        let entry = entry_res?;
        let path = entry.path();
        if path.is_dir() {
            collect_markdown_files(&path, results)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            results.push(path);
        }
    }
    Ok(())
}
