//! Markdown link parsing and rewriting for generator output.
//!
//! The generator emits cross-references of the shape `[label](target#anchor)`.
//! Targets point into its own folder layout (`classes/`, `interfaces/`, ...);
//! rewriting collapses them into the flat, versioned wiki namespace.

use crate::config::PackageMetadata;
use regex::Regex;

/// Matches one markdown hyperlink, `[...](...)`. Callers pre-filter file
/// content with this before handing a match to [`MarkdownLink::parse`].
pub fn link_pattern() -> Regex {
    Regex::new(r"\[.+?\]\(.+?\)").expect("static link pattern is valid")
}

/// One markdown hyperlink found in a generated file.
///
/// Immutable once parsed; the rewritten form is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink {
    label: String,
    target: String,
    anchor: Option<String>,
}

impl MarkdownLink {
    /// Extract label, target and anchor from a raw `[label](target#anchor)`
    /// substring. Returns `None` when the substring does not have the link
    /// shape; callers are expected to pre-filter with [`link_pattern`].
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.starts_with('[') {
            return None;
        }
        let label_end = raw.find(']')?;
        let label = raw[1..label_end].to_string();

        let open = label_end + raw[label_end..].find('(')?;
        let close = open + raw[open..].find(')')?;
        let inner = &raw[open + 1..close];
        if inner.is_empty() {
            return None;
        }

        // The anchor is everything after the *last* '#' inside the parens.
        let (target, anchor) = match inner.rfind('#') {
            Some(idx) => (inner[..idx].to_string(), Some(inner[idx + 1..].to_string())),
            None => (inner.to_string(), None),
        };

        Some(MarkdownLink {
            label,
            target,
            anchor,
        })
    }

    /// Web links (`[...](http...)`) are left untouched by the transformer.
    pub fn is_web(&self) -> bool {
        self.target.starts_with("http")
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Reassembles the original textual form of the link.
    pub fn original(&self) -> String {
        match &self.anchor {
            Some(anchor) => format!("[{}]({}#{})", self.label, self.target, anchor),
            None => format!("[{}]({})", self.label, self.target),
        }
    }

    /// The link's label after rewriting. The generator's versioned title
    /// becomes the bare display name, the `Exports` overview label becomes
    /// the version; anything else passes through.
    fn new_label(&self, package: &PackageMetadata) -> String {
        if self.label == package.versioned_display_name() {
            package.display_name.clone()
        } else if self.label == "Exports" {
            package.version.clone()
        } else {
            self.label.clone()
        }
    }

    /// The link's target after rewriting, keyed on the old target's basename:
    /// the generator's `README.md` maps to the wiki `Home` page, `modules.md`
    /// to the version overview page, and everything else to the flattened
    /// versioned page name.
    fn new_target(&self, package: &PackageMetadata) -> String {
        let basename = self
            .target
            .rsplit('/')
            .next()
            .unwrap_or(self.target.as_str());

        match basename {
            "README.md" => "Home".to_string(),
            "modules.md" => package.version.clone(),
            _ => {
                let mut relative = self.target.as_str();
                while let Some(stripped) = relative.strip_prefix("../") {
                    relative = stripped;
                }
                let relative = relative.strip_suffix(".md").unwrap_or(relative);
                flatten_doc_path(&format!("{}/{}", package.version, relative))
            }
        }
    }

    /// The full rewritten link, anchor preserved verbatim.
    pub fn rewritten(&self, package: &PackageMetadata) -> String {
        match &self.anchor {
            Some(anchor) => format!(
                "[{}]({}#{})",
                self.new_label(package),
                self.new_target(package),
                anchor
            ),
            None => format!("[{}]({})", self.new_label(package), self.new_target(package)),
        }
    }
}

/// Collapse a version-prefixed generated path into a flat wiki page name.
///
/// Drops the segment at index 1 (the generator's category folder, such as
/// `classes` or `interfaces`) and joins the rest with `-`:
/// `1.2.0/classes/errors.aCustomError` becomes `1.2.0-errors.aCustomError`.
/// Shared between link targets and destination filenames so the two rules
/// cannot drift apart.
pub fn flatten_doc_path(versioned_path: &str) -> String {
    versioned_path
        .split('/')
        .enumerate()
        .filter(|(index, _)| *index != 1)
        .map(|(_, segment)| segment)
        .collect::<Vec<_>>()
        .join("-")
}
