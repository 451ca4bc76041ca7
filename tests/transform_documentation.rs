use std::fs::{self, create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

use wiki_publish::config::{
    DocPaths, GeneratorConfig, PackageMetadata, PublishConfig, WikiConfig,
};
use wiki_publish::document::{DocumentationFile, TransformError};
use wiki_publish::publish;

fn package() -> PackageMetadata {
    PackageMetadata {
        name: "demo-lib".to_string(),
        display_name: "Demo Lib".to_string(),
        version: "1.2.0".to_string(),
    }
}

fn test_config(docs_root: PathBuf) -> PublishConfig {
    PublishConfig {
        package: package(),
        paths: DocPaths {
            root: docs_root,
            entry_point: PathBuf::from("src/main.ts"),
        },
        generator: GeneratorConfig {
            program: "typedoc".to_string(),
            args: vec![],
            poll_interval: Duration::from_millis(1),
            detection_tries: 2,
        },
        wiki: WikiConfig {
            repo_url: "https://github.com/demo/demo-lib.git".to_string(),
            token: None,
        },
    }
}

#[test]
fn load_fails_on_missing_file() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope.md");

    let result = DocumentationFile::load(&missing, tmp.path());
    assert!(matches!(result, Err(TransformError::Missing(_))));
}

#[test]
fn rewrite_replaces_every_occurrence_of_a_link() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("modules.md");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "See [Exports](../modules.md) and again [Exports](../modules.md).").unwrap();

    let mut doc = DocumentationFile::load(&path, tmp.path()).unwrap();
    doc.rewrite_links(&package());

    assert_eq!(
        doc.content().trim_end(),
        "See [1.2.0](1.2.0) and again [1.2.0](1.2.0)."
    );
}

#[test]
fn a_second_rewrite_pass_changes_nothing() {
    // The link set is computed at load time, so a second pass looks for the
    // original text, which is gone.
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("classes/errors.aCustomError.md");
    create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "[Exports](../modules.md#aCustomError)").unwrap();

    let mut doc = DocumentationFile::load(&path, tmp.path()).unwrap();
    doc.rewrite_links(&package());
    let once = doc.content().to_string();
    doc.rewrite_links(&package());

    assert_eq!(doc.content(), once);
}

#[test]
fn web_links_are_left_untouched() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("modules.md");
    fs::write(&path, "[issue tracker](https://github.com/demo/demo-lib/issues)").unwrap();

    let mut doc = DocumentationFile::load(&path, tmp.path()).unwrap();
    doc.rewrite_links(&package());

    assert_eq!(
        doc.content(),
        "[issue tracker](https://github.com/demo/demo-lib/issues)"
    );
}

#[test]
fn modules_file_lands_as_the_version_overview_page() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("modules.md");
    fs::write(&path, "# Demo Lib - 1.2.0").unwrap();

    let doc = DocumentationFile::load(&path, tmp.path()).unwrap();
    let versioned = PathBuf::from("docs/1.2.0");
    assert_eq!(
        doc.destination_path(&versioned, "1.2.0"),
        versioned.join("1.2.0.md")
    );
}

#[test]
fn nested_files_get_flat_dash_joined_names() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("classes/errors.aCustomError.md");
    create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "# aCustomError").unwrap();

    let doc = DocumentationFile::load(&path, tmp.path()).unwrap();
    let versioned = PathBuf::from("docs/1.2.0");
    assert_eq!(
        doc.destination_path(&versioned, "1.2.0"),
        versioned.join("1.2.0-errors.aCustomError.md")
    );
}

#[test]
fn save_writes_the_rewritten_content_to_the_destination() {
    let tmp = tempdir().unwrap();
    let generation = tmp.path().join("generation");
    create_dir_all(&generation).unwrap();
    let path = generation.join("modules.md");
    fs::write(&path, "[Exports](../modules.md)").unwrap();

    let versioned = tmp.path().join("1.2.0");
    create_dir_all(&versioned).unwrap();

    let mut doc = DocumentationFile::load(&path, &generation).unwrap();
    doc.rewrite_links(&package());
    let destination = doc.save(&versioned, "1.2.0").unwrap();

    assert_eq!(destination, versioned.join("1.2.0.md"));
    assert_eq!(fs::read_to_string(destination).unwrap(), "[1.2.0](1.2.0)");
}

#[test]
fn transform_stage_excludes_the_generator_readme_and_deletes_the_raw_output() {
    let tmp = tempdir().unwrap();
    let docs_root = tmp.path().join("docs");
    let config = test_config(docs_root.clone());

    let generation = config.paths.generation_dir();
    create_dir_all(generation.join("classes")).unwrap();
    fs::write(generation.join("README.md"), "generator front page").unwrap();
    fs::write(generation.join("modules.md"), "[Exports](../modules.md)").unwrap();
    fs::write(
        generation.join("classes/errors.aCustomError.md"),
        "[aCustomError](../classes/errors.aCustomError.md)",
    )
    .unwrap();

    let written = publish::transform_documentation(&config).expect("transform should succeed");

    let versioned = config.paths.versioned_dir("1.2.0");
    let mut names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["1.2.0-errors.aCustomError.md", "1.2.0.md"]);

    // README.md is the generator's own front page and must not be published.
    assert!(!versioned.join("1.2.0-README.md").exists());
    assert!(!versioned.join("README.md").exists());

    // Raw generation output is deleted once transformed.
    assert!(!generation.exists());

    assert_eq!(
        fs::read_to_string(versioned.join("1.2.0-errors.aCustomError.md")).unwrap(),
        "[aCustomError](1.2.0-errors.aCustomError)"
    );
}

#[test]
fn clean_is_idempotent_when_folders_are_absent() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path().join("docs"));

    // Nothing exists yet; clean must still succeed.
    publish::clean(&config).expect("clean of absent folders should succeed");

    // Create and clean again.
    create_dir_all(config.paths.generation_dir()).unwrap();
    create_dir_all(config.paths.versioned_dir("1.2.0")).unwrap();
    create_dir_all(config.paths.wiki_dir()).unwrap();
    publish::clean(&config).expect("clean should remove existing folders");

    assert!(!config.paths.generation_dir().exists());
    assert!(!config.paths.versioned_dir("1.2.0").exists());
    assert!(!config.paths.wiki_dir().exists());
}
