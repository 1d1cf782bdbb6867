//! Descriptor and module metadata adjustment on real files.

use extguard_core::metadata::{PomDocument, adjust_module_metadata, adjust_pom, modified_time};
use extguard_core::project::{ExtensionProject, Publication};
use serde_json::{Value, json};
use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn project() -> ExtensionProject {
    ExtensionProject::new("io.acme", "foo", "1.0")
}

/// Pin the file to a well-known past mtime so restoration is observable.
fn age(path: &Path) -> SystemTime {
    let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(past)
        .unwrap();
    past
}

#[test]
fn test_deployment_pom_gets_runtime_dependency() {
    let dir = tempdir().unwrap();
    let pom = dir.path().join("pom-default.xml");
    std::fs::write(
        &pom,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project><artifactId>foo-deployment</artifactId></project>\n",
    )
    .unwrap();
    let before = age(&pom);

    assert!(adjust_pom(&pom, Publication::Deployment, &project()).unwrap());

    let doc = PomDocument::parse(&std::fs::read_to_string(&pom).unwrap()).unwrap();
    let deps = doc.dependencies();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].group_id.as_deref(), Some("io.acme"));
    assert_eq!(deps[0].artifact_id.as_deref(), Some("foo"));
    assert_eq!(deps[0].version.as_deref(), Some("1.0"));
    assert_eq!(modified_time(&pom), Some(before));
}

#[test]
fn test_runtime_pom_depends_on_spi_only_when_present() {
    let dir = tempdir().unwrap();
    let pom = dir.path().join("pom.xml");
    let original = "<project><artifactId>foo</artifactId></project>";
    std::fs::write(&pom, original).unwrap();

    assert!(!adjust_pom(&pom, Publication::Runtime, &project()).unwrap());
    assert_eq!(std::fs::read_to_string(&pom).unwrap(), original);

    assert!(adjust_pom(&pom, Publication::Runtime, &project().with_spi(true)).unwrap());
    let doc = PomDocument::parse(&std::fs::read_to_string(&pom).unwrap()).unwrap();
    assert_eq!(doc.dependencies()[0].artifact_id.as_deref(), Some("foo-spi"));
}

#[test]
fn test_malformed_pom_is_reported_with_path() {
    let dir = tempdir().unwrap();
    let pom = dir.path().join("pom.xml");
    std::fs::write(&pom, "<project><dependencies></project>").unwrap();

    let err = adjust_pom(&pom, Publication::Deployment, &project()).unwrap_err();
    assert!(err.to_string().contains("pom.xml"));
}

#[test]
fn test_deployment_module_renamed_and_injected() {
    let dir = tempdir().unwrap();
    let module = dir.path().join("module.json");
    let original = json!({
        "formatVersion": "1.1",
        "variants": [
            { "name": "deploymentApiElements" },
            { "name": "deploymentRuntimeElements", "dependencies": [] },
            { "name": "deploymentFooBar" }
        ]
    });
    std::fs::write(&module, serde_json::to_string(&original).unwrap()).unwrap();
    let before = age(&module);

    assert!(adjust_module_metadata(&module, Publication::Deployment, &project()).unwrap());

    let text = std::fs::read_to_string(&module).unwrap();
    assert!(text.contains("\n  \"variants\""), "expected pretty output: {text}");
    let adjusted: Value = serde_json::from_str(&text).unwrap();
    let variants = adjusted["variants"].as_array().unwrap();
    let names: Vec<_> = variants.iter().map(|v| v["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["apiElements", "runtimeElements", "fooBar"]);
    for variant in variants {
        assert_eq!(
            variant["dependencies"],
            json!([{ "group": "io.acme", "module": "foo", "version": { "requires": "1.0" } }])
        );
    }
    assert_eq!(modified_time(&module), Some(before));
}

#[test]
fn test_spi_module_is_renamed_without_dependency() {
    let dir = tempdir().unwrap();
    let module = dir.path().join("module.json");
    std::fs::write(&module, r#"{"variants":[{"name":"spiSourcesElements"}]}"#).unwrap();

    assert!(adjust_module_metadata(&module, Publication::Spi, &project()).unwrap());

    let adjusted: Value = serde_json::from_str(&std::fs::read_to_string(&module).unwrap()).unwrap();
    assert_eq!(adjusted["variants"][0]["name"], "sourcesElements");
    assert!(adjusted["variants"][0].get("dependencies").is_none());
}

#[test]
fn test_module_without_variants_is_untouched() {
    let dir = tempdir().unwrap();
    let module = dir.path().join("module.json");
    let original = r#"{"formatVersion":"1.1"}"#;
    std::fs::write(&module, original).unwrap();

    assert!(!adjust_module_metadata(&module, Publication::Deployment, &project()).unwrap());
    assert_eq!(std::fs::read_to_string(&module).unwrap(), original);
}
