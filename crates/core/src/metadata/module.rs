//! Module metadata (JSON) surgery.

use super::timestamp;
use super::variant::canonical_variant_name;
use crate::error::{ExtguardError, Result};
use extguard_api::Coordinate;
use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::debug;

/// Edits to apply to every variant of a module metadata document.
#[derive(Debug, Clone, Default)]
pub struct VariantEdit<'a> {
    /// Publication prefix to strip from variant names; `None` keeps names.
    pub prefix: Option<&'a str>,
    /// Dependency appended to each variant.
    pub dependency: Option<&'a Coordinate>,
}

/// Apply `edit` to an in-memory document. Returns `false` when the document
/// has no `variants` array and was left alone.
pub fn adjust_variants(
    document: &mut Value,
    edit: &VariantEdit<'_>,
) -> std::result::Result<bool, String> {
    let Some(variants) = document.get_mut("variants").and_then(Value::as_array_mut) else {
        return Ok(false);
    };

    let dependency = edit.dependency.map(dependency_object).transpose()?;

    for (index, variant) in variants.iter_mut().enumerate() {
        let variant = variant
            .as_object_mut()
            .ok_or_else(|| format!("variant #{} is not an object", index))?;

        if let Some(prefix) = edit.prefix {
            let name = variant
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| format!("variant #{} has no string `name`", index))?;
            let canonical = canonical_variant_name(prefix, name);
            debug!("Renaming variant {} -> {}", name, canonical);
            variant.insert("name".to_string(), Value::String(canonical));
        }

        if let Some(dependency) = &dependency {
            dependencies_of(variant, index)?.push(dependency.clone());
        }
    }

    Ok(true)
}

fn dependencies_of(
    variant: &mut Map<String, Value>,
    index: usize,
) -> std::result::Result<&mut Vec<Value>, String> {
    variant
        .entry("dependencies")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| format!("variant #{} has a non-array `dependencies`", index))
}

fn dependency_object(coordinate: &Coordinate) -> std::result::Result<Value, String> {
    let version = coordinate
        .version()
        .ok_or_else(|| format!("dependency `{}` has no version", coordinate))?;
    Ok(json!({
        "group": coordinate.group(),
        "module": coordinate.artifact(),
        "version": { "requires": version },
    }))
}

/// Rewrite the module metadata file at `path`. A document without variants
/// is not rewritten; returns whether the file changed.
pub fn adjust_module_file(path: &Path, edit: &VariantEdit<'_>) -> Result<bool> {
    let original_mtime = timestamp::modified_time(path);
    let content = std::fs::read_to_string(path).map_err(|e| ExtguardError::io(path, e))?;
    let mut document: Value =
        serde_json::from_str(&content).map_err(|e| ExtguardError::json(path, e))?;

    if !adjust_variants(&mut document, edit).map_err(|reason| ExtguardError::malformed(path, reason))? {
        debug!("{} has no variants; leaving it untouched", path.display());
        return Ok(false);
    }

    let mut rendered =
        serde_json::to_string_pretty(&document).map_err(|e| ExtguardError::json(path, e))?;
    rendered.push('\n');
    std::fs::write(path, rendered).map_err(|e| ExtguardError::io(path, e))?;

    timestamp::restore_modified_time(path, original_mtime);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Value {
        json!({
            "formatVersion": "1.1",
            "component": { "group": "io.acme", "module": "foo-deployment", "version": "1.0" },
            "variants": [
                { "name": "deploymentApiElements", "attributes": { "org.gradle.usage": "java-api" } },
                {
                    "name": "deploymentRuntimeElements",
                    "dependencies": [
                        { "group": "io.quarkus", "module": "quarkus-core-deployment", "version": { "requires": "3.2.0" } }
                    ]
                },
                { "name": "deploymentFooBar" }
            ]
        })
    }

    #[test]
    fn test_renames_and_injects() {
        let mut document = doc();
        let runtime: Coordinate = "io.acme:foo:1.0".parse().unwrap();
        let edit = VariantEdit {
            prefix: Some("deployment"),
            dependency: Some(&runtime),
        };

        assert!(adjust_variants(&mut document, &edit).unwrap());

        let variants = document["variants"].as_array().unwrap();
        let names: Vec<_> = variants.iter().map(|v| v["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["apiElements", "runtimeElements", "fooBar"]);

        for variant in variants {
            let last = variant["dependencies"].as_array().unwrap().last().unwrap();
            assert_eq!(
                last,
                &json!({ "group": "io.acme", "module": "foo", "version": { "requires": "1.0" } })
            );
        }
        assert_eq!(variants[1]["dependencies"].as_array().unwrap().len(), 2);
        assert_eq!(variants[0]["attributes"]["org.gradle.usage"], "java-api");
    }

    #[test]
    fn test_key_order_survives() {
        let mut document = doc();
        adjust_variants(&mut document, &VariantEdit::default()).unwrap();
        let keys: Vec<_> = document.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["formatVersion", "component", "variants"]);
    }

    #[test]
    fn test_no_variants_is_noop() {
        let mut document = json!({ "formatVersion": "1.1" });
        let before = document.clone();
        assert!(!adjust_variants(&mut document, &VariantEdit::default()).unwrap());
        assert_eq!(document, before);
    }

    #[test]
    fn test_variant_without_name_is_rejected() {
        let mut document = json!({ "variants": [ { "attributes": {} } ] });
        let edit = VariantEdit {
            prefix: Some("spi"),
            dependency: None,
        };
        assert!(adjust_variants(&mut document, &edit).is_err());
    }
}
