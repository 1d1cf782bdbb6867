/// Suffixes produced by the publishing tooling and the canonical variant
/// names they map to. Checked in order.
pub const CANONICAL_VARIANTS: &[(&str, &str)] = &[
    ("ApiElements", "apiElements"),
    ("RuntimeElements", "runtimeElements"),
    ("JavadocElements", "javadocElements"),
    ("SourcesElements", "sourcesElements"),
];

/// Canonical name for a variant generated under `prefix`, e.g.
/// `deploymentApiElements` -> `apiElements`.
///
/// Names outside the table lose the prefix and have their first remaining
/// letter lower-cased (`deploymentFooBar` -> `fooBar`).
pub fn canonical_variant_name(prefix: &str, name: &str) -> String {
    if let Some((_, canonical)) = CANONICAL_VARIANTS
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
    {
        return (*canonical).to_string();
    }

    let stripped = name.strip_prefix(prefix).unwrap_or(name);
    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_suffixes() {
        let cases = [
            ("deploymentApiElements", "apiElements"),
            ("deploymentRuntimeElements", "runtimeElements"),
            ("deploymentJavadocElements", "javadocElements"),
            ("deploymentSourcesElements", "sourcesElements"),
            ("spiApiElements", "apiElements"),
        ];
        for (input, expected) in cases {
            assert_eq!(canonical_variant_name("deployment", input), expected, "{input}");
        }
    }

    #[test]
    fn test_fallback_strips_prefix() {
        assert_eq!(canonical_variant_name("deployment", "deploymentFooBar"), "fooBar");
        assert_eq!(canonical_variant_name("spi", "spiTestFixtures"), "testFixtures");
    }

    #[test]
    fn test_fallback_without_prefix() {
        assert_eq!(canonical_variant_name("deployment", "FooBar"), "fooBar");
        assert_eq!(canonical_variant_name("deployment", "shadow"), "shadow");
        assert_eq!(canonical_variant_name("deployment", "deployment"), "deployment");
    }
}
