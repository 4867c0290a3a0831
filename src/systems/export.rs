//! JSON export of the animation registry.
//!
//! The document is a pretty-printed JSON array (two-space indent) of
//! `{name, frameStart, frameEnd}` objects in registry order. Ids stay inside
//! the session.
use crate::resources::animationstore::AnimationRegistry;

/// Serialize the registry for export.
pub fn export_json(registry: &AnimationRegistry) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&registry.to_export_document())
}

/// One-line description of an export, e.g. `2 animations • 118 characters`.
pub fn export_summary(registry: &AnimationRegistry, json: &str) -> String {
    let count = registry.len();
    format!(
        "{} animation{} • {} characters",
        count,
        if count == 1 { "" } else { "s" },
        json.chars().count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_camel_case_without_ids() {
        let mut registry = AnimationRegistry::new();
        registry.add("walk", 2, 5, 10).unwrap();
        let json = export_json(&registry).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"name\": \"walk\",\n    \"frameStart\": 2,\n    \"frameEnd\": 5\n  }\n]"
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "name": "walk", "frameStart": 2, "frameEnd": 5 }])
        );
    }

    #[test]
    fn empty_registry_exports_empty_array() {
        let registry = AnimationRegistry::new();
        assert_eq!(export_json(&registry).unwrap(), "[]");
    }

    #[test]
    fn summary_pluralizes() {
        let mut registry = AnimationRegistry::new();
        registry.add("idle", 0, 0, 4).unwrap();
        assert_eq!(export_summary(&registry, "abc"), "1 animation • 3 characters");
        registry.add("run", 1, 3, 4).unwrap();
        assert_eq!(export_summary(&registry, "abcd"), "2 animations • 4 characters");
    }
}
