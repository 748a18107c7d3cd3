//! Model descriptions and shared assets embedded in the binary.
//!
//! Files are looked up by the same relative names a model uses to refer to
//! them, e.g. `"arm26.toml"` or `"common/materials.toml"`.

use std::collections::BTreeMap;

use crate::error::PhysicsError;

/// Name of the Arm26 model description.
pub const ARM26_MODEL: &str = "arm26.toml";

const EMBEDDED: &[(&str, &str)] = &[
    (ARM26_MODEL, include_str!("../assets/arm26.toml")),
    (
        "common/materials.toml",
        include_str!("../assets/common/materials.toml"),
    ),
];

/// Named text assets passed alongside a model description.
pub type Assets = BTreeMap<String, String>;

/// Look up an embedded resource by name.
pub fn get_resource(name: &str) -> Result<&'static str, PhysicsError> {
    EMBEDDED
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, text)| *text)
        .ok_or_else(|| PhysicsError::ResourceNotFound(name.to_owned()))
}

/// The shared asset bundle: every embedded file under `common/`.
pub fn common_assets() -> Assets {
    EMBEDDED
        .iter()
        .filter(|(n, _)| n.starts_with("common/"))
        .map(|(n, text)| ((*n).to_owned(), (*text).to_owned()))
        .collect()
}

/// The Arm26 model description and the shared asset bundle.
pub fn get_model_and_assets() -> Result<(&'static str, Assets), PhysicsError> {
    Ok((get_resource(ARM26_MODEL)?, common_assets()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_is_embedded() {
        let text = get_resource(ARM26_MODEL).unwrap();
        assert!(text.contains("name = \"arm26\""));
    }

    #[test]
    fn missing_resource_is_error() {
        assert!(matches!(
            get_resource("nope.toml"),
            Err(PhysicsError::ResourceNotFound(name)) if name == "nope.toml"
        ));
    }

    #[test]
    fn common_assets_only_lists_common_dir() {
        let assets = common_assets();
        assert!(assets.contains_key("common/materials.toml"));
        assert!(!assets.contains_key(ARM26_MODEL));
    }
}
