use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// One environment of an application, as found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentEntry {
    pub name: String,
    /// Name with `_` and `-` stripped, safe for template identifiers.
    pub cf_name: String,
    pub file_path: PathBuf,
}

/// An application folder together with its environments, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationGroup {
    pub name: String,
    pub cf_name: String,
    pub environments: Vec<EnvironmentEntry>,
}

/// Application name → environment name → configuration file.
pub type ApplicationMap = BTreeMap<String, BTreeMap<String, PathBuf>>;
