use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::core::errors::{Result, ValidationError};
use crate::core::models::config_tree::{ApplicationGroup, ApplicationMap, EnvironmentEntry};
use crate::core::services::name_validator::{normalized_name, validate_name};

/// Number of path components between the root and a configuration file
/// (`application/environment/file`).
const CONFIG_DEPTH: usize = 3;

/// Component count of a root folder, as expected by the grouping functions.
pub fn root_depth(root: &Path) -> usize {
    root.components().count()
}

/// A configuration file located by application and environment.
#[derive(Debug)]
struct ConfigRecord<'a> {
    application: String,
    environment: String,
    path: &'a Path,
}

/// Extract, order and validate the configuration files among `paths`.
///
/// Records sort by `(application, environment)` so each application's
/// environments are contiguous regardless of how paths compare as strings.
/// Names are checked in that order, so the first invalid name reported does
/// not depend on the input order.
fn config_records(root_depth: usize, paths: &[PathBuf]) -> Result<Vec<ConfigRecord<'_>>> {
    if paths.is_empty() {
        return Err(ValidationError::EmptyFileList.into());
    }

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let components: Vec<Component<'_>> = path.components().collect();
        if components.len().checked_sub(root_depth) != Some(CONFIG_DEPTH) {
            debug!(path = %path.display(), "skipping file outside application/environment folders");
            continue;
        }

        let len = components.len();
        records.push(ConfigRecord {
            application: components[len - 3].as_os_str().to_string_lossy().into_owned(),
            environment: components[len - 2].as_os_str().to_string_lossy().into_owned(),
            path,
        });
    }

    records.sort_by(|a, b| {
        (&a.application, &a.environment, a.path).cmp(&(&b.application, &b.environment, b.path))
    });

    for record in &records {
        validate_name(&record.application)?;
        validate_name(&record.environment)?;
    }
    Ok(records)
}

/// Fail when two folders would produce the same template identifier.
///
/// Applications are identified by their `cf_name`, environments by the
/// application's `cf_name` followed by their own.
fn check_identifiers(groups: &[ApplicationGroup]) -> Result<()> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut claim = |identifier: String, owner: String| match seen.entry(identifier) {
        Entry::Occupied(first) => Err(ValidationError::DuplicateIdentifier {
            identifier: first.key().clone(),
            first: first.get().clone(),
            second: owner,
        }),
        Entry::Vacant(slot) => {
            slot.insert(owner);
            Ok(())
        }
    };

    for group in groups {
        claim(format!("{}Application", group.cf_name), group.name.clone())?;
        for environment in &group.environments {
            claim(
                format!("{}{}Environment", group.cf_name, environment.cf_name),
                format!("{}/{}", group.name, environment.name),
            )?;
        }
    }
    Ok(())
}

/// Group configuration files into applications, ordered by name.
///
/// `root_depth` is the component count of the root folder the paths were
/// collected from; files not exactly three levels below it are skipped.
pub fn group_applications(root_depth: usize, paths: &[PathBuf]) -> Result<Vec<ApplicationGroup>> {
    let mut groups: Vec<ApplicationGroup> = Vec::new();

    for record in config_records(root_depth, paths)? {
        let entry = EnvironmentEntry {
            cf_name: normalized_name(&record.environment),
            name: record.environment,
            file_path: record.path.to_path_buf(),
        };

        match groups.last_mut() {
            Some(group) if group.name == record.application => group.environments.push(entry),
            _ => groups.push(ApplicationGroup {
                cf_name: normalized_name(&record.application),
                name: record.application,
                environments: vec![entry],
            }),
        }
    }

    check_identifiers(&groups)?;
    Ok(groups)
}

/// Same grouping as [`group_applications`], keyed by name instead of listed.
pub fn application_map(root_depth: usize, paths: &[PathBuf]) -> Result<ApplicationMap> {
    let mut applications = ApplicationMap::new();

    for record in config_records(root_depth, paths)? {
        applications
            .entry(record.application)
            .or_default()
            .insert(record.environment, record.path.to_path_buf());
    }

    Ok(applications)
}
