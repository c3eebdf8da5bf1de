use std::ffi::OsString;
use std::fs::{self, FileType};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::errors::{AcsError, Result, StructureError};

/// Version-control folder that may sit next to the applications.
pub const RESERVED_FOLDER: &str = ".git";

/// Pre-flight gate for the configuration store layout.
///
/// The root may hold files (a README, say) and the reserved `.git` folder
/// next to the application folders. Every application folder holds only
/// environment folders, and every environment folder holds exactly one
/// regular file. Entries are visited depth-first in name order, so the
/// first violation reported is always the same for a given tree.
pub struct StructureValidator;

impl StructureValidator {
    /// Validate the whole tree, failing on the first violation.
    pub fn validate(&self, root: &Path) -> Result<()> {
        match self.scan(root, true)?.into_iter().next() {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }

    /// Walk the whole tree and collect every violation instead of stopping.
    pub fn violations(&self, root: &Path) -> Result<Vec<StructureError>> {
        self.scan(root, false)
    }

    fn scan(&self, root: &Path, fail_fast: bool) -> Result<Vec<StructureError>> {
        if !root.is_dir() {
            return Err(AcsError::FileNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut found = Vec::new();
        let mut application_count = 0;

        for entry in sorted_entries(root)? {
            if !entry.file_type.is_dir() || entry.name == RESERVED_FOLDER {
                continue;
            }
            application_count += 1;
            check_application(&entry.path, fail_fast, &mut found)?;
            if fail_fast && !found.is_empty() {
                return Ok(found);
            }
        }

        if application_count == 0 {
            found.push(StructureError::NoApplications(root.to_path_buf()));
        }

        Ok(found)
    }
}

fn check_application(
    application: &Path,
    fail_fast: bool,
    found: &mut Vec<StructureError>,
) -> Result<()> {
    debug!(folder = %application.display(), "checking application folder");
    let mut environment_count = 0;
    let mut reported_stray = false;

    for entry in sorted_entries(application)? {
        if !entry.file_type.is_dir() {
            if !reported_stray {
                found.push(StructureError::NonFolderInApplication(
                    application.to_path_buf(),
                ));
                reported_stray = true;
            }
            if fail_fast {
                return Ok(());
            }
            continue;
        }

        environment_count += 1;
        if let Some(violation) = check_environment(&entry.path)? {
            found.push(violation);
            if fail_fast {
                return Ok(());
            }
        }
    }

    if environment_count == 0 {
        found.push(StructureError::NoEnvironments(application.to_path_buf()));
    }

    Ok(())
}

fn check_environment(environment: &Path) -> Result<Option<StructureError>> {
    let mut file_count = 0;

    for entry in sorted_entries(environment)? {
        if !entry.file_type.is_file() || file_count > 0 {
            return Ok(Some(StructureError::NotASingleConfigurationFile(
                environment.to_path_buf(),
            )));
        }
        file_count += 1;
    }

    if file_count == 0 {
        return Ok(Some(StructureError::MissingConfigurationFile(
            environment.to_path_buf(),
        )));
    }

    Ok(None)
}

struct Entry {
    name: OsString,
    path: PathBuf,
    /// Type of the entry itself; symlinks are not followed.
    file_type: FileType,
}

fn sorted_entries(dir: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.push(Entry {
            name: entry.file_name(),
            path: entry.path(),
            file_type: entry.file_type()?,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "key: value\n").unwrap();
    }

    fn mkdir(root: &Path, rel: &str) {
        fs::create_dir_all(root.join(rel)).unwrap();
    }

    fn first_violation(root: &Path) -> StructureError {
        match StructureValidator.validate(root).unwrap_err() {
            AcsError::Structure(e) => e,
            other => panic!("expected a structure error, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_tree_passes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "README.md");
        write(dir.path(), "retail/prod/application.yaml");
        write(dir.path(), "retail/test/application.yaml");
        write(dir.path(), "sales_api-ms/pre-prod_new/application.properties");

        assert!(StructureValidator.validate(dir.path()).is_ok());
        assert!(StructureValidator.violations(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn reserved_folder_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".git/HEAD");
        write(dir.path(), "sales/prod/application.yaml");

        assert!(StructureValidator.validate(dir.path()).is_ok());
    }

    #[test]
    fn root_without_applications_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "README.md");
        mkdir(dir.path(), ".git");

        assert_eq!(
            first_violation(dir.path()),
            StructureError::NoApplications(dir.path().to_path_buf())
        );
    }

    #[test]
    fn file_inside_application_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "my_application/my_environment/application.yaml");
        write(dir.path(), "my_application/notes.txt");

        assert_eq!(
            first_violation(dir.path()),
            StructureError::NonFolderInApplication(dir.path().join("my_application"))
        );
    }

    #[test]
    fn application_without_environments_fails() {
        let dir = tempfile::tempdir().unwrap();
        mkdir(dir.path(), "my_application");

        assert_eq!(
            first_violation(dir.path()),
            StructureError::NoEnvironments(dir.path().join("my_application"))
        );
    }

    #[test]
    fn empty_environment_fails() {
        let dir = tempfile::tempdir().unwrap();
        mkdir(dir.path(), "my_application/my_environment");

        assert_eq!(
            first_violation(dir.path()),
            StructureError::MissingConfigurationFile(
                dir.path().join("my_application/my_environment")
            )
        );
    }

    #[test]
    fn multiple_files_in_environment_fail() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "my_application/my_environment/application.yaml");
        write(dir.path(), "my_application/my_environment/application.properties");

        assert_eq!(
            first_violation(dir.path()),
            StructureError::NotASingleConfigurationFile(
                dir.path().join("my_application/my_environment")
            )
        );
    }

    #[test]
    fn folder_in_place_of_configuration_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        mkdir(dir.path(), "my_application/my_environment/nested");

        assert_eq!(
            first_violation(dir.path()),
            StructureError::NotASingleConfigurationFile(
                dir.path().join("my_application/my_environment")
            )
        );
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(
            StructureValidator.validate(&missing),
            Err(AcsError::FileNotFound { .. })
        ));
    }

    #[test]
    fn violations_collects_every_defect() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "alpha/prod/application.yaml");
        write(dir.path(), "alpha/stray.txt");
        mkdir(dir.path(), "beta");
        mkdir(dir.path(), "gamma/prod");
        write(dir.path(), "gamma/test/a.yaml");
        write(dir.path(), "gamma/test/b.yaml");

        let found = StructureValidator.violations(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![
                StructureError::NonFolderInApplication(dir.path().join("alpha")),
                StructureError::NoEnvironments(dir.path().join("beta")),
                StructureError::MissingConfigurationFile(dir.path().join("gamma/prod")),
                StructureError::NotASingleConfigurationFile(dir.path().join("gamma/test")),
            ]
        );
    }

    #[test]
    fn validate_reports_first_defect_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        mkdir(dir.path(), "zulu");
        mkdir(dir.path(), "alpha/prod");

        assert_eq!(
            first_violation(dir.path()),
            StructureError::MissingConfigurationFile(dir.path().join("alpha/prod"))
        );
    }
}
