/// What `sync` did for one configuration profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new hosted version was stored.
    Created { version: i64 },
    /// The latest hosted version already matches the file.
    Unchanged { version: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub application: String,
    pub environment: String,
    pub outcome: SyncOutcome,
    /// Old versions deleted by the retention policy.
    pub removed: Vec<i64>,
}

/// What `deploy` did for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed { version: i64 },
    UpToDate { version: i64 },
    /// The profile has no hosted version yet.
    NoVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub application: String,
    pub environment: String,
    pub outcome: DeployOutcome,
}
