// Consistent exit codes for the zedrecent CLI.
//
//   0  = success
//   1  = general error
//   2  = usage/argument error
//   10 = workspace database unavailable
//   11 = workspace query failed
//   12 = unsupported database schema
//   13 = database, workspace or pin not found

use std::process;

use zedrecent_store::RepositoryError;

/// Named exit codes for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Usage = 2,
    StoreUnavailable = 10,
    QueryFailed = 11,
    UnsupportedSchema = 12,
    NotFound = 13,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map an anyhow error to an exit code by inspecting the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(repo_err) = cause.downcast_ref::<RepositoryError>() {
                return Self::from_repository_error(repo_err);
            }
            if cause.downcast_ref::<NotFound>().is_some() {
                return Self::NotFound;
            }
            if cause.downcast_ref::<UsageError>().is_some() {
                return Self::Usage;
            }
        }
        Self::Error
    }

    pub fn from_repository_error(err: &RepositoryError) -> Self {
        match err {
            RepositoryError::StoreUnavailable { .. } => Self::StoreUnavailable,
            RepositoryError::StoreQueryFailed { .. } => Self::QueryFailed,
            RepositoryError::UnsupportedSchema { .. } => Self::UnsupportedSchema,
            RepositoryError::State(_) => Self::Error,
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code() as u8)
    }
}

/// Something the user named does not exist. Embedded in an `anyhow::Error`
/// chain so it maps to [`ExitCode::NotFound`].
#[derive(Debug)]
pub struct NotFound {
    pub what: &'static str,
    pub name: String,
    pub hint: Option<String>,
}

impl NotFound {
    pub fn new(what: &'static str, name: impl Into<String>) -> Self {
        Self { what, name: name.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for NotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} `{}` not found", self.what, self.name)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for NotFound {}

/// Arguments that parse but make no sense.
#[derive(Debug)]
pub struct UsageError(pub String);

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}
