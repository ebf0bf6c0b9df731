// `sqlite3` shell backend. Every statement is one process:
// `sqlite3 -batch -bail -list -noheader -separator | -cmd ".timeout N" <db> <sql>`.

use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

use super::{missing_database, StoreQuery, COLUMN_SEPARATOR};
use crate::error::QueryError;
use crate::executor::{CommandExecutor, ProcessCommandExecutor};

pub const DEFAULT_SQLITE_BIN: &str = "sqlite3";

#[derive(Debug, Clone)]
pub struct SqliteCli<E = ProcessCommandExecutor> {
    binary: OsString,
    timeout_ms: u64,
    executor: E,
}

impl SqliteCli<ProcessCommandExecutor> {
    pub fn new(binary: impl Into<OsString>, timeout_ms: u64) -> Self {
        Self::with_executor(binary, timeout_ms, ProcessCommandExecutor)
    }
}

impl<E: CommandExecutor> SqliteCli<E> {
    pub fn with_executor(binary: impl Into<OsString>, timeout_ms: u64, executor: E) -> Self {
        Self { binary: binary.into(), timeout_ms, executor }
    }

    fn args(&self, db_path: &Path, sql: &str) -> Vec<OsString> {
        vec![
            "-batch".into(),
            "-bail".into(),
            "-list".into(),
            "-noheader".into(),
            "-separator".into(),
            COLUMN_SEPARATOR.to_string().into(),
            "-cmd".into(),
            format!(".timeout {}", self.timeout_ms).into(),
            db_path.as_os_str().to_owned(),
            sql.into(),
        ]
    }

    fn describe(&self, db_path: &Path) -> String {
        format!("{} {}", self.binary.to_string_lossy(), db_path.display())
    }
}

impl<E: CommandExecutor> StoreQuery for SqliteCli<E> {
    fn execute(&self, db_path: &Path, sql: &str) -> Result<String, QueryError> {
        // sqlite3 would happily create an empty database at a wrong path.
        if let Some(error) = missing_database(db_path) {
            return Err(error);
        }

        debug!(db = %db_path.display(), sql, "running sqlite3");
        let output = self.executor.execute(&self.binary, &self.args(db_path, sql)).map_err(
            |error| QueryError::SpawnFailed { command: self.describe(db_path), message: error.to_string() },
        )?;

        if !output.success {
            let stderr =
                if output.stderr.trim().is_empty() { output.stdout } else { output.stderr };
            return Err(QueryError::CommandFailed {
                command: self.describe(db_path),
                code: output.code,
                stderr,
            });
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::ffi::OsStr;
    use std::sync::{Arc, Mutex};

    use tempfile::NamedTempFile;

    use super::*;
    use crate::executor::CommandResult;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct CommandCall {
        program: OsString,
        args: Vec<OsString>,
    }

    #[derive(Clone, Default)]
    struct MockExecutor {
        calls: Arc<Mutex<Vec<CommandCall>>>,
        responses: Arc<Mutex<VecDeque<Result<CommandResult, std::io::ErrorKind>>>>,
    }

    impl MockExecutor {
        fn with_responses(
            responses: impl IntoIterator<Item = Result<CommandResult, std::io::ErrorKind>>,
        ) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            }
        }

        fn calls(&self) -> Vec<CommandCall> {
            self.calls.lock().expect("calls lock poisoned").clone()
        }
    }

    impl CommandExecutor for MockExecutor {
        fn execute(&self, program: &OsStr, args: &[OsString]) -> Result<CommandResult, std::io::Error> {
            self.calls
                .lock()
                .expect("calls lock poisoned")
                .push(CommandCall { program: program.to_owned(), args: args.to_vec() });
            self.responses
                .lock()
                .expect("responses lock poisoned")
                .pop_front()
                .expect("missing mock response")
                .map_err(std::io::Error::from)
        }
    }

    fn ok(stdout: &str) -> Result<CommandResult, std::io::ErrorKind> {
        Ok(CommandResult { success: true, code: Some(0), stdout: stdout.into(), stderr: String::new() })
    }

    fn failed(code: i32, stderr: &str) -> Result<CommandResult, std::io::ErrorKind> {
        Ok(CommandResult { success: false, code: Some(code), stdout: String::new(), stderr: stderr.into() })
    }

    #[test]
    fn passes_timeout_database_and_sql_in_order() {
        let db = NamedTempFile::new().expect("temp db file");
        let executor = MockExecutor::with_responses([ok("28\n")]);
        let cli = SqliteCli::with_executor("/opt/sqlite3", 1500, executor.clone());

        let output = cli.execute(db.path(), "SELECT 1;").expect("query should succeed");
        assert_eq!(output, "28\n");

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, OsString::from("/opt/sqlite3"));
        let args: Vec<String> =
            calls[0].args.iter().map(|arg| arg.to_string_lossy().into_owned()).collect();
        let cmd = args.iter().position(|arg| arg == "-cmd").expect("-cmd flag present");
        assert_eq!(args[cmd + 1], ".timeout 1500");
        assert_eq!(args[args.len() - 2], db.path().to_string_lossy());
        assert_eq!(args[args.len() - 1], "SELECT 1;");
    }

    #[test]
    fn non_zero_exit_becomes_command_failed() {
        let db = NamedTempFile::new().expect("temp db file");
        let executor = MockExecutor::with_responses([failed(5, "Error: database is locked\n")]);
        let cli = SqliteCli::with_executor(DEFAULT_SQLITE_BIN, 2000, executor);

        let error = cli.execute(db.path(), "SELECT 1;").expect_err("query should fail");
        match error {
            QueryError::CommandFailed { code, stderr, .. } => {
                assert_eq!(code, Some(5));
                assert!(stderr.contains("database is locked"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn spawn_failure_is_reported() {
        let db = NamedTempFile::new().expect("temp db file");
        let executor = MockExecutor::with_responses([Err(std::io::ErrorKind::NotFound)]);
        let cli = SqliteCli::with_executor(DEFAULT_SQLITE_BIN, 2000, executor);

        let error = cli.execute(db.path(), "SELECT 1;").expect_err("query should fail");
        assert!(matches!(error, QueryError::SpawnFailed { .. }));
    }

    #[test]
    fn missing_database_never_spawns() {
        let executor = MockExecutor::with_responses([]);
        let cli = SqliteCli::with_executor(DEFAULT_SQLITE_BIN, 2000, executor.clone());

        let error = cli
            .execute(Path::new("/definitely/not/here/db.sqlite"), "SELECT 1;")
            .expect_err("query should fail");
        assert!(matches!(error, QueryError::MissingDatabase { .. }));
        assert!(executor.calls().is_empty());
    }
}
