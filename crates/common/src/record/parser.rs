use thiserror::Error;

use super::timestamp::parse_epoch_seconds;
use crate::types::{RawWorkspaceRecord, RemoteHost, WorkspaceKind};

const FIELD_SEPARATOR: char = '|';
const LOCAL_MIN_FIELDS: usize = 4;
const REMOTE_MIN_FIELDS: usize = 7;

/// Why a store line did not become a record. Always per-line and recoverable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseRejection {
    #[error("unknown workspace variant `{0}`")]
    UnknownVariant(String),

    #[error("{} record has {found} fields, expected at least {expected}", kind.as_str())]
    TruncatedRecord { kind: WorkspaceKind, found: usize, expected: usize },

    #[error("workspace id `{0}` is not an integer")]
    InvalidId(String),

    #[error("required field `{0}` is blank")]
    MissingRequiredField(&'static str),

    #[error("timestamp `{0}` is not a valid datetime")]
    InvalidTimestamp(String),
}

/// A line the batch parser skipped, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number within the store output.
    pub line_number: usize,
    pub line: String,
    pub reason: ParseRejection,
}

/// Result of parsing a whole store dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBatch {
    pub records: Vec<RawWorkspaceRecord>,
    pub rejected: Vec<RejectedLine>,
}

/// Parse one `type|id|paths|timestamp[|host|user|port]` line.
pub fn parse_record(line: &str) -> Result<RawWorkspaceRecord, ParseRejection> {
    let mut fields = split_fields(line);

    let kind = match fields.first().map(|tag| tag.trim()).unwrap_or_default() {
        "local" => WorkspaceKind::Local,
        "remote" => WorkspaceKind::Remote,
        other => return Err(ParseRejection::UnknownVariant(other.to_string())),
    };

    let expected = min_fields(kind);
    while fields.len() > expected && fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
    if fields.len() < expected {
        return Err(ParseRejection::TruncatedRecord { kind, found: fields.len(), expected });
    }

    let raw_id = fields[1].trim();
    let id = raw_id.parse::<i64>().map_err(|_| ParseRejection::InvalidId(raw_id.to_string()))?;

    let paths = required(fields[2], "paths")?;
    let timestamp = required(fields[3], "timestamp")?;
    let opened_at = parse_epoch_seconds(timestamp)
        .ok_or_else(|| ParseRejection::InvalidTimestamp(timestamp.to_string()))?;

    let paths = paths.to_string();
    match kind {
        WorkspaceKind::Local => Ok(RawWorkspaceRecord::Local { id, paths, opened_at }),
        WorkspaceKind::Remote => Ok(RawWorkspaceRecord::Remote {
            id,
            paths,
            opened_at,
            remote: RemoteHost {
                host: fields[4].trim().to_string(),
                user: optional(fields[5]).map(str::to_string),
                port: optional(fields[6]).and_then(|port| port.parse::<u16>().ok()),
            },
        }),
    }
}

/// Parse every non-blank line of a store dump. Rejected lines are collected
/// and never stop the batch.
pub fn parse_records(text: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        match parse_record(line) {
            Ok(record) => batch.records.push(record),
            Err(reason) => batch.rejected.push(RejectedLine {
                line_number: index + 1,
                line: line.to_string(),
                reason,
            }),
        }
    }

    batch
}

fn split_fields(line: &str) -> Vec<&str> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let leading_empty = fields.iter().take_while(|field| field.is_empty()).count();
    fields[leading_empty..].to_vec()
}

fn min_fields(kind: WorkspaceKind) -> usize {
    match kind {
        WorkspaceKind::Local => LOCAL_MIN_FIELDS,
        WorkspaceKind::Remote => REMOTE_MIN_FIELDS,
    }
}

fn required<'a>(field: &'a str, name: &'static str) -> Result<&'a str, ParseRejection> {
    optional(field).ok_or(ParseRejection::MissingRequiredField(name))
}

fn optional(field: &str) -> Option<&str> {
    let trimmed = field.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
