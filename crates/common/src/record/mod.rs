// Store row parsing: one pipe-delimited line in, one typed record out.

pub mod parser;
pub mod timestamp;

pub use parser::{parse_record, parse_records, ParseRejection, ParsedBatch};
