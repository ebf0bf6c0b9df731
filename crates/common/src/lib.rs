// zedrecent-common: domain types and pure logic for reading the editor's
// recent-workspace history. No I/O lives in this crate.

pub mod identity;
pub mod pins;
pub mod reconcile;
pub mod record;
pub mod schema;
pub mod types;
