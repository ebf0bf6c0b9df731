use zedrecent_common::identity::target_uri;
use zedrecent_common::reconcile::{reconcile, recent_first};
use zedrecent_common::record::{parse_records, ParseRejection};
use zedrecent_common::types::WorkspaceKind;

const DUMP: &str = "\
local|12|/home/dev/api|2024-06-02 09:00:00|||
remote|11|/srv/site|2024-06-01 18:30:00|build.box|deploy|2222
local|10|/home/dev/api|2024-05-30 08:00:00|||
local|9|/home/dev/web,/home/dev/shared|2024-05-29 10:15:42|||
local|8|/home/dev/broken
remote|7|/srv/old|2024-05-20 10:00:00|||
local|6||2024-05-01 10:00:00|||
local|5|/home/dev/cli|someday|||
";

#[test]
fn dump_parses_and_reconciles_into_unique_identities() {
    let batch = parse_records(DUMP);

    assert_eq!(batch.records.len(), 5);
    let reasons: Vec<&ParseRejection> = batch.rejected.iter().map(|line| &line.reason).collect();
    assert_eq!(
        reasons,
        vec![
            &ParseRejection::TruncatedRecord { kind: WorkspaceKind::Local, found: 3, expected: 4 },
            &ParseRejection::MissingRequiredField("paths"),
            &ParseRejection::InvalidTimestamp("someday".into()),
        ]
    );

    let workspaces = reconcile(&batch.records);
    // `/srv/old` parses (blank host is allowed by the parser) but has no identity.
    assert_eq!(workspaces.len(), 3);

    let api = &workspaces["file:///home/dev/api"];
    assert_eq!(api.source_id, 12);

    let site = &workspaces["ssh://deploy@build.box:2222/srv/site"];
    assert_eq!(site.kind, WorkspaceKind::Remote);
    assert_eq!(site.subtitle, "deploy@build.box:2222");

    let web = &workspaces[&target_uri("/home/dev/web").expect("path should map to a uri")];
    assert_eq!(web.title, "web, shared");

    let order: Vec<i64> = recent_first(&workspaces).iter().map(|w| w.source_id).collect();
    assert_eq!(order, vec![12, 11, 9]);
}
