use proptest::prelude::*;
use zedrecent_common::pins::PinnedSet;
use zedrecent_common::types::WorkspaceKind;

const URI_POOL: usize = 8;

#[derive(Debug, Clone)]
enum PinOp {
    Pin(usize),
    Unpin(usize),
    MoveUp(usize),
    MoveDown(usize),
    UnpinAll,
}

fn uri(index: usize) -> String {
    format!("file:///work/project-{index}")
}

fn pin_op() -> impl Strategy<Value = PinOp> {
    prop_oneof![
        4 => (0..URI_POOL).prop_map(PinOp::Pin),
        2 => (0..URI_POOL).prop_map(PinOp::Unpin),
        3 => (0..URI_POOL).prop_map(PinOp::MoveUp),
        3 => (0..URI_POOL).prop_map(PinOp::MoveDown),
        1 => Just(PinOp::UnpinAll),
    ]
}

fn apply(set: &mut PinnedSet, op: &PinOp) {
    match op {
        PinOp::Pin(index) => {
            set.pin(uri(*index), WorkspaceKind::Local);
        }
        PinOp::Unpin(index) => {
            set.unpin(&uri(*index));
        }
        PinOp::MoveUp(index) => {
            set.move_up(&uri(*index));
        }
        PinOp::MoveDown(index) => {
            set.move_down(&uri(*index));
        }
        PinOp::UnpinAll => set.unpin_all(),
    }
}

fn assert_dense(set: &PinnedSet) {
    let mut orders: Vec<usize> = set.ordered().iter().map(|entry| entry.order).collect();
    orders.sort_unstable();
    let expected: Vec<usize> = (0..set.len()).collect();
    assert_eq!(orders, expected, "orders must be a permutation of 0..{}", set.len());
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn orders_stay_dense_after_any_operation_sequence(
        ops in proptest::collection::vec(pin_op(), 0..64),
    ) {
        let mut set = PinnedSet::new();
        for op in &ops {
            apply(&mut set, op);
            assert_dense(&set);
        }
    }

    #[test]
    fn move_up_then_down_restores_order(
        count in 2usize..URI_POOL,
        pick in 0usize..URI_POOL,
    ) {
        let mut set = PinnedSet::new();
        for index in 0..count {
            set.pin(uri(index), WorkspaceKind::Local);
        }
        let target = uri(1 + pick % (count - 1));
        let before = set.clone();

        prop_assert!(set.move_up(&target));
        prop_assert!(set.move_down(&target));
        prop_assert_eq!(set, before);
    }

    #[test]
    fn persisted_roundtrip_preserves_order(
        ops in proptest::collection::vec(pin_op(), 0..32),
    ) {
        let mut set = PinnedSet::new();
        for op in &ops {
            apply(&mut set, op);
        }

        let json = serde_json::to_string(&set).expect("pinned set should serialize");
        let restored: PinnedSet = serde_json::from_str(&json).expect("pinned set should deserialize");
        prop_assert_eq!(restored, set);
    }
}

#[test]
fn boundary_moves_leave_state_unchanged() {
    let mut set = PinnedSet::new();
    for index in 0..4 {
        set.pin(uri(index), WorkspaceKind::Local);
    }
    let before = set.clone();

    set.move_up(&uri(0));
    set.move_down(&uri(3));

    assert_eq!(set, before);
}
