//! Test assertions for presenter state

use presenter::MessageId;

use crate::headless::{PresenterSnapshot, TestPresenter};

/// Assert at most one surface is live and it matches the slot state
pub fn assert_single_active(snapshot: &PresenterSnapshot) {
    let expected = usize::from(snapshot.active.is_some());
    assert_eq!(
        snapshot.live_surfaces, expected,
        "live surfaces ({}) should match occupied slot ({:?})",
        snapshot.live_surfaces, snapshot.active
    );
}

/// Assert the active message is not also waiting in the stack
pub fn assert_stack_disjoint(snapshot: &PresenterSnapshot) {
    if let Some(active) = snapshot.active {
        assert!(
            !snapshot.pending.contains(&active),
            "active message {} is also in the pending stack {:?}",
            active,
            snapshot.pending
        );
    }
}

/// Assert no identity appears twice in the stack
pub fn assert_stack_unique(snapshot: &PresenterSnapshot) {
    for (i, id) in snapshot.pending.iter().enumerate() {
        assert!(
            !snapshot.pending[i + 1..].contains(id),
            "message {} is stacked more than once: {:?}",
            id,
            snapshot.pending
        );
    }
}

/// Assert a free slot has no timer armed
pub fn assert_free_has_no_timer(snapshot: &PresenterSnapshot) {
    if snapshot.active.is_none() {
        assert!(!snapshot.timer_armed, "free presenter has a dismiss timer armed");
    }
}

/// Run every structural invariant check
pub fn assert_invariants(tp: &TestPresenter) {
    let snapshot = tp.snapshot();
    assert_single_active(&snapshot);
    assert_stack_disjoint(&snapshot);
    assert_stack_unique(&snapshot);
    assert_free_has_no_timer(&snapshot);
}

/// Assert the view builder rendered exactly these messages, in order
pub fn assert_built_in_order(tp: &TestPresenter, expected: &[MessageId]) {
    let built = tp.snapshot().built;
    assert_eq!(built, expected, "messages rendered in unexpected order");
}
