//! Auto-dismiss timer tests
//!
//! Most of these use the manual clock. The `live_` tests run a real calloop
//! event loop with short timeouts.

use std::time::Duration;

use presenter::Message;
use test_harness::assertions::assert_invariants;
use test_harness::fixtures::{auto_banner, banner, AUTO_DISMISS};
use test_harness::live::LivePresenter;
use test_harness::TestPresenter;

#[test]
fn auto_dismiss_frees_slot() {
    let mut tp = TestPresenter::new();
    tp.present(auto_banner("a"));
    assert!(tp.snapshot().timer_armed);

    assert_eq!(tp.advance(AUTO_DISMISS), 1);
    assert!(tp.snapshot().active.is_none());
    assert_invariants(&tp);
}

#[test]
fn manual_dismiss_cancels_timer() {
    let mut tp = TestPresenter::new();
    tp.present(auto_banner("a"));
    tp.dismiss();

    assert_eq!(tp.clock().cancelled(), 1);
    assert_eq!(tp.clock().pending(), 0);
    assert_eq!(tp.advance(AUTO_DISMISS * 2), 0);
    assert_eq!(tp.dismissals(), 1);
}

#[test]
fn rescheduling_replaces_timer() {
    let mut tp = TestPresenter::new();
    tp.present(auto_banner("a"));

    assert!(tp.presenter_mut().schedule_auto_dismiss(Duration::from_secs(10)));
    assert_eq!(tp.clock().pending(), 1);
    assert_eq!(tp.clock().cancelled(), 1);

    // The original deadline passes without effect
    assert_eq!(tp.advance(AUTO_DISMISS), 0);
    assert!(tp.presenter().is_occupied());
    assert_eq!(tp.advance(Duration::from_secs(7)), 1);
}

#[test]
fn old_timer_never_dismisses_next_message() {
    let mut tp = TestPresenter::new();
    tp.present(auto_banner("a"));
    let stale = tp.presenter().pending_dismiss().expect("timer armed");
    tp.dismiss();

    let b = banner("b");
    tp.present(b.clone());
    assert!(!tp.presenter_mut().handle_dismiss_timer(stale));
    assert_eq!(tp.snapshot().active, Some(b.id()));
}

#[test]
fn refused_timer_leaves_message_up() {
    let mut tp = TestPresenter::new();
    tp.clock().refuse_next();
    tp.present(auto_banner("a"));

    assert!(tp.presenter().is_occupied());
    assert!(!tp.snapshot().timer_armed);

    // Host can retry by hand
    assert!(tp.presenter_mut().schedule_auto_dismiss(AUTO_DISMISS));
    assert_eq!(tp.advance(AUTO_DISMISS), 1);
}

#[test]
fn manual_message_has_no_timer() {
    let mut tp = TestPresenter::new();
    tp.present(banner("a"));
    assert_eq!(tp.clock().scheduled(), 0);
    assert_eq!(tp.advance(Duration::from_secs(3600)), 0);
}

#[test]
fn live_auto_dismiss_fires_on_event_loop() {
    let mut live = LivePresenter::new(Default::default()).expect("event loop");
    let message = Message::banner("live").auto_dismiss(Duration::from_millis(20));
    assert!(live.presenter_mut().present(message).is_presented());

    live.run_until(Duration::from_secs(2), |p| !p.is_occupied())
        .expect("auto-dismiss should fire");
    assert!(live.presenter().pending_dismiss().is_none());
}

#[test]
fn live_cancelled_timer_never_fires() {
    let mut live = LivePresenter::new(Default::default()).expect("event loop");
    live.presenter_mut()
        .present(Message::banner("first").auto_dismiss(Duration::from_millis(20)));
    live.presenter_mut().dismiss(None);

    let second = Message::banner("second");
    live.presenter_mut().present(second.clone());

    // Give the cancelled timer a chance to fire if it were still registered
    for _ in 0..5 {
        live.dispatch(Duration::from_millis(10)).expect("dispatch");
    }
    assert_eq!(live.presenter().active_message().map(Message::id), Some(second.id()));
}
