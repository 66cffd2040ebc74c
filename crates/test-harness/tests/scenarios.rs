//! End-to-end presentation scenarios
//!
//! Each test drives the real presenter through the headless backend and checks
//! what the user would have seen.

use presenter::{DisplayChoice, PresentError, PresentOutcome, SourceContext};
use test_harness::assertions::{assert_built_in_order, assert_invariants};
use test_harness::fixtures::{self, banner, deferring_presenter, managed_banner, presenter_with_stack};
use test_harness::TestPresenter;

#[test]
fn deferred_message_shown_by_present_next() {
    let mut tp = deferring_presenter();
    let a = banner("a");

    assert_eq!(tp.present(a.clone()), PresentOutcome::Deferred);
    let snapshot = tp.snapshot();
    assert_eq!(snapshot.pending, vec![a.id()]);
    assert!(tp.presenter().current_message_view().is_none());

    assert_eq!(tp.present_next(), Some(PresentOutcome::Presented));
    assert!(tp.presenter().current_message_view().is_some());
    assert!(tp.snapshot().pending.is_empty());
    assert_invariants(&tp);
}

#[test]
fn second_message_waits_while_first_is_displayed() {
    let mut tp = TestPresenter::new();
    let a = banner("a");
    let b = banner("b");

    tp.present(a.clone());
    assert_eq!(tp.present(b.clone()), PresentOutcome::Stacked);

    let snapshot = tp.snapshot();
    assert_eq!(snapshot.active, Some(a.id()));
    assert_eq!(snapshot.pending, vec![b.id()]);
    assert_built_in_order(&tp, &[a.id()]);
    assert_invariants(&tp);
}

#[test]
fn stack_drains_last_in_first_out() {
    let (mut tp, messages) = presenter_with_stack(3);

    for _ in 0..3 {
        assert_eq!(tp.present_next(), Some(PresentOutcome::Presented));
        assert_invariants(&tp);
        tp.dismiss();
    }

    let expected: Vec<_> = messages.iter().rev().map(|m| m.id()).collect();
    assert_built_in_order(&tp, &expected);
    assert_eq!(tp.present_next(), None);
}

#[test]
fn now_choice_jumps_ahead_of_stack() {
    let (mut tp, messages) = presenter_with_stack(2);
    let urgent = banner("urgent");
    tp.delegate().choose_for(urgent.id(), DisplayChoice::Now);

    assert_eq!(tp.present(urgent.clone()), PresentOutcome::Presented);
    assert_eq!(tp.snapshot().active, Some(urgent.id()));
    assert_eq!(tp.snapshot().pending, messages.iter().map(|m| m.id()).collect::<Vec<_>>());
}

#[test]
fn dismiss_when_free_completes_immediately() {
    let mut tp = TestPresenter::new();
    assert!(tp.dismiss());
    assert_eq!(tp.dismissals(), 0);
}

#[test]
fn dismissal_leaves_stack_for_host_to_advance() {
    let mut tp = TestPresenter::new();
    tp.present(banner("a"));
    tp.present(banner("b"));

    assert!(tp.dismiss());
    let snapshot = tp.snapshot();
    assert!(snapshot.active.is_none());
    assert_eq!(snapshot.pending.len(), 1);

    tp.present_next();
    assert!(tp.snapshot().pending.is_empty());
}

#[test]
fn late_discard_never_reaches_view_builder() {
    let mut tp = deferring_presenter();
    let (message, source) = managed_banner("stale");
    tp.present(message.clone());
    source.discard();

    assert_eq!(
        tp.present_next(),
        Some(PresentOutcome::Rejected(PresentError::SourceContextDiscarded))
    );
    let snapshot = tp.snapshot();
    assert!(snapshot.built.is_empty());
    assert!(snapshot.pending.is_empty());
    assert!(tp.delegate().prepared().is_empty());
    assert_eq!(source.errors(), vec![PresentError::SourceContextDiscarded]);

    // Nothing left to retry
    assert_eq!(tp.present_next(), None);
}

#[test]
fn stale_top_entry_does_not_block_older_entries() {
    let mut tp = deferring_presenter();
    let older = banner("older");
    let (stale, source) = managed_banner("stale");
    tp.present(older.clone());
    tp.present(stale);
    source.set_valid(false);

    assert!(matches!(tp.present_next(), Some(PresentOutcome::Rejected(_))));
    assert_eq!(tp.present_next(), Some(PresentOutcome::Presented));
    assert_eq!(tp.snapshot().active, Some(older.id()));
}

#[test]
fn headless_mode_ignores_host_presentability() {
    let mut tp = fixtures::unpresentable_headless();
    assert_eq!(tp.present(banner("a")), PresentOutcome::Presented);

    let mut hosted = TestPresenter::new();
    hosted.backend().host.set_presentable(false);
    assert_eq!(
        hosted.present(banner("a")),
        PresentOutcome::Rejected(PresentError::HostNotPresentable)
    );
}

#[test]
fn host_losing_presentability_keeps_stacked_message() {
    let mut tp = deferring_presenter();
    let a = banner("a");
    tp.present(a.clone());

    tp.backend().host.set_presentable(false);
    assert_eq!(
        tp.present_next(),
        Some(PresentOutcome::Rejected(PresentError::HostNotPresentable))
    );
    assert_eq!(tp.snapshot().pending, vec![a.id()]);

    tp.backend().host.set_presentable(true);
    assert_eq!(tp.present_next(), Some(PresentOutcome::Presented));
}

#[test]
fn discarded_by_delegate_is_reported_upstream() {
    let mut tp = TestPresenter::new();
    tp.delegate().set_default_choice(DisplayChoice::Discard);
    let (message, source) = managed_banner("a");

    assert_eq!(tp.present(message), PresentOutcome::Discarded);
    assert!(source.is_discarded());
    assert_invariants(&tp);
}

#[test]
fn dropped_delegate_means_show_now() {
    let mut tp = TestPresenter::new();
    tp.delegate().set_default_choice(DisplayChoice::Later);
    tp.drop_delegate();

    assert_eq!(tp.present(banner("a")), PresentOutcome::Presented);
}

#[test]
fn gif_media_is_rendered_with_provider() {
    use presenter::backend::headless::SurfaceEvent;

    let mut tp = TestPresenter::new();
    let modal = fixtures::gif_modal("promo");
    tp.present(modal.clone());

    let animated = tp.backend().log.count(|e| {
        matches!(e, SurfaceEvent::ViewBuilt { message, animated_media: true } if *message == modal.id())
    });
    assert_eq!(animated, 1);
}

#[test]
fn delegate_sees_every_accepted_message_once() {
    let mut tp = TestPresenter::new();
    let a = banner("a");
    let b = banner("b");
    tp.present(a.clone());
    tp.present(b.clone()); // stacked by the exclusivity guard, delegate not asked

    assert_eq!(tp.delegate().asked(), vec![a.id()]);
    assert_eq!(tp.delegate().prepared(), vec![a.id()]);
}
