//! Boundary and edge case tests
//!
//! These tests verify behavior at boundaries and edge cases that property tests might miss.

use std::thread;
use std::time::Duration;

use presenter::delegate::WindowLevel;
use presenter::host::OrientationTraits;
use presenter::message::OrientationRequirement;
use presenter::{Config, Message, PresentError, PresentOutcome};
use test_harness::assertions::{assert_built_in_order, assert_invariants};
use test_harness::fixtures::{auto_banner, banner, deferring_presenter, AUTO_DISMISS};
use test_harness::TestPresenter;

// ========== Empty state tests ==========

#[test]
fn empty_stack_present_next_returns_none() {
    let mut tp = TestPresenter::new();
    assert_eq!(tp.present_next(), None);
    assert!(tp.snapshot().built.is_empty());
}

#[test]
fn empty_presenter_has_no_view() {
    let tp = TestPresenter::new();
    assert!(tp.presenter().current_message_view().is_none());
    assert!(!tp.presenter().surface_active());
    assert!(tp.presenter().pending_dismiss().is_none());
}

#[test]
fn schedule_without_active_message_is_noop() {
    let mut tp = TestPresenter::new();
    assert!(!tp.presenter_mut().schedule_auto_dismiss(AUTO_DISMISS));
    assert_eq!(tp.clock().scheduled(), 0);
}

// ========== Stack identity tests ==========

#[test]
fn same_message_deferred_twice_is_stacked_once() {
    let mut tp = deferring_presenter();
    let a = banner("a");
    tp.present(a.clone());
    tp.present(a.clone());

    assert_eq!(tp.snapshot().pending, vec![a.id()]);
}

#[test]
fn presenting_active_message_again_does_not_stack_it() {
    let mut tp = TestPresenter::new();
    let a = banner("a");

    assert_eq!(tp.present(a.clone()), PresentOutcome::Presented);
    assert_eq!(
        tp.present(a.clone()),
        PresentOutcome::Rejected(PresentError::AnotherMessageActive)
    );
    assert_invariants(&tp);
    assert!(tp.snapshot().pending.is_empty());

    // Nothing left to show it a second time
    tp.dismiss();
    assert_eq!(tp.present_next(), None);
    assert_built_in_order(&tp, &[a.id()]);
}

#[test]
fn presenting_stacked_message_directly_removes_it() {
    let mut tp = deferring_presenter();
    let a = banner("a");
    let b = banner("b");
    tp.present(a.clone());
    tp.present(b.clone());

    tp.delegate().choose_for(a.id(), presenter::DisplayChoice::Now);
    assert_eq!(tp.present(a.clone()), PresentOutcome::Presented);
    assert_eq!(tp.snapshot().pending, vec![b.id()]);
}

#[test]
fn clear_pending_discards_sources() {
    let mut tp = deferring_presenter();
    let (message, source) = test_harness::fixtures::managed_banner("a");
    tp.present(message);

    assert_eq!(tp.presenter_mut().clear_pending(), 1);
    assert!(presenter::SourceContext::is_discarded(source.as_ref()));
    assert_eq!(tp.present_next(), None);
}

// ========== Busy slot tests ==========

#[test]
fn busy_slot_without_stacking_rejects() {
    let config = Config {
        stack_when_busy: false,
        ..Config::default()
    };
    let mut tp = TestPresenter::with_config(config);
    tp.present(banner("a"));

    assert_eq!(
        tp.present(banner("b")),
        PresentOutcome::Rejected(PresentError::AnotherMessageActive)
    );
    assert!(tp.snapshot().pending.is_empty());
}

#[test]
fn present_next_while_busy_keeps_entry() {
    let mut tp = TestPresenter::new();
    tp.present(banner("a"));
    let b = banner("b");
    tp.present(b.clone());

    assert_eq!(
        tp.present_next(),
        Some(PresentOutcome::Rejected(PresentError::AnotherMessageActive))
    );
    assert_eq!(tp.snapshot().pending, vec![b.id()]);
}

// ========== Orientation tests ==========

#[test]
fn landscape_only_message_on_portrait_host() {
    let mut tp = TestPresenter::new();
    tp.backend().host.set_orientation_traits(Some(OrientationTraits::PORTRAIT));
    let message = Message::banner("wide").with_orientation(OrientationRequirement::Landscape);

    assert_eq!(
        tp.present(message),
        PresentOutcome::Rejected(PresentError::OrientationUnsupported(OrientationRequirement::Landscape))
    );
}

#[test]
fn unknown_host_orientation_accepts_anything() {
    let mut tp = TestPresenter::new();
    tp.backend().host.set_orientation_traits(None);
    let message = Message::banner("tall").with_orientation(OrientationRequirement::Portrait);

    assert_eq!(tp.present(message), PresentOutcome::Presented);
}

// ========== Render failure tests ==========

#[test]
fn refused_layout_frees_slot_and_discards() {
    let mut tp = TestPresenter::new();
    tp.backend().views.refuse_layout(presenter::message::Layout::Banner);
    let (message, source) = test_harness::fixtures::managed_banner("a");

    assert_eq!(
        tp.present(message),
        PresentOutcome::Rejected(PresentError::NoRenderableView)
    );
    assert!(!tp.presenter().is_occupied());
    assert!(presenter::SourceContext::is_discarded(source.as_ref()));

    tp.backend().views.accept_all();
    assert_eq!(tp.present(banner("b")), PresentOutcome::Presented);
}

#[test]
fn deferred_icon_warning_reported_once() {
    let mut tp = deferring_presenter();
    tp.backend().icons.set_available(false);
    let (message, source) = test_harness::fixtures::managed_banner("a");

    assert_eq!(tp.present(message), PresentOutcome::Deferred);
    assert!(source.errors().is_empty());

    assert_eq!(tp.present_next(), Some(PresentOutcome::Presented));
    assert_eq!(source.errors(), vec![PresentError::IconAssetUnavailable]);
}

#[test]
fn missing_icon_font_only_warns() {
    let mut tp = TestPresenter::new();
    tp.backend().icons.set_available(false);
    let (message, source) = test_harness::fixtures::managed_banner("a");

    assert_eq!(tp.present(message), PresentOutcome::Presented);
    assert_eq!(source.errors(), vec![PresentError::IconAssetUnavailable]);
}

// ========== Thread affinity tests ==========

#[test]
fn call_from_foreign_thread_is_rejected() {
    let other = thread::spawn(|| thread::current().id()).join().expect("thread panicked");
    let backend = presenter::backend::headless::HeadlessBackend::new();
    let mut presenter = presenter::Presenter::new(
        Config::default(),
        backend.collaborators(),
        Box::new(test_harness::ManualClock::new()),
    )
    .with_ui_thread(other);

    assert_eq!(
        presenter.present(banner("a")),
        PresentOutcome::Rejected(PresentError::WrongThread)
    );
    assert!(backend.log.events().is_empty());
}

// ========== Timer boundary tests ==========

#[test]
fn timer_fires_exactly_at_deadline() {
    let mut tp = TestPresenter::new();
    tp.present(auto_banner("a"));

    assert_eq!(tp.advance(AUTO_DISMISS - Duration::from_millis(1)), 0);
    assert!(tp.presenter().is_occupied());
    assert_eq!(tp.advance(Duration::from_millis(1)), 1);
    assert!(!tp.presenter().is_occupied());
}

#[test]
fn overlong_auto_dismiss_is_clamped() {
    let config = Config {
        max_auto_dismiss_secs: 1.0,
        ..Config::default()
    };
    let mut tp = TestPresenter::with_config(config);
    tp.present(Message::banner("a").auto_dismiss(Duration::from_secs(600)));

    assert_eq!(tp.advance(Duration::from_secs(1)), 1);
}

#[test]
fn window_level_from_delegate_reaches_surface() {
    use presenter::backend::headless::SurfaceEvent;

    let mut tp = TestPresenter::new();
    tp.delegate().set_window_level(Some(WindowLevel::ALERT));
    tp.present(banner("a"));

    let at_alert = tp.backend().log.count(|e| {
        matches!(e, SurfaceEvent::Created { window_level, .. } if *window_level == WindowLevel::ALERT)
    });
    assert_eq!(at_alert, 1);
}
