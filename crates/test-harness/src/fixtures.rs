//! Test fixtures for common test scenarios

use std::rc::Rc;
use std::time::Duration;

use presenter::message::{Layout, Media, MediaKind, MessageContent};
use presenter::{Config, DisplayChoice, Message, MessageSource};

use crate::headless::TestPresenter;

/// Auto-dismiss duration used by timer fixtures
pub const AUTO_DISMISS: Duration = Duration::from_secs(3);

/// A manually-closed banner with no source context
pub fn banner(title: &str) -> Message {
    Message::banner(title)
}

/// A banner tied to a fresh, valid source context
pub fn managed_banner(title: &str) -> (Message, Rc<MessageSource>) {
    let source = MessageSource::new();
    let message = Message::banner(title).with_source(&source);
    (message, source)
}

/// A banner that dismisses itself after [`AUTO_DISMISS`]
pub fn auto_banner(title: &str) -> Message {
    Message::banner(title).auto_dismiss(AUTO_DISMISS)
}

/// A modal with an animated GIF
pub fn gif_modal(title: &str) -> Message {
    Message::new(MessageContent {
        layout: Layout::Modal,
        title: title.to_string(),
        body: "body".to_string(),
        media: Some(Media {
            url: "https://example.invalid/promo.gif".to_string(),
            kind: MediaKind::Gif,
        }),
    })
}

/// A presenter whose delegate defers every message
pub fn deferring_presenter() -> TestPresenter {
    let tp = TestPresenter::new();
    tp.delegate().set_default_choice(DisplayChoice::Later);
    tp
}

/// A presenter with `count` deferred banners, returned oldest first
pub fn presenter_with_stack(count: usize) -> (TestPresenter, Vec<Message>) {
    let mut tp = deferring_presenter();
    let messages: Vec<Message> = (0..count).map(|i| banner(&format!("stacked-{i}"))).collect();
    for message in &messages {
        tp.present(message.clone());
    }
    (tp, messages)
}

/// A headless presenter whose host reports itself unpresentable
pub fn unpresentable_headless() -> TestPresenter {
    let tp = TestPresenter::with_config(Config::headless());
    tp.backend().host.set_presentable(false);
    tp
}
