//! Script format

use std::collections::HashSet;
use std::time::Duration;

use presenter::config::ConfigError;
use presenter::message::{Layout, Media, MessageContent};
use presenter::{Config, DisplayChoice, Message, OrientationRequirement};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("invalid script JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config in script: {0}")]
    Config(#[from] ConfigError),

    #[error("label {0:?} is presented more than once")]
    DuplicateLabel(String),

    #[error("step {step} refers to unknown label {label:?}")]
    UnknownLabel { step: usize, label: String },

    #[error("event loop error: {0}")]
    EventLoop(#[from] calloop::Error),
}

/// A message to present, as written in a script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageSpec {
    /// Name used by later `invalidate` steps and in the summary
    pub label: String,

    #[serde(default)]
    pub layout: Layout,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub media: Option<Media>,

    /// Auto-dismiss delay; manual close when absent
    #[serde(default)]
    pub close_after_ms: Option<u64>,

    #[serde(default)]
    pub orientation: OrientationRequirement,

    #[serde(default)]
    pub animate: bool,

    /// Answer the scripted delegate gives for this message
    #[serde(default)]
    pub choice: DisplayChoice,
}

impl MessageSpec {
    /// Build the presenter message. The caller attaches the source context.
    pub fn to_message(&self) -> Message {
        let content = MessageContent {
            layout: self.layout,
            title: self.title.clone().unwrap_or_else(|| self.label.clone()),
            body: self.body.clone(),
            media: self.media.clone(),
        };
        let message = Message::new(content)
            .with_orientation(self.orientation)
            .animated(self.animate);
        match self.close_after_ms {
            Some(ms) => message.auto_dismiss(Duration::from_millis(ms)),
            None => message,
        }
    }
}

/// One script step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Present(MessageSpec),
    PresentNext,
    Dismiss,
    /// Run the event loop for this many milliseconds
    WaitMs(u64),
    /// Mark the labelled message's source invalid
    Invalidate(String),
    /// Mark the labelled message's source discarded
    Discard(String),
    SetHostPresentable(bool),
    ClearPending,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Presenter config; `Config::headless()` when absent
    #[serde(default)]
    pub config: Option<Config>,

    pub steps: Vec<Step>,
}

impl Script {
    /// Parse and check a script.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    /// Check config values and label references.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if let Some(config) = &self.config {
            config.validate()?;
        }

        let mut labels = HashSet::new();
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Present(spec) => {
                    if !labels.insert(spec.label.as_str()) {
                        return Err(ScriptError::DuplicateLabel(spec.label.clone()));
                    }
                }
                Step::Invalidate(label) | Step::Discard(label) => {
                    if !labels.contains(label.as_str()) {
                        return Err(ScriptError::UnknownLabel {
                            step: index,
                            label: label.clone(),
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn config(&self) -> Config {
        self.config.clone().unwrap_or_else(Config::headless)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_step_kinds() {
        let script = Script::from_json(
            r#"{
                "steps": [
                    {"present": {"label": "a", "layout": "modal", "close_after_ms": 50, "choice": "later"}},
                    {"present_next": null},
                    {"dismiss": null},
                    {"wait_ms": 10},
                    {"invalidate": "a"},
                    {"discard": "a"},
                    {"set_host_presentable": false},
                    {"clear_pending": null}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 8);
        let Step::Present(spec) = &script.steps[0] else {
            panic!("expected present step");
        };
        assert_eq!(spec.layout, Layout::Modal);
        assert_eq!(spec.choice, DisplayChoice::Later);
        assert_eq!(spec.close_after_ms, Some(50));
    }

    #[test]
    fn unit_steps_accept_bare_strings() {
        let script = Script::from_json(r#"{"steps": ["present_next", "dismiss"]}"#).unwrap();
        assert_eq!(script.steps, vec![Step::PresentNext, Step::Dismiss]);
    }

    #[test]
    fn missing_config_means_headless() {
        let script = Script::from_json(r#"{"steps": []}"#).unwrap();
        assert!(script.config().headless_mode);
    }

    #[test]
    fn script_config_is_validated() {
        let err = Script::from_json(r#"{"config": {"max_auto_dismiss_secs": -2.0}, "steps": []}"#)
            .unwrap_err();
        assert!(matches!(err, ScriptError::Config(_)));
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = Script::from_json(r#"{"steps": [{"invalidate": "ghost"}]}"#).unwrap_err();
        assert!(matches!(err, ScriptError::UnknownLabel { step: 0, .. }));
    }

    #[test]
    fn invalidate_before_present_is_rejected() {
        let err = Script::from_json(
            r#"{"steps": [{"invalidate": "a"}, {"present": {"label": "a"}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::UnknownLabel { .. }));
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let err = Script::from_json(
            r#"{"steps": [{"present": {"label": "a"}}, {"present": {"label": "a"}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::DuplicateLabel(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Script::from_json(r#"{"steps": [{"present": {"label": "a", "colour": 1}}]}"#).is_err());
    }

    #[test]
    fn spec_builds_auto_dismiss_message() {
        let spec = MessageSpec {
            label: "a".into(),
            layout: Layout::Card,
            title: None,
            body: String::new(),
            media: None,
            close_after_ms: Some(250),
            orientation: OrientationRequirement::Portrait,
            animate: true,
            choice: DisplayChoice::Now,
        };
        let message = spec.to_message();
        assert_eq!(message.content().title, "a");
        assert_eq!(message.close_policy(), presenter::ClosePolicy::Auto(Duration::from_millis(250)));
        assert_eq!(message.orientation(), OrientationRequirement::Portrait);
        assert!(message.animate_in());
    }
}
