#![no_main]
//! Fuzz target for config TOML parsing
//!
//! Feeds random bytes as TOML to the config parser to find panics,
//! hangs, or unexpected behavior in deserialization and validation.

use std::time::Duration;

use libfuzzer_sys::fuzz_target;

use presenter::config::Config;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = toml::from_str::<Config>(s) {
            // Accepted configs must clamp without panicking
            if config.validate().is_ok() {
                let _ = config.clamp_auto_dismiss(Duration::from_secs(u64::MAX / 2));
            }
        }
    }
});
