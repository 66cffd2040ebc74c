#![no_main]
//! Fuzz target for script JSON parsing
//!
//! Feeds random bytes as JSON to the script parser. Parsing and validation
//! must never panic.

use libfuzzer_sys::fuzz_target;

use msgstack::Script;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Script::from_json(s);
    }
});
