//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary text through `AppConfig::parse()`, then checks that any
//! config it accepts also builds reader options.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = smartread_config::AppConfig::parse(s) {
        assert!(smartread_core::ReaderOptions::try_from(&config).is_ok());
    }
});
