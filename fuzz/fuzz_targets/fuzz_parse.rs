#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(selector) = std::str::from_utf8(data) {
        // Parsing may reject the input but must never panic
        let _ = cssoxide::parse(selector);
    }
});
