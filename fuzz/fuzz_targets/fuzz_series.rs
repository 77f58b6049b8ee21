#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // The series parser is total: it returns None instead of panicking
        let _ = cssoxide::series::parse(text);
    }
});
