#![no_main]

use libfuzzer_sys::fuzz_target;
use stylesync::FileMatcher;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let (pattern, name) = input.split_once('\n').unwrap_or((input, "main.scss"));
        if let Ok(matcher) = FileMatcher::new(pattern) {
            let _ = matcher.matches(name);
        }
    }
});
