#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config parsing and entry resolution must never panic
        if let Ok(config) = toml::from_str::<stylesync::Config>(content) {
            let _ = config.resolve_entries(std::path::Path::new("/project"), false);
        }
    }
});
