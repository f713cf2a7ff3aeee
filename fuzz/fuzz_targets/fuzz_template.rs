#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use stylesync::FilenameTemplate;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    // First line is the template, second the source name, the rest content
    let mut parts = input.splitn(3, '\n');
    let template = FilenameTemplate::new(parts.next().unwrap_or_default());
    let source = parts.next().unwrap_or_default();
    let content = parts.next().unwrap_or_default();

    let rendered = template.render(Path::new(source), content);
    let _ = template.recover(&rendered);
    let _ = template.recover(source);
});
