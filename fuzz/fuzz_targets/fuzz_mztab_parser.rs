#![no_main]

use libfuzzer_sys::fuzz_target;
use mztab::parser::{parse_reader, MzTabParser, ParserConfig};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Whole-document parsing must fail with an error, never a panic
    let _ = parse_reader(Cursor::new(data), &ParserConfig::default());

    // Line-by-line, with every error accumulated and no integrity checks
    let config = ParserConfig {
        max_errors: usize::MAX,
        validate_integrity: false,
        ..Default::default()
    };
    let mut parser = MzTabParser::new(config);
    for (index, line) in String::from_utf8_lossy(data).lines().enumerate() {
        if parser.parse_line(index + 1, line).is_err() {
            return;
        }
    }
    let _ = parser.finish();
});
