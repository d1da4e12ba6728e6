#![no_main]
//! Fuzz target for the arithmetic evaluator.

use beanfront_parser::evaluate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = evaluate(input);
    }
});
