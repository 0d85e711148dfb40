#![no_main]

use libfuzzer_sys::fuzz_target;
use statsd_ingest_core::lexer::{render, run};

// Feeds arbitrary bytes straight into the lexer. The only property under
// test is "never panics": malformed input should come back as an `Err`,
// never a crash. When a line does parse, round-trip it back through the
// renderer and re-lex the result, which must also never panic and must
// still decode to a structurally equal record.
fuzz_target!(|data: &[u8]| {
    let mut owned = data.to_vec();
    let Ok(record) = run(&mut owned, None) else {
        return;
    };

    let mut rendered = render(&record);
    if let Ok(reparsed) = run(&mut rendered, None) {
        assert_eq!(record, reparsed);
    }
});
