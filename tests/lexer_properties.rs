//! Property-based coverage of the two properties the hand-picked seed cases
//! can't exhaustively demonstrate: the lexer never panics on arbitrary
//! bytes, and an accepted line round-trips through its own renderer.

use proptest::prelude::*;
use statsd_ingest_core::lexer::render;
use statsd_ingest_core::run;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut owned = bytes.clone();
        let _ = run(&mut owned, None);
    }

    #[test]
    fn never_panics_with_a_namespace(
        bytes in prop::collection::vec(any::<u8>(), 0..256),
        namespace in "[a-zA-Z0-9_.]{0,16}",
    ) {
        let mut owned = bytes.clone();
        let _ = run(&mut owned, Some(&namespace));
    }

    #[test]
    fn accepted_lines_round_trip(
        name in "[a-zA-Z][a-zA-Z0-9_.]{0,15}",
        value in -1_000_000i64..1_000_000i64,
    ) {
        let line = format!("{name}:{value}|g");
        let mut owned = line.clone().into_bytes();
        if let Ok(record) = run(&mut owned, None) {
            let mut rendered = render(&record);
            let reparsed = run(&mut rendered, None);
            prop_assert_eq!(Ok(record), reparsed);
        }
    }
}
