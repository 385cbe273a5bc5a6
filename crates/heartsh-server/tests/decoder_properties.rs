//! Property-based tests for key decoding.

use heartsh_app::KeyInput;
use heartsh_server::KeyDecoder;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_printable_text_decodes_to_chars(text in "[ -~]{0,64}") {
        let keys = KeyDecoder::new().feed(text.as_bytes());

        let expected: Vec<KeyInput> = text.chars().map(KeyInput::Char).collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn prop_chunking_does_not_change_keys(
        bytes in prop::collection::vec(any::<u8>(), 2..128),
        split in 1usize..127,
    ) {
        prop_assume!(split < bytes.len());
        let (head, tail) = bytes.split_at(split);
        prop_assume!(head != [0x1b] && tail != [0x1b]);

        let whole = KeyDecoder::new().feed(&bytes);

        let mut decoder = KeyDecoder::new();
        let mut chunked = decoder.feed(head);
        chunked.extend(decoder.feed(tail));

        prop_assert_eq!(whole, chunked);
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..16)) {
        let mut decoder = KeyDecoder::new();
        for chunk in chunks {
            decoder.feed(&chunk);
        }
    }
}
