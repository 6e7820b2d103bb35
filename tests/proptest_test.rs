use huffman_archiver::canonical::CanonicalCode;
use huffman_archiver::huffman::{canonical_code, Alphabet};
use huffman_archiver::{read_archive, write_archive, ArchiveEntry};
use proptest::prelude::*;

fn entry() -> impl Strategy<Value = ArchiveEntry> {
    (
        "[a-zA-Z0-9_./-]{1,16}",
        prop::collection::vec(any::<u8>(), 0..600),
    )
        .prop_map(|(name, contents)| ArchiveEntry::new(name, contents))
}

/// Contents where byte `i` appears roughly fib(i) times, giving a deep tree.
fn skewed_contents(depth: usize) -> Vec<u8> {
    let (mut a, mut b) = (1usize, 1usize);
    let mut out = Vec::new();
    for i in 0..depth {
        out.extend(std::iter::repeat(i as u8).take(a));
        (a, b) = (b, a + b);
    }
    out
}

proptest! {
    #[test]
    fn prop_archive_round_trip(entries in prop::collection::vec(entry(), 1..6)) {
        let bytes = write_archive(&entries, Vec::new()).unwrap();
        let decoded = read_archive(bytes.as_slice()).unwrap();
        prop_assert_eq!(decoded, entries);
    }

    #[test]
    fn prop_header_rebuilds_same_code(
        name in "[a-z]{1,8}",
        contents in prop::collection::vec(any::<u8>(), 0..2000),
    ) {
        let code = canonical_code(&Alphabet::for_record(name.as_bytes(), &contents)).unwrap();
        let rebuilt =
            CanonicalCode::from_header(code.symbols().to_vec(), code.length_counts().to_vec())
                .unwrap();
        prop_assert_eq!(&rebuilt, &code);

        let total: usize = code.length_counts().iter().map(|&c| c as usize).sum();
        prop_assert_eq!(total, code.len());
    }

    #[test]
    fn prop_codes_are_canonical_and_prefix_free(
        contents in prop::collection::vec(any::<u8>(), 0..1000),
    ) {
        let code = canonical_code(&Alphabet::for_record(b"f", &contents)).unwrap();
        let entries: Vec<_> = code.iter().collect();

        for pair in entries.windows(2) {
            let (s0, c0) = pair[0];
            let (s1, c1) = pair[1];
            prop_assert!((c0.len(), s0) < (c1.len(), s1));
        }
        for (i, (_, a)) in entries.iter().enumerate() {
            for (j, (_, b)) in entries.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn prop_deep_trees_round_trip(depth in 2usize..24) {
        let entries = vec![ArchiveEntry::new("skewed", skewed_contents(depth))];
        let bytes = write_archive(&entries, Vec::new()).unwrap();
        prop_assert_eq!(read_archive(bytes.as_slice()).unwrap(), entries);
    }
}
