use shub_kernel::SAFE_ALPHABET;
use shub_kernel::safe_nanoid;

#[test]
fn generates_expected_length_and_charset() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);

    for ch in id.chars() {
        assert!(SAFE_ALPHABET.contains(&ch), "unexpected character in nanoid: {ch}");
    }
}

#[test]
fn custom_length() {
    let id = safe_nanoid!(20);
    assert_eq!(id.len(), 20);
}

#[test]
fn ids_are_unique_across_a_batch() {
    let mut ids: Vec<String> = (0..64).map(|_| safe_nanoid!()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 64);
}
