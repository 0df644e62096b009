//
// Copyright (c) 2025 Nathan Fiedler
//
use blockarray::BlockArray;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Operation {
    Push(String),
    Pop,
    PopIf(bool),
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, ..ProptestConfig::default() })]

    #[test]
    fn test_strings_match_vec(ops in proptest::collection::vec(
        prop_oneof![
            3 => "[a-z]{1,12}".prop_map(Operation::Push),
            2 => Just(Operation::Pop),
            1 => any::<bool>().prop_map(Operation::PopIf),
        ],
        0..1_000
    )) {
        let mut sut: BlockArray<String> = BlockArray::new();
        let mut reference: Vec<String> = Vec::new();
        for op in ops {
            match op {
                Operation::Push(value) => {
                    sut.push(value.clone());
                    reference.push(value);
                }
                Operation::Pop => {
                    prop_assert_eq!(sut.pop(), reference.pop());
                }
                Operation::PopIf(accept) => {
                    let expected = if accept { reference.pop() } else { None };
                    prop_assert_eq!(sut.pop_if(|_| accept), expected);
                }
            }
            prop_assert_eq!(sut.len(), reference.len());
            prop_assert_eq!(sut.is_empty(), reference.is_empty());
        }
        for (idx, value) in reference.iter().enumerate() {
            prop_assert_eq!(&sut[idx], value);
        }
        prop_assert_eq!(format!("{sut:?}"), format!("{reference:?}"));
    }
}

#[test]
fn test_words_pop_and_push() {
    let words = [
        "apple",
        "banana",
        "cherry",
        "date",
        "elderberry",
        "fig",
        "grape",
        "honeydew",
        "kiwi",
        "lemon",
    ];
    let mut sut: BlockArray<String> = words.iter().map(|w| w.to_string()).collect();
    assert_eq!(sut.pop().as_deref(), Some("lemon"));
    assert_eq!(sut.pop().as_deref(), Some("kiwi"));
    sut.push(String::from("mango"));
    sut.push(String::from("nectarine"));
    assert_eq!(sut[7], "honeydew");
    assert_eq!(sut[8], "mango");
    assert_eq!(sut[9], "nectarine");
    assert_eq!(sut.len(), 10);
}

#[test]
fn test_pop_empty_is_not_an_error() {
    let mut sut: BlockArray<String> = BlockArray::default();
    assert!(sut.pop().is_none());
    assert_eq!(sut.len(), 0);
    sut.push(String::from("one"));
    assert_eq!(sut.pop().as_deref(), Some("one"));
    assert!(sut.pop().is_none());
    assert!(sut.pop().is_none());
    assert_eq!(sut.len(), 0);
    assert!(sut.is_empty());
}
