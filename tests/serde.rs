#![cfg(feature = "serde")]

use segdeque::{SegDeque, BLOCK_CAPACITY};
use serde_::Deserialize;
use serde_test::{assert_de_tokens, assert_tokens, Token};

#[test]
fn test_serde_empty_deque() {
    let my_deque: SegDeque<u32> = SegDeque::default();
    assert_tokens(&my_deque, &[Token::Seq { len: Some(0) }, Token::SeqEnd])
}

#[test]
fn test_serde_non_empty() {
    let mut my_deque: SegDeque<u32> = SegDeque::default();
    my_deque.push_back(2);
    my_deque.push_back(3);
    my_deque.push_front(1);
    assert_tokens(
        &my_deque,
        &[
            Token::Seq { len: Some(3) },
            Token::U32(1),
            Token::U32(2),
            Token::U32(3),
            Token::SeqEnd,
        ],
    )
}

#[test]
fn test_serde_across_blocks() {
    let mut my_deque: SegDeque<u32> = SegDeque::new();
    let n = BLOCK_CAPACITY as u32;
    for i in (0..n / 2).rev() {
        my_deque.push_front(i);
    }
    for i in n / 2..2 * n {
        my_deque.push_back(i);
    }
    assert!(my_deque.block_count() > 2);

    let mut tokens = vec![Token::Seq {
        len: Some(2 * BLOCK_CAPACITY),
    }];
    tokens.extend((0..2 * n).map(Token::U32));
    tokens.push(Token::SeqEnd);
    assert_tokens(&my_deque, &tokens);
}

#[test]
fn test_vec_to_deque_serde() {
    let plain: Vec<u32> = vec![1, 2, 3, 4];
    let json = serde_json::to_string(&plain).unwrap();
    let deque: SegDeque<u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        plain, deque,
        "Deserialized SegDeque is not identical to the original Vec"
    );
}

#[test]
fn test_deque_to_vec_serde() {
    let mut deque: SegDeque<u32> = SegDeque::new();
    deque.push_back(3);
    deque.push_back(4);
    deque.push_front(2);
    deque.push_front(1);
    let json = serde_json::to_string(&deque).unwrap();
    let plain: Vec<u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        deque, plain,
        "Deserialized Vec is not identical to the original SegDeque"
    );
}

#[test]
fn test_deserialize_in_place() {
    let mut shrink: SegDeque<String> = (0..10).map(|i| i.to_string()).collect();
    let mut de = serde_json::Deserializer::from_str(r#"["a","b","c"]"#);
    SegDeque::deserialize_in_place(&mut de, &mut shrink).unwrap();
    assert_eq!(shrink, vec!["a", "b", "c"]);

    let mut grow: SegDeque<String> = SegDeque::new();
    grow.push_back("x".to_string());
    let mut de = serde_json::Deserializer::from_str(r#"["a","b","c"]"#);
    SegDeque::deserialize_in_place(&mut de, &mut grow).unwrap();
    assert_eq!(grow, vec!["a", "b", "c"]);
}

#[test]
fn test_huge_length_hint() {
    // the hint only sizes the first allocation, so a lying one is harmless
    let empty: SegDeque<u32> = SegDeque::new();
    assert_de_tokens(&empty, &[Token::Seq { len: Some(usize::MAX) }, Token::SeqEnd]);

    let mut one: SegDeque<u32> = SegDeque::new();
    one.push_back(7);
    assert_de_tokens(
        &one,
        &[Token::Seq { len: Some(1 << 40) }, Token::U32(7), Token::SeqEnd],
    );
}

#[test]
fn test_deserialize_in_place_keeps_addresses() {
    let mut deque: SegDeque<u64> = (0..3 * BLOCK_CAPACITY as u64).collect();
    let first: *const u64 = &deque[0];
    let last: *const u64 = &deque[deque.len() - 1];

    let input: Vec<u64> = (100..100 + 3 * BLOCK_CAPACITY as u64).collect();
    let json = serde_json::to_string(&input).unwrap();
    let mut de = serde_json::Deserializer::from_str(&json);
    SegDeque::deserialize_in_place(&mut de, &mut deque).unwrap();

    assert_eq!(deque, input);
    assert!(std::ptr::eq(first, &deque[0]));
    assert!(std::ptr::eq(last, &deque[deque.len() - 1]));
}
