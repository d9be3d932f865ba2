#![cfg(feature = "rayon")]

#[macro_use]
extern crate lazy_static;

use rayon_::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator,
    IntoParallelRefMutIterator, ParallelExtend, ParallelIterator,
};
use segdeque::{SegDeque, BLOCK_CAPACITY};

macro_rules! assert_eq3 {
    ($e1:expr, $e2:expr, $e3:expr) => {{
        assert_eq!($e1, $e2);
        assert_eq!($e1, $e3);
        assert_eq!($e2, $e3);
    }};
}

lazy_static! {
    static ref DEQUE_EMPTY: SegDeque<u32> = SegDeque::new();
    static ref DEQUE: SegDeque<u32> = {
        let mut deque = SegDeque::new();
        deque.push_back(30);
        deque.push_front(10);
        deque.push_back(50);
        deque.push_front(20);
        deque.push_back(60);
        deque.push_back(40);
        deque
    };
    // starts part way into a block and spans many of them
    static ref DEQUE_LARGE: SegDeque<u32> = {
        let mut deque = SegDeque::new();
        for i in 0..(20 * BLOCK_CAPACITY as u32) {
            deque.push_back(i);
        }
        for i in 1..=(3 * BLOCK_CAPACITY as u32 / 2) {
            deque.push_front(u32::MAX - i);
        }
        deque
    };
}

#[test]
fn seq_par_equivalence_iter_empty() {
    let vec_seq = DEQUE_EMPTY.iter().collect::<Vec<_>>();
    let vec_par = DEQUE_EMPTY.par_iter().collect::<Vec<_>>();

    assert_eq3!(vec_seq, vec_par, &[] as &[&u32]);
}

#[test]
fn seq_par_equivalence_iter() {
    let vec_seq = DEQUE.iter().collect::<Vec<_>>();
    let vec_par = DEQUE.par_iter().collect::<Vec<_>>();

    assert_eq3!(vec_seq, vec_par, [&20, &10, &30, &50, &60, &40]);
}

#[test]
fn seq_par_equivalence_iter_large() {
    let vec_seq = DEQUE_LARGE.iter().collect::<Vec<_>>();
    let vec_par = DEQUE_LARGE.par_iter().with_max_len(7).collect::<Vec<_>>();

    assert_eq!(vec_seq, vec_par);
    assert_eq!(DEQUE_LARGE.par_iter().len(), DEQUE_LARGE.len());
    assert_eq!(
        DEQUE_LARGE.par_iter().map(|&v| u64::from(v)).sum::<u64>(),
        DEQUE_LARGE.iter().map(|&v| u64::from(v)).sum::<u64>()
    );
}

#[test]
fn par_iter_indexed_adaptors() {
    let positions = DEQUE_LARGE
        .par_iter()
        .enumerate()
        .filter(|&(_, &v)| v % 5 == 0)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let expected = DEQUE_LARGE
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v % 5 == 0)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    assert_eq!(positions, expected);

    let rev = DEQUE_LARGE.par_iter().rev().collect::<Vec<_>>();
    assert!(rev.into_iter().eq(DEQUE_LARGE.iter().rev()));
}

#[test]
fn seq_par_equivalence_iter_mut_empty() {
    let mut deque1 = DEQUE_EMPTY.clone();
    let mut deque2 = DEQUE_EMPTY.clone();

    let vec_seq = deque1.iter_mut().collect::<Vec<_>>();
    let vec_par = deque2.par_iter_mut().collect::<Vec<_>>();

    assert_eq3!(vec_seq, vec_par, &[] as &[&u32]);
}

#[test]
fn seq_par_equivalence_iter_mut() {
    let mut deque1 = DEQUE.clone();
    let mut deque2 = DEQUE.clone();

    let vec_seq = deque1.iter_mut().collect::<Vec<_>>();
    let vec_par = deque2.par_iter_mut().collect::<Vec<_>>();

    assert_eq3!(
        vec_seq,
        vec_par,
        [&mut 20, &mut 10, &mut 30, &mut 50, &mut 60, &mut 40]
    );
}

#[test]
fn par_iter_mut_writes_every_element() {
    let mut deque = DEQUE_LARGE.clone();
    deque.par_iter_mut().with_max_len(5).for_each(|v| *v = v.wrapping_add(1));
    assert!(deque
        .iter()
        .zip(DEQUE_LARGE.iter())
        .all(|(&a, &b)| a == b.wrapping_add(1)));
}

#[test]
fn seq_par_equivalence_into_iter_empty() {
    let vec_seq = DEQUE_EMPTY.clone().into_iter().collect::<Vec<_>>();
    let vec_par = DEQUE_EMPTY.clone().into_par_iter().collect::<Vec<_>>();

    assert_eq3!(vec_seq, vec_par, []);
}

#[test]
fn seq_par_equivalence_into_iter() {
    let vec_seq = DEQUE.clone().into_iter().collect::<Vec<_>>();
    let vec_par = DEQUE.clone().into_par_iter().collect::<Vec<_>>();

    assert_eq3!(vec_seq, vec_par, [20, 10, 30, 50, 60, 40]);
}

lazy_static! {
    static ref DEQUE_VEC_EMPTY: Vec<u32> = vec![];
    static ref DEQUE_VEC: Vec<u32> = vec![20, 10, 30, 50, 60, 40,];
}

#[test]
fn seq_par_equivalence_collect_empty() {
    let expected_deque = DEQUE_EMPTY.clone();
    let deque_seq = DEQUE_VEC_EMPTY.clone().into_iter().collect::<SegDeque<_>>();
    let deque_par = DEQUE_VEC_EMPTY.clone().into_par_iter().collect::<SegDeque<_>>();

    assert_eq3!(deque_seq, deque_par, expected_deque);
}

#[test]
fn seq_par_equivalence_collect() {
    let expected_deque = DEQUE.clone();
    let deque_seq = DEQUE_VEC.clone().into_iter().collect::<SegDeque<_>>();
    let deque_par = DEQUE_VEC.clone().into_par_iter().collect::<SegDeque<_>>();

    assert_eq3!(deque_seq, deque_par, expected_deque);
}

lazy_static! {
    static ref DEQUE_EXISTING_EMPTY: SegDeque<u32> = SegDeque::new();
    static ref DEQUE_EXISTING: SegDeque<u32> = {
        let mut deque = SegDeque::new();
        deque.push_back(10);
        deque.push_front(20);
        deque
    };
    static ref DEQUE_EXTENSION_EMPTY: Vec<u32> = vec![];
    static ref DEQUE_EXTENSION: Vec<u32> = vec![30, 50, 60, 40];
}

#[test]
fn seq_par_equivalence_existing_empty_extend_empty() {
    let expected = SegDeque::new();
    let mut deque_seq = DEQUE_EXISTING_EMPTY.clone();
    let mut deque_par = DEQUE_EXISTING_EMPTY.clone();

    deque_seq.extend(DEQUE_EXTENSION_EMPTY.iter().cloned());
    deque_par.par_extend(DEQUE_EXTENSION_EMPTY.par_iter().cloned());

    assert_eq3!(deque_seq, deque_par, expected);
}

#[test]
fn seq_par_equivalence_existing_extend() {
    let expected = DEQUE.clone();
    let mut deque_seq = DEQUE_EXISTING.clone();
    let mut deque_par = DEQUE_EXISTING.clone();

    deque_seq.extend(DEQUE_EXTENSION.iter().cloned());
    deque_par.par_extend(DEQUE_EXTENSION.par_iter().cloned());

    assert_eq3!(deque_seq, deque_par, expected);
}

#[test]
fn seq_par_equivalence_extend_ref() {
    let mut deque_seq = DEQUE_EXISTING.clone();
    let mut deque_par = DEQUE_EXISTING.clone();

    deque_seq.extend(DEQUE_LARGE.iter());
    deque_par.par_extend(DEQUE_LARGE.par_iter());

    assert_eq!(deque_seq, deque_par);
    assert_eq!(deque_par.len(), 2 + DEQUE_LARGE.len());
}
