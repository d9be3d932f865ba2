#![cfg(not(miri))]

#[macro_use]
extern crate quickcheck;

use segdeque::{SegDeque, BLOCK_CAPACITY};

use quickcheck::Arbitrary;
use quickcheck::Gen;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use std::cmp::min;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Deref;

fn set<'a, T, I>(iter: I) -> HashSet<T>
where
    I: IntoIterator<Item = &'a T>,
    T: Copy + Hash + Eq + 'a,
{
    iter.into_iter().cloned().collect()
}

quickcheck! {
    fn iter(push: Vec<u32>) -> bool {
        let mut vs = SegDeque::new();
        for &v in &push {
            vs.push_back(v);
        }
        push.iter().eq(vs.iter())
    }

    fn iter_front(push: Vec<u32>) -> bool {
        let mut vs = SegDeque::new();
        for &v in &push {
            vs.push_front(v);
        }
        push.iter().rev().eq(vs.iter())
    }

    fn front_back(push: Vec<u32>) -> bool {
        let mut vs1 = SegDeque::new();
        let mut vs2 = VecDeque::new();
        for &v in &push {
            vs1.push_back(v);
            vs2.push_back(v);
        }
        assert_eq!(vs1.front(), vs2.front());
        assert_eq!(vs1.front_mut(), vs2.front_mut());
        assert_eq!(vs1.back(), vs2.back());
        assert_eq!(vs1.back_mut(), vs2.back_mut());
        true
    }

    fn contains(push: Vec<u32>) -> bool {
        let mut vs = SegDeque::new();
        for &v in &push {
            vs.push_back(v);
        }
        push.iter().all(|&v| vs.contains(&v))
    }

    fn push_remove(push: Vec<u8>, remove: Vec<u8>) -> bool {
        let mut vs = SegDeque::new();
        for &v in &push {
            vs.push_back(v);
        }
        for &rm in &remove {
            while let Some(i) = vs.iter().position(|&v| v == rm) {
                vs.remove(i);
            }
        }
        let elements = &set(&push) - &set(&remove);
        elements.iter().all(|v| vs.contains(v)) && vs.iter().all(|v| elements.contains(v))
    }

    fn push_retain(push: Vec<u8>, retain: Vec<u8>) -> bool {
        let mut vs = SegDeque::new();
        for &v in &push {
            vs.push_back(v);
        }
        vs.retain(|v| retain.contains(v));
        let expected: Vec<_> = push.iter().filter(|v| retain.contains(v)).collect();
        vs.iter().eq(expected)
    }

    fn with_cap(cap: u8) -> bool {
        let cap = cap as usize;
        let vs: SegDeque<u8> = SegDeque::with_capacity(cap);
        println!("wish: {}, got: {} (diff: {})", cap, vs.capacity(), vs.capacity() as isize - cap as isize);
        vs.capacity() >= cap
    }

    fn addresses_survive_growth(front: u16, back: u16) -> bool {
        let mut vs = SegDeque::new();
        vs.push_back(0u64);
        let first: *const u64 = &vs[0];
        for i in 0..front % 1024 {
            vs.push_front(u64::from(i));
        }
        for i in 0..back % 1024 {
            vs.push_back(u64::from(i));
        }
        std::ptr::eq(first, &vs[usize::from(front % 1024)])
    }
}

use Op::*;
#[derive(Copy, Clone, Debug)]
enum Op<T> {
    Push(T),
    PushFront(T),
    Insert(u16, T),
    Remove(u16),
    Pop,
    PopFront,
    CheckEnds,
    Swap(u16, u16),
    Truncate(u8),
    Reserve(u8),
    ReserveFront(u8),
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match u32::arbitrary(g) % 12 {
            0 | 1 => Push(T::arbitrary(g)),
            2 => PushFront(T::arbitrary(g)),
            3 => Pop,
            4 => PopFront,
            5 => Remove(u16::arbitrary(g)),
            6 => Insert(u16::arbitrary(g), T::arbitrary(g)),
            7 => Truncate(u8::arbitrary(g)),
            8 => Reserve(u8::arbitrary(g)),
            9 => ReserveFront(u8::arbitrary(g)),
            10 => Swap(u16::arbitrary(g), u16::arbitrary(g)),
            11 => CheckEnds,
            _ => unreachable!(),
        }
    }
}

fn do_ops<T>(ops: &[Op<T>], a: &mut SegDeque<T>, b: &mut VecDeque<T>)
where
    T: Eq + Clone + std::fmt::Debug,
{
    for op in ops {
        match *op {
            Push(ref v) => {
                a.push_back(v.clone());
                b.push_back(v.clone());
            }
            PushFront(ref v) => {
                a.push_front(v.clone());
                b.push_front(v.clone());
            }
            Insert(i, ref v) => {
                let i = i as usize % (a.len() + 1);
                a.insert(i, v.clone());
                b.insert(i, v.clone());
            }
            Remove(i) => {
                let ln = a.len();
                if ln != 0 {
                    assert_eq!(Some(a.remove(i as usize % ln)), b.remove(i as usize % ln));
                }
            }
            Pop => {
                assert_eq!(a.pop_back(), b.pop_back());
            }
            PopFront => {
                assert_eq!(a.pop_front(), b.pop_front());
            }
            Swap(i, j) => {
                let ln = a.len();
                if ln != 0 {
                    a.swap(i as usize % ln, j as usize % ln);
                    b.swap(i as usize % ln, j as usize % ln);
                }
            }
            Truncate(n) => {
                a.truncate(n as usize);
                b.truncate(n as usize);
            }
            Reserve(n) => {
                a.reserve_back(n as usize);
                b.reserve(n as usize);
            }
            ReserveFront(n) => {
                let blocks = a.block_count();
                a.reserve_front(n as usize);
                if a.block_count() != blocks {
                    // growth adds blocks on both ends at once
                    assert_eq!((a.block_count() - blocks) % 2, 0);
                }
            }
            CheckEnds => {
                assert_eq!(a.front(), b.front());
                assert_eq!(a.front_mut(), b.front_mut());
                assert_eq!(a.back(), b.back());
                assert_eq!(a.back_mut(), b.back_mut());
            }
        }
        assert!(a.len() <= a.capacity());
    }
}

fn assert_equivalent<T>(a: &SegDeque<T>, b: &VecDeque<T>) -> bool
where
    T: Eq + Debug,
{
    assert_eq!(a.len(), b.len());
    assert_eq!(a.iter().next().is_some(), b.iter().next().is_some());
    for (i, bv) in b.iter().enumerate() {
        assert_eq!(a.get(i), Some(bv), "a and b differ at {}", i);
    }
    assert_eq!(a.get(b.len()), None);
    for (av, bv) in a.iter().zip(b.iter()) {
        assert_eq!(av, bv, "a and b order differs");
    }
    for (av, bv) in a.iter().rev().zip(b.iter().rev()) {
        assert_eq!(av, bv, "a and b reverse iterator order differs");
    }
    let mut c = a.cursor_front();
    for bv in b.iter() {
        assert_eq!(c.get(), Some(bv), "a and b cursor order differs");
        c.move_next();
    }
    assert!(c == a.cursor_end());
    true
}

quickcheck! {
    fn operations_i8(ops: Large<Vec<Op<i8>>>) -> bool {
        let mut vs = SegDeque::new();
        let mut reference = VecDeque::new();
        do_ops(&ops, &mut vs, &mut reference);
        assert_equivalent(&vs, &reference)
    }

    fn operations_string(ops: Vec<Op<Alpha>>) -> bool {
        let mut vs = SegDeque::new();
        let mut reference = VecDeque::new();
        do_ops(&ops, &mut vs, &mut reference);
        assert_equivalent(&vs, &reference)
    }
}

#[test]
fn random_cursor_jumps() {
    let mut rng = SmallRng::seed_from_u64(0x5e9d);
    let mut vs = SegDeque::new();
    let mut reference = VecDeque::new();
    for i in 0..(40 * BLOCK_CAPACITY) as i64 {
        if rng.gen() {
            vs.push_back(i);
            reference.push_back(i);
        } else {
            vs.push_front(i);
            reference.push_front(i);
        }
    }

    let len = vs.len() as isize;
    let mut c = vs.cursor_front();
    let mut at = 0isize;
    for _ in 0..10_000 {
        let delta = rng.gen_range(-at..=len - at);
        c += delta;
        at += delta;
        assert_eq!(c - vs.cursor_front(), at);
        assert_eq!(c.index(), Some(at as usize));
        assert_eq!(c.get(), reference.get(at as usize));
        if at > 0 {
            assert_eq!(c.peek(-1), reference.get(at as usize - 1));
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
struct Alpha(String);

impl Deref for Alpha {
    type Target = String;
    fn deref(&self) -> &String {
        &self.0
    }
}

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

impl Arbitrary for Alpha {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = u32::arbitrary(g) % g.size() as u32;
        let len = min(len, 16);
        Alpha(
            (0..len)
                .map(|_| ALPHABET[u32::arbitrary(g) as usize % ALPHABET.len()] as char)
                .collect(),
        )
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((**self).shrink().map(Alpha))
    }
}

/// quickcheck Arbitrary adaptor -- make a larger vec
#[derive(Clone, Debug)]
struct Large<T>(T);

impl<T> Deref for Large<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Arbitrary for Large<Vec<T>>
where
    T: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        let len = u32::arbitrary(g) % (g.size() * 10) as u32;
        Large((0..len).map(|_| T::arbitrary(g)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((**self).shrink().map(Large))
    }
}
