//! A `SegDeque` goes over the wire as a plain sequence, front to back.

use core::fmt;
use core::marker::PhantomData;

use serde_::de::{Deserialize, DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde_::ser::{Serialize, Serializer};

use crate::SegDeque;

/// Upper bound on how many elements a length hint from the input may preallocate.
const MAX_PREALLOC: usize = 4096;

fn prealloc(hint: Option<usize>) -> usize {
    hint.map_or(0, |n| n.min(MAX_PREALLOC))
}

impl<T> Serialize for SegDeque<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self)
    }
}

struct SeqVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for SeqVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = SegDeque<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut deque = SegDeque::with_capacity(prealloc(seq.size_hint()));
        while let Some(v) = seq.next_element()? {
            deque.push_back(v);
        }
        Ok(deque)
    }
}

/// Deserializes straight into an element that is already in the deque.
struct ElementInPlace<'a, T>(&'a mut T);

impl<'a, 'de, T> DeserializeSeed<'de> for ElementInPlace<'a, T>
where
    T: Deserialize<'de>,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize_in_place(deserializer, self.0)
    }
}

struct InPlaceVisitor<'a, T>(&'a mut SegDeque<T>);

impl<'a, 'de, T> Visitor<'de> for InPlaceVisitor<'a, T>
where
    T: Deserialize<'de>,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let deque = self.0;
        let wanted = prealloc(seq.size_hint());
        if wanted > deque.len() {
            deque.reserve_back(wanted - deque.len());
        }

        let mut filled = 0;
        for slot in deque.iter_mut() {
            if seq.next_element_seed(ElementInPlace(slot))?.is_none() {
                break;
            }
            filled += 1;
        }
        if filled < deque.len() {
            // the input ran out first
            deque.truncate(filled);
        } else {
            while let Some(v) = seq.next_element()? {
                deque.push_back(v);
            }
        }
        Ok(())
    }
}

impl<'de, T> Deserialize<'de> for SegDeque<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SeqVisitor(PhantomData))
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(InPlaceVisitor(place))
    }
}
