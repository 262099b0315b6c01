//! Combinators over whole sequences: `concat`, `zip`, `reverse`,
//! `default_if_empty`, `cast` and `of_type`.

use std::marker::PhantomData;

use crate::buffer::Buffer;
use crate::sequence::Sequence;

/// Elements of one sequence followed by those of another.
///
/// Created by [`Sequence::concat`].
#[derive(Debug, Clone)]
pub struct Concat<A, B> {
    first: A,
    second: B,
}

impl<A, B> Concat<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Concat { first, second }
    }
}

impl<A, B> Sequence for Concat<A, B>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
{
    type Item = A::Item;
    type Iter<'a> = std::iter::Chain<A::Iter<'a>, B::Iter<'a>>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.first.traverse().chain(self.second.traverse())
    }

    fn known_len(&self) -> Option<usize> {
        self.first
            .known_len()?
            .checked_add(self.second.known_len()?)
    }
}

/// Pairwise combination of two sequences, as long as the shorter one.
///
/// Created by [`Sequence::zip`].
#[derive(Debug, Clone)]
pub struct Zip<A, B, F> {
    first: A,
    second: B,
    combine: F,
}

impl<A, B, F> Zip<A, B, F> {
    pub(crate) fn new(first: A, second: B, combine: F) -> Self {
        Zip {
            first,
            second,
            combine,
        }
    }
}

impl<A, B, F, T> Sequence for Zip<A, B, F>
where
    A: Sequence,
    B: Sequence,
    F: Fn(A::Item, B::Item) -> T,
{
    type Item = T;
    type Iter<'a> = ZipIter<'a, A::Iter<'a>, B::Iter<'a>, F>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        ZipIter {
            first: self.first.traverse(),
            second: self.second.traverse(),
            combine: &self.combine,
        }
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.first.known_len()?.min(self.second.known_len()?))
    }
}

/// Iterator for [`Zip`].
pub struct ZipIter<'a, I, J, F> {
    first: I,
    second: J,
    combine: &'a F,
}

impl<I, J, F, T> Iterator for ZipIter<'_, I, J, F>
where
    I: Iterator,
    J: Iterator,
    F: Fn(I::Item, J::Item) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let a = self.first.next()?;
        let b = self.second.next()?;
        Some((self.combine)(a, b))
    }
}

/// Elements in reverse order.
///
/// Created by [`Sequence::reverse`]. The source is buffered at the first
/// advance of each traversal.
#[derive(Debug, Clone)]
pub struct Reverse<S> {
    source: S,
}

impl<S> Reverse<S> {
    pub(crate) fn new(source: S) -> Self {
        Reverse { source }
    }
}

impl<S: Sequence> Sequence for Reverse<S> {
    type Item = S::Item;
    type Iter<'a> = ReverseIter<'a, S>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        ReverseIter {
            source: &self.source,
            buffered: None,
        }
    }

    fn known_len(&self) -> Option<usize> {
        self.source.known_len()
    }
}

/// Iterator for [`Reverse`].
pub struct ReverseIter<'a, S: Sequence> {
    source: &'a S,
    buffered: Option<std::iter::Rev<std::vec::IntoIter<S::Item>>>,
}

impl<S: Sequence> Iterator for ReverseIter<'_, S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        let source = self.source;
        let reversed = || Buffer::from_sequence(source).into_vec().into_iter().rev();
        self.buffered.get_or_insert_with(reversed).next()
    }
}

/// The source, or a single fallback element when the source is empty.
///
/// Created by [`Sequence::default_if_empty`].
#[derive(Debug, Clone)]
pub struct DefaultIfEmpty<S, T> {
    source: S,
    fallback: T,
}

impl<S, T> DefaultIfEmpty<S, T> {
    pub(crate) fn new(source: S, fallback: T) -> Self {
        DefaultIfEmpty { source, fallback }
    }
}

impl<S, T> Sequence for DefaultIfEmpty<S, T>
where
    S: Sequence<Item = T>,
    T: Clone,
{
    type Item = T;
    type Iter<'a> = DefaultIfEmptyIter<'a, S::Iter<'a>, T>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        DefaultIfEmptyIter {
            inner: self.source.traverse(),
            fallback: Some(&self.fallback),
        }
    }

    fn known_len(&self) -> Option<usize> {
        self.source.known_len().map(|len| len.max(1))
    }
}

/// Iterator for [`DefaultIfEmpty`].
pub struct DefaultIfEmptyIter<'a, I, T> {
    inner: I,
    fallback: Option<&'a T>,
}

impl<I, T> Iterator for DefaultIfEmptyIter<'_, I, T>
where
    I: Iterator<Item = T>,
    T: Clone,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self.inner.next() {
            Some(item) => {
                self.fallback = None;
                Some(item)
            }
            None => self.fallback.take().cloned(),
        }
    }
}

/// Elements converted with [`Into`].
///
/// Created by [`Sequence::cast`].
pub struct Cast<S, U> {
    source: S,
    _target: PhantomData<fn() -> U>,
}

impl<S, U> Cast<S, U> {
    pub(crate) fn new(source: S) -> Self {
        Cast {
            source,
            _target: PhantomData,
        }
    }
}

impl<S: Clone, U> Clone for Cast<S, U> {
    fn clone(&self) -> Self {
        Cast::new(self.source.clone())
    }
}

impl<S, U> Sequence for Cast<S, U>
where
    S: Sequence,
    S::Item: Into<U>,
{
    type Item = U;
    type Iter<'a> = std::iter::Map<S::Iter<'a>, fn(S::Item) -> U>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.source.traverse().map(Into::into as fn(S::Item) -> U)
    }

    fn known_len(&self) -> Option<usize> {
        self.source.known_len()
    }
}

/// Elements that convert to `U` with [`TryFrom`]; the rest are dropped.
///
/// Created by [`Sequence::of_type`].
pub struct OfType<S, U> {
    source: S,
    _target: PhantomData<fn() -> U>,
}

impl<S, U> OfType<S, U> {
    pub(crate) fn new(source: S) -> Self {
        OfType {
            source,
            _target: PhantomData,
        }
    }
}

impl<S: Clone, U> Clone for OfType<S, U> {
    fn clone(&self) -> Self {
        OfType::new(self.source.clone())
    }
}

fn try_convert<T, U: TryFrom<T>>(item: T) -> Option<U> {
    U::try_from(item).ok()
}

impl<S, U> Sequence for OfType<S, U>
where
    S: Sequence,
    U: TryFrom<S::Item>,
{
    type Item = U;
    type Iter<'a> = std::iter::FilterMap<S::Iter<'a>, fn(S::Item) -> Option<U>>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.source
            .traverse()
            .filter_map(try_convert::<S::Item, U> as fn(S::Item) -> Option<U>)
    }
}
