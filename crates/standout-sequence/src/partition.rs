//! Prefix and suffix partitioning: `take`, `skip` and their `_while` forms.

use crate::filter::advance_index;
use crate::sequence::Sequence;

/// The first `count` elements.
///
/// Created by [`Sequence::take`].
#[derive(Debug, Clone)]
pub struct Take<S> {
    source: S,
    count: usize,
}

impl<S> Take<S> {
    pub(crate) fn new(source: S, count: usize) -> Self {
        Take { source, count }
    }
}

impl<S: Sequence> Sequence for Take<S> {
    type Item = S::Item;
    type Iter<'a> = std::iter::Take<S::Iter<'a>>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.source.traverse().take(self.count)
    }

    fn known_len(&self) -> Option<usize> {
        self.source.known_len().map(|len| len.min(self.count))
    }
}

/// Everything after the first `count` elements.
///
/// Created by [`Sequence::skip`].
#[derive(Debug, Clone)]
pub struct Skip<S> {
    source: S,
    count: usize,
}

impl<S> Skip<S> {
    pub(crate) fn new(source: S, count: usize) -> Self {
        Skip { source, count }
    }
}

impl<S: Sequence> Sequence for Skip<S> {
    type Item = S::Item;
    type Iter<'a> = std::iter::Skip<S::Iter<'a>>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.source.traverse().skip(self.count)
    }

    fn known_len(&self) -> Option<usize> {
        self.source
            .known_len()
            .map(|len| len.saturating_sub(self.count))
    }
}

/// The longest prefix whose elements satisfy a predicate.
///
/// Created by [`Sequence::take_while`].
#[derive(Debug, Clone)]
pub struct TakeWhile<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> TakeWhile<S, P> {
    pub(crate) fn new(source: S, predicate: P) -> Self {
        TakeWhile { source, predicate }
    }
}

impl<S, P> Sequence for TakeWhile<S, P>
where
    S: Sequence,
    P: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Iter<'a> = std::iter::TakeWhile<S::Iter<'a>, &'a P>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.source.traverse().take_while(&self.predicate)
    }
}

/// Everything from the first element that fails a predicate onwards.
///
/// Created by [`Sequence::skip_while`].
#[derive(Debug, Clone)]
pub struct SkipWhile<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> SkipWhile<S, P> {
    pub(crate) fn new(source: S, predicate: P) -> Self {
        SkipWhile { source, predicate }
    }
}

impl<S, P> Sequence for SkipWhile<S, P>
where
    S: Sequence,
    P: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Iter<'a> = std::iter::SkipWhile<S::Iter<'a>, &'a P>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.source.traverse().skip_while(&self.predicate)
    }
}

/// Index-aware [`TakeWhile`].
///
/// Created by [`Sequence::take_while_indexed`].
#[derive(Debug, Clone)]
pub struct TakeWhileIndexed<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> TakeWhileIndexed<S, P> {
    pub(crate) fn new(source: S, predicate: P) -> Self {
        TakeWhileIndexed { source, predicate }
    }
}

impl<S, P> Sequence for TakeWhileIndexed<S, P>
where
    S: Sequence,
    P: Fn(&S::Item, usize) -> bool,
{
    type Item = S::Item;
    type Iter<'a> = TakeWhileIndexedIter<'a, S::Iter<'a>, P>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        TakeWhileIndexedIter {
            inner: self.source.traverse(),
            predicate: &self.predicate,
            index: None,
            done: false,
        }
    }
}

/// Iterator for [`TakeWhileIndexed`].
pub struct TakeWhileIndexedIter<'a, I, P> {
    inner: I,
    predicate: &'a P,
    index: Option<usize>,
    done: bool,
}

impl<I, P> Iterator for TakeWhileIndexedIter<'_, I, P>
where
    I: Iterator,
    P: Fn(&I::Item, usize) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.done {
            return None;
        }
        let item = self.inner.next()?;
        let index = advance_index(&mut self.index);
        if (self.predicate)(&item, index) {
            Some(item)
        } else {
            self.done = true;
            None
        }
    }
}

/// Index-aware [`SkipWhile`].
///
/// Created by [`Sequence::skip_while_indexed`].
#[derive(Debug, Clone)]
pub struct SkipWhileIndexed<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> SkipWhileIndexed<S, P> {
    pub(crate) fn new(source: S, predicate: P) -> Self {
        SkipWhileIndexed { source, predicate }
    }
}

impl<S, P> Sequence for SkipWhileIndexed<S, P>
where
    S: Sequence,
    P: Fn(&S::Item, usize) -> bool,
{
    type Item = S::Item;
    type Iter<'a> = SkipWhileIndexedIter<'a, S::Iter<'a>, P>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        SkipWhileIndexedIter {
            inner: self.source.traverse(),
            predicate: &self.predicate,
            index: None,
            yielding: false,
        }
    }
}

/// Iterator for [`SkipWhileIndexed`].
pub struct SkipWhileIndexedIter<'a, I, P> {
    inner: I,
    predicate: &'a P,
    index: Option<usize>,
    yielding: bool,
}

impl<I, P> Iterator for SkipWhileIndexedIter<'_, I, P>
where
    I: Iterator,
    P: Fn(&I::Item, usize) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.yielding {
            return self.inner.next();
        }
        for item in self.inner.by_ref() {
            let index = advance_index(&mut self.index);
            if !(self.predicate)(&item, index) {
                self.yielding = true;
                return Some(item);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{from_iter, from_vec};

    #[test]
    fn take_and_skip() {
        let seq = from_vec(vec![1, 2, 3, 4, 5]);
        assert_eq!(seq.by_ref().take(2).to_vec(), vec![1, 2]);
        assert_eq!(seq.by_ref().skip(3).to_vec(), vec![4, 5]);
        assert!(seq.by_ref().take(0).to_vec().is_empty());
        assert_eq!(seq.by_ref().skip(0).to_vec(), vec![1, 2, 3, 4, 5]);
        assert!(seq.by_ref().skip(9).to_vec().is_empty());
    }

    #[test]
    fn take_and_skip_report_known_len() {
        let seq = from_vec(vec![1, 2, 3]);
        assert_eq!(seq.by_ref().take(10).known_len(), Some(3));
        assert_eq!(seq.by_ref().skip(1).known_len(), Some(2));
        assert_eq!(seq.by_ref().skip(10).known_len(), Some(0));
    }

    #[test]
    fn take_stops_infinite_sources() {
        assert_eq!(from_iter(0u8..).take(3).to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn while_variants() {
        let seq = from_vec(vec![1, 2, 5, 1, 7]);
        assert_eq!(seq.by_ref().take_while(|n| *n < 3).to_vec(), vec![1, 2]);
        assert_eq!(seq.by_ref().skip_while(|n| *n < 3).to_vec(), vec![5, 1, 7]);
    }

    #[test]
    fn indexed_while_variants() {
        let seq = from_vec(vec![10, 20, 30, 5, 50]);
        let taken = seq.by_ref().take_while_indexed(|n, i| *n > i * 10);
        assert_eq!(taken.to_vec(), vec![10, 20, 30]);
        let skipped = seq.by_ref().skip_while_indexed(|_, i| i < 2);
        assert_eq!(skipped.to_vec(), vec![30, 5, 50]);
    }

    #[test]
    fn skip_while_indexed_stops_testing_after_first_failure() {
        let numbers = from_vec(vec![0, 9, 0, 0]);
        let seq = numbers.skip_while_indexed(|n, _| *n == 0);
        assert_eq!(seq.to_vec(), vec![9, 0, 0]);
    }
}
