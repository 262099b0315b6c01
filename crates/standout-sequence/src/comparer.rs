//! Equality and ordering capabilities used by the hashing and sorting operators.
//!
//! Operators that hash (`distinct`, `union`, `group_by`, `join`, ...) take an
//! [`EqualityComparer`]; operators that sort take a [`Comparer`]. Both fall
//! back to the element type's natural behavior through [`DefaultEq`] and
//! [`DefaultOrd`].

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Equality and hashing for keys or elements.
///
/// Implementations must keep `hash` consistent with `equals`: two values
/// that compare equal must hash identically.
pub trait EqualityComparer<T: ?Sized> {
    /// Returns `true` if `a` and `b` are equal.
    fn equals(&self, a: &T, b: &T) -> bool;

    /// Returns the hash of `value`.
    fn hash(&self, value: &T) -> u64;

    /// Returns `true` if `value` is a null key.
    ///
    /// Null keys hash to 0 and never match under `join`/`group_join`.
    fn is_null(&self, _value: &T) -> bool {
        false
    }
}

impl<T: ?Sized, C: EqualityComparer<T> + ?Sized> EqualityComparer<T> for &C {
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }

    fn hash(&self, value: &T) -> u64 {
        (**self).hash(value)
    }

    fn is_null(&self, value: &T) -> bool {
        (**self).is_null(value)
    }
}

/// Natural equality (`Eq`) with `FxHasher` hashing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultEq;

impl<T: Hash + Eq + ?Sized> EqualityComparer<T> for DefaultEq {
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn hash(&self, value: &T) -> u64 {
        fx_hash(value)
    }
}

/// Natural equality over `Option<T>` keys where `None` is the null key.
///
/// `None` keys group together under `group_by`/`to_lookup` and never match
/// anything under `join`/`group_join`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullableEq;

impl<T: Hash + Eq> EqualityComparer<Option<T>> for NullableEq {
    fn equals(&self, a: &Option<T>, b: &Option<T>) -> bool {
        a == b
    }

    fn hash(&self, value: &Option<T>) -> u64 {
        match value {
            Some(inner) => fx_hash(inner),
            None => 0,
        }
    }

    fn is_null(&self, value: &Option<T>) -> bool {
        value.is_none()
    }
}

/// Equality of a projected key.
///
/// Built with [`by_key`].
#[derive(Debug, Clone, Copy)]
pub struct KeyEq<F> {
    project: F,
}

/// Compares values by the key `project` extracts from them.
///
/// ```
/// use standout_sequence::{by_key, from_vec, Sequence};
///
/// let names = from_vec(vec!["Ada", "ada", "Grace"])
///     .distinct()
///     .with_comparer(by_key(|s: &&str| s.to_lowercase()));
///
/// assert_eq!(names.to_vec(), vec!["Ada", "Grace"]);
/// ```
pub fn by_key<F>(project: F) -> KeyEq<F> {
    KeyEq { project }
}

impl<T, K, F> EqualityComparer<T> for KeyEq<F>
where
    F: Fn(&T) -> K,
    K: Hash + Eq,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.project)(a) == (self.project)(b)
    }

    fn hash(&self, value: &T) -> u64 {
        fx_hash(&(self.project)(value))
    }
}

/// Three-way comparison for sort keys.
pub trait Comparer<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparer<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Natural ordering (`Ord`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultOrd;

impl<T: Ord + ?Sized> Comparer<T> for DefaultOrd {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Total order over `PartialOrd` values where NaN sorts first.
///
/// Any value that is not comparable with itself (NaN) is smaller than every
/// other value, negative infinity included. Two NaNs compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalOrder;

impl<T: PartialOrd + ?Sized> Comparer<T> for TotalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        nan_first_cmp(a, b)
    }
}

/// Compares two `PartialOrd` values, ordering NaN before everything else.
pub fn nan_first_cmp<T: PartialOrd + ?Sized>(a: &T, b: &T) -> Ordering {
    if let Some(ordering) = a.partial_cmp(b) {
        return ordering;
    }
    let a_nan = a.partial_cmp(a).is_none();
    let b_nan = b.partial_cmp(b).is_none();
    match (a_nan, b_nan) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Hash used by the set and lookup tables: 31 bits, null keys map to 0.
pub(crate) fn masked_hash<T: ?Sized, C: EqualityComparer<T>>(comparer: &C, value: &T) -> u32 {
    if comparer.is_null(value) {
        0
    } else {
        (comparer.hash(value) as u32) & 0x7FFF_FFFF
    }
}

fn fx_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}
