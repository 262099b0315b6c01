//! Numeric reductions behind `sum`, `min`, `max` and `average`.

use std::cmp::Ordering;

use crate::comparer::nan_first_cmp;
use crate::error::{QueryError, Result};

/// Numbers that can be summed and averaged.
///
/// Integer sums are checked and fail with [`QueryError::Overflow`]; float
/// sums follow IEEE arithmetic.
pub trait Numeric: Copy {
    /// Additive identity.
    const ZERO: Self;

    /// Adds `other`, returning `None` on overflow.
    fn checked_add(self, other: Self) -> Option<Self>;

    /// Converts to `f64` for averaging.
    fn to_f64(self) -> f64;
}

macro_rules! integer_numeric {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                const ZERO: Self = 0;

                fn checked_add(self, other: Self) -> Option<Self> {
                    <$ty>::checked_add(self, other)
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

macro_rules! float_numeric {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                const ZERO: Self = 0.0;

                fn checked_add(self, other: Self) -> Option<Self> {
                    Some(self + other)
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

integer_numeric!(i8, i16, i32, i64, i128, isize);
integer_numeric!(u8, u16, u32, u64, u128, usize);
float_numeric!(f32, f64);

pub(crate) fn sum<N, I>(mut items: I) -> Result<N>
where
    N: Numeric,
    I: Iterator<Item = N>,
{
    items.try_fold(N::ZERO, |total, item| {
        total.checked_add(item).ok_or(QueryError::Overflow)
    })
}

/// Mean of `items` accumulated in `f64`; `None` when there are no items.
pub(crate) fn average<N, I>(items: I) -> Option<f64>
where
    N: Numeric,
    I: Iterator<Item = N>,
{
    let (total, count) = items.fold((0.0f64, 0u64), |(total, count), item| {
        (total + item.to_f64(), count + 1)
    });
    (count > 0).then(|| total / count as f64)
}

/// The element sorting furthest toward `wanted` in NaN-first order; the
/// first wins ties.
pub(crate) fn extreme<T, I>(items: I, wanted: Ordering) -> Option<T>
where
    I: Iterator<Item = T>,
    T: PartialOrd,
{
    items.fold(None, |best, item| match best {
        Some(best) if nan_first_cmp(&item, &best) != wanted => Some(best),
        _ => Some(item),
    })
}

/// The element whose key sorts furthest toward `wanted`; the first wins ties.
///
/// Keys compare in NaN-first order, so a NaN key is the minimum and is only
/// the maximum when every key is NaN.
pub(crate) fn extreme_by<T, K, I, F>(items: I, key: F, wanted: Ordering) -> Option<T>
where
    I: Iterator<Item = T>,
    F: Fn(&T) -> K,
    K: PartialOrd,
{
    let mut best: Option<(K, T)> = None;
    for item in items {
        let item_key = key(&item);
        let replace = match &best {
            Some((best_key, _)) => nan_first_cmp(&item_key, best_key) == wanted,
            None => true,
        };
        if replace {
            best = Some((item_key, item));
        }
    }
    best.map(|(_, item)| item)
}
