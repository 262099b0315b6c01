//! Sequence - lazy, composable query operators over repeatable sequences.
//!
//! A [`Sequence`] is anything that can hand out a fresh iterator on demand.
//! Operators build lazy nodes on top of a source; nothing runs until a
//! terminal operator (or a plain `for` loop over [`Sequence::traverse`])
//! pulls elements through. Every traversal starts from scratch, so the same
//! query can be traversed many times, concurrently or interleaved.
//!
//! - Projection and filtering: `filter`, `map`, `flat_map` and indexed forms
//! - Set algebra with pluggable equality: `distinct`, `union`, `intersect`, `except`
//! - Hash joins and grouping: `join`, `group_join`, `group_by`, `to_lookup`
//! - Stable multi-key ordering: `order_by`, `then_by` and descending forms
//! - Partitioning, element access, quantifiers and checked aggregates
//!
//! # Quick Start
//!
//! ```rust
//! use standout_sequence::{from_vec, Sequence};
//!
//! #[derive(Clone)]
//! struct Task {
//!     name: &'static str,
//!     project: &'static str,
//!     priority: u32,
//! }
//!
//! let tasks = from_vec(vec![
//!     Task { name: "Write docs", project: "site", priority: 3 },
//!     Task { name: "Fix bug", project: "core", priority: 5 },
//!     Task { name: "Old task", project: "core", priority: 1 },
//!     Task { name: "Ship it", project: "core", priority: 5 },
//! ]);
//!
//! let urgent = tasks
//!     .by_ref()
//!     .filter(|t| t.priority >= 3)
//!     .order_by_descending(|t| t.priority)
//!     .then_by(|t| t.name)
//!     .map(|t| t.name);
//! assert_eq!(urgent.to_vec(), vec!["Fix bug", "Ship it", "Write docs"]);
//!
//! let per_project = tasks
//!     .group_by(|t| t.project)
//!     .with_result(|project, group| (*project, group.len()));
//! assert_eq!(per_project.to_vec(), vec![("site", 1), ("core", 3)]);
//! ```
//!
//! # Evaluation
//!
//! Streaming operators (`filter`, `map`, `take`, `concat`, ...) pull one
//! element at a time and work on infinite sources. Buffering operators
//! (`order_by`, `reverse`, `group_by`, the inner side of `join`, the second
//! side of `intersect` and `except`) read their input on the first advance
//! of a traversal, never when the query is built.
//!
//! # Errors
//!
//! Operators that can fail return [`Result`] with a [`QueryError`]:
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | `NoElements` | `first`, `last`, `single`, `aggregate`, `min`, `max`, `average` |
//! | `NoMatch` | `first_where`, `last_where`, `single_where` with no match |
//! | `MoreThanOneElement` | `single`, `single_or_default` |
//! | `MoreThanOneMatch` | `single_where`, `single_where_or_default` |
//! | `OutOfRange` | `element_at`, `range` |
//! | `DuplicateKey` | `to_map` |
//! | `Overflow` | integer `sum` |

mod aggregate;
mod buffer;
mod combine;
mod comparer;
mod error;
mod filter;
mod join;
mod lookup;
mod map;
mod ordering;
mod partition;
mod sequence;
mod set;
mod set_ops;
mod source;

// Re-export public API
pub use aggregate::Numeric;
pub use buffer::Buffer;
pub use combine::{
    Cast, Concat, DefaultIfEmpty, DefaultIfEmptyIter, OfType, Reverse, ReverseIter, Zip, ZipIter,
};
pub use comparer::{
    by_key, nan_first_cmp, Comparer, DefaultEq, DefaultOrd, EqualityComparer, KeyEq, NullableEq,
    TotalOrder,
};
pub use error::{ErrorKind, QueryError, Result};
pub use filter::{Filter, FilterIndexed, FilterIndexedIter, FilterIter, FilterMap, FilterMapIter};
pub use join::{
    GroupBy, GroupByIter, GroupByResult, GroupByResultIter, GroupJoin, GroupJoinIter, Identity,
    Join, JoinIter,
};
pub use lookup::{ApplyResults, Grouping, Lookup};
pub use map::{
    FlatMap, FlatMapIndexed, FlatMapIndexedIter, FlatMapWith, FlatMapWithIter, Map, MapIndexed,
    MapIndexedIter, MapIter,
};
pub use ordering::{
    CompareKeys, Dir, KeyColumn, Ordered, OrderedIter, SortKey, SortKeys, Then, ThenKeys,
};
pub use partition::{
    Skip, SkipWhile, SkipWhileIndexed, SkipWhileIndexedIter, Take, TakeWhile, TakeWhileIndexed,
    TakeWhileIndexedIter,
};
pub use sequence::Sequence;
pub use set::Set;
pub use set_ops::{Distinct, DistinctIter, Except, ExceptIter, Intersect, IntersectIter, Union};
pub use source::{
    empty, from_iter, from_slice, from_vec, generate, range, repeat, Empty, FromIter, Generate,
    Owned, RangeSeq, Repeat, Slice,
};
