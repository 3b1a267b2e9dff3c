use serde::{
    Deserialize,
    Serialize,
};
use std::ops::Range;
use thiserror::Error;

/// Finds the index range of elements in a sorted slice whose keys fall within `key_range`.
///
/// The slice has to be sorted ascendingly by `key_fn`, otherwise the result is
/// meaningless. Both ends of the range are inclusive.
///
/// # Examples
///
/// ```
/// use spotseek::utils::{TupleRange, binary_search_range_by_key};
///
/// let masses = vec![100.0, 100.5, 101.0, 101.0, 102.0];
/// let range = TupleRange::try_new(100.4, 101.0).unwrap();
/// let found = binary_search_range_by_key(&masses, range, |&x| x);
/// assert_eq!(found, 1..4);
///
/// let empty = TupleRange::try_new(200.0, 300.0).unwrap();
/// assert!(masses[binary_search_range_by_key(&masses, empty, |&x| x)].is_empty());
/// ```
pub fn binary_search_range_by_key<T, K, F>(
    slice: &[T],
    key_range: TupleRange<K>,
    key_fn: F,
) -> Range<usize>
where
    F: Fn(&T) -> K,
    K: Copy + PartialOrd,
{
    let start_idx = slice.partition_point(|x| key_fn(x) < key_range.start());
    let end_idx = start_idx + slice[start_idx..].partition_point(|x| key_fn(x) <= key_range.end());

    start_idx..end_idx
}

/// Index of the element whose key is closest to `target`, in a slice sorted by `key_fn`.
///
/// Ties resolve to the lower index. Returns `None` on an empty slice.
pub fn nearest_index_by_key<T, F>(slice: &[T], target: f64, key_fn: F) -> Option<usize>
where
    F: Fn(&T) -> f64,
{
    if slice.is_empty() {
        return None;
    }
    let pos = slice.partition_point(|x| key_fn(x) < target);
    if pos == 0 {
        return Some(0);
    }
    if pos >= slice.len() {
        return Some(slice.len() - 1);
    }
    let before = key_fn(&slice[pos - 1]);
    let after = key_fn(&slice[pos]);
    if target - before <= after - target {
        Some(pos - 1)
    } else {
        Some(pos)
    }
}

/// TupleRange represents a closed range [a, b].
///
/// It ensures that the first element is always less than or equal to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleRange<T: Copy + PartialOrd>(T, T);

#[derive(Error, Debug)]
pub enum TupleRangeError<T: Copy + PartialOrd + std::fmt::Debug> {
    #[error(
        "Expected the first element to be less than or equal to the second, got ({0:?}, {1:?})"
    )]
    ExpectedOrderedRange(T, T),
}

impl<T: Copy + PartialOrd + std::fmt::Debug> TupleRange<T> {
    pub fn try_new(left: T, right: T) -> Result<Self, TupleRangeError<T>> {
        // NaN bounds also end up here, since they fail the `<=` check.
        if left <= right {
            Ok(Self(left, right))
        } else {
            Err(TupleRangeError::ExpectedOrderedRange(left, right))
        }
    }
}

impl<T: Copy + PartialOrd> TupleRange<T> {
    pub fn as_tuple(&self) -> (T, T) {
        (self.0, self.1)
    }

    pub fn contains(&self, x: T) -> bool {
        self.0 <= x && x <= self.1
    }

    pub fn start(&self) -> T {
        self.0
    }

    pub fn end(&self) -> T {
        self.1
    }

    pub fn try_intercept(&self, other: Self) -> Option<Self> {
        let left = if other.start() > self.start() {
            other.start()
        } else {
            self.start()
        };
        let right = if other.end() < self.end() {
            other.end()
        } else {
            self.end()
        };
        if left > right {
            None
        } else {
            Some(Self(left, right))
        }
    }
}

impl TupleRange<f64> {
    /// Symmetric range `center ± half_width`.
    ///
    /// A negative or NaN half width collapses to the center itself.
    pub fn around(center: f64, half_width: f64) -> Self {
        let half_width = if half_width > 0.0 { half_width } else { 0.0 };
        Self(center - half_width, center + half_width)
    }
}

/// A value that can either be restricted to a specific value or be unrestricted.
///
/// Same as `Option<T>` with different semantics, since `Option<T>` could mean
/// either no restriction OR no value allowed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum OptionallyRestricted<T: Copy> {
    Restricted(T),
    #[default]
    Unrestricted,
}

impl<T: Copy> OptionallyRestricted<T> {
    pub fn is_unrestricted_or(&self, f: impl FnOnce(&T) -> bool) -> bool {
        match self {
            OptionallyRestricted::Restricted(x) => f(x),
            OptionallyRestricted::Unrestricted => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_search_repeats() {
        let input = vec![
            1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 4.0, 5.0, 6.0, 7.0, 7.0, 7.0, 8.0, 9.0,
        ];
        let range = TupleRange::try_new(3.0, 7.0).unwrap();
        let result = binary_search_range_by_key(&input, range, |&x| x);
        assert_eq!(result, 2..12);
    }

    #[test]
    fn test_nearest_index() {
        let input = vec![1.0, 2.0, 4.0, 8.0];
        assert_eq!(nearest_index_by_key(&input, -5.0, |&x| x), Some(0));
        assert_eq!(nearest_index_by_key(&input, 3.0, |&x| x), Some(1));
        assert_eq!(nearest_index_by_key(&input, 3.1, |&x| x), Some(2));
        assert_eq!(nearest_index_by_key(&input, 100.0, |&x| x), Some(3));
        assert_eq!(nearest_index_by_key::<f64, _>(&[], 1.0, |&x| x), None);
    }

    #[test]
    fn test_tuple_range() {
        assert!(TupleRange::try_new(2.0, 1.0).is_err());
        assert!(TupleRange::try_new(f64::NAN, 1.0).is_err());
        let a = TupleRange::try_new(1.0, 3.0).unwrap();
        let b = TupleRange::try_new(2.5, 5.0).unwrap();
        assert_eq!(a.try_intercept(b), Some(TupleRange(2.5, 3.0)));
        let c = TupleRange::try_new(4.0, 5.0).unwrap();
        assert_eq!(a.try_intercept(c), None);
    }

    #[test]
    fn test_search_with_integer_keys() {
        let scans = vec![(3_u32, 'a'), (5, 'b'), (5, 'c'), (9, 'd')];
        let range = TupleRange::try_new(4_u32, 8).unwrap();
        assert_eq!(binary_search_range_by_key(&scans, range, |s| s.0), 1..3);
        assert!(range.contains(5));
        assert_eq!(range.as_tuple(), (4, 8));
    }
}
