//! Fixed-stride subsampling of dense routes.

use std::num::NonZeroUsize;

/// Default sampling stride: every tenth route point is evaluated.
pub const DEFAULT_STRIDE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(9);

/// Return every `stride`-th item starting at index 0, preserving order.
///
/// The result holds `ceil(n / stride)` items, so a non-empty route shorter
/// than the stride still yields its first point.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use saferoute_core::sample;
///
/// let stride = NonZeroUsize::new(3).expect("non-zero stride");
/// assert_eq!(sample(&[0, 1, 2, 3, 4, 5, 6], stride), vec![0, 3, 6]);
/// assert!(sample::<u8>(&[], stride).is_empty());
/// ```
#[must_use]
pub fn sample<T: Clone>(items: &[T], stride: NonZeroUsize) -> Vec<T> {
    items.iter().step_by(stride.get()).cloned().collect()
}
