//! Stepping a position through a fixed-length, ordered collection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Stop at the first/last element.
    Clamp,
    /// Continue from the opposite end.
    Wrap,
}

/// Moves the zero-based `position` by `delta` within `len` elements.
///
/// Returns `None` when there is nothing to move to: an empty collection, a
/// position outside it, or a clamped step that would not change the position.
pub fn step(position: usize, len: usize, delta: isize, policy: EdgePolicy) -> Option<usize> {
    if position >= len {
        return None;
    }
    let len_i = len as isize;
    let target = position as isize + delta;
    let next = match policy {
        EdgePolicy::Clamp => target.clamp(0, len_i - 1),
        EdgePolicy::Wrap => target.rem_euclid(len_i),
    } as usize;

    if policy == EdgePolicy::Clamp && next == position {
        return None;
    }
    Some(next)
}
