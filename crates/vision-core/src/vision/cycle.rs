//! Wrap-around selection over the vision variants

use std::sync::atomic::{AtomicUsize, Ordering};

use super::transform::Vision;

/// Fixed, ordered ring of vision variants with a shared cursor.
///
/// The cursor is a single atomic index into an immutable array, so the
/// selection can be advanced from a gesture thread while the frame thread
/// reads [`current()`](Self::current): every read observes one whole
/// variant, never a torn one. Share it through an `Arc`.
///
/// # Example
///
/// ```
/// use vision_core::{Vision, VisionCycle};
///
/// let cycle = VisionCycle::new();
/// assert_eq!(cycle.current(), Vision::Normal);
/// assert_eq!(cycle.advance(-1), Vision::AchromatopsiaMyopia);
/// assert_eq!(cycle.advance(1), Vision::Normal);
/// ```
#[derive(Debug)]
pub struct VisionCycle {
    visions: [Vision; 7],
    index: AtomicUsize,
}

impl VisionCycle {
    /// Create the cycle positioned on [`Vision::Normal`].
    pub fn new() -> Self {
        Self {
            visions: Vision::ALL,
            index: AtomicUsize::new(0),
        }
    }

    /// Create the cycle positioned on `vision`.
    pub fn starting_at(vision: Vision) -> Self {
        let cycle = Self::new();
        cycle.index.store(cycle.position(vision), Ordering::Release);
        cycle
    }

    /// The active variant.
    #[inline]
    pub fn current(&self) -> Vision {
        self.visions[self.index()]
    }

    /// Cursor position, always `< len()`.
    #[inline]
    pub fn index(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.visions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Move the cursor by `delta` positions, wrapping in both directions,
    /// and return the newly active variant.
    pub fn advance(&self, delta: isize) -> Vision {
        let len = self.len();
        // reduce first so extreme deltas cannot overflow
        let offset = delta.rem_euclid(len as isize) as usize;
        let step = |index: usize| -> usize { (index + offset) % len };
        let previous = self
            .index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |index| Some(step(index)))
            .unwrap_or_else(|index| index);
        self.visions[step(previous)]
    }

    /// Jump straight to `vision`.
    pub fn select(&self, vision: Vision) -> Vision {
        self.index.store(self.position(vision), Ordering::Release);
        vision
    }

    /// Variants in cycle order.
    pub fn iter(&self) -> impl Iterator<Item = Vision> + '_ {
        self.visions.iter().copied()
    }

    fn position(&self, vision: Vision) -> usize {
        // every variant is in the array
        self.visions.iter().position(|&v| v == vision).unwrap_or(0)
    }
}

impl Default for VisionCycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_at_normal() {
        let cycle = VisionCycle::new();
        assert_eq!(cycle.index(), 0);
        assert_eq!(cycle.current(), Vision::Normal);
        assert_eq!(cycle.len(), 7);
    }

    #[test]
    fn test_forward_wraps_to_start() {
        let cycle = VisionCycle::new();
        let seen: Vec<Vision> = (0..7).map(|_| cycle.advance(1)).collect();
        assert_eq!(seen.last(), Some(&Vision::Normal));
        assert_eq!(&seen[..6], &Vision::ALL[1..]);
        assert_eq!(cycle.index(), 0);
    }

    #[test]
    fn test_backward_wraps_to_end() {
        let cycle = VisionCycle::new();
        assert_eq!(cycle.advance(-1), Vision::AchromatopsiaMyopia);
        assert_eq!(cycle.index(), 6);
        assert_eq!(cycle.advance(-1), Vision::Achromatopsia);
    }

    #[test]
    fn test_large_deltas() {
        let cycle = VisionCycle::new();
        assert_eq!(cycle.advance(15), Vision::Myopia); // 15 mod 7 = 1
        assert_eq!(cycle.advance(-15), Vision::Normal);
        assert_eq!(cycle.advance(-8), Vision::AchromatopsiaMyopia);
        assert_eq!(cycle.advance(0), Vision::AchromatopsiaMyopia);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_extreme_deltas_wrap() {
        let cycle = VisionCycle::new();
        cycle.advance(1);
        // isize::MAX = 7 * 1317624576693539401, so it is a multiple of the length
        assert_eq!(cycle.advance(isize::MAX), Vision::Myopia);
        // isize::MIN mod 7 = 6
        assert_eq!(cycle.advance(isize::MIN), Vision::Normal);
        assert_eq!(cycle.advance(isize::MIN + 2), Vision::Myopia);
    }

    #[test]
    fn test_starting_at_and_select() {
        let cycle = VisionCycle::starting_at(Vision::Tritanopia);
        assert_eq!(cycle.index(), 4);
        assert_eq!(cycle.advance(1), Vision::Achromatopsia);
        assert_eq!(cycle.select(Vision::Myopia), Vision::Myopia);
        assert_eq!(cycle.index(), 1);
    }

    #[test]
    fn test_iter_matches_order() {
        let cycle = VisionCycle::new();
        assert_eq!(cycle.iter().collect::<Vec<_>>(), Vision::ALL.to_vec());
    }

    #[test]
    fn test_concurrent_advances_are_not_lost() {
        let cycle = Arc::new(VisionCycle::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cycle = Arc::clone(&cycle);
                thread::spawn(move || {
                    for _ in 0..700 {
                        cycle.advance(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // 2800 steps is a whole number of laps
        assert_eq!(cycle.current(), Vision::Normal);
    }
}
