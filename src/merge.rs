//! Small-chunk merging.
//!
//! Boundary-aware splitting leaves stragglers: a one-line intro before a
//! deferred code block, the tail end of a message. This pass fuses slabs
//! below `min_size` into a neighbour, letting the result grow to
//! `1.5 * max_size`.
//!
//! ```text
//! min = 60, max = 100, ceiling = 150
//!
//! [54] [54] [54] [54] [54]
//!  └─fuse─┘  └─fuse─┘
//! [109]      [109]      [54]   <- 109 + 1 + 54 > 150, left alone
//! ```
//!
//! One left-to-right pass, then at most one extra fuse at each end. The end
//! passes do not iterate to a fixed point, so a run of tiny slabs at an edge
//! can survive.

use crate::capacity::{ChunkCapacity, MERGE_HEADROOM};
use crate::Slab;

/// Fuse undersized slabs into their neighbours.
///
/// A slab is undersized when it has fewer than `min_size` characters. Two
/// adjacent slabs are fused (joined by one space) when either is undersized
/// and the result fits in `1.5 * max_size` characters. Indices are
/// renumbered.
///
/// ```rust
/// use ashlar::{merge_small_chunks, Slab};
///
/// let slabs = vec![
///     Slab::new("Hi.", 0, 3, 0),
///     Slab::new("This one is long enough to stand alone.", 5, 44, 1),
/// ];
/// let merged = merge_small_chunks(slabs, 10, 40);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].text, "Hi. This one is long enough to stand alone.");
/// ```
#[must_use]
pub fn merge_small_chunks(slabs: Vec<Slab>, min_size: usize, max_size: usize) -> Vec<Slab> {
    if slabs.len() <= 1 {
        return slabs;
    }

    let capacity = ChunkCapacity::with_headroom(max_size, MERGE_HEADROOM);
    let before = slabs.len();
    let mut sized: Vec<(usize, Slab)> = Vec::with_capacity(slabs.len());
    let mut iter = slabs.into_iter().map(|slab| (slab.char_len(), slab));

    let Some(mut current) = iter.next() else {
        return Vec::new();
    };
    for next in iter {
        if (current.0 < min_size || next.0 < min_size) && fits(&capacity, &current, &next) {
            current = fuse(current, next);
        } else {
            sized.push(std::mem::replace(&mut current, next));
        }
    }
    sized.push(current);

    // Tail straggler.
    let n = sized.len();
    if n > 1 && sized[n - 1].0 < min_size && fits(&capacity, &sized[n - 2], &sized[n - 1]) {
        if let (Some(last), Some(prev)) = (sized.pop(), sized.pop()) {
            sized.push(fuse(prev, last));
        }
    }

    // Head straggler.
    if sized.len() > 1 && sized[0].0 < min_size && fits(&capacity, &sized[0], &sized[1]) {
        let second = sized.remove(1);
        let first = sized.remove(0);
        sized.insert(0, fuse(first, second));
    }

    tracing::debug!(before, after = sized.len(), min_size, "merged small chunks");

    sized
        .into_iter()
        .enumerate()
        .map(|(index, (_, mut slab))| {
            slab.index = index;
            slab
        })
        .collect()
}

fn fits(capacity: &ChunkCapacity, a: &(usize, Slab), b: &(usize, Slab)) -> bool {
    !capacity.would_overflow(a.0, b.0 + 1)
}

fn fuse(mut a: (usize, Slab), b: (usize, Slab)) -> (usize, Slab) {
    a.0 += b.0 + 1;
    a.1.absorb(b.1);
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slabs(sizes: &[usize]) -> Vec<Slab> {
        let mut offset = 0;
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let slab = Slab::new("x".repeat(size), offset, offset + size, i);
                offset += size + 1;
                slab
            })
            .collect()
    }

    fn lens(slabs: &[Slab]) -> Vec<usize> {
        slabs.iter().map(Slab::char_len).collect()
    }

    #[test]
    fn test_noop_for_single_chunk() {
        let merged = merge_small_chunks(slabs(&[5]), 10, 100);
        assert_eq!(lens(&merged), vec![5]);
    }

    #[test]
    fn test_pairs_fuse_up_to_ceiling() {
        let merged = merge_small_chunks(slabs(&[54, 54, 54, 54, 54]), 60, 100);
        assert_eq!(lens(&merged), vec![109, 109, 54]);
    }

    #[test]
    fn test_large_chunks_untouched() {
        let merged = merge_small_chunks(slabs(&[80, 90, 70]), 50, 100);
        assert_eq!(lens(&merged), vec![80, 90, 70]);
    }

    #[test]
    fn test_undersized_next_absorbed_into_large_current() {
        let merged = merge_small_chunks(slabs(&[100, 10, 100]), 50, 100);
        assert_eq!(lens(&merged), vec![111, 100]);
    }

    #[test]
    fn test_leading_straggler() {
        // 10 + 1 + 145 = 156 > 150, so neither the pass nor the head pass fuses.
        let merged = merge_small_chunks(slabs(&[10, 145, 20]), 30, 100);
        assert_eq!(lens(&merged), vec![10, 145, 20]);

        let merged = merge_small_chunks(slabs(&[10, 120]), 30, 100);
        assert_eq!(lens(&merged), vec![131]);
    }

    #[test]
    fn test_edges_not_iterated_to_fixed_point() {
        // 140 + 1 + 5 fits, then 146 + 1 + 5 = 152 does not.
        let merged = merge_small_chunks(slabs(&[140, 5, 5]), 20, 100);
        assert_eq!(lens(&merged), vec![146, 5]);
    }

    #[test]
    fn test_spans_and_indices() {
        let merged = merge_small_chunks(slabs(&[5, 5, 140]), 20, 100);
        assert_eq!(lens(&merged), vec![11, 140]);
        assert_eq!(merged[0].span(), 0..11);
        assert_eq!(merged[1].index, 1);
    }
}
