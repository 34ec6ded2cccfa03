//! Bump-allocated segments for per-cell runtime state.
//!
//! A [`Segment`] is a contiguous run of `T` with a bump cursor. A
//! [`SegmentList`] grows new segments up to a limit and recycles freed
//! [`CellRange`]s, so loading and unloading meshes of similar size at
//! streaming rate does not keep growing the arena.

use crate::error::ArenaError;

/// A contiguous range of elements within one segment.
///
/// Zero-length ranges are valid and resolve to an empty slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[must_use]
pub struct CellRange {
    segment: u16,
    offset: u32,
    len: u32,
}

impl CellRange {
    /// Segment the range lives in.
    pub fn segment(&self) -> u16 {
        self.segment
    }

    /// First element within the segment.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of elements.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the range holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A single bump-allocated segment.
///
/// Storage grows lazily up to `capacity`, so a mostly empty segment does
/// not pay for elements it never hands out.
struct Segment<T> {
    data: Vec<T>,
    capacity: usize,
    cursor: usize,
}

impl<T: Default> Segment<T> {
    fn new(capacity: u32) -> Self {
        Self {
            data: Vec::new(),
            capacity: capacity as usize,
            cursor: 0,
        }
    }

    /// Bump-allocate `len` default-initialised elements.
    fn alloc(&mut self, len: u32) -> Option<u32> {
        let new_cursor = self.cursor.checked_add(len as usize)?;
        if new_cursor > self.capacity {
            return None;
        }
        let offset = self.cursor;
        let reused_end = new_cursor.min(self.data.len());
        if offset < reused_end {
            self.data[offset..reused_end].fill_with(T::default);
        }
        if self.data.len() < new_cursor {
            self.data.resize_with(new_cursor, T::default);
        }
        self.cursor = new_cursor;
        Some(offset as u32)
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[derive(Clone, Copy, Debug)]
struct RetiredRange {
    segment: u16,
    offset: u32,
    len: u32,
}

/// A growable list of segments with retired-range reuse.
///
/// A request goes, in order, to: a retired range of exactly the
/// requested size; the smallest larger retired range, split; the bump
/// cursor of the current segment; a fresh segment. Ranges never span
/// segments. Freed ranges are merged with adjacent retired ranges, and
/// a free run at the top of the current segment goes back to its cursor.
pub struct SegmentList<T> {
    segments: Vec<Segment<T>>,
    segment_size: u32,
    max_segments: u16,
    current: usize,
    retired: Vec<RetiredRange>,
    live_ranges: usize,
    live_len: usize,
}

impl<T: Default> SegmentList<T> {
    /// Create a list with one empty segment.
    pub fn new(segment_size: u32, max_segments: u16) -> Self {
        let mut segments = Vec::with_capacity(max_segments as usize);
        segments.push(Segment::new(segment_size));
        Self {
            segments,
            segment_size,
            max_segments,
            current: 0,
            retired: Vec::new(),
            live_ranges: 0,
            live_len: 0,
        }
    }

    /// Allocate `len` elements, each set to `T::default()`.
    ///
    /// Returns [`ArenaError::CapacityExceeded`] when `len` exceeds the
    /// segment size or every segment is in use.
    pub fn alloc(&mut self, len: u32) -> Result<CellRange, ArenaError> {
        if len == 0 {
            return Ok(CellRange::default());
        }
        if len > self.segment_size {
            return Err(ArenaError::CapacityExceeded {
                requested: len as usize,
                capacity: self.segment_size as usize,
            });
        }

        let range = match self.take_retired(len) {
            Some(range) => range,
            None => self.bump(len)?,
        };
        self.live_ranges += 1;
        self.live_len += len as usize;
        Ok(range)
    }

    fn take_retired(&mut self, len: u32) -> Option<CellRange> {
        if let Some(pos) = self.retired.iter().position(|r| r.len == len) {
            let r = self.retired.swap_remove(pos);
            return Some(CellRange {
                segment: r.segment,
                offset: r.offset,
                len,
            });
        }

        let pos = self
            .retired
            .iter()
            .enumerate()
            .filter(|(_, r)| r.len > len)
            .min_by_key(|(_, r)| r.len)
            .map(|(pos, _)| pos)?;
        let r = &mut self.retired[pos];
        let range = CellRange {
            segment: r.segment,
            offset: r.offset,
            len,
        };
        r.offset += len;
        r.len -= len;
        Some(range)
    }

    fn bump(&mut self, len: u32) -> Result<CellRange, ArenaError> {
        if let Some(offset) = self.segments[self.current].alloc(len) {
            return Ok(self.range(self.current, offset, len));
        }

        let next = self.current + 1;
        if next < self.segments.len() {
            if let Some(offset) = self.segments[next].alloc(len) {
                self.current = next;
                return Ok(self.range(next, offset, len));
            }
        }

        if self.segments.len() >= self.max_segments as usize {
            return Err(ArenaError::CapacityExceeded {
                requested: len as usize,
                capacity: self.segments.len() * self.segment_size as usize,
            });
        }

        let mut seg = Segment::new(self.segment_size);
        let offset = seg.alloc(len).ok_or(ArenaError::CapacityExceeded {
            requested: len as usize,
            capacity: self.segment_size as usize,
        })?;
        self.segments.push(seg);
        self.current = self.segments.len() - 1;
        Ok(self.range(self.current, offset, len))
    }

    fn range(&self, segment: usize, offset: u32, len: u32) -> CellRange {
        CellRange {
            segment: segment as u16,
            offset,
            len,
        }
    }

    /// Release `range`, resetting its elements to `T::default()`.
    ///
    /// The range must have come from this list's [`alloc`](Self::alloc)
    /// and must not be freed twice. Once nothing is live, every segment
    /// is rewound and the retired list dropped.
    pub fn free(&mut self, range: CellRange) {
        if range.is_empty() {
            return;
        }
        self.slice_mut(range).fill_with(T::default);
        self.live_ranges = self.live_ranges.saturating_sub(1);
        self.live_len = self.live_len.saturating_sub(range.len as usize);

        if self.live_ranges == 0 {
            self.reset();
        } else {
            self.retire(RetiredRange {
                segment: range.segment,
                offset: range.offset,
                len: range.len,
            });
        }
    }

    /// File a freed range, coalescing it with retired neighbours in the
    /// same segment. A range that ends at the current segment's cursor
    /// rewinds the cursor instead.
    fn retire(&mut self, mut freed: RetiredRange) {
        loop {
            let before = self.retired.iter().position(|r| {
                r.segment == freed.segment && r.offset + r.len == freed.offset
            });
            if let Some(i) = before {
                let r = self.retired.swap_remove(i);
                freed.offset = r.offset;
                freed.len += r.len;
                continue;
            }
            let after = self.retired.iter().position(|r| {
                r.segment == freed.segment && freed.offset + freed.len == r.offset
            });
            if let Some(i) = after {
                let r = self.retired.swap_remove(i);
                freed.len += r.len;
                continue;
            }
            break;
        }

        let segment = freed.segment as usize;
        let seg = &mut self.segments[segment];
        if segment == self.current && (freed.offset + freed.len) as usize == seg.cursor {
            seg.cursor = freed.offset as usize;
        } else {
            self.retired.push(freed);
        }
    }

    /// Rewind every segment and forget retired ranges.
    ///
    /// Outstanding ranges become meaningless; only call this when the
    /// caller has dropped all of them.
    pub fn reset(&mut self) {
        for seg in &mut self.segments {
            seg.reset();
        }
        self.current = 0;
        self.retired.clear();
        self.live_ranges = 0;
        self.live_len = 0;
    }

    /// Elements of `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` did not come from this list.
    pub fn slice(&self, range: CellRange) -> &[T] {
        if range.is_empty() {
            return &[];
        }
        let start = range.offset as usize;
        &self.segments[range.segment as usize].data[start..start + range.len as usize]
    }

    /// Mutable elements of `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` did not come from this list.
    pub fn slice_mut(&mut self, range: CellRange) -> &mut [T] {
        if range.is_empty() {
            return &mut [];
        }
        let start = range.offset as usize;
        &mut self.segments[range.segment as usize].data[start..start + range.len as usize]
    }

    /// Element `i` of `range`, if `i` is within it.
    pub fn get(&self, range: CellRange, i: usize) -> Option<&T> {
        if i >= range.len as usize {
            return None;
        }
        self.segments
            .get(range.segment as usize)?
            .data
            .get(range.offset as usize + i)
    }

    /// Mutable element `i` of `range`, if `i` is within it.
    pub fn get_mut(&mut self, range: CellRange, i: usize) -> Option<&mut T> {
        if i >= range.len as usize {
            return None;
        }
        self.segments
            .get_mut(range.segment as usize)?
            .data
            .get_mut(range.offset as usize + i)
    }

    /// Elements handed out by bump cursors, including retired ones.
    pub fn total_used(&self) -> usize {
        self.segments.iter().map(|s| s.cursor).sum()
    }

    /// Elements in live ranges.
    pub fn live_len(&self) -> usize {
        self.live_len
    }

    /// Number of live ranges.
    pub fn live_ranges(&self) -> usize {
        self.live_ranges
    }

    /// Segments created so far.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Freed ranges waiting to be reused.
    pub fn retired_range_count(&self) -> usize {
        self.retired.len()
    }

    /// Maximum number of elements the list can ever hold.
    pub fn capacity(&self) -> usize {
        self.segment_size as usize * self.max_segments as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_default_elements() {
        let mut list: SegmentList<u32> = SegmentList::new(16, 2);
        let r = list.alloc(4).unwrap();
        assert_eq!(list.slice(r), &[0, 0, 0, 0]);
        assert_eq!(r.segment(), 0);
        assert_eq!(r.offset(), 0);
    }

    #[test]
    fn sequential_allocs_bump() {
        let mut list: SegmentList<u32> = SegmentList::new(16, 2);
        let a = list.alloc(4).unwrap();
        let b = list.alloc(6).unwrap();
        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 4);
        assert_eq!(list.total_used(), 10);
        assert_eq!(list.live_len(), 10);
    }

    #[test]
    fn grows_on_overflow() {
        let mut list: SegmentList<u32> = SegmentList::new(10, 4);
        list.alloc(10).unwrap();
        let r = list.alloc(5).unwrap();
        assert_eq!(r.segment(), 1);
        assert_eq!(list.segment_count(), 2);
    }

    #[test]
    fn capacity_exceeded() {
        let mut list: SegmentList<u32> = SegmentList::new(10, 2);
        list.alloc(10).unwrap();
        list.alloc(10).unwrap();
        assert!(matches!(
            list.alloc(1),
            Err(ArenaError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn oversized_alloc_returns_error_not_panic() {
        let mut list: SegmentList<u32> = SegmentList::new(10, 4);
        assert!(matches!(
            list.alloc(11),
            Err(ArenaError::CapacityExceeded { requested: 11, .. })
        ));
    }

    #[test]
    fn empty_alloc_needs_no_space() {
        let mut list: SegmentList<u32> = SegmentList::new(10, 1);
        list.alloc(10).unwrap();
        let r = list.alloc(0).unwrap();
        assert!(r.is_empty());
        assert!(list.slice(r).is_empty());
        list.free(r);
        assert_eq!(list.live_ranges(), 1);
    }

    #[test]
    fn freed_range_is_reset_and_reused_exactly() {
        let mut list: SegmentList<u32> = SegmentList::new(32, 1);
        let keep = list.alloc(4).unwrap();
        let a = list.alloc(8).unwrap();
        let _tail = list.alloc(2).unwrap();
        list.slice_mut(a).fill(7);
        list.free(a);
        assert_eq!(list.retired_range_count(), 1);

        let used = list.total_used();
        let b = list.alloc(8).unwrap();
        assert_eq!(b, a);
        assert_eq!(list.total_used(), used);
        assert!(list.slice(b).iter().all(|&v| v == 0));
        assert!(list.get(keep, 0).is_some());
    }

    #[test]
    fn larger_retired_range_is_split() {
        let mut list: SegmentList<u32> = SegmentList::new(32, 1);
        let _keep = list.alloc(4).unwrap();
        let a = list.alloc(10).unwrap();
        let _tail = list.alloc(2).unwrap();
        list.free(a);

        let b = list.alloc(3).unwrap();
        assert_eq!(b.offset(), a.offset());
        let c = list.alloc(7).unwrap();
        assert_eq!(c.offset(), a.offset() + 3);
        assert_eq!(list.retired_range_count(), 0);
        assert_eq!(list.total_used(), 16);
    }

    #[test]
    fn adjacent_frees_coalesce_and_rewind_the_cursor() {
        let mut list: SegmentList<u32> = SegmentList::new(8, 1);
        let a = list.alloc(4).unwrap();
        let b = list.alloc(4).unwrap();
        list.free(a);
        let c = list.alloc(2).unwrap();
        assert_eq!(c.offset(), 0);
        list.free(b);

        // 2..4 and 4..8 merge and reach the cursor, so nothing is retired.
        assert_eq!(list.retired_range_count(), 0);
        assert_eq!(list.total_used(), 2);
        let d = list.alloc(6).unwrap();
        assert_eq!((d.offset(), d.len()), (2, 6));
        assert_eq!(list.live_len(), 8);
    }

    #[test]
    fn interior_frees_merge_into_one_retired_range() {
        let mut list: SegmentList<u32> = SegmentList::new(16, 1);
        let _head = list.alloc(2).unwrap();
        let a = list.alloc(3).unwrap();
        let b = list.alloc(3).unwrap();
        let c = list.alloc(3).unwrap();
        let _tail = list.alloc(2).unwrap();
        list.free(a);
        list.free(c);
        assert_eq!(list.retired_range_count(), 2);
        list.free(b);
        assert_eq!(list.retired_range_count(), 1);

        let big = list.alloc(9).unwrap();
        assert_eq!(big.offset(), a.offset());
        assert_eq!(list.retired_range_count(), 0);
        assert_eq!(list.total_used(), 13);
    }

    #[test]
    fn freeing_everything_rewinds() {
        let mut list: SegmentList<u32> = SegmentList::new(10, 4);
        let a = list.alloc(8).unwrap();
        let b = list.alloc(8).unwrap();
        list.free(a);
        list.free(b);
        assert_eq!(list.total_used(), 0);
        assert_eq!(list.retired_range_count(), 0);
        let c = list.alloc(5).unwrap();
        assert_eq!((c.segment(), c.offset()), (0, 0));
    }

    #[test]
    fn get_is_bounded_by_range() {
        let mut list: SegmentList<u32> = SegmentList::new(16, 1);
        let a = list.alloc(2).unwrap();
        let _b = list.alloc(2).unwrap();
        *list.get_mut(a, 1).unwrap() = 5;
        assert_eq!(list.get(a, 1), Some(&5));
        assert_eq!(list.get(a, 2), None);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn live_ranges_never_overlap(
                ops in proptest::collection::vec((any::<bool>(), 1u32..12), 1..80),
            ) {
                let mut list: SegmentList<u32> = SegmentList::new(32, 4);
                let mut live: Vec<CellRange> = Vec::new();
                for (alloc, len) in ops {
                    if alloc || live.is_empty() {
                        if let Ok(r) = list.alloc(len) {
                            live.push(r);
                        }
                    } else {
                        let r = live.swap_remove(len as usize % live.len());
                        list.free(r);
                    }
                    for (i, a) in live.iter().enumerate() {
                        for b in &live[i + 1..] {
                            let disjoint = a.segment() != b.segment()
                                || a.offset() + a.len() <= b.offset()
                                || b.offset() + b.len() <= a.offset();
                            prop_assert!(disjoint, "{:?} overlaps {:?}", a, b);
                        }
                    }
                    let expected: usize = live.iter().map(|r| r.len() as usize).sum();
                    prop_assert_eq!(list.live_len(), expected);
                }
            }

            #[test]
            fn allocs_come_back_default(
                lens in proptest::collection::vec(1u32..12, 1..40),
            ) {
                let mut list: SegmentList<u32> = SegmentList::new(32, 8);
                let mut live = Vec::new();
                for len in lens {
                    if let Ok(r) = list.alloc(len) {
                        prop_assert!(list.slice(r).iter().all(|&v| v == 0));
                        list.slice_mut(r).fill(9);
                        live.push(r);
                    }
                    if live.len() > 3 {
                        list.free(live.remove(0));
                    }
                }
            }
        }
    }
}
