//! Fixed arena allocator for transient pixel buffers
//!
//! [`Heap`] hands out blocks of a fixed byte arena using first-fit
//! allocation with splitting and coalescing. Free blocks are kept in a
//! singly linked list sorted by ascending offset, with each node stored in
//! the first 8 bytes of the free block it describes:
//!
//! | Bytes | Field | Encoding |
//! |-------|-------|----------|
//! | 0..4  | block size | u32, little-endian |
//! | 4..8  | offset of the next free block | u32, little-endian, `u32::MAX` = none |
//!
//! All sizes are rounded up to multiples of 8. The arena never grows; an
//! allocation with no fitting block fails.
//!
//! The allocator has no internal locking. A heap shared between execution
//! contexts must be serialized by the caller.
//!
//! ## Example
//!
//! ```
//! use gdc::{Color, Gdc, Heap, Rect, Rgb565Gdc, Size};
//!
//! let mut heap: Heap<4096> = Heap::new();
//!
//! // Scratch surface for a 16x16 icon
//! let Some(block) = heap.alloc(16 * 16 * 2) else { return };
//! if let Ok(mut scratch) = Rgb565Gdc::new(heap.block_mut(&block), 32, Size::new(16, 16)) {
//!     let _ = scratch.fill_rect(Rect::new(0, 0, 16, 16), Color::WHITE);
//! }
//! heap.free(block);
//!
//! assert_eq!(heap.free_blocks().count(), 1);
//! ```

use log::warn;

/// Arena size used by the graphics layer
pub const DEFAULT_HEAP_SIZE: usize = 24 * 1024;

/// Heap with the default arena size
pub type GdcHeap = Heap<DEFAULT_HEAP_SIZE>;

/// Allocation granularity and size of a free-list node
const NODE_SIZE: usize = 8;

/// Encoded end of the free list
const NIL: u32 = u32::MAX;

/// An allocated block
///
/// Not clonable: giving it back to [`Heap::free`] consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct HeapBlock {
    offset: usize,
    size: usize,
}

impl HeapBlock {
    /// Offset of the block inside the arena
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Usable size in bytes (the requested size rounded up to 8)
    pub fn size(&self) -> usize {
        self.size
    }
}

/// First-fit allocator over an `N` byte arena
pub struct Heap<const N: usize> {
    arena: [u8; N],
    head: Option<usize>,
    initialized: bool,
}

impl<const N: usize> Default for Heap<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Heap<N> {
    /// Create an empty heap
    ///
    /// The free list is set up on the first allocation.
    pub const fn new() -> Self {
        Self {
            arena: [0; N],
            head: None,
            initialized: false,
        }
    }

    /// Usable arena size: `N` rounded down to 8, capped at the node encoding
    pub const fn capacity(&self) -> usize {
        let max = (NIL as usize) & !(NODE_SIZE - 1);
        let cap = N & !(NODE_SIZE - 1);
        if cap > max { max } else { cap }
    }

    /// Allocate a block of at least `size` bytes
    ///
    /// Returns `None` for a zero size or if no free block is large enough.
    pub fn alloc(&mut self, size: usize) -> Option<HeapBlock> {
        if size == 0 {
            return None;
        }
        let Some(size) = round_up(size) else {
            warn!("Heap allocation of {size} bytes is too large");
            return None;
        };

        self.init();

        let mut prev = None;
        let mut cursor = self.head;
        while let Some(offset) = cursor {
            let (block_size, next) = self.node(offset);

            if block_size == size {
                self.link(prev, next);
                return Some(HeapBlock { offset, size });
            }

            if block_size > size {
                let tail = offset + size;
                self.set_node(tail, block_size - size, next);
                self.link(prev, Some(tail));
                return Some(HeapBlock { offset, size });
            }

            prev = Some(offset);
            cursor = next;
        }

        warn!("Heap exhausted: no free block of {size} bytes");
        None
    }

    /// Give a block back to the heap
    ///
    /// The block is merged with its neighbours when they are free. A block
    /// that does not fit this arena or overlaps free memory (one from another
    /// heap, or one already freed) is rejected and the free list is left
    /// untouched.
    pub fn free(&mut self, block: HeapBlock) {
        let HeapBlock { offset, size } = block;

        self.init();

        let end = offset.checked_add(size);
        if offset % NODE_SIZE != 0
            || size == 0
            || size % NODE_SIZE != 0
            || end.is_none_or(|end| end > self.capacity())
        {
            warn!("Heap free of foreign block at {offset} ({size} bytes) ignored");
            return;
        }

        // First free block above the returned one
        let mut prev = None;
        let mut next = self.head;
        while let Some(node) = next {
            if node > offset {
                break;
            }
            prev = Some(node);
            next = self.node(node).1;
        }

        let overlaps_prev = prev.is_some_and(|prev| prev + self.node(prev).0 > offset);
        let overlaps_next = next.is_some_and(|next| offset + size > next);
        if overlaps_prev || overlaps_next {
            warn!("Heap free of block at {offset} ({size} bytes) overlaps free memory, ignored");
            return;
        }

        self.set_node(offset, size, next);
        self.link(prev, Some(offset));

        let mut merged = offset;
        if let Some(prev) = prev {
            let (prev_size, _) = self.node(prev);
            if prev + prev_size == offset {
                self.set_node(prev, prev_size + size, next);
                merged = prev;
            }
        }

        if let Some(next) = next {
            let (merged_size, _) = self.node(merged);
            if merged + merged_size == next {
                let (next_size, after) = self.node(next);
                self.set_node(merged, merged_size + next_size, after);
            }
        }
    }

    /// Contents of an allocated block
    pub fn block(&self, block: &HeapBlock) -> &[u8] {
        self.arena
            .get(block.offset..block.offset + block.size)
            .unwrap_or(&[])
    }

    /// Mutable contents of an allocated block
    pub fn block_mut(&mut self, block: &HeapBlock) -> &mut [u8] {
        self.arena
            .get_mut(block.offset..block.offset + block.size)
            .unwrap_or(&mut [])
    }

    /// Free blocks as `(offset, size)` in ascending offset order
    pub fn free_blocks(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let pristine = (!self.initialized && self.capacity() >= NODE_SIZE)
            .then_some((0, self.capacity()));
        let head = if self.initialized { self.head } else { None };

        pristine.into_iter().chain(
            core::iter::successors(head, move |&offset| self.node(offset).1)
                .map(move |offset| (offset, self.node(offset).0)),
        )
    }

    /// Total number of free bytes
    pub fn available(&self) -> usize {
        self.free_blocks().map(|(_, size)| size).sum()
    }

    fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        let capacity = self.capacity();
        if capacity >= NODE_SIZE {
            self.set_node(0, capacity, None);
            self.head = Some(0);
        }
    }

    fn link(&mut self, prev: Option<usize>, next: Option<usize>) {
        match prev {
            Some(prev) => {
                let (size, _) = self.node(prev);
                self.set_node(prev, size, next);
            }
            None => self.head = next,
        }
    }

    fn node(&self, offset: usize) -> (usize, Option<usize>) {
        let size = self.read_u32(offset) as usize;
        let next = match self.read_u32(offset + 4) {
            NIL => None,
            next => Some(next as usize),
        };
        (size, next)
    }

    fn set_node(&mut self, offset: usize, size: usize, next: Option<usize>) {
        self.write_u32(offset, size as u32);
        self.write_u32(offset + 4, next.map_or(NIL, |next| next as u32));
    }

    fn read_u32(&self, at: usize) -> u32 {
        let mut bytes = [0u8; 4];
        if let Some(src) = self.arena.get(at..at + 4) {
            bytes.copy_from_slice(src);
        }
        u32::from_le_bytes(bytes)
    }

    fn write_u32(&mut self, at: usize, value: u32) {
        if let Some(dst) = self.arena.get_mut(at..at + 4) {
            dst.copy_from_slice(&value.to_le_bytes());
        }
    }
}

fn round_up(size: usize) -> Option<usize> {
    Some(size.checked_add(NODE_SIZE - 1)? & !(NODE_SIZE - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::gdc::Gdc;
    use crate::geometry::{Rect, Size};
    use crate::rgb565::Rgb565Gdc;
    use alloc::vec::Vec;

    const SIZE: usize = 1024;

    fn blocks(heap: &Heap<SIZE>) -> Vec<(usize, usize)> {
        heap.free_blocks().collect()
    }

    /// Free list is sorted and fully coalesced
    fn assert_well_formed(heap: &Heap<SIZE>) {
        let list = blocks(heap);
        for pair in list.windows(2) {
            let (a, a_size) = pair[0];
            let (b, _) = pair[1];
            assert!(a + a_size < b, "blocks {:?} out of order or adjacent", pair);
        }
        for &(offset, size) in &list {
            assert_eq!(offset % 8, 0);
            assert_eq!(size % 8, 0);
            assert!(size >= 8);
        }
    }

    #[test]
    fn test_fresh_heap_is_one_block() {
        let heap: Heap<SIZE> = Heap::new();
        assert_eq!(blocks(&heap), [(0, SIZE)]);
        assert_eq!(heap.available(), SIZE);
    }

    #[test]
    fn test_capacity_rounds_down() {
        let heap: Heap<1001> = Heap::new();
        assert_eq!(heap.capacity(), 1000);
        let tiny: Heap<7> = Heap::new();
        assert_eq!(tiny.free_blocks().count(), 0);
    }

    #[test]
    fn test_split_leaves_tail() {
        let mut heap: Heap<SIZE> = Heap::new();
        let block = heap.alloc(13).unwrap();
        assert_eq!(block.offset(), 0);
        assert_eq!(block.size(), 16);
        assert_eq!(blocks(&heap), [(16, SIZE - 16)]);
    }

    #[test]
    fn test_zero_size_fails() {
        let mut heap: Heap<SIZE> = Heap::new();
        assert!(heap.alloc(0).is_none());
        assert!(heap.alloc(usize::MAX).is_none());
    }

    #[test]
    fn test_exhaustion() {
        let mut heap: Heap<SIZE> = Heap::new();
        assert!(heap.alloc(SIZE + 1).is_none());
        let all = heap.alloc(SIZE).unwrap();
        assert!(heap.alloc(8).is_none());
        assert_eq!(heap.available(), 0);
        heap.free(all);
        assert_eq!(blocks(&heap), [(0, SIZE)]);
    }

    #[test]
    fn test_exact_fit_reuses_hole() {
        let mut heap: Heap<SIZE> = Heap::new();
        let a = heap.alloc(32).unwrap();
        let b = heap.alloc(64).unwrap();
        let c = heap.alloc(32).unwrap();
        let b_offset = b.offset();
        heap.free(b);
        assert_eq!(blocks(&heap), [(32, 64), (128, SIZE - 128)]);

        let again = heap.alloc(60).unwrap();
        assert_eq!(again.offset(), b_offset);
        assert_eq!(blocks(&heap), [(128, SIZE - 128)]);

        heap.free(a);
        heap.free(c);
        heap.free(again);
        assert_eq!(blocks(&heap), [(0, SIZE)]);
    }

    #[test]
    fn test_first_fit_splits_first_hole() {
        let mut heap: Heap<SIZE> = Heap::new();
        let a = heap.alloc(64).unwrap();
        let _b = heap.alloc(8).unwrap();
        heap.free(a);
        let small = heap.alloc(16).unwrap();
        assert_eq!(small.offset(), 0);
        assert_eq!(blocks(&heap)[0], (16, 48));
    }

    #[test]
    fn test_merge_with_previous_only() {
        let mut heap: Heap<SIZE> = Heap::new();
        let a = heap.alloc(16).unwrap();
        let b = heap.alloc(16).unwrap();
        let _c = heap.alloc(16).unwrap();
        heap.free(a);
        heap.free(b);
        assert_eq!(blocks(&heap), [(0, 32), (48, SIZE - 48)]);
    }

    #[test]
    fn test_merge_with_next_only() {
        let mut heap: Heap<SIZE> = Heap::new();
        let _a = heap.alloc(16).unwrap();
        let b = heap.alloc(16).unwrap();
        let c = heap.alloc(16).unwrap();
        heap.free(c);
        assert_eq!(blocks(&heap), [(32, SIZE - 32)]);
        heap.free(b);
        assert_eq!(blocks(&heap), [(16, SIZE - 16)]);
    }

    #[test]
    fn test_merge_both_sides() {
        let mut heap: Heap<SIZE> = Heap::new();
        let a = heap.alloc(8).unwrap();
        let b = heap.alloc(8).unwrap();
        let c = heap.alloc(8).unwrap();
        let _d = heap.alloc(8).unwrap();
        heap.free(a);
        heap.free(c);
        assert_eq!(blocks(&heap), [(0, 8), (16, 8), (32, SIZE - 32)]);
        heap.free(b);
        assert_eq!(blocks(&heap), [(0, 24), (32, SIZE - 32)]);
    }

    #[test]
    fn test_round_trip_in_any_order() {
        let sizes = [1usize, 8, 13, 100, 64, 7, 250, 33];
        let orders: [[usize; 8]; 4] = [
            [0, 1, 2, 3, 4, 5, 6, 7],
            [7, 6, 5, 4, 3, 2, 1, 0],
            [1, 3, 5, 7, 0, 2, 4, 6],
            [4, 0, 7, 2, 6, 1, 5, 3],
        ];

        for order in orders {
            let mut heap: Heap<SIZE> = Heap::new();
            let mut allocated: Vec<Option<HeapBlock>> =
                sizes.iter().map(|&size| heap.alloc(size)).collect();
            assert!(allocated.iter().all(Option::is_some));

            for index in order {
                if let Some(block) = allocated[index].take() {
                    heap.free(block);
                }
                assert_well_formed(&heap);
            }

            assert_eq!(blocks(&heap), [(0, SIZE)]);
            assert!(heap.alloc(SIZE).is_some());
        }
    }

    #[test]
    fn test_random_workload_keeps_list_sorted() {
        let mut heap: Heap<SIZE> = Heap::new();
        let mut live: Vec<HeapBlock> = Vec::new();
        let mut seed = 0x1234_5678u32;
        let mut next = || {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            seed >> 16
        };

        for _ in 0..500 {
            if next() % 3 != 0 || live.is_empty() {
                if let Some(block) = heap.alloc(next() as usize % 96 + 1) {
                    live.push(block);
                }
            } else {
                let index = next() as usize % live.len();
                heap.free(live.swap_remove(index));
            }
            assert_well_formed(&heap);
            let used: usize = live.iter().map(HeapBlock::size).sum();
            assert_eq!(heap.available() + used, SIZE);
        }

        for block in live.drain(..) {
            heap.free(block);
        }
        assert_eq!(blocks(&heap), [(0, SIZE)]);
    }

    #[test]
    fn test_free_rejects_block_from_other_heap() {
        let mut large: Heap<SIZE> = Heap::new();
        let _low = large.alloc(512).unwrap();
        let foreign = large.alloc(16).unwrap();
        assert_eq!(foreign.offset(), 512);

        let mut small: Heap<64> = Heap::new();
        let live = small.alloc(8).unwrap();
        small.free(foreign);
        assert_eq!(small.free_blocks().collect::<Vec<_>>(), [(8, 56)]);
        assert!(small.alloc(64).is_none());

        small.free(live);
        assert_eq!(small.free_blocks().collect::<Vec<_>>(), [(0, 64)]);
    }

    #[test]
    fn test_free_rejects_malformed_blocks() {
        let mut heap: Heap<SIZE> = Heap::new();
        let a = heap.alloc(32).unwrap();
        let before = blocks(&heap);

        heap.free(HeapBlock { offset: 4, size: 8 });
        heap.free(HeapBlock { offset: 8, size: 12 });
        heap.free(HeapBlock { offset: 0, size: 0 });
        heap.free(HeapBlock {
            offset: usize::MAX & !7,
            size: 16,
        });
        assert_eq!(blocks(&heap), before);

        heap.free(a);
        assert_eq!(blocks(&heap), [(0, SIZE)]);
    }

    #[test]
    fn test_double_free_is_ignored() {
        let mut heap: Heap<SIZE> = Heap::new();
        let a = heap.alloc(16).unwrap();
        let b = heap.alloc(16).unwrap();
        let _c = heap.alloc(16).unwrap();
        heap.free(b);
        let before = blocks(&heap);

        // same range again, and a range straddling the free hole
        heap.free(HeapBlock { offset: 16, size: 16 });
        heap.free(HeapBlock { offset: 8, size: 16 });
        heap.free(HeapBlock { offset: 24, size: 16 });
        assert_eq!(blocks(&heap), before);
        assert_well_formed(&heap);

        heap.free(a);
        assert_eq!(blocks(&heap), [(0, 32), (48, SIZE - 48)]);
    }

    #[test]
    fn test_block_contents() {
        let mut heap: Heap<SIZE> = Heap::new();
        let a = heap.alloc(4).unwrap();
        let b = heap.alloc(4).unwrap();
        heap.block_mut(&a).fill(0xAA);
        heap.block_mut(&b).fill(0x55);
        assert_eq!(heap.block(&a), &[0xAA; 8]);
        assert_eq!(heap.block(&b), &[0x55; 8]);
    }

    #[test]
    fn test_block_backs_scratch_surface() {
        let mut heap: Heap<SIZE> = Heap::new();
        let block = heap.alloc(4 * 4 * 2).unwrap();
        {
            let mut gdc = Rgb565Gdc::new(heap.block_mut(&block), 8, Size::new(4, 4)).unwrap();
            gdc.fill_rect(Rect::new(0, 0, 4, 4), Color::WHITE).unwrap();
        }
        assert!(heap.block(&block).iter().all(|&b| b == 0xFF));
        heap.free(block);
        assert_eq!(heap.available(), SIZE);
    }

    #[test]
    fn test_default_heap_size() {
        let heap = GdcHeap::new();
        assert_eq!(heap.capacity(), 24 * 1024);
    }
}
