//
// Copyright (c) 2025 Nathan Fiedler
//

//! A growable array built from fixed-size data blocks grouped into
//! superblocks, following the layout described in **Resizable Arrays in
//! Optimal Time and Space** by Andrej Brodnik et. al., published in 1999.
//!
//! * Online ISBN 978-3-540-48447-9
//! * https://doi.org/10.1137/23M1575792
//!
//! Superblock `k` holds `2^k` elements spread over `2^⌊k/2⌋` data blocks of
//! `2^⌈k/2⌉` elements each. The superblocks are never stored; they exist only
//! as arithmetic over the ordered list of data blocks.
//!
//! # Memory Usage
//!
//! An empty block array is a handful of words in size, and while holding
//! elements it will have an overhead space cost on the order of O(√N). At most
//! one empty data block is retained to absorb push/pop churn at the end of the
//! array.
//!
//! # Stability
//!
//! Data blocks are allocated with their final capacity and never grow, hence
//! appending an element never moves any element that was added before it. A
//! reference obtained via `get()` will point to the same address for as long
//! as the element remains in the array.
//!
//! # Performance
//!
//! Append and remove-last are amortized constant time, and indexed access is
//! constant time with no searching. The lookup involves several bit
//! operations so it will be slower than `Vec`, in exchange for never copying
//! elements while growing.
//!
//! # Features
//!
//! * `tracing` emits `trace` level events through the `tracing` crate when a
//!   data block is allocated, when the spare data block is reused, and when an
//!   emptied data block is evicted. Disabled by default; run the tests with
//!   `cargo test --features tracing` to cover those events.

use std::fmt;
use std::ops::{Index, IndexMut};

/// USIZE_BITS is the number of bits in a usize, which is used to determine a
/// value for `k` for a given zero-based index `i` into the array.
const USIZE_BITS: u32 = (8 * std::mem::size_of::<usize>()) as u32;

/// Return the position of the highest set bit in `n`.
///
/// # Panics
///
/// Panics if `n` is zero.
#[inline]
fn ilog2(n: usize) -> usize {
    assert!(n > 0, "ilog2 input must be a positive integer");
    (USIZE_BITS - n.leading_zeros() - 1) as usize
}

/// Integer division of `x` by `y`, rounded up.
///
/// # Panics
///
/// Panics if `y` is zero.
#[inline]
fn ceil_div(x: usize, y: usize) -> usize {
    assert!(y != 0, "ceil_div divisor must be non-zero");
    x.div_ceil(y)
}

/// Compute the number of elements that data blocks in superblock k can hold.
#[inline]
fn datablock_capacity(k: usize) -> usize {
    1 << ceil_div(k, 2)
}

/// Compute the number of data blocks that superblock k can hold.
#[inline]
fn superblock_capacity(k: usize) -> usize {
    1 << (k / 2)
}

/// Compute the number of data blocks that appear before superblock k.
///
/// The block counts per superblock run 1, 1, 2, 2, 4, 4, 8, 8, ... so summing
/// the first k terms is two geometric series, one for each parity. With
/// `l = ceil(k/2)` that sum collapses to `2(2^l - 1)`, less `2^(l-1)` when k
/// is odd since the final pair is only half present.
#[inline]
fn blocks_before_super(k: usize) -> usize {
    let l = ceil_div(k, 2);
    2 * ((1 << l) - 1) - (k % 2) * ((1 << l) / 2)
}

/// Compute the data block and element offsets (0-based) within the array for
/// the element identified by the zero-based index `index`.
fn locate(index: usize) -> (usize, usize) {
    // working in one-based terms lets the bit length select the superblock
    let m = index + 1;
    let k = ilog2(m);
    // log2 of the data block size in superblock k
    let l = ceil_div(k, 2);
    // clear the leading bit to get the rank within the superblock, then drop
    // the low bits to find the data block within the superblock
    let b = (m & !(1 << k)) >> l;
    let e = m & ((1 << l) - 1);
    (blocks_before_super(k) + b, e)
}

/// Compute the element capacity of an array with `s` superblocks and `d`
/// allocated data blocks.
fn array_capacity(s: usize, d: usize) -> usize {
    if s == 0 {
        0
    } else {
        let k = s - 1;
        // every superblock before k is full, that is 2^k - 1 elements
        let leading_capacity = (1 << k) - 1;
        let leading_blocks = blocks_before_super(k);
        (d - leading_blocks) * datablock_capacity(k) + leading_capacity
    }
}

/// Growable array whose elements never move once they have been added.
pub struct BlockArray<T> {
    /// data blocks in the order they were allocated
    blocks: Vec<Vec<T>>,
    /// number of superblocks in use
    s: usize,
    /// number of elements occupying the last superblock
    last_sb_length: usize,
    /// most recently emptied data block, kept for the next push
    spare: Option<Vec<T>>,
}

impl<T> BlockArray<T> {
    /// Return an empty array with zero capacity.
    ///
    /// Note that pre-allocating capacity has no benefit with this data
    /// structure since appending never copies existing elements.
    pub fn new() -> Self {
        Self {
            blocks: vec![],
            s: 0,
            last_sb_length: 0,
            spare: None,
        }
    }

    /// Index of the superblock currently being filled.
    #[inline]
    fn current_superblock(&self) -> usize {
        self.s.saturating_sub(1)
    }

    /// Appends an element to the back of the array.
    ///
    /// # Time complexity
    ///
    /// Amortized constant time. Allocating a new data block costs
    /// O(√n) at worst, and no existing element is ever copied.
    pub fn push(&mut self, value: T) {
        let block_capacity = datablock_capacity(self.current_superblock());
        if let Some(block) = self
            .blocks
            .last_mut()
            .filter(|b| b.len() < block_capacity)
        {
            block.push(value);
            self.last_sb_length += 1;
            return;
        }
        // the last data block is full (or there is none), so if the last
        // superblock is full as well, move on to the next superblock
        if self.s == 0 || self.last_sb_length >= 1 << self.current_superblock() {
            self.s += 1;
            self.last_sb_length = 0;
        }
        let k = self.current_superblock();
        let block_capacity = datablock_capacity(k);
        let mut block = match self.spare.take() {
            Some(mut block) => {
                // the spare is always the block that last occupied this
                // position in the index, hence it has the right capacity
                debug_assert!(block.is_empty(), "spare data block must be empty");
                debug_assert!(block.capacity() >= block_capacity);
                block.clear();
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    block = self.blocks.len(),
                    capacity = block_capacity,
                    superblock = k,
                    "reusing spare data block"
                );
                block
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    block = self.blocks.len(),
                    capacity = block_capacity,
                    superblock = k,
                    "allocating data block"
                );
                Vec::with_capacity(block_capacity)
            }
        };
        debug_assert!(self.blocks.len() - blocks_before_super(k) < superblock_capacity(k));
        block.push(value);
        self.blocks.push(block);
        self.last_sb_length += 1;
    }

    /// Appends an element if there is sufficient spare capacity, otherwise an
    /// error is returned with the element.
    ///
    /// The retained spare data block does not count as capacity.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn push_within_capacity(&mut self, value: T) -> Result<(), T> {
        if self.capacity() <= self.len() {
            Err(value)
        } else {
            self.push(value);
            Ok(())
        }
    }

    /// Removes the last element from an array and returns it, or `None` if it
    /// is empty.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn pop(&mut self) -> Option<T> {
        let block = self.blocks.last_mut()?;
        let value = block
            .pop()
            .expect("last data block must never be empty");
        if block.is_empty() {
            // retain the emptied block in case more pushes follow, dropping
            // whatever spare was held before
            self.spare = self.blocks.pop();
            #[cfg(feature = "tracing")]
            tracing::trace!(
                block = self.blocks.len(),
                superblock = self.current_superblock(),
                "evicted empty data block"
            );
            if self.last_sb_length <= 1 {
                // the last superblock is now empty, and the one before it
                // was necessarily full
                self.s -= 1;
                self.last_sb_length = if self.s == 0 {
                    0
                } else {
                    1 << self.current_superblock()
                };
            } else {
                self.last_sb_length -= 1;
            }
        } else {
            self.last_sb_length -= 1;
        }
        Some(value)
    }

    /// Removes and returns the last element from an array if the predicate
    /// returns true, or None if the predicate returns false or the array is
    /// empty (the predicate will not be called in that case).
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn pop_if(&mut self, predicate: impl FnOnce(&mut T) -> bool) -> Option<T> {
        let last = self.blocks.last_mut()?.last_mut()?;
        if predicate(last) { self.pop() } else { None }
    }

    /// Return the number of elements in the array.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn len(&self) -> usize {
        if self.s == 0 {
            0
        } else {
            (1 << self.current_superblock()) - 1 + self.last_sb_length
        }
    }

    /// Returns the total number of elements the array can hold without
    /// allocating another data block.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn capacity(&self) -> usize {
        array_capacity(self.s, self.blocks.len())
    }

    /// Returns true if the array has a length of 0.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve a reference to the element at the given offset.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            None
        } else {
            let (block, slot) = locate(index);
            self.blocks.get(block)?.get(slot)
        }
    }

    /// Returns a mutable reference to an element.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            None
        } else {
            let (block, slot) = locate(index);
            self.blocks.get_mut(block)?.get_mut(slot)
        }
    }

    /// Replace the element at the given offset, returning the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn set(&mut self, index: usize, value: T) -> T {
        std::mem::replace(&mut self[index], value)
    }
}

impl<T> Default for BlockArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for BlockArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockArray(n: {}, s: {}, d: {}, sl: {}, spare: {})",
            self.len(),
            self.s,
            self.blocks.len(),
            self.last_sb_length,
            self.spare.is_some()
        )
    }
}

impl<T: fmt::Debug> fmt::Debug for BlockArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.blocks.iter().flatten()).finish()
    }
}

impl<T> Index<usize> for BlockArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        let Some(item) = self.get(index) else {
            panic!("index out of bounds: {}", index);
        };
        item
    }
}

impl<T> IndexMut<usize> for BlockArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let Some(item) = self.get_mut(index) else {
            panic!("index out of bounds: {}", index);
        };
        item
    }
}

impl<A> FromIterator<A> for BlockArray<A> {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        let mut arr: BlockArray<A> = BlockArray::new();
        arr.extend(iter);
        arr
    }
}

impl<A> Extend<A> for BlockArray<A> {
    fn extend<T: IntoIterator<Item = A>>(&mut self, iter: T) {
        for value in iter {
            self.push(value)
        }
    }
}
