//! Reusable pixel storage for the magnified crop.
//!
//! Dragging a lens asks for a new crop on every pointer move. The buffer keeps
//! its allocation between calls, grows when a larger crop is requested and is
//! never sized below [`BUFFER_FLOOR_PIXELS`].

use crate::constants::{BUFFER_FLOOR_PIXELS, BYTES_PER_PIXEL};

#[derive(Debug, Clone)]
pub struct ZoomBuffer {
    data: Option<Vec<u8>>,
    /// Capacity in pixels the next allocation will use.
    capacity: usize,
    floor: usize,
    allocations: usize,
}

impl ZoomBuffer {
    /// Create an empty buffer with the default floor.
    pub fn new() -> Self {
        Self::with_floor(BUFFER_FLOOR_PIXELS)
    }

    /// Create an empty buffer with a custom floor, in pixels.
    pub fn with_floor(floor: usize) -> Self {
        Self {
            data: None,
            capacity: floor,
            floor,
            allocations: 0,
        }
    }

    /// Get a zeroed-or-stale slice holding exactly `pixels` RGBA pixels.
    ///
    /// Reallocates only when `pixels` exceeds the current capacity or after a
    /// reset.
    pub fn ensure(&mut self, pixels: usize) -> &mut [u8] {
        if pixels > self.capacity {
            self.capacity = pixels;
            self.data = None;
        }

        let capacity = self.capacity;
        let allocations = &mut self.allocations;
        let data = self.data.get_or_insert_with(|| {
            *allocations += 1;
            log::debug!("Allocating zoom buffer for {} pixels", capacity);
            vec![0; capacity * BYTES_PER_PIXEL]
        });

        &mut data[..pixels * BYTES_PER_PIXEL]
    }

    /// Drop the allocation and restore the floor capacity.
    pub fn reset(&mut self) {
        self.data = None;
        self.capacity = self.floor;
    }

    /// Whether storage is currently allocated.
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Capacity in pixels.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Minimum capacity in pixels.
    pub fn floor(&self) -> usize {
        self.floor
    }

    /// How many times storage has been allocated.
    pub fn allocations(&self) -> usize {
        self.allocations
    }
}

impl Default for ZoomBuffer {
    fn default() -> Self {
        Self::new()
    }
}
