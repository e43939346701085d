//! Sparse voxel grid storage.

/// One voxel grid from a `SIZE`/`XYZI` chunk pair.
///
/// The grid is dense-indexed and sparse-valued: every cell exists, but only
/// filled cells carry a color byte. A color byte `c` refers to palette slot
/// `c - 1` (color 0 is reserved for "empty" in the file format).
#[derive(Debug, Clone)]
pub struct VoxelModel {
    /// Grid extent along X.
    pub width: i32,
    /// Grid extent along Y.
    pub height: i32,
    /// Grid extent along Z.
    pub depth: i32,
    /// Number of filled voxels declared by the `XYZI` chunk.
    pub voxel_count: u32,
    cells: Vec<Option<u8>>,
}

impl VoxelModel {
    /// Create an empty grid with the given extents.
    #[must_use]
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        let len = (width.max(0) as usize) * (height.max(0) as usize) * (depth.max(0) as usize);
        Self {
            width,
            height,
            depth,
            voxel_count: 0,
            cells: vec![None; len],
        }
    }

    /// True when `(x, y, z)` lies inside the grid.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height && z >= 0 && z < self.depth
    }

    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        (x as usize) + (y as usize) * (self.width as usize)
            + (z as usize) * (self.width as usize) * (self.height as usize)
    }

    /// Color byte of the cell, or `None` when empty or out of bounds.
    #[must_use]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<u8> {
        if self.contains(x, y, z) {
            self.cells[self.index(x, y, z)]
        } else {
            None
        }
    }

    /// True when the cell is inside the grid and filled.
    ///
    /// Out-of-bounds cells read as empty, which is what every neighbor probe
    /// in the mesher relies on.
    #[must_use]
    pub fn is_filled(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_some()
    }

    /// Fill a cell with a color byte. Returns false when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, z: i32, color: u8) -> bool {
        if self.contains(x, y, z) {
            let index = self.index(x, y, z);
            self.cells[index] = Some(color);
            true
        } else {
            false
        }
    }
}
