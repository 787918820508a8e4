//! Padded cubic lattice stored as parallel flat arrays

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Border width around the visible cuboid
pub const PAD: usize = 2;

/// Offsets of the 26 Moore neighbors, z-major
pub const NEIGHBOR_OFFSETS: [[isize; 3]; 26] = neighbor_offsets();

const fn neighbor_offsets() -> [[isize; 3]; 26] {
    let mut offsets = [[0; 3]; 26];
    let mut i = 0;
    let mut dz = -1;
    while dz <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dx = -1;
            while dx <= 1 {
                if dx != 0 || dy != 0 || dz != 0 {
                    offsets[i] = [dx, dy, dz];
                    i += 1;
                }
                dx += 1;
            }
            dy += 1;
        }
        dz += 1;
    }
    offsets
}

/// Integer coordinates of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl CellCoord {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// A vector of `len` copies of `value`, or `None` if it cannot be allocated
fn filled<T: Clone>(len: usize, value: T) -> Option<Vec<T>> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(len).ok()?;
    cells.resize(len, value);
    Some(cells)
}

/// Lattice storage. A cell is identified by `x + y*side + z*side^2`.
#[derive(Debug, Clone)]
pub struct Lattice {
    visible_size: usize,
    side: usize,
    alive: Vec<bool>,
    neighbor_count: Vec<u8>,
    queued: Vec<bool>,
}

impl Lattice {
    /// Allocate a cleared lattice with `visible_size` cells per visible axis
    pub fn new(visible_size: usize) -> Result<Self, EngineError> {
        if visible_size == 0 {
            return Err(EngineError::InvalidSize { size: visible_size });
        }

        let too_large = || EngineError::TooLarge { size: visible_size };
        let side = visible_size.checked_add(2 * PAD).ok_or_else(too_large)?;
        let volume = side
            .checked_mul(side)
            .and_then(|area| area.checked_mul(side))
            .ok_or_else(too_large)?;

        Ok(Self {
            visible_size,
            side,
            alive: filled(volume, false).ok_or_else(too_large)?,
            neighbor_count: filled(volume, 0).ok_or_else(too_large)?,
            queued: filled(volume, false).ok_or_else(too_large)?,
        })
    }

    pub fn visible_size(&self) -> usize {
        self.visible_size
    }

    /// Side length including padding
    pub fn side(&self) -> usize {
        self.side
    }

    /// Total number of cells, padding included
    pub fn volume(&self) -> usize {
        self.alive.len()
    }

    /// Callers must check `in_bounds` first; an out-of-range axis aliases another cell
    #[inline]
    pub(crate) fn index(&self, coord: CellCoord) -> usize {
        debug_assert!(self.in_bounds(coord), "{:?} outside a lattice of side {}", coord, self.side);
        coord.x + coord.y * self.side + coord.z * self.side * self.side
    }

    #[inline]
    pub fn coords(&self, id: usize) -> CellCoord {
        CellCoord {
            x: id % self.side,
            y: (id / self.side) % self.side,
            z: id / (self.side * self.side),
        }
    }

    #[inline]
    pub fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.x < self.side && coord.y < self.side && coord.z < self.side
    }

    /// Id of the cell at `coord + offset`, or `None` if that leaves the lattice
    #[inline]
    pub fn offset(&self, coord: CellCoord, offset: &[isize; 3]) -> Option<usize> {
        let shift = |v: usize, d: isize| -> Option<usize> {
            let moved = v.checked_add_signed(d)?;
            (moved < self.side).then_some(moved)
        };

        let x = shift(coord.x, offset[0])?;
        let y = shift(coord.y, offset[1])?;
        let z = shift(coord.z, offset[2])?;
        Some(x + y * self.side + z * self.side * self.side)
    }

    /// Ids of all in-bounds neighbors of `id`
    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        let coord = self.coords(id);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |offset| self.offset(coord, offset))
    }

    /// Whether `coord` lies inside the non-padded cuboid
    #[inline]
    pub fn is_visible(&self, coord: CellCoord) -> bool {
        let range = PAD..PAD + self.visible_size;
        range.contains(&coord.x) && range.contains(&coord.y) && range.contains(&coord.z)
    }

    /// Translate lattice coordinates to zero-based visible coordinates
    pub fn to_visible(&self, coord: CellCoord) -> Option<CellCoord> {
        self.is_visible(coord)
            .then(|| CellCoord::new(coord.x - PAD, coord.y - PAD, coord.z - PAD))
    }

    /// Translate zero-based visible coordinates to lattice coordinates
    pub fn from_visible(&self, coord: CellCoord) -> CellCoord {
        CellCoord::new(coord.x + PAD, coord.y + PAD, coord.z + PAD)
    }

    #[inline]
    pub fn is_alive(&self, id: usize) -> bool {
        self.alive[id]
    }

    #[inline]
    pub fn neighbor_count(&self, id: usize) -> u8 {
        self.neighbor_count[id]
    }

    #[inline]
    pub fn is_queued(&self, id: usize) -> bool {
        self.queued[id]
    }

    #[inline]
    pub(crate) fn set_alive(&mut self, id: usize, alive: bool) {
        self.alive[id] = alive;
    }

    /// Count one more live neighbor for `id`. Returns true the first time the
    /// cell is touched since its scratch state was last cleared.
    #[inline]
    pub(crate) fn touch(&mut self, id: usize) -> bool {
        self.neighbor_count[id] += 1;
        !std::mem::replace(&mut self.queued[id], true)
    }

    #[inline]
    pub(crate) fn clear_scratch(&mut self, id: usize) {
        self.neighbor_count[id] = 0;
        self.queued[id] = false;
    }

    /// Reset every cell to dead with clean scratch state
    pub fn clear(&mut self) {
        self.alive.fill(false);
        self.neighbor_count.fill(0);
        self.queued.fill(false);
    }

    /// True when no cell carries a neighbor count or queued flag
    pub fn scratch_is_clean(&self) -> bool {
        self.neighbor_count.iter().all(|&n| n == 0) && self.queued.iter().all(|&q| !q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_creation() {
        let lattice = Lattice::new(10).unwrap();
        assert_eq!(lattice.side(), 14);
        assert_eq!(lattice.volume(), 14 * 14 * 14);
        assert!(lattice.scratch_is_clean());
        assert!((0..lattice.volume()).all(|id| !lattice.is_alive(id)));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(Lattice::new(0).unwrap_err(), EngineError::InvalidSize { size: 0 });
    }

    #[test]
    fn test_oversized_lattice_rejected() {
        // side overflows
        assert_eq!(
            Lattice::new(usize::MAX).unwrap_err(),
            EngineError::TooLarge { size: usize::MAX }
        );
        // side^3 overflows
        assert_eq!(
            Lattice::new(1 << 32).unwrap_err(),
            EngineError::TooLarge { size: 1 << 32 }
        );
        // volume fits in usize but exceeds what a Vec may hold
        assert_eq!(
            Lattice::new(1 << 21).unwrap_err(),
            EngineError::TooLarge { size: 1 << 21 }
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside a lattice of side 8")]
    fn test_index_rejects_out_of_bounds() {
        let lattice = Lattice::new(4).unwrap();
        lattice.index(CellCoord::new(8, 0, 0));
    }

    #[test]
    fn test_index_mapping() {
        let lattice = Lattice::new(4).unwrap();
        let side = lattice.side();

        assert_eq!(lattice.index(CellCoord::new(0, 0, 0)), 0);
        assert_eq!(lattice.index(CellCoord::new(1, 0, 0)), 1);
        assert_eq!(lattice.index(CellCoord::new(0, 1, 0)), side);
        assert_eq!(lattice.index(CellCoord::new(0, 0, 1)), side * side);

        for id in 0..lattice.volume() {
            assert_eq!(lattice.index(lattice.coords(id)), id);
        }
    }

    #[test]
    fn test_neighbor_offsets() {
        assert!(NEIGHBOR_OFFSETS.iter().all(|o| *o != [0, 0, 0]));
        let mut sorted = NEIGHBOR_OFFSETS.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 26);
    }

    #[test]
    fn test_neighbors_at_boundary() {
        let lattice = Lattice::new(4).unwrap();
        let side = lattice.side();

        let corner = lattice.index(CellCoord::new(0, 0, 0));
        assert_eq!(lattice.neighbors(corner).count(), 7);

        let far_corner = lattice.index(CellCoord::new(side - 1, side - 1, side - 1));
        assert_eq!(lattice.neighbors(far_corner).count(), 7);

        let face = lattice.index(CellCoord::new(0, 3, 3));
        assert_eq!(lattice.neighbors(face).count(), 17);

        let inner = lattice.index(CellCoord::new(3, 3, 3));
        assert_eq!(lattice.neighbors(inner).count(), 26);
    }

    #[test]
    fn test_visibility() {
        let lattice = Lattice::new(4).unwrap();

        assert!(!lattice.is_visible(CellCoord::new(1, 3, 3)));
        assert!(lattice.is_visible(CellCoord::new(2, 2, 2)));
        assert!(lattice.is_visible(CellCoord::new(5, 5, 5)));
        assert!(!lattice.is_visible(CellCoord::new(6, 3, 3)));

        assert_eq!(
            lattice.to_visible(CellCoord::new(2, 3, 5)),
            Some(CellCoord::new(0, 1, 3))
        );
        assert_eq!(lattice.to_visible(CellCoord::new(0, 3, 3)), None);
        assert_eq!(
            lattice.from_visible(CellCoord::new(0, 1, 3)),
            CellCoord::new(2, 3, 5)
        );
    }

    #[test]
    fn test_touch_and_clear() {
        let mut lattice = Lattice::new(4).unwrap();

        assert!(lattice.touch(5));
        assert!(!lattice.touch(5));
        assert!(!lattice.touch(5));
        assert_eq!(lattice.neighbor_count(5), 3);
        assert!(lattice.is_queued(5));

        lattice.clear_scratch(5);
        assert!(lattice.scratch_is_clean());
    }
}
