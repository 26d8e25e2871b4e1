//! Disjoint-set forest over the fixed 220 grid cells.
//!
//! Plain arrays, path-compressing `find` and union by size. Nothing is
//! allocated per resolution pass.

use crate::types::BOARD_CELLS;

#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: [u8; BOARD_CELLS],
    size: [u8; BOARD_CELLS],
}

impl DisjointSet {
    /// Every cell in its own singleton set
    pub fn new() -> Self {
        let mut set = Self {
            parent: [0; BOARD_CELLS],
            size: [1; BOARD_CELLS],
        };
        set.reset();
        set
    }

    pub fn reset(&mut self) {
        for (i, parent) in self.parent.iter_mut().enumerate() {
            *parent = i as u8;
        }
        self.size = [1; BOARD_CELLS];
    }

    /// Representative of `i`'s set
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] as usize != root {
            root = self.parent[root] as usize;
        }
        // Point every node on the path straight at the root.
        let mut node = i;
        while self.parent[node] as usize != root {
            let next = self.parent[node] as usize;
            self.parent[node] = root as u8;
            node = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`. Returns false if already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra as u8;
        self.size[ra] += self.size[rb];
        true
    }

    /// Number of cells in `i`'s set
    pub fn size_of(&mut self, i: usize) -> usize {
        let root = self.find(i);
        self.size[root] as usize
    }
}

impl Default for DisjointSet {
    fn default() -> Self {
        Self::new()
    }
}
