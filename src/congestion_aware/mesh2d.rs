//! 2-D mesh topology, graph variant.

use crate::types::{Bandwidth, DeviceId, Latency, TopologyKind, TopologyMeta};

use super::graph::{DeviceGraph, Route};
use super::topology::BasicTopology;

/// Devices on a rows x cols grid without wraparound, each linked to its
/// right and down neighbor. Device ids are row-major.
#[derive(Debug, Clone)]
pub struct Mesh2D {
    basic: BasicTopology,
    rows: usize,
    cols: usize,
}

impl Mesh2D {
    pub fn new(
        npus_count: usize,
        bandwidth: Bandwidth,
        latency: Latency,
        rows: usize,
        cols: usize,
    ) -> Self {
        assert!(rows > 0);
        assert!(cols > 0);
        assert_eq!(rows * cols, npus_count);

        let mut basic = BasicTopology::grid(
            TopologyKind::Mesh2D,
            npus_count,
            bandwidth,
            latency,
            rows,
            cols,
        );

        for row in 0..rows {
            for col in 0..cols {
                let id = row * cols + col;
                if col + 1 < cols {
                    basic.connect(id, id + 1, bandwidth, latency, true);
                }
                if row + 1 < rows {
                    basic.connect(id, id + cols, bandwidth, latency, true);
                }
            }
        }

        Self { basic, rows, cols }
    }

    pub fn kind(&self) -> TopologyKind {
        self.basic.kind()
    }

    pub(crate) fn meta(&self) -> &TopologyMeta {
        self.basic.meta()
    }

    pub fn graph(&self) -> &DeviceGraph {
        self.basic.graph()
    }

    /// Split a device id into its (row, col) coordinate.
    pub fn decode(&self, id: DeviceId) -> (usize, usize) {
        assert!(id < self.basic.npus_count());
        (id / self.cols, id % self.cols)
    }

    /// Row-major device id of a coordinate.
    pub fn encode(&self, row: usize, col: usize) -> DeviceId {
        assert!(row < self.rows);
        assert!(col < self.cols);
        row * self.cols + col
    }

    /// Dimension-order route: close the row gap first, one step at a time,
    /// then the column gap. Every intermediate device is listed.
    pub fn route(&self, src: DeviceId, dest: DeviceId) -> Route {
        let (src_row, src_col) = self.decode(src);
        let (dest_row, dest_col) = self.decode(dest);

        let mut current_row = src_row;
        let mut current_col = src_col;
        let mut route = vec![src];

        while current_row != dest_row {
            if dest_row > current_row {
                current_row += 1;
            } else {
                current_row -= 1;
            }
            route.push(self.encode(current_row, current_col));
        }

        while current_col != dest_col {
            if dest_col > current_col {
                current_col += 1;
            } else {
                current_col -= 1;
            }
            route.push(self.encode(current_row, current_col));
        }

        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_order_routing() {
        // 4x4 grid: 0 (0,0) -> 15 (3,3) moves down the first column, then
        // across the last row
        let mesh = Mesh2D::new(16, 60.0, 500.0, 4, 4);
        assert_eq!(mesh.route(0, 15), vec![0, 4, 8, 12, 13, 14, 15]);
    }

    #[test]
    fn test_route_length_matches_manhattan_distance() {
        let mesh = Mesh2D::new(16, 60.0, 500.0, 4, 4);
        for src in 0..16 {
            for dest in 0..16 {
                let (src_row, src_col) = mesh.decode(src);
                let (dest_row, dest_col) = mesh.decode(dest);
                let manhattan = src_row.abs_diff(dest_row) + src_col.abs_diff(dest_col);
                assert_eq!(mesh.route(src, dest).len(), manhattan + 1);
            }
        }
    }

    #[test]
    fn test_route_moves_against_the_grain_too() {
        let mesh = Mesh2D::new(16, 60.0, 500.0, 4, 4);
        // 15 (3,3) -> 0 (0,0): up the last column, then back across row 0
        assert_eq!(mesh.route(15, 0), vec![15, 11, 7, 3, 2, 1, 0]);
    }

    #[test]
    fn test_edges_have_no_wraparound() {
        let mesh = Mesh2D::new(16, 60.0, 500.0, 4, 4);
        assert!(mesh.graph().connected(0, 1));
        assert!(mesh.graph().connected(0, 4));
        assert!(!mesh.graph().connected(0, 3));
        assert!(!mesh.graph().connected(0, 12));
    }
}
