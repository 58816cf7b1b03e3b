//! 2-D torus topology, graph variant.

use crate::types::{Bandwidth, DeviceId, Latency, TopologyKind, TopologyMeta};

use super::graph::{DeviceGraph, Route};
use super::topology::BasicTopology;

/// Devices on a rows x cols grid with wraparound links on both axes.
/// Device ids are row-major.
#[derive(Debug, Clone)]
pub struct Torus2D {
    basic: BasicTopology,
    rows: usize,
    cols: usize,
}

impl Torus2D {
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
            TopologyKind::Torus2D,
            npus_count,
            bandwidth,
            latency,
            rows,
            cols,
        );

        for row in 0..rows {
            for col in 0..cols {
                let id = row * cols + col;
                let right = row * cols + (col + 1) % cols;
                let down = ((row + 1) % rows) * cols + col;
                basic.connect(id, right, bandwidth, latency, true);
                basic.connect(id, down, bandwidth, latency, true);
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

    /// Dimension-order route: rows first, then columns, each axis taking
    /// the shorter arc with ties broken toward the wrapping direction.
    pub fn route(&self, src: DeviceId, dest: DeviceId) -> Route {
        let (src_row, src_col) = self.decode(src);
        let (dest_row, dest_col) = self.decode(dest);

        let mut current_row = src_row;
        let mut current_col = src_col;
        let mut route = vec![src];

        let steps_down = (dest_row + self.rows - current_row) % self.rows;
        let steps_up = self.rows - steps_down;
        let row_forward = steps_down <= steps_up;
        for _ in 0..steps_down.min(steps_up) {
            current_row = wrap(current_row, row_forward, self.rows);
            route.push(self.encode(current_row, current_col));
        }

        let steps_right = (dest_col + self.cols - current_col) % self.cols;
        let steps_left = self.cols - steps_right;
        let col_forward = steps_right <= steps_left;
        for _ in 0..steps_right.min(steps_left) {
            current_col = wrap(current_col, col_forward, self.cols);
            route.push(self.encode(current_row, current_col));
        }

        route
    }
}

/// One step along an axis of `bound` positions, wrapping at both ends.
fn wrap(coordinate: usize, forward: bool, bound: usize) -> usize {
    if forward {
        (coordinate + 1) % bound
    } else {
        (coordinate + bound - 1) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_wraps_around_the_edge() {
        let torus = Torus2D::new(16, 60.0, 400.0, 4, 4);
        // 0 (0,0) -> 3 (0,3): one step left through the wraparound
        assert_eq!(torus.route(0, 3), vec![0, 3]);
        // 0 (0,0) -> 12 (3,0): one step up through the wraparound
        assert_eq!(torus.route(0, 12), vec![0, 12]);
    }

    #[test]
    fn test_ties_break_toward_down_and_right() {
        let torus = Torus2D::new(16, 60.0, 400.0, 4, 4);
        // row gap of 2 on a 4-row torus: equally far both ways, go down
        assert_eq!(torus.route(0, 8), vec![0, 4, 8]);
        // col gap of 2 on a 4-col torus: go right
        assert_eq!(torus.route(0, 2), vec![0, 1, 2]);
    }

    #[test]
    fn test_route_length_matches_wrapped_manhattan_distance() {
        let torus = Torus2D::new(12, 60.0, 400.0, 3, 4);
        for src in 0..12 {
            for dest in 0..12 {
                let (src_row, src_col) = torus.decode(src);
                let (dest_row, dest_col) = torus.decode(dest);
                let row_diff = src_row.abs_diff(dest_row);
                let col_diff = src_col.abs_diff(dest_col);
                let wrapped = row_diff.min(3 - row_diff) + col_diff.min(4 - col_diff);
                assert_eq!(torus.route(src, dest).len(), wrapped + 1);
            }
        }
    }

    #[test]
    fn test_edge_devices_link_across_the_boundary() {
        let torus = Torus2D::new(16, 60.0, 400.0, 4, 4);
        assert!(torus.graph().connected(3, 0));
        assert!(torus.graph().connected(12, 0));
        assert!(torus.graph().connected(0, 3));
        assert!(torus.graph().connected(0, 12));
    }
}
