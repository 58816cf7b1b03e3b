//! 2-D mesh topology, analytic variant.

use crate::types::{Bandwidth, ChunkSize, DeviceId, EventTime, Latency, TopologyKind, TopologyMeta};

use super::topology::BasicTopology;

/// Devices on a rows x cols grid without wraparound. Device ids are
/// row-major: `id = row * cols + col`.
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

        Self {
            basic: BasicTopology::grid(
                TopologyKind::Mesh2D,
                npus_count,
                bandwidth,
                latency,
                rows,
                cols,
            ),
            rows,
            cols,
        }
    }

    pub fn kind(&self) -> TopologyKind {
        self.basic.kind()
    }

    pub(crate) fn meta(&self) -> &TopologyMeta {
        self.basic.meta()
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

    /// Manhattan distance between two distinct devices.
    pub fn hop_count(&self, src: DeviceId, dest: DeviceId) -> usize {
        assert_ne!(src, dest);

        let (src_row, src_col) = self.decode(src);
        let (dest_row, dest_col) = self.decode(dest);
        src_row.abs_diff(dest_row) + src_col.abs_diff(dest_col)
    }

    pub fn send(&self, src: DeviceId, dest: DeviceId, chunk_size: ChunkSize) -> EventTime {
        self.basic
            .communication_delay(self.hop_count(src, dest), chunk_size)
    }
}
