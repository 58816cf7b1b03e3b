//! Ring topology, analytic variant.

use crate::types::{Bandwidth, ChunkSize, DeviceId, EventTime, Latency, TopologyKind, TopologyMeta};

use super::topology::BasicTopology;

/// Devices arranged on a cycle. In the bidirectional form a transfer takes
/// the shorter of the two arcs.
#[derive(Debug, Clone)]
pub struct Ring {
    basic: BasicTopology,
    bidirectional: bool,
}

impl Ring {
    pub fn new(
        npus_count: usize,
        bandwidth: Bandwidth,
        latency: Latency,
        bidirectional: bool,
    ) -> Self {
        assert!(npus_count > 1);
        Self {
            basic: BasicTopology::new(TopologyKind::Ring, npus_count, bandwidth, latency),
            bidirectional,
        }
    }

    pub fn kind(&self) -> TopologyKind {
        self.basic.kind()
    }

    pub(crate) fn meta(&self) -> &TopologyMeta {
        self.basic.meta()
    }

    /// Hops along the ring between two distinct devices.
    pub fn hop_count(&self, src: DeviceId, dest: DeviceId) -> usize {
        let npus_count = self.basic.npus_count();
        assert!(src < npus_count);
        assert!(dest < npus_count);
        assert_ne!(src, dest);

        let forward = (dest + npus_count - src) % npus_count;
        if self.bidirectional {
            forward.min(npus_count - forward)
        } else {
            forward
        }
    }

    /// Analytic delay of one chunk between two distinct devices.
    pub fn send(&self, src: DeviceId, dest: DeviceId, chunk_size: ChunkSize) -> EventTime {
        self.basic
            .communication_delay(self.hop_count(src, dest), chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidirectional_ring_takes_shorter_arc() {
        let ring = Ring::new(8, 50.0, 500.0, true);
        assert_eq!(ring.hop_count(1, 4), 3);
        assert_eq!(ring.hop_count(4, 1), 3);
        assert_eq!(ring.hop_count(0, 7), 1);
        assert_eq!(ring.hop_count(0, 4), 4);
    }

    #[test]
    fn test_unidirectional_ring_always_goes_forward() {
        let ring = Ring::new(8, 50.0, 500.0, false);
        assert_eq!(ring.hop_count(1, 4), 3);
        assert_eq!(ring.hop_count(4, 1), 5);
        assert_eq!(ring.hop_count(0, 7), 7);
    }
}
