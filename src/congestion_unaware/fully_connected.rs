//! Fully-connected topology, analytic variant.

use crate::types::{Bandwidth, ChunkSize, DeviceId, EventTime, Latency, TopologyKind, TopologyMeta};

use super::topology::BasicTopology;

/// Every device pairwise linked: any transfer is a single hop.
#[derive(Debug, Clone)]
pub struct FullyConnected {
    basic: BasicTopology,
}

impl FullyConnected {
    pub fn new(npus_count: usize, bandwidth: Bandwidth, latency: Latency) -> Self {
        assert!(npus_count > 1);
        Self {
            basic: BasicTopology::new(TopologyKind::FullyConnected, npus_count, bandwidth, latency),
        }
    }

    pub fn kind(&self) -> TopologyKind {
        self.basic.kind()
    }

    pub(crate) fn meta(&self) -> &TopologyMeta {
        self.basic.meta()
    }

    pub fn hop_count(&self, src: DeviceId, dest: DeviceId) -> usize {
        let npus_count = self.basic.npus_count();
        assert!(src < npus_count);
        assert!(dest < npus_count);
        assert_ne!(src, dest);

        1
    }

    pub fn send(&self, src: DeviceId, dest: DeviceId, chunk_size: ChunkSize) -> EventTime {
        self.basic
            .communication_delay(self.hop_count(src, dest), chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pair_is_one_hop() {
        let topology = FullyConnected::new(8, 50.0, 500.0);
        assert_eq!(topology.hop_count(0, 7), 1);
        assert_eq!(topology.hop_count(3, 4), 1);
    }
}
