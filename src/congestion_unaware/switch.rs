//! Switch topology, analytic variant.

use crate::types::{Bandwidth, ChunkSize, DeviceId, EventTime, Latency, TopologyKind, TopologyMeta};

use super::topology::BasicTopology;

/// All devices behind one switch: any transfer is exactly two hops, up to
/// the switch and back down.
#[derive(Debug, Clone)]
pub struct Switch {
    basic: BasicTopology,
}

impl Switch {
    pub fn new(npus_count: usize, bandwidth: Bandwidth, latency: Latency) -> Self {
        assert!(npus_count > 1);
        Self {
            basic: BasicTopology::new(TopologyKind::Switch, npus_count, bandwidth, latency),
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

        2
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
    fn test_every_pair_crosses_the_switch() {
        let topology = Switch::new(8, 50.0, 500.0);
        assert_eq!(topology.hop_count(1, 4), 2);
        assert_eq!(topology.hop_count(7, 0), 2);
    }
}
