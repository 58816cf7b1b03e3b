//! Butterfly topology, analytic variant.

use crate::types::{Bandwidth, ChunkSize, DeviceId, EventTime, Latency, TopologyKind, TopologyMeta};

use super::topology::BasicTopology;

/// Radix-ary butterfly with `radix^stages == npus_count`. Every transfer
/// between distinct devices crosses exactly `stages` links, regardless of
/// how far apart the endpoints are numerically.
#[derive(Debug, Clone)]
pub struct Butterfly {
    basic: BasicTopology,
    stages: usize,
}

impl Butterfly {
    pub fn new(
        npus_count: usize,
        bandwidth: Bandwidth,
        latency: Latency,
        radix: usize,
        stages: usize,
    ) -> Self {
        assert!(radix >= 2);
        assert!(stages >= 1);
        assert!(npus_count > 1);
        assert_eq!(
            (radix as u128).checked_pow(stages as u32),
            Some(npus_count as u128)
        );

        Self {
            basic: BasicTopology::new(TopologyKind::Butterfly, npus_count, bandwidth, latency),
            stages,
        }
    }

    pub fn kind(&self) -> TopologyKind {
        self.basic.kind()
    }

    pub(crate) fn meta(&self) -> &TopologyMeta {
        self.basic.meta()
    }

    /// Constant `stages` for any pair of distinct devices.
    pub fn hop_count(&self, src: DeviceId, dest: DeviceId) -> usize {
        let npus_count = self.basic.npus_count();
        assert!(src < npus_count);
        assert!(dest < npus_count);
        assert_ne!(src, dest);

        self.stages
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
    fn test_hop_count_is_the_stage_count() {
        let butterfly = Butterfly::new(64, 70.0, 350.0, 4, 3);
        assert_eq!(butterfly.hop_count(0, 1), 3);
        assert_eq!(butterfly.hop_count(0, 63), 3);
        assert_eq!(butterfly.hop_count(17, 42), 3);
    }

    #[test]
    fn test_single_stage_butterfly() {
        let butterfly = Butterfly::new(8, 70.0, 350.0, 8, 1);
        assert_eq!(butterfly.hop_count(2, 5), 1);
    }
}
