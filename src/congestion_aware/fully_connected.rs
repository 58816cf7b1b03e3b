//! Fully-connected topology, graph variant.

use crate::types::{Bandwidth, DeviceId, Latency, TopologyKind, TopologyMeta};

use super::graph::{DeviceGraph, Route};
use super::topology::BasicTopology;

/// Every device pairwise linked: any route is direct.
#[derive(Debug, Clone)]
pub struct FullyConnected {
    basic: BasicTopology,
}

impl FullyConnected {
    pub fn new(npus_count: usize, bandwidth: Bandwidth, latency: Latency) -> Self {
        assert!(npus_count > 1);

        let mut basic = BasicTopology::new(
            TopologyKind::FullyConnected,
            npus_count,
            npus_count,
            bandwidth,
            latency,
        );
        for src in 0..npus_count {
            for dest in src + 1..npus_count {
                basic.connect(src, dest, bandwidth, latency, true);
            }
        }

        Self { basic }
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

    pub fn route(&self, src: DeviceId, dest: DeviceId) -> Route {
        let npus_count = self.basic.npus_count();
        assert!(src < npus_count);
        assert!(dest < npus_count);

        if src == dest {
            vec![src]
        } else {
            vec![src, dest]
        }
    }
}
