//! Switch topology, graph variant.

use crate::types::{Bandwidth, DeviceId, Latency, TopologyKind, TopologyMeta};

use super::graph::{DeviceGraph, Route};
use super::topology::BasicTopology;

/// All NPUs behind a single switch node. The switch occupies the one graph
/// id past the NPU range.
#[derive(Debug, Clone)]
pub struct Switch {
    basic: BasicTopology,
    switch_id: DeviceId,
}

impl Switch {
    pub fn new(npus_count: usize, bandwidth: Bandwidth, latency: Latency) -> Self {
        assert!(npus_count > 1);

        let switch_id = npus_count;
        let mut basic = BasicTopology::new(
            TopologyKind::Switch,
            npus_count,
            npus_count + 1,
            bandwidth,
            latency,
        );
        for id in 0..npus_count {
            basic.connect(id, switch_id, bandwidth, latency, true);
        }

        Self { basic, switch_id }
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

    /// Graph id of the switch node.
    pub fn switch_id(&self) -> DeviceId {
        self.switch_id
    }

    pub fn route(&self, src: DeviceId, dest: DeviceId) -> Route {
        let npus_count = self.basic.npus_count();
        assert!(src < npus_count);
        assert!(dest < npus_count);

        if src == dest {
            vec![src]
        } else {
            vec![src, self.switch_id, dest]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_go_through_the_switch() {
        let topology = Switch::new(8, 50.0, 500.0);
        assert_eq!(topology.route(1, 4), vec![1, 8, 4]);
        assert_eq!(topology.route(7, 0), vec![7, 8, 0]);
    }

    #[test]
    fn test_npus_connect_only_to_the_switch() {
        let topology = Switch::new(4, 50.0, 500.0);
        assert_eq!(topology.graph().devices_count(), 5);
        for id in 0..4 {
            assert!(topology.graph().connected(id, 4));
            assert!(topology.graph().connected(4, id));
        }
        assert!(!topology.graph().connected(0, 1));
    }
}
