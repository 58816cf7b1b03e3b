//! Ring topology, graph variant.

use crate::types::{Bandwidth, DeviceId, Latency, TopologyKind, TopologyMeta};

use super::graph::{DeviceGraph, Route};
use super::topology::BasicTopology;

/// Devices arranged on a cycle, each linked to its successor (and, in the
/// bidirectional form, its predecessor).
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

        let mut basic =
            BasicTopology::new(TopologyKind::Ring, npus_count, npus_count, bandwidth, latency);
        for id in 0..npus_count {
            basic.connect(id, (id + 1) % npus_count, bandwidth, latency, bidirectional);
        }

        Self {
            basic,
            bidirectional,
        }
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

    /// Walk the ring toward the destination, taking the shorter arc when
    /// both directions are available.
    pub fn route(&self, src: DeviceId, dest: DeviceId) -> Route {
        let npus_count = self.basic.npus_count();
        assert!(src < npus_count);
        assert!(dest < npus_count);

        let mut route = vec![src];
        if src == dest {
            return route;
        }

        let steps_forward = (dest + npus_count - src) % npus_count;
        let steps_backward = npus_count - steps_forward;
        let go_forward = !self.bidirectional || steps_forward <= steps_backward;

        let mut current = src;
        while current != dest {
            current = if go_forward {
                (current + 1) % npus_count
            } else {
                (current + npus_count - 1) % npus_count
            };
            route.push(current);
        }
        route
    }
}
