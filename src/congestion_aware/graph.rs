//! Device/link connectivity graph.
//!
//! Congestion-aware topologies materialize an explicit weighted graph so an
//! external engine can reserve link capacity along the routes this crate
//! computes. Devices are an arena indexed by id; each holds its outgoing
//! links keyed by neighbor id.

use std::collections::BTreeMap;

use crate::types::{Bandwidth, DeviceId, Latency};

/// An explicit device-by-device path, source and destination inclusive.
pub type Route = Vec<DeviceId>;

/// Directed link with its physical parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Capacity in GB/s
    pub bandwidth: Bandwidth,
    /// Propagation delay in ns
    pub latency: Latency,
}

/// One node of the connectivity graph: an NPU or a router.
#[derive(Debug, Clone, Default)]
struct Device {
    // BTreeMap keeps neighbor iteration deterministic
    links: BTreeMap<DeviceId, Link>,
}

/// Arena of devices and the links between them.
#[derive(Debug, Clone)]
pub struct DeviceGraph {
    devices: Vec<Device>,
}

impl DeviceGraph {
    /// Create a graph of `devices_count` unconnected devices.
    pub(crate) fn new(devices_count: usize) -> Self {
        Self {
            devices: vec![Device::default(); devices_count],
        }
    }

    /// Add a link from `src` to `dest`; with `bidirectional` the reverse
    /// link is added as well.
    pub(crate) fn connect(
        &mut self,
        src: DeviceId,
        dest: DeviceId,
        bandwidth: Bandwidth,
        latency: Latency,
        bidirectional: bool,
    ) {
        assert!(src < self.devices.len());
        assert!(dest < self.devices.len());
        assert_ne!(src, dest);

        let link = Link { bandwidth, latency };
        self.devices[src].links.insert(dest, link);
        if bidirectional {
            self.devices[dest].links.insert(src, link);
        }
    }

    /// Number of devices in the arena, routers included.
    pub fn devices_count(&self) -> usize {
        self.devices.len()
    }

    /// Whether a direct link from `src` to `dest` exists.
    pub fn connected(&self, src: DeviceId, dest: DeviceId) -> bool {
        self.devices[src].links.contains_key(&dest)
    }

    /// The link from `src` to `dest`, if the devices are directly connected.
    pub fn link(&self, src: DeviceId, dest: DeviceId) -> Option<&Link> {
        self.devices[src].links.get(&dest)
    }

    /// Neighbor ids of a device, in ascending order.
    pub fn neighbors(&self, id: DeviceId) -> impl Iterator<Item = DeviceId> + '_ {
        self.devices[id].links.keys().copied()
    }
}
