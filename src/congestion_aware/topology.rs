//! Congestion-aware topology contract and factory.
//!
//! Topologies in this family build an explicit device/link graph at
//! construction time and answer route queries with the concrete
//! device-by-device path a chunk would take. Link capacity arbitration is
//! left to the engine consuming those routes.

use log::debug;

use crate::config::NetworkSpec;
use crate::error::TopologyError;
use crate::shape::{parse_butterfly_spec, parse_mesh2d_shape, parse_torus2d_shape};
use crate::types::{Bandwidth, DeviceId, Latency, TopologyKind, TopologyMeta};

use super::butterfly::Butterfly;
use super::fully_connected::FullyConnected;
use super::graph::{DeviceGraph, Route};
use super::mesh2d::Mesh2D;
use super::multi_dim::MultiDimTopology;
use super::ring::Ring;
use super::switch::Switch;
use super::torus2d::Torus2D;

/// Common state of a single basic topology: its kind, the connectivity
/// graph over NPUs and routers, and the per-dimension metadata.
#[derive(Debug, Clone)]
pub(crate) struct BasicTopology {
    kind: TopologyKind,
    graph: DeviceGraph,
    meta: TopologyMeta,
}

impl BasicTopology {
    /// Single-axis topology over `devices_count` graph nodes, of which the
    /// first `npus_count` are NPUs and the rest routers.
    pub(crate) fn new(
        kind: TopologyKind,
        npus_count: usize,
        devices_count: usize,
        bandwidth: Bandwidth,
        latency: Latency,
    ) -> Self {
        Self {
            kind,
            graph: DeviceGraph::new(devices_count),
            meta: TopologyMeta {
                npus_count,
                dims_count: 1,
                npus_count_per_dim: vec![npus_count],
                bandwidth_per_dim: vec![bandwidth],
                latency_per_dim: vec![latency],
            },
        }
    }

    /// Grid topology: all graph nodes are NPUs, metadata reports the two
    /// axes with shared link parameters.
    pub(crate) fn grid(
        kind: TopologyKind,
        npus_count: usize,
        bandwidth: Bandwidth,
        latency: Latency,
        rows: usize,
        cols: usize,
    ) -> Self {
        Self {
            kind,
            graph: DeviceGraph::new(npus_count),
            meta: TopologyMeta {
                npus_count,
                dims_count: 2,
                npus_count_per_dim: vec![rows, cols],
                bandwidth_per_dim: vec![bandwidth, bandwidth],
                latency_per_dim: vec![latency, latency],
            },
        }
    }

    pub(crate) fn connect(
        &mut self,
        src: DeviceId,
        dest: DeviceId,
        bandwidth: Bandwidth,
        latency: Latency,
        bidirectional: bool,
    ) {
        self.graph.connect(src, dest, bandwidth, latency, bidirectional);
    }

    pub(crate) fn kind(&self) -> TopologyKind {
        self.kind
    }

    pub(crate) fn npus_count(&self) -> usize {
        self.meta.npus_count
    }

    pub(crate) fn meta(&self) -> &TopologyMeta {
        &self.meta
    }

    pub(crate) fn graph(&self) -> &DeviceGraph {
        &self.graph
    }
}

/// A congestion-aware topology.
///
/// The set of variants is closed; the factory and the stacking validation
/// match it exhaustively.
#[derive(Debug, Clone)]
pub enum Topology {
    Ring(Ring),
    FullyConnected(FullyConnected),
    Switch(Switch),
    Mesh2D(Mesh2D),
    Torus2D(Torus2D),
    Butterfly(Butterfly),
    MultiDim(MultiDimTopology),
}

impl Topology {
    fn meta(&self) -> &TopologyMeta {
        match self {
            Topology::Ring(t) => t.meta(),
            Topology::FullyConnected(t) => t.meta(),
            Topology::Switch(t) => t.meta(),
            Topology::Mesh2D(t) => t.meta(),
            Topology::Torus2D(t) => t.meta(),
            Topology::Butterfly(t) => t.meta(),
            Topology::MultiDim(t) => t.meta(),
        }
    }

    /// Building-block kind of a basic topology; `None` for the
    /// multi-dimensional composite, whose members carry their own kinds.
    pub fn kind(&self) -> Option<TopologyKind> {
        match self {
            Topology::Ring(t) => Some(t.kind()),
            Topology::FullyConnected(t) => Some(t.kind()),
            Topology::Switch(t) => Some(t.kind()),
            Topology::Mesh2D(t) => Some(t.kind()),
            Topology::Torus2D(t) => Some(t.kind()),
            Topology::Butterfly(t) => Some(t.kind()),
            Topology::MultiDim(_) => None,
        }
    }

    /// Total number of addressable NPUs.
    pub fn npus_count(&self) -> usize {
        self.meta().npus_count
    }

    /// Total number of graph nodes, router nodes included.
    pub fn devices_count(&self) -> usize {
        match self {
            Topology::Ring(t) => t.graph().devices_count(),
            Topology::FullyConnected(t) => t.graph().devices_count(),
            Topology::Switch(t) => t.graph().devices_count(),
            Topology::Mesh2D(t) => t.graph().devices_count(),
            Topology::Torus2D(t) => t.graph().devices_count(),
            Topology::Butterfly(t) => t.graph().devices_count(),
            Topology::MultiDim(t) => t.devices_count(),
        }
    }

    /// Number of dimensions reported in the per-dimension metadata.
    pub fn dims_count(&self) -> usize {
        self.meta().dims_count
    }

    /// Device count per dimension.
    pub fn npus_count_per_dim(&self) -> &[usize] {
        &self.meta().npus_count_per_dim
    }

    /// Link bandwidth per dimension in GB/s.
    pub fn bandwidth_per_dim(&self) -> &[Bandwidth] {
        &self.meta().bandwidth_per_dim
    }

    /// Per-hop latency per dimension in ns.
    pub fn latency_per_dim(&self) -> &[Latency] {
        &self.meta().latency_per_dim
    }

    /// The underlying connectivity graph of a basic topology; `None` for
    /// the multi-dimensional composite, whose members own their graphs.
    pub fn graph(&self) -> Option<&DeviceGraph> {
        match self {
            Topology::Ring(t) => Some(t.graph()),
            Topology::FullyConnected(t) => Some(t.graph()),
            Topology::Switch(t) => Some(t.graph()),
            Topology::Mesh2D(t) => Some(t.graph()),
            Topology::Torus2D(t) => Some(t.graph()),
            Topology::Butterfly(t) => Some(t.graph()),
            Topology::MultiDim(_) => None,
        }
    }

    /// The explicit path from `src` to `dest`, both inclusive. `src ==
    /// dest` yields the one-element route.
    pub fn route(&self, src: DeviceId, dest: DeviceId) -> Route {
        match self {
            Topology::Ring(t) => t.route(src, dest),
            Topology::FullyConnected(t) => t.route(src, dest),
            Topology::Switch(t) => t.route(src, dest),
            Topology::Mesh2D(t) => t.route(src, dest),
            Topology::Torus2D(t) => t.route(src, dest),
            Topology::Butterfly(t) => t.route(src, dest),
            Topology::MultiDim(t) => t.route(src, dest),
        }
    }
}

/// Build the congestion-aware topology a validated network spec asks for.
///
/// A single dimension instantiates the requested kind directly; multiple
/// dimensions are stacked into a [`MultiDimTopology`], which only the
/// trivial kinds support.
pub fn construct_topology(spec: &NetworkSpec) -> Result<Topology, TopologyError> {
    if spec.dims_count() == 1 {
        let kind = spec.kinds()[0];
        let npus_count = spec.npus_counts()[0];
        let bandwidth = spec.bandwidths()[0];
        let latency = spec.latencies()[0];
        let param = &spec.params()[0];

        debug!(
            "Constructing single-dimension {} graph with {} NPUs",
            kind, npus_count
        );

        let topology = match kind {
            TopologyKind::Ring => {
                Topology::Ring(Ring::new(npus_count, bandwidth, latency, true))
            }
            TopologyKind::FullyConnected => {
                Topology::FullyConnected(FullyConnected::new(npus_count, bandwidth, latency))
            }
            TopologyKind::Switch => {
                Topology::Switch(Switch::new(npus_count, bandwidth, latency))
            }
            TopologyKind::Mesh2D => {
                let shape = parse_mesh2d_shape(param, npus_count)?;
                Topology::Mesh2D(Mesh2D::new(
                    npus_count, bandwidth, latency, shape.rows, shape.cols,
                ))
            }
            TopologyKind::Torus2D => {
                let shape = parse_torus2d_shape(param, npus_count)?;
                Topology::Torus2D(Torus2D::new(
                    npus_count, bandwidth, latency, shape.rows, shape.cols,
                ))
            }
            TopologyKind::Butterfly => {
                let butterfly = parse_butterfly_spec(param, npus_count)?;
                Topology::Butterfly(Butterfly::new(
                    npus_count,
                    bandwidth,
                    latency,
                    butterfly.radix,
                    butterfly.stages,
                ))
            }
        };
        return Ok(topology);
    }

    let mut dims = Vec::with_capacity(spec.dims_count());
    for dim in 0..spec.dims_count() {
        let kind = spec.kinds()[dim];
        let npus_count = spec.npus_counts()[dim];
        let bandwidth = spec.bandwidths()[dim];
        let latency = spec.latencies()[dim];

        let dim_topology = match kind {
            TopologyKind::Ring => {
                Topology::Ring(Ring::new(npus_count, bandwidth, latency, true))
            }
            TopologyKind::FullyConnected => {
                Topology::FullyConnected(FullyConnected::new(npus_count, bandwidth, latency))
            }
            TopologyKind::Switch => {
                Topology::Switch(Switch::new(npus_count, bandwidth, latency))
            }
            TopologyKind::Mesh2D | TopologyKind::Torus2D | TopologyKind::Butterfly => {
                return Err(TopologyError::UnstackableTopology { kind, dim });
            }
        };
        dims.push(dim_topology);
    }

    debug!("Constructing {}-dimensional stacked graph", dims.len());
    Ok(Topology::MultiDim(MultiDimTopology::new(dims)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_for(kind: &str, npus_count: usize) -> NetworkSpec {
        let config = crate::config::NetworkConfig {
            topology: vec![kind.to_string()],
            npus_count: vec![npus_count],
            bandwidth: vec![50.0],
            latency: vec![500.0],
        };
        config.parse().unwrap()
    }

    #[test]
    fn test_factory_builds_every_single_dimension_kind() {
        assert!(matches!(
            construct_topology(&spec_for("Ring", 8)).unwrap(),
            Topology::Ring(_)
        ));
        assert!(matches!(
            construct_topology(&spec_for("FullyConnected", 8)).unwrap(),
            Topology::FullyConnected(_)
        ));
        assert!(matches!(
            construct_topology(&spec_for("Switch", 8)).unwrap(),
            Topology::Switch(_)
        ));
        assert!(matches!(
            construct_topology(&spec_for("Mesh2D(4x4)", 16)).unwrap(),
            Topology::Mesh2D(_)
        ));
        assert!(matches!(
            construct_topology(&spec_for("Torus2D", 16)).unwrap(),
            Topology::Torus2D(_)
        ));
        assert!(matches!(
            construct_topology(&spec_for("Butterfly(radix=4)", 64)).unwrap(),
            Topology::Butterfly(_)
        ));
    }

    #[test]
    fn test_factory_rejects_stacked_butterfly() {
        let config = crate::config::NetworkConfig {
            topology: vec!["Ring".to_string(), "Butterfly".to_string()],
            npus_count: vec![2, 4],
            bandwidth: vec![50.0, 50.0],
            latency: vec![500.0, 500.0],
        };
        let spec = config.parse().unwrap();
        assert_eq!(
            construct_topology(&spec).unwrap_err(),
            TopologyError::UnstackableTopology {
                kind: TopologyKind::Butterfly,
                dim: 1,
            }
        );
    }

    #[test]
    fn test_route_to_self_is_degenerate() {
        let topology = construct_topology(&spec_for("Mesh2D", 16)).unwrap();
        assert_eq!(topology.route(5, 5), vec![5]);
    }

    #[test]
    fn test_route_endpoints_are_inclusive() {
        let topology = construct_topology(&spec_for("Ring", 8)).unwrap();
        let route = topology.route(1, 4);
        assert_eq!(route.first(), Some(&1));
        assert_eq!(route.last(), Some(&4));
    }
}
