//! Congestion-unaware topology contract and factory.
//!
//! Topologies in this family never materialize a connectivity graph: every
//! query is answered analytically from the shape parameters. The delay of a
//! transfer is `hops * latency + chunk_size / bandwidth`, with bandwidth
//! converted to bytes/ns, truncated to an integer tick count.

use log::debug;

use crate::config::NetworkSpec;
use crate::error::TopologyError;
use crate::shape::{parse_butterfly_spec, parse_mesh2d_shape, parse_torus2d_shape};
use crate::types::{
    bw_gbps_to_bpns, Bandwidth, ChunkSize, DeviceId, EventTime, Latency, TopologyKind,
    TopologyMeta,
};

use super::butterfly::Butterfly;
use super::fully_connected::FullyConnected;
use super::mesh2d::Mesh2D;
use super::multi_dim::MultiDimTopology;
use super::ring::Ring;
use super::switch::Switch;
use super::torus2d::Torus2D;

/// Common state of a single basic topology: its kind, the configured link
/// parameters, and the derived bytes/ns bandwidth used for delay math.
#[derive(Debug, Clone)]
pub(crate) struct BasicTopology {
    kind: TopologyKind,
    latency: Latency,
    bandwidth_bpns: f64,
    meta: TopologyMeta,
}

impl BasicTopology {
    /// Single-axis topology: the whole device count on one dimension.
    pub(crate) fn new(
        kind: TopologyKind,
        npus_count: usize,
        bandwidth: Bandwidth,
        latency: Latency,
    ) -> Self {
        Self {
            kind,
            latency,
            bandwidth_bpns: bw_gbps_to_bpns(bandwidth),
            meta: TopologyMeta {
                npus_count,
                dims_count: 1,
                npus_count_per_dim: vec![npus_count],
                bandwidth_per_dim: vec![bandwidth],
                latency_per_dim: vec![latency],
            },
        }
    }

    /// Grid topology: devices spread over a rows x cols layout, reported as
    /// two dimensions sharing the same link parameters.
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
            latency,
            bandwidth_bpns: bw_gbps_to_bpns(bandwidth),
            meta: TopologyMeta {
                npus_count,
                dims_count: 2,
                npus_count_per_dim: vec![rows, cols],
                bandwidth_per_dim: vec![bandwidth, bandwidth],
                latency_per_dim: vec![latency, latency],
            },
        }
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

    /// Analytic delay of one chunk crossing `hops` links.
    pub(crate) fn communication_delay(&self, hops: usize, chunk_size: ChunkSize) -> EventTime {
        let link_delay = hops as f64 * self.latency;
        let serialization_delay = chunk_size as f64 / self.bandwidth_bpns;
        (link_delay + serialization_delay) as EventTime
    }
}

/// A congestion-unaware topology.
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

    /// Total number of addressable devices.
    pub fn npus_count(&self) -> usize {
        self.meta().npus_count
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

    /// Number of link traversals between two distinct devices.
    ///
    /// Callers must not pass `src == dest`; equal endpoints are a contract
    /// violation in this analytic family.
    pub fn hop_count(&self, src: DeviceId, dest: DeviceId) -> usize {
        match self {
            Topology::Ring(t) => t.hop_count(src, dest),
            Topology::FullyConnected(t) => t.hop_count(src, dest),
            Topology::Switch(t) => t.hop_count(src, dest),
            Topology::Mesh2D(t) => t.hop_count(src, dest),
            Topology::Torus2D(t) => t.hop_count(src, dest),
            Topology::Butterfly(t) => t.hop_count(src, dest),
            Topology::MultiDim(t) => t.hop_count(src, dest),
        }
    }

    /// Total delay of one chunk transfer, in integer time units.
    ///
    /// `src == dest` costs nothing and is answered before the stricter
    /// hop-count contract applies.
    pub fn send(&self, src: DeviceId, dest: DeviceId, chunk_size: ChunkSize) -> EventTime {
        let npus_count = self.npus_count();
        assert!(src < npus_count, "src device {} out of range", src);
        assert!(dest < npus_count, "dest device {} out of range", dest);

        if src == dest {
            return 0;
        }

        match self {
            Topology::Ring(t) => t.send(src, dest, chunk_size),
            Topology::FullyConnected(t) => t.send(src, dest, chunk_size),
            Topology::Switch(t) => t.send(src, dest, chunk_size),
            Topology::Mesh2D(t) => t.send(src, dest, chunk_size),
            Topology::Torus2D(t) => t.send(src, dest, chunk_size),
            Topology::Butterfly(t) => t.send(src, dest, chunk_size),
            Topology::MultiDim(t) => t.send(src, dest, chunk_size),
        }
    }
}

/// Build the congestion-unaware topology a validated network spec asks for.
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
            "Constructing single-dimension {} topology with {} NPUs",
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

    debug!("Constructing {}-dimensional stacked topology", dims.len());
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
    fn test_factory_rejects_stacked_grid() {
        let config = crate::config::NetworkConfig {
            topology: vec!["Ring".to_string(), "Mesh2D(2x2)".to_string()],
            npus_count: vec![2, 4],
            bandwidth: vec![50.0, 50.0],
            latency: vec![500.0, 500.0],
        };
        let spec = config.parse().unwrap();
        assert_eq!(
            construct_topology(&spec).unwrap_err(),
            TopologyError::UnstackableTopology {
                kind: TopologyKind::Mesh2D,
                dim: 1,
            }
        );
    }

    #[test]
    fn test_factory_rejects_grid_in_first_dimension_too() {
        let config = crate::config::NetworkConfig {
            topology: vec!["Torus2D".to_string(), "Ring".to_string()],
            npus_count: vec![4, 2],
            bandwidth: vec![50.0, 50.0],
            latency: vec![500.0, 500.0],
        };
        let spec = config.parse().unwrap();
        assert_eq!(
            construct_topology(&spec).unwrap_err(),
            TopologyError::UnstackableTopology {
                kind: TopologyKind::Torus2D,
                dim: 0,
            }
        );
    }

    #[test]
    fn test_send_to_self_costs_nothing() {
        let topology = construct_topology(&spec_for("Ring", 8)).unwrap();
        assert_eq!(topology.send(3, 3, 1_048_576), 0);
    }

    #[test]
    fn test_grid_metadata_reports_two_dimensions() {
        let topology = construct_topology(&spec_for("Mesh2D(2x8)", 16)).unwrap();
        assert_eq!(topology.dims_count(), 2);
        assert_eq!(topology.npus_count_per_dim(), &[2, 8]);
        assert_eq!(topology.bandwidth_per_dim(), &[50.0, 50.0]);
        assert_eq!(topology.latency_per_dim(), &[500.0, 500.0]);
    }
}
