//! Multi-dimensional composition of graph topologies.
//!
//! Each axis is an independent physical network. A route is resolved one
//! dimension at a time, in dimension order: the endpoints are projected
//! onto each dimension's local coordinates and the differing dimensions
//! contribute their own local route, translated into the flattened global
//! id space.

use crate::error::TopologyError;
use crate::types::{DeviceId, TopologyMeta};

use super::graph::Route;
use super::topology::Topology;

/// Composition of independently-constructed trivial topologies.
///
/// Global NPU ids are the mixed-radix encoding of the per-dimension local
/// ids, dimension 0 least significant. A dimension's router nodes (the
/// Switch) keep single shared handles, mapped into one auxiliary id block
/// per dimension after all NPU ids.
#[derive(Debug, Clone)]
pub struct MultiDimTopology {
    dims: Vec<Topology>,
    meta: TopologyMeta,
    /// Global id base of each dimension's router nodes
    aux_base: Vec<usize>,
    devices_count: usize,
}

impl MultiDimTopology {
    /// Stack the given dimensions. Only Ring, FullyConnected, and Switch
    /// members are accepted; grid and butterfly shapes use an internal
    /// addressing scheme incompatible with the flattened encoding.
    pub fn new(dims: Vec<Topology>) -> Result<Self, TopologyError> {
        if dims.is_empty() {
            return Err(TopologyError::EmptyNetwork);
        }

        let mut npus_count = 1;
        let mut npus_count_per_dim = Vec::with_capacity(dims.len());
        let mut bandwidth_per_dim = Vec::with_capacity(dims.len());
        let mut latency_per_dim = Vec::with_capacity(dims.len());

        for (dim, topology) in dims.iter().enumerate() {
            match topology.kind() {
                Some(kind) if kind.is_stackable() => {}
                Some(kind) => return Err(TopologyError::UnstackableTopology { kind, dim }),
                None => return Err(TopologyError::NestedMultiDim { dim }),
            }

            npus_count *= topology.npus_count();
            npus_count_per_dim.extend_from_slice(topology.npus_count_per_dim());
            bandwidth_per_dim.extend_from_slice(topology.bandwidth_per_dim());
            latency_per_dim.extend_from_slice(topology.latency_per_dim());
        }

        // Router nodes of each dimension land in one block after the NPUs.
        let mut aux_base = Vec::with_capacity(dims.len());
        let mut next_base = npus_count;
        for topology in &dims {
            aux_base.push(next_base);
            next_base += topology.devices_count() - topology.npus_count();
        }

        let dims_count = npus_count_per_dim.len();
        Ok(Self {
            dims,
            meta: TopologyMeta {
                npus_count,
                dims_count,
                npus_count_per_dim,
                bandwidth_per_dim,
                latency_per_dim,
            },
            aux_base,
            devices_count: next_base,
        })
    }

    pub(crate) fn meta(&self) -> &TopologyMeta {
        &self.meta
    }

    /// Total NPU count, the product of all per-dimension counts.
    pub fn npus_count(&self) -> usize {
        self.meta.npus_count
    }

    /// NPUs plus every dimension's router nodes.
    pub fn devices_count(&self) -> usize {
        self.devices_count
    }

    /// The stacked member topologies, in dimension order.
    pub fn dims(&self) -> &[Topology] {
        &self.dims
    }

    /// Per-dimension local coordinates of a global NPU id.
    pub fn project(&self, id: DeviceId) -> Vec<usize> {
        assert!(id < self.meta.npus_count);

        let mut remaining = id;
        self.dims
            .iter()
            .map(|topology| {
                let npus_count = topology.npus_count();
                let local = remaining % npus_count;
                remaining /= npus_count;
                local
            })
            .collect()
    }

    /// Global NPU id of per-dimension local coordinates.
    pub fn flatten(&self, coords: &[usize]) -> DeviceId {
        assert_eq!(coords.len(), self.dims.len());

        let mut id = 0;
        let mut stride = 1;
        for (topology, &coord) in self.dims.iter().zip(coords) {
            assert!(coord < topology.npus_count());
            id += coord * stride;
            stride *= topology.npus_count();
        }
        id
    }

    /// Resolve the route one dimension at a time: each differing dimension
    /// splices in its own local route, with local NPU steps re-encoded as
    /// global ids and local routers mapped to the dimension's auxiliary
    /// block.
    pub fn route(&self, src: DeviceId, dest: DeviceId) -> Route {
        assert!(src < self.meta.npus_count);
        assert!(dest < self.meta.npus_count);

        let mut route = vec![src];
        if src == dest {
            return route;
        }

        let mut coords = self.project(src);
        let dest_coords = self.project(dest);

        for (dim, topology) in self.dims.iter().enumerate() {
            if coords[dim] == dest_coords[dim] {
                continue;
            }

            let local_route = topology.route(coords[dim], dest_coords[dim]);
            let dim_npus = topology.npus_count();
            for &node in &local_route[1..] {
                if node < dim_npus {
                    coords[dim] = node;
                    route.push(self.flatten(&coords));
                } else {
                    route.push(self.aux_base[dim] + (node - dim_npus));
                }
            }
        }

        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::congestion_aware::{FullyConnected, Ring, Switch};

    fn three_dim_topology() -> MultiDimTopology {
        MultiDimTopology::new(vec![
            Topology::Ring(Ring::new(2, 200.0, 50.0, true)),
            Topology::FullyConnected(FullyConnected::new(8, 100.0, 500.0)),
            Topology::Switch(Switch::new(4, 50.0, 2000.0)),
        ])
        .unwrap()
    }

    #[test]
    fn test_device_counts() {
        let topology = three_dim_topology();
        assert_eq!(topology.npus_count(), 64);
        // one extra node: the switch of dimension 2
        assert_eq!(topology.devices_count(), 65);
    }

    #[test]
    fn test_single_dimension_route_is_local() {
        let topology = three_dim_topology();
        // global 0 -> 1 is one ring hop in dimension 0
        assert_eq!(topology.route(0, 1), vec![0, 1]);
        // global 0 -> 2 is one fully-connected hop in dimension 1
        assert_eq!(topology.route(0, 2), vec![0, 2]);
    }

    #[test]
    fn test_switch_dimension_routes_through_aux_node() {
        let topology = three_dim_topology();
        // 26 = (0, 5, 1) and 42 = (0, 5, 2) differ only in the switch
        // dimension: the route passes the shared switch node
        assert_eq!(topology.route(26, 42), vec![26, 64, 42]);
    }

    #[test]
    fn test_dimensions_resolve_in_order() {
        let topology = three_dim_topology();
        // (0,0,0) -> (1,1,1): ring first, then fully-connected, then switch
        let dest = topology.flatten(&[1, 1, 1]);
        let route = topology.route(0, dest);
        assert_eq!(
            route,
            vec![
                0,
                topology.flatten(&[1, 0, 0]),
                topology.flatten(&[1, 1, 0]),
                64,
                dest,
            ]
        );
    }

    #[test]
    fn test_route_length_matches_summed_hops() {
        let topology = three_dim_topology();
        // ring hop + fully-connected hop + two switch hops
        let dest = topology.flatten(&[1, 3, 2]);
        assert_eq!(topology.route(0, dest).len(), 5);
    }

    #[test]
    fn test_stacking_rejects_non_trivial_members() {
        use crate::congestion_aware::Torus2D;

        let err = MultiDimTopology::new(vec![Topology::Torus2D(Torus2D::new(
            4, 50.0, 500.0, 2, 2,
        ))])
        .unwrap_err();
        assert_eq!(
            err,
            TopologyError::UnstackableTopology {
                kind: crate::types::TopologyKind::Torus2D,
                dim: 0,
            }
        );
    }
}
