//! Multi-dimensional composition of analytic topologies.
//!
//! A stacked network is a set of independent parallel networks, one per
//! axis: a transfer resolves each dimension on its own, and the dimensions
//! where source and destination agree contribute nothing.

use crate::error::TopologyError;
use crate::types::{ChunkSize, DeviceId, EventTime, TopologyMeta};

use super::topology::Topology;

/// Composition of independently-constructed trivial topologies.
///
/// Global device ids are the mixed-radix encoding of the per-dimension
/// local ids, dimension 0 least significant.
#[derive(Debug, Clone)]
pub struct MultiDimTopology {
    dims: Vec<Topology>,
    meta: TopologyMeta,
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
        })
    }

    pub(crate) fn meta(&self) -> &TopologyMeta {
        &self.meta
    }

    /// Total device count, the product of all per-dimension counts.
    pub fn npus_count(&self) -> usize {
        self.meta.npus_count
    }

    /// The stacked member topologies, in dimension order.
    pub fn dims(&self) -> &[Topology] {
        &self.dims
    }

    /// Per-dimension local coordinates of a global device id.
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

    /// Global device id of per-dimension local coordinates.
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

    /// Total hops: the sum of each differing dimension's own hop count.
    pub fn hop_count(&self, src: DeviceId, dest: DeviceId) -> usize {
        assert!(src < self.meta.npus_count);
        assert!(dest < self.meta.npus_count);
        assert_ne!(src, dest);

        let src_coords = self.project(src);
        let dest_coords = self.project(dest);

        self.dims
            .iter()
            .enumerate()
            .filter(|(dim, _)| src_coords[*dim] != dest_coords[*dim])
            .map(|(dim, topology)| topology.hop_count(src_coords[dim], dest_coords[dim]))
            .sum()
    }

    /// Total delay: the sum of each differing dimension's own delay,
    /// computed as if the other dimensions did not exist.
    pub fn send(&self, src: DeviceId, dest: DeviceId, chunk_size: ChunkSize) -> EventTime {
        assert!(src < self.meta.npus_count);
        assert!(dest < self.meta.npus_count);

        if src == dest {
            return 0;
        }

        let src_coords = self.project(src);
        let dest_coords = self.project(dest);

        let mut total = 0;
        for (dim, topology) in self.dims.iter().enumerate() {
            if src_coords[dim] != dest_coords[dim] {
                total += topology.send(src_coords[dim], dest_coords[dim], chunk_size);
            }
        }
        total
    }
}
