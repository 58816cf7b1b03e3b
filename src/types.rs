//! Shared value types for the topology models.
//!
//! This module defines the identifiers and physical quantities used by both
//! the congestion-aware and congestion-unaware topology families, plus the
//! closed set of topology building blocks.

use serde::{Deserialize, Serialize};

/// Identifies one device inside a topology instance.
///
/// Ids are dense and contiguous in `[0, npus_count)`. Congestion-aware
/// topologies may address additional router nodes with ids at or above
/// `npus_count`.
pub type DeviceId = usize;

/// Link capacity in GB/s as configured.
pub type Bandwidth = f64;

/// Fixed per-hop propagation delay in nanoseconds.
pub type Latency = f64;

/// Payload size in bytes.
pub type ChunkSize = u64;

/// Simulated time in integer nanosecond ticks.
pub type EventTime = u64;

/// Convert a bandwidth in GB/s into bytes per nanosecond.
///
/// 1 GB is taken as 2^30 bytes, 1 s as 10^9 ns.
pub fn bw_gbps_to_bpns(bw_gbps: Bandwidth) -> Bandwidth {
    bw_gbps * (1u64 << 30) as f64 / 1_000_000_000.0
}

/// Per-dimension construction metadata exposed by every topology.
///
/// Trivial kinds and Butterfly report a single dimension; the grid kinds
/// report their two axes; a stacked topology concatenates its members'
/// entries.
#[derive(Debug, Clone)]
pub struct TopologyMeta {
    pub npus_count: usize,
    pub dims_count: usize,
    pub npus_count_per_dim: Vec<usize>,
    pub bandwidth_per_dim: Vec<Bandwidth>,
    pub latency_per_dim: Vec<Latency>,
}

/// The closed set of topology building blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopologyKind {
    /// Devices on a cycle, each linked to its two neighbors
    Ring,
    /// Every device pairwise linked
    FullyConnected,
    /// All devices behind a single switch
    Switch,
    /// 2-D grid without wraparound
    Mesh2D,
    /// 2-D grid with wraparound on both axes
    Torus2D,
    /// Radix-ary multi-stage butterfly
    Butterfly,
}

impl TopologyKind {
    /// Returns true for the kinds that may be stacked into a
    /// multi-dimensional network.
    pub fn is_stackable(&self) -> bool {
        matches!(
            self,
            TopologyKind::Ring | TopologyKind::FullyConnected | TopologyKind::Switch
        )
    }
}

impl std::fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyKind::Ring => write!(f, "Ring"),
            TopologyKind::FullyConnected => write!(f, "FullyConnected"),
            TopologyKind::Switch => write!(f, "Switch"),
            TopologyKind::Mesh2D => write!(f, "Mesh2D"),
            TopologyKind::Torus2D => write!(f, "Torus2D"),
            TopologyKind::Butterfly => write!(f, "Butterfly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bandwidth_conversion() {
        // 50 GB/s is 50 * 2^30 / 10^9 bytes per nanosecond
        let bpns = bw_gbps_to_bpns(50.0);
        assert!((bpns - 53.6870912).abs() < 1e-9);
    }

    #[test]
    fn test_stackable_kinds() {
        assert!(TopologyKind::Ring.is_stackable());
        assert!(TopologyKind::FullyConnected.is_stackable());
        assert!(TopologyKind::Switch.is_stackable());
        assert!(!TopologyKind::Mesh2D.is_stackable());
        assert!(!TopologyKind::Torus2D.is_stackable());
        assert!(!TopologyKind::Butterfly.is_stackable());
    }
}
