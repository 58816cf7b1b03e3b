//! # Netanalytic - Topology and routing models for network simulation
//!
//! This library models interconnection-network topologies for large compute
//! clusters and computes, for any ordered pair of devices, either an
//! explicit multi-hop route or an analytic hop count and communication
//! delay. It is the routing/topology kernel of a network performance
//! simulator: higher layers decide what to send and when, this crate
//! answers how far apart two NPUs are and what a transfer costs.
//!
//! ## Overview
//!
//! A network is described per dimension: a topology kind, a device count,
//! a link bandwidth, and a per-hop latency. Supported building blocks are
//! Ring, FullyConnected, Switch, Mesh2D, Torus2D, and Butterfly; the three
//! trivial kinds can additionally be stacked into a multi-dimensional
//! network (e.g. a ring within a board, fully-connected across boards).
//!
//! Every topology comes in two variants:
//!
//! - **Congestion-aware**: builds an explicit weighted device/link graph
//!   and returns concrete device-by-device routes, for consumers that
//!   arbitrate link capacity between concurrent flows.
//! - **Congestion-unaware**: computes analytic hop counts and delays with
//!   no graph materialized, for fast end-to-end cost estimates.
//!
//! Both variants of the same topology agree: the length of an explicit
//! route minus one always equals the analytic hop count.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `types`: shared value types (device ids, bandwidth, latency, kinds)
//! - `error`: structured configuration errors
//! - `shape`: inference of grid and butterfly shapes from parameter strings
//! - `config`: YAML network description loading and validation
//! - `congestion_aware`: graph-building topologies with explicit routes
//! - `congestion_unaware`: analytic topologies with hop counts and delays
//!
//! ## Example Usage
//!
//! ```rust
//! use netanalytic::config::NetworkConfig;
//! use netanalytic::congestion_unaware;
//!
//! let config: NetworkConfig = serde_yaml::from_str(
//!     "topology: [ Ring ]\nnpus_count: [ 8 ]\nbandwidth: [ 50 ]\nlatency: [ 500 ]",
//! )?;
//! let spec = config.parse()?;
//!
//! let topology = congestion_unaware::construct_topology(&spec)?;
//! assert_eq!(topology.hop_count(1, 4), 3);
//! assert_eq!(topology.send(1, 4, 1_048_576), 21_031);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Configuration problems (malformed parameters, inconsistent shapes,
//! unsupported compositions) surface as [`error::TopologyError`] values
//! from parsing and construction; nothing in this library terminates the
//! process. Out-of-range device ids in query calls are caller bugs and
//! fail fast with assertions.

pub mod config;
pub mod error;
pub mod shape;
pub mod types;

pub mod congestion_aware;
pub mod congestion_unaware;
