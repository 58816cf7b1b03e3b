//! Congestion-aware topology models.
//!
//! This family materializes an explicit device/link graph at construction
//! time and answers route queries with the concrete device-by-device path.
//! Use it when a consumer needs to know which links a transfer occupies,
//! e.g. to arbitrate bandwidth between concurrent flows.

pub mod butterfly;
pub mod fully_connected;
pub mod graph;
pub mod mesh2d;
pub mod multi_dim;
pub mod ring;
pub mod switch;
pub mod topology;
pub mod torus2d;

// Re-export key types and functions for easier access
pub use butterfly::Butterfly;
pub use fully_connected::FullyConnected;
pub use graph::{DeviceGraph, Link, Route};
pub use mesh2d::Mesh2D;
pub use multi_dim::MultiDimTopology;
pub use ring::Ring;
pub use switch::Switch;
pub use topology::{construct_topology, Topology};
pub use torus2d::Torus2D;
