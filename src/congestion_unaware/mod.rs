//! Congestion-unaware topology models.
//!
//! This family answers hop-count and communication-delay queries
//! analytically from the shape parameters; no connectivity graph is ever
//! materialized. Use it when only end-to-end cost matters, not the exact
//! path a chunk takes.

pub mod butterfly;
pub mod fully_connected;
pub mod mesh2d;
pub mod multi_dim;
pub mod ring;
pub mod switch;
pub mod topology;
pub mod torus2d;

// Re-export key types and functions for easier access
pub use butterfly::Butterfly;
pub use fully_connected::FullyConnected;
pub use mesh2d::Mesh2D;
pub use multi_dim::MultiDimTopology;
pub use ring::Ring;
pub use switch::Switch;
pub use topology::{construct_topology, Topology};
pub use torus2d::Torus2D;
