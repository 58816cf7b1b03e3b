//! Configuration-time error definitions.
//!
//! Every validation failure during network parsing, shape inference, or
//! topology construction surfaces as a [`TopologyError`] value carrying the
//! offending field and value, so the caller decides whether to abort or
//! correct the input.

use crate::types::TopologyKind;

/// Errors detected while parsing a network description or constructing a
/// topology from it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    /// A parameter token is not an integer at all.
    #[error("failed to parse {kind} {field} (got '{value}')")]
    InvalidParameter {
        kind: TopologyKind,
        field: &'static str,
        value: String,
    },

    /// A parameter parsed as an integer but is zero or negative.
    #[error("{kind} {field} must be positive (got {value})")]
    NonPositiveParameter {
        kind: TopologyKind,
        field: &'static str,
        value: i64,
    },

    /// Explicit rows and cols contradict the device count.
    #[error("{kind} rows*cols ({rows}x{cols}) must equal npus_count ({npus_count})")]
    GridShapeMismatch {
        kind: TopologyKind,
        rows: usize,
        cols: usize,
        npus_count: usize,
    },

    /// A single explicit grid dimension does not divide the device count.
    #[error("{kind} {field} ({value}) do not divide npus_count ({npus_count})")]
    NonDividingParameter {
        kind: TopologyKind,
        field: &'static str,
        value: usize,
        npus_count: usize,
    },

    /// Butterfly radix below the minimum branching factor.
    #[error("Butterfly radix must be >= 2 (got {value})")]
    RadixTooSmall { value: usize },

    /// Explicit radix and stages contradict the device count.
    #[error("Butterfly radix^stages ({radix}^{stages}) must equal npus_count ({npus_count})")]
    ButterflySpecMismatch {
        radix: usize,
        stages: usize,
        npus_count: usize,
    },

    /// The device count is not an exact power of the requested radix.
    #[error("npus_count ({npus_count}) is not a power of radix {radix}")]
    NotPowerOfRadix { npus_count: usize, radix: usize },

    /// The rounded radix guess derived from an explicit stage count does
    /// not reproduce the device count exactly.
    #[error("npus_count ({npus_count}) is not {radix}^{stages} (rounded guess based on provided stages)")]
    InexactStagesGuess {
        npus_count: usize,
        radix: usize,
        stages: usize,
    },

    /// The configuration declares no dimensions at all.
    #[error("network must declare at least one dimension")]
    EmptyNetwork,

    /// A topology entry in the configuration is empty.
    #[error("topology entry is empty")]
    EmptyTopologyToken,

    /// A topology token opens a parameter list but never closes it.
    #[error("malformed topology token: {token}")]
    MalformedTopologyToken { token: String },

    /// A topology token has parameters but no name in front of them.
    #[error("topology name missing in token: {token}")]
    MissingTopologyName { token: String },

    /// The topology name is not one of the supported building blocks.
    #[error("topology name {name} not supported (expected Ring/FullyConnected/Switch/Mesh2D/Torus2D/Butterfly)")]
    UnknownTopologyName { name: String },

    /// A per-dimension vector disagrees with the number of dimensions.
    #[error("length of {field} ({actual}) doesn't match with dims_count ({expected})")]
    DimensionCountMismatch {
        field: &'static str,
        actual: usize,
        expected: usize,
    },

    /// A dimension declares one device or fewer.
    #[error("npus_count ({value}) should be larger than 1")]
    InvalidNpusCount { value: usize },

    /// A dimension declares a non-positive bandwidth.
    #[error("bandwidth ({value}) should be larger than 0")]
    InvalidBandwidth { value: f64 },

    /// A dimension declares a negative latency.
    #[error("latency ({value}) should be non-negative")]
    InvalidLatency { value: f64 },

    /// A non-trivial topology was requested inside a multi-dimensional
    /// network.
    #[error("topology {kind} (dim {dim}) cannot be stacked inside multi-dimensional inputs")]
    UnstackableTopology { kind: TopologyKind, dim: usize },

    /// A multi-dimensional topology was passed as a member of another one.
    #[error("multi-dimensional topologies cannot be nested (dim {dim})")]
    NestedMultiDim { dim: usize },
}
