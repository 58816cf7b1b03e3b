//! Network configuration loading and validation.
//!
//! A network is described by four per-dimension arrays of equal length:
//! topology tokens (`Ring`, `Mesh2D(4x8)`, ...), device counts, link
//! bandwidths, and per-hop latencies. This module deserializes the YAML
//! form, resolves topology names, and lowers everything into the validated
//! [`NetworkSpec`] the topology factories consume.

use std::fs::File;
use std::path::Path;

use color_eyre::Result;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::TopologyError;
use crate::types::{Bandwidth, Latency, TopologyKind};

/// Raw network description as found in a YAML configuration file.
///
/// ```yaml
/// topology: [ Ring, FullyConnected, Switch ]
/// npus_count: [ 2, 8, 4 ]
/// bandwidth: [ 200, 100, 50 ]
/// latency: [ 50, 500, 2000 ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Topology name per dimension, optionally with a parameter list
    pub topology: Vec<String>,
    /// Device count per dimension
    pub npus_count: Vec<usize>,
    /// Link bandwidth per dimension in GB/s
    pub bandwidth: Vec<Bandwidth>,
    /// Per-hop latency per dimension in ns
    pub latency: Vec<Latency>,
}

impl NetworkConfig {
    /// Resolve topology tokens and validate all per-dimension values,
    /// producing the typed spec consumed by the factories.
    pub fn parse(&self) -> Result<NetworkSpec, TopologyError> {
        let mut kinds = Vec::with_capacity(self.topology.len());
        let mut params = Vec::with_capacity(self.topology.len());
        for token in &self.topology {
            let (name, param) = parse_topology_token(token)?;
            kinds.push(parse_topology_name(&name)?);
            params.push(param);
        }

        NetworkSpec::new(
            kinds,
            params,
            self.npus_count.clone(),
            self.bandwidth.clone(),
            self.latency.clone(),
        )
    }
}

/// Validated per-dimension network description.
///
/// Construction is the only validation point: a `NetworkSpec` that exists
/// is internally consistent.
#[derive(Debug, Clone)]
pub struct NetworkSpec {
    kinds: Vec<TopologyKind>,
    params: Vec<String>,
    npus_counts: Vec<usize>,
    bandwidths: Vec<Bandwidth>,
    latencies: Vec<Latency>,
}

impl NetworkSpec {
    /// Build a spec from already-typed per-dimension vectors, applying the
    /// validity rules: equal lengths, every device count above 1, positive
    /// bandwidths, non-negative latencies.
    pub fn new(
        kinds: Vec<TopologyKind>,
        params: Vec<String>,
        npus_counts: Vec<usize>,
        bandwidths: Vec<Bandwidth>,
        latencies: Vec<Latency>,
    ) -> Result<Self, TopologyError> {
        let dims_count = kinds.len();
        if dims_count == 0 {
            return Err(TopologyError::EmptyNetwork);
        }

        if npus_counts.len() != dims_count {
            return Err(TopologyError::DimensionCountMismatch {
                field: "npus_count",
                actual: npus_counts.len(),
                expected: dims_count,
            });
        }
        if bandwidths.len() != dims_count {
            return Err(TopologyError::DimensionCountMismatch {
                field: "bandwidth",
                actual: bandwidths.len(),
                expected: dims_count,
            });
        }
        if latencies.len() != dims_count {
            return Err(TopologyError::DimensionCountMismatch {
                field: "latency",
                actual: latencies.len(),
                expected: dims_count,
            });
        }
        if params.len() != dims_count {
            return Err(TopologyError::DimensionCountMismatch {
                field: "params",
                actual: params.len(),
                expected: dims_count,
            });
        }

        for &npus_count in &npus_counts {
            if npus_count <= 1 {
                return Err(TopologyError::InvalidNpusCount { value: npus_count });
            }
        }
        for &bandwidth in &bandwidths {
            if bandwidth <= 0.0 {
                return Err(TopologyError::InvalidBandwidth { value: bandwidth });
            }
        }
        for &latency in &latencies {
            if latency < 0.0 {
                return Err(TopologyError::InvalidLatency { value: latency });
            }
        }

        Ok(Self {
            kinds,
            params,
            npus_counts,
            bandwidths,
            latencies,
        })
    }

    /// Number of network dimensions.
    pub fn dims_count(&self) -> usize {
        self.kinds.len()
    }

    /// Topology kind per dimension.
    pub fn kinds(&self) -> &[TopologyKind] {
        &self.kinds
    }

    /// Raw shape parameter string per dimension.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Device count per dimension.
    pub fn npus_counts(&self) -> &[usize] {
        &self.npus_counts
    }

    /// Link bandwidth per dimension in GB/s.
    pub fn bandwidths(&self) -> &[Bandwidth] {
        &self.bandwidths
    }

    /// Per-hop latency per dimension in ns.
    pub fn latencies(&self) -> &[Latency] {
        &self.latencies
    }

    /// Total device count across all dimensions.
    pub fn total_npus(&self) -> usize {
        self.npus_counts.iter().product()
    }
}

/// Load and validate a network configuration from a YAML file
pub fn load_network_config(path: &Path) -> Result<NetworkSpec> {
    info!("Loading network configuration from: {:?}", path);

    // Open and deserialize the configuration file
    let file = File::open(path)?;
    let config: NetworkConfig = serde_yaml::from_reader(file)?;

    // Lower it into the validated spec
    let spec = config.parse()?;

    info!(
        "Parsed {}-dimensional network with {} NPUs",
        spec.dims_count(),
        spec.total_npus()
    );

    Ok(spec)
}

/// Split a topology token into its name and parameter text.
///
/// `Name` alone has empty parameters; `Name(params)` (also with `[`/`{`
/// brackets) carries the text between the first opening and the last
/// closing bracket.
fn parse_topology_token(token: &str) -> Result<(String, String), TopologyError> {
    let cleaned = token.trim();
    if cleaned.is_empty() {
        return Err(TopologyError::EmptyTopologyToken);
    }

    let Some(open) = cleaned.find(['(', '[', '{']) else {
        return Ok((cleaned.to_string(), String::new()));
    };

    let close = cleaned.rfind([')', ']', '}']).filter(|&close| close > open);
    let Some(close) = close else {
        return Err(TopologyError::MalformedTopologyToken {
            token: cleaned.to_string(),
        });
    };

    let name = cleaned[..open].trim();
    let param = cleaned[open + 1..close].trim();
    if name.is_empty() {
        return Err(TopologyError::MissingTopologyName {
            token: cleaned.to_string(),
        });
    }

    Ok((name.to_string(), param.to_string()))
}

/// Resolve a topology name into its kind. `Mesh` and `Torus` are accepted
/// as short forms.
fn parse_topology_name(name: &str) -> Result<TopologyKind, TopologyError> {
    match name {
        "Ring" => Ok(TopologyKind::Ring),
        "FullyConnected" => Ok(TopologyKind::FullyConnected),
        "Switch" => Ok(TopologyKind::Switch),
        "Mesh2D" | "Mesh" => Ok(TopologyKind::Mesh2D),
        "Torus2D" | "Torus" => Ok(TopologyKind::Torus2D),
        "Butterfly" => Ok(TopologyKind::Butterfly),
        _ => Err(TopologyError::UnknownTopologyName {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from_yaml(yaml: &str) -> NetworkConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_single_dimension_config_parses() {
        let config = config_from_yaml(
            r#"
topology: [ Ring ]
npus_count: [ 8 ]
bandwidth: [ 50 ]
latency: [ 500 ]
"#,
        );

        let spec = config.parse().unwrap();
        assert_eq!(spec.dims_count(), 1);
        assert_eq!(spec.kinds(), &[TopologyKind::Ring]);
        assert_eq!(spec.params(), &[String::new()]);
        assert_eq!(spec.total_npus(), 8);
    }

    #[test]
    fn test_topology_token_with_parameters() {
        let (name, param) = parse_topology_token("Mesh2D(rows=4, cols=8)").unwrap();
        assert_eq!(name, "Mesh2D");
        assert_eq!(param, "rows=4, cols=8");

        // all bracket styles are accepted
        let (name, param) = parse_topology_token("Torus2D[4x8]").unwrap();
        assert_eq!(name, "Torus2D");
        assert_eq!(param, "4x8");
    }

    #[test]
    fn test_malformed_topology_tokens() {
        assert_eq!(
            parse_topology_token("  ").unwrap_err(),
            TopologyError::EmptyTopologyToken
        );
        assert!(matches!(
            parse_topology_token("Mesh2D(4x8").unwrap_err(),
            TopologyError::MalformedTopologyToken { .. }
        ));
        assert!(matches!(
            parse_topology_token("(4x8)").unwrap_err(),
            TopologyError::MissingTopologyName { .. }
        ));
    }

    #[test]
    fn test_unknown_topology_name() {
        let config = config_from_yaml(
            r#"
topology: [ Hypercube ]
npus_count: [ 8 ]
bandwidth: [ 50 ]
latency: [ 500 ]
"#,
        );
        assert_eq!(
            config.parse().unwrap_err(),
            TopologyError::UnknownTopologyName {
                name: "Hypercube".to_string()
            }
        );
    }

    #[test]
    fn test_name_aliases() {
        assert_eq!(parse_topology_name("Mesh").unwrap(), TopologyKind::Mesh2D);
        assert_eq!(parse_topology_name("Torus").unwrap(), TopologyKind::Torus2D);
    }

    #[test]
    fn test_vector_length_mismatch_is_rejected() {
        let config = config_from_yaml(
            r#"
topology: [ Ring, Switch ]
npus_count: [ 8 ]
bandwidth: [ 50, 50 ]
latency: [ 500, 500 ]
"#,
        );
        assert_eq!(
            config.parse().unwrap_err(),
            TopologyError::DimensionCountMismatch {
                field: "npus_count",
                actual: 1,
                expected: 2,
            }
        );
    }

    #[test]
    fn test_value_range_validation() {
        let err = NetworkSpec::new(
            vec![TopologyKind::Ring],
            vec![String::new()],
            vec![1],
            vec![50.0],
            vec![500.0],
        )
        .unwrap_err();
        assert_eq!(err, TopologyError::InvalidNpusCount { value: 1 });

        let err = NetworkSpec::new(
            vec![TopologyKind::Ring],
            vec![String::new()],
            vec![8],
            vec![0.0],
            vec![500.0],
        )
        .unwrap_err();
        assert_eq!(err, TopologyError::InvalidBandwidth { value: 0.0 });

        let err = NetworkSpec::new(
            vec![TopologyKind::Ring],
            vec![String::new()],
            vec![8],
            vec![50.0],
            vec![-1.0],
        )
        .unwrap_err();
        assert_eq!(err, TopologyError::InvalidLatency { value: -1.0 });
    }

    #[test]
    fn test_empty_network_is_rejected() {
        let err = NetworkSpec::new(vec![], vec![], vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err, TopologyError::EmptyNetwork);
    }
}
