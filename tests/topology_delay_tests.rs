#[cfg(test)]
mod topology_delay_tests {
    use std::io::Write;
    use tempfile::NamedTempFile;

    use netanalytic::config::{load_network_config, NetworkConfig, NetworkSpec};
    use netanalytic::{congestion_aware, congestion_unaware};

    /// 1 MB test chunk
    const CHUNK_SIZE: u64 = 1_048_576;

    fn spec_from_yaml(yaml: &str) -> NetworkSpec {
        let config: NetworkConfig = serde_yaml::from_str(yaml).unwrap();
        config.parse().unwrap()
    }

    /// Per-hop latency plus serialization at the link bandwidth,
    /// GiB-based conversion, truncated to integer ticks.
    fn expected_delay(hops: usize, latency: f64, bandwidth_gbps: f64, chunk_size: u64) -> u64 {
        let bandwidth_bpns = bandwidth_gbps * (1u64 << 30) as f64 / 1_000_000_000.0;
        let serialization = chunk_size as f64 / bandwidth_bpns;
        (hops as f64 * latency + serialization) as u64
    }

    #[test]
    fn test_ring_fixture() {
        let spec = spec_from_yaml(
            r#"
topology: [ Ring ]
npus_count: [ 8 ]
bandwidth: [ 50 ]
latency: [ 500 ]
"#,
        );
        let topology = congestion_unaware::construct_topology(&spec).unwrap();

        let comm_delay = topology.send(1, 4, CHUNK_SIZE);
        assert_eq!(comm_delay, 21_031);
    }

    #[test]
    fn test_fully_connected_fixture() {
        let spec = spec_from_yaml(
            r#"
topology: [ FullyConnected ]
npus_count: [ 8 ]
bandwidth: [ 50 ]
latency: [ 500 ]
"#,
        );
        let topology = congestion_unaware::construct_topology(&spec).unwrap();

        let comm_delay = topology.send(1, 4, CHUNK_SIZE);
        assert_eq!(comm_delay, 20_031);
    }

    #[test]
    fn test_switch_fixture() {
        let spec = spec_from_yaml(
            r#"
topology: [ Switch ]
npus_count: [ 8 ]
bandwidth: [ 50 ]
latency: [ 500 ]
"#,
        );
        let topology = congestion_unaware::construct_topology(&spec).unwrap();

        let comm_delay = topology.send(1, 4, CHUNK_SIZE);
        assert_eq!(comm_delay, 20_531);
    }

    #[test]
    fn test_ring_fully_connected_switch_fixture() {
        let spec = spec_from_yaml(
            r#"
topology: [ Ring, FullyConnected, Switch ]
npus_count: [ 2, 8, 4 ]
bandwidth: [ 200, 100, 50 ]
latency: [ 50, 500, 2000 ]
"#,
        );
        let topology = congestion_unaware::construct_topology(&spec).unwrap();

        // communication within dimension 1
        let comm_delay_dim1 = topology.send(0, 1, CHUNK_SIZE);
        assert_eq!(comm_delay_dim1, 4_932);

        // communication within dimension 2
        let comm_delay_dim2 = topology.send(37, 41, CHUNK_SIZE);
        assert_eq!(comm_delay_dim2, 10_265);

        // communication within dimension 3
        let comm_delay_dim3 = topology.send(26, 42, CHUNK_SIZE);
        assert_eq!(comm_delay_dim3, 23_531);
    }

    #[test]
    fn test_mesh2d_fixture() {
        let spec = spec_from_yaml(
            r#"
topology: [ Mesh2D ]
npus_count: [ 16 ]
bandwidth: [ 60 ]
latency: [ 500 ]
"#,
        );
        let topology = congestion_unaware::construct_topology(&spec).unwrap();

        // opposite corners of the inferred 4x4 grid
        let comm_delay = topology.send(0, 15, CHUNK_SIZE);
        assert_eq!(comm_delay, expected_delay(6, 500.0, 60.0, CHUNK_SIZE));
    }

    #[test]
    fn test_torus2d_fixture() {
        let spec = spec_from_yaml(
            r#"
topology: [ Torus2D ]
npus_count: [ 16 ]
bandwidth: [ 60 ]
latency: [ 400 ]
"#,
        );
        let topology = congestion_unaware::construct_topology(&spec).unwrap();

        // ends of a row, adjacent through the wraparound
        let comm_delay = topology.send(0, 3, CHUNK_SIZE);
        assert_eq!(comm_delay, expected_delay(1, 400.0, 60.0, CHUNK_SIZE));
    }

    #[test]
    fn test_butterfly_fixture() {
        let spec = spec_from_yaml(
            r#"
topology: [ Butterfly(radix=4) ]
npus_count: [ 64 ]
bandwidth: [ 70 ]
latency: [ 350 ]
"#,
        );
        let topology = congestion_unaware::construct_topology(&spec).unwrap();

        // every distinct pair is exactly `stages` hops apart
        let comm_delay = topology.send(0, 17, CHUNK_SIZE);
        assert_eq!(comm_delay, expected_delay(3, 350.0, 70.0, CHUNK_SIZE));
    }

    /// The two families must agree on distance: an explicit route has
    /// exactly one more node than the analytic hop count.
    #[test]
    fn test_route_length_matches_hop_count_for_every_kind() {
        let yamls = [
            "topology: [ Ring ]\nnpus_count: [ 8 ]\nbandwidth: [ 50 ]\nlatency: [ 500 ]",
            "topology: [ FullyConnected ]\nnpus_count: [ 8 ]\nbandwidth: [ 50 ]\nlatency: [ 500 ]",
            "topology: [ Switch ]\nnpus_count: [ 8 ]\nbandwidth: [ 50 ]\nlatency: [ 500 ]",
            "topology: [ Mesh2D(4x4) ]\nnpus_count: [ 16 ]\nbandwidth: [ 60 ]\nlatency: [ 500 ]",
            "topology: [ Torus2D(4x4) ]\nnpus_count: [ 16 ]\nbandwidth: [ 60 ]\nlatency: [ 400 ]",
            "topology: [ Butterfly(radix=3) ]\nnpus_count: [ 27 ]\nbandwidth: [ 70 ]\nlatency: [ 350 ]",
            "topology: [ Ring, FullyConnected, Switch ]\nnpus_count: [ 2, 8, 4 ]\nbandwidth: [ 200, 100, 50 ]\nlatency: [ 50, 500, 2000 ]",
        ];

        for yaml in yamls {
            let spec = spec_from_yaml(yaml);
            let aware = congestion_aware::construct_topology(&spec).unwrap();
            let unaware = congestion_unaware::construct_topology(&spec).unwrap();

            for src in 0..spec.total_npus() {
                for dest in 0..spec.total_npus() {
                    if src == dest {
                        continue;
                    }
                    assert_eq!(
                        aware.route(src, dest).len() - 1,
                        unaware.hop_count(src, dest),
                        "route/hop mismatch for {} -> {} in {}",
                        src,
                        dest,
                        yaml
                    );
                }
            }
        }
    }

    /// Loading a network description from an actual file, end to end.
    #[test]
    fn test_load_network_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "topology: [ Ring ]").unwrap();
        writeln!(file, "npus_count: [ 8 ]").unwrap();
        writeln!(file, "bandwidth: [ 50 ]").unwrap();
        writeln!(file, "latency: [ 500 ]").unwrap();

        let spec = load_network_config(file.path()).unwrap();
        assert_eq!(spec.dims_count(), 1);
        assert_eq!(spec.total_npus(), 8);

        let topology = congestion_unaware::construct_topology(&spec).unwrap();
        assert_eq!(topology.send(1, 4, CHUNK_SIZE), 21_031);
    }

    /// A bad configuration must surface as an error, not a panic.
    #[test]
    fn test_invalid_config_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "topology: [ Mesh2D(5x5) ]").unwrap();
        writeln!(file, "npus_count: [ 16 ]").unwrap();
        writeln!(file, "bandwidth: [ 60 ]").unwrap();
        writeln!(file, "latency: [ 500 ]").unwrap();

        let spec = load_network_config(file.path()).unwrap();
        assert!(congestion_unaware::construct_topology(&spec).is_err());
        assert!(congestion_aware::construct_topology(&spec).is_err());
    }
}
