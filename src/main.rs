use clap::Parser;
use color_eyre::eyre::bail;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use serde_json::json;
use std::path::PathBuf;

use netanalytic::config::load_network_config;
use netanalytic::{congestion_aware, congestion_unaware};

/// Analytical topology and routing queries for compute-cluster networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network configuration YAML file
    #[arg(short, long)]
    network: PathBuf,

    /// Source device id
    #[arg(long)]
    src: usize,

    /// Destination device id
    #[arg(long)]
    dest: usize,

    /// Chunk size in bytes for the delay estimate
    #[arg(long, default_value_t = 1_048_576)]
    chunk_size: u64,

    /// Build the congestion-aware graph and print the explicit route
    #[arg(long)]
    route: bool,

    /// Emit the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Load and validate the network description
    let spec = load_network_config(&args.network)?;

    // Device ids are validated here, once; the query layer treats bad ids
    // as caller bugs
    let npus_count = spec.total_npus();
    if args.src >= npus_count {
        bail!("src device {} out of range (0..{})", args.src, npus_count);
    }
    if args.dest >= npus_count {
        bail!("dest device {} out of range (0..{})", args.dest, npus_count);
    }

    if args.route {
        let topology = congestion_aware::construct_topology(&spec)?;
        let route = topology.route(args.src, args.dest);
        info!(
            "Route from {} to {} has {} hops",
            args.src,
            args.dest,
            route.len() - 1
        );

        if args.json {
            let result = json!({
                "src": args.src,
                "dest": args.dest,
                "hops": route.len() - 1,
                "route": route,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            let path: Vec<String> = route.iter().map(|id| id.to_string()).collect();
            println!("{}", path.join(" -> "));
        }
        return Ok(());
    }

    let topology = congestion_unaware::construct_topology(&spec)?;
    let delay = topology.send(args.src, args.dest, args.chunk_size);
    let hops = if args.src == args.dest {
        0
    } else {
        topology.hop_count(args.src, args.dest)
    };
    info!(
        "Sending {} bytes from {} to {}: {} hops, {} time units",
        args.chunk_size, args.src, args.dest, hops, delay
    );

    if args.json {
        let result = json!({
            "src": args.src,
            "dest": args.dest,
            "chunk_size": args.chunk_size,
            "hops": hops,
            "delay": delay,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("hops: {}", hops);
        println!("delay: {}", delay);
    }

    Ok(())
}
