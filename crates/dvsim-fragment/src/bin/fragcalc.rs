//! IPv4 fragmentation calculator
//!
//! Usage: `fragcalc [TOTAL_LENGTH] [MTU] [IDENTIFIER]` (defaults: 4000, 1500, 12345)

use std::env;

use dvsim_fragment::{fragment_with_id, DEFAULT_IDENTIFIER, IP_HEADER_LEN};

fn arg_or<T: std::str::FromStr>(args: &[String], index: usize, name: &str, default: T) -> Result<T, String> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("{} must be an integer between 0 and 65535, got {:?}", name, raw)),
        None => Ok(default),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dvsim_fragment=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let total_length: u16 = arg_or(&args, 0, "total length", 4000)?;
    let mtu: u16 = arg_or(&args, 1, "MTU", 1500)?;
    let identifier: u16 = arg_or(&args, 2, "identifier", DEFAULT_IDENTIFIER)?;

    let fragments = fragment_with_id(total_length, mtu, identifier)?;

    println!("Original packet: {} bytes", total_length);
    println!("MTU: {} bytes", mtu);
    println!("IP header: {} bytes", IP_HEADER_LEN);
    println!("Fragments: {}", fragments.len());

    for f in &fragments {
        println!();
        println!("Fragment #{}:", f.sequence);
        println!("  Length: {} bytes", f.total_length);
        println!("  ID: {}", f.identifier);
        println!(
            "  Fragflag: {} ({})",
            f.flag_bit(),
            if f.more_fragments { "more fragments" } else { "last fragment" }
        );
        println!("  Offset: {} (8-byte units, {} bytes)", f.offset, f.byte_offset());
        println!("  Payload: {} bytes", f.payload_size);
    }

    Ok(())
}
