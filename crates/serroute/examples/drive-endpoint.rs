//! Minimal routed peer — registers a /drive endpoint and prints what the
//! schema makes of each incoming command.
//!
//! Run with:
//!   cargo run --example drive-endpoint --features peer -- /dev/ttyUSB0
//!
//! From the other end of the link, send lines like:
//!   /drive?x=10&y=-5
//!   /drive?x=oops&y=2

use serroute::peer::{Endpoint, LinkConfig, Peer};
use serroute::schema::{BodySchema, FieldKind, FieldSpec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let device = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    let schema = BodySchema::new()
        .field("x", FieldSpec::new(FieldKind::Number).required())
        .field("y", FieldSpec::new(FieldKind::Number).required());

    let drive = Endpoint::new("/drive", schema, |outcome| match outcome.body() {
        Some(body) => println!("drive command: {body:?}"),
        None => eprintln!("rejected: {}", outcome.failure().expect("invalid outcome")),
    });

    let config = LinkConfig {
        device: device.into(),
        ..LinkConfig::default()
    };

    let mut peer = Peer::open(&config, vec![drive], ())?;
    eprintln!("listening on {}", config.device.display());

    peer.run()?;
    Ok(())
}
