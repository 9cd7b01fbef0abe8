use serroute_peer::{LinkConfig, Peer};

use crate::cmd::SendArgs;
use crate::exit::{peer_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

pub fn run(args: SendArgs, _format: OutputFormat) -> CliResult<i32> {
    let line = compose_line(&args)?;

    let config = LinkConfig {
        device: args.device.clone(),
        baud_rate: args.baud,
        delimiter: args.delimiter.as_bytes().to_vec(),
        ..LinkConfig::default()
    };

    let mut peer =
        Peer::open(&config, Vec::new(), ()).map_err(|err| peer_error("open failed", err))?;
    peer.send_line(line.as_bytes())
        .map_err(|err| peer_error("send failed", err))?;

    Ok(SUCCESS)
}

/// Compose the wire line: either `--raw` verbatim, or `--path` plus
/// url-encoded `--param` pairs in the `/path?key=value` shape.
fn compose_line(args: &SendArgs) -> CliResult<String> {
    if let Some(raw) = &args.raw {
        return Ok(raw.clone());
    }

    let Some(path) = &args.path else {
        return Err(CliError::new(USAGE, "either --path or --raw is required"));
    };
    if !path.starts_with('/') {
        return Err(CliError::new(
            USAGE,
            format!("routing path must start with '/': {path}"),
        ));
    }

    if args.params.is_empty() {
        return Ok(path.clone());
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for param in &args.params {
        let (key, value) = param.split_once('=').ok_or_else(|| {
            CliError::new(USAGE, format!("--param must be KEY=VALUE, got: {param}"))
        })?;
        serializer.append_pair(key, value);
    }

    Ok(format!("{path}?{}", serializer.finish()))
}
