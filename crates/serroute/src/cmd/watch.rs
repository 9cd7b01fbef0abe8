use std::collections::BTreeMap;
use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serroute_peer::{
    Endpoint, ErrorDisposition, LinePayload, LinkConfig, Peer, PeerError, PeerEvents, PollOutcome,
};
use serroute_schema::BodySchema;
use tracing::warn;

use crate::cmd::WatchArgs;
use crate::exit::{peer_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_line, print_outcome, OutputFormat};

const POLL_TIMEOUT: Duration = Duration::from_millis(200);

struct WatchEvents {
    format: OutputFormat,
    printed: Arc<AtomicUsize>,
}

impl PeerEvents for WatchEvents {
    fn on_data(&mut self, line: &LinePayload) {
        print_line(line, self.format);
        self.printed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&mut self, err: &PeerError) -> ErrorDisposition {
        warn!(%err, "link error; continuing");
        ErrorDisposition::Continue
    }
}

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let printed = Arc::new(AtomicUsize::new(0));
    let endpoints = load_endpoints(&args, format, &printed)?;

    let config = LinkConfig {
        device: args.device.clone(),
        baud_rate: args.baud,
        delimiter: args.delimiter.as_bytes().to_vec(),
        read_timeout: Some(POLL_TIMEOUT),
        ..LinkConfig::default()
    };

    let events = WatchEvents {
        format,
        printed: Arc::clone(&printed),
    };
    let mut peer =
        Peer::open(&config, endpoints, events).map_err(|err| peer_error("open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    while running.load(Ordering::SeqCst) {
        if let Some(count) = args.count {
            if printed.load(Ordering::SeqCst) >= count {
                break;
            }
        }

        match peer.poll().map_err(|err| peer_error("poll failed", err))? {
            PollOutcome::Dispatched | PollOutcome::Idle => {}
            PollOutcome::Closed => break,
        }
    }

    Ok(SUCCESS)
}

/// Build endpoints from the `--endpoints` JSON file: a map of routing path
/// to schema descriptor. Each endpoint prints what its schema parsed.
fn load_endpoints(
    args: &WatchArgs,
    format: OutputFormat,
    printed: &Arc<AtomicUsize>,
) -> CliResult<Vec<Endpoint>> {
    let Some(path) = &args.endpoints else {
        return Ok(Vec::new());
    };

    let contents = fs::read_to_string(path).map_err(|err| {
        crate::exit::io_error(&format!("failed reading {}", path.display()), err)
    })?;
    let schemas: BTreeMap<String, BodySchema> =
        serde_json::from_str(&contents).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("invalid endpoint file {}: {err}", path.display()),
            )
        })?;

    Ok(schemas
        .into_iter()
        .map(|(route, schema)| {
            let counter = Arc::clone(printed);
            let handler_route = route.clone();
            Endpoint::new(route, schema, move |outcome| {
                print_outcome(&handler_route, &outcome, format);
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect())
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
