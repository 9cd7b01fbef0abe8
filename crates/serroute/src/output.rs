use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serroute_peer::LinePayload;
use serroute_schema::ParseOutcome;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct LineOutput<'a> {
    kind: &'a str,
    size: usize,
    payload: String,
    timestamp: String,
}

/// Print a received line that was not routed to an endpoint.
pub fn print_line(payload: &LinePayload, format: OutputFormat) {
    let kind = match payload {
        LinePayload::Text(_) => "text",
        LinePayload::Binary(_) => "binary",
    };
    match format {
        OutputFormat::Json => {
            let out = LineOutput {
                kind,
                size: payload.as_bytes().len(),
                payload: payload_preview(payload.as_bytes()),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "SIZE", "PAYLOAD"])
                .add_row(vec![
                    kind.to_string(),
                    payload.as_bytes().len().to_string(),
                    payload_preview(payload.as_bytes()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "kind={} size={} payload={}",
                kind,
                payload.as_bytes().len(),
                payload_preview(payload.as_bytes())
            );
        }
        OutputFormat::Raw => {
            print_raw(payload.as_bytes());
        }
    }
}

#[derive(Serialize)]
struct OutcomeOutput<'a> {
    path: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_fields: Option<&'a [String]>,
    timestamp: String,
}

/// Print the result of routing a command line to an endpoint.
pub fn print_outcome(path: &str, outcome: &ParseOutcome, format: OutputFormat) {
    let body_json = outcome.body().map(|body| {
        body.iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>()
    });

    match format {
        OutputFormat::Json => {
            let out = OutcomeOutput {
                path,
                valid: outcome.is_valid(),
                body: body_json,
                failed_fields: outcome.failure().map(|f| f.failed_fields.as_slice()),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PATH", "VALID", "DETAIL"])
                .add_row(vec![
                    path.to_string(),
                    outcome.is_valid().to_string(),
                    outcome_detail(outcome, body_json.as_ref()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!(
                "path={} valid={} {}",
                path,
                outcome.is_valid(),
                outcome_detail(outcome, body_json.as_ref())
            );
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn outcome_detail(
    outcome: &ParseOutcome,
    body_json: Option<&serde_json::Map<String, serde_json::Value>>,
) -> String {
    match (body_json, outcome.failure()) {
        (Some(body), _) => serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string()),
        (None, Some(failure)) => failure.to_string(),
        (None, None) => String::new(),
    }
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
