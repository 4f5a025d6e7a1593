use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use objwire_codec::{Format, Value};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
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
struct MessageOutput<'a> {
    format: &'static str,
    format_tag: u8,
    peer: &'a str,
    value: &'a Value,
    timestamp: String,
}

pub fn print_message(format: Format, value: &Value, peer: &str, output: OutputFormat) {
    println!("{}", render_message(format, value, peer, output));
}

fn render_message(format: Format, value: &Value, peer: &str, output: OutputFormat) -> String {
    match output {
        OutputFormat::Json => {
            let out = MessageOutput {
                format: format.name(),
                format_tag: format.tag(),
                peer,
                value,
                timestamp: now_unix_seconds(),
            };
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FORMAT", "PEER", "VALUE"])
                .add_row(vec![format.name().to_string(), peer.to_string(), value.to_string()]);
            table.to_string()
        }
        OutputFormat::Pretty => format!("received format={format} from {peer}: {value}"),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
