use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use medbridge::content::AiResponse;
use medbridge::message::{encode, BridgeMessage};
use serde::Serialize;

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

/// Print one bridge message. `raw` is the text it was decoded from, if any.
pub fn print_message(msg: &BridgeMessage, raw: Option<&str>, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["event".to_string(), msg.event.to_string()])
                .add_row(vec!["requestId".to_string(), msg.request_id.to_string()])
                .add_row(vec!["timestamp".to_string(), msg.timestamp.clone()])
                .add_row(vec!["payload".to_string(), payload_preview(msg)]);
            println!("{table}");
        }
        OutputFormat::Raw => match raw {
            Some(raw) => print_raw(raw),
            None => print_messages(std::slice::from_ref(msg), OutputFormat::Json),
        },
        other => print_messages(std::slice::from_ref(msg), other),
    }
}

/// Print messages in arrival order, one per line (or one table).
pub fn print_messages(messages: &[BridgeMessage], format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            for msg in messages {
                println!("{}", encode(msg).unwrap_or_else(|_| "{}".to_string()));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["EVENT", "REQUEST ID", "PAYLOAD"]);
            for msg in messages {
                table.add_row(vec![
                    msg.event.to_string(),
                    msg.request_id.to_string(),
                    payload_preview(msg),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for msg in messages {
                println!(
                    "event={} request_id={} payload={}",
                    msg.event,
                    msg.request_id,
                    payload_preview(msg)
                );
            }
        }
    }
}

#[derive(Serialize)]
struct AiOutput<'a> {
    status: &'static str,
    #[serde(flatten)]
    response: &'a AiResponse,
}

pub fn print_ai_response(response: &AiResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            let out = AiOutput {
                status: "ready",
                response,
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
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["suggestion", response.suggestion.as_str()])
                .add_row(vec!["reasoning", response.reasoning.as_str()])
                .add_row(vec!["confidence", confidence_label(response)])
                .add_row(vec!["disclaimer", response.disclaimer.as_str()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", response.suggestion);
            println!("  why: {}", response.reasoning);
            println!("  confidence: {}", confidence_label(response));
            println!("  {}", response.disclaimer);
        }
    }
}

pub fn print_raw(text: &str) {
    let mut out = std::io::stdout();
    let _ = out.write_all(text.as_bytes());
    let _ = out.write_all(b"\n");
    let _ = out.flush();
}

fn confidence_label(response: &AiResponse) -> &'static str {
    use medbridge::content::Confidence;
    match response.confidence {
        Confidence::Low => "low",
        Confidence::Medium => "medium",
        Confidence::High => "high",
    }
}

fn payload_preview(msg: &BridgeMessage) -> String {
    serde_json::to_string(&msg.payload).unwrap_or_else(|_| "<unprintable>".to_string())
}
