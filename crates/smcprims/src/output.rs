use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use smcprims::client::{FanInfo, FanMode};
use smcprims::{Value, ValueRecord};

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

/// A record paired with its decoded value.
pub struct KeyValue {
    pub record: ValueRecord,
    pub value: Value,
}

#[derive(Serialize)]
struct KeyValueOutput {
    key: String,
    data_type: String,
    kind: String,
    size: usize,
    value: serde_json::Value,
    bytes: String,
}

impl From<&KeyValue> for KeyValueOutput {
    fn from(kv: &KeyValue) -> Self {
        Self {
            key: kv.record.key.to_string(),
            data_type: kv.record.data_type.to_string(),
            kind: kv.record.kind().to_string(),
            size: kv.record.len(),
            value: value_json(&kv.value),
            bytes: kv.record.buffer.to_hex(),
        }
    }
}

#[derive(Serialize)]
struct FanOutput {
    index: u32,
    actual: f64,
    minimum: f64,
    maximum: f64,
    safe: f64,
    target: f64,
    mode: Option<String>,
}

impl From<&FanInfo> for FanOutput {
    fn from(fan: &FanInfo) -> Self {
        Self {
            index: fan.index,
            actual: fan.actual,
            minimum: fan.minimum,
            maximum: fan.maximum,
            safe: fan.safe,
            target: fan.target,
            mode: fan.mode.map(|m| m.to_string()),
        }
    }
}

pub fn print_values(values: &[KeyValue], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for kv in values {
                println!("{}", to_json(&KeyValueOutput::from(kv)));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KEY", "TYPE", "SIZE", "VALUE", "BYTES"]);
            for kv in values {
                table.add_row(vec![
                    kv.record.key.to_string(),
                    kv.record.data_type.to_string(),
                    kv.record.len().to_string(),
                    decoded_text(&kv.value),
                    kv.record.buffer.to_hex(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for kv in values {
                println!("{}", value_line(kv));
            }
        }
        OutputFormat::Raw => {
            for kv in values {
                match kv.value {
                    Value::Bytes(buf) => println!("{}", buf.to_hex()),
                    other => println!("{other}"),
                }
            }
        }
    }
}

pub fn print_fans(fans: &[FanInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<FanOutput> = fans.iter().map(FanOutput::from).collect();
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FAN", "ACTUAL", "MIN", "MAX", "SAFE", "TARGET", "MODE"]);
            for fan in fans {
                table.add_row(vec![
                    fan.index.to_string(),
                    fan.actual.to_string(),
                    fan.minimum.to_string(),
                    fan.maximum.to_string(),
                    fan.safe.to_string(),
                    fan.target.to_string(),
                    mode_text(fan.mode).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("Total fans in system: {}", fans.len());
            for fan in fans {
                println!();
                println!("Fan #{}:", fan.index);
                println!("    Actual speed : {}", fan.actual);
                println!("    Minimum speed: {}", fan.minimum);
                println!("    Maximum speed: {}", fan.maximum);
                println!("    Safe speed   : {}", fan.safe);
                println!("    Target speed : {}", fan.target);
                println!("    Mode         : {}", mode_text(fan.mode));
            }
        }
        OutputFormat::Raw => {
            for fan in fans {
                println!(
                    "{} {} {} {} {} {} {}",
                    fan.index,
                    fan.actual,
                    fan.minimum,
                    fan.maximum,
                    fan.safe,
                    fan.target,
                    mode_text(fan.mode)
                );
            }
        }
    }
}

/// `KEY  TYPE  <decoded> (bytes xx xx)`
fn value_line(kv: &KeyValue) -> String {
    let hex = kv.record.buffer.to_hex();
    match kv.value {
        Value::Bytes(_) => format!(
            "{}  {}  (bytes {hex})",
            kv.record.key, kv.record.data_type
        ),
        other => format!(
            "{}  {}  {other} (bytes {hex})",
            kv.record.key, kv.record.data_type
        ),
    }
}

fn decoded_text(value: &Value) -> String {
    match value {
        Value::Bytes(_) => "-".to_string(),
        other => other.to_string(),
    }
}

fn value_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Unsigned(v) => serde_json::Value::from(*v),
        Value::Bytes(_) => serde_json::Value::Null,
        other => other
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
    }
}

fn mode_text(mode: Option<FanMode>) -> &'static str {
    match mode {
        Some(FanMode::Auto) => "auto",
        Some(FanMode::Forced) => "forced",
        None => "unknown",
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}
