use std::path::PathBuf;

use clap::Parser;
use courier_config::Method;

/// Courier HTTP dispatcher
#[derive(Debug, Parser)]
#[command(name = "courier", about = "Send one connectivity-checked HTTP request")]
pub struct Args {
    /// Path to configuration file; built-in defaults apply when absent
    #[arg(short, long, env = "COURIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Target URL
    pub url: String,

    /// HTTP method (GET, POST, PUT, DELETE); defaults to the configured method
    #[arg(short = 'X', long, value_parser = parse_method)]
    pub method: Option<Method>,

    /// Parameter as `key=value`; the value is parsed as JSON when possible
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<(String, serde_json::Value)>,

    /// Header as `name:value`
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Attachment as `field=path`; repeat a field to attach several files
    #[arg(short = 'f', long = "file", value_parser = parse_file)]
    pub files: Vec<(String, String)>,

    /// Label used in log output
    #[arg(long, default_value = "")]
    pub service: String,

    /// Override the per-call deadline in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Override the log filter directive
    #[arg(long, env = "COURIER_LOG")]
    pub log: Option<String>,
}

fn parse_method(s: &str) -> Result<Method, String> {
    s.parse()
}

fn parse_param(s: &str) -> Result<(String, serde_json::Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;

    let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_owned()));

    Ok((key.to_owned(), value))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected name:value, got `{s}`"))?;

    Ok((name.trim().to_owned(), value.trim().to_owned()))
}

fn parse_file(s: &str) -> Result<(String, String), String> {
    let (field, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=path, got `{s}`"))?;

    Ok((field.to_owned(), path.to_owned()))
}
