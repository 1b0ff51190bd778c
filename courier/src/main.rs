#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::process::ExitCode;

use args::Args;
use clap::Parser;
use courier_client::{Dispatcher, FileGroup, RequestDescriptor};
use courier_config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    courier_telemetry::init(&config.logging, args.log.as_deref())?;

    let dispatcher = Dispatcher::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to initialize dispatcher: {e}"))?;

    let descriptor = build_descriptor(&args, &config);

    tracing::debug!(
        method = %descriptor.method,
        url = %descriptor.url,
        "sending request"
    );

    match dispatcher.execute(&descriptor).await {
        Ok(response) => {
            for failed in response.failed_files() {
                eprintln!("skipped {} ({}): {}", failed.path, failed.field_key, failed.reason);
            }
            eprintln!("{}", response.status());
            println!("{}", response.text());

            Ok(if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(err) => {
            let alert = err.alert();
            tracing::debug!(kind = %err.kind, status = err.status_code, "request failed");
            eprintln!("{}: {}", alert.title, alert.message);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Turn command-line arguments into a descriptor over configured defaults
fn build_descriptor(args: &Args, config: &Config) -> RequestDescriptor {
    let mut descriptor = RequestDescriptor::from_defaults(args.url.clone(), &config.request)
        .with_service_name(args.service.clone());

    if let Some(method) = args.method {
        descriptor = descriptor.with_method(method);
    }

    if let Some(timeout) = args.timeout {
        descriptor = descriptor.with_timeout_seconds(timeout);
    }

    for (key, value) in &args.params {
        descriptor = descriptor.with_parameter(key.clone(), value.clone());
    }

    for (name, value) in &args.headers {
        descriptor = descriptor.with_header(name.clone(), value.clone());
    }

    // Repeated fields collapse into one group, keeping first-seen order
    for (field, path) in &args.files {
        match descriptor.files.iter_mut().find(|group| &group.field_key == field) {
            Some(group) => group.file_paths.push(path.clone()),
            None => descriptor.files.push(FileGroup::new(field.clone(), [path.clone()])),
        }
    }

    descriptor
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use courier_client::Method;

    use super::*;

    #[test]
    fn descriptor_uses_config_defaults_and_groups_files() {
        let args = Args::try_parse_from([
            "courier",
            "https://api.test/upload",
            "-f",
            "photos=a.jpg",
            "-f",
            "cover=c.jpg",
            "-f",
            "photos=b.jpg",
        ])
        .unwrap();

        let mut config = Config::default();
        config.request.timeout_seconds = 30;

        let descriptor = build_descriptor(&args, &config);

        assert_eq!(descriptor.method, Method::Post);
        assert_eq!(descriptor.timeout_seconds, 30);
        assert_eq!(
            descriptor.files,
            [
                FileGroup::new("photos", ["a.jpg", "b.jpg"]),
                FileGroup::new("cover", ["c.jpg"]),
            ]
        );
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "courier",
            "https://api.test/items/4",
            "-X",
            "delete",
            "--timeout",
            "3",
            "-H",
            "x-trace: abc",
        ])
        .unwrap();

        let descriptor = build_descriptor(&args, &Config::default());

        assert_eq!(descriptor.method, Method::Delete);
        assert_eq!(descriptor.timeout_seconds, 3);
        assert!(!descriptor.is_multipart());
        assert_eq!(descriptor.headers.as_ref().unwrap()["x-trace"], "abc");
    }
}
