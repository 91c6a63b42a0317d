//! Command handlers for the `devkit` binary.
//!
//! Handlers write to the supplied writer rather than stdout so they can be exercised in tests.

use crate::cli::{Commands, GenerateArgs, OutputArgs, Sha1Args, V5Args};
use crate::config::AppConfig;
use anyhow::{Context, bail};
use chrono::SecondsFormat;
use devkit_uuid::{UuidFormat, UuidVersion, inspect, is_valid, resolve_namespace};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct GeneratedOutput<'a> {
    version: UuidVersion,
    format: UuidFormat,
    uuids: &'a [String],
}

#[derive(Serialize)]
struct NameBasedOutput<'a> {
    namespace: &'a str,
    name: &'a str,
    uuid: &'a str,
}

/// Runs `command` against `config`, writing results to `out`.
///
/// Returns `false` when the command ran but its answer was negative (an invalid candidate).
/// Errors are left to the caller to report.
pub fn run(
    command: Option<Commands>,
    config: &AppConfig,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    match command {
        None => {
            writeln!(out, "Use 'devkit --help' for commands")?;
            Ok(true)
        }
        Some(Commands::Generate(args)) => generate(args, config, out),
        Some(Commands::V5(args)) => name_based(args, config, out),
        Some(Commands::Validate { candidates }) => validate(&candidates, out),
        Some(Commands::Inspect { uuid, json }) => inspect_uuid(&uuid, json, out),
        Some(Commands::Sha1(args)) => sha1(args, config, out),
    }
}

fn generate(args: GenerateArgs, config: &AppConfig, out: &mut impl Write) -> anyhow::Result<bool> {
    let version = args.uuid_version.unwrap_or(config.default_version());
    if args.count == 0 || args.count > config.max_count() {
        bail!(
            "count must be between 1 and {} (got {})",
            config.max_count(),
            args.count
        );
    }

    tracing::debug!(%version, count = args.count, "generating UUIDs");
    let uuids = config
        .uuid_service()
        .generate_multiple(args.count, version)?
        .iter()
        .map(|uuid| args.output.format.render(uuid, args.output.uppercase))
        .collect::<Result<Vec<_>, _>>()?;

    if args.output.json {
        let output = GeneratedOutput {
            version,
            format: args.output.format,
            uuids: &uuids,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        for uuid in &uuids {
            writeln!(out, "{uuid}")?;
        }
    }
    Ok(true)
}

fn name_based(args: V5Args, config: &AppConfig, out: &mut impl Write) -> anyhow::Result<bool> {
    let V5Args {
        namespace,
        name,
        output: OutputArgs {
            format,
            uppercase,
            json,
        },
    } = args;

    let resolved = resolve_namespace(&namespace)?;
    let uuid = config.uuid_service().generate_v5(&resolved, &name)?;
    let rendered = format.render(&uuid, uppercase)?;

    if json {
        let output = NameBasedOutput {
            namespace: &resolved,
            name: &name,
            uuid: &rendered,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        writeln!(out, "{rendered}")?;
    }
    Ok(true)
}

/// Reports failure if any candidate is not a canonical UUID.
fn validate(candidates: &[String], out: &mut impl Write) -> anyhow::Result<bool> {
    let mut all_valid = true;
    for candidate in candidates {
        let valid = is_valid(candidate);
        all_valid &= valid;
        writeln!(
            out,
            "{candidate}\t{}",
            if valid { "valid" } else { "invalid" }
        )?;
    }

    Ok(all_valid)
}

fn inspect_uuid(uuid: &str, json: bool, out: &mut impl Write) -> anyhow::Result<bool> {
    let info = inspect(uuid)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
        return Ok(true);
    }

    let timestamp = info
        .timestamp
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| "-".to_owned());
    writeln!(out, "uuid:      {}", info.uuid)?;
    writeln!(out, "version:   {}", info.version)?;
    writeln!(out, "variant:   {}", info.variant)?;
    writeln!(out, "valid:     {}", info.valid)?;
    writeln!(out, "timestamp: {timestamp}")?;
    Ok(true)
}

fn sha1(args: Sha1Args, config: &AppConfig, out: &mut impl Write) -> anyhow::Result<bool> {
    let data = match (args.text, args.file) {
        (Some(text), None) => text.into_bytes(),
        (None, Some(path)) => std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => bail!("pass either text or --file"),
    };

    let backend = config.sha1().resolve();
    tracing::debug!(backend = backend.as_str(), bytes = data.len(), "hashing input");
    writeln!(out, "{}", hex::encode(backend.digest(&data)))?;
    Ok(true)
}
