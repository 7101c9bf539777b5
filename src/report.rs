//! Fingerprint Report Driver
//!
//! Walks the inventory one instance at a time: fetch console output,
//! decode, strip escapes, extract fingerprint lines, then write a block
//! for every instance that had any. The first error aborts the scan.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use clap::ValueEnum;
use std::io::Write;
use tracing::debug;

use crate::fingerprint::extract_fingerprint_lines;
use crate::inventory::ComputeInventory;
use crate::normalize::strip_escapes;
use crate::tags::format_tags;
use crate::types::{Instance, InstanceReport, ScanError};

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Address and tags, then the raw fingerprint lines, then a blank line
    #[default]
    Text,
    /// One JSON object per reported instance
    Json,
}

/// Counters for a completed scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub instances_seen: usize,
    pub instances_skipped: usize,
    pub instances_reported: usize,
    pub fingerprint_lines: usize,
}

/// Standard alphabet with padding, tolerating non-zero trailing bits
const CONSOLE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decode a base64 console output payload
///
/// Line breaks inside the payload are ignored.
pub fn decode_console_output(instance_id: &str, payload: &str) -> Result<Vec<u8>, ScanError> {
    let unwrapped: Vec<u8> = payload
        .bytes()
        .filter(|b| !matches!(b, b'\r' | b'\n'))
        .collect();

    CONSOLE_BASE64.decode(unwrapped).map_err(|source| ScanError::Decode {
        instance_id: instance_id.to_string(),
        source,
    })
}

/// Build the report for one instance from its console output
///
/// Returns `None` when the instance has no public address or its console
/// output holds no fingerprint lines.
pub fn build_report(
    instance: &Instance,
    console_output: Option<&str>,
) -> Result<Option<InstanceReport>, ScanError> {
    let Some(public_address) = instance.public_address.as_deref() else {
        return Ok(None);
    };
    let Some(payload) = console_output else {
        debug!(instance_id = %instance.id, "No console output yet");
        return Ok(None);
    };

    let raw = decode_console_output(&instance.id, payload)?;
    let fingerprints = extract_fingerprint_lines(&strip_escapes(&raw));
    if fingerprints.is_empty() {
        return Ok(None);
    }

    Ok(Some(InstanceReport {
        instance_id: instance.id.clone(),
        public_address: public_address.to_string(),
        tags: format_tags(&instance.tags),
        fingerprints,
    }))
}

/// Sequential scanner writing reports to `out`
pub struct Reporter<'a, I: ?Sized, W> {
    inventory: &'a I,
    out: W,
    format: OutputFormat,
}

impl<'a, I, W> Reporter<'a, I, W>
where
    I: ComputeInventory + ?Sized,
    W: Write,
{
    pub fn new(inventory: &'a I, out: W, format: OutputFormat) -> Self {
        Self {
            inventory,
            out,
            format,
        }
    }

    /// Scan every instance and write reports for those with fingerprints
    pub async fn run(&mut self) -> Result<ScanSummary, ScanError> {
        let instances = self.inventory.list_instances().await?;
        let mut summary = ScanSummary::default();

        for instance in &instances {
            summary.instances_seen += 1;

            if instance.public_address.is_none() {
                debug!(instance_id = %instance.id, "Skipping instance without public address");
                summary.instances_skipped += 1;
                continue;
            }

            let console = self.inventory.console_output(&instance.id).await?;
            let Some(report) = build_report(instance, console.as_deref())? else {
                debug!(instance_id = %instance.id, "No fingerprints found");
                continue;
            };

            debug!(
                instance_id = %report.instance_id,
                lines = report.fingerprints.len(),
                "Reporting fingerprints"
            );
            self.write_report(&report)?;

            summary.instances_reported += 1;
            summary.fingerprint_lines += report.fingerprints.len();
        }

        Ok(summary)
    }

    fn write_report(&mut self, report: &InstanceReport) -> Result<(), ScanError> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{}", report.header())?;
                for line in &report.fingerprints {
                    self.out.write_all(line.as_bytes())?;
                }
                writeln!(self.out)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, report).map_err(std::io::Error::from)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
