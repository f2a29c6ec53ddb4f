//! Text and JSON rendering of the metrics surface.

use crate::model::snapshot::CpuSnapshot;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    /// One JSON document per line.
    Json,
}

pub fn write<W: Write>(snapshot: &CpuSnapshot, format: ReportFormat, out: &mut W) -> io::Result<()> {
    match format {
        ReportFormat::Text => write_text(snapshot, out),
        ReportFormat::Json => write_json(snapshot, out),
    }
}

/// Process count, then `hash: population, [I;I;...]` per known genome.
pub fn write_text<W: Write>(snapshot: &CpuSnapshot, out: &mut W) -> io::Result<()> {
    writeln!(out, "Number of processes: {}", snapshot.processes)?;
    writeln!(out)?;
    for genome in &snapshot.genomes {
        let instructions: Vec<String> = genome
            .instructions
            .iter()
            .map(ToString::to_string)
            .collect();
        writeln!(
            out,
            "{}: {}, [{}]",
            genome.hash.short(),
            genome.population,
            instructions.join(";")
        )?;
    }
    writeln!(out)
}

pub fn write_json<W: Write>(snapshot: &CpuSnapshot, out: &mut W) -> io::Result<()> {
    serde_json::to_writer(&mut *out, snapshot)?;
    writeln!(out)
}
