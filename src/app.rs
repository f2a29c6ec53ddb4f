use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::time::Instant;

use crate::model::config::AppConfig;
use crate::model::cpu::Cpu;
use crate::model::events::CpuEvent;
use crate::model::metrics::Metrics;
use crate::report::{self, ReportFormat};

/// Outcome of a bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub extinct: bool,
}

/// Drives a [`Cpu`] for a number of ticks and reports between them.
pub struct App {
    pub cpu: Cpu,
    pub metrics: Metrics,
    report_interval: u64,
    pub format: ReportFormat,
    /// Suppress periodic reports; the final one is always written.
    pub quiet: bool,
}

impl App {
    /// Builds the CPU and inoculates the ancestor at a random address.
    pub fn new(config: AppConfig) -> Result<Self> {
        let ancestor = config.ancestor.clone();
        let report_interval = config.report_interval;
        let mut cpu = Cpu::with_config(config).context("invalid configuration")?;

        let address = cpu
            .inoculate_random(&ancestor)?
            .ok_or_else(|| anyhow!("could not place the ancestor in the core"))?;
        tracing::info!(
            address,
            length = ancestor.len(),
            core_size = cpu.core().size(),
            "Ancestor inoculated"
        );

        Ok(Self {
            cpu,
            metrics: Metrics::new(report_interval),
            report_interval,
            format: ReportFormat::Text,
            quiet: false,
        })
    }

    /// Ticks between periodic reports, always positive.
    pub fn report_interval(&self) -> u64 {
        self.report_interval
    }

    /// Runs one tick and records it.
    pub fn step(&mut self) -> Result<Vec<CpuEvent>> {
        let start = Instant::now();
        let events = self.cpu.tick()?;
        self.metrics
            .record_tick(start.elapsed(), self.cpu.process_count(), &events);
        Ok(events)
    }

    /// Runs up to `ticks` ticks, stopping early once every process is dead.
    pub fn run<W: Write>(&mut self, ticks: u64, out: &mut W) -> Result<RunSummary> {
        let mut ran = 0;
        let mut extinct = false;

        while ran < ticks {
            self.step()?;
            ran += 1;

            if self.cpu.process_count() == 0 {
                tracing::info!(tick = self.cpu.tick_count(), "Population extinct");
                extinct = true;
                break;
            }
            if !self.quiet && ran % self.report_interval == 0 && ran < ticks {
                report::write(&self.cpu.snapshot(), self.format, out)?;
            }
        }

        report::write(&self.cpu.snapshot(), self.format, out)?;
        tracing::info!(
            ticks = ran,
            births = self.metrics.births(),
            deaths = self.metrics.deaths(),
            parasitisms = self.metrics.parasitisms(),
            elapsed_ms = self.metrics.elapsed().as_millis() as u64,
            "Run finished"
        );
        Ok(RunSummary {
            ticks: ran,
            extinct,
        })
    }
}
