//! Newline-delimited JSON trace of published targets, one line per tick.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use sightline_core::SimTick;
use sightline_targeting::{HitResult, IconElement};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// One traced tick.
#[derive(Debug, Serialize)]
pub struct TargetRecord<'a> {
    /// Simulation tick the target was published on.
    pub tick: SimTick,
    /// Published target.
    pub target: &'a HitResult,
    /// Icon derived from the target, if any.
    pub icon: Option<&'a IconElement>,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct TraceSink {
    file: File,
}

impl TraceSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create trace directory {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create trace {}", path.display()))?;
        Ok(Self { file })
    }

    /// Append a record.
    pub fn write(&mut self, record: &TargetRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

/// Read a trace back as raw JSON values.
pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("Malformed trace line"))
        .collect()
}
