//! Snapshot writers behind `calor run --format`.
//!
//! Each writer implements [`SnapshotSink`] over any [`Write`]. Per-step
//! snapshots are decimated by [`Every`]; the final snapshot is always
//! written.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use calor_engine::{SinkError, Snapshot, SnapshotSink, StopReason};
use serde::Serialize;

// ── OutputFormat ───────────────────────────────────────────────────

/// Output format selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable statistics and the final field.
    #[default]
    Summary,
    /// One CSV row per snapshot: iteration, time, then every cell.
    Csv,
    /// One JSON object per line.
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Self::Summary),
            "csv" => Ok(Self::Csv),
            "jsonl" | "json-lines" => Ok(Self::JsonLines),
            other => Err(format!("unknown format '{other}' (expected summary, csv, jsonl)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Summary => "summary",
            Self::Csv => "csv",
            Self::JsonLines => "jsonl",
        })
    }
}

// ── Every ──────────────────────────────────────────────────────────

/// Which per-step snapshots to write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Every {
    /// Only the final snapshot.
    Never,
    /// Steps whose iteration is a multiple of `n` (`n >= 1`).
    Nth(u64),
}

impl Every {
    /// Whether the snapshot should be written.
    pub fn selects(&self, snapshot: &Snapshot) -> bool {
        match *self {
            Self::Never => false,
            Self::Nth(n) => n > 0 && snapshot.iteration.0 % n == 0,
        }
    }
}

/// Build the writer for `format`.
///
/// `every` defaults per format: every step for CSV and JSON lines, only
/// the final field for the summary.
pub fn make_sink<'w>(
    format: OutputFormat,
    every: Option<u64>,
    out: Box<dyn Write + 'w>,
) -> Box<dyn SnapshotSink + 'w> {
    match format {
        OutputFormat::Summary => Box::new(SummarySink::new(
            out,
            every.map_or(Every::Never, Every::Nth),
        )),
        OutputFormat::Csv => Box::new(CsvSink::new(out, Every::Nth(every.unwrap_or(1)))),
        OutputFormat::JsonLines => {
            Box::new(JsonLinesSink::new(out, Every::Nth(every.unwrap_or(1))))
        }
    }
}

// ── CsvSink ────────────────────────────────────────────────────────

/// Writes `iteration,elapsed_time,c0,c1,...` rows after a header.
///
/// 2D cells are named `r{row}c{col}`.
pub struct CsvSink<W: Write> {
    out: W,
    every: Every,
    header_written: bool,
    last_written: Option<u64>,
}

impl<W: Write> CsvSink<W> {
    /// A writer over `out`.
    pub fn new(out: W, every: Every) -> Self {
        Self {
            out,
            every,
            header_written: false,
            last_written: None,
        }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_row(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        if !self.header_written {
            write!(self.out, "iteration,elapsed_time")?;
            let nx = snapshot.dims.nx();
            for i in 0..snapshot.field.len() {
                match snapshot.dims.ny() {
                    Some(_) => write!(self.out, ",r{}c{}", i / nx, i % nx)?,
                    None => write!(self.out, ",c{i}")?,
                }
            }
            writeln!(self.out)?;
            self.header_written = true;
        }
        write!(self.out, "{},{}", snapshot.iteration, snapshot.elapsed_time)?;
        for v in &snapshot.field {
            write!(self.out, ",{v}")?;
        }
        writeln!(self.out)?;
        self.last_written = Some(snapshot.iteration.0);
        Ok(())
    }
}

impl<W: Write> SnapshotSink for CsvSink<W> {
    fn on_step(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        if self.every.selects(snapshot) {
            self.write_row(snapshot)?;
        }
        Ok(())
    }

    fn on_complete(&mut self, snapshot: &Snapshot, _reason: StopReason) -> Result<(), SinkError> {
        if self.last_written != Some(snapshot.iteration.0) {
            self.write_row(snapshot)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

// ── JsonLinesSink ──────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum RecordKind {
    Step,
    Complete,
}

#[derive(Serialize)]
struct SnapshotRecord<'a> {
    event: RecordKind,
    iteration: u64,
    elapsed_time: f64,
    nx: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    ny: Option<usize>,
    field: &'a [f64],
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Writes one JSON object per snapshot.
///
/// ```text
/// {"event":"step","iteration":1,"elapsed_time":0.5,"nx":5,"field":[...]}
/// {"event":"complete","iteration":4,...,"reason":"max-iterations"}
/// ```
pub struct JsonLinesSink<W: Write> {
    out: W,
    every: Every,
}

impl<W: Write> JsonLinesSink<W> {
    /// A writer over `out`.
    pub fn new(out: W, every: Every) -> Self {
        Self { out, every }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_record(
        &mut self,
        snapshot: &Snapshot,
        event: RecordKind,
        reason: Option<StopReason>,
    ) -> Result<(), SinkError> {
        let record = SnapshotRecord {
            event,
            iteration: snapshot.iteration.0,
            elapsed_time: snapshot.elapsed_time,
            nx: snapshot.dims.nx(),
            ny: snapshot.dims.ny(),
            field: &snapshot.field,
            reason: reason.map(|r| r.to_string()),
        };
        serde_json::to_writer(&mut self.out, &record).map_err(|e| SinkError::Other {
            reason: format!("cannot encode snapshot: {e}"),
        })?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> SnapshotSink for JsonLinesSink<W> {
    fn on_step(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        if self.every.selects(snapshot) {
            self.write_record(snapshot, RecordKind::Step, None)?;
        }
        Ok(())
    }

    fn on_complete(&mut self, snapshot: &Snapshot, reason: StopReason) -> Result<(), SinkError> {
        self.write_record(snapshot, RecordKind::Complete, Some(reason))?;
        self.out.flush()?;
        Ok(())
    }
}

// ── SummarySink ────────────────────────────────────────────────────

/// Fields with more cells than this are summarized without the grid dump.
const MAX_PRINTED_CELLS: usize = 400;

/// Progress lines for selected steps, then statistics and (for small
/// grids) the final field.
pub struct SummarySink<W: Write> {
    out: W,
    every: Every,
}

impl<W: Write> SummarySink<W> {
    /// A writer over `out`.
    pub fn new(out: W, every: Every) -> Self {
        Self { out, every }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_stats(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        writeln!(
            self.out,
            "iteration {:>8}  t = {:<12.6}  min {:>12.4}  max {:>12.4}  mean {:>12.4}",
            snapshot.iteration,
            snapshot.elapsed_time,
            snapshot.min(),
            snapshot.max(),
            snapshot.mean(),
        )?;
        Ok(())
    }
}

impl<W: Write> SnapshotSink for SummarySink<W> {
    fn on_step(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        if self.every.selects(snapshot) {
            self.write_stats(snapshot)?;
        }
        Ok(())
    }

    fn on_complete(&mut self, snapshot: &Snapshot, reason: StopReason) -> Result<(), SinkError> {
        writeln!(self.out, "completed: {reason}  grid {}", snapshot.dims)?;
        self.write_stats(snapshot)?;
        if snapshot.field.len() <= MAX_PRINTED_CELLS {
            for row in snapshot.rows() {
                for v in row {
                    write!(self.out, "{v:>10.4}")?;
                }
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
