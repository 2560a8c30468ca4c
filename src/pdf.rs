//! PDF size reducer
//!
//! Nothing is actually re-encoded: each job waits a fixed time and then
//! reports `floor(size * (1 - level/100 * 0.7))` as the new size. Jobs run
//! one after another, driven by frame time like everything else.

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::sim::Delay;

pub const PDF_MIME: &str = "application/pdf";
pub const MIN_LEVEL: u8 = 10;
pub const MAX_LEVEL: u8 = 90;
pub const DEFAULT_LEVEL: u8 = 50;
pub const LEVEL_STEP: u8 = 10;
/// Simulated time per file
pub const JOB_MS: f64 = 2000.0;
/// Size reduction at 100% level
const MAX_REDUCTION: f64 = 0.7;

/// A file handed over by the file picker or a drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Waiting,
    Queued,
    Compressing,
    Done { size: u64 },
}

/// User actions on the PDF screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdfIntent {
    LevelUp,
    LevelDown,
    CompressAll,
    Remove(u32),
    Reset,
    Download(u32),
    DownloadAll,
}

/// A finished file ready to be saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    pub id: u32,
    /// Suggested file name, `compressed_<original name>`
    pub file_name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfEntry {
    pub id: u32,
    pub name: String,
    pub original_size: u64,
    pub state: JobState,
}

impl PdfEntry {
    pub fn compressed_size(&self) -> Option<u64> {
        match self.state {
            JobState::Done { size } => Some(size),
            _ => None,
        }
    }

    /// Save target for a finished entry
    pub fn download(&self) -> Option<Download> {
        self.compressed_size().map(|size| Download {
            id: self.id,
            file_name: format!("compressed_{}", self.name),
            size,
        })
    }
}

/// Summary over finished files only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub count: usize,
    pub original: u64,
    pub compressed: u64,
    pub saved: u64,
    /// Rounded to the nearest whole percent
    pub percent_saved: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ActiveJob {
    id: u32,
    level: u8,
    delay: Delay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfCompressor {
    files: Vec<PdfEntry>,
    level: u8,
    next_id: u32,
    active: Option<ActiveJob>,
}

/// Simulated output size for `size` bytes at `level` percent
pub fn compressed_size(size: u64, level: u8) -> u64 {
    let factor = 1.0 - f64::from(level) / 100.0 * MAX_REDUCTION;
    (size as f64 * factor).floor() as u64
}

/// Human-readable size, e.g. `"1.5 MB"`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exp])
}

impl PdfCompressor {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            level: DEFAULT_LEVEL,
            next_id: 1,
            active: None,
        }
    }

    pub fn files(&self) -> &[PdfEntry] {
        &self.files
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn set_level(&mut self, level: u8) -> Result<(), ArcadeError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(ArcadeError::CompressionLevel(level));
        }
        self.level = level;
        Ok(())
    }

    /// Nudge the level by whole steps, clamped to the valid range
    pub fn step_level(&mut self, up: bool) {
        self.level = if up {
            self.level.saturating_add(LEVEL_STEP).min(MAX_LEVEL)
        } else {
            self.level.saturating_sub(LEVEL_STEP).max(MIN_LEVEL)
        };
    }

    /// Accept the PDFs in a batch. Other files are skipped; a batch with no
    /// PDF at all is rejected as a whole.
    ///
    /// Returns the ids given to the accepted files, in batch order.
    pub fn add_files(&mut self, batch: Vec<IncomingFile>) -> Result<Vec<u32>, ArcadeError> {
        let (valid, rejected): (Vec<_>, Vec<_>) =
            batch.into_iter().partition(|f| f.mime == PDF_MIME);

        if valid.is_empty() {
            let mime = rejected.first().map(|f| f.mime.clone()).unwrap_or_default();
            log::warn!("Rejected batch of {} non-PDF file(s)", rejected.len());
            return Err(ArcadeError::UnsupportedFileType { mime });
        }
        for skipped in &rejected {
            log::warn!("Skipping {} ({})", skipped.name, skipped.mime);
        }

        let mut ids = Vec::with_capacity(valid.len());
        for file in valid {
            ids.push(self.next_id);
            self.files.push(PdfEntry {
                id: self.next_id,
                name: file.name,
                original_size: file.size,
                state: JobState::Waiting,
            });
            self.next_id += 1;
        }
        log::info!("Added {} PDF(s)", ids.len());
        Ok(ids)
    }

    /// Queue every file that has not been compressed yet
    pub fn compress_all(&mut self) -> usize {
        let mut queued = 0;
        for entry in &mut self.files {
            if entry.state == JobState::Waiting {
                entry.state = JobState::Queued;
                queued += 1;
            }
        }
        if self.active.is_none() {
            self.start_next();
        }
        queued
    }

    fn start_next(&mut self) {
        let Some(entry) = self.files.iter_mut().find(|f| f.state == JobState::Queued) else {
            return;
        };
        entry.state = JobState::Compressing;
        self.active = Some(ActiveJob {
            id: entry.id,
            level: self.level,
            delay: Delay::new(JOB_MS),
        });
    }

    /// Advance the running job; returns the ids finished during this call
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<u32> {
        let mut finished = Vec::new();
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return finished;
        }
        let mut budget = elapsed_ms;
        while let Some(mut job) = self.active.take() {
            let remaining = job.delay_remaining();
            if !job.delay.tick(budget) {
                self.active = Some(job);
                break;
            }
            budget -= remaining;
            if let Some(entry) = self.files.iter_mut().find(|f| f.id == job.id) {
                let size = compressed_size(entry.original_size, job.level);
                entry.state = JobState::Done { size };
                log::debug!("{}: {} -> {}", entry.name, entry.original_size, size);
                finished.push(job.id);
            }
            self.start_next();
        }
        finished
    }

    /// Every finished file, in list order
    pub fn downloads(&self) -> Vec<Download> {
        self.files.iter().filter_map(PdfEntry::download).collect()
    }

    /// The finished file with `id`, if there is one
    pub fn download(&self, id: u32) -> Option<Download> {
        self.files.iter().find(|f| f.id == id)?.download()
    }

    /// Apply a screen action; returns the files to save, if any
    pub fn apply(&mut self, intent: PdfIntent) -> Vec<Download> {
        match intent {
            PdfIntent::LevelUp => self.step_level(true),
            PdfIntent::LevelDown => self.step_level(false),
            PdfIntent::CompressAll => {
                let queued = self.compress_all();
                log::info!("Queued {} PDF(s) for compression", queued);
            }
            PdfIntent::Remove(id) => {
                self.remove(id);
            }
            PdfIntent::Reset => self.reset(),
            PdfIntent::Download(id) => return self.download(id).into_iter().collect(),
            PdfIntent::DownloadAll => return self.downloads(),
        }
        Vec::new()
    }

    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        if self.active.is_some_and(|job| job.id == id) {
            self.active = None;
            self.start_next();
        }
        self.files.len() != before
    }

    pub fn reset(&mut self) {
        *self = Self {
            next_id: self.next_id,
            ..Self::new()
        };
        log::info!("PDF compressor reset");
    }

    pub fn totals(&self) -> Totals {
        let done: Vec<_> = self
            .files
            .iter()
            .filter_map(|f| f.compressed_size().map(|size| (f.original_size, size)))
            .collect();
        let original: u64 = done.iter().map(|(o, _)| o).sum();
        let compressed: u64 = done.iter().map(|(_, c)| c).sum();
        let saved = original - compressed;
        let percent_saved = if original > 0 {
            (saved as f64 / original as f64 * 100.0).round() as u32
        } else {
            0
        };
        Totals {
            count: done.len(),
            original,
            compressed,
            saved,
            percent_saved,
        }
    }
}

impl Default for PdfCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveJob {
    fn delay_remaining(&self) -> f64 {
        self.delay.remaining_ms()
    }
}
