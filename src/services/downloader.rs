//! Holiday data downloader
//!
//! Streams the published holiday file into a temp file on a worker thread,
//! reports progress over a channel, then validates the result and moves it
//! into place.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime};

use fs2::FileExt;

use crate::services::holidays::HolidayStore;
use crate::types::{LucalError, Result, YearInfo};

/// Published holiday data
pub const HOLIDAYS_URL: &str = "https://raw.githubusercontent.com/lululau/lucal/main/holidays.json";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Minimum time between two progress events
const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

const CHUNK_SIZE: usize = 8 * 1024;

/// Width of the progress bar in columns
const BAR_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    pub downloaded: u64,
    /// `None` when the server did not send a length
    pub total: Option<u64>,
    /// Bytes per second since the transfer started
    pub speed: f64,
}

#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    pub year_info: Option<YearInfo>,
}

#[derive(Debug)]
pub enum DownloadEvent {
    Progress(DownloadProgress),
    Finished(Result<DownloadSummary>),
}

/// Running download; dropping it detaches the worker
pub struct DownloadHandle {
    events: Receiver<DownloadEvent>,
    worker: JoinHandle<()>,
}

impl DownloadHandle {
    /// Block until the download finishes, forwarding progress events
    pub fn wait(self, mut on_progress: impl FnMut(&DownloadProgress)) -> Result<DownloadSummary> {
        let mut outcome = None;
        for event in self.events.iter() {
            match event {
                DownloadEvent::Progress(progress) => on_progress(&progress),
                DownloadEvent::Finished(result) => {
                    outcome = Some(result);
                    break;
                }
            }
        }
        let _ = self.worker.join();
        outcome.unwrap_or_else(|| Err(LucalError::Download("download worker stopped".into())))
    }
}

pub struct HolidayDownloader {
    url: String,
    dest: PathBuf,
}

impl HolidayDownloader {
    pub fn new(url: impl Into<String>, dest: PathBuf) -> Self {
        Self {
            url: url.into(),
            dest,
        }
    }

    /// Start downloading `url` into `dest` on a background thread
    pub fn spawn(url: impl Into<String>, dest: PathBuf) -> DownloadHandle {
        let downloader = Self::new(url, dest);
        let (tx, events) = mpsc::channel();
        let worker = thread::spawn(move || {
            let progress_tx = tx.clone();
            let result = downloader.download(|progress| {
                let _ = progress_tx.send(DownloadEvent::Progress(progress));
            });
            if let Err(e) = &result {
                tracing::warn!(error = %e, "holiday download failed");
            }
            let _ = tx.send(DownloadEvent::Finished(result));
        });
        DownloadHandle { events, worker }
    }

    /// Download synchronously, calling `on_progress` at most every 100 ms
    pub fn download(&self, mut on_progress: impl FnMut(DownloadProgress)) -> Result<DownloadSummary> {
        if let Some(parent) = self.dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LucalError::Download(format!("HTTP client error: {}", e)))?;

        tracing::info!(url = %self.url, "downloading holiday data");
        let mut response = client
            .get(&self.url)
            .send()
            .map_err(|e| LucalError::Download(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LucalError::Download(format!("HTTP {}", status)));
        }
        let total = response.content_length();

        let temp_path = temp_path_for(&self.dest);
        let written = File::create(&temp_path).and_then(|mut file| {
            let n = copy_with_progress(&mut response, &mut file, total, &mut on_progress)?;
            file.sync_all()?;
            Ok(n)
        });
        let written = match written {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(LucalError::Download(format!("Failed to write file: {}", e)));
            }
        };
        tracing::debug!(bytes = written, "holiday data received");

        install(&temp_path, &self.dest)
    }
}

fn temp_path_for(dest: &Path) -> PathBuf {
    dest.with_extension("json.tmp")
}

/// Copy `reader` into `writer`, reporting progress at most every 100 ms and
/// once more at the end
pub fn copy_with_progress<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    total: Option<u64>,
    on_progress: &mut impl FnMut(DownloadProgress),
) -> io::Result<u64> {
    let started = Instant::now();
    let mut last_report: Option<Instant> = None;
    let mut downloaded = 0u64;
    let mut buf = vec![0u8; CHUNK_SIZE];

    let progress = |downloaded: u64| {
        let elapsed = started.elapsed().as_secs_f64();
        DownloadProgress {
            downloaded,
            total,
            speed: if elapsed > 0.0 { downloaded as f64 / elapsed } else { 0.0 },
        }
    };

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        downloaded += n as u64;

        let due = last_report.map_or(true, |at| at.elapsed() >= PROGRESS_INTERVAL);
        if due {
            on_progress(progress(downloaded));
            last_report = Some(Instant::now());
        }
    }
    writer.flush()?;
    on_progress(progress(downloaded));
    Ok(downloaded)
}

/// Validate a downloaded file and atomically move it to `dest`.
/// An invalid file is removed and `dest` is left untouched.
pub fn install(temp_path: &Path, dest: &Path) -> Result<DownloadSummary> {
    let mut bytes = fs::read(temp_path)?;
    let data = match HolidayStore::parse(&mut bytes) {
        Ok(data) => data,
        Err(e) => {
            let _ = fs::remove_file(temp_path);
            return Err(e);
        }
    };

    replace_locked(temp_path, dest, |from, to| fs::rename(from, to))?;

    let metadata = fs::metadata(dest)?;
    Ok(DownloadSummary {
        path: dest.to_path_buf(),
        size: metadata.len(),
        modified: metadata.modified()?,
        year_info: data.year_info(),
    })
}

/// Move `temp_path` over `dest` while holding an exclusive lock on `dest`.
/// A `dest` created only to be locked is removed again if the move fails,
/// so a failed update never leaves an empty cache file behind.
fn replace_locked<F>(temp_path: &Path, dest: &Path, rename: F) -> Result<()>
where
    F: FnOnce(&Path, &Path) -> io::Result<()>,
{
    let created = !dest.exists();
    let target = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(dest)?;

    let moved = target
        .lock_exclusive()
        .map_err(|e| LucalError::Download(format!("Failed to acquire write lock: {}", e)))
        .and_then(|()| {
            let renamed = rename(temp_path, dest);
            let _ = target.unlock();
            renamed.map_err(|e| LucalError::Download(format!("Failed to rename temp file: {}", e)))
        });
    drop(target);

    if moved.is_err() && created {
        let _ = fs::remove_file(dest);
    }
    moved
}

/// Human readable size: "512 B", "1.5 KB", "2.0 MB"
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

pub fn format_speed(bytes_per_sec: f64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec.max(0.0) as u64))
}

/// Progress bar plus transfer figures, e.g.
/// `[█████░░░…] 512 B / 1.0 KB  2.0 KB/s  50.0%`
pub fn progress_line(progress: &DownloadProgress) -> String {
    match progress.total.filter(|&t| t > 0) {
        Some(total) => {
            let ratio = (progress.downloaded as f64 / total as f64).min(1.0);
            let filled = (ratio * BAR_WIDTH as f64) as usize;
            format!(
                "[{}{}] {} / {}  {}  {:.1}%",
                "█".repeat(filled),
                "░".repeat(BAR_WIDTH - filled),
                format_bytes(progress.downloaded),
                format_bytes(total),
                format_speed(progress.speed),
                ratio * 100.0
            )
        }
        None => {
            let mut line = format!("[{}] {}", "░".repeat(BAR_WIDTH), format_bytes(progress.downloaded));
            if progress.speed > 0.0 {
                line.push_str("  ");
                line.push_str(&format_speed(progress.speed));
            }
            line
        }
    }
}
