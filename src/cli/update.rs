//! `lucal -u`: download the latest holiday data into the cache

use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use crossterm::cursor::MoveToColumn;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;

use crate::services::downloader::{format_bytes, progress_line, DownloadSummary, HOLIDAYS_URL};
use crate::services::{HolidayDownloader, HolidayStore};
use crate::types::Result;

/// Download holiday data to the default cache path, showing progress on stderr
pub fn run() -> Result<()> {
    let dest = HolidayStore::default_cache_path()?;
    eprintln!("正在下载节假日数据...");

    let mut stderr = io::stderr();
    let handle = HolidayDownloader::spawn(HOLIDAYS_URL, dest.clone());
    let result = handle.wait(|progress| {
        let _ = redraw_progress(&mut stderr, &progress_line(progress));
    });
    eprintln!();

    match result {
        Ok(summary) => {
            println!("{}", success_report(&summary));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", manual_instructions(&dest));
            Err(e)
        }
    }
}

/// Overwrite the current terminal line with `line`
fn redraw_progress(out: &mut impl Write, line: &str) -> io::Result<()> {
    out.queue(MoveToColumn(0))?.queue(Clear(ClearType::CurrentLine))?;
    write!(out, "{}", line)?;
    out.flush()
}

pub fn success_report(summary: &DownloadSummary) -> String {
    let modified: DateTime<Local> = summary.modified.into();
    let mut report = format!(
        "下载成功!\n\n文件大小: {}\n更新时间: {}\n保存位置: {}\n",
        format_bytes(summary.size),
        modified.format("%Y-%m-%d %H:%M:%S"),
        summary.path.display()
    );
    if let Some(info) = summary.year_info {
        report.push_str(&format!(
            "\n数据年份范围: {} 年 - {} 年\n最新数据年份: {} 年\n总共包含 {} 年的数据\n",
            info.min_year, info.max_year, info.max_year, info.count
        ));
    }
    report
}

/// How to put the file in place by hand when the download fails
pub fn manual_instructions(dest: &Path) -> String {
    format!(
        "下载失败，您可以手动下载节假日数据文件：\n1. 访问: {}\n2. 下载文件并保存到: {}\n3. 确保目录存在（如果不存在，请先创建目录）",
        HOLIDAYS_URL,
        dest.display()
    )
}
