pub mod request;
pub mod update;

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::{ArgAction, Parser};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::{compose, render_months, Palette};
use crate::services::{CalendarService, HolidayStore};
use crate::types::{HolidayData, Request, Result, ViewMode};

pub use request::parse_request;

const LEGEND: &str = "蓝色=节假日  橙色=调休日";

const STALE_HINT: &str =
    "尚未下载节假日数据或节假日数据超过 6 个月未更新，运行  lucal -u 获取最新数据";

const USAGE_EXAMPLES: &str = "\
示例:
  lucal            展示当前月份
  lucal -y         展示当前年份
  lucal 9          展示当年9月份
  lucal 1983       展示1983年
  lucal 2012 12    展示2012年12月";

/// Chinese lunar calendar for the terminal
#[derive(Parser, Debug)]
#[command(name = "lucal")]
#[command(version, about, long_about = None, after_help = USAGE_EXAMPLES)]
pub struct Cli {
    /// Month (1-12) or year, optionally followed by a month
    #[arg(value_name = "YEAR_OR_MONTH", allow_negative_numbers = true)]
    args: Vec<String>,

    /// Show the whole year
    #[arg(short = 'y', long = "year")]
    year: bool,

    /// Download the latest holiday data
    #[arg(short = 'u', long = "update-holidays")]
    update_holidays: bool,

    /// Read holiday data from this file instead of the cache
    #[arg(short = 'H', long = "holidays-file", value_name = "PATH")]
    holidays_file: Option<PathBuf>,

    /// Disable all color output
    #[arg(short = 'N', long = "no-color")]
    no_color: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        init_tracing(self.verbose);

        if self.update_holidays {
            update::run()?;
            return Ok(());
        }

        let today = Local::now().date_naive();
        let request = parse_request(self.year, &self.args, today)?;
        let (holidays, cache_valid) = self.load_holidays();
        let service = CalendarService::new()
            .with_today(today)
            .with_holidays(holidays);
        let palette = Palette::new(color_enabled(self.no_color, std::env::var_os("NO_COLOR")));

        let stdout = io::stdout();
        let mut out = stdout.lock();
        render_request(&mut out, &service, request, palette, cache_valid)?;
        Ok(())
    }

    /// Holiday data plus whether it is trustworthy. Problems with the file
    /// are reported and the calendar renders without highlights.
    fn load_holidays(&self) -> (HolidayData, bool) {
        if let Some(path) = &self.holidays_file {
            return match HolidayStore::load_from_file(path) {
                Ok(data) => (data, true),
                Err(e) => {
                    eprintln!("[lucal] Warning: 无法加载节假日文件 {}: {}", path.display(), e);
                    (HolidayData::default(), false)
                }
            };
        }

        let store = match HolidayStore::new() {
            Ok(store) => store,
            Err(e) => {
                tracing::debug!(error = %e, "no cache location");
                return (HolidayData::default(), false);
            }
        };
        if !store.is_cache_valid() {
            tracing::info!(path = %store.path().display(), "holiday cache missing or stale");
            return (HolidayData::default(), false);
        }
        match store.load() {
            Ok(data) => (data, true),
            Err(e) => {
                eprintln!("[lucal] Warning: {}", e);
                (HolidayData::default(), false)
            }
        }
    }
}

/// Color is on unless `--no-color` is given or `NO_COLOR` is set non-empty
pub fn color_enabled(no_color_flag: bool, no_color_env: Option<OsString>) -> bool {
    !no_color_flag && no_color_env.map_or(true, |v| v.is_empty())
}

/// Render the requested month or year, then the legend and stale-data hint
pub fn render_request<W: Write>(
    out: &mut W,
    service: &CalendarService,
    request: Request,
    palette: Palette,
    holiday_cache_valid: bool,
) -> Result<()> {
    let request = request.normalize();
    let views = match request.mode {
        ViewMode::Year => service.year(request.year)?,
        ViewMode::Month => {
            let month = u32::try_from(request.month).unwrap_or_default();
            vec![service.month(request.year, month)?]
        }
    };

    let blocks = render_months(&views, palette);
    writeln!(out, "{}", compose(&blocks))?;

    if service.has_holiday_data() {
        writeln!(out, "\n{}", palette.muted(LEGEND))?;
    }
    if !holiday_cache_valid {
        writeln!(out, "\n{}", STALE_HINT)?;
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise each `-v` raises the level from warn
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string(),
    };
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_writer(io::stderr)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HolidayYear;
    use chrono::NaiveDate;

    fn service() -> CalendarService {
        CalendarService::new().with_today(NaiveDate::from_ymd_opt(2025, 11, 18).unwrap())
    }

    fn render(service: &CalendarService, request: Request, cache_valid: bool) -> String {
        let mut out = Vec::new();
        render_request(&mut out, service, request, Palette::plain(), cache_valid).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ========== argument parsing ==========

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["lucal"]).unwrap();
        assert!(cli.args.is_empty());
        assert!(!cli.year && !cli.update_holidays && !cli.no_color);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_positional() {
        let cli = Cli::try_parse_from(["lucal", "2012", "12"]).unwrap();
        assert_eq!(cli.args, vec!["2012", "12"]);
    }

    #[test]
    fn test_cli_parse_flags() {
        let cli = Cli::try_parse_from(["lucal", "-y", "-N", "-H", "/tmp/h.json", "-vv", "2024"]).unwrap();
        assert!(cli.year);
        assert!(cli.no_color);
        assert_eq!(cli.holidays_file, Some(PathBuf::from("/tmp/h.json")));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.args, vec!["2024"]);
    }

    #[test]
    fn test_cli_parse_long_flags() {
        let cli = Cli::try_parse_from(["lucal", "--update-holidays", "--no-color"]).unwrap();
        assert!(cli.update_holidays);
        assert!(cli.no_color);
    }

    #[test]
    fn test_cli_parse_negative_month_reaches_validation() {
        let cli = Cli::try_parse_from(["lucal", "2012", "-1"]).unwrap();
        assert_eq!(cli.args, vec!["2012", "-1"]);
    }

    // ========== color ==========

    #[test]
    fn test_color_enabled() {
        assert!(color_enabled(false, None));
        assert!(!color_enabled(true, None));
        assert!(!color_enabled(false, Some(OsString::from("1"))));
        assert!(color_enabled(false, Some(OsString::new())));
    }

    // ========== output ==========

    #[test]
    fn test_render_month_with_stale_hint() {
        let request = Request {
            year: 2025,
            month: 11,
            mode: ViewMode::Month,
        };
        let text = render(&service(), request, false);
        assert!(text.starts_with("2025 年 11 月\n\n"));
        assert!(text.contains("立冬"));
        assert!(text.trim_end().ends_with(STALE_HINT));
        assert!(!text.contains(LEGEND));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_render_year_has_twelve_titles() {
        let request = Request {
            year: 2025,
            month: 1,
            mode: ViewMode::Year,
        };
        let text = render(&service(), request, true);
        for month in 1..=12 {
            assert!(text.contains(&format!("2025 年 {} 月\n", month)));
        }
        assert!(!text.contains(STALE_HINT));
    }

    #[test]
    fn test_render_legend_with_holiday_data() {
        let json = r#"[{"year": "2025", "holiday": {
            "10-01": {"holiday": true, "name": "国庆节", "wage": 3, "date": "2025-10-01"}
        }}]"#;
        let years: Vec<HolidayYear> = serde_json::from_str(json).unwrap();
        let svc = service().with_holidays(HolidayData::from_years(years));
        let request = Request {
            year: 2025,
            month: 10,
            mode: ViewMode::Month,
        };
        let text = render(&svc, request, true);
        assert!(text.trim_end().ends_with(LEGEND));
    }

    #[test]
    fn test_render_out_of_range_year() {
        let request = Request {
            year: 1800,
            month: 1,
            mode: ViewMode::Month,
        };
        let mut out = Vec::new();
        let result = render_request(&mut out, &service(), request, Palette::plain(), true);
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
