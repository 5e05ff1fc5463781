//! Month grid construction
//!
//! Turns a [`MonthView`] into fixed-width text cells. Every cell in a grid,
//! header included, is exactly `column_width` columns wide, and the position
//! of each day's numeral and label is recorded so highlights can be applied
//! by coordinate afterwards.

use crate::render::annotate::HighlightDirective;
use crate::render::palette::HighlightStatus;
use crate::render::width::{pad_right, string_width};
use crate::types::{DayCell, HolidayStatus, MonthView};

/// Blank columns on each side of a cell's content
pub const CELL_PADDING: usize = 1;

/// Narrowest content area; fits a two-glyph label
const MIN_CONTENT_WIDTH: usize = 4;

/// Column titles, Sunday first
pub const WEEKDAYS: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];

/// Placeholder keeping the label row populated when a day has no label
const BLANK_LABEL: &str = "  ";

/// Position of a piece of text inside the grid's lines, in display columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub line: usize,
    pub column: usize,
    pub width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Blank,
    Numeral,
    Label,
}

/// One rendered line of the grid, kept as separate cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub kind: RowKind,
    pub cells: Vec<String>,
}

impl GridRow {
    pub fn line(&self) -> String {
        self.cells.concat()
    }
}

/// Where an in-month day was placed, and how it should be highlighted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAnchor {
    pub day_of_month: u32,
    pub label: String,
    pub numeral: CellSpan,
    pub label_span: CellSpan,
    pub status: Option<HighlightStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub title: String,
    pub column_width: usize,
    /// Header row first, then blank / numeral / label rows
    pub rows: Vec<GridRow>,
    pub anchors: Vec<DayAnchor>,
}

impl MonthGrid {
    /// Grid as text lines; `CellSpan::line` indexes into this
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(GridRow::line).collect()
    }

    /// One directive per highlighted day, status already resolved
    pub fn highlight_directives(&self) -> Vec<HighlightDirective> {
        self.anchors
            .iter()
            .filter_map(|anchor| {
                anchor.status.map(|status| HighlightDirective {
                    day_of_month: anchor.day_of_month,
                    label: anchor.label.clone(),
                    status,
                    numeral: anchor.numeral,
                    label_span: anchor.label_span,
                })
            })
            .collect()
    }
}

fn numeral_text(day: &DayCell) -> String {
    if !day.in_current_month {
        return String::new();
    }
    format!("{:2}", day.day_of_month)
}

fn label_text(day: &DayCell) -> String {
    if !day.in_current_month {
        return String::new();
    }
    if day.secondary_label.is_empty() {
        BLANK_LABEL.to_string()
    } else {
        day.secondary_label.clone()
    }
}

/// Holiday data wins over the today marker; a day gets at most one status
pub fn resolve_status(day: &DayCell) -> Option<HighlightStatus> {
    match day.holiday_status {
        HolidayStatus::Holiday => Some(HighlightStatus::Holiday),
        HolidayStatus::Workday => Some(HighlightStatus::Workday),
        HolidayStatus::None => day.is_today.then_some(HighlightStatus::Today),
    }
}

/// Widest numeral or label in the month plus padding on both sides
pub fn column_width(view: &MonthView) -> usize {
    let content = view
        .weeks
        .iter()
        .flat_map(|week| week.cells())
        .flat_map(|day| [string_width(&numeral_text(day)), string_width(&label_text(day))])
        .fold(MIN_CONTENT_WIDTH, usize::max);
    content + CELL_PADDING * 2
}

struct CellFormatter {
    content_width: usize,
}

impl CellFormatter {
    fn cell(&self, content: &str) -> String {
        let pad = " ".repeat(CELL_PADDING);
        format!("{}{}{}", pad, pad_right(content, self.content_width), pad)
    }

    fn row(&self, kind: RowKind, contents: impl IntoIterator<Item = String>) -> GridRow {
        GridRow {
            kind,
            cells: contents.into_iter().map(|c| self.cell(&c)).collect(),
        }
    }
}

/// Lay out a month into header, blank, numeral and label rows
pub fn build_month_grid(view: &MonthView) -> MonthGrid {
    let column_width = column_width(view);
    let fmt = CellFormatter {
        content_width: column_width - CELL_PADDING * 2,
    };

    let mut rows = Vec::with_capacity(view.weeks.len() * 3 + 1);
    let mut anchors = Vec::new();

    rows.push(fmt.row(RowKind::Header, WEEKDAYS.iter().map(|d| d.to_string())));
    rows.push(fmt.row(RowKind::Blank, WEEKDAYS.iter().map(|_| String::new())));

    for (week_idx, week) in view.weeks.iter().enumerate() {
        let numeral_line = rows.len();
        let label_line = numeral_line + 1;

        for (col_idx, day) in week.cells().iter().enumerate() {
            if !day.in_current_month {
                continue;
            }
            let cell_start = col_idx * column_width + CELL_PADDING;
            let digits = day.day_of_month.to_string();
            let label = label_text(day);
            anchors.push(DayAnchor {
                day_of_month: day.day_of_month,
                numeral: CellSpan {
                    line: numeral_line,
                    // numerals are right-justified in two columns
                    column: cell_start + 2usize.saturating_sub(digits.len()),
                    width: digits.len(),
                },
                label_span: CellSpan {
                    line: label_line,
                    column: cell_start,
                    width: string_width(&label),
                },
                label,
                status: resolve_status(day),
            });
        }

        rows.push(fmt.row(RowKind::Numeral, week.cells().iter().map(numeral_text)));
        rows.push(fmt.row(RowKind::Label, week.cells().iter().map(label_text)));
        if week_idx != view.weeks.len() - 1 {
            rows.push(fmt.row(RowKind::Blank, WEEKDAYS.iter().map(|_| String::new())));
        }
    }

    MonthGrid {
        title: view.title.clone(),
        column_width,
        rows,
        anchors,
    }
}
