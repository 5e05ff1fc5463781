//! Month blocks and document composition

use rayon::prelude::*;

use crate::render::annotate::annotate;
use crate::render::grid::build_month_grid;
use crate::render::palette::Palette;
use crate::render::width::{pad_right, string_width};
use crate::types::MonthView;

/// Border pieces used around the grid when color is enabled. Kept to ASCII
/// so every piece is one column wide.
const BORDER_CORNER: &str = "+";
const BORDER_HORIZONTAL: &str = "-";
const BORDER_VERTICAL: &str = "|";

/// Horizontal padding between the border and the grid
const FRAME_PADDING: usize = 1;

/// Rendered lines of one month with their visual extent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub lines: Vec<String>,
    pub width: usize,
    pub height: usize,
}

impl RenderedBlock {
    pub fn new(lines: Vec<String>) -> Self {
        let width = lines.iter().map(|l| string_width(l)).max().unwrap_or(0);
        let height = lines.len();
        Self {
            lines,
            width,
            height,
        }
    }
}

/// Surround `lines` with a border. Widths are measured ignoring
/// control sequences, so already-styled lines frame correctly.
pub fn frame(lines: &[String], palette: Palette) -> Vec<String> {
    let inner = lines.iter().map(|l| string_width(l)).max().unwrap_or(0);
    let rule = BORDER_HORIZONTAL.repeat(inner + FRAME_PADDING * 2);
    let pad = " ".repeat(FRAME_PADDING);
    let side = palette.border(BORDER_VERTICAL);
    let edge = palette.border(&format!("{}{}{}", BORDER_CORNER, rule, BORDER_CORNER));

    let mut framed = Vec::with_capacity(lines.len() + 2);
    framed.push(edge.clone());
    for line in lines {
        framed.push(format!("{}{}{}{}{}", side, pad, pad_right(line, inner), pad, side));
    }
    framed.push(edge);
    framed
}

/// Render one month: title, blank line, then the (framed, highlighted) grid
pub fn render_month(view: &MonthView, palette: Palette) -> RenderedBlock {
    let grid = build_month_grid(view);
    let directives = grid.highlight_directives();
    let mut body = annotate(&grid.lines(), &directives, palette);

    if palette.is_enabled() {
        if let Some(header) = body.first_mut() {
            *header = palette.header(header);
        }
        body = frame(&body, palette);
    }

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(palette.title(&grid.title));
    lines.push(String::new());
    lines.extend(body);
    RenderedBlock::new(lines)
}

/// Render several months in parallel, keeping their order
pub fn render_months(views: &[MonthView], palette: Palette) -> Vec<RenderedBlock> {
    views
        .par_iter()
        .map(|view| render_month(view, palette))
        .collect()
}

/// Stack blocks top to bottom with one blank line between neighbours
pub fn compose(blocks: &[RenderedBlock]) -> String {
    let capacity = blocks.iter().map(|b| b.height + 1).sum();
    let mut lines: Vec<&str> = Vec::with_capacity(capacity);
    for (idx, block) in blocks.iter().enumerate() {
        if idx > 0 {
            lines.push("");
        }
        lines.extend(block.lines.iter().map(String::as_str));
    }
    lines.join("\n")
}
