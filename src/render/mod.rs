//! Terminal rendering of month views

pub mod annotate;
pub mod block;
pub mod grid;
pub mod palette;
pub mod width;

pub use annotate::{annotate, HighlightDirective};
pub use block::{compose, frame, render_month, render_months, RenderedBlock};
pub use grid::{build_month_grid, CellSpan, MonthGrid};
pub use palette::{HighlightStatus, Palette};
pub use width::{pad_right, string_width, strip_ansi};
