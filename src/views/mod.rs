pub mod grid;
pub mod status_indicator;
pub mod selectors;

pub use grid::{paint_cell, paint_item, render_grid, update_counter};
pub use status_indicator::render_status;
pub use selectors::{render_selectors, SelectorElements};
