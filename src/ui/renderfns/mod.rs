pub mod header;
pub mod utils;

pub use header::draw_header;
pub use utils::{cell_text, truncate, value_color};
