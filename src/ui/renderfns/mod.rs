pub mod footer;
pub mod header;
pub mod utils;

pub use footer::draw_footer;
pub use header::draw_header;
pub use utils::{rarity_color, render_section_message, section_state, truncate, Section};
