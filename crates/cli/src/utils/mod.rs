pub mod parser;

pub use parser::{parse_filepath_with_lines, parse_line_range};
