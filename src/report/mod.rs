pub mod json;

pub use json::{generate_json_report, load_report, write_report};
