//! Command implementations for the Mischief CLI.

pub mod info;
pub mod json;
pub mod svg;
pub mod unpack;

pub use info::cmd_info;
pub use json::cmd_json;
pub use svg::cmd_svg;
pub use unpack::cmd_unpack;
