//! CLI command handlers.

pub mod check;
pub mod config;
pub mod eval;
pub mod hexdump;
pub mod info;

pub use check::run_check;
pub use config::{run_config_show, run_config_validate};
pub use eval::{EvalInput, run_eval};
pub use hexdump::run_hexdump;
pub use info::run_info;
