//! CLI command implementations.

mod agent;
mod call;
mod config;
mod doctor;
mod serve;
mod tool;

pub use agent::run_agent;
pub use call::run_call;
pub use config::run_config;
pub use doctor::run_doctor;
pub use serve::{router, run_serve};
pub use tool::run_tool;
