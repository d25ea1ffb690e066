pub mod completions;
pub mod events;
pub mod exec;
pub mod fund;
pub mod init;
pub mod plan;
pub mod status;
