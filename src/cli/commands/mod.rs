//! CLI command implementations

pub mod completions;
pub mod form;
pub mod init;
pub mod options;
pub mod replay;
