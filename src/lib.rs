#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod client;
pub mod debounce;
pub mod formats;
pub mod logging;
pub mod search;
pub mod session;
