// Crate root for the Lapboard analytics server modules.

pub mod app;
pub mod constants;
pub mod feed;
pub mod http;
pub mod lapfile;
pub mod scheduler;
pub mod tasks;
pub mod utils;
pub mod ws;
