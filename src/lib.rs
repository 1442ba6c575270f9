pub mod background;
pub mod cli;
pub mod client;
pub mod config;
pub mod daily;
pub mod descriptor;
pub mod location;
pub mod logging;
pub mod monitor;
pub mod ranker;
pub mod retry;
pub mod search;
pub mod util;
pub mod weather;
