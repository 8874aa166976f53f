use const_format::concatcp;

mod gpx_util;
mod state_manager;
mod store;

pub use gpx_util::*;
pub use state_manager::*;
pub use store::*;

pub const DATA_DIR: &str = "data/";
pub const STATE_FILE_DIR: &str = concatcp!(DATA_DIR, "state");

#[derive(Debug)]
pub enum StateError {
    Store(String),
    Snapshot(String),
    Gpx(String),
}
