pub mod chronos;

pub use chronos::{ChronosClient, Upstream};
