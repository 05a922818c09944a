pub mod runner;
pub mod shutdown;

pub use runner::{run, RunOptions, ShutdownOptions};
pub use shutdown::{cancel_on_shutdown, wait_for_shutdown};
