pub mod implementations;

pub use implementations::{ConsoleProgressReporter, NoOpProgressReporter};
