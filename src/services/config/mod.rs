pub mod implementations;

pub use implementations::DefaultSignerConfig;
