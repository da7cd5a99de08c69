// Parser module: AutoScout24-specific HTML extraction.

pub mod autoscout;

pub use autoscout::AutoscoutParser;
