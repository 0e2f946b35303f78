pub mod accent;
pub mod processor;
pub mod stress;

pub use accent::strip_stress;
pub use processor::RussianNormalizer;
pub use stress::StressClient;
