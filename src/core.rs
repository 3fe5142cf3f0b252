pub mod anomaly;
pub mod category;
pub mod errors;
pub mod sampler;
pub mod scheduler;
