pub mod anomalies;
pub mod ticks;
