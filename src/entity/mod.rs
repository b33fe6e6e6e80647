//! SeaORM entity definitions, one module per collection.

pub mod device;
pub mod device_log;
pub mod point_log;
pub mod step_daily;
pub mod step_log;
pub mod step_periodic;
pub mod step_total;
pub mod store;
pub mod user;
