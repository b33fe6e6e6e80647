pub mod device;
pub mod pedometer;
pub mod point;
pub mod store;
pub mod user;

pub use device::{Device, DeviceLogSort, DeviceSort, DeviceView};
pub use pedometer::{Pedometer, PeriodicReport};
pub use point::{Point, PointLogSort};
pub use store::{Store, StoreSort};
pub use user::{User, UserSort, UserView};
