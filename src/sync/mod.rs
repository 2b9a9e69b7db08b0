pub mod engine;
pub mod gateway;
pub mod view;

pub use engine::{SyncEngine, SyncError};
pub use gateway::{GatewayError, HttpGateway, TaskGateway};
pub use view::CalendarView;
