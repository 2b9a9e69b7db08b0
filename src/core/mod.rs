pub mod event;
pub mod task;
