pub mod dispatcher;
pub mod response;

pub use dispatcher::{RenderEffect, dispatch};
pub use response::ChatResponse;
