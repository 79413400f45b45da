pub mod session_client;

pub use session_client::{interpret_submission, SessionClient};
