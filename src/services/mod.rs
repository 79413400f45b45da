pub mod verification_resolver;

pub use verification_resolver::{is_numeric_code, VerificationResolver};
