pub mod outcome;
pub mod payload;
pub mod profile;

pub use outcome::{AttemptOutcome, LoginOutcome, RunReport, SubmitOutcome};
pub use payload::{clock_in_payload, login_payload};
pub use profile::{Credentials, LocationProfile, ServiceKeys, Verification};
