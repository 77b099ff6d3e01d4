pub mod errors;
pub mod verification_code;

pub use verification_code::{ContextBlob, MAX_CODE_LEN, VerificationCode};
