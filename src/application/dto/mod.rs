pub mod authorization;

pub use authorization::{AuthorizationContext, ChallengeMethod, CodeChallenge, GrantSubject};
