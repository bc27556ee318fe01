//! Authentication: stored credentials, their renewal, and the user session
pub mod renewal;
pub mod session;
pub mod tokens;

pub use renewal::{spawn_renewal, RenewalHandle, RENEWAL_PERIOD};
pub use session::{Session, SessionState};
pub use tokens::TokenStore;
