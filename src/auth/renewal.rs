//! Background access-token renewal

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::domain::events::{DomainEvent, SessionEvent};
use crate::StorefrontError;

pub const RENEWAL_PERIOD: Duration = Duration::from_secs(5 * 60);

/// Running renewal task. Dropping the handle stops it.
#[derive(Debug)]
pub struct RenewalHandle {
    task: JoinHandle<()>,
}

impl RenewalHandle {
    pub fn stop(self) {}
    pub fn is_finished(&self) -> bool { self.task.is_finished() }
}

impl Drop for RenewalHandle {
    fn drop(&mut self) { self.task.abort(); }
}

/// Renews the access token every `period` while the logged-in cookie is present.
///
/// A failed renewal is logged and the timer keeps going; the task ends on the first
/// tick that finds the session logged out.
pub fn spawn_renewal(api: ApiClient, period: Duration) -> RenewalHandle {
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match api.tokens().is_logged_in() {
                Ok(false) => {
                    info!("session ended, stopping token renewal");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "could not read session flag");
                    continue;
                }
                Ok(true) => {}
            }
            match api.renew_token().await {
                Ok(()) => DomainEvent::Session(SessionEvent::TokenRenewed).log(),
                Err(StorefrontError::NotAuthenticated) => {
                    info!("session ended during renewal, discarding token");
                    break;
                }
                Err(e) => warn!(error = %e, "token renewal failed"),
            }
            debug!(next_in = ?period, "renewal tick done");
        }
    });
    RenewalHandle { task }
}
