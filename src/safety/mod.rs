//! Safety-data resolvers.
//!
//! A [`SafetySource`] answers one question per ingredient: is there
//! authoritative hazard data for this name? Every failure collapses to `None`
//! so an analysis always completes, falling back to default scores.
//!
//! - [`ewg`] — HTTP client for the hazard-score search service.
//! - [`transport`] — request sending with fixed-delay retry.

pub mod ewg;
pub mod transport;

use std::future::Future;

use crate::models::AuthoritativeData;

pub trait SafetySource: Send + Sync {
    /// Look up one ingredient. `None` means "no usable data", whatever the cause.
    fn resolve<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Future<Output = Option<AuthoritativeData>> + Send + 'a;
}

/// Source used with `--offline`: never has data.
pub struct OfflineSource;

impl SafetySource for OfflineSource {
    fn resolve<'a>(
        &'a self,
        _name: &'a str,
    ) -> impl Future<Output = Option<AuthoritativeData>> + Send + 'a {
        std::future::ready(None)
    }
}
