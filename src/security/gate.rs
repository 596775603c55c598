//! Authorization decision for restricted resources and handlers.
//!
//! # Design Decisions
//! - Fail closed: no security, no token, no match or a store error all deny
//! - No caching; each call hits the store. A token cache would slot in here.

use std::fmt;
use std::sync::Arc;

use crate::error::RegistrationError;
use crate::observability::metrics;
use crate::security::credentials::CredentialStore;

struct Lookup {
    field: String,
    store: Arc<dyn CredentialStore>,
}

/// Decides whether a credential token identifies an authorized subject.
#[derive(Default)]
pub struct SecurityGate {
    lookup: Option<Lookup>,
}

impl SecurityGate {
    /// A gate with no security configured. It denies everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Wire a credential store, matching tokens against `field`.
    ///
    /// Leaves the gate unchanged if the store does not expose `field`.
    pub fn secure(
        &mut self,
        store: Arc<dyn CredentialStore>,
        field: impl Into<String>,
    ) -> Result<(), RegistrationError> {
        let field = field.into();
        if !store.has_field(&field) {
            tracing::warn!(field = %field, "Credential store has no such field, security not enabled");
            return Err(RegistrationError::UnknownSecurityField(field));
        }

        tracing::info!(field = %field, "Security enabled");
        self.lookup = Some(Lookup { field, store });
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.lookup.is_some()
    }

    /// Check a token against the store.
    pub async fn authorize(&self, token: Option<&str>) -> bool {
        let Some(lookup) = &self.lookup else {
            metrics::record_auth_check("disabled");
            return false;
        };
        let Some(token) = token else {
            metrics::record_auth_check("no_token");
            return false;
        };

        match lookup.store.find_by_field(&lookup.field, token).await {
            Ok(Some(_)) => {
                metrics::record_auth_check("authorized");
                true
            }
            Ok(None) => {
                tracing::debug!(field = %lookup.field, "No credential matched token");
                metrics::record_auth_check("no_match");
                false
            }
            Err(e) => {
                tracing::warn!(field = %lookup.field, error = %e, "Credential lookup failed");
                metrics::record_auth_check("error");
                false
            }
        }
    }
}

impl fmt::Debug for SecurityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityGate")
            .field("field", &self.lookup.as_ref().map(|l| l.field.as_str()))
            .finish()
    }
}
