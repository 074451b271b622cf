//! Process-wide "current identity service" registry
//!
//! A convenience for the application's top level only: the SDK itself takes
//! explicit service instances everywhere. Handlers install the service they
//! built so later code in the same process can reach it without threading
//! the value through every call.

use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};
use tessera_sdk::IdentityService;
use tokio::sync::Mutex;

static CURRENT: Lazy<RwLock<Option<Arc<Mutex<IdentityService>>>>> =
    Lazy::new(|| RwLock::new(None));

/// Install `service` as the current identity service and return the shared
/// handle. Replaces any previously installed instance.
pub fn install(service: IdentityService) -> Arc<Mutex<IdentityService>> {
    let handle = Arc::new(Mutex::new(service));
    if let Ok(mut current) = CURRENT.write() {
        *current = Some(handle.clone());
    }
    handle
}

/// The currently installed identity service, if any
pub fn current() -> Option<Arc<Mutex<IdentityService>>> {
    CURRENT.read().ok()?.clone()
}

/// Remove the installed service
pub fn clear() {
    if let Ok(mut current) = CURRENT.write() {
        *current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_sdk::{IdentityConfig, MemoryStore};
    use url::Url;

    async fn service() -> IdentityService {
        let config = IdentityConfig::new(
            Url::parse("https://id.example.test").unwrap(),
            Url::parse("myapp://callback").unwrap(),
        );
        IdentityService::builder(config)
            .credential_store(Arc::new(MemoryStore::new()))
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn install_then_current_then_clear() {
        clear();
        assert!(current().is_none());

        let handle = install(service().await);
        let fetched = current().expect("service should be installed");
        assert!(Arc::ptr_eq(&handle, &fetched));

        clear();
        assert!(current().is_none());
    }
}
