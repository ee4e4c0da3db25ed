//! Process-wide driver sharing.
//!
//! One handle per driver type: the first caller's config creates it, later
//! callers get the same `Arc` regardless of the config they pass. Code that
//! wants isolation constructs a driver directly and hands it to
//! [`Record::new`](crate::Record::new).

use super::Driver;
use crate::config::DriverConfig;
use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// A driver that can be created from a config alone.
pub trait Connect: Driver + Sized + 'static {
    /// Build an (unconnected) handle. Connection happens lazily.
    fn from_config(config: DriverConfig) -> Self;
}

type Registry = Mutex<HashMap<TypeId, Arc<dyn Driver>>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// The shared handle for driver type `D`, created on first use.
pub fn shared<D: Connect>(config: &DriverConfig) -> Arc<dyn Driver> {
    let mut drivers = registry().lock();
    if let Some(existing) = drivers.get(&TypeId::of::<D>()) {
        if existing.config() != *config {
            tracing::debug!(
                target: "sqlrow.sql",
                driver = std::any::type_name::<D>(),
                "shared driver already exists; ignoring new config"
            );
        }
        return Arc::clone(existing);
    }

    let driver: Arc<dyn Driver> = Arc::new(D::from_config(config.clone()));
    drivers.insert(TypeId::of::<D>(), Arc::clone(&driver));
    driver
}
