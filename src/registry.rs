// src/registry.rs

//! Kind-keyed registration of defaulting functions.
//!
//! The object pipeline that loads configuration documents does not know the
//! concrete defaulting rules for each kind; it looks the function up here by
//! kind string and applies it through `&mut dyn Any`. Registration happens
//! once, at process startup.

use crate::config::{NODELET_CONFIGURATION_KIND, NodeletConfiguration};
use crate::defaults::apply_defaults;
use crate::errors::ConfigError;
use lazy_static::lazy_static;
use std::any::Any;
use std::collections::HashMap;
use tracing::debug;

type DefaultingFn = Box<dyn Fn(&mut dyn Any) -> Result<(), ConfigError> + Send + Sync>;

/// Maps configuration kinds to their type-erased defaulting functions.
pub struct DefaulterRegistry {
    funcs: HashMap<&'static str, DefaultingFn>,
}

impl DefaulterRegistry {
    pub fn new() -> Self {
        Self {
            funcs: HashMap::new(),
        }
    }

    /// Registers `func` as the defaulting function for `kind`, replacing any
    /// previous registration for the same kind.
    pub fn register<T: Any>(&mut self, kind: &'static str, func: fn(&mut T)) {
        debug!("registering defaulting function for kind '{kind}'");
        self.funcs.insert(
            kind,
            Box::new(move |obj: &mut dyn Any| {
                let cfg = obj
                    .downcast_mut::<T>()
                    .ok_or_else(|| ConfigError::KindMismatch(kind.to_string()))?;
                func(cfg);
                Ok(())
            }),
        );
    }

    /// Applies the defaulting function registered for `kind` to `obj`.
    pub fn apply(&self, kind: &str, obj: &mut dyn Any) -> Result<(), ConfigError> {
        let func = self
            .funcs
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownKind(kind.to_string()))?;
        func(obj)
    }
}

impl Default for DefaulterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    /// The process-wide registry, built once with every configuration kind
    /// this crate recognizes already registered.
    pub static ref DEFAULTERS: DefaulterRegistry = {
        let mut registry = DefaulterRegistry::new();
        registry.register::<NodeletConfiguration>(NODELET_CONFIGURATION_KIND, apply_defaults);
        registry
    };
}
