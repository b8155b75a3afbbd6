//! The activated handler set

use std::collections::HashSet;
use std::sync::Arc;

use libloading::Library;

use crate::domain::traits::Handler;
use crate::infrastructure::plugins::loader::LoadedPlugin;

/// The handlers that survived activation, plus the libraries backing them.
///
/// Built once at startup and read-only afterward, so dispatch tasks can share
/// it without locking. Field order matters: handlers must drop before their
/// libraries.
pub struct HandlerSet {
    handlers: Vec<Arc<dyn Handler>>,
    #[allow(dead_code)]
    libraries: Vec<Library>,
}

impl HandlerSet {
    /// Build the set from loader output.
    pub fn new(loaded: Vec<LoadedPlugin>) -> Self {
        let mut handlers = Vec::with_capacity(loaded.len());
        let mut libraries = Vec::with_capacity(loaded.len());
        for plugin in loaded {
            let (handler, library) = plugin.into_parts();
            handlers.push(handler);
            libraries.push(library);
        }

        let set = Self {
            handlers,
            libraries,
        };
        set.warn_on_duplicate_names();
        set
    }

    /// Build the set from in-process handlers, with no libraries to keep
    /// alive. Used for statically registered handlers and in tests.
    pub fn from_handlers(handlers: Vec<Arc<dyn Handler>>) -> Self {
        let set = Self {
            handlers,
            libraries: Vec::new(),
        };
        set.warn_on_duplicate_names();
        set
    }

    fn warn_on_duplicate_names(&self) {
        let mut seen = HashSet::new();
        for handler in &self.handlers {
            if !seen.insert(handler.name().to_string()) {
                tracing::warn!(
                    "Duplicate handler name '{}' - check the plugin directory",
                    handler.name()
                );
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Handler>> {
        self.handlers.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.handlers
            .iter()
            .map(|h| h.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::HandlerError;
    use crate::domain::entities::{Event, OutboundMessage, UserInfo};

    struct Named(&'static str);

    impl Handler for Named {
        fn start(&mut self) -> Result<(), HandlerError> {
            Ok(())
        }

        fn name(&self) -> &str {
            self.0
        }

        fn execute(
            &self,
            _event: &Event,
            _bot_user: &UserInfo,
        ) -> Result<Vec<OutboundMessage>, HandlerError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn exposes_names_in_registration_order() {
        let set = HandlerSet::from_handlers(vec![
            Arc::new(Named("google-images")),
            Arc::new(Named("echo")),
        ]);

        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        assert_eq!(set.names(), vec!["google-images", "echo"]);
    }

    #[test]
    fn duplicate_names_are_tolerated() {
        // A smell worth a warning, never a failure.
        let set =
            HandlerSet::from_handlers(vec![Arc::new(Named("echo")), Arc::new(Named("echo"))]);
        assert_eq!(set.len(), 2);
    }
}
