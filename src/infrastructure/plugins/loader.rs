//! Plugin loader - turns a directory of shared libraries into active handlers

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::{Library, Symbol};

use crate::application::errors::PluginError;
use crate::domain::traits::Handler;

/// Entry symbol every plugin artifact must export.
pub const PLUGIN_ENTRY_SYMBOL: &[u8] = b"ultrabot_plugin_init";

/// Extension of loadable artifacts; anything else in the directory is skipped.
#[cfg(target_os = "macos")]
pub const PLUGIN_EXTENSION: &str = "dylib";
#[cfg(not(target_os = "macos"))]
pub const PLUGIN_EXTENSION: &str = "so";

/// Factory signature behind [`PLUGIN_ENTRY_SYMBOL`].
///
/// The plugin allocates its handler with `Box::into_raw`; the loader takes
/// ownership back with `Box::from_raw`.
pub type PluginInitFn = extern "C" fn() -> *mut dyn Handler;

/// A successfully activated plugin.
///
/// Field order matters: the handler must drop before the library whose code
/// backs it.
pub struct LoadedPlugin {
    instance: Arc<dyn Handler>,
    library: Library,
}

impl LoadedPlugin {
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.instance
    }

    /// Split into the handler and the library that must outlive it.
    pub fn into_parts(self) -> (Arc<dyn Handler>, Library) {
        (self.instance, self.library)
    }
}

/// Discovers, loads, and activates plugin artifacts.
pub struct PluginLoader {
    plugin_dir: PathBuf,
}

impl PluginLoader {
    pub fn new(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
        }
    }

    /// Load every artifact in the plugin directory.
    ///
    /// Per-artifact failures (unloadable library, missing symbol, null
    /// instance, failed `start`) are logged and skipped; one broken plugin
    /// never prevents the rest from loading. The only error returned is a
    /// directory that cannot be read at all.
    pub fn load_all(&self) -> Result<Vec<LoadedPlugin>, PluginError> {
        let entries = std::fs::read_dir(&self.plugin_dir).map_err(|e| PluginError::Directory {
            path: self.plugin_dir.clone(),
            source: e,
        })?;

        let mut plugins = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if path.extension().and_then(OsStr::to_str) != Some(PLUGIN_EXTENSION) {
                continue;
            }

            tracing::info!("Loading: {}", path.display());
            match self.load_plugin(&path) {
                Ok(plugin) => plugins.push(plugin),
                Err(e) => tracing::warn!("{}: {}", path.display(), e),
            }
        }

        Ok(plugins)
    }

    /// Load and activate a single artifact.
    pub fn load_plugin(&self, path: impl AsRef<Path>) -> Result<LoadedPlugin, PluginError> {
        let path = path.as_ref();

        let library = unsafe {
            Library::new(path).map_err(|e| PluginError::Load(e.to_string()))?
        };

        let init_fn: Symbol<PluginInitFn> = unsafe {
            library
                .get(PLUGIN_ENTRY_SYMBOL)
                .map_err(|e| PluginError::Symbol(e.to_string()))?
        };

        let mut handler: Box<dyn Handler> = unsafe {
            let raw = init_fn();
            if raw.is_null() {
                return Err(PluginError::Instantiate(
                    "entry point returned null".to_string(),
                ));
            }
            Box::from_raw(raw)
        };

        // Activation: the loader holds the only reference here, so the
        // contract gets its one &mut call before the handler is shared.
        handler.start()?;

        tracing::info!("Activated plugin: {}", handler.name());

        Ok(LoadedPlugin {
            instance: Arc::from(handler),
            library,
        })
    }
}
