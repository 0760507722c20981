//! HookRegistry - post-enqueue hooks keyed by job class.
//!
//! Hooks run after the store has acknowledged a push, in registration
//! order, with the job's original arguments. A failing hook is logged and
//! skipped; it never undoes or fails the enqueue.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::warn;

use crate::error::{EnqueueError, HookError, Result};

/// Callback invoked after a job of a given class is enqueued.
pub trait EnqueueHook: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Called with the arguments the job was created with.
    fn after_enqueue(&self, args: &[Value]) -> std::result::Result<(), HookError>;
}

/// Adapts a closure into an [`EnqueueHook`].
struct FnHook<F> {
    name: String,
    func: F,
}

impl<F> EnqueueHook for FnHook<F>
where
    F: Fn(&[Value]) -> std::result::Result<(), HookError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn after_enqueue(&self, args: &[Value]) -> std::result::Result<(), HookError> {
        (self.func)(args)
    }
}

/// Thread-safe registry of post-enqueue hooks.
///
/// Cloning yields another handle onto the same registry.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Arc<RwLock<HashMap<String, Vec<Arc<dyn EnqueueHook>>>>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `hook` to the hooks for `class`.
    pub fn register(&self, class: impl Into<String>, hook: Arc<dyn EnqueueHook>) -> Result<()> {
        let mut hooks = self
            .hooks
            .write()
            .map_err(|e| EnqueueError::LockPoisoned(e.to_string()))?;
        hooks.entry(class.into()).or_default().push(hook);
        Ok(())
    }

    /// Registers a closure as a hook for `class`.
    pub fn register_fn<F>(
        &self,
        class: impl Into<String>,
        name: impl Into<String>,
        func: F,
    ) -> Result<()>
    where
        F: Fn(&[Value]) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        let hook = FnHook {
            name: name.into(),
            func,
        };
        self.register(class, Arc::new(hook))
    }

    /// Hooks registered for `class`, in registration order.
    pub fn hooks_for(&self, class: &str) -> Result<Vec<Arc<dyn EnqueueHook>>> {
        let hooks = self
            .hooks
            .read()
            .map_err(|e| EnqueueError::LockPoisoned(e.to_string()))?;
        Ok(hooks.get(class).cloned().unwrap_or_default())
    }

    /// Runs every hook for `class` with `args`.
    ///
    /// The lock is released before any hook runs, so hooks may register
    /// further hooks or enqueue jobs themselves. A poisoned registry is
    /// logged and no hooks run.
    pub(crate) fn run_after_enqueue(&self, class: &str, args: &[Value]) {
        let hooks = match self.hooks_for(class) {
            Ok(hooks) => hooks,
            Err(e) => {
                warn!(class, error = %e, "hook registry unavailable, skipping hooks");
                return;
            }
        };
        for hook in hooks {
            if let Err(e) = hook.after_enqueue(args) {
                warn!(class, hook = hook.name(), error = %e, "after-enqueue hook failed");
            }
        }
    }
}
