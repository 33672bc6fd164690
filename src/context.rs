use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::config::GraphicsConfig;
use crate::foundation::error::GraphicsResult;
use crate::thread_guard::ThreadGuard;

struct ContextInner {
    config: RwLock<GraphicsConfig>,
    guard: Arc<ThreadGuard>,
}

/// Render context shared by every canvas and framebuffer created against it.
///
/// Owns the configuration snapshot and the [`ThreadGuard`]. Cloning is cheap; clones refer to
/// the same context.
#[derive(Clone)]
pub struct GraphicsContext {
    inner: Arc<ContextInner>,
}

static GLOBAL: OnceLock<GraphicsContext> = OnceLock::new();

impl GraphicsContext {
    /// Create a context owned by the calling thread.
    pub fn new(config: GraphicsConfig) -> GraphicsResult<Self> {
        config.validate()?;
        let guard = Arc::new(ThreadGuard::for_current_thread(config.verify_main_thread));
        Ok(Self::with_guard(config, guard))
    }

    /// Create a context around an existing guard, e.g. one shared between contexts.
    pub fn with_guard(config: GraphicsConfig, guard: Arc<ThreadGuard>) -> Self {
        guard.configure(config.verify_main_thread);
        tracing::debug!(
            verify_main_thread = config.verify_main_thread,
            owner = ?guard.owner(),
            "graphics context created"
        );
        Self {
            inner: Arc::new(ContextInner {
                config: RwLock::new(config),
                guard,
            }),
        }
    }

    /// Process-wide context.
    ///
    /// Initialized on first call from [`GraphicsConfig::from_env`] (falling back to defaults
    /// when the environment is invalid) and owned by the calling thread.
    pub fn global() -> &'static GraphicsContext {
        GLOBAL.get_or_init(|| {
            let config = GraphicsConfig::from_env().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring invalid graphics environment");
                GraphicsConfig::default()
            });
            let guard = Arc::new(ThreadGuard::for_current_thread(config.verify_main_thread));
            Self::with_guard(config, guard)
        })
    }

    pub fn config(&self) -> GraphicsConfig {
        self.inner
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the configuration and re-apply it to the guard.
    pub fn reconfigure(&self, config: GraphicsConfig) -> GraphicsResult<()> {
        config.validate()?;
        self.inner.guard.configure(config.verify_main_thread);
        *self
            .inner
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn thread_guard(&self) -> &Arc<ThreadGuard> {
        &self.inner.guard
    }

    pub fn ptr_eq(&self, other: &GraphicsContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for GraphicsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("config", &self.config())
            .field("guard", &self.inner.guard)
            .finish()
    }
}
