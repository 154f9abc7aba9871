//! Runtime abstraction layer for async operations
//!
//! Background work (timed GPS replay) is spawned through [`AsyncSpawner`]
//! so the library does not hard-wire a particular executor. Tokio is the
//! only spawner shipped; others can be installed with [`init_runtime`].

use crate::prelude::{Future, Pin};

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(
        &self,
        future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
    ) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

/// Spawns `future` on the installed runtime
///
/// Returns `None` when no spawner is installed and no default runtime
/// feature is enabled.
pub fn spawn<F>(future: F) -> Option<Box<dyn AsyncHandle>>
where
    F: Future<Output = ()> + Send + 'static,
{
    log::debug!("runtime::spawn() - spawning async task");
    runtime().map(|spawner| spawner.spawn_boxed(Box::pin(future)))
}

/// Default spawner implementations
pub mod spawners {
    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner
        ///
        /// Must be used from within a tokio runtime context.
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(
                &self,
                future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
            ) -> Box<dyn AsyncHandle> {
                let handle = ::tokio::spawn(future);
                Box::new(TokioHandle(handle))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Initialize the runtime with a specific spawner.
/// Has no effect once a spawner is installed.
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) {
    let _ = RUNTIME.set(spawner);
}

/// Get the global runtime spawner
pub fn runtime() -> Option<&'static dyn AsyncSpawner> {
    #[cfg(feature = "tokio-runtime")]
    {
        Some(
            RUNTIME
                .get_or_init(|| Box::new(spawners::tokio_impl::TokioSpawner))
                .as_ref(),
        )
    }

    #[cfg(not(feature = "tokio-runtime"))]
    {
        RUNTIME.get().map(|spawner| spawner.as_ref())
    }
}
