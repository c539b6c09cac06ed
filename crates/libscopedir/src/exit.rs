use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Mutex, OnceLock},
};

use tracing::{debug, error};

/// A registered cleanup action.
type Hook = Box<dyn FnOnce() + Send + 'static>;

/// Handle returned by [`ExitRegistry::register`], usable to cancel the hook
/// before the registry fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Internal registry state behind the mutex.
struct Hooks {
    /// Pending hooks in registration order.
    pending: Vec<(HookId, Hook)>,
    /// Next identifier to hand out.
    next_id: u64,
    /// Set once `run_hooks` has fired; later registrations are refused.
    fired: bool,
}

/// Registry of cleanup actions to run once at normal process shutdown.
///
/// The host program decides when shutdown happens: it calls
/// [`ExitRegistry::run_hooks`] on the global [`registry`] at the end of
/// `main`. Hooks do not run on abnormal termination that bypasses that call;
/// this is a documented limitation of the mechanism, not of its users.
pub struct ExitRegistry {
    /// Registered hooks plus fire-once bookkeeping.
    hooks: Mutex<Hooks>,
}

impl ExitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            hooks: Mutex::new(Hooks {
                pending: Vec::new(),
                next_id: 0,
                fired: false,
            }),
        }
    }

    /// Register a cleanup action, returning a handle for cancellation.
    ///
    /// Returns `None` when the registry has already fired or its state is
    /// unusable; registration is best-effort and never panics, so callers can
    /// treat a refusal as a logged non-event.
    pub fn register(&self, action: impl FnOnce() + Send + 'static) -> Option<HookId> {
        let Ok(mut hooks) = self.hooks.lock() else {
            error!("Exit registry lock poisoned, cleanup action dropped");
            return None;
        };
        if hooks.fired {
            debug!("Exit registry already fired, cleanup action dropped");
            return None;
        }
        let id = HookId(hooks.next_id);
        hooks.next_id += 1;
        hooks.pending.push((id, Box::new(action)));
        Some(id)
    }

    /// Cancel a pending hook. Returns whether the hook was still pending.
    pub fn cancel(&self, id: HookId) -> bool {
        let Ok(mut hooks) = self.hooks.lock() else {
            return false;
        };
        let before = hooks.pending.len();
        hooks.pending.retain(|(hook_id, _)| *hook_id != id);
        hooks.pending.len() != before
    }

    /// Run every pending hook in registration order, exactly once.
    ///
    /// The first call takes all pending hooks and fires them; subsequent
    /// calls are no-ops. A panicking hook is contained so the remaining hooks
    /// still run. The mutex is released before any hook executes, so hooks
    /// may themselves touch the registry without deadlocking.
    pub fn run_hooks(&self) {
        let pending = {
            let Ok(mut hooks) = self.hooks.lock() else {
                error!("Exit registry lock poisoned, cleanup hooks skipped");
                return;
            };
            if hooks.fired {
                return;
            }
            hooks.fired = true;
            std::mem::take(&mut hooks.pending)
        };

        debug!("Running {} exit cleanup hooks", pending.len());
        for (id, hook) in pending {
            if panic::catch_unwind(AssertUnwindSafe(hook)).is_err() {
                error!("Exit cleanup hook {id:?} panicked");
            }
        }
    }
}

impl Default for ExitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-global exit registry used by
/// [`ScopedDir::delete_on_exit`](crate::ScopedDir::delete_on_exit).
pub fn registry() -> &'static ExitRegistry {
    static REGISTRY: OnceLock<ExitRegistry> = OnceLock::new();
    REGISTRY.get_or_init(ExitRegistry::new)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn hooks_run_once_in_registration_order() {
        let registry = ExitRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = Arc::clone(&order);
            assert!(
                registry
                    .register(move || order.lock().unwrap().push(n))
                    .is_some()
            );
        }

        registry.run_hooks();
        registry.run_hooks();

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn registration_is_refused_after_firing() {
        let registry = ExitRegistry::new();
        registry.run_hooks();

        let ran = Arc::new(AtomicUsize::new(0));
        let ran_in_hook = Arc::clone(&ran);
        assert!(
            registry
                .register(move || {
                    ran_in_hook.fetch_add(1, Ordering::SeqCst);
                })
                .is_none()
        );

        registry.run_hooks();
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancelled_hooks_do_not_run() {
        let registry = ExitRegistry::new();
        let ran = Arc::new(AtomicUsize::new(0));

        let ran_in_hook = Arc::clone(&ran);
        let id = registry
            .register(move || {
                ran_in_hook.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert!(registry.cancel(id));
        assert!(!registry.cancel(id));

        registry.run_hooks();
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn a_panicking_hook_does_not_stop_the_rest() {
        let registry = ExitRegistry::new();
        let ran = Arc::new(AtomicUsize::new(0));

        assert!(registry.register(|| panic!("boom")).is_some());
        let ran_in_hook = Arc::clone(&ran);
        assert!(
            registry
                .register(move || {
                    ran_in_hook.fetch_add(1, Ordering::SeqCst);
                })
                .is_some()
        );

        registry.run_hooks();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
