//! `PrefProvider` — Read-only access to the host's preference namespaces
//!
//! The engine never owns preference state. Hosts implement this trait over
//! whatever store they have (a live settings service, a JSON snapshot, a test
//! fixture) and hand it to [`match_conditions`](crate::match_conditions) for
//! the duration of one call.
//!
//! Three namespaces are consulted:
//!
//! - **profile** — per-profile settings
//! - **local state** — process-wide settings
//! - **virtual** — facts computed on demand, addressed with the
//!   [`VIRTUAL_PREF_PATH_PREFIX`](crate::VIRTUAL_PREF_PATH_PREFIX) prefix

use crate::PrefValue;
use std::fmt::Debug;

/// Read-only view over profile, local-state and virtual preferences.
///
/// Implementations must not panic on unknown paths; return `None` or `false`.
/// Providers are shared across threads for concurrent reads, hence the
/// `Send + Sync` bound.
/// `has_*` default to checking the matching `get_*` for `Some`.
///
/// # Example
///
/// ```
/// use prefmatch::{PrefProvider, PrefValue};
///
/// #[derive(Debug)]
/// struct OnlyClock;
///
/// impl PrefProvider for OnlyClock {
///     fn get_profile_pref(&self, path: &str) -> Option<PrefValue> {
///         (path == "ntp.show_clock").then(|| PrefValue::Bool(true))
///     }
///
///     fn get_local_state_pref(&self, _path: &str) -> Option<PrefValue> {
///         None
///     }
///
///     fn get_virtual_pref(&self, _path: &str) -> Option<PrefValue> {
///         None
///     }
/// }
///
/// assert!(OnlyClock.has_profile_pref("ntp.show_clock"));
/// assert!(!OnlyClock.has_local_state_pref("ntp.show_clock"));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `PrefProvider`",
    label = "this type cannot supply preference values",
    note = "implement `get_profile_pref`, `get_local_state_pref` and `get_virtual_pref`"
)]
pub trait PrefProvider: Send + Sync + Debug {
    /// Look up a per-profile preference by its full (possibly dotted) name.
    fn get_profile_pref(&self, path: &str) -> Option<PrefValue>;

    /// Whether a per-profile preference exists.
    fn has_profile_pref(&self, path: &str) -> bool {
        self.get_profile_pref(path).is_some()
    }

    /// Look up a process-wide preference by its full (possibly dotted) name.
    fn get_local_state_pref(&self, path: &str) -> Option<PrefValue>;

    /// Whether a process-wide preference exists.
    fn has_local_state_pref(&self, path: &str) -> bool {
        self.get_local_state_pref(path).is_some()
    }

    /// Compute a virtual fact. `path` still carries the `[virtual]:` prefix.
    fn get_virtual_pref(&self, path: &str) -> Option<PrefValue>;
}

impl<P: PrefProvider + ?Sized> PrefProvider for &P {
    fn get_profile_pref(&self, path: &str) -> Option<PrefValue> {
        (**self).get_profile_pref(path)
    }

    fn has_profile_pref(&self, path: &str) -> bool {
        (**self).has_profile_pref(path)
    }

    fn get_local_state_pref(&self, path: &str) -> Option<PrefValue> {
        (**self).get_local_state_pref(path)
    }

    fn has_local_state_pref(&self, path: &str) -> bool {
        (**self).has_local_state_pref(path)
    }

    fn get_virtual_pref(&self, path: &str) -> Option<PrefValue> {
        (**self).get_virtual_pref(path)
    }
}

impl<P: PrefProvider + ?Sized> PrefProvider for Box<P> {
    fn get_profile_pref(&self, path: &str) -> Option<PrefValue> {
        (**self).get_profile_pref(path)
    }

    fn has_profile_pref(&self, path: &str) -> bool {
        (**self).has_profile_pref(path)
    }

    fn get_local_state_pref(&self, path: &str) -> Option<PrefValue> {
        (**self).get_local_state_pref(path)
    }

    fn has_local_state_pref(&self, path: &str) -> bool {
        (**self).has_local_state_pref(path)
    }

    fn get_virtual_pref(&self, path: &str) -> Option<PrefValue> {
        (**self).get_virtual_pref(path)
    }
}
