//! The process-wide time-formatting locale slot.
//!
//! Locale is process-global mutable state, so locale-sensitive
//! formatting must save the current value, install its override, and
//! restore on the way out. A single lock serializes the whole
//! save/override/format/restore window; interleaving two of these on
//! one process would leak one caller's locale into the other's output.

use std::sync::Mutex;

lazy_static! {
    // Empty string selects the user's default, as with `setlocale`.
    static ref TIME_LOCALE: Mutex<String> = Mutex::new(String::new());
}

/// Opaque carrier of a saved locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locale(String);

/// Read the current time locale.
pub fn current() -> Locale {
    Locale(TIME_LOCALE.lock().expect("time locale poisoned").clone())
}

/// Install `locale` as the process-wide time locale.
pub fn set(locale: &Locale) {
    *TIME_LOCALE.lock().expect("time locale poisoned") = locale.0.clone();
}

/// Run `f` under the user's default locale, restoring whatever was
/// installed before. `f` receives the effective locale name.
pub fn with_user_locale<F, R>(f: F) -> R
where
    F: FnOnce(&str) -> R,
{
    let mut slot = TIME_LOCALE.lock().expect("time locale poisoned");
    let saved = slot.clone();
    slot.clear();
    let effective = slot.clone();
    let result = f(&effective);
    *slot = saved;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_is_restored() {
        set(&Locale("de_DE".to_string()));
        let effective = with_user_locale(|name| name.to_string());
        assert_eq!(effective, "");
        assert_eq!(current(), Locale("de_DE".to_string()));
        set(&Locale(String::new()));
    }
}
