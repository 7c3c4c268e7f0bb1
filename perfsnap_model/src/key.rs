//! Key normalization
//!
//! Counter and instance names are compared case-insensitively everywhere they
//! are used as keys. Folding is done with Unicode lowercase mapping, which does
//! not depend on the process locale. An empty instance name means "the only
//! instance" of a single-instance counter and is mapped to
//! [`SINGLE_INSTANCE_NAME`] before it is used as a key.

/// Key under which the sole instance of a single-instance counter is stored.
pub const SINGLE_INSTANCE_NAME: &str = "systemdiagnosticsperfcounterlibsingleinstance";

/// Case-fold `name` for use as a key.
#[must_use]
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Normalize a counter name.
#[must_use]
pub fn counter_key(name: &str) -> String {
    fold(name)
}

/// Normalize an instance name, mapping the empty name to
/// [`SINGLE_INSTANCE_NAME`].
#[must_use]
pub fn instance_key(name: &str) -> String {
    if name.is_empty() {
        SINGLE_INSTANCE_NAME.to_string()
    } else {
        fold(name)
    }
}
