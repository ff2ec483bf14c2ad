//! `cohort sanitize` command.

use crate::naming;

/// Execute the `sanitize` command.
#[must_use]
pub fn run(name: &str) -> String {
    naming::sanitize(name)
}
