//! Validation capability exposed by form controls.

/// A control that can report whether its current value is acceptable.
///
/// Hosts call [`Validatable::validate`] before submitting a form; the control
/// remembers the outcome so it can render an error state.
pub trait Validatable {
    /// Whether the control takes part in form validation at all.
    fn supports_validation(&self) -> bool {
        true
    }

    /// Checks the current value without touching the rendered state.
    fn is_valid(&self) -> bool;

    /// Checks the current value and records the outcome. Returns `true` when valid.
    fn validate(&mut self) -> bool;

    /// Outcome of the last [`Validatable::validate`] call.
    fn is_invalid(&self) -> bool;
}
