//! Mass-assignment gate.
//!
//! Anything that writes several fields of a record from one parameter tree
//! goes through here, and refuses trees that were never permitted.

use crate::error::{ParamsError, ParamsResult};
use crate::params::Parameters;
use crate::value::Value;

/// Passes `attributes` through if permitted.
///
/// # Errors
/// [`ParamsError::ForbiddenAttributes`] if the tree was never permitted.
pub fn sanitize_for_mass_assignment(attributes: &Parameters) -> ParamsResult<&Parameters> {
    if attributes.is_permitted() {
        Ok(attributes)
    } else {
        let keys: Vec<&str> = attributes.keys().collect();
        tracing::warn!(?keys, "refused mass assignment of unpermitted parameters");
        Err(ParamsError::ForbiddenAttributes)
    }
}

/// A record that accepts bulk attribute assignment.
pub trait MassAssignment {
    /// Writes one attribute.
    ///
    /// # Errors
    /// [`ParamsError::UnknownAttribute`] if the record has no such attribute.
    fn write_attribute(&mut self, name: &str, value: &Value) -> ParamsResult<()>;

    /// Writes every entry of `attributes`, after checking the tree was
    /// permitted. Nothing is written when the check fails.
    fn assign_attributes(&mut self, attributes: &Parameters) -> ParamsResult<()> {
        let attributes = sanitize_for_mass_assignment(attributes)?;
        for (name, value) in attributes.iter() {
            self.write_attribute(name, value)?;
        }
        Ok(())
    }
}
