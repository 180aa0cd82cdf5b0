//! Expression-text normalization for value handles.
//!
//! Generated call expressions splice handle access paths into larger strings
//! submitted to the host's evaluator. The only normalization needed is for
//! owning smart-pointer wrappers: a rendering method must be invoked on the
//! pointee, never on the wrapper object itself.

use crate::session::Value;
use crate::types::TargetProfile;

/// Produce the access-path text for `value`, suitable for splicing into a
/// generated call expression.
///
/// If the declared type name contains the profile's smart-pointer marker the
/// produced text explicitly dereferences the wrapper, `(*(path))`; otherwise
/// the handle's plain access path is returned unchanged.
#[must_use]
pub fn expression_path(value: &dyn Value, profile: &TargetProfile) -> String
{
    let path = value.path_expression();
    if value.type_name().contains(profile.smart_pointer_marker.as_str()) {
        format!("(*({path}))")
    } else {
        path
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::mock::MockValue;

    #[test]
    fn plain_path_is_unchanged()
    {
        let profile = TargetProfile::default();
        let value = MockValue::direct("core::GlobalState", "gs");
        assert_eq!(expression_path(&value, &profile), "gs");
    }

    #[test]
    fn smart_pointer_wrapper_is_dereferenced()
    {
        let profile = TargetProfile::default();
        let value = MockValue::direct("std::unique_ptr<core::GlobalState>", "ctx.gs_ptr");
        assert_eq!(expression_path(&value, &profile), "(*(ctx.gs_ptr))");
    }

    #[test]
    fn normalization_is_idempotent_per_handle()
    {
        let profile = TargetProfile::default();
        let value = MockValue::direct("std::unique_ptr<core::GlobalState>", "gs_owner");
        let first = expression_path(&value, &profile);
        let second = expression_path(&value, &profile);
        assert_eq!(first, second);
    }
}
