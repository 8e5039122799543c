//! Method descriptor equivalence for override matching.
//!
//! Two methods are override candidates when their descriptors are equal after
//! dropping the return type, but only if that return type is an object type
//! (`L...;`). Covariant overrides returning a narrower class therefore match,
//! while primitive, array and `void` returns must be identical, so methods
//! differing only by a primitive return type stay distinct.

/// Strip the return type from a method descriptor if it is an object type.
///
/// Descriptors without a `)` are returned unchanged.
///
/// ```
/// use mapalign_core::descriptor::without_return_type_if_class;
///
/// assert_eq!(without_return_type_if_class("(I)Ljava/lang/Object;"), "(I)");
/// assert_eq!(without_return_type_if_class("(I)V"), "(I)V");
/// assert_eq!(without_return_type_if_class("(I)[Ljava/lang/Object;"), "(I)[Ljava/lang/Object;");
/// ```
pub fn without_return_type_if_class(desc: &str) -> &str {
    match desc.rfind(')') {
        Some(index) if desc[index + 1..].starts_with('L') => &desc[..=index],
        _ => desc,
    }
}

/// Check if two method descriptors are equivalent for override matching.
pub fn is_override_compatible(desc: &str, other: &str) -> bool {
    without_return_type_if_class(desc) == without_return_type_if_class(other)
}
