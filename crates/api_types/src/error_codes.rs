//! Stable error codes carried in error response bodies.
//!
//! Clients branch on these codes; the human-readable message may change,
//! the codes may not.

/// Malformed or conflicting input, scoped to a field where possible.
pub const VALIDATION_ERROR: &str = "validation_error";

/// The request itself is malformed (bad parameters, bad path id).
pub const INVALID_REQUEST: &str = "invalid_request";

/// No usable credential was presented.
pub const AUTHENTICATION_REQUIRED: &str = "authentication_required";

/// A credential was presented but did not check out. Deliberately uniform:
/// the message never reveals whether the username or the password was wrong.
pub const AUTHENTICATION_FAILED: &str = "authentication_failed";

/// Authenticated, but not allowed to touch this resource.
pub const PERMISSION_DENIED: &str = "permission_denied";

/// The resource id does not resolve.
pub const RESOURCE_NOT_FOUND: &str = "resource_not_found";

/// Anything the server cannot blame on the caller.
pub const INTERNAL_ERROR: &str = "internal_error";
