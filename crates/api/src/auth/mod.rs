//! Bearer-credential verification.
//!
//! Token issuance belongs to the external identity provider; this module
//! only validates what arrives in the `Authorization` header.

pub mod jwt;
