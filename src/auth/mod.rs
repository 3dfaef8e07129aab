//! OAuth2 authentication for the Meridian API.
//!
//! [`Credentials`] selects the grant used to obtain tokens; the
//! [`Authenticator`] owns the cached access token and performs exchange and
//! refresh against the token endpoint.

mod authenticator;

pub use authenticator::{Authenticator, Credentials};
