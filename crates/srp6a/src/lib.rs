//! SRP-6a (Secure Remote Password, RFC 2945 / RFC 5054) password-authenticated
//! key agreement core.
//!
//! Dependency order, leaves first: [`group`] -> [`primitives`] ->
//! [`session`] -> [`driver`]. Nothing above this crate's boundary — wire
//! framing, user-record persistence, transport I/O, rate limiting — is this
//! crate's concern; a driver consumes and produces plain Rust values and
//! leaves everything else to its caller.

pub mod bignum;
pub mod driver;
pub mod error;
pub mod group;
pub mod primitives;
pub mod session;

pub use driver::{
    Auth1Reply, Auth1Request, Auth2Reply, Auth2Request, ClientDriver, DriverError, ServerDriver,
    ServerDriverConfig,
};
pub use error::SrpError;
pub use group::GroupParams;
pub use session::{derive_verifier, ClientPhase, ClientSession, Digest32, ServerPhase, ServerSession, UserRecord};
