//! Endpoint drivers (component D): thin state machines that sequence
//! session operations against abstract, already-decoded message payloads.
//!
//! A driver never touches a socket. The teacher's own `auth_socket.rs`
//! dispatches on a command byte to one of several `handle_*` functions that
//! each mutate a `SessionStatus`; the driver here plays the same role —
//! one method per wire phase, returning the next outbound payload or a
//! terminal error — but over the group-agnostic payload types below
//! instead of the teacher's WoW packet structs, and with no I/O or timeout
//! policy baked in (a driver is owned by something that can suspend
//! between messages; the driver itself never suspends).

pub mod client;
pub mod server;

use num_bigint::BigUint;
use thiserror::Error;

use crate::error::SrpError;
use crate::session::Digest32;

pub use client::ClientDriver;
pub use server::{ServerDriver, ServerDriverConfig};

/// auth.1, C -> S: the identity and the client's public ephemeral.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Auth1Request {
    pub identity: Vec<u8>,
    pub big_a: BigUint,
}

/// auth.1, S -> C: the salt and the server's public ephemeral.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Auth1Reply {
    pub salt: Vec<u8>,
    pub big_b: BigUint,
}

/// auth.2, C -> S: the client's proof.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Auth2Request {
    pub m1: Digest32,
}

/// auth.2, S -> C: the server's proof.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Auth2Reply {
    pub m2: Digest32,
}

/// Everything a driver can hand back to its caller. `Session` wraps a core
/// failure verbatim; `UnknownUser` and `MalformedMessage` are the two error
/// kinds the design places at the driver/transport boundary rather than
/// inside the core (see the error handling section of the design).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error(transparent)]
    Session(#[from] SrpError),

    /// `lookup(I)` returned nothing and the driver is configured with
    /// `user_enumeration_resistance` off, so it rejects before the session
    /// does anything rather than carrying the exchange through a simulated
    /// record. Logging this is the driver's job; echoing it to the peer
    /// as anything other than the same opaque failure every other FAILED
    /// transition produces is not.
    #[error("identity not recognized")]
    UnknownUser,

    /// The inbound bytes did not decode into the expected payload shape.
    /// Never constructed by this crate — reserved for the transport layer
    /// that decodes wire bytes into the `Auth1Request`/`Auth2Request` types
    /// above.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}
