//! Domain error kinds for the SRP-6a core.
//!
//! These mirror the error kinds named in the design: a session surfaces a
//! single terminal verdict to its driver and never a more specific reason
//! than this enum gives it. What the driver does with that reason (log it,
//! close the transport silently) is the driver's call, not this module's.

use thiserror::Error;

/// Everything that can go wrong inside the SRP-6a core.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum SrpError {
    /// A or B was 0 mod N, or the scrambling parameter u was 0.
    #[error("invalid public ephemeral value")]
    InvalidPublicValue,

    /// M1 or M2 failed constant-time comparison.
    #[error("proof verification failed")]
    ProofMismatch,

    /// A message arrived while the session was in the wrong phase.
    #[error("message received out of order")]
    ProtocolOrder,

    /// The CSPRNG failed to produce bytes. Retryable at the driver level.
    #[error("insufficient entropy from the random number generator")]
    InsufficientEntropy,

    /// The caller-supplied group modulus is smaller than the 2048-bit floor.
    #[error("group modulus N is smaller than the required 2048 bits")]
    GroupTooSmall,
}
