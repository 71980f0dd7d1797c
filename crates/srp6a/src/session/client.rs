//! Client half of the SRP session.
//!
//! Mirrors the shape of the teacher's `SRP6` struct (plain fields, explicit
//! getters, one method per protocol step) but only ever holds the fields
//! a client actually needs — `a`/`A` and a transient password, never `v`.

use std::sync::Arc;

use num_bigint::BigUint;

use crate::bignum::is_zero_mod;
use crate::error::SrpError;
use crate::group::GroupParams;
use crate::primitives::{constant_time_eq, random_exponent, KdfParams};

use super::{
    client_premaster_secret, compute_m1, compute_m2, compute_session_key, compute_u, derive_x,
    validate_public_value, validate_u, Digest32, Secret,
};

/// `INIT →(begin)→ AWAIT_B →(B, u valid)→ AWAIT_M2 →(M2 matches)→ DONE`;
/// any failed check moves to `Failed` from wherever it was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientPhase {
    Init,
    AwaitB,
    AwaitM2,
    Done,
    Failed,
}

/// Per-exchange client state. Owned exclusively by one driver for the
/// lifetime of a single authentication exchange (never shared or reused).
pub struct ClientSession {
    group: Arc<GroupParams>,
    identity: Vec<u8>,
    password: Option<Secret>,
    a: Option<BigUint>,
    big_a: Option<BigUint>,
    big_b: Option<BigUint>,
    session_key: Option<Digest32>,
    m1: Option<Digest32>,
    phase: ClientPhase,
}

impl ClientSession {
    pub fn new(group: Arc<GroupParams>, identity: impl Into<Vec<u8>>) -> Self {
        ClientSession {
            group,
            identity: identity.into(),
            password: None,
            a: None,
            big_a: None,
            big_b: None,
            session_key: None,
            m1: None,
            phase: ClientPhase::Init,
        }
    }

    pub fn phase(&self) -> ClientPhase {
        self.phase
    }

    pub fn identity(&self) -> &[u8] {
        &self.identity
    }

    pub fn session_key(&self) -> Option<Digest32> {
        self.session_key
    }

    /// `client_begin(I, p) -> (I, A)`. Samples `a`, computes `A = g^a mod N`,
    /// redrawing `a` on the vanishingly unlikely `A mod N = 0`. Retains the
    /// password in memory pending the server's reply.
    pub fn begin(&mut self, password: &[u8]) -> Result<(Vec<u8>, BigUint), SrpError> {
        if self.phase != ClientPhase::Init {
            self.phase = ClientPhase::Failed;
            return Err(SrpError::ProtocolOrder);
        }
        let n = self.group.n();
        loop {
            let a = random_exponent(self.group.byte_len())?;
            let big_a = self.group.g().modpow(&a, n);
            if !is_zero_mod(&big_a, n) {
                self.a = Some(a);
                self.big_a = Some(big_a.clone());
                self.password = Some(Secret::new(password.to_vec()));
                self.phase = ClientPhase::AwaitB;
                return Ok((self.identity.clone(), big_a));
            }
        }
    }

    /// `client_receive_B(s, B, p) -> M1`. Clears the password once `x` is
    /// derived from it, per invariant 6.
    pub fn receive_b(&mut self, salt: &[u8], big_b: BigUint) -> Result<Digest32, SrpError> {
        if self.phase != ClientPhase::AwaitB {
            self.phase = ClientPhase::Failed;
            return Err(SrpError::ProtocolOrder);
        }

        if let Err(e) = validate_public_value(&big_b, &self.group) {
            self.phase = ClientPhase::Failed;
            return Err(e);
        }

        let big_a = self.big_a.clone().expect("set in begin");
        let a = self.a.clone().expect("set in begin");
        let u = compute_u(&self.group, &big_a, &big_b);
        if let Err(e) = validate_u(&u) {
            self.phase = ClientPhase::Failed;
            return Err(e);
        }

        let password = self.password.take().expect("set in begin");
        let kdf_params = KdfParams::default();
        let x = match derive_x(salt, password.as_slice(), &kdf_params) {
            Ok(x) => x,
            Err(e) => {
                self.phase = ClientPhase::Failed;
                return Err(e);
            }
        };
        drop(password);

        let s = client_premaster_secret(&self.group, &big_b, &a, &u, &x);
        let session_key = compute_session_key(&self.group, &s);
        let m1 = compute_m1(&self.group, &self.identity, salt, &big_a, &big_b, &session_key);

        self.big_b = Some(big_b);
        self.session_key = Some(session_key);
        self.m1 = Some(m1);
        self.phase = ClientPhase::AwaitM2;
        Ok(m1)
    }

    /// `client_receive_M2(M2) -> ok`. Returns the session key on a verified
    /// match; the caller (driver) treats that as `Authenticated(K)`.
    pub fn receive_m2(&mut self, m2: &Digest32) -> Result<Digest32, SrpError> {
        if self.phase != ClientPhase::AwaitM2 {
            self.phase = ClientPhase::Failed;
            return Err(SrpError::ProtocolOrder);
        }

        let big_a = self.big_a.clone().expect("set in begin");
        let m1 = self.m1.expect("set in receive_b");
        let session_key = self.session_key.expect("set in receive_b");
        let expected = compute_m2(&self.group, &big_a, &m1, &session_key);

        if !constant_time_eq(&expected, m2) {
            self.phase = ClientPhase::Failed;
            return Err(SrpError::ProofMismatch);
        }

        self.phase = ClientPhase::Done;
        Ok(session_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_transitions_to_await_b() {
        let mut client = ClientSession::new(Arc::new(GroupParams::default()), b"root".to_vec());
        let (identity, big_a) = client.begin(b"1234").unwrap();
        assert_eq!(identity, b"root");
        assert_eq!(client.phase(), ClientPhase::AwaitB);
        assert!(!is_zero_mod(&big_a, client.group.n()));
    }

    #[test]
    fn begin_twice_fails() {
        let mut client = ClientSession::new(Arc::new(GroupParams::default()), b"root".to_vec());
        client.begin(b"1234").unwrap();
        let err = client.begin(b"1234").unwrap_err();
        assert_eq!(err, SrpError::ProtocolOrder);
        assert_eq!(client.phase(), ClientPhase::Failed);
    }

    #[test]
    fn out_of_order_receive_b_fails() {
        let mut client = ClientSession::new(Arc::new(GroupParams::default()), b"root".to_vec());
        let err = client.receive_b(b"salt", BigUint::from(42u32)).unwrap_err();
        assert_eq!(err, SrpError::ProtocolOrder);
        assert_eq!(client.phase(), ClientPhase::Failed);
    }

    #[test]
    fn zero_b_is_rejected() {
        let mut client = ClientSession::new(Arc::new(GroupParams::default()), b"root".to_vec());
        client.begin(b"1234").unwrap();
        let err = client.receive_b(b"salt", BigUint::from(0u32)).unwrap_err();
        assert_eq!(err, SrpError::InvalidPublicValue);
        assert_eq!(client.phase(), ClientPhase::Failed);
    }
}
