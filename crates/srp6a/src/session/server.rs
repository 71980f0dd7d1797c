//! Server half of the SRP session.
//!
//! The teacher's `SRP6` is already shaped like this half — it never retains
//! a client private exponent — so this module stays closest to the
//! teacher's field layout and method names (`calculate_host_public_ephemeral`
//! becomes `receive_a`, `calculate_session_key` is folded into `receive_m1`).

use std::sync::Arc;

use num_bigint::BigUint;

use crate::bignum::is_zero_mod;
use crate::error::SrpError;
use crate::group::GroupParams;
use crate::primitives::{constant_time_eq, hash, random_exponent};

use super::{
    compute_m1, compute_m2, compute_session_key, compute_u, server_premaster_secret,
    validate_public_value, validate_u, Digest32,
};

/// `INIT →(A valid)→ AWAIT_M1 →(M1 matches)→ DONE`; any validation failure
/// moves to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPhase {
    Init,
    AwaitM1,
    Done,
    Failed,
}

/// A looked-up enrollment record: `(I, s, v)`.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub identity: Vec<u8>,
    pub salt: Vec<u8>,
    pub verifier: BigUint,
}

/// Per-exchange server state, holding the looked-up `(s, v)` and the
/// server's own ephemeral `b`/`B` once `receive_a` has run.
pub struct ServerSession {
    group: Arc<GroupParams>,
    identity: Option<Vec<u8>>,
    salt: Option<Vec<u8>>,
    verifier: Option<BigUint>,
    b: Option<BigUint>,
    big_a: Option<BigUint>,
    big_b: Option<BigUint>,
    session_key: Option<Digest32>,
    phase: ServerPhase,
}

impl ServerSession {
    pub fn new(group: Arc<GroupParams>) -> Self {
        ServerSession {
            group,
            identity: None,
            salt: None,
            verifier: None,
            b: None,
            big_a: None,
            big_b: None,
            session_key: None,
            phase: ServerPhase::Init,
        }
    }

    pub fn phase(&self) -> ServerPhase {
        self.phase
    }

    pub fn session_key(&self) -> Option<Digest32> {
        self.session_key
    }

    /// Force the session straight to `Failed` without running any check of
    /// its own. For a driver that rejects a request before the session gets
    /// a chance to look at it — the enumeration-resistance opt-out, for
    /// instance — so the session's terminal state still agrees with what
    /// actually happened on the wire.
    pub fn fail(&mut self) {
        self.phase = ServerPhase::Failed;
    }

    /// `server_receive_A(I, A, lookup) -> (s, B)`. `record` is the result of
    /// the driver's `lookup(I)` call; `None` means no such user, in which
    /// case a simulated record keeps this call indistinguishable in shape
    /// and timing from the real-user path (the `user_enumeration_resistance`
    /// config option; the driver passes `None` straight through here when
    /// that option is off instead of masking it with a simulated record).
    pub fn receive_a(
        &mut self,
        identity: &[u8],
        big_a: BigUint,
        record: Option<UserRecord>,
        server_secret: &[u8],
    ) -> Result<(Vec<u8>, BigUint), SrpError> {
        if self.phase != ServerPhase::Init {
            self.phase = ServerPhase::Failed;
            return Err(SrpError::ProtocolOrder);
        }

        if let Err(e) = validate_public_value(&big_a, &self.group) {
            self.phase = ServerPhase::Failed;
            return Err(e);
        }

        let record = record.unwrap_or_else(|| simulated_record(identity, server_secret, &self.group));

        let n = self.group.n();
        let k = self.group.k();
        loop {
            let b = match random_exponent(self.group.byte_len()) {
                Ok(b) => b,
                Err(e) => {
                    self.phase = ServerPhase::Failed;
                    return Err(e);
                }
            };
            let big_b = (k * &record.verifier + self.group.g().modpow(&b, n)) % n;
            if is_zero_mod(&big_b, n) {
                continue;
            }

            self.identity = Some(identity.to_vec());
            self.salt = Some(record.salt.clone());
            self.verifier = Some(record.verifier);
            self.b = Some(b);
            self.big_a = Some(big_a);
            self.big_b = Some(big_b.clone());
            self.phase = ServerPhase::AwaitM1;
            return Ok((record.salt, big_b));
        }
    }

    /// `server_receive_M1(M1) -> M2`. On mismatch the session moves to
    /// `Failed` and the caller must emit no reply at all — returning the
    /// error is not itself the oracle risk, echoing it to the peer is, and
    /// that's the driver's responsibility to avoid.
    pub fn receive_m1(&mut self, m1: &Digest32) -> Result<Digest32, SrpError> {
        if self.phase != ServerPhase::AwaitM1 {
            self.phase = ServerPhase::Failed;
            return Err(SrpError::ProtocolOrder);
        }

        let big_a = self.big_a.clone().expect("set in receive_a");
        let big_b = self.big_b.clone().expect("set in receive_a");
        let verifier = self.verifier.clone().expect("set in receive_a");
        let b = self.b.clone().expect("set in receive_a");
        let salt = self.salt.clone().expect("set in receive_a");
        let identity = self.identity.clone().expect("set in receive_a");

        let u = compute_u(&self.group, &big_a, &big_b);
        if let Err(e) = validate_u(&u) {
            self.phase = ServerPhase::Failed;
            return Err(e);
        }

        let s = server_premaster_secret(&self.group, &big_a, &verifier, &u, &b);
        let session_key = compute_session_key(&self.group, &s);
        let expected_m1 = compute_m1(&self.group, &identity, &salt, &big_a, &big_b, &session_key);

        if !constant_time_eq(&expected_m1, m1) {
            self.phase = ServerPhase::Failed;
            return Err(SrpError::ProofMismatch);
        }

        let m2 = compute_m2(&self.group, &big_a, m1, &session_key);
        self.session_key = Some(session_key);
        self.phase = ServerPhase::Done;
        Ok(m2)
    }
}

/// A deterministic stand-in for an unknown identity's `(s, v)`, keyed off a
/// server-wide secret so the same unknown `I` always yields the same salt
/// (a fresh lookup of "ghost" looks the same on every attempt) while `v`
/// itself never needs to be plausible to anyone but this function, since no
/// real password will ever produce a matching M1 against it.
fn simulated_record(identity: &[u8], server_secret: &[u8], group: &GroupParams) -> UserRecord {
    let mut salt_hasher = hash::new();
    hash::update(&mut salt_hasher, server_secret);
    hash::update(&mut salt_hasher, identity);
    hash::update(&mut salt_hasher, b"srp6a-simulated-salt");
    let salt = hash::finish(salt_hasher).to_vec();

    let mut verifier_hasher = hash::new();
    hash::update(&mut verifier_hasher, server_secret);
    hash::update(&mut verifier_hasher, identity);
    hash::update(&mut verifier_hasher, b"srp6a-simulated-verifier");
    let verifier = BigUint::from_bytes_be(&hash::finish(verifier_hasher)) % group.n();

    UserRecord {
        identity: identity.to_vec(),
        salt,
        verifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::client::ClientSession;
    use crate::session::derive_verifier;

    fn enrolled_record(group: &GroupParams, identity: &[u8], salt: &[u8], password: &[u8]) -> UserRecord {
        let verifier = derive_verifier(group, identity, salt, password).unwrap();
        UserRecord {
            identity: identity.to_vec(),
            salt: salt.to_vec(),
            verifier,
        }
    }

    #[test]
    fn full_exchange_yields_matching_keys_and_proofs() {
        let group = Arc::new(GroupParams::default());
        let record = enrolled_record(&group, b"root", b"salt", b"1234");

        let mut client = ClientSession::new(group.clone(), b"root".to_vec());
        let mut server = ServerSession::new(group.clone());

        let (identity, big_a) = client.begin(b"1234").unwrap();
        let (salt, big_b) = server.receive_a(&identity, big_a, Some(record), b"server-secret").unwrap();
        let m1 = client.receive_b(&salt, big_b).unwrap();
        let m2 = server.receive_m1(&m1).unwrap();
        let client_key = client.receive_m2(&m2).unwrap();

        assert_eq!(client.phase(), crate::session::ClientPhase::Done);
        assert_eq!(server.phase(), ServerPhase::Done);
        assert_eq!(client_key, server.session_key().unwrap());
    }

    #[test]
    fn wrong_password_fails_server_m1_check_with_no_m2() {
        let group = Arc::new(GroupParams::default());
        let record = enrolled_record(&group, b"root", b"salt", b"1234");

        let mut client = ClientSession::new(group.clone(), b"root".to_vec());
        let mut server = ServerSession::new(group.clone());

        let (identity, big_a) = client.begin(b"wrong").unwrap();
        let (salt, big_b) = server.receive_a(&identity, big_a, Some(record), b"server-secret").unwrap();
        let m1 = client.receive_b(&salt, big_b).unwrap();
        let err = server.receive_m1(&m1).unwrap_err();

        assert_eq!(err, SrpError::ProofMismatch);
        assert_eq!(server.phase(), ServerPhase::Failed);
    }

    #[test]
    fn unknown_user_still_produces_a_plausible_reply() {
        let group = Arc::new(GroupParams::default());
        let mut server = ServerSession::new(group.clone());
        let big_a = group.g().modpow(&BigUint::from(7u32), group.n());

        let (salt, big_b) = server.receive_a(b"ghost", big_a, None, b"server-secret").unwrap();

        assert_eq!(salt.len(), 32);
        assert!(!is_zero_mod(&big_b, group.n()));
        assert_eq!(server.phase(), ServerPhase::AwaitM1);
    }

    #[test]
    fn malicious_a_zero_fails_immediately() {
        let group = Arc::new(GroupParams::default());
        let mut server = ServerSession::new(group.clone());

        let err = server.receive_a(b"root", BigUint::from(0u32), None, b"server-secret").unwrap_err();

        assert_eq!(err, SrpError::InvalidPublicValue);
        assert_eq!(server.phase(), ServerPhase::Failed);
    }

    #[test]
    fn replayed_m1_fails_against_a_fresh_session() {
        let group = Arc::new(GroupParams::default());
        let record = enrolled_record(&group, b"root", b"salt", b"1234");

        let mut client = ClientSession::new(group.clone(), b"root".to_vec());
        let mut first_server = ServerSession::new(group.clone());
        let (identity, big_a) = client.begin(b"1234").unwrap();
        let (salt, big_b) = first_server
            .receive_a(&identity, big_a, Some(record.clone()), b"server-secret")
            .unwrap();
        let replayed_m1 = client.receive_b(&salt, big_b).unwrap();

        let mut fresh_client = ClientSession::new(group.clone(), b"root".to_vec());
        let mut second_server = ServerSession::new(group.clone());
        let (identity2, big_a2) = fresh_client.begin(b"1234").unwrap();
        second_server
            .receive_a(&identity2, big_a2, Some(record), b"server-secret")
            .unwrap();

        let err = second_server.receive_m1(&replayed_m1).unwrap_err();
        assert_eq!(err, SrpError::ProofMismatch);
        assert_eq!(second_server.phase(), ServerPhase::Failed);
    }
}
