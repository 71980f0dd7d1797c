//! Server driver: receive auth.1 request, receive auth.2 request.
//!
//! The lookup itself stays outside this crate — the design describes it as
//! an abstract `lookup(I) -> Option<UserRecord>` capability the driver's
//! host application may implement synchronously or by suspending (e.g. a
//! database round-trip); since suspension is only ever permitted between
//! messages anyway, the caller resolves the lookup before calling
//! [`ServerDriver::receive_auth1_request`] rather than this type holding a
//! callback of its own.

use std::sync::Arc;

use crate::group::GroupParams;
use crate::session::{Digest32, ServerPhase, ServerSession, UserRecord};

use super::{Auth1Reply, Auth1Request, Auth2Reply, Auth2Request, DriverError};

/// The two configuration options the design assigns to the server driver
/// (the remaining ones in the design — `group`, `hash`, `kdf` — are fixed
/// per `GroupParams`/the primitives module, not per-exchange).
#[derive(Debug, Clone)]
pub struct ServerDriverConfig {
    /// Default on: an unrecognized identity still gets a plausible `(s, B)`
    /// reply and fails only at M1, indistinguishable in shape and timing
    /// from a real user with a wrong password.
    pub user_enumeration_resistance: bool,

    /// Keys the deterministic simulated record. Must be a real per-process
    /// secret in production; the `Default` impl below leaves it empty,
    /// which is safe only because an empty secret still yields a
    /// deterministic (if guessable) simulated record — callers that care
    /// about resisting a determined enumeration attacker must supply their
    /// own.
    pub server_secret: Vec<u8>,
}

impl Default for ServerDriverConfig {
    fn default() -> Self {
        ServerDriverConfig {
            user_enumeration_resistance: true,
            server_secret: Vec::new(),
        }
    }
}

/// Owns one `ServerSession` for the lifetime of one authentication
/// exchange.
pub struct ServerDriver {
    session: ServerSession,
    config: ServerDriverConfig,
}

impl ServerDriver {
    pub fn new(group: Arc<GroupParams>, config: ServerDriverConfig) -> Self {
        ServerDriver {
            session: ServerSession::new(group),
            config,
        }
    }

    pub fn phase(&self) -> ServerPhase {
        self.session.phase()
    }

    pub fn session_key(&self) -> Option<Digest32> {
        self.session.session_key()
    }

    /// Step 1: consume the client's auth.1 request plus the caller's
    /// already-resolved `lookup(I)` result, emit the outbound auth.1 reply.
    pub fn receive_auth1_request(
        &mut self,
        request: Auth1Request,
        record: Option<UserRecord>,
    ) -> Result<Auth1Reply, DriverError> {
        if record.is_none() && !self.config.user_enumeration_resistance {
            self.session.fail();
            tracing::debug!("rejecting unknown identity, enumeration resistance is off");
            return Err(DriverError::UnknownUser);
        }

        let result =
            self.session
                .receive_a(&request.identity, request.big_a, record, &self.config.server_secret);
        if let Err(ref e) = result {
            tracing::debug!("auth.1 request rejected: {e}");
        }
        let (salt, big_b) = result?;
        Ok(Auth1Reply { salt, big_b })
    }

    /// Step 2: consume the client's auth.2 request (M1), emit the outbound
    /// auth.2 reply (M2) on a verified match. This session has reached
    /// `DONE`; on mismatch it returns `Err` and has reached `FAILED` — the
    /// caller MUST NOT send any reply in that case (closing the transport
    /// instead), since a distinguishing error response is itself an oracle.
    pub fn receive_auth2_request(&mut self, request: Auth2Request) -> Result<Auth2Reply, DriverError> {
        let m2 = match self.session.receive_m1(&request.m1) {
            Ok(m2) => m2,
            Err(e) => {
                tracing::debug!("auth.2 proof check failed, closing without a reply: {e}");
                return Err(e.into());
            }
        };
        Ok(Auth2Reply { m2 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::client::ClientDriver;
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
    fn full_exchange_through_drivers_reaches_done_with_matching_keys() {
        let group = Arc::new(GroupParams::default());
        let record = enrolled_record(&group, b"root", b"salt", b"1234");

        let mut client = ClientDriver::new(group.clone(), b"root".to_vec());
        let mut server = ServerDriver::new(group.clone(), ServerDriverConfig::default());

        let auth1_req = client.begin(b"1234").unwrap();
        let auth1_reply = server.receive_auth1_request(auth1_req, Some(record)).unwrap();
        let auth2_req = client.receive_auth1_reply(auth1_reply).unwrap();
        let auth2_reply = server.receive_auth2_request(auth2_req).unwrap();
        let client_key = client.receive_auth2_reply(auth2_reply).unwrap();

        assert_eq!(server.phase(), ServerPhase::Done);
        assert_eq!(client_key, server.session_key().unwrap());
    }

    #[test]
    fn enumeration_resistance_off_rejects_unknown_user_immediately() {
        let group = Arc::new(GroupParams::default());
        let config = ServerDriverConfig {
            user_enumeration_resistance: false,
            server_secret: b"s".to_vec(),
        };
        let mut server = ServerDriver::new(group.clone(), config);

        let req = Auth1Request {
            identity: b"ghost".to_vec(),
            big_a: group.g().modpow(&num_bigint::BigUint::from(9u32), group.n()),
        };
        let err = server.receive_auth1_request(req, None).unwrap_err();

        assert_eq!(err, DriverError::UnknownUser);
        assert_eq!(server.phase(), ServerPhase::Failed);
    }
}
