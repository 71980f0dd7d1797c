//! Client driver: begin, receive auth.1 reply, receive auth.2 reply.

use std::sync::Arc;

use crate::group::GroupParams;
use crate::session::{ClientPhase, ClientSession, Digest32};

use super::{Auth1Reply, Auth1Request, Auth2Reply, Auth2Request, DriverError};

/// Owns one `ClientSession` for the lifetime of one authentication
/// exchange. The terminal verdict is the `Result` of
/// [`ClientDriver::receive_auth2_reply`]: `Ok(K)` is `Authenticated(K)`,
/// `Err(reason)` is `Failed(reason)`.
pub struct ClientDriver {
    session: ClientSession,
}

impl ClientDriver {
    pub fn new(group: Arc<GroupParams>, identity: impl Into<Vec<u8>>) -> Self {
        ClientDriver {
            session: ClientSession::new(group, identity),
        }
    }

    pub fn phase(&self) -> ClientPhase {
        self.session.phase()
    }

    /// Step 1: sample `a`, emit the outbound auth.1 request.
    pub fn begin(&mut self, password: &[u8]) -> Result<Auth1Request, DriverError> {
        let (identity, big_a) = self.session.begin(password)?;
        Ok(Auth1Request { identity, big_a })
    }

    /// Step 2: consume the server's auth.1 reply, emit the outbound auth.2
    /// request (M1).
    pub fn receive_auth1_reply(&mut self, reply: Auth1Reply) -> Result<Auth2Request, DriverError> {
        let m1 = self.session.receive_b(&reply.salt, reply.big_b)?;
        Ok(Auth2Request { m1 })
    }

    /// Step 3: consume the server's auth.2 reply (M2). `Ok` carries the
    /// shared session key; this session has reached `DONE`.
    pub fn receive_auth2_reply(&mut self, reply: Auth2Reply) -> Result<Digest32, DriverError> {
        match self.session.receive_m2(&reply.m2) {
            Ok(key) => Ok(key),
            Err(e) => {
                tracing::debug!("server proof did not verify: {e}");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupParams;

    #[test]
    fn out_of_order_auth2_before_auth1_reply_is_rejected() {
        let group = Arc::new(GroupParams::default());
        let mut driver = ClientDriver::new(group, b"root".to_vec());
        driver.begin(b"1234").unwrap();

        let err = driver.receive_auth2_reply(Auth2Reply { m2: [0u8; 32] }).unwrap_err();
        assert_eq!(err, DriverError::Session(crate::error::SrpError::ProtocolOrder));
        assert_eq!(driver.phase(), ClientPhase::Failed);
    }
}
