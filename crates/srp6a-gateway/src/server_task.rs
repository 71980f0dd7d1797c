//! Per-connection server handler — the gateway's analogue of the teacher's
//! `auth_socket::handle_client`: one task per accepted connection, reading
//! and writing framed messages in lockstep with the driver's phase. Unlike
//! the teacher's WoW dispatch loop (several command kinds, realm list,
//! reconnect), there are exactly two request/reply round-trips here, so
//! the whole exchange fits in one straight-line function.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;

use srp6a::{GroupParams, ServerDriver, ServerDriverConfig};

use crate::store::UserStore;
use crate::wire;

#[derive(Clone)]
pub struct ServerTaskConfig {
    pub group: Arc<GroupParams>,
    pub driver_config: ServerDriverConfig,
    pub exchange_timeout: Duration,
}

/// Handle one connection end to end. Never panics on a remote peer's bad
/// input — every failure path logs and returns, closing the connection.
pub async fn handle_client(mut stream: TcpStream, addr: SocketAddr, store: UserStore, config: ServerTaskConfig) {
    tracing::debug!("new connection from {addr}");

    let mut driver = ServerDriver::new(config.group.clone(), config.driver_config.clone());

    match timeout(config.exchange_timeout, run_exchange(&mut stream, &mut driver, &store, &config.group)).await {
        Ok(Ok(())) => {
            tracing::info!("{addr} authenticated, phase {:?}", driver.phase());
        }
        Ok(Err(e)) => {
            tracing::debug!("{addr} exchange failed: {e}");
        }
        Err(_) => {
            tracing::debug!("{addr} exchange timed out, phase {:?}", driver.phase());
        }
    }
}

async fn run_exchange(
    stream: &mut TcpStream,
    driver: &mut ServerDriver,
    store: &UserStore,
    group: &GroupParams,
) -> anyhow::Result<()> {
    let req1 = wire::read_auth1_request(stream, group).await?;
    let record = store.lookup(&req1.identity);

    // A rejection here (invalid A, or UnknownUser with enumeration
    // resistance off) means nothing has been written to the wire yet —
    // closing the connection without a reply is the entire response.
    let reply1 = driver.receive_auth1_request(req1, record)?;
    wire::write_auth1_reply(stream, group, &reply1).await?;

    let req2 = wire::read_auth2_request(stream).await?;

    // Same here: on a proof mismatch the design requires the server not
    // echo any distinguishing response, so a failed `receive_auth2_request`
    // propagates up to a plain closed connection, same as any other error.
    let reply2 = driver.receive_auth2_request(req2)?;
    wire::write_auth2_reply(stream, &reply2).await?;

    Ok(())
}
