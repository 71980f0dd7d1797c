//! Drives one client-side exchange over TCP — the counterpart the `client`
//! subcommand uses to exercise a running server manually, the way the
//! teacher's own process is always the server side and leans on a real
//! WoW client for the other end. This crate has no external client to
//! borrow, so it provides a minimal one of its own.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpStream;

use srp6a::{ClientDriver, Digest32, GroupParams};

use crate::wire;

pub async fn run_client(
    addr: SocketAddr,
    group: Arc<GroupParams>,
    identity: &[u8],
    password: &[u8],
) -> anyhow::Result<Digest32> {
    let mut stream = TcpStream::connect(addr).await.context("connecting to server")?;

    let mut driver = ClientDriver::new(group.clone(), identity.to_vec());

    let req1 = driver.begin(password)?;
    wire::write_auth1_request(&mut stream, &group, &req1).await?;

    let reply1 = wire::read_auth1_reply(&mut stream, &group).await?;
    let req2 = driver.receive_auth1_reply(reply1)?;
    wire::write_auth2_request(&mut stream, &req2).await?;

    let reply2 = wire::read_auth2_reply(&mut stream).await?;
    let key = driver.receive_auth2_reply(reply2)?;

    Ok(key)
}
