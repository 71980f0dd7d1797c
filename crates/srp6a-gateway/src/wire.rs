//! Wire framing: one byte tag, a 2-byte big-endian length, then the
//! payload. Plays the role the teacher's `ByteBuffer` plays for its WoW
//! packets, but over `tokio`'s async `AsyncRead`/`AsyncWrite` directly —
//! `read_u8`/`read_u16`/`write_u16` already read and write network
//! (big-endian) byte order, so there's no need for a byte-buffer
//! abstraction or the `byteorder` crate the teacher reaches for on top of
//! its synchronous sockets.
//!
//! Big integers (`A`, `B`) are encoded as the fixed-width big-endian byte
//! string the core's own hashing already requires (`GroupParams::pad`);
//! `M1`/`M2` are always exactly 32 bytes.

use std::io;

use srp6a::{bignum, Auth1Reply, Auth1Request, Auth2Reply, Auth2Request, GroupParams};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const TAG_AUTH1_REQUEST: u8 = 0x01;
pub const TAG_AUTH1_REPLY: u8 = 0x02;
pub const TAG_AUTH2_REQUEST: u8 = 0x03;
pub const TAG_AUTH2_REPLY: u8 = 0x04;

fn invalid_data(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

async fn write_frame<W: AsyncWrite + Unpin>(w: &mut W, tag: u8, payload: &[u8]) -> io::Result<()> {
    w.write_u8(tag).await?;
    w.write_u16(payload.len() as u16).await?;
    w.write_all(payload).await?;
    w.flush().await
}

async fn read_frame<R: AsyncRead + Unpin>(r: &mut R, expected_tag: u8) -> io::Result<Vec<u8>> {
    let tag = r.read_u8().await?;
    let len = r.read_u16().await?;
    let mut payload = vec![0u8; len as usize];
    r.read_exact(&mut payload).await?;
    if tag != expected_tag {
        return Err(invalid_data(&format!("expected frame tag {expected_tag:#04x}, got {tag:#04x}")));
    }
    Ok(payload)
}

pub async fn write_auth1_request<W: AsyncWrite + Unpin>(
    w: &mut W,
    group: &GroupParams,
    req: &Auth1Request,
) -> io::Result<()> {
    let mut payload = Vec::with_capacity(2 + req.identity.len() + group.byte_len());
    payload.extend_from_slice(&(req.identity.len() as u16).to_be_bytes());
    payload.extend_from_slice(&req.identity);
    payload.extend_from_slice(&group.pad(&req.big_a));
    write_frame(w, TAG_AUTH1_REQUEST, &payload).await
}

pub async fn read_auth1_request<R: AsyncRead + Unpin>(r: &mut R, group: &GroupParams) -> io::Result<Auth1Request> {
    let payload = read_frame(r, TAG_AUTH1_REQUEST).await?;
    if payload.len() < 2 {
        return Err(invalid_data("truncated auth.1 request"));
    }
    let id_len = u16::from_be_bytes([payload[0], payload[1]]) as usize;
    let rest = &payload[2..];
    if rest.len() != id_len + group.byte_len() {
        return Err(invalid_data("malformed auth.1 request length"));
    }
    let identity = rest[..id_len].to_vec();
    let big_a = bignum::unpad(&rest[id_len..]);
    Ok(Auth1Request { identity, big_a })
}

pub async fn write_auth1_reply<W: AsyncWrite + Unpin>(
    w: &mut W,
    group: &GroupParams,
    reply: &Auth1Reply,
) -> io::Result<()> {
    let mut payload = Vec::with_capacity(2 + reply.salt.len() + group.byte_len());
    payload.extend_from_slice(&(reply.salt.len() as u16).to_be_bytes());
    payload.extend_from_slice(&reply.salt);
    payload.extend_from_slice(&group.pad(&reply.big_b));
    write_frame(w, TAG_AUTH1_REPLY, &payload).await
}

pub async fn read_auth1_reply<R: AsyncRead + Unpin>(r: &mut R, group: &GroupParams) -> io::Result<Auth1Reply> {
    let payload = read_frame(r, TAG_AUTH1_REPLY).await?;
    if payload.len() < 2 {
        return Err(invalid_data("truncated auth.1 reply"));
    }
    let salt_len = u16::from_be_bytes([payload[0], payload[1]]) as usize;
    let rest = &payload[2..];
    if rest.len() != salt_len + group.byte_len() {
        return Err(invalid_data("malformed auth.1 reply length"));
    }
    let salt = rest[..salt_len].to_vec();
    let big_b = bignum::unpad(&rest[salt_len..]);
    Ok(Auth1Reply { salt, big_b })
}

pub async fn write_auth2_request<W: AsyncWrite + Unpin>(w: &mut W, req: &Auth2Request) -> io::Result<()> {
    write_frame(w, TAG_AUTH2_REQUEST, &req.m1).await
}

pub async fn read_auth2_request<R: AsyncRead + Unpin>(r: &mut R) -> io::Result<Auth2Request> {
    let payload = read_frame(r, TAG_AUTH2_REQUEST).await?;
    let m1 = payload
        .as_slice()
        .try_into()
        .map_err(|_| invalid_data("auth.2 request is not a 32-byte proof"))?;
    Ok(Auth2Request { m1 })
}

pub async fn write_auth2_reply<W: AsyncWrite + Unpin>(w: &mut W, reply: &Auth2Reply) -> io::Result<()> {
    write_frame(w, TAG_AUTH2_REPLY, &reply.m2).await
}

pub async fn read_auth2_reply<R: AsyncRead + Unpin>(r: &mut R) -> io::Result<Auth2Reply> {
    let payload = read_frame(r, TAG_AUTH2_REPLY).await?;
    let m2 = payload
        .as_slice()
        .try_into()
        .map_err(|_| invalid_data("auth.2 reply is not a 32-byte proof"))?;
    Ok(Auth2Reply { m2 })
}
