//! In-memory user record store — the `lookup(I) -> Option<UserRecord>`
//! capability the core asks for, with nothing resembling the teacher's
//! `sqlx`-backed `Database` behind it. Persistence is explicitly outside
//! this system's scope; this exists only so the demo server has somewhere
//! to put verifiers created by the `enroll` subcommand.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

use num_bigint::BigUint;
use parking_lot::RwLock;
use srp6a::{derive_verifier, GroupParams, SrpError, UserRecord};

#[derive(Clone, Default)]
pub struct UserStore {
    records: Arc<RwLock<HashMap<Vec<u8>, UserRecord>>>,
}

impl UserStore {
    pub fn new() -> Self {
        UserStore::default()
    }

    pub fn lookup(&self, identity: &[u8]) -> Option<UserRecord> {
        self.records.read().get(identity).cloned()
    }

    /// Enrollment: derive v = g^x mod N from (I, s, p) and store (I, s, v).
    /// The password itself never enters this store.
    pub fn enroll(&self, group: &GroupParams, identity: &[u8], salt: Vec<u8>, password: &[u8]) -> Result<(), SrpError> {
        let verifier = derive_verifier(group, identity, &salt, password)?;
        let record = UserRecord {
            identity: identity.to_vec(),
            salt,
            verifier,
        };
        self.records.write().insert(identity.to_vec(), record);
        Ok(())
    }

    /// Load `identity:salt_hex:verifier_hex` lines written by the `enroll`
    /// subcommand into a fresh store. Missing file is not an error — a
    /// freshly set up server just starts with no enrolled users.
    pub fn load_from_file(path: &str) -> io::Result<Self> {
        let store = UserStore::new();
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(store),
            Err(e) => return Err(e),
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(3, ':');
            let (Some(identity), Some(salt_hex), Some(verifier_hex)) = (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            let Ok(salt) = decode_hex(salt_hex) else { continue };
            let Ok(verifier_bytes) = decode_hex(verifier_hex) else { continue };
            let record = UserRecord {
                identity: identity.as_bytes().to_vec(),
                salt,
                verifier: BigUint::from_bytes_be(&verifier_bytes),
            };
            store.records.write().insert(record.identity.clone(), record);
        }

        Ok(store)
    }

    /// Append one freshly enrolled record to the users file in the same
    /// format `load_from_file` reads.
    pub fn append_record_to_file(path: &str, record: &UserRecord) -> io::Result<()> {
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(
            file,
            "{}:{}:{}",
            String::from_utf8_lossy(&record.identity),
            encode_hex(&record.salt),
            encode_hex(&record.verifier.to_bytes_be()),
        )
    }
}

pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn decode_hex(s: &str) -> Result<Vec<u8>, std::num::ParseIntError> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrolled_user_is_found_and_unknown_user_is_not() {
        let group = GroupParams::default();
        let store = UserStore::new();
        store.enroll(&group, b"root", b"salt".to_vec(), b"1234").unwrap();

        assert!(store.lookup(b"root").is_some());
        assert!(store.lookup(b"ghost").is_none());
    }
}
