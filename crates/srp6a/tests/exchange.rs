//! End-to-end exchanges driven entirely through the public driver API, the
//! way a real client and server would see each other — covering the
//! concrete scenarios enumerated in the design rather than unit-level
//! arithmetic (that lives alongside the modules it tests).

use std::sync::Arc;

use srp6a::{
    Auth1Request, ClientDriver, ClientPhase, DriverError, GroupParams, ServerDriver,
    ServerDriverConfig, ServerPhase, SrpError, UserRecord, derive_verifier,
};

fn group() -> Arc<GroupParams> {
    Arc::new(GroupParams::default())
}

fn enroll(group: &GroupParams, identity: &[u8], salt: &[u8], password: &[u8]) -> UserRecord {
    let verifier = derive_verifier(group, identity, salt, password).unwrap();
    UserRecord {
        identity: identity.to_vec(),
        salt: salt.to_vec(),
        verifier,
    }
}

#[test]
fn happy_path_both_sides_reach_done_with_matching_key() {
    let group = group();
    let record = enroll(&group, b"root", b"salt", b"1234");

    let mut client = ClientDriver::new(group.clone(), b"root".to_vec());
    let mut server = ServerDriver::new(group.clone(), ServerDriverConfig::default());

    let req1 = client.begin(b"1234").unwrap();
    let reply1 = server.receive_auth1_request(req1, Some(record)).unwrap();
    let req2 = client.receive_auth1_reply(reply1).unwrap();
    let reply2 = server.receive_auth2_request(req2).unwrap();
    let client_key = client.receive_auth2_reply(reply2).unwrap();

    assert_eq!(client.phase(), ClientPhase::Done);
    assert_eq!(server.phase(), ServerPhase::Done);
    assert_eq!(client_key, server.session_key().unwrap());
}

#[test]
fn wrong_password_fails_at_server_m1_check_and_emits_no_m2() {
    let group = group();
    let record = enroll(&group, b"root", b"salt", b"1234");

    let mut client = ClientDriver::new(group.clone(), b"root".to_vec());
    let mut server = ServerDriver::new(group.clone(), ServerDriverConfig::default());

    let req1 = client.begin(b"wrong").unwrap();
    let reply1 = server.receive_auth1_request(req1, Some(record)).unwrap();
    let req2 = client.receive_auth1_reply(reply1).unwrap();
    let err = server.receive_auth2_request(req2).unwrap_err();

    assert_eq!(err, DriverError::Session(SrpError::ProofMismatch));
    assert_eq!(server.phase(), ServerPhase::Failed);
}

#[test]
fn unknown_user_with_enumeration_resistance_on_still_proceeds_to_m1_failure() {
    let group = group();
    let mut server = ServerDriver::new(group.clone(), ServerDriverConfig::default());

    let mut client = ClientDriver::new(group.clone(), b"ghost".to_vec());
    let req1 = client.begin(b"whatever").unwrap();
    let reply1 = server.receive_auth1_request(req1, None).unwrap();

    assert_eq!(reply1.salt.len(), 32);
    assert_eq!(server.phase(), ServerPhase::AwaitM1);

    let req2 = client.receive_auth1_reply(reply1).unwrap();
    let err = server.receive_auth2_request(req2).unwrap_err();
    assert_eq!(err, DriverError::Session(SrpError::ProofMismatch));
    assert_eq!(server.phase(), ServerPhase::Failed);
}

#[test]
fn malicious_a_zero_fails_before_any_reply_is_produced() {
    let group = group();
    let mut server = ServerDriver::new(group.clone(), ServerDriverConfig::default());

    let req = Auth1Request {
        identity: b"root".to_vec(),
        big_a: num_bigint::BigUint::from(0u32),
    };
    let err = server.receive_auth1_request(req, None).unwrap_err();

    assert_eq!(err, DriverError::Session(SrpError::InvalidPublicValue));
    assert_eq!(server.phase(), ServerPhase::Failed);
}

#[test]
fn replayed_m1_is_rejected_against_a_fresh_server_session() {
    let group = group();
    let record = enroll(&group, b"root", b"salt", b"1234");

    let mut client = ClientDriver::new(group.clone(), b"root".to_vec());
    let mut first_server = ServerDriver::new(group.clone(), ServerDriverConfig::default());
    let req1 = client.begin(b"1234").unwrap();
    let reply1 = first_server.receive_auth1_request(req1, Some(record.clone())).unwrap();
    let replayed = client.receive_auth1_reply(reply1).unwrap();

    let mut fresh_client = ClientDriver::new(group.clone(), b"root".to_vec());
    let mut second_server = ServerDriver::new(group.clone(), ServerDriverConfig::default());
    let req1b = fresh_client.begin(b"1234").unwrap();
    second_server.receive_auth1_request(req1b, Some(record)).unwrap();

    let err = second_server.receive_auth2_request(replayed).unwrap_err();
    assert_eq!(err, DriverError::Session(SrpError::ProofMismatch));
    assert_eq!(second_server.phase(), ServerPhase::Failed);
}

#[test]
fn out_of_order_m1_before_b_is_rejected_with_protocol_order() {
    let group = group();
    let mut client = ClientDriver::new(group.clone(), b"root".to_vec());
    client.begin(b"1234").unwrap();

    let premature = srp6a::Auth2Reply { m2: [0u8; 32] };
    let err = client.receive_auth2_reply(premature).unwrap_err();

    assert_eq!(err, DriverError::Session(SrpError::ProtocolOrder));
    assert_eq!(client.phase(), ClientPhase::Failed);
}

#[test]
fn derive_verifier_is_idempotent_across_calls() {
    let group = group();
    let v1 = derive_verifier(&group, b"root", b"salt", b"1234").unwrap();
    let v2 = derive_verifier(&group, b"root", b"salt", b"1234").unwrap();
    assert_eq!(v1, v2);
}

#[test]
fn ephemeral_public_values_differ_across_runs() {
    let group = group();
    let mut a = ClientDriver::new(group.clone(), b"root".to_vec());
    let mut b = ClientDriver::new(group, b"root".to_vec());

    let req_a = a.begin(b"1234").unwrap();
    let req_b = b.begin(b"1234").unwrap();

    assert_ne!(req_a.big_a, req_b.big_a);
}
