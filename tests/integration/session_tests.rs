//! Session lifecycle tests.

use std::collections::HashSet;
use std::time::Duration;

use base64::prelude::*;
use datagate::auth::{AccessClaims, TokenVerifier};
use datagate::permission::{GroupId, User, UserId, UserPermission};
use datagate::session::{SessionEventHandler, UserEvent};
use datagate::{ErrorKind, Reason};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tokio::sync::mpsc;

use crate::common::{ISSUER, ed25519_to_pem, group_fixture, manual_sessions, system_sessions};

fn permission(user: i64) -> UserPermission {
    UserPermission::new(UserId(user), [GroupId(1)], [GroupId(2)])
}

#[test]
fn test_access_token_verifies_with_jsonwebtoken() {
    let sessions = system_sessions().unwrap();
    let tokens = sessions
        .cache
        .issue("alice", vec!["ROLE_USER".into()], permission(7))
        .unwrap();

    let public_key = BASE64_URL_SAFE_NO_PAD.encode(sessions.signing_key.verifying_key().to_bytes());
    let key = DecodingKey::from_ed_components(&public_key).unwrap();
    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_issuer(&[ISSUER]);
    validation.validate_aud = false;

    let data = decode::<AccessClaims>(tokens.access_token.as_str(), &key, &validation).unwrap();
    assert_eq!(data.header.alg, Algorithm::EdDSA);
    assert_eq!(data.claims.sub, "alice");
    assert_eq!(data.claims.exp, tokens.access_expires_at);
    assert_eq!(data.claims.permission, permission(7));
}

#[test]
fn test_jsonwebtoken_issued_token_verifies_locally() {
    let sessions = system_sessions().unwrap();
    let pem = ed25519_to_pem(&sessions.signing_key.to_bytes());
    let now = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        sub: "bob".into(),
        iss: Some(ISSUER.into()),
        iat: now,
        exp: now + 60,
        jti: "external".into(),
        roles: vec![],
        permission: permission(8),
    };

    let token = encode(
        &Header::new(Algorithm::EdDSA),
        &claims,
        &EncodingKey::from_ed_pem(pem.as_bytes()).unwrap(),
    )
    .unwrap();

    assert_eq!(sessions.verifier.verify(&token).unwrap(), claims);
}

#[test]
fn test_foreign_token_with_unsorted_groups_is_normalized() {
    let sessions = system_sessions().unwrap();
    let pem = ed25519_to_pem(&sessions.signing_key.to_bytes());
    let now = chrono::Utc::now().timestamp();
    let claims = serde_json::json!({
        "sub": "carol",
        "iss": ISSUER,
        "iat": now,
        "exp": now + 60,
        "jti": "external",
        "permission": {"userId": 9, "adminGroupIds": [5, 2, 1], "userGroupIds": [7, 3]},
    });

    let token = encode(
        &Header::new(Algorithm::EdDSA),
        &claims,
        &EncodingKey::from_ed_pem(pem.as_bytes()).unwrap(),
    )
    .unwrap();

    let permission = sessions.verifier.verify(&token).unwrap().permission;
    assert!(permission.is_admin_of(GroupId(5)));
    assert!(permission.is_member_of(GroupId(7)));
    assert_eq!(permission.admin_group_ids, vec![GroupId(1), GroupId(2), GroupId(5)]);
}

#[test]
fn test_token_from_foreign_issuer_rejected() {
    let sessions = system_sessions().unwrap();
    let pem = ed25519_to_pem(&sessions.signing_key.to_bytes());
    let now = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        sub: "mallory".into(),
        iss: Some("elsewhere".into()),
        iat: now,
        exp: now + 60,
        jti: "external".into(),
        roles: vec![],
        permission: permission(8),
    };

    let token = encode(
        &Header::new(Algorithm::EdDSA),
        &claims,
        &EncodingKey::from_ed_pem(pem.as_bytes()).unwrap(),
    )
    .unwrap();

    let err = sessions.verifier.verify(&token).unwrap_err();
    assert_eq!(err.reason(), Some(Reason::InvalidToken));
}

#[tokio::test(start_paused = true)]
async fn test_full_session_lifecycle() {
    let sessions = manual_sessions().unwrap();
    let cache = &sessions.cache;

    let issued = cache.issue("alice", vec!["ROLE_USER".into()], permission(7)).unwrap();
    assert!(sessions.verifier.verify(&issued.access_token).is_ok());

    // Access token lapses, refresh token still good.
    sessions.clock.advance(chrono::Duration::seconds(301));
    assert_eq!(
        sessions.verifier.verify(&issued.access_token).unwrap_err().kind(),
        ErrorKind::AuthenticationRejected
    );
    let rotated = cache.refresh(&issued.refresh_token).unwrap();
    assert!(sessions.verifier.verify(&rotated.access_token).is_ok());

    // The old refresh token survives the grace delay, then disappears.
    assert!(cache.contains(&issued.refresh_token));
    tokio::time::sleep(Duration::from_secs(6)).await;
    tokio::task::yield_now().await;
    assert!(!cache.contains(&issued.refresh_token));

    cache.logout(&rotated.refresh_token).unwrap();
    assert_eq!(
        cache.refresh(&rotated.refresh_token).unwrap_err().kind(),
        ErrorKind::AuthenticationRejected
    );
    assert!(cache.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_within_grace_delay() {
    let sessions = system_sessions().unwrap();
    let issued = sessions.cache.issue("alice", vec![], permission(7)).unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = sessions.cache.clone();
        let token = issued.refresh_token.clone();
        handles.push(tokio::task::spawn_blocking(move || cache.refresh(&token)));
    }

    let mut refresh_tokens = HashSet::new();
    let mut access_tokens = HashSet::new();
    for handle in handles {
        let tokens = handle.await.unwrap().unwrap();
        refresh_tokens.insert(tokens.refresh_token);
        access_tokens.insert(tokens.access_token);
    }

    // Every racer succeeds, but the session is rotated only once.
    assert_eq!(refresh_tokens.len(), 1);
    assert_eq!(access_tokens.len(), 8);
    assert_eq!(sessions.cache.len(), 2);
}

#[test]
fn test_malformed_refresh_token() {
    let sessions = system_sessions().unwrap();
    for token in ["", "abc", "00000000-0000-0000-0000-00000000000g"] {
        let err = sessions.cache.refresh(token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParameter);
        assert_eq!(err.reason(), Some(Reason::MalformedToken));
    }
}

#[tokio::test]
async fn test_user_events_reach_live_sessions() {
    let sessions = manual_sessions().unwrap();
    let (resolver, _) = group_fixture();
    let handler = SessionEventHandler::new(resolver.clone(), sessions.cache.clone());

    let alice = User::new(UserId(7), "alice").with_groups([GroupId(2)]);
    let bob = User::new(UserId(8), "bob").with_groups([GroupId(2), GroupId(3)]);
    let alice_tokens = sessions
        .cache
        .issue("alice", vec![], resolver.build_permission(&alice).unwrap())
        .unwrap();
    sessions
        .cache
        .issue("bob", vec![], resolver.build_permission(&bob).unwrap())
        .unwrap();

    let (tx, rx) = mpsc::channel(4);
    let task = handler.spawn(rx);
    let promoted = alice.clone().with_roles(["ROLE_ADMIN"]).with_groups([GroupId(1)]);
    tx.send(UserEvent::Updated(promoted)).await.unwrap();
    tx.send(UserEvent::Deleted(UserId(8))).await.unwrap();
    drop(tx);
    task.await.unwrap();

    assert_eq!(sessions.cache.len(), 1);
    let refreshed = sessions.cache.refresh(&alice_tokens.refresh_token).unwrap();
    let claims = sessions.verifier.verify(&refreshed.access_token).unwrap();
    assert_eq!(claims.roles, vec!["ROLE_ADMIN".to_string()]);
    assert_eq!(claims.permission.admin_group_ids, vec![GroupId(1)]);
    assert_eq!(claims.permission.user_group_ids, vec![GroupId(2)]);
}
