//! Permission resolution against an in-memory group store.

use datagate::ErrorKind;
use datagate::permission::{Group, GroupId, User, UserId};
use test_case::test_case;

use crate::common::group_fixture;

#[test_case(7, &[1, 2], &[1], &[2] ; "admin of one member of another")]
#[test_case(8, &[2, 3], &[], &[2, 3] ; "plain member")]
#[test_case(8, &[], &[], &[] ; "no groups")]
fn test_build_permission(user: i64, claimed: &[i64], admin: &[i64], member: &[i64]) {
    let (resolver, _) = group_fixture();
    let subject = User::new(UserId(user), "user").with_groups(claimed.iter().copied().map(GroupId));

    let permission = resolver.build_permission(&subject).unwrap();
    assert_eq!(permission.user_id, subject.id);
    assert_eq!(permission.admin_group_ids, admin.iter().copied().map(GroupId).collect::<Vec<_>>());
    assert_eq!(permission.user_group_ids, member.iter().copied().map(GroupId).collect::<Vec<_>>());
}

#[test]
fn test_claim_without_membership_is_critical() {
    let (resolver, _) = group_fixture();
    let user = User::new(UserId(7), "alice").with_groups([GroupId(2), GroupId(3)]);

    let err = resolver.build_permission(&user).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CriticalConstraint);
    assert!(!err.is_retriable());
}

#[test]
fn test_group_edits_are_seen_by_the_next_resolution() {
    let (resolver, repository) = group_fixture();
    let user = User::new(UserId(8), "bob").with_groups([GroupId(3)]);
    assert_eq!(resolver.build_permission(&user).unwrap().user_group_ids, vec![GroupId(3)]);

    repository.insert(Group::new(GroupId(3), "support").with_admins([UserId(8)]));
    let permission = resolver.build_permission(&user).unwrap();
    assert_eq!(permission.admin_group_ids, vec![GroupId(3)]);
    assert!(permission.is_member_of(GroupId(3)));
}

#[test]
fn test_storage_failures_propagate() {
    let (resolver, repository) = group_fixture();
    repository.fail_with("connection reset");
    let user = User::new(UserId(7), "alice").with_groups([GroupId(1)]);

    let err = resolver.build_permission(&user).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(err.is_retriable());
}
