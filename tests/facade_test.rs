//! End-to-end facade tests over in-memory stores.

mod common;

use access_admin::domain::{CreateBranch, CreatePermissionSet, CreateRole, CreateUser};
use access_admin::errors::AppError;

use common::{seeded_permission, Harness, ADMIN_ID, CHECKER_ID};

const IP: &str = "203.0.113.7";

fn branch_payload(sol_id: &str, name: &str) -> CreateBranch {
    CreateBranch {
        sol_id: sol_id.to_string(),
        name: name.to_string(),
        active: true,
    }
}

fn user_payload(username: &str, pf_no: &str, branch_id: i64, role_id: i64) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        gender: "F".to_string(),
        pf_no: pf_no.to_string(),
        email: format!("{}@example.com", username),
        password: "hunter2secret".to_string(),
        branch_id,
        role_id,
    }
}

#[tokio::test]
async fn user_lifecycle_end_to_end() {
    let h = Harness::new();

    let branch = h
        .facade
        .create_branch(branch_payload("001", "Head Office"), ADMIN_ID, IP)
        .await
        .unwrap();
    let role = h
        .facade
        .create_role(
            CreateRole {
                name: "Teller".to_string(),
                description: None,
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();

    let created = h
        .facade
        .create_user(
            user_payload("jdoe", "PF100", branch.id, role.id),
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();

    // PII is readable in the response but ciphertext at rest
    assert_eq!(created.email, "jdoe@example.com");
    assert_eq!(created.first_name, "Jane");
    let stored = h.users.get(created.id).unwrap();
    assert_ne!(stored.email, "jdoe@example.com");
    assert_ne!(stored.first_name, "Jane");
    assert_ne!(stored.password_hash, "hunter2secret");

    // New users start inactive and unverified, stamped with the actor
    assert!(!created.active);
    assert!(!created.verified);
    assert_eq!(created.created_by, "admin");

    // The creator cannot verify their own record
    let err = h
        .facade
        .verify_user(created.id, ADMIN_ID, IP)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Client(_)));

    // A different administrator can; verification also activates
    let verified = h
        .facade
        .verify_user(created.id, CHECKER_ID, IP)
        .await
        .unwrap();
    assert!(verified.verified);
    assert!(verified.active);
    assert_eq!(verified.verified_by.as_deref(), Some("checker"));

    let deactivated = h
        .facade
        .activate_user(created.id, false, ADMIN_ID, IP)
        .await
        .unwrap();
    assert!(!deactivated.active);
}

#[tokio::test]
async fn soft_deleted_user_is_terminal() {
    let h = Harness::new();

    let branch = h
        .facade
        .create_branch(branch_payload("002", "East"), ADMIN_ID, IP)
        .await
        .unwrap();
    let role = h
        .facade
        .create_role(
            CreateRole {
                name: "Clerk".to_string(),
                description: None,
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();
    let created = h
        .facade
        .create_user(
            user_payload("terminal", "PF200", branch.id, role.id),
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();

    h.facade
        .delete_user(created.id, ADMIN_ID, IP)
        .await
        .unwrap();

    let stored = h.users.get(created.id).unwrap();
    assert!(stored.deleted);
    assert!(!stored.active);
    assert!(!stored.verified);

    // No operation can touch the record afterwards
    let err = h
        .facade
        .activate_user(created.id, true, ADMIN_ID, IP)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotActive { .. }));
    let err = h
        .facade
        .verify_user(created.id, CHECKER_ID, IP)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotActive { .. }));
}

#[tokio::test]
async fn branch_soft_delete_preserves_active_flag() {
    let h = Harness::new();

    let branch = h
        .facade
        .create_branch(branch_payload("020", "South"), ADMIN_ID, IP)
        .await
        .unwrap();

    h.facade
        .delete_branch(branch.id, ADMIN_ID, IP)
        .await
        .unwrap();

    let stored = h.branches.get(branch.id).unwrap();
    assert!(stored.deleted);
    assert!(stored.active);
}

#[tokio::test]
async fn duplicate_sol_id_reported_before_duplicate_name() {
    let h = Harness::new();

    h.facade
        .create_branch(branch_payload("010", "Alpha"), ADMIN_ID, IP)
        .await
        .unwrap();

    // Both keys collide; the sol id wins
    let err = h
        .facade
        .create_branch(branch_payload("010", "Alpha"), ADMIN_ID, IP)
        .await
        .unwrap_err();
    match err {
        AppError::Conflict { field, value, .. } => {
            assert_eq!(field, "SolId");
            assert_eq!(value, "010");
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn unresolved_actor_leaves_no_trace() {
    let h = Harness::new();

    let err = h
        .facade
        .create_branch(branch_payload("003", "Ghost"), 999, IP)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    assert_eq!(h.branches.count(), 0);
    assert_eq!(h.logs.count(), 0);
}

#[tokio::test]
async fn mutations_are_audited_with_actor_and_origin() {
    let h = Harness::new();

    let before = h.logs.count();
    h.facade
        .create_branch(branch_payload("004", "North"), ADMIN_ID, IP)
        .await
        .unwrap();

    let entries = h.logs.entries();
    assert!(entries.len() > before);
    let last = entries.last().unwrap();
    assert_eq!(last.user_id, ADMIN_ID);
    assert_eq!(last.ip_address, IP);
}

#[tokio::test]
async fn locking_a_set_cascades_to_member_permissions() {
    let h = Harness::new();
    h.permissions.seed(seeded_permission(1, "users.read"));
    h.permissions.seed(seeded_permission(2, "users.write"));
    h.permissions.seed(seeded_permission(3, "branches.read"));

    let set = h
        .facade
        .create_permission_set(
            CreatePermissionSet {
                name: "User Admin".to_string(),
                description: None,
                locked: false,
                permission_ids: vec![1, 2],
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();

    // Adding with lock engages the whole membership, not just the new ids
    let view = h
        .facade
        .add_permissions_to_set(set.id, vec![3], true, ADMIN_ID, IP)
        .await
        .unwrap();
    assert!(view.locked);
    for id in [1, 2, 3] {
        assert!(h.permissions.get(id).unwrap().locked, "permission {}", id);
    }

    // Removal releases only the removed members
    h.facade
        .remove_permissions_from_set(set.id, vec![3], ADMIN_ID, IP)
        .await
        .unwrap();
    assert!(!h.permissions.get(3).unwrap().locked);
    assert!(h.permissions.get(1).unwrap().locked);
    assert!(h.permissions.get(2).unwrap().locked);
}

#[tokio::test]
async fn explicit_lock_engages_set_and_members() {
    let h = Harness::new();
    h.permissions.seed(seeded_permission(1, "logs.read"));

    let set = h
        .facade
        .create_permission_set(
            CreatePermissionSet {
                name: "Audit".to_string(),
                description: None,
                locked: false,
                permission_ids: vec![1],
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();

    let view = h
        .facade
        .lock_permission_set(set.id, ADMIN_ID, IP)
        .await
        .unwrap();
    assert!(view.locked);
    assert!(h.permissions.get(1).unwrap().locked);
}

#[tokio::test]
async fn granting_unknown_sets_fails_and_audits_the_attempt() {
    let h = Harness::new();

    let role = h
        .facade
        .create_role(
            CreateRole {
                name: "Supervisor".to_string(),
                description: None,
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();

    let before = h.logs.count();
    let err = h
        .facade
        .grant_permission_sets(role.id, vec![999], ADMIN_ID, IP)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    // The attempt and its empty resolution are both on record
    assert_eq!(h.logs.count(), before + 2);
    assert!(h.roles.granted_set_ids(role.id).is_empty());
}

#[tokio::test]
async fn granting_existing_sets_links_them() {
    let h = Harness::new();

    let role = h
        .facade
        .create_role(
            CreateRole {
                name: "Manager".to_string(),
                description: None,
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();
    let set = h
        .facade
        .create_permission_set(
            CreatePermissionSet {
                name: "Branch Admin".to_string(),
                description: None,
                locked: false,
                permission_ids: vec![],
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();

    let before = h.logs.count();
    let granted = h
        .facade
        .grant_permission_sets(role.id, vec![set.id], ADMIN_ID, IP)
        .await
        .unwrap();
    assert_eq!(granted.len(), 1);
    assert_eq!(granted[0].id, set.id);
    assert_eq!(h.roles.granted_set_ids(role.id), vec![set.id]);
    // The attempt and the persisted grant are both on record
    assert_eq!(h.logs.count(), before + 2);

    let before = h.logs.count();
    h.facade
        .deny_permission_sets(role.id, vec![set.id], ADMIN_ID, IP)
        .await
        .unwrap();
    assert!(h.roles.granted_set_ids(role.id).is_empty());
    assert_eq!(h.logs.count(), before + 2);
}

#[tokio::test]
async fn password_change_requires_the_old_password() {
    let h = Harness::new();

    let branch = h
        .facade
        .create_branch(branch_payload("005", "West"), ADMIN_ID, IP)
        .await
        .unwrap();
    let role = h
        .facade
        .create_role(
            CreateRole {
                name: "Officer".to_string(),
                description: None,
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();
    let created = h
        .facade
        .create_user(
            user_payload("pwuser", "PF300", branch.id, role.id),
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();
    let original_hash = h.users.get(created.id).unwrap().password_hash;

    let err = h
        .facade
        .change_password(
            access_admin::domain::ChangePassword {
                id: created.id,
                old_password: "wrong-password".to_string(),
                new_password: "anothersecret".to_string(),
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Client(_)));
    assert_eq!(h.users.get(created.id).unwrap().password_hash, original_hash);

    h.facade
        .change_password(
            access_admin::domain::ChangePassword {
                id: created.id,
                old_password: "hunter2secret".to_string(),
                new_password: "anothersecret".to_string(),
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();
    assert_ne!(h.users.get(created.id).unwrap().password_hash, original_hash);
}

#[tokio::test]
async fn user_creation_rejects_inactive_branch() {
    let h = Harness::new();

    let branch = h
        .facade
        .create_branch(
            CreateBranch {
                sol_id: "006".to_string(),
                name: "Dormant".to_string(),
                active: false,
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();
    let role = h
        .facade
        .create_role(
            CreateRole {
                name: "Agent".to_string(),
                description: None,
            },
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap();

    let err = h
        .facade
        .create_user(
            user_payload("nobody", "PF400", branch.id, role.id),
            ADMIN_ID,
            IP,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotActive { .. }));
    assert_eq!(h.users.count(), 2); // only the seeded actors
}
