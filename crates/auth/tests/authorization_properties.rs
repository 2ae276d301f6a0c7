//! Black-box checks of the authorization engine's public contract.

use proptest::prelude::*;

use slotlist_auth::{
    MatchStrategy, Permission, PermissionSet, RequiredPermissions, ScopeKind, authorize,
    authorize_flat, authorize_tree, authorize_with, explain_authorization,
    is_valid_scoped_permission,
};

fn set(perms: &[&'static str]) -> PermissionSet {
    perms.iter().copied().collect()
}

fn permission_from(segments: &[&str]) -> String {
    segments.join(".")
}

/// Small alphabet so generated grants and requirements overlap often; the
/// empty segment produces malformed strings.
fn segment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["a", "b", "ab", "admin", "superadmin", "*", ""])
}

fn permission() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|segs| permission_from(&segs))
}

fn disjoint_permission(alphabet: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(alphabet), 1..5)
        .prop_map(|segs| permission_from(&segs))
}

fn granted_set() -> impl Strategy<Value = PermissionSet> {
    prop::collection::vec(permission(), 0..8).prop_map(|perms| perms.into_iter().collect())
}

fn required_spec() -> impl Strategy<Value = RequiredPermissions> {
    prop_oneof![
        permission().prop_map(RequiredPermissions::from),
        prop::collection::vec(permission(), 0..4).prop_map(RequiredPermissions::from),
    ]
}

#[test]
fn documented_examples() {
    assert!(authorize(&set(&["admin.*"]), "admin.user"));
    assert!(!authorize(&set(&["admin.*"]), "community.test.leader"));

    assert!(authorize(&set(&["community.test.*"]), "community.test.leader"));
    assert!(!authorize(&set(&["community.test.*"]), "community.testing.leader"));

    assert!(authorize(
        &set(&["admin.user", "admin.community"]),
        ["admin.user", "admin.permission"]
    ));

    assert!(!authorize(&PermissionSet::new(), "anything"));
    assert!(!authorize(&PermissionSet::new(), Vec::<Permission>::new()));

    assert!(is_valid_scoped_permission(ScopeKind::Community, "test", "community.test.leader"));
    assert!(!is_valid_scoped_permission(ScopeKind::Community, "test", "community.other.leader"));
    assert!(is_valid_scoped_permission(ScopeKind::Mission, "op-1", "mission.op-1.editor"));
    assert!(!is_valid_scoped_permission(ScopeKind::Mission, "op-1", "mission.op-1.*"));
}

#[test]
fn wildcard_depths() {
    let granted = set(&["community.test.*"]);
    assert!(authorize(&granted, "community.test"));
    assert!(authorize(&granted, "community.test.leader"));
    assert!(authorize(&granted, "community.test.leader.deep"));

    let granted = set(&["admin.*"]);
    assert!(authorize(&granted, "admin.user.details"));
}

#[test]
fn router_style_requirements() {
    // Community update: site admins or that community's leader.
    let required = RequiredPermissions::any_of([
        Permission::from("admin.community"),
        slotlist_auth::well_known::community_leader("test"),
    ]);
    assert!(authorize(&set(&["community.test.leader"]), required.clone()));
    assert!(authorize(&set(&["admin.community"]), required.clone()));
    assert!(!authorize(&set(&["community.other.leader"]), required.clone()));
    assert!(!authorize(&set(&["community.test.recruitment"]), required));
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1024,
        ..ProptestConfig::default()
    })]

    /// Property: flat and tree strategies agree on every input.
    #[test]
    fn tree_and_flat_strategies_agree(granted in granted_set(), required in required_spec()) {
        let flat = authorize_flat(&granted, &required);
        let tree = authorize_tree(&granted, &required);
        prop_assert_eq!(flat, tree);
        prop_assert_eq!(explain_authorization(&granted, required).allowed, flat);
    }

    /// Property: strategies agree (and deny) when grants and requirements share no segment.
    #[test]
    fn strategies_agree_without_overlap(
        granted in prop::collection::vec(disjoint_permission(&["x", "y", "xy"]), 0..8),
        required in prop::collection::vec(disjoint_permission(&["a", "b", "ab"]), 0..4),
    ) {
        let granted: PermissionSet = granted.into_iter().collect();
        let required = RequiredPermissions::from(required);
        let flat = authorize_flat(&granted, &required);
        prop_assert_eq!(flat, authorize_tree(&granted, &required));
        prop_assert!(!flat);
    }

    /// Property: a bare string and a one-element list decide identically.
    #[test]
    fn single_and_singleton_list_are_equivalent(granted in granted_set(), candidate in permission()) {
        for strategy in [MatchStrategy::Flat, MatchStrategy::Tree] {
            prop_assert_eq!(
                authorize_with(strategy, &granted, candidate.clone()),
                authorize_with(strategy, &granted, vec![candidate.clone()])
            );
        }
    }

    /// Property: `*` and `admin.superadmin` satisfy everything, even an empty list.
    #[test]
    fn overrides_satisfy_everything(
        granted in granted_set(),
        required in required_spec(),
        override_perm in prop::sample::select(vec!["*", "admin.superadmin"]),
    ) {
        let mut perms: Vec<Permission> = granted.iter().cloned().collect();
        perms.push(Permission::from(override_perm));
        let granted: PermissionSet = perms.into_iter().collect();

        prop_assert!(authorize_with(MatchStrategy::Flat, &granted, required.clone()));
        prop_assert!(authorize_with(MatchStrategy::Tree, &granted, required));
        prop_assert!(authorize(&granted, Vec::<Permission>::new()));
    }

    /// Property: a list is allowed exactly when some member is allowed alone.
    #[test]
    fn list_is_logical_or(granted in granted_set(), candidates in prop::collection::vec(permission(), 0..4)) {
        let any_alone = candidates.iter().any(|c| authorize(&granted, c.clone()));
        let together = authorize(&granted, candidates);
        if granted.has_global_override() {
            prop_assert!(together);
        } else {
            prop_assert_eq!(together, any_alone);
        }
    }
}
