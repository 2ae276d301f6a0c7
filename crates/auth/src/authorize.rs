use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::permissions::segments_of;
use crate::settings::AuthzSettings;
use crate::well_known::SEGMENT_SEPARATOR;
use crate::{Permission, PermissionSet, RequiredPermissions};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The caller broke the call contract (e.g. a malformed requirement payload).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("forbidden: missing permission {0}")]
    Forbidden(String),
}

/// How granted permissions are compared against a requirement.
///
/// Both strategies always agree; they differ only in cost profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Scan the flat granted set for each candidate.
    Flat,
    /// Fold the granted set into a [`crate::PermissionTree`] and descend it.
    #[default]
    Tree,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Tree => "tree",
        }
    }
}

impl core::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "tree" => Ok(Self::Tree),
            other => Err(AuthzError::InvalidArgument(format!(
                "unknown match strategy '{other}' (expected 'flat' or 'tree')"
            ))),
        }
    }
}

/// Action-side authorization contract.
///
/// Implement this on actions that need permissions; handlers check it before
/// performing the action.
pub trait ActionAuthorization {
    fn required_permissions(&self) -> RequiredPermissions;
}

/// `true` if `granted` holds `*` or `admin.superadmin`.
pub fn has_global_override(granted: &PermissionSet) -> bool {
    granted.has_global_override()
}

/// Decide whether `granted` satisfies `required` using the default strategy.
///
/// - No IO
/// - No panics
/// - Malformed or unknown strings simply don't match
pub fn authorize(granted: &PermissionSet, required: impl Into<RequiredPermissions>) -> bool {
    authorize_with(MatchStrategy::default(), granted, required)
}

pub fn authorize_with(
    strategy: MatchStrategy,
    granted: &PermissionSet,
    required: impl Into<RequiredPermissions>,
) -> bool {
    let required = required.into();
    let allowed = match strategy {
        MatchStrategy::Flat => authorize_flat(granted, &required),
        MatchStrategy::Tree => authorize_tree(granted, &required),
    };
    tracing::debug!(%required, %strategy, allowed, "authorization decision");
    allowed
}

/// Flat strategy: compare each candidate with every granted string.
pub fn authorize_flat(granted: &PermissionSet, required: &RequiredPermissions) -> bool {
    if granted.has_global_override() {
        return true;
    }
    required
        .candidates()
        .iter()
        .any(|candidate| matching_grant(granted, candidate.as_str()).is_some())
}

/// Tree strategy: build the tree once, then descend it per candidate.
pub fn authorize_tree(granted: &PermissionSet, required: &RequiredPermissions) -> bool {
    if granted.has_global_override() {
        return true;
    }
    let candidates = required.candidates();
    if candidates.is_empty() {
        return false;
    }
    let tree = granted.tree();
    candidates.iter().any(|candidate| tree.grants(candidate.as_str()))
}

/// Like [`authorize`], but denial becomes [`AuthzError::Forbidden`].
pub fn require(
    granted: &PermissionSet,
    required: impl Into<RequiredPermissions>,
) -> Result<(), AuthzError> {
    Authorizer::default().require(granted, required)
}

/// First granted permission that satisfies `required`, ignoring overrides.
fn matching_grant<'a>(granted: &'a PermissionSet, required: &str) -> Option<&'a Permission> {
    segments_of(required)?;
    granted.iter().find(|grant| grant_matches(grant, required))
}

fn grant_matches(grant: &Permission, required: &str) -> bool {
    if !grant.is_well_formed() {
        return false;
    }
    if grant.as_str() == required {
        return true;
    }
    match grant.wildcard_prefix() {
        Some("") => true,
        Some(prefix) => {
            required == prefix
                || required
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with(SEGMENT_SEPARATOR))
        }
        None => false,
    }
}

/// Authorization entry point bound to a configured [`MatchStrategy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Authorizer {
    strategy: MatchStrategy,
}

impl Authorizer {
    pub fn new(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    pub fn from_settings(settings: &AuthzSettings) -> Self {
        Self::new(settings.strategy)
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    pub fn authorize(
        &self,
        granted: &PermissionSet,
        required: impl Into<RequiredPermissions>,
    ) -> bool {
        authorize_with(self.strategy, granted, required)
    }

    pub fn require(
        &self,
        granted: &PermissionSet,
        required: impl Into<RequiredPermissions>,
    ) -> Result<(), AuthzError> {
        let required = required.into();
        if authorize_with(self.strategy, granted, required.clone()) {
            Ok(())
        } else {
            Err(AuthzError::Forbidden(required.to_string()))
        }
    }

    pub fn require_action<A: ActionAuthorization + ?Sized>(
        &self,
        granted: &PermissionSet,
        action: &A,
    ) -> Result<(), AuthzError> {
        self.require(granted, action.required_permissions())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    /// Candidates that were checked, in order.
    pub required: Vec<String>,

    pub allowed: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// `true` when `*` or `admin.superadmin` decided the outcome.
    pub via_override: bool,

    /// First candidate found to be satisfied.
    pub matched_candidate: Option<String>,

    /// Granted permission that satisfied it.
    pub matched_grant: Option<String>,

    pub effective_permissions: Vec<String>,

    /// If denied, this explains what was missing.
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The requirement listed no alternatives at all.
    EmptyRequirement,
    /// Every candidate was malformed and therefore unmatchable.
    MalformedRequirement,
    MissingPermission,
}

/// Explain why an authorization decision was made (or would be made).
///
/// The `allowed` outcome always equals [`authorize`] for the same inputs.
pub fn explain_authorization(
    granted: &PermissionSet,
    required: impl Into<RequiredPermissions>,
) -> AuthorizationExplanation {
    let required = required.into();
    let required_list: Vec<String> = required
        .candidates()
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();
    let effective_permissions: Vec<String> =
        granted.iter().map(|p| p.as_str().to_string()).collect();

    if let Some(grant) = granted.iter().find(|p| p.is_override()) {
        return AuthorizationExplanation {
            required: required_list,
            allowed: true,
            reason: format!("Principal holds override permission '{grant}'"),
            via_override: true,
            matched_candidate: None,
            matched_grant: Some(grant.as_str().to_string()),
            effective_permissions,
            denial_reason: None,
        };
    }

    let matched = required.candidates().iter().find_map(|candidate| {
        matching_grant(granted, candidate.as_str()).map(|grant| (candidate, grant))
    });

    if let Some((candidate, grant)) = matched {
        let reason = if grant == candidate {
            format!("Principal has explicit permission '{candidate}'")
        } else {
            format!("Permission '{candidate}' is covered by wildcard '{grant}'")
        };
        return AuthorizationExplanation {
            required: required_list,
            allowed: true,
            reason,
            via_override: false,
            matched_candidate: Some(candidate.as_str().to_string()),
            matched_grant: Some(grant.as_str().to_string()),
            effective_permissions,
            denial_reason: None,
        };
    }

    let denial_reason = if required.is_empty() {
        DenialReason {
            kind: DenialKind::EmptyRequirement,
            message: "No required permission was given".to_string(),
            suggestions: Vec::new(),
        }
    } else if required.candidates().iter().all(|p| !p.is_well_formed()) {
        DenialReason {
            kind: DenialKind::MalformedRequirement,
            message: format!("Required permission {required} is malformed and can never match"),
            suggestions: vec!["Remove empty segments from the required permission".to_string()],
        }
    } else {
        DenialReason {
            kind: DenialKind::MissingPermission,
            message: format!("Missing required permission: {required}"),
            suggestions: suggestions_for(&required),
        }
    };

    AuthorizationExplanation {
        required: required_list,
        allowed: false,
        reason: format!(
            "Principal does not satisfy {required}. Current permissions: {effective_permissions:?}"
        ),
        via_override: false,
        matched_candidate: None,
        matched_grant: None,
        effective_permissions,
        denial_reason: Some(denial_reason),
    }
}

fn suggestions_for(required: &RequiredPermissions) -> Vec<String> {
    let mut suggestions = Vec::new();
    for candidate in required.candidates() {
        let Some(segments) = candidate.segments() else {
            continue;
        };
        suggestions.push(format!("Grant '{candidate}' directly"));
        if segments.len() > 1 {
            let parent = segments[..segments.len() - 1].join(".");
            suggestions.push(format!("Grant '{parent}.*' to cover every '{parent}' capability"));
        }
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(perms: &[&'static str]) -> PermissionSet {
        perms.iter().copied().collect()
    }

    fn both(granted: &PermissionSet, required: impl Into<RequiredPermissions>) -> bool {
        let required = required.into();
        let flat = authorize_flat(granted, &required);
        let tree = authorize_tree(granted, &required);
        assert_eq!(flat, tree, "strategies disagree on {required}");
        flat
    }

    #[test]
    fn override_is_absolute() {
        for granted in [set(&["*"]), set(&["admin.superadmin"])] {
            assert!(both(&granted, "anything.never.defined"));
            assert!(both(&granted, Vec::<Permission>::new()));
            assert!(both(&granted, "a..b"));
        }
    }

    #[test]
    fn category_wildcard_stays_in_its_category() {
        let granted = set(&["admin.*"]);
        assert!(both(&granted, "admin.user"));
        assert!(both(&granted, "admin.superadmin"));
        assert!(!both(&granted, "community.test.leader"));
    }

    #[test]
    fn no_substring_leakage_across_segments() {
        let granted = set(&["community.test.*"]);
        assert!(both(&granted, "community.test.leader"));
        assert!(!both(&granted, "community.testing.leader"));

        let granted = set(&["community.testing.*"]);
        assert!(!both(&granted, "community.test.leader"));
    }

    #[test]
    fn any_of_semantics() {
        let granted = set(&["admin.user", "admin.community"]);
        assert!(both(&granted, ["admin.user", "admin.permission"]));
        assert!(!both(&granted, ["admin.mission", "admin.permission"]));
    }

    #[test]
    fn empty_granted_set_denies() {
        let granted = PermissionSet::new();
        assert!(!both(&granted, "anything"));
        assert!(!both(&granted, Vec::<Permission>::new()));
    }

    #[test]
    fn empty_requirement_without_override_denies() {
        assert!(!both(&set(&["admin.*"]), Vec::<Permission>::new()));
    }

    #[test]
    fn malformed_required_never_matches() {
        let granted = set(&["admin.*", "admin..user"]);
        assert!(!both(&granted, "admin..user"));
        assert!(!both(&granted, ""));
        assert!(!both(&granted, ".admin"));
    }

    #[test]
    fn malformed_grant_is_ignored() {
        let granted = set(&[".*", "admin."]);
        assert!(!both(&granted, "anything"));
        assert!(!both(&granted, "admin"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let granted = set(&["admin.slotTemplate"]);
        assert!(both(&granted, "admin.slotTemplate"));
        assert!(!both(&granted, "admin.slottemplate"));
    }

    #[test]
    fn require_maps_denial_to_forbidden() {
        let granted = set(&["admin.user"]);
        assert_eq!(require(&granted, "admin.user"), Ok(()));
        assert_eq!(
            require(&granted, ["admin.mission", "mission.op-1.editor"]),
            Err(AuthzError::Forbidden(
                "any of [admin.mission, mission.op-1.editor]".to_string()
            ))
        );
    }

    struct EditMission {
        slug: &'static str,
    }

    impl ActionAuthorization for EditMission {
        fn required_permissions(&self) -> RequiredPermissions {
            RequiredPermissions::any_of([
                Permission::from("admin.mission"),
                crate::well_known::mission_editor(self.slug),
            ])
        }
    }

    #[test]
    fn require_action_uses_the_action_requirement() {
        let authorizer = Authorizer::new(MatchStrategy::Flat);
        let action = EditMission { slug: "op-1" };
        assert!(authorizer.require_action(&set(&["mission.op-1.*"]), &action).is_ok());
        assert!(authorizer.require_action(&set(&["mission.op-2.*"]), &action).is_err());
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Flat".parse::<MatchStrategy>(), Ok(MatchStrategy::Flat));
        assert_eq!(" tree ".parse::<MatchStrategy>(), Ok(MatchStrategy::Tree));
        assert!(matches!(
            "trie".parse::<MatchStrategy>(),
            Err(AuthzError::InvalidArgument(_))
        ));
        assert_eq!(MatchStrategy::default(), MatchStrategy::Tree);
    }

    #[test]
    fn explanation_for_override() {
        let e = explain_authorization(&set(&["admin.superadmin"]), "mission.op-1.editor");
        assert!(e.allowed);
        assert!(e.via_override);
        assert_eq!(e.matched_grant.as_deref(), Some("admin.superadmin"));
        assert!(e.denial_reason.is_none());
    }

    #[test]
    fn explanation_names_the_wildcard_that_matched() {
        let e = explain_authorization(
            &set(&["community.test.*"]),
            ["admin.community", "community.test.leader"],
        );
        assert!(e.allowed);
        assert!(!e.via_override);
        assert_eq!(e.matched_candidate.as_deref(), Some("community.test.leader"));
        assert_eq!(e.matched_grant.as_deref(), Some("community.test.*"));
        assert!(e.reason.contains("wildcard"));
    }

    #[test]
    fn explanation_for_denial_suggests_grants() {
        let e = explain_authorization(&set(&["admin.user"]), "community.test.leader");
        assert!(!e.allowed);
        let denial = e.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::MissingPermission);
        assert!(denial.suggestions.contains(&"Grant 'community.test.leader' directly".to_string()));
        assert!(denial.suggestions.iter().any(|s| s.starts_with("Grant 'community.test.*'")));
    }

    #[test]
    fn explanation_distinguishes_empty_and_malformed_requirements() {
        let granted = set(&["admin.user"]);
        let e = explain_authorization(&granted, Vec::<Permission>::new());
        assert_eq!(e.denial_reason.unwrap().kind, DenialKind::EmptyRequirement);

        let e = explain_authorization(&granted, "admin..user");
        assert_eq!(e.denial_reason.unwrap().kind, DenialKind::MalformedRequirement);
    }

    #[test]
    fn explanation_serializes() {
        let e = explain_authorization(&set(&["admin.user"]), "admin.user");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["allowed"], serde_json::json!(true));
        assert_eq!(json["matched_grant"], serde_json::json!("admin.user"));
    }
}
