use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use slotlist_auth::{
    Authorizer, AuthzSettings, ClaimsExpectations, EntityScope, Permission, PermissionSet,
    RequiredPermissions, SessionClaims, explain_authorization, grantable_permissions,
    is_valid_scoped_permission, validate_claims,
};

use crate::{Command, GrantArgs};

/// Result of a command, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Allowed,
    Denied,
}

impl Outcome {
    fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Denied }
    }

    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Allowed => ExitCode::SUCCESS,
            Self::Denied => ExitCode::from(1),
        }
    }
}

pub fn run(command: Command, out: &mut impl Write) -> Result<Outcome> {
    match command {
        Command::Check {
            grants,
            required,
            strategy,
            explain,
        } => {
            let granted = load_grants(&grants)?;
            let required = RequiredPermissions::from(required);
            let authorizer = strategy
                .map(Authorizer::new)
                .unwrap_or_else(|| Authorizer::from_settings(&AuthzSettings::from_env()));

            let allowed = authorizer.authorize(&granted, required.clone());
            if explain {
                let explanation = explain_authorization(&granted, required);
                serde_json::to_writer_pretty(&mut *out, &explanation)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", if allowed { "allowed" } else { "denied" })?;
            }
            Ok(Outcome::from_bool(allowed))
        }

        Command::Validate {
            kind,
            identifier,
            candidate,
        } => {
            let valid = is_valid_scoped_permission(kind, &identifier, &candidate);
            if valid {
                writeln!(out, "valid")?;
            } else {
                writeln!(out, "invalid")?;
                if let Ok(scope) = EntityScope::new(kind, &identifier) {
                    let options: Vec<String> = grantable_permissions(&scope)
                        .iter()
                        .map(Permission::to_string)
                        .collect();
                    writeln!(out, "grantable: {}", options.join(", "))?;
                }
            }
            Ok(Outcome::from_bool(valid))
        }

        Command::Tree { grants } => {
            let granted = load_grants(&grants)?;
            write!(out, "{}", granted.tree())?;
            Ok(Outcome::Allowed)
        }

        Command::Claims {
            path,
            issuer,
            audience,
        } => {
            let claims: SessionClaims = read_json(&path)?;
            let expected = ClaimsExpectations { issuer, audience };
            if let Err(err) = validate_claims(&claims, chrono::Utc::now(), &expected) {
                tracing::info!(%err, path = %path.display(), "claims rejected");
                writeln!(out, "invalid: {err}")?;
                return Ok(Outcome::Denied);
            }
            for permission in &claims.permission_set() {
                writeln!(out, "{permission}")?;
            }
            Ok(Outcome::Allowed)
        }
    }
}

fn load_grants(args: &GrantArgs) -> Result<PermissionSet> {
    let mut grants = args.grants.clone();
    if let Some(path) = &args.grants_file {
        let from_file: Vec<String> = read_json(path)?;
        grants.extend(from_file);
    }
    Ok(grants.into_iter().collect())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
