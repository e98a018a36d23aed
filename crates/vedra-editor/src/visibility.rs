//! Visibility and embargo reducer
//!
//! Every change to a record's visibility goes through [`reduce`], which keeps
//! one invariant: an enabled embargo implies the Restricted level.

use serde::{Deserialize, Serialize};

use vedra_domain::{Embargo, Visibility, VisibilityLevel};

use crate::error::VisibilityError;

/// A change to the visibility section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum VisibilityAction {
    SetLevel(VisibilityLevel),
    SetEmbargoEnabled(bool),
    SetEmbargoUntil(String),
    SetEmbargoReason(String),
}

/// Apply one action, returning the new visibility
pub fn reduce(current: &Visibility, action: VisibilityAction) -> Result<Visibility, VisibilityError> {
    let mut next = current.clone();
    match action {
        VisibilityAction::SetLevel(level) => return Ok(set_level(current, level)),
        VisibilityAction::SetEmbargoEnabled(true) => {
            if !next.level.allows_embargo() {
                return Err(VisibilityError::EmbargoRequiresRestricted { level: next.level });
            }
            next.embargo.enabled = true;
        }
        VisibilityAction::SetEmbargoEnabled(false) => {
            next.embargo = Embargo::default();
        }
        VisibilityAction::SetEmbargoUntil(until) => {
            if !next.embargo.enabled {
                return Err(VisibilityError::EmbargoNotEnabled);
            }
            next.embargo.until = until;
        }
        VisibilityAction::SetEmbargoReason(reason) => {
            if !next.embargo.enabled {
                return Err(VisibilityError::EmbargoNotEnabled);
            }
            next.embargo.reason = reason;
        }
    }
    Ok(next)
}

pub fn set_level(current: &Visibility, level: VisibilityLevel) -> Visibility {
    let mut next = current.clone();
    next.level = level;
    if !level.allows_embargo() {
        next.embargo = Embargo::default();
    }
    next
}

pub fn set_embargo_enabled(
    current: &Visibility,
    enabled: bool,
) -> Result<Visibility, VisibilityError> {
    reduce(current, VisibilityAction::SetEmbargoEnabled(enabled))
}
