#![forbid(unsafe_code)]

//! Lookup failures.
//!
//! The engine has exactly one error kind: a requested group or slot has no
//! binding. It is never fatal; the caller reports it and nothing changes.

use std::fmt;

use crate::ids::{GroupId, SlotId};

/// A select request named something the registry does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No group was registered under this id.
    UnknownGroup {
        /// The requested group.
        group: GroupId,
    },
    /// The group exists but no slot is bound to this id.
    UnknownSlot {
        /// The group that was searched.
        group: GroupId,
        /// The requested slot (trigger target).
        slot: SlotId,
    },
}

impl LookupError {
    /// The group the failed request addressed.
    #[must_use]
    pub fn group(&self) -> &GroupId {
        match self {
            Self::UnknownGroup { group } | Self::UnknownSlot { group, .. } => group,
        }
    }

    /// The slot the failed request addressed, if the group resolved.
    #[must_use]
    pub fn slot(&self) -> Option<&SlotId> {
        match self {
            Self::UnknownGroup { .. } => None,
            Self::UnknownSlot { slot, .. } => Some(slot),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGroup { group } => write!(f, "no group registered as \"{group}\""),
            Self::UnknownSlot { group, slot } => {
                write!(f, "no slot in group \"{group}\" matches id \"{slot}\"")
            }
        }
    }
}

impl std::error::Error for LookupError {}
