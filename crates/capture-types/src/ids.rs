//! Type-safe identifier wrappers.
//!
//! Agents and collectibles carry UUID v7 identifiers so that two entities can
//! never be confused at compile time. Teams are small non-zero integers: the
//! game layer encodes "no team" as `0`, which this crate represents as
//! `Option<TeamId>` instead.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent in the arena.
    AgentId
}

define_id! {
    /// Unique identifier for a collectible target.
    TargetId
}

/// A team number. Always non-zero; `0` on the wire means "no team".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TeamId(u8);

impl TeamId {
    /// Build a team id, rejecting the reserved value `0`.
    pub const fn new(raw: u8) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Decode a wire value where `0` means "no team".
    pub const fn from_wire(raw: u8) -> Option<Self> {
        Self::new(raw)
    }

    /// Encode an optional team back into its wire value.
    pub const fn to_wire(team: Option<Self>) -> u8 {
        match team {
            Some(t) => t.0,
            None => 0,
        }
    }

    /// Return the raw team number.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for TeamId {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or_else(|| String::from("team id 0 is reserved for \"no team\""))
    }
}

impl From<TeamId> for u8 {
    fn from(team: TeamId) -> Self {
        team.0
    }
}

impl core::fmt::Display for TeamId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "team-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let agent = AgentId::new();
        let target = TargetId::new();
        assert_ne!(agent.into_inner(), Uuid::nil());
        assert_ne!(target.into_inner(), Uuid::nil());
    }

    #[test]
    fn team_zero_is_rejected() {
        assert!(TeamId::new(0).is_none());
        assert_eq!(TeamId::new(2).map(TeamId::get), Some(2));
    }

    #[test]
    fn team_wire_encoding() {
        assert_eq!(TeamId::to_wire(None), 0);
        assert_eq!(TeamId::to_wire(TeamId::new(1)), 1);
        assert_eq!(TeamId::from_wire(0), None);
    }

    #[test]
    fn team_serde_rejects_zero() {
        let parsed: Result<TeamId, _> = serde_json::from_str("0");
        assert!(parsed.is_err());
        let parsed: Result<TeamId, _> = serde_json::from_str("2");
        assert_eq!(parsed.ok(), TeamId::new(2));
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = AgentId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
