//! Team member model matching the directory's TeamMember payload.

use serde::{Deserialize, Serialize};

/// Role a member holds in the owning team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipRole {
    #[default]
    Member,
    Admin,
    Owner,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Member => "MEMBER",
            MembershipRole::Admin => "ADMIN",
            MembershipRole::Owner => "OWNER",
        }
    }
}

/// A raw team member record as delivered by the member directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Missing for members whose account has not been created yet
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub membership: MembershipRole,
    /// Slugs of the event types this member already owns
    #[serde(default)]
    pub event_types: Vec<String>,
}

impl TeamMember {
    /// Whether the member has activated an account (has a non-empty username).
    pub fn has_username(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Describes the event type whose hosts are being edited.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryContext {
    /// Set when the owning team is a sub-team of an organization
    #[serde(default)]
    pub parent_team_id: Option<i64>,
    #[serde(default)]
    pub event_type_slug: String,
}

/// An assignable option derived from a directory record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberOption {
    pub id: i64,
    pub display_label: String,
    pub avatar: String,
    pub email: String,
    pub is_pending: bool,
}

/// Owner payload carried by a delegation record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChildOwner {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub membership: MembershipRole,
    pub event_type_slugs: Vec<String>,
    pub avatar: String,
}

/// A delegation of the managed event type to one member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChildAssignment {
    pub slug: String,
    pub hidden: bool,
    pub created: bool,
    pub owner: ChildOwner,
    pub value: String,
    pub label: String,
}

impl ChildAssignment {
    pub fn owner_id(&self) -> i64 {
        self.owner.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_deserializes_with_missing_fields() {
        let member: TeamMember = serde_json::from_str(r#"{"email":"a@example.com"}"#).unwrap();
        assert!(member.id.is_none());
        assert!(!member.has_username());
        assert_eq!(member.membership, MembershipRole::Member);
        assert!(member.event_types.is_empty());
    }

    #[test]
    fn test_empty_username_is_not_activated() {
        let member: TeamMember =
            serde_json::from_str(r#"{"id":4,"username":"","email":"a@example.com"}"#).unwrap();
        assert!(!member.has_username());
    }

    #[test]
    fn test_membership_wire_format() {
        let role: MembershipRole = serde_json::from_str(r#""OWNER""#).unwrap();
        assert_eq!(role, MembershipRole::Owner);
        assert_eq!(role.as_str(), "OWNER");
    }
}
