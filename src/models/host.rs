//! Host record model.

use serde::{Deserialize, Serialize};

use super::MemberOption;

/// Priority weight of a rotating host.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Lowest = 0,
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Highest = 4,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Lowest,
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Highest,
    ];

    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Priority::Lowest),
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            4 => Some(Priority::Highest),
            _ => None,
        }
    }

    /// Unset priorities behave as Medium.
    pub fn effective(priority: Option<Priority>) -> Priority {
        priority.unwrap_or_default()
    }

    /// Translation key of the label.
    pub fn label_key(&self) -> &'static str {
        match self {
            Priority::Lowest => "lowest",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Highest => "highest",
        }
    }

    /// Presentation weight (text shade), darker for higher priority.
    pub fn weight(&self) -> u16 {
        match self {
            Priority::Lowest => 300,
            Priority::Low => 400,
            Priority::Medium => 500,
            Priority::High => 600,
            Priority::Highest => 700,
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.level()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Priority::from_level(level).ok_or_else(|| format!("priority {} is outside 0..=4", level))
    }
}

/// Which half of the host list an operation targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Branch {
    Fixed,
    Rotating,
}

impl Branch {
    pub fn is_fixed(&self) -> bool {
        matches!(self, Branch::Fixed)
    }

    pub fn of(host: &Host) -> Self {
        if host.is_fixed {
            Branch::Fixed
        } else {
            Branch::Rotating
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Branch::Fixed => Branch::Rotating,
            Branch::Rotating => Branch::Fixed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Fixed => "fixed",
            Branch::Rotating => "rotating",
        }
    }
}

/// A member assigned to the event type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub user_id: i64,
    pub is_fixed: bool,
    /// Only meaningful for rotating hosts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl Host {
    pub fn new(user_id: i64, is_fixed: bool) -> Self {
        Self {
            user_id,
            is_fixed,
            priority: None,
        }
    }

    pub fn from_member(member: &MemberOption, is_fixed: bool) -> Self {
        Self::new(member.id, is_fixed)
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn branch(&self) -> Branch {
        Branch::of(self)
    }

    pub fn effective_priority(&self) -> Priority {
        Priority::effective(self.priority)
    }
}

/// Hosts are the same assignment when they refer to the same user.
pub fn same_user(a: &Host, b: &Host) -> bool {
    a.user_id == b.user_id
}
