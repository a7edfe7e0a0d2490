//! Form values and scheduling strategy.

use serde::{Deserialize, Serialize};

use super::{Branch, ChildAssignment, Host};

/// How hosts of an event type are scheduled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulingStrategy {
    Collective,
    RoundRobin,
    Managed,
}

impl SchedulingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulingStrategy::Collective => "COLLECTIVE",
            SchedulingStrategy::RoundRobin => "ROUND_ROBIN",
            SchedulingStrategy::Managed => "MANAGED",
        }
    }

    /// Translation key of the label.
    pub fn label_key(&self) -> &'static str {
        match self {
            SchedulingStrategy::Collective => "collective",
            SchedulingStrategy::RoundRobin => "round_robin",
            SchedulingStrategy::Managed => "managed",
        }
    }
}

/// Assignment-related values held by the event type form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    #[serde(default)]
    pub scheduling_type: Option<SchedulingStrategy>,
    #[serde(default)]
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub assign_all_team_members: bool,
    #[serde(default)]
    pub children: Vec<ChildAssignment>,
}

impl FormValues {
    pub fn hosts_in(&self, branch: Branch) -> impl Iterator<Item = &Host> {
        self.hosts.iter().filter(move |h| h.branch() == branch)
    }

    pub fn fixed_hosts(&self) -> Vec<Host> {
        self.hosts_in(Branch::Fixed).cloned().collect()
    }

    pub fn rotating_hosts(&self) -> Vec<Host> {
        self.hosts_in(Branch::Rotating).cloned().collect()
    }
}
