//! Assignment reconciler.
//!
//! Pure transforms over the host list plus the per-submission baseline used to
//! restore hosts when the scheduling strategy is toggled back. Every function
//! returns a full replacement list.

use std::collections::HashSet;

use crate::directory::MemberPool;
use crate::models::{Branch, Host, MemberOption, SchedulingStrategy};

/// Host list and strategy observed at the start of a submission cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleBaseline {
    pub hosts: Vec<Host>,
    pub strategy: Option<SchedulingStrategy>,
    pub submit_count: u32,
}

/// Tracks the baseline of the current submission cycle.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    baseline: Option<CycleBaseline>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baseline(&self) -> Option<&CycleBaseline> {
        self.baseline.as_ref()
    }

    fn is_current(&self, submit_count: u32) -> bool {
        self.baseline
            .as_ref()
            .is_some_and(|b| b.submit_count == submit_count)
    }

    /// Record the baseline unless one already exists for this cycle.
    ///
    /// Returns true when a new baseline was captured.
    pub fn capture(
        &mut self,
        hosts: &[Host],
        strategy: Option<SchedulingStrategy>,
        submit_count: u32,
    ) -> bool {
        if self.is_current(submit_count) {
            return false;
        }
        tracing::info!(
            "Captured host baseline: {} hosts under {:?} (cycle {})",
            hosts.len(),
            strategy,
            submit_count
        );
        self.baseline = Some(CycleBaseline {
            hosts: hosts.to_vec(),
            strategy,
            submit_count,
        });
        true
    }

    /// Observe a strategy change and compute the host list to reset to.
    ///
    /// `None` means the host list stays as it is.
    pub fn set_strategy(
        &mut self,
        hosts: &[Host],
        previous: Option<SchedulingStrategy>,
        next: Option<SchedulingStrategy>,
        submit_count: u32,
    ) -> Option<Vec<Host>> {
        if previous == next {
            return None;
        }
        if self.capture(hosts, previous, submit_count) {
            return None;
        }

        let baseline = self.baseline.as_ref()?;
        let reset = if baseline.strategy == next {
            baseline.hosts.clone()
        } else {
            Vec::new()
        };
        tracing::debug!(
            "Strategy {:?} -> {:?}: resetting hosts to {} entries",
            previous,
            next,
            reset.len()
        );
        Some(reset)
    }
}

/// Drop repeated user ids, keeping the first occurrence.
pub fn dedupe(hosts: Vec<Host>) -> Vec<Host> {
    let mut seen = HashSet::new();
    hosts
        .into_iter()
        .filter(|h| seen.insert(h.user_id))
        .collect()
}

/// Replace one branch of the host list.
///
/// The other branch is kept, minus any users the new branch now claims, and
/// comes first in the result.
pub fn replace_branch(hosts: &[Host], branch: Branch, replacement: Vec<Host>) -> Vec<Host> {
    let replacement: Vec<Host> = dedupe(replacement)
        .into_iter()
        .map(|mut h| {
            h.is_fixed = branch.is_fixed();
            h
        })
        .collect();
    let claimed: HashSet<i64> = replacement.iter().map(|h| h.user_id).collect();

    let mut result: Vec<Host> = hosts
        .iter()
        .filter(|h| h.branch() != branch && !claimed.contains(&h.user_id))
        .cloned()
        .collect();
    result.extend(replacement);
    dedupe(result)
}

/// Replace the fixed hosts, preserving rotating ones.
pub fn update_fixed_hosts(hosts: &[Host], new_fixed: Vec<Host>) -> Vec<Host> {
    replace_branch(hosts, Branch::Fixed, new_fixed)
}

/// Replace the rotating hosts, preserving fixed ones.
pub fn update_rotating_hosts(hosts: &[Host], new_rotating: Vec<Host>) -> Vec<Host> {
    replace_branch(hosts, Branch::Rotating, new_rotating)
}

/// Fill a branch from the whole pool, or clear it.
pub fn toggle_assign_all(hosts: &[Host], branch: Branch, active: bool, pool: &MemberPool) -> Vec<Host> {
    let replacement = if active {
        pool.options()
            .iter()
            .map(|m| Host::from_member(m, branch.is_fixed()))
            .collect()
    } else {
        Vec::new()
    };
    replace_branch(hosts, branch, replacement)
}

/// Pool members not yet selected on the given branch.
pub fn available_options<'a>(
    pool: &'a MemberPool,
    hosts: &[Host],
    branch: Branch,
) -> Vec<&'a MemberOption> {
    let taken: HashSet<i64> = hosts
        .iter()
        .filter(|h| h.branch() == branch)
        .map(|h| h.user_id)
        .collect();
    pool.options()
        .iter()
        .filter(|o| !taken.contains(&o.id))
        .collect()
}

/// Build the new branch selection from chosen ids, keeping stored priorities
/// of users that were already on the branch.
pub fn selection_to_hosts(hosts: &[Host], branch: Branch, user_ids: &[i64]) -> Vec<Host> {
    user_ids
        .iter()
        .map(|&id| {
            hosts
                .iter()
                .find(|h| h.user_id == id && h.branch() == branch)
                .cloned()
                .unwrap_or_else(|| Host::new(id, branch.is_fixed()))
        })
        .collect()
}
