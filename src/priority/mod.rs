//! Priority engine for rotating hosts.

use crate::errors::AppError;
use crate::i18n::Translator;
use crate::models::{Host, MemberOption, Priority};
use crate::reconciler::update_rotating_hosts;

/// Label and weight shown next to a rotating host.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBadge {
    pub level: Priority,
    pub label: String,
    pub weight: u16,
}

impl PriorityBadge {
    pub fn for_host(host: &Host, text: &dyn Translator) -> Self {
        let level = host.effective_priority();
        Self {
            level,
            label: text.t(level.label_key()),
            weight: level.weight(),
        }
    }
}

/// Set the priority of one rotating host and reorder the rotating hosts by
/// descending priority. Ties keep their relative order.
pub fn set_priority(hosts: &[Host], user_id: i64, level: Priority) -> Vec<Host> {
    let mut rotating: Vec<Host> = hosts
        .iter()
        .filter(|h| !h.is_fixed)
        .map(|h| {
            if h.user_id == user_id {
                h.clone().with_priority(level)
            } else {
                h.clone()
            }
        })
        .collect();
    rotating.sort_by(|a, b| b.effective_priority().cmp(&a.effective_priority()));
    update_rotating_hosts(hosts, rotating)
}

/// Pending priority change for a single rotating host.
///
/// Dropping or cancelling the dialog leaves the host list untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityDialog {
    user_id: i64,
    label: String,
    current: Priority,
    pending: Option<Priority>,
}

impl PriorityDialog {
    /// Open the dialog for a rotating host.
    pub fn open(host: &Host, option: &MemberOption) -> Result<Self, AppError> {
        if host.is_fixed {
            return Err(AppError::NotFound(format!(
                "Host {} is fixed and has no priority",
                host.user_id
            )));
        }
        Ok(Self {
            user_id: host.user_id,
            label: option.display_label.clone(),
            current: host.effective_priority(),
            pending: None,
        })
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Level preselected in the dialog.
    pub fn current(&self) -> Priority {
        self.current
    }

    pub fn pending(&self) -> Option<Priority> {
        self.pending
    }

    pub fn choose(&mut self, level: Priority) {
        self.pending = Some(level);
    }

    /// Apply the chosen level. `None` when nothing was chosen.
    pub fn confirm(self, hosts: &[Host]) -> Option<Vec<Host>> {
        let level = self.pending?;
        if !hosts.iter().any(|h| h.user_id == self.user_id && !h.is_fixed) {
            tracing::warn!(
                "Priority target {} is no longer a rotating host",
                self.user_id
            );
            return None;
        }
        tracing::info!("Set priority of host {} to {:?}", self.user_id, level);
        Some(set_priority(hosts, self.user_id, level))
    }

    pub fn cancel(self) {
        tracing::debug!("Discarded priority change for host {}", self.user_id);
    }
}
