//! Assignment engine.
//!
//! Applies user intents to the form through one dispatch point. Each intent is
//! validated before the first write, so a rejected intent leaves the form
//! untouched.

use serde::{Deserialize, Serialize};

use crate::delegation::{toggle_assign_all_children, update_children};
use crate::directory::{children_options, member_options, MemberPool};
use crate::errors::AppError;
use crate::form::FormStore;
use crate::i18n::Translator;
use crate::models::{
    Branch, ChildAssignment, DirectoryContext, Priority, SchedulingStrategy, TeamMember,
};
use crate::priority::PriorityDialog;
use crate::reconciler::{self, replace_branch, selection_to_hosts, Reconciler};
use crate::router::{render, BranchSpec, HostsLayout, TeamTabView};

/// A discrete user action on the team assignment tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    #[serde(rename_all = "camelCase")]
    SetSchedulingType {
        strategy: Option<SchedulingStrategy>,
    },
    #[serde(rename_all = "camelCase")]
    ToggleAssignAll { branch: Branch, active: bool },
    #[serde(rename_all = "camelCase")]
    SelectHosts { branch: Branch, user_ids: Vec<i64> },
    #[serde(rename_all = "camelCase")]
    AddHost { branch: Branch, user_id: i64 },
    #[serde(rename_all = "camelCase")]
    RemoveHost { branch: Branch, user_id: i64 },
    #[serde(rename_all = "camelCase")]
    OpenPriorityDialog { user_id: i64 },
    #[serde(rename_all = "camelCase")]
    ChoosePriority { priority: Priority },
    ConfirmPriority,
    CancelPriority,
    #[serde(rename_all = "camelCase")]
    ToggleAssignAllChildren { active: bool },
    #[serde(rename_all = "camelCase")]
    SelectChildren { user_ids: Vec<i64> },
    #[serde(rename_all = "camelCase")]
    RemoveChild { user_id: i64 },
    Submit,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SetSchedulingType { .. } => "setSchedulingType",
            Intent::ToggleAssignAll { .. } => "toggleAssignAll",
            Intent::SelectHosts { .. } => "selectHosts",
            Intent::AddHost { .. } => "addHost",
            Intent::RemoveHost { .. } => "removeHost",
            Intent::OpenPriorityDialog { .. } => "openPriorityDialog",
            Intent::ChoosePriority { .. } => "choosePriority",
            Intent::ConfirmPriority => "confirmPriority",
            Intent::CancelPriority => "cancelPriority",
            Intent::ToggleAssignAllChildren { .. } => "toggleAssignAllChildren",
            Intent::SelectChildren { .. } => "selectChildren",
            Intent::RemoveChild { .. } => "removeChild",
            Intent::Submit => "submit",
        }
    }
}

/// Owns the reconciliation state for one form.
pub struct AssignmentEngine<S: FormStore> {
    form: S,
    pool: MemberPool,
    children_pool: Vec<ChildAssignment>,
    reconciler: Reconciler,
    dialog: Option<PriorityDialog>,
}

impl<S: FormStore> AssignmentEngine<S> {
    /// Build the option pools from a directory snapshot and capture the
    /// initial host baseline.
    pub fn new(
        form: S,
        members: &[TeamMember],
        context: &DirectoryContext,
        text: &dyn Translator,
    ) -> Self {
        let pool = member_options(members, context, text);
        let children_pool = children_options(members, context, text);
        Self::with_pools(form, pool, children_pool)
    }

    pub fn with_pools(form: S, pool: MemberPool, children_pool: Vec<ChildAssignment>) -> Self {
        let mut reconciler = Reconciler::new();
        let values = form.values();
        reconciler.capture(&values.hosts, values.scheduling_type, form.submit_count());

        Self {
            form,
            pool,
            children_pool,
            reconciler,
            dialog: None,
        }
    }

    pub fn form(&self) -> &S {
        &self.form
    }

    pub fn into_form(self) -> S {
        self.form
    }

    pub fn pool(&self) -> &MemberPool {
        &self.pool
    }

    pub fn children_pool(&self) -> &[ChildAssignment] {
        &self.children_pool
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn dialog(&self) -> Option<&PriorityDialog> {
        self.dialog.as_ref()
    }

    pub fn layout(&self) -> HostsLayout {
        HostsLayout::for_strategy(self.form.values().scheduling_type)
    }

    pub fn render(&self, text: &dyn Translator) -> TeamTabView {
        render(self.form.values(), &self.pool, &self.children_pool, text)
    }

    /// Apply one intent.
    pub fn apply(&mut self, intent: Intent) -> Result<(), AppError> {
        let name = intent.name();
        let result = self.dispatch(intent);
        match &result {
            Ok(()) => tracing::info!(
                "Applied {} (revision {})",
                name,
                self.form.revision_id()
            ),
            Err(e) => tracing::warn!("Rejected {}: {}", name, e),
        }
        result
    }

    fn dispatch(&mut self, intent: Intent) -> Result<(), AppError> {
        match intent {
            Intent::SetSchedulingType { strategy } => self.set_scheduling_type(strategy),
            Intent::ToggleAssignAll { branch, active } => self.toggle_assign_all(branch, active),
            Intent::SelectHosts { branch, user_ids } => self.select_hosts(branch, &user_ids),
            Intent::AddHost { branch, user_id } => {
                let mut ids = self.branch_ids(branch);
                ids.push(user_id);
                self.select_hosts(branch, &ids)
            }
            Intent::RemoveHost { branch, user_id } => {
                let ids: Vec<i64> = self
                    .branch_ids(branch)
                    .into_iter()
                    .filter(|id| *id != user_id)
                    .collect();
                self.select_hosts(branch, &ids)
            }
            Intent::OpenPriorityDialog { user_id } => self.open_priority_dialog(user_id),
            Intent::ChoosePriority { priority } => match self.dialog.as_mut() {
                Some(dialog) => {
                    dialog.choose(priority);
                    Ok(())
                }
                None => Err(AppError::Validation(
                    "No priority dialog is open".to_string(),
                )),
            },
            Intent::ConfirmPriority => {
                self.confirm_priority();
                Ok(())
            }
            Intent::CancelPriority => {
                if let Some(dialog) = self.dialog.take() {
                    dialog.cancel();
                }
                Ok(())
            }
            Intent::ToggleAssignAllChildren { active } => self.toggle_assign_all_children(active),
            Intent::SelectChildren { user_ids } => self.select_children(&user_ids),
            Intent::RemoveChild { user_id } => {
                let ids: Vec<i64> = self
                    .form
                    .values()
                    .children
                    .iter()
                    .map(|c| c.owner_id())
                    .filter(|id| *id != user_id)
                    .collect();
                self.select_children(&ids)
            }
            Intent::Submit => {
                self.submit();
                Ok(())
            }
        }
    }

    fn branch_ids(&self, branch: Branch) -> Vec<i64> {
        self.form
            .values()
            .hosts_in(branch)
            .map(|h| h.user_id)
            .collect()
    }

    fn set_scheduling_type(&mut self, next: Option<SchedulingStrategy>) -> Result<(), AppError> {
        let previous = self.form.values().scheduling_type;
        if previous == Some(SchedulingStrategy::Managed) || next == Some(SchedulingStrategy::Managed)
        {
            return Err(AppError::Validation(
                "Managed scheduling cannot be switched from the strategy selector".to_string(),
            ));
        }

        let hosts = self.form.values().hosts.clone();
        let submit_count = self.form.submit_count();
        self.dialog = None;

        self.form.set_scheduling_type(next);
        self.form.set_assign_all(false);
        if let Some(reset) = self
            .reconciler
            .set_strategy(&hosts, previous, next, submit_count)
        {
            self.form.reset_hosts(reset);
        }
        Ok(())
    }

    /// Branch spec for a host edit under the active strategy.
    fn host_branch(&self, branch: Branch) -> Result<BranchSpec, AppError> {
        let strategy = self.form.values().scheduling_type;
        let layout = HostsLayout::for_strategy(strategy);
        if !layout.uses_hosts() {
            return Err(AppError::Validation(format!(
                "Hosts are not edited under scheduling type {}",
                strategy.map(|s| s.as_str()).unwrap_or("NONE")
            )));
        }
        layout.spec(branch).ok_or_else(|| {
            AppError::Validation(format!(
                "{} hosts are not used under scheduling type {}",
                branch.as_str(),
                strategy.map(|s| s.as_str()).unwrap_or("NONE")
            ))
        })
    }

    fn ensure_unlocked(&self, branch: Branch) -> Result<(), AppError> {
        if self
            .layout()
            .hosts_locked(self.form.values().assign_all_team_members)
        {
            return Err(AppError::SelectionLocked(format!(
                "All team members are assigned automatically; {} hosts cannot be edited",
                branch.as_str()
            )));
        }
        Ok(())
    }

    fn toggle_assign_all(&mut self, branch: Branch, active: bool) -> Result<(), AppError> {
        let spec = self.host_branch(branch)?;
        if !spec.auto_fill_enabled {
            return Err(AppError::Validation(format!(
                "Assign-all is not available for {} hosts",
                branch.as_str()
            )));
        }

        let hosts =
            reconciler::toggle_assign_all(&self.form.values().hosts, branch, active, &self.pool);
        if active {
            self.dialog = None;
        }
        self.form.set_assign_all(active);
        self.form.set_hosts(hosts);
        Ok(())
    }

    fn select_hosts(&mut self, branch: Branch, user_ids: &[i64]) -> Result<(), AppError> {
        self.host_branch(branch)?;
        self.ensure_unlocked(branch)?;

        let values = self.form.values();
        let current = self.branch_ids(branch);
        if let Some(unknown) = user_ids
            .iter()
            .find(|id| !self.pool.contains(**id) && !current.contains(*id))
        {
            return Err(AppError::Validation(format!(
                "Member {} is not in the team directory",
                unknown
            )));
        }

        let selection = selection_to_hosts(&values.hosts, branch, user_ids);
        let hosts = replace_branch(&values.hosts, branch, selection);
        tracing::debug!(
            "Selected {} {} hosts ({} total)",
            user_ids.len(),
            branch.as_str(),
            hosts.len()
        );
        self.form.set_hosts(hosts);
        Ok(())
    }

    fn open_priority_dialog(&mut self, user_id: i64) -> Result<(), AppError> {
        self.host_branch(Branch::Rotating)?;
        self.ensure_unlocked(Branch::Rotating)?;
        if self.dialog.is_some() {
            return Err(AppError::Validation(
                "A priority dialog is already open".to_string(),
            ));
        }

        let host = self
            .form
            .values()
            .hosts
            .iter()
            .find(|h| h.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Host {} not found", user_id)))?;
        let option = self
            .pool
            .get(user_id)
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", user_id)))?;

        self.dialog = Some(PriorityDialog::open(host, option)?);
        Ok(())
    }

    fn confirm_priority(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            tracing::debug!("Confirm without an open priority dialog");
            return;
        };
        if let Some(hosts) = dialog.confirm(&self.form.values().hosts) {
            self.form.set_hosts(hosts);
        }
    }

    fn ensure_delegation(&self) -> Result<(), AppError> {
        if self.layout() != HostsLayout::Delegation {
            return Err(AppError::Validation(
                "Children are only assigned for managed event types".to_string(),
            ));
        }
        Ok(())
    }

    fn toggle_assign_all_children(&mut self, active: bool) -> Result<(), AppError> {
        self.ensure_delegation()?;
        let children =
            toggle_assign_all_children(&self.form.values().children, active, &self.children_pool);
        self.form.set_assign_all(active);
        self.form.set_children(children);
        Ok(())
    }

    fn select_children(&mut self, user_ids: &[i64]) -> Result<(), AppError> {
        self.ensure_delegation()?;
        if self.form.values().assign_all_team_members {
            return Err(AppError::SelectionLocked(
                "All team members are assigned automatically; children cannot be edited"
                    .to_string(),
            ));
        }
        let children = update_children(&self.form.values().children, user_ids, &self.children_pool)?;
        self.form.set_children(children);
        Ok(())
    }

    fn submit(&mut self) {
        self.dialog = None;
        let submit_count = self.form.submit();
        let values = self.form.values();
        self.reconciler
            .capture(&values.hosts, values.scheduling_type, submit_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::InMemoryForm;
    use crate::i18n::EnglishText;
    use crate::models::{FormValues, Host};

    fn members() -> Vec<TeamMember> {
        ["Ann", "Ben", "Cat"]
            .iter()
            .enumerate()
            .map(|(i, name)| TeamMember {
                id: Some(i as i64 + 1),
                name: Some(name.to_string()),
                username: Some(name.to_lowercase()),
                email: format!("{}@example.com", name.to_lowercase()),
                avatar: String::new(),
                membership: Default::default(),
                event_types: vec![],
            })
            .collect()
    }

    fn engine(values: FormValues) -> AssignmentEngine<InMemoryForm> {
        let context = DirectoryContext {
            parent_team_id: None,
            event_type_slug: "intro".into(),
        };
        AssignmentEngine::new(InMemoryForm::new(values), &members(), &context, &EnglishText)
    }

    fn collective() -> FormValues {
        FormValues {
            scheduling_type: Some(SchedulingStrategy::Collective),
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_baseline_captured() {
        let engine = engine(FormValues {
            hosts: vec![Host::new(1, true)],
            ..collective()
        });
        let baseline = engine.reconciler().baseline().unwrap();
        assert_eq!(baseline.hosts, vec![Host::new(1, true)]);
        assert_eq!(baseline.submit_count, 0);
    }

    #[test]
    fn test_strategy_change_resets_assign_all() {
        let mut engine = engine(collective());
        engine
            .apply(Intent::ToggleAssignAll {
                branch: Branch::Fixed,
                active: true,
            })
            .unwrap();
        assert!(engine.form().values().assign_all_team_members);

        engine
            .apply(Intent::SetSchedulingType {
                strategy: Some(SchedulingStrategy::RoundRobin),
            })
            .unwrap();
        assert!(!engine.form().values().assign_all_team_members);
        assert!(engine.form().values().hosts.is_empty());
    }

    #[test]
    fn test_unknown_member_rejected_without_write() {
        let mut engine = engine(collective());
        let revision = engine.form().revision_id();
        let err = engine
            .apply(Intent::AddHost {
                branch: Branch::Fixed,
                user_id: 77,
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(engine.form().revision_id(), revision);
    }

    #[test]
    fn test_rotating_edit_rejected_under_collective() {
        let mut engine = engine(collective());
        let err = engine
            .apply(Intent::AddHost {
                branch: Branch::Rotating,
                user_id: 1,
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_fixed_assign_all_unavailable_under_round_robin() {
        let mut engine = engine(FormValues {
            scheduling_type: Some(SchedulingStrategy::RoundRobin),
            ..Default::default()
        });
        let err = engine
            .apply(Intent::ToggleAssignAll {
                branch: Branch::Fixed,
                active: true,
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_manual_edit_locked_while_assign_all() {
        let mut engine = engine(collective());
        engine
            .apply(Intent::ToggleAssignAll {
                branch: Branch::Fixed,
                active: true,
            })
            .unwrap();
        let err = engine
            .apply(Intent::RemoveHost {
                branch: Branch::Fixed,
                user_id: 1,
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "SELECTION_LOCKED");
        assert_eq!(engine.form().values().hosts.len(), 3);
    }

    #[test]
    fn test_remove_host_outside_pool() {
        let mut engine = engine(FormValues {
            hosts: vec![Host::new(50, true), Host::new(1, true)],
            ..collective()
        });
        engine
            .apply(Intent::RemoveHost {
                branch: Branch::Fixed,
                user_id: 50,
            })
            .unwrap();
        assert_eq!(engine.form().values().hosts, vec![Host::new(1, true)]);
    }

    #[test]
    fn test_priority_dialog_flow() {
        let mut engine = engine(FormValues {
            scheduling_type: Some(SchedulingStrategy::RoundRobin),
            hosts: vec![Host::new(1, true), Host::new(2, false), Host::new(3, false)],
            ..Default::default()
        });

        engine.apply(Intent::OpenPriorityDialog { user_id: 3 }).unwrap();
        assert!(engine
            .apply(Intent::OpenPriorityDialog { user_id: 2 })
            .is_err());
        engine
            .apply(Intent::ChoosePriority {
                priority: Priority::Highest,
            })
            .unwrap();
        engine.apply(Intent::ConfirmPriority).unwrap();

        assert!(engine.dialog().is_none());
        assert_eq!(
            engine.form().values().rotating_hosts(),
            vec![
                Host::new(3, false).with_priority(Priority::Highest),
                Host::new(2, false)
            ]
        );
    }

    #[test]
    fn test_priority_cancel_discards() {
        let hosts = vec![Host::new(2, false), Host::new(3, false)];
        let mut engine = engine(FormValues {
            scheduling_type: Some(SchedulingStrategy::RoundRobin),
            hosts: hosts.clone(),
            ..Default::default()
        });

        engine.apply(Intent::OpenPriorityDialog { user_id: 3 }).unwrap();
        engine
            .apply(Intent::ChoosePriority {
                priority: Priority::Lowest,
            })
            .unwrap();
        engine.apply(Intent::CancelPriority).unwrap();
        assert_eq!(engine.form().values().hosts, hosts);
    }

    #[test]
    fn test_priority_dialog_rejects_fixed_host() {
        let mut engine = engine(FormValues {
            scheduling_type: Some(SchedulingStrategy::RoundRobin),
            hosts: vec![Host::new(1, true)],
            ..Default::default()
        });
        let err = engine
            .apply(Intent::OpenPriorityDialog { user_id: 1 })
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(engine.dialog().is_none());
    }

    #[test]
    fn test_managed_cannot_be_selected() {
        let mut engine = engine(collective());
        let err = engine
            .apply(Intent::SetSchedulingType {
                strategy: Some(SchedulingStrategy::Managed),
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(
            engine.form().values().scheduling_type,
            Some(SchedulingStrategy::Collective)
        );
    }

    #[test]
    fn test_delegation_flow() {
        let mut engine = engine(FormValues {
            scheduling_type: Some(SchedulingStrategy::Managed),
            ..Default::default()
        });

        assert!(engine
            .apply(Intent::AddHost {
                branch: Branch::Fixed,
                user_id: 1
            })
            .is_err());

        engine
            .apply(Intent::SelectChildren {
                user_ids: vec![2, 1],
            })
            .unwrap();
        let owners: Vec<i64> = engine
            .form()
            .values()
            .children
            .iter()
            .map(|c| c.owner_id())
            .collect();
        assert_eq!(owners, vec![2, 1]);

        engine.apply(Intent::RemoveChild { user_id: 2 }).unwrap();
        assert_eq!(engine.form().values().children.len(), 1);

        engine
            .apply(Intent::ToggleAssignAllChildren { active: true })
            .unwrap();
        assert_eq!(engine.form().values().children.len(), 3);
        assert!(engine
            .apply(Intent::SelectChildren { user_ids: vec![1] })
            .is_err());
    }

    #[test]
    fn test_intent_wire_format() {
        let intent: Intent = serde_json::from_str(
            r#"{"type": "selectHosts", "branch": "rotating", "userIds": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(
            intent,
            Intent::SelectHosts {
                branch: Branch::Rotating,
                user_ids: vec![1, 2]
            }
        );
        let submit: Intent = serde_json::from_str(r#"{"type": "submit"}"#).unwrap();
        assert_eq!(submit.name(), "submit");
    }
}
