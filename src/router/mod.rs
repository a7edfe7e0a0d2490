//! Strategy selector and view router.
//!
//! Maps the scheduling strategy to the host branches that are shown and
//! renders the reconciled form values into a view model.

use serde::Serialize;

use crate::delegation::available_children;
use crate::directory::MemberPool;
use crate::i18n::Translator;
use crate::models::{Branch, ChildAssignment, FormValues, MemberOption, SchedulingStrategy};
use crate::priority::PriorityBadge;
use crate::reconciler::available_options;

/// Which sub-views are active for a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HostsLayout {
    /// No strategy selected; nothing is rendered
    Unselected,
    FixedOnly,
    FixedAndRotating,
    Delegation,
}

/// One host branch shown by a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSpec {
    pub branch: Branch,
    /// Whether the branch exposes the assign-all toggle
    pub auto_fill_enabled: bool,
}

impl HostsLayout {
    pub fn for_strategy(strategy: Option<SchedulingStrategy>) -> Self {
        match strategy {
            None => HostsLayout::Unselected,
            Some(SchedulingStrategy::Collective) => HostsLayout::FixedOnly,
            Some(SchedulingStrategy::RoundRobin) => HostsLayout::FixedAndRotating,
            Some(SchedulingStrategy::Managed) => HostsLayout::Delegation,
        }
    }

    pub fn branches(&self) -> Vec<BranchSpec> {
        match self {
            HostsLayout::Unselected | HostsLayout::Delegation => Vec::new(),
            HostsLayout::FixedOnly => vec![BranchSpec {
                branch: Branch::Fixed,
                auto_fill_enabled: true,
            }],
            HostsLayout::FixedAndRotating => vec![
                BranchSpec {
                    branch: Branch::Fixed,
                    auto_fill_enabled: false,
                },
                BranchSpec {
                    branch: Branch::Rotating,
                    auto_fill_enabled: true,
                },
            ],
        }
    }

    pub fn spec(&self, branch: Branch) -> Option<BranchSpec> {
        self.branches().into_iter().find(|s| s.branch == branch)
    }

    /// Whether the layout edits hosts at all.
    pub fn uses_hosts(&self) -> bool {
        matches!(self, HostsLayout::FixedOnly | HostsLayout::FixedAndRotating)
    }

    /// Manual host edits are rejected while assign-all is on: the auto-filled
    /// branch holds the whole pool, so no member is left for the other one.
    pub fn hosts_locked(&self, assign_all: bool) -> bool {
        assign_all && self.uses_hosts()
    }
}

/// Entry of the strategy dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOption {
    pub value: SchedulingStrategy,
    pub label: String,
}

/// Strategies a user may pick. Managed is fixed at event type creation.
pub fn strategy_options(text: &dyn Translator) -> Vec<StrategyOption> {
    [SchedulingStrategy::Collective, SchedulingStrategy::RoundRobin]
        .into_iter()
        .map(|value| StrategyOption {
            value,
            label: text.t(value.label_key()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedHost {
    pub option: MemberOption,
    /// Rotating hosts only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityBadge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchView {
    pub branch: Branch,
    pub title: String,
    pub auto_fill_enabled: bool,
    pub assign_all: bool,
    /// False while the branch is auto-filled or locked by the other branch
    pub selector_visible: bool,
    pub locked: bool,
    pub selected: Vec<SelectedHost>,
    pub options: Vec<MemberOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationView {
    pub title: String,
    pub assign_all: bool,
    pub selector_visible: bool,
    pub selected: Vec<ChildAssignment>,
    pub options: Vec<ChildAssignment>,
}

/// Rendered state of the team assignment tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "camelCase")]
pub enum TeamTabView {
    #[serde(rename_all = "camelCase")]
    Unselected {
        strategy_options: Vec<StrategyOption>,
    },
    #[serde(rename_all = "camelCase")]
    Hosts {
        strategy: SchedulingStrategy,
        strategy_options: Vec<StrategyOption>,
        branches: Vec<BranchView>,
    },
    Delegation(DelegationView),
}

fn branch_title(branch: Branch, text: &dyn Translator) -> String {
    match branch {
        Branch::Fixed => text.t("fixed_hosts"),
        Branch::Rotating => text.t("round_robin_hosts"),
    }
}

fn render_branch(
    spec: BranchSpec,
    locked: bool,
    values: &FormValues,
    pool: &MemberPool,
    text: &dyn Translator,
) -> BranchView {
    let assign_all = spec.auto_fill_enabled && values.assign_all_team_members;
    let selected = values
        .hosts_in(spec.branch)
        .filter_map(|host| {
            let option = pool.get(host.user_id)?.clone();
            let priority = (!host.is_fixed).then(|| PriorityBadge::for_host(host, text));
            Some(SelectedHost { option, priority })
        })
        .collect();
    let options = if locked {
        Vec::new()
    } else {
        available_options(pool, &values.hosts, spec.branch)
            .into_iter()
            .cloned()
            .collect()
    };

    BranchView {
        branch: spec.branch,
        title: branch_title(spec.branch, text),
        auto_fill_enabled: spec.auto_fill_enabled,
        assign_all,
        selector_visible: !assign_all && !locked,
        locked,
        selected,
        options,
    }
}

/// Render the form values for the active strategy.
pub fn render(
    values: &FormValues,
    pool: &MemberPool,
    children_pool: &[ChildAssignment],
    text: &dyn Translator,
) -> TeamTabView {
    let layout = HostsLayout::for_strategy(values.scheduling_type);
    match (layout, values.scheduling_type) {
        (HostsLayout::Delegation, _) => {
            let assign_all = values.assign_all_team_members;
            let options = if assign_all {
                Vec::new()
            } else {
                available_children(children_pool, &values.children)
                    .into_iter()
                    .cloned()
                    .collect()
            };
            TeamTabView::Delegation(DelegationView {
                title: text.t("assign_to"),
                assign_all,
                selector_visible: !assign_all,
                selected: values.children.clone(),
                options,
            })
        }
        (HostsLayout::FixedOnly | HostsLayout::FixedAndRotating, Some(strategy)) => {
            let locked = layout.hosts_locked(values.assign_all_team_members);
            TeamTabView::Hosts {
                strategy,
                strategy_options: strategy_options(text),
                branches: layout
                    .branches()
                    .into_iter()
                    .map(|spec| render_branch(spec, locked, values, pool, text))
                    .collect(),
            }
        }
        _ => TeamTabView::Unselected {
            strategy_options: strategy_options(text),
        },
    }
}
