//! Form state container.
//!
//! The form owns the assignment values. Every write is a full replacement, bumps
//! the revision and notifies watchers.

use std::fmt;

use crate::models::{ChildAssignment, FormValues, Host, SchedulingStrategy};

/// Which value a write touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormChange {
    SchedulingType,
    Hosts,
    HostsReset,
    AssignAll,
    Children,
    Submitted,
}

/// Access to the form values behind the single change channel.
pub trait FormStore {
    fn values(&self) -> &FormValues;
    fn submit_count(&self) -> u32;
    fn revision_id(&self) -> u64;

    fn set_scheduling_type(&mut self, strategy: Option<SchedulingStrategy>);
    fn set_hosts(&mut self, hosts: Vec<Host>);
    /// Replace the hosts and treat them as the field's new default.
    fn reset_hosts(&mut self, default: Vec<Host>);
    fn set_assign_all(&mut self, active: bool);
    fn set_children(&mut self, children: Vec<ChildAssignment>);
    /// Mark the form as submitted and return the new submit count.
    fn submit(&mut self) -> u32;
}

type Watcher = Box<dyn FnMut(FormChange, &FormValues)>;

/// In-memory form store.
pub struct InMemoryForm {
    values: FormValues,
    submit_count: u32,
    revision_id: u64,
    watchers: Vec<Watcher>,
}

impl InMemoryForm {
    pub fn new(values: FormValues) -> Self {
        Self {
            values,
            submit_count: 0,
            revision_id: 0,
            watchers: Vec::new(),
        }
    }

    /// Register a callback invoked after every write.
    pub fn watch(&mut self, watcher: impl FnMut(FormChange, &FormValues) + 'static) {
        self.watchers.push(Box::new(watcher));
    }

    pub fn into_values(self) -> FormValues {
        self.values
    }

    fn notify(&mut self, change: FormChange) {
        self.revision_id += 1;
        tracing::debug!("Form change {:?} (revision {})", change, self.revision_id);
        for watcher in self.watchers.iter_mut() {
            watcher(change, &self.values);
        }
    }
}

impl Default for InMemoryForm {
    fn default() -> Self {
        Self::new(FormValues::default())
    }
}

impl fmt::Debug for InMemoryForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryForm")
            .field("values", &self.values)
            .field("submit_count", &self.submit_count)
            .field("revision_id", &self.revision_id)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

impl FormStore for InMemoryForm {
    fn values(&self) -> &FormValues {
        &self.values
    }

    fn submit_count(&self) -> u32 {
        self.submit_count
    }

    fn revision_id(&self) -> u64 {
        self.revision_id
    }

    fn set_scheduling_type(&mut self, strategy: Option<SchedulingStrategy>) {
        self.values.scheduling_type = strategy;
        self.notify(FormChange::SchedulingType);
    }

    fn set_hosts(&mut self, hosts: Vec<Host>) {
        self.values.hosts = hosts;
        self.notify(FormChange::Hosts);
    }

    fn reset_hosts(&mut self, default: Vec<Host>) {
        self.values.hosts = default;
        self.notify(FormChange::HostsReset);
    }

    fn set_assign_all(&mut self, active: bool) {
        self.values.assign_all_team_members = active;
        self.notify(FormChange::AssignAll);
    }

    fn set_children(&mut self, children: Vec<ChildAssignment>) {
        self.values.children = children;
        self.notify(FormChange::Children);
    }

    fn submit(&mut self) -> u32 {
        self.submit_count += 1;
        self.notify(FormChange::Submitted);
        self.submit_count
    }
}
