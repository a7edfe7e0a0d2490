//! Member directory adapter.
//!
//! Turns raw team member records into the option pools the host and delegation
//! selectors draw from. Every id that later enters the host list is checked
//! against these pools.

use crate::i18n::Translator;
use crate::models::{ChildAssignment, ChildOwner, DirectoryContext, MemberOption, TeamMember};

/// Whether a member may be offered for assignment.
pub fn is_assignable(member: &TeamMember, context: &DirectoryContext) -> bool {
    context.parent_team_id.is_some() || member.has_username()
}

/// Display label: name, else email, else empty, with a pending marker for
/// members that have not activated their account.
pub fn member_label(member: &TeamMember, pending: &str) -> String {
    let base = member
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .or(Some(member.email.as_str()).filter(|e| !e.is_empty()))
        .unwrap_or("");

    if member.has_username() {
        base.to_string()
    } else {
        format!("{} ({})", base, pending)
    }
}

/// Stable ascending sort by label, codepoint order.
pub fn sort_by_label(options: &mut [MemberOption]) {
    options.sort_by(|a, b| a.display_label.cmp(&b.display_label));
}

/// Sorted pool of host options for one directory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPool {
    options: Vec<MemberOption>,
}

impl MemberPool {
    /// Wrap already-normalized options, sorting them by label.
    pub fn new(mut options: Vec<MemberOption>) -> Self {
        sort_by_label(&mut options);
        Self { options }
    }

    pub fn options(&self) -> &[MemberOption] {
        &self.options
    }

    pub fn get(&self, id: i64) -> Option<&MemberOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.options.iter().map(|o| o.id)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Build the host option pool from a directory snapshot.
pub fn member_options(
    members: &[TeamMember],
    context: &DirectoryContext,
    text: &dyn Translator,
) -> MemberPool {
    let pending = text.t("pending");
    let options = members
        .iter()
        .filter(|m| is_assignable(m, context))
        .filter_map(|member| {
            let Some(id) = member.id else {
                tracing::warn!("Skipping directory member without id: {}", member.email);
                return None;
            };
            Some(MemberOption {
                id,
                display_label: member_label(member, &pending),
                avatar: member.avatar.clone(),
                email: member.email.clone(),
                is_pending: !member.has_username() || context.parent_team_id.is_some(),
            })
        })
        .collect();

    let pool = MemberPool::new(options);
    tracing::debug!(
        "Built member pool with {} of {} directory members",
        pool.len(),
        members.len()
    );
    pool
}

/// Build one delegation record per assignable member, in directory order.
pub fn children_options(
    members: &[TeamMember],
    context: &DirectoryContext,
    text: &dyn Translator,
) -> Vec<ChildAssignment> {
    let pending = text.t("pending");
    members
        .iter()
        .filter(|m| is_assignable(m, context))
        .filter_map(|member| {
            let Some(id) = member.id else {
                tracing::warn!("Skipping delegation member without id: {}", member.email);
                return None;
            };
            let event_type_slugs = member
                .event_types
                .iter()
                .filter(|slug| **slug != context.event_type_slug)
                .cloned()
                .collect();
            Some(ChildAssignment {
                slug: context.event_type_slug.clone(),
                hidden: false,
                created: false,
                owner: ChildOwner {
                    id,
                    name: member.name.clone().unwrap_or_default(),
                    email: member.email.clone(),
                    username: member.username.clone().unwrap_or_default(),
                    membership: member.membership,
                    event_type_slugs,
                    avatar: member.avatar.clone(),
                },
                value: id.to_string(),
                label: member_label(member, &pending),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::EnglishText;

    fn member(id: Option<i64>, name: Option<&str>, username: Option<&str>, email: &str) -> TeamMember {
        TeamMember {
            id,
            name: name.map(String::from),
            username: username.map(String::from),
            email: email.to_string(),
            avatar: String::new(),
            membership: Default::default(),
            event_types: vec![],
        }
    }

    #[test]
    fn test_label_precedence() {
        let named = member(Some(1), Some("Ada"), Some("ada"), "ada@example.com");
        assert_eq!(member_label(&named, "pending"), "Ada");

        let unnamed = member(Some(2), Some(""), Some("bob"), "bob@example.com");
        assert_eq!(member_label(&unnamed, "pending"), "bob@example.com");

        let bare = member(Some(3), None, Some("x"), "");
        assert_eq!(member_label(&bare, "pending"), "");
    }

    #[test]
    fn test_label_pending_suffix() {
        let invited = member(Some(4), None, None, "new@example.com");
        assert_eq!(member_label(&invited, "pending"), "new@example.com (pending)");
    }

    #[test]
    fn test_pending_members_excluded_without_parent_team() {
        let members = vec![
            member(Some(1), Some("Ada"), Some("ada"), "a@x"),
            member(Some(2), Some("Bea"), None, "b@x"),
        ];
        let pool = member_options(&members, &DirectoryContext::default(), &EnglishText);
        assert_eq!(pool.ids().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_sub_team_includes_pending_members() {
        let members = vec![
            member(Some(1), Some("Ada"), Some("ada"), "a@x"),
            member(Some(2), Some("Bea"), None, "b@x"),
        ];
        let context = DirectoryContext {
            parent_team_id: Some(9),
            event_type_slug: "intro".into(),
        };
        let pool = member_options(&members, &context, &EnglishText);
        assert_eq!(pool.len(), 2);
        let bea = pool.get(2).unwrap();
        assert!(bea.is_pending);
        assert_eq!(bea.display_label, "Bea (pending)");
    }

    #[test]
    fn test_sub_team_member_with_username_is_pending() {
        let members = vec![member(Some(1), Some("Ada"), Some("ada"), "a@x")];
        let context = DirectoryContext {
            parent_team_id: Some(9),
            event_type_slug: "intro".into(),
        };
        let pool = member_options(&members, &context, &EnglishText);
        let ada = pool.get(1).unwrap();
        assert!(ada.is_pending);
        // Label marker follows the username only
        assert_eq!(ada.display_label, "Ada");

        let top_level = member_options(&members, &DirectoryContext::default(), &EnglishText);
        assert!(!top_level.get(1).unwrap().is_pending);
    }

    #[test]
    fn test_pool_sorted_by_label_case_sensitive_and_stable() {
        let members = vec![
            member(Some(1), Some("bob"), Some("b1"), "b@x"),
            member(Some(2), Some("Zed"), Some("z"), "z@x"),
            member(Some(3), Some("Amy"), Some("a"), "a@x"),
            member(Some(4), Some("bob"), Some("b2"), "b2@x"),
        ];
        let pool = member_options(&members, &DirectoryContext::default(), &EnglishText);
        // Uppercase sorts before lowercase in codepoint order
        assert_eq!(pool.ids().collect::<Vec<_>>(), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_members_without_id_are_dropped() {
        let members = vec![member(None, Some("Ghost"), Some("g"), "g@x")];
        let pool = member_options(&members, &DirectoryContext::default(), &EnglishText);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_children_options_strip_current_slug() {
        let mut owner = member(Some(5), Some("Cy"), Some("cy"), "c@x");
        owner.event_types = vec!["intro".into(), "demo".into()];
        let context = DirectoryContext {
            parent_team_id: None,
            event_type_slug: "intro".into(),
        };

        let children = children_options(&[owner], &context, &EnglishText);
        assert_eq!(children.len(), 1);
        let child = &children[0];
        assert_eq!(child.slug, "intro");
        assert_eq!(child.value, "5");
        assert!(!child.hidden && !child.created);
        assert_eq!(child.owner.event_type_slugs, vec!["demo".to_string()]);
    }
}
