//! Radio groups.
//!
//! A group is an association between check buttons, not an owner of them:
//! the buttons live in the tree like any other element and carry only the
//! group's name. The [`RadioTable`] maps each group name to the ordered ids
//! of its members and is built once, when the page is constructed.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::element::Element;
use crate::node::{Container, Node};
use crate::revision::Revision;
use crate::widgets::CheckButton;

/// Builder for a set of mutually exclusive check buttons.
///
/// # Example
///
/// ```
/// use webpanel_core::RadioGroup;
///
/// let mode = RadioGroup::new("mode")
///     .option("auto", "Automatic")
///     .option("manual", "Manual")
///     .selected("auto");
/// assert_eq!(mode.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RadioGroup {
    name: Cow<'static, str>,
    options: Vec<CheckButton>,
}

impl RadioGroup {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// Add an unchecked option.
    pub fn option(
        mut self,
        id: impl Into<Cow<'static, str>>,
        label: impl Into<Cow<'static, str>>,
    ) -> Self {
        let button = CheckButton::new(id, label, false).in_group(self.name.clone());
        self.options.push(button);
        self
    }

    /// Check the option with the given id and uncheck all others.
    pub fn selected(mut self, id: &str) -> Self {
        for option in &mut self.options {
            let checked = option.id() == id;
            option.set_checked(checked, Revision::INITIAL);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl From<RadioGroup> for Node {
    fn from(group: RadioGroup) -> Self {
        Node::Container(group.options.into_iter().map(Node::from).collect())
    }
}

/// Group name → member ids, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RadioTable {
    groups: HashMap<String, Vec<String>>,
}

impl RadioTable {
    /// Collect every grouped check button in `root`.
    ///
    /// Groups with more than one checked member are normalized: only the
    /// first checked member (in declaration order) stays checked.
    pub fn collect(root: &mut Container) -> Self {
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        let mut has_checked: HashMap<String, bool> = HashMap::new();

        root.for_each_element_mut(&mut |node| {
            let Node::CheckButton(button) = node else {
                return;
            };
            let Some(group) = button.group().map(str::to_string) else {
                return;
            };
            let id = button.id().to_string();
            let seen = has_checked.entry(group.clone()).or_insert(false);
            if button.is_checked() {
                if *seen {
                    button.set_checked(false, Revision::INITIAL);
                } else {
                    *seen = true;
                }
            }
            groups.entry(group).or_default().push(id);
        });

        Self { groups }
    }

    /// Member ids of the named group.
    pub fn members(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Check `member` and uncheck every other member of `group`.
    ///
    /// Every button whose state changes is stamped with `revision`; the
    /// selected member is stamped even if it was already checked.
    pub fn select(&self, root: &mut Container, group: &str, member: &str, revision: Revision) {
        for id in self.members(group) {
            if let Some(Node::CheckButton(button)) = root.find_mut(id) {
                if id == member {
                    button.set_checked(true, revision);
                    button.state_mut().mark_changed(revision);
                } else {
                    button.set_checked(false, revision);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked(root: &Container, id: &str) -> bool {
        match root.find(id) {
            Some(Node::CheckButton(button)) => button.is_checked(),
            other => panic!("no check button {id}: {other:?}"),
        }
    }

    #[test]
    fn test_builder() {
        let group = RadioGroup::new("mode")
            .option("a", "A")
            .option("b", "B")
            .selected("b");
        let root = Container::new(vec![group.into()]);
        assert!(!checked(&root, "a"));
        assert!(checked(&root, "b"));
    }

    #[test]
    fn test_collect_table() {
        let mut root = Container::new(vec![
            RadioGroup::new("mode").option("a", "A").option("b", "B").into(),
            CheckButton::new("solo", "Solo", true).into(),
            CheckButton::new("c", "C", false).in_group("mode").into(),
        ]);
        let table = RadioTable::collect(&mut root);
        assert_eq!(table.members("mode"), ["a", "b", "c"]);
        assert!(table.members("solo").is_empty());
        assert_eq!(table.group_names().count(), 1);
    }

    #[test]
    fn test_collect_normalizes_multiple_checked() {
        let mut root = Container::new(vec![
            CheckButton::new("a", "A", true).in_group("g").into(),
            CheckButton::new("b", "B", true).in_group("g").into(),
        ]);
        RadioTable::collect(&mut root);
        assert!(checked(&root, "a"));
        assert!(!checked(&root, "b"));
    }

    #[test]
    fn test_select_is_exclusive() {
        let mut root = Container::new(vec![RadioGroup::new("g")
            .option("a", "A")
            .option("b", "B")
            .option("c", "C")
            .selected("a")
            .into()]);
        let table = RadioTable::collect(&mut root);

        table.select(&mut root, "g", "b", Revision(7));
        assert!(!checked(&root, "a"));
        assert!(checked(&root, "b"));
        assert!(!checked(&root, "c"));

        let stamp = |id: &str| {
            root.find(id)
                .and_then(Node::as_element)
                .map(|e| e.state().last_changed())
        };
        assert_eq!(stamp("a"), Some(Revision(7)));
        assert_eq!(stamp("b"), Some(Revision(7)));
        // c did not change state
        assert_eq!(stamp("c"), Some(Revision::INITIAL));
    }
}
