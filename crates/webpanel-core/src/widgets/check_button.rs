//! CheckButton: checkbox, or radio button when part of a group.

use std::borrow::Cow;

use crate::driver::Driver;
use crate::element::{escape_attr, Element, ElementState};
use crate::revision::Revision;

/// A labelled checkbox.
///
/// A button that belongs to a radio group renders as a radio input sharing
/// the group's name. Mutual exclusion within the group is enforced by the
/// owning [`crate::page::Page`], which knows all members.
#[derive(Debug, Clone)]
pub struct CheckButton {
    state: ElementState,
    label: Cow<'static, str>,
    checked: bool,
    group: Option<Cow<'static, str>>,
}

impl CheckButton {
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        label: impl Into<Cow<'static, str>>,
        checked: bool,
    ) -> Self {
        Self {
            state: ElementState::new(id),
            label: label.into(),
            checked,
            group: None,
        }
    }

    /// Make this button a member of the named radio group (builder).
    pub fn in_group(mut self, group: impl Into<Cow<'static, str>>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Check or uncheck. No-op if unchanged.
    ///
    /// Does not touch other members of the group; go through
    /// [`crate::page::Page::set_checked`] for that.
    pub fn set_checked(&mut self, checked: bool, revision: Revision) -> bool {
        if self.checked == checked {
            return false;
        }
        self.checked = checked;
        self.state.mark_changed(revision);
        true
    }
}

impl Element for CheckButton {
    fn state(&self) -> &ElementState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ElementState {
        &mut self.state
    }

    fn value_property(&self) -> &'static str {
        "checked"
    }

    /// `""` for unchecked: any non-empty string is truthy in the browser.
    fn value(&self) -> Cow<'_, str> {
        Cow::Borrowed(if self.checked { "true" } else { "" })
    }

    fn render(&self, driver: &mut dyn Driver) {
        driver.print_content("<input");
        self.state.render_attributes(driver);
        match &self.group {
            Some(group) => {
                driver.print_content(" type=\"radio\" name=\"");
                driver.print_content(&escape_attr(group));
                driver.print_content("\"");
            }
            None => driver.print_content(" type=\"checkbox\""),
        }
        driver.print_content(" value=\"t\" onChange=\"doRequest(this.id, this.checked ? 't' : 'f');\"");
        if self.checked {
            driver.print_content(" checked=\"true\"");
        }
        driver.print_content("/><label for=\"");
        driver.print_content(&escape_attr(self.id()));
        driver.print_content("\">");
        driver.print_content(&escape_attr(&self.label));
        driver.print_content("</label>");
    }

    /// `t...` checks, anything else unchecks.
    fn apply_client_value(&mut self, value: &str) {
        self.checked = value.starts_with('t');
    }
}
