//! Leaf elements of the panel tree.
//!
//! Every element owns an [`ElementState`] (id, visibility, last-changed
//! stamp) and reports a list of [`Property`] pairs when it has changed since
//! the revision a client last saw. The kind-specific parts (markup, value
//! property, how client input is applied) live behind the [`Element`] trait.

use std::borrow::Cow;

use crate::driver::Driver;
use crate::driver::MAX_ID_LEN;
use crate::revision::{Revision, AHEAD_WINDOW, WRAP_WINDOW};

/// Nested DOM property used to show / hide an element on the client.
pub const DISPLAY_PROPERTY: &str = "style.display";

/// One `(propertyName, propertyValue)` pair of a delta.
///
/// The name may be dotted (`style.display`); the client script resolves it
/// as a nested attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property<'a> {
    pub name: &'static str,
    pub value: Cow<'a, str>,
}

impl<'a> Property<'a> {
    pub fn new(name: &'static str, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// State shared by all element kinds.
#[derive(Debug, Clone)]
pub struct ElementState {
    id: Cow<'static, str>,
    visible: bool,
    /// Set once visibility has been changed; from then on the display
    /// property is part of every delta for this element.
    visibility_touched: bool,
    last_changed: Revision,
}

impl ElementState {
    /// State for element `id`.
    ///
    /// Ids longer than [`MAX_ID_LEN`] bytes are truncated when read from a
    /// request and could never be targeted by a client.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        let id = id.into();
        debug_assert!(
            id.len() <= MAX_ID_LEN,
            "element id '{id}' is longer than {MAX_ID_LEN} bytes"
        );
        Self {
            id,
            visible: true,
            visibility_touched: false,
            last_changed: Revision::INITIAL,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn last_changed(&self) -> Revision {
        self.last_changed
    }

    /// Show or hide the element. No-op if unchanged.
    ///
    /// Returns whether the visibility actually changed.
    pub fn set_visible(&mut self, visible: bool, revision: Revision) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        self.visibility_touched = true;
        self.mark_changed(revision);
        true
    }

    /// Stamp the element with `revision`.
    pub fn mark_changed(&mut self, revision: Revision) {
        self.last_changed = revision;
    }

    /// Whether the element changed after `since`, judged from the clock's
    /// `working` revision.
    ///
    /// Both the stamp and `since` are compared by their age relative to
    /// `working`, so wraparound of the counter is harmless. A stamp older
    /// than [`WRAP_WINDOW`] is pulled forward to the trailing edge of the
    /// window. A client older than the window gets every element; a client
    /// up to [`AHEAD_WINDOW`] ahead of `working` gets none.
    pub fn changed_since(&mut self, since: Revision, working: Revision) -> bool {
        if working.age_of(self.last_changed) > WRAP_WINDOW {
            self.last_changed = working.back(WRAP_WINDOW);
        }
        let since_age = working.age_of(since);
        if since_age > WRAP_WINDOW {
            return since.age_of(working) > AHEAD_WINDOW;
        }
        working.age_of(self.last_changed) < since_age
    }

    /// The display property, if it has to be reported.
    pub fn display_property(&self) -> Option<Property<'static>> {
        if !self.visibility_touched && self.visible {
            return None;
        }
        let value = if self.visible { "" } else { "none" };
        Some(Property::new(DISPLAY_PROPERTY, value))
    }

    /// Print ` id="..."` plus an inline style hiding the element if needed.
    pub fn render_attributes(&self, driver: &mut dyn Driver) {
        driver.print_content(" id=\"");
        driver.print_content(&escape_attr(&self.id));
        driver.print_content("\"");
        if !self.visible {
            driver.print_content(" style=\"display:none\"");
        }
    }
}

/// Kind-specific behavior of a leaf element.
pub trait Element {
    fn state(&self) -> &ElementState;

    fn state_mut(&mut self) -> &mut ElementState;

    /// Name of the DOM property carrying the element's value.
    fn value_property(&self) -> &'static str;

    /// Current value, as the text assigned to [`Element::value_property`].
    fn value(&self) -> Cow<'_, str>;

    /// Emit the element's markup.
    fn render(&self, driver: &mut dyn Driver);

    /// Apply a value submitted by a client. Does not stamp the element.
    fn apply_client_value(&mut self, value: &str);

    fn id(&self) -> &str {
        self.state().id()
    }

    /// Every property reported when the element has changed.
    fn properties(&self) -> Vec<Property<'_>> {
        let mut properties = Vec::with_capacity(2);
        properties.extend(self.state().display_property());
        properties.push(Property::new(self.value_property(), self.value()));
        properties
    }

    /// Write this element's delta object if it changed after `since`.
    ///
    /// `first` tells whether anything has been written to the `updates`
    /// array yet. Returns whether the array is still empty afterwards.
    fn collect_delta(&mut self, since: Revision, first: bool, driver: &mut dyn Driver) -> bool {
        let working = driver.current_revision();
        if !self.state_mut().changed_since(since, working) {
            return first;
        }
        if !first {
            driver.print_content(",");
        }
        write_delta(driver, self.id(), &self.properties());
        false
    }
}

/// Write `{"id":...,"changes":[[name,value],...]}`.
pub fn write_delta(driver: &mut dyn Driver, id: &str, properties: &[Property<'_>]) {
    driver.print_content("{\"id\":");
    driver.print_content(&json_string(id));
    driver.print_content(",\"changes\":[");
    for (i, property) in properties.iter().enumerate() {
        if i > 0 {
            driver.print_content(",");
        }
        driver.print_content("[");
        driver.print_content(&json_string(property.name));
        driver.print_content(",");
        driver.print_content(&json_string(&property.value));
        driver.print_content("]");
    }
    driver.print_content("]}");
}

/// Quote and escape `text` as a JSON string literal.
pub fn json_string(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// Escape text for use inside a double-quoted HTML attribute.
pub fn escape_attr(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
