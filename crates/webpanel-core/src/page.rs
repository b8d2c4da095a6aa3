//! The page: root of the tree, static HTML shell and request cycle.
//!
//! A page is rendered in full once per browser (`GET`), after which the
//! embedded script keeps it in sync by posting `id`, `value` and `revision`
//! arguments. Each such request runs one cycle:
//!
//! 1. read the client's revision and the target element id
//! 2. apply the submitted value to the target, stamping it so that every
//!    other client picks the change up as well
//! 3. write every element changed since the client's revision as JSON
//! 4. advance the revision clock

use std::borrow::Cow;

use crate::driver::{
    ContentKind, Driver, ARG_ID, ARG_REVISION, ARG_VALUE, MAX_ID_LEN, MAX_VALUE_LEN,
};
use crate::element::Element;
use crate::node::{Container, Node};
use crate::radio::RadioTable;
use crate::revision::{Revision, RevisionClock};
use crate::widgets::{CheckButton, Slider, Span};

/// Client poll interval, in milliseconds.
pub const POLL_INTERVAL_MS: u32 = 1000;

/// Client request timeout, in milliseconds.
pub const REQUEST_TIMEOUT_MS: u32 = 10_000;

const SCRIPT_REQUEST: &str = "\
function doRequest(id='', value='') {
    var req = new XMLHttpRequest();
    req.timeout = requesttimeout;
    req.onload = function() {
        doUpdates(JSON.parse(req.responseText));
    }
    req.open('POST', document.URL, true);
    req.setRequestHeader('Content-type', 'application/x-www-form-urlencoded');
    req.send('id=' + encodeURIComponent(id) + '&value=' + encodeURIComponent(value) + '&revision=' + serverrevision);
}
";

const SCRIPT_UPDATES: &str = "\
function doUpdates(response) {
    serverrevision = response.revision;
    var updates = response.updates;
    for (var i = 0; i < updates.length; i++) {
        var element = document.getElementById(updates[i].id);
        if (!element) continue;
        var changes = updates[i].changes;
        for (var j = 0; j < changes.length; ++j) {
            var path = changes[j][0].split('.');
            var prop = element;
            for (var k = 0; k < (path.length - 1); ++k) {
                prop = prop[path[k]];
            }
            prop[path[path.length - 1]] = changes[j][1];
        }
    }
}
";

const SCRIPT_POLL: &str = "\
function doPoll() {
    doRequest();
}
setInterval(doPoll, pollinterval);
window.addEventListener('load', doPoll);
";

/// Summary of one request cycle, for the transport to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Revision the client said it had seen.
    pub client_revision: Revision,
    /// Requested target id (empty for a pure poll).
    pub target: String,
    /// Whether the target resolved to an element and was updated.
    pub applied: bool,
    /// Whether at least one element was reported.
    pub has_updates: bool,
    /// Revision reported to the client.
    pub revision: Revision,
}

/// Root container plus the static page shell.
#[derive(Debug, Clone)]
pub struct Page {
    title: Cow<'static, str>,
    head_extra: Option<Cow<'static, str>>,
    root: Container,
    radios: RadioTable,
}

impl Page {
    /// Build a page. Radio groups found among `children` are registered here.
    pub fn new(title: impl Into<Cow<'static, str>>, children: Vec<Node>) -> Self {
        let mut root = Container::new(children);
        let radios = RadioTable::collect(&mut root);
        Self {
            title: title.into(),
            head_extra: None,
            root,
            radios,
        }
    }

    /// Extra markup placed at the end of `<head>` (builder).
    pub fn with_head(mut self, extra: impl Into<Cow<'static, str>>) -> Self {
        self.head_extra = Some(extra.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn radio_table(&self) -> &RadioTable {
        &self.radios
    }

    /// Emit the complete HTML document: header, client script and the
    /// current markup of every element.
    pub fn render(&self, driver: &mut dyn Driver) {
        driver.print_header(ContentKind::FullPage);
        driver.print_content("<!DOCTYPE html>\n<HTML><HEAD><TITLE>");
        driver.print_content(&crate::element::escape_attr(&self.title));
        driver.print_content("</TITLE>\n<SCRIPT>\n");
        let completed = driver.clock().completed();
        driver.print_content(&format!(
            "var serverrevision = {};\nvar pollinterval = {};\nvar requesttimeout = {};\n",
            completed, POLL_INTERVAL_MS, REQUEST_TIMEOUT_MS
        ));
        driver.print_content(SCRIPT_REQUEST);
        driver.print_content(SCRIPT_UPDATES);
        driver.print_content(SCRIPT_POLL);
        driver.print_content("</SCRIPT>\n");
        if let Some(extra) = &self.head_extra {
            driver.print_content(extra);
        }
        // Autocomplete restores values without firing change events.
        driver.print_content("</HEAD>\n<BODY><FORM autocomplete=\"off\">\n");
        self.root.render(driver);
        driver.print_content("\n</FORM></BODY></HTML>\n");
    }

    /// Run one request cycle against the arguments supplied by `driver`.
    pub fn handle_request(&mut self, driver: &mut dyn Driver) -> CycleReport {
        let client_revision = Revision::parse_lenient(&driver.get_arg(ARG_REVISION, MAX_ID_LEN));
        let target = driver.get_arg(ARG_ID, MAX_ID_LEN);
        let working = driver.current_revision();

        let applied = if target.is_empty() {
            false
        } else {
            let value = driver.get_arg(ARG_VALUE, MAX_VALUE_LEN);
            self.apply_client_value(&target, &value, working)
        };

        driver.print_header(ContentKind::Json);
        driver.print_content("{\"revision\":");
        driver.print_content(&working.to_string());
        driver.print_content(",\"updates\":[");
        let still_empty = self.root.collect_deltas(client_revision, true, driver);
        driver.print_content("]}");

        driver.advance_revision();

        CycleReport {
            client_revision,
            target,
            applied,
            has_updates: !still_empty,
            revision: working,
        }
    }

    /// Push a client-submitted value into the element `id`. Unknown ids are
    /// ignored.
    fn apply_client_value(&mut self, id: &str, value: &str, revision: Revision) -> bool {
        let Some(node) = self.root.find_mut(id) else {
            return false;
        };
        let Some(element) = node.as_element_mut() else {
            return false;
        };
        element.apply_client_value(value);
        element.state_mut().mark_changed(revision);

        let group = match node {
            Node::CheckButton(button) if button.is_checked() => button.group().map(str::to_string),
            _ => None,
        };
        if let Some(group) = group {
            self.radios.select(&mut self.root, &group, id, revision);
        }
        true
    }

    /// Look up any element by id.
    pub fn element(&self, id: &str) -> Option<&dyn Element> {
        self.root.find(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut dyn Element> {
        self.root.find_mut(id).and_then(Node::as_element_mut)
    }

    pub fn span_mut(&mut self, id: &str) -> Option<&mut Span> {
        match self.root.find_mut(id) {
            Some(Node::Span(span)) => Some(span),
            _ => None,
        }
    }

    pub fn slider_mut(&mut self, id: &str) -> Option<&mut Slider> {
        match self.root.find_mut(id) {
            Some(Node::Slider(slider)) => Some(slider),
            _ => None,
        }
    }

    pub fn check_button_mut(&mut self, id: &str) -> Option<&mut CheckButton> {
        match self.root.find_mut(id) {
            Some(Node::CheckButton(button)) => Some(button),
            _ => None,
        }
    }

    /// Replace the text of span `id`. Returns false if there is no such span.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>, clock: &RevisionClock) -> bool {
        match self.span_mut(id) {
            Some(span) => {
                span.set_text(text, clock.current());
                true
            }
            None => false,
        }
    }

    /// Set the value of slider `id`. Returns false if there is no such slider.
    pub fn set_slider_value(&mut self, id: &str, value: i16, clock: &RevisionClock) -> bool {
        match self.slider_mut(id) {
            Some(slider) => {
                slider.set_value(value, clock.current());
                true
            }
            None => false,
        }
    }

    /// Check or uncheck button `id`. Checking a grouped button unchecks the
    /// rest of its group. Returns false if there is no such button.
    pub fn set_checked(&mut self, id: &str, checked: bool, clock: &RevisionClock) -> bool {
        let revision = clock.current();
        let Some(button) = self.check_button_mut(id) else {
            return false;
        };
        match (checked, button.group().map(str::to_string)) {
            (true, Some(group)) => self.radios.select(&mut self.root, &group, id, revision),
            _ => {
                button.set_checked(checked, revision);
            }
        }
        true
    }

    /// Show or hide element `id`. Returns false if there is no such element.
    pub fn set_visible(&mut self, id: &str, visible: bool, clock: &RevisionClock) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.state_mut().set_visible(visible, clock.current());
                true
            }
            None => false,
        }
    }
}
