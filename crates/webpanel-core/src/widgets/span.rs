//! Span: server-driven text.

use std::borrow::Cow;

use crate::driver::Driver;
use crate::element::{Element, ElementState};
use crate::revision::Revision;

/// A `<span>` whose content is set by the server.
///
/// The content is assigned to `innerHTML` on the client, so it may carry
/// markup.
#[derive(Debug, Clone)]
pub struct Span {
    state: ElementState,
    text: String,
}

impl Span {
    pub fn new(id: impl Into<Cow<'static, str>>, text: impl Into<String>) -> Self {
        Self {
            state: ElementState::new(id),
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the content. Always stamps the element, even if the text is
    /// equal to the previous one.
    pub fn set_text(&mut self, text: impl Into<String>, revision: Revision) {
        self.text = text.into();
        self.state.mark_changed(revision);
    }
}

impl Element for Span {
    fn state(&self) -> &ElementState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ElementState {
        &mut self.state
    }

    fn value_property(&self) -> &'static str {
        "innerHTML"
    }

    fn value(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn render(&self, driver: &mut dyn Driver) {
        driver.print_content("<span");
        self.state.render_attributes(driver);
        driver.print_content(">");
        driver.print_content(&self.text);
        driver.print_content("</span>\n");
    }

    fn apply_client_value(&mut self, _value: &str) {
        // server-only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::BufferDriver;
    use crate::element::Property;
    use crate::revision::RevisionClock;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render() {
        let mut clock = RevisionClock::new();
        let mut driver = BufferDriver::new(&mut clock);
        Span::new("status", "<b>ok</b>").render(&mut driver);
        assert_eq!(driver.body(), "<span id=\"status\"><b>ok</b></span>\n");
    }

    #[test]
    fn test_set_text_always_stamps() {
        let mut span = Span::new("status", "idle");
        span.set_text("idle", Revision(4));
        assert_eq!(span.state().last_changed(), Revision(4));
        assert_eq!(span.properties(), vec![Property::new("innerHTML", "idle")]);
    }

    #[test]
    fn test_client_value_ignored() {
        let mut span = Span::new("status", "idle");
        span.apply_client_value("hacked");
        assert_eq!(span.text(), "idle");
    }
}
