//! Concrete element kinds.

pub mod check_button;
pub mod slider;
pub mod span;

pub use check_button::CheckButton;
pub use slider::Slider;
pub use span::Span;
