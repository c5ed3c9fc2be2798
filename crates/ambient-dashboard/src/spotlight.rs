//! Interactive card shell with a pointer-tracked highlight
//!
//! A card that has an activation handler behaves like a button: it is
//! focusable, exposes the `button` role, and treats `Enter` and `Space` the
//! same as a click. Without a handler it is a plain `region`.

use std::fmt;

/// Default highlight colour
pub const DEFAULT_SPOTLIGHT: &str = "rgba(56, 189, 248, 0.12)";

/// Border treatment of an urgent card
pub const URGENT_BORDER: &str = "border-amber-500/60 shadow-[0_4px_30px_rgba(245,158,11,0.2)]";

/// Border treatment of a regular card
pub const REGULAR_BORDER: &str = "border-slate-800 hover:border-sky-500/40";

/// Semantic role exposed to assistive technology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Activatable card
    Button,
    /// Static card
    Region,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Button => write!(f, "button"),
            Self::Region => write!(f, "region"),
        }
    }
}

/// Keys a card reacts to, by DOM key name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// `Enter`
    Enter,
    /// `" "`
    Space,
    /// Anything else
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(name: &str) -> Self {
        match name {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            other => Self::Other(other.to_string()),
        }
    }

    const fn activates(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The activation handler ran
    pub activated: bool,
    /// The browser default (scrolling on Space) must be suppressed
    pub prevent_default: bool,
}

/// Bounding box of the card in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
}

/// A spotlight card
pub struct SpotlightCard<'a> {
    on_activate: Option<Box<dyn FnMut() + Send + 'a>>,
    urgent: bool,
    spotlight_color: String,
    aria_label: Option<String>,
    opens_dialog: bool,
    position: (f64, f64),
    opacity: f64,
}

impl fmt::Debug for SpotlightCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotlightCard")
            .field("interactive", &self.is_interactive())
            .field("urgent", &self.urgent)
            .field("position", &self.position)
            .field("opacity", &self.opacity)
            .finish_non_exhaustive()
    }
}

impl Default for SpotlightCard<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SpotlightCard<'a> {
    /// A static card
    pub fn new() -> Self {
        Self {
            on_activate: None,
            urgent: false,
            spotlight_color: DEFAULT_SPOTLIGHT.to_string(),
            aria_label: None,
            opens_dialog: false,
            position: (0.0, 0.0),
            opacity: 0.0,
        }
    }

    /// Make the card activatable
    #[must_use]
    pub fn on_activate(mut self, handler: impl FnMut() + Send + 'a) -> Self {
        self.on_activate = Some(Box::new(handler));
        self
    }

    /// Select the urgent border variant
    #[must_use]
    pub fn urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    /// Override the highlight colour
    #[must_use]
    pub fn spotlight_color(mut self, color: impl Into<String>) -> Self {
        self.spotlight_color = color.into();
        self
    }

    /// Accessible name
    #[must_use]
    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    /// Announce that activation opens a dialog
    #[must_use]
    pub fn opens_dialog(mut self, opens: bool) -> Self {
        self.opens_dialog = opens;
        self
    }

    /// Whether an activation handler is attached
    pub const fn is_interactive(&self) -> bool {
        self.on_activate.is_some()
    }

    /// Semantic role
    pub const fn role(&self) -> Role {
        if self.is_interactive() {
            Role::Button
        } else {
            Role::Region
        }
    }

    /// `tabindex`, present only when interactive
    pub const fn tab_index(&self) -> Option<i32> {
        if self.is_interactive() { Some(0) } else { None }
    }

    /// `aria-haspopup`, present only when the card opens a dialog
    pub const fn aria_haspopup(&self) -> Option<&'static str> {
        if self.opens_dialog { Some("dialog") } else { None }
    }

    /// Accessible name, if any
    pub fn label(&self) -> Option<&str> {
        self.aria_label.as_deref()
    }

    /// Whether the urgent border is active
    pub const fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Border classes for the current variant
    pub const fn border(&self) -> &'static str {
        if self.urgent { URGENT_BORDER } else { REGULAR_BORDER }
    }

    /// Highlight centre relative to the card
    pub const fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Highlight opacity, 0 or 1
    pub const fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Track the pointer relative to the card's bounding box
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, bounds: Bounds) {
        self.position = (client_x - bounds.left, client_y - bounds.top);
    }

    /// Pointer entered the card
    pub const fn pointer_enter(&mut self) {
        self.opacity = 1.0;
    }

    /// Pointer left the card
    pub const fn pointer_leave(&mut self) {
        self.opacity = 0.0;
    }

    /// Pointer click; returns whether the handler ran
    pub fn click(&mut self) -> bool {
        match self.on_activate.as_mut() {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Key press while focused
    pub fn key_down(&mut self, key: &Key) -> KeyOutcome {
        if !key.activates() {
            return KeyOutcome {
                activated: false,
                prevent_default: false,
            };
        }
        let activated = self.click();
        KeyOutcome {
            activated,
            prevent_default: activated,
        }
    }

    /// CSS background of the highlight layer
    pub fn highlight_css(&self) -> String {
        format!(
            "radial-gradient(600px circle at {}px {}px, {}, transparent 40%)",
            self.position.0, self.position.1, self.spotlight_color
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    #[case("Enter", 1)]
    #[case(" ", 1)]
    #[case("Escape", 0)]
    #[case("a", 0)]
    #[case("Tab", 0)]
    fn test_keyboard_activation(#[case] key: &str, #[case] expected: usize) {
        let count = AtomicUsize::new(0);
        let mut card = SpotlightCard::new().on_activate(|| {
            count.fetch_add(1, Ordering::SeqCst);
        });

        let outcome = card.key_down(&Key::from_dom(key));

        assert_eq!(count.load(Ordering::SeqCst), expected);
        assert_eq!(outcome.activated, expected == 1);
        assert_eq!(outcome.prevent_default, expected == 1);
    }

    #[test]
    fn test_static_card_semantics() {
        let mut card = SpotlightCard::new().urgent(true);
        assert_eq!(card.role(), Role::Region);
        assert_eq!(card.tab_index(), None);
        assert_eq!(card.border(), URGENT_BORDER);

        let outcome = card.key_down(&Key::Enter);
        assert!(!outcome.activated);
        assert!(!outcome.prevent_default);
        assert!(!card.click());
    }

    #[test]
    fn test_interactive_card_semantics() {
        let card = SpotlightCard::new()
            .on_activate(|| {})
            .opens_dialog(true)
            .aria_label("Open 1288 Yonge St");
        assert_eq!(card.role(), Role::Button);
        assert_eq!(card.role().to_string(), "button");
        assert_eq!(card.tab_index(), Some(0));
        assert_eq!(card.aria_haspopup(), Some("dialog"));
        assert_eq!(card.border(), REGULAR_BORDER);
    }

    #[test]
    fn test_pointer_tracking() {
        let mut card = SpotlightCard::new();
        assert_eq!(card.opacity(), 0.0);

        card.pointer_enter();
        card.pointer_move(130.0, 95.0, Bounds { left: 100.0, top: 80.0 });
        assert_eq!(card.opacity(), 1.0);
        assert_eq!(card.position(), (30.0, 15.0));
        assert_eq!(
            card.highlight_css(),
            "radial-gradient(600px circle at 30px 15px, rgba(56, 189, 248, 0.12), transparent 40%)"
        );

        card.pointer_leave();
        assert_eq!(card.opacity(), 0.0);
    }

    #[test]
    fn test_repeated_activation_counts_each_press() {
        let count = AtomicUsize::new(0);
        let mut card = SpotlightCard::new().on_activate(|| {
            count.fetch_add(1, Ordering::SeqCst);
        });
        card.key_down(&Key::Enter);
        card.key_down(&Key::Space);
        card.click();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
