//! Screenplay element kinds and the keyboard transitions between them.

use serde::{Deserialize, Serialize};

/// Kind of a screenplay line, carried as a class name in the script markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    SceneHeading,
    Action,
    Character,
    Dialogue,
    Parenthetical,
    Transition,
}

/// Order Tab cycles through on an empty line.
pub const CYCLE_ORDER: [ElementKind; 6] = [
    ElementKind::Action,
    ElementKind::Character,
    ElementKind::Parenthetical,
    ElementKind::Dialogue,
    ElementKind::Transition,
    ElementKind::SceneHeading,
];

/// Lookup order when a class attribute carries several known classes.
const CLASS_PRECEDENCE: [ElementKind; 6] = [
    ElementKind::SceneHeading,
    ElementKind::Action,
    ElementKind::Character,
    ElementKind::Dialogue,
    ElementKind::Parenthetical,
    ElementKind::Transition,
];

impl ElementKind {
    /// Class name used in the markup.
    pub fn class_name(self) -> &'static str {
        match self {
            ElementKind::SceneHeading => "script-scene-heading",
            ElementKind::Action => "script-action",
            ElementKind::Character => "script-character",
            ElementKind::Dialogue => "script-dialog",
            ElementKind::Parenthetical => "script-parenthetical",
            ElementKind::Transition => "script-transition",
        }
    }

    /// Resolves a class attribute (possibly several space-separated classes).
    pub fn from_class_attr(class_attr: &str) -> Option<Self> {
        CLASS_PRECEDENCE.into_iter().find(|kind| {
            class_attr
                .split_whitespace()
                .any(|class| class == kind.class_name())
        })
    }

    /// Kind of the line created when Enter is pressed on a line of this kind.
    pub fn next_on_enter(current: Option<Self>) -> Self {
        match current {
            Some(ElementKind::SceneHeading) => ElementKind::Action,
            Some(ElementKind::Action) => ElementKind::Character,
            Some(ElementKind::Character) => ElementKind::Dialogue,
            Some(ElementKind::Dialogue) => ElementKind::Character,
            Some(ElementKind::Parenthetical) => ElementKind::Dialogue,
            Some(ElementKind::Transition) => ElementKind::SceneHeading,
            None => ElementKind::Action,
        }
    }

    /// Kind Tab switches an empty line to. Unknown kinds restart the cycle.
    pub fn next_in_cycle(current: Option<Self>) -> Self {
        let index = current
            .and_then(|kind| CYCLE_ORDER.iter().position(|k| *k == kind))
            .unwrap_or(0);
        CYCLE_ORDER[(index + 1) % CYCLE_ORDER.len()]
    }
}

/// One top-level line of the script body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptElement {
    /// Raw class attribute, kept verbatim so unknown classes survive editing.
    pub class_name: String,
    /// Text content with markup stripped and entities decoded.
    pub text: String,
}

impl ScriptElement {
    /// Creates an element of a known kind.
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            class_name: kind.class_name().to_string(),
            text: text.into(),
        }
    }

    /// Creates an element from a raw class attribute.
    pub fn with_class(class_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            text: text.into(),
        }
    }

    /// Known kind of this element, if any.
    pub fn kind(&self) -> Option<ElementKind> {
        ElementKind::from_class_attr(&self.class_name)
    }

    pub fn set_kind(&mut self, kind: ElementKind) {
        self.class_name = kind.class_name().to_string();
    }

    /// True when the text is blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_class_attr() {
        assert_eq!(
            ElementKind::from_class_attr("script-character"),
            Some(ElementKind::Character)
        );
        assert_eq!(
            ElementKind::from_class_attr("focused script-dialog"),
            Some(ElementKind::Dialogue)
        );
        assert_eq!(
            ElementKind::from_class_attr("script-transition script-scene-heading"),
            Some(ElementKind::SceneHeading)
        );
        assert_eq!(ElementKind::from_class_attr("script-note"), None);
        assert_eq!(ElementKind::from_class_attr(""), None);
    }

    #[test]
    fn test_next_on_enter() {
        use ElementKind::*;
        assert_eq!(ElementKind::next_on_enter(Some(SceneHeading)), Action);
        assert_eq!(ElementKind::next_on_enter(Some(Action)), Character);
        assert_eq!(ElementKind::next_on_enter(Some(Character)), Dialogue);
        assert_eq!(ElementKind::next_on_enter(Some(Dialogue)), Character);
        assert_eq!(ElementKind::next_on_enter(Some(Parenthetical)), Dialogue);
        assert_eq!(ElementKind::next_on_enter(Some(Transition)), SceneHeading);
        assert_eq!(ElementKind::next_on_enter(None), Action);
    }

    #[test]
    fn test_next_in_cycle_wraps() {
        use ElementKind::*;
        assert_eq!(ElementKind::next_in_cycle(Some(Action)), Character);
        assert_eq!(ElementKind::next_in_cycle(Some(Character)), Parenthetical);
        assert_eq!(ElementKind::next_in_cycle(Some(Transition)), SceneHeading);
        assert_eq!(ElementKind::next_in_cycle(Some(SceneHeading)), Action);
        assert_eq!(ElementKind::next_in_cycle(None), Character);
    }

    #[test]
    fn test_set_kind_replaces_class() {
        let mut element = ScriptElement::with_class("script-note extra", "hello");
        assert_eq!(element.kind(), None);
        element.set_kind(ElementKind::Transition);
        assert_eq!(element.class_name, "script-transition");
        assert_eq!(element.kind(), Some(ElementKind::Transition));
    }
}
