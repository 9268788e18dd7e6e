//! Keyboard shortcuts for the demo window.

use winit::keyboard::{Key, NamedKey};

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Toggle,
    ToggleLayerBounds,
    ToggleControls,
    Quit,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, action: ShortcutAction, description: &'static str) -> Self {
        Self {
            key,
            action,
            description,
        }
    }

    fn matches(&self, key: &Key) -> bool {
        match key {
            Key::Named(NamedKey::Space) => self.key == "Space",
            Key::Named(NamedKey::Escape) => self.key == "Escape",
            Key::Character(c) => c.eq_ignore_ascii_case(self.key),
            _ => false,
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Space", ShortcutAction::Toggle, "Toggle the button"),
            Shortcut::new("B", ShortcutAction::ToggleLayerBounds, "Show layer bounds"),
            Shortcut::new("H", ShortcutAction::ToggleControls, "Hide or show controls"),
            Shortcut::new("Escape", ShortcutAction::Quit, "Quit"),
        ]
    }

    /// Look up the action bound to a logical key.
    pub fn action_for(key: &Key) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key))
            .map(|shortcut| shortcut.action)
    }

    /// Log all shortcuts.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:8} {}", shortcut.key, shortcut.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_toggles() {
        assert_eq!(
            ShortcutRegistry::action_for(&Key::Named(NamedKey::Space)),
            Some(ShortcutAction::Toggle)
        );
    }

    #[test]
    fn test_escape_quits() {
        assert_eq!(
            ShortcutRegistry::action_for(&Key::Named(NamedKey::Escape)),
            Some(ShortcutAction::Quit)
        );
    }

    #[test]
    fn test_character_case_insensitive() {
        assert_eq!(
            ShortcutRegistry::action_for(&Key::Character("b".into())),
            Some(ShortcutAction::ToggleLayerBounds)
        );
        assert_eq!(
            ShortcutRegistry::action_for(&Key::Character("H".into())),
            Some(ShortcutAction::ToggleControls)
        );
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(ShortcutRegistry::action_for(&Key::Character("q".into())), None);
        assert_eq!(ShortcutRegistry::action_for(&Key::Named(NamedKey::Enter)), None);
    }
}
