//! Keyboard mapping
//!
//! The host forwards `KeyboardEvent.key` strings; this turns them into
//! held-key updates and one-shot commands on the pending `TickInput`.

use crate::sim::{Facing, TickInput, WeaponKind};

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Facing),
    Attack,
    Pause,
    Restart,
    Equip(WeaponKind),
}

/// Map a DOM key name to an action
pub fn key_action(key: &str) -> Option<KeyAction> {
    let action = match key {
        "ArrowLeft" => KeyAction::Move(Facing::Left),
        "ArrowRight" => KeyAction::Move(Facing::Right),
        "ArrowUp" => KeyAction::Move(Facing::Up),
        "ArrowDown" => KeyAction::Move(Facing::Down),
        "f" | "F" => KeyAction::Attack,
        "Escape" => KeyAction::Pause,
        "Enter" => KeyAction::Restart,
        "1" => KeyAction::Equip(WeaponKind::Fist),
        "2" => KeyAction::Equip(WeaponKind::Knife),
        "3" => KeyAction::Equip(WeaponKind::Broadsword),
        "4" => KeyAction::Equip(WeaponKind::Spear),
        "5" => KeyAction::Equip(WeaponKind::Whip),
        _ => return None,
    };
    Some(action)
}

/// Apply a key press (`pressed = true`) or release to the pending input.
///
/// Returns true if the key was handled. Releases only matter for movement;
/// auto-repeat presses of one-shot keys just set the same flag again.
pub fn apply_key(input: &mut TickInput, key: &str, pressed: bool) -> bool {
    let Some(action) = key_action(key) else {
        return false;
    };
    match action {
        KeyAction::Move(direction) => input.keys.set(direction, pressed),
        _ if !pressed => {}
        KeyAction::Attack => input.attack = true,
        KeyAction::Pause => input.pause = true,
        KeyAction::Restart => input.restart = true,
        KeyAction::Equip(kind) => input.equip = Some(kind),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_hold_and_release() {
        let mut input = TickInput::default();
        assert!(apply_key(&mut input, "ArrowLeft", true));
        assert!(apply_key(&mut input, "ArrowUp", true));
        assert!(input.keys.left && input.keys.up);

        apply_key(&mut input, "ArrowLeft", false);
        assert!(!input.keys.left);
        assert!(input.keys.up);
    }

    #[test]
    fn test_one_shots_ignore_release() {
        let mut input = TickInput::default();
        apply_key(&mut input, "f", false);
        assert!(!input.attack);
        apply_key(&mut input, "F", true);
        assert!(input.attack);

        apply_key(&mut input, "3", true);
        assert_eq!(input.equip, Some(WeaponKind::Broadsword));

        input.clear_one_shots();
        assert!(!input.attack);
        assert!(input.equip.is_none());
    }

    #[test]
    fn test_unknown_key() {
        let mut input = TickInput::default();
        assert!(!apply_key(&mut input, "q", true));
        assert_eq!(key_action("Tab"), None);
    }
}
