//! Keyboard bindings for the two players sharing one keyboard.

use tanks_core::{Action, Direction, PlayerId};

/// Map a raw key to an action. Keys outside both players' sets yield `None`.
///
/// | player | north | west | south | east | fire | barrel |
/// |--------|-------|------|-------|------|------|--------|
/// | 1      | `w`   | `a`  | `s`   | `d`  | `f`  | `r`    |
/// | 2      | `o`   | `k`  | `l`   | `;`  | `'`  | `[`    |
pub fn action_for_key(key: char) -> Option<Action> {
    use Direction::*;
    use PlayerId::*;

    let action = match key {
        'w' => Action::moving(One, North),
        'a' => Action::moving(One, West),
        's' => Action::moving(One, South),
        'd' => Action::moving(One, East),
        'f' => Action::fire(One),
        'r' => Action::place_barrel(One),
        'o' => Action::moving(Two, North),
        'k' => Action::moving(Two, West),
        'l' => Action::moving(Two, South),
        ';' => Action::moving(Two, East),
        '\'' => Action::fire(Two),
        '[' => Action::place_barrel(Two),
        _ => return None,
    };
    Some(action)
}
