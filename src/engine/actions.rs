use serde::{Deserialize, Serialize};

use crate::domain::{Chips, HandNumber, PlayerId};

/// Тип действия игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    /// Рейз: величина — надбавка К текущей ставке стола, не абсолют.
    /// Новая ставка стола = старая + надбавка.
    Raise(Chips),
    /// All-in – поставить весь оставшийся стек.
    AllIn,
}

/// Ключ идемпотентности действия: (раздача, игрок, порядковый номер).
///
/// Один раз применённый ключ не применяется повторно никогда —
/// повтор считается успешным no-op, не ошибкой.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct ActionKey {
    pub hand_number: HandNumber,
    pub player_id: PlayerId,
    pub seq: u64,
}

/// Присланное игроком действие.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmittedAction {
    pub key: ActionKey,
    pub kind: ActionKind,
}

impl SubmittedAction {
    pub fn player_id(&self) -> PlayerId {
        self.key.player_id
    }
}
