use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::{HandNumber, PlayerId, SeatIndex, TableId};
use crate::engine::actions::ActionKind;

/// Тип события в раздаче.
///
/// Набор повторяет события, которые исходная программа эмитила наружу:
/// наблюдатели восстанавливают по ним ход раздачи без опроса состояния.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandEventKind {
    /// Новая раздача началась.
    HandStarted {
        table_id: TableId,
        hand_number: HandNumber,
    },

    /// Кнопка и блайнды.
    BlindsPosted {
        dealer: SeatIndex,
        small_blind: Option<(SeatIndex, Chips)>,
        big_blind: Option<(SeatIndex, Chips)>,
    },

    /// Действие игрока применено.
    ActionApplied {
        player_id: PlayerId,
        seat: SeatIndex,
        action: ActionKind,
        new_stack: Chips,
        pot_after: Chips,
    },

    /// Игрока сфолдили по таймауту (синтетический fold).
    PlayerTimedOut { seat: SeatIndex },

    /// Запрошено вскрытие карт у оракула.
    RevealRequested { target: Phase, slots: Vec<u8> },

    /// Оракул вскрыл карты борда.
    CommunityApplied { slots: Vec<u8>, cards: Vec<Card> },

    /// Переход на новую улицу.
    PhaseAdvanced { phase: Phase },

    /// Запрошен шоудаун у оракула.
    ShowdownRequested { hand_number: HandNumber },

    /// Итог раздачи зафиксирован, выплаты разнесены по стекам.
    Settled {
        hand_number: HandNumber,
        winners: Vec<PlayerId>,
        payouts: Vec<Chips>,
    },

    /// Раздача аварийно закрыта с возвратом вкладов.
    Refunded { refunds: Vec<(SeatIndex, Chips)> },
}

/// Событие в раздаче с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Журнал событий одной раздачи.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandLog {
    pub events: Vec<HandEvent>,
}

impl HandLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }
}
