use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{HandNumber, PlayerId};

/// Фаза жизненного цикла стола.
///
/// Порядок фиксированный: Waiting → PreFlop → Flop → Turn → River →
/// Showdown → Complete, без пропусков. Complete → PreFlop — только через
/// явный перезапуск раздачи (новый номер, сдвиг дилера, чистый борд).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Waiting,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl Phase {
    /// Идёт ли на этой фазе торговля.
    pub fn is_betting(self) -> bool {
        matches!(self, Phase::PreFlop | Phase::Flop | Phase::Turn | Phase::River)
    }

    /// Какие слоты борда открывает reveal, завершающий эту фазу.
    /// Флоп — три карты, тёрн и ривер — по одной.
    pub fn reveal_slots(self) -> Option<&'static [u8]> {
        match self {
            Phase::PreFlop => Some(&[0, 1, 2]),
            Phase::Flop => Some(&[3]),
            Phase::Turn => Some(&[4]),
            _ => None,
        }
    }

    /// В какую фазу ведёт reveal из этой фазы.
    pub fn reveal_target(self) -> Option<Phase> {
        match self {
            Phase::PreFlop => Some(Phase::Flop),
            Phase::Flop => Some(Phase::Turn),
            Phase::Turn => Some(Phase::River),
            _ => None,
        }
    }
}

/// Категория силы руки. Числовое значение совпадает с тем,
/// что присылает оракул в поле `winning_hand_category`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Option<HandCategory> {
        Some(match v {
            0 => HandCategory::HighCard,
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            8 => HandCategory::StraightFlush,
            _ => return None,
        })
    }
}

/// Зафиксированный итог раздачи.
///
/// Создаётся ровно один раз на номер раздачи: повторная присылка того же
/// номера — идемпотентный no-op, выплат второй раз не бывает.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameResult {
    pub hand_number: HandNumber,
    /// Победители в порядке, присланном оракулом.
    pub winners: Vec<PlayerId>,
    /// Выплаты параллельно winners; сумма равна банку на момент шоудауна.
    pub payouts: Vec<Chips>,
    pub winning_category: HandCategory,
    /// Борд на момент фиксации (слоты, не дошедшие до вскрытия, — None).
    pub final_board: [Option<Card>; 5],
    /// Непрозрачный аттестат честности от оракула. Движок его не проверяет,
    /// только хранит и отдаёт наружу.
    pub proof: Vec<u8>,
    pub settled_at: u64,
}
