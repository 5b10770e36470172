use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{GameResult, HandCategory, Phase};
use crate::domain::table::Table;
use crate::domain::{HandNumber, PlayerId, SeatIndex, TableId};
use crate::engine::errors::EngineError;
use crate::engine::events::HandEventKind;
use crate::engine::game_loop::{advance_street, is_street_complete, open_betting_street, HandEngine};
use crate::engine::pot::PotBreakdown;
use crate::engine::side_pots::SidePot;

/// Запрос оракулу на вскрытие общих карт.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevealRequest {
    pub table_id: TableId,
    pub hand_number: HandNumber,
    /// Слоты борда: [0,1,2] для флопа, [3] для тёрна, [4] для ривера.
    pub slots: Vec<u8>,
}

/// Запрос оракулу на шоудаун.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowdownRequest {
    pub table_id: TableId,
    pub hand_number: HandNumber,
    pub board: [Option<Card>; 5],
    /// Слои банка с допусками — оракул обязан их уважать в выплатах.
    pub pots: Vec<SidePot>,
    /// Претенденты на банк (не сфолдившие).
    pub contenders: Vec<(SeatIndex, PlayerId)>,
}

/// Какой колбэк ждёт раздача.
///
/// Это и есть реентри-гард перехода фазы: пока он занят, второй запрос
/// на тот же переход не уходит, а действия игроков отклоняются.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PendingCallback {
    Reveal { target: Phase, slots: Vec<u8> },
    Showdown,
}

/// Исполнитель запросов движка: MPC-сеть, локальный симулятор или
/// резервный клиентский расчёт. Движок всем им верит одинаково —
/// проверяя только форму ответа и сохранение фишек.
pub trait DealOracle {
    fn request_reveal(&mut self, req: RevealRequest);
    fn request_showdown(&mut self, req: ShowdownRequest);
}

/// Оракул-регистратор: никуда не ходит, просто копит запросы.
/// Удобен в тестах и ручных драйверах.
#[derive(Debug, Default)]
pub struct RecordingOracle {
    pub reveals: Vec<RevealRequest>,
    pub showdowns: Vec<ShowdownRequest>,
}

impl RecordingOracle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DealOracle for RecordingOracle {
    fn request_reveal(&mut self, req: RevealRequest) {
        self.reveals.push(req);
    }

    fn request_showdown(&mut self, req: ShowdownRequest) {
        self.showdowns.push(req);
    }
}

/// Итог применения reveal-колбэка.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    Applied,
    /// Все присланные слоты уже были вскрыты: повторная доставка, no-op.
    Duplicate,
}

/// Итог применения settlement-колбэка.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlementOutcome {
    Settled,
    /// Этот номер раздачи уже зафиксирован: повторная доставка, no-op.
    AlreadySettled,
}

/// Присланный оракулом (или резервным путём) итог шоудауна.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowdownSubmission {
    pub hand_number: HandNumber,
    pub winners: Vec<PlayerId>,
    /// Выплаты параллельно winners; сумма обязана сойтись с банком.
    pub payouts: Vec<Chips>,
    pub winning_category: HandCategory,
    pub final_board: [Option<Card>; 5],
    /// Непрозрачный аттестат честности; движок его не интерпретирует.
    pub proof: Vec<u8>,
}

/// Применить вскрытые оракулом карты борда.
///
/// Повторная доставка тех же слотов — no-op (at-least-once); чужой номер
/// раздачи отклоняется как устаревший; слоты, которые никто не запрашивал,
/// вскрывать нельзя. Применяется атомарно: сперва все проверки, потом запись.
pub fn apply_community_cards<O: DealOracle>(
    table: &mut Table,
    engine: &mut HandEngine,
    hand_number: HandNumber,
    slots: &[u8],
    values: &[Card],
    oracle: &mut O,
) -> Result<RevealOutcome, EngineError> {
    if hand_number != table.hand_number {
        return Err(EngineError::StaleCallback {
            expected: table.hand_number,
            got: hand_number,
        });
    }
    if slots.len() != values.len() {
        return Err(EngineError::Internal("slots и values разной длины"));
    }

    let allowed: Vec<u8> = match &engine.pending {
        Some(PendingCallback::Reveal { slots, .. }) => slots.clone(),
        _ => Vec::new(),
    };

    let mut fresh: Vec<(u8, Card)> = Vec::new();
    for (&slot, &value) in slots.iter().zip(values.iter()) {
        if slot as usize >= table.board.len() {
            return Err(EngineError::InvalidRevealSlot(slot));
        }
        if table.board[slot as usize].is_some() {
            // Уже вскрытый слот: повторная доставка.
            continue;
        }
        if !allowed.contains(&slot) {
            // Слот ещё не запрашивался — вскрывать рано.
            return Err(EngineError::WrongPhase);
        }
        fresh.push((slot, value));
    }

    if fresh.is_empty() {
        return Ok(RevealOutcome::Duplicate);
    }

    for &(slot, value) in &fresh {
        table.board[slot as usize] = Some(value);
    }
    engine.log.push(HandEventKind::CommunityApplied {
        slots: fresh.iter().map(|(s, _)| *s).collect(),
        cards: fresh.iter().map(|(_, c)| *c).collect(),
    });

    // Все запрошенные слоты на месте → фаза переходит дальше.
    let complete = match &engine.pending {
        Some(PendingCallback::Reveal { slots, .. }) => {
            slots.iter().all(|&s| table.board[s as usize].is_some())
        }
        _ => false,
    };

    if complete {
        let target = match engine.pending.take() {
            Some(PendingCallback::Reveal { target, .. }) => target,
            _ => return Err(EngineError::Internal("гард исчез при переходе")),
        };
        table.phase = target;
        engine.log.push(HandEventKind::PhaseAdvanced { phase: target });

        if engine.fast_forward {
            // Единственный претендент: торговли нет, сразу следующий запрос.
            advance_street(table, engine, oracle);
        } else {
            open_betting_street(table, engine);
            if is_street_complete(table, engine) {
                // Все в олл-ине — борд докатывается без торговли.
                table.current_turn = None;
                advance_street(table, engine, oracle);
            }
        }
    }

    Ok(RevealOutcome::Applied)
}

/// Применить итог шоудауна.
///
/// Слои банка пересчитываются движком заново: оракул не может заплатить
/// месту, не участвующему в слое, или больше, чем слои этому месту
/// позволяют. Ошибка сохранения фишек не меняет ни одного стека.
pub fn apply_settlement(
    table: &mut Table,
    engine: &mut HandEngine,
    results: &mut Vec<GameResult>,
    submission: ShowdownSubmission,
    now: u64,
) -> Result<SettlementOutcome, EngineError> {
    // Повторная присылка уже зафиксированного номера — идемпотентный успех,
    // даже если цифры внутри другие: выплаты второй раз не разносятся.
    if results
        .iter()
        .any(|r| r.hand_number == submission.hand_number)
    {
        return Ok(SettlementOutcome::AlreadySettled);
    }
    if submission.hand_number != table.hand_number {
        return Err(EngineError::StaleCallback {
            expected: table.hand_number,
            got: submission.hand_number,
        });
    }
    if table.phase != Phase::Showdown {
        return Err(EngineError::WrongPhase);
    }
    if submission.final_board != table.board {
        return Err(EngineError::BoardMismatch);
    }
    if submission.winners.is_empty() || submission.winners.len() != submission.payouts.len() {
        return Err(EngineError::InvalidPayoutDistribution(
            "длины winners и payouts не совпадают или пусты".into(),
        ));
    }

    let breakdown = PotBreakdown::from_seats(&table.seats);
    if breakdown.total != table.pot {
        return Err(EngineError::Internal("банк разошёлся со слоями"));
    }

    let paid_total: Chips = submission.payouts.iter().copied().sum();
    if paid_total != table.pot {
        return Err(EngineError::InvalidPayoutDistribution(format!(
            "сумма выплат {} не равна банку {}",
            paid_total, table.pot
        )));
    }

    let mut seat_payouts: Vec<(SeatIndex, Chips)> = Vec::new();
    let mut seen: Vec<PlayerId> = Vec::new();
    for (winner, payout) in submission.winners.iter().zip(submission.payouts.iter()) {
        if seen.contains(winner) {
            return Err(EngineError::InvalidPayoutDistribution(format!(
                "победитель {} встречается дважды",
                winner
            )));
        }
        seen.push(*winner);

        let seat_idx = table.seat_of_player(*winner).ok_or_else(|| {
            EngineError::InvalidPayoutDistribution(format!(
                "победитель {} не сидит за столом",
                winner
            ))
        })?;

        if payout.is_zero() {
            continue;
        }
        if !breakdown.is_eligible_anywhere(seat_idx) {
            return Err(EngineError::InvalidPayoutDistribution(format!(
                "место {} не участвует ни в одном слое",
                seat_idx
            )));
        }
        let cap = breakdown.eligible_total_for(seat_idx);
        if *payout > cap {
            return Err(EngineError::InvalidPayoutDistribution(format!(
                "выплата {} месту {} превышает доступные слои ({})",
                payout, seat_idx, cap
            )));
        }
        seat_payouts.push((seat_idx, *payout));
    }

    // Проверки пройдены — применяем атомарно.
    for &(seat_idx, payout) in &seat_payouts {
        if let Some(seat) = table.seats[seat_idx as usize].as_mut() {
            seat.stack += payout;
        }
    }
    table.pot = Chips::ZERO;
    table.current_turn = None;
    table.phase = Phase::Complete;
    table.last_action_ts = now;

    engine.pending = None;
    engine.fast_forward = false;

    engine.log.push(HandEventKind::Settled {
        hand_number: submission.hand_number,
        winners: submission.winners.clone(),
        payouts: submission.payouts.clone(),
    });

    results.push(GameResult {
        hand_number: submission.hand_number,
        winners: submission.winners,
        payouts: submission.payouts,
        winning_category: submission.winning_category,
        final_board: table.board,
        proof: submission.proof,
        settled_at: now,
    });

    Ok(SettlementOutcome::Settled)
}
