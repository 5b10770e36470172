use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::SeatStatus;
use crate::domain::table::Table;
use crate::domain::{HandNumber, SeatIndex, TableId};
use crate::engine::actions::{ActionKey, ActionKind, SubmittedAction};
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;
use crate::engine::events::{HandEventKind, HandLog};
use crate::engine::oracle::{DealOracle, PendingCallback, RevealRequest, ShowdownRequest};
use crate::engine::positions::{collect_actionable_from, next_dealer};
use crate::engine::pot::PotBreakdown;
use crate::engine::side_pots::SidePot;
use crate::engine::validation::validate_action;

/// Итог применения действия.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    /// Ключ уже применялся: повтор доставки, состояние не изменилось.
    Duplicate,
}

/// Итог ручного запроса перехода улицы.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Requested,
    /// Переход уже запрошен другим маршрутом — гард занят.
    AlreadyPending,
}

/// Состояние активной раздачи поверх доменного стола.
///
/// Здесь живёт всё, что умирает вместе с раздачей: очередь ставок,
/// ключи применённых действий, гард ожидания оракула, журнал.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEngine {
    pub table_id: TableId,
    pub hand_number: HandNumber,
    pub betting: BettingState,
    /// Ключи уже применённых действий (отсечение повторной доставки).
    pub applied_actions: BTreeSet<ActionKey>,
    /// Какой колбэк оракула ждём; пока занят — действия запрещены.
    pub pending: Option<PendingCallback>,
    /// Остался один претендент: борд докручивается без торговли.
    pub fast_forward: bool,
    /// Слои банка, пересчитанные на последней границе.
    pub side_pots: Vec<SidePot>,
    pub log: HandLog,
}

/// Старт новой раздачи:
/// - сдвигает кнопку;
/// - готовит места и борд;
/// - постит блайнды прямо в street_bet/total_contributed;
/// - строит очередь действия префлопа.
///
/// Карты не сдаются: их вскрывает оракул по запросам движка.
pub fn start_hand(table: &mut Table, now: u64) -> Result<HandEngine, EngineError> {
    if !matches!(table.phase, Phase::Waiting | Phase::Complete) {
        return Err(EngineError::WrongPhase);
    }
    if table.playable_count() < table.config.min_seats as usize {
        return Err(EngineError::NotEnoughPlayers);
    }

    // Сброс мест: стеки переносятся, пустые стеки выбывают из раздачи.
    for seat_opt in table.seats.iter_mut() {
        if let Some(seat) = seat_opt {
            seat.reset_for_new_hand();
        }
    }

    let dealer = next_dealer(table).ok_or(EngineError::NotEnoughPlayers)?;
    table.dealer_seat = dealer;
    table.hand_number += 1;
    table.phase = Phase::PreFlop;
    table.board = [None; 5];
    table.pot = Chips::ZERO;
    table.current_bet = Chips::ZERO;
    table.current_turn = None;
    table.last_action_ts = now;

    let mut engine = HandEngine {
        table_id: table.id,
        hand_number: table.hand_number,
        betting: BettingState::new(Vec::new()),
        applied_actions: BTreeSet::new(),
        pending: None,
        fast_forward: false,
        side_pots: Vec::new(),
        log: HandLog::new(),
    };

    engine.log.push(HandEventKind::HandStarted {
        table_id: table.id,
        hand_number: table.hand_number,
    });

    post_blinds(table, &mut engine, dealer);
    refresh_side_pots(table, &mut engine);

    Ok(engine)
}

/// Постинг блайндов. Ставки сразу записываются в street_bet и вклад,
/// поэтому check большого блайнда на префлопе выводится из общего правила.
fn post_blinds(table: &mut Table, engine: &mut HandEngine, dealer: SeatIndex) {
    let order = collect_actionable_from(table, dealer);
    if order.len() < 2 {
        return;
    }

    let sb_seat = order[1 % order.len()];
    let bb_seat = order[2 % order.len()];
    let sb_amount = table.config.small_blind;
    let bb_amount = table.config.big_blind;

    let mut sb_evt = None;
    if let Some(seat) = table.seats[sb_seat as usize].as_mut() {
        let paid = seat.commit_up_to(sb_amount);
        sb_evt = Some((sb_seat, paid));
        table.pot += paid;
    }

    let mut bb_evt = None;
    if let Some(seat) = table.seats[bb_seat as usize].as_mut() {
        let paid = seat.commit_up_to(bb_amount);
        bb_evt = Some((bb_seat, paid));
        table.pot += paid;
    }

    table.current_bet = bb_amount;
    engine.betting.last_aggressor = Some(bb_seat);

    engine.log.push(HandEventKind::BlindsPosted {
        dealer,
        small_blind: sb_evt,
        big_blind: bb_evt,
    });

    // Первым на префлопе ходит следующий за большим блайндом.
    let start = (bb_seat + 1) % table.max_seats();
    engine.betting.to_act = collect_actionable_from(table, start);
    table.current_turn = engine.betting.to_act.first().copied();
}

/// Применить действие игрока (обычный путь с контролем таймера).
pub fn apply_action<O: DealOracle>(
    table: &mut Table,
    engine: &mut HandEngine,
    action: SubmittedAction,
    now: u64,
    oracle: &mut O,
) -> Result<ActionOutcome, EngineError> {
    apply_action_inner(table, engine, action, now, oracle, true)
}

/// Сфолдить текущего актёра по истёкшему таймеру.
///
/// Отдельного пути мутации нет: строится синтетический Fold и уходит
/// в тот же apply_action_inner с тем же учётом ключей.
pub fn force_fold<O: DealOracle>(
    table: &mut Table,
    engine: &mut HandEngine,
    now: u64,
    oracle: &mut O,
) -> Result<ActionOutcome, EngineError> {
    if !table.phase.is_betting() {
        return Err(EngineError::WrongPhase);
    }
    if engine.pending.is_some() {
        return Err(EngineError::AwaitingOracle);
    }

    let seat_idx = table
        .current_turn
        .ok_or(EngineError::Internal("нет текущего актёра"))?;
    let (player_id, seq, bank) = {
        let seat = table
            .seat(seat_idx)
            .ok_or(EngineError::Internal("current_turn указывает на пустое место"))?;
        (seat.player_id, seat.action_seq, seat.time_bank_secs)
    };

    let elapsed = now.saturating_sub(table.last_action_ts);
    if elapsed <= table.config.turn_seconds + bank {
        return Err(EngineError::TimeNotExpired);
    }

    engine.log.push(HandEventKind::PlayerTimedOut { seat: seat_idx });

    let action = SubmittedAction {
        key: ActionKey {
            hand_number: table.hand_number,
            player_id,
            seq: seq + 1,
        },
        kind: ActionKind::Fold,
    };
    apply_action_inner(table, engine, action, now, oracle, false)
}

fn apply_action_inner<O: DealOracle>(
    table: &mut Table,
    engine: &mut HandEngine,
    action: SubmittedAction,
    now: u64,
    oracle: &mut O,
    enforce_clock: bool,
) -> Result<ActionOutcome, EngineError> {
    if !table.phase.is_betting() {
        return Err(EngineError::WrongPhase);
    }
    if engine.pending.is_some() {
        return Err(EngineError::AwaitingOracle);
    }
    if action.key.hand_number != table.hand_number {
        return Err(EngineError::StaleCallback {
            expected: table.hand_number,
            got: action.key.hand_number,
        });
    }
    // Повтор уже применённого ключа — успешный no-op, не ошибка.
    if engine.applied_actions.contains(&action.key) {
        return Ok(ActionOutcome::Duplicate);
    }

    let player_id = action.player_id();
    let seat_idx = table
        .seat_of_player(player_id)
        .ok_or(EngineError::PlayerNotAtTable(player_id))?;
    if table.current_turn != Some(seat_idx) {
        return Err(EngineError::NotYourTurn(player_id));
    }

    // Таймер хода: сверх turn_seconds добираем из таймбанка.
    let elapsed = now.saturating_sub(table.last_action_ts);
    let overage = elapsed.saturating_sub(table.config.turn_seconds);
    if enforce_clock {
        let bank = table.seat(seat_idx).map(|s| s.time_bank_secs).unwrap_or(0);
        if overage > bank {
            return Err(EngineError::TimeExpired);
        }
    }

    {
        let seat = table.seats[seat_idx as usize]
            .as_ref()
            .ok_or(EngineError::Internal("пустое место"))?;
        validate_action(seat, &action.kind, table, &engine.betting)?;
    }

    // Все проверки пройдены — дальше только мутации.
    let bb_amount = table.config.big_blind;
    let kind_for_event = action.kind.clone();

    match action.kind {
        ActionKind::Fold => {
            if let Some(seat) = table.seats[seat_idx as usize].as_mut() {
                seat.status = SeatStatus::Folded;
            }
            engine.betting.mark_acted(seat_idx);
        }

        ActionKind::Check => {
            engine.betting.mark_acted(seat_idx);
        }

        ActionKind::Call => {
            let target = table.current_bet;
            let mut paid = Chips::ZERO;
            if let Some(seat) = table.seats[seat_idx as usize].as_mut() {
                let to_call = target.saturating_sub(seat.street_bet);
                // Стека может не хватить — тогда это all-in call.
                paid = seat.commit_up_to(to_call);
            }
            table.pot += paid;
            engine.betting.mark_acted(seat_idx);
        }

        ActionKind::Raise(increment) => {
            let target = table.current_bet + increment;
            let mut paid = Chips::ZERO;
            if let Some(seat) = table.seats[seat_idx as usize].as_mut() {
                let delta = target.saturating_sub(seat.street_bet);
                paid = seat.commit_up_to(delta);
            }
            table.pot += paid;
            table.current_bet = target;
            // После полного рейза все остальные отвечают заново.
            let queue = betting_order_after_raise(table, seat_idx);
            engine.betting.on_raise(seat_idx, queue);
        }

        ActionKind::AllIn => {
            let mut new_bet = Chips::ZERO;
            let mut paid = Chips::ZERO;
            if let Some(seat) = table.seats[seat_idx as usize].as_mut() {
                let stack = seat.stack;
                paid = seat.commit_up_to(stack);
                new_bet = seat.street_bet;
            }
            table.pot += paid;

            if new_bet > table.current_bet {
                let increment = new_bet - table.current_bet;
                table.current_bet = new_bet;
                let queue = betting_order_after_raise(table, seat_idx);
                if increment >= bb_amount {
                    engine.betting.on_raise(seat_idx, queue);
                } else {
                    // Олл-ин на меньше минимального рейза: остальные отвечают
                    // на новую цифру, но торговля не переоткрывается.
                    engine.betting.on_short_all_in(seat_idx, queue);
                }
            } else {
                engine.betting.mark_acted(seat_idx);
            }
        }
    }

    engine.applied_actions.insert(action.key);
    engine.betting.acted_this_street = engine.betting.acted_this_street.saturating_add(1);

    let new_stack = {
        let seat = table.seats[seat_idx as usize]
            .as_mut()
            .ok_or(EngineError::Internal("пустое место"))?;
        if seat.action_seq < action.key.seq {
            seat.action_seq = action.key.seq;
        }
        if enforce_clock && overage > 0 {
            seat.time_bank_secs -= overage;
        }
        seat.stack
    };
    table.last_action_ts = now;

    engine.log.push(HandEventKind::ActionApplied {
        player_id,
        seat: seat_idx,
        action: kind_for_event,
        new_stack,
        pot_after: table.pot,
    });

    refresh_side_pots(table, engine);

    // Остался один претендент → борд докручивается и банк уходит ему.
    if table.contender_count() <= 1 {
        engine.fast_forward = true;
        table.current_turn = None;
        advance_street(table, engine, oracle);
        return Ok(ActionOutcome::Applied);
    }

    if is_street_complete(table, engine) {
        table.current_turn = None;
        advance_street(table, engine, oracle);
    } else {
        table.current_turn = engine.betting.to_act.first().copied();
    }

    Ok(ActionOutcome::Applied)
}

/// Очередь после рейза: активные места по кругу за рейзером, без него самого.
fn betting_order_after_raise(table: &Table, raiser: SeatIndex) -> Vec<SeatIndex> {
    let start = (raiser + 1) % table.max_seats();
    collect_actionable_from(table, start)
        .into_iter()
        .filter(|&s| s != raiser)
        .collect()
}

/// Завершён ли раунд ставок на текущей улице:
/// - очередь пуста;
/// - либо действовать некому (все в фолде/олл-ине);
/// - либо остался один активный и ему нечего уравнивать.
pub fn is_street_complete(table: &Table, engine: &HandEngine) -> bool {
    if engine.betting.is_round_complete() {
        return true;
    }

    let actionable: Vec<SeatIndex> = table
        .seats
        .iter()
        .filter_map(|s| s.as_ref())
        .filter(|s| s.can_act())
        .map(|s| s.seat_index)
        .collect();

    match actionable.len() {
        0 => true,
        1 => table
            .seat(actionable[0])
            .map(|s| s.street_bet == table.current_bet)
            .unwrap_or(true),
        _ => false,
    }
}

/// Ручной (привилегированный) запрос перехода улицы. Идемпотентен:
/// если гард уже занят автоматическим маршрутом, второй запрос не уходит.
pub fn request_street_advance<O: DealOracle>(
    table: &mut Table,
    engine: &mut HandEngine,
    oracle: &mut O,
) -> Result<AdvanceOutcome, EngineError> {
    if engine.pending.is_some() {
        return Ok(AdvanceOutcome::AlreadyPending);
    }
    if !table.phase.is_betting() {
        return Err(EngineError::WrongPhase);
    }
    if !(engine.fast_forward || is_street_complete(table, engine)) {
        return Err(EngineError::BettingNotComplete);
    }
    advance_street(table, engine, oracle);
    Ok(AdvanceOutcome::Requested)
}

/// Единственная точка перехода фазы: запросить у оракула следующий reveal
/// или шоудаун. Гард `pending` гарантирует не больше одного запроса
/// на переход, каким бы маршрутом сюда ни пришли.
pub(crate) fn advance_street<O: DealOracle>(
    table: &mut Table,
    engine: &mut HandEngine,
    oracle: &mut O,
) {
    if engine.pending.is_some() {
        return;
    }
    refresh_side_pots(table, engine);

    if let (Some(slots), Some(target)) = (table.phase.reveal_slots(), table.phase.reveal_target()) {
        engine.pending = Some(PendingCallback::Reveal {
            target,
            slots: slots.to_vec(),
        });
        engine.log.push(HandEventKind::RevealRequested {
            target,
            slots: slots.to_vec(),
        });
        table.current_turn = None;
        oracle.request_reveal(RevealRequest {
            table_id: table.id,
            hand_number: table.hand_number,
            slots: slots.to_vec(),
        });
    } else if matches!(table.phase, Phase::River | Phase::Showdown) {
        request_showdown(table, engine, oracle);
    }
}

fn request_showdown<O: DealOracle>(table: &mut Table, engine: &mut HandEngine, oracle: &mut O) {
    table.phase = Phase::Showdown;
    table.current_turn = None;
    engine.pending = Some(PendingCallback::Showdown);
    engine.log.push(HandEventKind::ShowdownRequested {
        hand_number: table.hand_number,
    });

    let contenders = table
        .seats
        .iter()
        .filter_map(|s| s.as_ref())
        .filter(|s| s.is_in_hand())
        .map(|s| (s.seat_index, s.player_id))
        .collect();

    oracle.request_showdown(ShowdownRequest {
        table_id: table.id,
        hand_number: table.hand_number,
        board: table.board,
        pots: engine.side_pots.clone(),
        contenders,
    });
}

/// Открыть торговлю на новой улице после применённого reveal.
pub(crate) fn open_betting_street(table: &mut Table, engine: &mut HandEngine) {
    for seat_opt in table.seats.iter_mut() {
        if let Some(seat) = seat_opt {
            seat.reset_street_bet();
        }
    }
    table.current_bet = Chips::ZERO;

    // Постфлоп первым ходит первый активный слева от дилера.
    let start = (table.dealer_seat + 1) % table.max_seats();
    let to_act = collect_actionable_from(table, start);
    engine.betting = BettingState::new(to_act);
    table.current_turn = engine.betting.to_act.first().copied();
}

/// Аварийное закрытие зависшей раздачи: вернуть всем их вклады.
///
/// Разрешено только пока раздача ждёт колбэк оракула. Итог раздачи
/// не фиксируется; фишки сходятся до копейки.
pub fn force_refund(table: &mut Table, engine: &mut HandEngine, now: u64) -> Result<(), EngineError> {
    if engine.pending.is_none() {
        return Err(EngineError::WrongPhase);
    }

    let mut refunds = Vec::new();
    for seat_opt in table.seats.iter_mut() {
        if let Some(seat) = seat_opt {
            let refund = seat.total_contributed;
            if !refund.is_zero() {
                seat.stack += refund;
                seat.total_contributed = Chips::ZERO;
                seat.street_bet = Chips::ZERO;
                refunds.push((seat.seat_index, refund));
            }
        }
    }

    table.pot = Chips::ZERO;
    table.current_bet = Chips::ZERO;
    table.current_turn = None;
    table.phase = Phase::Complete;
    table.last_action_ts = now;

    engine.pending = None;
    engine.fast_forward = false;
    engine.side_pots.clear();
    engine.log.push(HandEventKind::Refunded { refunds });

    Ok(())
}

/// Пересчитать слои банка (граница улицы / фолд / олл-ин / шоудаун).
fn refresh_side_pots(table: &Table, engine: &mut HandEngine) {
    engine.side_pots = PotBreakdown::from_seats(&table.seats).layers;
}
