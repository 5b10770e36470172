use crate::domain::chips::Chips;
use crate::domain::player::Seat;
use crate::domain::table::Table;
use crate::engine::actions::ActionKind;
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;

/// Проверка, может ли игрок выполнить это действие при текущем состоянии ставок.
///
/// Только чтение: ни одна ветка не трогает состояние.
pub fn validate_action(
    seat: &Seat,
    action: &ActionKind,
    table: &Table,
    betting: &BettingState,
) -> Result<(), EngineError> {
    if !seat.can_act() {
        return Err(EngineError::InvalidActor(seat.player_id));
    }

    let to_call = diff_to_call(seat, table);

    match action {
        ActionKind::Fold => Ok(()),

        ActionKind::Check => {
            // Блайнды уже записаны в street_bet при старте раздачи,
            // поэтому "бесплатный" check большого блайнда выводится
            // из общего правила, без особых случаев.
            if seat.street_bet == table.current_bet {
                Ok(())
            } else {
                Err(EngineError::CannotCheck)
            }
        }

        ActionKind::Call => {
            if to_call.is_zero() {
                Err(EngineError::CannotCall)
            } else {
                // Если стека меньше, чем to_call, это будет all-in call –
                // разрешаем, усечение сделает game_loop.
                Ok(())
            }
        }

        ActionKind::Raise(increment) => {
            if betting.raise_closed {
                return Err(EngineError::BettingClosed);
            }
            // Минимальная надбавка — big blind. Олл-ин на меньшее
            // проходит через ActionKind::AllIn, не здесь.
            if *increment < table.config.big_blind {
                return Err(EngineError::RaiseTooSmall {
                    min: table.config.big_blind,
                    got: *increment,
                });
            }
            let needed = to_call + *increment;
            if seat.stack < needed {
                return Err(EngineError::InsufficientChips);
            }
            Ok(())
        }

        ActionKind::AllIn => {
            if seat.stack.is_zero() {
                return Err(EngineError::InsufficientChips);
            }
            Ok(())
        }
    }
}

/// Сколько фишек нужно добавить игроку, чтобы уравнять текущую ставку.
pub fn diff_to_call(seat: &Seat, table: &Table) -> Chips {
    table.current_bet.saturating_sub(seat.street_bet)
}
