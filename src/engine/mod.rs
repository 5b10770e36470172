//! Движок стола: действия, торговля, сайд-поты, переходы улиц,
//! обмен с внешним оракулом раздачи.
//!
//! Высокоуровневый объект: `TableRegistry` (реестр агрегатов столов).
//! Основные операции:
//!   - `start_hand` – запустить новую раздачу
//!   - `apply_action` – применить действие игрока
//!   - `request_street_advance` – ручной запрос перехода улицы
//!   - `apply_community_cards` / `apply_settlement` – колбэки оракула

pub mod actions;
pub mod betting;
pub mod errors;
pub mod events;
pub mod game_loop;
pub mod oracle;
pub mod positions;
pub mod pot;
pub mod registry;
pub mod side_pots;
pub mod validation;

pub use actions::{ActionKey, ActionKind, SubmittedAction};
pub use errors::EngineError;
pub use events::{HandEvent, HandEventKind, HandLog};
pub use game_loop::{
    apply_action, force_fold, force_refund, is_street_complete, request_street_advance,
    start_hand, ActionOutcome, AdvanceOutcome, HandEngine,
};
pub use oracle::{
    apply_community_cards, apply_settlement, DealOracle, PendingCallback, RecordingOracle,
    RevealOutcome, RevealRequest, SettlementOutcome, ShowdownRequest, ShowdownSubmission,
};
pub use pot::PotBreakdown;
pub use registry::{RegistryError, TableAggregate, TableRegistry};
pub use side_pots::{compute_side_pots, pot_entries, PotEntry, SidePot};
