//! Оценка силы рук.
//!
//! Движок стола руками НЕ пользуется — сила рук считается у оракула.
//! Этот модуль нужен локальному оракулу (infra::local_oracle), резервному
//! клиентскому пути расчёта и тестам.

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use evaluator::evaluate_best_hand;
pub use hand_rank::{describe_hand, HandRank};
