use std::collections::{hash_map::Entry, HashMap, VecDeque};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::HandCategory;
use crate::domain::{HandNumber, PlayerId, SeatIndex, TableId};
use crate::engine::oracle::{DealOracle, RevealRequest, ShowdownRequest, ShowdownSubmission};
use crate::engine::registry::{RegistryError, TableRegistry};
use crate::eval::evaluate_best_hand;
use crate::eval::hand_rank::HandRank;
use crate::infra::rng::RandomSource;

/// Локальный оракул: честный in-process симулятор внешней MPC-раздачи.
///
/// Держит по перемешанной колоде на (стол, раздача) и отвечает на запросы
/// движка через те же входные точки `submit_revealed_cards` /
/// `submit_showdown`, что и настоящий оракул. Это же — референс резервного
/// клиентского расчёта: чей ответ придёт первым, тот и выигрывает,
/// второй становится no-op за счёт общей идемпотентности.
pub struct LocalOracle<R: RandomSource> {
    rng: R,
    decks: HashMap<(TableId, HandNumber), Deck>,
    queue: VecDeque<QueuedRequest>,
}

#[derive(Clone, Debug)]
enum QueuedRequest {
    Reveal(RevealRequest),
    Showdown(ShowdownRequest),
}

impl<R: RandomSource> DealOracle for LocalOracle<R> {
    fn request_reveal(&mut self, req: RevealRequest) {
        self.queue.push_back(QueuedRequest::Reveal(req));
    }

    fn request_showdown(&mut self, req: ShowdownRequest) {
        self.queue.push_back(QueuedRequest::Showdown(req));
    }
}

impl<R: RandomSource> LocalOracle<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            decks: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    /// Сколько запросов ещё не обработано.
    pub fn pending_requests(&self) -> usize {
        self.queue.len()
    }

    /// Обработать все накопленные запросы, доставив результаты в реестр.
    ///
    /// Крутится до пустой очереди: применённый reveal может тут же
    /// породить следующий запрос (fast-forward, олл-ин-раскатка).
    pub fn pump(&mut self, registry: &mut TableRegistry, now: u64) -> Result<(), RegistryError> {
        loop {
            let batch: Vec<QueuedRequest> = self.queue.drain(..).collect();
            if batch.is_empty() {
                return Ok(());
            }
            for req in batch {
                match req {
                    QueuedRequest::Reveal(req) => self.deliver_reveal(registry, req)?,
                    QueuedRequest::Showdown(req) => self.deliver_showdown(registry, req, now)?,
                }
            }
        }
    }

    /// Колода раздачи; создаётся и мешается лениво при первом обращении.
    fn deck_for(&mut self, table_id: TableId, hand_number: HandNumber) -> &mut Deck {
        match self.decks.entry((table_id, hand_number)) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let mut deck = Deck::standard_52();
                self.rng.shuffle(&mut deck.cards);
                vacant.insert(deck)
            }
        }
    }

    fn deliver_reveal(
        &mut self,
        registry: &mut TableRegistry,
        req: RevealRequest,
    ) -> Result<(), RegistryError> {
        let values: Vec<u8> = {
            let deck = self.deck_for(req.table_id, req.hand_number);
            deck.draw_n(req.slots.len())
                .iter()
                .map(|c| c.index())
                .collect()
        };

        registry.submit_revealed_cards(req.table_id, req.hand_number, &req.slots, &values, self)?;
        Ok(())
    }

    fn deliver_showdown(
        &mut self,
        registry: &mut TableRegistry,
        req: ShowdownRequest,
        now: u64,
    ) -> Result<(), RegistryError> {
        // Претендентам сдаются по две карты из той же колоды: борд уже снят
        // с её верхушки, коллизий не бывает.
        let mut holes: Vec<(SeatIndex, PlayerId, [Card; 2])> = Vec::new();
        {
            let deck = self.deck_for(req.table_id, req.hand_number);
            for &(seat, player) in &req.contenders {
                let cards = deck.draw_n(2);
                if cards.len() == 2 {
                    holes.push((seat, player, [cards[0], cards[1]]));
                }
            }
        }

        let board: Vec<Card> = req.board.iter().flatten().copied().collect();
        let ranks: HashMap<SeatIndex, (PlayerId, HandRank)> = holes
            .iter()
            .map(|&(seat, player, hole)| (seat, (player, evaluate_best_hand(&hole, &board))))
            .collect();

        // По каждому слою — сильнейшие из допущенных, делёж поровну,
        // нечётная фишка первому по кругу.
        let mut totals: HashMap<PlayerId, Chips> = HashMap::new();
        let mut best_rank: Option<HandRank> = None;

        for pot in &req.pots {
            if pot.amount.is_zero() {
                continue;
            }

            let mut layer_best: Option<HandRank> = None;
            let mut layer_winners: Vec<PlayerId> = Vec::new();
            for &seat in &pot.eligible_seats {
                if let Some(&(player, rank)) = ranks.get(&seat) {
                    match layer_best {
                        None => {
                            layer_best = Some(rank);
                            layer_winners = vec![player];
                        }
                        Some(best) if rank > best => {
                            layer_best = Some(rank);
                            layer_winners = vec![player];
                        }
                        Some(best) if rank == best => layer_winners.push(player),
                        _ => {}
                    }
                }
            }

            if layer_winners.is_empty() {
                continue;
            }

            let share = pot.amount.0 / layer_winners.len() as u64;
            let mut remainder = pot.amount.0 % layer_winners.len() as u64;
            for player in &layer_winners {
                let mut prize = share;
                if remainder > 0 {
                    prize += 1;
                    remainder -= 1;
                }
                *totals.entry(*player).or_insert(Chips::ZERO) += Chips(prize);
            }

            if let Some(best) = layer_best {
                if best_rank.map_or(true, |cur| best > cur) {
                    best_rank = Some(best);
                }
            }
        }

        // Победители в порядке мест — стабильный порядок для идемпотентных
        // повторов.
        let mut winners: Vec<PlayerId> = Vec::new();
        let mut payouts: Vec<Chips> = Vec::new();
        for &(_, player) in &req.contenders {
            if let Some(total) = totals.get(&player) {
                if !total.is_zero() {
                    winners.push(player);
                    payouts.push(*total);
                }
            }
        }

        let winning_category = best_rank
            .map(|r| r.category())
            .unwrap_or(HandCategory::HighCard);

        let submission = ShowdownSubmission {
            hand_number: req.hand_number,
            winners,
            payouts,
            winning_category,
            final_board: req.board,
            proof: proof_bytes(req.table_id, req.hand_number),
        };

        registry.submit_showdown(req.table_id, submission, now)?;
        self.decks.remove(&(req.table_id, req.hand_number));
        Ok(())
    }
}

/// Непрозрачный аттестат честности: локальному оракулу достаточно метки.
fn proof_bytes(table_id: TableId, hand_number: HandNumber) -> Vec<u8> {
    format!("local-oracle:{}:{}", table_id, hand_number).into_bytes()
}
