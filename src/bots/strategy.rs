use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{Level, debug, event};

use crate::action::Move;
use crate::bot::Bot;
use crate::bots::ledger::{CardLedger, Holding};
use crate::bots::policy::{StrategyParams, WeightState};
use crate::card::{Card, Rank, Suit};
use crate::state::{GamePhase, PlayerPerspective};

const TARGET: &str = "schnapsbot::strategy";

/// Rule-based bot that keeps a weight per held card and plays the heaviest legal one.
///
/// In plain English:
/// - New cards enter with the current weight of their rank; only A, 10, J, K, Q are weighted.
/// - A King+Queen pair is held back so it can be declared; declaring and exchanging the
///   trump Jack are always taken when the rules allow them.
/// - While the talon lasts, rank weights drift with the number of tricks played and the
///   own score, trump cards are scaled by a trump multiplier, and the led card nudges
///   the weights of cards that can beat it.
/// - Once the talon is gone the opponent's hand is known: a stronger trump holding pushes
///   trumps, otherwise suits the opponent lacks are pushed.
///
/// The random source only draws the trick and score cutoffs; inject a fixed generator
/// through [`StrategyBot::with_rng`] for reproducible tests.
pub struct StrategyBot<R: Rng = StdRng> {
    rng: R,
    params: StrategyParams,
    weights: WeightState,
    ledger: CardLedger,
    tricks_played: u32,
}

impl StrategyBot<StdRng> {
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, StrategyParams::default())
    }

    pub fn with_params(seed: u64, params: StrategyParams) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), params)
    }
}

impl<R: Rng> StrategyBot<R> {
    pub fn with_rng(rng: R, params: StrategyParams) -> Self {
        Self {
            rng,
            weights: WeightState::new(&params),
            params,
            ledger: CardLedger::new(),
            tricks_played: 0,
        }
    }

    pub fn ledger(&self) -> &CardLedger {
        &self.ledger
    }

    pub fn weights(&self) -> &WeightState {
        &self.weights
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Decisions taken so far, special moves included.
    pub fn tricks_played(&self) -> u32 {
        self.tricks_played
    }

    fn sync_hand(&mut self, hand: &[Card]) -> usize {
        let weights = &self.weights;
        self.ledger.sync(hand, |rank| weights.rank_weight(rank))
    }

    /// Trump exchange first, then the first legal marriage.
    fn take_special(&mut self, perspective: &PlayerPerspective) -> Option<Move> {
        let moves = perspective.valid_moves();
        if !moves.iter().any(Move::is_special) {
            return None;
        }
        let special = moves
            .iter()
            .find(|candidate| matches!(candidate, Move::TrumpExchange { .. }))
            .or_else(|| {
                moves
                    .iter()
                    .find(|candidate| matches!(candidate, Move::Marriage { .. }))
            })
            .copied()?;
        match special {
            Move::TrumpExchange { jack } => {
                self.ledger.remove(&jack);
            }
            Move::Marriage { queen, .. } => {
                self.ledger.remove(&queen);
                self.ledger.release_reserved();
            }
            Move::Regular(_) => {}
        }
        Some(special)
    }

    fn reweigh_phase_one(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) {
        let params = &self.params;
        let trump = perspective.trump_suit();
        let trick_cutoff = self.rng.gen_range(params.trick_cutoffs());
        let score_cutoff = self.rng.gen_range(params.score_cutoffs());
        let own_points = perspective.my_score().total();
        self.weights.drift(
            params,
            self.tricks_played,
            trick_cutoff,
            own_points,
            score_cutoff,
        );

        let lead = leader_move.and_then(|lead| lead.played_card());
        if let Some(lead) = lead {
            if lead.points() > Rank::King.points() {
                self.weights.scale_trump_multiplier(params.trump_lead_factor);
            } else {
                self.weights
                    .scale_trump_multiplier(params.trump_lead_factor.recip());
            }
        }

        let paired: Vec<Card> = self
            .ledger
            .in_play()
            .map(|entry| entry.card)
            .filter(|card| {
                card.marriage_partner().is_some_and(|partner| {
                    self.ledger.holding(&partner) == Some(Holding::InPlay)
                })
            })
            .collect();

        let weights = &self.weights;
        for entry in self.ledger.entries_mut() {
            if entry.holding != Holding::InPlay {
                continue;
            }
            let Some(mut weight) = weights.rank_weight(entry.card.rank) else {
                continue;
            };
            let card = entry.card;
            if paired.contains(&card) {
                weight *= params.pair_factor;
            }
            if card.suit == trump {
                weight *= weights.trump_multiplier();
            }
            if let Some(lead) = lead {
                if card.suit == lead.suit && card.points() > lead.points() {
                    weight *= params.beat_lead_factor;
                }
                if lead.suit != trump
                    && lead.points() > Rank::King.points()
                    && card.suit == trump
                {
                    weight *= params.trump_over_high_lead_factor;
                }
                if lead.suit == trump && card.points() >= Rank::Ten.points() {
                    weight *= params.high_card_vs_trump_lead_factor;
                }
            }
            entry.weight = weight;
        }

        debug!(
            target: TARGET,
            trick_cutoff,
            score_cutoff,
            own_points,
            trump_multiplier = self.weights.trump_multiplier(),
            paired = paired.len(),
            "reweighed for phase one"
        );
    }

    fn reweigh_phase_two(&mut self, perspective: &PlayerPerspective) {
        let Some(opponent_hand) = perspective.opponent_hand_in_phase_two() else {
            debug!(target: TARGET, "opponent hand unknown in phase two, weights kept");
            return;
        };
        let trump = perspective.trump_suit();
        let own = TrumpHolding::of(perspective.hand(), trump);
        let theirs = TrumpHolding::of(opponent_hand, trump);

        if own.is_stronger_than(&theirs) {
            let factor = self.params.trump_dominance_factor;
            for entry in self.ledger.entries_mut() {
                if entry.card.suit == trump {
                    entry.weight *= factor;
                } else {
                    entry.weight /= factor;
                }
            }
        } else {
            let factor = if theirs.count > 0 {
                self.params.void_suit_factor
            } else {
                self.params.void_suit_no_trump_factor
            };
            let void_suits: Vec<Suit> = Suit::ALL
                .into_iter()
                .filter(|suit| !opponent_hand.iter().any(|card| card.suit == *suit))
                .collect();
            for entry in self.ledger.entries_mut() {
                if void_suits.contains(&entry.card.suit) {
                    entry.weight *= factor;
                }
            }
        }

        debug!(
            target: TARGET,
            own_trumps = own.count,
            opponent_trumps = theirs.count,
            dominant = own.is_stronger_than(&theirs),
            "reweighed for phase two"
        );
    }

    fn select_regular(&mut self, perspective: &PlayerPerspective) -> Move {
        let chosen = self
            .ledger
            .ranked()
            .into_iter()
            .find(|card| perspective.is_valid(&Move::Regular(*card)))
            .unwrap_or_else(|| {
                panic!(
                    "no weighted card matches a legal move (hand: {:?})",
                    perspective.hand()
                )
            });
        self.ledger.remove(&chosen);
        Move::Regular(chosen)
    }

    fn log_weights(&self) {
        if !tracing::enabled!(target: TARGET, Level::TRACE) {
            return;
        }
        let table = self
            .ledger
            .entries()
            .iter()
            .map(|entry| match entry.holding {
                Holding::InPlay => format!("{}={:.2}", entry.card, entry.weight),
                Holding::Reserved => format!("{}={:.2}(m)", entry.card, entry.weight),
            })
            .collect::<Vec<_>>()
            .join(",");
        event!(
            target: TARGET,
            Level::TRACE,
            tricks_played = self.tricks_played,
            weights = %table
        );
    }
}

impl<R: Rng> Bot for StrategyBot<R> {
    fn select_move(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move {
        assert!(
            !perspective.valid_moves().is_empty(),
            "strategy bot requires at least one legal move"
        );

        let inserted = self.sync_hand(perspective.hand());
        let marriage = self.ledger.reserve_marriage();
        debug!(
            target: TARGET,
            inserted,
            marriage = ?marriage,
            tricks_played = self.tricks_played,
            "ledger synced"
        );

        if let Some(special) = self.take_special(perspective) {
            self.tricks_played += 1;
            debug!(target: TARGET, chosen = ?special, "special move taken");
            return special;
        }

        match perspective.phase() {
            GamePhase::One => self.reweigh_phase_one(perspective, leader_move),
            GamePhase::Two => self.reweigh_phase_two(perspective),
        }
        self.log_weights();

        let chosen = self.select_regular(perspective);
        self.tricks_played += 1;
        debug!(target: TARGET, chosen = ?chosen, "move selected");
        chosen
    }
}

/// Trump strength compared in Phase Two: count first, best trump as tie-break.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TrumpHolding {
    count: usize,
    highest: u32,
}

impl TrumpHolding {
    fn of(cards: &[Card], trump: Suit) -> Self {
        let trumps = cards.iter().filter(|card| card.suit == trump);
        Self {
            count: trumps.clone().count(),
            highest: trumps.map(Card::points).max().unwrap_or(0),
        }
    }

    fn is_stronger_than(&self, other: &TrumpHolding) -> bool {
        self.count > other.count || (self.count == other.count && self.highest > other.highest)
    }
}
