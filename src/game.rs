use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::action::{Move, PlayerId};
use crate::bot::Bot;
use crate::card::{
    Card, DECK_SIZE, HAND_SIZE, Rank, Suit, WINNING_POINTS, card_points, schnapsen_deck,
};
use crate::error::{GameError, InvalidMove};
use crate::score::game_points;
use crate::state::{GamePhase, GameStatus, PlayerPerspective, Score};

const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;
const PLAYER_COUNT: usize = 2;
const MARRIAGE_POINTS: u32 = 20;
const ROYAL_MARRIAGE_POINTS: u32 = 40;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub seed: u64,
    pub first_leader: PlayerId,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            first_leader: 0,
        }
    }
}

/// Builder that enables deterministic deck injection for testing.
///
/// The deck is dealt from its end: the last five cards go to the first leader,
/// the five before them to the other player, the remaining ten form the talon
/// whose first card is turned up as trump card.
pub struct GameBuilder {
    config: GameConfig,
    deck: Option<Vec<Card>>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            deck: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn with_first_leader(mut self, leader: PlayerId) -> Self {
        self.config.first_leader = leader;
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a completed trick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trick {
    pub leader: PlayerId,
    pub lead: Move,
    pub follow: Card,
    pub winner: PlayerId,
}

/// Two-player Schnapsen engine.
pub struct Game {
    status: GameStatus,
    phase: GamePhase,
    trump_suit: Suit,
    /// Index 0 is the face-up trump card, the last element is drawn next.
    talon: Vec<Card>,
    players: [PlayerState; PLAYER_COUNT],
    leader: PlayerId,
    lead: Option<Move>,
    last_trick: Option<Trick>,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder { config, deck: None }.build()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    pub fn talon_size(&self) -> usize {
        self.talon.len()
    }

    pub fn leader(&self) -> PlayerId {
        self.leader
    }

    /// Move the leader already made in the running trick.
    pub fn leader_move(&self) -> Option<Move> {
        self.lead
    }

    pub fn last_trick(&self) -> Option<Trick> {
        self.last_trick
    }

    pub fn current_player(&self) -> PlayerId {
        match self.lead {
            Some(_) => other(self.leader),
            None => self.leader,
        }
    }

    pub fn score(&self, player: PlayerId) -> Result<Score, GameError> {
        self.check_player(player)?;
        Ok(self.players[player].score)
    }

    pub fn hand(&self, player: PlayerId) -> Result<&[Card], GameError> {
        self.check_player(player)?;
        Ok(&self.players[player].hand)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Finished { winner, .. } => Some(winner),
            GameStatus::Ongoing => None,
        }
    }

    pub fn perspective(&self, player: PlayerId) -> Result<PlayerPerspective, GameError> {
        self.check_player(player)?;
        let opponent = other(player);
        let mut seen: Vec<Card> = Vec::with_capacity(DECK_SIZE);
        for state in &self.players {
            seen.extend(state.won.iter().copied());
            seen.extend(state.shown.iter().copied());
        }
        if let Some(trump_card) = self.talon.first() {
            seen.push(*trump_card);
        }
        let opponent_hand = match self.phase {
            GamePhase::Two => Some(self.players[opponent].hand.clone()),
            GamePhase::One => None,
        };
        let valid_moves = if !self.is_finished() && player == self.current_player() {
            self.legal_moves(player)?
        } else {
            Vec::new()
        };
        Ok(PlayerPerspective {
            phase: self.phase,
            hand: self.players[player].hand.clone(),
            my_score: self.players[player].score,
            opponent_score: self.players[opponent].score,
            trump_suit: self.trump_suit,
            trump_card: self.talon.first().copied(),
            talon_size: self.talon.len(),
            is_leader: player == self.leader,
            seen,
            opponent_hand,
            valid_moves,
        })
    }

    pub fn legal_moves(&self, player: PlayerId) -> Result<Vec<Move>, GameError> {
        if self.is_finished() {
            return Ok(Vec::new());
        }
        self.check_player(player)?;
        if player != self.current_player() {
            return Err(GameError::NotPlayersTurn);
        }
        let hand = &self.players[player].hand;
        match self.lead {
            None => {
                let mut moves: Vec<Move> = hand.iter().map(|card| Move::Regular(*card)).collect();
                for card in hand.iter().filter(|card| card.rank == Rank::Queen) {
                    if hand.contains(&Card::new(Rank::King, card.suit)) {
                        moves.push(Move::marriage(card.suit));
                    }
                }
                if self.trump_exchange_available(hand) {
                    moves.push(Move::trump_exchange(self.trump_suit));
                }
                Ok(moves)
            }
            Some(lead) => {
                let allowed = match (self.phase, lead.played_card()) {
                    (GamePhase::Two, Some(lead_card)) => {
                        follow_candidates(hand, lead_card, self.trump_suit)
                    }
                    _ => hand.clone(),
                };
                Ok(allowed.into_iter().map(Move::Regular).collect())
            }
        }
    }

    pub fn apply_move(&mut self, player: PlayerId, mv: Move) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        self.check_player(player)?;
        if player != self.current_player() {
            return Err(GameError::NotPlayersTurn);
        }
        let legal = self.legal_moves(player)?;
        if !legal.contains(&mv) {
            return Err(self.rejection(player, mv, &legal).into());
        }

        match (self.lead, mv) {
            (None, Move::TrumpExchange { jack }) => {
                let state = &mut self.players[player];
                remove_card(&mut state.hand, jack)?;
                state.hand.push(self.talon[0]);
                self.talon[0] = jack;
            }
            (None, Move::Marriage { queen, king }) => {
                let points = if queen.suit == self.trump_suit {
                    ROYAL_MARRIAGE_POINTS
                } else {
                    MARRIAGE_POINTS
                };
                let state = &mut self.players[player];
                remove_card(&mut state.hand, queen)?;
                state.shown.push(king);
                if state.won.is_empty() {
                    state.score.pending += points;
                } else {
                    state.score.direct += points;
                }
                self.lead = Some(mv);
                if self.players[player].score.direct >= WINNING_POINTS {
                    self.finish(player);
                }
            }
            (None, Move::Regular(card)) => {
                remove_card(&mut self.players[player].hand, card)?;
                self.lead = Some(mv);
            }
            (Some(lead), Move::Regular(card)) => {
                remove_card(&mut self.players[player].hand, card)?;
                self.resolve_trick(lead, card)?;
            }
            (Some(_), _) => return Err(InvalidMove::NotLeader.into()),
        }
        Ok(())
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder { config, deck } = builder;
        if config.first_leader >= PLAYER_COUNT {
            return Err(GameError::InvalidPlayer(config.first_leader));
        }
        let mut deck = if let Some(deck) = deck {
            deck
        } else {
            let mut rng = StdRng::seed_from_u64(config.seed);
            let mut deck = schnapsen_deck();
            deck.shuffle(&mut rng);
            deck
        };
        if deck.len() != DECK_SIZE {
            return Err(GameError::InvalidConfiguration(
                "deck must contain exactly 20 cards",
            ));
        }

        let mut players: [PlayerState; PLAYER_COUNT] = Default::default();
        for seat in [config.first_leader, other(config.first_leader)] {
            for _ in 0..HAND_SIZE {
                players[seat].hand.push(deck.pop().ok_or(GameError::InvalidConfiguration(
                    "deck exhausted while dealing hands",
                ))?);
            }
        }
        let trump_suit = deck
            .first()
            .map(|card| card.suit)
            .ok_or(GameError::InvalidConfiguration("no card left for the trump"))?;

        Ok(Game {
            status: GameStatus::Ongoing,
            phase: GamePhase::One,
            trump_suit,
            talon: deck,
            players,
            leader: config.first_leader,
            lead: None,
            last_trick: None,
        })
    }

    fn check_player(&self, player: PlayerId) -> Result<(), GameError> {
        if player >= PLAYER_COUNT {
            return Err(GameError::InvalidPlayer(player));
        }
        Ok(())
    }

    fn trump_exchange_available(&self, hand: &[Card]) -> bool {
        let jack = Card::new(Rank::Jack, self.trump_suit);
        self.phase == GamePhase::One && !self.talon.is_empty() && hand.contains(&jack)
    }

    fn rejection(&self, player: PlayerId, mv: Move, legal: &[Move]) -> InvalidMove {
        let hand = &self.players[player].hand;
        if let Some(missing) = mv.cards().into_iter().find(|card| !hand.contains(card)) {
            return InvalidMove::CardNotInHand(missing);
        }
        match mv {
            Move::Marriage { .. } | Move::TrumpExchange { .. } if self.lead.is_some() => {
                InvalidMove::NotLeader
            }
            Move::Marriage { .. } => InvalidMove::MarriageUnavailable,
            Move::TrumpExchange { .. } => InvalidMove::TrumpExchangeUnavailable,
            Move::Regular(played) => InvalidMove::MustFollow {
                played,
                required: legal
                    .iter()
                    .filter_map(Move::played_card)
                    .map(|card| card.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            },
        }
    }

    fn resolve_trick(&mut self, lead: Move, follow: Card) -> Result<(), GameError> {
        let lead_card = lead
            .played_card()
            .ok_or(GameError::InvalidConfiguration("lead move played no card"))?;
        let leader = self.leader;
        let follower = other(leader);
        let winner = if follow.beats(&lead_card, self.trump_suit) {
            follower
        } else {
            leader
        };

        let state = &mut self.players[winner];
        state.won.push(lead_card);
        state.won.push(follow);
        state.score.direct += card_points(&[lead_card, follow]);
        state.score.redeem_pending();

        self.last_trick = Some(Trick {
            leader,
            lead,
            follow,
            winner,
        });
        self.lead = None;
        self.leader = winner;

        if self.players[winner].score.direct >= WINNING_POINTS {
            self.finish(winner);
            return Ok(());
        }

        if self.phase == GamePhase::One {
            for seat in [winner, other(winner)] {
                if let Some(card) = self.talon.pop() {
                    self.players[seat].hand.push(card);
                }
            }
            if self.talon.is_empty() {
                self.phase = GamePhase::Two;
            }
        }

        if self.players.iter().all(|state| state.hand.is_empty()) {
            self.finish(winner);
        }
        Ok(())
    }

    fn finish(&mut self, winner: PlayerId) {
        let loser_score = self.players[other(winner)].score;
        self.status = GameStatus::Finished {
            winner,
            game_points: game_points(loser_score),
        };
    }
}

/// Runs a game until it ends, asking `bots[player]` for every move.
pub fn play_game(game: &mut Game, bots: &mut [Box<dyn Bot>]) -> Result<PlayerId, GameError> {
    if bots.len() != PLAYER_COUNT {
        return Err(GameError::InvalidConfiguration("exactly two bots are required"));
    }
    while !game.is_finished() {
        let current = game.current_player();
        let perspective = game.perspective(current)?;
        let chosen = bots[current].select_move(&perspective, game.leader_move());
        game.apply_move(current, chosen)?;
    }
    game.winner()
        .ok_or(GameError::InvalidConfiguration("game ended without a winner"))
}

#[derive(Clone, Default)]
struct PlayerState {
    hand: Vec<Card>,
    won: Vec<Card>,
    /// Kings revealed by marriage declarations.
    shown: Vec<Card>,
    score: Score,
}

#[inline]
fn other(player: PlayerId) -> PlayerId {
    1 - player
}

fn remove_card(hand: &mut Vec<Card>, card: Card) -> Result<(), GameError> {
    let index = hand
        .iter()
        .position(|held| *held == card)
        .ok_or(InvalidMove::CardNotInHand(card))?;
    hand.remove(index);
    Ok(())
}

/// Phase Two obligations: head the trick in suit, else follow suit, else trump, else anything.
fn follow_candidates(hand: &[Card], lead: Card, trump: Suit) -> Vec<Card> {
    let same_suit: Vec<Card> = hand.iter().copied().filter(|c| c.suit == lead.suit).collect();
    if !same_suit.is_empty() {
        let higher: Vec<Card> = same_suit
            .iter()
            .copied()
            .filter(|c| c.points() > lead.points())
            .collect();
        return if higher.is_empty() { same_suit } else { higher };
    }
    let trumps: Vec<Card> = hand.iter().copied().filter(|c| c.suit == trump).collect();
    if !trumps.is_empty() {
        return trumps;
    }
    hand.to_vec()
}
