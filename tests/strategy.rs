use rand::rngs::mock::StepRng;
use schnapsbot::bots::{Holding, WeightClass};
use schnapsbot::{
    Bot, Card, GamePhase, Move, PlayerPerspective, Rank, Score, StrategyBot, StrategyParams, Suit,
};

fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() < 1e-9)
}

fn regulars(hand: &[Card]) -> Vec<Move> {
    hand.iter().copied().map(Move::Regular).collect()
}

/// Phase One view with the talon still full and no score.
fn phase_one(hand: Vec<Card>, trump: Suit, valid_moves: Vec<Move>) -> PlayerPerspective {
    PlayerPerspective {
        phase: GamePhase::One,
        hand,
        my_score: Score::default(),
        opponent_score: Score::default(),
        trump_suit: trump,
        trump_card: Some(c(Rank::Ten, trump)),
        talon_size: 9,
        is_leader: true,
        seen: vec![c(Rank::Ten, trump)],
        opponent_hand: None,
        valid_moves,
    }
}

fn phase_two(hand: Vec<Card>, opponent: Vec<Card>, trump: Suit) -> PlayerPerspective {
    let valid_moves = regulars(&hand);
    PlayerPerspective {
        phase: GamePhase::Two,
        hand,
        my_score: Score::new(30, 0),
        opponent_score: Score::new(30, 0),
        trump_suit: trump,
        trump_card: None,
        talon_size: 0,
        is_leader: true,
        seen: Vec::new(),
        opponent_hand: Some(opponent),
        valid_moves,
    }
}

#[test]
fn plays_trump_ace_and_reserves_marriage_pair() {
    let hand = vec![
        c(Rank::Ace, Suit::Spades),
        c(Rank::King, Suit::Hearts),
        c(Rank::Queen, Suit::Hearts),
    ];
    let view = phase_one(hand.clone(), Suit::Spades, regulars(&hand));
    let mut bot = StrategyBot::new(11);

    let chosen = bot.select_move(&view, None);

    assert_eq!(chosen, Move::Regular(c(Rank::Ace, Suit::Spades)));
    let ledger = bot.ledger();
    assert_eq!(ledger.len(), 2);
    assert_eq!(
        ledger.holding(&c(Rank::King, Suit::Hearts)),
        Some(Holding::Reserved)
    );
    assert_eq!(
        ledger.holding(&c(Rank::Queen, Suit::Hearts)),
        Some(Holding::Reserved)
    );
    assert!(approx(ledger.weight(&c(Rank::King, Suit::Hearts)), 3.0));
    assert!(approx(ledger.weight(&c(Rank::Queen, Suit::Hearts)), 2.0));
    assert_eq!(bot.tricks_played(), 1);
}

#[test]
fn declares_legal_marriage_and_releases_the_king() {
    let hand = vec![
        c(Rank::Ace, Suit::Spades),
        c(Rank::King, Suit::Hearts),
        c(Rank::Queen, Suit::Hearts),
    ];
    let mut moves = regulars(&hand);
    moves.push(Move::marriage(Suit::Hearts));
    let view = phase_one(hand, Suit::Spades, moves);
    let mut bot = StrategyBot::new(3);

    let chosen = bot.select_move(&view, None);

    assert_eq!(chosen, Move::marriage(Suit::Hearts));
    let ledger = bot.ledger();
    assert!(!ledger.contains(&c(Rank::Queen, Suit::Hearts)));
    assert_eq!(
        ledger.holding(&c(Rank::King, Suit::Hearts)),
        Some(Holding::InPlay)
    );
    assert!(approx(ledger.weight(&c(Rank::King, Suit::Hearts)), 3.0));
    assert_eq!(ledger.reserved().count(), 0);
    assert_eq!(bot.tricks_played(), 1);
}

#[test]
fn exchanges_trump_jack_before_declaring() {
    let trump = Suit::Spades;
    let hand = vec![
        c(Rank::Jack, trump),
        c(Rank::Ace, Suit::Hearts),
        c(Rank::King, Suit::Hearts),
        c(Rank::Queen, Suit::Hearts),
    ];
    let mut moves = regulars(&hand);
    moves.push(Move::marriage(Suit::Hearts));
    moves.push(Move::trump_exchange(trump));
    let mut bot = StrategyBot::new(5);

    let chosen = bot.select_move(&phase_one(hand, trump, moves), None);
    assert_eq!(chosen, Move::trump_exchange(trump));
    assert!(!bot.ledger().contains(&c(Rank::Jack, trump)));
    assert_eq!(bot.ledger().reserved().count(), 2);

    // The leader moves again with the former trump card in hand.
    let hand = vec![
        c(Rank::Ace, Suit::Hearts),
        c(Rank::King, Suit::Hearts),
        c(Rank::Queen, Suit::Hearts),
        c(Rank::Ten, trump),
    ];
    let mut moves = regulars(&hand);
    moves.push(Move::marriage(Suit::Hearts));
    let chosen = bot.select_move(&phase_one(hand, trump, moves), None);
    assert_eq!(chosen, Move::marriage(Suit::Hearts));
    assert!(bot.ledger().contains(&c(Rank::Ten, trump)));
    assert_eq!(bot.tricks_played(), 2);
}

#[test]
fn only_valued_ranks_enter_the_ledger() {
    let hand = vec![
        c(Rank::Ace, Suit::Spades),
        c(Rank::Nine, Suit::Hearts),
        c(Rank::King, Suit::Clubs),
    ];
    let view = phase_one(hand.clone(), Suit::Spades, regulars(&hand));
    let mut bot = StrategyBot::new(1);

    let chosen = bot.select_move(&view, None);

    assert_eq!(chosen, Move::Regular(c(Rank::Ace, Suit::Spades)));
    assert_eq!(bot.ledger().len(), 1);
    assert!(bot.ledger().contains(&c(Rank::King, Suit::Clubs)));
    assert!(!bot.ledger().contains(&c(Rank::Nine, Suit::Hearts)));
}

#[test]
fn second_pair_in_play_gets_the_pair_factor() {
    let hand = vec![
        c(Rank::Queen, Suit::Hearts),
        c(Rank::King, Suit::Hearts),
        c(Rank::Queen, Suit::Clubs),
        c(Rank::King, Suit::Clubs),
        c(Rank::Jack, Suit::Diamonds),
    ];
    let mut view = phase_one(hand.clone(), Suit::Spades, regulars(&hand));
    view.is_leader = false;
    let mut bot = StrategyBot::new(31);

    let chosen = bot.select_move(&view, Some(Move::Regular(c(Rank::Ace, Suit::Diamonds))));

    assert_eq!(chosen, Move::Regular(c(Rank::Jack, Suit::Diamonds)));
    let ledger = bot.ledger();
    // Only the first pair is held back; the clubs pair stays in play.
    assert_eq!(
        ledger.holding(&c(Rank::Queen, Suit::Hearts)),
        Some(Holding::Reserved)
    );
    assert_eq!(
        ledger.holding(&c(Rank::King, Suit::Hearts)),
        Some(Holding::Reserved)
    );
    assert!(approx(ledger.weight(&c(Rank::Queen, Suit::Hearts)), 2.0));
    assert!(approx(ledger.weight(&c(Rank::King, Suit::Hearts)), 3.0));
    assert_eq!(
        ledger.holding(&c(Rank::Queen, Suit::Clubs)),
        Some(Holding::InPlay)
    );
    assert!(approx(ledger.weight(&c(Rank::Queen, Suit::Clubs)), 2.0 * 1.05 * 1.5));
    assert!(approx(ledger.weight(&c(Rank::King, Suit::Clubs)), 3.0 * 1.05 * 1.5));
}

#[test]
fn heads_a_low_lead_in_suit() {
    let hand = vec![
        c(Rank::Ace, Suit::Clubs),
        c(Rank::Ten, Suit::Hearts),
        c(Rank::Jack, Suit::Diamonds),
    ];
    let mut view = phase_one(hand.clone(), Suit::Spades, regulars(&hand));
    view.is_leader = false;
    let mut bot = StrategyBot::new(21);

    let lead = Move::Regular(c(Rank::King, Suit::Hearts));
    let chosen = bot.select_move(&view, Some(lead));

    assert_eq!(chosen, Move::Regular(c(Rank::Ten, Suit::Hearts)));
    // A lead worth a King or less shrinks the trump multiplier.
    assert!(bot.weights().trump_multiplier() < bot.params().trump_multiplier);
}

#[test]
fn holds_high_cards_back_against_a_trump_lead() {
    let hand = vec![
        c(Rank::Ace, Suit::Hearts),
        c(Rank::Jack, Suit::Diamonds),
        c(Rank::King, Suit::Clubs),
    ];
    let mut view = phase_one(hand.clone(), Suit::Spades, regulars(&hand));
    view.is_leader = false;
    let mut bot = StrategyBot::new(8);

    let chosen = bot.select_move(&view, Some(Move::Regular(c(Rank::Jack, Suit::Spades))));

    assert_eq!(chosen, Move::Regular(c(Rank::Jack, Suit::Diamonds)));
}

#[test]
fn trumps_a_high_plain_lead() {
    let hand = vec![
        c(Rank::Queen, Suit::Spades),
        c(Rank::Ace, Suit::Clubs),
        c(Rank::King, Suit::Diamonds),
    ];
    let mut view = phase_one(hand.clone(), Suit::Spades, regulars(&hand));
    view.is_leader = false;
    let mut bot = StrategyBot::new(13);

    let chosen = bot.select_move(&view, Some(Move::Regular(c(Rank::Ace, Suit::Hearts))));

    assert_eq!(chosen, Move::Regular(c(Rank::Queen, Suit::Spades)));
    assert!(bot.weights().trump_multiplier() > bot.params().trump_multiplier);
}

#[test]
fn follower_with_only_a_marriage_pair_plays_the_king() {
    let hand = vec![c(Rank::King, Suit::Hearts), c(Rank::Queen, Suit::Hearts)];
    let mut view = phase_one(hand.clone(), Suit::Spades, regulars(&hand));
    view.is_leader = false;
    let mut bot = StrategyBot::new(2);

    let chosen = bot.select_move(&view, Some(Move::Regular(c(Rank::Ace, Suit::Clubs))));

    assert_eq!(chosen, Move::Regular(c(Rank::King, Suit::Hearts)));
    assert!(bot.ledger().contains(&c(Rank::Queen, Suit::Hearts)));
    assert!(!bot.ledger().contains(&c(Rank::King, Suit::Hearts)));
}

#[test]
fn stronger_trump_holding_pushes_trumps() {
    let trump = Suit::Spades;
    let hand = vec![
        c(Rank::Ace, trump),
        c(Rank::Ten, trump),
        c(Rank::Jack, trump),
        c(Rank::Ace, Suit::Hearts),
    ];
    let opponent = vec![
        c(Rank::Queen, trump),
        c(Rank::King, Suit::Clubs),
        c(Rank::Ten, Suit::Diamonds),
        c(Rank::Ace, Suit::Diamonds),
    ];
    let mut bot = StrategyBot::new(4);

    let chosen = bot.select_move(&phase_two(hand, opponent, trump), None);

    assert_eq!(chosen, Move::Regular(c(Rank::Ace, trump)));
    let ledger = bot.ledger();
    assert!(approx(ledger.weight(&c(Rank::Ten, trump)), 28.0));
    assert!(approx(ledger.weight(&c(Rank::Jack, trump)), 20.0));
    assert!(approx(ledger.weight(&c(Rank::Ace, Suit::Hearts)), 8.0));
}

#[test]
fn pushes_suits_the_opponent_lacks() {
    let trump = Suit::Spades;
    let hand = vec![
        c(Rank::Ace, Suit::Hearts),
        c(Rank::Ten, Suit::Clubs),
        c(Rank::Jack, trump),
    ];
    let opponent = vec![
        c(Rank::Queen, trump),
        c(Rank::King, trump),
        c(Rank::Ace, Suit::Clubs),
    ];
    let mut bot = StrategyBot::new(6);

    let chosen = bot.select_move(&phase_two(hand, opponent, trump), None);

    assert_eq!(chosen, Move::Regular(c(Rank::Ace, Suit::Hearts)));
    assert!(approx(bot.ledger().weight(&c(Rank::Ten, Suit::Clubs)), 14.0));
    assert!(approx(bot.ledger().weight(&c(Rank::Jack, trump)), 10.0));
}

#[test]
fn opponent_without_trump_makes_void_suits_heavier() {
    let trump = Suit::Spades;
    let hand = vec![c(Rank::Ace, Suit::Clubs), c(Rank::Ten, Suit::Hearts)];
    let opponent = vec![c(Rank::King, Suit::Clubs), c(Rank::Queen, Suit::Diamonds)];
    let mut bot = StrategyBot::new(9);

    let chosen = bot.select_move(&phase_two(hand, opponent, trump), None);

    assert_eq!(chosen, Move::Regular(c(Rank::Ten, Suit::Hearts)));
    assert!(approx(bot.ledger().weight(&c(Rank::Ace, Suit::Clubs)), 16.0));
}

#[test]
fn injected_rng_fixes_the_cutoffs() {
    let mut bot = StrategyBot::with_rng(StepRng::new(0, 0), StrategyParams::default());
    let hand = vec![c(Rank::Ace, Suit::Hearts), c(Rank::Nine, Suit::Clubs)];
    let mut view = phase_one(hand.clone(), Suit::Spades, regulars(&hand));
    view.my_score = Score::new(30, 0);

    let chosen = bot.select_move(&view, None);

    // Lowest cutoffs drawn: trick 3 not reached, score 20 passed.
    assert_eq!(chosen, Move::Regular(c(Rank::Ace, Suit::Hearts)));
    let ace = bot.weights().class_weight(WeightClass::Ace);
    assert!((ace - (16.0 * 1.1 + 0.05 * 30.0)).abs() < 1e-9);
    assert!((bot.weights().trump_multiplier() - 5.6).abs() < 1e-9);
}

#[test]
fn counter_advances_on_every_decision() {
    let trump = Suit::Diamonds;
    let mut bot = StrategyBot::new(77);
    let hands = [
        vec![c(Rank::Ace, Suit::Clubs), c(Rank::Ten, Suit::Clubs)],
        vec![c(Rank::Ten, Suit::Clubs), c(Rank::Jack, Suit::Hearts)],
        vec![c(Rank::Jack, Suit::Hearts)],
    ];
    for (index, hand) in hands.into_iter().enumerate() {
        let view = phase_one(hand.clone(), trump, regulars(&hand));
        bot.select_move(&view, None);
        assert_eq!(bot.tricks_played(), index as u32 + 1);
    }
}

#[test]
fn same_seed_same_choices() {
    let hand = vec![
        c(Rank::King, Suit::Clubs),
        c(Rank::Queen, Suit::Diamonds),
        c(Rank::Jack, Suit::Hearts),
    ];
    let view = phase_one(hand.clone(), Suit::Spades, regulars(&hand));
    let mut first = StrategyBot::new(42);
    let mut second = StrategyBot::new(42);
    assert_eq!(
        first.select_move(&view, None),
        second.select_move(&view, None)
    );
    assert_eq!(first.weights(), second.weights());
}

#[test]
#[should_panic(expected = "at least one legal move")]
fn empty_move_list_is_a_contract_violation() {
    let view = phase_one(vec![c(Rank::Ace, Suit::Clubs)], Suit::Spades, Vec::new());
    StrategyBot::new(0).select_move(&view, None);
}
