use crate::card::{Card, Rank};

/// Whether a ledger card may be selected or is held back for a marriage.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Holding {
    InPlay,
    Reserved,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LedgerEntry {
    pub card: Card,
    pub weight: f64,
    pub holding: Holding,
}

/// Weighted view of the cards the bot believes it holds.
///
/// Entries keep the order in which cards were first seen; every scan walks
/// that order so decisions are reproducible. Reserved entries always form a
/// same-suit King+Queen pair.
#[derive(Clone, Debug, Default)]
pub struct CardLedger {
    entries: Vec<LedgerEntry>,
}

impl CardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut LedgerEntry> {
        self.entries.iter_mut()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.position(card).is_some()
    }

    pub fn weight(&self, card: &Card) -> Option<f64> {
        self.entry(card).map(|entry| entry.weight)
    }

    pub fn holding(&self, card: &Card) -> Option<Holding> {
        self.entry(card).map(|entry| entry.holding)
    }

    pub fn in_play(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.holding == Holding::InPlay)
    }

    pub fn reserved(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.holding == Holding::Reserved)
    }

    /// Adds every unseen hand card whose rank `weight_for` prices.
    ///
    /// Returns the number of inserted cards. Panics when a ledger card is no
    /// longer in `hand`: the caller's game broke its contract.
    pub fn sync<F>(&mut self, hand: &[Card], mut weight_for: F) -> usize
    where
        F: FnMut(Rank) -> Option<f64>,
    {
        if let Some(stale) = self.entries.iter().find(|entry| !hand.contains(&entry.card)) {
            panic!("ledger card {} is no longer in hand", stale.card);
        }
        let mut inserted = 0;
        for card in hand {
            if self.contains(card) {
                continue;
            }
            if let Some(weight) = weight_for(card.rank) {
                self.entries.push(LedgerEntry {
                    card: *card,
                    weight,
                    holding: Holding::InPlay,
                });
                inserted += 1;
            }
        }
        inserted
    }

    /// Reserves the first in-play Queen whose same-suit King is in play too.
    ///
    /// At most one pair is moved per call; returns the `(queen, king)` pair.
    pub fn reserve_marriage(&mut self) -> Option<(Card, Card)> {
        let (queen, king) = self.in_play().find_map(|queen| {
            if queen.card.rank != Rank::Queen {
                return None;
            }
            let king = Card::new(Rank::King, queen.card.suit);
            self.in_play()
                .any(|entry| entry.card == king)
                .then_some((queen.card, king))
        })?;
        self.set_holding(&queen, Holding::Reserved);
        self.set_holding(&king, Holding::Reserved);
        Some((queen, king))
    }

    /// Returns every reserved card to play.
    pub fn release_reserved(&mut self) {
        for entry in &mut self.entries {
            entry.holding = Holding::InPlay;
        }
    }

    /// Drops a card that left the hand. A reserved card frees its partner.
    pub fn remove(&mut self, card: &Card) -> Option<LedgerEntry> {
        let index = self.position(card)?;
        let removed = self.entries.remove(index);
        if removed.holding == Holding::Reserved {
            if let Some(partner) = removed.card.marriage_partner() {
                self.set_holding(&partner, Holding::InPlay);
            }
        }
        Some(removed)
    }

    /// Cards in selection order: in-play by weight descending, then reserved by
    /// weight descending. Equal weights keep ledger order.
    pub fn ranked(&self) -> Vec<Card> {
        let mut in_play: Vec<&LedgerEntry> = self.in_play().collect();
        let mut reserved: Vec<&LedgerEntry> = self.reserved().collect();
        in_play.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        reserved.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        in_play
            .into_iter()
            .chain(reserved)
            .map(|entry| entry.card)
            .collect()
    }

    fn position(&self, card: &Card) -> Option<usize> {
        self.entries.iter().position(|entry| entry.card == *card)
    }

    fn entry(&self, card: &Card) -> Option<&LedgerEntry> {
        self.entries.iter().find(|entry| entry.card == *card)
    }

    fn set_holding(&mut self, card: &Card, holding: Holding) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.card == *card) {
            entry.holding = holding;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn flat_weight(rank: Rank) -> Option<f64> {
        match rank {
            Rank::Ace => Some(16.0),
            Rank::King => Some(3.0),
            Rank::Queen => Some(2.0),
            _ => None,
        }
    }

    #[test]
    fn sync_skips_known_and_unpriced_cards() {
        let mut ledger = CardLedger::new();
        let hand = vec![
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::Nine, Suit::Spades),
        ];
        assert_eq!(ledger.sync(&hand, flat_weight), 1);
        assert_eq!(ledger.sync(&hand, flat_weight), 0);
        assert!(!ledger.contains(&Card::new(Rank::Nine, Suit::Spades)));
    }

    #[test]
    #[should_panic(expected = "no longer in hand")]
    fn sync_rejects_stale_cards() {
        let mut ledger = CardLedger::new();
        ledger.sync(&[Card::new(Rank::Ace, Suit::Spades)], flat_weight);
        ledger.sync(&[Card::new(Rank::King, Suit::Spades)], flat_weight);
    }

    #[test]
    fn reserve_marriage_moves_one_pair_per_call() {
        let mut ledger = CardLedger::new();
        let hand = vec![
            Card::new(Rank::King, Suit::Clubs),
            Card::new(Rank::Queen, Suit::Hearts),
            Card::new(Rank::Queen, Suit::Clubs),
            Card::new(Rank::King, Suit::Hearts),
        ];
        ledger.sync(&hand, flat_weight);
        let first = ledger.reserve_marriage();
        assert_eq!(first, Some((hand[1], hand[3])));
        assert_eq!(ledger.reserved().count(), 2);
        let second = ledger.reserve_marriage();
        assert_eq!(second, Some((hand[2], hand[0])));
        assert_eq!(ledger.reserve_marriage(), None);
    }

    #[test]
    fn reserve_marriage_without_pair_changes_nothing() {
        let mut ledger = CardLedger::new();
        let hand = vec![
            Card::new(Rank::King, Suit::Clubs),
            Card::new(Rank::Queen, Suit::Hearts),
            Card::new(Rank::Ace, Suit::Spades),
        ];
        ledger.sync(&hand, flat_weight);
        let before = ledger.entries().to_vec();
        assert_eq!(ledger.reserve_marriage(), None);
        assert_eq!(ledger.entries(), before.as_slice());
    }

    #[test]
    fn removing_reserved_card_frees_partner() {
        let mut ledger = CardLedger::new();
        let king = Card::new(Rank::King, Suit::Hearts);
        let queen = Card::new(Rank::Queen, Suit::Hearts);
        ledger.sync(&[king, queen], flat_weight);
        ledger.reserve_marriage();
        ledger.remove(&king);
        assert_eq!(ledger.holding(&queen), Some(Holding::InPlay));
    }

    #[test]
    fn ranked_lists_in_play_before_reserved() {
        let mut ledger = CardLedger::new();
        let ace = Card::new(Rank::Ace, Suit::Spades);
        let king = Card::new(Rank::King, Suit::Hearts);
        let queen = Card::new(Rank::Queen, Suit::Hearts);
        let spade_king = Card::new(Rank::King, Suit::Spades);
        ledger.sync(&[queen, king, spade_king, ace], flat_weight);
        ledger.reserve_marriage();
        assert_eq!(ledger.ranked(), vec![ace, spade_king, king, queen]);
    }
}
