use crate::deck::{Card, Rank, Suit, ALL_RANKS, ALL_SUITS};
use enum_map::EnumMap;
use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum WinState {
    Win,
    Tie,
    Lose,
}

impl From<Ordering> for WinState {
    fn from(o: Ordering) -> Self {
        match o {
            Ordering::Less => WinState::Lose,
            Ordering::Greater => WinState::Win,
            Ordering::Equal => WinState::Tie,
        }
    }
}

/// Hand categories in comparison order. A higher class always beats a lower
/// one no matter the kickers.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
pub enum HandClass {
    #[display(fmt = "High Card")]
    HighCard,
    #[display(fmt = "One Pair")]
    Pair,
    #[display(fmt = "Two Pair")]
    TwoPair,
    #[display(fmt = "Three of a Kind")]
    ThreeOfAKind,
    #[display(fmt = "Straight")]
    Straight,
    #[display(fmt = "Flush")]
    Flush,
    #[display(fmt = "Full House")]
    FullHouse,
    #[display(fmt = "Four of a Kind")]
    FourOfAKind,
    #[display(fmt = "Straight Flush")]
    StraightFlush,
}

/// How strong a five card hand is: its class, then the kicker ranks that
/// break ties within the class. The kicker layout depends on the class (quad
/// rank then kicker, trip rank then pairing rank, top five flush ranks, and
/// so on) but two hands of the same class always lay their kickers out the
/// same way, so a lexicographic comparison settles them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandStrength {
    class: HandClass,
    tiebreakers: Vec<Rank>,
}

impl HandStrength {
    pub fn class(&self) -> HandClass {
        self.class
    }

    pub fn tiebreakers(&self) -> &[Rank] {
        &self.tiebreakers
    }
}

impl Ord for HandStrength {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.class.cmp(&other.class) {
            Ordering::Equal => {}
            o => return o,
        }
        // First unequal kicker decides. A missing element loses to any
        // present rank.
        for pair in self
            .tiebreakers
            .iter()
            .zip_longest(other.tiebreakers.iter())
        {
            let o = match pair {
                EitherOrBoth::Both(l, r) => l.cmp(r),
                EitherOrBoth::Left(_) => Ordering::Greater,
                EitherOrBoth::Right(_) => Ordering::Less,
            };
            if o != Ordering::Equal {
                return o;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for HandStrength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(PartialEq, Debug)]
pub enum HandError {
    InsufficientCards(usize),
}

impl Error for HandError {}

impl fmt::Display for HandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientCards(n) => {
                write!(f, "At least five cards are required, but {} were given", n)
            }
        }
    }
}

/// The best five card hand found in a pool of cards, with the strength that
/// ranks it at showdown.
#[derive(Debug, Clone)]
pub struct Hand {
    cards: [Card; 5],
    strength: HandStrength,
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.cards[0], self.cards[1], self.cards[2], self.cards[3], self.cards[4],
        )
    }
}

/// Hands compare by strength alone; which suits made the hand is irrelevant.
impl PartialEq for Hand {
    fn eq(&self, other: &Self) -> bool {
        self.strength == other.strength
    }
}

impl Eq for Hand {}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.strength.cmp(&other.strength)
    }
}

const WHEEL: [Rank; 5] = [Rank::RA, Rank::R2, Rank::R3, Rank::R4, Rank::R5];

/// Cards of the first suit holding at least five of the pool, sorted by
/// descending rank. With a single deck and at most seven cards only one suit
/// can ever qualify.
fn flush_cards(pool: &[Card]) -> Option<Vec<Card>> {
    let mut suits: EnumMap<Suit, usize> = EnumMap::default();
    for c in pool {
        suits[c.suit()] += 1;
    }
    let suit = ALL_SUITS.into_iter().find(|&s| suits[s] >= 5)?;
    Some(
        pool.iter()
            .copied()
            .filter(|c| c.suit() == suit)
            .sorted_unstable()
            .rev()
            .collect(),
    )
}

/// Top rank of the best straight in the pool, if any. The wheel reports Five
/// rather than Ace so straights compare correctly on their top card.
fn straight_top(pool: &[Card]) -> Option<Rank> {
    let mut present: EnumMap<Rank, bool> = EnumMap::default();
    for c in pool {
        present[c.rank()] = true;
    }
    for run in ALL_RANKS.windows(5).rev() {
        if run.iter().all(|&r| present[r]) {
            return Some(run[4]);
        }
    }
    if WHEEL.iter().all(|&r| present[r]) {
        return Some(Rank::R5);
    }
    None
}

/// Rank groups of the pool as (count, rank) sorted descending. Highest count
/// first, then highest rank, so the best quad/trip/pair group is always at
/// the front and the best full house pairing is right behind it.
fn rank_groups(pool: &[Card]) -> Vec<(usize, Rank)> {
    let mut counts: EnumMap<Rank, usize> = EnumMap::default();
    for c in pool {
        counts[c.rank()] += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, n)| n > 0)
        .map(|(r, n)| (n, r))
        .sorted_unstable()
        .rev()
        .collect()
}

/// Up to n cards of the given rank, from a pool sorted by descending rank.
fn take_rank(sorted: &[Card], rank: Rank, n: usize) -> Vec<Card> {
    sorted
        .iter()
        .copied()
        .filter(|c| c.rank() == rank)
        .take(n)
        .collect()
}

/// Top up a partial hand to five cards with the highest cards whose rank is
/// not already spoken for.
fn fill_kickers(sorted: &[Card], used: &[Rank], cards: &mut Vec<Card>) {
    for c in sorted.iter().copied().filter(|c| !used.contains(&c.rank())) {
        if cards.len() == 5 {
            break;
        }
        cards.push(c);
    }
}

/// The five ranks of the straight topped by `top`, descending. Only called
/// with tops reported by straight_top.
fn straight_ranks(top: Rank) -> Vec<Rank> {
    if top == Rank::R5 {
        // The wheel plays its ace low.
        vec![Rank::R5, Rank::R4, Rank::R3, Rank::R2, Rank::RA]
    } else {
        debug_assert!(top >= Rank::R6);
        let hi = top as usize;
        (hi - 4..=hi).rev().map(|i| ALL_RANKS[i]).collect()
    }
}

/// One card of each rank of the straight topped by `top`, drawn from a pool
/// sorted by descending rank.
fn straight_cards(sorted: &[Card], top: Rank) -> Vec<Card> {
    let mut cards = Vec::with_capacity(5);
    for want in straight_ranks(top) {
        if let Some(c) = sorted.iter().copied().find(|c| c.rank() == want) {
            cards.push(c);
        }
    }
    cards
}

impl Hand {
    /// Find the best five card hand in a pool of five to seven cards.
    ///
    /// The class checks run from best to worst and each one both classifies
    /// and selects the five cards that realize the class, so the result is
    /// the same hand a brute force pass over every five card subset of the
    /// pool would keep.
    pub fn best_of(pool: &[Card]) -> Result<Self, HandError> {
        if pool.len() < 5 {
            return Err(HandError::InsufficientCards(pool.len()));
        }
        let sorted: Vec<Card> = pool.iter().copied().sorted_unstable().rev().collect();
        let groups = rank_groups(&sorted);
        let flush = flush_cards(&sorted);

        if let Some(suited) = &flush {
            if let Some(top) = straight_top(suited) {
                return Ok(Self::assemble(
                    HandClass::StraightFlush,
                    straight_cards(suited, top),
                    vec![top],
                ));
            }
        }
        let (best_count, best_rank) = groups[0];
        if best_count == 4 {
            let mut cards = take_rank(&sorted, best_rank, 4);
            fill_kickers(&sorted, &[best_rank], &mut cards);
            let kicker = cards[4].rank();
            return Ok(Self::assemble(
                HandClass::FourOfAKind,
                cards,
                vec![best_rank, kicker],
            ));
        }
        if best_count == 3 {
            // The pairing is the highest remaining group with two or more
            // cards; a second trip plays its two highest cards as the pair.
            let pairing = groups[1..]
                .iter()
                .filter(|&&(n, _)| n >= 2)
                .map(|&(_, r)| r)
                .max();
            if let Some(pair) = pairing {
                let mut cards = take_rank(&sorted, best_rank, 3);
                cards.extend(take_rank(&sorted, pair, 2));
                return Ok(Self::assemble(
                    HandClass::FullHouse,
                    cards,
                    vec![best_rank, pair],
                ));
            }
        }
        if let Some(suited) = flush {
            let cards: Vec<Card> = suited.into_iter().take(5).collect();
            let tiebreakers = cards.iter().map(|c| c.rank()).collect();
            return Ok(Self::assemble(HandClass::Flush, cards, tiebreakers));
        }
        if let Some(top) = straight_top(&sorted) {
            return Ok(Self::assemble(
                HandClass::Straight,
                straight_cards(&sorted, top),
                vec![top],
            ));
        }
        if best_count == 3 {
            let mut cards = take_rank(&sorted, best_rank, 3);
            fill_kickers(&sorted, &[best_rank], &mut cards);
            let mut tiebreakers = vec![best_rank];
            tiebreakers.extend(cards[3..].iter().map(|c| c.rank()));
            return Ok(Self::assemble(HandClass::ThreeOfAKind, cards, tiebreakers));
        }
        let pairs: Vec<Rank> = groups
            .iter()
            .filter(|&&(n, _)| n == 2)
            .map(|&(_, r)| r)
            .collect();
        if pairs.len() >= 2 {
            let (high, low) = (pairs[0], pairs[1]);
            let mut cards = take_rank(&sorted, high, 2);
            cards.extend(take_rank(&sorted, low, 2));
            fill_kickers(&sorted, &[high, low], &mut cards);
            let kicker = cards[4].rank();
            return Ok(Self::assemble(
                HandClass::TwoPair,
                cards,
                vec![high, low, kicker],
            ));
        }
        if pairs.len() == 1 {
            let pair = pairs[0];
            let mut cards = take_rank(&sorted, pair, 2);
            fill_kickers(&sorted, &[pair], &mut cards);
            let mut tiebreakers = vec![pair];
            tiebreakers.extend(cards[2..].iter().map(|c| c.rank()));
            return Ok(Self::assemble(HandClass::Pair, cards, tiebreakers));
        }
        let mut cards = Vec::with_capacity(5);
        fill_kickers(&sorted, &[], &mut cards);
        let tiebreakers = cards.iter().map(|c| c.rank()).collect();
        Ok(Self::assemble(HandClass::HighCard, cards, tiebreakers))
    }

    fn assemble(class: HandClass, cards: Vec<Card>, tiebreakers: Vec<Rank>) -> Self {
        let cards: [Card; 5] = match cards.try_into() {
            Ok(c) => c,
            Err(_) => unreachable!("every class selects exactly five cards"),
        };
        Self {
            cards,
            strength: HandStrength { class, tiebreakers },
        }
    }

    pub fn cards(&self) -> &[Card; 5] {
        &self.cards
    }

    pub fn strength(&self) -> &HandStrength {
        &self.strength
    }

    pub fn class(&self) -> HandClass {
        self.strength.class
    }

    pub fn beats(&self, other: &Self) -> WinState {
        self.strength.cmp(&other.strength).into()
    }
}



#[cfg(test)]
mod test_beats {
    use super::*;
    use crate::deck::cards_from_str;

    fn win_lose(s1: &'static str, s2: &'static str, class: HandClass) {
        let h1 = Hand::best_of(&cards_from_str(s1)).unwrap();
        let h2 = Hand::best_of(&cards_from_str(s2)).unwrap();
        assert_eq!(h1.class(), class);
        assert_eq!(h2.class(), class);
        assert_eq!(h1.beats(&h2), WinState::Win);
        assert_eq!(h2.beats(&h1), WinState::Lose);
    }

    fn tie(s1: &'static str, s2: &'static str, class: HandClass) {
        let h1 = Hand::best_of(&cards_from_str(s1)).unwrap();
        let h2 = Hand::best_of(&cards_from_str(s2)).unwrap();
        assert_eq!(h1.class(), class);
        assert_eq!(h2.class(), class);
        assert_eq!(h1.beats(&h2), WinState::Tie);
        assert_eq!(h1, h2);
    }

    #[test]
    fn straight_flush() {
        for (s1, s2) in [
            ("KcQcJcTc9c", "QdJdTd9d8d"),
            ("6c5c4c3c2c", "5d4d3d2dAd"),
            ("KcQcJcTc9c", "5d4d3d2dAd"),
        ] {
            win_lose(s1, s2, HandClass::StraightFlush);
        }
        tie("KcQcJcTc9c", "KdQdJdTd9d", HandClass::StraightFlush);
        tie("5c4c3c2cAc", "5d4d3d2dAd", HandClass::StraightFlush);
    }

    #[test]
    fn quads() {
        for (s1, s2) in [("4c4d4h4s3c", "3c3d3h3s2d"), ("4c4d4h4s5c", "4c4d4h4s3c")] {
            win_lose(s1, s2, HandClass::FourOfAKind);
        }
        tie("2c2d2h2s3c", "2c2d2h2s3d", HandClass::FourOfAKind);
    }

    #[test]
    fn boat() {
        for (s1, s2) in [("4c4d4h3s3c", "3c3d3h2s2d"), ("4c4d4h5s5c", "4c4d4h3s3c")] {
            win_lose(s1, s2, HandClass::FullHouse);
        }
        tie("AcAdAhKcKd", "AdAhAsKhKs", HandClass::FullHouse);
    }

    #[test]
    fn flush() {
        for (s1, s2) in [("AsKsQsJs3s", "AdKdQdJd2d"), ("As6s5s4s3s", "Kd7d6d5d4d")] {
            win_lose(s1, s2, HandClass::Flush);
        }
        tie("AsKsQsJs2s", "AdKdQdJd2d", HandClass::Flush);
    }

    #[test]
    fn straight() {
        for (s1, s2) in [
            ("AsKsQsJsTd", "KcQcJcTc9s"),
            ("AsKsQsJsTd", "Ac2c3c4c5s"),
            ("6s5s4s3s2d", "Ac2c3c4c5s"),
        ] {
            win_lose(s1, s2, HandClass::Straight);
        }
        tie("AsKsQsJsTd", "AcKcQcJcTs", HandClass::Straight);
    }

    #[test]
    fn set() {
        for (s1, s2) in [
            ("AcAdAh4s3d", "AsAcAd3c2s"),
            ("9c9d9hTsJd", "9s9c9d2c3s"),
            ("9c9d9h6s3d", "9s9c9d3c2s"),
        ] {
            win_lose(s1, s2, HandClass::ThreeOfAKind);
        }
        tie("3c3d3hAsKd", "3s3c3dAcKs", HandClass::ThreeOfAKind);
    }

    #[test]
    fn two_pair() {
        for (s1, s2) in [("AsAdKsKdJd", "AcAdKcKdTs"), ("AsAdKsKdJd", "AcAdQcQdKs")] {
            win_lose(s1, s2, HandClass::TwoPair);
        }
        tie("AsAdKsKdTd", "AcAdKcKdTs", HandClass::TwoPair);
    }

    #[test]
    fn pair() {
        for (s1, s2) in [
            ("AcAdKh4s3d", "AcAd5h4s3d"),
            ("AcAd5h4s3d", "AcAd5h4s2d"),
            ("2c2d6h4s3d", "2c2d5h4s3d"),
        ] {
            win_lose(s1, s2, HandClass::Pair);
        }
        tie("AcAd5h4s3d", "AcAd5s4c3h", HandClass::Pair);
    }

    #[test]
    fn high_card() {
        for (s1, s2) in [
            ("Ac7d6h5s4d", "Ac6d5h4s3d"),
            ("AcKdQhJs7d", "AcKdQhJs3d"),
            ("8c7d6h4s3d", "7c6d5h3s2d"),
        ] {
            win_lose(s1, s2, HandClass::HighCard);
        }
        tie("KcQdJhTs5c", "KdQhJsTc5d", HandClass::HighCard);
    }
}
