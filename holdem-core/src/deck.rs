use base64ct::{self, Base64, Encoding};
use enum_map::Enum;
use rand::prelude::*;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

pub const ALL_RANKS: [Rank; 13] = [
    Rank::R2,
    Rank::R3,
    Rank::R4,
    Rank::R5,
    Rank::R6,
    Rank::R7,
    Rank::R8,
    Rank::R9,
    Rank::RT,
    Rank::RJ,
    Rank::RQ,
    Rank::RK,
    Rank::RA,
];
pub const ALL_SUITS: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
const DECK_LEN: usize = ALL_RANKS.len() * ALL_SUITS.len();
pub const SPADE: char = 's';
pub const HEART: char = 'h';
pub const DIAMOND: char = 'd';
pub const CLUB: char = 'c';
const BOARD_LEN: usize = 5;
const SEED_LEN: usize = 32;
const ENCODED_SEED_LEN: usize = 4 * ((SEED_LEN + 3 - 1) / 3); // 4 * ceil(SEED_LEN / 3)

/// Rank order is the comparison order: deuce lowest, ace highest. Aces may
/// still play low in a wheel straight, but that is the hand module's concern.
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Enum, Serialize, Deserialize)]
pub enum Rank {
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    RT,
    RJ,
    RQ,
    RK,
    RA,
}

impl Rank {
    /// The conventional numeric value of the rank: 2-10, J=11, Q=12, K=13, A=14.
    pub fn value(self) -> u8 {
        match self {
            Self::R2 => 2,
            Self::R3 => 3,
            Self::R4 => 4,
            Self::R5 => 5,
            Self::R6 => 6,
            Self::R7 => 7,
            Self::R8 => 8,
            Self::R9 => 9,
            Self::RT => 10,
            Self::RJ => 11,
            Self::RQ => 12,
            Self::RK => 13,
            Self::RA => 14,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::R2 => write!(f, "2"),
            Self::R3 => write!(f, "3"),
            Self::R4 => write!(f, "4"),
            Self::R5 => write!(f, "5"),
            Self::R6 => write!(f, "6"),
            Self::R7 => write!(f, "7"),
            Self::R8 => write!(f, "8"),
            Self::R9 => write!(f, "9"),
            Self::RT => write!(f, "T"),
            Self::RJ => write!(f, "J"),
            Self::RQ => write!(f, "Q"),
            Self::RK => write!(f, "K"),
            Self::RA => write!(f, "A"),
        }
    }
}

#[cfg(test)]
impl From<char> for Rank {
    fn from(c: char) -> Self {
        match c {
            '2' => Rank::R2,
            '3' => Rank::R3,
            '4' => Rank::R4,
            '5' => Rank::R5,
            '6' => Rank::R6,
            '7' => Rank::R7,
            '8' => Rank::R8,
            '9' => Rank::R9,
            'T' => Rank::RT,
            'J' => Rank::RJ,
            'Q' => Rank::RQ,
            'K' => Rank::RK,
            'A' => Rank::RA,
            _ => unreachable!(),
        }
    }
}

#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Enum, Serialize, Deserialize)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Club => write!(f, "{}", CLUB),
            Self::Diamond => write!(f, "{}", DIAMOND),
            Self::Heart => write!(f, "{}", HEART),
            Self::Spade => write!(f, "{}", SPADE),
        }
    }
}

#[cfg(test)]
impl From<char> for Suit {
    fn from(c: char) -> Self {
        match c {
            CLUB => Self::Club,
            DIAMOND => Self::Diamond,
            HEART => Self::Heart,
            SPADE => Self::Spade,
            _ => unreachable!(),
        }
    }
}

#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
impl From<[char; 2]> for Card {
    fn from(cs: [char; 2]) -> Self {
        Self {
            rank: cs[0].into(),
            suit: cs[1].into(),
        }
    }
}

/// Build cards from a string like "AhKs2c". Test helper; the dealing deck is
/// the only card source outside of tests.
#[cfg(test)]
pub fn cards_from_str(s: &'static str) -> Vec<Card> {
    let mut v = vec![];
    let mut s_chars = s.chars();
    while let Some(r) = s_chars.next() {
        let s = s_chars.next().expect("Need even number of chars");
        v.push([r, s].into())
    }
    v
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn suit(self) -> Suit {
        self.suit
    }

    pub fn rank(self) -> Rank {
        self.rank
    }
}

#[derive(PartialEq, Debug)]
pub enum DeckError {
    OutOfCards,
    TooManyPlayers,
    CantDealToNoPlayers,
    DeckSeedDecodeError(base64ct::Error),
}

impl Error for DeckError {}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::OutOfCards => write!(f, "No more cards in deck"),
            DeckError::TooManyPlayers => write!(f, "Too many players to deal"),
            DeckError::CantDealToNoPlayers => write!(f, "Need at least one player"),
            DeckError::DeckSeedDecodeError(e) => write!(f, "{}", e),
        }
    }
}

impl From<base64ct::Error> for DeckError {
    fn from(e: base64ct::Error) -> Self {
        Self::DeckSeedDecodeError(e)
    }
}

/// A single 52 card deck. The deck is the uniqueness invariant for the whole
/// crate: the evaluator and showdown code trust that no card is dealt twice.
#[derive(Debug, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        use itertools::Itertools;
        let c: Vec<Card> = ALL_RANKS
            .iter()
            .cartesian_product(ALL_SUITS.iter())
            .map(|x| Card::new(*x.0, *x.1))
            .collect();
        assert_eq!(c.len(), DECK_LEN);
        let mut d = Deck { cards: c };
        d.shuffle();
        d
    }
}

impl Deck {
    /// Generate a new single deck of cards, shuffled with the given seed
    pub fn new(seed: &DeckSeed) -> Self {
        let mut d = Self::default();
        d.seeded_shuffle(seed);
        d
    }

    /// Shuffle the deck of cards in-place with a fresh random seed
    pub fn shuffle(&mut self) {
        self.seeded_shuffle(&DeckSeed::default());
    }

    pub fn seeded_shuffle(&mut self, seed: &DeckSeed) {
        let mut rng = ChaChaRng::from_seed(seed.0);
        // Same seed, same order: start from a known card order before shuffling.
        self.cards.sort_unstable();
        self.cards.shuffle(&mut rng)
    }

    /// Draw the topmost card and return it, or return an error if there are no more cards.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::OutOfCards)
    }

    pub fn burn(&mut self) {
        self.cards.pop();
    }

    /// Deal two hole cards to each player, round-robin in two passes the way
    /// a live dealer would.
    pub fn deal_pockets(&mut self, num_players: u8) -> Result<Vec<[Card; 2]>, DeckError> {
        if num_players > crate::MAX_PLAYERS {
            Err(DeckError::TooManyPlayers)
        } else if num_players < 1 {
            Err(DeckError::CantDealToNoPlayers)
        } else {
            let mut v = Vec::new();
            for i in (1..=num_players).rev() {
                let c1 = self.draw()?;
                let c2 = self.cards.remove(self.cards.len() - i as usize);
                v.push([c1, c2]);
            }
            Ok(v)
        }
    }

    /// Deal the five community cards: flop, turn, river. No burns.
    pub fn deal_community(&mut self) -> Result<[Card; 5], DeckError> {
        let mut board = [self.draw()?; BOARD_LEN];
        for slot in board.iter_mut().skip(1) {
            *slot = self.draw()?;
        }
        Ok(board)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckSeed([u8; SEED_LEN]);

impl DeckSeed {
    pub fn new(b: [u8; SEED_LEN]) -> Self {
        Self(b)
    }
}

impl Default for DeckSeed {
    fn default() -> Self {
        let mut b = [0u8; SEED_LEN];
        thread_rng().fill_bytes(&mut b);
        Self(b)
    }
}

impl fmt::Display for DeckSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b = [0u8; ENCODED_SEED_LEN];
        Base64::encode(&self.0, &mut b).unwrap();
        write!(f, "{}", String::from_utf8_lossy(&b))
    }
}

impl FromStr for DeckSeed {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut b: [u8; SEED_LEN] = [0; SEED_LEN];
        Base64::decode(s, &mut b)?;
        Ok(DeckSeed(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SEED1: DeckSeed = DeckSeed([1; SEED_LEN]);
    const SEED2: DeckSeed = DeckSeed([0; SEED_LEN]);

    #[test]
    fn right_len() {
        let d = Deck::default();
        assert_eq!(d.cards.len(), DECK_LEN);
    }

    #[test]
    fn right_count() {
        let d = Deck::default();
        let mut counts: HashMap<Card, u16> = HashMap::new();
        for card in d.cards.iter() {
            *counts.entry(*card).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), DECK_LEN);
        for count in counts.values() {
            assert_eq!(*count, 1);
        }
    }

    #[test]
    fn draw_all() {
        let mut d = Deck::default();
        for _ in 0..DECK_LEN {
            assert!(d.draw().is_ok());
        }
        assert_eq!(d.draw().unwrap_err(), DeckError::OutOfCards);
    }

    #[test]
    fn string_empty() {
        let res = cards_from_str("");
        assert_eq!(res.len(), 0);
    }

    #[test]
    fn string_single() {
        let res = cards_from_str("Ah");
        assert_eq!(res.len(), 1);
        let c = res[0];
        assert_eq!(c.rank(), Rank::RA);
        assert_eq!(c.suit(), Suit::Heart);
    }

    #[test]
    fn string_multi() {
        let res = cards_from_str("Ah2c6h");
        assert_eq!(res.len(), 3);
    }

    #[test]
    fn rank_values() {
        for (i, r) in ALL_RANKS.into_iter().enumerate() {
            assert_eq!(r.value(), 2 + i as u8);
        }
    }

    #[test]
    fn is_shuffled() {
        let mut d = Deck::default();
        let top = d.draw().unwrap();
        let next = d.draw().unwrap();
        let third = d.draw().unwrap();
        let fourth = d.draw().unwrap();
        if top.rank() == Rank::RA
            && next.rank() == Rank::RA
            && third.rank() == Rank::RA
            && fourth.rank() == Rank::RA
        {
            panic!("Top four cards were all aces, so the deck looks unshuffled. A false positive here is possible but absurdly unlikely.")
        }
    }

    #[test]
    fn deal_pockets_1() {
        let mut d = Deck::default();
        let expect = [d.cards[51], d.cards[50]];
        let actual = d.deal_pockets(1).unwrap();
        assert_eq!(actual[0], expect);
    }

    #[test]
    fn deal_pockets_2() {
        let mut d = Deck::default();
        let expect0 = [d.cards[51], d.cards[49]];
        let expect1 = [d.cards[50], d.cards[48]];
        let actual = d.deal_pockets(2).unwrap();
        assert_eq!(actual[0], expect0);
        assert_eq!(actual[1], expect1);
    }

    #[test]
    fn deal_pockets_max() {
        let mut d = Deck::default();
        let n = crate::MAX_PLAYERS as usize;
        let expect0 = [d.cards[51], d.cards[51 - n]];
        let expectn = [d.cards[51 - (n - 1)], d.cards[51 - n - (n - 1)]];
        let actual = d.deal_pockets(n as u8).unwrap();
        assert_eq!(actual[0], expect0);
        assert_eq!(actual[actual.len() - 1], expectn);
    }

    #[test]
    fn deal_pockets_bad_counts() {
        let mut d = Deck::default();
        assert_eq!(
            d.deal_pockets(crate::MAX_PLAYERS + 1).unwrap_err(),
            DeckError::TooManyPlayers
        );
        assert_eq!(
            d.deal_pockets(0).unwrap_err(),
            DeckError::CantDealToNoPlayers
        );
    }

    #[test]
    fn deal_community_after_pockets() {
        let mut d = Deck::default();
        let pockets = d.deal_pockets(6).unwrap();
        assert_eq!(pockets.len(), 6);
        let board = d.deal_community().unwrap();
        assert_eq!(d.cards.len(), DECK_LEN - 12 - 5);
        let mut all: Vec<Card> = pockets.iter().flatten().copied().collect();
        all.extend(board);
        let unique: std::collections::HashSet<Card> = all.iter().copied().collect();
        assert_eq!(unique.len(), 17);
    }

    /// Given a specific seed, the order of the cards should always be the same.
    #[test]
    fn deck_is_seedable() {
        let d1 = Deck::new(&SEED1);
        let d2 = Deck::new(&SEED1);
        assert_eq!(d1, d2);
        let mut d3 = Deck::new(&SEED2);
        d3.burn();
        d3.burn();
        assert_ne!(d1, d3);
    }

    #[test]
    fn seed_to_from_string() {
        let d = DeckSeed::default();
        let s = d.to_string();
        let d2: DeckSeed = s.parse().unwrap();
        assert_eq!(d, d2);
    }
}
