use crate::deck::Card;
use crate::hand::{Hand, HandError};
use crate::PlayerId;
use itertools::Itertools;
use std::fmt;

/// One player's best hand for the round. Immutable once built; the showdown
/// owns it until the round's winners are announced.
#[derive(Debug, Clone)]
pub struct Evaluation {
    player: PlayerId,
    hand: Hand,
}

impl Evaluation {
    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Player {}: {}, tiebreakers [{}], best 5: {}",
            self.player,
            self.hand.class(),
            self.hand.strength().tiebreakers().iter().join(" "),
            self.hand.cards().iter().join(" "),
        )
    }
}

/// The resolved showdown for one round: every player's evaluation in
/// ascending player id order, and the players whose hands tied for best.
#[derive(Debug)]
pub struct Showdown {
    evaluations: Vec<Evaluation>,
    winners: Vec<PlayerId>,
}

impl Showdown {
    /// Evaluate every player's seven cards (two hole cards plus the shared
    /// board) and find the winner set. Ties are real ties: every player
    /// whose strength equals the maximum is a winner and would split the
    /// pot.
    pub fn resolve(
        pockets: &[(PlayerId, [Card; 2])],
        board: &[Card; 5],
    ) -> Result<Self, HandError> {
        let mut evaluations = Vec::with_capacity(pockets.len());
        for &(player, pocket) in pockets {
            let mut pool = pocket.to_vec();
            pool.extend_from_slice(board);
            let hand = Hand::best_of(&pool)?;
            evaluations.push(Evaluation { player, hand });
        }
        evaluations.sort_by_key(|e| e.player);
        let winners = match evaluations.iter().map(|e| &e.hand).max() {
            Some(best) => {
                let best = best.clone();
                evaluations
                    .iter()
                    .filter(|e| e.hand == best)
                    .map(|e| e.player)
                    .collect()
            }
            None => Vec::new(),
        };
        Ok(Self {
            evaluations,
            winners,
        })
    }

    /// Per-player evaluations in ascending player id order.
    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    /// Winning player ids in ascending order. More than one id means a tie.
    pub fn winners(&self) -> &[PlayerId] {
        &self.winners
    }
}
