use std::error::Error;
use std::io::{stdin, stdout, BufRead, Write};

use holdem_core::deck::{Card, Deck, DeckSeed};
use holdem_core::showdown::Showdown;
use holdem_core::PlayerId;
use itertools::Itertools;
use structopt::StructOpt;

const MIN_PLAYERS: u8 = 2;
const MAX_PLAYERS: u8 = 6;

#[derive(StructOpt)]
struct Opt {
    #[structopt(short, default_value = "4", help = "Number of players (2-6)")]
    n_players: u8,
    #[structopt(long, default_value, help = "Deck seed for the first round")]
    seed: DeckSeed,
    #[structopt(
        long,
        help = "Play this many rounds and exit instead of prompting between rounds"
    )]
    rounds: Option<u32>,
}

fn cards_line(cards: &[Card]) -> String {
    cards.iter().join(" ")
}

fn play_round(n_players: u8, seed: &DeckSeed) -> Result<(), Box<dyn Error>> {
    let mut deck = Deck::new(seed);
    let pockets = deck.deal_pockets(n_players)?;
    let board = deck.deal_community()?;

    println!("\n--- New round (seed {}) ---", seed);
    let seats: Vec<(PlayerId, [Card; 2])> = pockets
        .into_iter()
        .enumerate()
        .map(|(i, pocket)| (i as PlayerId + 1, pocket))
        .collect();
    for (player, pocket) in &seats {
        println!("Player {} hole: {}", player, cards_line(pocket));
    }
    println!("Community cards: {}", cards_line(&board));

    let showdown = Showdown::resolve(&seats, &board)?;
    for eval in showdown.evaluations() {
        println!("{}", eval);
    }
    match showdown.winners() {
        [] => println!("No players, no winner"),
        [w] => println!("Winner: Player {}", w),
        ws => println!("Tie between players: {}", ws.iter().join(", ")),
    }
    Ok(())
}

fn another_round() -> Result<bool, Box<dyn Error>> {
    print!("\nPlay another round? (y/n): ");
    stdout().flush()?;
    let mut buf = String::new();
    stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim().to_lowercase().starts_with('y'))
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&opt.n_players) {
        return Err(format!(
            "Number of players must be between {} and {}",
            MIN_PLAYERS, MAX_PLAYERS
        )
        .into());
    }
    // The given seed covers the first round; later rounds reshuffle fresh.
    let mut seed = opt.seed;
    match opt.rounds {
        Some(rounds) => {
            for _ in 0..rounds {
                play_round(opt.n_players, &seed)?;
                seed = DeckSeed::default();
            }
        }
        None => loop {
            play_round(opt.n_players, &seed)?;
            seed = DeckSeed::default();
            if !another_round()? {
                break;
            }
        },
    }
    println!("Goodbye!");
    Ok(())
}
