// Simple command-line application to play chess
//
// Enter moves like `e2e4`. Type `undo` to take back the last move, `moves e2` to list the
// destinations of a piece, or `quit` to exit.

use lightchess::{Board, Color, Game, Position};
use std::io::{self, BufRead, Write};

fn parse_move(s: &str) -> Option<(Position, Position)> {
    if s.len() != 4 || !s.is_ascii() {
        return None;
    }
    let (src, dst) = s.split_at(2);
    Some((src.parse().ok()?, dst.parse().ok()?))
}

fn main() -> io::Result<()> {
    let mut stdin = io::stdin().lock();
    let mut game = Game::new(Board::standard());

    loop {
        println!("{}", game.board());
        let side = match game.side() {
            Color::White => "White",
            Color::Black => "Black",
        };
        print!("{} move ({}): ", side, game.len() / 2 + 1);
        io::stdout().flush()?;

        let mut s = String::new();
        if stdin.read_line(&mut s)? == 0 {
            break;
        }
        let s = s.trim();

        match s {
            "quit" => break,
            "undo" => {
                if !game.undo() {
                    println!("Nothing to undo");
                }
            }
            _ if s.starts_with("moves ") => match s["moves ".len()..].trim().parse::<Position>() {
                Ok(pos) => {
                    let list: Vec<String> = game
                        .piece_moveset(pos)
                        .iter()
                        .map(|mv| mv.to_string())
                        .collect();
                    println!("Moves: {}", list.join(" "));
                }
                Err(e) => println!("Bad square: {}", e),
            },
            _ => match parse_move(s) {
                Some((src, dst)) => {
                    if let Err(e) = game.try_make_move(src, dst) {
                        println!("Bad move: {}", e);
                    }
                }
                None => println!("Cannot parse move {:?}", s),
            },
        }
        println!();
    }

    let history: Vec<String> = game.history().map(|mv| mv.to_string()).collect();
    println!("Moves played: {}", history.join(" "));
    Ok(())
}
