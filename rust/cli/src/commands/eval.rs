//! Hand evaluation command.
//!
//! Scores the best five-card hand out of 5 to 7 cards given on the command
//! line and prints its category, description and packed score.

use std::collections::HashSet;
use std::io::Write;

use homegame_engine::cards::parse_cards;
use homegame_engine::hand::best_of;

use crate::error::CliError;
use crate::ui;

pub fn handle_eval_command(cards: &[String], out: &mut dyn Write) -> Result<(), CliError> {
    let cards = parse_cards(&cards.join(" "))?;
    if !(5..=7).contains(&cards.len()) {
        return Err(CliError::InvalidInput(format!(
            "expected 5 to 7 cards, got {}",
            cards.len()
        )));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
        return Err(CliError::InvalidInput(format!("duplicate card {}", dup)));
    }

    let score = best_of(&cards)
        .ok_or_else(|| CliError::InvalidInput("cannot score these cards".into()))?;
    let category = score
        .category()
        .map(|c| c.name())
        .unwrap_or("Unknown");

    writeln!(out, "Cards: {}", ui::cards_line(&cards))?;
    writeln!(out, "Category: {}", category)?;
    writeln!(out, "Hand: {}", score.describe())?;
    writeln!(out, "Score: {:#08x}", score.value())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(args: &[&str]) -> Result<String, CliError> {
        let cards: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        handle_eval_command(&cards, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn royal_flush_from_seven_cards() {
        let s = eval(&["2c", "As", "Ks", "Qs", "Js", "Ts", "3d"]).unwrap();
        assert!(s.contains("Category: Royal Flush"));
        assert!(s.starts_with("Cards: 2c As Ks Qs Js Ts 3d"));
    }

    #[test]
    fn comma_separated_cards_are_accepted() {
        let s = eval(&["5h,4h,3d,2c,Ac"]).unwrap();
        assert!(s.contains("Category: Straight"));
        assert!(s.contains("Hand: Straight: 5 high"));
    }

    #[test]
    fn rejects_wrong_card_count() {
        assert!(matches!(
            eval(&["As", "Ks", "Qs", "Js"]),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_duplicates_and_garbage() {
        let dup = eval(&["As", "As", "Qs", "Js", "Ts"]).unwrap_err();
        assert!(dup.to_string().contains("duplicate card As"));
        assert!(matches!(
            eval(&["Xx", "Ks", "Qs", "Js", "Ts"]),
            Err(CliError::InvalidInput(_))
        ));
    }
}
