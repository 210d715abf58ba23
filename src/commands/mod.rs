use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use unidecode::unidecode;

use crate::game::definition::quality::normalize_school_name;
use crate::game::definition::SchoolId;
use crate::game::scoring::HINT_COUNT;
use crate::game::Session;
use crate::output::{GameOutput, Message};


lazy_static! {
    static ref FORBIDDEN_GUESS_CHARACTERS_REGEX: Regex = Regex::new("[^a-z0-9]").unwrap();
}

fn sanitize(answer: &str) -> String {
    let answer = unidecode(answer);
    FORBIDDEN_GUESS_CHARACTERS_REGEX
        .replace_all(&answer.to_lowercase(), "")
        .into()
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Start,
    Choose(String),
    Map(f64, f64),
    Mode,
    Hint(usize),
    Next,
    Again,
    State,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim();
    let (name, args) = match line.find(char::is_whitespace) {
        Some(index) => (&line[..index], line[index..].trim()),
        None => (line, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "start" => Command::Start,
        "choose" | "c" => {
            if args.is_empty() {
                return Err(anyhow!("Usage: choose <1-4|#id|name>"));
            }
            Command::Choose(args.to_owned())
        }
        "map" | "m" => {
            let mut coordinates = args
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty());
            let latitude = coordinates
                .next()
                .context("Usage: map <lat> <lng>")?
                .parse::<f64>()
                .context("Latitude must be a number")?;
            let longitude = coordinates
                .next()
                .context("Usage: map <lat> <lng>")?
                .parse::<f64>()
                .context("Longitude must be a number")?;
            Command::Map(latitude, longitude)
        }
        "mode" => Command::Mode,
        "hint" | "h" => {
            let number: usize = args
                .parse()
                .with_context(|| format!("Usage: hint <1-{}>", HINT_COUNT))?;
            if number == 0 || number > HINT_COUNT {
                return Err(anyhow!("Hint must be between 1 and {}", HINT_COUNT));
            }
            Command::Hint(number - 1)
        }
        "next" | "n" => Command::Next,
        "again" => Command::Again,
        "state" | "status" => Command::State,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "" => return Err(anyhow!("Empty command")),
        other => return Err(anyhow!("Unknown command `{}`, try `help`", other)),
    };
    Ok(command)
}

/// Finds the choice the player meant, by list position, `#id` or school name.
fn resolve_choice<O: GameOutput + Clone, R: Rng>(
    session: &Session<O, R>,
    guess: &str,
) -> Result<SchoolId> {
    let question = session
        .get_current_question()
        .context("There is no active question")?;

    if let Some(id) = guess.strip_prefix('#') {
        let id = id
            .trim()
            .parse::<SchoolId>()
            .with_context(|| format!("`{}` is not a school id", guess))?;
        return question
            .get_choice(id)
            .map(|c| c.id)
            .with_context(|| format!("School #{} is not one of the choices", id));
    }

    if let Ok(position) = guess.parse::<usize>() {
        return question
            .choices
            .get(position.wrapping_sub(1))
            .map(|c| c.id)
            .with_context(|| format!("Choose a number between 1 and {}", question.choices.len()));
    }

    let sanitized_guess = sanitize(guess);
    if sanitized_guess.is_empty() {
        return Err(anyhow!("Invalid answer"));
    }
    question
        .choices
        .iter()
        .find(|c| {
            sanitize(&c.school_name) == sanitized_guess
                || sanitize(&normalize_school_name(&c.school_name)) == sanitized_guess
        })
        .map(|c| c.id)
        .with_context(|| format!("`{}` is not one of the choices", guess))
}

pub fn execute<O: GameOutput + Clone, R: Rng>(
    session: &mut Session<O, R>,
    output: &O,
    command: Command,
) -> Result<()> {
    match command {
        Command::Start => session.start_game(),
        Command::Choose(guess) => {
            let choice_id = resolve_choice(session, &guess)?;
            session.answer_with_choice(choice_id).map(|_| ())
        }
        Command::Map(latitude, longitude) => session
            .answer_with_map_click(latitude, longitude)
            .map(|_| ()),
        Command::Mode => {
            session.toggle_map_mode();
            Ok(())
        }
        Command::Hint(index) => session.reveal_hint(index),
        Command::Next => session.next_round(),
        Command::Again => session.reset_to_ready(),
        Command::State => {
            output.say(&Message::Status(session.state()));
            Ok(())
        }
        Command::Help => {
            output.say(&Message::CommandHelp);
            Ok(())
        }
        Command::Quit => Ok(()),
    }
}
