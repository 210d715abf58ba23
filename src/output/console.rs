use itertools::Itertools;
use std::io::{self, Write};

use crate::game::definition::SchoolRecord;
use crate::game::{PhaseKind, SessionState};
use crate::output::{GameOutput, Message};

const HINT_LABELS: [&str; 3] = ["Prefecture", "Region", "Landmark"];

#[derive(Clone, Debug, Default)]
pub struct ConsoleGameOutput;

impl ConsoleGameOutput {
    pub fn new() -> Self {
        ConsoleGameOutput
    }

    fn describe_school(school: &SchoolRecord) -> String {
        format!("**{}** ({})", school.school_name, school.location())
    }

    fn describe_status(state: &SessionState) -> String {
        let phase = match state.phase {
            PhaseKind::Ready => "ready, use `start` to begin",
            PhaseKind::Playing => "playing",
            PhaseKind::Finished => "finished, use `again` to play again",
        };
        let mut status = format!(
            "Phase: {}\nScore: {} points\nQuestion: {}/{}\nMap mode: {}",
            phase,
            state.score,
            (state.question_index + 1).min(state.question_count),
            state.question_count,
            if state.map_mode { "on" } else { "off" }
        );
        if let Some(question) = &state.current_question {
            let hints = state
                .hints_revealed
                .iter()
                .enumerate()
                .filter(|(_, revealed)| **revealed)
                .filter_map(|(index, _)| {
                    question
                        .correct
                        .hints
                        .get(index)
                        .map(|hint| format!("{}: {}", HINT_LABELS[index], hint))
                })
                .join("\n  ");
            if !hints.is_empty() {
                status += &format!("\nHints:\n  {}", hints);
            }
            if state.show_result {
                status += "\nThis question is answered, use `next` to continue.";
            }
        }
        match state.last_answer_correct {
            Some(true) => status += "\nLast answer: correct",
            Some(false) => status += "\nLast answer: wrong",
            None => (),
        }
        if let Some(miss) = &state.map_miss {
            status += &format!(
                "\nLast map click ({:.4}, {:.4}) was {:.1} km away.",
                miss.coordinates.latitude, miss.coordinates.longitude, miss.distance_km
            );
        }
        status
    }

    fn interpret_message(&self, message: &Message) -> String {
        use Message::*;
        match message {
            QuizRules(settings) => format!(
                "🎵 The quiz is about to begin!\n\n**📋 Rules**\n- Read the masked anthem lyrics and find out which school sings them.\n- There are {} questions, each worth up to {} points.\n- Use `choose 1-4`, `choose #id` or `choose <name>` to answer. Each hint you reveal with `hint 1-3` costs {} points.\n- In map mode (`mode`), answer with `map <lat> <lng>`. Clicks within {} km count, and a map answer refunds {} points of hint penalty.",
                settings.question_count,
                settings.base_score,
                settings.hint_penalty,
                settings.radius_km,
                settings.map_bonus
            ),
            QuestionBegins(number, total, question) => {
                let mut text = format!(
                    "🎧 **Question {}/{}** ({})\n\n{}\n",
                    number, total, question.correct.difficulty, question.masked_lyrics
                );
                for (index, choice) in question.choices.iter().enumerate() {
                    text += &format!("\n{}. {} (#{})", index + 1, choice.school_name, choice.id);
                }
                text
            }
            HintRevealed(index, hint) => {
                let label = HINT_LABELS.get(*index).copied().unwrap_or("Hint");
                format!("💡 {}: {}", label, hint)
            }
            GuessCorrect(school, score_delta) => format!(
                "✅ Correct! It was {}. You earned {} points!",
                Self::describe_school(school),
                score_delta
            ),
            GuessIncorrect(school) => format!(
                "❌ Wrong answer. It was {}.",
                Self::describe_school(school)
            ),
            MapHit(school, distance_km, score_delta) => format!(
                "📍 Correct! Your click was {:.1} km from {}. You earned {} points!",
                distance_km,
                Self::describe_school(school),
                score_delta
            ),
            MapMiss(distance_km) => format!(
                "📍 Missed by {:.1} km, try again!",
                distance_km
            ),
            MapMissCleared => "📍 The map is ready for another click.".into(),
            MapModeChanged(enabled) => {
                if *enabled {
                    "🗺️ Map mode enabled, answer with `map <lat> <lng>`.".into()
                } else {
                    "🗺️ Map mode disabled.".into()
                }
            }
            AnswerReveal(school) => {
                let mut text = format!("🎼 Full lyrics:\n{}", school.lyrics);
                if !school.notes.is_empty() {
                    text += &format!("\nℹ️ {}", school.notes);
                }
                text
            }
            QuestionSkipped(school) => format!(
                "⏭️ Skipped. The answer was {}.",
                Self::describe_school(school)
            ),
            GameResults(score, max_score, tier) => format!(
                "🎊🎊 **FINAL SCORE: {} / {}** 🎊🎊\nRank: {}\nUse `again` to play another game.",
                score, max_score, tier
            ),
            Status(state) => Self::describe_status(state),
            CommandHelp => "Commands:\n  start                  begin a new game\n  choose <1-4|#id|name>  answer with one of the choices\n  map <lat> <lng>        answer with a map location (map mode only)\n  mode                   toggle map mode\n  hint <1-3>             reveal a hint\n  next                   go to the next question\n  again                  return to the title after a game\n  state                  show the current game state\n  quit                   leave".into(),
        }
    }
}

impl GameOutput for ConsoleGameOutput {
    fn say(&self, message: &Message) {
        let content = self.interpret_message(message);
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = writeln!(handle, "{}\n", content) {
            tracing::error!("Error writing message: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::definition::record::example_record;
    use crate::game::scoring::Tier;
    use crate::game::settings::Settings;

    #[test]
    fn prints_final_score_and_tier() {
        let output = ConsoleGameOutput::new();
        let text = output.interpret_message(&Message::GameResults(420, 500, Tier::Expert));
        assert!(text.contains("420 / 500"));
        assert!(text.contains("Anthem Expert"));
    }

    #[test]
    fn rules_follow_settings() {
        let output = ConsoleGameOutput::new();
        let settings = Settings {
            question_count: 8,
            base_score: 250,
            hint_penalty: 40,
            radius_km: 30.0,
            ..Default::default()
        };
        let text = output.interpret_message(&Message::QuizRules(settings));
        assert!(text.contains("There are 8 questions, each worth up to 250 points."));
        assert!(text.contains("costs 40 points"));
        assert!(text.contains("within 30 km"));
        assert!(!text.contains("100 points"));
    }

    #[test]
    fn labels_hints() {
        let output = ConsoleGameOutput::new();
        let text = output.interpret_message(&Message::HintRevealed(2, "比叡山の麓".into()));
        assert_eq!(text, "💡 Landmark: 比叡山の麓");
    }

    #[test]
    fn reveals_school_on_wrong_answer() {
        let output = ConsoleGameOutput::new();
        let school = example_record(3);
        let text = output.interpret_message(&Message::GuessIncorrect(school.clone()));
        assert!(text.contains(&school.school_name));
    }
}
