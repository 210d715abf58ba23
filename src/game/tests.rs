use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use super::*;
use crate::game::definition::record::example_record;
use crate::output::mock::MockGameOutput;

struct ContextBuilder {
    school_count: u32,
    settings: Settings,
    map_mode: bool,
    seed: u64,
}

impl ContextBuilder {
    fn new() -> Self {
        ContextBuilder {
            school_count: 5,
            settings: Default::default(),
            map_mode: false,
            seed: 0,
        }
    }

    fn map_mode(mut self, map_mode: bool) -> Self {
        self.map_mode = map_mode;
        self
    }

    fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn build(self) -> Context {
        let output = MockGameOutput::new();
        let records = (1..=self.school_count).map(example_record).collect();
        let store = SchoolStore::new(records).unwrap();
        let rng = StdRng::seed_from_u64(self.seed);
        let mut session = Session::new(store, self.settings, rng, output.clone());
        session.set_map_mode(self.map_mode);
        output.flush();
        Context { session, output }
    }
}

struct Context {
    session: Session<MockGameOutput, StdRng>,
    output: MockGameOutput,
}

impl Context {
    fn question(&self) -> QuizQuestion {
        self.session.get_current_question().unwrap().clone()
    }

    fn correct_id(&self) -> SchoolId {
        self.question().correct.id
    }

    fn wrong_id(&self) -> SchoolId {
        let question = self.question();
        question
            .choices
            .iter()
            .find(|c| c.id != question.correct.id)
            .unwrap()
            .id
    }

    fn target(&self) -> Coordinates {
        self.question().correct.coordinates
    }
}

#[test]
fn starts_in_ready_phase() {
    let ctx = ContextBuilder::new().build();
    let state = ctx.session.state();
    assert_eq!(state.phase, PhaseKind::Ready);
    assert_eq!(state.score, 0);
    assert!(state.current_question.is_none());
    assert_eq!(state.last_answer_correct, None);
}

#[test]
fn start_game_asks_first_question() {
    let mut ctx = ContextBuilder::new().build();
    ctx.session.start_game().unwrap();
    let state = ctx.session.state();
    assert_eq!(state.phase, PhaseKind::Playing);
    assert_eq!(state.question_index, 0);
    assert!(!state.show_result);
    assert_eq!(state.hints_revealed, [false; HINT_COUNT]);

    let messages = ctx.output.flush();
    assert_eq!(messages[0], Message::QuizRules(Settings::default()));
    assert_eq!(
        messages[1],
        Message::QuestionBegins(1, 5, state.current_question.unwrap())
    );
}

#[test]
fn cannot_start_twice() {
    let mut ctx = ContextBuilder::new().build();
    ctx.session.start_game().unwrap();
    assert!(ctx.session.start_game().is_err());
}

#[test]
fn actions_require_an_active_question() {
    let mut ctx = ContextBuilder::new().map_mode(true).build();
    assert!(ctx.session.answer_with_choice(1).is_err());
    assert!(ctx.session.answer_with_map_click(34.6, 135.5).is_err());
    assert!(ctx.session.reveal_hint(0).is_err());
    assert!(ctx.session.next_round().is_err());
    assert!(ctx.session.reset_to_ready().is_err());
}

#[test]
fn map_answers_require_map_mode() {
    let mut ctx = ContextBuilder::new().build();
    ctx.session.start_game().unwrap();
    let target = ctx.target();
    assert!(ctx
        .session
        .answer_with_map_click(target.latitude, target.longitude)
        .is_err());
    ctx.session.toggle_map_mode();
    assert!(ctx
        .session
        .answer_with_map_click(target.latitude, target.longitude)
        .unwrap()
        .is_correct);
    assert_eq!(ctx.session.state().score, 100);
}

#[test]
fn map_mode_changes_are_announced_once() {
    let mut ctx = ContextBuilder::new().build();
    ctx.session.set_map_mode(true);
    ctx.session.set_map_mode(true);
    assert_eq!(ctx.output.flush(), [Message::MapModeChanged(true)]);
    assert!(ctx.session.state().map_mode);
}

#[test]
fn hints_reset_every_round() {
    let mut ctx = ContextBuilder::new().build();
    ctx.session.start_game().unwrap();
    ctx.session.reveal_hint(1).unwrap();
    assert_eq!(ctx.session.state().hints_revealed, [false, true, false]);
    ctx.session.next_round().unwrap();
    assert_eq!(ctx.session.state().hints_revealed, [false; HINT_COUNT]);
}

#[test]
fn answered_round_is_frozen() {
    let mut ctx = ContextBuilder::new().build();
    ctx.session.start_game().unwrap();
    let wrong_id = ctx.wrong_id();
    let correct_id = ctx.correct_id();
    ctx.session.answer_with_choice(wrong_id).unwrap();
    assert!(ctx.session.answer_with_choice(correct_id).is_err());
    let state = ctx.session.state();
    assert!(state.show_result);
    assert_eq!(state.last_answer_correct, Some(false));
    assert_eq!(state.score, 0);
}

#[test]
fn map_miss_keeps_round_open() {
    let mut ctx = ContextBuilder::new().map_mode(true).build();
    ctx.session.start_game().unwrap();
    let target = ctx.target();

    let miss = ctx
        .session
        .answer_with_map_click(target.latitude + 1.0, target.longitude)
        .unwrap();
    assert!(!miss.is_correct);
    let state = ctx.session.state();
    assert!(!state.show_result);
    assert!(state.map_miss.is_some());

    ctx.session.tick(Duration::from_secs(3));
    let state = ctx.session.state();
    assert!(state.map_miss.is_none());
    assert!(!state.show_result);

    let hit = ctx
        .session
        .answer_with_map_click(target.latitude, target.longitude)
        .unwrap();
    assert!(hit.is_correct);
    assert!(ctx.session.state().show_result);
    assert_eq!(ctx.session.state().score, 100);
}

#[test]
fn full_game_asks_five_questions() {
    for seed in 0..20 {
        let mut ctx = ContextBuilder::new().seed(seed).build();
        ctx.session.start_game().unwrap();
        let mut questions_asked = 1;
        loop {
            let correct_id = ctx.correct_id();
            ctx.session.answer_with_choice(correct_id).unwrap();
            ctx.session.next_round().unwrap();
            if ctx.session.state().phase == PhaseKind::Finished {
                break;
            }
            questions_asked += 1;
        }
        assert_eq!(questions_asked, 5);
        let state = ctx.session.state();
        assert_eq!(state.question_index, 5);
        assert!(state.score <= 500);
        assert_eq!(state.score, 500);
    }
}

#[test]
fn scenario_with_hints_and_wrong_answers() {
    let mut ctx = ContextBuilder::new().seed(9).build();
    ctx.session.start_game().unwrap();
    let mut deltas = Vec::new();

    // Round 1: one hint, then the right answer
    ctx.session.reveal_hint(0).unwrap();
    let correct_id = ctx.correct_id();
    let before = ctx.session.state().score;
    ctx.session.answer_with_choice(correct_id).unwrap();
    assert_eq!(ctx.session.state().score - before, 80);
    deltas.push(ctx.session.state().score - before);
    ctx.session.next_round().unwrap();

    // Round 2: wrong answer
    let wrong_id = ctx.wrong_id();
    let before = ctx.session.state().score;
    ctx.session.answer_with_choice(wrong_id).unwrap();
    assert_eq!(ctx.session.state().score, before);
    deltas.push(0);
    ctx.session.next_round().unwrap();

    // Rounds 3 to 5: right answers with increasing hints
    for hints in 1..=3 {
        for index in 0..hints {
            ctx.session.reveal_hint(index).unwrap();
        }
        let correct_id = ctx.correct_id();
        let before = ctx.session.state().score;
        ctx.session.answer_with_choice(correct_id).unwrap();
        deltas.push(ctx.session.state().score - before);
        ctx.session.next_round().unwrap();
    }

    assert_eq!(deltas, vec![80, 0, 80, 60, 40]);
    let state = ctx.session.state();
    assert_eq!(state.phase, PhaseKind::Finished);
    assert_eq!(state.score, deltas.iter().sum::<u32>());
    assert!(ctx
        .output
        .contains_message(&Message::GameResults(260, 500, scoring::Tier::Regular)));
}

#[test]
fn skipped_questions_score_nothing() {
    let mut ctx = ContextBuilder::new().build();
    ctx.session.start_game().unwrap();
    for _ in 0..5 {
        ctx.session.next_round().unwrap();
    }
    let state = ctx.session.state();
    assert_eq!(state.phase, PhaseKind::Finished);
    assert_eq!(state.score, 0);
    assert!(ctx
        .output
        .any_message(|m| matches!(m, Message::QuestionSkipped(_))));
}

#[test]
fn replay_resets_session() {
    let mut ctx = ContextBuilder::new().build();
    ctx.session.start_game().unwrap();
    let correct_id = ctx.correct_id();
    ctx.session.answer_with_choice(correct_id).unwrap();
    for _ in 0..5 {
        ctx.session.next_round().unwrap();
    }
    assert!(ctx.session.start_game().is_err());

    ctx.session.reset_to_ready().unwrap();
    let state = ctx.session.state();
    assert_eq!(state.phase, PhaseKind::Ready);
    assert_eq!(state.score, 0);
    assert_eq!(state.question_index, 0);

    ctx.session.start_game().unwrap();
    assert_eq!(ctx.session.state().phase, PhaseKind::Playing);
}

#[test]
fn score_never_decreases() {
    let mut ctx = ContextBuilder::new().map_mode(true).seed(4).build();
    ctx.session.start_game().unwrap();
    let mut last_score = 0;
    for round in 0..5 {
        let target = ctx.target();
        ctx.session
            .answer_with_map_click(target.latitude + 2.0, target.longitude)
            .unwrap();
        assert!(ctx.session.state().score >= last_score);
        if round % 2 == 0 {
            let wrong_id = ctx.wrong_id();
            ctx.session.answer_with_choice(wrong_id).unwrap();
        } else {
            ctx.session.reveal_hint(2).unwrap();
            let correct_id = ctx.correct_id();
            ctx.session.answer_with_choice(correct_id).unwrap();
        }
        assert!(ctx.session.state().score >= last_score);
        last_score = ctx.session.state().score;
        ctx.session.next_round().unwrap();
    }
    assert_eq!(ctx.session.state().score, 80);
}
