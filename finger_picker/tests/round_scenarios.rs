//! End-to-end rounds driven through `Session` with scripted randomness.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use finger_picker::{
    Challenge, Haptics, MarkerStyle, Phase, RandomIndex, Session, TouchBatch, TouchId, TouchPoint,
};

// ════════════════════════════════════════════════════════════════════════════
// Test doubles
// ════════════════════════════════════════════════════════════════════════════

/// Replays a fixed list of indices, then keeps returning 0.
#[derive(Default)]
struct Scripted {
    picks: VecDeque<usize>,
}

impl Scripted {
    fn new(picks: &[usize]) -> Self {
        Scripted { picks: picks.iter().copied().collect() }
    }
}

impl RandomIndex for Scripted {
    fn index(&mut self, _len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0)
    }
}

#[derive(Default)]
struct Recorder {
    buzzes: usize,
}

impl Haptics for Recorder {
    fn vibrate(&mut self, _duration: Duration) {
        self.buzzes += 1;
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn dataset() -> Vec<Challenge> {
    vec![
        Challenge::new(1, "Do a handstand"),
        Challenge::new(2, "Swap seats with the left player"),
        Challenge::new(3, "Talk like a pirate until your next turn"),
    ]
}

/// First pick goes to the opening challenge draw.
fn session(picks: &[usize]) -> Session<Scripted, Recorder> {
    Session::new(dataset(), Scripted::new(picks), Recorder::default()).unwrap()
}

fn began(id: u64, x: f32, y: f32) -> TouchBatch {
    TouchBatch::Began(vec![TouchPoint::new(id, x, y)])
}

fn ended(id: u64) -> TouchBatch {
    TouchBatch::Ended(vec![TouchPoint::new(id, 0.0, 0.0)])
}

// ════════════════════════════════════════════════════════════════════════════
// Scenarios
// ════════════════════════════════════════════════════════════════════════════

#[test]
fn two_fingers_held_produce_one_winner() {
    let mut s = session(&[0, 1]);
    s.handle(&began(1, 10.0, 10.0), ms(0));
    s.handle(&began(2, 20.0, 20.0), ms(0));
    assert!(matches!(s.phase(), Phase::Holding { .. }));

    s.tick(ms(1999));
    assert_eq!(s.winner(), None);

    s.tick(ms(2000));
    assert_eq!(s.winner(), Some(TouchId(2)));
    let model = s.render();
    assert_eq!(model.markers.len(), 1);
    assert_eq!(model.markers[0].id, TouchId(2));
    assert_eq!(model.markers[0].style, MarkerStyle::Winner);
}

#[test]
fn early_release_never_produces_a_winner() {
    let mut s = session(&[]);
    s.handle(&began(1, 0.0, 0.0), ms(0));
    s.handle(&began(2, 0.0, 0.0), ms(0));
    s.handle(&ended(1), ms(500));
    assert_eq!(s.phase(), Phase::Idle);

    for t in (600..=6000).step_by(100) {
        s.tick(ms(t));
        assert_eq!(s.winner(), None);
    }
    assert_eq!(s.rounds_played(), 0);
}

#[test]
fn movement_does_not_shift_the_deadline() {
    let mut s = session(&[0, 2]);
    s.handle(&began(1, 0.0, 0.0), ms(0));
    s.handle(&began(2, 0.0, 0.0), ms(0));
    s.handle(&began(3, 0.0, 0.0), ms(0));
    s.handle(&TouchBatch::Moved(vec![TouchPoint::new(3, 30.0, 30.0)]), ms(1000));
    assert_eq!(s.phase(), Phase::Holding { deadline: ms(2000) });

    s.tick(ms(2000));
    assert_eq!(s.winner(), Some(TouchId(3)));
    assert_eq!(s.render().markers.len(), 1);
    assert_eq!(s.render().markers[0].center.x, 30.0);
}

#[test]
fn selection_only_considers_contacts_down_at_expiry() {
    let mut s = session(&[0, 0]);
    s.handle(&began(1, 0.0, 0.0), ms(0));
    s.handle(&began(2, 0.0, 0.0), ms(0));
    s.handle(&began(3, 0.0, 0.0), ms(100));
    s.handle(&ended(1), ms(1500));
    s.tick(ms(2000));
    // Index 0 of the remaining {2, 3}.
    assert_eq!(s.winner(), Some(TouchId(2)));
}

#[test]
fn joining_fingers_do_not_restart_the_timer() {
    let mut s = session(&[]);
    s.handle(&began(1, 0.0, 0.0), ms(0));
    s.handle(&began(2, 0.0, 0.0), ms(0));
    s.handle(&began(3, 0.0, 0.0), ms(1500));
    s.handle(&ended(3), ms(1700));
    s.tick(ms(2000));
    assert!(s.winner().is_some());
}

#[test]
fn gate_idle_whenever_population_below_two() {
    let mut s = session(&[]);
    let script = [
        (began(1, 0.0, 0.0), 0),
        (began(2, 0.0, 0.0), 100),
        (ended(2), 300),
        (began(2, 0.0, 0.0), 400),
        (ended(1), 900),
        (ended(2), 1000),
    ];
    for (batch, at) in &script {
        s.handle(batch, ms(*at));
        let holding = matches!(s.phase(), Phase::Holding { .. });
        assert_eq!(holding, s.population() >= 2, "after {:?}", batch);
    }
}

#[test]
fn round_settles_and_deals_next_challenge() {
    let mut s = session(&[0, 0, 0]);
    assert_eq!(s.current_challenge().map(|c| c.id), Some(1));

    s.handle(&began(1, 0.0, 0.0), ms(0));
    s.handle(&began(2, 0.0, 0.0), ms(0));
    s.tick(ms(2000));
    assert!(s.winner().is_some());

    s.tick(ms(2999));
    assert_eq!(s.render().markers.len(), 1);

    s.tick(ms(3000));
    assert_eq!(s.winner(), None);
    assert!(s.render().markers.is_empty());
    assert_eq!(s.current_challenge().map(|c| c.id), Some(2));
    // Fingers still down stay tracked.
    assert_eq!(s.population(), 2);
}

#[test]
fn lost_finger_release_after_settle_is_clean() {
    let mut s = session(&[0, 0]);
    s.handle(&began(1, 0.0, 0.0), ms(0));
    s.handle(&began(2, 0.0, 0.0), ms(0));
    s.tick(ms(3000));
    s.handle(&ended(2), ms(3100));
    s.handle(&ended(1), ms(3200));
    assert_eq!(s.population(), 0);
    assert_eq!(s.phase(), Phase::Idle);
}

#[test]
fn haptics_per_new_contact_and_per_selection() {
    let mut s = session(&[]);
    s.handle(&began(1, 0.0, 0.0), ms(0));
    s.handle(&began(1, 5.0, 5.0), ms(10)); // duplicate, no buzz
    s.handle(&began(2, 0.0, 0.0), ms(20));
    assert_eq!(s.haptics().buzzes, 2);
    s.tick(ms(2020));
    assert_eq!(s.haptics().buzzes, 3);
}

#[test]
fn cancelled_behaves_like_ended() {
    let mut s = session(&[]);
    s.handle(&began(1, 0.0, 0.0), ms(0));
    s.handle(&began(2, 0.0, 0.0), ms(0));
    s.handle(
        &TouchBatch::Cancelled(vec![TouchPoint::new(1, 0.0, 0.0), TouchPoint::new(2, 0.0, 0.0)]),
        ms(800),
    );
    assert_eq!(s.population(), 0);
    s.tick(ms(4000));
    assert_eq!(s.winner(), None);
}

#[test]
fn challenges_never_repeat_and_exhaust() {
    let mut s = session(&[]);
    let mut seen = HashSet::new();
    seen.insert(s.current_challenge().unwrap().id);

    let mut t = 0;
    for round in 0..4u64 {
        s.handle(&began(10 + round, 0.0, 0.0), ms(t));
        s.handle(&began(20 + round, 0.0, 0.0), ms(t));
        t += 3000;
        s.tick(ms(t));
        s.handle(&ended(10 + round), ms(t));
        s.handle(&ended(20 + round), ms(t));
        if round < 2 {
            assert!(seen.insert(s.current_challenge().unwrap().id));
        }
    }

    assert_eq!(seen.len(), 3);
    assert_eq!(s.remaining_challenges(), 0);
    assert!(s.is_exhausted());
    // The last card stays up.
    assert!(s.render().card.is_some());
    assert!(s.render().exhausted);
}

#[test]
fn pool_of_two_draws_both_then_reports_exhaustion() {
    let data = vec![Challenge::new(1, "A"), Challenge::new(2, "B")];
    let mut s = Session::new(data, Scripted::new(&[1]), Recorder::default()).unwrap();
    let first = s.current_challenge().unwrap().id;
    assert_eq!(first, 2);

    s.handle(&began(1, 0.0, 0.0), ms(0));
    s.handle(&began(2, 0.0, 0.0), ms(0));
    s.tick(ms(3000));
    assert_eq!(s.current_challenge().unwrap().id, 1);
    assert!(!s.is_exhausted());

    s.handle(&began(3, 0.0, 0.0), ms(3100));
    s.tick(ms(6100));
    assert!(s.is_exhausted());
    assert_eq!(s.current_challenge().unwrap().id, 1);
}

#[test]
fn pulse_only_while_holding() {
    let mut s = session(&[]);
    s.handle(&began(1, 0.0, 0.0), ms(0));
    assert!(s.render().markers[0].animations.is_empty());

    s.handle(&began(2, 0.0, 0.0), ms(100));
    assert!(s.render().markers.iter().all(|m| m.animations.len() == 2));

    s.handle(&ended(2), ms(400));
    let model = s.render();
    assert_eq!(model.markers.len(), 1);
    assert!(model.markers[0].animations.is_empty());
}

#[test]
fn duplicate_dataset_ids_fail_session_creation() {
    let data = vec![Challenge::new(1, "A"), Challenge::new(1, "B")];
    assert!(Session::new(data, Scripted::default(), Recorder::default()).is_err());
}

#[test]
fn winner_always_had_a_marker_during_the_hold() {
    let mut s = session(&[0, 0, 0]);
    s.handle(&began(1, 10.0, 10.0), ms(0));
    s.handle(&began(2, 20.0, 20.0), ms(0));
    s.tick(ms(3000));
    assert_eq!(s.rounds_played(), 1);

    // 1 and 2 stay down through the settle; 3 starts the next round.
    s.handle(&began(3, 30.0, 30.0), ms(3100));
    let held: Vec<TouchId> = s.render().markers.iter().map(|m| m.id).collect();
    assert_eq!(held, vec![TouchId(3)]);
    assert_eq!(s.population(), 3);

    s.tick(ms(5100));
    let winner = s.winner().unwrap();
    assert!(held.contains(&winner));
    let model = s.render();
    assert_eq!(model.markers.len(), 1);
    assert_eq!(model.markers[0].id, winner);
    assert_eq!(model.markers[0].style, MarkerStyle::Winner);
}
