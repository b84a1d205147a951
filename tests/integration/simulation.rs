//! Multi-player and multi-run behaviour: termination, round caps and
//! isolation of aborted runs.

use oddsyssee::engine::events::{EventLog, NullSink};
use oddsyssee::engine::session::Session;
use oddsyssee::engine::{SimulationPlan, Simulator};
use oddsyssee::game::{AlternatingGame, FixedProbabilityGame, OutcomeSource, WinningGame};
use oddsyssee::player::Player;
use oddsyssee::strategy::{BettingSystem, StrategyKind};
use oddsyssee::types::{Bet, BettingError, PlayerProps, PlayingCondition, RoundResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn props() -> PlayerProps {
    PlayerProps::new(dec!(1000), dec!(1100)).unwrap()
}

/// Bets one more than it has on the second call.
struct Overreacher {
    calls: u32,
}

impl BettingSystem for Overreacher {
    fn name(&self) -> &'static str {
        "Overreacher"
    }

    fn next_bet(&mut self, current_bankroll: Decimal) -> Bet {
        self.calls += 1;
        if self.calls == 2 {
            Bet::new(current_bankroll + Decimal::ONE)
        } else {
            Bet::new(dec!(1))
        }
    }
}

#[test]
fn test_cohort_terminates_under_alternating_outcomes() {
    let report = Session::for_strategies(0, props(), StrategyKind::ALL, dec!(2))
        .with_max_rounds(Some(1_000))
        .run(&mut AlternatingGame::new(RoundResult::Win), &mut NullSink)
        .unwrap();

    assert!(!report.capped);
    assert!(report.rounds <= 10);
    assert!(report
        .players
        .iter()
        .all(|p| p.condition == PlayingCondition::Won));
}

#[test]
fn test_lose_first_alternation_hits_round_cap() {
    let mut log = EventLog::new();
    let report = Session::for_strategies(0, props(), StrategyKind::ALL, dec!(2))
        .with_max_rounds(Some(100))
        .run(&mut AlternatingGame::new(RoundResult::Lose), &mut log)
        .unwrap();

    assert!(report.capped);
    assert_eq!(report.rounds, 100);
    // Martingale recovers on the first win; the others never break out.
    let martingale = report.players.iter().find(|p| p.strategy == "Martingale").unwrap();
    assert_eq!(martingale.condition, PlayingCondition::Won);
    assert_eq!(martingale.stats.rounds_played, 2);
    let stuck: Vec<_> = report.unfinished().map(|p| p.strategy).collect();
    assert_eq!(stuck, vec!["Single Bet", "Oscar's Grind"]);
    assert_eq!(log.finishes().count(), 1);
}

#[test]
fn test_random_cohort_terminates() {
    let plan = SimulationPlan::new(props(), StrategyKind::ALL.to_vec(), dec!(2), 50)
        .unwrap()
        .with_max_rounds(Some(100_000));
    let mut game = FixedProbabilityGame::seeded(18.0 / 37.0, 2024).unwrap();
    let summary = Simulator::new(plan).run_all(&mut game, &mut NullSink);

    assert_eq!(summary.runs_completed, 50);
    assert_eq!(summary.runs_capped, 0);
    for tally in &summary.tallies {
        assert_eq!(tally.sessions, 50);
        assert_eq!(tally.won + tally.lost, 50, "{} left sessions unfinished", tally.strategy);
        assert_eq!(tally.unfinished, 0);
    }
}

#[test]
fn test_policy_violation_names_player_and_strategy() {
    let players = vec![
        Player::new(0, "steady", props(), StrategyKind::OscarsGrind.build(props())),
        Player::new(1, "reckless", props(), Box::new(Overreacher { calls: 0 })),
    ];
    let mut game = AlternatingGame::new(RoundResult::Lose);
    let err = Session::new(0, players, dec!(2))
        .run(&mut game, &mut NullSink)
        .unwrap_err();

    match &err {
        BettingError::PolicyViolation { player, strategy, stake, bankroll } => {
            assert_eq!(player, "reckless");
            assert_eq!(strategy, "Overreacher");
            assert_eq!(*bankroll, dec!(999));
            assert_eq!(*stake, dec!(1000));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Overreacher"));
}

#[test]
fn test_aborted_run_does_not_stop_the_rest() {
    let plan = SimulationPlan::new(props(), vec![StrategyKind::SingleBet], dec!(2), 3).unwrap();
    let sim = Simulator::new(plan);
    let mut log = EventLog::new();
    let summary = sim.run_all_with(&mut WinningGame, &mut log, |run| {
        let mut players = sim.cohort();
        if run == 1 {
            players.push(Player::new(1, "reckless", props(), Box::new(Overreacher { calls: 1 })));
        }
        players
    });

    assert_eq!(summary.runs_completed, 2);
    assert_eq!(summary.failed_runs.len(), 1);
    assert_eq!(summary.failed_runs[0].run, 1);
    assert!(summary.failed_runs[0].error.contains("reckless"));
    assert_eq!(summary.tally("Single Bet").unwrap().sessions, 2);
    assert!(summary.tally("Overreacher").is_none());

    // The aborted run never drew an outcome, so only runs 0 and 2 show up.
    let runs: Vec<_> = log.rounds().map(|r| r.run).collect();
    assert_eq!(runs, vec![0, 2]);
}

#[test]
fn test_overflowing_config_fails_runs_instead_of_panicking() {
    let huge = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
    let props = PlayerProps::new(huge, huge * dec!(7)).unwrap();
    let plan = SimulationPlan::new(props, vec![StrategyKind::Martingale], dec!(10), 3).unwrap();
    let summary = Simulator::new(plan).run_all(&mut WinningGame, &mut NullSink);

    assert_eq!(summary.runs_completed, 0);
    assert_eq!(summary.failed_runs.len(), 3);
    assert!(summary
        .failed_runs
        .iter()
        .all(|f| f.error.contains("exceeds the representable range")));
}

#[test]
fn test_shared_source_advances_across_runs() {
    let plan = SimulationPlan::new(props(), vec![StrategyKind::SingleBet], dec!(2), 2)
        .unwrap()
        .with_max_rounds(Some(10));
    let mut game = AlternatingGame::new(RoundResult::Win);
    let mut log = EventLog::new();
    Simulator::new(plan).run_all(&mut game, &mut log);

    // Run 0 wins at once; run 1 starts on the following loss and then
    // oscillates until the cap, using up draws 1 through 10.
    let firsts: Vec<_> = log
        .rounds()
        .filter(|r| r.round == 1)
        .map(|r| (r.run, r.result))
        .collect();
    assert_eq!(firsts, vec![(0, RoundResult::Win), (1, RoundResult::Lose)]);
    assert_eq!(game.next_outcome(), RoundResult::Lose);
}
