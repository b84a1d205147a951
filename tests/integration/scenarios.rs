//! Fixed-outcome sessions with hand-checked bankroll paths.

use oddsyssee::engine::events::EventLog;
use oddsyssee::engine::session::Session;
use oddsyssee::game::{AlternatingGame, LosingGame, WinningGame};
use oddsyssee::strategy::StrategyKind;
use oddsyssee::types::{PlayerProps, PlayingCondition, RoundResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn props() -> PlayerProps {
    PlayerProps::new(dec!(1000), dec!(1100)).unwrap()
}

#[test]
fn test_single_bet_wins_in_one_round() {
    let mut log = EventLog::new();
    let report = Session::for_strategies(0, props(), &[StrategyKind::SingleBet], dec!(2))
        .run(&mut WinningGame, &mut log)
        .unwrap();

    assert_eq!(report.rounds, 1);
    let round = log.rounds().next().unwrap();
    assert_eq!(round.stake, dec!(100));
    assert_eq!(round.payout, dec!(200));
    assert_eq!(round.bankroll_after, dec!(1100));
    assert_eq!(round.condition, PlayingCondition::Won);
}

#[test]
fn test_single_bet_loss_continues() {
    let mut log = EventLog::new();
    Session::for_strategies(0, props(), &[StrategyKind::SingleBet], dec!(2))
        .run(&mut LosingGame, &mut log)
        .unwrap();

    let rounds: Vec<_> = log.rounds().collect();
    assert_eq!(rounds[0].stake, dec!(100));
    assert_eq!(rounds[0].payout, Decimal::ZERO);
    assert_eq!(rounds[0].bankroll_after, dec!(900));
    assert_eq!(rounds[0].condition, PlayingCondition::Playing);
    // Same stake again, well within the 900 left.
    assert_eq!(rounds[1].bankroll_before, dec!(900));
    assert_eq!(rounds[1].stake, dec!(100));
}

#[test]
fn test_oscars_grind_session_ends_on_target() {
    let mut log = EventLog::new();
    let report = Session::for_strategies(0, props(), &[StrategyKind::OscarsGrind], dec!(2))
        .run(&mut WinningGame, &mut log)
        .unwrap();

    assert_eq!(report.rounds, 1);
    assert_eq!(log.rounds().next().unwrap().stake, dec!(100));
    let p = report.player(0).unwrap();
    assert_eq!(p.condition, PlayingCondition::Won);
    assert_eq!(p.final_bankroll, dec!(1100));
}

#[test]
fn test_martingale_all_in_path() {
    let mut log = EventLog::new();
    let report = Session::for_strategies(0, props(), &[StrategyKind::Martingale], dec!(2))
        .run(&mut LosingGame, &mut log)
        .unwrap();

    let path: Vec<_> = log
        .rounds()
        .map(|r| (r.bankroll_before, r.stake, r.bankroll_after))
        .collect();
    assert_eq!(
        path,
        vec![
            (dec!(1000), dec!(100), dec!(900)),
            (dec!(900), dec!(200), dec!(700)),
            (dec!(700), dec!(400), dec!(300)),
            (dec!(300), dec!(300), dec!(0)),
        ]
    );
    assert_eq!(report.player(0).unwrap().condition, PlayingCondition::Lost);
}

#[test]
fn test_every_round_balances_exactly() {
    let props = PlayerProps::new(dec!(10.10), dec!(13.37)).unwrap();
    let mut log = EventLog::new();
    Session::for_strategies(0, props, StrategyKind::ALL, dec!(1.95))
        .with_max_rounds(Some(200))
        .run(&mut AlternatingGame::new(RoundResult::Lose), &mut log)
        .unwrap();

    assert!(log.rounds().count() > 0);
    for r in log.rounds() {
        assert!(r.stake >= Decimal::ZERO && r.stake <= r.bankroll_before);
        assert_eq!(r.bankroll_after, r.bankroll_before - r.stake + r.payout);
        let expected = if r.result == RoundResult::Win { r.stake * dec!(1.95) } else { Decimal::ZERO };
        assert_eq!(r.payout, expected);
    }
}
