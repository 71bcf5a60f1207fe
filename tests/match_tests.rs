//! Whole-match tests with bot participants.
//!
//! These verify the match-level guarantees:
//! - Every supported seat count deals and finishes rounds
//! - Matches are reproducible from their seed
//! - Scores are the sum of round penalties, ranked lowest first
//! - Bad configurations are rejected at construction

use proptest::prelude::*;
use train_dominoes::core::{
    DominoParameters, GameError, MatchConfig, PlayerId, MAX_PLAYERS, MAX_ROUNDS, MIN_PLAYERS,
};
use train_dominoes::game::{Game, RoundEnd, Standing};
use train_dominoes::players::Participant;

fn bot_game(players: usize, config: MatchConfig) -> Game {
    Game::with_bots(players, Vec::new(), config).unwrap()
}

#[test]
fn test_full_match_with_default_rounds() {
    let mut game = bot_game(4, MatchConfig::default().with_seed(2024));

    let standings = game.play_match().unwrap();

    assert!(game.is_completed());
    assert_eq!(game.rounds_played(), MAX_ROUNDS);
    assert_eq!(game.history().len(), MAX_ROUNDS as usize);
    assert_eq!(standings.len(), 4);
    assert_eq!(game.play_round(), Err(GameError::MatchComplete));

    // Scores are exactly the summed penalties.
    for player in PlayerId::all(4) {
        let total: u32 = game.history().iter().map(|round| round.penalties[player]).sum();
        assert_eq!(game.scores()[player], total);
    }

    // A domino round leaves the finishing seat with no penalty.
    for summary in game.history() {
        if let RoundEnd::Domino(winner) = summary.end {
            assert_eq!(summary.penalties[winner], 0);
        }
    }
}

#[test]
fn test_every_seat_count_plays_a_round() {
    for players in MIN_PLAYERS..=MAX_PLAYERS {
        let mut game = bot_game(players, MatchConfig::default().with_rounds(1).with_seed(players as u64));
        let params = DominoParameters::for_player_count(players).unwrap();

        game.setup_round().unwrap();
        let round = game.round().unwrap();
        assert_eq!(round.engine().key(), (params.max_face, params.max_face));
        assert!(round.hand_sizes().values().all(|&n| n == params.hand_size));
        assert_eq!(
            round.boneyard_len(),
            params.set_size() - 1 - players * params.hand_size
        );

        let summary = game.play_round().unwrap();
        assert_eq!(summary.round, 1);
        assert!(game.is_completed());
    }
}

#[test]
fn test_same_seed_same_match() {
    let mut first = bot_game(5, MatchConfig::default().with_rounds(3).with_seed(99));
    let mut second = bot_game(5, MatchConfig::default().with_rounds(3).with_seed(99));

    assert_eq!(first.play_match().unwrap(), second.play_match().unwrap());
    assert_eq!(first.history(), second.history());
}

#[test]
fn test_rankings_are_ascending() {
    let mut game = bot_game(6, MatchConfig::default().with_rounds(2).with_seed(7));

    let standings = game.play_match().unwrap();

    assert_eq!(standings[0].rank, 1);
    for pair in standings.windows(2) {
        assert!(pair[0].score <= pair[1].score);
        if pair[0].score == pair[1].score {
            assert_eq!(pair[0].rank, pair[1].rank);
            assert!(pair[0].player < pair[1].player);
        } else {
            assert!(pair[0].rank < pair[1].rank);
        }
    }
    let names: Vec<&str> = standings.iter().map(|s| s.name.as_str()).collect();
    assert!(names.iter().all(|name| name.starts_with("CPU ")));
}

#[test]
fn test_standings_serialize() {
    let mut game = bot_game(2, MatchConfig::default().with_rounds(1).with_seed(3));
    let standings = game.play_match().unwrap();

    let json = serde_json::to_string(&standings).unwrap();
    let back: Vec<Standing> = serde_json::from_str(&json).unwrap();
    assert_eq!(standings, back);

    let json = serde_json::to_string(&game.history()[0]).unwrap();
    assert!(json.contains("penalties"));
}

#[test]
fn test_configuration_errors() {
    assert!(matches!(
        Game::with_bots(1, Vec::new(), MatchConfig::default()),
        Err(GameError::Configuration(_))
    ));
    assert!(matches!(
        Game::with_bots(MAX_PLAYERS + 1, Vec::new(), MatchConfig::default()),
        Err(GameError::Configuration(_))
    ));
    assert!(matches!(
        Game::with_bots(2, Vec::new(), MatchConfig::default().with_rounds(0)),
        Err(GameError::Configuration(_))
    ));

    // A human may not take a bot's name.
    let err = Game::with_bots(2, vec![Participant::bot("CPU 2")], MatchConfig::default()).unwrap_err();
    assert!(err.to_string().contains("CPU 2"));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = MatchConfig::new().with_rounds(4).with_seed(12);

    let json = serde_json::to_string(&config).unwrap();
    let back: MatchConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(config, back);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_bot_rounds_always_finish(players in MIN_PLAYERS..=MAX_PLAYERS, seed in any::<u64>()) {
        let mut game = bot_game(players, MatchConfig::default().with_rounds(1).with_seed(seed));

        let summary = game.play_round().unwrap();

        let finished = match summary.end {
            RoundEnd::Domino(winner) => summary.penalties[winner] == 0,
            RoundEnd::Blocked => true,
        };
        prop_assert!(finished);
        prop_assert!(game.round().is_none());
    }
}
