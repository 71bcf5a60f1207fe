//! Match controller: rounds, turns, legality and scoring.
//!
//! `Game` owns the participants, the running scores, the match RNG and the
//! live `RoundState`. A turn asks the acting participant for a move against
//! the trains they may extend, then decides whether what happened was legal
//! by diffing board snapshots taken before and after:
//!
//! - nothing changed, and a move existed: illegal
//! - nothing changed, and no move existed: a pass, the seat's train is marked
//! - exactly one train changed, and it was open to the seat: a play; if it
//!   was the seat's own train it is unmarked
//! - anything else: illegal
//!
//! Illegal turns abort the round. The state from the start of the aborted
//! turn is kept so [`Game::rollback`] can restore it.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::core::{DominoParameters, GameError, GameRng, GameRngState, MatchConfig, PlayerId, PlayerMap};
use crate::players::{MoveDecider, Participant};
use crate::tiles::Tile;
use crate::trains::{Train, TrainOwner};

use super::round::{RoundEnd, RoundState};
use super::snapshot::StateSnapshot;

/// What a seat did on its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// A tile was placed.
    Played {
        player: PlayerId,
        /// The tile as placed (oriented to its end).
        tile: Tile,
        train: TrainOwner,
        end: Tile,
        /// Whether the seat drew before playing.
        drew: bool,
    },
    /// Nothing was placed; the seat's train is now marked.
    Passed { player: PlayerId, drew: bool },
}

impl TurnOutcome {
    /// The seat that took the turn.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            TurnOutcome::Played { player, .. } | TurnOutcome::Passed { player, .. } => *player,
        }
    }
}

/// Result of one scored round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// 1-based round number.
    pub round: u32,
    pub end: RoundEnd,
    /// Points added to each seat's score.
    pub penalties: PlayerMap<u32>,
}

/// A seat's place in the final ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based; tied scores share a rank.
    pub rank: usize,
    pub player: PlayerId,
    pub name: String,
    pub score: u32,
}

/// Round state captured at the start of an aborted turn.
#[derive(Clone, Debug)]
struct Checkpoint {
    round: RoundState,
    rng: GameRngState,
    player: PlayerId,
    turn: u32,
}

/// A match of Train Dominoes.
#[derive(Debug)]
pub struct Game {
    config: MatchConfig,
    parameters: DominoParameters,
    participants: PlayerMap<Participant>,
    scores: PlayerMap<u32>,
    rounds_played: u32,
    rng: GameRng,
    round: Option<RoundState>,
    checkpoint: Option<Checkpoint>,
    history: Vec<RoundSummary>,
}

impl Game {
    /// Seat `participants` in the given order.
    ///
    /// Fails on an unsupported seat count, a zero round limit, or two
    /// participants sharing a name.
    pub fn new(participants: Vec<Participant>, config: MatchConfig) -> Result<Self, GameError> {
        config.validate()?;
        let parameters = DominoParameters::for_player_count(participants.len())?;

        let mut names = FxHashSet::default();
        for participant in &participants {
            if !names.insert(participant.name()) {
                return Err(GameError::Configuration(format!(
                    "participant name {:?} is used more than once",
                    participant.name()
                )));
            }
        }

        let player_count = participants.len();
        info!(
            players = player_count,
            max_face = parameters.max_face,
            hand_size = parameters.hand_size,
            rounds = config.rounds,
            seed = config.seed,
            "match created"
        );

        Ok(Self {
            rng: GameRng::new(config.seed),
            config,
            parameters,
            participants: PlayerMap::from_vec(participants),
            scores: PlayerMap::with_value(player_count, 0),
            rounds_played: 0,
            round: None,
            checkpoint: None,
            history: Vec::new(),
        })
    }

    /// Seat `humans` first, then `bot_count` greedy bots named `CPU 1`,
    /// `CPU 2`, and so on.
    pub fn with_bots(bot_count: usize, humans: Vec<Participant>, config: MatchConfig) -> Result<Self, GameError> {
        let mut participants = humans;
        participants.extend((1..=bot_count).map(|i| Participant::bot(format!("CPU {i}"))));
        Self::new(participants, config)
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn parameters(&self) -> DominoParameters {
        self.parameters
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.participants.player_count()
    }

    #[must_use]
    pub fn participant(&self, player: PlayerId) -> &Participant {
        &self.participants[player]
    }

    #[must_use]
    pub fn scores(&self) -> &PlayerMap<u32> {
        &self.scores
    }

    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// 1-based number of the round in progress, or of the next one to deal.
    #[must_use]
    pub fn round_number(&self) -> u32 {
        self.rounds_played + 1
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.rounds_played >= self.config.rounds
    }

    /// The live round, if one is in progress.
    #[must_use]
    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    fn live_round(&self) -> Result<&RoundState, GameError> {
        self.round.as_ref().ok_or(GameError::NoActiveRound)
    }

    /// Summaries of every scored round, oldest first.
    #[must_use]
    pub fn history(&self) -> &[RoundSummary] {
        &self.history
    }

    /// Whether an aborted turn is waiting to be rolled back.
    #[must_use]
    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }

    /// The seat that acts next in the live round.
    pub fn current_player(&self) -> Result<PlayerId, GameError> {
        Ok(self.live_round()?.current_player())
    }

    /// Canonical snapshot of the live round's trains.
    pub fn snapshot(&self) -> Result<StateSnapshot, GameError> {
        Ok(self.live_round()?.snapshot())
    }

    /// Trains `player` may currently extend.
    pub fn legal_trains(&self, player: PlayerId) -> Result<Vec<&Train>, GameError> {
        Ok(self.live_round()?.legal_trains(player))
    }

    pub fn has_legal_move(&self, player: PlayerId) -> Result<bool, GameError> {
        Ok(self.live_round()?.has_legal_move(player))
    }

    /// Seats ordered by ascending score, ties kept in seat order.
    #[must_use]
    pub fn rankings(&self) -> Vec<Standing> {
        let mut order: Vec<(PlayerId, u32)> = self.scores.iter().map(|(p, s)| (p, *s)).collect();
        order.sort_by_key(|(player, score)| (*score, *player));

        let mut standings: Vec<Standing> = Vec::with_capacity(order.len());
        for (i, (player, score)) in order.into_iter().enumerate() {
            let rank = match standings.last() {
                Some(prev) if prev.score == score => prev.rank,
                _ => i + 1,
            };
            standings.push(Standing {
                rank,
                player,
                name: self.participants[player].name().to_string(),
                score,
            });
        }
        standings
    }

    // === Round lifecycle ===

    /// Deal a fresh round.
    pub fn setup_round(&mut self) -> Result<(), GameError> {
        self.check_can_start()?;
        let round = RoundState::deal(self.parameters, self.player_count(), &mut self.rng)?;
        self.install(round);
        Ok(())
    }

    /// Start a prepared round instead of dealing one.
    pub fn start_round(&mut self, round: RoundState) -> Result<(), GameError> {
        self.check_can_start()?;
        if round.player_count() != self.player_count() {
            return Err(GameError::Configuration(format!(
                "round has {} hands for {} participants",
                round.player_count(),
                self.player_count()
            )));
        }
        self.install(round);
        Ok(())
    }

    fn check_can_start(&self) -> Result<(), GameError> {
        if self.is_completed() {
            return Err(GameError::MatchComplete);
        }
        if self.round.is_some() {
            return Err(GameError::RoundInProgress);
        }
        Ok(())
    }

    fn install(&mut self, round: RoundState) {
        info!(
            round = self.round_number(),
            engine = %round.engine(),
            start = %round.current_player(),
            boneyard = round.boneyard_len(),
            "round started"
        );
        self.checkpoint = None;
        self.round = Some(round);
    }

    /// Add every seat's remaining hand value to its score and close the
    /// round.
    pub fn score_round(&mut self) -> Result<RoundSummary, GameError> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        let end = round.end().ok_or(GameError::RoundInProgress)?;

        let penalties = round.drain_hands();
        for (player, points) in penalties.iter() {
            self.scores[player] += *points;
        }
        self.round = None;
        self.rounds_played += 1;

        let summary = RoundSummary {
            round: self.rounds_played,
            end,
            penalties,
        };
        info!(round = summary.round, end = ?summary.end, "round scored");
        self.history.push(summary.clone());
        Ok(summary)
    }

    /// Play turns until the live round ends (dealing one if needed), then
    /// score it.
    pub fn play_round(&mut self) -> Result<RoundSummary, GameError> {
        if self.round.is_none() {
            self.setup_round()?;
        }
        while self.round.as_ref().map_or(false, |round| round.end().is_none()) {
            self.play_turn()?;
        }
        self.score_round()
    }

    /// Play every remaining round and return the final ranking.
    pub fn play_match(&mut self) -> Result<Vec<Standing>, GameError> {
        while !self.is_completed() {
            self.play_round()?;
        }
        let standings = self.rankings();
        if let Some(winner) = standings.first() {
            info!(winner = %winner.name, score = winner.score, "match over");
        }
        Ok(standings)
    }

    // === Turns ===

    /// Play the next seat's turn.
    ///
    /// A seat with nothing to play draws once if the pile is not empty. On
    /// a seat's first turn of the round the participant is only consulted
    /// if that leaves them a move; later turns always consult them.
    ///
    /// Errors raised while realizing the participant's choice abort the
    /// round and come back as [`GameError::IllegalTurn`].
    pub fn play_turn(&mut self) -> Result<TurnOutcome, GameError> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        if round.end().is_some() {
            return Err(GameError::RoundOver);
        }

        let saved_round = round.clone();
        let saved_rng = self.rng.state();

        let (player, turn) = round.advance_turn();
        let before = round.snapshot();
        let participant = &mut self.participants[player];

        match Self::run_turn(round, &mut self.rng, participant, player, turn, &before) {
            Ok(outcome) => {
                debug!(turn, outcome = ?outcome, "turn played");
                if let Some(end) = round.end() {
                    info!(end = ?end, "round over");
                }
                self.checkpoint = None;
                Ok(outcome)
            }
            Err(cause) => {
                warn!(%player, turn, error = %cause, "illegal turn, round aborted");
                self.round = None;
                self.checkpoint = Some(Checkpoint {
                    round: saved_round,
                    rng: saved_rng,
                    player,
                    turn,
                });
                Err(GameError::IllegalTurn {
                    player,
                    cause: Box::new(cause),
                    snapshot: Box::new(before),
                })
            }
        }
    }

    fn run_turn(
        round: &mut RoundState,
        rng: &mut GameRng,
        participant: &mut Participant,
        player: PlayerId,
        turn: u32,
        before: &StateSnapshot,
    ) -> Result<TurnOutcome, GameError> {
        let mut drew = false;
        if !round.has_legal_move(player) {
            drew = round.draw_for(player, rng)?.is_some();
        }
        let can_move = round.has_legal_move(player);

        if turn == 0 && !can_move {
            round.pass(player, drew)?;
            return Ok(TurnOutcome::Passed { player, drew });
        }

        let strategy = participant.strategy_mut();
        let choice = round.decide(player, |hand, trains| strategy.decide_move(hand, trains));
        let placed = match choice {
            Some(mv) => Some((mv, round.apply_move(player, &mv)?)),
            None => None,
        };

        let after = round.snapshot();
        let changed = before.changed_trains(&after);
        trace!(
            before = before.fingerprint(),
            after = after.fingerprint(),
            changed = ?changed,
            "board diff"
        );

        match (changed.as_slice(), placed) {
            ([], _) if can_move => Err(GameError::InvalidMove(format!(
                "{player} declined although a legal move existed"
            ))),
            ([], _) => {
                round.pass(player, drew)?;
                Ok(TurnOutcome::Passed { player, drew })
            }
            ([owner], Some((mv, tile))) => {
                let open = round.train(*owner).map_or(false, |train| train.is_open_to(player));
                if !open {
                    return Err(GameError::InvalidMove(format!(
                        "{player} played on {owner}'s closed train"
                    )));
                }
                if *owner == TrainOwner::Player(player) {
                    round.close_own_train(player)?;
                }
                Ok(TurnOutcome::Played {
                    player,
                    tile,
                    train: *owner,
                    end: mv.end,
                    drew,
                })
            }
            (owners, _) => Err(GameError::InvalidMove(format!(
                "{player}'s turn changed {} trains",
                owners.len()
            ))),
        }
    }

    /// Restore the round as it was at the start of the last aborted turn.
    ///
    /// Returns the seat and turn number that will be replayed.
    pub fn rollback(&mut self) -> Result<(PlayerId, u32), GameError> {
        let checkpoint = self.checkpoint.take().ok_or(GameError::NoCheckpoint)?;
        self.rng = GameRng::from_state(&checkpoint.rng);
        self.round = Some(checkpoint.round);
        info!(player = %checkpoint.player, turn = checkpoint.turn, "turn rolled back");
        Ok((checkpoint.player, checkpoint.turn))
    }
}
