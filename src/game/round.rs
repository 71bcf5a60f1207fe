//! State of a single round: draw pile, hands, trains and turn order.
//!
//! A `RoundState` exclusively owns every tile of the round. Each tile is in
//! exactly one place at a time: the draw pile, one hand, or placed on a
//! train (the engine sits outside all three). Cloning is cheap enough to
//! checkpoint before every turn.

use serde::{Deserialize, Serialize};

use crate::core::{DominoParameters, GameError, GameRng, PlayerId, PlayerMap};
use crate::players::{HandView, Move};
use crate::tiles::{Tile, TileSet};
use crate::trains::{Train, TrainOwner};

use super::snapshot::StateSnapshot;

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEnd {
    /// The seat emptied its hand.
    Domino(PlayerId),
    /// The draw pile is empty and every seat passed in succession.
    Blocked,
}

/// One round's board and hands.
#[derive(Clone, Debug)]
pub struct RoundState {
    engine: Tile,
    boneyard: TileSet,
    hands: PlayerMap<TileSet>,
    trains: PlayerMap<Train>,
    communal: Train,

    /// Seat that acts next.
    cursor: PlayerId,

    /// Turns each seat has started this round.
    turns_taken: PlayerMap<u32>,

    /// Passes in a row that drew nothing, played nothing and opened no
    /// train. A full lap of these means no seat can move.
    idle_passes: usize,

    /// Seat that emptied its hand, once someone has.
    finished_by: Option<PlayerId>,
}

impl RoundState {
    /// Generate a fresh set, set the engine aside, and deal.
    ///
    /// Hands are dealt one tile per seat at a time by random draw, and the
    /// first seat to act is chosen uniformly at random.
    pub fn deal(
        parameters: DominoParameters,
        player_count: usize,
        rng: &mut GameRng,
    ) -> Result<Self, GameError> {
        let engine = Tile::new(parameters.max_face, parameters.max_face);
        let mut boneyard = TileSet::complete(parameters.max_face);
        boneyard.draw(&engine)?;

        let mut hands: PlayerMap<TileSet> = PlayerMap::with_default(player_count);
        for _ in 0..parameters.hand_size {
            for (_, hand) in hands.iter_mut() {
                hand.add(boneyard.draw_random(rng)?);
            }
        }

        let seats: Vec<PlayerId> = PlayerId::all(player_count).collect();
        let start = *rng
            .choose(&seats)
            .ok_or_else(|| GameError::Configuration("a round needs at least one seat".to_string()))?;

        Ok(Self::assemble(engine, boneyard, hands, start))
    }

    /// Build a round from explicit hands and draw pile.
    ///
    /// Fails if a tile appears in more than one place or the engine is
    /// among the dealt tiles.
    pub fn from_parts(
        engine: Tile,
        boneyard: TileSet,
        hands: Vec<TileSet>,
        start: PlayerId,
    ) -> Result<Self, GameError> {
        if hands.len() > usize::from(u8::MAX) {
            return Err(GameError::Configuration(format!(
                "at most {} hands are supported (got {})",
                u8::MAX,
                hands.len()
            )));
        }
        if hands.is_empty() || start.index() >= hands.len() {
            return Err(GameError::Configuration(format!(
                "start seat {start} is not among {} hands",
                hands.len()
            )));
        }

        let mut seen = TileSet::new();
        seen.add(engine);
        for tile in boneyard.iter().chain(hands.iter().flat_map(|hand| hand.iter())) {
            if !seen.add(*tile) {
                return Err(GameError::Configuration(format!(
                    "{tile} is dealt more than once"
                )));
            }
        }

        Ok(Self::assemble(engine, boneyard, PlayerMap::from_vec(hands), start))
    }

    fn assemble(engine: Tile, boneyard: TileSet, hands: PlayerMap<TileSet>, start: PlayerId) -> Self {
        let player_count = hands.player_count();
        Self {
            engine,
            boneyard,
            trains: PlayerMap::new(player_count, |p| Train::new(p, engine)),
            communal: Train::communal(engine),
            hands,
            cursor: start,
            turns_taken: PlayerMap::with_value(player_count, 0),
            idle_passes: 0,
            finished_by: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn engine(&self) -> Tile {
        self.engine
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.player_count()
    }

    #[must_use]
    pub fn boneyard_len(&self) -> usize {
        self.boneyard.len()
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &TileSet {
        &self.hands[player]
    }

    /// Hand sizes in seat order.
    #[must_use]
    pub fn hand_sizes(&self) -> PlayerMap<usize> {
        PlayerMap::new(self.player_count(), |p| self.hands[p].len())
    }

    /// The seat that acts next.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.cursor
    }

    /// Look up a train by owner.
    #[must_use]
    pub fn train(&self, owner: TrainOwner) -> Option<&Train> {
        match owner {
            TrainOwner::Player(player) if self.trains.contains(player) => Some(&self.trains[player]),
            TrainOwner::Player(_) => None,
            TrainOwner::Communal => Some(&self.communal),
        }
    }

    fn train_mut(&mut self, owner: TrainOwner) -> Option<&mut Train> {
        match owner {
            TrainOwner::Player(player) if self.trains.contains(player) => Some(&mut self.trains[player]),
            TrainOwner::Player(_) => None,
            TrainOwner::Communal => Some(&mut self.communal),
        }
    }

    /// Every train: seats in order, then the communal train.
    pub fn trains(&self) -> impl Iterator<Item = &Train> {
        self.trains.values().chain(std::iter::once(&self.communal))
    }

    /// Trains `player` may extend: their own, every other marked train,
    /// and the communal train last.
    #[must_use]
    pub fn legal_trains(&self, player: PlayerId) -> Vec<&Train> {
        Self::open_trains(&self.trains, &self.communal, player)
    }

    fn open_trains<'a>(trains: &'a PlayerMap<Train>, communal: &'a Train, player: PlayerId) -> Vec<&'a Train> {
        trains
            .values()
            .filter(|train| train.is_open_to(player))
            .chain(std::iter::once(communal))
            .collect()
    }

    /// Whether some tile in `player`'s hand fits some legal train.
    #[must_use]
    pub fn has_legal_move(&self, player: PlayerId) -> bool {
        let hand = &self.hands[player];
        self.legal_trains(player)
            .iter()
            .any(|train| train.accepts_any(hand))
    }

    /// Canonical snapshot of every train's ends.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(self.trains())
    }

    /// How the round ended, if it has.
    #[must_use]
    pub fn end(&self) -> Option<RoundEnd> {
        if let Some(player) = self.finished_by {
            return Some(RoundEnd::Domino(player));
        }
        if self.boneyard.is_empty() && self.idle_passes >= self.player_count() {
            return Some(RoundEnd::Blocked);
        }
        None
    }

    // === Turn mechanics ===

    /// Hand the turn to the next seat, returning it with its turn number
    /// (0 for that seat's first turn of the round).
    pub fn advance_turn(&mut self) -> (PlayerId, u32) {
        let player = self.cursor;
        let turn = self.turns_taken[player];
        self.turns_taken[player] += 1;
        self.cursor = PlayerId::new(((player.index() + 1) % self.player_count()) as u8);
        (player, turn)
    }

    /// Draw one tile for `player` unless the pile is empty.
    pub fn draw_for(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<Option<Tile>, GameError> {
        if self.boneyard.is_empty() {
            return Ok(None);
        }
        let tile = self.boneyard.draw_random(rng)?;
        self.hands[player].add(tile);
        self.idle_passes = 0;
        Ok(Some(tile))
    }

    /// Ask `decide` for a move, passing the hand view and legal trains.
    pub fn decide<R>(
        &mut self,
        player: PlayerId,
        decide: impl FnOnce(&mut HandView<'_>, &[&Train]) -> R,
    ) -> R {
        let legal = Self::open_trains(&self.trains, &self.communal, player);
        let mut hand = HandView::new(&mut self.hands[player]);
        decide(&mut hand, &legal)
    }

    /// Take the move's tile from `player`'s hand and attach it.
    ///
    /// Legality with respect to ownership and marking is not checked here;
    /// the controller infers it from the snapshot diff.
    pub fn apply_move(&mut self, player: PlayerId, mv: &Move) -> Result<Tile, GameError> {
        let tile = self.hands[player].draw(&mv.tile)?;
        let train = self
            .train_mut(mv.train)
            .ok_or_else(|| GameError::InvalidMove(format!("there is no train for {}", mv.train)))?;
        let placed = train.add_to_end(&mv.end, tile)?;

        self.idle_passes = 0;
        if self.hands[player].is_empty() {
            self.finished_by = Some(player);
        }
        Ok(placed)
    }

    /// Record a pass: `player`'s train is opened to everyone.
    ///
    /// Newly opening a train may give seats that already passed a move, so
    /// only a pass on an already marked train counts toward blockage.
    pub fn pass(&mut self, player: PlayerId, drew: bool) -> Result<(), GameError> {
        let newly_marked = !self.trains[player].is_marked();
        self.trains[player].set_marked()?;
        if newly_marked {
            self.idle_passes = 0;
        } else if !drew {
            self.idle_passes += 1;
        }
        Ok(())
    }

    /// Close `player`'s own train after they extended it.
    pub fn close_own_train(&mut self, player: PlayerId) -> Result<(), GameError> {
        self.trains[player].set_unmarked()
    }

    /// Empty every hand, returning each seat's point total.
    pub fn drain_hands(&mut self) -> PlayerMap<u32> {
        let player_count = self.player_count();
        let mut totals = PlayerMap::with_value(player_count, 0);
        for (player, hand) in self.hands.iter_mut() {
            totals[player] = hand.drain_value();
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_round() -> RoundState {
        RoundState::from_parts(
            Tile::new(6, 6),
            TileSet::from(vec![Tile::new(0, 1), Tile::new(6, 0)]),
            vec![
                TileSet::from(vec![Tile::new(6, 2), Tile::new(2, 2)]),
                TileSet::from(vec![Tile::new(3, 4)]),
            ],
            PlayerId::new(0),
        )
        .unwrap()
    }

    #[test]
    fn test_deal() {
        let params = DominoParameters::for_player_count(4).unwrap();
        let mut rng = GameRng::new(3);

        let round = RoundState::deal(params, 4, &mut rng).unwrap();

        assert_eq!(round.engine(), Tile::new(12, 12));
        assert_eq!(round.hand_sizes().values().copied().collect::<Vec<_>>(), vec![12; 4]);
        assert_eq!(round.boneyard_len(), params.set_size() - 1 - 4 * 12);
        assert_eq!(round.trains().count(), 5);
        assert!(round.trains().all(Train::is_empty));
        assert_eq!(round.end(), None);
    }

    #[test]
    fn test_deal_keeps_tiles_exclusive() {
        let params = DominoParameters::for_player_count(14).unwrap();
        let mut rng = GameRng::new(9);
        let round = RoundState::deal(params, 14, &mut rng).unwrap();

        let mut seen = TileSet::from(vec![round.engine()]);
        for player in PlayerId::all(14) {
            for tile in round.hand(player).iter() {
                assert!(seen.add(*tile));
            }
        }
        assert_eq!(seen.len() + round.boneyard_len(), params.set_size());
    }

    #[test]
    fn test_from_parts_rejects_duplicates() {
        let err = RoundState::from_parts(
            Tile::new(6, 6),
            TileSet::from(vec![Tile::new(1, 2)]),
            vec![TileSet::from(vec![Tile::new(2, 1)]), TileSet::new()],
            PlayerId::new(0),
        )
        .unwrap_err();
        assert!(matches!(err, GameError::Configuration(_)));

        let err = RoundState::from_parts(
            Tile::new(6, 6),
            TileSet::new(),
            vec![TileSet::from(vec![Tile::new(6, 6)]), TileSet::new()],
            PlayerId::new(0),
        )
        .unwrap_err();
        assert!(matches!(err, GameError::Configuration(_)));
    }

    #[test]
    fn test_turn_order_wraps() {
        let mut round = small_round();

        assert_eq!(round.advance_turn(), (PlayerId::new(0), 0));
        assert_eq!(round.advance_turn(), (PlayerId::new(1), 0));
        assert_eq!(round.advance_turn(), (PlayerId::new(0), 1));
        assert_eq!(round.current_player(), PlayerId::new(1));
    }

    #[test]
    fn test_legal_trains() {
        let mut round = small_round();
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        let owners: Vec<_> = round.legal_trains(p0).iter().map(|t| t.owner()).collect();
        assert_eq!(owners, vec![TrainOwner::Player(p0), TrainOwner::Communal]);

        round.pass(p1, false).unwrap();
        let owners: Vec<_> = round.legal_trains(p0).iter().map(|t| t.owner()).collect();
        assert_eq!(
            owners,
            vec![TrainOwner::Player(p0), TrainOwner::Player(p1), TrainOwner::Communal]
        );
    }

    #[test]
    fn test_has_legal_move() {
        let round = small_round();

        assert!(round.has_legal_move(PlayerId::new(0)));
        assert!(!round.has_legal_move(PlayerId::new(1)));
    }

    #[test]
    fn test_apply_move_and_finish() {
        let mut round = small_round();
        let p1 = PlayerId::new(1);
        let engine = round.engine();

        let mv = Move::new(Tile::new(3, 4), TrainOwner::Communal, engine);
        assert!(matches!(round.apply_move(p1, &mv), Err(GameError::InvalidMove(_))));

        let mut round = small_round();
        round
            .apply_move(PlayerId::new(0), &Move::new(Tile::new(2, 6), TrainOwner::Player(PlayerId::new(0)), engine))
            .unwrap();
        round
            .apply_move(PlayerId::new(0), &Move::new(Tile::new(2, 2), TrainOwner::Player(PlayerId::new(0)), Tile::new(6, 2)))
            .unwrap();

        assert!(round.hand(PlayerId::new(0)).is_empty());
        assert_eq!(round.end(), Some(RoundEnd::Domino(PlayerId::new(0))));
    }

    #[test]
    fn test_apply_move_missing_tile() {
        let mut round = small_round();
        let mv = Move::new(Tile::new(6, 5), TrainOwner::Communal, round.engine());
        assert_eq!(
            round.apply_move(PlayerId::new(0), &mv),
            Err(GameError::NotFound(Tile::new(6, 5)))
        );
    }

    #[test]
    fn test_draw_and_block() {
        let mut round = small_round();
        let mut rng = GameRng::new(1);
        let p1 = PlayerId::new(1);

        assert!(round.draw_for(p1, &mut rng).unwrap().is_some());
        assert!(round.draw_for(p1, &mut rng).unwrap().is_some());
        assert_eq!(round.draw_for(p1, &mut rng).unwrap(), None);
        assert_eq!(round.hand(p1).len(), 3);

        // The first lap only opens trains.
        round.pass(PlayerId::new(0), false).unwrap();
        round.pass(p1, false).unwrap();
        assert_eq!(round.end(), None);

        round.pass(PlayerId::new(0), false).unwrap();
        assert_eq!(round.end(), None);
        round.pass(p1, false).unwrap();
        assert_eq!(round.end(), Some(RoundEnd::Blocked));
    }

    #[test]
    fn test_opening_a_train_resets_blockage() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let mut round = RoundState::from_parts(
            Tile::new(6, 6),
            TileSet::new(),
            vec![
                TileSet::from(vec![Tile::new(3, 5), Tile::new(0, 0)]),
                TileSet::from(vec![Tile::new(6, 3), Tile::new(1, 1)]),
            ],
            p1,
        )
        .unwrap();

        round
            .apply_move(p1, &Move::new(Tile::new(6, 3), TrainOwner::Player(p1), Tile::new(6, 6)))
            .unwrap();
        round.pass(p0, false).unwrap();
        round.pass(p1, false).unwrap();

        assert_eq!(round.end(), None);
        assert!(round.has_legal_move(p0));
    }

    #[test]
    fn test_from_parts_rejects_too_many_hands() {
        let hands = vec![TileSet::new(); 256];
        let err = RoundState::from_parts(Tile::new(6, 6), TileSet::new(), hands, PlayerId::new(0)).unwrap_err();
        assert!(matches!(err, GameError::Configuration(_)));
    }

    #[test]
    fn test_drain_hands() {
        let mut round = RoundState::from_parts(
            Tile::new(9, 9),
            TileSet::new(),
            vec![
                TileSet::from(vec![Tile::new(0, 0), Tile::new(1, 2)]),
                TileSet::from(vec![Tile::new(4, 5)]),
            ],
            PlayerId::new(1),
        )
        .unwrap();

        let totals = round.drain_hands();

        assert_eq!(totals[PlayerId::new(0)], 53);
        assert_eq!(totals[PlayerId::new(1)], 9);
        assert!(round.hand(PlayerId::new(0)).is_empty());
    }
}
