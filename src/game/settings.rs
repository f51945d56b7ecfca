use chess::Board;
use std::time::Duration;

/// Bonus seconds offered to the interface, in display order.
pub const BONUS_CHOICES: [u64; 4] = [1, 5, 10, 0];

pub const DEFAULT_BONUS_SECS: u64 = 10;

/// How often the countdown thread samples the wall clock.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Game length presets, per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameType {
    #[default]
    Flash,
    Bullet,
    Blitz,
    Rapid,
    Long,
}

impl GameType {
    pub const ALL: [GameType; 5] = [
        GameType::Flash,
        GameType::Bullet,
        GameType::Blitz,
        GameType::Rapid,
        GameType::Long,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GameType::Flash => "Flash (10 sec)",
            GameType::Bullet => "Bullet (1 min)",
            GameType::Blitz => "Blitz (5 min)",
            GameType::Rapid => "Rapid (15 min)",
            GameType::Long => "Long (120 min)",
        }
    }

    pub fn seconds(self) -> u64 {
        match self {
            GameType::Flash => 10,
            GameType::Bullet => 60,
            GameType::Blitz => 5 * 60,
            GameType::Rapid => 15 * 60,
            GameType::Long => 120 * 60,
        }
    }

    /// Accepts the display label or the short name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|game_type| {
            game_type.label().eq_ignore_ascii_case(name)
                || format!("{:?}", game_type).eq_ignore_ascii_case(name)
        })
    }
}

/// Starting layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartBoard {
    #[default]
    Normal,
}

impl StartBoard {
    pub const ALL: [StartBoard; 1] = [StartBoard::Normal];

    pub fn label(self) -> &'static str {
        match self {
            StartBoard::Normal => "Normal",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|board| board.label().eq_ignore_ascii_case(name.trim()))
    }

    pub fn board(self) -> Board {
        match self {
            StartBoard::Normal => Board::default(),
        }
    }
}

/// Time control and starting position of one game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub time_per_side: Duration,
    pub bonus: Duration,
    pub start_board: Board,
    /// Sampling period of the countdown thread. `None` runs no thread; the
    /// owner then drives the clock with [`crate::game::Clock::tick`].
    pub tick_interval: Option<Duration>,
}

impl GameSettings {
    pub fn new(game_type: GameType, bonus_secs: u64, start_board: StartBoard) -> Self {
        Self {
            time_per_side: Duration::from_secs(game_type.seconds()),
            bonus: Duration::from_secs(bonus_secs),
            start_board: start_board.board(),
            tick_interval: Some(DEFAULT_TICK_INTERVAL),
        }
    }

    pub fn with_time(mut self, time_per_side: Duration, bonus: Duration) -> Self {
        self.time_per_side = time_per_side;
        self.bonus = bonus;
        self
    }

    pub fn with_board(mut self, board: Board) -> Self {
        self.start_board = board;
        self
    }

    pub fn manual_clock(mut self) -> Self {
        self.tick_interval = None;
        self
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(GameType::default(), DEFAULT_BONUS_SECS, StartBoard::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_type_lookup() {
        assert_eq!(GameType::parse("Blitz (5 min)"), Some(GameType::Blitz));
        assert_eq!(GameType::parse("rapid"), Some(GameType::Rapid));
        assert_eq!(GameType::parse(" LONG "), Some(GameType::Long));
        assert_eq!(GameType::parse("Marathon"), None);
    }

    #[test]
    fn preset_lengths() {
        let secs: Vec<u64> = GameType::ALL.iter().map(|t| t.seconds()).collect();
        assert_eq!(secs, vec![10, 60, 300, 900, 7200]);
    }

    #[test]
    fn defaults() {
        let settings = GameSettings::default();
        assert_eq!(settings.time_per_side, Duration::from_secs(10));
        assert_eq!(settings.bonus, Duration::from_secs(10));
        assert_eq!(settings.start_board, Board::default());
        assert_eq!(settings.tick_interval, Some(DEFAULT_TICK_INTERVAL));
        assert_eq!(settings.manual_clock().tick_interval, None);
    }

    #[test]
    fn start_board_lookup() {
        assert_eq!(StartBoard::parse("normal"), Some(StartBoard::Normal));
        assert_eq!(StartBoard::parse("Chess960"), None);
    }
}
