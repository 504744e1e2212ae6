use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::OpponentKind;
use crate::ai::search::{MAX_SEARCH_DEPTH, depth_for_concurrency};
use crate::error::{GameError, GameResult};
use crate::rules::{MoveDirections, RuleSet};

const DEFAULT_AI_DELAY_MS: u32 = 500;
const DEFAULT_SEARCH_TIMEOUT_MS: u32 = 5_000;

/// Settings accepted from the host page. Every field is optional on the JS
/// side; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub opponent: OpponentKind,
    pub directions: MoveDirections,
    /// Fixed search depth. Derived from `hardware_concurrency` when absent.
    pub depth: Option<u8>,
    /// `navigator.hardwareConcurrency` as reported by the browser.
    pub hardware_concurrency: Option<u32>,
    /// Pause before the computer replies.
    pub ai_delay_ms: u32,
    pub search_timeout_ms: u32,
    /// Seed for the random opponent; entropy when absent.
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            opponent: OpponentKind::default(),
            directions: MoveDirections::default(),
            depth: None,
            hardware_concurrency: None,
            ai_delay_ms: DEFAULT_AI_DELAY_MS,
            search_timeout_ms: DEFAULT_SEARCH_TIMEOUT_MS,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> GameResult<()> {
        if let Some(depth) = self.depth
            && !(1..=MAX_SEARCH_DEPTH).contains(&depth)
        {
            return Err(GameError::InvalidConfig {
                message: format!("depth must be in 1..={MAX_SEARCH_DEPTH}, got {depth}"),
            });
        }
        if self.search_timeout_ms == 0 {
            return Err(GameError::InvalidConfig {
                message: "search_timeout_ms must be positive".to_string(),
            });
        }
        self.log_level()?;
        Ok(())
    }

    pub fn rules(&self) -> RuleSet {
        RuleSet::new(self.directions)
    }

    pub fn search_depth(&self) -> u8 {
        self.depth
            .unwrap_or_else(|| depth_for_concurrency(self.hardware_concurrency.unwrap_or(1)))
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms.into())
    }

    pub fn log_level(&self) -> GameResult<log::Level> {
        log::Level::from_str(&self.log_level).map_err(|_| GameError::InvalidConfig {
            message: format!("unknown log level {:?}", self.log_level),
        })
    }
}
