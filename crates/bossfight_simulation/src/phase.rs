//! Battle phases the host can put the encounter into.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Start,
    Battle1,
    Battle2,
    Battle3,
    Battle4,
    Store,
}

impl BattlePhase {
    /// Phases whose boss runs scripted attack patterns.
    pub fn has_patterns(&self) -> bool {
        matches!(
            self,
            BattlePhase::Battle1 | BattlePhase::Battle2 | BattlePhase::Battle3 | BattlePhase::Battle4
        )
    }
}
