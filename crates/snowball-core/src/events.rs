//! Gameplay events emitted during a tick.
//!
//! Events are the simulation's outbound notification channel: the
//! presentation layer drains them after each step to trigger sounds, flashes
//! and score pop-ups. They never feed back into the simulation.
//!
//! # Ordering
//!
//! Events are appended in the order the tick produced them, so the log for a
//! tick reads as input, then physics, then collisions, then wave progress.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::arena::SlotId;
use crate::entity::{BonusKind, EnemyClass, MissileKind, PlayerId};

/// Who gets credit for a blast wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribution {
    /// A player shot the bomb or fired a megabomb.
    Player(PlayerId),
    /// The bomb hit the ground on its own; nobody scores.
    Ground,
}

impl Attribution {
    /// The credited player, if any.
    #[must_use]
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            Self::Player(player) => Some(player),
            Self::Ground => None,
        }
    }
}

/// How an enemy was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KillCause {
    /// A missile hit it.
    DirectHit,
    /// Area damage from a blast wave.
    Blast,
}

/// Why a bomb detonated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetonationCause {
    /// Reached the ground line.
    Ground,
    /// Hit by a missile.
    Shot,
    /// Within chain radius of another detonation.
    Chain,
    /// Set off by a megabomb.
    Megabomb,
}

/// Reward granted by clicking the power-up truck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupReward {
    /// Three missiles per trigger for a while.
    TripleShot,
    /// Faster missiles for a while.
    FastShot,
    /// One megabomb charge.
    Megabomb,
    /// An ammo crate.
    Ammo,
}

impl PowerupReward {
    /// All rewards, in draw order.
    pub const ALL: [Self; 4] = [Self::TripleShot, Self::FastShot, Self::Megabomb, Self::Ammo];
}

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A trigger pull launched one or more missiles.
    MissileFired {
        /// Shooter.
        player: PlayerId,
        /// Missiles launched by this trigger.
        count: u32,
        /// Flavor.
        kind: MissileKind,
    },
    /// An enemy was destroyed.
    EnemyDestroyed {
        /// Size class.
        class: EnemyClass,
        /// Last position.
        position: IVec2,
        /// How it died.
        cause: KillCause,
        /// Who gets credit.
        attribution: Attribution,
        /// Points awarded.
        points: u32,
    },
    /// An enemy crossed the far edge.
    EnemyEscaped {
        /// Size class.
        class: EnemyClass,
    },
    /// An enemy released a bomb.
    BombDropped {
        /// Bomb slot.
        slot: SlotId,
        /// Release position.
        position: IVec2,
    },
    /// A bomb exploded.
    BombDetonated {
        /// Detonation point.
        position: IVec2,
        /// Why it went off.
        cause: DetonationCause,
        /// Who gets credit for the resulting blast.
        attribution: Attribution,
    },
    /// A bomb landed on an igloo.
    IglooDestroyed {
        /// Igloo index along the defense line.
        index: usize,
    },
    /// A queued milestone restoration rebuilt an igloo.
    IglooRestored {
        /// Igloo index along the defense line.
        index: usize,
    },
    /// A wave was spawned.
    WaveStarted {
        /// Wave number.
        wave: u32,
        /// Small enemies spawned.
        enemies: u32,
        /// Large enemies spawned.
        large_enemies: u32,
    },
    /// Every enemy of a wave is gone.
    WaveCompleted {
        /// Wave number that was completed.
        wave: u32,
        /// Ammo granted to each participating player.
        ammo_reward: u32,
    },
    /// A bonus entity was scheduled to appear.
    BonusScheduled {
        /// Which entity.
        kind: BonusKind,
        /// Ticks until it appears.
        delay: u32,
    },
    /// A bonus entity materialized at its entry edge.
    BonusAppeared {
        /// Which entity.
        kind: BonusKind,
    },
    /// A bonus entity left the screen.
    BonusDeparted {
        /// Which entity.
        kind: BonusKind,
    },
    /// A player clicked the polar bear.
    BearClicked {
        /// Clicker.
        player: PlayerId,
        /// 1-based click ordinal for this appearance.
        click: u32,
        /// Points awarded.
        points: u32,
    },
    /// A player collected the truck's reward.
    PowerupCollected {
        /// Collector.
        player: PlayerId,
        /// What was granted.
        reward: PowerupReward,
    },
    /// A megabomb detonated every falling bomb.
    MegabombDetonated {
        /// Who used it.
        player: PlayerId,
        /// Bombs it set off directly.
        bombs: u32,
    },
    /// The leading score crossed a milestone; one restoration was queued.
    MilestoneReached {
        /// Threshold that was crossed.
        threshold: u32,
    },
    /// All igloos are gone.
    GameOver {
        /// Wave during which the game ended.
        wave: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_attribution_has_no_player() {
        assert_eq!(Attribution::Ground.player(), None);
        assert_eq!(Attribution::Player(PlayerId::Two).player(), Some(PlayerId::Two));
    }

    #[test]
    fn test_event_serializes_with_variant_name() {
        let event = GameEvent::WaveCompleted {
            wave: 3,
            ammo_reward: 15,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"WaveCompleted":{"wave":3,"ammo_reward":15}}"#);
    }
}
