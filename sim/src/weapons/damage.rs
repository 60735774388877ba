//! Damage rolls and the score/wanted consequences of a kill.

use crate::npc::{NpcRole, XorShift64};

/// Player projectile damage is uniform in [25, 40).
pub const HIT_DAMAGE_MIN: f32 = 25.0;
pub const HIT_DAMAGE_SPAN: f32 = 15.0;
/// Flat damage of an NPC projectile against the player.
pub const PLAYER_HIT_DAMAGE: f32 = 8.0;

pub const SCORE_POLICE_KILL: u32 = 50;
pub const SCORE_CIVILIAN_KILL: u32 = 10;

pub const WANTED_PER_SHOT: f32 = 0.2;
pub const WANTED_POLICE_KILL: f32 = 1.0;
pub const WANTED_CIVILIAN_KILL: f32 = 0.3;

/// Decay countdown armed by a shot / by a kill.
pub const SHOT_DECAY_DELAY: f32 = 10.0;
pub const KILL_DECAY_DELAY: f32 = 15.0;

pub fn roll_hit_damage(rng: &mut XorShift64) -> f32 {
    HIT_DAMAGE_MIN + rng.next_f32() * HIT_DAMAGE_SPAN
}

pub fn kill_score(role: NpcRole) -> u32 {
    match role {
        NpcRole::Police => SCORE_POLICE_KILL,
        NpcRole::Civilian => SCORE_CIVILIAN_KILL,
    }
}

pub fn kill_wanted_delta(role: NpcRole) -> f32 {
    match role {
        NpcRole::Police => WANTED_POLICE_KILL,
        NpcRole::Civilian => WANTED_CIVILIAN_KILL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_roll_stays_in_range() {
        let mut rng = XorShift64::new(5);
        for _ in 0..1000 {
            let damage = roll_hit_damage(&mut rng);
            assert!((HIT_DAMAGE_MIN..HIT_DAMAGE_MIN + HIT_DAMAGE_SPAN).contains(&damage));
        }
    }

    #[test]
    fn police_are_worth_more_trouble() {
        assert!(kill_score(NpcRole::Police) > kill_score(NpcRole::Civilian));
        assert!(kill_wanted_delta(NpcRole::Police) > kill_wanted_delta(NpcRole::Civilian));
    }
}
