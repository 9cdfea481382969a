//! Gameplay constants. Every field has a default; a JSON object stored in the
//! browser can override any subset of them (see `state::storage`).

use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum UpgradeStat {
    Range,
    Damage,
    FireRate,
}

impl UpgradeStat {
    pub const ALL: [UpgradeStat; 3] = [UpgradeStat::Range, UpgradeStat::Damage, UpgradeStat::FireRate];

    pub fn label(self) -> &'static str {
        match self {
            UpgradeStat::Range => "Range",
            UpgradeStat::Damage => "Damage",
            UpgradeStat::FireRate => "Fire Rate",
        }
    }
}

/// Magnitude and price of a single upgrade purchase. The sign is implied by the
/// stat: range and damage grow, fire rate (a cooldown period) shrinks.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct UpgradeSpec {
    pub step: u32,
    pub cost: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TowerSpec {
    pub cost: i32,
    pub range: f64,
    pub damage: i32,
    /// Frames between shots.
    pub fire_rate: u32,
    /// Click radius used for selection, also the drawn body radius.
    pub radius: f64,
}

impl Default for TowerSpec {
    fn default() -> Self {
        Self {
            cost: 50,
            range: 100.0,
            damage: 5,
            fire_rate: 30,
            radius: 15.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemySpec {
    /// Pixels per frame.
    pub speed: f64,
    pub health: i32,
    pub radius: f64,
}

impl Default for EnemySpec {
    fn default() -> Self {
        Self {
            speed: 2.0,
            health: 10,
            radius: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileSpec {
    /// Pixels per frame.
    pub speed: f64,
    /// Applied on every hit regardless of the firing tower's damage stat.
    pub damage: i32,
    pub kill_reward: i32,
    pub radius: f64,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            speed: 5.0,
            damage: 5,
            kill_reward: 10,
            radius: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub path: Vec<Waypoint>,
    pub starting_health: i32,
    pub starting_money: i32,
    pub tower: TowerSpec,
    pub min_fire_rate: u32,
    pub range_upgrade: UpgradeSpec,
    pub damage_upgrade: UpgradeSpec,
    pub fire_rate_upgrade: UpgradeSpec,
    pub enemy: EnemySpec,
    pub projectile: ProjectileSpec,
    pub spawn_interval_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000,
            canvas_height: 600,
            path: vec![
                Waypoint::new(0.0, 250.0),
                Waypoint::new(200.0, 250.0),
                Waypoint::new(200.0, 400.0),
                Waypoint::new(500.0, 400.0),
                Waypoint::new(500.0, 100.0),
                Waypoint::new(800.0, 100.0),
                Waypoint::new(800.0, 500.0),
                Waypoint::new(1000.0, 500.0),
            ],
            starting_health: 10,
            starting_money: 100,
            tower: TowerSpec::default(),
            min_fire_rate: 1,
            range_upgrade: UpgradeSpec { step: 10, cost: 20 },
            damage_upgrade: UpgradeSpec { step: 10, cost: 30 },
            fire_rate_upgrade: UpgradeSpec { step: 5, cost: 40 },
            enemy: EnemySpec::default(),
            projectile: ProjectileSpec::default(),
            spawn_interval_ms: 2000,
        }
    }
}

impl GameConfig {
    pub fn upgrade(&self, stat: UpgradeStat) -> UpgradeSpec {
        match stat {
            UpgradeStat::Range => self.range_upgrade,
            UpgradeStat::Damage => self.damage_upgrade,
            UpgradeStat::FireRate => self.fire_rate_upgrade,
        }
    }

    /// Parse a (possibly partial) JSON override. Fields left out keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        use serde::de::Error as _;
        let cfg: GameConfig = serde_json::from_str(raw)?;
        if cfg.path.len() < 2 {
            return Err(serde_json::Error::custom("path needs at least two waypoints"));
        }
        if cfg.enemy.speed <= 0.0 || cfg.projectile.speed <= 0.0 {
            return Err(serde_json::Error::custom("speeds must be positive"));
        }
        // Fire rate is a cooldown in frames and must never reach zero.
        if cfg.min_fire_rate == 0 || cfg.tower.fire_rate < cfg.min_fire_rate {
            return Err(serde_json::Error::custom(
                "min_fire_rate must be at least 1 and no greater than tower.fire_rate",
            ));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_rules() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.starting_health, 10);
        assert_eq!(cfg.starting_money, 100);
        assert_eq!(cfg.tower.cost, 50);
        assert_eq!(cfg.upgrade(UpgradeStat::Range).cost, 20);
        assert_eq!(cfg.upgrade(UpgradeStat::Damage).cost, 30);
        assert_eq!(cfg.upgrade(UpgradeStat::FireRate).cost, 40);
        assert_eq!(cfg.path.len(), 8);
        assert_eq!(cfg.path.first(), Some(&Waypoint::new(0.0, 250.0)));
        assert_eq!(cfg.path.last(), Some(&Waypoint::new(1000.0, 500.0)));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = GameConfig::from_json(r#"{"starting_money": 500, "spawn_interval_ms": 750}"#)
            .expect("valid override");
        assert_eq!(cfg.starting_money, 500);
        assert_eq!(cfg.spawn_interval_ms, 750);
        assert_eq!(cfg.starting_health, 10);
        assert_eq!(cfg.tower, TowerSpec::default());
    }

    #[test]
    fn rejects_degenerate_path() {
        let err = GameConfig::from_json(r#"{"path": [{"x": 0.0, "y": 0.0}]}"#);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_zero_fire_rate_floor() {
        let err = GameConfig::from_json(r#"{"min_fire_rate": 0, "tower": {"fire_rate": 5}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_tower_fire_rate_below_floor() {
        let err = GameConfig::from_json(r#"{"min_fire_rate": 10, "tower": {"fire_rate": 5}}"#);
        assert!(err.is_err());
        let ok = GameConfig::from_json(r#"{"min_fire_rate": 5, "tower": {"fire_rate": 5}}"#)
            .expect("floor equal to base rate is allowed");
        assert_eq!(ok.min_fire_rate, 5);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(GameConfig::from_json("{not json").is_err());
    }
}
