//! Core simulation for Canvas Tower Defence.
//! `World` owns everything that changes between frames and is driven through the
//! reducer at the bottom of this module; nothing here touches the DOM.

use std::fmt;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use tracing::{debug, info};
use yew::Reducible;

use crate::config::{EnemySpec, GameConfig, TowerSpec, UpgradeSpec, UpgradeStat, Waypoint};
use crate::util::{Approach, approach, distance};

new_key_type! {
    /// Generation-tagged handle into the enemy arena. Never resolves again once
    /// the enemy it named has been removed.
    pub struct EnemyId;
}

/// Towers are never removed, so a plain index stays valid for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
    /// Pixels per frame.
    pub speed: f64,
    pub health: i32,
    /// Last waypoint reached; the enemy walks toward `path_index + 1`.
    pub path_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStep {
    Walking,
    ReachedEnd,
}

impl Enemy {
    pub fn spawn(path: &[Waypoint], spec: &EnemySpec) -> Self {
        let start = path.first().copied().unwrap_or(Waypoint::new(0.0, 0.0));
        Self {
            x: start.x,
            y: start.y,
            speed: spec.speed,
            health: spec.health,
            path_index: 0,
        }
    }

    pub fn advance(&mut self, path: &[Waypoint]) -> EnemyStep {
        let Some(target) = path.get(self.path_index + 1) else {
            return EnemyStep::ReachedEnd;
        };
        match approach(self.x, self.y, target.x, target.y, self.speed) {
            Approach::Arrived => {
                self.x = target.x;
                self.y = target.y;
                self.path_index += 1;
                if self.path_index + 1 >= path.len() {
                    EnemyStep::ReachedEnd
                } else {
                    EnemyStep::Walking
                }
            }
            Approach::Moved { x, y } => {
                self.x = x;
                self.y = y;
                EnemyStep::Walking
            }
        }
    }
}

/// Enemy arena. Storage is a slot map so projectiles can hold checked handles;
/// `order` keeps spawn order, which is what tower targeting scans.
#[derive(Clone, Debug, Default)]
pub struct Enemies {
    slots: SlotMap<EnemyId, Enemy>,
    order: Vec<EnemyId>,
}

impl Enemies {
    pub fn spawn(&mut self, enemy: Enemy) -> EnemyId {
        let id = self.slots.insert(enemy);
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        let removed = self.slots.remove(id)?;
        self.order.retain(|&o| o != id);
        Some(removed)
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.slots.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Enemies in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.slots.get(id).map(|e| (id, e)))
    }

    /// Arbitrary order; only for per-enemy updates that don't depend on each other.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EnemyId, &mut Enemy)> + '_ {
        self.slots.iter_mut()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileStep {
    InFlight,
    Hit,
    Killed,
    /// Target was already gone; the projectile expires without effect.
    Fizzled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub target: EnemyId,
    pub reached_target: bool,
}

impl Projectile {
    pub fn new(x: f64, y: f64, speed: f64, target: EnemyId) -> Self {
        Self {
            x,
            y,
            speed,
            target,
            reached_target: false,
        }
    }

    /// Home in on the target's current position. A fatal hit removes the
    /// target from `enemies`; the caller pays the bounty.
    pub fn advance(&mut self, enemies: &mut Enemies, damage: i32) -> ProjectileStep {
        let Some(target) = enemies.get_mut(self.target) else {
            self.reached_target = true;
            return ProjectileStep::Fizzled;
        };
        match approach(self.x, self.y, target.x, target.y, self.speed) {
            Approach::Moved { x, y } => {
                self.x = x;
                self.y = y;
                ProjectileStep::InFlight
            }
            Approach::Arrived => {
                self.reached_target = true;
                target.health -= damage;
                if target.health <= 0 {
                    enemies.remove(self.target);
                    ProjectileStep::Killed
                } else {
                    ProjectileStep::Hit
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    pub x: f64,
    pub y: f64,
    pub range: f64,
    pub damage: i32,
    /// Cooldown period in frames.
    pub fire_rate: u32,
    pub cooldown: u32,
    pub selected: bool,
    pub projectiles: Vec<Projectile>,
}

impl Tower {
    pub fn new(x: f64, y: f64, spec: &TowerSpec) -> Self {
        Self {
            x,
            y,
            range: spec.range,
            damage: spec.damage,
            fire_rate: spec.fire_rate,
            cooldown: 0,
            selected: false,
            projectiles: Vec::new(),
        }
    }

    pub fn hit_test(&self, x: f64, y: f64, radius: f64) -> bool {
        distance(self.x, self.y, x, y) <= radius
    }

    /// Fire at the first enemy in spawn order that is within range. While cooling
    /// down this only ticks the counter.
    pub fn shoot(&mut self, enemies: &Enemies, projectile_speed: f64) -> Option<EnemyId> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }
        let (id, _) = enemies
            .iter()
            .find(|(_, e)| distance(self.x, self.y, e.x, e.y) <= self.range)?;
        self.projectiles
            .push(Projectile::new(self.x, self.y, projectile_speed, id));
        self.cooldown = self.fire_rate;
        Some(id)
    }

    /// Move every projectile once and drop the ones that arrived. Returns the
    /// number of enemies killed.
    pub fn advance_projectiles(&mut self, enemies: &mut Enemies, damage: i32) -> u32 {
        let mut kills = 0;
        for p in &mut self.projectiles {
            if p.advance(enemies, damage) == ProjectileStep::Killed {
                kills += 1;
            }
        }
        self.projectiles.retain(|p| !p.reached_target);
        kills
    }

    /// Applies one upgrade step. Fails without mutating when the fire rate is
    /// already at its floor.
    pub fn apply_upgrade(
        &mut self,
        stat: UpgradeStat,
        spec: UpgradeSpec,
        min_fire_rate: u32,
    ) -> Result<(), Rejected> {
        match stat {
            UpgradeStat::Range => self.range += spec.step as f64,
            UpgradeStat::Damage => {
                let step = i32::try_from(spec.step).unwrap_or(i32::MAX);
                self.damage = self.damage.saturating_add(step);
            }
            UpgradeStat::FireRate => {
                if self.fire_rate <= min_fire_rate {
                    return Err(Rejected::FireRateAtFloor { floor: min_fire_rate });
                }
                self.fire_rate = self.fire_rate.saturating_sub(spec.step).max(min_fire_rate);
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Running,
    GameOver,
}

/// Why a player command left the world unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejected {
    InsufficientFunds { cost: i32, have: i32 },
    GameOver,
    NoSuchTower,
    FireRateAtFloor { floor: u32 },
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::InsufficientFunds { cost, have } => {
                write!(f, "insufficient funds: need {cost}, have {have}")
            }
            Rejected::GameOver => write!(f, "game is over"),
            Rejected::NoSuchTower => write!(f, "no tower selected"),
            Rejected::FireRateAtFloor { floor } => write!(f, "fire rate already at minimum {floor}"),
        }
    }
}

impl std::error::Error for Rejected {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Toggled { tower: TowerId, selected: bool },
    Placed(TowerId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub spawned: u32,
    pub kills: u32,
    pub leaks: u32,
}

#[derive(Clone, Debug)]
pub struct World {
    pub config: Rc<GameConfig>,
    pub phase: Phase,
    pub health: i32,
    pub money: i32,
    pub enemies: Enemies,
    pub towers: Vec<Tower>,
    /// Tower shown in the upgrade panel (last one clicked).
    pub inspected: Option<TowerId>,
    pub stats: RunStats,
    /// Bumped on every applied action; used for change detection by the view.
    pub version: u64,
}

impl PartialEq for World {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && Rc::ptr_eq(&self.config, &other.config)
    }
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        Self {
            phase: Phase::Stopped,
            health: config.starting_health,
            money: config.starting_money,
            enemies: Enemies::default(),
            towers: Vec::new(),
            inspected: None,
            stats: RunStats::default(),
            version: 0,
            config: Rc::new(config),
        }
    }

    /// Stopped -> Running. Returns false (and does nothing) in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Stopped {
            return false;
        }
        self.phase = Phase::Running;
        info!("game started");
        true
    }

    pub fn spawn_enemy(&mut self) -> Option<EnemyId> {
        if self.phase != Phase::Running {
            return None;
        }
        let enemy = Enemy::spawn(&self.config.path, &self.config.enemy);
        self.stats.spawned += 1;
        Some(self.enemies.spawn(enemy))
    }

    /// One simulation frame: enemies walk, towers fire and drive their
    /// projectiles, then the health check. No-op unless running.
    pub fn frame(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let config = Rc::clone(&self.config);
        self.stats.frames += 1;

        let mut leaked = Vec::new();
        for (id, enemy) in self.enemies.iter_mut() {
            if enemy.advance(&config.path) == EnemyStep::ReachedEnd {
                leaked.push(id);
            }
        }
        for id in leaked {
            self.enemies.remove(id);
            self.health -= 1;
            self.stats.leaks += 1;
            debug!(health = self.health, "enemy reached the end of the path");
        }

        for tower in &mut self.towers {
            tower.shoot(&self.enemies, config.projectile.speed);
            let kills = tower.advance_projectiles(&mut self.enemies, config.projectile.damage);
            if kills > 0 {
                self.money += config.projectile.kill_reward * kills as i32;
                self.stats.kills += kills;
                debug!(kills, money = self.money, "enemies destroyed");
            }
        }

        if self.health <= 0 {
            self.phase = Phase::GameOver;
            info!(frames = self.stats.frames, kills = self.stats.kills, "game over");
        }
        true
    }

    /// Canvas click: toggle the first tower under the pointer, otherwise try to
    /// build a new one there.
    pub fn click(&mut self, x: f64, y: f64) -> Result<ClickOutcome, Rejected> {
        if self.phase == Phase::GameOver {
            return Err(Rejected::GameOver);
        }
        let radius = self.config.tower.radius;
        if let Some(idx) = self.towers.iter().position(|t| t.hit_test(x, y, radius)) {
            let tower = &mut self.towers[idx];
            tower.selected = !tower.selected;
            let selected = tower.selected;
            self.inspected = Some(TowerId(idx));
            return Ok(ClickOutcome::Toggled {
                tower: TowerId(idx),
                selected,
            });
        }
        self.place_tower(x, y).map(ClickOutcome::Placed)
    }

    pub fn place_tower(&mut self, x: f64, y: f64) -> Result<TowerId, Rejected> {
        if self.phase == Phase::GameOver {
            return Err(Rejected::GameOver);
        }
        let cost = self.config.tower.cost;
        if self.money < cost {
            return Err(Rejected::InsufficientFunds {
                cost,
                have: self.money,
            });
        }
        self.money -= cost;
        self.towers.push(Tower::new(x, y, &self.config.tower));
        info!(x, y, money = self.money, "tower placed");
        Ok(TowerId(self.towers.len() - 1))
    }

    pub fn upgrade_tower(&mut self, id: TowerId, stat: UpgradeStat) -> Result<(), Rejected> {
        if self.phase == Phase::GameOver {
            return Err(Rejected::GameOver);
        }
        let spec = self.config.upgrade(stat);
        if self.money < spec.cost {
            return Err(Rejected::InsufficientFunds {
                cost: spec.cost,
                have: self.money,
            });
        }
        let min_fire_rate = self.config.min_fire_rate;
        let tower = self.towers.get_mut(id.0).ok_or(Rejected::NoSuchTower)?;
        tower.apply_upgrade(stat, spec, min_fire_rate)?;
        self.money -= spec.cost;
        info!(?stat, tower = id.0, money = self.money, "tower upgraded");
        Ok(())
    }

    pub fn upgrade_inspected(&mut self, stat: UpgradeStat) -> Result<(), Rejected> {
        let id = self.inspected.ok_or(Rejected::NoSuchTower)?;
        self.upgrade_tower(id, stat)
    }

    pub fn inspected_tower(&self) -> Option<&Tower> {
        self.inspected.and_then(|id| self.towers.get(id.0))
    }
}

// ---------------- Reducer & Actions -----------------
#[derive(Clone, Debug)]
pub enum GameAction {
    Start,
    /// One animation frame.
    Frame,
    SpawnEnemy,
    Click { x: f64, y: f64 },
    Upgrade(UpgradeStat),
}

fn applied<T: fmt::Debug>(result: Result<T, Rejected>) -> bool {
    match result {
        Ok(outcome) => {
            debug!(?outcome, "command applied");
            true
        }
        Err(reason) => {
            debug!(%reason, "command rejected");
            false
        }
    }
}

impl Reducible for World {
    type Action = GameAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        // Ticks arrive every frame; skip the clone when they can't do anything.
        if matches!(action, GameAction::Frame | GameAction::SpawnEnemy) && self.phase != Phase::Running {
            return self;
        }
        let mut new = (*self).clone();
        let changed = match action {
            GameAction::Start => new.start(),
            GameAction::Frame => new.frame(),
            GameAction::SpawnEnemy => new.spawn_enemy().is_some(),
            GameAction::Click { x, y } => applied(new.click(x, y)),
            GameAction::Upgrade(stat) => applied(new.upgrade_inspected(stat)),
        };
        if !changed {
            return self;
        }
        new.version = new.version.wrapping_add(1);
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_world() -> World {
        let mut w = World::new(GameConfig::default());
        assert!(w.start());
        w
    }

    fn enemy_at(x: f64, y: f64, health: i32) -> Enemy {
        Enemy {
            x,
            y,
            speed: 2.0,
            health,
            path_index: 0,
        }
    }

    #[test]
    fn placing_a_tower_costs_fifty() {
        let mut w = World::new(GameConfig::default());
        assert_eq!((w.health, w.money), (10, 100));
        let id = w.place_tower(300.0, 300.0).expect("affordable");
        assert_eq!(id, TowerId(0));
        assert_eq!(w.money, 50);
        assert_eq!(w.towers.len(), 1);
    }

    #[test]
    fn placement_blocked_when_broke() {
        let mut w = World::new(GameConfig::default());
        w.place_tower(100.0, 100.0).unwrap();
        w.place_tower(300.0, 100.0).unwrap();
        assert_eq!(w.money, 0);
        let err = w.place_tower(500.0, 100.0).unwrap_err();
        assert_eq!(err, Rejected::InsufficientFunds { cost: 50, have: 0 });
        assert_eq!(w.towers.len(), 2);
        assert_eq!(w.money, 0);
    }

    #[test]
    fn click_on_tower_toggles_selection_instead_of_building() {
        let mut w = World::new(GameConfig::default());
        assert_eq!(w.click(300.0, 300.0), Ok(ClickOutcome::Placed(TowerId(0))));
        assert_eq!(
            w.click(310.0, 305.0),
            Ok(ClickOutcome::Toggled { tower: TowerId(0), selected: true })
        );
        assert_eq!(w.money, 50);
        assert_eq!(w.towers.len(), 1);
        assert_eq!(w.inspected, Some(TowerId(0)));
        assert_eq!(
            w.click(300.0, 300.0),
            Ok(ClickOutcome::Toggled { tower: TowerId(0), selected: false })
        );
    }

    #[test]
    fn click_just_outside_radius_builds() {
        let mut w = World::new(GameConfig::default());
        w.click(300.0, 300.0).unwrap();
        assert_eq!(w.click(316.0, 300.0), Ok(ClickOutcome::Placed(TowerId(1))));
        assert_eq!(w.money, 0);
    }

    #[test]
    fn enemy_steps_at_its_speed() {
        let cfg = GameConfig::default();
        let mut e = Enemy::spawn(&cfg.path, &cfg.enemy);
        assert_eq!((e.x, e.y, e.path_index), (0.0, 250.0, 0));
        assert_eq!(e.advance(&cfg.path), EnemyStep::Walking);
        assert!((e.x - 2.0).abs() < 1e-9);
        assert!((e.y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn enemy_snaps_to_waypoint_and_turns() {
        let cfg = GameConfig::default();
        let mut e = enemy_at(199.0, 250.0, 10);
        assert_eq!(e.advance(&cfg.path), EnemyStep::Walking);
        assert_eq!((e.x, e.y, e.path_index), (200.0, 250.0, 1));
        e.advance(&cfg.path);
        assert!((e.y - 252.0).abs() < 1e-9);
    }

    #[test]
    fn leaking_enemy_costs_exactly_one_health() {
        let mut w = running_world();
        let last = w.config.path.len() - 1;
        let mut e = enemy_at(999.0, 500.0, 10);
        e.path_index = last - 1;
        w.enemies.spawn(e);
        assert!(w.frame());
        assert_eq!(w.health, 9);
        assert!(w.enemies.is_empty());
        assert_eq!(w.stats.leaks, 1);
        assert_eq!(w.phase, Phase::Running);
    }

    #[test]
    fn shoot_fires_and_resets_cooldown() {
        let mut w = running_world();
        let mut tower = Tower::new(100.0, 100.0, &w.config.tower);
        assert_eq!(tower.range, 100.0);
        let id = w.enemies.spawn(enemy_at(150.0, 100.0, 10));
        assert_eq!(tower.shoot(&w.enemies, 5.0), Some(id));
        assert_eq!(tower.projectiles.len(), 1);
        assert_eq!(tower.cooldown, tower.fire_rate);
    }

    #[test]
    fn cooling_tower_only_ticks_down() {
        let mut enemies = Enemies::default();
        enemies.spawn(enemy_at(110.0, 100.0, 10));
        let mut tower = Tower::new(100.0, 100.0, &TowerSpec::default());
        tower.cooldown = 3;
        assert_eq!(tower.shoot(&enemies, 5.0), None);
        assert_eq!(tower.cooldown, 2);
        assert!(tower.projectiles.is_empty());
    }

    #[test]
    fn no_target_in_range_keeps_tower_ready() {
        let mut enemies = Enemies::default();
        enemies.spawn(enemy_at(300.0, 100.0, 10));
        let mut tower = Tower::new(100.0, 100.0, &TowerSpec::default());
        assert_eq!(tower.shoot(&enemies, 5.0), None);
        assert_eq!(tower.cooldown, 0);
        assert!(tower.projectiles.is_empty());
    }

    #[test]
    fn targets_first_in_spawn_order_not_nearest() {
        let mut enemies = Enemies::default();
        let far = enemies.spawn(enemy_at(190.0, 100.0, 10));
        let _near = enemies.spawn(enemy_at(105.0, 100.0, 10));
        let mut tower = Tower::new(100.0, 100.0, &TowerSpec::default());
        assert_eq!(tower.shoot(&enemies, 5.0), Some(far));
        assert_eq!(tower.projectiles[0].target, far);
    }

    #[test]
    fn spawn_order_survives_slot_reuse() {
        let mut enemies = Enemies::default();
        let a = enemies.spawn(enemy_at(0.0, 0.0, 10));
        let b = enemies.spawn(enemy_at(1.0, 0.0, 10));
        enemies.remove(a);
        let c = enemies.spawn(enemy_at(2.0, 0.0, 10));
        let ids: Vec<EnemyId> = enemies.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![b, c]);
        assert!(enemies.get(a).is_none());
    }

    #[test]
    fn projectile_hit_deals_five_damage() {
        let mut enemies = Enemies::default();
        let id = enemies.spawn(enemy_at(103.0, 100.0, 10));
        let mut p = Projectile::new(100.0, 100.0, 5.0, id);
        assert_eq!(p.advance(&mut enemies, 5), ProjectileStep::Hit);
        assert!(p.reached_target);
        assert_eq!(enemies.get(id).map(|e| e.health), Some(5));
    }

    #[test]
    fn projectile_homes_on_live_position() {
        let mut enemies = Enemies::default();
        let id = enemies.spawn(enemy_at(100.0, 150.0, 10));
        let mut p = Projectile::new(100.0, 100.0, 5.0, id);
        assert_eq!(p.advance(&mut enemies, 5), ProjectileStep::InFlight);
        assert!((p.y - 105.0).abs() < 1e-9);
        if let Some(e) = enemies.get_mut(id) {
            e.x = 200.0;
            e.y = 105.0;
        }
        p.advance(&mut enemies, 5);
        assert!((p.x - 105.0).abs() < 1e-9);
        assert!((p.y - 105.0).abs() < 1e-9);
    }

    #[test]
    fn projectile_with_vanished_target_fizzles() {
        let mut enemies = Enemies::default();
        let id = enemies.spawn(enemy_at(103.0, 100.0, 10));
        let other = enemies.spawn(enemy_at(103.0, 100.0, 10));
        enemies.remove(id);
        let mut p = Projectile::new(100.0, 100.0, 5.0, id);
        assert_eq!(p.advance(&mut enemies, 5), ProjectileStep::Fizzled);
        assert!(p.reached_target);
        assert_eq!(enemies.get(other).map(|e| e.health), Some(10));
    }

    #[test]
    fn two_hits_kill_and_pay_bounty() {
        let mut w = running_world();
        let id = w.enemies.spawn(enemy_at(350.0, 400.0, 10));
        w.enemies.get_mut(id).unwrap().path_index = 2;
        let mut tower = Tower::new(350.0, 450.0, &w.config.tower);
        // Two rounds already on top of the enemy, plus whatever the tower fires this frame.
        tower.projectiles.push(Projectile::new(350.0, 400.0, 5.0, id));
        tower.projectiles.push(Projectile::new(350.0, 400.0, 5.0, id));
        w.towers.push(tower);

        assert!(w.frame());
        assert!(w.enemies.get(id).is_none());
        assert_eq!(w.money, 110);
        assert_eq!(w.stats.kills, 1);
        // The round fired this frame lost its target to the second hit and expired.
        assert!(w.towers[0].projectiles.is_empty());

        w.frame();
        assert_eq!(w.money, 110);
        assert_eq!(w.stats.kills, 1);
    }

    #[test]
    fn losing_last_health_ends_the_game_once() {
        let mut w = running_world();
        w.health = 1;
        let mut e = enemy_at(999.0, 500.0, 10);
        e.path_index = w.config.path.len() - 2;
        w.enemies.spawn(e);
        assert!(w.frame());
        assert_eq!(w.health, 0);
        assert_eq!(w.phase, Phase::GameOver);
        assert!(!w.frame());
        assert!(!w.start());
        assert_eq!(w.spawn_enemy(), None);
        assert_eq!(w.click(10.0, 10.0), Err(Rejected::GameOver));
        assert_eq!(w.phase, Phase::GameOver);
    }

    #[test]
    fn start_is_idempotent() {
        let mut w = World::new(GameConfig::default());
        assert!(!w.frame());
        assert_eq!(w.spawn_enemy(), None);
        assert!(w.start());
        assert!(!w.start());
        assert_eq!(w.phase, Phase::Running);
    }

    #[test]
    fn undefended_enemy_walks_whole_path() {
        let mut w = running_world();
        w.spawn_enemy().expect("running");
        for _ in 0..1000 {
            w.frame();
        }
        assert_eq!(w.health, 9);
        assert!(w.enemies.is_empty());
        assert_eq!(w.stats.spawned, 1);
    }

    #[test]
    fn upgrades_adjust_stats_and_charge() {
        let mut w = World::new(GameConfig::default());
        w.click(300.0, 300.0).unwrap();
        w.click(300.0, 300.0).unwrap();
        w.money = 200;
        w.upgrade_inspected(UpgradeStat::Range).unwrap();
        w.upgrade_inspected(UpgradeStat::Damage).unwrap();
        w.upgrade_inspected(UpgradeStat::FireRate).unwrap();
        let t = w.inspected_tower().unwrap();
        assert_eq!((t.range, t.damage, t.fire_rate), (110.0, 15, 25));
        assert_eq!(w.money, 200 - 20 - 30 - 40);
    }

    #[test]
    fn upgrade_blocked_without_funds() {
        let mut w = World::new(GameConfig::default());
        w.click(300.0, 300.0).unwrap();
        w.click(300.0, 300.0).unwrap();
        w.money = 39;
        assert_eq!(
            w.upgrade_inspected(UpgradeStat::FireRate),
            Err(Rejected::InsufficientFunds { cost: 40, have: 39 })
        );
        assert_eq!(w.towers[0].fire_rate, 30);
        assert_eq!(w.money, 39);
    }

    #[test]
    fn fire_rate_never_drops_below_floor() {
        let mut w = World::new(GameConfig::default());
        w.click(300.0, 300.0).unwrap();
        w.click(300.0, 300.0).unwrap();
        w.money = 1000;
        w.towers[0].fire_rate = 3;
        w.upgrade_inspected(UpgradeStat::FireRate).unwrap();
        assert_eq!(w.towers[0].fire_rate, 1);
        assert_eq!(w.money, 960);
        assert_eq!(
            w.upgrade_inspected(UpgradeStat::FireRate),
            Err(Rejected::FireRateAtFloor { floor: 1 })
        );
        assert_eq!(w.money, 960);
    }

    #[test]
    fn upgrade_needs_a_tower() {
        let mut w = World::new(GameConfig::default());
        assert_eq!(w.upgrade_inspected(UpgradeStat::Range), Err(Rejected::NoSuchTower));
        assert_eq!(w.money, 100);
    }

    #[test]
    fn reducer_skips_idle_ticks_and_repeat_starts() {
        let w = Rc::new(World::new(GameConfig::default()));
        let same = Rc::clone(&w).reduce(GameAction::Frame);
        assert!(Rc::ptr_eq(&w, &same));

        let started = Rc::clone(&w).reduce(GameAction::Start);
        assert_eq!(started.phase, Phase::Running);
        assert_eq!(started.version, 1);
        let again = Rc::clone(&started).reduce(GameAction::Start);
        assert!(Rc::ptr_eq(&started, &again));

        let spawned = Rc::clone(&started).reduce(GameAction::SpawnEnemy);
        assert_eq!(spawned.enemies.len(), 1);
    }

    #[test]
    fn reducer_ignores_rejected_clicks() {
        let mut inner = World::new(GameConfig::default());
        inner.money = 10;
        let w = Rc::new(inner);
        let after = Rc::clone(&w).reduce(GameAction::Click { x: 50.0, y: 50.0 });
        assert!(Rc::ptr_eq(&w, &after));
        assert!(after.towers.is_empty());
    }
}
