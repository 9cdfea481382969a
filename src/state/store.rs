// World store shared by the view, the frame loop and the spawner.
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use yew::Reducible;
use yew::prelude::*;

use crate::config::GameConfig;
use crate::model::{GameAction, World};

/// The most recent world, updated synchronously as actions are applied.
#[derive(Clone)]
pub struct LatestWorld(Rc<RefCell<Rc<World>>>);

impl LatestWorld {
    pub fn new(world: World) -> Self {
        Self(Rc::new(RefCell::new(Rc::new(world))))
    }

    pub fn get(&self) -> Rc<World> {
        Rc::clone(&self.0.borrow())
    }

    /// Runs the reducer now. Returns the new world if the action changed anything.
    pub fn apply(&self, action: GameAction) -> Option<Rc<World>> {
        let current = self.get();
        let next = Rc::clone(&current).reduce(action);
        if Rc::ptr_eq(&current, &next) {
            return None;
        }
        *self.0.borrow_mut() = Rc::clone(&next);
        Some(next)
    }
}

/// Reducer-style handle whose state can be read back right after a dispatch.
/// `rendered` is the snapshot the current render sees.
#[derive(Clone)]
pub struct WorldStore {
    latest: LatestWorld,
    rendered: UseStateHandle<Rc<World>>,
}

impl WorldStore {
    /// Applies `action` and returns the world it produced (unchanged if ignored).
    pub fn dispatch(&self, action: GameAction) -> Rc<World> {
        match self.latest.apply(action) {
            Some(next) => {
                self.rendered.set(Rc::clone(&next));
                next
            }
            None => self.latest.get(),
        }
    }

    pub fn latest(&self) -> Rc<World> {
        self.latest.get()
    }
}

impl Deref for WorldStore {
    type Target = World;

    fn deref(&self) -> &World {
        &self.rendered
    }
}

impl PartialEq for WorldStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.latest.0, &other.latest.0) && *self.rendered == *other.rendered
    }
}

#[hook]
pub fn use_world_store(load: fn() -> GameConfig) -> WorldStore {
    let cell = use_mut_ref(|| Rc::new(World::new(load())));
    let seed = cell.clone();
    let rendered = use_state(move || Rc::clone(&seed.borrow()));
    WorldStore {
        latest: LatestWorld(cell),
        rendered,
    }
}
