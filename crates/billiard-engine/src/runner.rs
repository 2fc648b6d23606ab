//! Wires the rule engine to the physics world and drives the stepping loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::api::config::TableConfig;
use crate::api::types::TableEvent;
use crate::core::physics::PhysicsWorld;
use crate::core::table::Table;
use crate::core::time::FixedTimestep;
use crate::input::queue::{ShotQueue, ShotSender};
use crate::rules::engine::{Ruling, ShotRuleEngine};
use crate::rules::view::TableView;

/// Owns the engine, the world and the view. Only the thread holding the
/// runner writes to any of them; other threads talk to it through a
/// `ShotSender` and read a `SharedView`.
pub struct TableRunner<V: TableView> {
    engine: ShotRuleEngine,
    world: PhysicsWorld,
    table: Table,
    view: V,
    queue: ShotQueue,
    timestep: FixedTimestep,
    events: Vec<TableEvent>,
}

impl<V: TableView> TableRunner<V> {
    /// Build the table, rack the balls and publish the starting view.
    pub fn new(config: TableConfig, mut view: V) -> Self {
        let mut world = PhysicsWorld::from_config(&config);
        let table = Table::build(&config, &mut world);
        let timestep = FixedTimestep::new(config.fixed_dt, config.max_steps_per_tick);
        let mut engine = ShotRuleEngine::new(config);
        engine.setup(&mut world, &mut view);

        Self {
            engine,
            world,
            table,
            view,
            queue: ShotQueue::new(),
            timestep,
            events: Vec::with_capacity(16),
        }
    }

    pub fn sender(&self) -> ShotSender {
        self.queue.sender()
    }

    /// Run as many fixed steps as `dt` seconds of wall time call for.
    /// Returns the rulings made along the way.
    pub fn tick(&mut self, dt: f32) -> Vec<Ruling> {
        let steps = self.timestep.accumulate(dt);
        let mut rulings = Vec::new();
        for _ in 0..steps {
            rulings.extend(self.step_once());
        }
        rulings
    }

    /// One fixed step: take pending shots, advance physics, feed the
    /// resulting events to the engine.
    pub fn step_once(&mut self) -> Option<Ruling> {
        for request in self.queue.drain() {
            if let Err(err) = self.engine.request_shot(request.impulse, &mut self.world) {
                log::warn!("shot rejected: {}", err);
            }
        }

        self.events.clear();
        self.world.step_into(&mut self.events);

        let mut ruling = None;
        for event in self.events.drain(..) {
            if let Some(r) = self.engine.handle(event, &mut self.world, &mut self.view) {
                ruling = Some(r);
            }
        }

        if self.engine.shot_pending() && self.world.is_at_rest() {
            self.engine.abandon_pending_shot();
        }
        ruling
    }

    /// Start over with a fresh rack and zeroed scores.
    pub fn reset_game(&mut self) {
        self.queue.drain();
        self.engine.reset_game(&mut self.world, &mut self.view);
    }

    pub fn engine(&self) -> &ShotRuleEngine {
        &self.engine
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }
}

impl<V: TableView + Send + 'static> TableRunner<V> {
    /// Move the runner onto its own simulation thread, stepping once and
    /// then sleeping `interval`, until stopped.
    pub fn spawn(self, interval: Duration) -> RunnerHandle<V> {
        let sender = self.sender();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let thread = std::thread::spawn(move || {
            let mut runner = self;
            log::info!("simulation thread started, interval {:?}", interval);
            while flag.load(Ordering::Acquire) {
                runner.step_once();
                std::thread::sleep(interval);
            }
            log::info!("simulation thread stopped");
            runner
        });

        RunnerHandle {
            sender,
            running,
            thread,
        }
    }
}

/// Control handle for a runner living on its simulation thread.
pub struct RunnerHandle<V: TableView> {
    sender: ShotSender,
    running: Arc<AtomicBool>,
    thread: JoinHandle<TableRunner<V>>,
}

impl<V: TableView> RunnerHandle<V> {
    pub fn sender(&self) -> ShotSender {
        self.sender.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.thread.is_finished()
    }

    /// Stop after the current step and hand the runner back.
    /// `None` if the simulation thread panicked.
    pub fn stop(self) -> Option<TableRunner<V>> {
        self.running.store(false, Ordering::Release);
        match self.thread.join() {
            Ok(runner) => Some(runner),
            Err(_) => {
                log::error!("simulation thread panicked");
                None
            }
        }
    }
}
