//! Background game loop
//!
//! One named thread runs tick + present at a fixed cadence. The session
//! mutex is the update/draw lock: a tick and the frame handed to the sink are
//! observed together. Stopping flips the running flag under a condvar, which
//! wakes a sleeping loop at once; the loop checks the flag at the top of each
//! iteration, so a tick is never left half-applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::error::LoopError;
use crate::render::{Frame, FrameSink};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    Stopping,
}

/// Input flags written by the host's input handling, sampled once per tick
#[derive(Debug, Default)]
pub struct InputFlags {
    move_left: AtomicBool,
    move_right: AtomicBool,
    jump: AtomicBool,
    grapple_tap: AtomicBool,
}

impl InputFlags {
    pub fn set_move_left(&self, held: bool) {
        self.move_left.store(held, Ordering::Relaxed);
    }

    pub fn set_move_right(&self, held: bool) {
        self.move_right.store(held, Ordering::Relaxed);
    }

    pub fn set_jump(&self, held: bool) {
        self.jump.store(held, Ordering::Relaxed);
    }

    /// Request a grapple on the next tick (consumed by that tick)
    pub fn tap_grapple(&self) {
        self.grapple_tap.store(true, Ordering::Relaxed);
    }

    /// Release every held flag
    pub fn clear(&self) {
        self.set_move_left(false);
        self.set_move_right(false);
        self.set_jump(false);
        self.grapple_tap.store(false, Ordering::Relaxed);
    }

    fn sample(&self) -> TickInput {
        TickInput {
            move_left: self.move_left.load(Ordering::Relaxed),
            move_right: self.move_right.load(Ordering::Relaxed),
            jump: self.jump.load(Ordering::Relaxed),
            grapple: self.grapple_tap.swap(false, Ordering::Relaxed),
        }
    }
}

/// State shared under the update/draw lock
struct Session<S> {
    state: GameState,
    sink: S,
}

/// Running flag plus the condvar that interrupts the inter-tick sleep
type Wake = Arc<(Mutex<bool>, Condvar)>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Only the loop thread mutates the session; a panic there leaves the
    // last complete tick behind
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the loop thread and the shared simulation state
pub struct GameLoop<S: FrameSink> {
    session: Arc<Mutex<Session<S>>>,
    input: Arc<InputFlags>,
    settings: Arc<Settings>,
    wake: Wake,
    events_tx: Sender<GameEvent>,
    events_rx: Receiver<GameEvent>,
    handle: Option<JoinHandle<()>>,
    state: LoopState,
}

impl<S: FrameSink> GameLoop<S> {
    pub fn new(state: GameState, settings: Settings, sink: S) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            session: Arc::new(Mutex::new(Session { state, sink })),
            input: Arc::new(InputFlags::default()),
            settings: Arc::new(settings),
            wake: Arc::new((Mutex::new(false), Condvar::new())),
            events_tx,
            events_rx,
            handle: None,
            state: LoopState::Stopped,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Handle for feeding input from another thread
    pub fn input(&self) -> Arc<InputFlags> {
        Arc::clone(&self.input)
    }

    /// Stopped -> Running: spawn the loop thread
    pub fn start(&mut self) -> Result<(), LoopError> {
        if self.state != LoopState::Stopped {
            return Err(LoopError::AlreadyRunning);
        }

        *lock(&self.wake.0) = true;
        let session = Arc::clone(&self.session);
        let input = Arc::clone(&self.input);
        let settings = Arc::clone(&self.settings);
        let wake = Arc::clone(&self.wake);
        let events = self.events_tx.clone();

        let spawned = thread::Builder::new()
            .name("game-loop".into())
            .spawn(move || run(&session, &input, &settings, &wake, &events));
        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state = LoopState::Running;
                log::info!(
                    "game loop started ({} ms interval)",
                    self.settings.tick_interval_ms
                );
                Ok(())
            }
            Err(err) => {
                *lock(&self.wake.0) = false;
                Err(LoopError::Spawn(err))
            }
        }
    }

    /// Running -> Stopping -> Stopped: wake the thread and join it
    ///
    /// A no-op when already stopped.
    pub fn stop(&mut self) -> Result<(), LoopError> {
        let Some(handle) = self.handle.take() else {
            self.state = LoopState::Stopped;
            return Ok(());
        };

        self.state = LoopState::Stopping;
        {
            let (running, cvar) = &*self.wake;
            *lock(running) = false;
            cvar.notify_all();
        }

        let joined = handle.join();
        self.state = LoopState::Stopped;
        match joined {
            Ok(()) => {
                log::info!("game loop stopped");
                Ok(())
            }
            Err(_) => Err(LoopError::Panicked),
        }
    }

    /// Read the simulation state under the update/draw lock
    pub fn read<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&lock(&self.session).state)
    }

    /// Replace the simulation state between ticks (level change)
    pub fn load_state(&self, state: GameState) {
        lock(&self.session).state = state;
        self.input.clear();
        log::debug!("simulation state replaced");
    }

    /// Events emitted since the last call, in tick order
    pub fn drain_events(&self) -> Vec<GameEvent> {
        self.events_rx.try_iter().collect()
    }
}

impl<S: FrameSink> Drop for GameLoop<S> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::warn!("game loop shutdown: {err}");
        }
    }
}

fn run<S: FrameSink>(
    session: &Mutex<Session<S>>,
    input: &InputFlags,
    settings: &Settings,
    wake: &(Mutex<bool>, Condvar),
    events: &Sender<GameEvent>,
) {
    let (running, cvar) = wake;
    let interval = settings.tick_interval();
    let mut last = Instant::now();

    loop {
        if !*lock(running) {
            break;
        }

        let now = Instant::now();
        let dt = now - last;
        last = now;

        {
            let mut guard = lock(session);
            let Session { state, sink } = &mut *guard;
            tick(state, &input.sample(), settings);
            for event in &state.events {
                // Receiver lives as long as the GameLoop that joins this thread
                let _ = events.send(*event);
            }
            if let Err(err) = sink.present(&Frame::new(state, dt)) {
                log::warn!("skipping draw for tick {}: {err}", state.time_ticks);
            }
        }

        let guard = lock(running);
        let (guard, _) = cvar
            .wait_timeout_while(guard, interval, |running| *running)
            .unwrap_or_else(PoisonError::into_inner);
        if !*guard {
            break;
        }
    }
    log::debug!("game loop thread exiting");
}
