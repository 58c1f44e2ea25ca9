use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use returnsleuth::config::Config;
use returnsleuth::engine::game::{Cue, Game, GameEvent};
use returnsleuth::generator::batch::BatchGenerator;
use returnsleuth::render::{self, Distractor};
use returnsleuth::session::decision::Action;
use returnsleuth::session::powerup::PowerUpKind;
use returnsleuth::session::state::Phase;

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Game,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub game: Option<Game>,
    pub should_quit: bool,
    pub last_cue: Option<Cue>,
    pub noise: Vec<Distractor>,
    noise_item: Option<String>,
    generator: Arc<BatchGenerator>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: Theme, generator: Arc<BatchGenerator>) -> Self {
        Self {
            screen: AppScreen::Menu,
            config,
            theme,
            game: None,
            should_quit: false,
            last_cue: None,
            noise: Vec::new(),
            noise_item: None,
            generator,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.generator.has_remote()
    }

    pub fn start_game(&mut self) {
        let game = Game::new(
            self.config.rules(),
            Arc::clone(&self.generator),
            self.config.start_level,
        );
        self.game = Some(game);
        self.last_cue = None;
        self.noise.clear();
        self.noise_item = None;
        self.screen = AppScreen::Game;
    }

    /// Abandon the session. Pending fetches are dropped with it.
    pub fn go_to_menu(&mut self) {
        self.game = None;
        self.screen = AppScreen::Menu;
    }

    pub fn on_tick(&mut self, now: Instant) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        game.update(now);
        for event in game.drain_events() {
            match event {
                GameEvent::Cue(cue) => self.last_cue = Some(cue),
                GameEvent::LevelStarted { .. } => self.last_cue = None,
                GameEvent::Decided(_) | GameEvent::LevelComplete(_) => {}
            }
        }
        self.refresh_noise();
    }

    // Noise is rolled once per item so it doesn't flicker between frames.
    fn refresh_noise(&mut self) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        let current = game.current_item().map(|i| i.id.clone());
        if current != self.noise_item {
            self.noise = match current {
                Some(_) => render::distractors(game.state().level, &mut self.rng),
                None => Vec::new(),
            };
            self.noise_item = current;
        }
    }

    pub fn decide(&mut self, action: Action) {
        if let Some(game) = self.game.as_mut() {
            game.decide(action, Instant::now());
        }
        self.on_tick(Instant::now());
    }

    pub fn power_up(&mut self, kind: PowerUpKind) {
        if let Some(game) = self.game.as_mut() {
            game.use_power_up(kind, Instant::now());
        }
        self.on_tick(Instant::now());
    }

    pub fn inspect(&mut self) {
        if let Some(game) = self.game.as_mut() {
            if game.snapshot().details_open {
                game.close_details();
            } else {
                game.inspect();
            }
        }
        self.on_tick(Instant::now());
    }

    pub fn retry(&mut self) {
        if let Some(game) = self.game.as_mut() {
            game.retry();
        }
        self.on_tick(Instant::now());
    }

    pub fn advance(&mut self) {
        if let Some(game) = self.game.as_mut() {
            game.advance();
        }
        self.on_tick(Instant::now());
    }

    pub fn phase(&self) -> Option<Phase> {
        self.game.as_ref().map(|g| g.phase())
    }
}
