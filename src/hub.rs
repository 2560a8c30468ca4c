//! Navigation shell
//!
//! Owns exactly one mounted screen at a time. Mounting a screen hands out a
//! fresh [`TickHandle`]; unmounting cancels it and tears the session down,
//! so nothing scheduled for the old screen can reach the new one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::ArcadeError;
use crate::games::{GameKind, Playable, launch};
use crate::highscores::SharedStore;
use crate::pdf::{Download, IncomingFile, PdfCompressor, PdfIntent};
use crate::platform::{TickHandle, TickToken, tick_pair};
use crate::renderer::{
    HUD_HEIGHT, Hud, MenuEntry, Surface, Transformed, draw_hud, draw_menu, draw_not_found,
    draw_pdf, palette,
};
use crate::settings::Settings;
use crate::sim::{GameStatus, InputEvent, InputMapper, InputProfile, Intent};

/// Route prefix every screen lives under
pub const BASE: &str = "/eGov-Game";

const MENU_TILE_HEIGHT: f32 = 56.0;
const MENU_GAP: f32 = 12.0;
const MENU_MAX_WIDTH: f32 = 480.0;
const PDF_LABEL: &str = "PDF Compressor";
/// Period of the win banner pulse
const PULSE_MS: f64 = 1200.0;

/// Addressable screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Hub,
    Game(GameKind),
    PdfCompressor,
    NotFound,
}

impl Screen {
    /// Parse a location path
    pub fn from_path(path: &str) -> Result<Self, ArcadeError> {
        let trimmed = path.trim_end_matches('/');
        let Some(rest) = trimmed.strip_prefix(BASE) else {
            return Err(ArcadeError::UnknownRoute(path.to_string()));
        };
        match rest {
            // Bare prefix redirects to the main page
            "" | "/main-page" => Ok(Screen::Hub),
            "/pdf-compressor" => Ok(Screen::PdfCompressor),
            other => other
                .strip_prefix('/')
                .and_then(GameKind::from_slug)
                .map(Screen::Game)
                .ok_or_else(|| ArcadeError::UnknownRoute(path.to_string())),
        }
    }

    /// Like [`Screen::from_path`], with unknown routes landing on `NotFound`
    pub fn resolve(path: &str) -> Self {
        Self::from_path(path).unwrap_or_else(|e| {
            log::warn!("{}", e);
            Screen::NotFound
        })
    }

    /// Canonical path for this screen
    pub fn path(self) -> String {
        match self {
            Screen::Hub => format!("{}/main-page", BASE),
            Screen::Game(kind) => format!("{}/{}", BASE, kind.slug()),
            Screen::PdfCompressor => format!("{}/pdf-compressor", BASE),
            Screen::NotFound => format!("{}/not-found", BASE),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Hub => "eGov Arcade",
            Screen::Game(kind) => kind.title(),
            Screen::PdfCompressor => PDF_LABEL,
            Screen::NotFound => "Page not found",
        }
    }
}

/// What is currently mounted
enum Mounted {
    Hub,
    Game {
        session: Box<dyn Playable>,
        mapper: InputMapper,
    },
    Pdf(PdfCompressor),
    NotFound(String),
}

/// Frame-rate meter over the last 60 frames
#[derive(Debug, Clone)]
struct FpsMeter {
    frame_ms: [f64; 60],
    index: usize,
    filled: usize,
}

impl FpsMeter {
    fn new() -> Self {
        Self {
            frame_ms: [0.0; 60],
            index: 0,
            filled: 0,
        }
    }

    fn record(&mut self, elapsed_ms: f64) {
        self.frame_ms[self.index] = elapsed_ms;
        self.index = (self.index + 1) % self.frame_ms.len();
        self.filled = (self.filled + 1).min(self.frame_ms.len());
    }

    fn fps(&self) -> Option<f64> {
        let total: f64 = self.frame_ms[..self.filled].iter().sum();
        (total > 0.0).then(|| self.filled as f64 * 1000.0 / total)
    }
}

/// Where a game's field lands on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    pub origin: Vec2,
    pub scale: f32,
}

impl FieldLayout {
    /// Fit `field` below the HUD, centered, optionally scaled
    pub fn compute(viewport: Vec2, field: Vec2, fit: bool) -> Self {
        let avail = Vec2::new(viewport.x, (viewport.y - HUD_HEIGHT).max(1.0));
        let scale = if fit && field.x > 0.0 && field.y > 0.0 {
            (avail.x / field.x).min(avail.y / field.y).max(0.01)
        } else {
            1.0
        };
        let slack = (avail - field * scale).max(Vec2::ZERO) / 2.0;
        Self {
            origin: Vec2::new(slack.x, HUD_HEIGHT + slack.y),
            scale,
        }
    }

    /// Screen point to field point
    pub fn to_field(&self, screen: Vec2) -> Vec2 {
        (screen - self.origin) / self.scale
    }
}

/// The arcade shell
pub struct Hub {
    store: SharedStore,
    settings: Settings,
    viewport: Vec2,
    screen: Screen,
    mounted: Mounted,
    ticker: Option<TickHandle>,
    generation: u64,
    rng: Pcg32,
    menu_cursor: usize,
    notice: Option<String>,
    /// Finished files waiting for the platform to save them
    downloads: Vec<Download>,
    clock_ms: f64,
    fps: FpsMeter,
}

impl Hub {
    /// Build the shell with the main menu mounted
    pub fn new(store: SharedStore, settings: Settings, viewport: Vec2, seed: u64) -> Self {
        let mut hub = Self {
            store,
            settings,
            viewport,
            screen: Screen::Hub,
            mounted: Mounted::Hub,
            ticker: None,
            generation: 0,
            rng: Pcg32::seed_from_u64(seed),
            menu_cursor: 0,
            notice: None,
            downloads: Vec::new(),
            clock_ms: 0.0,
            fps: FpsMeter::new(),
        };
        hub.mount(Screen::Hub, None);
        hub
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mount generation; bumps on every navigation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token for the current screen's tick source
    pub fn tick_token(&self) -> Option<TickToken> {
        self.ticker.as_ref().map(TickHandle::token)
    }

    pub fn session(&self) -> Option<&dyn Playable> {
        match &self.mounted {
            Mounted::Game { session, .. } => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn pdf(&self) -> Option<&PdfCompressor> {
        match &self.mounted {
            Mounted::Pdf(pdf) => Some(pdf),
            _ => None,
        }
    }

    pub fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Drain the files requested for saving since the last call
    pub fn take_downloads(&mut self) -> Vec<Download> {
        std::mem::take(&mut self.downloads)
    }

    /// Unmount the current screen and mount `screen`
    pub fn navigate(&mut self, screen: Screen) {
        self.unmount();
        self.mount(screen, None);
    }

    /// Navigate by location path (unknown paths mount `NotFound`)
    pub fn navigate_to_path(&mut self, path: &str) {
        let screen = Screen::resolve(path);
        self.unmount();
        let missing = (screen == Screen::NotFound).then(|| path.to_string());
        self.mount(screen, missing);
    }

    /// The zero-argument "return to hub" action
    pub fn back_to_hub(&mut self) {
        self.navigate(Screen::Hub);
    }

    fn unmount(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        if let Mounted::Game { session, .. } = &mut self.mounted {
            session.teardown();
        }
        self.mounted = Mounted::Hub;
        self.notice = None;
        self.downloads.clear();
        log::info!("Unmounted {}", self.screen.title());
    }

    fn mount(&mut self, screen: Screen, missing_path: Option<String>) {
        self.generation += 1;
        let (handle, _) = tick_pair(self.generation);
        self.ticker = Some(handle);
        self.clock_ms = 0.0;

        self.mounted = match screen {
            Screen::Hub => Mounted::Hub,
            Screen::Game(kind) => {
                let seed = self.rng.random::<u64>();
                let cell = self.settings.maze_cell_size(self.viewport.x);
                let session = launch(kind, self.store.clone(), seed, cell);
                let mapper = InputMapper::new(session.input_profile());
                Mounted::Game { session, mapper }
            }
            Screen::PdfCompressor => Mounted::Pdf(PdfCompressor::new()),
            Screen::NotFound => {
                Mounted::NotFound(missing_path.unwrap_or_else(|| Screen::NotFound.path()))
            }
        };
        self.screen = screen;
        log::info!(
            "Mounted {} at {} (generation {})",
            screen.title(),
            screen.path(),
            self.generation
        );
    }

    /// Viewport changed (window resize)
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.apply_cell_size();
    }

    pub fn zoom_in(&mut self) {
        self.settings.zoom_in();
        self.zoom_changed();
    }

    pub fn zoom_out(&mut self) {
        self.settings.zoom_out();
        self.zoom_changed();
    }

    fn zoom_changed(&mut self) {
        if let Err(e) = self.settings.save_to(self.store.as_ref()) {
            log::warn!("Could not save zoom: {}", e);
        }
        self.apply_cell_size();
    }

    fn apply_cell_size(&mut self) {
        let cell = self.settings.maze_cell_size(self.viewport.x);
        if let Mounted::Game { session, mapper } = &mut self.mounted {
            if session.kind() == GameKind::Maze {
                session.set_cell_size(cell);
                mapper.set_profile(session.input_profile());
            }
        }
    }

    fn layout(&self) -> Option<FieldLayout> {
        match &self.mounted {
            Mounted::Game { session, .. } => Some(FieldLayout::compute(
                self.viewport,
                session.field_size(),
                session.scales_to_fit(),
            )),
            _ => None,
        }
    }

    /// Advance the mounted screen by one animation frame.
    ///
    /// Does nothing once the screen's tick source has been cancelled.
    pub fn frame(&mut self, elapsed_ms: f64) {
        if self.ticker.as_ref().is_none_or(TickHandle::is_cancelled) {
            return;
        }
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.clock_ms += elapsed_ms;
            self.fps.record(elapsed_ms);
        }

        match &mut self.mounted {
            Mounted::Game { session, .. } => {
                if let Some(status) = session.advance(elapsed_ms) {
                    log::debug!("{} is now {}", session.kind().title(), status.as_str());
                }
            }
            Mounted::Pdf(pdf) => {
                for id in pdf.advance(elapsed_ms) {
                    log::info!("PDF job {} finished", id);
                }
            }
            Mounted::Hub | Mounted::NotFound(_) => {}
        }
    }

    /// Route one input event to the mounted screen
    pub fn dispatch(&mut self, event: &InputEvent) {
        if let InputEvent::KeyDown { key, repeat, .. } = event {
            let home = matches!(key.as_str(), "h" | "H" | "Backspace");
            if home && !*repeat && self.screen != Screen::Hub {
                self.back_to_hub();
                return;
            }
        }

        match self.screen {
            Screen::Hub => self.dispatch_menu(event),
            Screen::Game(_) => self.dispatch_game(event),
            Screen::PdfCompressor => self.dispatch_pdf(event),
            Screen::NotFound => {
                if matches!(event, InputEvent::KeyDown { key, .. } if key == "Enter") {
                    self.back_to_hub();
                }
            }
        }
    }

    /// Hub tiles, top to bottom
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        let width = (self.viewport.x - 32.0).clamp(1.0, MENU_MAX_WIDTH);
        let x = (self.viewport.x - width) / 2.0;
        GameKind::ALL
            .iter()
            .map(|kind| kind.title())
            .chain(std::iter::once(PDF_LABEL))
            .enumerate()
            .map(|(i, label)| MenuEntry {
                label,
                min: Vec2::new(
                    x,
                    HUD_HEIGHT + 24.0 + i as f32 * (MENU_TILE_HEIGHT + MENU_GAP),
                ),
                size: Vec2::new(width, MENU_TILE_HEIGHT),
            })
            .collect()
    }

    fn menu_target(index: usize) -> Option<Screen> {
        match GameKind::ALL.get(index) {
            Some(kind) => Some(Screen::Game(*kind)),
            None if index == GameKind::ALL.len() => Some(Screen::PdfCompressor),
            None => None,
        }
    }

    fn dispatch_menu(&mut self, event: &InputEvent) {
        let count = GameKind::ALL.len() + 1;
        let target = match event {
            InputEvent::KeyDown { key, repeat: false, .. } => match key.as_str() {
                "ArrowUp" | "ArrowLeft" => {
                    self.menu_cursor = (self.menu_cursor + count - 1) % count;
                    None
                }
                "ArrowDown" | "ArrowRight" => {
                    self.menu_cursor = (self.menu_cursor + 1) % count;
                    None
                }
                "Enter" | " " => Self::menu_target(self.menu_cursor),
                digit => digit
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(Self::menu_target),
            },
            InputEvent::PointerDown { pos, .. } => self
                .menu_entries()
                .iter()
                .position(|entry| entry.contains(*pos))
                .and_then(Self::menu_target),
            _ => None,
        };
        if let Some(screen) = target {
            self.navigate(screen);
        }
    }

    fn dispatch_game(&mut self, event: &InputEvent) {
        if self.screen == Screen::Game(GameKind::Maze) {
            if let InputEvent::KeyDown { key, repeat: false, .. } = event {
                match key.as_str() {
                    "+" | "=" => return self.zoom_in(),
                    "-" | "_" => return self.zoom_out(),
                    _ => {}
                }
            }
        }

        let layout = self.layout();
        let Mounted::Game { session, mapper } = &mut self.mounted else {
            return;
        };

        let event = match (event, layout) {
            (InputEvent::PointerDown { pos, time_ms }, Some(layout)) => InputEvent::PointerDown {
                pos: layout.to_field(*pos),
                time_ms: *time_ms,
            },
            (InputEvent::PointerMove { pos, time_ms }, Some(layout)) => InputEvent::PointerMove {
                pos: layout.to_field(*pos),
                time_ms: *time_ms,
            },
            (other, _) => other.clone(),
        };

        let Some(mut intent) = mapper.map(&event) else {
            return;
        };
        // First tap on a waiting game starts it
        if intent == Intent::Jump && session.status() == GameStatus::NotStarted {
            intent = Intent::Start;
        }
        log::debug!("{} <- {:?}", session.kind().title(), intent);
        if let Some(status) = session.handle(intent) {
            log::debug!("{} is now {}", session.kind().title(), status.as_str());
        }
    }

    fn dispatch_pdf(&mut self, event: &InputEvent) {
        let Mounted::Pdf(pdf) = &self.mounted else {
            return;
        };
        let InputEvent::KeyDown { key, repeat: false, .. } = event else {
            return;
        };
        let intent = match key.as_str() {
            "+" | "=" => PdfIntent::LevelUp,
            "-" | "_" => PdfIntent::LevelDown,
            "c" | "C" => PdfIntent::CompressAll,
            "d" | "D" => match pdf.files().last() {
                Some(entry) => PdfIntent::Remove(entry.id),
                None => return,
            },
            "x" | "X" => PdfIntent::Reset,
            "s" | "S" => PdfIntent::DownloadAll,
            // Digits pick a row of the file list
            digit => match digit.parse::<usize>() {
                Ok(row @ 1..=9) => match pdf.files().get(row - 1) {
                    Some(entry) => PdfIntent::Download(entry.id),
                    None => return,
                },
                _ => return,
            },
        };
        self.pdf_intent(intent);
    }

    /// Apply an action to the PDF screen; no-op elsewhere
    pub fn pdf_intent(&mut self, intent: PdfIntent) {
        let Mounted::Pdf(pdf) = &mut self.mounted else {
            return;
        };
        let saved = pdf.apply(intent);
        if intent == PdfIntent::Reset {
            self.notice = None;
        }
        if matches!(intent, PdfIntent::Download(_) | PdfIntent::DownloadAll) && saved.is_empty() {
            self.notice = Some("Nothing compressed to download yet".to_string());
        }
        self.downloads.extend(saved);
    }

    /// Hand a dropped or picked batch of files to the PDF screen
    ///
    /// Returns the ids of the accepted files, in batch order.
    pub fn add_files(&mut self, batch: Vec<IncomingFile>) -> Result<Vec<u32>, ArcadeError> {
        let Mounted::Pdf(pdf) = &mut self.mounted else {
            log::warn!("Ignoring {} file(s) outside the PDF screen", batch.len());
            return Ok(Vec::new());
        };
        match pdf.add_files(batch) {
            Ok(ids) => {
                self.notice = None;
                Ok(ids)
            }
            Err(e) => {
                self.notice = Some("Please select PDF files only".to_string());
                Err(e)
            }
        }
    }

    /// Draw the mounted screen
    pub fn draw(&self, surface: &mut dyn Surface) {
        let viewport_fps = self.settings.show_fps.then(|| self.fps.fps()).flatten();
        match &self.mounted {
            Mounted::Hub => draw_menu(surface, &self.menu_entries(), self.menu_cursor),
            Mounted::Pdf(pdf) => draw_pdf(surface, pdf, self.notice.as_deref()),
            Mounted::NotFound(path) => draw_not_found(surface, path),
            Mounted::Game { session, .. } => {
                surface.clear(palette::BACKDROP);
                if let Some(layout) = self.layout() {
                    let mut view = Transformed::new(surface, layout.origin, layout.scale);
                    session.draw(&mut view);
                }
                let kind = session.kind();
                let pulse = if self.settings.reduced_motion {
                    1.0
                } else {
                    let phase = (self.clock_ms % PULSE_MS) / PULSE_MS;
                    (0.5 + 0.5 * (phase * std::f64::consts::TAU).sin()) as f32
                };
                let hud = Hud {
                    title: kind.title(),
                    score: session.score(),
                    best: kind.high_score_key().map(|_| session.best()),
                    status: session.status(),
                    seconds_left: (kind == GameKind::Memory).then(|| session.budget()),
                    fps: viewport_fps,
                    pulse,
                };
                draw_hud(surface, &hud);
            }
        }
    }

    /// Current input profile of the mounted game
    pub fn input_profile(&self) -> Option<InputProfile> {
        match &self.mounted {
            Mounted::Game { mapper, .. } => Some(mapper.profile()),
            _ => None,
        }
    }
}

impl Drop for Hub {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryStore, ScoreStore};
    use crate::renderer::RecordingSurface;

    fn hub_with(store: std::rc::Rc<MemoryStore>) -> Hub {
        Hub::new(store, Settings::default(), Vec2::new(800.0, 600.0), 42)
    }

    fn key(key: &str) -> InputEvent {
        InputEvent::KeyDown {
            key: key.to_string(),
            repeat: false,
            time_ms: 0.0,
        }
    }

    #[test]
    fn test_route_table() {
        assert_eq!(Screen::from_path("/eGov-Game").unwrap(), Screen::Hub);
        assert_eq!(Screen::from_path("/eGov-Game/").unwrap(), Screen::Hub);
        assert_eq!(Screen::from_path("/eGov-Game/main-page").unwrap(), Screen::Hub);
        assert_eq!(
            Screen::from_path("/eGov-Game/game-one").unwrap(),
            Screen::Game(GameKind::Mines)
        );
        assert_eq!(
            Screen::from_path("/eGov-Game/egov-maze").unwrap(),
            Screen::Game(GameKind::Maze)
        );
        assert_eq!(
            Screen::from_path("/eGov-Game/pdf-compressor").unwrap(),
            Screen::PdfCompressor
        );
        assert!(matches!(
            Screen::from_path("/eGov-Game/pacman"),
            Err(ArcadeError::UnknownRoute(_))
        ));
        assert_eq!(Screen::resolve("/elsewhere"), Screen::NotFound);
    }

    #[test]
    fn test_paths_resolve_back() {
        for kind in GameKind::ALL {
            let screen = Screen::Game(kind);
            assert_eq!(Screen::resolve(&screen.path()), screen);
        }
        assert_eq!(Screen::resolve(&Screen::Hub.path()), Screen::Hub);
    }

    #[test]
    fn test_navigate_cancels_previous_tick_source() {
        let mut hub = hub_with(MemoryStore::shared());
        let first = hub.tick_token().unwrap();
        let generation = hub.generation();

        hub.navigate(Screen::Game(GameKind::Flappy));
        assert!(!first.is_live());
        assert_eq!(hub.generation(), generation + 1);
        assert!(hub.tick_token().unwrap().is_live());

        let game_token = hub.tick_token().unwrap();
        hub.back_to_hub();
        assert!(!game_token.is_live());
        assert!(hub.session().is_none());
    }

    #[test]
    fn test_unmount_persists_endless_best() {
        let store = MemoryStore::shared();
        let mut hub = hub_with(store.clone());
        hub.navigate(Screen::Game(GameKind::Runner));
        assert_eq!(hub.session().unwrap().status(), GameStatus::NotStarted);

        hub.dispatch(&key(" "));
        assert_eq!(hub.session().unwrap().status(), GameStatus::Playing);
        for _ in 0..5 {
            hub.frame(50.0);
        }
        let score = hub.session().unwrap().score();
        assert!(score > 0);

        hub.dispatch(&key("h"));
        assert_eq!(hub.screen(), Screen::Hub);
        assert_eq!(store.read("dinorunnerHighScore").unwrap(), Some(score));
    }

    #[test]
    fn test_menu_keys_and_clicks() {
        let mut hub = hub_with(MemoryStore::shared());
        hub.dispatch(&key("3"));
        assert_eq!(hub.screen(), Screen::Game(GameKind::Memory));

        hub.back_to_hub();
        hub.dispatch(&key("ArrowUp"));
        assert_eq!(hub.menu_cursor(), GameKind::ALL.len());
        hub.dispatch(&key("Enter"));
        assert_eq!(hub.screen(), Screen::PdfCompressor);

        hub.back_to_hub();
        let tile = hub.menu_entries()[1].clone();
        hub.dispatch(&InputEvent::PointerDown {
            pos: tile.min + tile.size / 2.0,
            time_ms: 0.0,
        });
        assert_eq!(hub.screen(), Screen::Game(GameKind::Flappy));
    }

    #[test]
    fn test_grid_click_goes_through_layout() {
        let mut hub = hub_with(MemoryStore::shared());
        hub.navigate(Screen::Game(GameKind::Mines));
        let field = hub.session().unwrap().field_size();
        let layout = FieldLayout::compute(Vec2::new(800.0, 600.0), field, true);

        // Center of tile (0, 0) in screen space
        let tile = field.x / 5.0;
        let screen = layout.origin + Vec2::splat(tile / 2.0) * layout.scale;
        hub.dispatch(&InputEvent::PointerDown {
            pos: screen,
            time_ms: 0.0,
        });
        let session = hub.session().unwrap();
        assert!(session.score() == 1 || session.status() == GameStatus::Lost);

        // Clicks in the HUD strip fall outside the field
        hub.dispatch(&key("r"));
        hub.dispatch(&InputEvent::PointerDown {
            pos: Vec2::new(5.0, 5.0),
            time_ms: 0.0,
        });
        assert_eq!(hub.session().unwrap().score(), 0);
    }

    #[test]
    fn test_frame_stops_after_cancel() {
        let mut hub = hub_with(MemoryStore::shared());
        hub.navigate(Screen::Game(GameKind::Flappy));
        if let Some(ticker) = hub.ticker.as_ref() {
            ticker.cancel();
        }
        hub.frame(100.0);
        hub.frame(100.0);
        // A flappy bird left alone for 200 ms would have moved; the session
        // still reports its creation state.
        assert_eq!(hub.session().unwrap().status(), GameStatus::Playing);
        assert_eq!(hub.session().unwrap().score(), 0);
    }

    #[test]
    fn test_pdf_screen_flow() {
        let mut hub = hub_with(MemoryStore::shared());
        let early = hub.add_files(vec![IncomingFile::new("a.pdf", "application/pdf", 1000)]);
        assert!(early.unwrap().is_empty());

        hub.navigate_to_path("/eGov-Game/pdf-compressor");
        let err = hub.add_files(vec![IncomingFile::new("a.png", "image/png", 10)]);
        assert!(err.is_err());
        assert!(hub.notice().is_some());

        hub.add_files(vec![IncomingFile::new("a.pdf", "application/pdf", 1000)])
            .unwrap();
        assert!(hub.notice().is_none());
        hub.dispatch(&key("c"));
        hub.frame(100.0);
        for _ in 0..25 {
            hub.frame(100.0);
        }
        let totals = hub.pdf().unwrap().totals();
        assert_eq!(totals.compressed, 650);

        hub.dispatch(&key("d"));
        assert!(hub.pdf().unwrap().files().is_empty());
    }

    #[test]
    fn test_download_all_lists_finished_files() {
        let mut hub = hub_with(MemoryStore::shared());
        hub.navigate(Screen::PdfCompressor);
        hub.add_files(vec![IncomingFile::new("a.pdf", "application/pdf", 1000)])
            .unwrap();
        hub.dispatch(&key("s"));
        assert!(hub.take_downloads().is_empty());
        assert!(hub.notice().is_some());

        hub.dispatch(&key("c"));
        hub.frame(100.0);
        for _ in 0..25 {
            hub.frame(100.0);
        }
        // Added after the first job finished, never compressed
        let ids = hub
            .add_files(vec![IncomingFile::new("b.pdf", "application/pdf", 4000)])
            .unwrap();
        assert_eq!(ids, vec![2]);

        hub.dispatch(&key("s"));
        let saved = hub.take_downloads();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, 1);
        assert_eq!(saved[0].file_name, "compressed_a.pdf");
        assert_eq!(saved[0].size, 650);
        assert!(hub.take_downloads().is_empty());

        hub.dispatch(&key("2"));
        assert!(hub.take_downloads().is_empty());
        hub.dispatch(&key("1"));
        assert_eq!(hub.take_downloads().len(), 1);

        hub.dispatch(&key("s"));
        hub.back_to_hub();
        assert!(hub.take_downloads().is_empty());
    }

    #[test]
    fn test_unknown_path_draws_not_found() {
        let mut hub = hub_with(MemoryStore::shared());
        hub.navigate_to_path("/eGov-Game/pacman");
        assert_eq!(hub.screen(), Screen::NotFound);

        let mut surface = RecordingSurface::new(800.0, 600.0);
        hub.draw(&mut surface);
        assert!(surface.has_text("/eGov-Game/pacman"));

        hub.dispatch(&key("Enter"));
        assert_eq!(hub.screen(), Screen::Hub);
    }

    #[test]
    fn test_maze_zoom_is_saved() {
        let store = MemoryStore::shared();
        let mut hub = hub_with(store.clone());
        hub.navigate(Screen::Game(GameKind::Maze));
        let before = hub.session().unwrap().field_size();
        hub.dispatch(&key("+"));
        assert_eq!(hub.settings().maze_zoom, 1.25);
        assert!(hub.session().unwrap().field_size().x > before.x);
        assert_eq!(Settings::load_from(store.as_ref()).maze_zoom, 1.25);
    }

    #[test]
    fn test_draw_game_has_hud() {
        let mut hub = hub_with(MemoryStore::shared());
        hub.navigate(Screen::Game(GameKind::Memory));
        let mut surface = RecordingSurface::new(800.0, 600.0);
        hub.draw(&mut surface);
        assert!(surface.has_text("Memory Flip"));
        assert!(surface.has_text("0:40"));
    }
}
