//! eGov Arcade entry point
//!
//! Handles platform-specific initialization: the browser shell on wasm, a
//! headless demo on native.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        DragEvent, Event, File, FileList, HtmlCanvasElement, HtmlInputElement, KeyboardEvent,
        PointerEvent,
    };

    use arcade_hub::pdf::{IncomingFile, PDF_MIME};
    use arcade_hub::platform::{AnimationLoop, LocalStore, entropy_seed, save_pdf};
    use arcade_hub::renderer::Canvas2d;
    use arcade_hub::sim::{GameStatus, InputEvent};
    use arcade_hub::{ArcadeError, Hub, MemoryStore, Screen, Settings, SharedStore};

    const CANVAS_ID: &str = "arcade";
    const FILE_INPUT_ID: &str = "pdf-input";

    /// Everything the DOM callbacks share
    struct App {
        hub: Hub,
        surface: Canvas2d,
        canvas: HtmlCanvasElement,
        animation: Option<AnimationLoop>,
        /// Picked PDFs by compressor entry id
        files: HashMap<u32, File>,
    }

    type Shared = Rc<RefCell<App>>;

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger already set: {}", e).into());
        }
        log::info!("eGov Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = match document.get_element_by_id(CANVAS_ID) {
            Some(el) => el.dyn_into()?,
            None => {
                let el: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
                el.set_id(CANVAS_ID);
                el.set_attribute("style", "display:block;width:100vw;height:100vh")?;
                document.body().ok_or("no body")?.append_child(&el)?;
                el
            }
        };
        let surface = Canvas2d::new(&canvas).map_err(to_js)?;

        let store: SharedStore = match LocalStore::open() {
            Ok(store) => Rc::new(store),
            Err(e) => {
                log::warn!("{}; high scores will not persist", e);
                MemoryStore::shared()
            }
        };
        let settings = Settings::load_from(store.as_ref());
        let seed = settings.seed.unwrap_or_else(entropy_seed);
        log::info!("Seed: {}", seed);

        let mut hub = Hub::new(store, settings, surface_size(&surface), seed);
        let path = window.location().pathname()?;
        hub.navigate_to_path(&path);

        let app = Rc::new(RefCell::new(App {
            hub,
            surface,
            canvas: canvas.clone(),
            animation: None,
            files: HashMap::new(),
        }));

        setup_keyboard(&app)?;
        setup_pointer(&canvas, &app)?;
        setup_window_events(&app)?;
        setup_file_intake(&canvas, &app)?;

        sync(&app, false);
        log::info!("eGov Arcade running!");
        Ok(())
    }

    fn to_js(e: ArcadeError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn surface_size(surface: &Canvas2d) -> Vec2 {
        use arcade_hub::renderer::Surface;
        surface.size()
    }

    /// Start a frame loop for a newly mounted screen and mirror its route
    fn sync(app: &Shared, push_history: bool) {
        let Ok(mut a) = app.try_borrow_mut() else {
            return;
        };
        let generation = a.hub.generation();
        if a.animation.as_ref().is_some_and(|l| l.generation() == generation) {
            return;
        }
        let Some(token) = a.hub.tick_token() else {
            return;
        };

        let screen = a.hub.screen();
        if push_history && screen != Screen::NotFound {
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                if let Err(e) =
                    history.push_state_with_url(&JsValue::NULL, "", Some(&screen.path()))
                {
                    log::warn!("history.pushState({}) failed: {:?}", screen.path(), e);
                }
            }
        }

        let frame_app = app.clone();
        a.animation = Some(AnimationLoop::start(token, move |elapsed| {
            if let Ok(mut a) = frame_app.try_borrow_mut() {
                let App { hub, surface, .. } = &mut *a;
                hub.frame(elapsed);
                hub.draw(surface);
            }
        }));
    }

    fn dispatch(app: &Shared, event: InputEvent) {
        {
            let Ok(mut a) = app.try_borrow_mut() else {
                return;
            };
            a.hub.dispatch(&event);
            save_downloads(&mut a);
        }
        sync(app, true);
    }

    /// Save whatever the PDF screen asked for and forget removed files
    fn save_downloads(app: &mut App) {
        for download in app.hub.take_downloads() {
            let Some(file) = app.files.get(&download.id) else {
                log::warn!("No source file for {}", download.file_name);
                continue;
            };
            if let Err(e) = save_pdf(file, &download.file_name) {
                log::error!("{}", e);
            }
        }
        let App { hub, files, .. } = app;
        match hub.pdf() {
            Some(pdf) => files.retain(|id, _| pdf.files().iter().any(|f| f.id == *id)),
            None => files.clear(),
        }
    }

    fn setup_keyboard(app: &Shared) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            // Keep Space and arrows from scrolling the page
            if matches!(
                key.as_str(),
                " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "Backspace"
            ) {
                event.prevent_default();
            }
            dispatch(
                &app,
                InputEvent::KeyDown {
                    key,
                    repeat: event.repeat(),
                    time_ms: event.time_stamp(),
                },
            );
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, app: &Shared) -> Result<(), JsValue> {
        let events: [(&str, fn(&PointerEvent) -> InputEvent); 4] = [
            ("pointerdown", |e| InputEvent::PointerDown {
                pos: Vec2::new(e.offset_x() as f32, e.offset_y() as f32),
                time_ms: e.time_stamp(),
            }),
            ("pointermove", |e| InputEvent::PointerMove {
                pos: Vec2::new(e.offset_x() as f32, e.offset_y() as f32),
                time_ms: e.time_stamp(),
            }),
            ("pointerup", |_| InputEvent::PointerUp),
            ("pointercancel", |_| InputEvent::PointerCancel),
        ];

        for (name, convert) in events {
            let app = app.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let input = convert(&event);
                if matches!(input, InputEvent::PointerDown { .. }) {
                    if let Err(e) = target.set_pointer_capture(event.pointer_id()) {
                        log::warn!("setPointerCapture failed: {:?}", e);
                    }
                    let on_pdf = app
                        .try_borrow()
                        .is_ok_and(|a| a.hub.screen() == Screen::PdfCompressor);
                    if on_pdf {
                        open_file_picker();
                    }
                }
                dispatch(&app, input);
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_window_events(app: &Shared) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Resize
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                if let Ok(mut a) = app.try_borrow_mut() {
                    let App { hub, surface, canvas, .. } = &mut *a;
                    surface.resize(canvas);
                    hub.resize(surface_size(surface));
                }
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Back/forward buttons
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                let Some(path) = web_sys::window().and_then(|w| w.location().pathname().ok())
                else {
                    return;
                };
                if let Ok(mut a) = app.try_borrow_mut() {
                    a.hub.navigate_to_path(&path);
                }
                sync(&app, false);
            });
            window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Auto-pause when the tab is hidden
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                if document_clone.visibility_state() != web_sys::VisibilityState::Hidden {
                    return;
                }
                let playing = app
                    .try_borrow()
                    .ok()
                    .and_then(|a| a.hub.session().map(|s| s.status() == GameStatus::Playing))
                    .unwrap_or(false);
                if playing {
                    log::info!("Auto-paused (tab hidden)");
                    dispatch(
                        &app,
                        InputEvent::KeyDown {
                            key: "p".to_string(),
                            repeat: false,
                            time_ms: 0.0,
                        },
                    );
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_file_intake(canvas: &HtmlCanvasElement, app: &Shared) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;

        let input: HtmlInputElement = match document.get_element_by_id(FILE_INPUT_ID) {
            Some(el) => el.dyn_into()?,
            None => {
                let el: HtmlInputElement = document.create_element("input")?.dyn_into()?;
                el.set_id(FILE_INPUT_ID);
                el.set_type("file");
                el.set_accept("application/pdf");
                el.set_multiple(true);
                el.set_attribute("style", "display:none")?;
                document.body().ok_or("no body")?.append_child(&el)?;
                el
            }
        };

        // File picker
        {
            let app = app.clone();
            let target = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                if let Some(files) = target.files() {
                    add_files(&app, &files);
                }
                target.set_value("");
            });
            input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Drag and drop onto the canvas
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                event.prevent_default();
            });
            canvas.add_event_listener_with_callback("dragover", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                event.prevent_default();
                if let Some(files) = event.data_transfer().and_then(|dt| dt.files()) {
                    add_files(&app, &files);
                }
            });
            canvas.add_event_listener_with_callback("drop", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn open_file_picker() {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(FILE_INPUT_ID))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.click();
        }
    }

    fn add_files(app: &Shared, files: &FileList) {
        let picked: Vec<File> = (0..files.length()).filter_map(|i| files.get(i)).collect();
        if picked.is_empty() {
            return;
        }
        let batch = picked
            .iter()
            .map(|file| IncomingFile::new(file.name(), file.type_(), file.size() as u64))
            .collect();
        let Ok(mut a) = app.try_borrow_mut() else {
            return;
        };
        match a.hub.add_files(batch) {
            Ok(ids) => {
                // Accepted ids follow the PDFs' order in the batch
                let pdfs = picked.into_iter().filter(|f| f.type_() == PDF_MIME);
                a.files.extend(ids.into_iter().zip(pdfs));
            }
            Err(e) => log::warn!("Rejected upload: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_app::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("eGov Arcade (native) starting...");
    log::info!("The playable build targets wasm32; running a headless demo");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use arcade_hub::games::GameKind;
    use arcade_hub::highscores::ScoreStore;
    use arcade_hub::pdf::{IncomingFile, format_file_size};
    use arcade_hub::platform::entropy_seed;
    use arcade_hub::renderer::RecordingSurface;
    use arcade_hub::sim::{InputEvent, MAZE_COLS, MAZE_ROWS, Maze};
    use arcade_hub::{Hub, MemoryStore, Screen, Settings};

    fn key(key: &str) -> InputEvent {
        InputEvent::KeyDown {
            key: key.to_string(),
            repeat: false,
            time_ms: 0.0,
        }
    }

    pub fn run() {
        let seed = std::env::var("ARCADE_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(entropy_seed);
        println!("seed {}", seed);

        let mut rng = Pcg32::seed_from_u64(seed);
        let maze = Maze::generate(MAZE_ROWS, MAZE_COLS, &mut rng);
        println!("\n{}", maze.to_ascii());

        let store = MemoryStore::shared();
        let mut hub = Hub::new(
            store.clone(),
            Settings::default(),
            Vec2::new(1024.0, 768.0),
            seed,
        );

        // A runner that never jumps
        hub.navigate(Screen::Game(GameKind::Runner));
        hub.dispatch(&key(" "));
        for _ in 0..600 {
            hub.frame(1000.0 / 60.0);
        }
        if let Some(session) = hub.session() {
            println!(
                "{}: {} with score {}",
                GameKind::Runner.title(),
                session.status().as_str(),
                session.score()
            );
        }
        hub.back_to_hub();
        if let Some(key) = GameKind::Runner.high_score_key() {
            match store.read(key) {
                Ok(best) => println!("stored best: {:?}", best),
                Err(e) => println!("stored best unavailable: {}", e),
            }
        }

        // PDF sizing
        hub.navigate(Screen::PdfCompressor);
        let batch = vec![
            IncomingFile::new("annual-report.pdf", "application/pdf", 3_482_112),
            IncomingFile::new("scan.pdf", "application/pdf", 918_000),
            IncomingFile::new("logo.png", "image/png", 12_000),
        ];
        if let Err(e) = hub.add_files(batch) {
            println!("upload rejected: {}", e);
        }
        hub.dispatch(&key("c"));
        for _ in 0..60 {
            hub.frame(100.0);
        }
        if let Some(pdf) = hub.pdf() {
            let totals = pdf.totals();
            println!(
                "compressed {} file(s): {} -> {} (saved {}%)",
                totals.count,
                format_file_size(totals.original),
                format_file_size(totals.compressed),
                totals.percent_saved
            );
        }
        hub.dispatch(&key("s"));
        for download in hub.take_downloads() {
            println!(
                "would save {} ({})",
                download.file_name,
                format_file_size(download.size)
            );
        }

        let mut surface = RecordingSurface::new(1024.0, 768.0);
        hub.draw(&mut surface);
        for line in surface.texts() {
            println!("  | {}", line);
        }
    }
}
