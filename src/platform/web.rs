//! Browser bindings: LocalStorage and the animation frame loop

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Storage, Url};

use super::TickToken;
use crate::consts::FRAME_MS;
use crate::error::ArcadeError;
use crate::highscores::ScoreStore;
use crate::pdf::PDF_MIME;

/// [`ScoreStore`] over `window.localStorage`
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, ArcadeError> {
        let storage = web_sys::window()
            .ok_or(ArcadeError::StorageUnavailable)?
            .local_storage()
            .map_err(|_| ArcadeError::StorageUnavailable)?
            .ok_or(ArcadeError::StorageUnavailable)?;
        Ok(Self { storage })
    }
}

impl ScoreStore for LocalStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, ArcadeError> {
        self.storage
            .get_item(key)
            .map_err(|e| ArcadeError::Storage(format!("{:?}", e)))
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), ArcadeError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| ArcadeError::Storage(format!("{:?}", e)))
    }
}

type FrameClosure = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` loop bound to one tick token.
///
/// The callback re-arms itself only while the token is live. Dropping the
/// loop cancels the pending frame and releases the callback.
pub struct AnimationLoop {
    token: TickToken,
    frame_id: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameClosure>>>,
}

impl AnimationLoop {
    /// Start calling `on_frame(elapsed_ms)` once per animation frame
    pub fn start(token: TickToken, mut on_frame: impl FnMut(f64) + 'static) -> Self {
        let frame_id = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));
        let last_time = Cell::new(None::<f64>);

        let rearm = Rc::downgrade(&callback);
        let ids = frame_id.clone();
        let live = token.clone();
        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            ids.set(None);
            if !live.is_live() {
                log::debug!("Animation loop {} stopped", live.generation());
                return;
            }
            let elapsed = last_time.get().map_or(FRAME_MS, |last| time - last);
            last_time.set(Some(time));
            on_frame(elapsed);

            // Re-check: the frame itself may have unmounted the screen
            if !live.is_live() {
                return;
            }
            if let Some(callback) = rearm.upgrade() {
                if let Some(closure) = callback.borrow().as_ref() {
                    ids.set(request_frame(closure));
                }
            }
        }));

        if let Some(closure) = callback.borrow().as_ref() {
            frame_id.set(request_frame(closure));
        }
        log::debug!("Animation loop {} started", token.generation());
        Self {
            token,
            frame_id,
            callback,
        }
    }

    pub fn generation(&self) -> u64 {
        self.token.generation()
    }

    pub fn is_running(&self) -> bool {
        self.token.is_live() && self.frame_id.get().is_some()
    }

    /// Cancel the pending frame, if any
    pub fn cancel(&self) {
        if let Some(id) = self.frame_id.take() {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame({}) failed: {:?}", id, e);
                }
            }
        }
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.cancel();
        self.callback.borrow_mut().take();
    }
}

fn request_frame(closure: &FrameClosure) -> Option<i32> {
    let window = web_sys::window()?;
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("requestAnimationFrame failed: {:?}", e);
            None
        }
    }
}

/// Offer `data` to the user as a PDF named `file_name`
pub fn save_pdf(data: &Blob, file_name: &str) -> Result<(), ArcadeError> {
    let js = |e: JsValue| ArcadeError::Download(format!("{:?}", e));
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ArcadeError::Download("no document".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| ArcadeError::Download("no body".to_string()))?;

    let options = BlobPropertyBag::new();
    options.set_type(PDF_MIME);
    let blob = Blob::new_with_blob_sequence_and_options(&js_sys::Array::of1(data), &options)
        .map_err(js)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js)?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js)?
        .dyn_into()
        .map_err(|_| ArcadeError::Download("not an anchor".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    let clicked = body.append_child(&anchor).map(|_| anchor.click());
    anchor.remove();
    if let Err(e) = Url::revoke_object_url(&url) {
        log::warn!("revokeObjectURL failed: {:?}", e);
    }
    clicked.map_err(js)?;
    log::info!("Saved {}", file_name);
    Ok(())
}
