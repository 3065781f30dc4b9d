//! Async media loading and the URL-keyed texture cache.
//!
//! Startup loads every declared texture before the first frame renders, so
//! meshes never flash unbound. The cache is write-once per URL: elements
//! sharing a texture share one decoded media element and, downstream, one
//! GPU texture.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use engine::scene::{MediaKind, TextureBinding};
use futures::channel::oneshot;
use futures::future::join_all;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlImageElement, HtmlVideoElement};

/// Media loading failure. Startup logs these and aborts; a page with a
/// broken asset URL is a configuration error, not something to paper over.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not create media element: {0}")]
    Dom(String),
    #[error("image failed to decode: {url}")]
    Image { url: String },
    #[error("video failed to become playable: {url}")]
    Video { url: String },
}

/// A decoded texture source, ready for GPU upload.
pub enum Texture {
    Image(HtmlImageElement),
    Video(HtmlVideoElement),
}

/// Decoded media keyed by source URL.
#[derive(Default)]
pub struct TextureCache {
    entries: HashMap<String, Texture>,
}

impl TextureCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every binding's media, deduplicated by URL, and wait for all of
    /// it. Already-cached URLs are skipped, so repeated calls are cheap.
    pub async fn load_all(
        &mut self,
        bindings: &[TextureBinding],
        document: &Document,
    ) -> Result<(), LoadError> {
        let mut pending: Vec<&TextureBinding> = Vec::new();
        for binding in bindings {
            if self.entries.contains_key(&binding.url)
                || pending.iter().any(|b| b.url == binding.url)
            {
                continue;
            }
            pending.push(binding);
        }

        let loads = pending.iter().map(|binding| load_one(document, binding));
        for (binding, texture) in pending.iter().zip(join_all(loads).await) {
            self.entries.insert(binding.url.clone(), texture?);
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, url: &str) -> Option<&Texture> {
        self.entries.get(url)
    }

    /// The cached video element for a URL, if the URL loaded as video.
    #[must_use]
    pub fn video(&self, url: &str) -> Option<&HtmlVideoElement> {
        match self.entries.get(url) {
            Some(Texture::Video(video)) => Some(video),
            _ => None,
        }
    }

    /// Iterate cached entries as `(url, texture)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Texture)> {
        self.entries.iter().map(|(url, texture)| (url.as_str(), texture))
    }
}

/// Ready a tagged element that is itself media.
///
/// When the companion element is an `<img>` or `<video>`, it shows the first
/// texture directly: its `src` is assigned from the first binding if unset,
/// and startup waits for the element's own media-ready event so the DOM rect
/// the mesh is built from reflects the loaded media.
pub async fn prime_element(
    element: &Element,
    bindings: &[TextureBinding],
) -> Result<(), LoadError> {
    let Some(first) = bindings.first() else {
        return Ok(());
    };
    if let Some(image) = element.dyn_ref::<HtmlImageElement>() {
        if image.get_attribute("src").is_none() {
            image.set_src(&first.url);
        }
        JsFuture::from(image.decode())
            .await
            .map_err(|_| LoadError::Image { url: first.url.clone() })?;
    } else if let Some(video) = element.dyn_ref::<HtmlVideoElement>() {
        if video.get_attribute("src").is_none() {
            video.set_src(&first.url);
        }
        if video.ready_state() < 2 && !await_playable(video).await? {
            return Err(LoadError::Video { url: first.url.clone() });
        }
    }
    Ok(())
}

async fn load_one(document: &Document, binding: &TextureBinding) -> Result<Texture, LoadError> {
    match binding.media {
        MediaKind::Image => Ok(Texture::Image(load_image(document, &binding.url).await?)),
        MediaKind::Video => Ok(Texture::Video(load_video(document, &binding.url).await?)),
    }
}

/// Load and fully decode one image.
async fn load_image(document: &Document, url: &str) -> Result<HtmlImageElement, LoadError> {
    let image: HtmlImageElement = document
        .create_element("img")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| LoadError::Dom("img element has the wrong type".to_owned()))?;
    image.set_cross_origin(Some("anonymous"));
    image.set_src(url);
    JsFuture::from(image.decode())
        .await
        .map_err(|_| LoadError::Image { url: url.to_owned() })?;
    Ok(image)
}

/// Load one video to the point where playback can start.
///
/// The element is muted and looping, the only configuration autoplay
/// policies allow to start without a gesture. It stays paused; playback is
/// driven later by slide navigation.
async fn load_video(document: &Document, url: &str) -> Result<HtmlVideoElement, LoadError> {
    let video: HtmlVideoElement = document
        .create_element("video")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| LoadError::Dom("video element has the wrong type".to_owned()))?;
    video.set_muted(true);
    video.set_loop(true);
    video.set_cross_origin(Some("anonymous"));
    video
        .set_attribute("playsinline", "")
        .map_err(js_err)?;
    video.set_preload("auto");
    video.set_src(url);
    video.load();

    if await_playable(&video).await? {
        Ok(video)
    } else {
        Err(LoadError::Video { url: url.to_owned() })
    }
}

/// Wait for `canplay` or `error` on a video, whichever fires first.
async fn await_playable(video: &HtmlVideoElement) -> Result<bool, LoadError> {
    // One sender shared between the two outcomes; whichever event fires
    // first consumes it.
    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_canplay = {
        let tx = Rc::clone(&tx);
        Closure::once(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(true);
            }
        })
    };
    let on_error = {
        let tx = Rc::clone(&tx);
        Closure::once(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(false);
            }
        })
    };
    video
        .add_event_listener_with_callback("canplay", on_canplay.as_ref().unchecked_ref())
        .map_err(js_err)?;
    video
        .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_canplay.forget();
    on_error.forget();

    Ok(rx.await.unwrap_or(false))
}

fn js_err(value: JsValue) -> LoadError {
    LoadError::Dom(format!("{value:?}"))
}
