//! Topology download pipeline.
//!
//! Uses channel-based communication to bridge the async fetch with egui's
//! synchronous update loop. The fetch is one-shot: no retry, no timeout.

use crate::geo::{CountryFeature, Topology, TopologyError};
use eframe::egui;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Errors from fetching and decoding the boundary dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: u16 },
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Result of a topology load.
pub type LoadResult = Result<Vec<CountryFeature>, LoadError>;

/// Channel-based loader for the boundary topology.
///
/// The spawned task only delivers its result, and only requests a repaint,
/// while the channel is alive. Dropping the channel (the map unmounting)
/// clears the liveness flag so a late response is discarded.
pub struct TopologyChannel {
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
    alive: Arc<AtomicBool>,
}

impl Default for TopologyChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TopologyChannel {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl TopologyChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Spawns the fetch on a worker thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(&self, ctx: egui::Context, url: String, object: String) {
        let delivery = self.delivery(ctx);

        std::thread::spawn(move || {
            let result = fetch_bytes(&url).and_then(|bytes| decode(&bytes, &object));
            delivery.deliver(result);
        });
    }

    /// Spawns the fetch as a browser future.
    #[cfg(target_arch = "wasm32")]
    pub fn load(&self, ctx: egui::Context, url: String, object: String) {
        let delivery = self.delivery(ctx);

        wasm_bindgen_futures::spawn_local(async move {
            let result = match fetch_bytes(&url).await {
                Ok(bytes) => decode(&bytes, &object),
                Err(e) => Err(e),
            };
            delivery.deliver(result);
        });
    }

    fn delivery(&self, ctx: egui::Context) -> Delivery {
        Delivery {
            sender: self.sender.clone(),
            alive: Arc::clone(&self.alive),
            ctx: Some(ctx),
        }
    }

    /// Non-blocking check for a completed load.
    pub fn try_recv(&self) -> Option<LoadResult> {
        self.receiver.try_recv().ok()
    }
}

/// Hands a finished load back to the UI thread if it is still listening.
struct Delivery {
    sender: Sender<LoadResult>,
    alive: Arc<AtomicBool>,
    ctx: Option<egui::Context>,
}

impl Delivery {
    fn deliver(self, result: LoadResult) -> bool {
        if !self.alive.load(Ordering::Acquire) {
            log::debug!("Topology load finished after the map was closed; discarding");
            return false;
        }
        if self.sender.send(result).is_err() {
            return false;
        }
        if let Some(ctx) = self.ctx {
            ctx.request_repaint();
        }
        true
    }
}

/// Decodes a topology document into country features.
pub fn decode(bytes: &[u8], object: &str) -> LoadResult {
    let topology = Topology::from_slice(bytes)?;
    if !topology.object_names().any(|name| name == object) {
        log::debug!(
            "Topology objects: {:?}",
            topology.object_names().collect::<Vec<_>>()
        );
    }
    let features = topology.features(object)?;
    log::info!("Decoded {} country boundaries from {:?}", features.len(), object);
    Ok(features)
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    use std::io::Read;

    log::info!("Fetching topology: {}", url);
    let response = ureq::get(url).call().map_err(|e| match e {
        ureq::Error::Status(status, _) => LoadError::Http {
            url: url.to_string(),
            status,
        },
        other => LoadError::Fetch {
            url: url.to_string(),
            reason: other.to_string(),
        },
    })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| LoadError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    log::info!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fetch_error = |reason: String| LoadError::Fetch {
        url: url.to_string(),
        reason,
    };

    log::info!("Fetching topology: {}", url);
    let window = web_sys::window().ok_or_else(|| fetch_error("no window".to_string()))?;

    let opts = web_sys::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web_sys::RequestMode::Cors);
    let request = web_sys::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| fetch_error(format!("{:?}", e)))?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| fetch_error(format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| fetch_error("fetch did not return a Response".to_string()))?;

    if !response.ok() {
        return Err(LoadError::Http {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| fetch_error(format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fetch_error(format!("{:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    log::info!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::topology::tests::two_country_fixture;

    fn delivery_for(channel: &TopologyChannel) -> Delivery {
        Delivery {
            sender: channel.sender.clone(),
            alive: Arc::clone(&channel.alive),
            ctx: None,
        }
    }

    #[test]
    fn test_decode_fixture() {
        let features = decode(&two_country_fixture(), "countries").unwrap();
        assert_eq!(features.len(), 2);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode(b"{}", "countries"),
            Err(LoadError::Topology(TopologyError::Parse(_)))
        ));
        assert!(matches!(
            decode(&two_country_fixture(), "land"),
            Err(LoadError::Topology(TopologyError::MissingObject(_)))
        ));
    }

    #[test]
    fn test_delivery_reaches_live_channel() {
        let channel = TopologyChannel::new();
        let delivery = delivery_for(&channel);

        assert!(delivery.deliver(Ok(Vec::new())));
        assert!(matches!(channel.try_recv(), Some(Ok(v)) if v.is_empty()));
        assert!(channel.try_recv().is_none());
    }

    #[test]
    fn test_delivery_after_drop_is_discarded() {
        let channel = TopologyChannel::new();
        let delivery = delivery_for(&channel);
        let alive = Arc::clone(&channel.alive);

        drop(channel);
        assert!(!alive.load(Ordering::Acquire));
        assert!(!delivery.deliver(Ok(Vec::new())));
    }
}
