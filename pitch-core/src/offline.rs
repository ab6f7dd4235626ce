//! Offline cache of the board: routing rules and the service worker
//! lifecycle.
//!
//! [`install`], [`activate`] and [`respond`] drive an [`OfflineHost`], which
//! the worker implements over `CacheStorage` and `fetch`.

use std::future::Future;

pub const CACHE_NAME: &str = "soccer-assist-cache-v3";
pub const OFFLINE_URL: &str = "offline.html";
pub const INDEX_URL: &str = "index.html";

/// Pre-cached on install and re-fetched on activate.
pub const CORE_ASSETS: &[&str] = &[
    INDEX_URL,
    "style.css",
    "pitch_wasm.js",
    "pitch_wasm_bg.wasm",
    "icons/icon-192x192.svg",
    "icons/icon-512x512.svg",
    "assets/player-home.svg",
    "assets/player-opponent.svg",
    "assets/soccer-ball.svg",
    "assets/soccer-ball.png",
    "assets/cone.svg",
    "manifest.json",
    OFFLINE_URL,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request<'a> {
    pub path: &'a str,
    pub method: &'a str,
    /// `request.mode === "navigate"`.
    pub navigate: bool,
    pub same_origin: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Answer with a rendered app icon.
    GeneratedIcon { size: u32, maskable: bool },
    /// Network, then cached index page, then the offline page.
    NetworkFirst,
    /// Cached copy now, refresh the cache in the background.
    StaleWhileRevalidate,
    /// Network, then whatever the cache has.
    NetworkThenCache,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::GeneratedIcon { .. } => "icon",
            Strategy::NetworkFirst => "network-first",
            Strategy::StaleWhileRevalidate => "stale-while-revalidate",
            Strategy::NetworkThenCache => "network-then-cache",
        }
    }
}

const GENERATED_ICONS: [(&str, u32, bool); 3] = [
    ("/icons/icon-192x192.png", 192, false),
    ("/icons/icon-512x512.png", 512, false),
    ("/icons/icon-maskable-512.png", 512, true),
];

pub fn route(req: &Request) -> Strategy {
    for (suffix, size, maskable) in GENERATED_ICONS {
        if req.path.ends_with(suffix) {
            return Strategy::GeneratedIcon { size, maskable };
        }
    }
    if req.navigate {
        return Strategy::NetworkFirst;
    }
    if req.method.eq_ignore_ascii_case("GET") && req.same_origin {
        return Strategy::StaleWhileRevalidate;
    }
    Strategy::NetworkThenCache
}

/// Caches to delete on activate: every name but the current one.
pub fn stale_caches<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    keys.into_iter().filter(|k| *k != CACHE_NAME).collect()
}

/// Vector icon served when rasterizing a generated icon fails.
pub fn icon_fallback_path(size: u32) -> &'static str {
    if size >= 512 {
        "icons/icon-512x512.svg"
    } else {
        "icons/icon-192x192.svg"
    }
}

/// Only successful responses are written back to the cache.
pub fn should_store(status: u16) -> bool {
    (200..300).contains(&status)
}

#[derive(Debug, thiserror::Error)]
pub enum OfflineError {
    #[error("could not precache {0}")]
    Precache(String),
}

/// Network and cache access of a worker scope. Cache calls address the
/// current cache ([`CACHE_NAME`]).
#[allow(async_fn_in_trait)]
pub trait OfflineHost: Clone + 'static {
    /// A live request or an asset path.
    type Req: 'static;
    type Res: 'static;

    fn request_for(&self, path: &str) -> Self::Req;
    /// `None` when the network is unreachable. `no_store` bypasses the HTTP
    /// cache.
    async fn fetch(&self, req: &Self::Req, no_store: bool) -> Option<Self::Res>;
    fn status(&self, res: &Self::Res) -> u16;
    async fn cache_match(&self, req: &Self::Req) -> Option<Self::Res>;
    async fn cache_put(&self, req: &Self::Req, res: &Self::Res);
    async fn cache_names(&self) -> Vec<String>;
    async fn delete_cache(&self, name: &str);
    /// Rendered app icon, `None` if rendering failed.
    async fn generated_icon(&self, size: u32, maskable: bool) -> Option<Self::Res>;
    /// Runs `task` after the response has been handed back.
    fn spawn<F: Future<Output = ()> + 'static>(&self, task: F);
}

/// Precaches every core asset. Any asset that cannot be fetched fails the
/// install and nothing is written.
pub async fn install<H: OfflineHost>(host: &H) -> Result<(), OfflineError> {
    let mut fetched = Vec::with_capacity(CORE_ASSETS.len());
    for path in CORE_ASSETS {
        let req = host.request_for(path);
        match host.fetch(&req, false).await {
            Some(res) if should_store(host.status(&res)) => fetched.push((req, res)),
            _ => return Err(OfflineError::Precache(path.to_string())),
        }
    }
    for (req, res) in &fetched {
        host.cache_put(req, res).await;
    }
    log::info!("precached {} assets into {CACHE_NAME}", fetched.len());
    Ok(())
}

/// Drops old caches, then re-fetches the core assets past the HTTP cache.
/// Returns how many assets were refreshed; failures keep the old copy.
pub async fn activate<H: OfflineHost>(host: &H) -> usize {
    let names = host.cache_names().await;
    for name in stale_caches(names.iter().map(String::as_str)) {
        log::info!("deleting stale cache {name}");
        host.delete_cache(name).await;
    }
    let mut refreshed = 0;
    for path in CORE_ASSETS {
        let req = host.request_for(path);
        if let Some(res) = host.fetch(&req, true).await {
            if should_store(host.status(&res)) {
                host.cache_put(&req, &res).await;
                refreshed += 1;
            }
        }
    }
    refreshed
}

/// Answers one intercepted request. `None` means a network error.
pub async fn respond<H: OfflineHost>(host: &H, meta: &Request<'_>, req: H::Req) -> Option<H::Res> {
    match route(meta) {
        Strategy::GeneratedIcon { size, maskable } => {
            if let Some(res) = host.generated_icon(size, maskable).await {
                return Some(res);
            }
            let fallback = host.request_for(icon_fallback_path(size));
            match host.cache_match(&fallback).await {
                Some(res) => Some(res),
                None => host.fetch(&fallback, false).await,
            }
        }
        Strategy::NetworkFirst => {
            if let Some(res) = host.fetch(&req, false).await {
                return Some(res);
            }
            if let Some(index) = host.cache_match(&host.request_for(INDEX_URL)).await {
                return Some(index);
            }
            host.cache_match(&host.request_for(OFFLINE_URL)).await
        }
        Strategy::StaleWhileRevalidate => stale_while_revalidate(host, req).await,
        Strategy::NetworkThenCache => match host.fetch(&req, false).await {
            Some(res) => Some(res),
            None => host.cache_match(&req).await,
        },
    }
}

async fn refresh<H: OfflineHost>(host: &H, req: &H::Req) -> Option<H::Res> {
    let res = host.fetch(req, false).await?;
    if should_store(host.status(&res)) {
        host.cache_put(req, &res).await;
    }
    Some(res)
}

/// The cached copy wins and is refreshed in the background. Without one the
/// network answer is awaited, and the offline page covers a failed fetch.
async fn stale_while_revalidate<H: OfflineHost>(host: &H, req: H::Req) -> Option<H::Res> {
    if let Some(cached) = host.cache_match(&req).await {
        let bg = host.clone();
        host.spawn(async move {
            refresh(&bg, &req).await;
        });
        return Some(cached);
    }
    if let Some(res) = refresh(host, &req).await {
        return Some(res);
    }
    host.cache_match(&host.request_for(OFFLINE_URL)).await
}
