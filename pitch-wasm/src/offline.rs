//! Service worker of the board. `www/sw.js` registers the event listeners on
//! first evaluation and forwards them to these exports once the module has
//! loaded.

use std::future::Future;

use js_sys::{Array, Object, Promise, Uint8Array};
use pitch_core::offline::{self, CACHE_NAME, OfflineHost, Request};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Cache, CacheStorage, Headers, RequestCache, RequestInit, RequestMode, Response, ResponseInit,
    ServiceWorkerGlobalScope, Url,
};

use crate::EXPORT_FONT;

/// An intercepted request, or an asset path relative to the worker scope.
pub enum Target {
    Live(web_sys::Request),
    Path(String),
}

#[derive(Clone)]
struct WorkerHost {
    scope: ServiceWorkerGlobalScope,
    caches: CacheStorage,
}

async fn settle(p: Promise) -> Option<JsValue> {
    JsFuture::from(p).await.ok()
}

fn present(v: JsValue) -> Option<JsValue> {
    (!v.is_null() && !v.is_undefined()).then_some(v)
}

impl WorkerHost {
    fn current() -> Result<WorkerHost, JsValue> {
        let scope: ServiceWorkerGlobalScope = js_sys::global().dyn_into()?;
        let caches = scope.caches()?;
        Ok(WorkerHost { scope, caches })
    }

    async fn cache(&self) -> Option<Cache> {
        settle(self.caches.open(CACHE_NAME)).await?.dyn_into().ok()
    }

    /// Label font for generated icons; workers have no system fonts.
    async fn font(&self) -> Option<Vec<u8>> {
        let req = self.request_for(EXPORT_FONT);
        let res = match self.cache_match(&req).await {
            Some(res) => res,
            None => self.fetch(&req, false).await?,
        };
        if !res.ok() {
            return None;
        }
        let buf = settle(res.array_buffer().ok()?).await?;
        Some(Uint8Array::new(&buf).to_vec())
    }
}

impl OfflineHost for WorkerHost {
    type Req = Target;
    type Res = Response;

    fn request_for(&self, path: &str) -> Target {
        Target::Path(path.to_string())
    }

    async fn fetch(&self, req: &Target, no_store: bool) -> Option<Response> {
        let init = RequestInit::new();
        if no_store {
            init.set_cache(RequestCache::NoStore);
        }
        let promise = match req {
            Target::Live(r) => self.scope.fetch_with_request_and_init(r, &init),
            Target::Path(p) => self.scope.fetch_with_str_and_init(p, &init),
        };
        settle(promise).await?.dyn_into().ok()
    }

    fn status(&self, res: &Response) -> u16 {
        res.status()
    }

    async fn cache_match(&self, req: &Target) -> Option<Response> {
        let cache = self.cache().await?;
        let promise = match req {
            Target::Live(r) => cache.match_with_request(r),
            Target::Path(p) => cache.match_with_str(p),
        };
        present(settle(promise).await?)?.dyn_into().ok()
    }

    async fn cache_put(&self, req: &Target, res: &Response) {
        let Some(cache) = self.cache().await else {
            return;
        };
        // the body of `res` still goes to the page
        let copy = match Response::clone(res) {
            Ok(copy) => copy,
            Err(e) => {
                log::warn!("cannot copy response for the cache: {e:?}");
                return;
            }
        };
        let promise = match req {
            Target::Live(r) => cache.put_with_request(r, &copy),
            Target::Path(p) => cache.put_with_str(p, &copy),
        };
        if settle(promise).await.is_none() {
            log::warn!("cache write rejected");
        }
    }

    async fn cache_names(&self) -> Vec<String> {
        match settle(self.caches.keys()).await {
            Some(keys) => Array::from(&keys)
                .iter()
                .filter_map(|k| k.as_string())
                .collect(),
            None => Vec::new(),
        }
    }

    async fn delete_cache(&self, name: &str) {
        let _ = settle(self.caches.delete(name)).await;
    }

    async fn generated_icon(&self, size: u32, maskable: bool) -> Option<Response> {
        let fonts = match self.font().await {
            Some(data) => playbook_core::fonts_from_data(data),
            None => playbook_core::no_fonts(),
        };
        let png = match playbook_core::app_icon_png(size, maskable, fonts) {
            Ok(png) => png,
            Err(e) => {
                log::warn!("cannot render {size}px icon: {e}");
                return None;
            }
        };
        let headers = Headers::new().ok()?;
        headers.set("Content-Type", "image/png").ok()?;
        headers.set("Cache-Control", "public, max-age=31536000").ok()?;
        let init = ResponseInit::new();
        init.set_headers(&headers);
        let body: Object = Uint8Array::from(png.as_slice()).into();
        Response::new_with_opt_buffer_source_and_init(Some(&body), &init).ok()
    }

    fn spawn<F: Future<Output = ()> + 'static>(&self, task: F) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

#[wasm_bindgen(js_name = swInstall)]
pub async fn sw_install() -> Result<(), JsValue> {
    let host = WorkerHost::current()?;
    // take over as soon as the install settles
    let _ = host.scope.skip_waiting();
    offline::install(&host)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(js_name = swActivate)]
pub async fn sw_activate() -> Result<(), JsValue> {
    let host = WorkerHost::current()?;
    let refreshed = offline::activate(&host).await;
    log::info!("refreshed {refreshed} core assets");
    settle(host.scope.clients().claim()).await;
    Ok(())
}

/// Answer for one `fetch` event; a rejection surfaces as a network error.
#[wasm_bindgen(js_name = swFetch)]
pub async fn sw_fetch(request: web_sys::Request) -> Result<Response, JsValue> {
    let host = WorkerHost::current()?;
    let url = Url::new(&request.url())?;
    let path = url.pathname();
    let method = request.method();
    let meta = Request {
        path: &path,
        method: &method,
        navigate: request.mode() == RequestMode::Navigate,
        same_origin: url.origin() == host.scope.location().origin(),
    };
    offline::respond(&host, &meta, Target::Live(request))
        .await
        .ok_or_else(|| JsValue::from_str("offline and not cached"))
}
