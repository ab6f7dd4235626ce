use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::rc::Rc;

use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use pitch_core::offline::{
    self, CACHE_NAME, CORE_ASSETS, INDEX_URL, OFFLINE_URL, OfflineError, OfflineHost, Request,
};

type Res = (u16, String);

#[derive(Default)]
struct World {
    online: bool,
    render_icons: bool,
    server: HashMap<String, String>,
    caches: BTreeMap<String, HashMap<String, Res>>,
    fetches: Vec<(String, bool)>,
    background: Vec<LocalBoxFuture<'static, ()>>,
}

#[derive(Clone, Default)]
struct Worker(Rc<RefCell<World>>);

impl Worker {
    fn online() -> Worker {
        let w = Worker::default();
        {
            let mut world = w.0.borrow_mut();
            world.online = true;
            world.render_icons = true;
            for path in CORE_ASSETS {
                world.server.insert(path.to_string(), format!("{path} v1"));
            }
        }
        w
    }

    fn cached(&self, path: &str) -> Option<String> {
        let world = self.0.borrow();
        world.caches.get(CACHE_NAME)?.get(path).map(|(_, body)| body.clone())
    }

    fn set_online(&self, on: bool) {
        self.0.borrow_mut().online = on;
    }

    fn publish(&self, path: &str, body: &str) {
        self.0.borrow_mut().server.insert(path.to_string(), body.to_string());
    }

    fn run_background(&self) {
        let tasks = std::mem::take(&mut self.0.borrow_mut().background);
        for task in tasks {
            block_on(task);
        }
    }
}

impl OfflineHost for Worker {
    type Req = String;
    type Res = Res;

    fn request_for(&self, path: &str) -> String {
        path.to_string()
    }

    async fn fetch(&self, req: &String, no_store: bool) -> Option<Res> {
        let mut world = self.0.borrow_mut();
        world.fetches.push((req.clone(), no_store));
        if !world.online {
            return None;
        }
        Some(match world.server.get(req) {
            Some(body) => (200, body.clone()),
            None => (404, String::new()),
        })
    }

    fn status(&self, res: &Res) -> u16 {
        res.0
    }

    async fn cache_match(&self, req: &String) -> Option<Res> {
        let world = self.0.borrow();
        world.caches.get(CACHE_NAME)?.get(req).cloned()
    }

    async fn cache_put(&self, req: &String, res: &Res) {
        let mut world = self.0.borrow_mut();
        world
            .caches
            .entry(CACHE_NAME.to_string())
            .or_default()
            .insert(req.clone(), res.clone());
    }

    async fn cache_names(&self) -> Vec<String> {
        self.0.borrow().caches.keys().cloned().collect()
    }

    async fn delete_cache(&self, name: &str) {
        self.0.borrow_mut().caches.remove(name);
    }

    async fn generated_icon(&self, size: u32, maskable: bool) -> Option<Res> {
        self.0
            .borrow()
            .render_icons
            .then(|| (200, format!("png {size} {maskable}")))
    }

    fn spawn<F: Future<Output = ()> + 'static>(&self, task: F) {
        self.0.borrow_mut().background.push(Box::pin(task));
    }
}

fn get(path: &str) -> Request<'_> {
    Request {
        path,
        method: "GET",
        navigate: false,
        same_origin: true,
    }
}

fn answer(w: &Worker, meta: &Request<'_>, url: &str) -> Option<String> {
    block_on(offline::respond(w, meta, url.to_string())).map(|(_, body)| body)
}

#[test]
fn install_precaches_every_core_asset() {
    let w = Worker::online();
    block_on(offline::install(&w)).unwrap();
    for path in CORE_ASSETS {
        assert_eq!(w.cached(path), Some(format!("{path} v1")));
    }
}

#[test]
fn install_is_all_or_nothing() {
    let w = Worker::online();
    w.0.borrow_mut().server.remove("style.css");
    let err = block_on(offline::install(&w)).unwrap_err();
    assert!(matches!(err, OfflineError::Precache(ref p) if p == "style.css"));
    assert_eq!(w.cached(INDEX_URL), None);
}

#[test]
fn activate_evicts_old_caches_and_refreshes() {
    let w = Worker::online();
    block_on(offline::install(&w)).unwrap();
    w.0.borrow_mut()
        .caches
        .insert("soccer-assist-cache-v2".into(), HashMap::new());
    w.publish(INDEX_URL, "index v2");
    w.0.borrow_mut().fetches.clear();

    assert_eq!(block_on(offline::activate(&w)), CORE_ASSETS.len());
    assert_eq!(block_on(w.cache_names()), vec![CACHE_NAME.to_string()]);
    assert_eq!(w.cached(INDEX_URL).as_deref(), Some("index v2"));
    assert!(w.0.borrow().fetches.iter().all(|(_, no_store)| *no_store));
}

#[test]
fn activate_offline_keeps_the_installed_copies() {
    let w = Worker::online();
    block_on(offline::install(&w)).unwrap();
    w.set_online(false);
    assert_eq!(block_on(offline::activate(&w)), 0);
    assert_eq!(w.cached("style.css").as_deref(), Some("style.css v1"));
}

#[test]
fn navigation_prefers_network_then_index_then_offline_page() {
    let w = Worker::online();
    block_on(offline::install(&w)).unwrap();
    let nav = Request {
        navigate: true,
        ..get("/board")
    };
    w.publish("/board", "live page");
    assert_eq!(answer(&w, &nav, "/board").as_deref(), Some("live page"));

    w.set_online(false);
    assert_eq!(answer(&w, &nav, "/board").as_deref(), Some("index.html v1"));

    w.0.borrow_mut()
        .caches
        .get_mut(CACHE_NAME)
        .unwrap()
        .remove(INDEX_URL);
    assert_eq!(answer(&w, &nav, "/board").as_deref(), Some("offline.html v1"));
}

#[test]
fn same_origin_get_serves_cache_and_revalidates() {
    let w = Worker::online();
    block_on(offline::install(&w)).unwrap();
    w.publish("style.css", "style.css v2");

    assert_eq!(answer(&w, &get("/style.css"), "style.css").as_deref(), Some("style.css v1"));
    assert_eq!(w.cached("style.css").as_deref(), Some("style.css v1"));
    w.run_background();
    assert_eq!(w.cached("style.css").as_deref(), Some("style.css v2"));
}

#[test]
fn uncached_get_goes_to_network_then_offline_page() {
    let w = Worker::online();
    block_on(offline::install(&w)).unwrap();
    w.publish("assets/drill.json", "drill");
    assert_eq!(
        answer(&w, &get("/assets/drill.json"), "assets/drill.json").as_deref(),
        Some("drill")
    );
    assert_eq!(w.cached("assets/drill.json").as_deref(), Some("drill"));

    // failed answers are not cached
    assert_eq!(answer(&w, &get("/nope"), "nope").as_deref(), Some(""));
    assert_eq!(w.cached("nope"), None);

    w.set_online(false);
    assert_eq!(
        answer(&w, &get("/later.css"), "later.css").as_deref(),
        Some("offline.html v1")
    );
}

#[test]
fn icons_are_rendered_or_fall_back_to_vector() {
    let w = Worker::online();
    block_on(offline::install(&w)).unwrap();
    assert_eq!(
        answer(&w, &get("/icons/icon-maskable-512.png"), "icons/icon-maskable-512.png").as_deref(),
        Some("png 512 true")
    );

    w.0.borrow_mut().render_icons = false;
    w.set_online(false);
    assert_eq!(
        answer(&w, &get("/icons/icon-192x192.png"), "icons/icon-192x192.png").as_deref(),
        Some("icons/icon-192x192.svg v1")
    );
}

#[test]
fn cross_origin_uses_network_then_cache() {
    let w = Worker::online();
    block_on(offline::install(&w)).unwrap();
    let cdn = Request {
        same_origin: false,
        ..get("/cone.svg")
    };
    w.publish("https://cdn.example/cone.svg", "cdn cone");
    assert_eq!(
        answer(&w, &cdn, "https://cdn.example/cone.svg").as_deref(),
        Some("cdn cone")
    );
    // network-then-cache never writes
    assert_eq!(w.cached("https://cdn.example/cone.svg"), None);

    w.set_online(false);
    assert_eq!(answer(&w, &cdn, "assets/cone.svg").as_deref(), Some("assets/cone.svg v1"));
}
