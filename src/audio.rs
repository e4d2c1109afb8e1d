//! Global audio player: catalog list, chapters, mini controls and scrub bar,
//! plus the server-side "now playing" sync.

use crate::constants::*;
use crate::dom;
use crate::poll::{fetch_text, set_interval};
use lobby_core::{
    parse_catalog, parse_current_track, progress, scrub_fraction, should_switch_source,
    Chapter, CurrentTrack, LobbyConfig, Playlist, Track,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

#[derive(Clone)]
pub struct Player {
    audio: web::HtmlAudioElement,
    playlist: Rc<RefCell<Playlist>>,
    document: web::Document,
}

impl Player {
    pub fn new(document: &web::Document) -> Option<Self> {
        let audio = document
            .get_element_by_id(AUDIO_ID)?
            .dyn_into::<web::HtmlAudioElement>()
            .ok()?;
        Some(Self {
            audio,
            playlist: Rc::new(RefCell::new(Playlist::default())),
            document: document.clone(),
        })
    }

    fn has_source(&self) -> bool {
        !self.audio.src().trim().is_empty()
    }

    fn sync_play_ui(&self) {
        let playing = self.has_source() && !self.audio.paused();
        if let Some(el) = self.document.get_element_by_id(TOGGLE_ID) {
            dom::set_class(&el, CLASS_PLAYING, playing);
        }
    }

    /// Start playback; autoplay rejections are left to the toggle button.
    fn play_quietly(&self) {
        if let Ok(p) = self.audio.play() {
            spawn_local(async move {
                _ = JsFuture::from(p).await;
            });
        }
    }

    fn render_info(&self, track: &Track) {
        dom::set_text(&self.document, MINI_NAME_ID, &track.title);
        dom::set_text(&self.document, MINI_HINT_ID, track.note.as_deref().unwrap_or("—"));
        dom::set_text(&self.document, TITLE_ID, &track.title);
        dom::set_text(
            &self.document,
            ARTIST_ID,
            track.artist.as_deref().unwrap_or(ARTIST_FALLBACK),
        );
        dom::set_text(&self.document, NOTE_ID, track.note.as_deref().unwrap_or("—"));
        self.render_chapters(track);
    }

    fn render_chapters(&self, track: &Track) {
        let Some(host) = self.document.get_element_by_id(CHAPTERS_ID) else {
            return;
        };
        host.set_inner_html("");
        for chapter in &track.chapters {
            if let Some(row) = self.build_chapter(chapter) {
                _ = host.append_child(&row);
            }
        }
    }

    fn build_chapter(&self, chapter: &Chapter) -> Option<web::Element> {
        let doc = &self.document;
        let row = doc.create_element("div").ok()?;
        row.set_class_name("chapter");
        let time = doc.create_element("div").ok()?;
        time.set_class_name("time");
        time.set_text_content(Some(&chapter.label));
        let text = doc.create_element("div").ok()?;
        text.set_class_name("note");
        text.set_text_content(Some(chapter.note.as_deref().unwrap_or("")));
        _ = row.append_child(&time);
        _ = row.append_child(&text);

        let (player, at_sec) = (self.clone(), chapter.at_sec);
        let closure = Closure::wrap(Box::new(move || {
            player.audio.set_current_time(at_sec);
            player.play_quietly();
            player.sync_play_ui();
        }) as Box<dyn FnMut()>);
        _ = row.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
        Some(row)
    }

    /// Follow the server's current track when it differs from what is loaded.
    fn apply_current(&self, current: &CurrentTrack) {
        if !should_switch_source(&self.audio.src(), &current.url) {
            return;
        }
        self.audio.set_src(&current.url);
        let title = current.title.as_deref().unwrap_or("No track");
        dom::set_text(&self.document, TITLE_ID, title);
        dom::set_text(&self.document, MINI_NAME_ID, title);
        dom::set_text(&self.document, MINI_HINT_ID, CURRENT_HINT);
        log::info!("[audio] current track -> {}", current.url);
        self.sync_play_ui();
    }

    fn start(&self, track: Option<Track>) {
        let Some(track) = track else {
            return;
        };
        match &track.audio_url {
            Some(url) => {
                self.audio.set_src(url);
                self.play_quietly();
                log::info!("[audio] play {}", track.title);
            }
            None => log::warn!("[audio] {} has no playable source", track.title),
        }
        self.render_info(&track);
        self.sync_play_ui();
    }

    pub fn play_index(&self, index: usize) {
        let track = self.playlist.borrow_mut().select(index).cloned();
        self.start(track);
    }

    pub fn next(&self) {
        let track = self.playlist.borrow_mut().next().cloned();
        self.start(track);
    }

    pub fn prev(&self) {
        let track = self.playlist.borrow_mut().prev().cloned();
        self.start(track);
    }

    pub fn toggle(&self) {
        if !self.has_source() {
            if !self.playlist.borrow().is_empty() {
                self.play_index(0);
            }
            return;
        }
        if self.audio.paused() {
            self.play_quietly();
        } else {
            _ = self.audio.pause();
        }
        self.sync_play_ui();
    }

    fn set_progress(&self, fraction: f32) {
        if let Some(el) = self
            .document
            .get_element_by_id(PROG_ID)
            .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
        {
            _ = el
                .style()
                .set_property("width", &format!("{:.2}%", fraction * 100.0));
        }
    }

    fn seek_from_client_x(&self, client_x: f32) {
        let Some(scrub) = self.document.get_element_by_id(SCRUB_ID) else {
            return;
        };
        let r = scrub.get_bounding_client_rect();
        let f = scrub_fraction(client_x, r.left() as f32, r.width() as f32);
        self.set_progress(f);
        let duration = self.audio.duration();
        if duration.is_finite() && duration > 0.0 {
            self.audio.set_current_time(f as f64 * duration);
        }
    }

    /// Rebuild the track list for the current filter.
    pub fn render_list(&self) {
        let Some(list) = self.document.get_element_by_id(LIST_ID) else {
            return;
        };
        list.set_inner_html("");
        let playlist = self.playlist.borrow();
        for &i in playlist.visible() {
            let Some(track) = playlist.tracks().get(i) else {
                continue;
            };
            if let Some(row) = self.build_row(i, track) {
                _ = list.append_child(&row);
            }
        }
    }

    fn build_row(&self, index: usize, track: &Track) -> Option<web::Element> {
        let doc = &self.document;
        let row = doc.create_element("div").ok()?;
        row.set_class_name("item glassInner");
        let left = doc.create_element("div").ok()?;
        left.set_class_name("itemL");
        let name = doc.create_element("div").ok()?;
        name.set_class_name("name");
        name.set_text_content(Some(&track.title));
        let hint = doc.create_element("div").ok()?;
        hint.set_class_name("hint");
        hint.set_text_content(track.note.as_deref());
        _ = left.append_child(&name);
        _ = left.append_child(&hint);

        let right = doc.create_element("div").ok()?;
        right.set_class_name("itemR");
        let links = [
            ("SPOTIFY", &track.links.spotify),
            ("APPLE", &track.links.apple),
            ("YOUTUBE", &track.links.youtube),
        ];
        for (label, href) in links {
            let Some(href) = href else {
                continue;
            };
            let a = doc.create_element("a").ok()?;
            a.set_class_name("smallBtn");
            _ = a.set_attribute("href", href);
            _ = a.set_attribute("target", "_blank");
            _ = a.set_attribute("rel", "noreferrer");
            a.set_text_content(Some(label));
            _ = right.append_child(&a);
        }
        let play = doc.create_element("button").ok()?;
        play.set_class_name("smallBtn primary");
        play.set_text_content(Some("PLAY"));
        let player = self.clone();
        let closure = Closure::wrap(Box::new(move || player.play_index(index)) as Box<dyn FnMut()>);
        _ = play.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
        _ = right.append_child(&play);

        _ = row.append_child(&left);
        _ = row.append_child(&right);
        Some(row)
    }

    fn set_tracks(&self, tracks: Vec<Track>) {
        log::info!("[audio] catalog: {} tracks", tracks.len());
        *self.playlist.borrow_mut() = Playlist::new(tracks);
        self.render_list();
    }
}

fn listen<E: JsCast + 'static>(
    target: &web::EventTarget,
    kind: &str,
    mut handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web::Event)>);
    _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_controls(player: &Player) {
    let doc = player.document.clone();
    let p = player.clone();
    dom::add_click_listener(&doc, PREV_ID, move || p.prev());
    let p = player.clone();
    dom::add_click_listener(&doc, NEXT_ID, move || p.next());
    let p = player.clone();
    dom::add_click_listener(&doc, TOGGLE_ID, move || p.toggle());

    for kind in ["play", "pause", "ended"] {
        let p = player.clone();
        listen::<web::Event>(&player.audio, kind, move |_| p.sync_play_ui());
    }
    let p = player.clone();
    listen::<web::Event>(&player.audio, "loadedmetadata", move |_| p.set_progress(0.0));
    let p = player.clone();
    listen::<web::Event>(&player.audio, "timeupdate", move |_| {
        p.set_progress(progress(p.audio.current_time(), p.audio.duration()));
    });

    if let Some(search) = doc
        .get_element_by_id(SEARCH_ID)
        .and_then(|e| e.dyn_into::<web::HtmlInputElement>().ok())
    {
        let p = player.clone();
        let input = search.clone();
        listen::<web::Event>(&search, "input", move |_| {
            p.playlist.borrow_mut().filter(&input.value());
            p.render_list();
        });
    }

    if let Some(scrub) = doc.get_element_by_id(SCRUB_ID) {
        let dragging = Rc::new(Cell::new(false));
        let (p, d, s) = (player.clone(), dragging.clone(), scrub.clone());
        listen::<web::PointerEvent>(&scrub, "pointerdown", move |ev| {
            d.set(true);
            _ = s.set_pointer_capture(ev.pointer_id());
            p.seek_from_client_x(ev.client_x() as f32);
        });
        let (p, d) = (player.clone(), dragging.clone());
        listen::<web::PointerEvent>(&scrub, "pointermove", move |ev| {
            if d.get() {
                p.seek_from_client_x(ev.client_x() as f32);
            }
        });
        let (d, s) = (dragging, scrub.clone());
        listen::<web::PointerEvent>(&scrub, "pointerup", move |ev| {
            d.set(false);
            _ = s.release_pointer_capture(ev.pointer_id());
        });
    }
}

fn sync_current_once(player: Player, url: Rc<str>, in_flight: Rc<Cell<bool>>) {
    if in_flight.replace(true) {
        return;
    }
    spawn_local(async move {
        match fetch_text(&url).await.and_then(|body| parse_current_track(&body)) {
            Ok(Some(current)) => player.apply_current(&current),
            Ok(None) => {}
            Err(e) => log::debug!("[audio] current track unavailable: {}", e),
        }
        in_flight.set(false);
    });
}

/// Check the server's current track now and then every `period_ms`.
pub fn start_current_track_sync(player: &Player, url: String, period_ms: u32) {
    let url: Rc<str> = url.into();
    let in_flight = Rc::new(Cell::new(false));
    sync_current_once(player.clone(), url.clone(), in_flight.clone());
    let player = player.clone();
    set_interval(period_ms, move || {
        sync_current_once(player.clone(), url.clone(), in_flight.clone());
    });
}

/// Wire the player, load the catalog in the background and follow the
/// server's current track.
pub fn start_player(document: &web::Document, config: &LobbyConfig) {
    let Some(player) = Player::new(document) else {
        log::info!("[audio] no #{} element; player disabled", AUDIO_ID);
        return;
    };
    wire_controls(&player);
    let tracks_url = config.tracks_url();
    let p = player.clone();
    spawn_local(async move {
        match fetch_text(&tracks_url).await.and_then(|body| parse_catalog(&body)) {
            Ok(tracks) => p.set_tracks(tracks),
            Err(e) => log::warn!("[audio] catalog unavailable: {}", e),
        }
    });
    start_current_track_sync(
        &player,
        config.current_track_url(),
        config.current_track_interval_ms,
    );
}
