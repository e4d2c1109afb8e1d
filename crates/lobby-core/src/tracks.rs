//! Track catalog parsing and playlist navigation for the global player.

use crate::error::{LobbyError, LobbyResult};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackLinks {
    pub spotify: Option<String>,
    pub apple: Option<String>,
    pub youtube: Option<String>,
}

/// Seek point inside a track.
#[derive(Clone, Debug, PartialEq)]
pub struct Chapter {
    /// Display label, e.g. `00:52`.
    pub label: String,
    pub at_sec: f64,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub title: String,
    pub artist: Option<String>,
    pub audio_url: Option<String>,
    pub links: TrackLinks,
    pub note: Option<String>,
    pub chapters: Vec<Chapter>,
}

/// Track the server currently designates for the room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentTrack {
    pub url: String,
    pub title: Option<String>,
}

/// Accept only absolute `http(s)` URLs for rendered links.
pub fn safe_link(v: &Value) -> Option<String> {
    let s = v.as_str()?.trim();
    let lower = s.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then(|| s.to_string())
}

/// Audio sources may also be same-origin paths.
fn audio_source(v: &Value) -> Option<String> {
    let s = v.as_str()?.trim();
    if s.starts_with('/') && !s.starts_with("//") {
        return Some(s.to_string());
    }
    safe_link(v)
}

fn non_empty(v: &Value) -> Option<String> {
    v.as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `MM:SS` label for a chapter without an explicit one.
pub fn chapter_label(sec: f64) -> String {
    let total = if sec.is_finite() && sec > 0.0 {
        sec.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

fn chapter_from_value(v: &Value) -> Option<Chapter> {
    let obj = v.as_object()?;
    let at_sec = obj
        .get("s")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite() && *s >= 0.0)?;
    let label = obj
        .get("t")
        .and_then(non_empty)
        .unwrap_or_else(|| chapter_label(at_sec));
    Some(Chapter {
        label,
        at_sec,
        note: obj.get("note").and_then(non_empty),
    })
}

fn track_from_value(v: &Value) -> Option<Track> {
    let obj = v.as_object()?;
    let get = |k: &str| obj.get(k).unwrap_or(&Value::Null);
    let links = get("links");
    let link = |k: &str| links.get(k).and_then(safe_link);
    Some(Track {
        title: non_empty(get("title")).unwrap_or_else(|| "Untitled".to_string()),
        artist: non_empty(get("artist")),
        audio_url: audio_source(get("audioUrl")),
        links: TrackLinks {
            spotify: link("spotify"),
            apple: link("apple"),
            youtube: link("youtube"),
        },
        note: non_empty(get("note")),
        chapters: get("chapters")
            .as_array()
            .map(|rows| rows.iter().filter_map(chapter_from_value).collect())
            .unwrap_or_default(),
    })
}

fn decode_object(body: &str) -> LobbyResult<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(LobbyError::Malformed("expected a JSON object".to_string())),
        Err(e) => Err(LobbyError::Malformed(e.to_string())),
    }
}

/// Parse `{ tracks: [...] }`. Entries that are not objects are skipped; a
/// body that is not a JSON object is a [`LobbyError::Malformed`].
pub fn parse_catalog(body: &str) -> LobbyResult<Vec<Track>> {
    let obj = decode_object(body)?;
    let tracks = match obj.get("tracks") {
        Some(Value::Array(items)) => items.iter().filter_map(track_from_value).collect(),
        _ => Vec::new(),
    };
    Ok(tracks)
}

/// Parse `{ url, title }` from the current-track endpoint. `None` when no
/// playable url is set.
pub fn parse_current_track(body: &str) -> LobbyResult<Option<CurrentTrack>> {
    let obj = decode_object(body)?;
    let Some(url) = obj.get("url").and_then(audio_source) else {
        return Ok(None);
    };
    Ok(Some(CurrentTrack {
        url,
        title: obj.get("title").and_then(non_empty),
    }))
}

/// Whether the player should switch to `url`. A source that already
/// contains it (relative vs. resolved absolute) is left alone.
pub fn should_switch_source(current_src: &str, url: &str) -> bool {
    let current = current_src.trim();
    current.is_empty() || !current.contains(url)
}

/// Catalog plus search filter and the currently selected track.
#[derive(Clone, Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    visible: Vec<usize>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        let visible = (0..tracks.len()).collect();
        Self {
            tracks,
            visible,
            current: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Indices matching the last filter, in catalog order.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Case-insensitive substring match over title and note.
    pub fn filter(&mut self, query: &str) -> &[usize] {
        let q = query.trim().to_lowercase();
        self.visible = self
            .tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                q.is_empty()
                    || t.title.to_lowercase().contains(&q)
                    || t.note.as_deref().unwrap_or("").to_lowercase().contains(&q)
            })
            .map(|(i, _)| i)
            .collect();
        &self.visible
    }

    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.current = Some(index);
        self.tracks.get(index)
    }

    /// Next track, wrapping to the first.
    pub fn next(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let i = match self.current {
            Some(i) if i + 1 < self.tracks.len() => i + 1,
            _ => 0,
        };
        self.select(i)
    }

    /// Previous track, wrapping to the last.
    pub fn prev(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let i = match self.current {
            Some(i) if i > 0 => i - 1,
            _ => self.tracks.len() - 1,
        };
        self.select(i)
    }
}

/// Seek fraction for a pointer at `client_x` over a bar starting at `left`.
pub fn scrub_fraction(client_x: f32, left: f32, width: f32) -> f32 {
    if !(width > 0.0) || !client_x.is_finite() {
        return 0.0;
    }
    ((client_x - left) / width).clamp(0.0, 1.0)
}

/// Playback progress in `[0, 1]`; 0 while the duration is unknown.
pub fn progress(current_sec: f64, duration_sec: f64) -> f32 {
    if !(duration_sec > 0.0) || !current_sec.is_finite() || !duration_sec.is_finite() {
        return 0.0;
    }
    (current_sec / duration_sec).clamp(0.0, 1.0) as f32
}
