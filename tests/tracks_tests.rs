// Host-side tests for the track catalog and playlist.

use lobby_core::*;

const CATALOG: &str = r#"{
  "tracks": [
    {"title": "Neon Tide", "audioUrl": "/audio/neon.mp3", "note": "late night",
     "links": {"spotify": "https://open.spotify.com/x", "apple": "javascript:alert(1)"}},
    {"title": "", "audioUrl": "//evil.example/a.mp3"},
    {"title": "Ember", "audioUrl": "HTTPS://cdn.example/ember.mp3",
     "links": {"youtube": "http://youtu.be/abc"}},
    42
  ]
}"#;

#[test]
fn catalog_parses_and_sanitizes_links() {
    let tracks = parse_catalog(CATALOG).expect("catalog");
    assert_eq!(tracks.len(), 3);

    let neon = &tracks[0];
    assert_eq!(neon.title, "Neon Tide");
    assert_eq!(neon.audio_url.as_deref(), Some("/audio/neon.mp3"));
    assert_eq!(neon.links.spotify.as_deref(), Some("https://open.spotify.com/x"));
    assert_eq!(neon.links.apple, None);
    assert_eq!(neon.note.as_deref(), Some("late night"));

    let untitled = &tracks[1];
    assert_eq!(untitled.title, "Untitled");
    assert_eq!(untitled.audio_url, None);

    assert_eq!(
        tracks[2].audio_url.as_deref(),
        Some("HTTPS://cdn.example/ember.mp3")
    );
    assert_eq!(tracks[2].links.youtube.as_deref(), Some("http://youtu.be/abc"));
}

#[test]
fn catalog_edge_cases() {
    assert!(matches!(parse_catalog("oops"), Err(LobbyError::Malformed(_))));
    assert!(parse_catalog("{}").expect("empty").is_empty());
    assert!(parse_catalog(r#"{"tracks":"x"}"#).expect("wrong type").is_empty());
    assert!(matches!(parse_catalog("[]"), Err(LobbyError::Malformed(_))));
}

#[test]
fn artist_and_chapters_are_parsed() {
    let body = r#"{"tracks": [
      {"title": "Backroom Set", "artist": "  Kramskoy ", "audioUrl": "/a.mp3",
       "chapters": [
         {"t": "Intro", "s": 0},
         {"s": 95.7, "note": "drop"},
         {"t": "bad", "s": -4},
         {"t": "no time"},
         {"t": "text time", "s": "12"},
         "00:10",
         {"t": "  ", "s": 3600, "note": ""}
       ]},
      {"title": "Plain", "artist": "", "chapters": {"s": 1}}
    ]}"#;
    let tracks = parse_catalog(body).expect("catalog");
    let set = &tracks[0];
    assert_eq!(set.artist.as_deref(), Some("Kramskoy"));
    assert_eq!(
        set.chapters,
        vec![
            Chapter { label: "Intro".to_string(), at_sec: 0.0, note: None },
            Chapter {
                label: "01:35".to_string(),
                at_sec: 95.7,
                note: Some("drop".to_string()),
            },
            Chapter { label: "60:00".to_string(), at_sec: 3600.0, note: None },
        ]
    );
    assert_eq!(tracks[1].artist, None);
    assert!(tracks[1].chapters.is_empty());
}

#[test]
fn chapter_labels_are_minutes_and_seconds() {
    assert_eq!(chapter_label(0.0), "00:00");
    assert_eq!(chapter_label(59.9), "00:59");
    assert_eq!(chapter_label(61.0), "01:01");
    assert_eq!(chapter_label(-3.0), "00:00");
    assert_eq!(chapter_label(f64::NAN), "00:00");
}

#[test]
fn current_track_requires_a_playable_url() {
    let current = parse_current_track(r#"{"url": "/audio/live.mp3", "title": "Live"}"#)
        .expect("current");
    assert_eq!(
        current,
        Some(CurrentTrack {
            url: "/audio/live.mp3".to_string(),
            title: Some("Live".to_string()),
        })
    );
    let untitled = parse_current_track(r#"{"url": "https://cdn.example/x.mp3", "title": " "}"#)
        .expect("untitled");
    assert_eq!(untitled.and_then(|c| c.title), None);

    assert_eq!(parse_current_track(r#"{"url": "//evil.example/x.mp3"}"#).expect("unsafe"), None);
    assert_eq!(parse_current_track(r#"{"url": "javascript:alert(1)"}"#).expect("js"), None);
    assert_eq!(parse_current_track("{}").expect("empty"), None);
    assert!(matches!(parse_current_track("[1]"), Err(LobbyError::Malformed(_))));
    assert!(matches!(parse_current_track("<html>"), Err(LobbyError::Malformed(_))));
}

#[test]
fn source_switches_only_when_url_changes() {
    assert!(should_switch_source("", "/audio/a.mp3"));
    assert!(should_switch_source("   ", "/audio/a.mp3"));
    assert!(!should_switch_source("https://lobby.example/audio/a.mp3", "/audio/a.mp3"));
    assert!(should_switch_source("https://lobby.example/audio/a.mp3", "/audio/b.mp3"));
}

#[test]
fn safe_link_rejects_other_schemes() {
    use serde_json::json;
    assert!(safe_link(&json!("https://a.b")).is_some());
    assert!(safe_link(&json!("ftp://a.b")).is_none());
    assert!(safe_link(&json!("data:text/html,x")).is_none());
    assert!(safe_link(&json!(5)).is_none());
}

#[test]
fn filter_matches_title_and_note() {
    let mut list = Playlist::new(parse_catalog(CATALOG).expect("catalog"));
    assert_eq!(list.visible(), &[0, 1, 2]);
    assert_eq!(list.filter("NIGHT"), &[0]);
    assert_eq!(list.filter("ember"), &[2]);
    assert!(list.filter("zzz").is_empty());
    assert_eq!(list.filter("  "), &[0, 1, 2]);
}

#[test]
fn next_and_prev_wrap() {
    let mut list = Playlist::new(parse_catalog(CATALOG).expect("catalog"));
    assert_eq!(list.current_index(), None);
    assert_eq!(list.next().map(|t| t.title.clone()).as_deref(), Some("Neon Tide"));
    list.next();
    list.next();
    assert_eq!(list.current_index(), Some(2));
    list.next();
    assert_eq!(list.current_index(), Some(0));
    list.prev();
    assert_eq!(list.current_index(), Some(2));
    assert!(list.select(9).is_none());
    assert_eq!(list.current_index(), Some(2));
}

#[test]
fn empty_playlist_has_no_navigation() {
    let mut list = Playlist::new(Vec::new());
    assert!(list.is_empty());
    assert!(list.next().is_none());
    assert!(list.prev().is_none());
    assert!(list.current().is_none());
}

#[test]
fn scrub_and_progress_are_clamped() {
    assert_eq!(scrub_fraction(150.0, 100.0, 100.0), 0.5);
    assert_eq!(scrub_fraction(50.0, 100.0, 100.0), 0.0);
    assert_eq!(scrub_fraction(500.0, 100.0, 100.0), 1.0);
    assert_eq!(scrub_fraction(150.0, 100.0, 0.0), 0.0);
    assert_eq!(progress(30.0, 120.0), 0.25);
    assert_eq!(progress(30.0, f64::NAN), 0.0);
    assert_eq!(progress(30.0, 0.0), 0.0);
}
