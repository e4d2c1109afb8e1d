// DOM hooks and browser-side tuning for the lobby front-end.
//
// Element ids and class names live here so markup changes stay in one
// place. Simulation tuning lives in `lobby_core::constants`.

// Lobby status control
pub const STATUS_ID: &str = "status";
pub const TIMER_ID: &str = "timer";
pub const META_ID: &str = "meta";
pub const ROOM_URL: &str = "/room.html";

// Starfield canvas
pub const STARS_CANVAS_ID: &str = "stars";
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0; // bounds fill cost on dense displays

// Router
pub const STAGE_ID: &str = "stage";
pub const EXIT_ID: &str = "exitBtn";
pub const PAGE_SELECTOR: &str = ".page";
pub const NAV_SELECTOR: &str = ".navItem";
pub const GO_SELECTOR: &str = "[data-go]";
pub const CLASS_ACTIVE: &str = "isActive";
pub const CLASS_ENTERING: &str = "isEntering";
pub const CLASS_LEAVING: &str = "isLeaving";
pub const WINDOW_BADGE_ID: &str = "windowBadge";

// Player
pub const AUDIO_ID: &str = "audio";
pub const LIST_ID: &str = "list";
pub const SEARCH_ID: &str = "search";
pub const PREV_ID: &str = "prev";
pub const NEXT_ID: &str = "next";
pub const TOGGLE_ID: &str = "toggle";
pub const TITLE_ID: &str = "pTitle";
pub const NOTE_ID: &str = "pDesc";
pub const ARTIST_ID: &str = "pArtist";
pub const CHAPTERS_ID: &str = "chapters";
pub const MINI_NAME_ID: &str = "mName";
pub const MINI_HINT_ID: &str = "mHint";
pub const SCRUB_ID: &str = "scrub";
pub const PROG_ID: &str = "prog";
pub const CLASS_PLAYING: &str = "isPlaying";

pub const ARTIST_FALLBACK: &str = "KRAMSKOY • BACKROOM";
pub const CURRENT_HINT: &str = "current";

// Global config hooks set by the page before the module loads
pub const API_BASE_GLOBAL: &str = "API_BASE";
pub const STATE_PATH_GLOBAL: &str = "STATE_PATH";
pub const POLL_MS_GLOBAL: &str = "POLL_MS";
pub const STAR_MODE_GLOBAL: &str = "STAR_MODE";
