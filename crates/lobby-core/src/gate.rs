//! Remote gate state: payload normalization and the single current snapshot.

use crate::error::{LobbyError, LobbyResult};
use fnv::FnvHashMap;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;
use std::rc::Rc;

/// Immutable snapshot of the lobby gate as last fetched.
#[derive(Clone, Debug, PartialEq)]
pub struct GateState {
    pub open: bool,
    pub window_id: Option<String>,
    /// Expiry of the open window, ms since epoch. 0 when unknown.
    pub open_until: f64,
    /// Next opening while closed, ms since epoch. 0 when unknown.
    pub reopen_at: f64,
    pub fetched_at: f64,
}

impl Default for GateState {
    fn default() -> Self {
        Self {
            open: false,
            window_id: None,
            open_until: 0.0,
            reopen_at: 0.0,
            fetched_at: 0.0,
        }
    }
}

impl GateState {
    /// Timestamp the countdown should run towards for the current gate phase.
    pub fn countdown_target(&self) -> f64 {
        if self.open {
            self.open_until
        } else {
            self.reopen_at
        }
    }
}

/// Lenient wire shape; every field is coerced separately.
#[derive(Debug, Default)]
pub struct RawGatePayload {
    open: Value,
    is_open: Value,
    open_until: Value,
    window_id: Value,
    reopen_at: Value,
}

/// Top-level object with values kept as unparsed JSON text. Only a JSON
/// object deserializes into this; numbers are not evaluated until a field
/// is decoded on its own.
#[derive(Deserialize)]
#[serde(transparent)]
struct RawFields<'a> {
    #[serde(borrow)]
    fields: FnvHashMap<String, &'a RawValue>,
}

impl RawFields<'_> {
    /// Decode one field; an unreadable value (e.g. an overflowing number)
    /// becomes `Null` without affecting the others.
    fn field(&self, key: &str) -> Value {
        self.fields
            .get(key)
            .and_then(|raw| serde_json::from_str::<Value>(raw.get()).ok())
            .unwrap_or(Value::Null)
    }
}

/// Date-string parser injected by the host (e.g. `Date.parse` in the browser).
pub type TimestampParser = fn(&str) -> Option<f64>;

/// Host-side parser: accepts numeric strings only.
pub fn parse_numeric_timestamp(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

fn coerce_bool(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim(), "true" | "1" | "open"),
        _ => false,
    }
}

fn coerce_timestamp(v: &Value, parse_date: TimestampParser) -> f64 {
    let ts = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_date(s),
        _ => None,
    };
    ts.filter(|t| t.is_finite() && *t > 0.0).unwrap_or(0.0)
}

fn coerce_window_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode a response body without coercion; fails on anything but a JSON
/// object.
pub fn decode_gate_body(body: &str) -> LobbyResult<RawGatePayload> {
    let raw: RawFields<'_> =
        serde_json::from_str(body).map_err(|e| LobbyError::Malformed(e.to_string()))?;
    Ok(RawGatePayload {
        open: raw.field("open"),
        is_open: raw.field("isOpen"),
        open_until: raw.field("openUntil"),
        window_id: raw.field("windowId"),
        reopen_at: raw.field("reopenAt"),
    })
}

/// Coerce a decoded payload into a snapshot. Missing or wrong-typed fields
/// degrade to "closed, no countdown".
pub fn normalize_gate_payload(
    raw: &RawGatePayload,
    fetched_at: f64,
    parse_date: TimestampParser,
) -> GateState {
    GateState {
        open: if raw.open.is_null() {
            coerce_bool(&raw.is_open)
        } else {
            coerce_bool(&raw.open)
        },
        window_id: coerce_window_id(&raw.window_id),
        open_until: coerce_timestamp(&raw.open_until, parse_date),
        reopen_at: coerce_timestamp(&raw.reopen_at, parse_date),
        fetched_at,
    }
}

/// Parse a 2xx response body. Never fails: a body that is not a JSON object
/// is logged and treated as the empty payload.
pub fn parse_gate_body(body: &str, fetched_at: f64, parse_date: TimestampParser) -> GateState {
    let raw = match decode_gate_body(body) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("[poll] {}", e);
            RawGatePayload::default()
        }
    };
    normalize_gate_payload(&raw, fetched_at, parse_date)
}

/// Holder of the one current snapshot plus the transient offline flag.
///
/// Snapshots are swapped whole (`Rc` replacement), so a reader holding the
/// previous `Rc` keeps a consistent view.
#[derive(Debug, Default)]
pub struct GateStore {
    current: Rc<GateState>,
    offline: bool,
    successes: u64,
}

impl GateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Rc<GateState> {
        self.current.clone()
    }

    pub fn is_open(&self) -> bool {
        self.current.open
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn has_fetched(&self) -> bool {
        self.successes > 0
    }

    /// Replace the snapshot and clear the offline flag. Returns whether the
    /// open/closed phase changed.
    pub fn commit_success(&mut self, state: GateState) -> bool {
        let changed = state.open != self.current.open;
        if self.offline {
            log::info!("[poll] back online");
        }
        if changed {
            log::info!("[poll] gate {}", if state.open { "opened" } else { "closed" });
        }
        self.current = Rc::new(state);
        self.offline = false;
        self.successes += 1;
        changed
    }

    /// Keep the last snapshot and raise the offline flag on transport errors.
    pub fn commit_failure(&mut self, err: &LobbyError) {
        if err.is_offline() {
            if !self.offline {
                log::warn!("[poll] offline: {}", err);
            }
            self.offline = true;
        } else {
            log::warn!("[poll] {}", err);
        }
    }
}
