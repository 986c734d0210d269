//! Canonical color table and color resolution strategies.
//!
//! Upstream color signals come in three shapes: a per-event provider color
//! id, a per-calendar provider color id or legacy background hex, and an
//! optional server-side palette. Resolution maps any combination of those to
//! one canonical `(name, hex)` pair. Three strategies exist behind one
//! trait; [`SnapResolver`] is the canonical one.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Canonical semantic color names. Closed enumeration; each name binds to
/// exactly one reference hex in [`EVENT_COLORS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    Cocoa,
    Flamingo,
    Tomato,
    Tangerine,
    Pumpkin,
    Mango,
    Eucalyptus,
    Basil,
    Pistachio,
    Avocado,
    Citron,
    Banana,
    Sage,
    Peacock,
    Cobalt,
    Blueberry,
    Lavender,
    Wisteria,
    Graphite,
    Birch,
    Radicchio,
    Cherry,
    Grape,
    Amethyst,
    Default,
}

impl EventColor {
    pub fn name(self) -> &'static str {
        config_for(self).name
    }
}

/// One entry of the canonical color table.
///
/// `google_color_id` is the provider's small-integer event color id where
/// one exists; the provider supports far fewer built-in ids than the table
/// has names.
#[derive(Debug, Clone, Copy)]
pub struct EventColorConfig {
    pub id: u8,
    pub color: EventColor,
    pub name: &'static str,
    pub hex: &'static str,
    pub google_color_id: Option<&'static str>,
}

impl EventColorConfig {
    fn resolved(&self) -> ResolvedColor {
        ResolvedColor { name: self.color, hex: self.hex.to_string() }
    }
}

/// Canonical color table. Iteration order is part of the contract: the
/// nearest-color search breaks distance ties by first match in this order,
/// so entries must stay in id order with `default` last.
pub const EVENT_COLORS: [EventColorConfig; 25] = [
    EventColorConfig { id: 1, color: EventColor::Cocoa, name: "cocoa", hex: "#795548", google_color_id: None },
    EventColorConfig { id: 2, color: EventColor::Flamingo, name: "flamingo", hex: "#e67c73", google_color_id: Some("4") },
    EventColorConfig { id: 3, color: EventColor::Tomato, name: "tomato", hex: "#d50000", google_color_id: Some("11") },
    EventColorConfig { id: 4, color: EventColor::Tangerine, name: "tangerine", hex: "#f4511e", google_color_id: Some("6") },
    EventColorConfig { id: 5, color: EventColor::Pumpkin, name: "pumpkin", hex: "#ef6c00", google_color_id: None },
    EventColorConfig { id: 6, color: EventColor::Mango, name: "mango", hex: "#f09300", google_color_id: None },
    EventColorConfig { id: 7, color: EventColor::Eucalyptus, name: "eucalyptus", hex: "#009688", google_color_id: None },
    EventColorConfig { id: 8, color: EventColor::Basil, name: "basil", hex: "#0b8043", google_color_id: Some("10") },
    EventColorConfig { id: 9, color: EventColor::Pistachio, name: "pistachio", hex: "#7cb342", google_color_id: None },
    EventColorConfig { id: 10, color: EventColor::Avocado, name: "avocado", hex: "#c0ca33", google_color_id: None },
    EventColorConfig { id: 11, color: EventColor::Citron, name: "citron", hex: "#e4c441", google_color_id: None },
    EventColorConfig { id: 12, color: EventColor::Banana, name: "banana", hex: "#f6bf26", google_color_id: Some("5") },
    EventColorConfig { id: 13, color: EventColor::Sage, name: "sage", hex: "#33b679", google_color_id: Some("2") },
    EventColorConfig { id: 14, color: EventColor::Peacock, name: "peacock", hex: "#039be5", google_color_id: Some("7") },
    EventColorConfig { id: 15, color: EventColor::Cobalt, name: "cobalt", hex: "#4285f4", google_color_id: None },
    EventColorConfig { id: 16, color: EventColor::Blueberry, name: "blueberry", hex: "#3f51b5", google_color_id: Some("9") },
    EventColorConfig { id: 17, color: EventColor::Lavender, name: "lavender", hex: "#7986cb", google_color_id: Some("1") },
    EventColorConfig { id: 18, color: EventColor::Wisteria, name: "wisteria", hex: "#b39ddb", google_color_id: None },
    EventColorConfig { id: 19, color: EventColor::Graphite, name: "graphite", hex: "#616161", google_color_id: Some("8") },
    EventColorConfig { id: 20, color: EventColor::Birch, name: "birch", hex: "#a79b8e", google_color_id: None },
    EventColorConfig { id: 21, color: EventColor::Radicchio, name: "radicchio", hex: "#ad1457", google_color_id: None },
    EventColorConfig { id: 22, color: EventColor::Cherry, name: "cherry", hex: "#d81b60", google_color_id: None },
    EventColorConfig { id: 23, color: EventColor::Grape, name: "grape", hex: "#8e24aa", google_color_id: Some("3") },
    EventColorConfig { id: 24, color: EventColor::Amethyst, name: "amethyst", hex: "#9e69af", google_color_id: None },
    EventColorConfig { id: 25, color: EventColor::Default, name: "default", hex: "#4285f4", google_color_id: None },
];

/// Legacy calendar background hex to canonical name. Older accounts still
/// report these hexes on the calendar list instead of a color id.
pub const LEGACY_CALENDAR_COLORS: [(&str, EventColor); 25] = [
    ("#ac725e", EventColor::Cocoa),
    ("#d06b64", EventColor::Flamingo),
    ("#f83a22", EventColor::Tomato),
    ("#fa573c", EventColor::Tangerine),
    ("#ff7537", EventColor::Pumpkin),
    ("#ffad46", EventColor::Mango),
    ("#42d692", EventColor::Eucalyptus),
    ("#16a765", EventColor::Basil),
    ("#7bd148", EventColor::Pistachio),
    ("#b3dc6c", EventColor::Avocado),
    ("#fbe983", EventColor::Citron),
    ("#fad165", EventColor::Banana),
    ("#92e1c0", EventColor::Sage),
    ("#9fe1e7", EventColor::Peacock),
    ("#9fc6e7", EventColor::Cobalt),
    ("#4986e7", EventColor::Blueberry),
    ("#9a9cff", EventColor::Lavender),
    ("#b99aff", EventColor::Wisteria),
    ("#c2c2c2", EventColor::Graphite),
    ("#cabdbf", EventColor::Birch),
    ("#cca6ac", EventColor::Radicchio),
    ("#f691b2", EventColor::Cherry),
    ("#cd74e6", EventColor::Grape),
    ("#a47ae2", EventColor::Amethyst),
    // Teal variant seen on some accounts
    ("#007b83", EventColor::Eucalyptus),
];

/// Table entry for a canonical name.
pub fn config_for(color: EventColor) -> &'static EventColorConfig {
    // The table covers every variant; default is a safe terminal fallback.
    EVENT_COLORS
        .iter()
        .find(|c| c.color == color)
        .unwrap_or(&EVENT_COLORS[24])
}

/// Reverse lookup from the provider's event color id space.
pub fn by_google_color_id(id: &str) -> Option<&'static EventColorConfig> {
    EVENT_COLORS.iter().find(|c| c.google_color_id == Some(id))
}

fn legacy_lookup(hex: &str) -> Option<EventColor> {
    LEGACY_CALENDAR_COLORS
        .iter()
        .find(|(legacy, _)| *legacy == hex)
        .map(|(_, color)| *color)
}

/// Decode `#rrggbb` (case-insensitive, leading `#` optional) to RGB.
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    // Byte slicing below needs char boundaries; non-ASCII input is rejected
    // here rather than trusted to fail hex parsing.
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(digits.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(digits.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(digits.get(4..6)?, 16).ok()?;
    Some([r, g, b])
}

/// Euclidean distance between two hex colors in RGB space.
///
/// Returns `None` when either hex fails to parse.
pub fn color_distance(a: &str, b: &str) -> Option<f64> {
    let [ar, ag, ab] = parse_hex(a)?;
    let [br, bg, bb] = parse_hex(b)?;
    let dr = f64::from(ar) - f64::from(br);
    let dg = f64::from(ag) - f64::from(bg);
    let db = f64::from(ab) - f64::from(bb);
    Some((dr * dr + dg * dg + db * db).sqrt())
}

/// Nearest canonical table entry by RGB distance.
///
/// Scans the full table in its documented order; on a distance tie the first
/// entry encountered wins. Returns `None` only for an unparseable input.
pub fn nearest_canonical(hex: &str) -> Option<&'static EventColorConfig> {
    let target = parse_hex(hex)?;
    let mut best: Option<(&'static EventColorConfig, f64)> = None;
    for config in &EVENT_COLORS {
        let Some(candidate) = parse_hex(config.hex) else { continue };
        let dr = f64::from(target[0]) - f64::from(candidate[0]);
        let dg = f64::from(target[1]) - f64::from(candidate[1]);
        let db = f64::from(target[2]) - f64::from(candidate[2]);
        let dist = (dr * dr + dg * dg + db * db).sqrt();
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((config, dist)),
        }
    }
    best.map(|(config, _)| config)
}

/// Color signal carried by a calendar-list entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarColorSignal {
    /// Provider color id in the calendar namespace.
    pub color_id: Option<String>,
    /// Legacy background hex, present on calendars without a usable id.
    pub background_color: Option<String>,
}

/// Outcome of color resolution. `hex` is the value actually rendered;
/// `name` is a best-effort label and may disagree for palette colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColor {
    pub name: EventColor,
    pub hex: String,
}

impl ResolvedColor {
    pub fn default_color() -> Self {
        config_for(EventColor::Default).resolved()
    }
}

/// Strategy interface over the competing resolution behaviors.
///
/// Resolution order is shared by all strategies: event color id first, then
/// the owning calendar's signal, then the default color. They differ in what
/// backs steps one and two and in how an unmapped calendar hex is treated.
pub trait ColorResolver: Send + Sync {
    fn resolve(
        &self,
        event_color_id: Option<&str>,
        calendar: Option<&CalendarColorSignal>,
    ) -> ResolvedColor;
}

fn resolve_calendar_hex(background: &str, snap: bool) -> ResolvedColor {
    let lower = background.to_ascii_lowercase();
    if let Some(color) = legacy_lookup(&lower) {
        return config_for(color).resolved();
    }
    if snap {
        if let Some(config) = nearest_canonical(&lower) {
            return config.resolved();
        }
        ResolvedColor::default_color()
    } else {
        // Custom calendar color, passed through verbatim.
        ResolvedColor { name: EventColor::Default, hex: lower }
    }
}

/// Canonical strategy: every output hex comes from the canonical table.
/// Unknown calendar hexes snap to the nearest canonical color.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapResolver;

impl ColorResolver for SnapResolver {
    fn resolve(
        &self,
        event_color_id: Option<&str>,
        calendar: Option<&CalendarColorSignal>,
    ) -> ResolvedColor {
        if let Some(config) = event_color_id.and_then(by_google_color_id) {
            return config.resolved();
        }
        if let Some(background) = calendar.and_then(|c| c.background_color.as_deref()) {
            return resolve_calendar_hex(background, true);
        }
        ResolvedColor::default_color()
    }
}

/// Alternative strategy preserving truly custom calendar colors: an unmapped
/// calendar hex is returned verbatim under the `default` label.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl ColorResolver for PassthroughResolver {
    fn resolve(
        &self,
        event_color_id: Option<&str>,
        calendar: Option<&CalendarColorSignal>,
    ) -> ResolvedColor {
        if let Some(config) = event_color_id.and_then(by_google_color_id) {
            return config.resolved();
        }
        if let Some(background) = calendar.and_then(|c| c.background_color.as_deref()) {
            return resolve_calendar_hex(background, false);
        }
        ResolvedColor::default_color()
    }
}

/// One entry of the server-side color palette.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PaletteEntry {
    pub background: String,
    pub foreground: String,
}

/// Dynamic palette fetched from the provider's colors endpoint: small
/// integer ids to colors, in separate event and calendar namespaces.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ColorPalette {
    #[serde(default)]
    pub event: HashMap<String, PaletteEntry>,
    #[serde(default)]
    pub calendar: HashMap<String, PaletteEntry>,
}

/// Strategy backed by a fetched [`ColorPalette`]. The palette hex is
/// authoritative; the semantic name is the nearest canonical label.
#[derive(Debug, Clone)]
pub struct PaletteResolver {
    palette: ColorPalette,
}

impl PaletteResolver {
    pub fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    fn from_palette_hex(hex: &str) -> ResolvedColor {
        let name = nearest_canonical(hex)
            .map(|c| c.color)
            .unwrap_or(EventColor::Default);
        ResolvedColor { name, hex: hex.to_ascii_lowercase() }
    }
}

impl ColorResolver for PaletteResolver {
    fn resolve(
        &self,
        event_color_id: Option<&str>,
        calendar: Option<&CalendarColorSignal>,
    ) -> ResolvedColor {
        if let Some(entry) = event_color_id.and_then(|id| self.palette.event.get(id)) {
            return Self::from_palette_hex(&entry.background);
        }
        if let Some(signal) = calendar {
            if let Some(entry) =
                signal.color_id.as_deref().and_then(|id| self.palette.calendar.get(id))
            {
                return Self::from_palette_hex(&entry.background);
            }
            if let Some(background) = signal.background_color.as_deref() {
                return resolve_calendar_hex(background, true);
            }
        }
        ResolvedColor::default_color()
    }
}

/// Which resolver a gateway should use. Selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorStrategyKind {
    #[default]
    Snap,
    Passthrough,
    /// Requires fetching the palette from the colors endpoint first.
    Palette,
}

impl ColorStrategyKind {
    /// Build the resolver this kind selects.
    ///
    /// `palette` is only consulted for [`ColorStrategyKind::Palette`]; with
    /// no palette fetched yet that strategy degrades to an empty palette,
    /// which resolves like snap's calendar-hex path.
    pub fn resolver(self, palette: Option<ColorPalette>) -> Arc<dyn ColorResolver> {
        match self {
            ColorStrategyKind::Snap => Arc::new(SnapResolver),
            ColorStrategyKind::Passthrough => Arc::new(PassthroughResolver),
            ColorStrategyKind::Palette => {
                Arc::new(PaletteResolver::new(palette.unwrap_or_default()))
            }
        }
    }
}
