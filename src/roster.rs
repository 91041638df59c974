//! Entrants: identity and display data owned outside the simulation
//!
//! The simulation holds a clone of each [`Entrant`] and only ever reads it.
//! Flag images arrive asynchronously after registration, so the image
//! reference is a shared single-assignment slot that can be filled at any
//! point between ticks.

use std::sync::{Arc, OnceLock};

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Palette entrants draw their display colour from
pub const PALETTE: [u32; 10] = [
    0xEF_44_44, // red
    0xF9_73_16, // orange
    0xEA_B3_08, // yellow
    0x22_C5_5E, // green
    0x14_B8_A6, // teal
    0x3B_82_F6, // blue
    0x63_66_F1, // indigo
    0xA8_55_F7, // purple
    0xEC_48_99, // pink
    0x64_74_8B, // slate
];

/// Quick-add bot entrants (display name, ISO code)
pub const QUICK_ADD: [(&str, &str); 8] = [
    ("USA", "us"),
    ("CANADA", "ca"),
    ("UK", "gb"),
    ("FRANCE", "fr"),
    ("GERMANY", "de"),
    ("JAPAN", "jp"),
    ("BRAZIL", "br"),
    ("AUSTRALIA", "au"),
];

/// Renderer-side key of a loaded image (e.g. the URL it was fetched from)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageKey(pub String);

/// Late-bound image reference, written at most once and shared by every
/// clone of the owning entrant.
#[derive(Debug, Clone, Default)]
pub struct ImageSlot(Arc<OnceLock<ImageKey>>);

impl ImageSlot {
    /// Store the loaded image. Returns false if one was already stored.
    pub fn fulfill(&self, key: ImageKey) -> bool {
        self.0.set(key).is_ok()
    }

    pub fn get(&self) -> Option<&ImageKey> {
        self.0.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.0.get().is_some()
    }
}

/// One contest participant's identity/display record
#[derive(Debug, Clone, Serialize)]
pub struct Entrant {
    pub id: u32,
    pub name: String,
    /// ISO 3166-1 alpha-2 country code
    pub code: String,
    /// 0xRRGGBB
    pub color: u32,
    #[serde(skip)]
    pub image: ImageSlot,
}

impl Entrant {
    pub fn new(id: u32, name: impl Into<String>, code: impl Into<String>, color: u32) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
            color,
            image: ImageSlot::default(),
        }
    }

    /// Where the flag image for this entrant is fetched from
    pub fn flag_url(&self) -> String {
        format!("https://flagcdn.com/w160/{}.png", self.code.to_lowercase())
    }
}

impl PartialEq for Entrant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entrant {}

/// Ordered list of registered entrants
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entrants: Vec<Entrant>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            entrants: Vec::new(),
            next_id: 1,
        }
    }

    /// Register an entrant with a random palette colour, returning its id.
    /// Name/country validation is the caller's job.
    pub fn add<R: Rng + ?Sized>(&mut self, name: &str, code: &str, rng: &mut R) -> u32 {
        let color = PALETTE.choose(rng).copied().unwrap_or(PALETTE[0]);
        self.add_with_color(name, code, color)
    }

    pub fn add_with_color(&mut self, name: &str, code: &str, color: u32) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.entrants.push(Entrant::new(id, name.trim(), code, color));
        log::info!("Entrant #{} joined: {} ({})", id, name.trim(), code);
        id
    }

    /// Register a random bot from the quick-add list
    pub fn quick_add<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let (name, code) = QUICK_ADD.choose(rng).copied().unwrap_or(QUICK_ADD[0]);
        self.add(name, code, rng)
    }

    /// Hand a loaded image to an entrant. False if the id is unknown or the
    /// entrant already has one.
    pub fn attach_image(&self, id: u32, key: ImageKey) -> bool {
        self.get(id).is_some_and(|e| e.image.fulfill(key))
    }

    pub fn get(&self, id: u32) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.id == id)
    }

    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    /// Whether a contest can start with this roster
    pub fn is_ready(&self) -> bool {
        self.entrants.len() >= 2
    }
}
