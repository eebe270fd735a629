//! Vanity configuration: the complete set of user selections.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::MAX_SIXTEENTHS;

/// A measurement in whole inches plus sixteenths.
///
/// The fractional part is priced in quarter inches: sixteenths are floored
/// to the nearest quarter (0, 1/4, 1/2, 3/4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimension {
    pub inches: u16,
    #[serde(default)]
    pub sixteenths: u8,
}

impl Dimension {
    pub const fn new(inches: u16, sixteenths: u8) -> Self {
        Self { inches, sixteenths }
    }

    /// Split a decimal inch value into inches and sixteenths.
    pub fn from_inches(value: f64) -> Self {
        let value = value.max(0.0);
        let inches = value.trunc();
        let sixteenths = ((value - inches) * 16.0).round().min(MAX_SIXTEENTHS as f64);
        Self::new(inches as u16, sixteenths as u8)
    }

    /// Number of whole quarters in the fractional part.
    pub fn quarters(&self) -> u8 {
        self.sixteenths.min(MAX_SIXTEENTHS) / 4
    }

    /// Decimal inches with the fraction coerced to quarters.
    pub fn to_inches(&self) -> f64 {
        self.inches as f64 + self.quarters() as f64 * 0.25
    }

    /// Decimal feet.
    pub fn to_feet(&self) -> f64 {
        self.to_inches() / 12.0
    }
}

impl From<u16> for Dimension {
    fn from(inches: u16) -> Self {
        Self::new(inches, 0)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quarters() {
            0 => write!(f, "{}\"", self.inches),
            1 => write!(f, "{} 1/4\"", self.inches),
            2 => write!(f, "{} 1/2\"", self.inches),
            _ => write!(f, "{} 3/4\"", self.inches),
        }
    }
}

/// Material and hardware brand catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    Tafisa,
    Egger,
    Shinnoki,
    Blum,
    Hafele,
}

impl Brand {
    pub const ALL: [Brand; 5] = [
        Brand::Tafisa,
        Brand::Egger,
        Brand::Shinnoki,
        Brand::Blum,
        Brand::Hafele,
    ];

    /// Catalog key (e.g. "hafele").
    pub fn key(&self) -> &'static str {
        match self {
            Brand::Tafisa => "tafisa",
            Brand::Egger => "egger",
            Brand::Shinnoki => "shinnoki",
            Brand::Blum => "blum",
            Brand::Hafele => "hafele",
        }
    }

    /// Parse a catalog key, case-insensitively.
    pub fn from_key(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.key().eq_ignore_ascii_case(s.trim()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Brand::Tafisa => "Tafisa",
            Brand::Egger => "Egger",
            Brand::Shinnoki => "Shinnoki",
            Brand::Blum => "Blum",
            Brand::Hafele => "Häfele",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Cabinet door style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DoorStyle {
    #[default]
    Shaker,
    FlatPanel,
    RaisedPanel,
    Beadboard,
    Double,
    Single,
    Drawers,
}

impl DoorStyle {
    /// Rate table key (e.g. "flat-panel").
    pub fn key(&self) -> &'static str {
        match self {
            DoorStyle::Shaker => "shaker",
            DoorStyle::FlatPanel => "flat-panel",
            DoorStyle::RaisedPanel => "raised-panel",
            DoorStyle::Beadboard => "beadboard",
            DoorStyle::Double => "double",
            DoorStyle::Single => "single",
            DoorStyle::Drawers => "drawers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DoorStyle::Shaker => "Shaker",
            DoorStyle::FlatPanel => "Flat Panel",
            DoorStyle::RaisedPanel => "Raised Panel",
            DoorStyle::Beadboard => "Beadboard",
            DoorStyle::Double => "Double Door",
            DoorStyle::Single => "Single Door",
            DoorStyle::Drawers => "All Drawers",
        }
    }

    /// Number of doors fitted on a cabinet of the given width.
    ///
    /// Panel styles switch from one to two doors above 30 inches.
    pub fn door_count(&self, width_inches: f64) -> u8 {
        match self {
            DoorStyle::Drawers => 0,
            DoorStyle::Single => 1,
            DoorStyle::Double => 2,
            _ if width_inches > 30.0 => 2,
            _ => 1,
        }
    }
}

/// Door and drawer pull style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandleStyle {
    None,
    #[default]
    Bar,
    Knob,
    Cup,
    EdgePull,
    Recessed,
}

impl HandleStyle {
    /// Rate table key (e.g. "edge-pull").
    pub fn key(&self) -> &'static str {
        match self {
            HandleStyle::None => "none",
            HandleStyle::Bar => "bar",
            HandleStyle::Knob => "knob",
            HandleStyle::Cup => "cup",
            HandleStyle::EdgePull => "edge-pull",
            HandleStyle::Recessed => "recessed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HandleStyle::None => "None",
            HandleStyle::Bar => "Bar Pull",
            HandleStyle::Knob => "Knob",
            HandleStyle::Cup => "Cup Pull",
            HandleStyle::EdgePull => "Edge Pull",
            HandleStyle::Recessed => "Recessed",
        }
    }
}

/// How the cabinet is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CabinetPosition {
    #[default]
    FloorMounted,
    WallMounted,
}

impl CabinetPosition {
    pub fn label(&self) -> &'static str {
        match self {
            CabinetPosition::FloorMounted => "Floor Mounted",
            CabinetPosition::WallMounted => "Wall Mounted",
        }
    }
}

/// Countertop and sink selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountertopSelection {
    pub material: String,
    pub edge_profile: String,
    pub color: String,
    pub sink_style: Option<String>,
    pub sink_shape: Option<String>,
}

/// Style or finish chosen for a single fixture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixtureSelection {
    pub style: String,
}

impl FixtureSelection {
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
        }
    }
}

/// Kinds of bathroom fixtures that can be added to a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureKind {
    Toilet,
    Shower,
    Bathtub,
    Mirror,
    Faucet,
    Backsplash,
}

impl FixtureKind {
    pub fn key(&self) -> &'static str {
        match self {
            FixtureKind::Toilet => "toilet",
            FixtureKind::Shower => "shower",
            FixtureKind::Bathtub => "bathtub",
            FixtureKind::Mirror => "mirror",
            FixtureKind::Faucet => "faucet",
            FixtureKind::Backsplash => "backsplash",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FixtureKind::Toilet => "Toilet",
            FixtureKind::Shower => "Shower",
            FixtureKind::Bathtub => "Bathtub",
            FixtureKind::Mirror => "Mirror",
            FixtureKind::Faucet => "Faucet",
            FixtureKind::Backsplash => "Backsplash",
        }
    }
}

/// Optional fixtures; `None` means not included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub toilet: Option<FixtureSelection>,
    pub shower: Option<FixtureSelection>,
    pub bathtub: Option<FixtureSelection>,
    pub mirror: Option<FixtureSelection>,
    pub faucet: Option<FixtureSelection>,
    pub backsplash: Option<FixtureSelection>,
}

impl Fixtures {
    /// Included fixtures in a fixed order.
    pub fn selected(&self) -> Vec<(FixtureKind, &FixtureSelection)> {
        [
            (FixtureKind::Toilet, &self.toilet),
            (FixtureKind::Shower, &self.shower),
            (FixtureKind::Bathtub, &self.bathtub),
            (FixtureKind::Mirror, &self.mirror),
            (FixtureKind::Faucet, &self.faucet),
            (FixtureKind::Backsplash, &self.backsplash),
        ]
        .into_iter()
        .filter_map(|(kind, sel)| sel.as_ref().map(|s| (kind, s)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.selected().is_empty()
    }
}

/// The complete user selection for one vanity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct VanityConfiguration {
    pub width: Dimension,
    pub height: Dimension,
    pub depth: Dimension,

    pub brand: Brand,
    pub finish: String,

    pub door_style: DoorStyle,
    pub num_drawers: u8,
    pub handle_style: HandleStyle,
    pub cabinet_position: CabinetPosition,

    pub countertop: Option<CountertopSelection>,

    pub include_room: bool,
    /// Room length in inches.
    pub room_length: u32,
    /// Room width in inches.
    pub room_width: u32,
    pub floor_tile_style: String,

    pub fixtures: Fixtures,

    pub zip_code: Option<String>,
    pub state: Option<String>,
}

impl Default for VanityConfiguration {
    fn default() -> Self {
        Self {
            width: Dimension::new(36, 0),
            height: Dimension::new(34, 8),
            depth: Dimension::new(21, 0),
            brand: Brand::Tafisa,
            finish: "white".to_string(),
            door_style: DoorStyle::Shaker,
            num_drawers: 0,
            handle_style: HandleStyle::Bar,
            cabinet_position: CabinetPosition::FloorMounted,
            countertop: None,
            include_room: false,
            room_length: 0,
            room_width: 0,
            floor_tile_style: String::new(),
            fixtures: Fixtures::default(),
            zip_code: None,
            state: None,
        }
    }
}

impl VanityConfiguration {
    /// Parse a configuration from JSON; missing fields take defaults.
    pub fn from_json(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Overall size as "W x H x D".
    pub fn size_label(&self) -> String {
        format!("{} W x {} H x {} D", self.width, self.height, self.depth)
    }

    /// Human-readable label/value rows describing the selection.
    pub fn detail_rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Dimensions".to_string(), self.size_label()),
            ("Brand".to_string(), self.brand.label().to_string()),
            ("Finish".to_string(), title_case(&self.finish)),
            ("Door Style".to_string(), self.door_style.label().to_string()),
            ("Drawers".to_string(), self.num_drawers.to_string()),
            ("Handles".to_string(), self.handle_style.label().to_string()),
            (
                "Mounting".to_string(),
                self.cabinet_position.label().to_string(),
            ),
        ];

        if let Some(top) = &self.countertop {
            rows.push((
                "Countertop".to_string(),
                format!(
                    "{} ({}), {} edge",
                    title_case(&top.material),
                    title_case(&top.color),
                    title_case(&top.edge_profile)
                ),
            ));
            if let Some(style) = &top.sink_style {
                let shape = top
                    .sink_shape
                    .as_deref()
                    .map(title_case)
                    .unwrap_or_else(|| "Standard".to_string());
                rows.push(("Sink".to_string(), format!("{} {}", title_case(style), shape)));
            }
        }

        if self.include_room {
            rows.push((
                "Room".to_string(),
                format!("{}\" x {}\"", self.room_length, self.room_width),
            ));
            rows.push(("Floor Tile".to_string(), title_case(&self.floor_tile_style)));
        }

        for (kind, selection) in self.fixtures.selected() {
            rows.push((kind.label().to_string(), title_case(&selection.style)));
        }

        if let Some(zip) = &self.zip_code {
            rows.push(("Zip Code".to_string(), zip.clone()));
        } else if let Some(state) = &self.state {
            rows.push(("State".to_string(), state.to_uppercase()));
        }

        rows
    }
}

/// Turn a catalog key like "natural-oak" into "Natural Oak".
pub fn title_case(key: &str) -> String {
    key.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
