//! Plots and the three-plot garden owned by each player.
//!
//! A garden is always exactly [`PLOT_COUNT`] plots, stored in position
//! order. The persisted form is a compact delimited string handled by the
//! codec in `petgarden-garden`; everything here is the decoded shape.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::ids::SeedTypeId;

/// Number of plots in every garden.
pub const PLOT_COUNT: usize = 3;

/// Palette value of an unplanted (or uncolored) plot.
pub const DEFAULT_COLOR: &str = "black";

/// Seed type value persisted for an empty plot.
pub const EMPTY_SEED: i32 = -1;

// ---------------------------------------------------------------------------
// PlotPosition
// ---------------------------------------------------------------------------

/// Index of a plot within a garden, guaranteed to be `0`, `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlotPosition(u8);

impl PlotPosition {
    /// All positions in storage order.
    pub const ALL: [Self; PLOT_COUNT] = [Self(0), Self(1), Self(2)];

    /// Validate a raw plot index.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < PLOT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Validate a plot index parsed from untrusted input of any width.
    pub fn from_raw(index: i64) -> Option<Self> {
        u8::try_from(index).ok().and_then(Self::new)
    }

    /// The raw index.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for PlotPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u8::deserialize(deserializer)?;
        Self::new(index).ok_or_else(|| {
            serde::de::Error::custom(format!("plot position out of range: {index}"))
        })
    }
}

impl From<PlotPosition> for u8 {
    fn from(position: PlotPosition) -> Self {
        position.0
    }
}

impl core::fmt::Display for PlotPosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PlotColor
// ---------------------------------------------------------------------------

/// A palette color assigned to a planted seed.
///
/// Non-default colors select a color-qualified variant of the seed's asset
/// when matching capture requirements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlotColor(String);

impl PlotColor {
    /// Wrap a palette value.
    pub fn new(color: impl Into<String>) -> Self {
        Self(color.into())
    }

    /// The palette value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the default (uncolored) palette value.
    ///
    /// An empty string is treated as default so catalog entries may omit
    /// the color entirely.
    pub fn is_default(&self) -> bool {
        self.0.is_empty() || self.0 == DEFAULT_COLOR
    }
}

impl Default for PlotColor {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_owned())
    }
}

impl core::fmt::Display for PlotColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Plot
// ---------------------------------------------------------------------------

/// One planting slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Plot {
    /// Slot index within the garden.
    pub position: PlotPosition,
    /// Palette color rolled at planting time.
    pub color: PlotColor,
    /// Seed type growing here, `None` when empty.
    pub seed_type_id: Option<SeedTypeId>,
    /// Unix seconds when the seed was planted, `0` when empty.
    pub planted_at: i64,
    /// Unix seconds of the last garden visit while occupied, `0` if never.
    pub prior_check_at: i64,
    /// Whether the plot holds a live planting.
    pub active: bool,
}

impl Plot {
    /// The canonical empty plot at `position`.
    pub fn empty(position: PlotPosition) -> Self {
        Self {
            position,
            color: PlotColor::default(),
            seed_type_id: None,
            planted_at: 0,
            prior_check_at: 0,
            active: false,
        }
    }

    /// Whether no seed is planted here.
    pub const fn is_empty(&self) -> bool {
        self.seed_type_id.is_none()
    }

    /// Whether the plot is byte-for-byte the canonical empty default.
    pub fn is_default(&self) -> bool {
        *self == Self::empty(self.position)
    }
}

// ---------------------------------------------------------------------------
// Garden
// ---------------------------------------------------------------------------

/// The three plots owned by one player, in position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Garden {
    plots: [Plot; PLOT_COUNT],
}

impl Garden {
    /// A garden with every plot reset to the empty default.
    pub fn empty() -> Self {
        let [a, b, c] = PlotPosition::ALL;
        Self {
            plots: [Plot::empty(a), Plot::empty(b), Plot::empty(c)],
        }
    }

    /// Build a garden from plots already in position order.
    ///
    /// Each plot's `position` is overwritten with its slot index so the
    /// ordering invariant cannot be broken by the caller.
    pub fn from_plots(plots: [Plot; PLOT_COUNT]) -> Self {
        let mut garden = Self { plots };
        for (plot, position) in garden.plots.iter_mut().zip(PlotPosition::ALL) {
            plot.position = position;
        }
        garden
    }

    /// The plot at `position`.
    pub const fn plot(&self, position: PlotPosition) -> &Plot {
        let [first, second, third] = &self.plots;
        match position.0 {
            0 => first,
            1 => second,
            _ => third,
        }
    }

    /// Mutable access to the plot at `position`.
    pub const fn plot_mut(&mut self, position: PlotPosition) -> &mut Plot {
        let [first, second, third] = &mut self.plots;
        match position.0 {
            0 => first,
            1 => second,
            _ => third,
        }
    }

    /// Iterate plots in position order.
    pub fn plots(&self) -> impl Iterator<Item = &Plot> {
        self.plots.iter()
    }

    /// Iterate plots mutably in position order.
    pub fn plots_mut(&mut self) -> impl Iterator<Item = &mut Plot> {
        self.plots.iter_mut()
    }

    /// Iterate plots that currently hold a seed.
    pub fn occupied(&self) -> impl Iterator<Item = &Plot> {
        self.plots.iter().filter(|plot| !plot.is_empty())
    }

    /// Whether every plot holds a seed.
    pub fn is_full(&self) -> bool {
        self.plots.iter().all(|plot| !plot.is_empty())
    }

    /// Reset the plot at `position` to the empty default.
    pub fn reset(&mut self, position: PlotPosition) {
        *self.plot_mut(position) = Plot::empty(position);
    }
}

impl Default for Garden {
    fn default() -> Self {
        Self::empty()
    }
}
