//! Compact string encoding of a garden.
//!
//! The persisted form is three plot segments joined by `|`, each segment six
//! fields joined by `~`:
//!
//! ```text
//! position~color~seedTypeId~plantedAt~priorCheckAt~active
//! 0~black~-1~0~0~0|1~red~204~1690000000~1690000500~1|2~black~-1~0~0~0
//! ```
//!
//! The format is shared with existing player records and must stay
//! bit-exact. Decoding never fails: a missing or malformed segment becomes
//! the empty default plot at that position. [`decode_checked`] reports how
//! many segments were normalized so callers can flag corrupted records.
//!
//! Integers must be written canonically (no sign prefix on positives, no
//! leading zeros, no `-0`), so every segment that decodes cleanly encodes
//! back to the same bytes.

use std::str::FromStr;

use petgarden_types::{EMPTY_SEED, Garden, Plot, PlotColor, PlotPosition, SeedTypeId};

/// Separator between plot segments.
pub const PLOT_DELIMITER: char = '|';

/// Separator between fields within a segment.
pub const FIELD_DELIMITER: char = '~';

/// What decoding had to throw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Plot positions that fell back to the empty default because their
    /// segment was missing or malformed.
    pub normalized_segments: usize,
    /// Segments beyond the third, ignored.
    pub extra_segments: usize,
}

impl DecodeReport {
    /// Whether the input decoded without loss.
    pub const fn is_clean(&self) -> bool {
        self.normalized_segments == 0 && self.extra_segments == 0
    }
}

/// Decode a persisted garden, normalizing anything malformed.
///
/// `None` and the empty string both yield three empty plots.
pub fn decode(raw: Option<&str>) -> Garden {
    decode_checked(raw).0
}

/// Decode a persisted garden and report what was normalized.
///
/// A `None` or empty input is the legitimate default for a new account and
/// reports clean.
pub fn decode_checked(raw: Option<&str>) -> (Garden, DecodeReport) {
    let mut garden = Garden::empty();
    let mut report = DecodeReport::default();

    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return (garden, report);
    };

    let mut segments = raw.split(PLOT_DELIMITER);
    for position in PlotPosition::ALL {
        let Some(plot) = segments
            .next()
            .and_then(|segment| parse_segment(segment, position))
        else {
            report.normalized_segments = report.normalized_segments.saturating_add(1);
            continue;
        };
        *garden.plot_mut(position) = plot;
    }
    report.extra_segments = segments.count();

    (garden, report)
}

/// Encode a garden into its persisted form, positions 0, 1, 2 in order.
pub fn encode(garden: &Garden) -> String {
    garden
        .plots()
        .map(encode_plot)
        .collect::<Vec<_>>()
        .join(&PLOT_DELIMITER.to_string())
}

/// Encode a single plot segment.
pub fn encode_plot(plot: &Plot) -> String {
    let seed = plot.seed_type_id.map_or(EMPTY_SEED, SeedTypeId::into_inner);
    format!(
        "{position}{d}{color}{d}{seed}{d}{planted}{d}{prior}{d}{active}",
        position = plot.position,
        color = plot.color,
        planted = plot.planted_at,
        prior = plot.prior_check_at,
        active = u8::from(plot.active),
        d = FIELD_DELIMITER,
    )
}

/// Parse one segment, or `None` if any field is malformed.
///
/// The segment's own position field must agree with the slot it occupies.
fn parse_segment(segment: &str, position: PlotPosition) -> Option<Plot> {
    let fields: Vec<&str> = segment.split(FIELD_DELIMITER).collect();
    let &[raw_position, color, seed, planted_at, prior_check_at, active] = fields.as_slice()
    else {
        return None;
    };

    if parse_canonical::<u8>(raw_position)? != position.get() {
        return None;
    }
    if color.is_empty() {
        return None;
    }

    let seed_type_id = match parse_canonical::<i32>(seed)? {
        EMPTY_SEED => None,
        id if id >= 0 => Some(SeedTypeId(id)),
        _ => return None,
    };

    let active = match active {
        "0" => false,
        "1" => true,
        _ => return None,
    };

    Some(Plot {
        position,
        color: PlotColor::new(color),
        seed_type_id,
        planted_at: parse_canonical(planted_at)?,
        prior_check_at: parse_canonical(prior_check_at)?,
        active,
    })
}

/// Parse an integer field that is written exactly as it would be encoded.
fn parse_canonical<T: FromStr + ToString>(field: &str) -> Option<T> {
    let value = field.parse::<T>().ok()?;
    (value.to_string() == field).then_some(value)
}
