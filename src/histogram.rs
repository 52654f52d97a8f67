//! Named HSV histogram bins.
//!
//! Each bin of a per-frame HSV histogram is identified by a name that embeds
//! the bin's left edge, e.g. `sat_bin_10.2`. [`encode`] produces those names
//! for a uniform partition of a channel's range and [`decode`] turns a name
//! back into the exact edge it was built from. Weighted saturation and value
//! averages are computed from decoded edges, so a name that cannot be decoded
//! is always an error rather than a silently substituted default.
//!
//! # Example
//!
//! ```
//! use scene_features::histogram::{decode, encode, Channel};
//!
//! let bins = encode(Channel::Saturation, 25, 255.0);
//! assert_eq!(bins.len(), 25);
//! assert_eq!(bins[1].name, "sat_bin_10.2");
//! assert_eq!(decode(&bins[1].name)?, bins[1].lower_edge);
//! # Ok::<(), scene_features::FeatureError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// An HSV colour channel that carries a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Hue, stored over `[0, 180)`.
    Hue,
    /// Saturation, stored over `[0, 255)`.
    Saturation,
    /// Value (brightness), stored over `[0, 255)`.
    Value,
}

impl Channel {
    const ALL: [Channel; 3] = [Channel::Hue, Channel::Saturation, Channel::Value];

    /// The bin-name prefix for this channel.
    pub fn prefix(self) -> &'static str {
        match self {
            Channel::Hue => "hue_bin_",
            Channel::Saturation => "sat_bin_",
            Channel::Value => "val_bin_",
        }
    }

    /// Identify the channel a bin name belongs to, if its prefix is known.
    pub fn from_bin_name(name: &str) -> Option<Channel> {
        Channel::ALL
            .into_iter()
            .find(|channel| name.starts_with(channel.prefix()))
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Channel::Hue => write!(f, "hue"),
            Channel::Saturation => write!(f, "saturation"),
            Channel::Value => write!(f, "value"),
        }
    }
}

/// A bin name together with the left edge it encodes.
#[derive(Debug, Clone, PartialEq)]
pub struct BinDescriptor {
    /// Bin name, e.g. `hue_bin_2.5`.
    pub name: String,
    /// Left edge of the bin.
    pub lower_edge: f64,
}

/// Build the named bins for a uniform partition of `[0, max_value)`.
///
/// Edge `i` is `i × max_value / bin_count`. The edge is written with the
/// shortest decimal representation that parses back to the same `f64`, so
/// [`decode`] is exact for every name produced here. A `bin_count` of zero
/// yields no bins.
pub fn encode(channel: Channel, bin_count: usize, max_value: f64) -> Vec<BinDescriptor> {
    (0..bin_count)
        .map(|index| {
            let lower_edge = index as f64 * max_value / bin_count as f64;
            BinDescriptor {
                name: format!("{}{}", channel.prefix(), lower_edge),
                lower_edge,
            }
        })
        .collect()
}

/// Decode a bin name back into its left edge.
///
/// Fails with [`FeatureError::MalformedBinName`] when the prefix is not one
/// of the known channel prefixes, or when the suffix is not a finite,
/// non-negative number.
pub fn decode(name: &str) -> Result<f64, FeatureError> {
    let malformed = || FeatureError::MalformedBinName(name.to_string());

    let channel = Channel::from_bin_name(name).ok_or_else(malformed)?;
    let suffix = &name[channel.prefix().len()..];
    if suffix.is_empty() || !suffix.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(malformed());
    }

    let edge: f64 = suffix.parse().map_err(|_| malformed())?;
    if !edge.is_finite() {
        return Err(malformed());
    }
    Ok(edge)
}

/// Decode a bin name that must belong to `channel`.
///
/// A well-formed name from another channel is a
/// [`FeatureError::MalformedBinName`] as well.
pub fn decode_channel(channel: Channel, name: &str) -> Result<f64, FeatureError> {
    if Channel::from_bin_name(name) != Some(channel) {
        return Err(FeatureError::MalformedBinName(name.to_string()));
    }
    decode(name)
}

/// Bin layout for one channel of the frame-quality schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramSpec {
    /// Channel the histogram describes.
    pub channel: Channel,
    /// Number of equal-width bins.
    pub bin_count: usize,
    /// Exclusive upper bound of the channel range.
    pub max_value: f64,
}

impl HistogramSpec {
    /// 72 hue bins over `[0, 180)`.
    pub const HUE: HistogramSpec = HistogramSpec {
        channel: Channel::Hue,
        bin_count: 72,
        max_value: 180.0,
    };

    /// 25 saturation bins over `[0, 255)`.
    pub const SATURATION: HistogramSpec = HistogramSpec {
        channel: Channel::Saturation,
        bin_count: 25,
        max_value: 255.0,
    };

    /// 25 value bins over `[0, 255)`.
    pub const VALUE: HistogramSpec = HistogramSpec {
        channel: Channel::Value,
        bin_count: 25,
        max_value: 255.0,
    };

    /// Named bins for this layout.
    pub fn encode(&self) -> Vec<BinDescriptor> {
        encode(self.channel, self.bin_count, self.max_value)
    }
}

/// One named histogram bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Bin name encoding the left edge.
    pub name: String,
    /// Number of pixels that fell in the bin.
    pub count: u64,
}

/// A per-frame histogram for one channel, in bin order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram {
    /// Buckets in ascending edge order.
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Pair a layout's bin names with counts.
    ///
    /// Extra counts beyond the layout's bin count are dropped; missing
    /// counts are treated as zero.
    pub fn from_counts(spec: &HistogramSpec, counts: &[u64]) -> Self {
        let bins = spec
            .encode()
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| HistogramBin {
                name: descriptor.name,
                count: counts.get(index).copied().unwrap_or(0),
            })
            .collect();
        Self { bins }
    }

    /// Total count across all bins, accumulated as `f64` so arbitrarily
    /// large counts cannot overflow.
    pub fn total(&self) -> f64 {
        self.bins.iter().map(|bin| bin.count as f64).sum()
    }

    /// Sum of `count × edge` over all bins of a `channel` histogram.
    ///
    /// Every bin name is decoded with [`decode_channel`]; the first name that
    /// is malformed or belongs to another channel aborts the sum.
    pub fn weighted_edge_sum(&self, channel: Channel) -> Result<f64, FeatureError> {
        self.bins
            .iter()
            .try_fold(0.0, |sum, bin| -> Result<f64, FeatureError> {
                Ok(sum + bin.count as f64 * decode_channel(channel, &bin.name)?)
            })
    }
}
