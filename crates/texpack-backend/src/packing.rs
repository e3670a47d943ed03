//! Channel packing: combining PBR channels into engine-specific RGBA textures.
//!
//! Each export variant maps to a fixed list of [`PackedLayout`]s. A layout
//! names the output suffix and says, per output channel, which semantic
//! channel (and which component of it) to read and what to write when
//! that channel has no source. Packing never fails on a missing channel;
//! it degrades to the layout's defaults.
//!
//! | Variant | Output | R | G | B | A |
//! |---|---|---|---|---|---|
//! | Standard, VXM, Unlit | `_BR` | base.R | base.G | base.B | roughness.R |
//! | Standard, VXM, Unlit | `_MEO`* | metallic.R | avg(emission.RGB) | ao.R | 1 |
//! | Metal | `_BR` | base.R | base.G | base.B | metallic.R |
//! | Blend, Masked, MaskedVXM, UIO | `_BA` | base.R | base.G | base.B | base.A |
//! | Transparent | `_BR` | base.R | base.G | base.B | roughness.R |
//! | Transparent | `_MESA` | metallic.R | specular.R | avg(emission.RGB) | base.A |
//! | VXC | none | | | | |
//!
//! *only when metallic, emission or ao has a source.
//!
//! # Example
//!
//! ```
//! use texpack_backend::{Bitmap, Channel, ChannelSet};
//! use texpack_backend::packing::pack_variant;
//! use texpack_spec::SuffixVariant;
//!
//! let base = Bitmap::filled(4, 4, [0.8, 0.2, 0.1, 1.0]);
//! let mut channels = ChannelSet::new();
//! channels.set_borrowed(Channel::BaseColor, &base);
//!
//! let outputs = pack_variant(SuffixVariant::Metal, &channels, 4, 4).unwrap();
//! assert_eq!(outputs.len(), 1);
//! assert_eq!(outputs[0].suffix, "_BR");
//! ```

use serde::Serialize;
use texpack_spec::SuffixVariant;
use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::channels::{Channel, ChannelSet};

/// Color component to extract from a channel's bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorComponent {
    R,
    G,
    B,
    A,
}

impl ColorComponent {
    fn index(&self) -> usize {
        match self {
            ColorComponent::R => 0,
            ColorComponent::G => 1,
            ColorComponent::B => 2,
            ColorComponent::A => 3,
        }
    }
}

/// Source for one channel of a packed texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelSource {
    /// One component of a channel, or `default` if the channel is absent.
    Component {
        channel: Channel,
        component: ColorComponent,
        default: f32,
    },
    /// Unweighted mean of a channel's RGB, or `default` if absent. A
    /// grayscale bitmap yields its gray value.
    Average { channel: Channel, default: f32 },
    /// A fixed value.
    Constant(f32),
}

impl ChannelSource {
    pub const fn component(channel: Channel, component: ColorComponent, default: f32) -> Self {
        ChannelSource::Component {
            channel,
            component,
            default,
        }
    }

    pub const fn average(channel: Channel, default: f32) -> Self {
        ChannelSource::Average { channel, default }
    }
}

/// How consumers must interpret a packed texture's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    /// Color data, gamma encoded.
    Srgb,
    /// Linear data; must not be gamma-decoded.
    NonColor,
}

/// When a layout produces an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitPolicy {
    Always,
    /// Only if at least one of these channels has a source.
    AnyOf(&'static [Channel]),
}

/// Recipe for one packed texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedLayout {
    /// File name suffix, e.g. `_BR`.
    pub suffix: &'static str,
    /// Sources for R, G, B, A.
    pub sources: [ChannelSource; 4],
    pub color_space: ColorSpace,
    pub emit: EmitPolicy,
}

impl PackedLayout {
    /// Whether this layout produces an output for `channels`.
    pub fn applies_to(&self, channels: &ChannelSet<'_>) -> bool {
        match self.emit {
            EmitPolicy::Always => true,
            EmitPolicy::AnyOf(required) => required.iter().any(|c| channels.contains(*c)),
        }
    }
}

const BASE_R: ChannelSource = ChannelSource::component(Channel::BaseColor, ColorComponent::R, 1.0);
const BASE_G: ChannelSource = ChannelSource::component(Channel::BaseColor, ColorComponent::G, 1.0);
const BASE_B: ChannelSource = ChannelSource::component(Channel::BaseColor, ColorComponent::B, 1.0);
const BASE_ALPHA: ChannelSource =
    ChannelSource::component(Channel::BaseColor, ColorComponent::A, 1.0);

/// `_BR`: base color + roughness.
pub const BR_ROUGHNESS: PackedLayout = PackedLayout {
    suffix: "_BR",
    sources: [
        BASE_R,
        BASE_G,
        BASE_B,
        ChannelSource::component(Channel::Roughness, ColorComponent::R, 1.0),
    ],
    color_space: ColorSpace::Srgb,
    emit: EmitPolicy::Always,
};

/// `_BR` for metals: base color + metallic.
pub const BR_METALLIC: PackedLayout = PackedLayout {
    suffix: "_BR",
    sources: [
        BASE_R,
        BASE_G,
        BASE_B,
        ChannelSource::component(Channel::Metallic, ColorComponent::R, 1.0),
    ],
    color_space: ColorSpace::Srgb,
    emit: EmitPolicy::Always,
};

/// `_BR` for a whole-material bake: the bake is opaque.
pub const BR_BAKED: PackedLayout = PackedLayout {
    suffix: "_BR",
    sources: [BASE_R, BASE_G, BASE_B, ChannelSource::Constant(1.0)],
    color_space: ColorSpace::Srgb,
    emit: EmitPolicy::Always,
};

/// `_MEO`: metallic, emission, occlusion.
pub const MEO: PackedLayout = PackedLayout {
    suffix: "_MEO",
    sources: [
        ChannelSource::component(Channel::Metallic, ColorComponent::R, 0.0),
        ChannelSource::average(Channel::Emission, 0.0),
        ChannelSource::component(Channel::Ao, ColorComponent::R, 1.0),
        ChannelSource::Constant(1.0),
    ],
    color_space: ColorSpace::NonColor,
    emit: EmitPolicy::AnyOf(&[Channel::Metallic, Channel::Emission, Channel::Ao]),
};

/// `_BA`: base color + its alpha.
pub const BA: PackedLayout = PackedLayout {
    suffix: "_BA",
    sources: [BASE_R, BASE_G, BASE_B, BASE_ALPHA],
    color_space: ColorSpace::Srgb,
    emit: EmitPolicy::Always,
};

/// `_MESA`: metallic, specular, emission, alpha.
pub const MESA: PackedLayout = PackedLayout {
    suffix: "_MESA",
    sources: [
        ChannelSource::component(Channel::Metallic, ColorComponent::R, 0.0),
        ChannelSource::component(Channel::Specular, ColorComponent::R, 0.5),
        ChannelSource::average(Channel::Emission, 0.0),
        BASE_ALPHA,
    ],
    color_space: ColorSpace::NonColor,
    emit: EmitPolicy::Always,
};

/// The layouts a variant exports, in output order.
pub fn layouts(variant: SuffixVariant) -> &'static [PackedLayout] {
    match variant {
        SuffixVariant::Standard | SuffixVariant::Vxm | SuffixVariant::Unlit => &[BR_ROUGHNESS, MEO],
        SuffixVariant::Metal => &[BR_METALLIC],
        SuffixVariant::Blend
        | SuffixVariant::Masked
        | SuffixVariant::MaskedVxm
        | SuffixVariant::Uio => &[BA],
        SuffixVariant::Transparent => &[BR_ROUGHNESS, MESA],
        SuffixVariant::Vxc => &[],
    }
}

/// A packed texture ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedOutput {
    pub suffix: &'static str,
    pub color_space: ColorSpace,
    pub bitmap: Bitmap,
}

/// Errors that can occur during channel packing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackingError {
    #[error("cannot pack into an empty {width}x{height} texture")]
    EmptyResolution { width: u32, height: u32 },

    #[error("channel '{channel}' is {actual:?}, expected {expected:?}; resample before packing")]
    DimensionMismatch {
        channel: Channel,
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Resolve a channel source at a pixel.
#[inline]
pub fn resolve_channel_source(source: &ChannelSource, channels: &ChannelSet<'_>, x: u32, y: u32) -> f32 {
    match *source {
        ChannelSource::Component {
            channel,
            component,
            default,
        } => channels
            .get(channel)
            .map(|b| b.channel(x, y, component.index()))
            .unwrap_or(default),
        ChannelSource::Average { channel, default } => channels
            .get(channel)
            .map(|bitmap| {
                if bitmap.channels() < 3 {
                    // Grayscale: the single value stands for R = G = B.
                    return bitmap.channel(x, y, 0);
                }
                let [r, g, b, _] = bitmap.pixel(x, y);
                (r + g + b) / 3.0
            })
            .unwrap_or(default),
        ChannelSource::Constant(value) => value,
    }
}

fn check_dimensions(channels: &ChannelSet<'_>, width: u32, height: u32) -> Result<(), PackingError> {
    if width == 0 || height == 0 {
        return Err(PackingError::EmptyResolution { width, height });
    }
    for (channel, bitmap) in channels.present() {
        if bitmap.dimensions() != (width, height) {
            return Err(PackingError::DimensionMismatch {
                channel,
                expected: (width, height),
                actual: bitmap.dimensions(),
            });
        }
    }
    Ok(())
}

/// Pack one layout into a new 4-channel bitmap.
///
/// Every present channel must already be `width` x `height`.
pub fn pack_channels(
    layout: &PackedLayout,
    channels: &ChannelSet<'_>,
    width: u32,
    height: u32,
) -> Result<Bitmap, PackingError> {
    check_dimensions(channels, width, height)?;

    let mut result = Bitmap::filled(width, height, [0.0; 4]);
    for y in 0..height {
        for x in 0..width {
            let [r, g, b, a] = &layout.sources;
            result.set_pixel(
                x,
                y,
                [
                    resolve_channel_source(r, channels, x, y),
                    resolve_channel_source(g, channels, x, y),
                    resolve_channel_source(b, channels, x, y),
                    resolve_channel_source(a, channels, x, y),
                ],
            );
        }
    }

    Ok(result)
}

/// Pack every applicable layout in `layouts`.
pub fn pack_layouts(
    layouts: &[PackedLayout],
    channels: &ChannelSet<'_>,
    width: u32,
    height: u32,
) -> Result<Vec<PackedOutput>, PackingError> {
    layouts
        .iter()
        .filter(|layout| layout.applies_to(channels))
        .map(|layout| {
            Ok(PackedOutput {
                suffix: layout.suffix,
                color_space: layout.color_space,
                bitmap: pack_channels(layout, channels, width, height)?,
            })
        })
        .collect()
}

/// Pack the outputs of `variant`.
pub fn pack_variant(
    variant: SuffixVariant,
    channels: &ChannelSet<'_>,
    width: u32,
    height: u32,
) -> Result<Vec<PackedOutput>, PackingError> {
    pack_layouts(layouts(variant), channels, width, height)
}
