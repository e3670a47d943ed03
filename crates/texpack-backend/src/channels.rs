//! Semantic PBR channels and the per-material channel set.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::bitmap::Bitmap;
use crate::resample::resample;

/// A semantic PBR input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    BaseColor,
    Roughness,
    Metallic,
    Emission,
    Specular,
    Ao,
}

impl Channel {
    /// Fixed enumeration order. Resolution is taken from the first present
    /// channel in this order.
    pub const ALL: [Channel; 6] = [
        Channel::BaseColor,
        Channel::Roughness,
        Channel::Metallic,
        Channel::Emission,
        Channel::Specular,
        Channel::Ao,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Channel::BaseColor => "base_color",
            Channel::Roughness => "roughness",
            Channel::Metallic => "metallic",
            Channel::Emission => "emission",
            Channel::Specular => "specular",
            Channel::Ao => "ao",
        }
    }

    /// Principal shader input sockets that feed this channel, in order of
    /// preference. Ambient occlusion has no shader input.
    pub fn socket_names(&self) -> &'static [&'static str] {
        match self {
            Channel::BaseColor => &["Base Color"],
            Channel::Roughness => &["Roughness"],
            Channel::Metallic => &["Metallic"],
            Channel::Emission => &["Emission Color", "Emission"],
            Channel::Specular => &["Specular", "Specular IOR Level"],
            Channel::Ao => &[],
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Optional bitmap per channel for one material.
///
/// Sources found in the shader graph are borrowed from it; bakes are owned.
#[derive(Debug, Clone, Default)]
pub struct ChannelSet<'a> {
    slots: [Option<Cow<'a, Bitmap>>; 6],
}

impl<'a> ChannelSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> Option<&Bitmap> {
        self.slots[channel.index()].as_deref()
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.slots[channel.index()].is_some()
    }

    /// Borrow a host-owned bitmap.
    pub fn set_borrowed(&mut self, channel: Channel, bitmap: &'a Bitmap) {
        self.slots[channel.index()] = Some(Cow::Borrowed(bitmap));
    }

    /// Take ownership of a bitmap produced during this pass (a bake).
    pub fn set_owned(&mut self, channel: Channel, bitmap: Bitmap) {
        self.slots[channel.index()] = Some(Cow::Owned(bitmap));
    }

    /// Present channels in enumeration order.
    pub fn present(&self) -> impl Iterator<Item = (Channel, &Bitmap)> + '_ {
        Channel::ALL
            .into_iter()
            .filter_map(move |c| self.get(c).map(|b| (c, b)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    /// Output size: the first present channel's dimensions, else a square
    /// of `fallback`.
    pub fn resolution(&self, fallback: u32) -> (u32, u32) {
        self.present()
            .next()
            .map(|(_, b)| b.dimensions())
            .unwrap_or((fallback, fallback))
    }

    /// Every present channel resampled to `width` x `height`.
    pub fn resampled(&self, width: u32, height: u32) -> ChannelSet<'_> {
        let mut out = ChannelSet::new();
        for (channel, bitmap) in self.present() {
            out.slots[channel.index()] = Some(resample(bitmap, width, height));
        }
        out
    }
}
