/// Largest possible [`distance`] between two colors (every RGB channel 255 apart).
pub const MAX_COLOR_DISTANCE: u32 = 255 * 255 * 3;

/// Packed ARGB8888 color: alpha in the top byte, then red, green, blue.
///
/// GIF only knows binary transparency, so canvas colors carry alpha 0 or 255. Averaged colors
/// may carry anything in between; the quantizer resolves them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    /// Canonical fully transparent value (alpha 0, RGB zeroed).
    pub const TRANSPARENT: Self = Self(0);

    /// Pack four channels.
    pub const fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Opaque color from a palette RGB triple (GIF palette entries carry no alpha).
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::from_channels(0xff, r, g, b)
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Unpack into `(a, r, g, b)`.
    pub const fn channels(self) -> (u8, u8, u8, u8) {
        (self.a(), self.r(), self.g(), self.b())
    }

    /// Straight RGBA8 bytes, as the `image` crate expects them.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }
}

/// Per-channel integer mean of four colors, truncating.
pub fn average4(c1: Argb, c2: Argb, c3: Argb, c4: Argb) -> Argb {
    fn mean(ch: fn(Argb) -> u8, c: [Argb; 4]) -> u8 {
        let sum: u16 = c.iter().map(|&x| u16::from(ch(x))).sum();
        (sum / 4) as u8
    }

    let c = [c1, c2, c3, c4];
    Argb::from_channels(
        mean(Argb::a, c),
        mean(Argb::r, c),
        mean(Argb::g, c),
        mean(Argb::b, c),
    )
}

/// Squared euclidean distance over red, green and blue. Alpha does not participate.
pub fn distance(c1: Argb, c2: Argb) -> u32 {
    fn sq(x: u8, y: u8) -> u32 {
        let d = i32::from(x) - i32::from(y);
        (d * d) as u32
    }

    sq(c1.r(), c2.r()) + sq(c1.g(), c2.g()) + sq(c1.b(), c2.b())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
