use crate::foundation::color::Argb;
use crate::foundation::error::{HalfGifError, HalfGifResult};

/// Ordered color table of a frame or of the whole file.
///
/// Entries are stored opaque; transparency is a per-frame property expressed through the frame's
/// transparent index, never through the palette itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Argb>,
}

impl Palette {
    pub fn new(colors: Vec<Argb>) -> Self {
        Self { colors }
    }

    /// Build from packed `r, g, b` triples as stored in a GIF color table.
    pub fn from_rgb_bytes(bytes: &[u8]) -> HalfGifResult<Self> {
        if !bytes.len().is_multiple_of(3) {
            return Err(HalfGifError::validation(format!(
                "palette byte length {} is not a multiple of 3",
                bytes.len()
            )));
        }
        let colors = bytes
            .chunks_exact(3)
            .map(|rgb| Argb::opaque(rgb[0], rgb[1], rgb[2]))
            .collect();
        Ok(Self { colors })
    }

    /// Packed `r, g, b` triples for the encoder.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.colors.len() * 3);
        for c in &self.colors {
            out.extend_from_slice(&[c.r(), c.g(), c.b()]);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Argb> {
        self.colors.get(usize::from(index)).copied()
    }

    pub fn colors(&self) -> &[Argb] {
        &self.colors
    }

    /// `true` when `index` addresses an entry of this palette.
    pub fn contains_index(&self, index: u8) -> bool {
        usize::from(index) < self.colors.len()
    }
}
