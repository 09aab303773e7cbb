/// Borrowed view of a decoded 8-bit RGB raster.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8], // row-major RGB triplets, len = w*h*3
}

impl RgbImageView<'_> {
    /// Number of bytes a `width x height` RGB buffer must hold.
    #[inline]
    pub fn expected_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(3)
    }

    /// `true` when the buffer length matches the declared extent.
    pub fn is_consistent(&self) -> bool {
        Self::expected_len(self.width, self.height) == Some(self.data.len())
    }
}
