//! Component M: the knobs a caller sets before a decode call.
//!
//! Grounded on the teacher's `ZuneJpegOptions` (`set_max_width`/
//! `set_max_height`, a default-colourspace output option): this crate keeps
//! the same shape but trims it to what the baseline-only core needs.

use crate::misc::ColorSpace;

/// Caller-supplied limits and preferences for a single decode call.
#[derive(Copy, Clone, Debug)]
pub struct DecoderOptions
{
    output_colorspace: ColorSpace,
    max_width: usize,
    max_height: usize,
    strict: bool
}

impl Default for DecoderOptions
{
    fn default() -> DecoderOptions
    {
        DecoderOptions {
            output_colorspace: ColorSpace::Rgb,
            max_width: 1 << 16,
            max_height: 1 << 16,
            strict: false
        }
    }
}

impl DecoderOptions
{
    pub fn new() -> DecoderOptions
    {
        DecoderOptions::default()
    }

    /// Cap decoded image width; a `SOF0` claiming more fails with a typed
    /// error instead of driving a huge allocation.
    #[must_use]
    pub fn set_max_width(mut self, max_width: usize) -> DecoderOptions
    {
        self.max_width = max_width;
        self
    }

    #[must_use]
    pub fn set_max_height(mut self, max_height: usize) -> DecoderOptions
    {
        self.max_height = max_height;
        self
    }

    /// Promote tolerated warnings (non-baseline SOS fields, restart-index
    /// mismatches) to hard errors.
    #[must_use]
    pub fn set_strict(mut self, strict: bool) -> DecoderOptions
    {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn set_output_colorspace(mut self, colorspace: ColorSpace) -> DecoderOptions
    {
        self.output_colorspace = colorspace;
        self
    }

    pub const fn output_colorspace(&self) -> ColorSpace
    {
        self.output_colorspace
    }

    pub const fn max_width(&self) -> usize
    {
        self.max_width
    }

    pub const fn max_height(&self) -> usize
    {
        self.max_height
    }

    pub const fn strict(&self) -> bool
    {
        self.strict
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn builder_methods_compose()
    {
        let opts = DecoderOptions::new()
            .set_max_width(100)
            .set_max_height(200)
            .set_strict(true);
        assert_eq!(opts.max_width(), 100);
        assert_eq!(opts.max_height(), 200);
        assert!(opts.strict());
    }

    #[test]
    fn defaults_are_permissive()
    {
        let opts = DecoderOptions::default();
        assert!(!opts.strict());
        assert_eq!(opts.output_colorspace(), ColorSpace::Rgb);
    }
}
