//! Bounded label formatting for menu entries.
//!
//! A [`LabelWriter`] formats into a caller-owned byte buffer with C
//! `snprintf` semantics: output is silently truncated to `capacity - 1`
//! bytes and always NUL-terminated (when the buffer has room for the NUL
//! at all). Nothing is allocated, so labels can track live numbers every
//! frame.

use core::fmt;

/// `core::fmt::Write` sink over a fixed byte buffer.
pub struct LabelWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    /// Bytes the formatted output would need without truncation.
    wanted: usize,
}

impl<'a> LabelWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        if let Some(first) = buf.first_mut() {
            *first = 0;
        }
        Self {
            buf,
            len: 0,
            wanted: 0,
        }
    }

    /// Declared capacity, including the terminating NUL.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length the untruncated output would have had.
    pub fn wanted(&self) -> usize {
        self.wanted
    }

    pub fn is_truncated(&self) -> bool {
        self.wanted > self.len
    }

    /// The text written so far, without the NUL.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Consume the writer, keeping the borrow of the written text.
    pub fn into_str(self) -> &'a str {
        let Self { buf, len, .. } = self;
        let bytes: &'a [u8] = buf;
        core::str::from_utf8(&bytes[..len]).unwrap_or("")
    }
}

impl fmt::Write for LabelWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.wanted = self.wanted.saturating_add(s.len());

        let room = self.capacity().saturating_sub(1).saturating_sub(self.len);
        let mut take = s.len().min(room);
        // Never split a UTF-8 sequence.
        while !s.is_char_boundary(take) {
            take -= 1;
        }

        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        if self.len < self.buf.len() {
            self.buf[self.len] = 0;
        }
        Ok(())
    }
}

/// Formatting routine of a generated label: `(writer, parameter)`.
pub type LabelFn<'a> = &'a dyn Fn(&mut LabelWriter<'_>, u32) -> fmt::Result;

/// A label generator bound to one menu entry.
#[derive(Clone, Copy)]
pub struct LabelGenerator<'a> {
    render: LabelFn<'a>,
    param: u32,
}

impl<'a> LabelGenerator<'a> {
    pub const fn new(render: LabelFn<'a>, param: u32) -> Self {
        Self { render, param }
    }

    pub fn param(&self) -> u32 {
        self.param
    }

    /// Render into `buf`, returning the (possibly truncated) text.
    pub fn generate<'b>(&self, buf: &'b mut [u8]) -> Result<&'b str, fmt::Error> {
        let mut writer = LabelWriter::new(buf);
        (self.render)(&mut writer, self.param)?;
        Ok(writer.into_str())
    }
}

/// Stock generator: the parameter in decimal.
pub fn ordinal(w: &mut LabelWriter<'_>, n: u32) -> fmt::Result {
    use core::fmt::Write;
    write!(w, "{}", n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn ordinal_fits_small_buffer() {
        let mut buf = [0xAAu8; 10];
        let text = LabelGenerator::new(&ordinal, 7).generate(&mut buf).unwrap();
        assert_eq!(text, "7");
        assert_eq!(buf[1], 0);
    }

    #[test]
    fn never_writes_past_capacity() {
        for n in [0, 9, 10, 99_999, 123_456_789, u32::MAX] {
            // Guard bytes after the declared capacity must survive.
            let mut backing = [0xAAu8; 14];
            let (buf, guard) = backing.split_at_mut(10);
            let text = LabelGenerator::new(&ordinal, n).generate(buf).unwrap();
            assert!(text.len() <= 9);
            assert!(guard.iter().all(|&b| b == 0xAA));
            assert!(backing[..10].contains(&0));
        }
    }

    #[test]
    fn truncates_like_snprintf() {
        let mut buf = [0u8; 10];
        let text = LabelGenerator::new(&ordinal, u32::MAX).generate(&mut buf).unwrap();
        assert_eq!(text, "429496729");
        assert_eq!(buf[9], 0);

        let mut buf = [0u8; 10];
        let mut w = LabelWriter::new(&mut buf);
        write!(w, "Servo test x{}", 100).unwrap();
        assert_eq!(w.as_str(), "Servo tes");
        assert!(w.is_truncated());
        assert_eq!(w.wanted(), 15);
    }

    #[test]
    fn degenerate_capacities() {
        let mut empty: [u8; 0] = [];
        assert_eq!(LabelGenerator::new(&ordinal, 5).generate(&mut empty).unwrap(), "");

        let mut one = [0xAAu8; 1];
        assert_eq!(LabelGenerator::new(&ordinal, 5).generate(&mut one).unwrap(), "");
        assert_eq!(one[0], 0);
    }

    #[test]
    fn closures_can_capture_live_state() {
        let count = core::cell::Cell::new(3u32);
        let render = |w: &mut LabelWriter<'_>, n: u32| write!(w, "{}/{}", count.get(), n);
        let generator = LabelGenerator::new(&render, 10);

        let mut buf = [0u8; 16];
        assert_eq!(generator.generate(&mut buf).unwrap(), "3/10");
        count.set(4);
        let mut buf = [0u8; 16];
        assert_eq!(generator.generate(&mut buf).unwrap(), "4/10");
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundary() {
        let mut buf = [0u8; 4];
        let mut w = LabelWriter::new(&mut buf);
        w.write_str("a°C").unwrap();
        // "a" + two-byte "°" fills the three usable bytes.
        assert_eq!(w.as_str(), "a°");
        let mut buf = [0u8; 3];
        let mut w = LabelWriter::new(&mut buf);
        w.write_str("a°C").unwrap();
        assert_eq!(w.as_str(), "a");
    }
}
