//! Stateful, bounds-checked reader shared by the decoders.
//! Every read returns `None` on shortfall; callers turn that into their own error.

pub(crate) struct Reader<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from the buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Number of octets consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Number of octets left after the cursor.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads data of specified size and seeks the cursor.
    pub fn read(&mut self, length: usize) -> Option<&'a [u8]> {
        let end = self.cursor.checked_add(length)?;
        let bytes = self.buffer.get(self.cursor..end)?;
        self.cursor = end;
        Some(bytes)
    }

    /// Reads a next octet and seeks the cursor.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<u8> {
        self.read(1).map(|bytes| bytes[0])
    }

    /// Reads a big-endian `u16` and seeks the cursor.
    pub fn read_u16(&mut self) -> Option<u16> {
        self.read(2).map(|bytes| u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a big-endian `u32` and seeks the cursor.
    pub fn read_u32(&mut self) -> Option<u32> {
        self.read(4)
            .map(|bytes| u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a one-octet length followed by that many octets.
    pub fn read_prefixed(&mut self) -> Option<&'a [u8]> {
        let length = self.next()? as usize;
        self.read(length)
    }

    /// Reads everything after the cursor.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let bytes = &self.buffer[self.cursor..];
        self.cursor = self.buffer.len();
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_sequence() {
        let mut reader = Reader::new(&[0x01, 0x02, 0x03, 0x00, 0x00, 0x01, 0x00, 0x02, 0xAA, 0xBB]);

        assert_eq!(Some(0x01), reader.next());
        assert_eq!(Some(0x0203), reader.read_u16());
        assert_eq!(Some(0x0000_0100), reader.read_u32());
        assert_eq!(Some(&[0xAA, 0xBB][..]), reader.read_prefixed());
        assert!(reader.is_empty());
        assert_eq!(10, reader.position());
    }

    #[test]
    fn test_shortfall() {
        let mut reader = Reader::new(&[0x05, 0x01]);

        assert!(reader.read_prefixed().is_none());
        assert_eq!(1, reader.position());
        assert!(reader.read_u16().is_none());
        assert_eq!(&[0x01], reader.read_rest());
    }
}
