use crate::Error;

/// Cursor over a byte buffer shared by nested decoders.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn read(&mut self, length: usize) -> Result<&'a [u8], Error> {
        let available = self.remaining();
        if length > available {
            return Err(Error::InsufficientBytes { needed: length, available });
        }

        let frame = &self.bytes[self.offset..self.offset + length];
        self.offset += length;
        Ok(frame)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read(1)?[0])
    }

    /// Reads a 4-byte big-endian length or item count.
    pub fn read_length(&mut self) -> Result<usize, Error> {
        let frame = self.read(4)?;
        let length = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
        Ok(length as usize)
    }

    pub fn read_to_end(&mut self) -> &'a [u8] {
        let frame = &self.bytes[self.offset..];
        self.offset = self.bytes.len();
        frame
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails if bytes are left unread.
    pub fn finish(&self) -> Result<(), Error> {
        if !self.is_exhausted() {
            return Err(Error::InvalidData(format!("{} trailing bytes", self.remaining())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader() {
        let bytes = hex::decode("0000000201020304").unwrap();
        let mut reader = Reader::new(&bytes);

        assert_eq!(reader.read_length().unwrap(), 2);
        assert_eq!(reader.read(2).unwrap(), &[1, 2]);
        assert_eq!(reader.position(), 6);
        assert!(reader.finish().is_err());

        assert_eq!(
            reader.read(3),
            Err(Error::InsufficientBytes { needed: 3, available: 2 })
        );
        assert_eq!(reader.read_to_end(), &[3, 4]);
        assert!(reader.finish().is_ok());
    }
}
