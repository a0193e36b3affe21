/*! An XDR decoder and encoder.
 *
 * [XDR](https://www.rfc-editor.org/rfc/rfc4506) encodes numbers and strings
 * to bytes.
 *
 * - Numbers are encoded in big endian format.
 * - Integers narrower than 32 bits (`i8`, `u8`, `i16`, `u16`, booleans) are
 *   widened to one 32 bit word on encode, and truncated back on decode.
 * - 64 bit integers are encoded as two 32 bit words, high half first.
 * - Strings and byte arrays are encoded as a length followed by the bytes,
 *   padded with zeros to a multiple of four. The length does not include the
 *   padding.
 * - [`Decoder`] uses an internal [`Cell`] field for the `offset` field
 *   in order to implement a split borrow.
 * - [`Encoder`] writes into a caller supplied mutable slice and never grows
 *   it; running out of room is [`EncodeError::EndOfOutput`].
 */
use core::cell::Cell;
use core::fmt;
use core::marker::Sized;
use core::num;
use core::result::Result;
use core::result::Result::{Err, Ok};

#[cfg(feature = "std")]
use std::error;

////////////////////////////////////////////////////////////////////////////////

/** An XDR decoder.
 */
#[derive(Debug)]
pub struct Decoder<'a> {
    data: &'a [u8],
    offset: Cell<usize>,
}

impl<'a> Decoder<'a> {
    /** Instantiates a [`Decoder`] from a slice of bytes.
     *
     * # Examples
     *
     * Basic usage:
     *
     * ```
     * use zbootenv::xdr::Decoder;
     *
     * let data = [0x00, 0x00, 0x00, 0x01, 0xff, 0xff, 0xff, 0xfe];
     *
     * let decoder = Decoder::from_bytes(&data);
     *
     * let a: u32 = decoder.get().unwrap();
     * let b: i32 = decoder.get().unwrap();
     *
     * assert_eq!(a, 1);
     * assert_eq!(b, -2);
     * assert!(decoder.is_empty());
     * ```
     */
    pub fn from_bytes(data: &'a [u8]) -> Decoder<'a> {
        Decoder {
            data: data,
            offset: Cell::new(0),
        }
    }

    /** Checks if there are enough bytes to consume from the data slice.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available, or the
     * internal offset is malformed.
     */
    fn check_need(&self, count: usize) -> Result<(), DecodeError> {
        // Safely compute bytes remaining.
        let offset = self.offset.get();
        let length = self.data.len();
        let remaining = match length.checked_sub(offset) {
            Some(v) => v,
            None => {
                return Err(DecodeError::InvalidOffset {
                    offset: offset,
                    length: length,
                })
            }
        };

        if remaining >= count {
            Ok(())
        } else {
            Err(DecodeError::EndOfInput {
                offset: offset,
                length: length,
                count: count,
            })
        }
    }

    /** Consumes padding to align offset to a multiple of 4.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    fn consume_padding(&self) -> Result<(), DecodeError> {
        let offset = self.offset.get();
        let remainder = offset % 4;
        let padding = if remainder == 0 { 0 } else { 4 - remainder };

        self.check_need(padding)?;
        self.offset.set(offset + padding);

        Ok(())
    }

    /// Returns the source data length. Remains unchanged while decoding.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no more bytes to decode.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns length of bytes remaining to be processed.
    pub fn len(&self) -> usize {
        // Gracefully handle offset errors, and just return 0.
        match self.data.len().checked_sub(self.offset.get()) {
            Some(v) => v,
            None => 0,
        }
    }

    /// Resets the decoder to the start of the data.
    pub fn reset(&self) {
        self.offset.set(0);
    }

    /** Skips length number of bytes, plus padding to a multiple of 4.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn skip(&self, length: usize) -> Result<(), DecodeError> {
        self.check_need(length)?;
        self.offset.set(self.offset.get() + length);
        self.consume_padding()?;
        Ok(())
    }

    /** Rewinds `count` bytes.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if `count` is past the start of the data.
     */
    pub fn rewind(&self, count: usize) -> Result<(), DecodeError> {
        let offset = self.offset.get();
        if count > offset {
            return Err(DecodeError::RewindPastStart {
                offset: offset,
                count: count,
            });
        }
        self.offset.set(offset - count);
        Ok(())
    }

    /** Returns 4 bytes.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    fn get_4_bytes(&self) -> Result<[u8; 4], DecodeError> {
        self.check_need(4)?;

        let start = self.offset.get();
        let end = start + 4;

        self.offset.set(end);

        Ok(<[u8; 4]>::try_from(&self.data[start..end]).unwrap())
    }

    /** Returns 8 bytes.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    fn get_8_bytes(&self) -> Result<[u8; 8], DecodeError> {
        self.check_need(8)?;

        let start = self.offset.get();
        let end = start + 8;

        self.offset.set(end);

        Ok(<[u8; 8]>::try_from(&self.data[start..end]).unwrap())
    }

    /** Returns length number of bytes.
     *
     * Consumes padding bytes if length is not a multiple of 4.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available
     * (including the padding).
     *
     * Basic usage:
     *
     * ```
     * use zbootenv::xdr::Decoder;
     *
     * let data = &[0x61, 0x62, 0x63, 0x64, 0x65, 0x00, 0x00, 0x00];
     *
     * let decoder = Decoder::from_bytes(data);
     *
     * // Five bytes, and three bytes of padding.
     * assert_eq!(decoder.get_n_bytes(5).unwrap(), [0x61, 0x62, 0x63, 0x64, 0x65]);
     * assert!(decoder.is_empty());
     * ```
     */
    pub fn get_n_bytes(&self, length: usize) -> Result<&'a [u8], DecodeError> {
        self.check_need(length)?;

        let start = self.offset.get();
        let end = start + length;

        let value = &self.data[start..end];
        self.offset.set(end);

        self.consume_padding()?;

        Ok(value)
    }

    /** Decodes a [`bool`].
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available, or the
     * value is not 0 nor 1.
     */
    pub fn get_bool(&self) -> Result<bool, DecodeError> {
        let offset = self.offset.get();
        let value = self.get_u32()?;
        match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DecodeError::InvalidBoolean {
                offset: offset,
                value: value,
            }),
        }
    }

    /** Decodes a length prefixed `&[u8]`.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_bytes(&self) -> Result<&'a [u8], DecodeError> {
        let length = self.get_usize()?;
        self.get_n_bytes(length)
    }

    /** Decodes an [`f64`].
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_f64(&self) -> Result<f64, DecodeError> {
        let bytes = self.get_8_bytes()?;
        Ok(f64::from_be_bytes(bytes))
    }

    /** Decodes an [`i8`] widened to one 32 bit word.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_i8(&self) -> Result<i8, DecodeError> {
        Ok(self.get_i32()? as i8)
    }

    /** Decodes an [`i16`] widened to one 32 bit word.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_i16(&self) -> Result<i16, DecodeError> {
        Ok(self.get_i32()? as i16)
    }

    /** Decodes an [`i32`].
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_i32(&self) -> Result<i32, DecodeError> {
        let bytes = self.get_4_bytes()?;
        Ok(i32::from_be_bytes(bytes))
    }

    /** Decodes an [`i64`] from two words, high half first.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_i64(&self) -> Result<i64, DecodeError> {
        let bytes = self.get_8_bytes()?;
        Ok(i64::from_be_bytes(bytes))
    }

    /** Decodes a [`u8`] widened to one 32 bit word.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_u8(&self) -> Result<u8, DecodeError> {
        Ok(self.get_u32()? as u8)
    }

    /** Decodes a [`u16`] widened to one 32 bit word.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_u16(&self) -> Result<u16, DecodeError> {
        Ok(self.get_u32()? as u16)
    }

    /** Decodes a [`u32`].
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_u32(&self) -> Result<u32, DecodeError> {
        let bytes = self.get_4_bytes()?;
        Ok(u32::from_be_bytes(bytes))
    }

    /** Decodes a [`u64`] from two words, high half first.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available.
     */
    pub fn get_u64(&self) -> Result<u64, DecodeError> {
        let bytes = self.get_8_bytes()?;
        Ok(u64::from_be_bytes(bytes))
    }

    /** Decodes a [`usize`] for array or string lengths.
     *
     * XDR uses unsigned 32 bit values for array and string lengths.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available, or the
     * value does not fit a [`usize`].
     */
    pub fn get_usize(&self) -> Result<usize, DecodeError> {
        let offset = self.offset.get();
        let value = self.get_u32()?;

        match usize::try_from(value) {
            Ok(v) => Ok(v),
            Err(e) => Err(DecodeError::SizeConversion {
                offset: offset,
                value: value,
                err: e,
            }),
        }
    }

    /** Decodes a [`str`].
     *
     * # Errors
     *
     * Returns [`DecodeError`] if there are not enough bytes available, or the
     * bytes are not a valid UTF8 string.
     *
     * Basic usage:
     *
     * ```
     * use zbootenv::xdr::Decoder;
     *
     * let data = &[
     *     0x00, 0x00, 0x00, 0x03, 0x61, 0x62, 0x63, 0x00,
     *     0x00, 0x00, 0x00, 0x02, 0x64, 0x65, 0x00, 0x00,
     * ];
     *
     * let decoder = Decoder::from_bytes(data);
     *
     * assert_eq!(decoder.get_str().unwrap(), "abc");
     * assert_eq!(decoder.get_str().unwrap(), "de");
     * ```
     */
    pub fn get_str(&self) -> Result<&'a str, DecodeError> {
        let length = self.get_usize()?;
        let offset = self.offset.get();
        let data = self.get_n_bytes(length)?;

        match core::str::from_utf8(data) {
            Ok(v) => Ok(v),
            Err(e) => Err(DecodeError::InvalidStr {
                offset: offset,
                length: length,
                err: e,
            }),
        }
    }

    /** Decodes a value using the [`GetFromDecoder`] trait for F.
     *
     * # Errors
     *
     * Returns [`DecodeError`] in case of decoding errors.
     */
    pub fn get<F: GetFromDecoder>(&self) -> Result<F, DecodeError> {
        GetFromDecoder::get_from_decoder(self)
    }
}

////////////////////////////////////////////////////////////////////////////////

/** [`GetFromDecoder`] is a trait that gets from the [`Decoder`] to the type.
 */
pub trait GetFromDecoder: Sized {
    fn get_from_decoder(decoder: &Decoder) -> Result<Self, DecodeError>;
}

impl GetFromDecoder for bool {
    fn get_from_decoder(decoder: &Decoder) -> Result<bool, DecodeError> {
        decoder.get_bool()
    }
}

impl GetFromDecoder for f64 {
    fn get_from_decoder(decoder: &Decoder) -> Result<f64, DecodeError> {
        decoder.get_f64()
    }
}

impl GetFromDecoder for i8 {
    fn get_from_decoder(decoder: &Decoder) -> Result<i8, DecodeError> {
        decoder.get_i8()
    }
}

impl GetFromDecoder for i16 {
    fn get_from_decoder(decoder: &Decoder) -> Result<i16, DecodeError> {
        decoder.get_i16()
    }
}

impl GetFromDecoder for i32 {
    fn get_from_decoder(decoder: &Decoder) -> Result<i32, DecodeError> {
        decoder.get_i32()
    }
}

impl GetFromDecoder for i64 {
    fn get_from_decoder(decoder: &Decoder) -> Result<i64, DecodeError> {
        decoder.get_i64()
    }
}

impl GetFromDecoder for u8 {
    fn get_from_decoder(decoder: &Decoder) -> Result<u8, DecodeError> {
        decoder.get_u8()
    }
}

impl GetFromDecoder for u16 {
    fn get_from_decoder(decoder: &Decoder) -> Result<u16, DecodeError> {
        decoder.get_u16()
    }
}

impl GetFromDecoder for u32 {
    fn get_from_decoder(decoder: &Decoder) -> Result<u32, DecodeError> {
        decoder.get_u32()
    }
}

impl GetFromDecoder for u64 {
    fn get_from_decoder(decoder: &Decoder) -> Result<u64, DecodeError> {
        decoder.get_u64()
    }
}

impl GetFromDecoder for usize {
    fn get_from_decoder(decoder: &Decoder) -> Result<usize, DecodeError> {
        decoder.get_usize()
    }
}

////////////////////////////////////////////////////////////////////////////////

/** An XDR encoder.
 *
 * Writes into a caller supplied slice, and keeps track of the number of
 * bytes encoded so far.
 */
pub struct Encoder<'a> {
    data: &'a mut [u8],
    offset: usize,
}

impl fmt::Debug for Encoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Change debug printing to print length instead of raw data.
        f.debug_struct("Encoder")
            .field("length", &self.data.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl Encoder<'_> {
    /** Instantiates an [`Encoder`] over a slice of bytes.
     *
     * # Examples
     *
     * Basic usage:
     *
     * ```
     * use zbootenv::xdr::{Decoder, Encoder};
     *
     * let data = &mut [0u8; 16];
     *
     * let mut encoder = Encoder::to_bytes(data);
     * encoder.put_u32(0xf2345678).unwrap();
     * encoder.put_u64(0x123456789abcdef0).unwrap();
     * assert_eq!(encoder.len(), 12);
     *
     * let decoder = Decoder::from_bytes(data);
     * assert_eq!(decoder.get_u32().unwrap(), 0xf2345678);
     * assert_eq!(decoder.get_u64().unwrap(), 0x123456789abcdef0);
     * ```
     */
    pub fn to_bytes(data: &mut [u8]) -> Encoder {
        Encoder {
            data: data,
            offset: 0,
        }
    }

    /** Checks if there is enough space in the data slice to encode.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    fn check_need(&self, count: usize) -> Result<(), EncodeError> {
        if self.available() >= count {
            Ok(())
        } else {
            Err(EncodeError::EndOfOutput {
                offset: self.offset,
                length: self.data.len(),
                count: count,
            })
        }
    }

    /// Returns the number of bytes still available in the data slice.
    pub fn available(&self) -> usize {
        // Gracefully handle offset errors, and just return 0.
        match self.data.len().checked_sub(self.offset) {
            Some(v) => v,
            None => 0,
        }
    }

    /// Returns the destination data capacity. Remains unchanged while encoding.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there is no more space for values to be encoded.
    pub fn is_full(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Returns the length of the encoded values.
    pub fn len(&self) -> usize {
        self.offset
    }

    /** Encodes padding to align offset to a multiple of 4.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    fn put_padding(&mut self) -> Result<(), EncodeError> {
        let remainder = self.offset % 4;
        let padding = if remainder == 0 { 0 } else { 4 - remainder };
        self.put_zero_padding(padding)
    }

    /** Encodes 4 bytes.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    fn put_4_bytes(&mut self, data: [u8; 4]) -> Result<(), EncodeError> {
        self.check_need(4)?;

        let start = self.offset;
        let end = start + 4;

        self.offset = end;

        self.data[start..end].copy_from_slice(&data);

        Ok(())
    }

    /** Encodes a [`bool`] as one 32 bit word.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.put_u32(if value { 1 } else { 0 })
    }

    /** Encodes a length prefixed `&[u8]`, padded to a multiple of 4.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available, or the
     * length does not fit a [`u32`].
     */
    pub fn put_bytes(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        self.put_usize(data.len())?;
        self.put_n_bytes(data)
    }

    /** Encodes raw bytes, padded to a multiple of 4.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_n_bytes(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        let length = data.len();
        self.check_need(length)?;

        let start = self.offset;
        let end = start + length;

        self.offset = end;

        self.data[start..end].copy_from_slice(data);

        self.put_padding()
    }

    /** Encodes an [`i8`] widened to one 32 bit word.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_i8(&mut self, value: i8) -> Result<(), EncodeError> {
        self.put_i32(i32::from(value))
    }

    /** Encodes an [`i16`] widened to one 32 bit word.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_i16(&mut self, value: i16) -> Result<(), EncodeError> {
        self.put_i32(i32::from(value))
    }

    /** Encodes an [`i32`].
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_i32(&mut self, value: i32) -> Result<(), EncodeError> {
        self.put_4_bytes(value.to_be_bytes())
    }

    /** Encodes an [`i64`] as two words, high half first.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_i64(&mut self, value: i64) -> Result<(), EncodeError> {
        self.put_i32((value >> 32) as i32)?;
        self.put_u32(value as u32)
    }

    /** Encodes a [`u8`] widened to one 32 bit word.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.put_u32(u32::from(value))
    }

    /** Encodes a [`u16`] widened to one 32 bit word.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.put_u32(u32::from(value))
    }

    /** Encodes a [`u32`].
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.put_4_bytes(value.to_be_bytes())
    }

    /** Encodes a [`u64`] as two words, high half first.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_u64(&mut self, value: u64) -> Result<(), EncodeError> {
        self.put_u32((value >> 32) as u32)?;
        self.put_u32(value as u32)
    }

    /** Encodes a [`usize`] as a 32 bit length.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available, or the
     * value does not fit a [`u32`].
     */
    pub fn put_usize(&mut self, value: usize) -> Result<(), EncodeError> {
        match u32::try_from(value) {
            Ok(v) => self.put_u32(v),
            Err(e) => Err(EncodeError::SizeConversion {
                offset: self.offset,
                value: value,
                err: e,
            }),
        }
    }

    /** Encodes a [`str`] as a length prefix and bytes, padded to 4.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available, or the
     * length does not fit a [`u32`].
     */
    pub fn put_str(&mut self, value: &str) -> Result<(), EncodeError> {
        self.put_bytes(value.as_bytes())
    }

    /** Puts zero bytes as padding.
     *
     * # Errors
     *
     * Returns [`EncodeError`] if there are not enough bytes available.
     */
    pub fn put_zero_padding(&mut self, length: usize) -> Result<(), EncodeError> {
        self.check_need(length)?;

        let start = self.offset;
        let end = start + length;

        self.offset = end;

        self.data[start..end].fill(0);

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum DecodeError {
    /** End of input data.
     *
     * - `offset` - Byte offset of data.
     * - `length` - Total length of data.
     * - `count`  - Number of bytes needed.
     */
    EndOfInput {
        offset: usize,
        length: usize,
        count: usize,
    },

    /** Invalid boolean value.
     *
     * - `offset` - Byte offset of data.
     * - `value`  - Boolean numerical value.
     */
    InvalidBoolean { offset: usize, value: u32 },

    /** Invalid offset is past data.
     *
     * This should never occur.
     *
     * - `offset` - Byte offset of data.
     * - `length` - Total length of data.
     */
    InvalidOffset { offset: usize, length: usize },

    /** Invalid str.
     *
     * - `offset` - Byte offset of data.
     * - `length` - Length of str.
     * - `err`    - Decoding error.
     */
    InvalidStr {
        offset: usize,
        length: usize,
        err: core::str::Utf8Error,
    },

    /** Rewind past start.
     *
     * - `offset` - Byte offset of data.
     * - `count`  - Number of bytes needed to rewind.
     */
    RewindPastStart { offset: usize, count: usize },

    /** Size conversion error from [`u32`] to [`usize`].
     *
     * - `offset` - Byte offset of data.
     * - `value`  - Value of failed conversion.
     */
    SizeConversion {
        offset: usize,
        value: u32,
        err: num::TryFromIntError,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::EndOfInput {
                offset,
                length,
                count,
            } => {
                write!(
                    f,
                    "XDR end of input at offset {offset}, need {count} bytes, total length {length}"
                )
            }
            DecodeError::InvalidBoolean { offset, value } => {
                write!(f, "XDR invalid boolean at offset {offset}, value {value}")
            }
            DecodeError::InvalidOffset { offset, length } => {
                write!(f, "XDR invalid offset {offset}, total length {length}")
            }
            DecodeError::InvalidStr {
                offset,
                length,
                err,
            } => {
                write!(
                    f,
                    "XDR invalid UTF8 str of length {length} at offset {offset} err {err}"
                )
            }
            DecodeError::RewindPastStart { offset, count } => {
                write!(f, "XDR rewind at offset {offset}, need {count} bytes")
            }
            DecodeError::SizeConversion { offset, value, err } => {
                write!(
                    f,
                    "XDR size conversion error at offset {offset}, value {value} err {err}"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodeError::InvalidStr {
                offset: _,
                length: _,
                err,
            } => Some(err),
            DecodeError::SizeConversion {
                offset: _,
                value: _,
                err,
            } => Some(err),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum EncodeError {
    /** End of output data.
     *
     * - `offset` - Byte offset of data.
     * - `length` - Total length of data.
     * - `count`  - Number of bytes needed.
     */
    EndOfOutput {
        offset: usize,
        length: usize,
        count: usize,
    },

    /** Size conversion error from [`usize`] to [`u32`].
     *
     * - `offset` - Byte offset of data.
     * - `value`  - Value of failed conversion.
     */
    SizeConversion {
        offset: usize,
        value: usize,
        err: num::TryFromIntError,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::EndOfOutput {
                offset,
                length,
                count,
            } => {
                write!(
                    f,
                    "XDR end of output at offset {offset}, need {count} bytes, total length {length}"
                )
            }
            EncodeError::SizeConversion { offset, value, err } => {
                write!(
                    f,
                    "XDR size conversion error at offset {offset}, value {value} err {err}"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            EncodeError::SizeConversion {
                offset: _,
                value: _,
                err,
            } => Some(err),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
