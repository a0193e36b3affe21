/*! Owned Name Value list editing.
 *
 * [`List`] owns a serialized list and keeps it valid wire format across
 * mutations, so exporting is free and any other implementation can parse the
 * buffer at any point. Adding a pair overwrites the terminator and appends a
 * fresh one; removing a pair shifts the tail of the buffer left.
 */
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::result::Result;
use core::result::Result::{Err, Ok};

#[cfg(feature = "std")]
use std::error;

extern crate fixedstr;

use fixedstr::str16;

use crate::nv::{
    pair_body_length, DataType, DecodeError, DecodedValue, Decoder, Encoding, Unique,
    NATIVE_ENDIAN, PAIR_HEADER_LENGTH,
};
use crate::xdr;

////////////////////////////////////////////////////////////////////////////////

/// Byte length of the list header (encoding, endian, two reserved bytes).
const HEADER_LENGTH: usize = 4;

/// Byte length of the version and flags words.
const LIST_HEADER_LENGTH: usize = 8;

/// Byte offset of the first pair header.
const PAIRS_OFFSET: usize = HEADER_LENGTH + LIST_HEADER_LENGTH;

/// Byte length of the end of list terminator (a zero pair header).
const TERMINATOR_LENGTH: usize = PAIR_HEADER_LENGTH;

/// Encoded bytes of a pair before the name bytes and the value: the pair
/// header, the name length, the data type, and the element count.
const PAIR_FIXED_LENGTH: usize = PAIR_HEADER_LENGTH + 4 + 4 + 4;

/// Byte length of an empty serialized list.
const EMPTY_LENGTH: usize = PAIRS_OFFSET + TERMINATOR_LENGTH;

/// Aligns a length up to the four byte wire boundary.
const fn align4(length: usize) -> usize {
    (length + 3) & !3
}

/// Aligns a length up to the eight byte boundary of the in memory
/// representation, used for decoded sizes.
const fn align8(length: usize) -> usize {
    (length + 7) & !7
}

////////////////////////////////////////////////////////////////////////////////

/** Computes the size of a serialized list body, including the terminator.
 *
 * `body` starts right after the four byte envelope. Hops from pair header
 * to pair header without decoding any values.
 *
 * # Errors
 *
 * Returns [`DecodeError`] if the walk runs past the end of `body` before
 * reaching the terminator.
 */
fn stream_size(body: &[u8]) -> Result<usize, DecodeError> {
    let decoder = xdr::Decoder::from_bytes(body);

    // Skip version and flags.
    decoder.skip(LIST_HEADER_LENGTH)?;

    while let Some(length) = pair_body_length(&decoder)? {
        decoder.skip(length)?;
    }

    Ok(body.len() - decoder.len())
}

////////////////////////////////////////////////////////////////////////////////

/// A pair located by a raw walk of the serialized buffer.
struct RawPair {
    offset: usize,
    encoded_size: usize,
}

/** An owned, mutable Name Value list.
 *
 * Holds the full serialized stream (four byte header included), of which the
 * first [`List::size`] bytes are valid. The buffer is always big endian XDR
 * wire format, so [`List::as_bytes`] is the export operation.
 *
 * # Examples
 *
 * Basic usage:
 *
 * ```
 * use zbootenv::nv::{DataType, DecodedValue, List, Unique};
 *
 * let mut list = List::create(Unique::Name);
 * list.add_uint64("version", 1).unwrap();
 * list.add_string("freebsd:bootonce", "zfs:tank:").unwrap();
 *
 * let copy = List::import(list.as_bytes()).unwrap();
 * match copy.find("version", DataType::Uint64).unwrap() {
 *     Some(DecodedValue::Uint64(v)) => assert_eq!(v, 1),
 *     _ => panic!(),
 * }
 * ```
 */
pub struct List {
    data: Vec<u8>,
    used: usize,
}

impl List {
    /** Creates an empty list with the given uniqueness flags.
     *
     * An empty list is the header, a zero version, the flags, and the
     * terminator.
     */
    pub fn create(unique: Unique) -> List {
        let mut data = vec![0; EMPTY_LENGTH];

        data[0] = Encoding::Xdr as u8;
        data[1] = NATIVE_ENDIAN as u8;
        data[8..12].copy_from_slice(&(unique as u32).to_be_bytes());

        List {
            data: data,
            used: EMPTY_LENGTH,
        }
    }

    /** Imports a list from a serialized stream.
     *
     * Validates the header, walks every pair (recursively for nested lists)
     * and keeps a private copy of the stream. Trailing bytes past the
     * terminator are ignored.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if the stream is truncated, or malformed, or
     * the flags are not [`Unique::Name`].
     */
    pub fn import(stream: &[u8]) -> Result<List, DecodeError> {
        let decoder = Decoder::from_bytes(stream)?;

        // A bootenv list carries NV_UNIQUE_NAME.
        match decoder.unique {
            Unique::Name => (),
            unique => {
                return Err(DecodeError::InvalidFlags {
                    flags: unique as u32,
                })
            }
        }

        // Check every pair up front, then size the stream.
        decoder.validate()?;
        let size = HEADER_LENGTH + stream_size(&stream[HEADER_LENGTH..])?;

        Ok(List {
            data: stream[..size].to_vec(),
            used: size,
        })
    }

    /** Exports the list as a serialized stream.
     *
     * The buffer is maintained in wire format, so this is the identity; a
     * stream produced by [`List::import`] re-exports byte for byte.
     */
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.used]
    }

    /// Returns the serialized size in bytes.
    pub fn size(&self) -> usize {
        self.used
    }

    /// Returns the allocated size in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the uniqueness flags of the list.
    pub fn unique(&self) -> Unique {
        let flags = u32::from_be_bytes(self.data[8..12].try_into().unwrap());
        match num::FromPrimitive::from_u32(flags & 0x3) {
            Some(v) => v,
            None => Unique::None,
        }
    }

    /** Returns a borrowed [`Decoder`] over the serialized list.
     *
     * The decoder is a read only view; it must be dropped before the next
     * mutation.
     *
     * # Errors
     *
     * Returns [`DecodeError`] on error.
     */
    pub fn decoder(&self) -> Result<Decoder, DecodeError> {
        Decoder::from_bytes(self.as_bytes())
    }

    /** Walks the raw pair headers looking for a name, and optionally a type.
     *
     * A pair with a matching name but a different type is skipped.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if the walk runs off the used region. This
     * does not happen for a buffer maintained by [`List`].
     */
    fn find_raw(
        &self,
        name: &str,
        data_type: Option<DataType>,
    ) -> Result<Option<RawPair>, DecodeError> {
        let mut offset = PAIRS_OFFSET;

        loop {
            let decoder = xdr::Decoder::from_bytes(&self.data[offset..self.used]);

            let encoded_size = match pair_body_length(&decoder)? {
                Some(v) => PAIR_HEADER_LENGTH + v,
                None => return Ok(None),
            };

            let pair_name = decoder.get_str()?;
            let tag = decoder.get_u32()?;

            // Same name but a different type is not our pair.
            let type_matches = match data_type {
                None => true,
                Some(v) => v as u32 == tag,
            };
            if pair_name == name && type_matches {
                return Ok(Some(RawPair {
                    offset: offset,
                    encoded_size: encoded_size,
                }));
            }

            // Skip to the next pair header.
            let next = offset + encoded_size;
            if next + PAIR_HEADER_LENGTH > self.used {
                return Err(DecodeError::InvalidEncodedSize {
                    encoded_size: encoded_size,
                    used: next,
                });
            }
            offset = next;
        }
    }

    /** Finds a pair by name and type, and decodes its value.
     *
     * A pair with a matching name but a different type is skipped. String
     * and nested list values are borrowed views into the list buffer.
     *
     * # Errors
     *
     * Returns [`DecodeError`] on error.
     */
    pub fn find(
        &self,
        name: &str,
        data_type: DataType,
    ) -> Result<Option<DecodedValue>, DecodeError> {
        let decoder = self.decoder()?;

        loop {
            match decoder.next_pair()? {
                Some(pair) => {
                    if pair.name == name && pair.data_type() == data_type {
                        return Ok(Some(pair.value));
                    }
                }
                None => return Ok(None),
            }
        }
    }

    /// Returns true if a pair with the name exists, of any type.
    pub fn exists(&self, name: &str) -> bool {
        matches!(self.find_raw(name, None), Ok(Some(_)))
    }

    /** Removes the pair matching name and type.
     *
     * The tail of the buffer (terminator included) shifts left over the
     * removed pair. A pair with the same name but a different type is left
     * alone.
     *
     * # Errors
     *
     * Returns [`ListError::NotFound`] if no pair matches; the buffer is
     * unchanged.
     */
    pub fn remove(&mut self, name: &str, data_type: DataType) -> Result<(), ListError> {
        if name.is_empty() {
            return Err(ListError::EmptyName {});
        }

        match self.find_raw(name, Some(data_type))? {
            Some(pair) => {
                let tail = pair.offset + pair.encoded_size;
                self.data.copy_within(tail..self.used, pair.offset);
                self.used -= pair.encoded_size;
                Ok(())
            }
            None => Err(ListError::NotFound {
                name: name.into(),
                data_type: data_type,
            }),
        }
    }

    /// Grows the buffer so that a pair of `encoded_size` bytes and a fresh
    /// terminator fit after the current content.
    fn grow(&mut self, encoded_size: usize) {
        if self.data.len() - self.used < encoded_size + TERMINATOR_LENGTH {
            let length = self.data.len() + encoded_size + TERMINATOR_LENGTH;
            self.data.resize(length, 0);
        }
    }

    /** Adds a [`u64`] pair.
     *
     * Under [`Unique::Name`] an existing `u64` pair with the same name is
     * removed first. The new pair overwrites the terminator, and a fresh
     * terminator follows it.
     *
     * # Errors
     *
     * Returns [`ListError`] if the name is empty; the buffer is unchanged on
     * error.
     */
    pub fn add_uint64(&mut self, name: &str, value: u64) -> Result<(), ListError> {
        if name.is_empty() {
            return Err(ListError::EmptyName {});
        }

        if self.unique() == Unique::Name {
            match self.remove(name, DataType::Uint64) {
                Ok(()) | Err(ListError::NotFound { .. }) => (),
                Err(e) => return Err(e),
            }
        }

        let name_length = name.len();
        let value_length = 8;
        let encoded_size = PAIR_FIXED_LENGTH + align4(name_length) + align4(value_length);
        let decoded_size = align8(4 * 4 + name_length + 1) + value_length;

        self.grow(encoded_size);

        // Overwrite the old terminator with the pair, and zero a new one.
        let start = self.used - TERMINATOR_LENGTH;
        let region = &mut self.data[start..start + encoded_size + TERMINATOR_LENGTH];
        region.fill(0);

        let mut encoder = xdr::Encoder::to_bytes(region);
        encoder.put_usize(encoded_size)?;
        encoder.put_usize(decoded_size)?;
        encoder.put_str(name)?;
        encoder.put_u32(DataType::Uint64 as u32)?;
        encoder.put_u32(1)?;
        encoder.put_u64(value)?;

        self.used += encoded_size;
        Ok(())
    }

    /** Adds a string pair.
     *
     * Under [`Unique::Name`] an existing string pair with the same name is
     * removed first. An empty value adds an empty string pair; whether an
     * empty value means removal is a caller convention.
     *
     * # Errors
     *
     * Returns [`ListError`] if the name is empty; the buffer is unchanged on
     * error.
     */
    pub fn add_string(&mut self, name: &str, value: &str) -> Result<(), ListError> {
        if name.is_empty() {
            return Err(ListError::EmptyName {});
        }

        if self.unique() == Unique::Name {
            match self.remove(name, DataType::String) {
                Ok(()) | Err(ListError::NotFound { .. }) => (),
                Err(e) => return Err(e),
            }
        }

        let name_length = name.len();
        let value_length = value.len();
        let encoded_size = PAIR_FIXED_LENGTH + align4(name_length) + align4(4 + value_length);
        let decoded_size = align8(4 * 4 + name_length + 1) + align8(value_length + 1);

        self.grow(encoded_size);

        // Overwrite the old terminator with the pair, and zero a new one.
        let start = self.used - TERMINATOR_LENGTH;
        let region = &mut self.data[start..start + encoded_size + TERMINATOR_LENGTH];
        region.fill(0);

        let mut encoder = xdr::Encoder::to_bytes(region);
        encoder.put_usize(encoded_size)?;
        encoder.put_usize(decoded_size)?;
        encoder.put_str(name)?;
        encoder.put_u32(DataType::String as u32)?;
        encoder.put_u32(1)?;
        encoder.put_str(value)?;

        self.used += encoded_size;
        Ok(())
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Change debug printing to print sizes instead of raw data.
        f.debug_struct("List")
            .field("capacity", &self.data.len())
            .field("used", &self.used)
            .field("unique", &self.unique())
            .finish()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decoder() {
            Ok(decoder) => decoder.dump(f, 0),
            Err(_) => Err(fmt::Error),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum ListError {
    /** Decoding error while walking the list.
     *
     * - `err` - Error.
     */
    Decode { err: DecodeError },

    /** A pair name must not be empty.
     */
    EmptyName {},

    /** Encoding error while appending a pair.
     *
     * - `err` - Error.
     */
    Encode { err: xdr::EncodeError },

    /** No pair with the given name and type.
     *
     * - `name`      - Truncated copy of the name.
     * - `data_type` - Requested data type.
     */
    NotFound { name: str16, data_type: DataType },
}

impl From<DecodeError> for ListError {
    fn from(value: DecodeError) -> Self {
        ListError::Decode { err: value }
    }
}

impl From<xdr::EncodeError> for ListError {
    fn from(value: xdr::EncodeError) -> Self {
        ListError::Encode { err: value }
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::Decode { err } => {
                write!(f, "NV List decode error: {err}")
            }
            ListError::EmptyName {} => {
                write!(f, "NV List empty pair name")
            }
            ListError::Encode { err } => {
                write!(f, "NV List encode error: {err}")
            }
            ListError::NotFound { name, data_type } => {
                write!(f, "NV List pair '{name}' of type {data_type} not found")
            }
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for ListError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ListError::Decode { err } => Some(err),
            ListError::Encode { err } => Some(err),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::nv::{DataType, DecodedValue, List, ListError, Unique};

    /** The serialized form of:
     *
     * ```text
     * version:          (uint64) 1
     * freebsd:bootonce: (string) "zfs:tank/ROOT/default:"
     * ```
     *
     * as written by a little endian host.
     */
    const BOOTENV: [u8; 120] = [
        0x01, 0x01, 0x00, 0x00, // encoding, endian, reserved, reserved
        0x00, 0x00, 0x00, 0x00, // version
        0x00, 0x00, 0x00, 0x01, // flags NV_UNIQUE_NAME
        // version = (uint64) 1
        0x00, 0x00, 0x00, 0x24, // encoded size 36
        0x00, 0x00, 0x00, 0x20, // decoded size 32
        0x00, 0x00, 0x00, 0x07, // name length 7
        0x76, 0x65, 0x72, 0x73, 0x69, 0x6f, 0x6e, 0x00, // "version" and padding
        0x00, 0x00, 0x00, 0x08, // DATA_TYPE_UINT64
        0x00, 0x00, 0x00, 0x01, // one element
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // 1
        // freebsd:bootonce = (string) "zfs:tank/ROOT/default:"
        0x00, 0x00, 0x00, 0x40, // encoded size 64
        0x00, 0x00, 0x00, 0x40, // decoded size 64
        0x00, 0x00, 0x00, 0x10, // name length 16
        0x66, 0x72, 0x65, 0x65, 0x62, 0x73, 0x64, 0x3a, // "freebsd:"
        0x62, 0x6f, 0x6f, 0x74, 0x6f, 0x6e, 0x63, 0x65, // "bootonce"
        0x00, 0x00, 0x00, 0x09, // DATA_TYPE_STRING
        0x00, 0x00, 0x00, 0x01, // one element
        0x00, 0x00, 0x00, 0x16, // string length 22
        0x7a, 0x66, 0x73, 0x3a, 0x74, 0x61, 0x6e, 0x6b, // "zfs:tank"
        0x2f, 0x52, 0x4f, 0x4f, 0x54, 0x2f, 0x64, 0x65, // "/ROOT/de"
        0x66, 0x61, 0x75, 0x6c, 0x74, 0x3a, 0x00, 0x00, // "fault:" and padding
        // terminator
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn create_empty() {
        let list = List::create(Unique::Name);

        assert_eq!(list.size(), 20);
        assert_eq!(
            list.as_bytes(),
            &[
                0x01, 0x01, 0x00, 0x00, // encoding, endian, reserved, reserved
                0x00, 0x00, 0x00, 0x00, // version
                0x00, 0x00, 0x00, 0x01, // flags
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // terminator
            ]
        );

        // An empty list round trips.
        let copy = List::import(list.as_bytes()).unwrap();
        assert_eq!(copy.as_bytes(), list.as_bytes());
    }

    #[test]
    fn add_builds_byte_exact_stream() {
        let mut list = List::create(Unique::Name);
        list.add_uint64("version", 1).unwrap();
        list.add_string("freebsd:bootonce", "zfs:tank/ROOT/default:")
            .unwrap();

        assert_eq!(list.as_bytes(), &BOOTENV);
    }

    #[test]
    fn import_reexports_byte_for_byte() {
        let list = List::import(&BOOTENV).unwrap();
        assert_eq!(list.as_bytes(), &BOOTENV);

        match list.find("version", DataType::Uint64).unwrap() {
            Some(DecodedValue::Uint64(v)) => assert_eq!(v, 1),
            v => panic!("unexpected value {v:?}"),
        }
        match list.find("freebsd:bootonce", DataType::String).unwrap() {
            Some(DecodedValue::String(v)) => assert_eq!(v, "zfs:tank/ROOT/default:"),
            v => panic!("unexpected value {v:?}"),
        }
    }

    #[test]
    fn import_ignores_trailing_bytes() {
        let mut stream = BOOTENV.to_vec();
        stream.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        let list = List::import(&stream).unwrap();
        assert_eq!(list.as_bytes(), &BOOTENV);
    }

    #[test]
    fn import_rejects_bad_header() {
        // Unknown encoding.
        let mut stream = BOOTENV;
        stream[0] = 0x02;
        assert!(List::import(&stream).is_err());

        // Bad endian byte.
        let mut stream = BOOTENV;
        stream[1] = 0x07;
        assert!(List::import(&stream).is_err());

        // Non-zero reserved byte.
        let mut stream = BOOTENV;
        stream[2] = 0x01;
        assert!(List::import(&stream).is_err());

        // Bad version.
        let mut stream = BOOTENV;
        stream[7] = 0x01;
        assert!(List::import(&stream).is_err());

        // Flags without NV_UNIQUE_NAME.
        let mut stream = BOOTENV;
        stream[11] = 0x00;
        assert!(List::import(&stream).is_err());
    }

    #[test]
    fn import_rejects_truncation() {
        // Drop the terminator.
        assert!(List::import(&BOOTENV[..BOOTENV.len() - 8]).is_err());

        // Cut a pair in half.
        assert!(List::import(&BOOTENV[..40]).is_err());
    }

    #[test]
    fn size_formula_matches_walk() {
        let list = List::import(&BOOTENV).unwrap();
        let stream = list.as_bytes();

        // Each pair header stores the distance to the next one.
        let mut offset = 12;
        let mut sizes = alloc::vec::Vec::new();
        loop {
            let encoded = u32::from_be_bytes(stream[offset..offset + 4].try_into().unwrap());
            if encoded == 0 {
                break;
            }
            sizes.push(encoded as usize);
            offset += encoded as usize;
        }

        assert_eq!(sizes, [36, 64]);
        assert_eq!(offset, stream.len() - 8);
    }

    #[test]
    fn terminator_survives_mutation() {
        let mut list = List::create(Unique::Name);

        list.add_uint64("version", 1).unwrap();
        list.add_string("a", "one").unwrap();
        list.add_string("b", "two").unwrap();
        list.remove("a", DataType::String).unwrap();
        list.add_string("c", "three").unwrap();
        list.remove("version", DataType::Uint64).unwrap();

        let stream = list.as_bytes();
        assert_eq!(&stream[stream.len() - 8..], &[0; 8]);

        // Still a valid stream.
        let copy = List::import(stream).unwrap();
        assert_eq!(copy.as_bytes(), stream);
    }

    #[test]
    fn unique_name_replaces_pair() {
        let mut list = List::create(Unique::Name);

        list.add_string("k", "v1").unwrap();
        list.add_string("k", "v2").unwrap();

        match list.find("k", DataType::String).unwrap() {
            Some(DecodedValue::String(v)) => assert_eq!(v, "v2"),
            v => panic!("unexpected value {v:?}"),
        }

        // Exactly one pair left.
        let decoder = list.decoder().unwrap();
        let mut count = 0;
        while decoder.next_pair().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn unique_name_keeps_other_types() {
        let mut list = List::create(Unique::Name);

        // Same name, different types: both survive.
        list.add_uint64("k", 7).unwrap();
        list.add_string("k", "x").unwrap();

        match list.find("k", DataType::Uint64).unwrap() {
            Some(DecodedValue::Uint64(v)) => assert_eq!(v, 7),
            v => panic!("unexpected value {v:?}"),
        }
        match list.find("k", DataType::String).unwrap() {
            Some(DecodedValue::String(v)) => assert_eq!(v, "x"),
            v => panic!("unexpected value {v:?}"),
        }
    }

    #[test]
    fn remove_is_idempotent() {
        let mut list = List::import(&BOOTENV).unwrap();

        list.remove("freebsd:bootonce", DataType::String).unwrap();
        assert!(list
            .find("freebsd:bootonce", DataType::String)
            .unwrap()
            .is_none());

        let before = list.as_bytes().to_vec();
        match list.remove("freebsd:bootonce", DataType::String) {
            Err(ListError::NotFound { .. }) => (),
            v => panic!("unexpected result {v:?}"),
        }
        assert_eq!(list.as_bytes(), &before[..]);

        // Only the version pair and the terminator remain.
        assert_eq!(list.size(), 12 + 36 + 8);
    }

    #[test]
    fn remove_requires_matching_type() {
        let mut list = List::import(&BOOTENV).unwrap();

        match list.remove("freebsd:bootonce", DataType::Uint64) {
            Err(ListError::NotFound { .. }) => (),
            v => panic!("unexpected result {v:?}"),
        }
        assert!(list.exists("freebsd:bootonce"));
    }

    #[test]
    fn add_rejects_empty_name() {
        let mut list = List::create(Unique::Name);

        assert!(matches!(
            list.add_uint64("", 1),
            Err(ListError::EmptyName {})
        ));
        assert!(matches!(
            list.add_string("", "x"),
            Err(ListError::EmptyName {})
        ));
        assert_eq!(list.size(), 20);
    }

    #[test]
    fn add_empty_string_value() {
        // The core stores an empty string; removal on empty value is a
        // caller convention.
        let mut list = List::create(Unique::Name);
        list.add_string("k", "").unwrap();

        match list.find("k", DataType::String).unwrap() {
            Some(DecodedValue::String(v)) => assert_eq!(v, ""),
            v => panic!("unexpected value {v:?}"),
        }
    }

    #[test]
    fn exists_matches_any_type() {
        let list = List::import(&BOOTENV).unwrap();

        assert!(list.exists("version"));
        assert!(list.exists("freebsd:bootonce"));
        assert!(!list.exists("freebsd:bootonce-used"));
    }

    #[test]
    fn round_trip_preserves_pairs() {
        let mut list = List::create(Unique::Name);
        list.add_uint64("version", 1).unwrap();
        list.add_uint64("txg", 0xdeadbeef).unwrap();
        list.add_string("freebsd:bootonce", "zfs:tank:").unwrap();
        list.add_string("grub:envmap", "k=v").unwrap();

        let copy = List::import(list.as_bytes()).unwrap();
        assert_eq!(copy.as_bytes(), list.as_bytes());

        // Pair for pair, in order.
        let a = list.decoder().unwrap();
        let b = copy.decoder().unwrap();
        loop {
            match (a.next_pair().unwrap(), b.next_pair().unwrap()) {
                (None, None) => break,
                (Some(x), Some(y)) => {
                    assert_eq!(x.name, y.name);
                    assert_eq!(x.data_type(), y.data_type());
                    assert_eq!(x.element_count(), y.element_count());
                }
                (x, y) => panic!("pair mismatch {x:?} {y:?}"),
            }
        }
    }

    #[test]
    fn capacity_grows_and_used_tracks() {
        let mut list = List::create(Unique::Name);
        assert_eq!(list.capacity(), 20);

        list.add_uint64("version", 1).unwrap();
        assert_eq!(list.size(), 20 + 36);
        assert!(list.capacity() >= list.size());

        list.remove("version", DataType::Uint64).unwrap();
        assert_eq!(list.size(), 20);
    }

    #[test]
    fn display_dump() {
        let mut list = List::create(Unique::Name);
        list.add_uint64("version", 1).unwrap();
        list.add_string("freebsd:bootonce", "zfs:tank/ROOT/default:")
            .unwrap();

        let text = alloc::format!("{list}");
        assert_eq!(
            text,
            "Uint64 [1] version = 0x1\n\
             String [1] freebsd:bootonce = \"zfs:tank/ROOT/default:\"\n\
             End of nvlist\n"
        );
    }
}
