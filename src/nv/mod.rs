/*! Name Value list decoder, encoder, and editor.
 *
 * A Name Value list is a sequence of named, typed pairs, as stored in the
 * `bootenv` area of a ZFS pool label.
 *
 * Header
 * ======
 * The first four bytes of the parent list are:
 * - [`Encoding`]
 * - An endian byte recording the origin host (1 little endian, 0 big endian)
 * - Two zero bytes
 *
 * For [`Encoding::Xdr`] the rest of the data is always big endian, no matter
 * what the endian byte says. Nested lists inherit the header of the parent
 * list, and do not repeat it.
 *
 * List
 * ====
 * A list starts with:
 * - [`u32`] version
 * - [`u32`] flags ([`Unique`])
 *
 * And is followed by a sequence of pairs.
 *
 * Pair
 * ====
 * A pair starts with:
 * - [`u32`] encoded size (of the entire pair, including this number)
 * - [`u32`] decoded size (in memory size, informational)
 *
 * If both values are zero, then this is the end of the list.
 *
 * If they are not zero, then what follows is:
 * - [`str`] name
 * - [`u32`] [`DataType`]
 * - [`u32`] count for number of values in this pair
 *   - 0 for [`DataType::Boolean`].
 *   - 1 for all non array types [`DataType::Uint64`] etc...
 *   - 0 to N for array types [`DataType::Uint64Array`] etc...
 * - A value whose encoding corresponds to [`DataType`] and count
 *
 * The encoded size of a pair is the byte distance from the start of its pair
 * header to the start of the next pair header (or the terminator).
 *
 * Booleans
 * ========
 * A note about the two different boolean data types:
 * - [`DataType::Boolean`] has a count of 0, has no value, and is used as a
 *   flag. For example, the `features_for_read` list of a pool label contains
 *   a sequence of flags, such as `org.openzfs:blake3`
 * - [`DataType::BooleanValue`] has a count of 1, and an actual value that can
 *   be [`true`] or [`false`]
 *
 * Reading
 * =======
 * [`Decoder`] walks a borrowed byte stream and decodes pairs lazily. Nested
 * lists and list arrays come back as further borrowed [`Decoder`] values,
 * bounded by the lifetime of the parent data.
 *
 * Writing
 * =======
 * [`List`] owns a serialized buffer and edits it in place: adding a pair
 * overwrites the terminator and appends a new one, removing a pair shifts
 * the tail of the buffer left. The buffer is valid wire format after every
 * operation.
 */
use core::fmt;
use core::result::Result;
use core::result::Result::{Err, Ok};

#[cfg(feature = "std")]
use std::error;

extern crate strum;

use crate::xdr;

mod decoder;
mod list;

pub use decoder::{ArrayDecoder, DecodedPair, DecodedValue, Decoder};
pub use list::{List, ListError};

////////////////////////////////////////////////////////////////////////////////

/// Name Value Pair Data Type.
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq, strum::Display)]
pub enum DataType {
    Boolean = 1,

    Byte,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    String,

    ByteArray,
    Int16Array,
    Uint16Array,
    Int32Array,
    Uint32Array,
    Int64Array,
    Uint64Array,
    StringArray,

    HrTime,

    NvList,
    NvListArray,

    BooleanValue,

    Int8,
    Uint8,

    BooleanArray,
    Int8Array,
    Uint8Array,

    Double,
}

impl DataType {
    /** Returns true for the array types.
     *
     * Array pairs carry any number of elements; a [`DataType::Boolean`]
     * flag carries none, and every other type carries exactly one.
     */
    pub fn is_array(self) -> bool {
        matches!(
            self,
            DataType::ByteArray
                | DataType::Int16Array
                | DataType::Uint16Array
                | DataType::Int32Array
                | DataType::Uint32Array
                | DataType::Int64Array
                | DataType::Uint64Array
                | DataType::StringArray
                | DataType::NvListArray
                | DataType::BooleanArray
                | DataType::Int8Array
                | DataType::Uint8Array
        )
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Byte length of a pair header: the encoded size and decoded size words.
/// A header of two zero words terminates a list.
pub(crate) const PAIR_HEADER_LENGTH: usize = 8;

/** Reads one pair header during a byte stream walk.
 *
 * Returns the byte length of the pair body (everything after the header),
 * or [`None`] for the end of list terminator. Shared by the lazy pair
 * decoder and the raw buffer walks of [`List`].
 *
 * # Errors
 *
 * Returns [`DecodeError`] if the header is truncated, or the encoded size
 * does not even cover the header itself.
 */
pub(crate) fn pair_body_length(decoder: &xdr::Decoder) -> Result<Option<usize>, DecodeError> {
    let encoded_size = decoder.get_usize()?;
    let decoded_size = decoder.get_usize()?;

    if encoded_size == 0 && decoded_size == 0 {
        return Ok(None);
    }

    match encoded_size.checked_sub(PAIR_HEADER_LENGTH) {
        Some(v) => Ok(Some(v)),
        None => Err(DecodeError::InvalidEncodedSize {
            encoded_size: encoded_size,
            used: PAIR_HEADER_LENGTH,
        }),
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Name Value List encoding.
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq, strum::Display)]
pub enum Encoding {
    Native = 0,
    Xdr,
}

/// Name Value List Unique.
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq, strum::Display)]
pub enum Unique {
    None = 0,
    Name = 1,
    NameType = 2,
}

/** Origin host byte order recorded in the list header.
 *
 * Metadata only: for [`Encoding::Xdr`] the wire fields are big endian no
 * matter what this byte says.
 */
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq, strum::Display)]
pub enum Endian {
    Big = 0,
    Little = 1,
}

/** Byte order of this host. */
#[cfg(target_endian = "big")]
pub const NATIVE_ENDIAN: Endian = Endian::Big;

/** Byte order of this host. */
#[cfg(target_endian = "little")]
pub const NATIVE_ENDIAN: Endian = Endian::Little;

////////////////////////////////////////////////////////////////////////////////

/** Finds a required pair by name, and unwraps the expected value variant.
 *
 * Expands to a [`Result`] of the value, or the caller's error type. The
 * error type must have `MissingValue { name }` and
 * `ValueTypeMismatch { name, data_type }` variants, and a
 * [`From`]`<`[`DecodeError`]`>` conversion.
 */
macro_rules! find_require {
    ($decoder:expr, $name:expr, $variant:ident, $err:ident) => {
        match $decoder.find($name) {
            Ok(Some(pair)) => match pair.value {
                $crate::nv::DecodedValue::$variant(v) => Ok(v),
                _ => Err($err::ValueTypeMismatch {
                    name: $name,
                    data_type: pair.data_type(),
                }),
            },
            Ok(None) => Err($err::MissingValue { name: $name }),
            Err(e) => Err(e.into()),
        }
    };
}

/** Finds an optional pair by name, and unwraps the expected value variant.
 *
 * Like [`find_require!`], but a missing pair is `Ok(None)`.
 */
macro_rules! find_optional {
    ($decoder:expr, $name:expr, $variant:ident, $err:ident) => {
        match $decoder.find($name) {
            Ok(Some(pair)) => match pair.value {
                $crate::nv::DecodedValue::$variant(v) => Ok(Some(v)),
                _ => Err($err::ValueTypeMismatch {
                    name: $name,
                    data_type: pair.data_type(),
                }),
            },
            Ok(None) => Ok(None),
            Err(e) => Err(e.into()),
        }
    };
}

pub(crate) use {find_optional, find_require};

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum DecodeError {
    /** End of array.
     */
    EndOfArray {},

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
        detail: &'static str,
    },

    /** Data type has an invalid count.
     *
     * - `data_type` - Data type.
     * - `count`     - Count.
     */
    InvalidCount { data_type: DataType, count: usize },

    /** Invalid data_type.
     *
     * - `data_type` - DataType.
     */
    InvalidDataType { data_type: u32 },

    /** Invalid encoded size.
     *
     * - `encoded_size` - Encoded size.
     * - `used` - Bytes used.
     */
    InvalidEncodedSize { encoded_size: usize, used: usize },

    /** Invalid encoding.
     *
     * - `encoding` - Encoding.
     */
    InvalidEncoding { encoding: u8 },

    /** Invalid endian.
     *
     * - `endian` - Endian.
     */
    InvalidEndian { endian: u8 },

    /** Invalid flags.
     *
     * - `flags` - Flags.
     */
    InvalidFlags { flags: u32 },

    /** Invalid reserved bytes.
     *
     * - `reserved` - Reserved.
     */
    InvalidReservedBytes { reserved: [u8; 2] },

    /** Invalid version.
     *
     * - `version` - Version.
     */
    InvalidVersion { version: u32 },

    /** Valid but unsupported encoding.
     *
     * - `encoding` - Encoding.
     */
    UnsupportedEncoding { encoding: Encoding },

    /** XDR decoding error.
     *
     * - `err` - Error.
     */
    Xdr { err: xdr::DecodeError },
}

impl From<xdr::DecodeError> for DecodeError {
    fn from(value: xdr::DecodeError) -> Self {
        DecodeError::Xdr { err: value }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::EndOfArray {} => {
                write!(f, "NV List array end")
            }
            DecodeError::EndOfInput {
                offset,
                length,
                count,
                detail,
            } => {
                write!(
                    f,
                    "NV List end of input at offset {offset}, need {count} bytes, total length {length}, detail: {detail}"
                )
            }
            DecodeError::InvalidCount { data_type, count } => {
                write!(f, "NV Pair invalid count {count} for data type {data_type}")
            }
            DecodeError::InvalidDataType { data_type } => {
                write!(f, "NV List invalid data type {data_type}")
            }
            DecodeError::InvalidEncodedSize { encoded_size, used } => {
                write!(f, "NV List invalid encoded size {encoded_size} used {used}")
            }
            DecodeError::InvalidEncoding { encoding } => {
                write!(f, "NV List invalid encoding {encoding}")
            }
            DecodeError::InvalidEndian { endian } => {
                write!(f, "NV List invalid endian {endian}")
            }
            DecodeError::InvalidFlags { flags } => {
                write!(f, "NV List invalid flags {flags}")
            }
            DecodeError::InvalidReservedBytes { reserved } => {
                let a = reserved[0];
                let b = reserved[1];
                write!(f, "NV List invalid reserved bytes 0x{a:02x} 0x{b:02x}")
            }
            DecodeError::InvalidVersion { version } => {
                write!(f, "NV List invalid version {version}")
            }
            DecodeError::UnsupportedEncoding { encoding } => {
                write!(f, "NV List unsupported encoding {encoding}")
            }
            DecodeError::Xdr { err } => {
                write!(f, "NV List XDR decoding error: {err}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodeError::Xdr { err } => Some(err),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
