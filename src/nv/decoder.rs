/*! Borrowed Name Value list decoding.
 *
 * [`Decoder`] walks a serialized list without copying it. Pair values come
 * back as [`DecodedValue`] views into the source bytes; nested lists and
 * list arrays come back as further [`Decoder`] values over the payload
 * region of their pair, so recursion never allocates.
 */
use core::cell::Cell;
use core::fmt;
use core::marker::PhantomData;
use core::result::Result;
use core::result::Result::{Err, Ok};

use enum_as_inner::EnumAsInner;

use crate::nv::{
    pair_body_length, DataType, DecodeError, Encoding, Endian, Unique, PAIR_HEADER_LENGTH,
};
use crate::xdr;

////////////////////////////////////////////////////////////////////////////////

/** A Name Value list decoder over borrowed bytes.
 *
 * Produced by [`Decoder::from_bytes`] for a full stream (with the four byte
 * header), or internally for the body of a nested list. A [`Decoder`] is a
 * read only view; it is invalidated by any mutation of the source buffer,
 * which the borrow checker enforces.
 */
#[derive(Debug)]
pub struct Decoder<'a> {
    decoder: xdr::Decoder<'a>,
    encoding: Encoding,
    endian: Endian,
    pub unique: Unique,
}

/// Decoded Name Value Pair Data Value.
#[derive(Debug, EnumAsInner)]
pub enum DecodedValue<'a> {
    Boolean(),

    Byte(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    String(&'a str),

    ByteArray(&'a [u8]),
    Int16Array(ArrayDecoder<'a, i16>),
    Uint16Array(ArrayDecoder<'a, u16>),
    Int32Array(ArrayDecoder<'a, i32>),
    Uint32Array(ArrayDecoder<'a, u32>),
    Int64Array(ArrayDecoder<'a, i64>),
    Uint64Array(ArrayDecoder<'a, u64>),
    StringArray(ArrayDecoder<'a, &'a str>),

    HrTime(i64),

    NvList(Decoder<'a>),
    NvListArray(ArrayDecoder<'a, Decoder<'a>>),

    BooleanValue(bool),

    Int8(i8),
    Uint8(u8),

    BooleanArray(ArrayDecoder<'a, bool>),
    Int8Array(ArrayDecoder<'a, i8>),
    Uint8Array(ArrayDecoder<'a, u8>),

    Double(f64),
}

/// Name Value Pair decoded from a byte stream.
#[derive(Debug)]
pub struct DecodedPair<'a> {
    pub name: &'a str,
    pub value: DecodedValue<'a>,
}

impl DecodedPair<'_> {
    /// Gets the data type of the decoded pair.
    pub fn data_type(&self) -> DataType {
        match self.value {
            DecodedValue::Boolean() => DataType::Boolean,

            DecodedValue::Byte(_) => DataType::Byte,
            DecodedValue::Int16(_) => DataType::Int16,
            DecodedValue::Uint16(_) => DataType::Uint16,
            DecodedValue::Int32(_) => DataType::Int32,
            DecodedValue::Uint32(_) => DataType::Uint32,
            DecodedValue::Int64(_) => DataType::Int64,
            DecodedValue::Uint64(_) => DataType::Uint64,
            DecodedValue::String(_) => DataType::String,

            DecodedValue::ByteArray(_) => DataType::ByteArray,
            DecodedValue::Int16Array(_) => DataType::Int16Array,
            DecodedValue::Uint16Array(_) => DataType::Uint16Array,
            DecodedValue::Int32Array(_) => DataType::Int32Array,
            DecodedValue::Uint32Array(_) => DataType::Uint32Array,
            DecodedValue::Int64Array(_) => DataType::Int64Array,
            DecodedValue::Uint64Array(_) => DataType::Uint64Array,
            DecodedValue::StringArray(_) => DataType::StringArray,

            DecodedValue::HrTime(_) => DataType::HrTime,

            DecodedValue::NvList(_) => DataType::NvList,
            DecodedValue::NvListArray(_) => DataType::NvListArray,

            DecodedValue::BooleanValue(_) => DataType::BooleanValue,

            DecodedValue::Int8(_) => DataType::Int8,
            DecodedValue::Uint8(_) => DataType::Uint8,

            DecodedValue::BooleanArray(_) => DataType::BooleanArray,
            DecodedValue::Int8Array(_) => DataType::Int8Array,
            DecodedValue::Uint8Array(_) => DataType::Uint8Array,

            DecodedValue::Double(_) => DataType::Double,
        }
    }

    /// Gets the element count of the decoded pair.
    pub fn element_count(&self) -> usize {
        match &self.value {
            DecodedValue::Boolean() => 0,

            DecodedValue::ByteArray(v) => v.len(),
            DecodedValue::Int16Array(v) => v.capacity(),
            DecodedValue::Uint16Array(v) => v.capacity(),
            DecodedValue::Int32Array(v) => v.capacity(),
            DecodedValue::Uint32Array(v) => v.capacity(),
            DecodedValue::Int64Array(v) => v.capacity(),
            DecodedValue::Uint64Array(v) => v.capacity(),
            DecodedValue::StringArray(v) => v.capacity(),
            DecodedValue::NvListArray(v) => v.capacity(),
            DecodedValue::BooleanArray(v) => v.capacity(),
            DecodedValue::Int8Array(v) => v.capacity(),
            DecodedValue::Uint8Array(v) => v.capacity(),

            _ => 1,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

impl<'a> Decoder<'a> {
    /** Instantiates a [`Decoder`] from a serialized stream.
     *
     * The stream leads with the four byte envelope (encoding byte, origin
     * endian byte, two reserved zero bytes); the list body follows.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if the envelope, version, or flags do not
     * describe a readable list.
     */
    pub fn from_bytes(data: &'a [u8]) -> Result<Decoder<'a>, DecodeError> {
        if data.len() < 4 {
            return Err(DecodeError::EndOfInput {
                offset: 0,
                length: data.len(),
                count: 4,
                detail: "stream too short for the envelope",
            });
        }

        if data[2] != 0 || data[3] != 0 {
            return Err(DecodeError::InvalidReservedBytes {
                reserved: [data[2], data[3]],
            });
        }

        let encoding: Encoding = num::FromPrimitive::from_u8(data[0])
            .ok_or(DecodeError::InvalidEncoding { encoding: data[0] })?;
        let endian: Endian = num::FromPrimitive::from_u8(data[1])
            .ok_or(DecodeError::InvalidEndian { endian: data[1] })?;

        Decoder::open(encoding, endian, &data[4..])
    }

    /** Opens a list body: a version word, a flags word, then pairs.
     *
     * Both the top level body and every nested body start this way. The
     * envelope is never repeated, so a nested body takes encoding and
     * endian from its parent.
     *
     * # Errors
     *
     * Returns [`DecodeError`] for a non XDR encoding, a non zero version,
     * or flags outside the defined uniqueness values.
     */
    fn open(
        encoding: Encoding,
        endian: Endian,
        body: &'a [u8],
    ) -> Result<Decoder<'a>, DecodeError> {
        if let Encoding::Native = encoding {
            return Err(DecodeError::UnsupportedEncoding { encoding: encoding });
        }

        // An XDR body is big endian no matter what the endian byte says.
        let decoder = xdr::Decoder::from_bytes(body);

        let version: u32 = decoder.get()?;
        let flags: u32 = decoder.get()?;

        if version != 0 {
            return Err(DecodeError::InvalidVersion { version: version });
        }

        // Anything beyond the uniqueness values is not a list we know.
        let unique: Unique =
            num::FromPrimitive::from_u32(flags).ok_or(DecodeError::InvalidFlags { flags: flags })?;

        Ok(Decoder {
            decoder: decoder,
            encoding: encoding,
            endian: endian,
            unique: unique,
        })
    }

    /// Opens a nested list body, which inherits this list's envelope.
    fn child(&self, body: &'a [u8]) -> Result<Decoder<'a>, DecodeError> {
        Decoder::open(self.encoding, self.endian, body)
    }

    /// Origin host byte order recorded in the list header.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Number of bytes remaining to be decoded.
    fn remaining(&self) -> usize {
        self.decoder.len()
    }

    /** Gets the next [`DecodedPair`].
     *
     * - Returns [`None`] at end of list.
     *
     * # Errors
     *
     * Returns [`DecodeError`] on error.
     */
    pub fn next_pair(&self) -> Result<Option<DecodedPair<'a>>, DecodeError> {
        let body_length = match pair_body_length(&self.decoder)? {
            Some(v) => v,
            None => return Ok(None),
        };

        // Slice the whole pair region off up front. That bounds the value
        // decode, and turns the encoded size check into an emptiness test.
        let pair = xdr::Decoder::from_bytes(self.decoder.get_n_bytes(body_length)?);

        let name = pair.get_str()?;

        let tag = pair.get_u32()?;
        let data_type: DataType = num::FromPrimitive::from_u32(tag)
            .ok_or(DecodeError::InvalidDataType { data_type: tag })?;

        let count = pair.get_usize()?;

        // A flag carries no elements, every other scalar exactly one.
        let expected = if let DataType::Boolean = data_type { 0 } else { 1 };
        if !data_type.is_array() && count != expected {
            return Err(DecodeError::InvalidCount {
                data_type: data_type,
                count: count,
            });
        }

        let value = match data_type {
            DataType::Boolean => DecodedValue::Boolean(),

            // One word scalars; narrow types are widened on the wire.
            DataType::Byte => DecodedValue::Byte(pair.get()?),
            DataType::Int8 => DecodedValue::Int8(pair.get()?),
            DataType::Uint8 => DecodedValue::Uint8(pair.get()?),
            DataType::Int16 => DecodedValue::Int16(pair.get()?),
            DataType::Uint16 => DecodedValue::Uint16(pair.get()?),
            DataType::Int32 => DecodedValue::Int32(pair.get()?),
            DataType::Uint32 => DecodedValue::Uint32(pair.get()?),
            DataType::BooleanValue => DecodedValue::BooleanValue(pair.get()?),

            // Two word scalars.
            DataType::Int64 => DecodedValue::Int64(pair.get()?),
            DataType::Uint64 => DecodedValue::Uint64(pair.get()?),
            DataType::HrTime => DecodedValue::HrTime(pair.get()?),
            DataType::Double => DecodedValue::Double(pair.get()?),

            DataType::String => DecodedValue::String(pair.get_str()?),

            // Fixed width element arrays.
            DataType::ByteArray => DecodedValue::ByteArray(pair.get_bytes()?),
            DataType::Int8Array => DecodedValue::Int8Array(self.array(&pair, count, 4)?),
            DataType::Uint8Array => DecodedValue::Uint8Array(self.array(&pair, count, 4)?),
            DataType::Int16Array => DecodedValue::Int16Array(self.array(&pair, count, 4)?),
            DataType::Uint16Array => DecodedValue::Uint16Array(self.array(&pair, count, 4)?),
            DataType::Int32Array => DecodedValue::Int32Array(self.array(&pair, count, 4)?),
            DataType::Uint32Array => DecodedValue::Uint32Array(self.array(&pair, count, 4)?),
            DataType::Int64Array => DecodedValue::Int64Array(self.array(&pair, count, 8)?),
            DataType::Uint64Array => DecodedValue::Uint64Array(self.array(&pair, count, 8)?),
            DataType::BooleanArray => DecodedValue::BooleanArray(self.array(&pair, count, 4)?),

            // Variable width elements take the rest of the pair region.
            DataType::StringArray => DecodedValue::StringArray(ArrayDecoder::new(
                self.encoding,
                self.endian,
                pair.get_n_bytes(pair.len())?,
                count,
            )),
            DataType::NvList => {
                DecodedValue::NvList(self.child(pair.get_n_bytes(pair.len())?)?)
            }
            DataType::NvListArray => DecodedValue::NvListArray(ArrayDecoder::new(
                self.encoding,
                self.endian,
                pair.get_n_bytes(pair.len())?,
                count,
            )),
        };

        // Every byte of the pair region must have been decoded.
        if !pair.is_empty() {
            let encoded_size = PAIR_HEADER_LENGTH + body_length;
            return Err(DecodeError::InvalidEncodedSize {
                encoded_size: encoded_size,
                used: encoded_size - pair.len(),
            });
        }

        Ok(Some(DecodedPair {
            name: name,
            value: value,
        }))
    }

    /** Builds an [`ArrayDecoder`] over the next `count * width` bytes of a
     * pair region. Narrow integer elements are widened to one word each.
     */
    fn array<T>(
        &self,
        pair: &xdr::Decoder<'a>,
        count: usize,
        width: usize,
    ) -> Result<ArrayDecoder<'a, T>, DecodeError> {
        let data = pair.get_n_bytes(count * width)?;
        Ok(ArrayDecoder::new(self.encoding, self.endian, data, count))
    }

    /** Finds a pair by name.
     *
     * Rewinds the decoder, then scans pairs in serialized order. Returns
     * [`None`] if no pair has the name. After the call the decoder is
     * positioned past the returned pair.
     *
     * # Errors
     *
     * Returns [`DecodeError`] on error.
     */
    pub fn find(&self, name: &str) -> Result<Option<DecodedPair<'a>>, DecodeError> {
        self.reset();

        loop {
            match self.next_pair()? {
                Some(pair) => {
                    if pair.name == name {
                        return Ok(Some(pair));
                    }
                }
                None => return Ok(None),
            }
        }
    }

    /** Walks every pair of the list, recursing into nested lists.
     *
     * Decodes all pairs, all elements of string and boolean arrays, and all
     * nested lists and list array elements, so that a malformed stream is
     * caught up front rather than on first access. Rewinds the decoder when
     * done.
     *
     * # Errors
     *
     * Returns [`DecodeError`] on the first malformed pair.
     */
    pub fn validate(&self) -> Result<(), DecodeError> {
        self.reset();

        loop {
            let pair = match self.next_pair()? {
                Some(v) => v,
                None => break,
            };

            match &pair.value {
                DecodedValue::NvList(child) => child.validate()?,
                DecodedValue::NvListArray(children) => {
                    while children.len() > 0 {
                        children.get()?.validate()?;
                    }
                }
                DecodedValue::StringArray(strings) => {
                    while strings.len() > 0 {
                        strings.get()?;
                    }
                }
                DecodedValue::BooleanArray(booleans) => {
                    while booleans.len() > 0 {
                        booleans.get()?;
                    }
                }
                _ => (),
            }
        }

        self.reset();
        Ok(())
    }

    /// Resets the decoder to the first pair.
    pub fn reset(&self) {
        self.decoder.reset();

        // Skip version and flags.
        let _ = self.decoder.skip(8);
    }

    /** Writes an indented dump of the list.
     *
     * Pairs print as `<type> [<count>] <name>`, with integer values in hex
     * and strings quoted. Nested lists and list array elements recurse with
     * the indent increased by two.
     *
     * # Errors
     *
     * Returns [`fmt::Error`] on a write error, or if the stream turns out to
     * be malformed while walking it.
     */
    pub fn dump<W: fmt::Write>(&self, f: &mut W, indent: usize) -> fmt::Result {
        self.reset();

        loop {
            let pair = match self.next_pair().map_err(|_| fmt::Error)? {
                Some(v) => v,
                None => break,
            };

            write!(f, "{:indent$}", "", indent = indent)?;
            write!(
                f,
                "{} [{}] {}",
                pair.data_type(),
                pair.element_count(),
                pair.name
            )?;

            match &pair.value {
                DecodedValue::Byte(v) => writeln!(f, " = {v:#x}")?,
                DecodedValue::Int16(v) => writeln!(f, " = {v:#x}")?,
                DecodedValue::Uint16(v) => writeln!(f, " = {v:#x}")?,
                DecodedValue::Int32(v) => writeln!(f, " = {v:#x}")?,
                DecodedValue::Uint32(v) => writeln!(f, " = {v:#x}")?,
                DecodedValue::Int64(v) => writeln!(f, " = {v:#x}")?,
                DecodedValue::Uint64(v) => writeln!(f, " = {v:#x}")?,
                DecodedValue::Int8(v) => writeln!(f, " = {v:#x}")?,
                DecodedValue::Uint8(v) => writeln!(f, " = {v:#x}")?,
                DecodedValue::HrTime(v) => writeln!(f, " = {v:#x}")?,

                DecodedValue::String(v) => writeln!(f, " = \"{v}\"")?,
                DecodedValue::BooleanValue(v) => writeln!(f, " = {v}")?,
                DecodedValue::Double(v) => writeln!(f, " = {v}")?,

                DecodedValue::NvList(child) => {
                    writeln!(f)?;
                    child.dump(f, indent + 2)?;
                }
                DecodedValue::NvListArray(children) => {
                    writeln!(f)?;
                    children.reset();
                    let mut index = 0;
                    while children.len() > 0 {
                        let child = children.get().map_err(|_| fmt::Error)?;
                        writeln!(f, "{:indent$}[{index}]", "", indent = indent)?;
                        child.dump(f, indent + 2)?;
                        index += 1;
                    }
                }

                _ => writeln!(f)?,
            }
        }

        writeln!(f, "{:>width$}", "End of nvlist", width = indent + 13)
    }
}

////////////////////////////////////////////////////////////////////////////////

/** A decoder over the elements of an array valued pair.
 *
 * Elements decode one at a time through [`ArrayDecoder::get`]; this is also
 * how iteration moves from one nested list to its next sibling in a list
 * array.
 */
#[derive(Debug)]
pub struct ArrayDecoder<'a, T> {
    decoder: xdr::Decoder<'a>,
    count: usize,
    index: Cell<usize>,
    encoding: Encoding,
    endian: Endian,
    phantom: PhantomData<T>,
}

impl<'a, T> ArrayDecoder<'a, T> {
    fn new(
        encoding: Encoding,
        endian: Endian,
        data: &'a [u8],
        count: usize,
    ) -> ArrayDecoder<'a, T> {
        ArrayDecoder {
            decoder: xdr::Decoder::from_bytes(data),
            count: count,
            index: Cell::new(0),
            encoding: encoding,
            endian: endian,
            phantom: PhantomData,
        }
    }

    /// Returns the number of elements in the entire array.
    pub fn capacity(&self) -> usize {
        self.count
    }

    /// Returns number of elements still to be decoded.
    pub fn len(&self) -> usize {
        match self.count.checked_sub(self.index.get()) {
            Some(v) => v,
            None => 0,
        }
    }

    /// Returns true if all elements have been decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resets the decoder to the start of the data.
    pub fn reset(&self) {
        self.decoder.reset();
        self.index.set(0);
    }

    /** Claims the next element index.
     *
     * # Errors
     *
     * Returns [`DecodeError::EndOfArray`] past the last element.
     */
    fn advance(&self) -> Result<(), DecodeError> {
        let index = self.index.get();

        if index < self.count {
            self.index.set(index + 1);
            Ok(())
        } else {
            Err(DecodeError::EndOfArray {})
        }
    }
}

impl<'a> ArrayDecoder<'a, &'a str> {
    /** Returns the next element.
     *
     * - Call while [`ArrayDecoder::len`] is greater than 0.
     *
     * # Errors
     *
     * Returns [`DecodeError`] on error.
     */
    pub fn get(&self) -> Result<&'a str, DecodeError> {
        self.advance()?;
        Ok(self.decoder.get_str()?)
    }
}

impl<T: xdr::GetFromDecoder> ArrayDecoder<'_, T> {
    /** Returns the next element.
     *
     * - Call while [`ArrayDecoder::len`] is greater than 0.
     *
     * # Errors
     *
     * Returns [`DecodeError`] on error.
     */
    pub fn get(&self) -> Result<T, DecodeError> {
        self.advance()?;
        Ok(self.decoder.get()?)
    }
}

impl<'a> ArrayDecoder<'a, Decoder<'a>> {
    /** Returns the next element, a [`Decoder`] over one nested list body.
     *
     * - Call while [`ArrayDecoder::len`] is greater than 0.
     *
     * # Errors
     *
     * Returns [`DecodeError`] on error.
     */
    pub fn get(&self) -> Result<Decoder<'a>, DecodeError> {
        self.advance()?;

        // Take all remaining bytes.
        let remaining_length = self.decoder.len();
        let data = self.decoder.get_n_bytes(remaining_length)?;

        // Walk one list to find where it ends.
        let scratch = Decoder::open(self.encoding, self.endian, data)?;
        while scratch.next_pair()?.is_some() {}
        let length = remaining_length - scratch.remaining();

        // Rewind, and consume only the bytes of this list.
        self.decoder.rewind(remaining_length)?;
        let data = self.decoder.get_n_bytes(length)?;

        Decoder::open(self.encoding, self.endian, data)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::nv::{DataType, DecodeError, DecodedValue, Decoder, List, Unique};

    /** A list with one nested list pair:
     *
     * ```text
     * child: (nvlist) { guid: (uint64) 0x1122334455667788 }
     * ```
     */
    const NESTED: [u8; 96] = [
        0x01, 0x01, 0x00, 0x00, // encoding, endian, reserved, reserved
        0x00, 0x00, 0x00, 0x00, // version
        0x00, 0x00, 0x00, 0x01, // flags
        // child = (nvlist)
        0x00, 0x00, 0x00, 0x4c, // encoded size 76
        0x00, 0x00, 0x00, 0x58, // decoded size (informational)
        0x00, 0x00, 0x00, 0x05, // name length 5
        0x63, 0x68, 0x69, 0x6c, 0x64, 0x00, 0x00, 0x00, // "child" and padding
        0x00, 0x00, 0x00, 0x13, // DATA_TYPE_NVLIST
        0x00, 0x00, 0x00, 0x01, // one element
        // nested body
        0x00, 0x00, 0x00, 0x00, // version
        0x00, 0x00, 0x00, 0x01, // flags
        0x00, 0x00, 0x00, 0x20, // encoded size 32
        0x00, 0x00, 0x00, 0x20, // decoded size 32
        0x00, 0x00, 0x00, 0x04, // name length 4
        0x67, 0x75, 0x69, 0x64, // "guid"
        0x00, 0x00, 0x00, 0x08, // DATA_TYPE_UINT64
        0x00, 0x00, 0x00, 0x01, // one element
        0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, // value
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // nested terminator
        // terminator
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    /** A list with one nested list array pair:
     *
     * ```text
     * disks: (nvlist array) [{ id: (uint64) 1 }, { id: (uint64) 2 }]
     * ```
     */
    const NESTED_ARRAY: [u8; 144] = [
        0x01, 0x01, 0x00, 0x00, // encoding, endian, reserved, reserved
        0x00, 0x00, 0x00, 0x00, // version
        0x00, 0x00, 0x00, 0x01, // flags
        // disks = (nvlist array)
        0x00, 0x00, 0x00, 0x7c, // encoded size 124
        0x00, 0x00, 0x00, 0x98, // decoded size (informational)
        0x00, 0x00, 0x00, 0x05, // name length 5
        0x64, 0x69, 0x73, 0x6b, 0x73, 0x00, 0x00, 0x00, // "disks" and padding
        0x00, 0x00, 0x00, 0x14, // DATA_TYPE_NVLIST_ARRAY
        0x00, 0x00, 0x00, 0x02, // two elements
        // element 0
        0x00, 0x00, 0x00, 0x00, // version
        0x00, 0x00, 0x00, 0x01, // flags
        0x00, 0x00, 0x00, 0x20, // encoded size 32
        0x00, 0x00, 0x00, 0x20, // decoded size 32
        0x00, 0x00, 0x00, 0x02, // name length 2
        0x69, 0x64, 0x00, 0x00, // "id" and padding
        0x00, 0x00, 0x00, 0x08, // DATA_TYPE_UINT64
        0x00, 0x00, 0x00, 0x01, // one element
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // 1
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // terminator
        // element 1
        0x00, 0x00, 0x00, 0x00, // version
        0x00, 0x00, 0x00, 0x01, // flags
        0x00, 0x00, 0x00, 0x20, // encoded size 32
        0x00, 0x00, 0x00, 0x20, // decoded size 32
        0x00, 0x00, 0x00, 0x02, // name length 2
        0x69, 0x64, 0x00, 0x00, // "id" and padding
        0x00, 0x00, 0x00, 0x08, // DATA_TYPE_UINT64
        0x00, 0x00, 0x00, 0x01, // one element
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, // 2
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // terminator
        // terminator
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn decode_nested_list() {
        let decoder = Decoder::from_bytes(&NESTED).unwrap();

        let pair = decoder.next_pair().unwrap().unwrap();
        assert_eq!(pair.name, "child");
        assert_eq!(pair.data_type(), DataType::NvList);
        assert_eq!(pair.element_count(), 1);

        let child = pair.value.as_nv_list().unwrap();
        let nested = child.next_pair().unwrap().unwrap();
        assert_eq!(nested.name, "guid");
        assert_eq!(nested.value.as_uint64(), Some(&0x1122334455667788));
        assert!(child.next_pair().unwrap().is_none());

        assert!(decoder.next_pair().unwrap().is_none());
    }

    #[test]
    fn find_nested_list_in_imported_list() {
        let list = List::import(&NESTED).unwrap();

        let child = match list.find("child", DataType::NvList).unwrap() {
            Some(DecodedValue::NvList(v)) => v,
            v => panic!("unexpected value {v:?}"),
        };

        let pair = child.find("guid").unwrap().unwrap();
        assert_eq!(pair.value.as_uint64(), Some(&0x1122334455667788));
    }

    #[test]
    fn decode_nested_list_array() {
        let decoder = Decoder::from_bytes(&NESTED_ARRAY).unwrap();

        let pair = decoder.next_pair().unwrap().unwrap();
        assert_eq!(pair.name, "disks");
        assert_eq!(pair.data_type(), DataType::NvListArray);
        assert_eq!(pair.element_count(), 2);

        let elements = pair.value.as_nv_list_array().unwrap();
        assert_eq!(elements.capacity(), 2);

        let mut id = 1;
        while elements.len() > 0 {
            let element = elements.get().unwrap();
            let pair = element.next_pair().unwrap().unwrap();
            assert_eq!(pair.name, "id");
            assert_eq!(pair.value.as_uint64(), Some(&id));
            assert!(element.next_pair().unwrap().is_none());
            id += 1;
        }
        assert_eq!(id, 3);

        // Stepping past the last sibling is an error.
        assert!(matches!(elements.get(), Err(DecodeError::EndOfArray {})));

        // Reset rewinds to the first sibling.
        elements.reset();
        let element = elements.get().unwrap();
        let pair = element.next_pair().unwrap().unwrap();
        assert_eq!(pair.value.as_uint64(), Some(&1));
    }

    #[test]
    fn decode_string_array() {
        let data = [
            0x01, 0x01, 0x00, 0x00, // encoding, endian, reserved, reserved
            0x00, 0x00, 0x00, 0x00, // version
            0x00, 0x00, 0x00, 0x01, // flags
            // names = (string array) ["ab", "cde"]
            0x00, 0x00, 0x00, 0x2c, // encoded size 44
            0x00, 0x00, 0x00, 0x30, // decoded size (informational)
            0x00, 0x00, 0x00, 0x05, // name length 5
            0x6e, 0x61, 0x6d, 0x65, 0x73, 0x00, 0x00, 0x00, // "names" and padding
            0x00, 0x00, 0x00, 0x11, // DATA_TYPE_STRING_ARRAY
            0x00, 0x00, 0x00, 0x02, // two elements
            0x00, 0x00, 0x00, 0x02, 0x61, 0x62, 0x00, 0x00, // "ab"
            0x00, 0x00, 0x00, 0x03, 0x63, 0x64, 0x65, 0x00, // "cde"
            // terminator
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let decoder = Decoder::from_bytes(&data).unwrap();
        let pair = decoder.next_pair().unwrap().unwrap();
        assert_eq!(pair.name, "names");
        assert_eq!(pair.element_count(), 2);

        let strings = pair.value.as_string_array().unwrap();
        assert_eq!(strings.get().unwrap(), "ab");
        assert_eq!(strings.get().unwrap(), "cde");
        assert!(strings.get().is_err());
    }

    #[test]
    fn decode_boolean_flag_and_value() {
        let data = [
            0x01, 0x01, 0x00, 0x00, // encoding, endian, reserved, reserved
            0x00, 0x00, 0x00, 0x00, // version
            0x00, 0x00, 0x00, 0x01, // flags
            // flag = (boolean)
            0x00, 0x00, 0x00, 0x18, // encoded size 24
            0x00, 0x00, 0x00, 0x20, // decoded size (informational)
            0x00, 0x00, 0x00, 0x04, // name length 4
            0x66, 0x6c, 0x61, 0x67, // "flag"
            0x00, 0x00, 0x00, 0x01, // DATA_TYPE_BOOLEAN
            0x00, 0x00, 0x00, 0x00, // no elements, no value
            // on = (boolean value) true
            0x00, 0x00, 0x00, 0x1c, // encoded size 28
            0x00, 0x00, 0x00, 0x20, // decoded size (informational)
            0x00, 0x00, 0x00, 0x02, // name length 2
            0x6f, 0x6e, 0x00, 0x00, // "on" and padding
            0x00, 0x00, 0x00, 0x15, // DATA_TYPE_BOOLEAN_VALUE
            0x00, 0x00, 0x00, 0x01, // one element
            0x00, 0x00, 0x00, 0x01, // true
            // terminator
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let decoder = Decoder::from_bytes(&data).unwrap();

        let pair = decoder.next_pair().unwrap().unwrap();
        assert_eq!(pair.name, "flag");
        assert_eq!(pair.data_type(), DataType::Boolean);
        assert_eq!(pair.element_count(), 0);

        let pair = decoder.next_pair().unwrap().unwrap();
        assert_eq!(pair.name, "on");
        assert_eq!(pair.value.as_boolean_value(), Some(&true));

        assert!(decoder.next_pair().unwrap().is_none());
    }

    #[test]
    fn rejects_unknown_data_type() {
        let data = [
            0x01, 0x01, 0x00, 0x00, // encoding, endian, reserved, reserved
            0x00, 0x00, 0x00, 0x00, // version
            0x00, 0x00, 0x00, 0x01, // flags
            0x00, 0x00, 0x00, 0x1c, // encoded size 28
            0x00, 0x00, 0x00, 0x20, // decoded size
            0x00, 0x00, 0x00, 0x01, // name length 1
            0x78, 0x00, 0x00, 0x00, // "x" and padding
            0x00, 0x00, 0x00, 0x63, // type 99, unknown
            0x00, 0x00, 0x00, 0x01, // one element
            0x00, 0x00, 0x00, 0x07, // value
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // terminator
        ];

        let decoder = Decoder::from_bytes(&data).unwrap();
        assert!(matches!(
            decoder.next_pair(),
            Err(DecodeError::InvalidDataType { data_type: 99 })
        ));

        // Import refuses the whole stream.
        assert!(List::import(&data).is_err());
    }

    #[test]
    fn rejects_encoded_size_mismatch() {
        // A "version" pair whose encoded size claims four extra bytes.
        let data = [
            0x01, 0x01, 0x00, 0x00, // encoding, endian, reserved, reserved
            0x00, 0x00, 0x00, 0x00, // version
            0x00, 0x00, 0x00, 0x01, // flags
            0x00, 0x00, 0x00, 0x28, // encoded size 40, actual pair is 36
            0x00, 0x00, 0x00, 0x20, // decoded size
            0x00, 0x00, 0x00, 0x07, // name length 7
            0x76, 0x65, 0x72, 0x73, 0x69, 0x6f, 0x6e, 0x00, // "version"
            0x00, 0x00, 0x00, 0x08, // DATA_TYPE_UINT64
            0x00, 0x00, 0x00, 0x01, // one element
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // 1
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // terminator
        ];

        let decoder = Decoder::from_bytes(&data).unwrap();
        assert!(matches!(
            decoder.next_pair(),
            Err(DecodeError::InvalidEncodedSize { .. })
        ));
    }

    #[test]
    fn rejects_invalid_count() {
        // A boolean flag pair must have a count of zero.
        let data = [
            0x01, 0x01, 0x00, 0x00, // encoding, endian, reserved, reserved
            0x00, 0x00, 0x00, 0x00, // version
            0x00, 0x00, 0x00, 0x01, // flags
            0x00, 0x00, 0x00, 0x18, // encoded size 24
            0x00, 0x00, 0x00, 0x20, // decoded size
            0x00, 0x00, 0x00, 0x04, // name length 4
            0x66, 0x6c, 0x61, 0x67, // "flag"
            0x00, 0x00, 0x00, 0x01, // DATA_TYPE_BOOLEAN
            0x00, 0x00, 0x00, 0x01, // one element, invalid
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // terminator
        ];

        let decoder = Decoder::from_bytes(&data).unwrap();
        assert!(matches!(
            decoder.next_pair(),
            Err(DecodeError::InvalidCount { count: 1, .. })
        ));
    }

    #[test]
    fn rejects_corrupt_nested_list_on_import() {
        // Corrupt the nested pair's data type.
        let mut data = NESTED;
        data[67] = 0x63;
        assert!(List::import(&data).is_err());
    }

    #[test]
    fn find_scans_from_the_start() {
        let list = List::create(Unique::Name);
        let decoder = list.decoder().unwrap();
        assert!(decoder.find("missing").unwrap().is_none());

        let decoder = Decoder::from_bytes(&NESTED).unwrap();

        // Drain the list, then find still sees the pair.
        while decoder.next_pair().unwrap().is_some() {}
        assert!(decoder.find("child").unwrap().is_some());
    }

    #[test]
    fn dump_nested_list() {
        let decoder = Decoder::from_bytes(&NESTED).unwrap();

        let mut text = alloc::string::String::new();
        decoder.dump(&mut text, 0).unwrap();

        assert_eq!(
            text,
            "NvList [1] child\n\
             \x20 Uint64 [1] guid = 0x1122334455667788\n\
             \x20 End of nvlist\n\
             End of nvlist\n"
        );
    }

    #[test]
    fn dump_nested_list_array() {
        let decoder = Decoder::from_bytes(&NESTED_ARRAY).unwrap();

        let mut text = alloc::string::String::new();
        decoder.dump(&mut text, 0).unwrap();

        assert_eq!(
            text,
            "NvListArray [2] disks\n\
             [0]\n\
             \x20 Uint64 [1] id = 0x1\n\
             \x20 End of nvlist\n\
             [1]\n\
             \x20 Uint64 [1] id = 0x2\n\
             \x20 End of nvlist\n\
             End of nvlist\n"
        );
    }
}
