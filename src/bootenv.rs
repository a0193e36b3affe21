/*! ZFS boot environment key conventions.
 *
 * The `bootenv` label area carries a Name Value list describing one shot
 * boot parameters. This module implements the key conventions layered on
 * the [`crate::nv`] core:
 *
 * - A mandatory `version` pair records the bootenv payload format
 *   ([`VB_NVLIST`]).
 * - The `freebsd:bootonce` pair holds a one shot boot device descriptor of
 *   the form `zfs:<dataset>:`. [`BootEnv::set_boot_device`] wraps a bare
 *   dataset name into that form, and [`BootEnv::boot_device`] unwraps it.
 * - An empty device or value means removal.
 *
 * Reading and writing the label area itself is the pool's concern; this
 * module starts and ends at serialized bytes.
 */
use alloc::string::String;
use alloc::format;
use core::fmt;
use core::result::Result;
use core::result::Result::{Err, Ok};

#[cfg(feature = "std")]
use std::error;

use crate::nv;
use crate::nv::{DataType, DecodeError, List, ListError, Unique};

////////////////////////////////////////////////////////////////////////////////

/// Key of the mandatory bootenv format version pair.
pub const BOOTENV_VERSION: &str = "version";

pub const BE_ILLUMOS_VENDOR: &str = "illumos";
pub const BE_FREEBSD_VENDOR: &str = "freebsd";
pub const BE_GRUB_VENDOR: &str = "grub";

/// Vendor of this implementation.
pub const BOOTENV_OS: &str = BE_FREEBSD_VENDOR;

pub const GRUB_ENVMAP: &str = "grub:envmap";

pub const FREEBSD_BOOTONCE: &str = "freebsd:bootonce";
pub const FREEBSD_BOOTONCE_USED: &str = "freebsd:bootonce-used";
pub const ILLUMOS_BOOTONCE: &str = "illumos:bootonce";
pub const ILLUMOS_BOOTONCE_USED: &str = "illumos:bootonce-used";

/// Key of the one shot boot device pair.
pub const OS_BOOTONCE: &str = FREEBSD_BOOTONCE;
pub const OS_BOOTONCE_USED: &str = FREEBSD_BOOTONCE_USED;

/// Value of the `version` pair for an nvlist formatted bootenv payload.
pub const VB_NVLIST: u64 = 1;

/// Prefix of a zfs boot device descriptor.
const ZFS_PREFIX: &str = "zfs:";

////////////////////////////////////////////////////////////////////////////////

/** A boot environment backed by an owned Name Value list.
 *
 * # Examples
 *
 * Basic usage:
 *
 * ```
 * use zbootenv::bootenv::BootEnv;
 *
 * let mut env = BootEnv::new();
 * env.set_boot_device("tank/ROOT/default").unwrap();
 *
 * assert_eq!(env.boot_device().unwrap().unwrap(), "tank/ROOT/default");
 *
 * // The stored descriptor carries the prefix and the trailing colon.
 * let copy = BootEnv::from_bytes(env.as_bytes()).unwrap();
 * assert_eq!(copy.boot_device().unwrap().unwrap(), "tank/ROOT/default");
 * ```
 */
#[derive(Debug)]
pub struct BootEnv {
    list: List,
}

impl BootEnv {
    /// Creates an empty boot environment.
    pub fn new() -> BootEnv {
        BootEnv {
            list: List::create(Unique::Name),
        }
    }

    /** Imports a boot environment from a serialized stream.
     *
     * # Errors
     *
     * Returns [`DecodeError`] if the stream is not a valid list.
     */
    pub fn from_bytes(stream: &[u8]) -> Result<BootEnv, DecodeError> {
        Ok(BootEnv {
            list: List::import(stream)?,
        })
    }

    /// Exports the boot environment as a serialized stream.
    pub fn as_bytes(&self) -> &[u8] {
        self.list.as_bytes()
    }

    /// The backing Name Value list.
    pub fn list(&self) -> &List {
        &self.list
    }

    /** Returns the bootenv format version, if set.
     *
     * # Errors
     *
     * Returns [`BootEnvError`] if the pair has the wrong type.
     */
    pub fn version(&self) -> Result<Option<u64>, BootEnvError> {
        let decoder = self.list.decoder()?;
        nv::find_optional!(decoder, BOOTENV_VERSION, Uint64, BootEnvError)
    }

    /** Stores a boot device descriptor under [`OS_BOOTONCE`].
     *
     * The mandatory [`BOOTENV_VERSION`] pair is added first if missing. An
     * empty device name removes the boot device configuration. A device
     * that already starts with `zfs:` is stored as given; otherwise it is
     * wrapped as `zfs:<device>:`.
     *
     * # Errors
     *
     * Returns [`BootEnvError`] on error.
     */
    pub fn set_boot_device(&mut self, device: &str) -> Result<(), BootEnvError> {
        // version is mandatory
        if !self.list.exists(BOOTENV_VERSION) {
            self.list.add_uint64(BOOTENV_VERSION, VB_NVLIST)?;
        }

        if device.is_empty() {
            return self.remove_string(OS_BOOTONCE);
        }

        if device.starts_with(ZFS_PREFIX) {
            self.list.add_string(OS_BOOTONCE, device)?;
        } else {
            let descriptor = format!("zfs:{device}:");
            self.list.add_string(OS_BOOTONCE, &descriptor)?;
        }
        Ok(())
    }

    /** Returns the boot device dataset name from [`OS_BOOTONCE`], if set.
     *
     * The stored descriptor is in the form `zfs:dataset:`; only the dataset
     * name is returned.
     *
     * # Errors
     *
     * Returns [`BootEnvError`] if the pair has the wrong type.
     */
    pub fn boot_device(&self) -> Result<Option<String>, BootEnvError> {
        let decoder = self.list.decoder()?;
        let value = nv::find_optional!(decoder, OS_BOOTONCE, String, BootEnvError)?;

        Ok(value.map(|descriptor| {
            let dataset = match descriptor.strip_prefix(ZFS_PREFIX) {
                Some(v) => v,
                None => descriptor,
            };
            let dataset = match dataset.strip_suffix(':') {
                Some(v) => v,
                None => dataset,
            };
            String::from(dataset)
        }))
    }

    /** Stores an arbitrary string pair.
     *
     * An empty value removes an existing string pair instead.
     *
     * # Errors
     *
     * Returns [`BootEnvError`] on error.
     */
    pub fn set_pair(&mut self, key: &str, value: &str) -> Result<(), BootEnvError> {
        if value.is_empty() && self.list.exists(key) {
            return self.remove_string(key);
        }

        self.list.add_string(key, value)?;
        Ok(())
    }

    /// Removes a string pair, treating a missing pair as success.
    fn remove_string(&mut self, key: &str) -> Result<(), BootEnvError> {
        match self.list.remove(key, DataType::String) {
            Ok(()) | Err(ListError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for BootEnv {
    fn default() -> BootEnv {
        BootEnv::new()
    }
}

impl fmt::Display for BootEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.list, f)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum BootEnvError {
    /** List mutation error.
     *
     * - `err` - Error.
     */
    List { err: ListError },

    /** Missing NV pair.
     *
     * - `name` - Key.
     */
    MissingValue { name: &'static str },

    /** NV decoding error.
     *
     * - `err` - Error.
     */
    NvDecodeError { err: DecodeError },

    /** Value type mismatch.
     *
     * - `name`      - Of NV pair.
     * - `data_type` - Of NV pair.
     */
    ValueTypeMismatch {
        name: &'static str,
        data_type: DataType,
    },
}

impl From<ListError> for BootEnvError {
    fn from(value: ListError) -> Self {
        BootEnvError::List { err: value }
    }
}

impl From<DecodeError> for BootEnvError {
    fn from(value: DecodeError) -> Self {
        BootEnvError::NvDecodeError { err: value }
    }
}

impl fmt::Display for BootEnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootEnvError::List { err } => {
                write!(f, "BootEnv list error: {err}")
            }
            BootEnvError::MissingValue { name } => {
                write!(f, "BootEnv missing '{name}'")
            }
            BootEnvError::NvDecodeError { err } => {
                write!(f, "BootEnv NV decode error: {err}")
            }
            BootEnvError::ValueTypeMismatch { name, data_type } => {
                write!(
                    f,
                    "BootEnv value type mismatch for '{name}' got {data_type}"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for BootEnvError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            BootEnvError::List { err } => Some(err),
            BootEnvError::NvDecodeError { err } => Some(err),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
