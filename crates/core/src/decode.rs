//! Lenient decoding of locally cached collections.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A value decoded from a cached blob, together with whether the blob had to
/// be discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// Decoded value, or the default when the bytes could not be parsed.
    pub value: T,

    /// `true` when the stored bytes were malformed and `value` is a reset.
    pub recovered: bool,

    /// Positions of array entries that could not be read and were left out.
    pub skipped: Vec<usize>,
}

impl<T> Decoded<T> {
    /// Consume the wrapper, discarding the recovery flag.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Decode JSON bytes, falling back to `T::default()` on any parse failure.
///
/// The parse error is dropped; only the `recovered` flag reports it.
pub fn decode_or_default<T>(bytes: &[u8]) -> Decoded<T>
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_slice(bytes) {
        Ok(value) => Decoded {
            value,
            recovered: false,
            skipped: Vec::new(),
        },
        Err(_) => Decoded {
            value: T::default(),
            recovered: true,
            skipped: Vec::new(),
        },
    }
}

/// Decode a JSON array entry by entry.
///
/// Entries that fail to decode are left out and their positions recorded in
/// `skipped`. Bytes that are not a JSON array at all reset to empty.
pub fn decode_entries<T>(bytes: &[u8]) -> Decoded<Vec<T>>
where
    T: DeserializeOwned,
{
    let Decoded {
        value: raw,
        recovered,
        ..
    } = decode_or_default::<Vec<Value>>(bytes);

    let mut entries = Vec::with_capacity(raw.len());
    let mut skipped = Vec::new();

    for (idx, entry) in raw.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(entry) => entries.push(entry),
            Err(_) => skipped.push(idx),
        }
    }

    Decoded {
        value: entries,
        recovered,
        skipped,
    }
}
