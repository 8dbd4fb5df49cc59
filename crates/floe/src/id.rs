use core::fmt;

/// A 64-bit packed identifier
///
/// - 1 bit reserved sign (always 0, for signed-integer compatibility)
/// - 10 bits reserved (always 0)
/// - 12 bits sequence
/// - 41 bits timestamp (ms since [`EPOCH`])
///
/// ```text
///  Bit Index:  63        63 62           53 52             41 40             0
///              +------------+---------------+-----------------+---------------+
///  Field:      | sign (1)   | reserved (10) | sequence (12)   | timestamp (41)|
///              +------------+---------------+-----------------+---------------+
///              |<---------- MSB ---------- 64 bits ---------- LSB ----------->|
/// ```
///
/// Unlike the Twitter layout, the timestamp occupies the **low** bits and the
/// sequence sits above it, so ids issued in the same millisecond differ in
/// their high bits rather than their low bits.
///
/// [`EPOCH`]: crate::EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FloeId {
    id: u64,
}

impl FloeId {
    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 0
    /// through 40.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 41
    /// through 52.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Bitmask for extracting the 10-bit reserved field. Occupies bits 53
    /// through 62.
    pub const RESERVED_MASK: u64 = (1 << 10) - 1;

    /// Number of bits to shift the timestamp to its position (bit 0).
    pub const TIMESTAMP_SHIFT: u64 = 0;

    /// Number of bits to shift the sequence to its position (bit 41).
    pub const SEQUENCE_SHIFT: u64 = 41;

    /// Number of bits to shift the reserved field to its position (bit 53).
    pub const RESERVED_SHIFT: u64 = 53;

    /// The all-zero sentinel returned when a clock regression is detected.
    ///
    /// Indistinguishable from an id legitimately issued at exactly the epoch
    /// millisecond with sequence 0.
    pub const SENTINEL: Self = Self { id: 0 };

    pub const fn from(timestamp: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: sequence | timestamp,
        }
    }

    /// Constructs a new id from its components, asserting field bounds in
    /// debug builds.
    pub fn from_components(timestamp: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, sequence)
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum representable timestamp value.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum representable sequence value.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Converts this id into its raw `u64` representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw `u64` into an id.
    ///
    /// No field bounds are enforced: a raw value produced by a degraded
    /// generation path (see [`Record::generate`]) may carry bits in the
    /// reserved fields.
    ///
    /// [`Record::generate`]: crate::Record::generate
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for FloeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FloeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloeId")
            .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
            .field(
                "timestamp",
                &format_args!("{} (0x{:x})", self.timestamp(), self.timestamp()),
            )
            .field(
                "sequence",
                &format_args!("{} (0x{:x})", self.sequence(), self.sequence()),
            )
            .finish()
    }
}
