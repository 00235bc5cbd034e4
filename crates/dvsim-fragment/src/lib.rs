//! IPv4 Fragmentation
//!
//! Splits a packet that does not fit an MTU into fragments the way an IPv4
//! router would.
//!
//! # Rules
//!
//! - Every fragment carries a 20-byte header (no options)
//! - Payload per fragment is `mtu - 20` rounded down to a multiple of 8
//! - Offsets are counted in 8-byte units
//! - All fragments but the last have the more-fragments flag set
//!
//! # Example
//!
//! ```
//! use dvsim_fragment::fragment;
//!
//! let fragments = fragment(4000, 1500).unwrap();
//! let payloads: Vec<u16> = fragments.iter().map(|f| f.payload_size).collect();
//! assert_eq!(payloads, vec![1480, 1480, 1020]);
//! ```

use thiserror::Error;

/// IPv4 header length without options.
pub const IP_HEADER_LEN: u16 = 20;

/// Identifier used when none is given.
pub const DEFAULT_IDENTIFIER: u16 = 12345;

/// Fragment offsets are expressed in units of this many bytes.
pub const OFFSET_UNIT: u16 = 8;

/// Result type for fragmentation.
pub type Result<T> = std::result::Result<T, FragmentError>;

/// Inputs that cannot be fragmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FragmentError {
    /// Packet shorter than its own header
    #[error("total length {total_length} is shorter than the 20-byte header")]
    TotalLengthTooShort { total_length: u16 },

    /// MTU leaves no room for one 8-byte payload unit
    #[error("MTU {mtu} cannot carry a header plus 8 payload bytes")]
    MtuTooSmall { mtu: u16 },
}

/// One fragment of the original packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fragment {
    /// Position in the sequence, starting at 1
    pub sequence: usize,
    /// Header plus payload
    pub total_length: u16,
    /// Identification field, shared by all fragments of a packet
    pub identifier: u16,
    /// More-fragments flag
    pub more_fragments: bool,
    /// Offset of the payload in 8-byte units
    pub offset: u16,
    /// Payload bytes carried
    pub payload_size: u16,
}

impl Fragment {
    /// Offset of the payload in bytes.
    pub fn byte_offset(&self) -> u32 {
        u32::from(self.offset) * u32::from(OFFSET_UNIT)
    }

    /// Flag value as it appears on the wire (1 = more fragments follow).
    pub fn flag_bit(&self) -> u8 {
        u8::from(self.more_fragments)
    }
}

/// Largest payload one fragment can carry under `mtu`.
pub fn max_payload(mtu: u16) -> Result<u16> {
    let payload = mtu.saturating_sub(IP_HEADER_LEN) / OFFSET_UNIT * OFFSET_UNIT;
    if payload == 0 {
        return Err(FragmentError::MtuTooSmall { mtu });
    }
    Ok(payload)
}

/// Fragment a packet of `total_length` bytes using the default identifier.
pub fn fragment(total_length: u16, mtu: u16) -> Result<Vec<Fragment>> {
    fragment_with_id(total_length, mtu, DEFAULT_IDENTIFIER)
}

/// Fragment a packet of `total_length` bytes, tagging every fragment with `identifier`.
pub fn fragment_with_id(total_length: u16, mtu: u16, identifier: u16) -> Result<Vec<Fragment>> {
    if total_length < IP_HEADER_LEN {
        return Err(FragmentError::TotalLengthTooShort { total_length });
    }
    let per_fragment = max_payload(mtu)?;
    let payload = total_length - IP_HEADER_LEN;

    // Header-only packet still travels as one fragment
    if payload == 0 {
        return Ok(vec![Fragment {
            sequence: 1,
            total_length: IP_HEADER_LEN,
            identifier,
            more_fragments: false,
            offset: 0,
            payload_size: 0,
        }]);
    }

    let mut fragments = Vec::with_capacity(usize::from(payload.div_ceil(per_fragment)));
    let mut sent: u16 = 0;

    while sent < payload {
        let size = per_fragment.min(payload - sent);
        fragments.push(Fragment {
            sequence: fragments.len() + 1,
            total_length: IP_HEADER_LEN + size,
            identifier,
            more_fragments: sent + size < payload,
            offset: sent / OFFSET_UNIT,
            payload_size: size,
        });
        sent += size;
    }

    tracing::debug!(
        total_length,
        mtu,
        fragments = fragments.len(),
        "packet fragmented"
    );
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_packet() {
        let fragments = fragment(4000, 1500).unwrap();
        assert_eq!(fragments.len(), 3);

        let summary: Vec<(usize, u16, bool, u16, u16)> = fragments
            .iter()
            .map(|f| (f.sequence, f.total_length, f.more_fragments, f.offset, f.payload_size))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, 1500, true, 0, 1480),
                (2, 1500, true, 185, 1480),
                (3, 1040, false, 370, 1020),
            ]
        );
        assert!(fragments.iter().all(|f| f.identifier == DEFAULT_IDENTIFIER));
        assert_eq!(fragments[2].byte_offset(), 2960);
    }

    #[test]
    fn packet_that_fits_is_one_fragment() {
        let fragments = fragment(1500, 1500).unwrap();
        assert_eq!(fragments.len(), 1);
        assert!(!fragments[0].more_fragments);
        assert_eq!(fragments[0].payload_size, 1480);
        assert_eq!(fragments[0].flag_bit(), 0);
    }

    #[test]
    fn payload_rounds_down_to_offset_unit() {
        // 1006 - 20 = 986, rounded down to 984
        assert_eq!(max_payload(1006).unwrap(), 984);
        let fragments = fragment(2000, 1006).unwrap();
        assert_eq!(fragments[0].payload_size, 984);
        assert_eq!(fragments[0].total_length, 1004);
        assert_eq!(fragments[1].offset, 123);
    }

    #[test]
    fn header_only_packet() {
        let fragments = fragment(IP_HEADER_LEN, 576).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].payload_size, 0);
        assert_eq!(fragments[0].total_length, IP_HEADER_LEN);
        assert!(!fragments[0].more_fragments);
    }

    #[test]
    fn custom_identifier() {
        let fragments = fragment_with_id(3000, 1500, 7).unwrap();
        assert!(fragments.iter().all(|f| f.identifier == 7));
    }

    #[test]
    fn short_packet_rejected() {
        assert_eq!(
            fragment(19, 1500),
            Err(FragmentError::TotalLengthTooShort { total_length: 19 })
        );
    }

    #[test]
    fn tiny_mtu_rejected() {
        assert_eq!(fragment(100, 27), Err(FragmentError::MtuTooSmall { mtu: 27 }));
        assert_eq!(fragment(100, 10), Err(FragmentError::MtuTooSmall { mtu: 10 }));
        assert!(fragment(100, 28).is_ok());
    }

    proptest! {
        #[test]
        fn fragments_cover_payload_exactly(total in 20u16..=u16::MAX, mtu in 28u16..=9000) {
            let fragments = fragment(total, mtu).unwrap();
            let payload = total - IP_HEADER_LEN;

            let mut expected_offset: u32 = 0;
            for (i, f) in fragments.iter().enumerate() {
                prop_assert_eq!(f.sequence, i + 1);
                prop_assert!(f.total_length <= mtu);
                prop_assert_eq!(f.total_length, f.payload_size + IP_HEADER_LEN);
                prop_assert_eq!(f.byte_offset(), expected_offset);
                if f.more_fragments {
                    prop_assert_eq!(f.payload_size % OFFSET_UNIT, 0);
                }
                expected_offset += u32::from(f.payload_size);
            }

            prop_assert_eq!(expected_offset, u32::from(payload));
            prop_assert_eq!(fragments.iter().filter(|f| !f.more_fragments).count(), 1);
            prop_assert!(!fragments[fragments.len() - 1].more_fragments);
        }
    }
}
