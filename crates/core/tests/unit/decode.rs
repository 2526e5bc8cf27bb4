//! Address decoder tests.
//!
//! Verifies the bit-slice layouts for the three fixed mappings and the
//! encode/decode inverse relationship used by workload generators.

use memsim_core::config::{AddressMapping, OrganizationParams};
use memsim_core::ctrl::decode::{AddressDecoder, DecodedAddress};

fn org() -> OrganizationParams {
    // 1 channel, 1 rank, 4 groups x 4 banks, 64K rows, 1K columns:
    // col 10 bits, bank 4 bits, row 16 bits.
    OrganizationParams::default()
}

// ══════════════════════════════════════════════════════════
// 1. Row:Bank:Column (default)
// ══════════════════════════════════════════════════════════

#[test]
fn row_bank_column_layout() {
    let decoder = AddressDecoder::new(&org(), AddressMapping::RowBankColumn);

    let d = decoder.decode(0);
    assert_eq!((d.channel, d.rank, d.bank_group, d.bank, d.row, d.column), (0, 0, 0, 0, 0, 0));

    // Low bits are the column.
    let d = decoder.decode(5);
    assert_eq!(d.column, 5);
    assert_eq!(d.row, 0);

    // Bank field sits above the column bits.
    let d = decoder.decode(3 << 10);
    assert_eq!(d.bank_group, 0);
    assert_eq!(d.bank, 3);

    let d = decoder.decode(5 << 10);
    assert_eq!(d.bank_group, 1);
    assert_eq!(d.bank, 1);

    // Row field sits above the bank bits.
    let d = decoder.decode(9 << 14);
    assert_eq!(d.row, 9);
    assert_eq!(d.bank, 0);
    assert_eq!(d.column, 0);
}

#[test]
fn sequential_addresses_stream_within_a_row() {
    let decoder = AddressDecoder::new(&org(), AddressMapping::RowBankColumn);
    for offset in 0..1024u64 {
        let d = decoder.decode(offset);
        assert_eq!(d.row, 0);
        assert_eq!(d.bank, 0);
        assert_eq!(d.column, offset as u16);
    }
}

// ══════════════════════════════════════════════════════════
// 2. Row:Column:Bank
// ══════════════════════════════════════════════════════════

#[test]
fn row_column_bank_interleaves_banks_at_low_bits() {
    let decoder = AddressDecoder::new(&org(), AddressMapping::RowColumnBank);

    // Consecutive addresses hit consecutive banks.
    for addr in 0..16u64 {
        let d = decoder.decode(addr);
        let combined = d.bank_group as u64 * 4 + d.bank as u64;
        assert_eq!(combined, addr);
        assert_eq!(d.column, 0);
    }

    // Column sits above the bank bits.
    let d = decoder.decode(7 << 4);
    assert_eq!(d.column, 7);
    assert_eq!(d.bank, 0);
}

// ══════════════════════════════════════════════════════════
// 3. Bank:Row:Column
// ══════════════════════════════════════════════════════════

#[test]
fn bank_row_column_puts_banks_above_rows() {
    let decoder = AddressDecoder::new(&org(), AddressMapping::BankRowColumn);

    let d = decoder.decode(1 << 26);
    assert_eq!(d.bank_group, 0);
    assert_eq!(d.bank, 1);
    assert_eq!(d.row, 0);

    let d = decoder.decode(3 << 10);
    assert_eq!(d.row, 3);
    assert_eq!(d.bank, 0);
}

// ══════════════════════════════════════════════════════════
// 4. Encode / decode round trip
// ══════════════════════════════════════════════════════════

#[test]
fn encode_is_the_inverse_of_decode() {
    for mapping in [
        AddressMapping::RowBankColumn,
        AddressMapping::RowColumnBank,
        AddressMapping::BankRowColumn,
    ] {
        let decoder = AddressDecoder::new(&org(), mapping);
        let coords = DecodedAddress {
            channel: 0,
            rank: 0,
            bank_group: 2,
            bank: 3,
            row: 12345,
            column: 678,
        };
        let address = decoder.encode(coords);
        assert_eq!(decoder.decode(address), coords, "mapping {:?}", mapping);
    }
}

#[test]
fn multi_channel_bits_occupy_the_top() {
    let mut org = org();
    org.num_channels = 2;
    org.ranks_per_channel = 2;
    let decoder = AddressDecoder::new(&org, AddressMapping::RowBankColumn);

    let coords = DecodedAddress {
        channel: 1,
        rank: 1,
        bank_group: 1,
        bank: 2,
        row: 42,
        column: 7,
    };
    let address = decoder.encode(coords);
    assert_eq!(decoder.decode(address), coords);

    // Channel is the most significant field: the same coordinates on
    // channel 0 decode from a strictly smaller address.
    let low = decoder.encode(DecodedAddress { channel: 0, ..coords });
    assert!(address > low);
}
