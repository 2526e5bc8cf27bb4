//! Address decoding: pure bit-slice extraction of DRAM coordinates.
//!
//! Bit widths derive from the organization (which is validated to be
//! power-of-two in every extent). Channel bits always occupy the most
//! significant field and rank bits sit directly below them; the mapping
//! selects the order of the row, bank, and column fields underneath. The
//! combined bank field holds `bank_group * banks_per_group + bank`.

use crate::common::{Address, Column, Row};
use crate::config::{AddressMapping, OrganizationParams};

/// Decoded DRAM coordinates for one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodedAddress {
    /// Channel index.
    pub channel: u8,
    /// Rank index within the channel.
    pub rank: u8,
    /// Bank group index within the rank.
    pub bank_group: u8,
    /// Bank index within the bank group.
    pub bank: u8,
    /// Row index.
    pub row: Row,
    /// Column index.
    pub column: Column,
}

/// Bit-slice address decoder for a fixed organization and mapping.
#[derive(Debug, Clone, Copy)]
pub struct AddressDecoder {
    mapping: AddressMapping,
    channel_bits: u32,
    rank_bits: u32,
    bank_bits: u32,
    row_bits: u32,
    column_bits: u32,
    banks_per_group: u32,
}

impl AddressDecoder {
    /// Creates a decoder for the given organization and mapping.
    ///
    /// The organization must have power-of-two extents; `validate()` on the
    /// controller configuration guarantees this before a decoder is built.
    pub fn new(org: &OrganizationParams, mapping: AddressMapping) -> Self {
        Self {
            mapping,
            channel_bits: (org.num_channels as u32).trailing_zeros(),
            rank_bits: (org.ranks_per_channel as u32).trailing_zeros(),
            bank_bits: (org.banks_per_rank() as u32).trailing_zeros(),
            row_bits: org.rows_per_bank.trailing_zeros(),
            column_bits: org.columns_per_row.trailing_zeros(),
            banks_per_group: org.banks_per_bank_group as u32,
        }
    }

    /// Decodes a byte address into DRAM coordinates.
    pub fn decode(&self, address: Address) -> DecodedAddress {
        let mut addr = address;
        let mut take = |bits: u32| -> u64 {
            if bits == 0 {
                return 0;
            }
            let value = addr & ((1u64 << bits) - 1);
            addr >>= bits;
            value
        };

        let (column, combined_bank, row) = match self.mapping {
            AddressMapping::RowBankColumn => {
                let column = take(self.column_bits);
                let bank = take(self.bank_bits);
                let row = take(self.row_bits);
                (column, bank, row)
            }
            AddressMapping::RowColumnBank => {
                let bank = take(self.bank_bits);
                let column = take(self.column_bits);
                let row = take(self.row_bits);
                (column, bank, row)
            }
            AddressMapping::BankRowColumn => {
                let column = take(self.column_bits);
                let row = take(self.row_bits);
                let bank = take(self.bank_bits);
                (column, bank, row)
            }
            // Rejected at configuration validation; decode as the default
            // mapping if one slips through.
            AddressMapping::Custom => {
                let column = take(self.column_bits);
                let bank = take(self.bank_bits);
                let row = take(self.row_bits);
                (column, bank, row)
            }
        };
        let rank = take(self.rank_bits);
        let channel = take(self.channel_bits);

        DecodedAddress {
            channel: channel as u8,
            rank: rank as u8,
            bank_group: (combined_bank as u32 / self.banks_per_group) as u8,
            bank: (combined_bank as u32 % self.banks_per_group) as u8,
            row: row as Row,
            column: column as Column,
        }
    }

    /// Composes a byte address from DRAM coordinates; the inverse of
    /// [`decode`](Self::decode). Used by workload generators to target
    /// specific banks and rows.
    pub fn encode(&self, decoded: DecodedAddress) -> Address {
        let combined_bank =
            decoded.bank_group as u64 * self.banks_per_group as u64 + decoded.bank as u64;
        let mut addr = decoded.channel as u64;
        addr = (addr << self.rank_bits) | decoded.rank as u64;

        match self.mapping {
            AddressMapping::RowBankColumn | AddressMapping::Custom => {
                addr = (addr << self.row_bits) | decoded.row as u64;
                addr = (addr << self.bank_bits) | combined_bank;
                addr = (addr << self.column_bits) | decoded.column as u64;
            }
            AddressMapping::RowColumnBank => {
                addr = (addr << self.row_bits) | decoded.row as u64;
                addr = (addr << self.column_bits) | decoded.column as u64;
                addr = (addr << self.bank_bits) | combined_bank;
            }
            AddressMapping::BankRowColumn => {
                addr = (addr << self.bank_bits) | combined_bank;
                addr = (addr << self.row_bits) | decoded.row as u64;
                addr = (addr << self.column_bits) | decoded.column as u64;
            }
        }
        addr
    }
}
