//! GB series printer protocol implementation.
//!
//! Frame layout: MAGIC + cmd + 0x00 + len(2 LE) + payload + crc8(payload) + 0xFF.
//! Service UUID: ae30 (macOS fallback: af30), TX characteristic: ae01.

use uuid::Uuid;

use crate::bitmap::MonoBitmap;

/// GB series protocol magic bytes.
const MAGIC: [u8; 2] = [0x51, 0x78];

/// Frame terminator.
const END: u8 = 0xff;

/// CRC-8 polynomial (x^8 + x^2 + x + 1).
const CRC8_POLY: u8 = 0x07;

/// BLE service UUID for GB printers (standard).
pub const SERVICE_UUID: Uuid = Uuid::from_u128(0x0000_ae30_0000_1000_8000_00805f9b34fb);

/// BLE service UUID advertised to macOS hosts.
pub const SERVICE_UUID_MACOS: Uuid = Uuid::from_u128(0x0000_af30_0000_1000_8000_00805f9b34fb);

/// BLE TX characteristic UUID for writing print data.
const TX_CHARACTERISTIC: Uuid = Uuid::from_u128(0x0000_ae01_0000_1000_8000_00805f9b34fb);

/// Lines fed after the image so it clears the tear bar.
const TRAILING_FEED_LINES: u16 = 48;

/// Longest run a single RLE byte can describe.
const RLE_MAX_RUN: usize = 0x7f;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Command {
    FeedPaper = 0xa1,
    PrintRowBytes = 0xa2,
    GetDeviceState = 0xa3,
    SetQuality = 0xa4,
    Lattice = 0xa6,
    UpdateDevice = 0xa9,
    SetEnergy = 0xaf,
    FeedSpeed = 0xbd,
    ApplyEnergy = 0xbe,
    PrintRowRle = 0xbf,
}

const LATTICE_START: [u8; 11] = [0xaa, 0x55, 0x17, 0x38, 0x44, 0x5f, 0x5f, 0x5f, 0x44, 0x38, 0x2c];
const LATTICE_END: [u8; 11] = [0xaa, 0x55, 0x17, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x17];

/// Compute the CRC-8 checksum of a payload.
fn crc8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |crc, &b| {
        (0..8).fold(crc ^ b, |acc, _| {
            if acc & 0x80 != 0 {
                (acc << 1) ^ CRC8_POLY
            } else {
                acc << 1
            }
        })
    })
}

/// Build a framed command.
fn frame(cmd: Command, payload: &[u8]) -> Vec<u8> {
    let len = payload.len() as u16;
    let mut buf = Vec::with_capacity(8 + payload.len());
    buf.extend_from_slice(&MAGIC);
    buf.push(cmd as u8);
    buf.push(0x00);
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(payload);
    buf.push(crc8(payload));
    buf.push(END);
    buf
}

/// Run-length encode a pixel row. Each byte holds the pixel value in bit 7
/// and a run length of 1..=127 in the low bits.
fn run_length_encode(row: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for run in row.chunk_by(|a, b| a == b) {
        let bit = u8::from(run[0] != 0) << 7;
        let mut remaining = run.len();
        while remaining > 0 {
            let n = remaining.min(RLE_MAX_RUN);
            out.push(bit | n as u8);
            remaining -= n;
        }
    }
    out
}

/// Pack 8 pixels per byte, first pixel in the least significant bit.
fn pack_bits_lsb(row: &[u8]) -> Vec<u8> {
    row.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .filter(|&(_, &px)| px != 0)
                .fold(0u8, |byte, (bit, _)| byte | (1 << bit))
        })
        .collect()
}

/// GB series protocol encoder.
#[derive(Debug, Clone, Default)]
pub struct GbProtocol {
    /// When true, scan for the macOS service UUID (af30) first.
    pub use_macos_uuid: bool,
}

impl GbProtocol {
    pub fn new() -> Self {
        Self {
            use_macos_uuid: cfg!(target_os = "macos"),
        }
    }

    /// Primary and fallback service UUIDs to scan for.
    pub fn scan_uuids(&self) -> (Uuid, Uuid) {
        if self.use_macos_uuid {
            (SERVICE_UUID_MACOS, SERVICE_UUID)
        } else {
            (SERVICE_UUID, SERVICE_UUID_MACOS)
        }
    }

    pub fn tx_characteristic(&self) -> Uuid {
        TX_CHARACTERISTIC
    }

    /// Commands sent before the first row: wake, 200 DPI, slow feed, max energy.
    pub fn init_sequence(&self) -> Vec<Vec<u8>> {
        vec![
            frame(Command::GetDeviceState, &[0x00]),
            frame(Command::SetQuality, &[0x32]),
            frame(Command::FeedSpeed, &[0x24]),
            frame(Command::SetEnergy, &[0xff, 0xdf]),
            frame(Command::ApplyEnergy, &[0x01]),
            frame(Command::UpdateDevice, &[0x00]),
            frame(Command::Lattice, &LATTICE_START),
        ]
    }

    /// Encode one pixel row (1 byte per pixel, 1 = black), choosing RLE when
    /// it is no larger than the packed-bit form.
    pub fn encode_row(&self, row: &[u8]) -> Vec<u8> {
        let rle = run_length_encode(row);
        let packed_len = row.len().div_ceil(8);
        if rle.len() > packed_len {
            frame(Command::PrintRowBytes, &pack_bits_lsb(row))
        } else {
            frame(Command::PrintRowRle, &rle)
        }
    }

    pub fn feed(&self, lines: u16) -> Vec<u8> {
        frame(Command::FeedPaper, &lines.to_le_bytes())
    }

    /// Commands sent after the last row.
    pub fn finish_sequence(&self) -> Vec<Vec<u8>> {
        vec![
            frame(Command::Lattice, &LATTICE_END),
            frame(Command::FeedSpeed, &[0x08]),
            self.feed(TRAILING_FEED_LINES),
            frame(Command::GetDeviceState, &[0x00]),
        ]
    }

    /// Full command stream for one print job.
    pub fn job(&self, bitmap: &MonoBitmap) -> Vec<Vec<u8>> {
        let mut commands = self.init_sequence();
        commands.extend(bitmap.rows().map(|row| self.encode_row(row)));
        commands.extend(self.finish_sequence());
        commands
    }
}
