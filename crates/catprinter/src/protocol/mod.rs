//! Printer wire protocol.
//!
//! Only the GB series (magic bytes 0x51, 0x78) is supported; it covers the
//! common 384px cat printers.

pub mod gb;

pub use gb::GbProtocol;
