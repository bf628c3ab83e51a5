//! Application services: conversion, session state and printer access.

pub mod printer;
pub mod render;
pub mod session;

pub use printer::{DiscoveredPrinter, scan_printers, transport_for};
pub use render::{ImageSource, render_source, write_preview};
pub use session::{RenderSession, Rendered};
