//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, screen geometry and test payload settings
//! live here so they can be tuned in one place.

use crate::ui::{ButtonId, ButtonZone};

// Display

/// Panel resolution in landscape orientation (ILI9341).
pub const SCREEN_WIDTH: u32 = 320;
pub const SCREEN_HEIGHT: u32 = 240;

/// Width/height of the sound overlay glyph in pixels.
pub const OVERLAY_GLYPH_SIZE: u32 = 28;

/// Touch events handled per render/input pass; the rest wait for the next one.
pub const TOUCH_EVENTS_PER_PASS: usize = 8;

/// Mute state the sound overlay starts with after power-up.
pub const SOUND_MUTED_AT_BOOT: bool = false;

// Menu

/// Period of one menu render/input pass (ms).
pub const MENU_FRAME_MS: u32 = 20;

/// Capacity of the per-entry label buffer handed to label generators,
/// including the trailing NUL.
pub const LABEL_CAPACITY: usize = 32;

/// Number of menu entries visible below the title.
pub const MENU_VISIBLE_ROWS: usize = 10;

/// Maximum nesting depth of submenus.
pub const MENU_MAX_DEPTH: usize = 4;

// I²C bus diagnostics

/// Size of the 7-bit I²C address space.
pub const BUS_ADDRESS_COUNT: usize = 128;

/// Grid shape used to render a sweep (row = addr >> 4, column = addr & 0xF).
pub const GRID_ROWS: usize = 8;
pub const GRID_COLUMNS: usize = 16;

/// Presence-check attempts per address.
pub const PROBE_ATTEMPTS: u8 = 3;

/// Timeout of a single presence-check attempt (ms).
pub const PROBE_TIMEOUT_MS: u32 = 2;

/// Delay between two diagnostic iterations (ms).
pub const DIAG_PERIOD_MS: u32 = 100;

/// Button that leaves the diagnostic screen.
pub const DIAG_CANCEL_ZONE: ButtonZone = ButtonZone::External;
pub const DIAG_CANCEL_BUTTON: ButtonId = ButtonId::Left;

// Leaf exercises

/// How long a modal notice stays on screen (ms).
pub const NOTICE_DURATION_MS: u32 = 3000;

/// Servo pulse train: count, high time (µs) and low time (ms).
/// 1 ms high + 18 ms low is a standard 50 Hz-ish RC servo frame.
pub const SERVO_PULSE_COUNT: u32 = 100;
pub const SERVO_PULSE_HIGH_US: u32 = 1_000;
pub const SERVO_PULSE_LOW_MS: u32 = 18;

/// SD write test: 8.3 file name and number of payload repetitions.
pub const SD_TEST_FILE: &str = "TOUCHDK.TXT";
pub const SD_TEST_REPEAT: u32 = 10;

/// USB CDC transmit: completion timeout and poll interval (ms).
pub const USB_TX_TIMEOUT_MS: u32 = 500;
pub const USB_TX_POLL_MS: u32 = 1;

/// Frame period while a notice is displayed (ms).
pub const NOTICE_FRAME_MS: u32 = 100;

// USB device identity (CDC-ACM serial port)

/// pid.codes test VID/PID.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;
pub const USB_MANUFACTURER: &str = "touchdeck";
pub const USB_PRODUCT: &str = "touchdeck serial";
pub const USB_SERIAL_NUMBER: &str = "000001";
/// Bulk endpoint size of the CDC data interface.
pub const USB_CDC_PACKET_SIZE: u16 = 64;

// Buttons

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;
