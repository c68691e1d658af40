//! Theme and Colors
//!
//! The NextGenCreator palette. The original look was gradient-heavy; in a
//! terminal that reduces to one accent color per role plus a few UI tones.

use ratatui::style::Color;

// ============================================================================
// Role Colors
// ============================================================================

/// User messages - blue
pub const USER_BLUE: Color = Color::Rgb(96, 165, 250);

/// Assistant messages - purple
pub const ASSISTANT_PURPLE: Color = Color::Rgb(192, 132, 252);

/// System messages (the seed greeting) - green
pub const SYSTEM_GREEN: Color = Color::Rgb(74, 222, 128);

// ============================================================================
// UI Colors
// ============================================================================

/// Header accent
pub const HEADER_BLUE: Color = Color::Rgb(59, 130, 246);

/// Typing indicator
pub const TYPING_PURPLE: Color = Color::Rgb(216, 180, 254);

/// Dim text (hints, status)
pub const DIM_GRAY: Color = Color::Rgb(120, 120, 120);

/// Warning yellow
pub const WARNING_YELLOW: Color = Color::Rgb(250, 204, 21);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);
