//! Row layout sizing.
//!
//! Every control in the switcher row is a square.  [`compute_layout`] picks
//! the side length so the whole row fits inside a width budget, shrinking the
//! squares down to a floor when there are too many of them.  At the floor
//! the row may overflow the budget.
//!
//! All sizes are whole pixels; integer division truncates.

/// Side length of a control when the row fits the budget.
pub const DEFAULT_BASE_SIZE: u32 = 128;

/// Smallest side length a control is ever shrunk to.
pub const DEFAULT_MIN_SIZE: u32 = 64;

/// Share of the display width the row may use.
pub const DEFAULT_SCREEN_WIDTH_RATIO: f64 = 0.8;

/// Result of [`compute_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Side length of each square control, in pixels.
    pub item_size: u32,
    /// Width of the whole row (`item_count * item_size`), in pixels.
    pub total_width: u32,
}

/// Error from [`compute_layout`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A row with no controls has no meaningful size.
    #[error("cannot lay out an empty row")]
    NoItems,
}

/// Compute the per-item size and total width of a row of `item_count`
/// squares.
///
/// Starts from `base_size`.  When `item_count * base_size` exceeds
/// `max_width` the size becomes `max_width / item_count`, but never less
/// than `min_size`; in that case `total_width` may exceed `max_width`.
///
/// `min_size` is expected to be at most `base_size`.
pub fn compute_layout(
    item_count: u32,
    base_size: u32,
    max_width: u32,
    min_size: u32,
) -> Result<Layout, LayoutError> {
    if item_count == 0 {
        return Err(LayoutError::NoItems);
    }

    let naive = item_count.saturating_mul(base_size);
    if naive <= max_width {
        return Ok(Layout {
            item_size: base_size,
            total_width: naive,
        });
    }

    let item_size = (max_width / item_count).max(min_size);
    Ok(Layout {
        item_size,
        total_width: item_count.saturating_mul(item_size),
    })
}

/// Width budget for a row on a display `screen_width` pixels wide.
pub fn max_row_width(screen_width: u32, ratio: f64) -> u32 {
    (f64::from(screen_width) * ratio).floor().max(0.0) as u32
}
