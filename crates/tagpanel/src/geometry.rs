//! Persisted view geometry
//!
//! Column widths are stored as space-separated integers, one per column except
//! the last (which fills). Reading is tolerant: the first missing or malformed
//! entry stops the restore and the remaining columns keep their defaults.
//! The splitter layout is a 4-byte blob holding the two fill portions; their
//! sum must fit a `u16`.

use tagpanel_core::config::DEFAULT_VIEW_SIZES;

use crate::error::{PanelError, Result};

/// Width for columns past the end of the default sizes
pub const FALLBACK_COLUMN_WIDTH: f32 = 100.0;

/// Default widths for a schema with `columns` columns
pub fn default_widths(columns: usize) -> Vec<f32> {
    let count = columns.saturating_sub(1);
    let mut widths: Vec<f32> = DEFAULT_VIEW_SIZES
        .split_whitespace()
        .filter_map(|w| w.parse().ok())
        .take(count)
        .collect();
    widths.resize(count, FALLBACK_COLUMN_WIDTH);
    widths
}

pub fn parse_width(value: &str) -> Result<f32> {
    value
        .parse::<u32>()
        .map(|w| w as f32)
        .map_err(|_| PanelError::InvalidWidth(value.to_string()))
}

/// Restore widths from their saved form
pub fn restore_widths(saved: &str, columns: usize) -> Vec<f32> {
    let mut widths = default_widths(columns);
    let mut entries = saved.split_whitespace();
    for width in widths.iter_mut() {
        let Some(entry) = entries.next() else {
            break;
        };
        match parse_width(entry) {
            Ok(w) => *width = w,
            Err(e) => {
                log::warn!("restore_widths: {}, keeping defaults", e);
                break;
            }
        }
    }
    widths
}

/// Saved form of a view's widths
pub fn save_widths(widths: &[f32]) -> String {
    widths
        .iter()
        .map(|w| (w.max(0.0).round() as u32).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Portions shared by the two views after a mouse drag
pub const DRAG_RESOLUTION: u16 = 1000;

/// Keyboard resizing moves the splitter by this fraction of the total
const RESIZE_STEPS: u32 = 20;

/// Fill portions of the files and albums views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterLayout {
    pub files: u16,
    pub albums: u16,
}

impl Default for SplitterLayout {
    fn default() -> Self {
        Self { files: 5, albums: 5 }
    }
}

impl SplitterLayout {
    pub fn decode(state: &[u8]) -> Result<Self> {
        let [f0, f1, a0, a1] = state else {
            return Err(PanelError::SplitterState(state.len()));
        };
        let layout = Self {
            files: u16::from_be_bytes([*f0, *f1]),
            albums: u16::from_be_bytes([*a0, *a1]),
        };
        if layout.files == 0 || layout.albums == 0 {
            return Ok(Self::default());
        }
        if layout.files.checked_add(layout.albums).is_none() {
            return Err(PanelError::SplitterPortions {
                files: layout.files,
                albums: layout.albums,
            });
        }
        Ok(layout)
    }

    /// Decode, falling back to the default layout. An empty blob means
    /// nothing was saved yet.
    pub fn restore(state: &[u8]) -> Self {
        if state.is_empty() {
            return Self::default();
        }
        Self::decode(state).unwrap_or_else(|e| {
            log::warn!("SplitterLayout::restore: {}, using default layout", e);
            Self::default()
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut state = Vec::with_capacity(4);
        state.extend_from_slice(&self.files.to_be_bytes());
        state.extend_from_slice(&self.albums.to_be_bytes());
        state
    }

    /// Grow the files view by `steps` twentieths of the total (negative
    /// shrinks it). Neither side goes below one portion.
    pub fn resize(&mut self, steps: i16) {
        let total = u32::from(self.files) + u32::from(self.albums);
        if total < 2 {
            *self = Self::default();
            return;
        }
        let max = u32::from(u16::MAX);
        let step = i64::from((total / RESIZE_STEPS).max(1));
        let lo = i64::from(total.saturating_sub(max).max(1));
        let hi = i64::from((total - 1).min(max));
        let files = (i64::from(self.files) + i64::from(steps) * step).clamp(lo, hi);
        self.files = u16::try_from(files).unwrap_or(u16::MAX);
        self.albums = u16::try_from(i64::from(total) - files).unwrap_or(u16::MAX);
    }

    /// Put the split at `fraction` of the panel width
    pub fn drag_to(&mut self, fraction: f32) {
        let files = (fraction.clamp(0.0, 1.0) * f32::from(DRAG_RESOLUTION)).round() as u16;
        self.files = files.clamp(1, DRAG_RESOLUTION - 1);
        self.albums = DRAG_RESOLUTION - self.files;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_widths() {
        assert_eq!(default_widths(3), vec![250.0, 40.0]);
        assert_eq!(default_widths(5), vec![250.0, 40.0, 100.0, FALLBACK_COLUMN_WIDTH]);
        assert!(default_widths(1).is_empty());
        assert!(default_widths(0).is_empty());
    }

    #[test]
    fn test_restore_stops_at_first_bad_entry() {
        assert_eq!(restore_widths("300 50 120", 4), vec![300.0, 50.0, 120.0]);
        assert_eq!(restore_widths("300", 4), vec![300.0, 40.0, 100.0]);
        assert_eq!(restore_widths("300 wide 120", 4), vec![300.0, 40.0, 100.0]);
        assert_eq!(restore_widths("", 4), vec![250.0, 40.0, 100.0]);
        assert_eq!(restore_widths("-5 60", 3), vec![250.0, 40.0]);
    }

    #[test]
    fn test_save_widths() {
        assert_eq!(save_widths(&[250.0, 40.4, 99.6]), "250 40 100");
        assert_eq!(restore_widths(&save_widths(&[310.0, 55.0]), 3), vec![310.0, 55.0]);
    }

    #[test]
    fn test_splitter_state() {
        let layout = SplitterLayout { files: 3, albums: 7 };
        assert_eq!(layout.encode(), vec![0, 3, 0, 7]);
        assert_eq!(SplitterLayout::restore(&layout.encode()), layout);

        assert!(matches!(
            SplitterLayout::decode(&[1, 2, 3]),
            Err(PanelError::SplitterState(3))
        ));
        assert_eq!(SplitterLayout::restore(&[1, 2, 3]), SplitterLayout::default());
        assert_eq!(SplitterLayout::restore(&[]), SplitterLayout::default());
        assert_eq!(SplitterLayout::restore(&[0, 0, 0, 4]), SplitterLayout::default());
    }

    #[test]
    fn test_resize_keeps_both_sides_visible() {
        let mut layout = SplitterLayout::default();
        layout.resize(2);
        assert_eq!(layout, SplitterLayout { files: 7, albums: 3 });
        layout.resize(20);
        assert_eq!(layout, SplitterLayout { files: 9, albums: 1 });
        layout.resize(-20);
        assert_eq!(layout, SplitterLayout { files: 1, albums: 9 });
    }

    #[test]
    fn test_oversized_portions_are_rejected() {
        assert!(matches!(
            SplitterLayout::decode(&[0xff, 0xff, 0xff, 0xff]),
            Err(PanelError::SplitterPortions { .. })
        ));
        let mut layout = SplitterLayout::restore(&[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(layout, SplitterLayout::default());
        layout.resize(1);
        assert_eq!(layout, SplitterLayout { files: 6, albums: 4 });
    }

    #[test]
    fn test_resize_never_wraps() {
        let mut layout = SplitterLayout {
            files: u16::MAX,
            albums: u16::MAX,
        };
        layout.resize(1);
        assert!(layout.files >= 1 && layout.albums >= 1);
        assert_eq!(u32::from(layout.files) + u32::from(layout.albums), 2 * u32::from(u16::MAX));

        let mut layout = SplitterLayout { files: 60_000, albums: 5_000 };
        layout.resize(-40);
        assert_eq!(layout, SplitterLayout { files: 1, albums: 64_999 });
    }

    #[test]
    fn test_drag_to_fraction() {
        let mut layout = SplitterLayout::default();
        layout.drag_to(0.25);
        assert_eq!(layout, SplitterLayout { files: 250, albums: 750 });
        layout.drag_to(1.5);
        assert_eq!(layout, SplitterLayout { files: 999, albums: 1 });
        layout.drag_to(f32::NAN);
        assert_eq!(layout.files, 1);
    }
}
