//! Colors and icons for tree nodes
//!
//! [`StyleContext`] replaces process-wide color/icon tables: it is built once
//! from the user settings and the active iced theme, then passed into every
//! node update.

use iced::{Color, Theme};
use tagpanel_core::config::Settings;
use tagpanel_core::{FileState, Rgb};

/// Background of a file with similarity 0
pub const MISMATCH_COLOR: Rgb = Rgb::new(223, 125, 125);

/// Number of match-quality icon buckets (50%..100% in steps of 10)
pub const MATCH_BUCKETS: u8 = 6;

/// Similarity clamped to [0, 1]; NaN counts as no match
pub fn clamp_similarity(similarity: f32) -> f32 {
    if similarity.is_nan() {
        0.0
    } else {
        similarity.clamp(0.0, 1.0)
    }
}

/// Icon bucket for a similarity: nearest of 0..=5
pub fn match_bucket(similarity: f32) -> u8 {
    let bucket = (clamp_similarity(similarity) * 5.0 + 0.5).floor() as u8;
    bucket.min(MATCH_BUCKETS - 1)
}

/// Interpolate from [`MISMATCH_COLOR`] (similarity 0) to `base` (similarity 1)
pub fn match_color(similarity: f32, base: Rgb) -> Rgb {
    let s = clamp_similarity(similarity);
    let channel = |mismatch: u8, base: u8| -> u8 {
        let mismatch = f32::from(mismatch);
        let base = f32::from(base);
        (mismatch + (base - mismatch) * s).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(
        channel(MISMATCH_COLOR.r, base.r),
        channel(MISMATCH_COLOR.g, base.g),
        channel(MISMATCH_COLOR.b, base.b),
    )
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgb8(rgb.r, rgb.g, rgb.b)
}

fn from_color(color: Color) -> Rgb {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb::new(channel(color.r), channel(color.g), channel(color.b))
}

/// Icon shown in the first column of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    /// Cluster / directory
    Folder,
    /// Album with missing or unmatched files
    Cd,
    /// Complete album
    CdSaved,
    /// Track with zero or several files
    Note,
    File,
    FilePending,
    Error,
    /// Saved file on a track
    Saved,
    /// Matched file, bucket 0..=5
    Match(u8),
    /// Matched file waiting on a lookup/save, bucket 0..=5
    MatchPending(u8),
}

const MATCH_GLYPHS: [&str; MATCH_BUCKETS as usize] = [
    "\u{25CB}", // ○
    "\u{25D4}", // ◔
    "\u{25D1}", // ◑
    "\u{25D5}", // ◕
    "\u{25C9}", // ◉
    "\u{25CF}", // ●
];

const MATCH_PENDING_GLYPHS: [&str; MATCH_BUCKETS as usize] = [
    "\u{25CC}", // ◌
    "\u{25F4}", // ◴
    "\u{25F5}", // ◵
    "\u{25F6}", // ◶
    "\u{25F7}", // ◷
    "\u{25CE}", // ◎
];

impl Icon {
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Folder => "\u{1F4C1}",      // 📁
            Icon::Cd => "\u{1F4BF}",          // 💿
            Icon::CdSaved => "\u{1F4C0}",     // 📀
            Icon::Note => "\u{1F3B5}",        // 🎵
            Icon::File => "\u{1F4C4}",        // 📄
            Icon::FilePending => "\u{23F3}",  // ⏳
            Icon::Error => "\u{26A0}",        // ⚠
            Icon::Saved => "\u{2714}",        // ✔
            Icon::Match(b) => MATCH_GLYPHS[usize::from(*b).min(MATCH_GLYPHS.len() - 1)],
            Icon::MatchPending(b) => {
                MATCH_PENDING_GLYPHS[usize::from(*b).min(MATCH_PENDING_GLYPHS.len() - 1)]
            }
        }
    }
}

/// Colors every node update draws from
#[derive(Debug, Clone, PartialEq)]
pub struct StyleContext {
    /// Theme base (row background)
    pub base: Rgb,
    /// Theme text color
    pub text: Rgb,
    track_colors: [Rgb; 4],
    file_colors: [Rgb; 4],
}

impl StyleContext {
    pub fn new(settings: &Settings, base: Rgb, text: Rgb) -> Self {
        // Indexed by FileState::index()
        let track_colors = [
            settings.color_saved,
            text,
            settings.color_pending,
            settings.color_error,
        ];
        let file_colors = [
            text,
            settings.color_modified,
            settings.color_pending,
            settings.color_error,
        ];
        Self {
            base,
            text,
            track_colors,
            file_colors,
        }
    }

    /// Take base/text colors from an iced theme
    pub fn from_theme(settings: &Settings, theme: &Theme) -> Self {
        let palette = theme.extended_palette();
        Self::new(
            settings,
            from_color(palette.background.base.color),
            from_color(palette.background.base.text),
        )
    }

    /// Foreground of a track row showing its single file
    pub fn track_color(&self, state: FileState) -> Rgb {
        self.track_colors[state.index()]
    }

    /// Foreground of a file row
    pub fn file_color(&self, state: FileState) -> Rgb {
        self.file_colors[state.index()]
    }
}

impl Default for StyleContext {
    fn default() -> Self {
        Self::new(
            &Settings::default(),
            Rgb::new(255, 255, 255),
            Rgb::new(0, 0, 0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_color_endpoints_are_exact() {
        for base in [
            Rgb::new(255, 255, 255),
            Rgb::new(0, 0, 0),
            Rgb::new(12, 200, 77),
            MISMATCH_COLOR,
        ] {
            assert_eq!(match_color(0.0, base), MISMATCH_COLOR);
            assert_eq!(match_color(1.0, base), base);
        }
    }

    #[test]
    fn test_match_color_midpoint() {
        let mid = match_color(0.5, Rgb::new(255, 255, 255));
        assert_eq!(mid, Rgb::new(239, 190, 190));
    }

    #[test]
    fn test_match_color_clamps_out_of_range() {
        let base = Rgb::new(40, 50, 60);
        assert_eq!(match_color(1.2, base), base);
        assert_eq!(match_color(-0.3, base), MISMATCH_COLOR);
        assert_eq!(match_color(f32::NAN, base), MISMATCH_COLOR);
    }

    #[test]
    fn test_match_buckets() {
        assert_eq!(match_bucket(0.83), 4);
        assert_eq!(match_bucket(0.0), 0);
        assert_eq!(match_bucket(0.09), 0);
        assert_eq!(match_bucket(0.1), 1);
        assert_eq!(match_bucket(0.95), 5);
        assert_eq!(match_bucket(1.0), 5);
        assert_eq!(match_bucket(1.7), 5);
        assert_eq!(match_bucket(-2.0), 0);
    }

    #[test]
    fn test_state_color_tables() {
        let style = StyleContext::default();
        let settings = Settings::default();
        assert_eq!(style.track_color(FileState::Normal), settings.color_saved);
        assert_eq!(style.track_color(FileState::Changed), style.text);
        assert_eq!(style.file_color(FileState::Normal), style.text);
        assert_eq!(style.file_color(FileState::Changed), settings.color_modified);
        assert_eq!(style.file_color(FileState::Error), settings.color_error);
    }
}
