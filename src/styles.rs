/*!
 * Named subtitle style presets and the ASS document header.
 *
 * The registry is closed: `Karaoke_Green`, `Karaoke_Yellow` and `Clean`.
 * Any other identifier resolves to `Karaoke_Green` so that stale client
 * values still render.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier marking styles that carry per-word karaoke timing
pub const KARAOKE_MARKER: &str = "Karaoke";

/// Identifier that disables subtitle generation for a render
pub const NO_SUBTITLES: &str = "none";

/// Script resolution the presets are designed for
const PLAY_RES_X: u32 = 1920;
const PLAY_RES_Y: u32 = 1080;

/// Recognized style presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubtitleStyle {
    #[default]
    #[serde(rename = "Karaoke_Green")]
    KaraokeGreen,
    #[serde(rename = "Karaoke_Yellow")]
    KaraokeYellow,
    #[serde(rename = "Clean")]
    Clean,
}

impl SubtitleStyle {
    pub const ALL: [SubtitleStyle; 3] = [Self::KaraokeGreen, Self::KaraokeYellow, Self::Clean];

    /// Resolve a client style identifier, falling back to `Karaoke_Green`
    pub fn resolve(style_id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|style| style.name() == style_id)
            .unwrap_or_default()
    }

    /// Whether `style_id` names one of the presets exactly
    pub fn is_recognized(style_id: &str) -> bool {
        Self::ALL.iter().any(|style| style.name() == style_id)
    }

    /// Style name as written in the document
    pub fn name(&self) -> &'static str {
        match self {
            Self::KaraokeGreen => "Karaoke_Green",
            Self::KaraokeYellow => "Karaoke_Yellow",
            Self::Clean => "Clean",
        }
    }

    /// Whether dialogue in this style carries karaoke timing tags
    pub fn is_karaoke(&self) -> bool {
        self.name().contains(KARAOKE_MARKER)
    }

    /// Full rendering parameters for this preset
    pub fn preset(&self) -> StylePreset {
        match self {
            Self::KaraokeGreen => StylePreset {
                secondary_colour: AssColour::GREEN,
                ..StylePreset::karaoke_base(self.name())
            },
            Self::KaraokeYellow => StylePreset {
                secondary_colour: AssColour::YELLOW,
                ..StylePreset::karaoke_base(self.name())
            },
            Self::Clean => StylePreset {
                name: self.name(),
                font_name: "Arial",
                font_size: 50,
                primary_colour: AssColour::WHITE,
                secondary_colour: AssColour::BLACK,
                outline_colour: AssColour::BLACK,
                back_colour: AssColour::SHADOW,
                bold: true,
                outline: 3,
                shadow: 2,
                alignment: 2,
                margin_l: 10,
                margin_r: 10,
                margin_v: 60,
            },
        }
    }
}

impl fmt::Display for SubtitleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ASS colour in `&HAABBGGRR` order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssColour(pub u32);

impl AssColour {
    pub const WHITE: AssColour = AssColour(0x00FF_FFFF);
    pub const BLACK: AssColour = AssColour(0x0000_0000);
    pub const GREEN: AssColour = AssColour(0x0000_FF00);
    pub const YELLOW: AssColour = AssColour(0x0000_FFFF);
    /// Half-transparent black
    pub const SHADOW: AssColour = AssColour(0x8000_0000);
}

impl fmt::Display for AssColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&H{:08X}", self.0)
    }
}

/// Rendering parameters of one style line
#[derive(Debug, Clone, PartialEq)]
pub struct StylePreset {
    pub name: &'static str,
    pub font_name: &'static str,
    pub font_size: u32,
    /// Fill before the karaoke highlight reaches a word
    pub primary_colour: AssColour,
    /// Karaoke highlight fill
    pub secondary_colour: AssColour,
    pub outline_colour: AssColour,
    pub back_colour: AssColour,
    pub bold: bool,
    pub outline: u32,
    pub shadow: u32,
    /// Numpad-style anchor, 2 = bottom centre
    pub alignment: u8,
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
}

impl StylePreset {
    fn karaoke_base(name: &'static str) -> Self {
        Self {
            name,
            font_name: "Arial",
            font_size: 60,
            primary_colour: AssColour::WHITE,
            secondary_colour: AssColour::GREEN,
            outline_colour: AssColour::BLACK,
            back_colour: AssColour::SHADOW,
            bold: true,
            outline: 3,
            shadow: 0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 60,
        }
    }

    /// The `Style:` line, in the column order of the `[V4+ Styles]` format line
    pub fn style_line(&self) -> String {
        // Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle
        // are fixed for every preset
        format!(
            "Style: {},{},{},{},{},{},{},{},0,0,0,100,100,0,0,1,{},{},{},{},{},{},1",
            self.name,
            self.font_name,
            self.font_size,
            self.primary_colour,
            self.secondary_colour,
            self.outline_colour,
            self.back_colour,
            if self.bold { -1 } else { 0 },
            self.outline,
            self.shadow,
            self.alignment,
            self.margin_l,
            self.margin_r,
            self.margin_v,
        )
    }
}

/// Render the document preamble: script info, one style, and the events format line
pub fn emit_header(style_id: &str) -> String {
    header_for(SubtitleStyle::resolve(style_id))
}

pub(crate) fn header_for(style: SubtitleStyle) -> String {
    let mut header = String::new();

    header.push_str("[Script Info]\n");
    header.push_str("ScriptType: v4.00+\n");
    header.push_str(&format!("PlayResX: {}\n", PLAY_RES_X));
    header.push_str(&format!("PlayResY: {}\n", PLAY_RES_Y));
    header.push_str("WrapStyle: 0\n");
    header.push_str("ScaledBorderAndShadow: yes\n");
    header.push('\n');

    header.push_str("[V4+ Styles]\n");
    header.push_str("Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n");
    header.push_str(&style.preset().style_line());
    header.push('\n');
    header.push('\n');

    header.push_str("[Events]\n");
    header.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");

    header
}
