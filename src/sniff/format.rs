//! Media formats the sniffer can recognise.

use std::fmt;

/// Output bucket a recognised format is extracted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Audio: OGG, MP3.
    Sounds,
    /// Serialized Roblox models.
    Rbxm,
    /// Images: PNG, GIF, JFIF, WebP.
    Textures,
}

impl Category {
    /// Directory name under the output root.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Sounds => "Sounds",
            Self::Rbxm => "RBXM",
            Self::Textures => "Textures",
        }
    }

    /// File stem used when a link has no usable final segment.
    #[must_use]
    pub fn default_stem(self) -> &'static str {
        match self {
            Self::Sounds => "sound",
            Self::Rbxm => "model",
            Self::Textures => "texture",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A recognised media format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaFormat {
    /// File extension without the dot.
    pub extension: &'static str,
    /// Human-readable format name.
    pub format_name: &'static str,
    /// Output bucket.
    pub category: Category,
}

impl MediaFormat {
    pub const OGG: Self = Self::new("ogg", "OGG", Category::Sounds);
    pub const RBXM: Self = Self::new("rbxm", "RBXM", Category::Rbxm);
    pub const PNG: Self = Self::new("png", "PNG", Category::Textures);
    pub const GIF: Self = Self::new("gif", "GIF", Category::Textures);
    pub const JFIF: Self = Self::new("jfif", "JFIF", Category::Textures);
    pub const MP3: Self = Self::new("mp3", "MP3", Category::Sounds);
    pub const WEBP: Self = Self::new("webp", "WebP", Category::Textures);

    /// Every format, in sniffing priority order.
    pub const ALL: [Self; 7] = [
        Self::OGG,
        Self::RBXM,
        Self::PNG,
        Self::GIF,
        Self::JFIF,
        Self::MP3,
        Self::WEBP,
    ];

    const fn new(extension: &'static str, format_name: &'static str, category: Category) -> Self {
        Self {
            extension,
            format_name,
            category,
        }
    }

    /// Look a format up by extension, ignoring case and a leading dot.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        let wanted = extension.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|f| f.extension.eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (.{})", self.format_name, self.extension)
    }
}
