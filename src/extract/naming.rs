//! Output file naming for extracted payloads.

use std::path::{Path, PathBuf};

use crate::sniff::MediaFormat;

/// Characters that cannot appear in a file name on at least one common platform.
const INVALID_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '\\', '|', '?', '*'];

/// File name for a payload of `format` fetched from `link`.
///
/// Uses the link's final `/`-separated segment when it is non-empty and
/// falls back to the category's default stem otherwise. The result always
/// ends in `.<extension>`.
///
/// # Example
///
/// ```
/// use bloxdump::extract::output_file_name;
/// use bloxdump::sniff::MediaFormat;
///
/// assert_eq!(
///     output_file_name("https://example.com/a/sound123", &MediaFormat::OGG),
///     "sound123.ogg"
/// );
/// assert_eq!(output_file_name("", &MediaFormat::OGG), "sound.ogg");
/// ```
#[must_use]
pub fn output_file_name(link: &str, format: &MediaFormat) -> String {
    let mut name = link
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(sanitize_segment)
        .unwrap_or_else(|| format.category.default_stem().to_string());

    let suffix = format!(".{}", format.extension);
    if !name.ends_with(&suffix) {
        name.push_str(&suffix);
    }
    name
}

/// Full destination: `<output_dir>/<category dir>/<file name>`.
#[must_use]
pub fn output_path(output_dir: &Path, link: &str, format: &MediaFormat) -> PathBuf {
    output_dir
        .join(format.category.dir_name())
        .join(output_file_name(link, format))
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_last_segment() {
        assert_eq!(
            output_file_name("https://example.com/a/sound123", &MediaFormat::OGG),
            "sound123.ogg"
        );
    }

    #[test]
    fn test_existing_extension_not_doubled() {
        assert_eq!(
            output_file_name("https://example.com/music.ogg", &MediaFormat::OGG),
            "music.ogg"
        );
    }

    #[test]
    fn test_trailing_slash_uses_default() {
        assert_eq!(
            output_file_name("https://example.com/a/", &MediaFormat::OGG),
            "sound.ogg"
        );
        assert_eq!(output_file_name("", &MediaFormat::PNG), "texture.png");
        assert_eq!(output_file_name("", &MediaFormat::RBXM), "model.rbxm");
    }

    #[test]
    fn test_link_without_slash() {
        assert_eq!(output_file_name("abc", &MediaFormat::MP3), "abc.mp3");
    }

    #[test]
    fn test_invalid_characters_replaced() {
        assert_eq!(
            output_file_name("https://c.rbxcdn.com/asset?id=1*2", &MediaFormat::OGG),
            "asset_id=1_2.ogg"
        );
        assert_eq!(output_file_name("a/b\\c:d", &MediaFormat::OGG), "b_c_d.ogg");
    }

    #[test]
    fn test_output_path_layout() {
        let path = output_path(
            Path::new("/out"),
            "https://example.com/a/sound123",
            &MediaFormat::OGG,
        );
        assert_eq!(path, Path::new("/out").join("Sounds").join("sound123.ogg"));

        let path = output_path(Path::new("/out"), "x/y", &MediaFormat::WEBP);
        assert_eq!(path, Path::new("/out").join("Textures").join("y.webp"));
    }
}
