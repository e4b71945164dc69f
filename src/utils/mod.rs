use std::path::Path;

/// Extensions yt-dlp commonly produces for audio-only downloads.
const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "m4a", "opus", "ogg", "webm"];

/// Content-addressed filename for a cover image: `<md5(url)>.<ext>`.
/// Repeat fetches of the same image URL land on the same file.
pub fn cover_filename(img_url: &str) -> String {
    let digest = md5::compute(img_url.as_bytes());
    format!("{:x}{}", digest, cover_extension(img_url))
}

/// Extension inferred from the image URL substring, defaulting to `.jpg`.
fn cover_extension(img_url: &str) -> &'static str {
    if img_url.contains(".webp") {
        ".webp"
    } else if img_url.contains(".png") {
        ".png"
    } else {
        ".jpg"
    }
}

/// Audio files currently present in the download directory, sorted by name.
/// Errors (missing directory, unreadable entries) degrade to an empty list.
pub fn audio_files_in(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<String> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let is_audio = Path::new(&name)
                .extension()
                .map(|ext| AUDIO_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
                .unwrap_or(false);
            is_audio.then_some(name)
        })
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_filename_hashes_url() {
        assert_eq!(
            cover_filename("https://ichef.bbci.co.uk/images/ic/640x360/p0abcdef.jpg.webp"),
            "c8b3487de14642b12ae07d56de96611c.webp"
        );
        assert_eq!(
            cover_filename("https://ichef.bbci.co.uk/images/ic/640x360/p0abcdef.png"),
            "2ed2fd0b4780129d0ffa47d92dd14dc9.png"
        );
        // No recognized substring falls back to .jpg
        assert_eq!(
            cover_filename("https://example.com/cover"),
            "0b4e8ec8365490e90c9466ca4cf5b47d.jpg"
        );
    }

    #[test]
    fn test_audio_files_in_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp3", "a.m4a", "notes.txt", "clip.mp4"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        assert_eq!(audio_files_in(dir.path()), vec!["a.m4a", "b.mp3"]);
    }

    #[test]
    fn test_audio_files_in_missing_dir() {
        assert!(audio_files_in(Path::new("/definitely/not/here")).is_empty());
    }
}
