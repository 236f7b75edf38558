use regex::Regex;

/// Reduce a YouTube URL to its video id. Anything unrecognised is returned
/// trimmed, unchanged.
pub fn normalize_video_id(input: &str) -> String {
    let input = input.trim();

    let patterns = [
        // youtube.com/watch?v=ID (v may not be the first parameter)
        r"(?:youtube\.com|youtube-nocookie\.com)/watch\?(?:.*&)?v=([A-Za-z0-9_-]{11})",
        // youtu.be/ID
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        // youtube.com/embed/ID, /shorts/ID, /live/ID, /v/ID
        r"youtube(?:-nocookie)?\.com/(?:embed|shorts|live|v)/([A-Za-z0-9_-]{11})",
    ];

    for pattern in &patterns {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(id) = re.captures(input).and_then(|captures| captures.get(1)) {
                return id.as_str().to_string();
            }
        }
    }

    input.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id_passes_through() {
        assert_eq!(normalize_video_id("HQoJMIgNdjo"), "HQoJMIgNdjo");
        assert_eq!(normalize_video_id("  abc123 "), "abc123");
    }

    #[test]
    fn test_watch_urls() {
        assert_eq!(
            normalize_video_id("https://www.youtube.com/watch?v=HQoJMIgNdjo"),
            "HQoJMIgNdjo"
        );
        assert_eq!(
            normalize_video_id("https://youtube.com/watch?feature=share&v=HQoJMIgNdjo&t=42"),
            "HQoJMIgNdjo"
        );
        assert_eq!(
            normalize_video_id("https://m.youtube.com/watch?v=HQoJMIgNdjo"),
            "HQoJMIgNdjo"
        );
    }

    #[test]
    fn test_short_and_embed_urls() {
        assert_eq!(normalize_video_id("https://youtu.be/HQoJMIgNdjo?si=x"), "HQoJMIgNdjo");
        assert_eq!(
            normalize_video_id("https://www.youtube.com/embed/HQoJMIgNdjo"),
            "HQoJMIgNdjo"
        );
        assert_eq!(
            normalize_video_id("https://www.youtube.com/shorts/HQoJMIgNdjo"),
            "HQoJMIgNdjo"
        );
    }

    #[test]
    fn test_unrecognised_url_is_untouched() {
        assert_eq!(
            normalize_video_id("https://vimeo.com/12345"),
            "https://vimeo.com/12345"
        );
    }
}
