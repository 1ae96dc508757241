//! Video filename to annotation key ("stem") conversion.

/// Media extensions stripped from a filename when no list is configured.
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &["mp4"];

/// Strip a trailing media extension from `filename`.
///
/// Only extensions listed in `extensions` (compared case-insensitively,
/// without the leading dot) are removed, so `clip.v2.mp4` becomes
/// `clip.v2` while `notes.txt` is returned unchanged.
///
/// ```
/// use mp4label_core::naming::stem_of;
///
/// assert_eq!(stem_of("lesson_01.mp4", &["mp4"]), "lesson_01");
/// assert_eq!(stem_of("lesson_01.MP4", &["mp4"]), "lesson_01");
/// assert_eq!(stem_of("lesson_01.mov", &["mp4"]), "lesson_01.mov");
/// ```
pub fn stem_of<S: AsRef<str>>(filename: &str, extensions: &[S]) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && extensions
                    .iter()
                    .any(|known| known.as_ref().eq_ignore_ascii_case(ext)) =>
        {
            stem.to_string()
        }
        _ => filename.to_string(),
    }
}

/// Name of the stored annotation for `stem`.
pub fn annotation_file_name(stem: &str) -> String {
    format!("{stem}.txt")
}
