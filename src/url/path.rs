/// Returns the extension of a URL path
///
/// The extension is everything after the final `.` anywhere in the path, or
/// the empty string when the path has no `.`. A dot in a directory name
/// therefore yields the rest of the path, which an anchored extension
/// pattern will not match.
///
/// # Examples
///
/// ```
/// use gleaner::url::extension;
///
/// assert_eq!(extension("/a/b/report.csv"), "csv");
/// assert_eq!(extension("/archive.tar.gz"), "gz");
/// assert_eq!(extension("/a/b/index"), "");
/// assert_eq!(extension("/v1.2/index"), "2/index");
/// ```
pub fn extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) => &path[dot + 1..],
        None => "",
    }
}
