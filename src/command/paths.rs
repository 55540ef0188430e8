//! Map, output and executable path helpers.
//!
//! Paths are kept as the strings shown in the form, using the platform's
//! native separator. Comparisons are ASCII case-insensitive.

use std::path::{Path, MAIN_SEPARATOR};

#[cfg(windows)]
pub const PACK3R_EXECUTABLE: &str = "\\Pack3r.exe";
#[cfg(not(windows))]
pub const PACK3R_EXECUTABLE: &str = "/Pack3r";

const MAP_EXTENSIONS: [&str; 2] = [".map", ".reg"];
const OUTPUT_EXTENSIONS: [&str; 2] = [".pk3", ".zip"];

fn maps_segment() -> String {
    format!("maps{}", MAIN_SEPARATOR)
}

fn ends_with_ci(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.is_char_boundary(s.len() - suffix.len())
        && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn contains_ci(s: &str, needle: &str) -> bool {
    s.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

/// Removes every occurrence of `needle`, ignoring ASCII case.
fn remove_ci(s: &str, needle: &str) -> String {
    // ASCII lowercasing keeps byte offsets identical
    let lower = s.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();

    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for (idx, _) in lower.match_indices(&needle) {
        out.push_str(&s[last..idx]);
        last = idx + needle.len();
    }
    out.push_str(&s[last..]);
    out
}

fn output_extension(source: bool) -> &'static str {
    if source { ".zip" } else { ".pk3" }
}

/// Maps must live in a `maps` directory for Pack3r to resolve assets.
pub fn is_valid_map_path(path: &str) -> bool {
    contains_ci(path, &format!("{}{}", MAIN_SEPARATOR, maps_segment()))
}

/// `.map` or `.reg` file.
pub fn is_map_file(path: &str) -> bool {
    MAP_EXTENSIONS.iter().any(|ext| ends_with_ci(path, ext))
}

/// Replaces a `.map`/`.reg` suffix with the output extension.
pub fn replace_map_extension(path: &str, source: bool) -> String {
    if is_map_file(path) {
        format!("{}{}", &path[..path.len() - 4], output_extension(source))
    } else {
        path.to_string()
    }
}

/// Default output for a map: next to the `maps` directory, as a pk3 (or zip).
///
/// `/et/etmain/maps/mymap.map` becomes `/et/etmain/mymap.pk3`.
pub fn auto_fill_output_path(map_path: &str, source: bool) -> String {
    replace_map_extension(&remove_ci(map_path, &maps_segment()), source)
}

/// Output file in `dir`, named after the map.
pub fn output_in_directory(dir: &str, map_path: &str, source: bool) -> String {
    let file_name = map_path.rsplit(MAIN_SEPARATOR).next().unwrap_or(map_path);
    let path = format!("{}{}{}", dir.trim_end_matches(MAIN_SEPARATOR), MAIN_SEPARATOR, file_name);
    replace_map_extension(&path, source)
}

/// Swaps the extension of an output file when Source is toggled.
///
/// Returns `None` when the output isn't a `.pk3`/`.zip` file (unset, or a
/// directory). Only the last four characters are touched so a `.pk3dir`
/// earlier in the path survives.
pub fn update_output_extension(output: &str, source: bool) -> Option<String> {
    if !OUTPUT_EXTENSIONS.iter().any(|ext| ends_with_ci(output, ext)) {
        return None;
    }
    Some(format!("{}{}", &output[..output.len() - 4], output_extension(source)))
}

/// The mapping install directory a map lives in, with a trailing separator.
///
/// Strips `maps/<file>`, or `<name>.pk3dir/maps/<file>`.
pub fn maps_root(map_path: &str) -> Option<String> {
    let in_pk3dir = contains_ci(map_path, &format!(".pk3dir{}{}", MAIN_SEPARATOR, maps_segment()));
    let strip = if in_pk3dir { 3 } else { 2 };

    let parts: Vec<&str> = map_path.split(MAIN_SEPARATOR).collect();
    if parts.len() <= strip {
        return None;
    }

    let root = parts[..parts.len() - strip].join(&MAIN_SEPARATOR.to_string());
    Some(format!("{}{}", root, MAIN_SEPARATOR))
}

/// Whether the file is named like the Pack3r executable.
pub fn is_valid_pack3r_binary(path: &str) -> bool {
    ends_with_ci(path, PACK3R_EXECUTABLE)
}

#[cfg(unix)]
pub fn is_executable(path: &str) -> bool {
    use std::os::unix::fs::PermissionsExt;

    Path::new(path)
        .metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &str) -> bool {
    Path::new(path).is_file()
}
