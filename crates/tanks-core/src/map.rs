//! Map file loading.
//!
//! Two formats are accepted. Files ending in `.json` hold a serialized
//! [`LayoutSpec`]. Anything else is the text format: optional `SIZE n` and
//! `MAXHEALTH n` header lines, then a `MAP` line after which every line is a
//! board row drawn with `#` wall, `O` barrel, `?` portal, `/` and `\` mirrors
//! and `S` spawn. Any other character is open floor.

use std::path::Path;

use crate::grid::Coord;
use crate::layout::{Layout, LayoutError, LayoutSpec};

/// Errors produced while reading a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    Io(String),
    /// A `SIZE` or `MAXHEALTH` line with no value.
    BadHeader { line: usize, key: String },
    BadNumber { line: usize, value: String },
    Json(String),
    Layout(LayoutError),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read map: {e}"),
            Self::BadHeader { line, key } => write!(f, "line {line}: {key} needs a value"),
            Self::BadNumber { line, value } => {
                write!(f, "line {line}: '{value}' is not a valid number")
            },
            Self::Json(e) => write!(f, "invalid JSON map: {e}"),
            Self::Layout(e) => write!(f, "invalid layout: {e}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LayoutError> for MapError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

/// Parse the text map format into an unvalidated spec.
pub fn parse_map(text: &str) -> Result<LayoutSpec, MapError> {
    let mut spec = LayoutSpec::default();
    let mut in_map = false;
    let mut row: usize = 0;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if in_map {
            if !line.trim().is_empty() {
                for (col, ch) in line.chars().enumerate() {
                    let cell = Coord::new(to_index(row), to_index(col));
                    match ch {
                        '#' => spec.walls.push(cell),
                        'O' => spec.barrels.push(cell),
                        '?' => spec.portals.push(cell),
                        '/' => spec.top_left_mirrors.push(cell),
                        '\\' => spec.top_right_mirrors.push(cell),
                        'S' => spec.spawns.push(cell),
                        _ => {},
                    }
                }
            }
            // Blank rows still count as board rows.
            row += 1;
            continue;
        }

        let mut words = line.split_whitespace();
        match words.next() {
            Some("MAP") => in_map = true,
            Some(key @ ("SIZE" | "MAXHEALTH")) => {
                let value = words.next().ok_or_else(|| MapError::BadHeader {
                    line: line_no,
                    key: key.to_string(),
                })?;
                let n: u32 = value.parse().map_err(|_| MapError::BadNumber {
                    line: line_no,
                    value: value.to_string(),
                })?;
                if key == "SIZE" {
                    spec.size = n;
                } else {
                    spec.max_health = n;
                }
            },
            _ => {},
        }
    }

    Ok(spec)
}

/// Out-of-range rows and columns saturate; layout validation rejects them.
fn to_index(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Parse a map from text, choosing the format from `path`'s extension.
pub fn parse_layout(path: &Path, content: &str) -> Result<Layout, MapError> {
    let spec = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        serde_json::from_str::<LayoutSpec>(content).map_err(|e| MapError::Json(e.to_string()))?
    } else {
        parse_map(content)?
    };
    Ok(Layout::try_from(spec)?)
}

/// Read and validate a map file.
pub fn load_layout(path: impl AsRef<Path>) -> Result<Layout, MapError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| MapError::Io(format!("{}: {e}", path.display())))?;
    parse_layout(path, &content)
}

/// Load a map file, falling back to [`Layout::builtin`] when it is missing
/// or invalid.
pub fn load_layout_or_builtin(path: impl AsRef<Path>) -> Layout {
    let path = path.as_ref();
    match load_layout(path) {
        Ok(layout) => layout,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Falling back to built-in arena");
            Layout::builtin()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_defaults_apply() {
        let spec = parse_map("MAP\n#\n").unwrap();
        assert_eq!(spec.size, 15);
        assert_eq!(spec.max_health, 10);
        assert_eq!(spec.walls, vec![Coord::new(0, 0)]);
    }

    #[test]
    fn parses_every_glyph() {
        let text = "SIZE 4\nMAXHEALTH 3\nMAP\n#O?.\n/\\S \n";
        let spec = parse_map(text).unwrap();
        assert_eq!(spec.size, 4);
        assert_eq!(spec.max_health, 3);
        assert_eq!(spec.walls, vec![Coord::new(0, 0)]);
        assert_eq!(spec.barrels, vec![Coord::new(0, 1)]);
        assert_eq!(spec.portals, vec![Coord::new(0, 2)]);
        assert_eq!(spec.top_left_mirrors, vec![Coord::new(1, 0)]);
        assert_eq!(spec.top_right_mirrors, vec![Coord::new(1, 1)]);
        assert_eq!(spec.spawns, vec![Coord::new(1, 2)]);
    }

    #[test]
    fn blank_map_rows_advance_the_row_counter() {
        let spec = parse_map("SIZE 3\nMAP\n\n\n  #\n").unwrap();
        assert_eq!(spec.walls, vec![Coord::new(2, 2)]);
    }

    #[test]
    fn unknown_header_lines_are_ignored() {
        let spec = parse_map("TITLE arena\nSIZE 5\n\nMAP\n").unwrap();
        assert_eq!(spec.size, 5);
    }

    #[test]
    fn missing_header_value_is_bad_header() {
        let err = parse_map("SIZE\nMAP\n").unwrap_err();
        assert_eq!(
            err,
            MapError::BadHeader {
                line: 1,
                key: "SIZE".into()
            }
        );
    }

    #[test]
    fn malformed_number_is_bad_number() {
        let err = parse_map("MAXHEALTH -2\n").unwrap_err();
        assert!(matches!(err, MapError::BadNumber { line: 1, .. }));
    }

    #[test]
    fn layout_errors_surface_through_parse_layout() {
        let err = parse_layout(Path::new("tiny.txt"), "SIZE 3\nMAP\n   #\n").unwrap_err();
        assert!(matches!(err, MapError::Layout(LayoutError::OutOfBounds { .. })));
    }

    #[test]
    fn json_extension_selects_json() {
        let json = r#"{"size": 4, "walls": [{"row": 1, "col": 1}]}"#;
        let layout = parse_layout(Path::new("arena.JSON"), json).unwrap();
        assert_eq!(layout.size(), 4);
        assert_eq!(layout.max_health(), 10);
        assert!(layout.is_wall(Coord::new(1, 1)));

        let err = parse_layout(Path::new("arena.json"), "SIZE 4").unwrap_err();
        assert!(matches!(err, MapError::Json(_)));
    }

    #[test]
    fn bundled_crossfire_map_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../maps/crossfire.txt");
        let layout = load_layout(path).unwrap();
        assert_eq!(layout.size(), 9);
        assert_eq!(layout.max_health(), 5);
        assert_eq!(layout.spawns().len(), 4);
        assert_eq!(layout.portals(), &[Coord::new(3, 4), Coord::new(5, 4)]);
        assert_eq!(layout.barrel_origins().len(), 4);
        assert_eq!(layout.walls().len(), 7);
    }

    #[test]
    fn missing_file_is_io_error_and_falls_back() {
        let path = "definitely/not/a/map.txt";
        assert!(matches!(load_layout(path), Err(MapError::Io(_))));
        let layout = load_layout_or_builtin(path);
        assert_eq!(layout.walls(), Layout::builtin().walls());
    }
}
