//! Text parsers for the `.map` and `.weights` file formats.
//!
//! Both formats are line-oriented with a small `key value` header.  Header
//! lines the parser does not recognize (`type octile`, comments, …) are
//! ignored so maps from common benchmark sets load unmodified.

use crate::error::{GridError, GridResult};
use crate::grid::{CHANNELS, IMPASSABLE};

/// Parsed `.map` body, before weight-layer application.
pub(crate) struct MapDescription {
    pub width:    u16,
    pub height:   u16,
    pub passable: Vec<bool>,
}

/// Parse a `.map` text body.
///
/// `@` and `T` mark obstacles; every other cell character is traversable.
pub(crate) fn parse_map(text: &str) -> GridResult<MapDescription> {
    let mut width:  Option<u16> = None;
    let mut height: Option<u16> = None;

    let mut lines = text.lines().map(str::trim_end);
    for line in lines.by_ref() {
        if let Some(v) = line.strip_prefix("height ") {
            height = Some(parse_dim(v, "height")?);
        } else if let Some(v) = line.strip_prefix("width ") {
            width = Some(parse_dim(v, "width")?);
        } else if line == "map" {
            break;
        }
        // Anything else (e.g. "type octile") is ignored.
    }

    let width = width.ok_or_else(|| GridError::MalformedMap("missing width".into()))?;
    let height = height.ok_or_else(|| GridError::MalformedMap("missing height".into()))?;
    if width == 0 || height == 0 {
        return Err(GridError::MalformedMap(format!(
            "dimensions must be nonzero (got {width}x{height})"
        )));
    }

    let mut passable = Vec::with_capacity(width as usize * height as usize);
    let mut rows = 0u16;
    for line in lines {
        if line.is_empty() && rows == height {
            break; // trailing blank lines are fine
        }
        if line.chars().count() != width as usize {
            return Err(GridError::MalformedMap(format!(
                "row {rows} has {} cells, expected {width}",
                line.chars().count()
            )));
        }
        for c in line.chars() {
            passable.push(!matches!(c, '@' | 'T'));
        }
        rows += 1;
        if rows > height {
            return Err(GridError::MalformedMap(format!(
                "more than {height} map rows"
            )));
        }
    }
    if rows != height {
        return Err(GridError::MalformedMap(format!(
            "expected {height} map rows, found {rows}"
        )));
    }

    Ok(MapDescription { width, height, passable })
}

/// Parse a `.weights` text body against the map it annotates.
///
/// Header: `height`, `width`, and `channels` (which must be [`CHANNELS`]).
/// Body: one `x y w0 w1 w2 w3` row per traversable cell; rows for cells the
/// map marks as obstacles are skipped; negative weights mean impassable.
/// Cells without a row keep all channels impassable.
pub(crate) fn parse_weights(
    text:     &str,
    width:    u16,
    height:   u16,
    passable: &[bool],
) -> GridResult<Vec<f32>> {
    let mut channels: Option<usize> = None;

    let mut lines = text.lines().map(str::trim_end);
    for line in lines.by_ref() {
        if let Some(v) = line.strip_prefix("height ") {
            if parse_dim(v, "height")? != height {
                return Err(GridError::MalformedWeights(format!(
                    "height {v} disagrees with map height {height}"
                )));
            }
        } else if let Some(v) = line.strip_prefix("width ") {
            if parse_dim(v, "width")? != width {
                return Err(GridError::MalformedWeights(format!(
                    "width {v} disagrees with map width {width}"
                )));
            }
        } else if let Some(v) = line.strip_prefix("channels ") {
            let n: usize = v
                .trim()
                .parse()
                .map_err(|_| GridError::MalformedWeights(format!("bad channel count {v:?}")))?;
            if n != CHANNELS {
                return Err(GridError::MalformedWeights(format!(
                    "{n} channels unsupported (expected {CHANNELS})"
                )));
            }
            channels = Some(n);
            break;
        }
    }
    if channels.is_none() {
        return Err(GridError::MalformedWeights("missing channels header".into()));
    }

    let size = width as usize * height as usize;
    let mut weights = vec![IMPASSABLE; size * CHANNELS];

    for line in lines {
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let x: i64 = next_field(&mut fields, line)?;
        let y: i64 = next_field(&mut fields, line)?;
        if x < 0 || x >= width as i64 || y < 0 || y >= height as i64 {
            return Err(GridError::MalformedWeights(format!(
                "cell ({x}, {y}) out of bounds"
            )));
        }
        let v = y as usize * width as usize + x as usize;
        if !passable[v] {
            continue; // weight rows for obstacle cells carry no information
        }
        for ch in 0..CHANNELS {
            let w: f32 = next_field(&mut fields, line)?;
            if w >= 0.0 {
                weights[v * CHANNELS + ch] = w;
            }
        }
    }

    Ok(weights)
}

fn parse_dim(value: &str, what: &str) -> GridResult<u16> {
    value
        .trim()
        .parse()
        .map_err(|_| GridError::MalformedMap(format!("bad {what} value {value:?}")))
}

fn next_field<T: std::str::FromStr>(
    fields: &mut std::str::SplitWhitespace<'_>,
    line:   &str,
) -> GridResult<T> {
    fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| GridError::MalformedWeights(format!("bad weight row {line:?}")))
}
