use std::path::{Path, PathBuf};

use crate::error::IoError;

/// Sidecar extensions probed next to a raster, in order.
const SIDECAR_EXTENSIONS: [&str; 4] = ["tfw", "tifw", "TFW", "wld"];

/// Look for a world file next to the given raster path.
///
/// # Returns
///
/// The first existing sidecar, if any.
pub fn find_sidecar(raster_path: &Path) -> Option<PathBuf> {
    SIDECAR_EXTENSIONS
        .iter()
        .map(|ext| raster_path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

/// Read a world file and return GDAL ordered coefficients.
///
/// # Arguments
///
/// * `file_path` - The path to the world file.
pub fn read_world_file(file_path: impl AsRef<Path>) -> Result<[f64; 6], IoError> {
    let file_path = file_path.as_ref();
    let text = std::fs::read_to_string(file_path)?;
    parse_world_file(&text)
        .map_err(|reason| IoError::InvalidWorldFile(file_path.to_path_buf(), reason))
}

/// Parse the six lines of a world file.
///
/// The lines hold `A, D, B, E, C, F` where `C` and `F` locate the centre of
/// the upper-left pixel. GDAL coefficients refer to the pixel corner, so the
/// origin is moved back by half a pixel.
pub fn parse_world_file(text: &str) -> Result<[f64; 6], String> {
    let values = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(6)
        .map(|line| {
            line.parse::<f64>()
                .map_err(|e| format!("cannot parse '{line}': {e}"))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    let [a, d, b, e, c, f] = values[..] else {
        return Err(format!("expected 6 values, found {}", values.len()));
    };

    Ok([c - 0.5 * a - 0.5 * b, a, b, f - 0.5 * d - 0.5 * e, d, e])
}

#[cfg(test)]
mod tests {
    use super::{find_sidecar, parse_world_file, read_world_file};
    use crate::error::IoError;

    #[test]
    fn parse_north_up() -> Result<(), String> {
        let gt = parse_world_file("10.0\n0.0\n0.0\n-10.0\n505.0\n995.0\n")?;
        assert_eq!(gt, [500.0, 10.0, 0.0, 1000.0, 0.0, -10.0]);
        Ok(())
    }

    #[test]
    fn parse_tolerates_blank_lines_and_whitespace() -> Result<(), String> {
        let gt = parse_world_file("  1.0\r\n\r\n0.5\n0.25\n -1.0 \n0.0\n0.0\n")?;
        assert_eq!(gt, [-0.625, 1.0, 0.25, 0.25, 0.5, -1.0]);
        Ok(())
    }

    #[test]
    fn parse_short_file() {
        let err = parse_world_file("1.0\n0.0\n").unwrap_err();
        assert!(err.contains("expected 6 values"));
    }

    #[test]
    fn parse_garbage() {
        assert!(parse_world_file("1\n0\n0\n-1\nabc\n0\n").is_err());
    }

    #[test]
    fn sidecar_lookup() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let raster = tmp_dir.path().join("scene.tif");
        assert_eq!(find_sidecar(&raster), None);

        let sidecar = tmp_dir.path().join("scene.wld");
        std::fs::write(&sidecar, "2\n0\n0\n-2\n1\n-1\n")?;
        assert_eq!(find_sidecar(&raster), Some(sidecar.clone()));

        let gt = read_world_file(&sidecar)?;
        assert_eq!(gt, [0.0, 2.0, 0.0, 0.0, 0.0, -2.0]);

        Ok(())
    }

    #[test]
    fn invalid_world_file_names_path() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let sidecar = tmp_dir.path().join("bad.tfw");
        std::fs::write(&sidecar, "1\n2\n")?;
        match read_world_file(&sidecar) {
            Err(IoError::InvalidWorldFile(path, _)) => assert_eq!(path, sidecar),
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }
}
