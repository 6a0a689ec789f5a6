use approx::assert_relative_eq;
use geoview::{
    CanvasPoint, GeoPoint, GeoTransform, PixelPoint, RasterSession, ViewerConfig, ViewerError,
};
use geoview_image::Image;
use geoview_io::{geotiff::write_geotiff_mono8, GeoReferencing, RasterSource};

fn write_test_raster(
    dir: &std::path::Path,
    name: &str,
    geo_transform: [f64; 6],
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let file_path = dir.join(name);
    let data = (0..64 * 32).map(|v| (v % 251) as u8).collect();
    let band = Image::<u8, 1>::new([64, 32].into(), data)?;
    write_geotiff_mono8(&file_path, &band, geo_transform)?;
    Ok(file_path)
}

#[test]
fn load_north_up_geotiff() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let gt = [12.0, 0.001, 0.0, 42.0, 0.0, -0.001];
    let file_path = write_test_raster(tmp_dir.path(), "north_up.tif", gt)?;

    let mut session = RasterSession::new(ViewerConfig::default())?;
    let info = session.load(file_path.clone())?;
    assert_eq!((info.width, info.height), (64, 32));
    assert_eq!(info.georeferencing, GeoReferencing::TiepointScale);
    assert_eq!(info.geo_transform, GeoTransform::from_gdal(gt));
    assert!(info.geo_transform.is_north_up());

    let canvas = session.mark_at(GeoPoint::new(12.0325, 41.9835))?;
    let snap = session.snapshot()?;
    let expected = snap.raster_pixel_to_canvas(PixelPoint::new(32.5, 16.5));
    assert_relative_eq!(canvas.x, expected.x, epsilon = 1e-6);
    assert_relative_eq!(canvas.y, expected.y, epsilon = 1e-6);

    let readout = session
        .pointer_moved(canvas)
        .ok_or("pointer should be on the image")?;
    assert_eq!((readout.pixel_x, readout.pixel_y), (32, 16));
    assert_relative_eq!(readout.geo.x, 12.0325, epsilon = 1e-9);
    Ok(())
}

#[test]
fn load_rotated_geotiff_from_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let gt = [100.0, 2.0, 0.5, 200.0, 0.25, -3.0];
    let file_path = write_test_raster(tmp_dir.path(), "rotated.tif", gt)?;
    let bytes = std::fs::read(&file_path)?;

    let mut session = RasterSession::default();
    let info = session.load(RasterSource::Bytes(bytes))?;
    assert_eq!(info.georeferencing, GeoReferencing::ModelTransformation);
    assert!(!info.geo_transform.is_north_up());

    let transform = GeoTransform::from_gdal(gt);
    let geo = transform.pixel_to_geo(PixelPoint::new(10.25, 20.75));
    let canvas = session.mark_at(geo)?;
    let readout = session
        .pointer_moved(canvas)
        .ok_or("pointer should be on the image")?;
    assert_eq!((readout.pixel_x, readout.pixel_y), (10, 20));
    assert_relative_eq!(readout.geo.x, geo.x, epsilon = 1e-6);
    assert_relative_eq!(readout.geo.y, geo.y, epsilon = 1e-6);
    Ok(())
}

#[test]
fn exported_display_band_loads_back() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let gt = [-3.7, 0.5, 0.0, 40.4, 0.0, -0.5];
    let file_path = write_test_raster(tmp_dir.path(), "source.tif", gt)?;

    let mut session = RasterSession::default();
    session.load(file_path)?;
    let buffer = session.display_buffer().ok_or("raster is loaded")?.clone();
    let transform = session.geo_transform().ok_or("raster is loaded")?;

    let export_path = tmp_dir.path().join("export.tif");
    write_geotiff_mono8(&export_path, &buffer, transform.to_gdal())?;

    let mut other = RasterSession::default();
    let info = other.load(export_path)?;
    assert_eq!(info.geo_transform, transform);
    assert_eq!(other.display_buffer(), Some(&buffer));
    Ok(())
}

#[test]
fn missing_file_keeps_previous_raster() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = write_test_raster(
        tmp_dir.path(),
        "kept.tif",
        [0.0, 1.0, 0.0, 32.0, 0.0, -1.0],
    )?;

    let mut session = RasterSession::default();
    session.load(file_path)?;
    session.mark_at(GeoPoint::new(3.5, 30.5))?;

    let res = session.load(tmp_dir.path().join("nope.tif"));
    assert!(matches!(res, Err(ViewerError::LoadFailed(_))));
    let res = session.load(tmp_dir.path().join("kept.png"));
    assert!(matches!(res, Err(ViewerError::LoadFailed(_))));

    assert_eq!(session.raster_info().map(|info| info.width), Some(64));
    assert_eq!(session.markers().len(), 1);
    assert!(session.pointer_moved(CanvasPoint::new(400.0, 300.0)).is_some());
    Ok(())
}
