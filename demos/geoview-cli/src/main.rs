use argh::FromArgs;
use std::path::PathBuf;

use geoview::{
    CanvasPoint, CanvasSize, GeoPoint, RasterSession, ViewerConfig, ViewerError, ViewerEvent,
    ViewerResponse, ZoomDirection,
};
use geoview_io::png::write_frame_png;
use geoview_paint::paint_frame;

#[derive(FromArgs)]
/// Load a GeoTIFF, apply zoom and pan, place marks and paint the view.
struct Args {
    /// path to a JSON viewer configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// path to the GeoTIFF to view
    #[argh(option, short = 'i')]
    image: PathBuf,

    /// canvas size as WIDTHxHEIGHT
    #[argh(option, from_str_fn(parse_canvas))]
    canvas: Option<CanvasSize>,

    /// zoom steps, positive to zoom in and negative to zoom out
    #[argh(option, short = 'z', default = "0")]
    zoom: i32,

    /// pan offset in canvas pixels as DX,DY
    #[argh(option, from_str_fn(parse_pair))]
    pan: Option<(f64, f64)>,

    /// canvas position X,Y to read pixel and geographic coordinates at
    #[argh(option, from_str_fn(parse_pair))]
    probe: Vec<(f64, f64)>,

    /// geographic location X,Y to mark
    #[argh(option, short = 'm', from_str_fn(parse_pair))]
    mark: Vec<(f64, f64)>,

    /// path of the painted PNG
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

fn parse_pair(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {value}"))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn parse_canvas(value: &str) -> Result<CanvasSize, String> {
    let (w, h) = value
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value}"))?;
    let w = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
    Ok(CanvasSize::new(w as f64, h as f64))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(canvas) = args.canvas {
        config.canvas = canvas;
    }

    let mut session = RasterSession::new(config)?;

    // build the event script from the arguments
    let mut events = vec![ViewerEvent::Load(args.image.into())];

    let direction = if args.zoom >= 0 {
        ZoomDirection::In
    } else {
        ZoomDirection::Out
    };
    for _ in 0..args.zoom.unsigned_abs() {
        events.push(ViewerEvent::Zoom(direction));
    }

    if let Some((dx, dy)) = args.pan {
        events.push(ViewerEvent::PanStart(CanvasPoint::new(0.0, 0.0)));
        events.push(ViewerEvent::PanDrag(CanvasPoint::new(dx, dy)));
        events.push(ViewerEvent::PanEnd);
    }
    for (x, y) in args.mark {
        events.push(ViewerEvent::Mark(GeoPoint::new(x, y)));
    }
    for (x, y) in args.probe {
        events.push(ViewerEvent::PointerMoved(CanvasPoint::new(x, y)));
    }
    events.push(ViewerEvent::Render);

    let mut frame = None;
    for event in events {
        match session.dispatch(event) {
            Ok(ViewerResponse::Loaded(info)) => {
                println!(
                    "Loaded {} ({}x{}), epsg: {:?}",
                    info.source, info.width, info.height, info.epsg
                );
                let (min, max) = info.geo_transform.bounds(info.size());
                println!(
                    "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                    min.x, min.y, max.x, max.y
                );
            }
            Ok(ViewerResponse::Readout(Some(readout))) => println!("Probe: {readout}"),
            Ok(ViewerResponse::Readout(None)) => println!("Probe: off the image"),
            Ok(ViewerResponse::Marked(canvas)) => {
                println!("Marked at canvas ({:.1}, {:.1})", canvas.x, canvas.y)
            }
            Ok(ViewerResponse::Frame(rendered)) => frame = Some(rendered),
            Ok(ViewerResponse::Viewport(_)) => {}
            // rejected marks do not stop the script
            Err(err) if err.is_rejected_mark() => println!("Mark rejected: {err}"),
            Err(err) => return Err(err.into()),
        }
    }

    let (Some(frame), Some(output)) = (frame, args.output) else {
        return Ok(());
    };
    let buffer = session
        .display_buffer()
        .ok_or(ViewerError::NoRasterLoaded)?;
    let painted = paint_frame(buffer, &frame, session.canvas())?;
    write_frame_png(&output, &painted)?;
    log::info!("wrote {}", output.display());

    Ok(())
}
