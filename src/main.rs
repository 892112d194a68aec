//! `lensview` command line: place or drag a lens over an image and export
//! the magnified view, or browse a hierarchy snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use thiserror::Error;

use lensview::export::{self, ExportError, ExportFormat};
use lensview::hierarchy::{render_rows, HierarchyData, HierarchyError, HierarchyTree};
use lensview::{AppConfig, ConfigError, IconProvider, LensComponent, LogLevel};
use lensview_core::{DragMode, LensError, Modifiers};

const ROW_HEIGHT: u32 = 16;
const ROW_INDENT: u32 = 12;

#[derive(Parser)]
#[command(name = "lensview")]
#[command(version, about = "Magnifying lens for microscopy images", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG still applies
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place the lens and export the zoomed view
    Zoom {
        /// Source image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Lens left edge, in image pixels
        #[arg(long, default_value_t = 0)]
        x: u32,

        /// Lens top edge, in image pixels
        #[arg(long, default_value_t = 0)]
        y: u32,

        /// Lens width on screen
        #[arg(long)]
        width: Option<i32>,

        /// Lens height on screen
        #[arg(long)]
        height: Option<i32>,

        /// Lens magnification
        #[arg(long, value_name = "FLOAT")]
        zoom: Option<f32>,

        /// Magnification of the image in the viewer
        #[arg(long, value_name = "FLOAT")]
        image_zoom: Option<f32>,

        /// Output file for the zoomed view
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        /// Output format (jpeg, png, tiff, bmp); defaults to the extension
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,

        /// Also render the zoom window
        #[arg(long, value_name = "FILE")]
        preview: Option<PathBuf>,

        /// Also render the viewer with the lens overlay
        #[arg(long, value_name = "FILE")]
        overlay: Option<PathBuf>,
    },

    /// Replay a pointer drag on the lens, then export the zoomed view
    Drag {
        /// Source image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Press position on screen
        #[arg(long, value_name = "X,Y", value_parser = parse_point)]
        from: (i32, i32),

        /// Release position on screen
        #[arg(long, value_name = "X,Y", value_parser = parse_point)]
        to: (i32, i32),

        /// Hold shift: keep the lens square while resizing
        #[arg(long)]
        shift: bool,

        /// Number of intermediate pointer events
        #[arg(long, default_value_t = 1)]
        steps: u32,

        /// Lens magnification
        #[arg(long, value_name = "FLOAT")]
        zoom: Option<f32>,

        /// Output file for the zoomed view
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Print a hierarchy snapshot as browser rows
    Tree {
        /// Hierarchy JSON file
        #[arg(value_name = "FILE")]
        hierarchy: PathBuf,

        /// Expand every container
        #[arg(long)]
        expand_all: bool,

        /// Render the row icons to an image
        #[arg(long, value_name = "PNG")]
        render: Option<PathBuf>,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Lens(#[from] LensError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error("Failed to read {path:?}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("{0}")]
    Usage(String),
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::from_name(s).ok_or_else(|| format!("unknown log level: {}", s))
}

fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("point must be in format x,y, got: {}", s))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("Invalid x coordinate: {}", x))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("Invalid y coordinate: {}", y))?;
    Ok((x, y))
}

fn main() {
    let cli = Cli::parse();

    // The logger is not up yet, so config problems are reported after init.
    let config = load_config(cli.config.as_deref());
    let level = cli.log_level.unwrap_or_else(|| {
        config
            .as_ref()
            .map(|c| c.preferences.log_level)
            .unwrap_or_default()
    });
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();

    let result = config.map_err(CliError::from).and_then(|config| {
        log::debug!("Using log level {}", level.name());
        run(cli.command, &config)
    });

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::load_from_default_path().unwrap_or_default()),
    }
}

fn run(command: Commands, config: &AppConfig) -> Result<(), CliError> {
    match command {
        Commands::Zoom {
            image,
            x,
            y,
            width,
            height,
            zoom,
            image_zoom,
            out,
            format,
            preview,
            overlay,
        } => {
            let mut settings = config.lens.clone();
            if let Some(width) = width {
                settings.width = width;
            }
            if let Some(height) = height {
                settings.height = height;
            }
            if let Some(zoom) = zoom {
                settings.zoom_factor = zoom;
            }
            if let Some(image_zoom) = image_zoom {
                settings.image_zoom_factor = image_zoom;
            }

            let source = open_image(&image)?;
            let mut lens = LensComponent::new(&settings)?;
            lens.set_image(Some(source.clone()));
            lens.set_visible(true);
            lens.set_lens_location(x, y)?;
            println!("{}", lens.status_text());

            let (path, format) = output_target(&out, format.as_deref(), config)?;
            lens.save_as(&path, format)?;
            println!("Saved zoomed view to {}", path.display());

            if let Some(preview_path) = preview {
                let rendered = lens.preview().render().ok_or(ExportError::NothingToExport)?;
                let (path, format) = output_target(&preview_path, None, config)?;
                export::save_image(&rendered, &path, format)?;
                println!("Saved preview to {}", path.display());
            }

            if let Some(overlay_path) = overlay {
                let mut canvas = render_view(&source, lens.image_zoom_factor());
                lens.overlay().paint(&mut canvas);
                let (path, format) = output_target(&overlay_path, None, config)?;
                export::save_image(&canvas, &path, format)?;
                println!("Saved overlay to {}", path.display());
            }
            Ok(())
        }

        Commands::Drag {
            image,
            from,
            to,
            shift,
            steps,
            zoom,
            out,
        } => {
            let mut settings = config.lens.clone();
            if let Some(zoom) = zoom {
                settings.zoom_factor = zoom;
            }

            let mut lens = LensComponent::new(&settings)?;
            lens.set_image(Some(open_image(&image)?));
            lens.set_visible(true);

            let modifiers = if shift {
                Modifiers::shift()
            } else {
                Modifiers::default()
            };
            let mode = lens.mouse_pressed(from.0, from.1, modifiers);
            if mode == DragMode::Idle {
                return Err(CliError::Usage(format!(
                    "({}, {}) is not on the lens at {:?}",
                    from.0,
                    from.1,
                    lens.lens_bounds()
                )));
            }
            log::debug!("Drag started in {:?} mode", mode);

            let steps = steps.max(1);
            let mut accepted = 0;
            for i in 1..=steps {
                let px = interpolate(from.0, to.0, i, steps);
                let py = interpolate(from.1, to.1, i, steps);
                if lens.mouse_dragged(px, py, modifiers) {
                    accepted += 1;
                }
            }
            lens.mouse_released(to.0, to.1);
            log::info!("{} of {} drag events accepted", accepted, steps);
            println!("{}", lens.status_text());

            let (path, format) = output_target(&out, None, config)?;
            lens.save_as(&path, format)?;
            println!("Saved zoomed view to {}", path.display());
            Ok(())
        }

        Commands::Tree {
            hierarchy,
            expand_all,
            render,
        } => {
            let data = HierarchyData::load(&hierarchy)?;
            let mut tree = HierarchyTree::from_data(&data)?;
            if expand_all {
                tree.expand_all();
            }

            for row in tree.visible_rows() {
                let marker = match (row.has_children, row.expanded) {
                    (false, _) => ' ',
                    (true, true) => '-',
                    (true, false) => '+',
                };
                println!(
                    "{}{} {}: {} [{}]",
                    "  ".repeat(row.depth),
                    marker,
                    row.key.kind.name(),
                    row.name,
                    row.key.id
                );
            }

            if let Some(render_path) = render {
                let mut icons = IconProvider::default();
                let strip = render_rows(&tree, &mut icons, ROW_HEIGHT, ROW_INDENT)
                    .ok_or(ExportError::NothingToExport)?;
                export::save_image(&strip, &render_path, ExportFormat::Png)?;
                println!("Saved row icons to {}", render_path.display());
            }
            Ok(())
        }
    }
}

/// Point `step` of `steps` on the way from `from` to `to`.
fn interpolate(from: i32, to: i32, step: u32, steps: u32) -> i32 {
    let offset = (to as i64 - from as i64) * step as i64 / steps as i64;
    (from as i64 + offset) as i32
}

fn open_image(path: &Path) -> Result<Arc<RgbaImage>, CliError> {
    let image = image::open(path).map_err(|source| CliError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {:?} ({}x{})", path, image.width(), image.height());
    Ok(Arc::new(image.to_rgba8()))
}

/// Pick the output path and format from an explicit format name, the path's
/// extension, or the configured default, in that order. Relative paths are
/// placed in the configured export folder.
fn output_target(
    path: &Path,
    format: Option<&str>,
    config: &AppConfig,
) -> Result<(PathBuf, ExportFormat), CliError> {
    let path = config.preferences.export_path(path);
    match format {
        Some(name) => {
            let format = ExportFormat::from_extension(name)
                .ok_or_else(|| CliError::Usage(format!("unknown format: {}", name)))?;
            Ok((path, format))
        }
        None => Ok(export::resolve_target(
            &path,
            config.preferences.export_format,
        )?),
    }
}

/// The source as the viewer shows it at the given magnification.
fn render_view(source: &RgbaImage, image_zoom: f32) -> RgbaImage {
    let width = ((source.width() as f32 * image_zoom) as u32).max(1);
    let height = ((source.height() as f32 * image_zoom) as u32).max(1);
    if (width, height) == source.dimensions() {
        return source.clone();
    }
    imageops::resize(source, width, height, FilterType::Nearest)
}
