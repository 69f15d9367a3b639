//! QR image rendering in PNG, JPEG, and SVG.
//!
//! The matrix comes from the `qrcode` crate; pixels are laid out by hand so
//! module scale, quiet zone width, and RGBA colors (including a transparent
//! background) are all honored uniformly across formats.

use std::io::Cursor;

use image::{DynamicImage, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode as QrMatrix};
use serde_json::json;

use crate::domain::entities::{ErrorCorrection, QrImageFormat};
use crate::error::AppError;
use crate::utils::color;

/// Rendering parameters, already parsed and validated.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: QrImageFormat,
    /// Pixels per module.
    pub scale: u32,
    pub error_correction: ErrorCorrection,
    /// Quiet zone width, in modules.
    pub border: u32,
    pub background: color::Rgba,
    pub foreground: color::Rgba,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: QrImageFormat::Png,
            scale: 10,
            error_correction: ErrorCorrection::M,
            border: 4,
            background: [255, 255, 255, 255],
            foreground: [0, 0, 0, 255],
        }
    }
}

/// Upper bound on raster output side length, in pixels. The matrix width
/// depends on the content, so scale and border alone cannot bound the
/// allocation; a dense matrix at maximum scale would otherwise produce a
/// buffer of hundreds of megabytes.
const MAX_RASTER_SIDE: u32 = 4096;

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::L => EcLevel::L,
        ErrorCorrection::M => EcLevel::M,
        ErrorCorrection::Q => EcLevel::Q,
        ErrorCorrection::H => EcLevel::H,
    }
}

/// Renders `content` as a QR image in the requested format.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when the content is too long to encode
/// or the raster output would exceed [`MAX_RASTER_SIDE`], and
/// [`AppError::Internal`] on encoding failures.
pub fn render(content: &str, options: &RenderOptions) -> Result<Vec<u8>, AppError> {
    let matrix = QrMatrix::with_error_correction_level(
        content.as_bytes(),
        ec_level(options.error_correction),
    )
    .map_err(|e| {
        AppError::bad_request(
            "Content cannot be encoded as a QR code",
            json!({ "reason": e.to_string() }),
        )
    })?;

    let scale = options.scale.max(1);

    match options.format {
        QrImageFormat::Png => render_raster(&matrix, options, scale, image::ImageFormat::Png),
        QrImageFormat::Jpeg => render_raster(&matrix, options, scale, image::ImageFormat::Jpeg),
        QrImageFormat::Svg => Ok(render_svg(&matrix, options, scale).into_bytes()),
    }
}

fn render_raster(
    matrix: &QrMatrix,
    options: &RenderOptions,
    scale: u32,
    format: image::ImageFormat,
) -> Result<Vec<u8>, AppError> {
    let width = matrix.width() as u32;
    let side = (width + 2 * options.border) * scale;
    if side > MAX_RASTER_SIDE {
        return Err(AppError::bad_request(
            "Requested image is too large; reduce size or border",
            json!({ "side": side, "max_side": MAX_RASTER_SIDE }),
        ));
    }
    let modules = matrix.to_colors();

    let background = Rgba(options.background);
    let foreground = Rgba(options.foreground);

    let image = RgbaImage::from_fn(side, side, |x, y| {
        let module_x = (x / scale) as i64 - options.border as i64;
        let module_y = (y / scale) as i64 - options.border as i64;

        let in_matrix = (0..width as i64).contains(&module_x)
            && (0..width as i64).contains(&module_y);

        if in_matrix
            && modules[(module_y * width as i64 + module_x) as usize] == qrcode::Color::Dark
        {
            foreground
        } else {
            background
        }
    });

    let mut buffer = Cursor::new(Vec::new());

    // JPEG has no alpha channel; transparent backgrounds flatten to their
    // RGB components.
    let result = match format {
        image::ImageFormat::Jpeg => {
            DynamicImage::ImageRgba8(image).to_rgb8().write_to(&mut buffer, format)
        }
        _ => image.write_to(&mut buffer, format),
    };

    result.map_err(|e| {
        AppError::internal(
            "Failed to encode QR image",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(buffer.into_inner())
}

fn render_svg(matrix: &QrMatrix, options: &RenderOptions, scale: u32) -> String {
    let width = matrix.width() as u32;
    let side = (width + 2 * options.border) * scale;
    let modules = matrix.to_colors();

    let mut svg = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{side}\" height=\"{side}\" \
         viewBox=\"0 0 {side} {side}\" shape-rendering=\"crispEdges\">"
    );

    if options.background[3] > 0 {
        svg.push_str(&format!(
            "<rect width=\"{side}\" height=\"{side}\" fill=\"{}\"/>",
            svg_color(options.background)
        ));
    }

    let fill = svg_color(options.foreground);
    for y in 0..width {
        for x in 0..width {
            if modules[(y * width + x) as usize] == qrcode::Color::Dark {
                let px = (x + options.border) * scale;
                let py = (y + options.border) * scale;
                svg.push_str(&format!(
                    "<rect x=\"{px}\" y=\"{py}\" width=\"{scale}\" height=\"{scale}\" fill=\"{fill}\"/>"
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

fn svg_color(rgba: color::Rgba) -> String {
    if rgba[3] == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba[0], rgba[1], rgba[2])
    } else {
        format!(
            "rgba({},{},{},{:.3})",
            rgba[0],
            rgba[1],
            rgba[2],
            rgba[3] as f32 / 255.0
        )
    }
}
