//! Decoding, pixel extraction and re-encoding. `image` handles decoding and
//! most encoders; `webp` and `imagequant` cover the lossy WebP and PNG paths.

use std::io::Cursor;

use image::{DynamicImage, RgbaImage};
use image::codecs::jpeg::JpegEncoder;
use log::debug;

use crate::error::{Error, Result};
use crate::model::{CropRequest, Rectangle, TargetFormat};

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Integer pixel region `(x, y, width, height)` for a selection.
///
/// Each component is rounded to the nearest pixel; the size is then cut back
/// to the image edge. Regions that start outside the image or end up empty
/// are rejected.
pub fn pixel_region(r: &Rectangle, image_w: u32, image_h: u32) -> Result<(u32, u32, u32, u32)> {
    let round = |v: f32| v.round().max(0.0) as u32;
    let (x, y) = (round(r.x), round(r.y));
    let (w, h) = (round(r.width), round(r.height));
    let invalid = Error::InvalidRegion {
        x,
        y,
        width: w,
        height: h,
        image_width: image_w,
        image_height: image_h,
    };
    if r.x.round() < 0.0 || r.y.round() < 0.0 || x >= image_w || y >= image_h {
        return Err(invalid);
    }
    let w = w.min(image_w - x);
    let h = h.min(image_h - y);
    if w == 0 || h == 0 {
        return Err(invalid);
    }
    Ok((x, y, w, h))
}

pub fn crop(source: &DynamicImage, r: &Rectangle) -> Result<DynamicImage> {
    let (x, y, w, h) = pixel_region(r, source.width(), source.height())?;
    Ok(source.crop_imm(x, y, w, h))
}

/// Crops `source` to the request's rectangle and encodes it in the requested
/// format. JPEG and WebP are lossy at the request's quality; PNG below 100 is
/// palette-quantised. GIF and BMP ignore quality.
pub fn crop_and_encode(source: &DynamicImage, request: &CropRequest) -> Result<Vec<u8>> {
    let cropped = crop(source, &request.rectangle)?;
    let mut buf = Vec::new();
    match request.format {
        TargetFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, request.quality);
            DynamicImage::ImageRgb8(cropped.to_rgb8()).write_with_encoder(encoder)?;
        }
        TargetFormat::WebP => {
            let rgba = cropped.to_rgba8();
            let encoded = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                .encode(f32::from(request.quality));
            buf.extend_from_slice(&encoded);
        }
        TargetFormat::Png if request.quality < 100 => {
            encode_quantised_png(&cropped.to_rgba8(), request.quality, &mut buf)?;
        }
        TargetFormat::Png => {
            cropped.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        }
        TargetFormat::Gif | TargetFormat::Bmp => {
            DynamicImage::ImageRgba8(cropped.to_rgba8())
                .write_to(&mut Cursor::new(&mut buf), request.format.image_format())?;
        }
    }
    debug!(
        "Encoded {}x{} crop as {:?} ({} bytes)",
        cropped.width(),
        cropped.height(),
        request.format,
        buf.len()
    );
    Ok(buf)
}

/// Reduces `rgba` to a palette no worse than `quality` allows and writes it as
/// an indexed PNG.
fn encode_quantised_png(rgba: &RgbaImage, quality: u8, buf: &mut Vec<u8>) -> Result<()> {
    let (width, height) = rgba.dimensions();
    let pixels: Vec<imagequant::RGBA> = rgba
        .pixels()
        .map(|p| imagequant::RGBA::new(p[0], p[1], p[2], p[3]))
        .collect();

    let mut liq = imagequant::new();
    liq.set_speed(4)?;
    liq.set_quality(0, quality)?;
    let mut img = liq.new_image(&pixels[..], width as usize, height as usize, 0.0)?;
    let mut quantised = liq.quantize(&mut img)?;
    quantised.set_dithering_level(1.0)?;
    let (palette, indexes) = quantised.remapped(&mut img)?;

    let rgb: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    let alpha: Vec<u8> = palette.iter().map(|c| c.a).collect();
    let mut encoder = png::Encoder::new(buf, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(rgb);
    if alpha.iter().any(|&a| a < 255) {
        encoder.set_trns(alpha);
    }
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&indexes)?;
    writer.finish()?;
    debug!("Quantised {width}x{height} PNG to {} colours", palette.len());
    Ok(())
}

/// Rough output size: three bytes per pixel scaled by quality.
pub fn estimated_bytes(r: &Rectangle, quality: u8) -> f64 {
    f64::from(r.area()) * 3.0 * (f64::from(quality) / 100.0)
}

pub fn format_kb(bytes: f64) -> String {
    format!("{:.2} KB", bytes / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, 128, 255])
        }))
    }

    #[test]
    fn estimate_scales_with_quality() {
        let r = Rectangle::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(estimated_bytes(&r, 50), 7500.0);
        assert_eq!(estimated_bytes(&r, 100), 15000.0);
        assert_eq!(format_kb(7500.0), "7.32 KB");
    }

    #[test]
    fn region_rounds_to_nearest_pixel() {
        let r = Rectangle::new(1.4, 2.6, 10.5, 3.2);
        assert_eq!(pixel_region(&r, 100, 100).unwrap(), (1, 3, 11, 3));
    }

    #[test]
    fn region_is_cut_back_to_image_edge() {
        let r = Rectangle::new(10.5, 0.0, 89.6, 20.0);
        assert_eq!(pixel_region(&r, 100, 50).unwrap(), (11, 0, 89, 20));
    }

    #[test]
    fn empty_or_outside_regions_are_rejected() {
        assert!(matches!(
            pixel_region(&Rectangle::new(0.0, 0.0, 0.2, 10.0), 100, 100),
            Err(Error::InvalidRegion { .. })
        ));
        assert!(pixel_region(&Rectangle::new(100.0, 0.0, 5.0, 5.0), 100, 100).is_err());
        assert!(pixel_region(&Rectangle::new(-3.0, 0.0, 5.0, 5.0), 100, 100).is_err());
    }

    #[test]
    fn png_crop_extracts_exact_pixels() {
        let source = gradient(20, 10);
        let request = CropRequest::new(Rectangle::new(2.0, 3.0, 5.0, 4.0), 100, TargetFormat::Png);
        let bytes = crop_and_encode(&source, &request).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (5, 4));
        assert_eq!(decoded.get_pixel(0, 0), Rgba([20, 30, 128, 255]));
        assert_eq!(decoded.get_pixel(4, 3), Rgba([60, 60, 128, 255]));
    }

    #[test]
    fn jpeg_quality_changes_output_size() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_fn(64, 64, |x, y| {
            Rgba([(x * 37 % 251) as u8, (y * 53 % 241) as u8, ((x ^ y) * 7) as u8, 255])
        }));
        let rect = Rectangle::new(0.0, 0.0, 64.0, 64.0);
        let low = crop_and_encode(&source, &CropRequest::new(rect, 10, TargetFormat::Jpeg)).unwrap();
        let high =
            crop_and_encode(&source, &CropRequest::new(rect, 100, TargetFormat::Jpeg)).unwrap();
        assert!(low.len() < high.len());
        assert_eq!(decode(&low).unwrap().dimensions(), (64, 64));
    }

    fn noise(w: u32, h: u32) -> DynamicImage {
        let mut state = 0x2545_f491_u32;
        DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |_, _| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            Rgba([r, g, b, 255])
        }))
    }

    fn encode_whole(source: &DynamicImage, quality: u8, format: TargetFormat) -> Vec<u8> {
        let rect = Rectangle::new(0.0, 0.0, source.width() as f32, source.height() as f32);
        crop_and_encode(source, &CropRequest::new(rect, quality, format)).unwrap()
    }

    #[test]
    fn webp_quality_changes_output_size() {
        let source = noise(64, 64);
        let low = encode_whole(&source, 10, TargetFormat::WebP);
        let high = encode_whole(&source, 100, TargetFormat::WebP);
        assert!(low.len() < high.len());
        assert_eq!(decode(&low).unwrap().dimensions(), (64, 64));
    }

    #[test]
    fn png_below_full_quality_is_quantised() {
        let source = noise(64, 64);
        let low = encode_whole(&source, 10, TargetFormat::Png);
        let high = encode_whole(&source, 100, TargetFormat::Png);
        assert!(low.len() < high.len());

        let decoded = decode(&low).unwrap();
        assert_eq!(decoded.dimensions(), (64, 64));
        let lossless = decode(&high).unwrap();
        assert_eq!(lossless.to_rgba8(), source.to_rgba8());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(decode(b"not an image"), Err(Error::Image(_))));
    }
}
