use async_trait::async_trait;
use base64::{prelude::BASE64_STANDARD, Engine};
use image::{codecs::jpeg::JpegEncoder, Rgb, RgbImage};

use crate::application::ports::RendererPort;
use crate::domain::{
    detection::Detection,
    errors::{DomainError, DomainResult},
};

const PALETTE: [[u8; 3]; 6] = [
    [230, 25, 75],
    [60, 180, 75],
    [255, 225, 25],
    [0, 130, 200],
    [245, 130, 48],
    [145, 30, 180],
];

/// Dibuja el contorno de cada caja (color estable por etiqueta) y devuelve un JPEG en base64.
#[derive(Debug, Clone, Copy)]
pub struct BoxAnnotator {
    thickness: u32,
    quality: u8,
}

impl BoxAnnotator {
    pub fn new(thickness: u32, quality: u8) -> Self {
        Self {
            thickness: thickness.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    pub fn annotate(&self, image: &[u8], detections: &[Detection]) -> DomainResult<Vec<u8>> {
        let mut img = image::load_from_memory(image)
            .map_err(|e| DomainError::InvalidInput(format!("no se pudo decodificar la imagen: {}", e)))?
            .to_rgb8();

        for det in detections {
            draw_outline(&mut img, det, color_for(&det.label), self.thickness);
        }

        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, self.quality)
            .encode_image(&img)
            .map_err(|e| DomainError::OperationFailed(format!("fallo al codificar JPEG: {}", e)))?;
        Ok(buf)
    }
}

impl Default for BoxAnnotator {
    fn default() -> Self {
        Self::new(2, 85)
    }
}

fn color_for(label: &str) -> Rgb<u8> {
    let hash = label
        .to_lowercase()
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    Rgb(PALETTE[hash % PALETTE.len()])
}

fn draw_outline(img: &mut RgbImage, det: &Detection, color: Rgb<u8>, thickness: u32) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    // Coordenadas recortadas al lienzo; cajas totalmente fuera no se dibujan.
    let clamp_x = |v: f64| (v.max(0.0) as u32).min(w - 1);
    let clamp_y = |v: f64| (v.max(0.0) as u32).min(h - 1);
    let b = det.bbox;
    if b.x1() >= w as f64 || b.y1() >= h as f64 || b.x2() < 0.0 || b.y2() < 0.0 {
        return;
    }
    let (x1, y1, x2, y2) = (clamp_x(b.x1()), clamp_y(b.y1()), clamp_x(b.x2()), clamp_y(b.y2()));

    for t in 0..thickness {
        let top = (y1 + t).min(y2);
        let bottom = y2.saturating_sub(t).max(y1);
        let left = (x1 + t).min(x2);
        let right = x2.saturating_sub(t).max(x1);
        for x in x1..=x2 {
            img.put_pixel(x, top, color);
            img.put_pixel(x, bottom, color);
        }
        for y in y1..=y2 {
            img.put_pixel(left, y, color);
            img.put_pixel(right, y, color);
        }
    }
}

#[async_trait]
impl RendererPort for BoxAnnotator {
    async fn render(&self, image: &[u8], detections: &[Detection]) -> DomainResult<String> {
        let annotator = *self;
        let image = image.to_vec();
        let detections = detections.to_vec();

        let jpeg = tokio::task::spawn_blocking(move || annotator.annotate(&image, &detections))
            .await
            .map_err(|e| DomainError::OperationFailed(format!("fallo en la tarea de anotado: {}", e)))??;
        Ok(BASE64_STANDARD.encode(jpeg))
    }
}
