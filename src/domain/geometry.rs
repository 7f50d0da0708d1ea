use super::detection::BoundingBox;

pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.1;

/// Intersección de dos cajas; `None` si no tiene área positiva.
pub fn intersection(a: &BoundingBox, b: &BoundingBox) -> Option<(f64, f64, f64, f64)> {
    let x1 = a.x1().max(b.x1());
    let y1 = a.y1().max(b.y1());
    let x2 = a.x2().min(b.x2());
    let y2 = a.y2().min(b.y2());

    if x2 - x1 <= 0.0 || y2 - y1 <= 0.0 {
        return None;
    }
    Some((x1, y1, x2, y2))
}

/// Fracción del área de `dependent` cubierta por `reference`. No es simétrica.
pub fn overlap_ratio(dependent: &BoundingBox, reference: &BoundingBox) -> f64 {
    let area = dependent.area();
    if area <= 0.0 {
        return 0.0;
    }
    match intersection(dependent, reference) {
        Some((x1, y1, x2, y2)) => ((x2 - x1) * (y2 - y1) / area).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// Estrictamente mayor: una razón igual a `threshold` no cuenta como solape.
pub fn overlaps(dependent: &BoundingBox, reference: &BoundingBox, threshold: f64) -> bool {
    overlap_ratio(dependent, reference) > threshold
}
