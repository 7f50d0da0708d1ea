use serde::Serialize;

use super::errors::{DomainError, DomainResult};

/// Caja alineada a los ejes en píxeles: `(x1, y1)` arriba-izquierda, `(x2, y2)` abajo-derecha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl BoundingBox {
    /// Rechaza coordenadas no finitas o invertidas. Se admite ancho o alto cero.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> DomainResult<Self> {
        let invalid = |reason| DomainError::InvalidBox { x1, y1, x2, y2, reason };

        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(invalid("coordenada no finita"));
        }
        if x2 < x1 {
            return Err(invalid("x2 < x1"));
        }
        if y2 < y1 {
            return Err(invalid("y2 < y1"));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn x1(&self) -> f64 { self.x1 }
    pub fn y1(&self) -> f64 { self.y1 }
    pub fn x2(&self) -> f64 { self.x2 }
    pub fn y2(&self) -> f64 { self.y2 }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> DomainResult<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DomainError::InvalidConfidence(confidence));
        }
        Ok(Self { label: label.into(), confidence, bbox })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_and_non_finite_boxes() {
        assert!(matches!(
            BoundingBox::new(10.0, 0.0, 5.0, 10.0),
            Err(DomainError::InvalidBox { reason: "x2 < x1", .. })
        ));
        assert!(matches!(
            BoundingBox::new(0.0, 10.0, 5.0, 2.0),
            Err(DomainError::InvalidBox { reason: "y2 < y1", .. })
        ));
        assert!(BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(BoundingBox::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn accepts_zero_area_box() {
        let b = BoundingBox::new(3.0, 3.0, 3.0, 8.0).unwrap();
        assert_eq!(b.area(), 0.0);
    }

    #[test]
    fn confidence_must_be_in_unit_range() {
        let b = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(Detection::new("trash", 0.0, b).is_ok());
        assert!(Detection::new("trash", 1.0, b).is_ok());
        assert_eq!(
            Detection::new("trash", 1.5, b),
            Err(DomainError::InvalidConfidence(1.5))
        );
        assert!(Detection::new("trash", f32::NAN, b).is_err());
    }
}
