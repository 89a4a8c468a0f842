//! Named administrative regions.

use geo::{BoundingRect, Contains, MultiPolygon};

use super::GeoPoint;

/// A named area made of one or more polygons, possibly with holes
#[derive(Debug, Clone)]
pub struct Region {
    /// Unique within a region set
    pub name: String,

    /// Postal code, when the reference data carries one
    pub postal_code: Option<String>,

    pub geometry: MultiPolygon<f64>,

    /// Position in the reference dataset. Lower wins when polygons overlap.
    pub order: usize,
}

impl Region {
    pub fn new(name: impl Into<String>, geometry: MultiPolygon<f64>, order: usize) -> Self {
        Self {
            name: name.into(),
            postal_code: None,
            geometry,
            order,
        }
    }

    /// Get the bounding box of this region
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Strict interior test. Points inside a hole or on any ring are not members.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.geometry.contains(&point.to_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square_with_hole() -> Region {
        let poly = polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 20.0, y: 0.0),
                (x: 20.0, y: 20.0),
                (x: 0.0, y: 20.0),
            ],
            interiors: [[
                (x: 5.0, y: 5.0),
                (x: 15.0, y: 5.0),
                (x: 15.0, y: 15.0),
                (x: 5.0, y: 15.0),
            ]]
        );
        Region::new("B", MultiPolygon::new(vec![poly]), 0)
    }

    #[test]
    fn test_contains_respects_holes() {
        let region = square_with_hole();
        assert!(region.contains(&GeoPoint::new(2.0, 2.0)));
        assert!(!region.contains(&GeoPoint::new(10.0, 10.0)));
        assert!(!region.contains(&GeoPoint::new(30.0, 30.0)));
    }

    #[test]
    fn test_boundary_is_not_interior() {
        let region = square_with_hole();
        assert!(!region.contains(&GeoPoint::new(0.0, 10.0)));
        assert!(!region.contains(&GeoPoint::new(5.0, 10.0)));
    }

    #[test]
    fn test_bbox() {
        assert_eq!(square_with_hole().bbox(), Some((0.0, 0.0, 20.0, 20.0)));
    }
}
