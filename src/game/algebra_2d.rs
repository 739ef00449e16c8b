use egui::{Pos2, Vec2};
use nalgebra::{Isometry2, Vector2};
use parry2d::query;
use parry2d::query::Contact;
use parry2d::shape::{Ball, Cuboid};

use super::mechanics::CONTACT_PREDICTION;

/// Axis-aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AaBB {
    pub min: Pos2,
    pub max: Pos2,
}

impl AaBB {
    pub fn from_min_size(min: Pos2, size: Vec2) -> Self {
        Self { min, max: min + size }
    }

    pub fn center(&self) -> Pos2 {
        Pos2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn translate(&self, value: Vec2) -> Self {
        AaBB {
            min: self.min + value,
            max: self.max + value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Pos2,
    pub radius: f32,
}

/// r = v - 2 (v ⋅ n) n
pub fn reflected_vector(v: Vec2, surface_normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(surface_normal) * surface_normal
}

/// Touching or overlapping contact between a circle and a box; `None` when they are apart.
pub fn contact_test_circle_aabb(circle: &Circle, aabb: &AaBB) -> Option<Contact> {
    let aabb_center = aabb.center();
    let half_size = aabb.size() / 2.0;
    // ball vs cuboid is always a supported shape pair
    query::contact(
        &Isometry2::translation(circle.center.x, circle.center.y),
        &Ball::new(circle.radius),
        &Isometry2::translation(aabb_center.x, aabb_center.y),
        &Cuboid::new(Vector2::new(half_size.x, half_size.y)),
        CONTACT_PREDICTION,
    )
    .ok()
    .flatten()
}

#[cfg(test)]
mod tests {
    use egui::{Pos2, Vec2};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Vec2::new(3.0, - 4.0), Vec2::new(0.0, 1.0), Vec2::new(3.0, 4.0))]
    #[case(Vec2::new(3.0, 4.0), Vec2::new(0.0, - 1.0), Vec2::new(3.0, - 4.0))]
    #[case(Vec2::new(- 5.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(5.0, 1.0))]
    fn reflection_mirrors_along_the_normal(#[case] v: Vec2, #[case] normal: Vec2, #[case] expected: Vec2) {
        assert_eq!(reflected_vector(v, normal), expected);
    }

    #[rstest]
    #[case(Pos2::new(100.0, 100.0), 5.0, None)]
    #[case(Pos2::new(53.0, 100.0), 5.0, Some(Vec2::new(1.0, 0.0)))]
    #[case(Pos2::new(49.0, 79.0), 5.0, Some(Vec2::new(0.0, - 1.0)))]
    #[case(Pos2::new(49.0, 120.0), 5.0, Some(Vec2::new(0.0, 1.0)))]
    fn circle_contact_with_box(#[case] center: Pos2, #[case] radius: f32, #[case] expected_normal: Option<Vec2>) {
        let aabb = AaBB {
            min: Pos2::new(40.0, 80.0),
            max: Pos2::new(50.0, 116.0),
        };
        let contact = contact_test_circle_aabb(&Circle { center, radius }, &aabb);

        assert_eq!(contact.is_some(), expected_normal.is_some());
        if let (Some(contact), Some(expected)) = (contact, expected_normal) {
            assert!(contact.dist <= 0.0);
            assert!((contact.normal2.x - expected.x).abs() < 0.01, "{:?}", contact.normal2);
            assert!((contact.normal2.y - expected.y).abs() < 0.01, "{:?}", contact.normal2);
        }
    }

    #[test]
    fn aabb_geometry() {
        let aabb = AaBB::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(18.0, 96.0));
        assert_eq!(aabb.max, Pos2::new(28.0, 116.0));
        assert_eq!(aabb.center(), Pos2::new(19.0, 68.0));
        assert_eq!(aabb.translate(Vec2::new(0.0, - 20.0)).min, Pos2::new(10.0, 0.0));
    }
}
