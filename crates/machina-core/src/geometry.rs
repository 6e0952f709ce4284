//! Geometric primitives shared by layout, routing, and export.
//!
//! Coordinates follow the SVG convention: origin at the top left, x
//! increasing rightward, y increasing downward. All values are `f32`.

/// A 2-D point in diagram space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point component-wise.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Calculates the midpoint between this point and another.
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension.
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension.
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new size grown by the given insets on all sides.
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }
}

/// An axis-aligned rectangular bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds centered on a point.
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates bounds from a top-left corner and a size.
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds.
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds.
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point.
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the smallest bounds containing both this and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the given offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Returns the point where the segment from the center towards `target`
    /// crosses the rectangle border.
    ///
    /// When `target` lies inside the bounds, the segment ends before the
    /// border and `target` itself is returned; a `target` equal to the
    /// center yields the center.
    pub fn border_point_towards(self, target: Point) -> Point {
        let center = self.center();
        let dx = target.x - center.x;
        let dy = target.y - center.y;
        if dx == 0.0 && dy == 0.0 {
            return center;
        }

        let tx = if dx == 0.0 {
            f32::INFINITY
        } else {
            (self.width() / 2.0) / dx.abs()
        };
        let ty = if dy == 0.0 {
            f32::INFINITY
        } else {
            (self.height() / 2.0) / dy.abs()
        };
        let t = tx.min(ty).min(1.0);

        Point::new(center.x + dx * t, center.y + dy * t)
    }
}

/// Spacing around an element, with independent values per side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value on all sides.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Sum of the left and right insets.
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_bounds_from_center() {
        let bounds = Bounds::new_from_center(Point::new(50.0, 60.0), Size::new(20.0, 30.0));
        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.min_y(), 45.0);
        assert_eq!(bounds.max_x(), 60.0);
        assert_eq!(bounds.max_y(), 75.0);
        assert_eq!(bounds.center(), Point::new(50.0, 60.0));
    }

    #[test]
    fn test_bounds_merge_contains_both() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_top_left(Point::new(5.0, -4.0), Size::new(20.0, 8.0));
        let merged = a.merge(&b);

        assert_eq!(merged.min_x(), 0.0);
        assert_eq!(merged.min_y(), -4.0);
        assert_eq!(merged.max_x(), 25.0);
        assert_eq!(merged.max_y(), 10.0);
    }

    #[test]
    fn test_border_point_exits_through_vertical_side() {
        let bounds = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        // Target far to the right: the exit point sits on the right edge.
        let exit = bounds.border_point_towards(Point::new(100.0, 0.0));
        assert!(approx_eq!(f32, exit.x(), 5.0));
        assert!(approx_eq!(f32, exit.y(), 0.0));
    }

    #[test]
    fn test_border_point_exits_through_horizontal_side() {
        let bounds = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(10.0, 4.0));
        let exit = bounds.border_point_towards(Point::new(3.0, 100.0));
        assert!(approx_eq!(f32, exit.y(), 2.0));
        assert!(exit.x() > 0.0 && exit.x() < 5.0);
    }

    #[test]
    fn test_border_point_degenerate_target() {
        let bounds = Bounds::new_from_center(Point::new(7.0, 9.0), Size::new(10.0, 4.0));
        let center = bounds.border_point_towards(bounds.center());
        assert_eq!(center, bounds.center());
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            1.0f32..200.0,
            1.0f32..200.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        /// Merge is commutative.
        #[test]
        fn merge_is_commutative(a in bounds_strategy(), b in bounds_strategy()) {
            let ab = a.merge(&b);
            let ba = b.merge(&a);
            prop_assert!(approx_eq!(f32, ab.min_x(), ba.min_x()));
            prop_assert!(approx_eq!(f32, ab.min_y(), ba.min_y()));
            prop_assert!(approx_eq!(f32, ab.max_x(), ba.max_x()));
            prop_assert!(approx_eq!(f32, ab.max_y(), ba.max_y()));
        }

        /// The border exit point never leaves the rectangle.
        #[test]
        fn border_point_stays_within_bounds(bounds in bounds_strategy(), target in point_strategy()) {
            let p = bounds.border_point_towards(target);
            let eps = 0.001;
            prop_assert!(p.x() >= bounds.min_x() - eps && p.x() <= bounds.max_x() + eps);
            prop_assert!(p.y() >= bounds.min_y() - eps && p.y() <= bounds.max_y() + eps);
        }
    }
}
