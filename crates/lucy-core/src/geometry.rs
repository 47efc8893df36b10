use std::ops::{Add, Mul, Sub};

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    pub const fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub const fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Size<U> {
        Size {
            width: f(self.width),
            height: f(self.height),
        }
    }
}

impl<T: Copy> Size<T> {
    /// Extent along `axis` (width for horizontal, height for vertical).
    #[inline]
    pub fn along(&self, axis: Axis) -> T {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    #[inline]
    pub fn set_along(&mut self, axis: Axis, value: T) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }

    /// Build a size from main/cross extents for a given main axis.
    #[inline]
    pub fn from_axes(main_axis: Axis, main: T, cross: T) -> Self {
        match main_axis {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }
}

impl Size<f32> {
    pub const ZERO: Size<f32> = Size::new(0.0, 0.0);

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

impl<T: Mul + Copy> Mul<T> for Size<T> {
    type Output = Size<<T as Mul>::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos<T> {
    pub x: T,
    pub y: T,
}

impl<T> Pos<T> {
    pub const fn new(x: T, y: T) -> Self {
        Pos { x, y }
    }
}

impl<T: Copy> Pos<T> {
    #[inline]
    pub fn along(&self, axis: Axis) -> T {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    #[inline]
    pub fn set_along(&mut self, axis: Axis, value: T) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }
}

impl Pos<f32> {
    pub const ORIGIN: Pos<f32> = Pos::new(0.0, 0.0);
}

impl<T: Add<Output = T>> Add for Pos<T> {
    type Output = Pos<T>;

    fn add(self, rhs: Self) -> Self::Output {
        Pos {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: Sub<Output = T>> Sub for Pos<T> {
    type Output = Pos<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Pos {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T: Copy> Rect<T> {
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Pos<T>, size: Size<T>) -> Self {
        Rect {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    #[inline]
    pub fn position(&self) -> Pos<T> {
        Pos::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size<T> {
        Size::new(self.width, self.height)
    }
}

impl Rect<f32> {
    pub const ZERO: Rect<f32> = Rect::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, point: Pos<f32>) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Whether `other` lies inside `self`, allowing `epsilon` of float slack.
    pub fn contains_rect(&self, other: &Rect<f32>, epsilon: f32) -> bool {
        other.x >= self.x - epsilon
            && other.y >= self.y - epsilon
            && other.right() <= self.right() + epsilon
            && other.bottom() <= self.bottom() + epsilon
    }

    /// Intersection of two rects. Disjoint rects give a zero-sized rect.
    pub fn intersect(&self, other: &Rect<f32>) -> Rect<f32> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }

    pub fn translate(&self, offset: Pos<f32>) -> Rect<f32> {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Shrink by `inset` on every side, never below zero size.
    ///
    /// An inset larger than half an extent collapses that axis onto the
    /// center line, so the result always lies inside `self`.
    pub fn inset(&self, inset: f32) -> Rect<f32> {
        let x = inset.min(self.width / 2.0);
        let y = inset.min(self.height / 2.0);
        Rect::new(
            self.x + x,
            self.y + y,
            (self.width - 2.0 * inset).max(0.0),
            (self.height - 2.0 * inset).max(0.0),
        )
    }

    /// Start coordinate along `axis`.
    #[inline]
    pub fn start(&self, axis: Axis) -> f32 {
        self.position().along(axis)
    }

    /// Extent along `axis`.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f32 {
        self.size().along(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_access() {
        let mut size = Size::new(3.0, 4.0);
        assert_eq!(size.along(Axis::Horizontal), 3.0);
        assert_eq!(size.along(Axis::Vertical), 4.0);
        size.set_along(Axis::Vertical, 9.0);
        assert_eq!(size.height, 9.0);
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
        assert_eq!(Size::from_axes(Axis::Vertical, 1.0, 2.0), Size::new(2.0, 1.0));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);
        assert_eq!(a.intersect(&b), Rect::new(50.0, 80.0, 50.0, 20.0));

        let far = Rect::new(500.0, 500.0, 10.0, 10.0);
        let empty = a.intersect(&far);
        assert_eq!(empty.width, 0.0);
        assert_eq!(empty.height, 0.0);
    }

    #[test]
    fn test_rect_contains() {
        let outer = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(outer.contains_point(Pos::new(10.0, 60.0)));
        assert!(!outer.contains_point(Pos::new(111.0, 20.0)));
        assert!(outer.contains_rect(&Rect::new(10.0, 10.0, 100.0, 50.0), 0.0));
        assert!(!outer.contains_rect(&Rect::new(9.0, 10.0, 10.0, 10.0), 0.001));
    }

    #[test]
    fn test_inset_clamps() {
        let r = Rect::new(0.0, 0.0, 10.0, 30.0).inset(8.0);
        assert_eq!(r, Rect::new(5.0, 8.0, 0.0, 14.0));

        let outer = Rect::new(20.0, 20.0, 40.0, 40.0);
        let r = outer.inset(50.0);
        assert_eq!(r, Rect::new(40.0, 40.0, 0.0, 0.0));
        assert!(outer.contains_rect(&r, 0.0));
    }
}
