//! Resize handles and pointer hit-testing against the lens box.

use crate::geometry::ScreenRect;

/// One of the eight grab points on the lens border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

/// Where a pointer landed relative to the lens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Outside,
    /// Inside the lens, away from the border band.
    Body,
    /// On the border band; dragging resizes from this handle.
    Border(ResizeHandle),
}

impl ResizeHandle {
    /// Get all handles, clockwise from north.
    pub fn all() -> &'static [ResizeHandle] {
        &[
            ResizeHandle::North,
            ResizeHandle::NorthEast,
            ResizeHandle::East,
            ResizeHandle::SouthEast,
            ResizeHandle::South,
            ResizeHandle::SouthWest,
            ResizeHandle::West,
            ResizeHandle::NorthWest,
        ]
    }

    /// Pick the handle for a set of touched edges.
    pub fn from_edges(left: bool, top: bool, right: bool, bottom: bool) -> Option<Self> {
        match (left, top, right, bottom) {
            (true, true, _, _) => Some(ResizeHandle::NorthWest),
            (_, true, true, _) => Some(ResizeHandle::NorthEast),
            (true, _, _, true) => Some(ResizeHandle::SouthWest),
            (_, _, true, true) => Some(ResizeHandle::SouthEast),
            (true, _, _, _) => Some(ResizeHandle::West),
            (_, true, _, _) => Some(ResizeHandle::North),
            (_, _, true, _) => Some(ResizeHandle::East),
            (_, _, _, true) => Some(ResizeHandle::South),
            _ => None,
        }
    }

    /// Dragging this handle moves the left edge.
    pub fn moves_left(&self) -> bool {
        matches!(
            self,
            ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest
        )
    }

    /// Dragging this handle moves the top edge.
    pub fn moves_top(&self) -> bool {
        matches!(
            self,
            ResizeHandle::North | ResizeHandle::NorthWest | ResizeHandle::NorthEast
        )
    }

    /// Dragging this handle moves the right edge.
    pub fn moves_right(&self) -> bool {
        matches!(
            self,
            ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast
        )
    }

    /// Dragging this handle moves the bottom edge.
    pub fn moves_bottom(&self) -> bool {
        matches!(
            self,
            ResizeHandle::South | ResizeHandle::SouthWest | ResizeHandle::SouthEast
        )
    }

    /// Cursor name a toolkit would show over this handle.
    pub fn cursor_name(&self) -> &'static str {
        match self {
            ResizeHandle::North => "n-resize",
            ResizeHandle::South => "s-resize",
            ResizeHandle::East => "e-resize",
            ResizeHandle::West => "w-resize",
            ResizeHandle::NorthEast => "ne-resize",
            ResizeHandle::NorthWest => "nw-resize",
            ResizeHandle::SouthEast => "se-resize",
            ResizeHandle::SouthWest => "sw-resize",
        }
    }

    /// Square grab area of `size` pixels centred on this handle's anchor point.
    pub fn rect(&self, lens: &ScreenRect, size: i32) -> ScreenRect {
        let half = size / 2;
        let cx = if self.moves_left() {
            lens.x
        } else if self.moves_right() {
            lens.right() - 1
        } else {
            lens.x + lens.width / 2
        };
        let cy = if self.moves_top() {
            lens.y
        } else if self.moves_bottom() {
            lens.bottom() - 1
        } else {
            lens.y + lens.height / 2
        };
        ScreenRect::new(cx - half, cy - half, size, size)
    }
}

/// Classify a pointer position against the lens and its border band.
pub fn hit_test(lens: &ScreenRect, px: i32, py: i32, border: i32) -> HitRegion {
    if !lens.contains(px, py) {
        return HitRegion::Outside;
    }

    let left = px < lens.x + border;
    let top = py < lens.y + border;
    let right = px >= lens.right() - border;
    let bottom = py >= lens.bottom() - border;

    match ResizeHandle::from_edges(left, top, right, bottom) {
        Some(handle) => HitRegion::Border(handle),
        None => HitRegion::Body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lens() -> ScreenRect {
        ScreenRect::new(100, 100, 50, 50)
    }

    #[test]
    fn test_hit_outside() {
        assert_eq!(hit_test(&lens(), 99, 120, 6), HitRegion::Outside);
        assert_eq!(hit_test(&lens(), 150, 120, 6), HitRegion::Outside);
    }

    #[test]
    fn test_hit_body() {
        assert_eq!(hit_test(&lens(), 125, 125, 6), HitRegion::Body);
        assert_eq!(hit_test(&lens(), 106, 106, 6), HitRegion::Body);
    }

    #[test]
    fn test_hit_edges() {
        assert_eq!(
            hit_test(&lens(), 125, 101, 6),
            HitRegion::Border(ResizeHandle::North)
        );
        assert_eq!(
            hit_test(&lens(), 125, 148, 6),
            HitRegion::Border(ResizeHandle::South)
        );
        assert_eq!(
            hit_test(&lens(), 101, 125, 6),
            HitRegion::Border(ResizeHandle::West)
        );
        assert_eq!(
            hit_test(&lens(), 149, 125, 6),
            HitRegion::Border(ResizeHandle::East)
        );
    }

    #[test]
    fn test_hit_corners() {
        assert_eq!(
            hit_test(&lens(), 100, 100, 6),
            HitRegion::Border(ResizeHandle::NorthWest)
        );
        assert_eq!(
            hit_test(&lens(), 149, 100, 6),
            HitRegion::Border(ResizeHandle::NorthEast)
        );
        assert_eq!(
            hit_test(&lens(), 100, 149, 6),
            HitRegion::Border(ResizeHandle::SouthWest)
        );
        assert_eq!(
            hit_test(&lens(), 149, 149, 6),
            HitRegion::Border(ResizeHandle::SouthEast)
        );
    }

    #[test]
    fn test_edge_flags_are_consistent() {
        for handle in ResizeHandle::all() {
            assert!(!(handle.moves_left() && handle.moves_right()));
            assert!(!(handle.moves_top() && handle.moves_bottom()));
            let edges = (
                handle.moves_left(),
                handle.moves_top(),
                handle.moves_right(),
                handle.moves_bottom(),
            );
            assert_eq!(
                ResizeHandle::from_edges(edges.0, edges.1, edges.2, edges.3),
                Some(*handle)
            );
        }
    }

    #[test]
    fn test_handle_rects_sit_on_the_border() {
        let l = lens();
        let se = ResizeHandle::SouthEast.rect(&l, 6);
        assert!(se.contains(149, 149));
        let n = ResizeHandle::North.rect(&l, 6);
        assert!(n.contains(125, 100));
    }
}
