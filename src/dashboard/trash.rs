use crate::dashboard::model::Position;

pub const TRASH_SIZE: i32 = 64;
pub const TRASH_MARGIN: i32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ZoneRect {
    pub fn contains(self, point: Position) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }
}

/// How the trash zone should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashVisual {
    /// No drag in progress; the zone is invisible and inert.
    Hidden,
    /// A drag is in progress.
    Armed,
    /// A drag is in progress and the pointer is over the zone.
    Hot,
}

/// Drop target that deletes the widget being dragged.
///
/// Holds no state of its own; whether it is armed is decided by the caller
/// from the interaction controller each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrashZone {
    rect: ZoneRect,
}

impl TrashZone {
    pub fn new(rect: ZoneRect) -> Self {
        Self { rect }
    }

    /// Bottom-left corner of a canvas of the given height.
    pub fn for_canvas(canvas_height: i32) -> Self {
        Self::new(ZoneRect {
            x: TRASH_MARGIN,
            y: canvas_height - TRASH_MARGIN - TRASH_SIZE,
            w: TRASH_SIZE,
            h: TRASH_SIZE,
        })
    }

    pub fn rect(&self) -> ZoneRect {
        self.rect
    }

    pub fn visual_state(&self, armed: bool, pointer: Option<Position>) -> TrashVisual {
        if !armed {
            return TrashVisual::Hidden;
        }
        match pointer {
            Some(p) if self.rect.contains(p) => TrashVisual::Hot,
            _ => TrashVisual::Armed,
        }
    }

    /// Whether releasing the pointer at `pointer` should delete.
    pub fn accepts_drop(&self, armed: bool, pointer: Position) -> bool {
        armed && self.rect.contains(pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sits_in_bottom_left_corner() {
        let zone = TrashZone::for_canvas(800);
        let rect = zone.rect();
        assert_eq!(rect.x, TRASH_MARGIN);
        assert_eq!(rect.y + rect.h, 800 - TRASH_MARGIN);
    }

    #[test]
    fn disarmed_zone_is_hidden_and_ignores_drops() {
        let zone = TrashZone::for_canvas(800);
        let inside = Position::new(TRASH_MARGIN + 1, 800 - TRASH_MARGIN - 1);
        assert_eq!(zone.visual_state(false, Some(inside)), TrashVisual::Hidden);
        assert!(!zone.accepts_drop(false, inside));
    }

    #[test]
    fn armed_zone_heats_up_on_hover() {
        let zone = TrashZone::for_canvas(800);
        let inside = Position::new(TRASH_MARGIN + 10, 800 - TRASH_MARGIN - 10);
        let outside = Position::new(500, 500);
        assert_eq!(zone.visual_state(true, Some(outside)), TrashVisual::Armed);
        assert_eq!(zone.visual_state(true, None), TrashVisual::Armed);
        assert_eq!(zone.visual_state(true, Some(inside)), TrashVisual::Hot);
        assert!(zone.accepts_drop(true, inside));
        assert!(!zone.accepts_drop(true, outside));
    }
}
