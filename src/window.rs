//! Drag and resize handling for the frameless main window
//!
//! The window has no native decorations, so the shell forwards primary-button
//! press, pointer motion and release here. A press inside the edge band starts
//! a resize in one of eight directions, anywhere else starts a drag. Motion
//! while a gesture is active yields the geometry the window should take.

use tracing::{debug, trace, Span};

use crate::constants::hit_test::{BORDER_FRACTION, CORNER_FACTOR, MAX_BORDER, MIN_BORDER};
use crate::types::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeDirection {
    Left,
    Right,
    Top,
    Bottom,
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
}

impl ResizeDirection {
    fn moves_left_edge(self) -> bool {
        matches!(self, Self::Left | Self::LeftTop | Self::LeftBottom)
    }

    fn moves_right_edge(self) -> bool {
        matches!(self, Self::Right | Self::RightTop | Self::RightBottom)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Self::Top | Self::LeftTop | Self::RightTop)
    }

    fn moves_bottom_edge(self) -> bool {
        matches!(self, Self::Bottom | Self::LeftBottom | Self::RightBottom)
    }

    pub fn cursor(self) -> CursorGlyph {
        match self {
            Self::Left | Self::Right => CursorGlyph::SizeHorizontal,
            Self::Top | Self::Bottom => CursorGlyph::SizeVertical,
            Self::LeftTop | Self::RightBottom => CursorGlyph::SizeForwardDiagonal,
            Self::RightTop | Self::LeftBottom => CursorGlyph::SizeBackwardDiagonal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::LeftTop => "left_top",
            Self::LeftBottom => "left_bottom",
            Self::RightTop => "right_top",
            Self::RightBottom => "right_bottom",
        }
    }
}

/// Pointer shape requested by the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorGlyph {
    #[default]
    Arrow,
    SizeHorizontal,
    SizeVertical,
    /// `\` diagonal (top-left / bottom-right corners)
    SizeForwardDiagonal,
    /// `/` diagonal (top-right / bottom-left corners)
    SizeBackwardDiagonal,
}

/// Width of the edge band for a window of `size`
///
/// 2% of the smaller of width/height (truncated), kept within 10..=20 pixels.
pub fn border_width(size: Size) -> i32 {
    let by_width = (f64::from(size.width) * BORDER_FRACTION) as i32;
    let by_height = (f64::from(size.height) * BORDER_FRACTION) as i32;
    MIN_BORDER.max(MAX_BORDER.min(by_width).min(by_height))
}

/// Corner zone extent along each edge for a window of `size`
pub fn corner_extent(size: Size) -> f64 {
    f64::from(border_width(size)) * CORNER_FACTOR
}

#[derive(Debug, Clone, Copy)]
struct EdgeHits {
    left: bool,
    right: bool,
    top: bool,
    bottom: bool,
}

fn edge_hits(pos: Point, size: Size, band: f64) -> EdgeHits {
    let x = f64::from(pos.x);
    let y = f64::from(pos.y);
    EdgeHits {
        left: x <= band,
        right: x >= f64::from(size.width) - band,
        top: y <= band,
        bottom: y >= f64::from(size.height) - band,
    }
}

/// True when `pos` (window-local) lies within the edge band of any side
pub fn is_resize_area(pos: Point, size: Size) -> bool {
    let edges = edge_hits(pos, size, f64::from(border_width(size)));
    edges.left || edges.right || edges.top || edges.bottom
}

/// Resize direction for a window-local position, `None` outside the edge band
///
/// A position on one edge band that is also within the corner extent of the
/// adjacent edge resolves to that corner. Corners win over single edges.
pub fn resize_direction(pos: Point, size: Size) -> Option<ResizeDirection> {
    let edges = edge_hits(pos, size, f64::from(border_width(size)));
    if !(edges.left || edges.right || edges.top || edges.bottom) {
        return None;
    }
    let corners = edge_hits(pos, size, corner_extent(size));

    let horizontal_left = edges.left || (corners.left && (edges.top || edges.bottom));
    let horizontal_right = edges.right || (corners.right && (edges.top || edges.bottom));
    let vertical_top = edges.top || (corners.top && (edges.left || edges.right));
    let vertical_bottom = edges.bottom || (corners.bottom && (edges.left || edges.right));

    let direction = match (
        horizontal_left,
        horizontal_right,
        vertical_top,
        vertical_bottom,
    ) {
        (true, _, true, _) => ResizeDirection::LeftTop,
        (true, _, _, true) => ResizeDirection::LeftBottom,
        (_, true, true, _) => ResizeDirection::RightTop,
        (_, true, _, true) => ResizeDirection::RightBottom,
        (true, _, _, _) => ResizeDirection::Left,
        (_, true, _, _) => ResizeDirection::Right,
        (_, _, true, _) => ResizeDirection::Top,
        _ => ResizeDirection::Bottom,
    };
    Some(direction)
}

/// Cursor shape for a window-local position
pub fn cursor_for(pos: Point, size: Size) -> CursorGlyph {
    resize_direction(pos, size)
        .map(ResizeDirection::cursor)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Dragging {
        /// Global pointer position at the previous motion event
        last_pointer: Point,
        /// Geometry after the previous motion event
        window: Rect,
    },
    Resizing {
        direction: ResizeDirection,
        /// Global pointer position at press time
        press_pointer: Point,
        /// Window geometry at press time
        origin: Rect,
    },
}

/// What lies under a primary press, as reported by the shell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressTarget {
    /// Title bar background or another surface that moves the window
    pub on_drag_surface: bool,
    pub maximized: bool,
}

pub struct WindowController {
    state: InteractionState,
    cursor: CursorGlyph,
    span: Span,
}

impl WindowController {
    /// `span` carries the logging context for every transition
    pub fn new(span: Span) -> Self {
        Self {
            state: InteractionState::Idle,
            cursor: CursorGlyph::Arrow,
            span,
        }
    }

    pub fn cursor(&self) -> CursorGlyph {
        self.cursor
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, InteractionState::Idle)
    }

    /// Whether a primary press at `local` may start a gesture
    ///
    /// Only the edge band or a drag surface starts one, never while a gesture
    /// is already running or the window is maximized.
    pub fn accepts_press(&self, local: Point, size: Size, target: PressTarget) -> bool {
        !self.is_active()
            && !target.maximized
            && (is_resize_area(local, size) || target.on_drag_surface)
    }

    /// Press forwarded by the shell; ignored unless `accepts_press` allows it
    pub fn try_press(&mut self, local: Point, global: Point, window: Rect, target: PressTarget) {
        if self.accepts_press(local, window.size(), target) {
            self.press(local, global, window);
        }
    }

    /// Primary button pressed at `local` (window coordinates) / `global`
    pub fn press(&mut self, local: Point, global: Point, window: Rect) {
        let _guard = self.span.enter();
        self.state = match resize_direction(local, window.size()) {
            Some(direction) => {
                debug!(direction = direction.as_str(), ?window, "Started resizing window");
                self.cursor = direction.cursor();
                InteractionState::Resizing {
                    direction,
                    press_pointer: global,
                    origin: window,
                }
            }
            None => {
                debug!(?window, "Started dragging window");
                InteractionState::Dragging {
                    last_pointer: global,
                    window,
                }
            }
        };
    }

    /// Pointer moved; returns the new window geometry while a gesture is active
    ///
    /// `window` is the geometry the shell currently reports. It is used for
    /// hit-testing only; geometry updates derive from the press snapshot.
    pub fn pointer_moved(&mut self, local: Point, global: Point, window: Rect) -> Option<Rect> {
        let _guard = self.span.enter();
        match self.state {
            InteractionState::Idle => {
                self.cursor = cursor_for(local, window.size());
                None
            }
            InteractionState::Dragging {
                last_pointer,
                window: dragged,
            } => {
                self.cursor = cursor_for(local, window.size());
                let delta = global - last_pointer;
                let position = dragged.position() + delta;
                let moved = Rect::from_parts(position, dragged.size());
                self.state = InteractionState::Dragging {
                    last_pointer: global,
                    window: moved,
                };
                trace!(x = moved.x, y = moved.y, dx = delta.x, dy = delta.y, "Dragging window");
                Some(moved)
            }
            InteractionState::Resizing {
                direction,
                press_pointer,
                origin,
            } => {
                let resized = apply_resize(origin, direction, global - press_pointer);
                trace!(
                    direction = direction.as_str(),
                    width = resized.width,
                    height = resized.height,
                    "Resizing window"
                );
                Some(resized)
            }
        }
    }

    /// Button released; always ends the gesture and restores the arrow cursor
    pub fn release(&mut self) {
        let _guard = self.span.enter();
        match self.state {
            InteractionState::Resizing { direction, .. } => {
                debug!(direction = direction.as_str(), "Finished resizing window");
            }
            InteractionState::Dragging { window, .. } => {
                debug!(x = window.x, y = window.y, "Finished dragging window");
            }
            InteractionState::Idle => {}
        }
        self.state = InteractionState::Idle;
        self.cursor = CursorGlyph::Arrow;
    }
}

/// Geometry after dragging the `direction` edges by `delta` from `origin`
pub fn apply_resize(origin: Rect, direction: ResizeDirection, delta: Point) -> Rect {
    let mut rect = origin;
    if direction.moves_left_edge() {
        rect.width -= delta.x;
        rect.x += delta.x;
    } else if direction.moves_right_edge() {
        rect.width += delta.x;
    }
    if direction.moves_top_edge() {
        rect.height -= delta.y;
        rect.y += delta.y;
    } else if direction.moves_bottom_edge() {
        rect.height += delta.y;
    }
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> WindowController {
        WindowController::new(Span::none())
    }

    const SIZE: Size = Size::new(700, 700);

    fn direction(ctl: &WindowController) -> Option<ResizeDirection> {
        match ctl.state {
            InteractionState::Resizing { direction, .. } => Some(direction),
            _ => None,
        }
    }

    #[test]
    fn test_border_width_is_clamped() {
        // 2% of 700 = 14
        assert_eq!(border_width(Size::new(700, 700)), 14);
        // Small windows never go below 10
        assert_eq!(border_width(Size::new(300, 300)), 10);
        // Large windows never exceed 20
        assert_eq!(border_width(Size::new(4000, 3000)), 20);
        // The smaller dimension decides
        assert_eq!(border_width(Size::new(2000, 600)), 12);
    }

    #[test]
    fn test_is_resize_area_edges() {
        // border = 14
        assert!(is_resize_area(Point::new(0, 350), SIZE));
        assert!(is_resize_area(Point::new(14, 350), SIZE));
        assert!(!is_resize_area(Point::new(15, 350), SIZE));
        assert!(is_resize_area(Point::new(686, 350), SIZE));
        assert!(!is_resize_area(Point::new(685, 350), SIZE));
        assert!(is_resize_area(Point::new(350, 14), SIZE));
        assert!(is_resize_area(Point::new(350, 686), SIZE));
        assert!(!is_resize_area(Point::new(350, 350), SIZE));
    }

    #[test]
    fn test_direction_defined_exactly_on_resize_area() {
        let size = Size::new(320, 240);
        for x in (-5..330).step_by(3) {
            for y in (-5..250).step_by(3) {
                let pos = Point::new(x, y);
                assert_eq!(
                    resize_direction(pos, size).is_some(),
                    is_resize_area(pos, size),
                    "mismatch at {pos:?}"
                );
            }
        }
    }

    #[test]
    fn test_single_edge_directions() {
        assert_eq!(resize_direction(Point::new(2, 350), SIZE), Some(ResizeDirection::Left));
        assert_eq!(resize_direction(Point::new(698, 350), SIZE), Some(ResizeDirection::Right));
        assert_eq!(resize_direction(Point::new(350, 2), SIZE), Some(ResizeDirection::Top));
        assert_eq!(resize_direction(Point::new(350, 698), SIZE), Some(ResizeDirection::Bottom));
    }

    #[test]
    fn test_corners_take_priority() {
        assert_eq!(resize_direction(Point::new(3, 3), SIZE), Some(ResizeDirection::LeftTop));
        assert_eq!(resize_direction(Point::new(3, 697), SIZE), Some(ResizeDirection::LeftBottom));
        assert_eq!(resize_direction(Point::new(697, 3), SIZE), Some(ResizeDirection::RightTop));
        assert_eq!(resize_direction(Point::new(697, 697), SIZE), Some(ResizeDirection::RightBottom));
    }

    #[test]
    fn test_corner_zone_extends_along_edges() {
        // border = 14, corner extent = 21
        assert_eq!(resize_direction(Point::new(2, 20), SIZE), Some(ResizeDirection::LeftTop));
        assert_eq!(resize_direction(Point::new(2, 22), SIZE), Some(ResizeDirection::Left));
        assert_eq!(resize_direction(Point::new(690, 680), SIZE), Some(ResizeDirection::RightBottom));
        assert_eq!(resize_direction(Point::new(20, 698), SIZE), Some(ResizeDirection::LeftBottom));
        // Inside the corner extent but off every edge band: no resize
        assert_eq!(resize_direction(Point::new(18, 18), SIZE), None);
    }

    #[test]
    fn test_cursor_glyphs() {
        assert_eq!(cursor_for(Point::new(2, 350), SIZE), CursorGlyph::SizeHorizontal);
        assert_eq!(cursor_for(Point::new(350, 698), SIZE), CursorGlyph::SizeVertical);
        assert_eq!(cursor_for(Point::new(3, 3), SIZE), CursorGlyph::SizeForwardDiagonal);
        assert_eq!(cursor_for(Point::new(697, 697), SIZE), CursorGlyph::SizeForwardDiagonal);
        assert_eq!(cursor_for(Point::new(697, 3), SIZE), CursorGlyph::SizeBackwardDiagonal);
        assert_eq!(cursor_for(Point::new(350, 350), SIZE), CursorGlyph::Arrow);
    }

    #[test]
    fn test_press_inside_starts_drag() {
        let mut ctl = controller();
        let window = Rect::new(100, 100, 700, 700);
        ctl.press(Point::new(300, 300), Point::new(400, 400), window);
        assert!(matches!(ctl.state, InteractionState::Dragging { .. }));
        assert_eq!(direction(&ctl), None);
    }

    #[test]
    fn test_press_on_edge_starts_resize() {
        let mut ctl = controller();
        let window = Rect::new(100, 100, 700, 700);
        ctl.press(Point::new(698, 300), Point::new(798, 400), window);
        assert_eq!(direction(&ctl), Some(ResizeDirection::Right));
        assert_eq!(ctl.cursor(), CursorGlyph::SizeHorizontal);
    }

    #[test]
    fn test_drag_accumulates_incrementally() {
        let mut ctl = controller();
        let w0 = Rect::new(100, 100, 700, 700);
        let p0 = Point::new(400, 400);
        ctl.press(Point::new(300, 300), p0, w0);

        let p1 = Point::new(410, 395);
        let moved = ctl.pointer_moved(Point::new(300, 300), p1, w0).unwrap();
        assert_eq!(moved.position(), w0.position() + (p1 - p0));
        assert_eq!(moved.size(), w0.size());

        // Reported geometry may lag behind; the drag still accumulates
        let p2 = Point::new(380, 420);
        let moved = ctl.pointer_moved(Point::new(300, 300), p2, w0).unwrap();
        assert_eq!(moved.position(), w0.position() + (p1 - p0) + (p2 - p1));
    }

    #[test]
    fn test_resize_right_uses_press_reference() {
        let mut ctl = controller();
        let origin = Rect::new(50, 60, 700, 700);
        let p0 = Point::new(749, 400);
        ctl.press(Point::new(699, 340), p0, origin);

        let p1 = Point::new(779, 410);
        let resized = ctl.pointer_moved(Point::new(729, 350), p1, origin).unwrap();
        assert_eq!(resized.width, 700 + (p1.x - p0.x));
        assert_eq!(resized.height, 700);
        assert_eq!(resized.position(), origin.position());

        // Cumulative from the press, not from the previous move
        let p2 = Point::new(759, 410);
        let resized = ctl.pointer_moved(Point::new(709, 350), p2, resized).unwrap();
        assert_eq!(resized.width, 710);
    }

    #[test]
    fn test_resize_left_top_moves_origin() {
        let origin = Rect::new(100, 100, 500, 400);
        let resized = apply_resize(origin, ResizeDirection::LeftTop, Point::new(20, -10));
        assert_eq!(resized, Rect::new(120, 90, 480, 410));
    }

    #[test]
    fn test_resize_bottom_only_changes_height() {
        let origin = Rect::new(100, 100, 500, 400);
        let resized = apply_resize(origin, ResizeDirection::Bottom, Point::new(30, 25));
        assert_eq!(resized, Rect::new(100, 100, 500, 425));
    }

    #[test]
    fn test_resize_has_no_minimum_clamp() {
        let origin = Rect::new(0, 0, 300, 300);
        let resized = apply_resize(origin, ResizeDirection::Right, Point::new(-400, 0));
        assert_eq!(resized.width, -100);
    }

    #[test]
    fn test_idle_move_only_updates_cursor() {
        let mut ctl = controller();
        let window = Rect::new(0, 0, 700, 700);
        assert_eq!(ctl.pointer_moved(Point::new(2, 350), Point::new(2, 350), window), None);
        assert_eq!(ctl.cursor(), CursorGlyph::SizeHorizontal);
        assert_eq!(ctl.state, InteractionState::Idle);
        assert_eq!(ctl.pointer_moved(Point::new(350, 350), Point::new(350, 350), window), None);
        assert_eq!(ctl.cursor(), CursorGlyph::Arrow);
    }

    #[test]
    fn test_release_resets_everything() {
        let mut ctl = controller();
        let window = Rect::new(0, 0, 700, 700);
        ctl.press(Point::new(3, 3), Point::new(3, 3), window);
        assert_eq!(direction(&ctl), Some(ResizeDirection::LeftTop));
        ctl.release();
        assert_eq!(ctl.state, InteractionState::Idle);
        assert_eq!(direction(&ctl), None);
        assert_eq!(ctl.cursor(), CursorGlyph::Arrow);

        // Release while idle is harmless
        ctl.release();
        assert_eq!(ctl.state, InteractionState::Idle);
    }

    #[test]
    fn test_press_gate_requires_edge_or_drag_surface() {
        let ctl = controller();
        let plain = PressTarget::default();
        let surface = PressTarget {
            on_drag_surface: true,
            maximized: false,
        };
        assert!(ctl.accepts_press(Point::new(2, 350), SIZE, plain));
        assert!(!ctl.accepts_press(Point::new(350, 350), SIZE, plain));
        assert!(ctl.accepts_press(Point::new(350, 350), SIZE, surface));
    }

    #[test]
    fn test_press_gate_refuses_when_maximized() {
        let ctl = controller();
        let maximized = PressTarget {
            on_drag_surface: true,
            maximized: true,
        };
        assert!(!ctl.accepts_press(Point::new(2, 350), SIZE, maximized));
        assert!(!ctl.accepts_press(Point::new(350, 350), SIZE, maximized));
    }

    #[test]
    fn test_try_press_ignores_refused_press() {
        let mut ctl = controller();
        let window = Rect::new(0, 0, 700, 700);
        ctl.try_press(Point::new(350, 350), Point::new(350, 350), window, PressTarget::default());
        assert_eq!(ctl.state, InteractionState::Idle);

        ctl.try_press(Point::new(698, 350), Point::new(698, 350), window, PressTarget::default());
        assert_eq!(direction(&ctl), Some(ResizeDirection::Right));
        // A second press while resizing does not restart the gesture
        assert!(!ctl.accepts_press(Point::new(2, 350), SIZE, PressTarget::default()));
    }

    #[test]
    fn test_resize_cursor_held_until_release() {
        let mut ctl = controller();
        let window = Rect::new(0, 0, 700, 700);
        ctl.press(Point::new(698, 350), Point::new(698, 350), window);
        assert_eq!(ctl.cursor(), CursorGlyph::SizeHorizontal);

        // Pointer leaves the edge band while resizing
        ctl.pointer_moved(Point::new(350, 350), Point::new(750, 350), window);
        assert_eq!(ctl.cursor(), CursorGlyph::SizeHorizontal);
        ctl.pointer_moved(Point::new(350, 2), Point::new(760, 2), window);
        assert_eq!(ctl.cursor(), CursorGlyph::SizeHorizontal);

        ctl.release();
        assert_eq!(ctl.cursor(), CursorGlyph::Arrow);
    }
}
