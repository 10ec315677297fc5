//! Input handling: coordinate conversion, tap targets, and event types.
//!
//! Keyboard and mouse/touch are normalized into `InputEvent` before the
//! bakery sees them.

use ratzilla::ratatui::layout::Rect;

/// All possible input events, normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard.
    Key(char),
    /// A tap on a registered target, identified by an action ID
    /// (see `cookie::actions`).
    Click(u16),
}

/// A region on screen that can be tapped to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cell coordinates.
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared state between the render loop and the tap handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-width target for one row of `area`. Rows outside are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Hit-test a cell. When targets overlap the last registered one wins,
    /// matching draw order.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }
}

/// Determine whether a screen width (in columns) should use narrow layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 70
}

/// Convert a pixel Y coordinate (relative to the grid's top edge) to a row.
///
/// Returns `None` if the click is outside the grid or inputs are invalid.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_cell(click_y, grid_height, terminal_rows)
}

/// Convert a pixel X coordinate (relative to the grid's left edge) to a column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_cell(click_x, grid_width, terminal_cols)
}

fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    if cell >= cells {
        None
    } else {
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_basic() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 11, 80, 1), 2);

        assert_eq!(cs.hit_test(5, 10), Some(1));
        assert_eq!(cs.hit_test(5, 11), Some(2));
        assert_eq!(cs.hit_test(5, 12), None);
    }

    #[test]
    fn hit_test_respects_columns() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(10, 0, 5, 3), 7);
        assert_eq!(cs.hit_test(9, 1), None);
        assert_eq!(cs.hit_test(10, 1), Some(7));
        assert_eq!(cs.hit_test(14, 2), Some(7));
        assert_eq!(cs.hit_test(15, 1), None);
    }

    #[test]
    fn hit_test_last_registered_wins() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 0, 80, 10), 1);
        cs.add_click_target(Rect::new(0, 5, 80, 1), 2);
        assert_eq!(cs.hit_test(3, 5), Some(2));
        assert_eq!(cs.hit_test(3, 4), Some(1));
    }

    #[test]
    fn row_target_outside_area_is_ignored() {
        let mut cs = ClickState::new();
        let area = Rect::new(2, 10, 30, 3);
        cs.add_row_target(area, 9, 1);
        cs.add_row_target(area, 13, 2);
        cs.add_row_target(area, 11, 3);
        assert_eq!(cs.targets.len(), 1);
        assert_eq!(cs.hit_test(2, 11), Some(3));
        assert_eq!(cs.hit_test(1, 11), None);
    }

    #[test]
    fn clear_targets_empties() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 0, 1, 1), 1);
        cs.clear_targets();
        assert!(cs.targets.is_empty());
    }

    #[test]
    fn pixel_to_row_basic() {
        // 30 rows, grid 450px tall → each row is 15px
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(14.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(449.0, 450.0, 30), Some(29));
    }

    #[test]
    fn pixel_to_row_out_of_bounds() {
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 450.0, 0), None);
    }

    #[test]
    fn pixel_to_col_fractional_cell_width() {
        // 80 cols, 700px → 8.75px per cell
        assert_eq!(pixel_x_to_col(0.0, 700.0, 80), Some(0));
        assert_eq!(pixel_x_to_col(8.0, 700.0, 80), Some(0));
        assert_eq!(pixel_x_to_col(9.0, 700.0, 80), Some(1));
        assert_eq!(pixel_x_to_col(699.0, 700.0, 80), Some(79));
        assert_eq!(pixel_x_to_col(700.0, 700.0, 80), None);
    }

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(40));
        assert!(!is_narrow_layout(100));
    }
}
