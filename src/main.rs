mod console;
mod cookie;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use cookie::save::SaveStore;
use cookie::session::Session;
use cookie::CookieGame;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

#[cfg(target_arch = "wasm32")]
fn default_store() -> Box<dyn SaveStore> {
    Box::new(cookie::save::LocalStorageStore)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store() -> Box<dyn SaveStore> {
    Box::new(cookie::save::MemoryStore::new())
}

fn open_bakery() -> CookieGame {
    CookieGame::new(Session::start(default_store(), js_sys::Date::now()))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let game = Rc::new(RefCell::new(open_bakery()));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                return;
            };
            let action = cs.hit_test(col, row);
            drop(cs);

            if let Some(action_id) = action {
                game.borrow_mut()
                    .handle_input(&InputEvent::Click(action_id), js_sys::Date::now());
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let now = js_sys::Date::now();
            let mut g = game.borrow_mut();
            match key_event.code {
                KeyCode::Esc => g.stop(now),
                KeyCode::Char('r') if !g.session().is_running() => {
                    // 閉店中なら保存済みスナップショットから再開する。
                    *g = open_bakery();
                }
                KeyCode::Char(c) => {
                    g.handle_input(&InputEvent::Key(c.to_ascii_lowercase()), now);
                }
                _ => {}
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            let mut g = game.borrow_mut();
            g.frame(js_sys::Date::now());
            g.render(f, size, &click_state);
        }
    });

    Ok(())
}
