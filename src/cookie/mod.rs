/// Cookie Bakery: an idle cookie clicker with a persistent economy.

pub mod actions;
pub mod logic;
pub mod render;
pub mod save;
pub mod session;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

use actions::*;
use session::Session;

pub struct CookieGame {
    session: Session,
}

impl CookieGame {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Route a key press or tap. Returns `true` if the event was consumed.
    /// Input is ignored once the session has stopped.
    pub fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        if !self.session.is_running() {
            return false;
        }
        match event {
            InputEvent::Key(key) => match *key {
                'c' | ' ' => {
                    self.session.click();
                    true
                }
                '1'..='4' => {
                    self.buy_generator_at((*key as u8 - b'1') as usize);
                    true
                }
                's' => {
                    let _ = self.session.save(now_ms);
                    true
                }
                k => match UPGRADE_KEYS.iter().position(|&u| u == k) {
                    Some(index) => {
                        self.buy_upgrade_at(index);
                        true
                    }
                    None => false,
                },
            },
            InputEvent::Click(id) => match *id {
                CLICK_COOKIE => {
                    self.session.click();
                    true
                }
                SAVE_NOW => {
                    let _ = self.session.save(now_ms);
                    true
                }
                id if (BUY_GENERATOR_BASE..BUY_UPGRADE_BASE).contains(&id) => {
                    self.buy_generator_at((id - BUY_GENERATOR_BASE) as usize);
                    true
                }
                id if id >= BUY_UPGRADE_BASE => {
                    self.buy_upgrade_at((id - BUY_UPGRADE_BASE) as usize);
                    true
                }
                _ => false,
            },
        }
    }

    /// Generator by catalog position.
    fn buy_generator_at(&mut self, index: usize) {
        let Some(id) = self.session.state().generators.get(index).map(|g| g.id.clone()) else {
            return;
        };
        let _ = self.session.purchase_generator(&id);
    }

    /// Upgrade by position among those still for sale, as listed on screen.
    fn buy_upgrade_at(&mut self, index: usize) {
        let Some(id) = logic::available_upgrades(self.session.state())
            .get(index)
            .map(|u| u.id.clone())
        else {
            return;
        };
        let _ = self.session.purchase_upgrade(&id);
    }

    pub fn frame(&mut self, now_ms: f64) {
        self.session.frame(now_ms);
    }

    pub fn stop(&mut self, now_ms: f64) {
        self.session.stop(now_ms);
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.session, f, area, click_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use save::MemoryStore;

    const T0: f64 = 1_700_000_000_000.0;

    fn new_game() -> CookieGame {
        CookieGame::new(Session::start(Box::new(MemoryStore::new()), T0))
    }

    fn bake(game: &mut CookieGame, n: u32) {
        for _ in 0..n {
            game.handle_input(&InputEvent::Key('c'), T0);
        }
    }

    #[test]
    fn click_keys_and_tap_bake() {
        let mut game = new_game();
        assert!(game.handle_input(&InputEvent::Key('c'), T0));
        assert!(game.handle_input(&InputEvent::Key(' '), T0));
        assert!(game.handle_input(&InputEvent::Click(CLICK_COOKIE), T0));
        assert_eq!(game.session().state().cookies, 3.0);
        assert_eq!(game.session().total_clicks, 3);
    }

    #[test]
    fn number_keys_buy_generators() {
        let mut game = new_game();
        bake(&mut game, 115);
        game.handle_input(&InputEvent::Key('1'), T0);
        assert_eq!(game.session().state().generators[0].owned, 1);
        game.handle_input(&InputEvent::Key('2'), T0);
        assert_eq!(game.session().state().generators[1].owned, 1);
        assert_eq!(game.session().state().cookies, 0.0);
    }

    #[test]
    fn unaffordable_generator_is_ignored() {
        let mut game = new_game();
        bake(&mut game, 10);
        assert!(game.handle_input(&InputEvent::Key('1'), T0));
        assert_eq!(game.session().state().generators[0].owned, 0);
        assert_eq!(game.session().state().cookies, 10.0);
    }

    #[test]
    fn generator_tap_targets() {
        let mut game = new_game();
        bake(&mut game, 100);
        game.handle_input(&InputEvent::Click(BUY_GENERATOR_BASE + 1), T0);
        assert_eq!(game.session().state().generators[1].owned, 1);
        // Out-of-range rows do nothing.
        game.handle_input(&InputEvent::Click(BUY_GENERATOR_BASE + 50), T0);
        assert_eq!(game.session().state().cookies, 0.0);
    }

    #[test]
    fn upgrade_letters_follow_available_list() {
        let mut game = new_game();
        bake(&mut game, 600);
        game.handle_input(&InputEvent::Key('q'), T0);
        assert!(game.session().state().upgrades[0].purchased);
        // cursor1 is gone, so 'q' now means cursor2.
        game.handle_input(&InputEvent::Key('q'), T0);
        assert!(game.session().state().upgrades[1].purchased);
        assert!(!game.session().state().upgrades[2].purchased);
        assert_eq!(game.session().state().cookies_per_click, 4.0);
    }

    #[test]
    fn third_upgrade_key_buys_instead_of_baking() {
        let mut game = new_game();
        bake(&mut game, 2_000);
        assert_eq!(logic::available_upgrades(game.session().state()).len(), 3);

        assert!(game.handle_input(&InputEvent::Key(UPGRADE_KEYS[2]), T0));
        let state = game.session().state();
        assert!(state.upgrades[2].purchased);
        assert!(!state.upgrades[0].purchased && !state.upgrades[1].purchased);
        assert_eq!(state.cookies, 0.0);
        assert_eq!(game.session().total_clicks, 2_000);
    }

    #[test]
    fn upgrade_keys_do_not_shadow_other_bindings() {
        for key in UPGRADE_KEYS {
            assert!(!matches!(key, 'c' | ' ' | 's' | '1'..='4'), "{key} is taken");
        }
    }

    #[test]
    fn upgrade_tap_targets() {
        let mut game = new_game();
        bake(&mut game, 500);
        game.handle_input(&InputEvent::Click(BUY_UPGRADE_BASE + 1), T0);
        assert!(game.session().state().upgrades[1].purchased);
        assert!(!game.session().state().upgrades[0].purchased);
    }

    #[test]
    fn save_key_writes_snapshot() {
        let store = Rc::new(MemoryStore::new());
        let mut game = CookieGame::new(Session::start(Box::new(Rc::clone(&store)), T0));
        bake(&mut game, 3);
        assert!(game.handle_input(&InputEvent::Key('s'), T0 + 10.0));
        assert!(store.contents().is_some());
        assert_eq!(game.session().state().last_saved_ms, T0 + 10.0);

        let reloaded = Session::start(Box::new(store), T0 + 10.0);
        assert_eq!(reloaded.state().cookies, 3.0);
    }

    #[test]
    fn unknown_input_not_consumed() {
        let mut game = new_game();
        assert!(!game.handle_input(&InputEvent::Key('z'), T0));
        assert!(!game.handle_input(&InputEvent::Click(42), T0));
    }

    #[test]
    fn input_ignored_after_stop() {
        let mut game = new_game();
        game.stop(T0);
        assert!(!game.handle_input(&InputEvent::Key('c'), T0));
        assert_eq!(game.session().state().cookies, 0.0);
    }

    #[test]
    fn frame_produces() {
        let mut game = new_game();
        bake(&mut game, 15);
        game.handle_input(&InputEvent::Key('1'), T0);
        game.frame(T0 + 10_000.0);
        assert!((game.session().state().cookies - 1.0).abs() < 1e-9);
    }
}
