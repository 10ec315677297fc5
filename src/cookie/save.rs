//! Cookie Bakery セーブ/ロード機能。
//!
//! ## フォーマット方針
//!
//! - スナップショットは JSON 1 本。キー名はブラウザ版 (`cookieClickerSave`) と
//!   同じ camelCase なので、既存のセーブをそのまま読み込める。
//! - バージョンフィールドは持たない。カタログは id で突き合わせ、
//!   `purchased` / `owned` だけを取り込む。未知の id は無視し、
//!   セーブに無い項目は初期値のまま。
//! - `cookiesPerSecond` は参考値として保存するが、読み込み時はカタログから再計算する。

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::console;

use super::logic;
use super::state::CookieState;

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
pub const STORAGE_KEY: &str = "cookieClickerSave";

/// オートセーブの間隔 (ms)。
pub const AUTOSAVE_INTERVAL_MS: f64 = 60_000.0;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("storage is not available")]
    Unavailable,
    #[error("failed to read save: {0}")]
    Read(String),
    #[error("failed to write save: {0}")]
    Write(String),
    #[error("save data is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to encode save: {0}")]
    Encode(#[source] serde_json::Error),
}

/// セーブの書き込み先。ブラウザでは localStorage、テストではメモリ。
pub trait SaveStore {
    /// 保存済みの JSON。未保存なら `Ok(None)`。
    fn read(&self) -> Result<Option<String>, SaveError>;
    fn write(&self, json: &str) -> Result<(), SaveError>;
    fn clear(&self) -> Result<(), SaveError>;
}

impl<T: SaveStore + ?Sized> SaveStore for Rc<T> {
    fn read(&self) -> Result<Option<String>, SaveError> {
        (**self).read()
    }

    fn write(&self, json: &str) -> Result<(), SaveError> {
        (**self).write(json)
    }

    fn clear(&self) -> Result<(), SaveError> {
        (**self).clear()
    }
}

/// メモリ上のストア。ホスト環境とテスト用。
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
#[derive(Default)]
pub struct MemoryStore {
    data: RefCell<Option<String>>,
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_contents(json: &str) -> Self {
        Self {
            data: RefCell::new(Some(json.to_string())),
        }
    }

    #[cfg(test)]
    pub fn contents(&self) -> Option<String> {
        self.data.borrow().clone()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, SaveError> {
        Ok(self.data.borrow().clone())
    }

    fn write(&self, json: &str) -> Result<(), SaveError> {
        *self.data.borrow_mut() = Some(json.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SaveError> {
        *self.data.borrow_mut() = None;
        Ok(())
    }
}

/// ブラウザの localStorage。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(SaveError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorageStore {
    fn read(&self) -> Result<Option<String>, SaveError> {
        Self::storage()?
            .get_item(STORAGE_KEY)
            .map_err(|e| SaveError::Read(format!("{e:?}")))
    }

    fn write(&self, json: &str) -> Result<(), SaveError> {
        Self::storage()?
            .set_item(STORAGE_KEY, json)
            .map_err(|e| SaveError::Write(format!("{e:?}")))
    }

    fn clear(&self) -> Result<(), SaveError> {
        Self::storage()?
            .remove_item(STORAGE_KEY)
            .map_err(|e| SaveError::Write(format!("{e:?}")))
    }
}

/// シリアライズ用のスナップショット。
#[derive(Serialize, Deserialize, Debug)]
#[serde(default, rename_all = "camelCase")]
struct SaveData {
    cookies: f64,
    cookies_per_click: f64,
    cookies_per_second: f64,
    #[serde(rename = "totalCookiesBaked")]
    cookies_all_time: f64,
    upgrades: Vec<UpgradeRecord>,
    #[serde(rename = "buildings")]
    generators: Vec<GeneratorRecord>,
    last_saved: f64,
}

impl Default for SaveData {
    /// 欠けたフィールドは新規ゲームの値で補完する。
    fn default() -> Self {
        extract_save(&CookieState::new(), 0.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct UpgradeRecord {
    id: String,
    name: String,
    description: String,
    cost: u64,
    multiplier: f64,
    purchased: bool,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct GeneratorRecord {
    id: String,
    name: String,
    description: String,
    base_cost: f64,
    #[serde(rename = "cookiesPerSecond")]
    unit_yield: f64,
    owned: u32,
}

/// CookieState からセーブ用データを抽出する。
fn extract_save(state: &CookieState, now_ms: f64) -> SaveData {
    SaveData {
        cookies: state.cookies,
        cookies_per_click: state.cookies_per_click,
        cookies_per_second: state.cookies_per_second,
        cookies_all_time: state.cookies_all_time,
        upgrades: state
            .upgrades
            .iter()
            .map(|u| UpgradeRecord {
                id: u.id.clone(),
                name: u.name.clone(),
                description: u.description.clone(),
                cost: u.cost,
                multiplier: u.multiplier,
                purchased: u.purchased,
            })
            .collect(),
        generators: state
            .generators
            .iter()
            .map(|g| GeneratorRecord {
                id: g.id.clone(),
                name: g.name.clone(),
                description: g.description.clone(),
                base_cost: g.base_cost,
                unit_yield: g.unit_yield,
                owned: g.owned,
            })
            .collect(),
        last_saved: now_ms,
    }
}

/// セーブデータを CookieState に復元する。
/// カタログは id で突き合わせ、定義に無い id は無視する。
fn apply_save(state: &mut CookieState, save: &SaveData) {
    state.cookies = save.cookies.max(0.0);
    state.cookies_all_time = save.cookies_all_time.max(0.0);

    for record in &save.upgrades {
        if let Some(u) = state.upgrades.iter_mut().find(|u| u.id == record.id) {
            u.purchased = record.purchased;
        }
    }

    for record in &save.generators {
        if let Some(g) = state.generators.iter_mut().find(|g| g.id == record.id) {
            g.owned = record.owned;
        }
    }

    // クリック倍率が壊れていたら購入済みアップグレードから組み立て直す
    state.cookies_per_click = if save.cookies_per_click > 0.0 {
        save.cookies_per_click
    } else {
        state
            .upgrades
            .iter()
            .filter(|u| u.purchased)
            .map(|u| u.multiplier)
            .product()
    };

    logic::recompute_cps(state);
    state.last_saved_ms = save.last_saved;
}

/// スナップショットを JSON にする。`lastSaved` には `now_ms` を入れる。
pub fn encode(state: &CookieState, now_ms: f64) -> Result<String, SaveError> {
    serde_json::to_string(&extract_save(state, now_ms)).map_err(SaveError::Encode)
}

/// JSON から新しい CookieState を組み立てる。
pub fn decode(json: &str) -> Result<CookieState, SaveError> {
    let save: SaveData = serde_json::from_str(json).map_err(SaveError::Corrupt)?;
    let mut state = CookieState::new();
    apply_save(&mut state, &save);
    Ok(state)
}

/// ゲーム状態を保存する。
pub fn persist(store: &dyn SaveStore, state: &CookieState, now_ms: f64) -> Result<(), SaveError> {
    let json = encode(state, now_ms)?;
    store.write(&json)
}

/// 保存済みのゲーム状態を読み込む。
/// 未保存・読み込み失敗・パースエラーの場合は None を返す（新規ゲームになる）。
pub fn load(store: &dyn SaveStore) -> Option<CookieState> {
    let json = match store.read() {
        Ok(Some(j)) => j,
        Ok(None) => return None,
        Err(e) => {
            console::warn(&format!("セーブの読み込みに失敗: {e}"));
            return None;
        }
    };

    match decode(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            console::warn(&format!("セーブデータのパースに失敗（破棄します）: {e}"));
            // 壊れたデータを削除
            let _ = store.clear();
            None
        }
    }
}
