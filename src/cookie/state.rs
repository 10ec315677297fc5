/// Cookie Bakery state definitions.

/// A one-time purchase that multiplies cookies per click.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: u64,
    /// Factor applied to cookies per click when bought (e.g. 2.0 = double).
    pub multiplier: f64,
    pub purchased: bool,
}

impl Upgrade {
    fn new(id: &str, name: &str, description: &str, cost: u64, multiplier: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            cost,
            multiplier,
            purchased: false,
        }
    }
}

/// A building that bakes cookies passively. Can be bought repeatedly.
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price of the first unit.
    pub base_cost: f64,
    /// Cookies per second baked by a single unit.
    pub unit_yield: f64,
    pub owned: u32,
}

impl Generator {
    fn new(id: &str, name: &str, description: &str, base_cost: f64, unit_yield: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            base_cost,
            unit_yield,
            owned: 0,
        }
    }
}

/// Default upgrade catalog, in shop order.
pub fn default_upgrades() -> Vec<Upgrade> {
    vec![
        Upgrade::new(
            "cursor1",
            "Reinforced Index Finger",
            "Doubles the cookies per click",
            100,
            2.0,
        ),
        Upgrade::new(
            "cursor2",
            "Carpal Tunnel Prevention Cream",
            "Doubles the cookies per click again",
            500,
            2.0,
        ),
        Upgrade::new(
            "cursor3",
            "Ambidextrous Clicking",
            "Doubles the cookies per click again",
            2_000,
            2.0,
        ),
    ]
}

/// Default generator catalog, in shop order.
pub fn default_generators() -> Vec<Generator> {
    vec![
        Generator::new(
            "cursor",
            "Cursor",
            "Automatically clicks the cookie once every 10 seconds",
            15.0,
            0.1,
        ),
        Generator::new(
            "grandma",
            "Grandma",
            "A nice grandma to bake more cookies",
            100.0,
            1.0,
        ),
        Generator::new(
            "farm",
            "Farm",
            "Grows cookie plants from cookie seeds",
            1_100.0,
            8.0,
        ),
        Generator::new(
            "mine",
            "Mine",
            "Mines out cookie dough and chocolate chips",
            12_000.0,
            47.0,
        ),
    ]
}

/// Full economic state of a bakery. Everything here is persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct CookieState {
    /// Spendable cookies. Never negative.
    pub cookies: f64,
    /// Cookies per manual click (base 1.0).
    pub cookies_per_click: f64,
    /// Passive production, always the full sum over `generators`.
    pub cookies_per_second: f64,
    /// Every cookie ever credited, including production and catch-up.
    pub cookies_all_time: f64,
    /// Wall-clock ms of the last durable save.
    pub last_saved_ms: f64,
    pub upgrades: Vec<Upgrade>,
    pub generators: Vec<Generator>,
}

impl CookieState {
    pub fn new() -> Self {
        Self {
            cookies: 0.0,
            cookies_per_click: 1.0,
            cookies_per_second: 0.0,
            cookies_all_time: 0.0,
            last_saved_ms: 0.0,
            upgrades: default_upgrades(),
            generators: default_generators(),
        }
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn generator(&self, id: &str) -> Option<&Generator> {
        self.generators.iter().find(|g| g.id == id)
    }

    pub fn upgrade_index(&self, id: &str) -> Option<usize> {
        self.upgrades.iter().position(|u| u.id == id)
    }

    pub fn generator_index(&self, id: &str) -> Option<usize> {
        self.generators.iter().position(|g| g.id == id)
    }
}

impl Default for CookieState {
    fn default() -> Self {
        Self::new()
    }
}
