use serde_json::Value;

/// The closed set of tables reachable through the generic CRUD routes.
///
/// Every request-supplied table name must resolve through this enum before
/// any SQL is built, and every submitted column name must match the table's
/// column list. Identifiers taken from a request are never interpolated
/// into query text; the canonical `&'static str` from here is used instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownTable {
    History,
    Weapons,
    Items,
    TechnicalItems,
}

impl KnownTable {
    pub const ALL: [KnownTable; 4] = [
        KnownTable::History,
        KnownTable::Weapons,
        KnownTable::Items,
        KnownTable::TechnicalItems,
    ];

    /// Resolve a request-supplied table name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "history" => Some(KnownTable::History),
            "weapons" => Some(KnownTable::Weapons),
            "items" => Some(KnownTable::Items),
            "technical_items" => Some(KnownTable::TechnicalItems),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KnownTable::History => "history",
            KnownTable::Weapons => "weapons",
            KnownTable::Items => "items",
            KnownTable::TechnicalItems => "technical_items",
        }
    }

    /// The primary-key column gating update and delete.
    pub fn primary_key(self) -> &'static str {
        match self {
            KnownTable::History => "serial",
            KnownTable::Weapons => "weapon_id",
            KnownTable::Items => "item_id",
            KnownTable::TechnicalItems => "tech_item_id",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            KnownTable::History => {
                &["serial", "item_name", "action", "batch_number", "recorded_at"]
            }
            KnownTable::Weapons => &["weapon_id", "name", "category", "cost", "quantity"],
            KnownTable::Items => &["item_id", "name", "category", "cost", "quantity"],
            KnownTable::TechnicalItems => {
                &["tech_item_id", "name", "model", "cost", "quantity"]
            }
        }
    }

    /// Map a request-supplied column name to its canonical static form,
    /// or `None` when the column is not part of this table.
    pub fn column(self, name: &str) -> Option<&'static str> {
        self.columns().iter().find(|c| **c == name).copied()
    }

    /// SQL statement creating this table with its defined schema.
    pub fn create_table(self) -> &'static str {
        match self {
            KnownTable::History => {
                "CREATE TABLE IF NOT EXISTS history (
                    serial INTEGER PRIMARY KEY,
                    item_name TEXT,
                    action TEXT,
                    batch_number TEXT,
                    recorded_at TEXT
                )"
            }
            KnownTable::Weapons => {
                "CREATE TABLE IF NOT EXISTS weapons (
                    weapon_id INTEGER PRIMARY KEY,
                    name TEXT UNIQUE,
                    category TEXT,
                    cost REAL,
                    quantity INTEGER
                )"
            }
            KnownTable::Items => {
                "CREATE TABLE IF NOT EXISTS items (
                    item_id INTEGER PRIMARY KEY,
                    name TEXT,
                    category TEXT,
                    cost REAL,
                    quantity INTEGER
                )"
            }
            KnownTable::TechnicalItems => {
                "CREATE TABLE IF NOT EXISTS technical_items (
                    tech_item_id INTEGER PRIMARY KEY,
                    name TEXT,
                    model TEXT,
                    cost REAL,
                    quantity INTEGER
                )"
            }
        }
    }
}

/// All rows of one table, columns discovered from the result set.
#[derive(Debug)]
pub struct TableRows {
    pub table: KnownTable,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}
