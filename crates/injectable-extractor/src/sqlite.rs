//! SQLite-backed template catalog.

use std::path::Path;

use injectable_types::{InjectionTemplate, Route};
use rusqlite::{params, Connection, OptionalExtension};

use crate::store::{StoredTemplate, TemplateStore};
use crate::types::{StoreError, StoreResult};

// Only run against a database without the table; existing catalogs are used as
// they are.
const SCHEMA: &str = "
    CREATE TABLE injection_templates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        template_name TEXT NOT NULL,
        injection_name TEXT NOT NULL,
        generic_name TEXT,
        dose TEXT,
        route TEXT NOT NULL DEFAULT 'IV/IM',
        frequency TEXT NOT NULL DEFAULT 'As directed',
        duration TEXT NOT NULL DEFAULT 'As directed',
        source_code TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE UNIQUE INDEX idx_injection_templates_template_name
        ON injection_templates(template_name);
";

/// Template catalog stored in a SQLite database.
///
/// The `injection_templates` table, with a unique index on `template_name`, is
/// created if it does not exist yet. An existing table is never altered.
pub struct SqliteTemplateStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteTemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTemplateStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl SqliteTemplateStore {
    /// Opens (or creates) the catalog database at `path`.
    ///
    /// # Errors
    /// Fails if the database cannot be opened or the table cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory catalog.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        let exists: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'injection_templates'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        if exists.is_none() {
            tracing::info!("Creating injection_templates table");
            conn.execute_batch(&format!("BEGIN;{SCHEMA}COMMIT;"))?;
        }
        Ok(Self { conn })
    }

    /// Returns all rows ordered by insertion.
    pub fn list_templates(&self) -> StoreResult<Vec<StoredTemplate>> {
        let mut stmt = self.conn.prepare(
            "SELECT template_name, injection_name, generic_name, dose, route,
                    frequency, duration, source_code, is_active
             FROM injection_templates
             ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, bool>(8)?,
            ))
        })?;

        let mut templates = Vec::new();
        for row in rows {
            let (
                template_name,
                injection_name,
                generic_name,
                dose,
                route,
                frequency,
                duration,
                source_code,
                is_active,
            ) = row?;
            let route = route
                .parse::<Route>()
                .map_err(|e| StoreError::InvalidRoute(e.0))?;

            templates.push(StoredTemplate {
                template: InjectionTemplate {
                    template_name,
                    injection_name,
                    generic_name,
                    dose,
                    route,
                    frequency,
                    duration,
                    source_code: source_code.unwrap_or_default(),
                },
                is_active,
            });
        }

        Ok(templates)
    }
}

impl TemplateStore for SqliteTemplateStore {
    fn existing_keys(&self) -> StoreResult<Vec<(String, Option<String>)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT injection_name, dose FROM injection_templates")?;
        let keys = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn template_exists(&self, template_name: &str) -> StoreResult<bool> {
        let exists: Option<i64> = self
            .conn
            .prepare_cached("SELECT 1 FROM injection_templates WHERE template_name = ?1 LIMIT 1")?
            .query_row([template_name], |row| row.get(0))
            .optional()?;
        Ok(exists.is_some())
    }

    fn insert_template(&mut self, template: &InjectionTemplate) -> StoreResult<()> {
        self.conn
            .prepare_cached(
                "INSERT INTO injection_templates (
                    template_name,
                    injection_name,
                    generic_name,
                    dose,
                    route,
                    frequency,
                    duration,
                    source_code,
                    is_active
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
            )?
            .execute(params![
                template.template_name,
                template.injection_name,
                template.generic_name,
                template.dose,
                template.route.as_str(),
                template.frequency,
                template.duration,
                template.source_code,
            ])?;
        Ok(())
    }

    fn count_templates(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM injection_templates", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, dose: Option<&str>, route: Route) -> InjectionTemplate {
        InjectionTemplate::new(name, dose.map(str::to_string), route, "12345")
    }

    #[test]
    fn test_insert_and_exists() {
        let mut store = SqliteTemplateStore::open_in_memory().unwrap();
        let heparin = template("Heparin", Some("5000units/mL"), Route::Subcutaneous);

        assert!(!store.template_exists("Heparin 5000units/mL").unwrap());
        store.insert_template(&heparin).unwrap();
        assert!(store.template_exists("Heparin 5000units/mL").unwrap());
        assert_eq!(store.count_templates().unwrap(), 1);

        let rows = store.list_templates().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].template, heparin);
        assert!(rows[0].is_active);
    }

    #[test]
    fn test_existing_keys_keep_null_dose() {
        let mut store = SqliteTemplateStore::open_in_memory().unwrap();
        store
            .insert_template(&template("Ceftriaxone", None, Route::IvOrIm))
            .unwrap();
        store
            .insert_template(&template("Ceftriaxone", Some("1g"), Route::Intravenous))
            .unwrap();

        let mut keys = store.existing_keys().unwrap();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ("Ceftriaxone".to_string(), None),
                ("Ceftriaxone".to_string(), Some("1g".to_string())),
            ]
        );
    }

    #[test]
    fn test_duplicate_template_name_is_an_error() {
        let mut store = SqliteTemplateStore::open_in_memory().unwrap();
        let morphine = template("Morphine", Some("10mg/mL"), Route::IvOrIm);
        store.insert_template(&morphine).unwrap();
        assert!(matches!(
            store.insert_template(&morphine),
            Err(StoreError::Sqlite(_))
        ));
    }

    #[test]
    fn test_existing_table_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE injection_templates (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    template_name TEXT NOT NULL,
                    injection_name TEXT NOT NULL,
                    generic_name TEXT,
                    dose TEXT,
                    route TEXT NOT NULL DEFAULT 'IV/IM',
                    frequency TEXT NOT NULL DEFAULT 'As directed',
                    duration TEXT NOT NULL DEFAULT 'As directed',
                    source_code TEXT,
                    is_active INTEGER NOT NULL DEFAULT 1
                );
                INSERT INTO injection_templates (template_name, injection_name, dose)
                    VALUES ('Morphine 10mg', 'Morphine', '10mg');
                INSERT INTO injection_templates (template_name, injection_name, dose)
                    VALUES ('Morphine 10mg', 'Morphine', '10mg');",
            )
            .unwrap();
        }

        let store = SqliteTemplateStore::open(&path).unwrap();
        assert_eq!(store.count_templates().unwrap(), 2);
        assert!(store.template_exists("Morphine 10mg").unwrap());

        let indexes: i64 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index'
                 AND name = 'idx_injection_templates_template_name'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indexes, 0);
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        {
            let mut store = SqliteTemplateStore::open(&path).unwrap();
            store
                .insert_template(&template("Ketamine", Some("50mg/mL"), Route::IvOrIm))
                .unwrap();
        }
        let store = SqliteTemplateStore::open(&path).unwrap();
        assert_eq!(store.count_templates().unwrap(), 1);
    }

    #[test]
    fn test_unknown_route_is_reported() {
        let store = SqliteTemplateStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO injection_templates (template_name, injection_name, route)
                 VALUES ('X', 'X', 'Oral')",
                [],
            )
            .unwrap();
        assert!(matches!(
            store.list_templates(),
            Err(StoreError::InvalidRoute(route)) if route == "Oral"
        ));
    }
}
