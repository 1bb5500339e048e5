use std::path::PathBuf;
use std::sync::OnceLock;

use rusqlite::Connection;
use uuid::Uuid;

use crate::adapters::db::{open_connection, run_migrations};

const DEFAULT_TEMPLATE_PATH: &str = "./data/evadoom_test.db";
const TEST_DB_DIR: &str = "./target/testdb";

/// Opens a private copy of the migrated template database.
pub fn open_test_connection(test_name: &str) -> Connection {
    let template = ensure_template_db();
    let test_db_path = PathBuf::from(TEST_DB_DIR).join(format!("{test_name}-{}.sqlite", Uuid::new_v4()));

    std::fs::create_dir_all(TEST_DB_DIR).expect("test db dir should be creatable");
    std::fs::copy(template, &test_db_path).expect("template db should be copied");
    open_connection(test_db_path.to_string_lossy().as_ref()).expect("test db should open")
}

fn ensure_template_db() -> &'static PathBuf {
    static TEMPLATE_PATH: OnceLock<PathBuf> = OnceLock::new();

    TEMPLATE_PATH.get_or_init(|| {
        let template_path = std::env::var("TEST_DB_TEMPLATE_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH));

        if let Some(parent) = template_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).expect("template parent dir should be creatable");
        }

        let mut connection =
            open_connection(template_path.to_string_lossy().as_ref()).expect("template db opens");
        run_migrations(&mut connection).expect("template migrations should succeed");

        template_path
    })
}
