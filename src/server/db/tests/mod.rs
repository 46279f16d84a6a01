mod bar;

use super::Database;

pub fn run_all_tests(db: &Database) {
    bar::run_bar_tests(db);
    bar::run_rollback_tests(db);
}
