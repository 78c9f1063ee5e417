//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::CustomWindow;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add(db: &Database, amount: f64, category: Category, on: NaiveDate) -> i64 {
        db.insert_expense(&NewExpense::new(amount, category, on))
            .unwrap()
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.all_expenses().unwrap().is_empty());
        assert_eq!(db.count_expenses().unwrap(), 0);
    }

    #[test]
    fn test_unencrypted_db_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.db");
        let db = Database::new_unencrypted(path.to_str().unwrap()).unwrap();

        assert_eq!(db.path(), path.to_str().unwrap());
        assert!(!db.is_encrypted());
    }

    #[test]
    fn test_encrypted_db_reopens_with_same_passphrase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new_with_key(path, Some("correct horse")).unwrap();
            add(&db, 12.0, Category::Bills, date(2024, 1, 1));
        }

        let db = Database::new_with_key(path, Some("correct horse")).unwrap();
        assert!(db.is_encrypted());
        assert_eq!(db.count_expenses().unwrap(), 1);

        assert!(Database::new_with_key(path, Some("wrong passphrase")).is_err());
    }

    #[test]
    fn test_expenses_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('expenses') WHERE name IN ('id', 'amount', 'category', 'date', 'note', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 6, "expenses table should have 6 expected columns");
    }

    #[test]
    fn test_negative_amount_rejected_by_schema() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result = conn.execute(
            "INSERT INTO expenses (amount, category, date) VALUES (-5, 'Food', '2024-01-01')",
            [],
        );
        assert!(result.is_err(), "CHECK constraint should reject negative amounts");
    }

    #[test]
    fn test_expense_crud() {
        let db = Database::in_memory().unwrap();

        let id = db
            .insert_expense(
                &NewExpense::new(42.5, Category::Food, date(2024, 1, 15)).with_note("Lunch"),
            )
            .unwrap();
        assert!(id > 0);

        let mut expense = db.get_expense(id).unwrap().unwrap();
        assert_eq!(expense.amount, 42.5);
        assert_eq!(expense.category, Category::Food);
        assert_eq!(expense.date, date(2024, 1, 15));
        assert_eq!(expense.note, "Lunch");

        expense.amount = 50.0;
        expense.category = Category::Entertainment;
        expense.note = String::new();
        db.update_expense(&expense).unwrap();

        let updated = db.get_expense(id).unwrap().unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.amount, 50.0);
        assert_eq!(updated.category, Category::Entertainment);
        assert!(updated.note.is_empty());

        db.delete_expense(id).unwrap();
        assert!(db.get_expense(id).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_expense_is_not_found() {
        let db = Database::in_memory().unwrap();
        let id = add(&db, 1.0, Category::Bills, date(2024, 1, 1));
        let mut expense = db.get_expense(id).unwrap().unwrap();
        expense.id = 9999;

        let result = db.update_expense(&expense);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_missing_expense_is_not_found() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(db.delete_expense(1), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_insert_rejects_negative_amount() {
        let db = Database::in_memory().unwrap();
        let result = db.insert_expense(&NewExpense::new(-3.0, Category::Food, date(2024, 1, 1)));
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert_eq!(db.count_expenses().unwrap(), 0);
    }

    #[test]
    fn test_all_expenses_newest_first() {
        let db = Database::in_memory().unwrap();
        add(&db, 1.0, Category::Food, date(2024, 1, 1));
        add(&db, 2.0, Category::Food, date(2024, 3, 1));
        add(&db, 3.0, Category::Food, date(2024, 2, 1));

        let dates: Vec<_> = db.all_expenses().unwrap().iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 3, 1), date(2024, 2, 1), date(2024, 1, 1)]
        );
    }

    #[test]
    fn test_same_day_ties_break_by_newest_id() {
        let db = Database::in_memory().unwrap();
        let first = add(&db, 1.0, Category::Food, date(2024, 1, 1));
        let second = add(&db, 2.0, Category::Food, date(2024, 1, 1));

        let ids: Vec<_> = db.all_expenses().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn test_expenses_in_range_inclusive() {
        let db = Database::in_memory().unwrap();
        add(&db, 10.0, Category::Food, date(2023, 12, 31));
        let inside = add(&db, 20.0, Category::Food, date(2024, 1, 15));
        add(&db, 30.0, Category::Food, date(2024, 2, 1));

        let result = db
            .expenses_in_range(date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, inside);

        // Bounds are inclusive on both ends
        let result = db
            .expenses_in_range(date(2023, 12, 31), date(2024, 2, 1))
            .unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_expenses_by_category_exact_match() {
        let db = Database::in_memory().unwrap();
        add(&db, 10.0, Category::Food, date(2024, 1, 1));
        add(&db, 20.0, Category::Health, date(2024, 1, 2));
        add(&db, 30.0, Category::Food, date(2024, 1, 3));

        let food = db.expenses_by_category(Category::Food).unwrap();
        assert_eq!(food.len(), 2);
        assert!(food.iter().all(|e| e.category == Category::Food));
        assert_eq!(food[0].date, date(2024, 1, 3));

        assert!(db.expenses_by_category(Category::Bills).unwrap().is_empty());
    }

    #[test]
    fn test_total_in_range() {
        let db = Database::in_memory().unwrap();
        add(&db, 10.25, Category::Food, date(2024, 1, 1));
        add(&db, 20.5, Category::Bills, date(2024, 1, 31));
        add(&db, 99.0, Category::Bills, date(2024, 2, 1));

        let total = db
            .total_in_range(date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();
        assert_eq!(total, Some(30.75));
    }

    #[test]
    fn test_total_in_empty_range_is_none() {
        let db = Database::in_memory().unwrap();
        add(&db, 10.0, Category::Food, date(2024, 1, 1));

        let total = db
            .total_in_range(date(2025, 1, 1), date(2025, 1, 31))
            .unwrap();
        assert_eq!(total, None);
    }

    #[test]
    fn test_category_totals_sorted_by_amount() {
        let db = Database::in_memory().unwrap();
        add(&db, 5.0, Category::Food, date(2024, 1, 1));
        add(&db, 7.0, Category::Food, date(2024, 1, 2));
        add(&db, 40.0, Category::Bills, date(2024, 1, 3));
        add(&db, 1.0, Category::Health, date(2024, 1, 4));
        add(&db, 500.0, Category::Bills, date(2024, 2, 1));

        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31));
        let totals = db.category_totals(window).unwrap();
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].category, Category::Bills);
        assert_eq!(totals[0].amount, 40.0);
        assert_eq!(totals[1].category, Category::Food);
        assert_eq!(totals[1].amount, 12.0);
        assert_eq!(totals[1].count, 2);
        assert_eq!(totals[2].category, Category::Health);
    }

    #[test]
    fn test_custom_window_persistence() {
        let db = Database::in_memory().unwrap();
        assert!(db.load_custom_window().unwrap().is_none());

        let window = CustomWindow::starting(date(2024, 1, 15));
        db.save_custom_window(&window).unwrap();
        assert_eq!(db.load_custom_window().unwrap(), Some(window));

        // Overwrite keeps a single row per key
        let later = CustomWindow::starting(date(2024, 2, 15));
        db.save_custom_window(&later).unwrap();
        assert_eq!(db.load_custom_window().unwrap(), Some(later));

        db.clear_custom_window().unwrap();
        assert!(db.load_custom_window().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_custom_window_is_invalid_data() {
        let db = Database::in_memory().unwrap();
        db.set_setting("custom_window.start", "not-a-date").unwrap();
        assert!(matches!(
            db.load_custom_window(),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_last_filter_per_kind() {
        let db = Database::in_memory().unwrap();
        assert!(db.load_last_filter(FilterKind::Category).unwrap().is_none());

        let food = ExpenseFilter::category(Category::Food);
        let range = ExpenseFilter::date_range(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        db.save_last_filter(&food).unwrap();
        db.save_last_filter(&range).unwrap();

        assert_eq!(
            db.load_last_filter(FilterKind::Category).unwrap(),
            Some(food.clone())
        );
        assert_eq!(
            db.load_last_filter(FilterKind::DateRange).unwrap(),
            Some(range.clone())
        );

        let health = ExpenseFilter::category(Category::Health);
        db.save_last_filter(&health).unwrap();
        assert_eq!(
            db.load_last_filter(FilterKind::Category).unwrap(),
            Some(health.clone())
        );

        let all = db.load_last_filters().unwrap();
        assert_eq!(all, vec![range, health]);
    }
}
