//! JSON output formatting.

use bookverse_core::{Book, BorrowEvent};

/// Convert a ledger row to JSON. Absent dates are `null`.
pub fn event_json(event: &BorrowEvent, date_format: &str) -> serde_json::Value {
    let render = |date: Option<chrono::NaiveDate>| date.map(|d| d.format(date_format).to_string());
    serde_json::json!({
        "username": event.username,
        "book_id": event.book_id,
        "action": event.action(),
        "borrow_date": render(event.borrow_date),
        "return_date": render(event.return_date),
    })
}

/// Books as a JSON array, one object per row in file order.
pub fn books_json(books: &[Book]) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(books)
}

pub fn events_json(events: &[BorrowEvent], date_format: &str) -> Vec<serde_json::Value> {
    events
        .iter()
        .map(|event| event_json(event, date_format))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_books_json_uses_field_names() {
        let books = vec![bookverse_core::NewBook::new(1, "Dune", "Herbert", "SciFi", 2).into_book()];
        let value = books_json(&books).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["available_copies"], 2);
        assert_eq!(value[0]["title"], "Dune");
    }

    #[test]
    fn test_event_json_uses_null_for_placeholder() {
        let event = BorrowEvent::borrowed("bob", 3, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let value = event_json(&event, "%Y-%m-%d");
        assert_eq!(value["borrow_date"], "2024-02-01");
        assert!(value["return_date"].is_null());
        assert_eq!(value["action"], "borrow");
    }
}
