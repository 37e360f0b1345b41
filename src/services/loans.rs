//! Loan ledger: borrow and return against the catalog

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{Loan, LoanSummary},
        patron::Patron,
    },
    services::catalog::Catalog,
};

/// Lend one copy of `item_id` to `patron`.
///
/// A patron may hold several copies of the same item; each borrow records its
/// own loan and takes its own copy off the shelf.
pub fn borrow(
    patron: &mut Patron,
    catalog: &mut Catalog,
    item_id: i32,
    due_label: &str,
) -> AppResult<Loan> {
    catalog.decrement_availability(item_id)?;

    let loan = Loan {
        item_id,
        due_label: due_label.to_string(),
    };
    patron.active_loans.push(loan.clone());
    Ok(loan)
}

/// Take back one copy of `item_id` from `patron`, the oldest loan first.
pub fn return_item(patron: &mut Patron, catalog: &mut Catalog, item_id: i32) -> AppResult<Loan> {
    catalog.find_by_id(item_id)?;

    let position = patron
        .active_loans
        .iter()
        .position(|l| l.item_id == item_id)
        .ok_or(AppError::NotBorrowedByPatron)?;

    catalog.increment_availability(item_id)?;
    Ok(patron.active_loans.remove(position))
}

/// Borrowed titles with their due labels, computed from current state on every call
pub fn list_loans<'a>(
    patron: &'a Patron,
    catalog: &'a Catalog,
) -> impl Iterator<Item = LoanSummary> + 'a {
    patron.active_loans.iter().map(move |loan| LoanSummary {
        title: catalog
            .find_by_id(loan.item_id)
            .map(|item| item.title.clone())
            .unwrap_or_else(|_| format!("Item #{}", loan.item_id)),
        due_label: loan.due_label.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        item::{seed_items, Item},
        patron::Credential,
    };

    fn setup() -> (Patron, Catalog) {
        let catalog: Catalog = seed_items().into_iter().collect();
        (Patron::new(1, "alice", Credential::new("password123")), catalog)
    }

    fn available(catalog: &Catalog, id: i32) -> i32 {
        catalog.find_by_id(id).unwrap().available
    }

    #[test]
    fn test_borrow_then_return_restores_shelf() {
        let (mut alice, mut catalog) = setup();

        borrow(&mut alice, &mut catalog, 2, "2024-11-20").unwrap();
        assert_eq!(available(&catalog, 2), 2);
        assert_eq!(alice.copies_held(2), 1);

        let loan = return_item(&mut alice, &mut catalog, 2).unwrap();
        assert_eq!(loan.due_label, "2024-11-20");
        assert_eq!(available(&catalog, 2), 3);
        assert!(alice.active_loans.is_empty());
    }

    #[test]
    fn test_borrow_unavailable_leaves_state_unchanged() {
        let (mut alice, mut catalog) = setup();
        borrow(&mut alice, &mut catalog, 10, "a").unwrap();

        let err = borrow(&mut alice, &mut catalog, 10, "b").unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
        assert_eq!(available(&catalog, 10), 0);
        assert_eq!(alice.active_loans.len(), 1);
        assert_eq!(alice.active_loans[0].due_label, "a");
    }

    #[test]
    fn test_borrow_unknown_item() {
        let (mut alice, mut catalog) = setup();
        assert!(matches!(
            borrow(&mut alice, &mut catalog, 99, "x"),
            Err(AppError::NotFound(_))
        ));
        assert!(alice.active_loans.is_empty());
    }

    #[test]
    fn test_return_not_borrowed() {
        let (mut alice, mut catalog) = setup();
        let err = return_item(&mut alice, &mut catalog, 4).unwrap_err();
        assert!(matches!(err, AppError::NotBorrowedByPatron));
        assert_eq!(available(&catalog, 4), 4);

        assert!(matches!(
            return_item(&mut alice, &mut catalog, 99),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_second_borrow_records_second_loan() {
        let (mut alice, mut catalog) = setup();

        borrow(&mut alice, &mut catalog, 3, "first").unwrap();
        assert_eq!(available(&catalog, 3), 1);
        borrow(&mut alice, &mut catalog, 3, "second").unwrap();
        assert_eq!(available(&catalog, 3), 0);
        assert_eq!(alice.copies_held(3), 2);

        let returned = return_item(&mut alice, &mut catalog, 3).unwrap();
        assert_eq!(returned.due_label, "first");
        assert_eq!(available(&catalog, 3), 1);
        assert_eq!(alice.copies_held(3), 1);
    }

    #[test]
    fn test_other_patron_cannot_return() {
        let (mut alice, mut catalog) = setup();
        let mut bob = Patron::new(2, "bob", Credential::new("password456"));

        borrow(&mut alice, &mut catalog, 5, "x").unwrap();
        assert!(matches!(
            return_item(&mut bob, &mut catalog, 5),
            Err(AppError::NotBorrowedByPatron)
        ));
        assert_eq!(available(&catalog, 5), 5);
    }

    #[test]
    fn test_shelf_never_negative_over_mixed_sequence() {
        let (mut alice, mut catalog) = setup();
        let mut bob = Patron::new(2, "bob", Credential::new("password456"));

        for round in 0..6 {
            let _ = borrow(&mut alice, &mut catalog, 8, "a");
            let _ = borrow(&mut bob, &mut catalog, 8, "b");
            if round % 2 == 0 {
                let _ = return_item(&mut alice, &mut catalog, 8);
            }
            let item = catalog.find_by_id(8).unwrap();
            assert!(item.available >= 0);
            assert_eq!(
                item.on_loan() as usize,
                alice.copies_held(8) + bob.copies_held(8)
            );
        }
    }

    #[test]
    fn test_list_loans_is_recomputed() {
        let mut catalog = Catalog::new();
        catalog.add(Item::new(1, "Moby Dick", "Herman Melville", 2)).unwrap();
        let mut alice = Patron::new(1, "alice", Credential::new("pw"));

        assert_eq!(list_loans(&alice, &catalog).count(), 0);
        borrow(&mut alice, &mut catalog, 1, "2024-11-20").unwrap();

        let loans: Vec<String> = list_loans(&alice, &catalog).map(|l| l.to_string()).collect();
        assert_eq!(loans, vec!["Moby Dick (Return by: 2024-11-20)".to_string()]);
        assert_eq!(list_loans(&alice, &catalog).count(), 1);
    }
}
