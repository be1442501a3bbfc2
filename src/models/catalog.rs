//! Recognized category names
//!
//! Offered as input assistance only. Categories on transactions are free
//! text and are never validated against this list.

use super::transaction::TransactionType;

/// A recognized category and its suggested subcategories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCategory {
    pub name: &'static str,
    pub subcategories: &'static [&'static str],
}

const INCOME_CATEGORIES: &[CatalogCategory] = &[
    CatalogCategory {
        name: "Salary",
        subcategories: &["Regular Salary", "Overtime", "Bonus", "Commission"],
    },
    CatalogCategory {
        name: "Business",
        subcategories: &["Freelance", "Consulting", "Sales", "Services"],
    },
    CatalogCategory {
        name: "Investments",
        subcategories: &["Dividends", "Interest", "Capital Gains", "Rental Income"],
    },
    CatalogCategory {
        name: "Other",
        subcategories: &["Gifts", "Refunds", "Government Benefits", "Side Hustle"],
    },
];

const EXPENSE_CATEGORIES: &[CatalogCategory] = &[
    CatalogCategory {
        name: "Housing",
        subcategories: &[
            "Rent",
            "Mortgage",
            "Property Tax",
            "Home Insurance",
            "Utilities",
            "Maintenance",
        ],
    },
    CatalogCategory {
        name: "Transportation",
        subcategories: &[
            "Car Payment",
            "Gas",
            "Insurance",
            "Maintenance",
            "Public Transit",
            "Parking",
        ],
    },
    CatalogCategory {
        name: "Food",
        subcategories: &["Groceries", "Restaurants", "Fast Food", "Coffee", "Delivery"],
    },
    CatalogCategory {
        name: "Healthcare",
        subcategories: &["Insurance", "Doctor Visits", "Medications", "Dental", "Vision"],
    },
    CatalogCategory {
        name: "Entertainment",
        subcategories: &["Movies", "Concerts", "Gaming", "Hobbies", "Subscriptions"],
    },
    CatalogCategory {
        name: "Shopping",
        subcategories: &["Clothing", "Electronics", "Home Goods", "Personal Care", "Gifts"],
    },
    CatalogCategory {
        name: "Education",
        subcategories: &["Tuition", "Books", "Courses", "Training", "Certification"],
    },
    CatalogCategory {
        name: "Other",
        subcategories: &[
            "Bank Fees",
            "Professional Services",
            "Donations",
            "Miscellaneous",
        ],
    },
];

/// Recognized categories for a transaction type
pub fn categories_for(transaction_type: TransactionType) -> &'static [CatalogCategory] {
    match transaction_type {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
    }
}

/// Whether `category` is a recognized name for the type (exact match)
pub fn is_recognized(transaction_type: TransactionType, category: &str) -> bool {
    categories_for(transaction_type)
        .iter()
        .any(|c| c.name == category)
}

/// Suggested subcategories for a recognized category
pub fn subcategories_of(
    transaction_type: TransactionType,
    category: &str,
) -> Option<&'static [&'static str]> {
    categories_for(transaction_type)
        .iter()
        .find(|c| c.name == category)
        .map(|c| c.subcategories)
}
