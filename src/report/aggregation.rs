//! Transaction data aggregation for the dashboard and the assistant.
//!
//! Provides pure functions that turn the transaction history into overall
//! income/expense totals, per-category expense totals, and a per-month
//! income/expense/balance trend. No I/O happens here; handlers load the
//! transactions first and pass them in. Every function can be called
//! repeatedly on the same input and returns identical results.

use time::{Date, Month};

use crate::{
    report::ordered_map::OrderedMap,
    transaction::{Transaction, TransactionKind},
};

/// The bucket label used for expenses recorded without a category.
pub(crate) const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Overall income and expense totals with their balance.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    /// Sum of all income amounts.
    pub(crate) income: f64,
    /// Sum of all expense amounts.
    pub(crate) expense: f64,
    /// `income - expense`. May be negative.
    pub(crate) balance: f64,
}

/// Total expense amount for one category.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryTotal {
    /// The category name, or [UNCATEGORIZED_LABEL].
    pub(crate) name: String,
    /// The summed expense amount for the category.
    pub(crate) value: f64,
}

/// Income, expenses, and balance for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthlyTotal {
    /// The month label, e.g. "Jan 2024".
    pub(crate) month: String,
    /// Sum of income amounts in the month.
    pub(crate) income: f64,
    /// Sum of expense amounts in the month.
    pub(crate) expense: f64,
    /// `income - expense` for the month.
    pub(crate) balance: f64,
}

/// Sums income and expense amounts over `transactions`.
///
/// Transactions with a kind other than income or expense contribute to
/// neither total. Never fails; empty input yields an all-zero summary.
pub(crate) fn summarize(transactions: &[Transaction]) -> Summary {
    let mut income = 0.0;
    let mut expense = 0.0;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => income += transaction.amount,
            TransactionKind::Expense => expense += transaction.amount,
            TransactionKind::Other(_) => {}
        }
    }

    Summary {
        income,
        expense,
        balance: income - expense,
    }
}

/// Sums expense amounts per category.
///
/// Expenses without a category (or with an empty one) all land in the
/// [UNCATEGORIZED_LABEL] bucket. Non-expense transactions are skipped.
///
/// # Returns
/// One entry per distinct category, in the order each category first appears
/// in `transactions`.
pub(crate) fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: OrderedMap<String, f64> = OrderedMap::new();

    for transaction in transactions {
        if transaction.kind != TransactionKind::Expense {
            continue;
        }

        let name = transaction
            .category
            .as_deref()
            .filter(|category| !category.is_empty())
            .unwrap_or(UNCATEGORIZED_LABEL);

        *totals.get_or_insert_with(name.to_owned(), || 0.0) += transaction.amount;
    }

    totals
        .into_entries()
        .into_iter()
        .map(|(name, value)| CategoryTotal { name, value })
        .collect()
}

/// Totals per calendar month used by the monthly trend.
struct MonthTotals {
    income: f64,
    expense: f64,
}

/// Sums income and expense amounts per calendar month.
///
/// Every transaction contributes its month to the output, so a month that
/// only contains transactions of an unknown kind still shows up, with zero
/// totals. The month balance is computed once the sums are complete.
///
/// # Returns
/// One entry per distinct month, labelled e.g. "Jan 2024", in the order each
/// month first appears in `transactions`.
pub(crate) fn monthly_trend(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut totals: OrderedMap<String, MonthTotals> = OrderedMap::new();

    for transaction in transactions {
        let entry = totals.get_or_insert_with(month_label(transaction.date), || MonthTotals {
            income: 0.0,
            expense: 0.0,
        });

        match transaction.kind {
            TransactionKind::Income => entry.income += transaction.amount,
            TransactionKind::Expense => entry.expense += transaction.amount,
            TransactionKind::Other(_) => {}
        }
    }

    totals
        .into_entries()
        .into_iter()
        .map(|(month, entry)| MonthlyTotal {
            month,
            income: entry.income,
            expense: entry.expense,
            balance: entry.income - entry.expense,
        })
        .collect()
}

/// Formats a date's month as a three-letter abbreviation with the year,
/// e.g. "Jan 2024".
pub(crate) fn month_label(date: Date) -> String {
    let month = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{month} {}", date.year())
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::transaction::{Transaction, TransactionKind};

    use super::{
        CategoryTotal, MonthlyTotal, UNCATEGORIZED_LABEL, category_totals, month_label,
        monthly_trend, summarize,
    };

    fn income(amount: f64, date: Date) -> Transaction {
        Transaction {
            id: 0,
            kind: TransactionKind::Income,
            amount,
            category: None,
            date,
            note: None,
        }
    }

    fn expense(amount: f64, category: &str, date: Date) -> Transaction {
        Transaction {
            id: 0,
            kind: TransactionKind::Expense,
            amount,
            category: Some(category.to_owned()),
            date,
            note: None,
        }
    }

    fn sample_history() -> Vec<Transaction> {
        vec![
            income(1000.0, date!(2024 - 01 - 05)),
            expense(300.0, "food", date!(2024 - 01 - 10)),
            expense(200.0, "food", date!(2024 - 02 - 01)),
        ]
    }

    #[test]
    fn summarize_computes_totals_and_balance() {
        let summary = summarize(&sample_history());

        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expense, 500.0);
        assert_eq!(summary.balance, 500.0);
    }

    #[test]
    fn summary_balance_is_income_minus_expense() {
        let transactions = vec![
            income(120.0, date!(2024 - 03 - 01)),
            expense(500.0, "rent", date!(2024 - 03 - 02)),
        ];

        let summary = summarize(&transactions);

        assert_eq!(summary.balance, summary.income - summary.expense);
        assert_eq!(summary.balance, -380.0);
    }

    #[test]
    fn empty_input_yields_zero_summary_and_empty_views() {
        let summary = summarize(&[]);

        assert_eq!(summary.income, 0.0);
        assert_eq!(summary.expense, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(category_totals(&[]), vec![]);
        assert_eq!(monthly_trend(&[]), vec![]);
    }

    #[test]
    fn category_totals_merge_repeated_categories() {
        let totals = category_totals(&sample_history());

        assert_eq!(
            totals,
            vec![CategoryTotal {
                name: "food".to_owned(),
                value: 500.0,
            }]
        );
    }

    #[test]
    fn category_names_are_unique_and_sum_to_total_expense() {
        let transactions = vec![
            expense(10.0, "food", date!(2024 - 01 - 01)),
            expense(20.0, "transport", date!(2024 - 01 - 02)),
            expense(30.0, "food", date!(2024 - 01 - 03)),
            income(999.0, date!(2024 - 01 - 04)),
        ];

        let totals = category_totals(&transactions);

        let mut names: Vec<&str> = totals.iter().map(|total| total.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), totals.len(), "duplicate category entries");

        let category_sum: f64 = totals.iter().map(|total| total.value).sum();
        assert_eq!(category_sum, summarize(&transactions).expense);
    }

    #[test]
    fn category_totals_preserve_first_seen_order() {
        let transactions = vec![
            expense(1.0, "food", date!(2024 - 01 - 01)),
            expense(50.0, "transport", date!(2024 - 01 - 02)),
            expense(2.0, "food", date!(2024 - 01 - 03)),
            expense(100.0, "rent", date!(2024 - 01 - 04)),
        ];

        let names: Vec<String> = category_totals(&transactions)
            .into_iter()
            .map(|total| total.name)
            .collect();

        // First-seen order, not sorted by magnitude.
        assert_eq!(names, vec!["food", "transport", "rent"]);
    }

    #[test]
    fn missing_and_empty_categories_share_one_bucket() {
        let mut uncategorized = expense(25.0, "", date!(2024 - 01 - 01));
        uncategorized.category = None;

        let transactions = vec![
            uncategorized,
            expense(75.0, "", date!(2024 - 01 - 02)),
            expense(40.0, "food", date!(2024 - 01 - 03)),
        ];

        let totals = category_totals(&transactions);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].name, UNCATEGORIZED_LABEL);
        assert_eq!(totals[0].value, 100.0);
    }

    #[test]
    fn monthly_trend_for_sample_history() {
        let trend = monthly_trend(&sample_history());

        assert_eq!(
            trend,
            vec![
                MonthlyTotal {
                    month: "Jan 2024".to_owned(),
                    income: 1000.0,
                    expense: 300.0,
                    balance: 700.0,
                },
                MonthlyTotal {
                    month: "Feb 2024".to_owned(),
                    income: 0.0,
                    expense: 200.0,
                    balance: -200.0,
                },
            ]
        );
    }

    #[test]
    fn monthly_sums_match_the_overall_summary() {
        let transactions = vec![
            income(100.0, date!(2023 - 11 - 15)),
            expense(30.0, "food", date!(2023 - 12 - 01)),
            income(200.0, date!(2023 - 12 - 20)),
            expense(80.0, "transport", date!(2024 - 01 - 02)),
        ];

        let summary = summarize(&transactions);
        let trend = monthly_trend(&transactions);

        let monthly_income: f64 = trend.iter().map(|month| month.income).sum();
        let monthly_expense: f64 = trend.iter().map(|month| month.expense).sum();

        assert_eq!(monthly_income, summary.income);
        assert_eq!(monthly_expense, summary.expense);

        for month in &trend {
            assert_eq!(month.balance, month.income - month.expense);
        }
    }

    #[test]
    fn monthly_trend_preserves_first_seen_order() {
        // Out-of-order input stays in first-seen order rather than being
        // sorted chronologically.
        let transactions = vec![
            expense(10.0, "food", date!(2024 - 02 - 10)),
            income(100.0, date!(2024 - 01 - 05)),
            expense(5.0, "food", date!(2024 - 02 - 20)),
        ];

        let months: Vec<String> = monthly_trend(&transactions)
            .into_iter()
            .map(|month| month.month)
            .collect();

        assert_eq!(months, vec!["Feb 2024", "Jan 2024"]);
    }

    #[test]
    fn unknown_kinds_are_excluded_without_failing() {
        let refund = Transaction {
            id: 0,
            kind: TransactionKind::Other("refund".to_owned()),
            amount: 50.0,
            category: Some("food".to_owned()),
            date: date!(2024 - 03 - 01),
            note: None,
        };
        let transactions = vec![
            income(100.0, date!(2024 - 01 - 05)),
            expense(40.0, "food", date!(2024 - 01 - 10)),
            refund,
        ];

        let summary = summarize(&transactions);
        assert_eq!(summary.income, 100.0);
        assert_eq!(summary.expense, 40.0);

        let totals = category_totals(&transactions);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].value, 40.0);

        // The unknown kind still contributes its month, with zero totals.
        let trend = monthly_trend(&transactions);
        assert_eq!(trend.len(), 2);
        assert_eq!(
            trend[1],
            MonthlyTotal {
                month: "Mar 2024".to_owned(),
                income: 0.0,
                expense: 0.0,
                balance: 0.0,
            }
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let transactions = sample_history();

        assert_eq!(summarize(&transactions), summarize(&transactions));
        assert_eq!(category_totals(&transactions), category_totals(&transactions));
        assert_eq!(monthly_trend(&transactions), monthly_trend(&transactions));
    }

    #[test]
    fn month_labels_include_the_year() {
        assert_eq!(month_label(date!(2024 - 01 - 31)), "Jan 2024");
        assert_eq!(month_label(date!(2023 - 12 - 01)), "Dec 2023");
    }
}
