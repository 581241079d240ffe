//! Card components for the dashboard's headline figures.

use maud::{Markup, html};

use crate::{html::format_currency, report::aggregation::Summary};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

const POSITIVE_STYLE: &str = "text-green-600 dark:text-green-400";
const NEGATIVE_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        POSITIVE_STYLE
    } else {
        NEGATIVE_STYLE
    }
}

/// Renders the three headline cards: total income, total expenses, and the
/// balance. The balance is colored by its sign.
pub(super) fn summary_cards(summary: &Summary) -> Markup {
    html! {
        section class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4 w-full mb-8"
        {
            div class=(CARD_STYLE)
            {
                h2 class="text-lg font-semibold mb-2" { "Total Income" }
                p class={"text-3xl " (POSITIVE_STYLE)} { (format_currency(summary.income)) }
            }

            div class=(CARD_STYLE)
            {
                h2 class="text-lg font-semibold mb-2" { "Total Expenses" }
                p class={"text-3xl " (NEGATIVE_STYLE)} { (format_currency(summary.expense)) }
            }

            div class=(CARD_STYLE)
            {
                h2 class="text-lg font-semibold mb-2" { "Balance" }
                p class={"text-3xl " (amount_color_class(summary.balance))} {
                    (format_currency(summary.balance))
                }
            }
        }
    }
}
