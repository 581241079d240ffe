//! Chart generation and rendering for the dashboard.
//!
//! This module creates the ECharts visualizations for financial data:
//! - **Expenses by Category**: Pie chart of expense totals per category
//! - **Monthly Trend**: Income, expenses, and balance per month as lines
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization
//! code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPointItem,
    element::{AxisLabel, AxisType, JsFunction, Tooltip, Trigger},
    series::{Line, Pie},
};
use maud::PreEscaped;

use crate::{
    html::HeadElement,
    report::aggregation::{CategoryTotal, MonthlyTotal},
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Builds the pie chart of expense totals per category.
///
/// Slices appear in the same order as `totals`, i.e. the order categories
/// first appear in the transaction history.
pub(super) fn category_pie_chart(totals: &[CategoryTotal]) -> Chart {
    let data: Vec<DataPointItem> = totals
        .iter()
        .map(|total| DataPointItem::new(total.value).name(total.name.clone()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expenses by Category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0%"))
        .series(Pie::new().name("Expenses").radius("60%").data(data))
}

/// Builds the line chart of income, expenses, and balance per month.
pub(super) fn monthly_trend_chart(trend: &[MonthlyTotal]) -> Chart {
    let labels: Vec<String> = trend.iter().map(|month| month.month.clone()).collect();
    let income: Vec<f64> = trend.iter().map(|month| month.income).collect();
    let expense: Vec<f64> = trend.iter().map(|month| month.expense).collect();
    let balance: Vec<f64> = trend.iter().map(|month| month.balance).collect();

    Chart::new()
        .title(Title::new().text("Monthly Trend"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().top("8%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Income").data(income))
        .series(Line::new().name("Expense").data(expense))
        .series(Line::new().name("Balance").data(balance))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD',
              maximumFractionDigits: 0
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
