use maud::{DOCTYPE, Markup, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "px-6 py-3 bg-gray-900 \
    hover:bg-gray-700 disabled:bg-gray-400 text-white text-sm font-semibold \
    rounded-full";

pub const BUTTON_SECONDARY_STYLE: &str = "px-6 py-3 text-sm font-semibold \
    text-gray-900 bg-gray-100 rounded-full hover:bg-gray-200 \
    dark:bg-gray-800 dark:text-gray-200 dark:hover:bg-gray-700";

pub const BUTTON_CHIP_STYLE: &str = "px-4 py-2 text-sm font-medium rounded-full \
    border border-gray-200 text-gray-900 hover:bg-gray-100 \
    dark:border-gray-600 dark:text-gray-200 dark:hover:bg-gray-700";

pub const BUTTON_CHIP_ACTIVE_STYLE: &str = "px-4 py-2 text-sm font-medium rounded-full \
    border border-gray-900 bg-gray-900 text-white \
    dark:border-white dark:bg-white dark:text-gray-900";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-semibold text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded-lg text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_CHECKBOX_STYLE: &str = "h-4 w-4 rounded text-gray-900 \
    border-gray-300 focus:ring-gray-900 dark:border-gray-600";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Badge style, combined with a colour from the status badge styles.
pub const BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold rounded-full";

// Skeleton placeholder shown while data loads
pub const SKELETON_STYLE: &str = "animate-pulse rounded bg-gray-200 dark:bg-gray-700";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col gap-8 px-6 py-8 mx-auto max-w-screen-xl text-gray-900 dark:text-white";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Revenue Dashboard" }

                script src="https://cdn.tailwindcss.com" {}
                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js" {}

                style
                {
                    r#"
                    .echarts-tooltip {
                        z-index: 30 !important;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-white dark:bg-gray-900"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="hidden w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-gray-900 dark:text-white"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-gray-900
                            hover:bg-gray-700 focus:ring-4 focus:outline-hidden
                            focus:ring-gray-300 font-medium rounded-full text-sm px-5
                            py-2.5 text-center my-4"
                    {
                        "Back to Dashboard"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// The magnitude from which numfmt switches to scientific notation.
const SCIENTIFIC_NOTATION_CUTOFF: f64 = 1e12;

/// Format `amount` with thousands separators and exactly two decimal places,
/// prefixed with a currency code, e.g. "USD 1,234.50".
pub fn format_amount(currency_code: &str, amount: f64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::currency("")
            .expect("an empty prefix is always valid")
            .precision(Precision::Decimals(2))
    });

    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let sign = if rounded > 0.0 && amount < 0.0 { "-" } else { "" };

    // Zero is hardcoded as "0" and numfmt drops trailing zeros, e.g. "12.30"
    // is rendered as "12.3", so the fraction is padded here.
    let formatted = if rounded == 0.0 {
        "0".to_owned()
    } else if rounded >= SCIENTIFIC_NOTATION_CUTOFF {
        group_thousands(&format!("{rounded:.2}"))
    } else {
        fmt.fmt_string(rounded)
    };
    let formatted = match formatted.split_once('.') {
        Some((whole, fraction)) => format!("{whole}.{fraction:0<2}"),
        None => format!("{formatted}.00"),
    };

    format!("{currency_code} {sign}{formatted}")
}

/// Insert a comma between every three digits of the whole part of `number`,
/// e.g. "1234567.50" becomes "1,234,567.50".
fn group_thousands(number: &str) -> String {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let mut grouped = String::with_capacity(number.len() + whole.len() / 3);

    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        grouped
    } else {
        format!("{grouped}.{fraction}")
    }
}
