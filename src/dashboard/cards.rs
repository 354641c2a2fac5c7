//! Wallet summary cards.

use maud::{Markup, html};

use crate::{
    grid::DEFAULT_CURRENCY,
    html::{SKELETON_STYLE, format_amount},
    models::Wallet,
};

/// A wallet figure with its label.
struct Figure {
    label: &'static str,
    amount: f64,
}

fn summary_figures(wallet: &Wallet) -> [Figure; 3] {
    [
        Figure {
            label: "Total Payout",
            amount: wallet.total_payout,
        },
        Figure {
            label: "Total Revenue",
            amount: wallet.total_revenue,
        },
        Figure {
            label: "Pending Payout",
            amount: wallet.pending_payout,
        },
    ]
}

/// The available balance shown above the revenue chart.
///
/// Shows a skeleton until the wallet has loaded.
pub(super) fn balance_card(wallet: Option<&Wallet>) -> Markup {
    html! {
        div id="available-balance" class="flex flex-wrap items-center gap-16"
        {
            div
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Available Balance" }

                @match wallet {
                    Some(wallet) => {
                        p class="text-4xl font-bold" data-amount="true"
                        {
                            (format_amount(DEFAULT_CURRENCY, wallet.balance))
                        }
                    }
                    None => {
                        div class={ "h-10 w-56 mt-2 " (SKELETON_STYLE) } {}
                    }
                }
            }
        }
    }
}

/// The payout and revenue totals shown next to the revenue chart.
///
/// Shows skeletons until the wallet has loaded.
pub(super) fn wallet_cards(wallet: Option<&Wallet>) -> Markup {
    html! {
        aside id="wallet-cards" class="flex flex-col gap-8 w-full lg:w-72"
        {
            @match wallet {
                Some(wallet) => {
                    @for figure in summary_figures(wallet) {
                        div class="flex flex-col gap-2"
                        {
                            p class="text-sm text-gray-500 dark:text-gray-400" { (figure.label) }
                            p class="text-2xl font-bold" data-amount="true"
                            {
                                (format_amount(DEFAULT_CURRENCY, figure.amount))
                            }
                        }
                    }
                }
                None => {
                    @for _ in 0..3 {
                        div class="flex flex-col gap-2" data-skeleton-card="true"
                        {
                            div class={ "h-4 w-24 " (SKELETON_STYLE) } {}
                            div class={ "h-8 w-40 " (SKELETON_STYLE) } {}
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{models::Wallet, test_utils::assert_valid_html};

    use super::{balance_card, wallet_cards};

    fn texts(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[test]
    fn cards_show_wallet_figures_in_usd() {
        let wallet = Wallet {
            balance: 750.56,
            total_payout: 55080.0,
            total_revenue: 1200000.0,
            pending_payout: 0.0,
            total_orders: 0,
        };

        let cards = Html::parse_fragment(&wallet_cards(Some(&wallet)).into_string());
        let balance = Html::parse_fragment(&balance_card(Some(&wallet)).into_string());

        assert_valid_html(&cards);
        assert_eq!(
            texts(&cards, "p[data-amount]"),
            ["USD 55,080.00", "USD 1,200,000.00", "USD 0.00"]
        );
        assert_eq!(texts(&balance, "p[data-amount]"), ["USD 750.56"]);
        let labels = texts(&cards, "p.text-sm");
        assert_eq!(labels, ["Total Payout", "Total Revenue", "Pending Payout"]);
    }

    #[test]
    fn cards_show_skeletons_while_loading() {
        let cards = Html::parse_fragment(&wallet_cards(None).into_string());

        assert_eq!(texts(&cards, "[data-skeleton-card]").len(), 3);
        assert!(texts(&cards, "p[data-amount]").is_empty());
    }
}
