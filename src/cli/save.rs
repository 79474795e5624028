use super::ui;
use crate::core::AdminApi;
use crate::core::trade::{Trade, TradeForm, TradeStatus};
use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// Page size used when looking up a trade to edit.
const LOOKUP_PAGE_SIZE: u32 = 100;

/// Trade fields as typed on the command line. On update, unset fields keep
/// the stored trade's values.
#[derive(Debug, Clone, Default)]
pub struct TradeInput {
    pub product_name: Option<String>,
    pub currency: Option<String>,
    pub amount: Option<String>,
    pub exchange_rate: Option<String>,
    /// Overrides the derived `amount × exchange_rate` total.
    pub total_amount: Option<String>,
    pub status: Option<TradeStatus>,
}

impl TradeInput {
    fn is_complete(&self) -> bool {
        self.product_name.is_some()
            && self.currency.is_some()
            && self.amount.is_some()
            && self.exchange_rate.is_some()
    }

    fn apply_to(&self, mut form: TradeForm) -> TradeForm {
        if let Some(product_name) = &self.product_name {
            form.set_product_name(product_name);
        }
        if let Some(currency) = &self.currency {
            form.set_currency(currency);
        }
        if let Some(amount) = &self.amount {
            form.set_amount(amount);
        }
        if let Some(exchange_rate) = &self.exchange_rate {
            form.set_exchange_rate(exchange_rate);
        }
        if let Some(total) = &self.total_amount {
            form.set_total_amount(total);
        }
        if let Some(status) = self.status {
            form.set_status(status);
        }
        form
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(u64),
}

/// Walks the trade list until the trade with `id` turns up.
pub async fn find_trade(api: &(dyn AdminApi + Send + Sync), id: u64) -> Result<Trade> {
    let mut page = 1;
    loop {
        let listing = api
            .fetch_trades(page, LOOKUP_PAGE_SIZE)
            .await
            .with_context(|| format!("Failed to load trade {id}"))?;
        if let Some(trade) = listing.trades.into_iter().find(|t| t.id == id) {
            return Ok(trade);
        }
        if u64::from(page) >= listing.total_pages {
            bail!("Trade {id} not found");
        }
        page += 1;
    }
}

async fn build_form(
    api: &(dyn AdminApi + Send + Sync),
    target: SaveTarget,
    input: &TradeInput,
) -> Result<TradeForm> {
    let form = match target {
        SaveTarget::Update(id) if !input.is_complete() => {
            let trade = find_trade(api, id).await?;
            debug!(?trade, "Editing stored trade");
            TradeForm::from_trade(&trade)
        }
        _ => TradeForm::new(),
    };
    Ok(input.apply_to(form))
}

/// Validates `input` and creates or updates the trade. A total that does not
/// reconcile with `amount × exchange_rate` stops the save before any write.
pub async fn run(
    api: &(dyn AdminApi + Send + Sync),
    target: SaveTarget,
    input: &TradeInput,
) -> Result<()> {
    let form = build_form(api, target, input).await?;
    let draft = form.submit().context("Trade not saved")?;
    debug!(?draft, ?target, "Saving trade");

    match target {
        SaveTarget::Create => {
            api.create_trade(&draft)
                .await
                .context("Failed to create trade")?;
            info!("Created trade for {}", draft.product_name);
            ui::notify_success(&format!(
                "Created trade: {} {} × {} = {:.2} CNY",
                draft.amount, draft.currency, draft.exchange_rate, draft.total_amount
            ));
        }
        SaveTarget::Update(id) => {
            api.update_trade(id, &draft)
                .await
                .with_context(|| format!("Failed to update trade {id}"))?;
            info!("Updated trade {}", id);
            ui::notify_success(&format!(
                "Updated trade {id}: {} {} × {} = {:.2} CNY",
                draft.amount, draft.currency, draft.exchange_rate, draft.total_amount
            ));
        }
    }
    Ok(())
}
