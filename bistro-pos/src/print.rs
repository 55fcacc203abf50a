//! Ticket and receipt rendering
//!
//! Produces self-contained HTML for the browser print dialog. Server-side
//! printing goes through the backend's `/print/...` endpoints instead.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::{Invoice, Order, OrderItem, Table};
use tera::{Context, Tera};

use crate::error::PosResult;
use crate::money::{line_gross, to_decimal, to_f64};

const BASE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{% block title %}{% endblock title %}</title></head>
<body>
{% block content %}{% endblock content %}
</body>
</html>
"#;

/// Header, lines and totals shared by tickets and receipts
const ORDER: &str = r#"<h1>{{ restaurant }}</h1>
<p>{{ order_line }}</p>
{% if created %}<p>{{ created }}</p>
{% endif %}<hr>
<table>
{% for item in items %}<tr><td>{{ item.quantity }}x</td><td>{{ item.label }}</td><td>{{ item.amount }}</td></tr>
{% endfor %}</table>
<hr>
<table>
{% for row in totals %}<tr><td>{{ row.label }}</td><td>{{ row.amount }}</td></tr>
{% endfor %}</table>
"#;

const TICKET: &str = r#"{% extends "base.html" %}
{% block title %}Order #{{ order_id }}{% endblock title %}
{% block content %}{% include "order.html" %}{% endblock content %}
"#;

const RECEIPT: &str = r#"{% extends "base.html" %}
{% block title %}Receipt #{{ order_id }}{% endblock title %}
{% block content %}{% include "order.html" %}<hr>
<table>
{% for row in tenders %}<tr><td>{{ row.label }}</td><td>{{ row.amount }}</td></tr>
{% endfor %}</table>
{% if invoice_id %}<p>Invoice {{ invoice_id }}</p>
{% endif %}<p>{{ date }}</p>
{% endblock content %}
"#;

/// The `data-qr` payload is turned into a QR code by the print stylesheet
const TABLE_CARD: &str = r#"{% extends "base.html" %}
{% block title %}Table {{ number }}{% endblock title %}
{% block content %}<h1>{{ restaurant }}</h1>
<p>Table {{ number }}</p>
{% if location %}<p>{{ location }}</p>
{% endif %}<div class="qr" data-qr="{{ menu_url }}"></div>
<p>{{ menu_url }}</p>
{% endblock content %}
"#;

#[derive(Serialize)]
struct ItemRow {
    quantity: u32,
    label: String,
    amount: String,
}

#[derive(Serialize)]
struct AmountRow {
    label: &'static str,
    amount: String,
}

impl AmountRow {
    fn new(label: &'static str, value: f64) -> Self {
        Self {
            label,
            amount: money(value),
        }
    }
}

fn money(value: f64) -> String {
    format!("{value:.2} €")
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%d/%m/%Y %H:%M").to_string()
}

/// Receipt renderer
///
/// Templates are `.html`, so every value is autoescaped.
pub struct HtmlRenderer {
    tera: Tera,
    restaurant_name: String,
}

impl HtmlRenderer {
    pub fn new(restaurant_name: impl Into<String>) -> PosResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE),
            ("order.html", ORDER),
            ("ticket.html", TICKET),
            ("receipt.html", RECEIPT),
            ("table_card.html", TABLE_CARD),
        ])?;
        Ok(Self {
            tera,
            restaurant_name: restaurant_name.into(),
        })
    }

    fn order_context(&self, order: &Order) -> Context {
        let mut context = Context::new();
        context.insert("restaurant", &self.restaurant_name);
        context.insert("order_id", &order.id);
        let order_line = match order.table_id {
            Some(table) => format!("Order #{} · Table {table}", order.id),
            None => format!("Order #{}", order.id),
        };
        context.insert("order_line", &order_line);
        context.insert("created", &order.created_at.map(format_time));
        context.insert("items", &item_rows(&order.items));

        let tax = to_decimal(order.total_with_tax) - to_decimal(order.total_without_tax);
        let totals = [
            AmountRow::new("Subtotal", order.total_without_tax),
            AmountRow::new("Tax", to_f64(tax)),
            AmountRow::new("Total", order.total_with_tax),
        ];
        context.insert("totals", &totals);
        context
    }

    /// Order ticket (kitchen or pre-bill)
    pub fn render_ticket(&self, order: &Order) -> PosResult<String> {
        let context = self.order_context(order);
        Ok(self.tera.render("ticket.html", &context)?)
    }

    /// Customer receipt for a paid order
    ///
    /// `change` is the cash handed back, when known.
    pub fn render_receipt(
        &self,
        order: &Order,
        invoice: &Invoice,
        change: Option<f64>,
    ) -> PosResult<String> {
        let mut context = self.order_context(order);

        let mut tenders = Vec::new();
        if invoice.paid_with_cash > 0.0 {
            tenders.push(AmountRow::new("Cash", invoice.paid_with_cash));
        }
        if invoice.paid_with_card > 0.0 {
            tenders.push(AmountRow::new("Card", invoice.paid_with_card));
        }
        if let Some(change) = change.filter(|c| *c > 0.0) {
            tenders.push(AmountRow::new("Change", change));
        }
        context.insert("tenders", &tenders);
        context.insert("invoice_id", &invoice.id);
        context.insert("date", &format_time(invoice.date));

        Ok(self.tera.render("receipt.html", &context)?)
    }

    /// Table card with the QR code leading to the table's online menu
    ///
    /// `menu_url` comes from [`shared::util::table_menu_url`].
    pub fn render_table_card(&self, table: &Table, menu_url: &str) -> PosResult<String> {
        let mut context = Context::new();
        context.insert("restaurant", &self.restaurant_name);
        context.insert("number", &table.number);
        context.insert("location", &table.location);
        context.insert("menu_url", menu_url);
        Ok(self.tera.render("table_card.html", &context)?)
    }
}

fn item_rows(items: &[OrderItem]) -> Vec<ItemRow> {
    items
        .iter()
        .map(|item| ItemRow {
            quantity: item.quantity,
            label: match item.normalized_note() {
                Some(note) => format!("{} ({note})", item.menu_item.name),
                None => item.menu_item.name.clone(),
            },
            amount: money(to_f64(line_gross(item))),
        })
        .collect()
}
