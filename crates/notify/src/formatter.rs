//! Pure mapping from a [`DomainEvent`] to the payload each channel kind takes.

use {
    chrono::{DateTime, SecondsFormat, Utc},
    leadflow_channels::{
        BotMessage, ChannelKind, DeliveryPayload, Embed, EmbedField, Envelope, ParseMode,
    },
    leadflow_common::text::{escape_html, format_eur, truncate_chars},
    serde_json::{Map, Value, json},
};

use crate::{
    events::{Conversion, DomainEvent, MessageSent, NewLead},
    templates::DEFAULT_PRODUCT_PHRASE,
};

/// Longest message excerpt forwarded to automation webhooks.
pub const ENVELOPE_MESSAGE_LIMIT: usize = 100;

pub const NEW_LEAD_COLOR: u32 = 0x0088ff;
pub const MESSAGE_SENT_COLOR: u32 = 0x00ff00;
pub const CONVERSION_COLOR: u32 = 0xffaa00;

/// Format `event` for a channel of `kind`. Same input, same bytes.
#[must_use]
pub fn format(event: &DomainEvent, kind: ChannelKind) -> DeliveryPayload {
    match kind {
        ChannelKind::BotApi => DeliveryPayload::BotMessage(BotMessage {
            text: bot_text(event),
            parse_mode: ParseMode::Html,
        }),
        ChannelKind::EmbedWebhook => DeliveryPayload::Embed(embed(event)),
        ChannelKind::AutomationWebhook => DeliveryPayload::Envelope(envelope(event)),
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Blank products count as absent everywhere a product is rendered.
fn known_product(product: Option<&String>) -> Option<&str> {
    product.map(|p| p.trim()).filter(|p| !p.is_empty())
}

fn product_or_default(product: Option<&String>) -> &str {
    known_product(product).unwrap_or(DEFAULT_PRODUCT_PHRASE)
}

fn finite_revenue(revenue: f64) -> f64 {
    if revenue.is_finite() {
        revenue
    } else {
        0.0
    }
}

fn bot_text(event: &DomainEvent) -> String {
    match event {
        DomainEvent::NewLead(e) => format!(
            "🔔 <b>New lead detected</b>\n<b>{}</b> is interested in <b>{}</b>\nSource: {}\nLead ID: <code>{}</code>",
            escape_html(&e.name),
            escape_html(product_or_default(e.product.as_ref())),
            escape_html(&e.source),
            escape_html(&e.lead_id),
        ),
        DomainEvent::MessageSent(e) => format!(
            "📱 <b>Message sent</b>\nMessage sent to <b>{}</b> about <b>{}</b>",
            escape_html(&e.name),
            escape_html(product_or_default(e.product.as_ref())),
        ),
        DomainEvent::Conversion(e) => format!(
            "💰 <b>Sale converted</b>\n<b>{}</b> bought <b>{}</b>\nRevenue: {}",
            escape_html(&e.name),
            escape_html(product_or_default(e.product.as_ref())),
            format_eur(e.revenue),
        ),
    }
}

fn embed(event: &DomainEvent) -> Embed {
    match event {
        DomainEvent::NewLead(NewLead {
            lead_id,
            name,
            chat_id,
            product,
            source,
            occurred_at,
        }) => Embed {
            title: "🔔 New Lead Detected".into(),
            description: format!(
                "**{name}** is interested in **{}**\nSource: {source}",
                product_or_default(product.as_ref())
            ),
            color: NEW_LEAD_COLOR,
            fields: vec![
                EmbedField::inline("Lead ID", lead_id),
                EmbedField::inline("Chat ID", chat_id),
            ],
            timestamp: timestamp(*occurred_at),
        },
        DomainEvent::MessageSent(MessageSent {
            name,
            product,
            occurred_at,
            ..
        }) => Embed {
            title: "📱 Message Sent".into(),
            description: format!(
                "Message sent to **{name}** about **{}**",
                product_or_default(product.as_ref())
            ),
            color: MESSAGE_SENT_COLOR,
            fields: Vec::new(),
            timestamp: timestamp(*occurred_at),
        },
        DomainEvent::Conversion(Conversion {
            name,
            product,
            revenue,
            occurred_at,
            ..
        }) => {
            let revenue = format_eur(*revenue);
            Embed {
                title: "💰 Sale Converted".into(),
                description: format!(
                    "**{name}** bought **{}**\nRevenue: {revenue}",
                    product_or_default(product.as_ref())
                ),
                color: CONVERSION_COLOR,
                fields: vec![
                    EmbedField::inline("Product", known_product(product.as_ref()).unwrap_or("N/A")),
                    EmbedField::inline("Revenue", revenue),
                ],
                timestamp: timestamp(*occurred_at),
            }
        },
    }
}

fn envelope(event: &DomainEvent) -> Envelope {
    let mut data = Map::new();
    match event {
        DomainEvent::NewLead(e) => {
            data.insert("leadId".into(), json!(e.lead_id));
            data.insert("name".into(), json!(e.name));
            data.insert("chatId".into(), json!(e.chat_id));
            if let Some(product) = known_product(e.product.as_ref()) {
                data.insert("product".into(), json!(product));
            }
            data.insert("source".into(), json!(e.source));
        },
        DomainEvent::MessageSent(e) => {
            data.insert("leadId".into(), json!(e.lead_id));
            data.insert("chatId".into(), json!(e.chat_id));
            data.insert(
                "message".into(),
                json!(truncate_chars(&e.message, ENVELOPE_MESSAGE_LIMIT)),
            );
        },
        DomainEvent::Conversion(e) => {
            data.insert("leadId".into(), json!(e.lead_id));
            data.insert("chatId".into(), json!(e.chat_id));
            if let Some(product) = known_product(e.product.as_ref()) {
                data.insert("product".into(), json!(product));
            }
            data.insert("revenue".into(), json!(finite_revenue(e.revenue)));
        },
    }
    Envelope {
        event: event.kind().as_str().into(),
        data: Value::Object(data),
        timestamp: timestamp(event.occurred_at()),
    }
}
