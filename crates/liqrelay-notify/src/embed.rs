//! Embed rendering for liquidation notifications.
//!
//! Pure presentation: notional-size tiers pick the emoji and color, large
//! liquidations get louder titles, and the field grid mirrors what the
//! chat client renders. None of this affects what gets relayed, only how
//! it looks.

use chrono::SecondsFormat;
use liqrelay_core::{LiquidationEvent, Notional, Side};
use rust_decimal::Decimal;
use serde::Serialize;

// Side-based embed colors, gold for massive liquidations.
const COLOR_LONG: u32 = 0x00D4AA; // mint green
const COLOR_SHORT: u32 = 0xFF6B6B; // coral red
const COLOR_GOLD: u32 = 0xFDCB6E;

const FOOTER_ICON: &str = "https://cryptologos.cc/logos/binance-coin-bnb-logo.png";
const THUMB_LONG: &str = "https://cdn-icons-png.flaticon.com/512/190/190411.png";
const THUMB_SHORT: &str = "https://cdn-icons-png.flaticon.com/512/190/190413.png";

/// Outbound webhook payload: one embed plus the sender identity.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
    pub username: String,
    pub avatar_url: String,
}

/// One rich-content embed.
#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    pub timestamp: String,
    pub thumbnail: EmbedThumbnail,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

/// Compact dollar formatting: $1.23M / $45.3K / $987.65.
pub fn format_value(notional: Notional) -> String {
    let v = notional.inner();
    let million = Decimal::from(1_000_000);
    if v >= million {
        format!("${:.2}M", v / million)
    } else if v >= Decimal::ONE_THOUSAND {
        format!("${:.1}K", v / Decimal::ONE_THOUSAND)
    } else {
        format!("${v:.2}")
    }
}

/// Emoji tier by liquidation size.
pub fn tier_emoji(notional: Notional) -> &'static str {
    let v = notional.inner();
    if v >= Decimal::from(1_000_000) {
        "🐋"
    } else if v >= Decimal::from(100_000) {
        "🦈"
    } else if v >= Decimal::from(10_000) {
        "🐟"
    } else {
        "🦐"
    }
}

/// Embed color: side-based, gold overrides for massive liquidations.
pub fn tier_color(side: Side, notional: Notional) -> u32 {
    if notional.inner() >= Decimal::from(500_000) {
        return COLOR_GOLD;
    }
    match side {
        Side::Long => COLOR_LONG,
        Side::Short => COLOR_SHORT,
    }
}

/// Render one event into the webhook payload.
pub fn render(event: &LiquidationEvent) -> WebhookPayload {
    let notional = event.notional();
    let emoji = tier_emoji(notional);
    let color = tier_color(event.side, notional);

    // Sub-dollar prices need more decimals to be legible
    let price = event.price.inner();
    let formatted_price = if price < Decimal::ONE {
        format!("{price:.6}")
    } else {
        format!("{price:.4}")
    };

    let mut title = format!("{emoji} {} LIQUIDATION", event.side);
    if notional.inner() >= Decimal::from(1_000_000) {
        title.push_str(" 🚨 WHALE ALERT");
    } else if notional.inner() >= Decimal::from(100_000) {
        title.push_str(" ⚡ LARGE");
    }

    let side_value = if event.side.is_long() {
        "🟢 **LONG**"
    } else {
        "🔴 **SHORT**"
    };

    let mut fields = vec![
        EmbedField {
            name: "💰 Liquidation Value".to_string(),
            value: format!("**{}**", format_value(notional)),
            inline: true,
        },
        EmbedField {
            name: "📊 Entry Price".to_string(),
            value: format!("`${formatted_price}`"),
            inline: true,
        },
        EmbedField {
            name: "📦 Quantity".to_string(),
            value: format!("`{} {}`", event.qty, event.base_asset()),
            inline: true,
        },
        EmbedField {
            name: "⚡ Side".to_string(),
            value: side_value.to_string(),
            inline: true,
        },
        EmbedField {
            name: "🕐 Time".to_string(),
            value: format!("<t:{}:R>", event.observed_at.timestamp()),
            inline: true,
        },
        EmbedField {
            name: "📈 Exchange".to_string(),
            value: "**Futures**".to_string(),
            inline: true,
        },
    ];

    if notional.inner() >= Decimal::from(1_000_000) {
        fields.insert(
            0,
            EmbedField {
                name: "🐋 WHALE STATUS".to_string(),
                value: "```diff\n+ MASSIVE LIQUIDATION DETECTED\n```".to_string(),
                inline: false,
            },
        );
    }

    let embed = Embed {
        title,
        description: format!(
            "**{}** position liquidated on Binance Futures",
            event.symbol
        ),
        color,
        fields,
        footer: EmbedFooter {
            text: "🔥 Crypto Liquidation Tracker 🔥".to_string(),
            icon_url: FOOTER_ICON.to_string(),
        },
        timestamp: event
            .observed_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        thumbnail: EmbedThumbnail {
            url: if event.side.is_long() {
                THUMB_LONG.to_string()
            } else {
                THUMB_SHORT.to_string()
            },
        },
    };

    WebhookPayload {
        embeds: vec![embed],
        username: "Liquidation Tracker".to_string(),
        avatar_url: FOOTER_ICON.to_string(),
    }
}
