//! Plain-text rendering of controller state and notices.

use std::{
    fmt::Write as _,
    io::{self, Write as _},
};

use client_core::{Notice, Phase, UiEvent, ViewState};
use crossbeam_channel::Receiver;
use shared::domain::Order;

const HEADING: &str = "Vendor Orders";

/// Prints every event until the controller drops its sender.
pub fn run(ui_rx: Receiver<UiEvent>) {
    let stdout = io::stdout();
    for event in ui_rx.iter() {
        let text = match event {
            UiEvent::StateChanged(state) => render_state(&state),
            UiEvent::Notice(notice) => render_notice(&notice),
        };
        let mut out = stdout.lock();
        if writeln!(out, "{text}").and_then(|()| out.flush()).is_err() {
            break;
        }
    }
}

pub fn render_notice(notice: &Notice) -> String {
    format!("{}: {}", notice.title(), notice.message())
}

pub fn render_state(state: &ViewState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADING}");

    match (&state.vendor_id, state.phase) {
        (None, _) | (_, Phase::Idle) => {
            out.push_str("Enter a vendor ID with `vendor <id>`.");
            return out;
        }
        (Some(vendor_id), Phase::Loading) => {
            let _ = writeln!(out, "Vendor {vendor_id} (loading...)");
        }
        (Some(vendor_id), Phase::Loaded) => {
            let _ = writeln!(out, "Vendor {vendor_id}");
        }
    }

    if state.orders.is_empty() {
        if state.phase == Phase::Loaded {
            out.push_str("No orders to show.");
        }
        return out.trim_end().to_string();
    }

    for order in &state.orders {
        out.push_str(&render_order(order));
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn render_order(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order #{}", order.order_id);
    let _ = writeln!(out, "  Status: {}", order.status);
    let _ = writeln!(out, "  Total: ₹{}", order.total);
    let _ = writeln!(out, "  Date: {}", order.date_created);
    let _ = writeln!(out, "  Products:");
    if order.items.is_empty() {
        let _ = writeln!(out, "    No products found");
    }
    for item in &order.items {
        let _ = writeln!(
            out,
            "    • {} (x{}) – ₹{}",
            item.name, item.quantity, item.line_total
        );
    }
    let _ = writeln!(out, "  [accept {id}] [reject {id}]", id = order.order_id);
    out
}
