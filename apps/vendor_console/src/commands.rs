//! Line commands typed into the console and their mapping onto controller intents.

use client_core::ControllerHandle;
use shared::domain::{OrderId, OrderStatus};
use thiserror::Error;

pub const HELP_TEXT: &str = "\
Commands:
  vendor <id>                  watch orders for a vendor (`vendor` alone clears it)
  fetch                        fetch orders now
  accept <order_id>            mark an order completed
  reject <order_id>            mark an order cancelled
  status <order_id> <status>   set any status
  help                         show this list
  quit                         exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    SetVendor(String),
    Fetch,
    Accept(OrderId),
    Reject(OrderId),
    SetStatus {
        order_id: OrderId,
        status: OrderStatus,
    },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'; type `help` for the list")]
    Unknown(String),
    #[error("`{0}` needs an order id")]
    MissingOrderId(&'static str),
    #[error("'{0}' is not a valid order id")]
    InvalidOrderId(String),
    #[error("`status` needs an order id and a status")]
    MissingStatus,
}

/// Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "vendor" => ConsoleCommand::SetVendor(rest.to_string()),
        "fetch" | "refresh" => ConsoleCommand::Fetch,
        "accept" => ConsoleCommand::Accept(parse_order_id("accept", rest)?),
        "reject" => ConsoleCommand::Reject(parse_order_id("reject", rest)?),
        "status" => {
            let (order_id, status) = rest
                .split_once(char::is_whitespace)
                .ok_or(CommandError::MissingStatus)?;
            let status = status.trim();
            if status.is_empty() {
                return Err(CommandError::MissingStatus);
            }
            ConsoleCommand::SetStatus {
                order_id: parse_order_id("status", order_id)?,
                status: OrderStatus::from(status),
            }
        }
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_order_id(verb: &'static str, raw: &str) -> Result<OrderId, CommandError> {
    let raw = raw.trim().trim_start_matches('#');
    if raw.is_empty() {
        return Err(CommandError::MissingOrderId(verb));
    }
    raw.parse::<i64>()
        .map(OrderId)
        .map_err(|_| CommandError::InvalidOrderId(raw.to_string()))
}

/// Forwards a command to the controller. Returns false once the controller is gone.
pub fn dispatch_command(handle: &ControllerHandle, command: ConsoleCommand) -> bool {
    let name = match &command {
        ConsoleCommand::SetVendor(_) => "set_vendor",
        ConsoleCommand::Fetch => "fetch",
        ConsoleCommand::Accept(_) => "accept",
        ConsoleCommand::Reject(_) => "reject",
        ConsoleCommand::SetStatus { .. } => "set_status",
        ConsoleCommand::Help => "help",
        ConsoleCommand::Quit => "quit",
    };
    tracing::debug!(command = name, "dispatching console command");

    match command {
        ConsoleCommand::SetVendor(raw) => handle.set_vendor_id(raw),
        ConsoleCommand::Fetch => handle.fetch_orders(),
        ConsoleCommand::Accept(order_id) => handle.accept(order_id),
        ConsoleCommand::Reject(order_id) => handle.reject(order_id),
        ConsoleCommand::SetStatus { order_id, status } => handle.update_status(order_id, status),
        ConsoleCommand::Help | ConsoleCommand::Quit => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn vendor_keeps_raw_text_and_allows_clearing() {
        assert_eq!(
            parse_command("vendor  123 "),
            Ok(Some(ConsoleCommand::SetVendor("123".into())))
        );
        assert_eq!(
            parse_command("vendor"),
            Ok(Some(ConsoleCommand::SetVendor(String::new())))
        );
    }

    #[test]
    fn accept_and_reject_take_order_ids() {
        assert_eq!(
            parse_command("accept 1"),
            Ok(Some(ConsoleCommand::Accept(OrderId(1))))
        );
        assert_eq!(
            parse_command("REJECT #42"),
            Ok(Some(ConsoleCommand::Reject(OrderId(42))))
        );
        assert_eq!(
            parse_command("accept"),
            Err(CommandError::MissingOrderId("accept"))
        );
        assert_eq!(
            parse_command("reject abc"),
            Err(CommandError::InvalidOrderId("abc".into()))
        );
    }

    #[test]
    fn status_accepts_any_value() {
        assert_eq!(
            parse_command("status 7 on-hold"),
            Ok(Some(ConsoleCommand::SetStatus {
                order_id: OrderId(7),
                status: OrderStatus::Other("on-hold".into()),
            }))
        );
        assert_eq!(parse_command("status 7"), Err(CommandError::MissingStatus));
    }

    #[test]
    fn unknown_verbs_are_rejected() {
        assert_eq!(
            parse_command("delete 1"),
            Err(CommandError::Unknown("delete".into()))
        );
        assert_eq!(parse_command("quit"), Ok(Some(ConsoleCommand::Quit)));
        assert_eq!(parse_command("fetch"), Ok(Some(ConsoleCommand::Fetch)));
    }
}
